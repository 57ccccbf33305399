#[cfg(test)]
mod tests {
    use crate::dictionary::*;
    use crate::util::FileBuffer;

    fn dictionary() -> Dictionary {
        Dictionary::new(
            vec![
                Word::new("north", 3, WORD_TYPE_VERB),
                Word::new("lantern", 9, WORD_TYPE_NOUN),
                Word::new("go", 4, WORD_TYPE_VERB),
                Word::new("goblet", 10, WORD_TYPE_NOUN),
                Word::new("light", 11, WORD_TYPE_VERB),
                Word::new("light", 11, WORD_TYPE_NOUN),
            ],
            vec![WordMap {
                first: WordKey::new(4, WORD_TYPE_VERB),
                second: WordKey::new(3, WORD_TYPE_VERB),
                flags: 0,
                target: WordKey::new(3, WORD_TYPE_VERB),
            }],
        )
    }

    #[test]
    fn test_short_words_match_exactly() {
        let dict = dictionary();
        assert_eq!(dict.find_word_by_string("north").unwrap().index, 3);
        assert!(dict.find_word_by_string("nort").is_none());
        assert!(dict.find_word_by_string("northx").is_none());
        assert_eq!(dict.find_word_by_string("go").unwrap().index, 4);
        assert!(dict.find_word_by_string("g").is_none());
    }

    #[test]
    fn test_long_words_match_on_six_character_prefix() {
        let dict = dictionary();
        // "lantern" is stored as its first six characters
        let entry = Word::new("lantern", 9, WORD_TYPE_NOUN).encode();
        let stored = Word::decode(&entry);
        assert_eq!(stored.name, "lanter");

        let dict = Dictionary::new(vec![stored], dict.word_maps);
        assert_eq!(dict.find_word_by_string("lanter").unwrap().index, 9);
        assert_eq!(dict.find_word_by_string("lantern").unwrap().index, 9);
        assert_eq!(dict.find_word_by_string("lanterns").unwrap().index, 9);
        assert!(dict.find_word_by_string("lante").is_none());
    }

    #[test]
    fn test_every_six_letter_word_matches_longer_input() {
        let dict = dictionary();
        for word in dict.words.iter().filter(|w| w.name.len() >= WORD_LEN) {
            let input = format!("{}xyz", word.name);
            let found = dict.find_word_by_string(&input).unwrap();
            assert_eq!(found.name, word.name);
        }
    }

    #[test]
    fn test_first_match_wins_for_shared_index() {
        let dict = dictionary();
        let w = dict.find_word_by_string("light").unwrap();
        assert_eq!(w.kind, WORD_TYPE_VERB);
        assert_eq!(
            dict.find_word_by_index_and_type(11, WORD_TYPE_NOUN).unwrap().kind,
            WORD_TYPE_NOUN
        );
        assert_eq!(
            dict.find_word_by_index_matching_mask(11, WORD_TYPE_NOUN_MASK)
                .unwrap()
                .kind,
            WORD_TYPE_NOUN
        );
        assert!(dict.find_word_by_index_and_type(11, WORD_TYPE_JOIN).is_none());
    }

    #[test]
    fn test_word_pair_requires_exact_types() {
        let dict = dictionary();
        let go = Word::new("go", 4, WORD_TYPE_VERB);
        let north = Word::new("north", 3, WORD_TYPE_VERB);
        assert_eq!(
            dict.find_word_pair(&go, &north),
            Some(WordKey::new(3, WORD_TYPE_VERB))
        );
        let north_noun = Word::new("north", 3, WORD_TYPE_NOUN);
        assert_eq!(dict.find_word_pair(&go, &north_noun), None);
        assert_eq!(dict.find_word_pair(&north, &go), None);
    }

    #[test]
    fn test_decode_obfuscated_entry() {
        let entry = Word::new("LAMP", 7, WORD_TYPE_NOUN).encode();
        // Names are stored xor'd, never in the clear
        assert_ne!(&entry[..4], b"lamp");
        let word = Word::decode(&entry);
        assert_eq!(word, Word::new("lamp", 7, WORD_TYPE_NOUN));
    }

    #[test]
    fn test_parse_word_maps() {
        // two pairs, terminator, then targets
        let bytes = [
            1, 0x01, 0, 2, 0x01, // pick + up
            3, 0x01, 0, 4, 0x40, // look + box
            0, 0, // end of pairs
            5, 0x01, // take
            6, 0x01, // examine
        ];
        let mut fb = FileBuffer::new(&bytes);
        let maps = Dictionary::parse_word_maps(&mut fb, 0, 12).unwrap();
        assert_eq!(maps.len(), 2);
        assert_eq!(maps[0].first, WordKey::new(1, WORD_TYPE_VERB));
        assert_eq!(maps[0].second, WordKey::new(2, WORD_TYPE_VERB));
        assert_eq!(maps[0].target, WordKey::new(5, WORD_TYPE_VERB));
        assert_eq!(maps[1].second, WordKey::new(4, WORD_TYPE_NOUN));
        assert_eq!(maps[1].target, WordKey::new(6, WORD_TYPE_VERB));
    }
}
