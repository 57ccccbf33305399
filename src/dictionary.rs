use std::fmt::Display;
use std::fmt::Error;
use std::fmt::Formatter;

use crate::error::GameError;
use crate::util::FileBuffer;

pub const WORD_TYPE_VERB: u8 = 0x01;
pub const WORD_TYPE_JOIN: u8 = 0x02;
pub const WORD_TYPE_FEMALE: u8 = 0x10;
pub const WORD_TYPE_MALE: u8 = 0x20;
pub const WORD_TYPE_NOUN: u8 = 0x40;
pub const WORD_TYPE_NOUN_PLURAL: u8 = 0x80;
pub const WORD_TYPE_NOUN_MASK: u8 = WORD_TYPE_NOUN | WORD_TYPE_NOUN_PLURAL;

/// Length of the name field of a dictionary entry
pub const WORD_LEN: usize = 6;
/// Size of one on-disk dictionary entry
pub const WORD_ENTRY_LEN: usize = 8;
/// Names are obfuscated by XOR with this key
const WORD_XOR: u8 = 0x8a;

/// Display name given to words produced by collapsing a word pair
pub const PAIR_NAME: &str = "[PAIR]";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Word {
    pub name: String,
    pub index: u8,
    pub kind: u8,
}

impl Word {
    pub fn new(name: &str, index: u8, kind: u8) -> Word {
        Word {
            name: name.to_ascii_lowercase(),
            index,
            kind,
        }
    }

    pub fn is_verb(&self) -> bool {
        self.kind & WORD_TYPE_VERB != 0
    }

    pub fn is_noun(&self) -> bool {
        self.kind & WORD_TYPE_NOUN_MASK != 0
    }

    /// decode parses one 8 byte dictionary entry
    pub fn decode(entry: &[u8]) -> Word {
        let name: String = entry[..WORD_LEN]
            .iter()
            .map(|b| b ^ WORD_XOR)
            .take_while(|b| *b != 0)
            .map(|b| (b as char).to_ascii_lowercase())
            .collect();
        Word {
            name,
            index: entry[WORD_LEN],
            kind: entry[WORD_LEN + 1],
        }
    }

    /// encode writes the on-disk form of the word
    pub fn encode(&self) -> [u8; WORD_ENTRY_LEN] {
        let mut entry = [0u8; WORD_ENTRY_LEN];
        for (i, b) in self.name.bytes().take(WORD_LEN).enumerate() {
            entry[i] = b;
        }
        for b in entry.iter_mut().take(WORD_LEN) {
            *b ^= WORD_XOR;
        }
        entry[WORD_LEN] = self.index;
        entry[WORD_LEN + 1] = self.kind;
        entry
    }
}

/// WordKey names a dictionary word by index and type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WordKey {
    pub index: u8,
    pub kind: u8,
}

impl WordKey {
    pub fn new(index: u8, kind: u8) -> WordKey {
        WordKey { index, kind }
    }
}

/// WordMap collapses two adjacent words into a single word, e.g. "pick up" into "take"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordMap {
    pub first: WordKey,
    pub second: WordKey,
    pub flags: u8,
    pub target: WordKey,
}

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    pub words: Vec<Word>,
    pub word_maps: Vec<WordMap>,
}

impl Dictionary {
    pub fn new(words: Vec<Word>, word_maps: Vec<WordMap>) -> Dictionary {
        Dictionary { words, word_maps }
    }

    /// parse_words reads `count` entries starting at the cursor
    pub fn parse_words(fb: &mut FileBuffer, count: usize) -> Result<Vec<Word>, GameError> {
        let mut words = Vec::with_capacity(count);
        for _ in 0..count {
            words.push(Word::decode(fb.read_bytes(WORD_ENTRY_LEN)?));
        }
        Ok(words)
    }

    /// parse_word_maps reads the pair table at `pairs` and the matching targets at `targets`
    pub fn parse_word_maps(
        fb: &mut FileBuffer,
        pairs: usize,
        targets: usize,
    ) -> Result<Vec<WordMap>, GameError> {
        let mut maps = Vec::new();
        fb.seek(pairs)?;
        loop {
            let index = fb.read_u8()?;
            let kind = fb.read_u8()?;
            if index == 0 && kind == 0 {
                break;
            }
            let flags = fb.read_u8()?;
            let second = WordKey::new(fb.read_u8()?, fb.read_u8()?);
            maps.push(WordMap {
                first: WordKey::new(index, kind),
                second,
                flags,
                target: WordKey::default(),
            });
        }

        fb.seek(targets)?;
        for map in maps.iter_mut() {
            map.target = WordKey::new(fb.read_u8()?, fb.read_u8()?);
        }
        Ok(maps)
    }

    /// find_word_by_string finds the first word matching player input.
    /// Names shorter than six characters must match exactly, longer names
    /// match on their first six characters.
    pub fn find_word_by_string(&self, input: &str) -> Option<&Word> {
        self.words.iter().find(|word| {
            if word.name.len() < WORD_LEN && input.len() != word.name.len() {
                return false;
            }
            input.as_bytes().starts_with(word.name.as_bytes())
        })
    }

    pub fn find_word_by_index_and_type(&self, index: u8, kind: u8) -> Option<&Word> {
        self.words
            .iter()
            .find(|w| w.index == index && w.kind == kind)
    }

    pub fn find_word_by_index_matching_mask(&self, index: u8, mask: u8) -> Option<&Word> {
        self.words
            .iter()
            .find(|w| w.index == index && (w.kind & mask) != 0)
    }

    /// find_word_pair returns the word the two given words collapse into
    pub fn find_word_pair(&self, first: &Word, second: &Word) -> Option<WordKey> {
        self.word_maps
            .iter()
            .find(|m| {
                m.first.index == first.index
                    && m.first.kind == first.kind
                    && m.second.index == second.index
                    && m.second.kind == second.kind
            })
            .map(|m| m.target)
    }
}

impl Display for Dictionary {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        writeln!(
            f,
            "Dictionary: {} word(s), {} word pair(s)",
            self.words.len(),
            self.word_maps.len()
        )?;
        for w in &self.words {
            writeln!(f, "  [{:02x}:{:02x}] {}", w.index, w.kind, w.name)?;
        }
        for m in &self.word_maps {
            writeln!(
                f,
                "  pair [{:02x}:{:02x}] + [{:02x}:{:02x}] -> [{:02x}:{:02x}]",
                m.first.index,
                m.first.kind,
                m.second.index,
                m.second.kind,
                m.target.index,
                m.target.kind
            )?;
        }
        Ok(())
    }
}
