//! Player input tokenizer
//!
//! A line of input holds one or more sentences separated by commas or
//! newlines. Each sentence is at most four dictionary words, and adjacent
//! words registered as a word pair are collapsed into one.

use log::debug;

use crate::dictionary::{Dictionary, Word, PAIR_NAME};

pub const MAX_SENTENCE_WORDS: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sentence {
    pub words: Vec<Word>,
}

impl Sentence {
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// verb is the sentence's first word
    pub fn verb(&self) -> Option<&Word> {
        self.words.first()
    }

    /// noun is the sentence's second word
    pub fn noun(&self) -> Option<&Word> {
        self.words.get(1)
    }

    /// push appends the dictionary word for `token`, collapsing the last
    /// two words when they form a word pair
    fn push(&mut self, dict: &Dictionary, token: &str) {
        let word = dict.find_word_by_string(token).cloned().unwrap_or_default();
        debug!(
            "token {:?} -> [{:02x}:{:02x}] {}",
            token, word.index, word.kind, word.name
        );
        self.words.push(word);

        let n = self.words.len();
        if n > 1 {
            if let Some(target) = dict.find_word_pair(&self.words[n - 2], &self.words[n - 1]) {
                self.words.truncate(n - 2);
                self.words.push(Word {
                    name: PAIR_NAME.to_string(),
                    index: target.index,
                    kind: target.kind,
                });
            }
        }
    }

    /// prepend_verb puts a remembered verb in front of the sentence
    pub fn prepend_verb(&mut self, verb: Word) {
        self.words.insert(0, verb);
        self.words.truncate(MAX_SENTENCE_WORDS);
    }
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

fn is_sentence_end(c: char) -> bool {
    matches!(c, ',' | '\n')
}

/// read_sentence parses the next sentence from `input` and returns it with
/// the unread remainder. The input must already be lowercase.
pub fn read_sentence<'a>(dict: &Dictionary, input: &'a str) -> (Sentence, &'a str) {
    let mut sentence = Sentence::default();
    let mut rest = input;

    loop {
        rest = rest.trim_start_matches(is_space);
        if rest.is_empty() {
            break;
        }
        if let Some(r) = rest.strip_prefix(is_sentence_end) {
            rest = r;
            break;
        }

        let end = rest
            .find(|c| is_space(c) || is_sentence_end(c))
            .unwrap_or(rest.len());
        sentence.push(dict, &rest[..end]);
        rest = &rest[end..];

        if sentence.words.len() >= MAX_SENTENCE_WORDS {
            break;
        }
    }

    (sentence, rest)
}

/// parse_line splits a whole input line into its non-empty sentences
pub fn parse_line(dict: &Dictionary, line: &str) -> Vec<Sentence> {
    let line = line.to_lowercase();
    let mut rest = line.as_str();
    let mut sentences = Vec::new();
    while !rest.is_empty() {
        let (sentence, r) = read_sentence(dict, rest);
        rest = r;
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
    }
    sentences
}
