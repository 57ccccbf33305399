use log::debug;
use std::fmt::{Display, Error, Formatter};

use crate::dictionary::{WORD_TYPE_JOIN, WORD_TYPE_NOUN_MASK, WORD_TYPE_VERB};
use crate::error::GameError;
use crate::header::NR_ACTION_TABLES;
use crate::runtime_parser::Sentence;
use crate::util::FileBuffer;

pub const MAX_ACTION_WORDS: usize = 4;

/// The sentence shapes, in the order their tables appear in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    VerbVerbNounNoun,
    VerbNounJoinNoun,
    VerbJoinNoun,
    VerbDirNoun,
    VerbNounNoun,
    VerbNoun,
    VerbOptNoun,
}

pub const ACTION_TYPES: [ActionType; NR_ACTION_TABLES] = [
    ActionType::VerbVerbNounNoun,
    ActionType::VerbNounJoinNoun,
    ActionType::VerbJoinNoun,
    ActionType::VerbDirNoun,
    ActionType::VerbNounNoun,
    ActionType::VerbNoun,
    ActionType::VerbOptNoun,
];

impl ActionType {
    /// slot_types gives the word type mask each sentence word must intersect
    pub fn slot_types(&self) -> &'static [u8] {
        const V: u8 = WORD_TYPE_VERB;
        const N: u8 = WORD_TYPE_NOUN_MASK;
        const J: u8 = WORD_TYPE_JOIN;
        match self {
            ActionType::VerbVerbNounNoun => &[V, V, N, N],
            ActionType::VerbNounJoinNoun => &[V, N, J, N],
            ActionType::VerbJoinNoun => &[V, J, N],
            ActionType::VerbDirNoun => &[V, V, N],
            ActionType::VerbNounNoun => &[V, N, N],
            ActionType::VerbNoun => &[V, N],
            ActionType::VerbOptNoun => &[V],
        }
    }

    pub fn nr_words(&self) -> usize {
        self.slot_types().len()
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActionType::VerbVerbNounNoun => "VERB VERB NOUN NOUN",
            ActionType::VerbNounJoinNoun => "VERB NOUN JOIN NOUN",
            ActionType::VerbJoinNoun => "VERB JOIN NOUN",
            ActionType::VerbDirNoun => "VERB DIR NOUN",
            ActionType::VerbNounNoun => "VERB NOUN NOUN",
            ActionType::VerbNoun => "VERB NOUN",
            ActionType::VerbOptNoun => "VERB [NOUN]",
        }
    }
}

/// Action maps a sentence shape with literal word indexes to a function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionType,
    pub words: Vec<u8>,
    pub function: u16,
}

impl Action {
    pub fn new(kind: ActionType, words: &[u8], function: u16) -> Action {
        Action {
            kind,
            words: words.to_vec(),
            function,
        }
    }

    /// matches checks word count, then every slot's index and type
    pub fn matches(&self, sentence: &Sentence) -> bool {
        let nr_words = self.kind.nr_words();
        let count = sentence.words.len();
        if self.kind == ActionType::VerbOptNoun {
            if count > nr_words + 1 {
                return false;
            }
        } else if count != nr_words {
            return false;
        }

        self.kind
            .slot_types()
            .iter()
            .zip(self.words.iter())
            .zip(sentence.words.iter())
            .all(|((mask, index), word)| word.index == *index && word.kind & mask != 0)
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "[{}]", self.kind.name())?;
        for w in &self.words {
            write!(f, " {:02x}", w)?;
        }
        write!(f, " -> {:#06x}", self.function)
    }
}

/// parse_action_table reads one table of `kind` actions at `offset`. Each
/// group starts with a verb index and a count; a zero verb ends the table.
pub fn parse_action_table(
    fb: &mut FileBuffer,
    kind: ActionType,
    offset: usize,
) -> Result<Vec<Action>, GameError> {
    let mut actions = Vec::new();
    fb.seek(offset)?;
    loop {
        let verb = fb.read_u8()?;
        if verb == 0 {
            break;
        }
        let count = fb.read_u8()?;
        for _ in 0..count {
            let mut words = vec![verb];
            words.extend_from_slice(fb.read_bytes(kind.nr_words() - 1)?);
            let function = fb.read_le16()?;
            actions.push(Action {
                kind,
                words,
                function,
            });
        }
    }
    debug!("{} action(s) of type {}", actions.len(), kind.name());
    Ok(actions)
}

/// parse_actions reads every action table in header order
pub fn parse_actions(
    fb: &mut FileBuffer,
    offsets: &[usize; NR_ACTION_TABLES],
) -> Result<Vec<Action>, GameError> {
    let mut actions = Vec::new();
    for (kind, offset) in ACTION_TYPES.iter().zip(offsets.iter()) {
        actions.extend(parse_action_table(fb, *kind, *offset)?);
    }
    Ok(actions)
}

/// find_action returns the first action matching the sentence
pub fn find_action<'a>(actions: &'a [Action], sentence: &Sentence) -> Option<&'a Action> {
    actions.iter().find(|a| a.matches(sentence))
}

/// encode_action_table writes actions of one type in table form, grouping
/// consecutive actions that share a verb
pub fn encode_action_table(actions: &[Action]) -> Vec<u8> {
    let mut bytes = Vec::new();
    let mut i = 0;
    while i < actions.len() {
        let verb = actions[i].words[0];
        let group: Vec<&Action> = actions[i..]
            .iter()
            .take_while(|a| a.words[0] == verb)
            .take(u8::MAX as usize)
            .collect();
        bytes.push(verb);
        bytes.push(group.len() as u8);
        for a in &group {
            bytes.extend_from_slice(&a.words[1..]);
            bytes.extend_from_slice(&a.function.to_le_bytes());
        }
        i += group.len();
    }
    bytes.push(0);
    bytes
}
