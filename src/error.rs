// Game session error handling

use std::fmt;

use crate::display_trait::DisplayError;

#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    // Data file errors
    UnknownMagic(u16),
    Truncated { offset: usize, wanted: usize }, // read position, bytes wanted
    BadFunction(usize, String),                 // function number, reason
    BadString(String),
    TooManyEntries(&'static str, usize), // table, entry count

    // Data integrity errors raised while playing
    BadRoom(u16),
    BadItem(u16),
    BadVariable(u8),
    BadFlag(u8),
    BadFunctionIndex(usize, usize), // index, number of functions
    BadDirection(u8),
    BadStringDesc(u8, u8),
    NoCurrentObject,
    CallDepthExceeded(usize),

    // Environment errors
    Config(String),
    IOError(String),
    Display(String),
    EndOfInput,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameError::UnknownMagic(magic) => {
                write!(f, "Unknown game data magic {:#06x}", magic)
            }
            GameError::Truncated { offset, wanted } => {
                write!(
                    f,
                    "Game data truncated: wanted {} byte(s) at offset {:#06x}",
                    wanted, offset
                )
            }
            GameError::BadFunction(index, reason) => {
                write!(f, "Bad function {}: {}", index, reason)
            }
            GameError::BadString(reason) => write!(f, "Bad string: {}", reason),
            GameError::TooManyEntries(table, count) => {
                write!(f, "Too many {}: {} (at most 255)", table, count)
            }
            GameError::BadRoom(room) => write!(f, "Bad room {:#04x}", room),
            GameError::BadItem(item) => write!(f, "Bad item {:#04x}", item),
            GameError::BadVariable(var) => write!(f, "Bad variable {:#04x}", var),
            GameError::BadFlag(flag) => write!(f, "Bad flag {:#04x}", flag),
            GameError::BadFunctionIndex(index, count) => {
                write!(f, "Bad function {:#06x} >= {:#06x}", index, count)
            }
            GameError::BadDirection(dir) => write!(f, "Bad direction {}", dir),
            GameError::BadStringDesc(index, table) => {
                write!(f, "Bad string desc {:02x}:{:02x}", index, table)
            }
            GameError::NoCurrentObject => write!(f, "Bad current object"),
            GameError::CallDepthExceeded(depth) => {
                write!(f, "Function call depth exceeded ({})", depth)
            }
            GameError::Config(msg) => write!(f, "Configuration error: {}", msg),
            GameError::IOError(msg) => write!(f, "IO error: {}", msg),
            GameError::Display(msg) => write!(f, "Display error: {}", msg),
            GameError::EndOfInput => write!(f, "End of input"),
        }
    }
}

impl std::error::Error for GameError {}

impl From<std::io::Error> for GameError {
    fn from(error: std::io::Error) -> Self {
        GameError::IOError(error.to_string())
    }
}

impl From<DisplayError> for GameError {
    fn from(error: DisplayError) -> Self {
        GameError::Display(error.message)
    }
}

impl From<toml::de::Error> for GameError {
    fn from(error: toml::de::Error) -> Self {
        GameError::Config(error.to_string())
    }
}
