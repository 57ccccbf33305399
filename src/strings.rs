//! String tables and runtime substitution of the `@` placeholder

use log::{debug, trace};
use serde::Deserialize;

use crate::error::GameError;
use crate::text::{read_string, REPLACE_CHAR};
use crate::util::FileBuffer;

/// Strings loaded from one extra string file start at a multiple of this
const STRING_FILE_SPACING: usize = 0x40;

/// StringFile describes where the strings of one extra string file live
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StringFile {
    pub file: String,
    #[serde(default)]
    pub base_offset: usize,
    /// 0 means the end of the file
    #[serde(default)]
    pub end_offset: usize,
}

impl StringFile {
    pub fn new(file: &str, base_offset: usize, end_offset: usize) -> StringFile {
        StringFile {
            file: file.to_string(),
            base_offset,
            end_offset,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTables {
    /// Strings from the game data file
    pub main: Vec<String>,
    /// Strings from the extra string files
    pub extra: Vec<String>,
    /// Words substituted for the `@` placeholder
    pub replace_words: Vec<String>,
}

/// parse_string_table reads packed strings from `start` until `end`
pub fn parse_string_table(
    fb: &mut FileBuffer,
    start: usize,
    end: usize,
) -> Result<Vec<String>, GameError> {
    let mut strings = Vec::new();
    fb.seek(start)?;
    let end = end.min(fb.size());
    while fb.pos() < end {
        strings.push(read_string(fb)?);
    }
    debug!("parsed {} string(s) at {:#06x}", strings.len(), start);
    Ok(strings)
}

/// parse_replace_words reads NUL terminated plain words until an empty one
pub fn parse_replace_words(fb: &mut FileBuffer, start: usize) -> Result<Vec<String>, GameError> {
    let mut words = Vec::new();
    if start >= fb.size() {
        return Ok(words);
    }
    fb.seek(start)?;
    while !fb.eof() {
        let (len, eof) = fb.strlen();
        if len == 0 {
            break;
        }
        let word = String::from_utf8_lossy(fb.read_bytes(len)?).into_owned();
        trace!("replace word {}: {}", words.len(), word);
        words.push(word);
        if eof {
            break;
        }
        fb.skip(1)?;
    }
    Ok(words)
}

impl StringTables {
    /// add_string_file appends the strings of the `index`th extra string file.
    /// Each file's strings begin at index 0x40 times its position, and the
    /// first file's strings begin at 1.
    pub fn add_string_file(
        &mut self,
        index: usize,
        bytes: &[u8],
        file: &StringFile,
    ) -> Result<(), GameError> {
        self.extra.resize(STRING_FILE_SPACING * index, String::new());
        if self.extra.is_empty() {
            self.extra.push(String::new());
        }

        let end = if file.end_offset == 0 {
            bytes.len()
        } else {
            file.end_offset
        };
        let mut fb = FileBuffer::new(bytes);
        let strings = parse_string_table(&mut fb, file.base_offset, end)?;
        debug!(
            "string file {} ({}): {} string(s) from index {:#04x}",
            index,
            file.file,
            strings.len(),
            self.extra.len()
        );
        self.extra.extend(strings);
        Ok(())
    }

    /// lookup resolves a string reference. The high byte selects the table,
    /// the low byte is the index into it.
    pub fn lookup(&self, string: u16) -> String {
        let index = (string & 0xff) as usize;
        let table = (string >> 8) as u8;

        let found = match table {
            0x00 | 0x80 => self.main.get(index),
            0x01 | 0x81 => self.main.get(index + 0x100),
            0x02 | 0x82 => self.extra.get(index),
            0x83 => self.extra.get(index + 0x100),
            _ => None,
        };

        match found {
            Some(s) => s.clone(),
            None => {
                debug!("bad string reference {:04x}", string);
                format!("BAD_STRING({:04x})", string)
            }
        }
    }

    /// replace_placeholders substitutes every `@` with the given replace word
    pub fn replace_placeholders(&self, text: &str, replace_word: u8) -> String {
        if !text.contains(REPLACE_CHAR) {
            return text.to_string();
        }
        let word = match self.replace_words.get(replace_word as usize) {
            Some(w) => w.clone(),
            None => format!("[BAD_REPLACE_WORD({:02x})]", replace_word),
        };
        text.replace(REPLACE_CHAR, &word)
    }
}
