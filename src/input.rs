//! Player input: blocking line reads and single key presses

use std::collections::VecDeque;
use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use log::debug;

use crate::error::GameError;

pub trait InputSource {
    /// Read one line without its line terminator. End of input is
    /// reported as `GameError::EndOfInput`.
    fn read_line(&mut self) -> Result<String, GameError>;

    /// Wait for a single key press
    fn read_key(&mut self) -> Result<char, GameError>;
}

pub struct StdinInput {
    /// Input buffer for building lines
    buffer: String,
    interactive: bool,
}

impl StdinInput {
    pub fn new() -> Self {
        StdinInput {
            buffer: String::new(),
            interactive: atty::is(atty::Stream::Stdin),
        }
    }

    fn key_to_char(key: KeyEvent) -> Result<Option<char>, GameError> {
        match key.code {
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) && c == 'c' {
                    return Err(GameError::EndOfInput);
                }
                Ok(Some(c))
            }
            KeyCode::Enter => Ok(Some('\n')),
            KeyCode::Esc => Ok(Some('\x1b')),
            _ => Ok(None),
        }
    }

    fn read_key_raw(&mut self) -> Result<char, GameError> {
        terminal::enable_raw_mode()?;
        let result = loop {
            match event::read() {
                Ok(Event::Key(key)) => match StdinInput::key_to_char(key) {
                    Ok(Some(c)) => break Ok(c),
                    Ok(None) => continue,
                    Err(e) => break Err(e),
                },
                Ok(_) => continue,
                Err(e) => break Err(GameError::from(e)),
            }
        };
        let _ = terminal::disable_raw_mode();
        result
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for StdinInput {
    fn read_line(&mut self) -> Result<String, GameError> {
        self.buffer.clear();
        let bytes_read = io::stdin().read_line(&mut self.buffer)?;

        // EOF ends the session
        if bytes_read == 0 {
            debug!("input: EOF on stdin");
            return Err(GameError::EndOfInput);
        }

        while self.buffer.ends_with('\n') || self.buffer.ends_with('\r') {
            self.buffer.pop();
        }
        debug!("input received: '{}'", self.buffer);
        Ok(self.buffer.clone())
    }

    fn read_key(&mut self) -> Result<char, GameError> {
        if self.interactive {
            return self.read_key_raw();
        }
        // Piped input has no key presses, a line stands in for one
        let line = self.read_line()?;
        Ok(line.chars().next().unwrap_or('\n'))
    }
}

/// ScriptedInput replays queued lines, then reports end of input
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    pub keys_read: usize,
}

impl ScriptedInput {
    pub fn new<S: AsRef<str>>(lines: &[S]) -> Self {
        ScriptedInput {
            lines: lines.iter().map(|l| l.as_ref().to_string()).collect(),
            keys_read: 0,
        }
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self) -> Result<String, GameError> {
        self.lines.pop_front().ok_or(GameError::EndOfInput)
    }

    fn read_key(&mut self) -> Result<char, GameError> {
        self.keys_read += 1;
        Ok('\n')
    }
}
