//! Terminal display
//!
//! Text is word wrapped to the terminal width. Pictures are not rendered,
//! only logged, since the picture files are drawn by a separate renderer.

use crate::display_trait::{ComprehendDisplay, DisplayError};
use crossterm::{
    cursor::MoveToColumn,
    execute,
    terminal::{self, Clear, ClearType},
};
use log::debug;
use std::io::{self, Write};

pub struct TerminalDisplay {
    terminal_width: u16,
    terminal_height: u16,
    /// Characters printed on the current output line
    column: usize,
}

impl TerminalDisplay {
    pub fn new() -> Result<Self, DisplayError> {
        let (width, height) = terminal::size().unwrap_or((80, 24));

        Ok(TerminalDisplay {
            terminal_width: width,
            terminal_height: height,
            column: 0,
        })
    }

    /// wrap breaks one line of text at spaces so no row exceeds the width,
    /// given that `column` characters are already on the current row
    pub fn wrap(text: &str, width: usize, column: usize) -> (String, usize) {
        let mut out = String::new();
        let mut col = column;
        for (i, word) in text.split(' ').enumerate() {
            let len = word.chars().count();
            if i > 0 {
                if col + 1 + len > width && col > 0 {
                    out.push('\n');
                    col = 0;
                } else {
                    out.push(' ');
                    col += 1;
                }
            } else if col > 0 && col + len > width {
                out.push('\n');
                col = 0;
            }
            out.push_str(word);
            col += len;
        }
        (out, col)
    }
}

impl ComprehendDisplay for TerminalDisplay {
    fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        let width = self.terminal_width.max(20) as usize;
        let mut out = io::stdout();
        let mut lines = text.split('\n').peekable();
        while let Some(line) = lines.next() {
            let (wrapped, column) = TerminalDisplay::wrap(line, width, self.column);
            self.column = column;
            write!(out, "{}", wrapped.replace('\n', "\r\n"))?;
            if lines.peek().is_some() {
                write!(out, "\r\n")?;
                self.column = 0;
            }
        }
        out.flush()?;
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<(), DisplayError> {
        execute!(
            io::stdout(),
            Clear(ClearType::All),
            crossterm::cursor::MoveTo(0, 0)
        )?;
        self.column = 0;
        Ok(())
    }

    fn clear_line(&mut self) -> Result<(), DisplayError> {
        execute!(io::stdout(), Clear(ClearType::CurrentLine), MoveToColumn(0))?;
        self.column = 0;
        Ok(())
    }

    fn draw_location_picture(&mut self, picture: u16) -> Result<(), DisplayError> {
        debug!("Terminal: location picture {} not rendered", picture);
        Ok(())
    }

    fn draw_item_picture(&mut self, picture: u16) -> Result<(), DisplayError> {
        debug!("Terminal: item picture {} not rendered", picture);
        Ok(())
    }

    fn clear_picture(&mut self, bright: bool) -> Result<(), DisplayError> {
        debug!("Terminal: picture cleared (bright={})", bright);
        Ok(())
    }

    fn get_terminal_size(&self) -> (u16, u16) {
        (self.terminal_width, self.terminal_height)
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        io::stdout().flush()?;
        Ok(())
    }
}
