//! Headless display implementation for testing and piped sessions
//!
//! Text is collected line by line. Picture requests are recorded
//! separately so the text transcript stays exactly what the game printed.

use std::cell::RefCell;
use std::rc::Rc;

use crate::display_trait::{ComprehendDisplay, DisplayError};
use log::debug;

/// A picture request seen by the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureEvent {
    Location(u16),
    Item(u16),
    Cleared { bright: bool },
}

#[derive(Debug, Default)]
pub struct HeadlessState {
    buffer: Vec<String>,
    current_line: String,
    pictures: Vec<PictureEvent>,
}

impl HeadlessState {
    /// Get the completed lines
    pub fn get_buffer(&self) -> &[String] {
        &self.buffer
    }

    /// Get all output as a single string
    pub fn get_output(&self) -> String {
        let mut output = self.buffer.join("\n");
        if !self.current_line.is_empty() {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(&self.current_line);
        }
        output
    }

    pub fn pictures(&self) -> &[PictureEvent] {
        &self.pictures
    }

    /// Forget everything captured so far
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.current_line.clear();
        self.pictures.clear();
    }

    fn flush_line(&mut self) {
        self.buffer.push(std::mem::take(&mut self.current_line));
    }
}

/// HeadlessDisplay captures output. Clones share the same capture, so a
/// test can keep one handle while the interpreter owns another.
#[derive(Debug, Clone, Default)]
pub struct HeadlessDisplay {
    state: Rc<RefCell<HeadlessState>>,
    terminal_width: u16,
    terminal_height: u16,
}

impl HeadlessDisplay {
    pub fn new() -> Result<Self, DisplayError> {
        Ok(Self {
            state: Rc::new(RefCell::new(HeadlessState::default())),
            terminal_width: 80,
            terminal_height: 24,
        })
    }

    /// Get all output as a single string
    pub fn get_output(&self) -> String {
        self.state.borrow().get_output()
    }

    /// Get the completed lines
    pub fn get_lines(&self) -> Vec<String> {
        self.state.borrow().get_buffer().to_vec()
    }

    pub fn pictures(&self) -> Vec<PictureEvent> {
        self.state.borrow().pictures().to_vec()
    }

    pub fn clear(&self) {
        self.state.borrow_mut().clear();
    }
}

impl ComprehendDisplay for HeadlessDisplay {
    fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        let mut state = self.state.borrow_mut();
        let mut lines = text.split('\n').peekable();
        while let Some(line) = lines.next() {
            state.current_line.push_str(line);
            if lines.peek().is_some() {
                state.flush_line();
            }
        }
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<(), DisplayError> {
        debug!("Headless: clear_screen");
        let mut state = self.state.borrow_mut();
        state.buffer.clear();
        state.current_line.clear();
        Ok(())
    }

    fn clear_line(&mut self) -> Result<(), DisplayError> {
        self.state.borrow_mut().current_line.clear();
        Ok(())
    }

    fn draw_location_picture(&mut self, picture: u16) -> Result<(), DisplayError> {
        debug!("Headless: location picture {}", picture);
        self.state
            .borrow_mut()
            .pictures
            .push(PictureEvent::Location(picture));
        Ok(())
    }

    fn draw_item_picture(&mut self, picture: u16) -> Result<(), DisplayError> {
        debug!("Headless: item picture {}", picture);
        self.state
            .borrow_mut()
            .pictures
            .push(PictureEvent::Item(picture));
        Ok(())
    }

    fn clear_picture(&mut self, bright: bool) -> Result<(), DisplayError> {
        self.state
            .borrow_mut()
            .pictures
            .push(PictureEvent::Cleared { bright });
        Ok(())
    }

    fn get_terminal_size(&self) -> (u16, u16) {
        (self.terminal_width, self.terminal_height)
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_capture() {
        let handle = HeadlessDisplay::new().unwrap();
        let mut display = handle.clone();
        display.print_line("You see:").unwrap();
        display.print("a lamp").unwrap();
        display.draw_location_picture(3).unwrap();
        assert_eq!(handle.get_lines(), vec!["You see:"]);
        assert_eq!(handle.get_output(), "You see:\na lamp");
        assert_eq!(handle.pictures(), vec![PictureEvent::Location(3)]);
    }

    #[test]
    fn blank_lines_are_kept() {
        let handle = HeadlessDisplay::new().unwrap();
        let mut display = handle.clone();
        display.print("one\n\ntwo\n").unwrap();
        assert_eq!(handle.get_lines(), vec!["one", "", "two"]);
    }
}
