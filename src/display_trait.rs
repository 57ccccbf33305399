//! Core display trait for Comprehend presentation layers
//!
//! The interpreter only prints text and asks for pictures to be drawn or
//! blanked. How that is rendered is up to the implementation.

use std::fmt;

/// Core trait for Comprehend display operations
pub trait ComprehendDisplay {
    /// Print text, which may contain newlines
    fn print(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Print text followed by a newline
    fn print_line(&mut self, text: &str) -> Result<(), DisplayError> {
        self.print(text)?;
        self.print("\n")
    }

    /// Clear the entire screen
    fn clear_screen(&mut self) -> Result<(), DisplayError>;

    /// Erase the current line of text
    fn clear_line(&mut self) -> Result<(), DisplayError>;

    /// Draw a location picture over the picture area
    fn draw_location_picture(&mut self, picture: u16) -> Result<(), DisplayError>;

    /// Draw an item picture on top of the current location picture
    fn draw_item_picture(&mut self, picture: u16) -> Result<(), DisplayError>;

    /// Blank the picture area, black for dark rooms and white for bright ones
    fn clear_picture(&mut self, bright: bool) -> Result<(), DisplayError>;

    /// Get the current terminal dimensions
    fn get_terminal_size(&self) -> (u16, u16);

    /// Make sure everything printed so far is visible
    fn flush(&mut self) -> Result<(), DisplayError>;
}

/// Display error type
#[derive(Debug, Clone)]
pub struct DisplayError {
    pub message: String,
}

impl DisplayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Display error: {}", self.message)
    }
}

impl std::error::Error for DisplayError {}

impl From<std::io::Error> for DisplayError {
    fn from(error: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", error))
    }
}
