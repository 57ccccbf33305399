//! Display manager that creates the appropriate display implementation
//!
//! Interactive sessions get the terminal display, anything else (pipes,
//! CI, tests) gets the headless one.

use crate::display_headless::HeadlessDisplay;
use crate::display_terminal::TerminalDisplay;
use crate::display_trait::{ComprehendDisplay, DisplayError};

use log::debug;

/// Display mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Terminal when stdout is a terminal, headless otherwise
    #[default]
    Auto,
    /// Force terminal-based display
    Terminal,
    /// Capture output without a terminal
    Headless,
}

impl DisplayMode {
    /// from_env reads COMPREHEND_DISPLAY, defaulting to Auto
    pub fn from_env() -> DisplayMode {
        match std::env::var("COMPREHEND_DISPLAY").as_deref() {
            Ok("terminal") => DisplayMode::Terminal,
            Ok("headless") => DisplayMode::Headless,
            _ => DisplayMode::Auto,
        }
    }
}

/// Display environment capabilities
#[derive(Debug)]
pub struct DisplayCapabilities {
    pub has_terminal: bool,
    pub is_interactive: bool,
}

impl DisplayCapabilities {
    /// Detect current environment capabilities
    pub fn detect() -> Self {
        Self {
            has_terminal: atty::is(atty::Stream::Stdout),
            is_interactive: atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stdout),
        }
    }
}

/// Create a display implementation for the given mode
pub fn create_display(mode: DisplayMode) -> Result<Box<dyn ComprehendDisplay>, DisplayError> {
    let caps = DisplayCapabilities::detect();
    debug!("Display capabilities: {:?}, mode {:?}", caps, mode);

    let display: Box<dyn ComprehendDisplay> = match mode {
        DisplayMode::Auto if caps.has_terminal => Box::new(TerminalDisplay::new()?),
        DisplayMode::Auto => {
            debug!("stdout is not a terminal, using plain output");
            Box::new(PlainDisplay)
        }
        DisplayMode::Terminal => Box::new(TerminalDisplay::new()?),
        DisplayMode::Headless => Box::new(HeadlessDisplay::new()?),
    };

    Ok(display)
}

/// PlainDisplay writes unwrapped text to stdout, for piped sessions
struct PlainDisplay;

impl ComprehendDisplay for PlainDisplay {
    fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        use std::io::Write;
        let mut out = std::io::stdout();
        write!(out, "{}", text)?;
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn clear_line(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn draw_location_picture(&mut self, _picture: u16) -> Result<(), DisplayError> {
        Ok(())
    }

    fn draw_item_picture(&mut self, _picture: u16) -> Result<(), DisplayError> {
        Ok(())
    }

    fn clear_picture(&mut self, _bright: bool) -> Result<(), DisplayError> {
        Ok(())
    }

    fn get_terminal_size(&self) -> (u16, u16) {
        (80, 24)
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        use std::io::Write;
        std::io::stdout().flush()?;
        Ok(())
    }
}
