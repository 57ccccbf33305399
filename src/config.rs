//! Per-title game configuration, loaded from TOML

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::GameError;
use crate::strings::StringFile;
use crate::vm::NR_FLAGS;

/// What a SPECIAL opcode operand does
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpecialAction {
    GameOver,
    Won,
    Restart,
    Save,
    Restore,
    CallFunction { function: u16 },
    Print { string: u16 },
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpecialRule {
    pub operand: u8,
    pub action: SpecialAction,
}

/// A monster that may follow the player into flagged rooms
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MonsterRule {
    /// Item id of the monster
    pub object: u8,
    /// Once this flag is set the monster no longer moves
    pub dead_flag: u8,
    /// The monster only appears in rooms with one of these flags
    pub room_flag: u8,
    /// Turns that must pass before the monster first appears
    #[serde(default)]
    pub min_turns: u16,
    /// The monster appears with probability 1 in `randomness`
    pub randomness: u32,
}

fn default_start_room() -> u8 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    pub title: String,
    pub data_file: String,
    #[serde(default)]
    pub string_files: Vec<StringFile>,
    #[serde(default = "default_start_room")]
    pub start_room: u8,
    /// Rooms with no picture or description unless `light_flag` is set
    #[serde(default)]
    pub dark_rooms: Vec<u8>,
    #[serde(default)]
    pub light_flag: Option<u8>,
    /// String printed in place of a dark room's description
    #[serde(default)]
    pub dark_room_string: Option<u16>,
    /// Rooms too bright to see anything in
    #[serde(default)]
    pub bright_rooms: Vec<u8>,
    #[serde(default)]
    pub bright_room_string: Option<u16>,
    #[serde(default)]
    pub special: Vec<SpecialRule>,
    #[serde(default)]
    pub monster: Vec<MonsterRule>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            title: "Comprehend".to_string(),
            data_file: "game.gda".to_string(),
            string_files: Vec::new(),
            start_room: default_start_room(),
            dark_rooms: Vec::new(),
            light_flag: None,
            dark_room_string: None,
            bright_rooms: Vec::new(),
            bright_room_string: None,
            special: Vec::new(),
            monster: Vec::new(),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<GameConfig, GameError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// validate rejects flag numbers the VM does not have
    pub fn validate(&self) -> Result<(), GameError> {
        if let Some(flag) = self.light_flag {
            if flag as usize >= NR_FLAGS {
                return Err(GameError::Config(format!("light_flag {} out of range", flag)));
            }
        }
        for monster in &self.monster {
            if monster.dead_flag as usize >= NR_FLAGS {
                return Err(GameError::Config(format!(
                    "dead_flag {} of monster {} out of range",
                    monster.dead_flag, monster.object
                )));
            }
        }
        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<GameConfig, GameError> {
        let text = fs::read_to_string(path)
            .map_err(|e| GameError::Config(format!("{}: {}", path.display(), e)))?;
        GameConfig::from_toml_str(&text)
    }

    /// special_action finds the rule for a SPECIAL opcode operand
    pub fn special_action(&self, operand: u8) -> Option<&SpecialAction> {
        self.special
            .iter()
            .find(|r| r.operand == operand)
            .map(|r| &r.action)
    }
}
