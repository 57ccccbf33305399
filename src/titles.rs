//! Built-in profiles for the known Comprehend titles

use crate::config::{GameConfig, MonsterRule, SpecialAction, SpecialRule};
use crate::strings::StringFile;

fn special(operand: u8, action: SpecialAction) -> SpecialRule {
    SpecialRule { operand, action }
}

/// Special operands shared by every title
fn common_specials() -> Vec<SpecialRule> {
    vec![
        special(0x03, SpecialAction::GameOver),
        special(0x05, SpecialAction::Won),
        special(0x06, SpecialAction::Save),
        special(0x07, SpecialAction::Restore),
        special(0x08, SpecialAction::Restart),
    ]
}

pub fn transylvania() -> GameConfig {
    let mut special = common_specials();
    // Cutscenes with no text of their own
    special.push(self::special(0x01, SpecialAction::Ignore));
    special.push(self::special(0x02, SpecialAction::Ignore));
    special.push(self::special(0x09, SpecialAction::Ignore));

    GameConfig {
        title: "Transylvania".to_string(),
        data_file: "TR.GDA".to_string(),
        string_files: vec![
            StringFile::new("MA.MS1", 0x88, 0),
            StringFile::new("MB.MS1", 0x88, 0),
            StringFile::new("MC.MS1", 0x88, 0),
            StringFile::new("MD.MS1", 0x88, 0),
            StringFile::new("ME.MS1", 0x88, 0),
        ],
        special,
        monster: vec![
            // Werewolf roams the forest
            MonsterRule {
                object: 0x01,
                dead_flag: 7,
                room_flag: 0x40,
                min_turns: 10,
                randomness: 190,
            },
            // Vampire haunts the castle
            MonsterRule {
                object: 0x26,
                dead_flag: 5,
                room_flag: 0x80,
                min_turns: 0,
                randomness: 200,
            },
        ],
        ..GameConfig::default()
    }
}

pub fn crimson_crown() -> GameConfig {
    GameConfig {
        title: "The Crimson Crown".to_string(),
        data_file: "CC1.GDA".to_string(),
        string_files: vec![
            StringFile::new("MA.MS1", 0x89, 0),
            StringFile::new("MB.MS1", 0x89, 0),
        ],
        special: common_specials(),
        ..GameConfig::default()
    }
}

pub fn oo_topos() -> GameConfig {
    GameConfig {
        title: "OO-Topos".to_string(),
        data_file: "G0".to_string(),
        string_files: vec![
            StringFile::new("NOVEL.TXT", 0x0, 0),
        ],
        dark_rooms: vec![0x19],
        light_flag: Some(0x2c),
        bright_rooms: vec![0x2e],
        special: common_specials(),
        ..GameConfig::default()
    }
}

pub fn talisman() -> GameConfig {
    GameConfig {
        title: "Talisman".to_string(),
        data_file: "G0".to_string(),
        string_files: vec![
            StringFile::new("MA.MS1", 0x10, 0),
        ],
        special: common_specials(),
        ..GameConfig::default()
    }
}

/// by_name finds a built-in profile by a short or full title name
pub fn by_name(name: &str) -> Option<GameConfig> {
    let key: String = name
        .to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    match key.as_str() {
        "transylvania" | "tr" => Some(transylvania()),
        "crimsoncrown" | "thecrimsoncrown" | "cc" => Some(crimson_crown()),
        "ootopos" | "oo" => Some(oo_topos()),
        "talisman" => Some(talisman()),
        _ => None,
    }
}

pub fn all() -> Vec<GameConfig> {
    vec![transylvania(), crimson_crown(), oo_topos(), talisman()]
}
