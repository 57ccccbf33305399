//! Whole-game tests through the public API
//!
//! These build small data files, load them the way the interpreter does
//! and play scripted turns against a headless display:
//! - movement through exits chosen by the verb
//! - sentences that match no action
//! - word pairs, the saved verb and multi-sentence lines
//! - loading from a directory with a configuration file
//! - rejecting malformed data files

use std::fs;

use comprehend::action::{Action, ActionType};
use comprehend::config::GameConfig;
use comprehend::dictionary::WORD_TYPE_VERB;
use comprehend::error::GameError;
use comprehend::game::{load_game, GameData};
use comprehend::header::FormatVersion;
use comprehend::instruction::Instruction;
use comprehend::interpreter::GameStatus;
use comprehend::object::{Item, Room, ROOM_INVENTORY};
use comprehend::test_utils::*;
use comprehend::vm::{UPDATE_GRAPHICS, UPDATE_ROOM_DESC};
use test_log::test;

fn op(opcode: u8, operands: &[u8]) -> Instruction {
    Instruction::new(opcode, operands)
}

/// Five rooms where the verb "north" (word 3) leads from room 1 to room 5
fn north_game() -> GameImageBuilder {
    let mut b = GameImageBuilder::new(FormatVersion::V1);
    b.add_string("You can't go that way.");
    b.add_string("I don't understand.");
    let first = b.add_string("A field.");
    for _ in 0..5 {
        b.add_room(Room {
            string_desc: first,
            ..Room::default()
        });
    }
    b.rooms[0].exits[2] = 5;
    b.add_word("north", 3, WORD_TYPE_VERB);
    b.add_function(&[op(0x94, &[])]);
    let go = b.add_function(&[op(0x8c, &[])]);
    b.add_action(Action::new(ActionType::VerbOptNoun, &[3], go));
    b
}

#[test]
fn test_verb_moves_through_matching_exit() {
    let mut s = TestSession::from_builder(&north_game(), &[]).unwrap();
    s.interp.vm.update_flags = 0;

    s.interp.handle_line("north").unwrap();
    assert_eq!(s.interp.vm.current_room, 5);
    let flags = s.interp.vm.update_flags;
    assert_eq!(flags & UPDATE_GRAPHICS, UPDATE_GRAPHICS);
    assert_eq!(flags & UPDATE_ROOM_DESC, UPDATE_ROOM_DESC);
    assert!(s.take_lines().is_empty());

    // No way north from room 5
    s.interp.handle_line("NORTH").unwrap();
    assert_eq!(s.interp.vm.current_room, 5);
    assert_eq!(s.take_lines(), vec!["You can't go that way."]);
}

#[test]
fn test_unknown_sentence_changes_nothing() {
    let mut s = TestSession::from_builder(&sample_game(), &[]).unwrap();
    let flags_before = s.interp.vm.flags;
    let vars_before = s.interp.vm.variables;

    s.interp.handle_line("xyzzy").unwrap();
    assert_eq!(s.take_lines(), vec!["I don't understand."]);
    assert_eq!(s.interp.vm.current_room, ROOM_HALL);
    assert_eq!(s.interp.vm.flags, flags_before);
    assert_eq!(s.interp.vm.variables, vars_before);
}

#[test]
fn test_take_and_drop() {
    let mut s = TestSession::from_builder(&sample_game(), &[]).unwrap();

    s.interp.handle_line("pick up lamp").unwrap();
    assert_eq!(s.take_lines(), vec!["Taken."]);
    assert_eq!(s.interp.vm.item(ITEM_LAMP).unwrap().room, ROOM_INVENTORY);
    assert_eq!(s.interp.vm.read_variable(0).unwrap(), 2);

    s.interp.handle_line("take lamp").unwrap();
    assert_eq!(s.take_lines(), vec!["You already have it."]);

    // The coin is in the cellar
    s.interp.handle_line("take coin").unwrap();
    assert!(s.take_lines().is_empty());
    assert_eq!(s.interp.vm.item(ITEM_COIN).unwrap().room, ROOM_CELLAR);

    s.interp.handle_line("north, drop lamp").unwrap();
    assert_eq!(s.take_lines(), vec!["Dropped."]);
    assert_eq!(s.interp.vm.item(ITEM_LAMP).unwrap().room, ROOM_CELLAR);
    assert_eq!(s.interp.vm.read_variable(0).unwrap(), 0);
}

#[test]
fn test_line_stops_at_first_unknown_sentence() {
    let mut s = TestSession::from_builder(&sample_game(), &[]).unwrap();
    s.interp.handle_line("dance, north").unwrap();
    assert_eq!(s.take_lines(), vec!["I don't understand."]);
    assert_eq!(s.interp.vm.current_room, ROOM_HALL);
}

#[test]
fn test_empty_sentences_are_skipped() {
    let mut s = TestSession::from_builder(&sample_game(), &[]).unwrap();
    s.interp.handle_line("  , PICK UP lamp ,, north  ,").unwrap();
    assert_eq!(s.take_lines(), vec!["Taken."]);
    assert_eq!(s.interp.vm.current_room, ROOM_CELLAR);
    assert_eq!(s.interp.vm.item(ITEM_LAMP).unwrap().room, ROOM_INVENTORY);
}

#[test]
fn test_saved_verb_completes_next_sentence() {
    let mut b = sample_game();
    let what = b.add_string("What?");
    // SAVE_ACTION then ask for the noun
    let ask = b.add_function(&[op(0x84, &[]), op(0x8e, &[what as u8, 0x80])]);
    b.add_action(Action::new(ActionType::VerbOptNoun, &[WORD_TAKE], ask));
    let mut s = TestSession::from_builder(&b, &[]).unwrap();

    s.interp.handle_line("take").unwrap();
    assert_eq!(s.take_lines(), vec!["What?"]);
    assert_eq!(s.interp.saved_action().map(|w| w.index), Some(WORD_TAKE));

    s.interp.handle_line("lamp").unwrap();
    assert_eq!(s.take_lines(), vec!["Taken."]);
    assert!(s.interp.saved_action().is_none());
    assert_eq!(s.interp.vm.item(ITEM_LAMP).unwrap().room, ROOM_INVENTORY);

    // A sentence starting with a verb ignores the saved one
    s.interp.handle_line("take").unwrap();
    s.interp.handle_line("inv").unwrap();
    assert_eq!(s.take_lines(), vec!["What?", "You are carrying:", "a brass lamp"]);
}

#[test]
fn test_scripted_game_runs_until_input_ends() {
    let mut s =
        TestSession::from_builder(&sample_game(), &["take lamp", "north", "inv"]).unwrap();
    let status = s.interp.run().unwrap();
    assert_eq!(status, GameStatus::Quit);
    assert_eq!(s.interp.vm.current_room, ROOM_CELLAR);
    assert_eq!(s.interp.vm.read_variable(2).unwrap(), 3);

    let output = s.display.get_output();
    let expected = [
        "A dusty hall.",
        "You see:",
        "a brass lamp",
        "> ",
        "Taken.",
        "A damp cellar.",
        "a gold coin",
        "You are carrying:",
    ];
    let mut at = 0;
    for text in expected {
        let found = output[at..]
            .find(text)
            .unwrap_or_else(|| panic!("{:?} missing after {} in {:?}", text, at, output));
        at += found + text.len();
    }
}

#[test]
fn test_restart_restores_initial_state() {
    let mut s = TestSession::from_builder(&sample_game(), &[]).unwrap();
    s.interp.handle_line("take lamp, north").unwrap();
    s.interp.vm.set_flag(4, true).unwrap();

    s.interp.restart().unwrap();
    assert_eq!(s.interp.vm.current_room, ROOM_HALL);
    assert_eq!(s.interp.vm.item(ITEM_LAMP).unwrap().room, ROOM_HALL);
    assert!(!s.interp.vm.test_flag(4).unwrap());
    assert_eq!(s.interp.vm.read_variable(0).unwrap(), 0);
}

#[test]
fn test_unknown_magic_is_rejected() {
    let mut bytes = sample_game().build().unwrap();
    bytes[0] = 0x34;
    bytes[1] = 0x12;
    assert_eq!(
        GameData::from_memory(&bytes).err(),
        Some(GameError::UnknownMagic(0x1234))
    );
}

#[test]
fn test_tables_beyond_byte_ids_are_rejected() {
    let mut b = sample_game();
    b.items.resize(255, Item::default());
    assert_eq!(b.load().unwrap().items.len(), 255);

    b.items.push(Item::default());
    assert_eq!(
        b.load().err(),
        Some(GameError::TooManyEntries("items", 256))
    );

    let mut b = sample_game();
    b.rooms.resize(256, Room::default());
    assert_eq!(
        b.load().err(),
        Some(GameError::TooManyEntries("rooms", 256))
    );
}

#[test]
fn test_truncated_function_is_rejected() {
    let mut b = sample_game();
    // PRINT wants two operands
    let bad = b.add_raw_function(&[0x8e, 0x01]);
    match b.load() {
        Err(GameError::BadFunction(index, _)) => assert_eq!(index, bad as usize),
        other => panic!("expected a bad function, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_load_game_from_directory() {
    let dir = std::env::temp_dir().join(format!("comprehend-load-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("hall.gda"), sample_game().build().unwrap()).unwrap();

    let config = GameConfig::from_toml_str(
        r#"
title = "Hall"
data_file = "hall.gda"
start_room = 2
"#,
    )
    .unwrap();
    let game = load_game(&dir, &config).unwrap();
    assert_eq!(game.rooms.len(), 3);

    let mut s = TestSession::new(game, config, &[]).unwrap();
    assert_eq!(s.interp.vm.current_room, ROOM_CELLAR);
    s.interp.update().unwrap();
    assert_eq!(
        s.take_lines(),
        vec!["A damp cellar.", "You see:", "a gold coin"]
    );

    let missing = GameConfig {
        data_file: "missing.gda".to_string(),
        ..GameConfig::default()
    };
    assert!(matches!(
        load_game(&dir, &missing),
        Err(GameError::IOError(_))
    ));

    let bad_light = GameConfig {
        data_file: "hall.gda".to_string(),
        light_flag: Some(70),
        ..GameConfig::default()
    };
    assert!(matches!(
        load_game(&dir, &bad_light),
        Err(GameError::Config(_))
    ));
    fs::remove_dir_all(&dir).unwrap();
}
