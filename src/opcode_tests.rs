use crate::config::{GameConfig, MonsterRule};
use crate::display_headless::PictureEvent;
use crate::error::GameError;
use crate::header::FormatVersion;
use crate::instruction::Instruction;
use crate::object::{Room, ROOM_INVENTORY, ROOM_NOWHERE};
use crate::runtime_parser::{parse_line, Sentence};
use crate::test_utils::*;
use crate::vm::{
    UPDATE_GRAPHICS, UPDATE_ITEM_LIST, UPDATE_ROOM_DESC, VAR_INVENTORY_LIMIT,
    VAR_INVENTORY_WEIGHT, VAR_TURN_COUNT,
};
use test_log::test;

// Version 1 opcodes
const HAVE_OBJECT_CURRENT: u8 = 0x20;
const HAVE_OBJECT_NOT_CURRENT: u8 = 0x60;
const INVENTORY_FULL: u8 = 0x1d;
const SET_FLAG: u8 = 0x95;
const MOVE_TO_ROOM: u8 = 0x85;
const SET_ROOM_DESCRIPTION: u8 = 0x87;
const PRINT: u8 = 0x8e;
const TAKE_CURRENT_OBJECT: u8 = 0x98;
const MOVE_DIR: u8 = 0xa1;
const DESCRIBE_CURRENT_OBJECT: u8 = 0xa5;
const SET_STRING_REPLACEMENT: u8 = 0xad;
const INVENTORY: u8 = 0x80;
const INVENTORY_ROOM: u8 = 0x96;
const VAR_ADD: u8 = 0x86;
const VAR_SUB: u8 = 0x8a;
const VAR_DEC: u8 = 0xb5;
const VAR_EQ2: u8 = 0x06;
const VAR_GT1: u8 = 0x15;
const DRAW_ROOM: u8 = 0xbd;
const DRAW_OBJECT: u8 = 0xc1;

fn op(opcode: u8, operands: &[u8]) -> Instruction {
    Instruction::new(opcode, operands)
}

fn session_with(code: &[Instruction]) -> (TestSession, usize) {
    let mut builder = sample_game();
    let index = builder.add_function(code);
    let session = TestSession::from_builder(&builder, &[]).unwrap();
    session.display.clear();
    (session, index as usize)
}

fn sentence(session: &TestSession, line: &str) -> Sentence {
    parse_line(&session.interp.vm.game.dictionary, line)
        .into_iter()
        .next()
        .unwrap_or_default()
}

fn run(session: &mut TestSession, index: usize, line: &str) -> Result<(), GameError> {
    let s = sentence(session, line);
    session.interp.eval_function(index, &s)
}

#[test]
fn test_weight_follows_items_in_and_out_of_inventory() {
    let (mut s, _) = session_with(&[]);
    let vm = &mut s.interp.vm;
    assert_eq!(vm.read_variable(VAR_INVENTORY_WEIGHT).unwrap(), 0);

    vm.move_object(ITEM_LAMP, ROOM_INVENTORY).unwrap();
    assert_eq!(vm.read_variable(VAR_INVENTORY_WEIGHT).unwrap(), 2);
    vm.move_object(ITEM_LAMP, ROOM_INVENTORY).unwrap();
    assert_eq!(vm.read_variable(VAR_INVENTORY_WEIGHT).unwrap(), 2);
    vm.move_object(ITEM_COIN, ROOM_INVENTORY).unwrap();
    assert_eq!(vm.read_variable(VAR_INVENTORY_WEIGHT).unwrap(), 3);

    vm.move_object(ITEM_LAMP, ROOM_NOWHERE).unwrap();
    assert_eq!(vm.read_variable(VAR_INVENTORY_WEIGHT).unwrap(), 1);
    vm.move_object(ITEM_COIN, ROOM_CELLAR).unwrap();
    assert_eq!(vm.read_variable(VAR_INVENTORY_WEIGHT).unwrap(), 0);

    assert_eq!(vm.move_object(ITEM_COIN, 9), Err(GameError::BadRoom(9)));
    assert_eq!(vm.move_object(7, ROOM_HALL), Err(GameError::BadItem(7)));
}

#[test]
fn test_carried_items_count_at_start() {
    let mut builder = sample_game();
    builder.items[ITEM_LAMP as usize - 1].room = ROOM_INVENTORY;
    let s = TestSession::from_builder(&builder, &[]).unwrap();
    assert_eq!(s.interp.vm.read_variable(VAR_INVENTORY_WEIGHT).unwrap(), 2);
}

#[test]
fn test_moving_items_sets_update_flags() {
    let (mut s, _) = session_with(&[]);
    let vm = &mut s.interp.vm;
    vm.update_flags = 0;
    vm.move_object(ITEM_COIN, ROOM_HALL).unwrap();
    assert_ne!(vm.update_flags & UPDATE_ITEM_LIST, 0);

    vm.update_flags = 0;
    vm.move_object(ITEM_LAMP, ROOM_INVENTORY).unwrap();
    assert_ne!(vm.update_flags & UPDATE_GRAPHICS, 0);

    vm.update_flags = 0;
    vm.move_to(ROOM_CELLAR).unwrap();
    assert_eq!(
        vm.update_flags,
        UPDATE_GRAPHICS | UPDATE_ROOM_DESC | UPDATE_ITEM_LIST
    );
}

#[test]
fn test_inventory_full_compares_against_limit() {
    let (mut s, f) = session_with(&[op(INVENTORY_FULL, &[ITEM_LAMP]), op(SET_FLAG, &[10])]);
    s.interp.vm.write_variable(VAR_INVENTORY_LIMIT, 2).unwrap();
    run(&mut s, f, "").unwrap();
    assert!(!s.interp.vm.test_flag(10).unwrap());

    s.interp.vm.move_object(ITEM_COIN, ROOM_INVENTORY).unwrap();
    run(&mut s, f, "").unwrap();
    assert!(s.interp.vm.test_flag(10).unwrap());
}

#[test]
fn test_variable_arithmetic_wraps() {
    let (mut s, f) = session_with(&[
        op(VAR_DEC, &[5]),
        op(VAR_ADD, &[6, 5]),
        op(VAR_SUB, &[7, 6]),
    ]);
    s.interp.vm.write_variable(6, 1).unwrap();
    run(&mut s, f, "").unwrap();
    assert_eq!(s.interp.vm.read_variable(5).unwrap(), 0xffff);
    assert_eq!(s.interp.vm.read_variable(6).unwrap(), 0);
    assert_eq!(s.interp.vm.read_variable(7).unwrap(), 0);
}

#[test]
fn test_variable_comparisons() {
    let (mut s, f) = session_with(&[op(VAR_EQ2, &[5, 6]), op(SET_FLAG, &[10])]);
    s.interp.vm.write_variable(5, 4).unwrap();
    s.interp.vm.write_variable(6, 4).unwrap();
    run(&mut s, f, "").unwrap();
    assert!(s.interp.vm.test_flag(10).unwrap());

    // VAR_GT1 compares variable 0, the carried weight
    let (mut s, f) = session_with(&[op(VAR_GT1, &[5]), op(SET_FLAG, &[10])]);
    s.interp.vm.write_variable(5, 1).unwrap();
    run(&mut s, f, "").unwrap();
    assert!(!s.interp.vm.test_flag(10).unwrap());
    s.interp.vm.move_object(ITEM_LAMP, ROOM_INVENTORY).unwrap();
    run(&mut s, f, "").unwrap();
    assert!(s.interp.vm.test_flag(10).unwrap());
}

#[test]
fn test_turn_tick_runs_after_turn() {
    let mut s = TestSession::from_builder(&sample_game(), &["inv", "inv"]).unwrap();
    let status = s.interp.run().unwrap();
    assert_eq!(status, crate::interpreter::GameStatus::Quit);
    assert_eq!(s.interp.vm.read_variable(VAR_TURN_COUNT).unwrap(), 2);
}

#[test]
fn test_unknown_opcodes() {
    // 0x02 is not a version 1 test, 0x83 is not a command
    let (mut s, f) = session_with(&[op(0x02, &[1, 1]), op(SET_FLAG, &[10])]);
    run(&mut s, f, "").unwrap();
    assert!(!s.interp.vm.test_flag(10).unwrap());

    let (mut s, f) = session_with(&[op(0x83, &[1, 2, 3]), op(SET_FLAG, &[10])]);
    run(&mut s, f, "").unwrap();
    assert!(s.interp.vm.test_flag(10).unwrap());
}

#[test]
fn test_set_room_description_validates_table() {
    for (table, desc) in [(0x80, 0x06), (0x81, 0x106), (0x82, 0x206)] {
        let (mut s, f) = session_with(&[op(SET_ROOM_DESCRIPTION, &[ROOM_HALL, 0x06, table])]);
        run(&mut s, f, "").unwrap();
        assert_eq!(s.interp.vm.room(ROOM_HALL).unwrap().string_desc, desc);
    }

    let (mut s, f) = session_with(&[op(SET_ROOM_DESCRIPTION, &[ROOM_HALL, 0x06, 0x90])]);
    assert_eq!(run(&mut s, f, ""), Err(GameError::BadStringDesc(0x06, 0x90)));
    assert_eq!(
        s.interp.vm.room(ROOM_HALL).unwrap().string_desc,
        STRING_HALL
    );
}

#[test]
fn test_move_dir_follows_exits() {
    let (mut s, f) = session_with(&[op(MOVE_DIR, &[1])]);
    run(&mut s, f, "").unwrap();
    assert_eq!(s.interp.vm.current_room, ROOM_CELLAR);

    // No exit south of the hall
    let (mut s, f) = session_with(&[op(MOVE_DIR, &[2])]);
    run(&mut s, f, "").unwrap();
    assert_eq!(s.interp.vm.current_room, ROOM_HALL);
    assert_eq!(s.take_lines(), vec!["You can't go that way."]);

    let (mut s, f) = session_with(&[op(MOVE_DIR, &[9])]);
    assert_eq!(run(&mut s, f, ""), Err(GameError::BadDirection(9)));
}

#[test]
fn test_move_to_room() {
    let (mut s, f) = session_with(&[op(MOVE_TO_ROOM, &[ROOM_NOWHERE])]);
    run(&mut s, f, "").unwrap();
    assert_eq!(s.interp.vm.current_room, ROOM_HALL);

    let (mut s, f) = session_with(&[op(MOVE_TO_ROOM, &[ROOM_CELLAR])]);
    run(&mut s, f, "").unwrap();
    assert_eq!(s.interp.vm.current_room, ROOM_CELLAR);

    let (mut s, f) = session_with(&[op(MOVE_TO_ROOM, &[9])]);
    assert_eq!(run(&mut s, f, ""), Err(GameError::BadRoom(9)));
}

#[test]
fn test_current_object_tests_and_commands() {
    let (mut s, f) = session_with(&[op(HAVE_OBJECT_CURRENT, &[]), op(SET_FLAG, &[10])]);
    run(&mut s, f, "take coin").unwrap();
    assert!(!s.interp.vm.test_flag(10).unwrap());
    s.interp.vm.move_object(ITEM_COIN, ROOM_INVENTORY).unwrap();
    run(&mut s, f, "take coin").unwrap();
    assert!(s.interp.vm.test_flag(10).unwrap());

    // No noun: false before negation
    let (mut s, f) = session_with(&[op(HAVE_OBJECT_CURRENT, &[]), op(SET_FLAG, &[10])]);
    run(&mut s, f, "inv").unwrap();
    assert!(!s.interp.vm.test_flag(10).unwrap());
    let (mut s, f) = session_with(&[op(HAVE_OBJECT_NOT_CURRENT, &[]), op(SET_FLAG, &[10])]);
    run(&mut s, f, "inv").unwrap();
    assert!(s.interp.vm.test_flag(10).unwrap());

    let (mut s, f) = session_with(&[op(TAKE_CURRENT_OBJECT, &[])]);
    assert_eq!(run(&mut s, f, "inv"), Err(GameError::NoCurrentObject));
    run(&mut s, f, "take coin").unwrap();
    assert_eq!(s.interp.vm.item(ITEM_COIN).unwrap().room, ROOM_INVENTORY);
}

#[test]
fn test_string_replacement() {
    let (mut s, f) = session_with(&[
        op(SET_STRING_REPLACEMENT, &[2]),
        op(PRINT, &[STRING_ALREADY_HAVE as u8, 0x80]),
    ]);
    run(&mut s, f, "").unwrap();
    assert_eq!(s.take_lines(), vec!["You already have him."]);

    let (mut s, f) = session_with(&[
        op(SET_STRING_REPLACEMENT, &[9]),
        op(PRINT, &[STRING_ALREADY_HAVE as u8, 0x80]),
    ]);
    run(&mut s, f, "").unwrap();
    assert_eq!(
        s.take_lines(),
        vec!["You already have [BAD_REPLACE_WORD(08)]."]
    );
}

#[test]
fn test_print_unknown_string() {
    let (mut s, f) = session_with(&[op(PRINT, &[0x40, 0x80])]);
    run(&mut s, f, "").unwrap();
    assert_eq!(s.take_lines(), vec!["BAD_STRING(8040)"]);
}

#[test]
fn test_describe_current_object() {
    let (mut s, f) = session_with(&[op(DESCRIBE_CURRENT_OBJECT, &[1])]);
    run(&mut s, f, "take lamp").unwrap();
    assert_eq!(s.take_lines(), vec!["a brass lamp"]);
}

#[test]
fn test_inventory_listing() {
    let (mut s, f) = session_with(&[op(INVENTORY, &[])]);
    run(&mut s, f, "").unwrap();
    assert_eq!(s.take_lines(), vec!["You are empty handed."]);

    s.interp.vm.move_object(ITEM_LAMP, ROOM_INVENTORY).unwrap();
    run(&mut s, f, "").unwrap();
    assert_eq!(s.take_lines(), vec!["You are carrying:", "a brass lamp"]);
}

#[test]
fn test_inventory_room_listing() {
    let (mut s, f) = session_with(&[op(INVENTORY_ROOM, &[ROOM_CELLAR, 2])]);
    run(&mut s, f, "").unwrap();
    assert_eq!(s.take_lines(), vec!["You see:", "a gold coin"]);

    s.interp.vm.move_object(ITEM_COIN, ROOM_NOWHERE).unwrap();
    run(&mut s, f, "").unwrap();
    assert_eq!(s.take_lines(), vec!["You are carrying:"]);
}

#[test]
fn test_draw_opcodes_use_zero_based_pictures() {
    let (mut s, f) = session_with(&[op(DRAW_ROOM, &[3]), op(DRAW_OBJECT, &[1])]);
    run(&mut s, f, "").unwrap();
    assert_eq!(
        s.display.pictures(),
        vec![PictureEvent::Location(2), PictureEvent::Item(0)]
    );
}

#[test]
fn test_v2_random_message_and_invisible_items() {
    // RANDOM_MSG, SET_INVISIBLE and INVENTORY in the version 2 map
    const RANDOM_MSG: u8 = 0x8f;
    const SET_INVISIBLE: u8 = 0xcd;
    const V2_INVENTORY: u8 = 0x80;

    let mut builder = GameImageBuilder::new(FormatVersion::V2);
    for text in ["Ouch.", "Yikes.", "Eek.", "You have:", "Nothing."] {
        builder.add_string(text);
    }
    builder.add_room(Room::default());
    builder.add_item(crate::object::Item {
        string_desc: 1,
        room: ROOM_INVENTORY,
        ..Default::default()
    });
    builder.add_function(&[op(0x98, &[])]);
    let random = builder.add_function(&[op(RANDOM_MSG, &[2, 1, 0x80])]) as usize;
    let hide = builder.add_function(&[op(SET_INVISIBLE, &[1]), op(V2_INVENTORY, &[])]) as usize;
    let mut s = TestSession::from_builder(&builder, &[]).unwrap();

    for _ in 0..8 {
        run(&mut s, random, "").unwrap();
        let lines = s.take_lines();
        assert!(lines == ["Yikes."] || lines == ["Eek."], "{:?}", lines);
    }

    run(&mut s, hide, "").unwrap();
    assert_eq!(s.take_lines(), vec!["Nothing."]);
}

#[test]
fn test_update_describes_room_once() {
    let (mut s, _) = session_with(&[]);
    s.interp.update().unwrap();
    assert_eq!(
        s.take_lines(),
        vec!["A dusty hall.", "You see:", "a brass lamp"]
    );
    // The lamp has no picture
    assert_eq!(s.display.pictures(), vec![PictureEvent::Location(0)]);
    assert_eq!(s.interp.vm.update_flags, 0);

    s.interp.update().unwrap();
    assert!(s.take_lines().is_empty());

    s.interp.vm.move_to(ROOM_CELLAR).unwrap();
    s.interp.update().unwrap();
    assert_eq!(
        s.display.pictures(),
        vec![PictureEvent::Location(1), PictureEvent::Item(2)]
    );
    assert_eq!(s.take_lines(), vec!["A damp cellar.", "You see:", "a gold coin"]);
}

#[test]
fn test_dark_rooms_hide_description_until_lit() {
    let config = GameConfig {
        dark_rooms: vec![ROOM_HALL],
        light_flag: Some(5),
        dark_room_string: Some(1),
        ..GameConfig::default()
    };
    let mut s = TestSession::new(sample_game().load().unwrap(), config, &[]).unwrap();
    s.interp.update().unwrap();
    assert_eq!(
        s.display.pictures(),
        vec![PictureEvent::Cleared { bright: false }]
    );
    assert_eq!(s.take_lines(), vec!["I don't understand."]);

    s.interp.vm.set_flag(5, true).unwrap();
    s.interp.vm.update_flags = UPDATE_GRAPHICS | UPDATE_ROOM_DESC;
    s.interp.update().unwrap();
    assert_eq!(s.take_lines(), vec!["A dusty hall."]);
}

fn monster_session(turns: u16, dead: bool) -> TestSession {
    let mut builder = sample_game();
    builder.rooms[ROOM_HALL as usize - 1].flags = 0x10;
    let config = GameConfig {
        monster: vec![MonsterRule {
            object: ITEM_COIN,
            dead_flag: 20,
            room_flag: 0x10,
            min_turns: 2,
            randomness: 1,
        }],
        ..GameConfig::default()
    };
    let mut s = TestSession::new(builder.load().unwrap(), config, &[]).unwrap();
    s.interp.vm.write_variable(VAR_TURN_COUNT, turns).unwrap();
    s.interp.vm.set_flag(20, dead).unwrap();
    s
}

#[test]
fn test_monster_follows_into_flagged_rooms() {
    let mut s = monster_session(3, false);
    let hook = s.interp.hooks.on_before_turn;
    hook(&mut s.interp).unwrap();
    assert_eq!(s.interp.vm.item(ITEM_COIN).unwrap().room, ROOM_HALL);

    // Not yet time
    let mut s = monster_session(2, false);
    hook(&mut s.interp).unwrap();
    assert_eq!(s.interp.vm.item(ITEM_COIN).unwrap().room, ROOM_CELLAR);

    let mut s = monster_session(3, true);
    hook(&mut s.interp).unwrap();
    assert_eq!(s.interp.vm.item(ITEM_COIN).unwrap().room, ROOM_CELLAR);

    // The cellar lacks the room flag
    let mut s = monster_session(3, false);
    s.interp.vm.move_to(ROOM_CELLAR).unwrap();
    s.interp.vm.move_object(ITEM_COIN, ROOM_HALL).unwrap();
    hook(&mut s.interp).unwrap();
    assert_eq!(s.interp.vm.item(ITEM_COIN).unwrap().room, ROOM_HALL);
}
