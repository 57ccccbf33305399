use crate::config::{GameConfig, SpecialAction, SpecialRule};
use crate::error::GameError;
use crate::header::FormatVersion;
use crate::instruction::Instruction;
use crate::interpreter::{GameStatus, MAX_CALL_DEPTH};
use crate::object::Room;
use crate::runtime_parser::Sentence;
use crate::test_utils::{sample_game, GameImageBuilder, TestSession};
use test_log::test;

// Version 1 opcodes
const CALL_FUNC: u8 = 0x92;
const SPECIAL: u8 = 0x9d;
const TEST_FLAG: u8 = 0x19;
const SET_FLAG: u8 = 0x95;
const VAR_INC: u8 = 0xb1;

fn op(opcode: u8, operands: &[u8]) -> Instruction {
    Instruction::new(opcode, operands)
}

fn call(session: &mut TestSession, index: u16) -> Result<(), GameError> {
    session
        .interp
        .eval_function(index as usize, &Sentence::default())
}

#[test]
fn test_call_shares_game_state() {
    let mut builder = sample_game();
    let inner = builder.add_function(&[op(VAR_INC, &[5]), op(SET_FLAG, &[7])]);
    let outer = builder.add_function(&[op(CALL_FUNC, &[inner as u8, 0x80]), op(VAR_INC, &[5])]);
    let mut session = TestSession::from_builder(&builder, &[]).unwrap();

    call(&mut session, outer).unwrap();
    assert_eq!(session.interp.vm.read_variable(5).unwrap(), 2);
    assert!(session.interp.vm.test_flag(7).unwrap());
}

#[test]
fn test_callee_has_its_own_test_state() {
    let mut builder = sample_game();
    let inner = builder.add_function(&[op(TEST_FLAG, &[3]), op(SET_FLAG, &[8])]);
    let outer = builder.add_function(&[op(CALL_FUNC, &[inner as u8, 0x80]), op(SET_FLAG, &[9])]);
    let mut session = TestSession::from_builder(&builder, &[]).unwrap();

    call(&mut session, outer).unwrap();
    assert!(!session.interp.vm.test_flag(8).unwrap());
    assert!(session.interp.vm.test_flag(9).unwrap());
}

#[test]
fn test_runaway_recursion_is_fatal() {
    let mut builder = sample_game();
    let index = builder.functions.len() as u8;
    let recursive = builder.add_function(&[op(VAR_INC, &[6]), op(CALL_FUNC, &[index, 0x80])]);
    let mut session = TestSession::from_builder(&builder, &[]).unwrap();

    let err = call(&mut session, recursive).unwrap_err();
    assert_eq!(err, GameError::CallDepthExceeded(MAX_CALL_DEPTH));
    assert_eq!(
        session.interp.vm.read_variable(6).unwrap(),
        MAX_CALL_DEPTH as u16
    );

    // The depth count unwinds with the error
    let inner = builder.add_function(&[op(SET_FLAG, &[9])]);
    let mut session = TestSession::from_builder(&builder, &[]).unwrap();
    assert!(call(&mut session, recursive).is_err());
    call(&mut session, inner).unwrap();
    assert!(session.interp.vm.test_flag(9).unwrap());
}

#[test]
fn test_call_to_missing_function() {
    let mut builder = sample_game();
    let low = builder.add_function(&[op(CALL_FUNC, &[0x40, 0x80])]);
    let high = builder.add_function(&[op(CALL_FUNC, &[0x02, 0x81])]);
    let count = builder.functions.len();
    let mut session = TestSession::from_builder(&builder, &[]).unwrap();

    assert_eq!(
        call(&mut session, low),
        Err(GameError::BadFunctionIndex(0x40, count))
    );
    assert_eq!(
        call(&mut session, high),
        Err(GameError::BadFunctionIndex(0x102, count))
    );
}

#[test]
fn test_v2_call_func2_takes_bank_from_low_bit() {
    // CALL_FUNC2 and SET_FLAG in the version 2 map
    const CALL_FUNC2: u8 = 0x96;
    const V2_SET_FLAG: u8 = 0x95;

    let mut builder = GameImageBuilder::new(FormatVersion::V2);
    builder.add_string("Nothing happens.");
    builder.add_room(Room::default());
    builder.add_function(&[op(0x98, &[])]);
    let inner = builder.add_function(&[op(V2_SET_FLAG, &[12])]);
    let outer = builder.add_function(&[op(CALL_FUNC2, &[inner as u8, 0x80])]);
    let far = builder.add_function(&[op(CALL_FUNC2, &[inner as u8, 0x01])]);
    let count = builder.functions.len();
    let mut session = TestSession::from_builder(&builder, &[]).unwrap();

    call(&mut session, outer).unwrap();
    assert!(session.interp.vm.test_flag(12).unwrap());
    assert_eq!(
        call(&mut session, far),
        Err(GameError::BadFunctionIndex(0x100 | inner as usize, count))
    );
}

#[test]
fn test_special_hook_ends_game_and_function() {
    let mut builder = sample_game();
    let inner = builder.add_function(&[op(SET_FLAG, &[11])]);
    let index = builder.add_function(&[
        op(SPECIAL, &[0x0a]),
        op(SPECIAL, &[0x03]),
        op(SET_FLAG, &[9]),
    ]);
    let config = GameConfig {
        special: vec![
            SpecialRule {
                operand: 0x03,
                action: SpecialAction::GameOver,
            },
            SpecialRule {
                operand: 0x0a,
                action: SpecialAction::CallFunction { function: inner },
            },
        ],
        ..GameConfig::default()
    };
    let mut session = TestSession::new(builder.load().unwrap(), config, &[]).unwrap();

    call(&mut session, index).unwrap();
    assert!(session.interp.vm.test_flag(11).unwrap());
    assert_eq!(session.interp.status, GameStatus::GameOver);
    assert!(!session.interp.vm.test_flag(9).unwrap());
}

#[test]
fn test_unconfigured_special_is_ignored() {
    let mut builder = sample_game();
    let index = builder.add_function(&[op(SPECIAL, &[0x42]), op(SET_FLAG, &[9])]);
    let mut session = TestSession::from_builder(&builder, &[]).unwrap();

    call(&mut session, index).unwrap();
    assert_eq!(session.interp.status, GameStatus::Running);
    assert!(session.interp.vm.test_flag(9).unwrap());
}
