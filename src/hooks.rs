//! Per-title extension points
//!
//! Titles differ in what their SPECIAL opcodes do, in rooms that are drawn
//! differently and in things that happen every turn. The defaults here are
//! driven by the loaded [`GameConfig`](crate::config::GameConfig); a title
//! needing more can swap in its own functions.

use log::{debug, info, warn};

use crate::config::SpecialAction;
use crate::error::GameError;
use crate::interpreter::{GameStatus, Interpreter};
use crate::object::{RoomType, ROOM_NOWHERE};
use crate::runtime_parser::Sentence;
use crate::vm::VAR_TURN_COUNT;

pub type SpecialOpcodeHook = fn(&mut Interpreter, u8) -> Result<(), GameError>;
pub type TurnHook = fn(&mut Interpreter) -> Result<(), GameError>;
/// Decides how a room is shown. May replace the description string.
pub type RoomTypeHook = fn(&Interpreter, u8, &mut u16) -> RoomType;

#[derive(Clone, Copy)]
pub struct GameHooks {
    pub on_special_opcode: SpecialOpcodeHook,
    pub on_before_turn: TurnHook,
    pub on_after_turn: TurnHook,
    pub room_is_special: RoomTypeHook,
}

impl Default for GameHooks {
    fn default() -> Self {
        GameHooks {
            on_special_opcode: default_special_opcode,
            on_before_turn: default_before_turn,
            on_after_turn: default_after_turn,
            room_is_special: default_room_is_special,
        }
    }
}

impl std::fmt::Debug for GameHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GameHooks")
    }
}

/// default_special_opcode applies the configured rule for an operand
pub fn default_special_opcode(interp: &mut Interpreter, operand: u8) -> Result<(), GameError> {
    let action = match interp.config.special_action(operand) {
        Some(a) => a.clone(),
        None => {
            warn!("unhandled special opcode {:#04x}", operand);
            return Ok(());
        }
    };
    debug!("special {:#04x}: {:?}", operand, action);

    match action {
        SpecialAction::GameOver => {
            info!("game over");
            interp.status = GameStatus::GameOver;
        }
        SpecialAction::Won => {
            info!("game won");
            interp.status = GameStatus::Won;
        }
        SpecialAction::Restart => interp.restart()?,
        SpecialAction::Save => interp.print_line("Saving games is not supported.")?,
        SpecialAction::Restore => interp.print_line("Restoring games is not supported.")?,
        SpecialAction::CallFunction { function } => {
            interp.eval_function(function as usize, &Sentence::default())?
        }
        SpecialAction::Print { string } => {
            let text = interp.string_lookup(string);
            interp.print_line(&text)?;
        }
        SpecialAction::Ignore => {}
    }
    Ok(())
}

/// default_before_turn moves the configured monsters
pub fn default_before_turn(interp: &mut Interpreter) -> Result<(), GameError> {
    let monsters = interp.config.monster.clone();
    for monster in &monsters {
        let vm = &interp.vm;
        let room_flags = vm.current_room()?.flags;
        if room_flags & monster.room_flag == 0 {
            continue;
        }
        let here = vm.current_room;
        if vm.item(monster.object)?.room == here {
            continue;
        }
        let turns = vm.read_variable(VAR_TURN_COUNT)?;
        if vm.test_flag(monster.dead_flag)? || turns <= monster.min_turns {
            continue;
        }

        if interp.rng.one_in(monster.randomness) {
            debug!("monster {} follows into room {}", monster.object, here);
            interp.vm.move_object(monster.object, here)?;
        } else {
            interp.vm.move_object(monster.object, ROOM_NOWHERE)?;
        }
    }
    Ok(())
}

pub fn default_after_turn(_interp: &mut Interpreter) -> Result<(), GameError> {
    Ok(())
}

/// default_room_is_special applies the configured dark and bright rooms
pub fn default_room_is_special(interp: &Interpreter, room: u8, desc: &mut u16) -> RoomType {
    let config = &interp.config;
    if config.dark_rooms.contains(&room) {
        let lit = match config.light_flag {
            Some(flag) => match interp.vm.test_flag(flag) {
                Ok(lit) => lit,
                Err(e) => {
                    warn!("light flag: {}", e);
                    false
                }
            },
            None => false,
        };
        if !lit {
            if let Some(s) = config.dark_room_string {
                *desc = s;
            }
            return RoomType::Dark;
        }
    }
    if config.bright_rooms.contains(&room) {
        if let Some(s) = config.bright_room_string {
            *desc = s;
        }
        return RoomType::Bright;
    }
    RoomType::Normal
}
