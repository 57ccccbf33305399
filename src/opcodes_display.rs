/// Text and picture operations for the Comprehend interpreter
///
/// This module handles the opcodes that produce output:
/// - Printing strings, including random messages and item descriptions
/// - Inventory listings
/// - Choosing the replace word substituted for `@`
/// - Pictures and the few screen controls the games use
use crate::dictionary::{WORD_TYPE_FEMALE, WORD_TYPE_MALE, WORD_TYPE_NOUN_PLURAL};
use crate::error::GameError;
use crate::interpreter::{
    operand, ExecutionResult, Interpreter, STRING_INVENTORY, STRING_INVENTORY_EMPTY,
    STRING_YOU_SEE,
};
use crate::object::ROOM_INVENTORY;
use crate::opcode_tables::ScriptOpcode;
use crate::runtime_parser::Sentence;
use crate::vm::UPDATE_GRAPHICS;
use log::debug;

impl Interpreter {
    /// Handle text and picture opcodes
    pub fn execute_display_op(
        &mut self,
        opcode: ScriptOpcode,
        operands: &[u8],
        sentence: &Sentence,
    ) -> Result<ExecutionResult, GameError> {
        let a = operand(operands, 0);
        let b = operand(operands, 1);
        let c = operand(operands, 2);
        match opcode {
            // ---- TEXT ----
            ScriptOpcode::Print => {
                self.print_string(((b as u16) << 8) | a as u16)?;
            }
            ScriptOpcode::RandomMsg => {
                let base = ((c as u16) << 8) | b as u16;
                let pick = self.rng.gen_below(a as u32) as u16;
                debug!("random message {:#06x} + {}", base, pick);
                self.print_string(base.wrapping_add(pick))?;
            }
            ScriptOpcode::DescribeCurrentObject => {
                // The operand does not change what is printed
                let item = self
                    .vm
                    .item_by_noun(sentence.noun())
                    .ok_or(GameError::NoCurrentObject)?;
                let item = self.vm.item(item)?;
                let desc = if item.long_string != 0 {
                    item.long_string
                } else {
                    item.string_desc
                };
                self.print_string(desc)?;
            }
            ScriptOpcode::Inventory => {
                self.list_room(ROOM_INVENTORY, STRING_INVENTORY, STRING_INVENTORY_EMPTY)?;
            }
            ScriptOpcode::InventoryRoom => {
                self.list_room(a, b as u16, b as u16 + 1)?;
            }
            ScriptOpcode::SetStringReplacement => {
                self.vm.current_replace_word = a.wrapping_sub(1);
            }
            ScriptOpcode::SetCurrentNounStringReplacement => {
                let kind = sentence.noun().map(|w| w.kind).unwrap_or(0);
                self.vm.current_replace_word = if kind & WORD_TYPE_NOUN_PLURAL != 0 {
                    3
                } else if kind & WORD_TYPE_FEMALE != 0 {
                    0
                } else if kind & WORD_TYPE_MALE != 0 {
                    1
                } else {
                    2
                };
            }

            // ---- SCREEN ----
            ScriptOpcode::ClearLine => self.display.clear_line()?,
            ScriptOpcode::WaitKey => {
                self.display.flush()?;
                let key = self.input.read_key()?;
                debug!("wait key: {:?}", key);
            }

            // ---- PICTURES ----
            ScriptOpcode::DrawRoom => {
                self.display
                    .draw_location_picture((a as u16).saturating_sub(1))?;
            }
            ScriptOpcode::DrawObject => {
                self.display.draw_item_picture((a as u16).saturating_sub(1))?;
            }
            ScriptOpcode::SetRoomGraphic => {
                self.vm.room_mut(a)?.graphic = b;
                if a == self.vm.current_room {
                    self.vm.update_flags |= UPDATE_GRAPHICS;
                }
            }
            ScriptOpcode::SetObjectGraphic => {
                self.vm.item_mut(a)?.graphic = b;
                if self.vm.item(a)?.room == self.vm.current_room {
                    self.vm.update_flags |= UPDATE_GRAPHICS;
                }
            }

            _ => {
                return Err(GameError::BadFunction(
                    0,
                    format!("{} is not a display opcode", opcode.name()),
                ))
            }
        }
        Ok(ExecutionResult::Continue)
    }

    /// list_room prints a heading and the descriptions of the visible items
    /// in a room, or the empty message when there are none
    fn list_room(&mut self, room: u8, heading: u16, empty: u16) -> Result<(), GameError> {
        let descs = self.visible_item_descriptions(room);
        if descs.is_empty() {
            return self.print_string(empty);
        }
        self.print_string(heading)?;
        for desc in descs {
            self.print_string(desc)?;
        }
        Ok(())
    }

    fn visible_item_descriptions(&self, room: u8) -> Vec<u16> {
        self.vm
            .game
            .items
            .iter()
            .filter(|item| item.room == room && item.string_desc != 0)
            .filter(|item| self.is_item_visible(item.flags))
            .map(|item| item.string_desc)
            .collect()
    }

    /// describe_objects_in_current_room prints the "you see" list
    pub fn describe_objects_in_current_room(&mut self) -> Result<(), GameError> {
        let descs = self.visible_item_descriptions(self.vm.current_room);
        if descs.is_empty() {
            return Ok(());
        }
        self.print_string(STRING_YOU_SEE)?;
        for desc in descs {
            self.print_string(desc)?;
        }
        Ok(())
    }

    /// Check if an opcode is a text or picture operation
    pub fn is_display_opcode(opcode: ScriptOpcode) -> bool {
        matches!(
            opcode,
            ScriptOpcode::Print
                | ScriptOpcode::RandomMsg
                | ScriptOpcode::DescribeCurrentObject
                | ScriptOpcode::Inventory
                | ScriptOpcode::InventoryRoom
                | ScriptOpcode::SetStringReplacement
                | ScriptOpcode::SetCurrentNounStringReplacement
                | ScriptOpcode::ClearLine
                | ScriptOpcode::WaitKey
                | ScriptOpcode::DrawRoom
                | ScriptOpcode::DrawObject
                | ScriptOpcode::SetRoomGraphic
                | ScriptOpcode::SetObjectGraphic
        )
    }
}
