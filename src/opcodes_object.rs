/// Item and room operations for the Comprehend interpreter
///
/// This module handles the opcodes that work on the game world:
/// - Item location tests (HAVE_OBJECT, OBJECT_PRESENT, OBJECT_IN_ROOM etc.)
/// - Moving items between rooms, the inventory and nowhere
/// - Moving the player, either to a room or along an exit
/// - Changing room and item descriptions, flags and words
///
/// Commands acting on the current object find it from the sentence's noun
/// and fail when the noun names no item.
use crate::error::GameError;
use crate::interpreter::{operand, ExecutionResult, Interpreter, STRING_CANT_GO};
use crate::object::{ITEMF_CAN_TAKE, ITEMF_INVISIBLE, NR_DIRECTIONS, ROOM_INVENTORY, ROOM_NOWHERE};
use crate::opcode_tables::ScriptOpcode;
use crate::runtime_parser::Sentence;
use crate::vm::VAR_INVENTORY_LIMIT;
use crate::vm::VAR_INVENTORY_WEIGHT;
use log::{debug, error};

impl Interpreter {
    /// Handle item and room opcodes
    pub fn execute_object_op(
        &mut self,
        opcode: ScriptOpcode,
        operands: &[u8],
        sentence: &Sentence,
    ) -> Result<ExecutionResult, GameError> {
        let a = operand(operands, 0);
        let b = operand(operands, 1);
        let c = operand(operands, 2);
        match opcode {
            // ---- TESTS ----
            ScriptOpcode::HaveObject => {
                Ok(ExecutionResult::Test(self.vm.item(a)?.room == ROOM_INVENTORY))
            }
            ScriptOpcode::InRoom => Ok(ExecutionResult::Test(self.vm.current_room == a)),
            ScriptOpcode::CurrentIsObject => {
                let current = self.vm.item_by_noun(sentence.noun());
                Ok(ExecutionResult::Test(current == Some(a)))
            }
            ScriptOpcode::ObjectPresent => {
                let here = self.vm.current_room;
                Ok(ExecutionResult::Test(self.vm.item(a)?.room == here))
            }
            ScriptOpcode::ObjectInRoom => Ok(ExecutionResult::Test(self.vm.item(a)?.room == b)),
            ScriptOpcode::ObjectIsNowhere => {
                Ok(ExecutionResult::Test(self.vm.item(a)?.room == ROOM_NOWHERE))
            }
            ScriptOpcode::CurrentObjectValid => Ok(ExecutionResult::Test(
                self.vm.item_by_noun(sentence.noun()).is_some(),
            )),
            ScriptOpcode::InventoryFull => {
                let weight = self.vm.item(a)?.weight();
                let carried = self.vm.read_variable(VAR_INVENTORY_WEIGHT)?;
                let limit = self.vm.read_variable(VAR_INVENTORY_LIMIT)?;
                debug!("inventory {} + {} against limit {}", carried, weight, limit);
                Ok(ExecutionResult::Test(carried as u32 + weight as u32 > limit as u32))
            }
            ScriptOpcode::RoomFlag => {
                Ok(ExecutionResult::Test(self.vm.current_room()?.flags & a != 0))
            }
            ScriptOpcode::ObjectTakeable => Ok(ExecutionResult::Test(self.vm.item(a)?.can_take())),
            ScriptOpcode::TestFalse => Ok(ExecutionResult::Test(false)),

            // ---- ITEM MOVEMENT ----
            ScriptOpcode::TakeObject => {
                self.vm.move_object(a, ROOM_INVENTORY)?;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::TakeCurrentObject => {
                let item = self.current_object(sentence)?;
                self.vm.move_object(item, ROOM_INVENTORY)?;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::DropObject => {
                let here = self.vm.current_room;
                self.vm.move_object(a, here)?;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::DropCurrentObject => {
                let item = self.current_object(sentence)?;
                let here = self.vm.current_room;
                self.vm.move_object(item, here)?;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::RemoveObject => {
                self.vm.move_object(a, ROOM_NOWHERE)?;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::RemoveCurrentObject => {
                let item = self.current_object(sentence)?;
                self.vm.move_object(item, ROOM_NOWHERE)?;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::MoveObjectToRoom => {
                self.vm.move_object(a, b)?;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::MoveObjectToCurrentRoom => {
                let here = self.vm.current_room;
                self.vm.move_object(a, here)?;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::MoveCurrentObjectToRoom => {
                let item = self.current_object(sentence)?;
                self.vm.move_object(item, a)?;
                Ok(ExecutionResult::Continue)
            }

            // ---- PLAYER MOVEMENT ----
            ScriptOpcode::MoveToRoom => {
                // 0xff leaves the player where they are
                if a != ROOM_NOWHERE {
                    self.vm.move_to(a)?;
                }
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::MoveDefault => {
                // The verb's index picks the direction. Verbs that are not
                // directions have nowhere to go.
                let index = sentence.verb().map(|w| w.index).unwrap_or(0);
                if (1..=NR_DIRECTIONS).contains(&(index as usize)) {
                    self.move_in_direction(index)?;
                } else {
                    debug!("verb {} is not a direction", index);
                    self.print_string(STRING_CANT_GO)?;
                }
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::MoveDir => {
                self.move_in_direction(a)?;
                Ok(ExecutionResult::Continue)
            }

            // ---- DESCRIPTIONS AND FLAGS ----
            ScriptOpcode::SetRoomDescription => {
                let desc = match c {
                    0x80 => b as u16,
                    0x81 => b as u16 + 0x100,
                    0x82 => b as u16 + 0x200,
                    _ => {
                        error!("bad room description table {:02x}", c);
                        return Err(GameError::BadStringDesc(b, c));
                    }
                };
                self.vm.room_mut(a)?.string_desc = desc;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::SetObjectDescription => {
                self.vm.item_mut(a)?.string_desc = ((c as u16) << 8) | b as u16;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::SetObjectLongDescription => {
                self.vm.item_mut(a)?.long_string = ((c as u16) << 8) | b as u16;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::SetCanTake => {
                self.vm.item_mut(a)?.flags |= ITEMF_CAN_TAKE;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::ClearCanTake => {
                self.vm.item_mut(a)?.flags &= !ITEMF_CAN_TAKE;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::SetInvisible => {
                self.vm.item_mut(a)?.flags |= ITEMF_INVISIBLE;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::ClearInvisible => {
                self.vm.item_mut(a)?.flags &= !ITEMF_INVISIBLE;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::SetWord => {
                self.vm.item_mut(a)?.word = b;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::ClearWord => {
                self.vm.item_mut(a)?.word = 0;
                Ok(ExecutionResult::Continue)
            }

            _ => Err(GameError::BadFunction(
                0,
                format!("{} is not an object opcode", opcode.name()),
            )),
        }
    }

    /// current_object is the item named by the sentence's noun
    fn current_object(&self, sentence: &Sentence) -> Result<u8, GameError> {
        self.vm
            .item_by_noun(sentence.noun())
            .ok_or(GameError::NoCurrentObject)
    }

    /// move_in_direction follows the current room's exit for a 1-based
    /// direction, or prints the can't go message when there is none
    fn move_in_direction(&mut self, direction: u8) -> Result<(), GameError> {
        let dir = match (direction as usize).checked_sub(1) {
            Some(d) if d < NR_DIRECTIONS => d,
            _ => return Err(GameError::BadDirection(direction)),
        };
        match self.vm.current_room()?.exit(dir) {
            Some(room) => self.vm.move_to(room),
            None => self.print_string(STRING_CANT_GO),
        }
    }

    /// Check if an opcode is an item or room operation
    pub fn is_object_opcode(opcode: ScriptOpcode) -> bool {
        matches!(
            opcode,
            ScriptOpcode::HaveObject
                | ScriptOpcode::InRoom
                | ScriptOpcode::CurrentIsObject
                | ScriptOpcode::ObjectPresent
                | ScriptOpcode::ObjectInRoom
                | ScriptOpcode::ObjectIsNowhere
                | ScriptOpcode::CurrentObjectValid
                | ScriptOpcode::InventoryFull
                | ScriptOpcode::RoomFlag
                | ScriptOpcode::ObjectTakeable
                | ScriptOpcode::TestFalse
                | ScriptOpcode::TakeObject
                | ScriptOpcode::TakeCurrentObject
                | ScriptOpcode::DropObject
                | ScriptOpcode::DropCurrentObject
                | ScriptOpcode::RemoveObject
                | ScriptOpcode::RemoveCurrentObject
                | ScriptOpcode::MoveObjectToRoom
                | ScriptOpcode::MoveObjectToCurrentRoom
                | ScriptOpcode::MoveCurrentObjectToRoom
                | ScriptOpcode::MoveToRoom
                | ScriptOpcode::MoveDefault
                | ScriptOpcode::MoveDir
                | ScriptOpcode::SetRoomDescription
                | ScriptOpcode::SetObjectDescription
                | ScriptOpcode::SetObjectLongDescription
                | ScriptOpcode::SetCanTake
                | ScriptOpcode::ClearCanTake
                | ScriptOpcode::SetInvisible
                | ScriptOpcode::ClearInvisible
                | ScriptOpcode::SetWord
                | ScriptOpcode::ClearWord
        )
    }
}
