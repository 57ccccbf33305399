use log::debug;
use std::fmt;

use crate::dictionary::Word;
use crate::error::GameError;
use crate::game::GameData;
use crate::instruction::Function;
use crate::object::{Item, Room, ROOM_INVENTORY, ROOM_NOWHERE};

pub const NR_FLAGS: usize = 64;
pub const NR_VARIABLES: usize = 128;

pub const VAR_INVENTORY_WEIGHT: u8 = 0;
pub const VAR_INVENTORY_LIMIT: u8 = 1;
pub const VAR_TURN_COUNT: u8 = 2;

pub const UPDATE_GRAPHICS: u8 = 0x01;
pub const UPDATE_GRAPHICS_ITEMS: u8 = 0x02;
pub const UPDATE_ROOM_DESC: u8 = 0x04;
pub const UPDATE_ITEM_LIST: u8 = 0x08;
pub const UPDATE_ALL: u8 = UPDATE_GRAPHICS | UPDATE_GRAPHICS_ITEMS | UPDATE_ROOM_DESC | UPDATE_ITEM_LIST;

/// The game state: loaded tables plus everything play mutates
pub struct VM {
    /// The game being played. Rooms and items are mutated in place.
    pub game: GameData,
    /// Rooms and items as loaded, for restarting
    initial_rooms: Vec<Room>,
    initial_items: Vec<Item>,
    pub start_room: u8,
    pub current_room: u8,
    pub flags: [bool; NR_FLAGS],
    pub variables: [u16; NR_VARIABLES],
    /// Index into the replace words used for `@`
    pub current_replace_word: u8,
    pub update_flags: u8,
}

impl VM {
    /// Create a new VM instance with the given game
    pub fn new(game: GameData, start_room: u8) -> Result<Self, GameError> {
        let mut vm = VM {
            initial_rooms: game.rooms.clone(),
            initial_items: game.items.clone(),
            game,
            start_room,
            current_room: start_room,
            flags: [false; NR_FLAGS],
            variables: [0; NR_VARIABLES],
            current_replace_word: 0,
            update_flags: UPDATE_ALL,
        };
        vm.reset()?;
        Ok(vm)
    }

    /// Reset the VM to its state at load time
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.game.rooms = self.initial_rooms.clone();
        self.game.items = self.initial_items.clone();
        self.flags = [false; NR_FLAGS];
        self.variables = [0; NR_VARIABLES];
        self.current_replace_word = 0;
        self.update_flags = UPDATE_ALL;

        if !self.is_valid_room(self.start_room) {
            return Err(GameError::BadRoom(self.start_room as u16));
        }
        self.current_room = self.start_room;

        // Items that start out carried count towards the weight
        let weight: u16 = self
            .game
            .items
            .iter()
            .filter(|i| i.room == ROOM_INVENTORY)
            .map(Item::weight)
            .sum();
        self.variables[VAR_INVENTORY_WEIGHT as usize] = weight;
        debug!("reset: start room {}, carried weight {}", self.start_room, weight);
        Ok(())
    }

    pub fn is_valid_room(&self, room: u8) -> bool {
        (room as usize) < self.game.rooms.len()
    }

    pub fn room(&self, room: u8) -> Result<&Room, GameError> {
        self.game
            .rooms
            .get(room as usize)
            .ok_or(GameError::BadRoom(room as u16))
    }

    pub fn room_mut(&mut self, room: u8) -> Result<&mut Room, GameError> {
        self.game
            .rooms
            .get_mut(room as usize)
            .ok_or(GameError::BadRoom(room as u16))
    }

    pub fn current_room(&self) -> Result<&Room, GameError> {
        self.room(self.current_room)
    }

    /// item looks up an item by its 1-based id
    pub fn item(&self, item: u8) -> Result<&Item, GameError> {
        (item as usize)
            .checked_sub(1)
            .and_then(|i| self.game.items.get(i))
            .ok_or(GameError::BadItem(item as u16))
    }

    pub fn item_mut(&mut self, item: u8) -> Result<&mut Item, GameError> {
        (item as usize)
            .checked_sub(1)
            .and_then(|i| self.game.items.get_mut(i))
            .ok_or(GameError::BadItem(item as u16))
    }

    /// items_in_room lists the ids of the items in a room, in id order
    pub fn items_in_room(&self, room: u8) -> Vec<u8> {
        self.game
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.room == room)
            .map(|(i, _)| (i + 1) as u8)
            .collect()
    }

    pub fn read_variable(&self, var: u8) -> Result<u16, GameError> {
        self.variables
            .get(var as usize)
            .copied()
            .ok_or(GameError::BadVariable(var))
    }

    pub fn write_variable(&mut self, var: u8, value: u16) -> Result<(), GameError> {
        let slot = self
            .variables
            .get_mut(var as usize)
            .ok_or(GameError::BadVariable(var))?;
        *slot = value;
        Ok(())
    }

    pub fn test_flag(&self, flag: u8) -> Result<bool, GameError> {
        self.flags
            .get(flag as usize)
            .copied()
            .ok_or(GameError::BadFlag(flag))
    }

    pub fn set_flag(&mut self, flag: u8, value: bool) -> Result<(), GameError> {
        let slot = self
            .flags
            .get_mut(flag as usize)
            .ok_or(GameError::BadFlag(flag))?;
        *slot = value;
        Ok(())
    }

    /// function returns a copy of a function so it can run while the
    /// game state is mutated
    pub fn function(&self, index: usize) -> Result<Function, GameError> {
        self.game
            .functions
            .get(index)
            .cloned()
            .ok_or(GameError::BadFunctionIndex(index, self.game.functions.len()))
    }

    /// item_by_noun finds the first item a noun refers to
    pub fn item_by_noun(&self, noun: Option<&Word>) -> Option<u8> {
        let noun = noun?;
        if !noun.is_noun() || noun.index == 0 {
            return None;
        }
        self.game
            .items
            .iter()
            .position(|item| item.word == noun.index)
            .map(|i| (i + 1) as u8)
    }

    /// move_object places an item in a room, keeping the carried weight
    /// and the pending screen updates in step
    pub fn move_object(&mut self, item: u8, new_room: u8) -> Result<(), GameError> {
        let (old_room, weight) = {
            let it = self.item(item)?;
            (it.room, it.weight())
        };
        if old_room == new_room {
            return Ok(());
        }
        if new_room != ROOM_NOWHERE && !self.is_valid_room(new_room) {
            return Err(GameError::BadRoom(new_room as u16));
        }

        let carried = VAR_INVENTORY_WEIGHT as usize;
        if old_room == ROOM_INVENTORY {
            self.variables[carried] = self.variables[carried].wrapping_sub(weight);
        }
        if new_room == ROOM_INVENTORY {
            self.variables[carried] = self.variables[carried].wrapping_add(weight);
        }

        if old_room == self.current_room {
            self.update_flags |= UPDATE_GRAPHICS;
        } else if new_room == self.current_room {
            self.update_flags |= UPDATE_GRAPHICS_ITEMS | UPDATE_ITEM_LIST;
        }

        debug!("move item {} from {:#04x} to {:#04x}", item, old_room, new_room);
        self.item_mut(item)?.room = new_room;
        Ok(())
    }

    /// move_to moves the player
    pub fn move_to(&mut self, room: u8) -> Result<(), GameError> {
        if !self.is_valid_room(room) {
            return Err(GameError::BadRoom(room as u16));
        }
        debug!("move to room {}", room);
        self.current_room = room;
        self.update_flags |= UPDATE_GRAPHICS | UPDATE_ROOM_DESC | UPDATE_ITEM_LIST;
        Ok(())
    }
}

impl fmt::Display for VM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Current room: {}", self.current_room)?;
        writeln!(f, "Replace word: {}", self.current_replace_word)?;
        let set: Vec<String> = self
            .flags
            .iter()
            .enumerate()
            .filter(|(_, f)| **f)
            .map(|(i, _)| format!("{:02x}", i))
            .collect();
        writeln!(f, "Flags set: {}", set.join(" "))?;
        for (i, v) in self.variables.iter().enumerate().filter(|(_, v)| **v != 0) {
            writeln!(f, "  var[{:02x}] = {:#06x}", i, v)?;
        }
        Ok(())
    }
}
