use std::fmt::{Display, Error, Formatter};

/// Room id used for the player's inventory
pub const ROOM_INVENTORY: u8 = 0x00;
/// Room id of items that are not anywhere in the game world
pub const ROOM_NOWHERE: u8 = 0xff;

pub const DIRECTION_NORTH: usize = 0;
pub const DIRECTION_SOUTH: usize = 1;
pub const DIRECTION_EAST: usize = 2;
pub const DIRECTION_WEST: usize = 3;
pub const DIRECTION_UP: usize = 4;
pub const DIRECTION_DOWN: usize = 5;
pub const DIRECTION_IN: usize = 6;
pub const DIRECTION_OUT: usize = 7;
pub const NR_DIRECTIONS: usize = 8;

pub const DIRECTION_NAMES: [&str; NR_DIRECTIONS] =
    ["north", "south", "east", "west", "up", "down", "in", "out"];

pub const ITEMF_WEIGHT_MASK: u8 = 0x03;
pub const ITEMF_CAN_TAKE: u8 = 0x08;
/// Only meaningful for version 2 data files
pub const ITEMF_INVISIBLE: u8 = 0x40;

/// How the current room is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomType {
    Normal,
    Dark,
    Bright,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Room {
    pub exits: [u8; NR_DIRECTIONS],
    pub flags: u8,
    pub graphic: u8,
    pub string_desc: u16,
}

impl Room {
    /// exit returns the destination in a direction, if there is one
    pub fn exit(&self, direction: usize) -> Option<u8> {
        match self.exits.get(direction) {
            Some(0) | None => None,
            Some(room) => Some(*room),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub string_desc: u16,
    pub long_string: u16,
    pub room: u8,
    pub flags: u8,
    pub word: u8,
    pub graphic: u8,
}

impl Item {
    pub fn weight(&self) -> u16 {
        (self.flags & ITEMF_WEIGHT_MASK) as u16
    }

    pub fn can_take(&self) -> bool {
        self.flags & ITEMF_CAN_TAKE != 0
    }
}

impl Display for Room {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(
            f,
            "desc={:#06x} flags={:#04x} graphic={:#04x} exits=",
            self.string_desc, self.flags, self.graphic
        )?;
        for (i, exit) in self.exits.iter().enumerate() {
            if *exit != 0 {
                write!(f, "{}:{} ", DIRECTION_NAMES[i], exit)?;
            }
        }
        Ok(())
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        let location = match self.room {
            ROOM_INVENTORY => "inventory".to_string(),
            ROOM_NOWHERE => "nowhere".to_string(),
            r => format!("room {}", r),
        };
        write!(
            f,
            "desc={:#06x} long={:#06x} word={:#04x} flags={:#04x} graphic={:#04x} in {}",
            self.string_desc, self.long_string, self.word, self.flags, self.graphic, location
        )
    }
}
