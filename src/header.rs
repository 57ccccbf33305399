use std::fmt::Display;
use std::fmt::Error;
use std::fmt::Formatter;

use crate::error::GameError;
use crate::object::NR_DIRECTIONS;
use crate::util::FileBuffer;

/// Number of action tables, one per sentence shape
pub const NR_ACTION_TABLES: usize = 7;
/// Largest number of rooms or items a data file can hold
pub const MAX_ENTRIES: usize = u8::MAX as usize;

/// On-disk format revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatVersion {
    V1,
    V2,
}

impl FormatVersion {
    /// from_magic identifies the format from the first word of the data file
    pub fn from_magic(magic: u16) -> Result<FormatVersion, GameError> {
        match magic {
            // Transylvania, Crimson Crown disk one
            0x2000 => Ok(FormatVersion::V1),
            // Crimson Crown disk two
            0x4800 => Ok(FormatVersion::V1),
            // OO-Topos
            0x93f0 => Ok(FormatVersion::V2),
            // Talisman
            0xa429 => Ok(FormatVersion::V2),
            // Transylvania re-release
            0x8bc3 => Ok(FormatVersion::V2),
            _ => Err(GameError::UnknownMagic(magic)),
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            FormatVersion::V1 => 1,
            FormatVersion::V2 => 2,
        }
    }
}

/// GameHeader holds the table addresses found at the start of a data file.
/// Every address is already converted to a file offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameHeader {
    pub magic: u16,
    pub version: FormatVersion,
    pub addr_actions: [usize; NR_ACTION_TABLES],
    pub addr_functions: usize,
    pub addr_dictionary: usize,
    pub addr_word_map: usize,
    pub addr_word_map_target: usize,
    pub room_desc_table: usize,
    pub room_direction_table: [usize; NR_DIRECTIONS],
    pub room_flags_table: usize,
    pub room_graphics_table: usize,
    pub addr_item_locations: usize,
    pub addr_item_flags: usize,
    pub addr_item_word: usize,
    pub addr_item_strings: usize,
    pub addr_item_graphics: usize,
    pub addr_item_long_strings: Option<usize>,
    pub addr_strings: usize,
    pub addr_strings_end: usize,
    pub nr_rooms: usize,
    pub nr_items: usize,
}

impl GameHeader {
    pub fn new(fb: &mut FileBuffer) -> Result<GameHeader, GameError> {
        fb.seek(0)?;
        let magic = fb.read_le16()?;
        let version = FormatVersion::from_magic(magic)?;

        // Header addresses are relative to where the file was loaded
        let mut addr = || -> Result<usize, GameError> {
            Ok(fb.read_le16()?.wrapping_sub(magic) as usize)
        };

        // The second header word is unused
        let _ = addr()?;

        let mut addr_actions = [0; NR_ACTION_TABLES];
        for a in addr_actions.iter_mut() {
            *a = addr()?;
        }
        let addr_functions = addr()?;
        let addr_dictionary = addr()?;
        let addr_word_map = addr()?;
        let addr_word_map_target = addr()?;

        let room_desc_table = addr()?;
        let mut room_direction_table = [0; NR_DIRECTIONS];
        for d in room_direction_table.iter_mut() {
            *d = addr()?;
        }
        let room_flags_table = addr()?;
        let room_graphics_table = addr()?;

        let addr_item_locations = addr()?;
        let addr_item_flags = addr()?;
        let addr_item_word = addr()?;
        let addr_item_strings = addr()?;
        let addr_item_graphics = addr()?;
        let addr_item_long_strings = match version {
            FormatVersion::V1 => None,
            FormatVersion::V2 => Some(addr()?),
        };

        let addr_strings = addr()?;
        let _ = addr()?;
        let addr_strings_end = addr()?;

        // Tables are laid out back to back so their spacing gives the counts
        let nr_rooms = room_direction_table[1].saturating_sub(room_direction_table[0]);
        let nr_items = addr_item_flags.saturating_sub(addr_item_locations);
        // Ids are single bytes counted from 1
        if nr_rooms > MAX_ENTRIES {
            return Err(GameError::TooManyEntries("rooms", nr_rooms));
        }
        if nr_items > MAX_ENTRIES {
            return Err(GameError::TooManyEntries("items", nr_items));
        }

        Ok(GameHeader {
            magic,
            version,
            addr_actions,
            addr_functions,
            addr_dictionary,
            addr_word_map,
            addr_word_map_target,
            room_desc_table,
            room_direction_table,
            room_flags_table,
            room_graphics_table,
            addr_item_locations,
            addr_item_flags,
            addr_item_word,
            addr_item_strings,
            addr_item_graphics,
            addr_item_long_strings,
            addr_strings,
            addr_strings_end,
            nr_rooms,
            nr_items,
        })
    }

    /// nr_words is the number of dictionary entries, which end at the word map
    pub fn nr_words(&self) -> usize {
        self.addr_word_map.saturating_sub(self.addr_dictionary) / crate::dictionary::WORD_ENTRY_LEN
    }
}

impl Display for GameHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(
            f,
            "
Magic:                    {:#06x}
Format version:           {}
Functions:                {:#06x}
Dictionary:               {:#06x}
Word map:                 {:#06x}
Word map targets:         {:#06x}
Room descriptions:        {:#06x}
Room flags:               {:#06x}
Room graphics:            {:#06x}
Item locations:           {:#06x}
Item strings:             {:#06x}
Strings:                  {:#06x}-{:#06x}
Rooms:                    {}
Items:                    {}
",
            self.magic,
            self.version.number(),
            self.addr_functions,
            self.addr_dictionary,
            self.addr_word_map,
            self.addr_word_map_target,
            self.room_desc_table,
            self.room_flags_table,
            self.room_graphics_table,
            self.addr_item_locations,
            self.addr_item_strings,
            self.addr_strings,
            self.addr_strings_end,
            self.nr_rooms,
            self.nr_items,
        )
    }
}
