use std::fmt::Display;
use std::fmt::Error;
use std::fmt::Formatter;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::action::{parse_actions, Action};
use crate::config::GameConfig;
use crate::dictionary::Dictionary;
use crate::error::GameError;
use crate::header::{FormatVersion, GameHeader};
use crate::instruction::Function;
use crate::object::{Item, Room, NR_DIRECTIONS};
use crate::strings::{parse_replace_words, parse_string_table, StringFile, StringTables};
use crate::util::FileBuffer;

/// GameData is everything parsed out of a title's data and string files
#[derive(Debug, Clone)]
pub struct GameData {
    pub header: GameHeader,
    /// Room 0 is a placeholder so rooms can be indexed by id
    pub rooms: Vec<Room>,
    /// Item ids are 1-based, item `n` is `items[n - 1]`
    pub items: Vec<Item>,
    pub dictionary: Dictionary,
    pub actions: Vec<Action>,
    pub functions: Vec<Function>,
    pub strings: StringTables,
}

fn read_table_u8(fb: &mut FileBuffer, offset: usize, count: usize) -> Result<Vec<u8>, GameError> {
    fb.seek(offset)?;
    Ok(fb.read_bytes(count)?.to_vec())
}

fn read_table_le16(
    fb: &mut FileBuffer,
    offset: usize,
    count: usize,
) -> Result<Vec<u16>, GameError> {
    fb.seek(offset)?;
    (0..count).map(|_| fb.read_le16()).collect()
}

impl GameData {
    /// from_memory parses a complete game data file
    pub fn from_memory(bytes: &[u8]) -> Result<GameData, GameError> {
        let mut fb = FileBuffer::new(bytes);
        let header = GameHeader::new(&mut fb)?;
        debug!("{}", header);

        let rooms = GameData::parse_rooms(&mut fb, &header)?;
        let items = GameData::parse_items(&mut fb, &header)?;

        fb.seek(header.addr_dictionary)?;
        let words = Dictionary::parse_words(&mut fb, header.nr_words())?;
        let word_maps = Dictionary::parse_word_maps(
            &mut fb,
            header.addr_word_map,
            header.addr_word_map_target,
        )?;
        let dictionary = Dictionary::new(words, word_maps);

        let actions = parse_actions(&mut fb, &header.addr_actions)?;
        let functions = Function::parse_all(&mut fb, header.addr_functions)?;

        let main = parse_string_table(&mut fb, header.addr_strings, header.addr_strings_end)?;
        let replace_words = parse_replace_words(&mut fb, header.addr_strings_end + 2)?;

        info!(
            "loaded v{} data: {} room(s), {} item(s), {} word(s), {} action(s), {} function(s), {} string(s)",
            header.version.number(),
            header.nr_rooms,
            header.nr_items,
            dictionary.words.len(),
            actions.len(),
            functions.len(),
            main.len()
        );

        Ok(GameData {
            header,
            rooms,
            items,
            dictionary,
            actions,
            functions,
            strings: StringTables {
                main,
                extra: Vec::new(),
                replace_words,
            },
        })
    }

    fn parse_rooms(fb: &mut FileBuffer, header: &GameHeader) -> Result<Vec<Room>, GameError> {
        let n = header.nr_rooms;
        let descs = read_table_le16(fb, header.room_desc_table, n)?;
        let mut exits = Vec::with_capacity(NR_DIRECTIONS);
        for table in header.room_direction_table.iter() {
            exits.push(read_table_u8(fb, *table, n)?);
        }
        let flags = read_table_u8(fb, header.room_flags_table, n)?;
        let graphics = read_table_u8(fb, header.room_graphics_table, n)?;

        let mut rooms = vec![Room::default()];
        for i in 0..n {
            let mut room = Room {
                flags: flags[i],
                graphic: graphics[i],
                string_desc: descs[i],
                ..Room::default()
            };
            for (d, table) in exits.iter().enumerate() {
                room.exits[d] = table[i];
            }
            rooms.push(room);
        }
        Ok(rooms)
    }

    fn parse_items(fb: &mut FileBuffer, header: &GameHeader) -> Result<Vec<Item>, GameError> {
        let n = header.nr_items;
        let locations = read_table_u8(fb, header.addr_item_locations, n)?;
        let flags = read_table_u8(fb, header.addr_item_flags, n)?;
        let words = read_table_u8(fb, header.addr_item_word, n)?;
        let strings = read_table_le16(fb, header.addr_item_strings, n)?;
        let graphics = read_table_u8(fb, header.addr_item_graphics, n)?;
        let long_strings = match header.addr_item_long_strings {
            Some(addr) => read_table_le16(fb, addr, n)?,
            None => vec![0; n],
        };

        Ok((0..n)
            .map(|i| Item {
                string_desc: strings[i],
                long_string: long_strings[i],
                room: locations[i],
                flags: flags[i],
                word: words[i],
                graphic: graphics[i],
            })
            .collect())
    }

    pub fn version(&self) -> FormatVersion {
        self.header.version
    }

    /// load_extra_strings adds string files in order
    pub fn load_extra_strings(&mut self, files: &[(Vec<u8>, StringFile)]) -> Result<(), GameError> {
        self.strings.extra.clear();
        for (i, (bytes, file)) in files.iter().enumerate() {
            self.strings.add_string_file(i, bytes, file)?;
        }
        Ok(())
    }
}

/// resolve_paths returns the data file and the directory string files live in.
/// `path` is either a game directory or the data file itself.
pub fn resolve_paths(path: &Path, config: &GameConfig) -> (PathBuf, PathBuf) {
    if path.is_dir() {
        (path.join(&config.data_file), path.to_path_buf())
    } else {
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        (path.to_path_buf(), dir)
    }
}

/// load_game reads a title's data file and every string file it names
pub fn load_game(path: &Path, config: &GameConfig) -> Result<GameData, GameError> {
    config.validate()?;
    let (data_path, dir) = resolve_paths(path, config);
    let bytes = fs::read(&data_path)
        .map_err(|e| GameError::IOError(format!("{}: {}", data_path.display(), e)))?;
    let mut game = GameData::from_memory(&bytes)?;

    let mut files = Vec::new();
    for file in &config.string_files {
        let p = dir.join(&file.file);
        let bytes =
            fs::read(&p).map_err(|e| GameError::IOError(format!("{}: {}", p.display(), e)))?;
        files.push((bytes, file.clone()));
    }
    game.load_extra_strings(&files)?;
    Ok(game)
}

impl Display for GameData {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        writeln!(f, "{}", self.header)?;
        writeln!(f, "Rooms:")?;
        for (i, room) in self.rooms.iter().enumerate().skip(1) {
            writeln!(f, "  [{:02x}] {}", i, room)?;
        }
        writeln!(f, "Items:")?;
        for (i, item) in self.items.iter().enumerate() {
            writeln!(f, "  [{:02x}] {}", i + 1, item)?;
        }
        write!(f, "{}", self.dictionary)?;
        writeln!(f, "Actions:")?;
        for action in &self.actions {
            writeln!(f, "  {}", action)?;
        }
        Ok(())
    }
}
