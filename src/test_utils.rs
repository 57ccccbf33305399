//! Builders for small game data images, for tests and tooling

use crate::action::{encode_action_table, Action, ACTION_TYPES};
use crate::config::GameConfig;
use crate::dictionary::{Word, WordKey, WordMap, WORD_TYPE_NOUN, WORD_TYPE_VERB};
use crate::display_headless::HeadlessDisplay;
use crate::error::GameError;
use crate::game::GameData;
use crate::header::FormatVersion;
use crate::input::ScriptedInput;
use crate::instruction::{Function, Instruction};
use crate::interpreter::Interpreter;
use crate::object::{Item, Room, ITEMF_CAN_TAKE};
use crate::text::encode_string;
use crate::vm::VM;
use crate::zrand::ZRand;

/// Magic used for images of each format
pub fn magic_for(version: FormatVersion) -> u16 {
    match version {
        FormatVersion::V1 => 0x2000,
        FormatVersion::V2 => 0x93f0,
    }
}

/// GameImageBuilder assembles a data file from tables. Rooms and items get
/// ids in the order they are added, starting at 1.
#[derive(Debug, Clone)]
pub struct GameImageBuilder {
    pub version: FormatVersion,
    pub rooms: Vec<Room>,
    pub items: Vec<Item>,
    pub words: Vec<Word>,
    pub word_maps: Vec<WordMap>,
    pub actions: Vec<Action>,
    /// Encoded functions, terminators included
    pub functions: Vec<Vec<u8>>,
    pub strings: Vec<String>,
    pub replace_words: Vec<String>,
}

impl GameImageBuilder {
    pub fn new(version: FormatVersion) -> Self {
        GameImageBuilder {
            version,
            rooms: Vec::new(),
            items: Vec::new(),
            words: Vec::new(),
            word_maps: Vec::new(),
            actions: Vec::new(),
            functions: Vec::new(),
            strings: Vec::new(),
            replace_words: Vec::new(),
        }
    }

    pub fn add_room(&mut self, room: Room) -> u8 {
        self.rooms.push(room);
        self.rooms.len() as u8
    }

    pub fn add_item(&mut self, item: Item) -> u8 {
        self.items.push(item);
        self.items.len() as u8
    }

    pub fn add_word(&mut self, name: &str, index: u8, kind: u8) -> &mut Self {
        self.words.push(Word::new(name, index, kind));
        self
    }

    pub fn add_word_pair(&mut self, first: WordKey, second: WordKey, target: WordKey) -> &mut Self {
        self.word_maps.push(WordMap {
            first,
            second,
            flags: 0,
            target,
        });
        self
    }

    pub fn add_action(&mut self, action: Action) -> &mut Self {
        self.actions.push(action);
        self
    }

    /// add_function appends a function and returns its index
    pub fn add_function(&mut self, code: &[Instruction]) -> u16 {
        let function = Function {
            instructions: code.to_vec(),
        };
        self.functions.push(function.encode());
        (self.functions.len() - 1) as u16
    }

    /// add_raw_function appends function bytes exactly as given
    pub fn add_raw_function(&mut self, bytes: &[u8]) -> u16 {
        self.functions.push(bytes.to_vec());
        (self.functions.len() - 1) as u16
    }

    pub fn add_string(&mut self, text: &str) -> u16 {
        self.strings.push(text.to_string());
        (self.strings.len() - 1) as u16
    }

    pub fn build(&self) -> Result<Vec<u8>, GameError> {
        let magic = magic_for(self.version);
        let header_words = match self.version {
            FormatVersion::V1 => 32,
            FormatVersion::V2 => 33,
        };
        let mut image = vec![0u8; header_words * 2];
        let mut addrs: Vec<u16> = Vec::new();
        let mark = |image: &Vec<u8>, addrs: &mut Vec<u16>| {
            addrs.push((image.len() as u16).wrapping_add(magic));
        };

        // Unused second header word
        addrs.push(magic);

        for kind in ACTION_TYPES.iter() {
            mark(&image, &mut addrs);
            let table: Vec<Action> = self
                .actions
                .iter()
                .filter(|a| a.kind == *kind)
                .cloned()
                .collect();
            image.extend(encode_action_table(&table));
        }

        mark(&image, &mut addrs);
        for f in &self.functions {
            image.extend_from_slice(f);
        }
        image.push(0);

        mark(&image, &mut addrs);
        for w in &self.words {
            image.extend_from_slice(&w.encode());
        }
        mark(&image, &mut addrs);
        for m in &self.word_maps {
            image.extend_from_slice(&[m.first.index, m.first.kind, m.flags]);
            image.extend_from_slice(&[m.second.index, m.second.kind]);
        }
        image.extend_from_slice(&[0, 0]);
        mark(&image, &mut addrs);
        for m in &self.word_maps {
            image.extend_from_slice(&[m.target.index, m.target.kind]);
        }

        mark(&image, &mut addrs);
        for r in &self.rooms {
            image.extend_from_slice(&r.string_desc.to_le_bytes());
        }
        for dir in 0..crate::object::NR_DIRECTIONS {
            mark(&image, &mut addrs);
            image.extend(self.rooms.iter().map(|r| r.exits[dir]));
        }
        mark(&image, &mut addrs);
        image.extend(self.rooms.iter().map(|r| r.flags));
        mark(&image, &mut addrs);
        image.extend(self.rooms.iter().map(|r| r.graphic));

        mark(&image, &mut addrs);
        image.extend(self.items.iter().map(|i| i.room));
        mark(&image, &mut addrs);
        image.extend(self.items.iter().map(|i| i.flags));
        mark(&image, &mut addrs);
        image.extend(self.items.iter().map(|i| i.word));
        mark(&image, &mut addrs);
        for i in &self.items {
            image.extend_from_slice(&i.string_desc.to_le_bytes());
        }
        mark(&image, &mut addrs);
        image.extend(self.items.iter().map(|i| i.graphic));
        if self.version == FormatVersion::V2 {
            mark(&image, &mut addrs);
            for i in &self.items {
                image.extend_from_slice(&i.long_string.to_le_bytes());
            }
        }

        mark(&image, &mut addrs);
        for s in &self.strings {
            image.extend(encode_string(s)?);
            image.push(0);
        }
        addrs.push(magic);
        mark(&image, &mut addrs);

        // Replace words follow the strings after two bytes of padding
        image.extend_from_slice(&[0, 0]);
        for w in &self.replace_words {
            image.extend_from_slice(w.as_bytes());
            image.push(0);
        }
        image.push(0);

        image[0..2].copy_from_slice(&magic.to_le_bytes());
        for (n, addr) in addrs.iter().enumerate() {
            let at = 2 + n * 2;
            image[at..at + 2].copy_from_slice(&addr.to_le_bytes());
        }
        debug_assert_eq!(addrs.len() + 1, header_words);
        Ok(image)
    }

    pub fn load(&self) -> Result<GameData, GameError> {
        GameData::from_memory(&self.build()?)
    }
}

// Word indexes of the sample game
pub const WORD_NORTH: u8 = 0x01;
pub const WORD_SOUTH: u8 = 0x02;
pub const WORD_TAKE: u8 = 0x05;
pub const WORD_PICK: u8 = 0x06;
pub const WORD_UP: u8 = 0x07;
pub const WORD_DROP: u8 = 0x08;
pub const WORD_INVENTORY: u8 = 0x09;
pub const WORD_LAMP: u8 = 0x10;
pub const WORD_COIN: u8 = 0x11;

pub const ROOM_HALL: u8 = 1;
pub const ROOM_CELLAR: u8 = 2;
pub const ITEM_LAMP: u8 = 1;
pub const ITEM_COIN: u8 = 2;

pub const STRING_HALL: u16 = 5;
pub const STRING_CELLAR: u16 = 6;
pub const STRING_LAMP: u16 = 7;
pub const STRING_TAKEN: u16 = 8;
pub const STRING_DROPPED: u16 = 9;
pub const STRING_COIN: u16 = 10;
pub const STRING_ALREADY_HAVE: u16 = 11;

/// sample_game is a two room version 1 game: a hall with a lamp north of
/// which is a cellar with a coin. It understands movement, taking, dropping
/// and the inventory.
pub fn sample_game() -> GameImageBuilder {
    let mut b = GameImageBuilder::new(FormatVersion::V1);
    for s in [
        "You can't go that way.",
        "I don't understand.",
        "You see:",
        "You are carrying:",
        "You are empty handed.",
        "A dusty hall.",
        "A damp cellar.",
        "a brass lamp",
        "Taken.",
        "Dropped.",
        "a gold coin",
        "You already have @.",
    ] {
        b.add_string(s);
    }
    b.replace_words = ["her", "him", "it", "them"].iter().map(|s| s.to_string()).collect();

    let mut hall = Room {
        string_desc: STRING_HALL,
        graphic: 1,
        ..Room::default()
    };
    hall.exits[0] = ROOM_CELLAR;
    let mut cellar = Room {
        string_desc: STRING_CELLAR,
        graphic: 2,
        ..Room::default()
    };
    cellar.exits[1] = ROOM_HALL;
    b.add_room(hall);
    b.add_room(cellar);

    b.add_item(Item {
        string_desc: STRING_LAMP,
        room: ROOM_HALL,
        flags: ITEMF_CAN_TAKE | 2,
        word: WORD_LAMP,
        ..Item::default()
    });
    b.add_item(Item {
        string_desc: STRING_COIN,
        room: ROOM_CELLAR,
        flags: ITEMF_CAN_TAKE | 1,
        word: WORD_COIN,
        graphic: 3,
        ..Item::default()
    });

    b.add_word("north", WORD_NORTH, WORD_TYPE_VERB)
        .add_word("south", WORD_SOUTH, WORD_TYPE_VERB)
        .add_word("take", WORD_TAKE, WORD_TYPE_VERB)
        .add_word("pick", WORD_PICK, WORD_TYPE_VERB)
        .add_word("up", WORD_UP, WORD_TYPE_VERB)
        .add_word("drop", WORD_DROP, WORD_TYPE_VERB)
        .add_word("inv", WORD_INVENTORY, WORD_TYPE_VERB)
        .add_word("lamp", WORD_LAMP, WORD_TYPE_NOUN)
        .add_word("coin", WORD_COIN, WORD_TYPE_NOUN);
    b.add_word_pair(
        WordKey::new(WORD_PICK, WORD_TYPE_VERB),
        WordKey::new(WORD_UP, WORD_TYPE_VERB),
        WordKey::new(WORD_TAKE, WORD_TYPE_VERB),
    );

    let op = Instruction::new;
    // Function 0 runs after every turn
    b.add_function(&[op(0x94, &[])]);
    // MOVE_DEFAULT
    let go = b.add_function(&[op(0x8c, &[])]);
    let take = b.add_function(&[
        op(0x20, &[]), // HAVE_OBJECT current
        op(0xa9, &[0x01]), // SET_CURRENT_NOUN_STRING_REPLACEMENT
        op(0x8e, &[STRING_ALREADY_HAVE as u8, 0x80]),
        op(0x0c, &[]), // ELSE
        op(0x24, &[]), // OBJECT_PRESENT current
        op(0x2c, &[]), // OBJECT_TAKEABLE current
        op(0x98, &[]), // TAKE_CURRENT_OBJECT
        op(0x8e, &[STRING_TAKEN as u8, 0x80]),
    ]);
    let drop = b.add_function(&[
        op(0x20, &[]),
        op(0x9c, &[]), // DROP_CURRENT_OBJECT
        op(0x8e, &[STRING_DROPPED as u8, 0x80]),
    ]);
    let inventory = b.add_function(&[op(0x80, &[])]);

    use crate::action::ActionType::*;
    b.add_action(Action::new(VerbOptNoun, &[WORD_NORTH], go))
        .add_action(Action::new(VerbOptNoun, &[WORD_SOUTH], go))
        .add_action(Action::new(VerbOptNoun, &[WORD_INVENTORY], inventory))
        .add_action(Action::new(VerbNoun, &[WORD_TAKE, WORD_LAMP], take))
        .add_action(Action::new(VerbNoun, &[WORD_TAKE, WORD_COIN], take))
        .add_action(Action::new(VerbNoun, &[WORD_DROP, WORD_LAMP], drop))
        .add_action(Action::new(VerbNoun, &[WORD_DROP, WORD_COIN], drop));
    b
}

/// TestSession bundles an interpreter with the display it writes to
pub struct TestSession {
    pub interp: Interpreter,
    pub display: HeadlessDisplay,
}

impl TestSession {
    /// new starts a game with a headless display, scripted input and
    /// predictable random numbers
    pub fn new(game: GameData, config: GameConfig, input: &[&str]) -> Result<Self, GameError> {
        let vm = VM::new(game, config.start_room)?;
        let display = HeadlessDisplay::new()?;
        let mut interp = Interpreter::new(
            vm,
            config,
            Box::new(display.clone()),
            Box::new(ScriptedInput::new(input)),
        );
        interp.rng = ZRand::new_predictable(0);
        Ok(TestSession { interp, display })
    }

    pub fn from_builder(builder: &GameImageBuilder, input: &[&str]) -> Result<Self, GameError> {
        TestSession::new(builder.load()?, GameConfig::default(), input)
    }

    /// take_lines returns the printed lines and clears the display
    pub fn take_lines(&self) -> Vec<String> {
        let lines = self.display.get_lines();
        self.display.clear();
        lines
    }
}
