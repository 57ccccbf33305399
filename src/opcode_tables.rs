//! Translation of raw on-disk opcode bytes into version independent opcodes.
//!
//! The two data file revisions give the same bytes different meanings, so
//! each revision has its own 256 entry table. The interpreter only ever
//! dispatches on [`ScriptOpcode`].

use lazy_static::lazy_static;
use std::fmt::{Display, Error, Formatter};

use crate::header::FormatVersion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptOpcode {
    Unknown,

    // Tests
    HaveObject,
    InRoom,
    VarEq1,
    VarEq2,
    VarGt1,
    VarGt2,
    VarGte1,
    VarGte2,
    CurrentIsObject,
    ObjectPresent,
    ObjectInRoom,
    ObjectIsNowhere,
    CurrentObjectValid,
    InventoryFull,
    TestFlag,
    RoomFlag,
    ObjectTakeable,
    TestFalse,
    Or,
    Else,

    // Commands
    Inventory,
    InventoryRoom,
    TakeObject,
    TakeCurrentObject,
    DropObject,
    DropCurrentObject,
    RemoveObject,
    RemoveCurrentObject,
    MoveObjectToRoom,
    MoveObjectToCurrentRoom,
    MoveCurrentObjectToRoom,
    MoveToRoom,
    MoveDefault,
    MoveDir,
    VarAdd,
    VarSub,
    VarInc,
    VarDec,
    SetFlag,
    ClearFlag,
    SetRoomDescription,
    SetObjectDescription,
    SetObjectLongDescription,
    SetRoomGraphic,
    SetObjectGraphic,
    Print,
    RandomMsg,
    SetStringReplacement,
    SetCurrentNounStringReplacement,
    DescribeCurrentObject,
    ClearLine,
    WaitKey,
    DrawRoom,
    DrawObject,
    CallFunc,
    CallFunc2,
    Special,
    TurnTick,
    SaveAction,
    SetCanTake,
    ClearCanTake,
    SetInvisible,
    ClearInvisible,
    SetWord,
    ClearWord,
}

impl ScriptOpcode {
    pub fn name(&self) -> &'static str {
        use ScriptOpcode::*;
        match self {
            Unknown => "UNKNOWN",
            HaveObject => "HAVE_OBJECT",
            InRoom => "IN_ROOM",
            VarEq1 => "VAR_EQ1",
            VarEq2 => "VAR_EQ2",
            VarGt1 => "VAR_GT1",
            VarGt2 => "VAR_GT2",
            VarGte1 => "VAR_GTE1",
            VarGte2 => "VAR_GTE2",
            CurrentIsObject => "CURRENT_IS_OBJECT",
            ObjectPresent => "OBJECT_PRESENT",
            ObjectInRoom => "OBJECT_IN_ROOM",
            ObjectIsNowhere => "OBJECT_IS_NOWHERE",
            CurrentObjectValid => "CURRENT_OBJECT_VALID",
            InventoryFull => "INVENTORY_FULL",
            TestFlag => "TEST_FLAG",
            RoomFlag => "ROOM_FLAG",
            ObjectTakeable => "OBJECT_TAKEABLE",
            TestFalse => "TEST_FALSE",
            Or => "OR",
            Else => "ELSE",
            Inventory => "INVENTORY",
            InventoryRoom => "INVENTORY_ROOM",
            TakeObject => "TAKE_OBJECT",
            TakeCurrentObject => "TAKE_CURRENT_OBJECT",
            DropObject => "DROP_OBJECT",
            DropCurrentObject => "DROP_CURRENT_OBJECT",
            RemoveObject => "REMOVE_OBJECT",
            RemoveCurrentObject => "REMOVE_CURRENT_OBJECT",
            MoveObjectToRoom => "MOVE_OBJECT_TO_ROOM",
            MoveObjectToCurrentRoom => "MOVE_OBJECT_TO_CURRENT_ROOM",
            MoveCurrentObjectToRoom => "MOVE_CURRENT_OBJECT_TO_ROOM",
            MoveToRoom => "MOVE_TO_ROOM",
            MoveDefault => "MOVE_DEFAULT",
            MoveDir => "MOVE_DIR",
            VarAdd => "VAR_ADD",
            VarSub => "VAR_SUB",
            VarInc => "VAR_INC",
            VarDec => "VAR_DEC",
            SetFlag => "SET_FLAG",
            ClearFlag => "CLEAR_FLAG",
            SetRoomDescription => "SET_ROOM_DESCRIPTION",
            SetObjectDescription => "SET_OBJECT_DESCRIPTION",
            SetObjectLongDescription => "SET_OBJECT_LONG_DESCRIPTION",
            SetRoomGraphic => "SET_ROOM_GRAPHIC",
            SetObjectGraphic => "SET_OBJECT_GRAPHIC",
            Print => "PRINT",
            RandomMsg => "RANDOM_MSG",
            SetStringReplacement => "SET_STRING_REPLACEMENT",
            SetCurrentNounStringReplacement => "SET_CURRENT_NOUN_STRING_REPLACEMENT",
            DescribeCurrentObject => "DESCRIBE_CURRENT_OBJECT",
            ClearLine => "CLEAR_LINE",
            WaitKey => "WAIT_KEY",
            DrawRoom => "DRAW_ROOM",
            DrawObject => "DRAW_OBJECT",
            CallFunc => "CALL_FUNC",
            CallFunc2 => "CALL_FUNC2",
            Special => "SPECIAL",
            TurnTick => "TURN_TICK",
            SaveAction => "SAVE_ACTION",
            SetCanTake => "SET_CAN_TAKE",
            ClearCanTake => "CLEAR_CAN_TAKE",
            SetInvisible => "SET_INVISIBLE",
            ClearInvisible => "CLEAR_INVISIBLE",
            SetWord => "SET_WORD",
            ClearWord => "CLEAR_WORD",
        }
    }

    /// arity is the number of logical operands the opcode works on. For
    /// current object forms the first of them is the current object.
    pub fn arity(&self) -> usize {
        use ScriptOpcode::*;
        match self {
            Unknown | CurrentObjectValid | TestFalse | Or | Else => 0,
            Inventory | TakeCurrentObject | DropCurrentObject | RemoveCurrentObject => 0,
            MoveDefault | ClearLine | WaitKey | TurnTick | SaveAction => 0,
            VarEq2 | VarGt2 | VarGte2 | ObjectInRoom => 2,
            InventoryRoom | MoveObjectToRoom | VarAdd | VarSub => 2,
            SetRoomGraphic | SetObjectGraphic | Print | CallFunc | CallFunc2 | SetWord => 2,
            SetRoomDescription | SetObjectDescription | SetObjectLongDescription | RandomMsg => 3,
            _ => 1,
        }
    }
}

/// MappedOpcode is one entry of a version's opcode table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedOpcode {
    pub opcode: ScriptOpcode,
    /// The test result is inverted
    pub negate: bool,
    /// The first operand is the item named by the sentence's noun
    pub current_object: bool,
}

impl MappedOpcode {
    const UNKNOWN: MappedOpcode = MappedOpcode::new(ScriptOpcode::Unknown);

    const fn new(opcode: ScriptOpcode) -> MappedOpcode {
        MappedOpcode {
            opcode,
            negate: false,
            current_object: false,
        }
    }

    const fn not(self) -> MappedOpcode {
        MappedOpcode {
            negate: true,
            ..self
        }
    }

    const fn current(self) -> MappedOpcode {
        MappedOpcode {
            current_object: true,
            ..self
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.opcode == ScriptOpcode::Unknown
    }
}

impl Display for MappedOpcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        if self.negate {
            write!(f, "!")?;
        }
        write!(f, "{}", self.opcode.name())?;
        if self.current_object {
            write!(f, "(current)")?;
        }
        Ok(())
    }
}

type OpcodeTable = [MappedOpcode; 256];

fn table_from(entries: &[(u8, MappedOpcode)]) -> OpcodeTable {
    let mut table = [MappedOpcode::UNKNOWN; 256];
    for (byte, mapped) in entries {
        table[*byte as usize] = *mapped;
    }
    table
}

fn build_v1() -> OpcodeTable {
    use ScriptOpcode::*;
    let op = MappedOpcode::new;
    table_from(&[
        (0x01, op(HaveObject)),
        (0x04, op(Or)),
        (0x05, op(InRoom)),
        (0x06, op(VarEq2)),
        (0x09, op(CurrentIsObject)),
        (0x0a, op(VarGt2)),
        (0x0c, op(Else)),
        (0x0d, op(ObjectPresent)),
        (0x0e, op(VarGte2)),
        (0x11, op(VarEq1)),
        (0x14, op(CurrentObjectValid).not()),
        (0x15, op(VarGt1)),
        (0x16, op(ObjectInRoom)),
        (0x18, op(InventoryFull).current()),
        (0x19, op(TestFlag)),
        (0x1d, op(InventoryFull)),
        (0x20, op(HaveObject).current()),
        (0x21, op(ObjectIsNowhere).not()),
        (0x24, op(ObjectPresent).current()),
        (0x25, op(VarGte1)),
        (0x28, op(ObjectIsNowhere).current()),
        (0x29, op(ObjectInRoom).current()),
        (0x2c, op(ObjectTakeable).current()),
        (0x2d, op(ObjectTakeable)),
        (0x30, op(TestFalse)),
        (0x31, op(RoomFlag)),
        (0x41, op(HaveObject).not()),
        (0x45, op(InRoom).not()),
        (0x4d, op(ObjectPresent).not()),
        (0x54, op(CurrentObjectValid)),
        (0x56, op(ObjectInRoom).not()),
        (0x59, op(TestFlag).not()),
        (0x60, op(HaveObject).current().not()),
        (0x61, op(ObjectIsNowhere)),
        (0x64, op(ObjectPresent).current().not()),
        (0x69, op(ObjectInRoom).current().not()),
        (0x6c, op(ObjectTakeable).current().not()),
        (0x71, op(RoomFlag).not()),
        (0x80, op(Inventory)),
        (0x81, op(TakeObject)),
        (0x82, op(MoveObjectToRoom)),
        (0x84, op(SaveAction)),
        (0x85, op(MoveToRoom)),
        (0x86, op(VarAdd)),
        (0x87, op(SetRoomDescription)),
        (0x88, op(ClearLine)),
        (0x89, op(MoveObjectToCurrentRoom)),
        (0x8a, op(VarSub)),
        (0x8b, op(SetObjectDescription)),
        (0x8c, op(MoveDefault)),
        (0x8d, op(DropObject)),
        (0x8e, op(Print)),
        (0x90, op(WaitKey)),
        (0x91, op(RemoveObject)),
        (0x92, op(CallFunc)),
        (0x94, op(TurnTick)),
        (0x95, op(SetFlag)),
        (0x96, op(InventoryRoom)),
        (0x98, op(TakeCurrentObject)),
        (0x99, op(ClearFlag)),
        (0x9a, op(SetRoomGraphic)),
        (0x9c, op(DropCurrentObject)),
        (0x9d, op(Special)),
        (0x9e, op(SetObjectGraphic)),
        (0xa0, op(RemoveCurrentObject)),
        (0xa1, op(MoveDir)),
        (0xa5, op(DescribeCurrentObject)),
        (0xa9, op(SetCurrentNounStringReplacement)),
        (0xad, op(SetStringReplacement)),
        (0xb1, op(VarInc)),
        (0xb5, op(VarDec)),
        (0xb9, op(MoveCurrentObjectToRoom)),
        (0xbd, op(DrawRoom)),
        (0xc1, op(DrawObject)),
    ])
}

/// Bit of a v2 test opcode that inverts its result
const V2_NOT_BIT: u8 = 0x40;
/// Bit of a v2 object test opcode that selects the current object form
const V2_CURRENT_OBJECT_BIT: u8 = 0x20;

fn build_v2() -> OpcodeTable {
    use ScriptOpcode::*;
    let op = MappedOpcode::new;

    // Base test opcodes. Tests flagged true also have a current object form.
    let tests: &[(u8, ScriptOpcode, bool)] = &[
        (0x01, HaveObject, true),
        (0x02, VarGt2, false),
        (0x04, Or, false),
        (0x05, InRoom, false),
        (0x06, VarEq2, false),
        (0x08, CurrentObjectValid, false),
        (0x09, VarGt1, false),
        (0x0a, VarGte2, false),
        (0x0c, Else, false),
        (0x0d, ObjectPresent, true),
        (0x0e, ObjectInRoom, true),
        (0x10, TestFalse, false),
        (0x11, ObjectIsNowhere, true),
        (0x15, ObjectTakeable, true),
        (0x19, TestFlag, false),
        (0x1d, InventoryFull, true),
        (0x25, VarEq1, false),
        (0x29, CurrentIsObject, false),
        (0x39, RoomFlag, false),
    ];

    let mut entries = Vec::new();
    for (byte, opcode, has_current) in tests {
        let mut forms = vec![(*byte, op(*opcode))];
        if *has_current {
            forms.push((*byte | V2_CURRENT_OBJECT_BIT, op(*opcode).current()));
        }
        for (b, mapped) in forms {
            entries.push((b, mapped));
            if !matches!(opcode, Or | Else) {
                entries.push((b | V2_NOT_BIT, mapped.not()));
            }
        }
    }

    entries.extend_from_slice(&[
        (0x80, op(Inventory)),
        (0x81, op(MoveToRoom)),
        (0x82, op(MoveObjectToRoom)),
        (0x83, op(SetRoomDescription)),
        (0x84, op(MoveDefault)),
        (0x85, op(TakeObject)),
        (0x86, op(VarAdd)),
        (0x87, op(SetObjectDescription)),
        (0x88, op(TakeCurrentObject)),
        (0x89, op(DropObject)),
        (0x8a, op(VarSub)),
        (0x8b, op(SetObjectLongDescription)),
        (0x8c, op(DropCurrentObject)),
        (0x8d, op(RemoveObject)),
        (0x8e, op(Print)),
        (0x8f, op(RandomMsg)),
        (0x90, op(RemoveCurrentObject)),
        (0x91, op(MoveObjectToCurrentRoom)),
        (0x92, op(CallFunc)),
        (0x94, op(WaitKey)),
        (0x95, op(SetFlag)),
        (0x96, op(CallFunc2)),
        (0x98, op(TurnTick)),
        (0x99, op(ClearFlag)),
        (0x9a, op(InventoryRoom)),
        (0x9c, op(ClearLine)),
        (0x9d, op(Special)),
        (0x9e, op(SetRoomGraphic)),
        (0xa0, op(SaveAction)),
        (0xa1, op(MoveDir)),
        (0xa2, op(SetObjectGraphic)),
        (0xa5, op(VarInc)),
        (0xa6, op(SetWord)),
        (0xa9, op(VarDec)),
        (0xad, op(MoveCurrentObjectToRoom)),
        (0xb1, op(SetStringReplacement)),
        (0xb5, op(SetCurrentNounStringReplacement)),
        (0xb9, op(DescribeCurrentObject)),
        (0xbd, op(DrawRoom)),
        (0xc1, op(DrawObject)),
        (0xc5, op(SetCanTake)),
        (0xc9, op(ClearCanTake)),
        (0xcd, op(SetInvisible)),
        (0xd1, op(ClearInvisible)),
        (0xd5, op(ClearWord)),
    ]);

    table_from(&entries)
}

lazy_static! {
    static ref V1_TABLE: OpcodeTable = build_v1();
    static ref V2_TABLE: OpcodeTable = build_v2();
}

/// OpcodeMap translates raw opcode bytes for one data file revision
#[derive(Debug, Clone, Copy)]
pub struct OpcodeMap {
    version: FormatVersion,
    table: &'static OpcodeTable,
}

impl OpcodeMap {
    pub fn for_version(version: FormatVersion) -> OpcodeMap {
        let table: &'static OpcodeTable = match version {
            FormatVersion::V1 => &V1_TABLE,
            FormatVersion::V2 => &V2_TABLE,
        };
        OpcodeMap { version, table }
    }

    pub fn version(&self) -> FormatVersion {
        self.version
    }

    pub fn get(&self, raw: u8) -> MappedOpcode {
        self.table[raw as usize]
    }
}
