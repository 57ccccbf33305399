use log::debug;
use std::fmt::{Display, Error, Formatter};

use crate::error::GameError;
use crate::util::FileBuffer;

/// Opcodes with this bit set are commands, the rest are tests
pub const OPCODE_COMMAND_BIT: u8 = 0x80;
/// The low two bits of an opcode give its operand count
pub const OPCODE_OPERAND_MASK: u8 = 0x03;
/// Ends a function's instruction stream
pub const FUNCTION_END: u8 = 0x00;

/// A decoded instruction, still carrying its raw on-disk opcode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u8,
    pub operands: Vec<u8>,
    pub is_command: bool,
}

impl Instruction {
    pub fn new(opcode: u8, operands: &[u8]) -> Instruction {
        Instruction {
            opcode,
            operands: operands.to_vec(),
            is_command: opcode & OPCODE_COMMAND_BIT != 0,
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{:02x}", self.opcode)?;
        for o in &self.operands {
            write!(f, " {:02x}", o)?;
        }
        Ok(())
    }
}

/// A function is the list of instructions run for a matched action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Function {
    pub instructions: Vec<Instruction>,
}

impl Function {
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// parse reads one function, consuming its terminator
    pub fn parse(fb: &mut FileBuffer, index: usize) -> Result<Function, GameError> {
        let mut instructions = Vec::new();
        loop {
            let opcode = fb.read_u8().map_err(|_| {
                GameError::BadFunction(index, "missing terminator".to_string())
            })?;
            if opcode == FUNCTION_END {
                break;
            }

            let count = (opcode & OPCODE_OPERAND_MASK) as usize;
            let start = fb.pos();
            let (len, _) = fb.strlen();
            if len < count {
                return Err(GameError::BadFunction(
                    index,
                    format!(
                        "opcode {:02x} at {:#06x} wants {} operand(s), {} before terminator",
                        opcode,
                        start - 1,
                        count,
                        len
                    ),
                ));
            }
            let operands = fb.read_bytes(count)?;
            instructions.push(Instruction::new(opcode, operands));
        }
        Ok(Function { instructions })
    }

    /// parse_all reads consecutive functions until an empty one or the end of the file
    pub fn parse_all(fb: &mut FileBuffer, offset: usize) -> Result<Vec<Function>, GameError> {
        let mut functions = Vec::new();
        fb.seek(offset)?;
        while !fb.eof() {
            let function = Function::parse(fb, functions.len())?;
            if function.is_empty() {
                break;
            }
            functions.push(function);
        }
        debug!("parsed {} function(s) at {:#06x}", functions.len(), offset);
        Ok(functions)
    }

    /// encode writes the on-disk form of the function, terminator included
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for inst in &self.instructions {
            bytes.push(inst.opcode);
            bytes.extend_from_slice(&inst.operands);
        }
        bytes.push(FUNCTION_END);
        bytes
    }
}
