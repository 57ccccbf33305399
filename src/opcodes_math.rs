/// Variable and flag operations for the Comprehend interpreter
///
/// This module handles the opcodes that only touch the variable and flag
/// arrays:
/// - Variable comparisons against variable 0 (VAR_EQ1 etc.) or between two
///   variables (VAR_EQ2 etc.)
/// - Variable arithmetic, which wraps at 16 bits
/// - Flag tests and updates
/// - The turn counter
use crate::error::GameError;
use crate::interpreter::{operand, ExecutionResult, Interpreter};
use crate::opcode_tables::ScriptOpcode;
use crate::vm::VAR_TURN_COUNT;
use log::debug;

impl Interpreter {
    /// Handle variable and flag opcodes
    pub fn execute_math_op(
        &mut self,
        opcode: ScriptOpcode,
        operands: &[u8],
    ) -> Result<ExecutionResult, GameError> {
        let a = operand(operands, 0);
        let b = operand(operands, 1);
        match opcode {
            // ---- TESTS ----
            ScriptOpcode::VarEq1 => {
                let (x, y) = (self.vm.read_variable(0)?, self.vm.read_variable(a)?);
                Ok(ExecutionResult::Test(x == y))
            }
            ScriptOpcode::VarGt1 => {
                let (x, y) = (self.vm.read_variable(0)?, self.vm.read_variable(a)?);
                Ok(ExecutionResult::Test(x > y))
            }
            ScriptOpcode::VarGte1 => {
                let (x, y) = (self.vm.read_variable(0)?, self.vm.read_variable(a)?);
                Ok(ExecutionResult::Test(x >= y))
            }
            ScriptOpcode::VarEq2 => {
                let (x, y) = (self.vm.read_variable(a)?, self.vm.read_variable(b)?);
                Ok(ExecutionResult::Test(x == y))
            }
            ScriptOpcode::VarGt2 => {
                let (x, y) = (self.vm.read_variable(a)?, self.vm.read_variable(b)?);
                Ok(ExecutionResult::Test(x > y))
            }
            ScriptOpcode::VarGte2 => {
                let (x, y) = (self.vm.read_variable(a)?, self.vm.read_variable(b)?);
                Ok(ExecutionResult::Test(x >= y))
            }
            ScriptOpcode::TestFlag => Ok(ExecutionResult::Test(self.vm.test_flag(a)?)),

            // ---- COMMANDS ----
            ScriptOpcode::VarAdd => {
                let value = self.vm.read_variable(a)?.wrapping_add(self.vm.read_variable(b)?);
                debug!("var[{:02x}] += var[{:02x}] -> {}", a, b, value);
                self.vm.write_variable(a, value)?;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::VarSub => {
                let value = self.vm.read_variable(a)?.wrapping_sub(self.vm.read_variable(b)?);
                debug!("var[{:02x}] -= var[{:02x}] -> {}", a, b, value);
                self.vm.write_variable(a, value)?;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::VarInc => {
                let value = self.vm.read_variable(a)?.wrapping_add(1);
                self.vm.write_variable(a, value)?;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::VarDec => {
                let value = self.vm.read_variable(a)?.wrapping_sub(1);
                self.vm.write_variable(a, value)?;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::SetFlag => {
                self.vm.set_flag(a, true)?;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::ClearFlag => {
                self.vm.set_flag(a, false)?;
                Ok(ExecutionResult::Continue)
            }
            ScriptOpcode::TurnTick => {
                let turns = self.vm.read_variable(VAR_TURN_COUNT)?.wrapping_add(1);
                self.vm.write_variable(VAR_TURN_COUNT, turns)?;
                Ok(ExecutionResult::Continue)
            }

            _ => Err(GameError::BadFunction(
                0,
                format!("{} is not a variable opcode", opcode.name()),
            )),
        }
    }

    /// Check if an opcode is a variable or flag operation
    pub fn is_math_opcode(opcode: ScriptOpcode) -> bool {
        matches!(
            opcode,
            ScriptOpcode::VarEq1
                | ScriptOpcode::VarGt1
                | ScriptOpcode::VarGte1
                | ScriptOpcode::VarEq2
                | ScriptOpcode::VarGt2
                | ScriptOpcode::VarGte2
                | ScriptOpcode::TestFlag
                | ScriptOpcode::VarAdd
                | ScriptOpcode::VarSub
                | ScriptOpcode::VarInc
                | ScriptOpcode::VarDec
                | ScriptOpcode::SetFlag
                | ScriptOpcode::ClearFlag
                | ScriptOpcode::TurnTick
        )
    }
}
