use std::fmt::{self, Display, Formatter, Write};

use crate::action::Action;
use crate::game::GameData;
use crate::instruction::{Function, Instruction};
use crate::opcode_tables::{OpcodeMap, ScriptOpcode};

/// Disassembler renders a game's tables and functions as text
pub struct Disassembler<'a> {
    game: &'a GameData,
    map: OpcodeMap,
}

impl<'a> Disassembler<'a> {
    pub fn new(game: &'a GameData) -> Self {
        Disassembler {
            game,
            map: OpcodeMap::for_version(game.version()),
        }
    }

    /// format_instruction gives the raw bytes, the mnemonic and, where
    /// useful, what the operands refer to
    pub fn format_instruction(&self, inst: &Instruction) -> String {
        let mapped = self.map.get(inst.opcode);
        let mut raw = format!("{:02x}", inst.opcode);
        for o in &inst.operands {
            raw.push_str(&format!(" {:02x}", o));
        }

        let mut text = format!("{:<12}{}", raw, mapped);
        for o in &inst.operands {
            text.push_str(&format!(" {:02x}", o));
        }
        if let Some(note) = self.annotate(mapped.opcode, &inst.operands) {
            text.push_str(&format!("  ; {}", note));
        }
        text
    }

    fn annotate(&self, opcode: ScriptOpcode, operands: &[u8]) -> Option<String> {
        let a = operands.first().copied().unwrap_or(0) as u16;
        let b = operands.get(1).copied().unwrap_or(0) as u16;
        let c = operands.get(2).copied().unwrap_or(0) as u16;
        match opcode {
            ScriptOpcode::Print => Some(format!("{:?}", self.game.strings.lookup((b << 8) | a))),
            ScriptOpcode::SetObjectDescription | ScriptOpcode::SetObjectLongDescription => {
                Some(format!("{:?}", self.game.strings.lookup((c << 8) | b)))
            }
            ScriptOpcode::CallFunc => {
                let index = if b == 0x81 { a + 0x100 } else { a };
                Some(format!("function {:#06x}", index))
            }
            ScriptOpcode::CallFunc2 => Some(format!("function {:#06x}", ((b & 1) << 8) | a)),
            _ => None,
        }
    }

    /// write_function lists one function, one instruction per line
    pub fn write_function<W: Write>(
        &self,
        out: &mut W,
        index: usize,
        function: &Function,
    ) -> fmt::Result {
        writeln!(out, "[function {:#06x}]", index)?;
        for inst in &function.instructions {
            let indent = if inst.is_command { "    " } else { "  " };
            writeln!(out, "{}{}", indent, self.format_instruction(inst))?;
        }
        Ok(())
    }

    fn describe_action(&self, action: &Action) -> String {
        let names: Vec<String> = action
            .kind
            .slot_types()
            .iter()
            .zip(action.words.iter())
            .map(|(mask, index)| {
                match self.game.dictionary.find_word_by_index_matching_mask(*index, *mask) {
                    Some(w) => w.name.clone(),
                    None => format!("{:02x}?", index),
                }
            })
            .collect();
        format!("{} [{}]", action, names.join(" "))
    }
}

impl<'a> Display for Disassembler<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let game = self.game;
        writeln!(f, "{}", game.header)?;
        write!(f, "{}", game.dictionary)?;

        writeln!(f, "\nActions:")?;
        for action in &game.actions {
            writeln!(f, "  {}", self.describe_action(action))?;
        }

        writeln!(f, "\nFunctions:")?;
        for (i, function) in game.functions.iter().enumerate() {
            self.write_function(f, i, function)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_game, STRING_TAKEN};

    #[test]
    fn instructions_show_mnemonics_and_strings() {
        let game = sample_game().load().unwrap();
        let dasm = Disassembler::new(&game);

        let print = Instruction::new(0x8e, &[STRING_TAKEN as u8, 0x80]);
        let text = dasm.format_instruction(&print);
        assert!(text.starts_with("8e 08 80"), "{}", text);
        assert!(text.contains("PRINT 08 80"), "{}", text);
        assert!(text.ends_with("; \"Taken.\""), "{}", text);

        let negated = Instruction::new(0x60, &[]);
        assert!(dasm.format_instruction(&negated).contains("!HAVE_OBJECT(current)"));

        let call = Instruction::new(0x92, &[0x02, 0x81]);
        assert!(dasm.format_instruction(&call).ends_with("function 0x0102"));
    }

    #[test]
    fn listing_covers_every_function_and_action() {
        let game = sample_game().load().unwrap();
        let listing = Disassembler::new(&game).to_string();
        for i in 0..game.functions.len() {
            assert!(listing.contains(&format!("[function {:#06x}]", i)));
        }
        assert!(listing.contains("MOVE_DEFAULT"));
        assert!(listing.contains("[take lamp]"), "{}", listing);
    }
}
