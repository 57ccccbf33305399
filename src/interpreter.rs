use crate::action::find_action;
use crate::config::GameConfig;
use crate::dictionary::Word;
use crate::display_manager::{create_display, DisplayMode};
use crate::display_trait::ComprehendDisplay;
use crate::error::GameError;
use crate::header::FormatVersion;
use crate::hooks::GameHooks;
use crate::input::{InputSource, StdinInput};
use crate::instruction::{Function, Instruction};
use crate::object::{RoomType, ITEMF_INVISIBLE};
use crate::opcode_tables::{MappedOpcode, OpcodeMap, ScriptOpcode};
use crate::runtime_parser::{parse_line, Sentence};
use crate::vm::{
    UPDATE_GRAPHICS, UPDATE_GRAPHICS_ITEMS, UPDATE_ITEM_LIST, UPDATE_ROOM_DESC, VM,
};
use crate::zrand::ZRand;
use log::{debug, info, warn};

/// Nested CALL_FUNC limit
pub const MAX_CALL_DEPTH: usize = 32;

pub const STRING_CANT_GO: u16 = 0;
pub const STRING_DONT_UNDERSTAND: u16 = 1;
pub const STRING_YOU_SEE: u16 = 2;
pub const STRING_INVENTORY: u16 = 3;
pub const STRING_INVENTORY_EMPTY: u16 = 4;

/// Result of executing an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionResult {
    /// A command ran
    Continue,
    /// A test was evaluated, before any negation
    Test(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    /// The player ran out of input
    Quit,
    GameOver,
    Won,
}

/// FunctionState carries the test bookkeeping across one function's
/// instruction list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionState {
    pub test_result: bool,
    pub else_result: bool,
    /// Instructions left in the current OR group
    pub or_count: u32,
    pub and: bool,
    pub in_command: bool,
    pub executed: bool,
}

impl Default for FunctionState {
    fn default() -> Self {
        FunctionState {
            test_result: true,
            else_result: true,
            or_count: 0,
            and: false,
            in_command: false,
            executed: false,
        }
    }
}

impl FunctionState {
    /// set_test_result folds a test into the group. Outside an OR group
    /// tests are ANDed, inside one any true test makes the group true.
    pub fn set_test_result(&mut self, value: bool) {
        if self.or_count == 0 {
            if self.and {
                if !value {
                    self.test_result = false;
                }
            } else {
                self.test_result = value;
                self.and = true;
            }
        } else if value {
            self.test_result = true;
        }
    }

    /// or starts an OR group covering the next two instructions, or
    /// extends a running one
    pub fn or(&mut self) {
        if self.or_count != 0 {
            self.or_count += 2;
        } else {
            self.test_result = false;
            self.or_count += 3;
        }
    }
}

/// operand returns operand `n`, or 0 when there are fewer
pub(crate) fn operand(operands: &[u8], n: usize) -> u8 {
    operands.get(n).copied().unwrap_or(0)
}

/// The Comprehend interpreter: game state plus presentation and input
pub struct Interpreter {
    /// The VM state
    pub vm: VM,
    pub config: GameConfig,
    pub hooks: GameHooks,
    pub rng: ZRand,
    pub status: GameStatus,
    pub(crate) display: Box<dyn ComprehendDisplay>,
    pub(crate) input: Box<dyn InputSource>,
    opcode_map: OpcodeMap,
    /// Verb remembered by SAVE_ACTION for the next sentence
    saved_action: Option<Word>,
    call_depth: usize,
}

impl Interpreter {
    pub fn new(
        vm: VM,
        config: GameConfig,
        display: Box<dyn ComprehendDisplay>,
        input: Box<dyn InputSource>,
    ) -> Self {
        let opcode_map = OpcodeMap::for_version(vm.game.version());
        Interpreter {
            vm,
            config,
            hooks: GameHooks::default(),
            rng: ZRand::new_uniform(),
            status: GameStatus::Running,
            display,
            input,
            opcode_map,
            saved_action: None,
            call_depth: 0,
        }
    }

    /// for_terminal sets up display and input for an interactive session
    pub fn for_terminal(vm: VM, config: GameConfig) -> Result<Self, GameError> {
        let display = create_display(DisplayMode::from_env())?;
        Ok(Interpreter::new(
            vm,
            config,
            display,
            Box::new(StdinInput::new()),
        ))
    }

    pub fn version(&self) -> FormatVersion {
        self.opcode_map.version()
    }

    pub fn saved_action(&self) -> Option<&Word> {
        self.saved_action.as_ref()
    }

    /// string_lookup resolves a string reference against both tables
    pub fn string_lookup(&self, string: u16) -> String {
        self.vm.game.strings.lookup(string)
    }

    /// print_line prints text with the `@` placeholder replaced
    pub fn print_line(&mut self, text: &str) -> Result<(), GameError> {
        let text = self
            .vm
            .game
            .strings
            .replace_placeholders(text, self.vm.current_replace_word);
        self.display.print_line(&text)?;
        Ok(())
    }

    /// print_string looks up a string and prints it
    pub fn print_string(&mut self, string: u16) -> Result<(), GameError> {
        let text = self.string_lookup(string);
        self.print_line(&text)
    }

    /// restart puts the game back to how it was loaded
    pub fn restart(&mut self) -> Result<(), GameError> {
        info!("restarting");
        self.vm.reset()?;
        self.saved_action = None;
        self.display.clear_screen()?;
        Ok(())
    }

    /// eval_function runs function `index`. Nested calls share the game
    /// state and the sentence that started the outermost call.
    pub fn eval_function(&mut self, index: usize, sentence: &Sentence) -> Result<(), GameError> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(GameError::CallDepthExceeded(self.call_depth));
        }
        let function = self.vm.function(index)?;
        debug!("eval function {:#06x} ({} instructions)", index, function.len());

        self.call_depth += 1;
        let result = self.run_function(index, &function, sentence);
        self.call_depth -= 1;
        result
    }

    fn run_function(
        &mut self,
        index: usize,
        function: &Function,
        sentence: &Sentence,
    ) -> Result<(), GameError> {
        let mut state = FunctionState::default();
        for (n, inst) in function.instructions.iter().enumerate() {
            if state.executed && !inst.is_command {
                break;
            }
            debug!("[{:04x}:{:02}] {}", index, n, inst);
            self.eval_instruction(&mut state, inst, sentence)?;
            if self.status != GameStatus::Running {
                break;
            }
        }
        Ok(())
    }

    /// eval_instruction runs one instruction against the function's state
    pub fn eval_instruction(
        &mut self,
        state: &mut FunctionState,
        inst: &Instruction,
        sentence: &Sentence,
    ) -> Result<(), GameError> {
        let mapped = self.opcode_map.get(inst.opcode);

        if state.or_count > 0 {
            state.or_count -= 1;
        }

        if inst.is_command {
            state.in_command = true;
            if state.or_count != 0 {
                warn!("pending OR group at command {}", mapped);
                state.or_count = 0;
            }
            if !state.test_result {
                return Ok(());
            }
            state.else_result = false;
            state.executed = true;
            debug!("  {} {:02x?}", mapped, inst.operands);
            self.execute_command(mapped, &inst.operands, sentence)?;
            return Ok(());
        }

        if state.in_command {
            // A test after commands starts a new group
            state.in_command = false;
            state.test_result = false;
            state.and = false;
        }

        match mapped.opcode {
            ScriptOpcode::Or => state.or(),
            ScriptOpcode::Else => state.test_result = state.else_result,
            _ => {
                let value = self.eval_test(mapped, &inst.operands, sentence)?;
                state.set_test_result(value);
            }
        }
        debug!(
            "  {} {:02x?} -> {} (or={})",
            mapped, inst.operands, state.test_result, state.or_count
        );
        Ok(())
    }

    /// resolve_operands puts the current object in front of the operands of
    /// current object forms. None when the noun names no item.
    fn resolve_operands(
        &self,
        mapped: MappedOpcode,
        raw: &[u8],
        sentence: &Sentence,
    ) -> Option<Vec<u8>> {
        if !mapped.current_object {
            return Some(raw.to_vec());
        }
        let item = self.vm.item_by_noun(sentence.noun())?;
        let skip = if raw.len() >= mapped.opcode.arity() { 1 } else { 0 };
        let mut operands = vec![item];
        operands.extend_from_slice(&raw[skip.min(raw.len())..]);
        Some(operands)
    }

    fn eval_test(
        &mut self,
        mapped: MappedOpcode,
        raw: &[u8],
        sentence: &Sentence,
    ) -> Result<bool, GameError> {
        let operands = match self.resolve_operands(mapped, raw, sentence) {
            Some(ops) => ops,
            None => return Ok(mapped.negate),
        };

        let result = if Interpreter::is_math_opcode(mapped.opcode) {
            self.execute_math_op(mapped.opcode, &operands)?
        } else if Interpreter::is_object_opcode(mapped.opcode) {
            self.execute_object_op(mapped.opcode, &operands, sentence)?
        } else {
            debug!("unknown test opcode {} treated as false", mapped);
            return Ok(false);
        };

        match result {
            ExecutionResult::Test(value) => Ok(value != mapped.negate),
            ExecutionResult::Continue => Ok(false),
        }
    }

    fn execute_command(
        &mut self,
        mapped: MappedOpcode,
        operands: &[u8],
        sentence: &Sentence,
    ) -> Result<(), GameError> {
        let opcode = mapped.opcode;
        if Interpreter::is_math_opcode(opcode) {
            self.execute_math_op(opcode, operands)?;
        } else if Interpreter::is_object_opcode(opcode) {
            self.execute_object_op(opcode, operands, sentence)?;
        } else if Interpreter::is_display_opcode(opcode) {
            self.execute_display_op(opcode, operands, sentence)?;
        } else {
            self.execute_control_op(opcode, operands, sentence)?;
        }
        Ok(())
    }

    /// execute_control_op handles calls, the special hook and SAVE_ACTION
    fn execute_control_op(
        &mut self,
        opcode: ScriptOpcode,
        operands: &[u8],
        sentence: &Sentence,
    ) -> Result<(), GameError> {
        let a = operand(operands, 0);
        let b = operand(operands, 1);
        match opcode {
            ScriptOpcode::CallFunc => {
                let mut index = a as usize;
                if b == 0x81 {
                    index += 0x100;
                }
                self.eval_function(index, sentence)
            }
            ScriptOpcode::CallFunc2 => {
                let index = (((b & 1) as usize) << 8) | a as usize;
                self.eval_function(index, sentence)
            }
            ScriptOpcode::Special => {
                let hook = self.hooks.on_special_opcode;
                hook(self, a)
            }
            ScriptOpcode::SaveAction => {
                self.saved_action = sentence.verb().cloned();
                debug!("saved action {:?}", self.saved_action);
                Ok(())
            }
            _ => {
                debug!("unknown command opcode {} skipped", opcode.name());
                Ok(())
            }
        }
    }

    /// is_item_visible hides invisible items in version 2 data
    pub fn is_item_visible(&self, flags: u8) -> bool {
        match self.version() {
            FormatVersion::V1 => true,
            FormatVersion::V2 => flags & ITEMF_INVISIBLE == 0,
        }
    }

    /// handle_sentence matches one sentence and runs its function. Returns
    /// false when no action matched.
    pub fn handle_sentence(&mut self, sentence: &Sentence) -> Result<bool, GameError> {
        let function = match find_action(&self.vm.game.actions, sentence) {
            Some(action) => action.function,
            None => {
                debug!("no action for {:?}", sentence.words);
                self.print_string(STRING_DONT_UNDERSTAND)?;
                return Ok(false);
            }
        };
        debug!("sentence matched function {:#06x}", function);
        self.eval_function(function as usize, sentence)?;
        Ok(true)
    }

    /// handle_line runs every sentence in a line of input, stopping at the
    /// first that is not understood
    pub fn handle_line(&mut self, line: &str) -> Result<(), GameError> {
        let sentences = parse_line(&self.vm.game.dictionary, line);
        for mut sentence in sentences {
            if self.status != GameStatus::Running {
                break;
            }
            if let Some(verb) = self.saved_action.take() {
                if !sentence.words[0].is_verb() {
                    sentence.prepend_verb(verb);
                }
            }
            if !self.handle_sentence(&sentence)? {
                break;
            }
        }
        Ok(())
    }

    /// update redraws whatever the last turn changed
    pub fn update(&mut self) -> Result<(), GameError> {
        let flags = self.vm.update_flags;
        if flags == 0 {
            return Ok(());
        }

        let room_id = self.vm.current_room;
        let room = self.vm.current_room()?.clone();
        let mut desc = room.string_desc;
        let hook = self.hooks.room_is_special;
        let room_type = hook(self, room_id, &mut desc);

        if flags & (UPDATE_GRAPHICS | UPDATE_GRAPHICS_ITEMS) != 0 {
            match room_type {
                RoomType::Normal => {
                    if flags & UPDATE_GRAPHICS != 0 && room.graphic != 0 {
                        self.display.draw_location_picture(room.graphic as u16 - 1)?;
                    }
                    self.draw_items_in_current_room()?;
                }
                RoomType::Dark => self.display.clear_picture(false)?,
                RoomType::Bright => self.display.clear_picture(true)?,
            }
        }

        if flags & UPDATE_ROOM_DESC != 0 {
            self.print_string(desc)?;
        }

        if flags & UPDATE_ITEM_LIST != 0 && room_type == RoomType::Normal {
            self.describe_objects_in_current_room()?;
        }

        self.vm.update_flags = 0;
        Ok(())
    }

    fn draw_items_in_current_room(&mut self) -> Result<(), GameError> {
        for id in self.vm.items_in_room(self.vm.current_room) {
            let item = self.vm.item(id)?;
            if item.graphic != 0 && self.is_item_visible(item.flags) {
                let picture = item.graphic as u16 - 1;
                self.display.draw_item_picture(picture)?;
            }
        }
        Ok(())
    }

    /// play_turn runs one turn: hooks, screen update, input and function 0
    pub fn play_turn(&mut self) -> Result<(), GameError> {
        let before = self.hooks.on_before_turn;
        before(self)?;
        if self.status != GameStatus::Running {
            return Ok(());
        }
        self.update()?;

        self.display.print("\n> ")?;
        self.display.flush()?;
        let line = match self.input.read_line() {
            Ok(line) => line,
            Err(GameError::EndOfInput) => {
                info!("end of input");
                self.status = GameStatus::Quit;
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        self.display.print("\n")?;

        self.handle_line(&line)?;
        if self.status != GameStatus::Running {
            return Ok(());
        }

        let after = self.hooks.on_after_turn;
        after(self)?;
        if self.status == GameStatus::Running && !self.vm.game.functions.is_empty() {
            self.eval_function(0, &Sentence::default())?;
        }
        Ok(())
    }

    /// run plays turns until the game ends or input runs out
    pub fn run(&mut self) -> Result<GameStatus, GameError> {
        info!("starting {}", self.config.title);
        while self.status == GameStatus::Running {
            self.play_turn()?;
        }
        // Show the result of the final turn
        if self.status != GameStatus::Quit {
            self.update()?;
        }
        self.display.flush()?;
        Ok(self.status)
    }
}
