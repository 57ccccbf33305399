#![crate_name = "comprehend"]

pub mod action;
pub mod config;
pub mod dictionary;
pub mod disassembler;
pub mod display_headless;
pub mod display_manager;
pub mod display_terminal;
pub mod display_trait;
pub mod error;
pub mod game;
pub mod header;
pub mod hooks;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod object;
pub mod opcode_tables;
pub mod opcodes_display;
pub mod opcodes_math;
pub mod opcodes_object;
pub mod runtime_parser;
pub mod strings;
pub mod test_utils;
pub mod text;
pub mod titles;
pub mod util;
pub mod vm;
pub mod zrand;

#[cfg(test)]
mod call_tests;
#[cfg(test)]
mod dictionary_tests;
#[cfg(test)]
mod opcode_tests;
