#![deny(clippy::enum_glob_use)]
#![warn(clippy::pedantic, clippy::nursery)]
#![forbid(unsafe_code)]
#![allow(clippy::too_many_lines)]

#[macro_use]
extern crate strum;

pub use codegen::{
    emitter::{
        EmitConfig,
        Emitter,
    },
    machine::BinOp,
    register_allocator::RegisterPool,
    strings::{
        LiteralTable,
        StrLabel,
        StringLabelTable,
        SymbolTable,
    },
    targets::mips::PhysicalRegister,
    Codegen,
};
pub use error::CodegenError;

pub mod codegen;
pub mod error;
