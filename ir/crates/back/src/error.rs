use std::io;

use thiserror::Error;

use crate::codegen::strings::StrLabel;

/// Fatal code generation errors.
///
/// None of these can be recovered from by retrying: they signal either the fixed register set
/// running out or a caller breaking the allocation protocol.
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("no more registers available")]
    PoolExhausted,

    /// A register that the pool does not manage was freed, or a raw index did not name a register.
    #[error("register index is not an allocatable register. Index = {index}")]
    InvalidRegisterUse { index: u32 },

    /// An allocatable register was freed while it was already free.
    #[error("register ${name} was not allocated")]
    DoubleFree { name: &'static str, index: u32 },

    #[error("string literal {0} was never recorded in the symbol table")]
    UnresolvedStringLabel(StrLabel),

    #[error("failed to write assembly: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = CodegenError> = std::result::Result<T, E>;
