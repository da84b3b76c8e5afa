pub use asm::AsmWriter;
pub use instr::{
    BinOp,
    Directive,
    Instr,
    InstrOperand,
    Line,
};
pub use isa::PhysicalRegister;

pub mod asm;
pub mod instr;
pub mod isa;
