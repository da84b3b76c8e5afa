use strum::VariantArray;

use crate::{
    codegen::machine::isa::PhysicalRegister as MachPhysicalRegister,
    error::{
        CodegenError,
        Result,
    },
};

/// Label of the newline literal declared by the prolog.
pub const NEWLINE_LABEL: &str = ".newline";

/// Program entry point.
pub const ENTRY_LABEL: &str = "main";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, VariantArray, Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum PhysicalRegister {
    /// Hardwired to zero.
    Zero,
    /// Reserved for the assembler.
    AT,
    V0,
    V1,
    A0,
    A1,
    A2,
    A3,
    T0,
    T1,
    T2,
    T3,
    T4,
    T5,
    T6,
    T7,
    S0,
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    T8,
    T9,
    K0,
    K1,
    GP,
    SP,
    FP,
    RA,
}

impl MachPhysicalRegister for PhysicalRegister {
    fn name(&self) -> &'static str {
        self.into()
    }

    fn index(&self) -> u32 {
        *self as u32
    }

    fn all() -> &'static [Self] {
        Self::VARIANTS
    }

    fn is_allocatable(&self) -> bool {
        matches!(
            self,
            Self::T0
                | Self::T1
                | Self::T2
                | Self::T3
                | Self::T4
                | Self::T5
                | Self::T6
                | Self::T7
                | Self::S0
                | Self::S1
                | Self::S2
                | Self::S3
                | Self::S4
                | Self::S5
                | Self::S6
                | Self::S7
                | Self::T8
                | Self::T9
        )
    }
}

impl TryFrom<u32> for PhysicalRegister {
    type Error = CodegenError;

    fn try_from(index: u32) -> Result<Self> {
        Self::from_index(index)
    }
}

/// SPIM/MARS syscall services, selected through `$v0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Syscall {
    PrintInt = 1,
    PrintString = 4,
    ReadInt = 5,
    Exit = 10,
}

impl Syscall {
    pub const fn code(self) -> i32 {
        self as i32
    }
}
