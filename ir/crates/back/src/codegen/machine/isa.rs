use std::{
    fmt::{
        Debug,
        Display,
    },
    hash::Hash,
};

use crate::error::{
    CodegenError,
    Result,
};

pub trait PhysicalRegister:
    Debug + Display + Clone + Copy + PartialEq + Eq + Hash + Sized + 'static
{
    /// The name used in emitted assembly, without the `$` sigil.
    fn name(&self) -> &'static str;

    /// The hardware register number.
    fn index(&self) -> u32;

    /// Every register of the target, ordered by [`PhysicalRegister::index`].
    fn all() -> &'static [Self];

    /// Whether the register pool may hand this register out.
    ///
    /// Reserved registers (zero, stack pointer, syscall arguments, ...) can still be
    /// referenced by emitted code, they are just never allocated.
    fn is_allocatable(&self) -> bool;

    /// Looks a register up by its hardware number.
    fn from_index(index: u32) -> Result<Self> {
        Self::all()
            .get(index as usize)
            .copied()
            .ok_or(CodegenError::InvalidRegisterUse { index })
    }

    fn allocatable() -> impl Iterator<Item = Self> {
        Self::all().iter().copied().filter(Self::is_allocatable)
    }
}
