use std::fmt::{
    Display,
    Formatter,
};

use tracing::{
    debug,
    trace,
};

use crate::{
    codegen::{
        machine::isa::PhysicalRegister,
        targets::mips,
    },
    error::{
        CodegenError,
        Result,
    },
};

/// Hands out the allocatable physical registers of a target and takes them back.
///
/// There is no spilling: running out of registers is fatal. The search for a free register
/// starts at the register touched last (by either [`RegisterPool::allocate`] or
/// [`RegisterPool::free`]) and walks forward through the allocatable registers, wrapping around
/// once.
#[derive(Debug, Clone)]
pub struct RegisterPool<R: PhysicalRegister = mips::PhysicalRegister> {
    /// Allocatable registers in catalog order. The cursor is a position in this list.
    allocatable: Vec<R>,
    /// Busy flag per catalog register, indexed by hardware number.
    /// Reserved registers are permanently busy.
    busy: Vec<bool>,
    free_count: usize,
    cursor: usize,
}

impl<R: PhysicalRegister> RegisterPool<R> {
    pub fn new() -> Self {
        let allocatable = R::allocatable().collect::<Vec<_>>();
        let busy = R::all().iter().map(|reg| !reg.is_allocatable()).collect();
        debug!("Available registers: {:?}", allocatable);
        Self {
            free_count: allocatable.len(),
            allocatable,
            busy,
            cursor: 0,
        }
    }

    /// Checks out a free register and marks it busy.
    pub fn allocate(&mut self) -> Result<R> {
        if self.free_count == 0 {
            debug!("Register pool exhausted");
            return Err(CodegenError::PoolExhausted);
        }
        let start = self.cursor;
        let mut position = start;
        loop {
            let reg = self.allocatable[position];
            let busy = &mut self.busy[reg.index() as usize];
            if !*busy {
                *busy = true;
                self.free_count -= 1;
                self.cursor = position;
                debug!(
                    "Allocated register {} ({} free)",
                    reg.name(),
                    self.free_count
                );
                return Ok(reg);
            }
            position = (position + 1) % self.allocatable.len();
            if position == start {
                break;
            }
        }
        // free_count claimed a free register but the scan found none.
        debug!("No free register found even though {} are counted as free", self.free_count);
        Err(CodegenError::PoolExhausted)
    }

    /// Returns a register to the pool.
    ///
    /// Freeing a reserved register is rejected with [`CodegenError::InvalidRegisterUse`].
    /// Freeing a register twice is rejected with [`CodegenError::DoubleFree`]: it most likely
    /// means the wrong register is being freed.
    pub fn free(&mut self, reg: R) -> Result<()> {
        let Some(position) = self.position_of(reg) else {
            return Err(CodegenError::InvalidRegisterUse { index: reg.index() });
        };
        let busy = &mut self.busy[reg.index() as usize];
        if !*busy {
            return Err(CodegenError::DoubleFree {
                name: reg.name(),
                index: reg.index(),
            });
        }
        *busy = false;
        self.free_count += 1;
        self.cursor = position;
        debug!("Freed register {} ({} free)", reg.name(), self.free_count);
        Ok(())
    }

    /// Frees a register given by its raw hardware number.
    pub fn free_index(&mut self, index: u32) -> Result<()> {
        self.free(R::from_index(index)?)
    }

    pub fn is_free(&self, reg: R) -> bool {
        !self.busy[reg.index() as usize]
    }

    /// Number of allocatable registers currently free.
    pub fn free_count(&self) -> usize {
        self.free_count
    }

    /// Number of allocatable registers.
    pub fn capacity(&self) -> usize {
        self.allocatable.len()
    }

    /// The register the next allocation starts searching from.
    pub fn cursor(&self) -> Option<R> {
        self.allocatable.get(self.cursor).copied()
    }

    pub fn log_state(&self) {
        trace!("Register names and status:\n{self}");
    }

    fn position_of(&self, reg: R) -> Option<usize> {
        self.allocatable.iter().position(|allocatable| *allocatable == reg)
    }
}

impl<R: PhysicalRegister> Default for RegisterPool<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: PhysicalRegister> Display for RegisterPool<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for reg in R::all() {
            let state = if self.is_free(*reg) { "free" } else { "busy" };
            writeln!(f, "{} is {}", reg.name(), state)?;
        }
        Ok(())
    }
}
