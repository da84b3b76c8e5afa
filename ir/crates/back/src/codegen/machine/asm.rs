use std::io::Write;

use crate::{
    codegen::machine::{
        instr::Line,
        isa::PhysicalRegister,
    },
    error::Result,
};

/// Writes rendered assembly lines to an output sink.
///
/// Buffering is left to the sink; wrap files in a `BufWriter`.
#[derive(Debug)]
pub struct AsmWriter<W: Write> {
    out: W,
    lines: usize,
}

impl<W: Write> AsmWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, lines: 0 }
    }

    pub fn write_line<R: PhysicalRegister>(&mut self, line: &Line<R>) -> Result<()> {
        writeln!(self.out, "{line}")?;
        self.lines += 1;
        Ok(())
    }

    /// Number of lines written so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
