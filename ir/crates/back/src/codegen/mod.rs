use std::io::Write;

use tracing::debug;

use crate::{
    codegen::{
        emitter::{
            EmitConfig,
            Emitter,
        },
        frame::StackFrameCursor,
        register_allocator::RegisterPool,
        strings::{
            StringLabelTable,
            SymbolTable,
        },
    },
    error::Result,
};

pub mod emitter;
pub mod frame;
pub mod machine;
pub mod register_allocator;
pub mod strings;
pub mod targets;

/// State of one compilation run.
///
/// Build one per translation unit and pass it to every codegen call. Nothing is shared between
/// instances, so parallel compilations simply use separate contexts.
#[derive(Debug)]
pub struct Codegen<W: Write> {
    pub pool: RegisterPool,
    pub strings: StringLabelTable,
    pub frame: StackFrameCursor,
    pub emitter: Emitter<W>,
}

impl<W: Write> Codegen<W> {
    pub fn new(out: W, config: EmitConfig) -> Self {
        Self {
            pool: RegisterPool::new(),
            strings: StringLabelTable::new(),
            frame: StackFrameCursor::new(),
            emitter: Emitter::new(out, config),
        }
    }

    /// Emits the epilog and the string pool, then hands back the flushed output sink.
    pub fn finish(mut self, symbols: &impl SymbolTable) -> Result<W> {
        debug!(
            "Finishing compilation: {} lines emitted, {} registers still busy",
            self.emitter.lines(),
            self.pool.capacity() - self.pool.free_count()
        );
        self.pool.log_state();
        self.emitter.epilog()?;
        self.strings.finalize(symbols, &mut self.emitter)?;
        self.emitter.flush()?;
        Ok(self.emitter.into_inner())
    }
}
