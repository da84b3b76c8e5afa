use std::{
    fmt::{
        Display,
        Formatter,
    },
    io::Write,
};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    codegen::emitter::Emitter,
    error::{
        CodegenError,
        Result,
    },
};

/// Synthetic label of a string literal, rendered as `__str<N>`.
///
/// The `__str` prefix is outside the source language's identifier namespace, so labels never
/// collide with user symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StrLabel(u32);

impl StrLabel {
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl Display for StrLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "__str{}", self.0)
    }
}

/// Where string literal text is stored, keyed by label name.
pub trait SymbolTable {
    fn resolve(&self, name: &str) -> Option<&str>;
}

/// Hands out string literal labels for one compilation.
#[derive(Debug, Clone, Default)]
pub struct StringLabelTable {
    next: u32,
}

impl StringLabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign_next_label(&mut self) -> StrLabel {
        let label = StrLabel(self.next);
        self.next += 1;
        debug!("Assigned string label {label}");
        label
    }

    /// Number of labels assigned so far.
    pub fn len(&self) -> usize {
        self.next as usize
    }

    pub fn is_empty(&self) -> bool {
        self.next == 0
    }

    pub fn labels(&self) -> impl Iterator<Item = StrLabel> {
        (0..self.next).map(StrLabel)
    }

    /// Emits a data section declaring every assigned label, in label order.
    ///
    /// All labels are resolved before anything is written, so an unresolved label leaves the
    /// output untouched.
    pub fn finalize<W: Write>(
        &self,
        symbols: &impl SymbolTable,
        emitter: &mut Emitter<W>,
    ) -> Result<()> {
        let entries = self
            .labels()
            .map(|label| {
                symbols
                    .resolve(&label.to_string())
                    .map(|text| (label, text))
                    .ok_or(CodegenError::UnresolvedStringLabel(label))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!("Emitting {} string literals", entries.len());
        emitter.data_section()?;
        for (label, text) in entries {
            emitter.asciiz(&label.to_string(), text)?;
        }
        Ok(())
    }
}

/// In-memory symbol table for string literals.
#[derive(Debug, Clone, Default)]
pub struct LiteralTable {
    literals: FxHashMap<String, String>,
}

impl LiteralTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the next label to `text` and records it.
    pub fn intern(&mut self, labels: &mut StringLabelTable, text: impl Into<String>) -> StrLabel {
        let label = labels.assign_next_label();
        self.insert(label.to_string(), text);
        label
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.literals.insert(name.into(), text.into());
    }
}

impl SymbolTable for LiteralTable {
    fn resolve(&self, name: &str) -> Option<&str> {
        self.literals.get(name).map(String::as_str)
    }
}
