use std::fmt::{
    Display,
    Formatter,
};

use smallvec::{
    smallvec,
    SmallVec,
};
use strum::VariantArray;

use crate::codegen::machine::isa::PhysicalRegister;

/// Register-register arithmetic and logic opcodes.
///
/// The register-immediate form of each opcode is spelled with an `i` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, VariantArray, Display)]
#[strum(serialize_all = "lowercase")]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Xor,
    Or,
    And,
}

impl BinOp {
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub const fn imm_name(self) -> &'static str {
        match self {
            Self::Add => "addi",
            Self::Sub => "subi",
            Self::Mul => "muli",
            Self::Div => "divi",
            Self::Xor => "xori",
            Self::Or => "ori",
            Self::And => "andi",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstrOperand<R: PhysicalRegister> {
    Reg(R),
    Imm(i32),
    Label(String),
    /// `offset(base)`
    Mem { base: R, offset: i32 },
}

impl<R: PhysicalRegister> Display for InstrOperand<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reg(reg) => write!(f, "${}", reg.name()),
            Self::Imm(imm) => write!(f, "{imm}"),
            Self::Label(label) => write!(f, "{label}"),
            Self::Mem { base, offset } => write!(f, "{offset}(${})", base.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr<R: PhysicalRegister> {
    Op {
        op: BinOp,
        dest: R,
        lhs: R,
        rhs: R,
    },
    OpImm {
        op: BinOp,
        dest: R,
        src: R,
        immediate: i32,
    },
    Lw {
        dest: R,
        base: R,
        offset: i32,
    },
    Sw {
        src: R,
        base: R,
        offset: i32,
    },
    Li {
        dest: R,
        immediate: i32,
    },
    La {
        dest: R,
        label: String,
    },
    Move {
        dest: R,
        src: R,
    },
    Syscall,
    Nop,
}

impl<R: PhysicalRegister> Instr<R> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Op { op, .. } => op.name(),
            Self::OpImm { op, .. } => op.imm_name(),
            Self::Lw { .. } => "lw",
            Self::Sw { .. } => "sw",
            Self::Li { .. } => "li",
            Self::La { .. } => "la",
            Self::Move { .. } => "move",
            Self::Syscall => "syscall",
            Self::Nop => "nop",
        }
    }

    pub fn operands(&self) -> SmallVec<[InstrOperand<R>; 3]> {
        match self {
            Self::Op { dest, lhs, rhs, .. } => smallvec![
                InstrOperand::Reg(*dest),
                InstrOperand::Reg(*lhs),
                InstrOperand::Reg(*rhs),
            ],
            Self::OpImm {
                dest,
                src,
                immediate,
                ..
            } => smallvec![
                InstrOperand::Reg(*dest),
                InstrOperand::Reg(*src),
                InstrOperand::Imm(*immediate),
            ],
            Self::Lw { dest, base, offset } => smallvec![
                InstrOperand::Reg(*dest),
                InstrOperand::Mem {
                    base: *base,
                    offset: *offset,
                },
            ],
            Self::Sw { src, base, offset } => smallvec![
                InstrOperand::Reg(*src),
                InstrOperand::Mem {
                    base: *base,
                    offset: *offset,
                },
            ],
            Self::Li { dest, immediate } => {
                smallvec![InstrOperand::Reg(*dest), InstrOperand::Imm(*immediate)]
            }
            Self::La { dest, label } => {
                smallvec![InstrOperand::Reg(*dest), InstrOperand::Label(label.clone())]
            }
            Self::Move { dest, src } => {
                smallvec![InstrOperand::Reg(*dest), InstrOperand::Reg(*src)]
            }
            Self::Syscall | Self::Nop => smallvec![],
        }
    }
}

impl<R: PhysicalRegister> Display for Instr<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())?;
        for (index, operand) in self.operands().iter().enumerate() {
            if index == 0 {
                write!(f, " {operand}")?;
            } else {
                write!(f, ", {operand}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Data,
    Text,
    Globl(String),
}

impl Display for Directive {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Data => write!(f, ".data"),
            Self::Text => write!(f, ".text"),
            Self::Globl(symbol) => write!(f, ".globl {symbol}"),
        }
    }
}

/// One line of the assembly listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<R: PhysicalRegister> {
    Instr(Instr<R>),
    LabeledInstr { label: String, instr: Instr<R> },
    Directive(Directive),
    /// A null-terminated string in the data section. The text is emitted verbatim.
    Asciiz { label: String, text: String },
    /// An indented comment, `#<tab>text`.
    Comment(String),
    /// A flush comment, `# text`.
    Banner(String),
}

impl<R: PhysicalRegister> From<Instr<R>> for Line<R> {
    fn from(instr: Instr<R>) -> Self {
        Self::Instr(instr)
    }
}

impl<R: PhysicalRegister> From<Directive> for Line<R> {
    fn from(directive: Directive) -> Self {
        Self::Directive(directive)
    }
}

impl<R: PhysicalRegister> Display for Line<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instr(instr) => write!(f, "\t{instr}"),
            Self::LabeledInstr { label, instr } => write!(f, "{label}: {instr}"),
            Self::Directive(directive) => write!(f, "{directive}"),
            Self::Asciiz { label, text } => write!(f, "{label}: .asciiz \"{text}\""),
            Self::Comment(comment) => write!(f, "#\t{comment}"),
            Self::Banner(comment) => write!(f, "# {comment}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::targets::mips::PhysicalRegister;

    type MipsInstr = Instr<PhysicalRegister>;
    type MipsLine = Line<PhysicalRegister>;

    #[test]
    fn renders_register_register_op() {
        let instr = MipsInstr::Op {
            op: BinOp::Add,
            dest: PhysicalRegister::T2,
            lhs: PhysicalRegister::T0,
            rhs: PhysicalRegister::T1,
        };
        assert_eq!(instr.to_string(), "add $t2, $t0, $t1");
    }

    #[test]
    fn immediate_form_gets_suffix() {
        let expected = ["addi", "subi", "muli", "divi", "xori", "ori", "andi"];
        for (op, expected) in BinOp::VARIANTS.iter().zip(expected) {
            let instr = MipsInstr::OpImm {
                op: *op,
                dest: PhysicalRegister::S0,
                src: PhysicalRegister::S1,
                immediate: -3,
            };
            assert_eq!(instr.to_string(), format!("{expected} $s0, $s1, -3"));
        }
    }

    #[test]
    fn renders_memory_operands() {
        let lw = MipsInstr::Lw {
            dest: PhysicalRegister::T0,
            base: PhysicalRegister::GP,
            offset: 8,
        };
        let sw = MipsInstr::Sw {
            src: PhysicalRegister::T3,
            base: PhysicalRegister::SP,
            offset: -4,
        };
        assert_eq!(lw.to_string(), "lw $t0, 8($gp)");
        assert_eq!(sw.to_string(), "sw $t3, -4($sp)");
    }

    #[test]
    fn renders_lines() {
        let syscall: MipsLine = MipsInstr::Syscall.into();
        assert_eq!(syscall.to_string(), "\tsyscall");
        let entry = MipsLine::LabeledInstr {
            label: "main".to_string(),
            instr: MipsInstr::Nop,
        };
        assert_eq!(entry.to_string(), "main: nop");
        let globl: MipsLine = Directive::Globl("main".to_string()).into();
        assert_eq!(globl.to_string(), ".globl main");
        let string = MipsLine::Asciiz {
            label: "__str0".to_string(),
            text: "hi".to_string(),
        };
        assert_eq!(string.to_string(), "__str0: .asciiz \"hi\"");
        let comment = MipsLine::Comment("print new line".to_string());
        assert_eq!(comment.to_string(), "#\tprint new line");
        let banner = MipsLine::Banner("prolog".to_string());
        assert_eq!(banner.to_string(), "# prolog");
    }
}
