use std::io::Write;

use crate::{
    codegen::{
        machine::{
            asm::AsmWriter,
            instr::{
                BinOp,
                Directive,
                Instr,
                Line,
            },
        },
        targets::mips::{
            PhysicalRegister,
            Syscall,
            ENTRY_LABEL,
            NEWLINE_LABEL,
        },
    },
    error::Result,
};

type MipsInstr = Instr<PhysicalRegister>;
type MipsLine = Line<PhysicalRegister>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitConfig {
    /// Precede every emitted sequence with a `#` comment describing it.
    pub annotate: bool,
}

impl EmitConfig {
    pub const fn annotated() -> Self {
        Self { annotate: true }
    }
}

/// Translates codegen requests into MIPS assembly text.
///
/// The emitter does not track register ownership; callers pass registers they checked out of
/// a [`RegisterPool`](crate::codegen::register_allocator::RegisterPool) or reserved registers
/// such as `$gp` and `$sp`.
#[derive(Debug)]
pub struct Emitter<W: Write> {
    writer: AsmWriter<W>,
    config: EmitConfig,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W, config: EmitConfig) -> Self {
        Self {
            writer: AsmWriter::new(out),
            config,
        }
    }

    /// `dest = lhs <op> rhs`
    pub fn op(
        &mut self,
        op: BinOp,
        dest: PhysicalRegister,
        lhs: PhysicalRegister,
        rhs: PhysicalRegister,
    ) -> Result<()> {
        self.annotate(|| format!("{dest} = {op} ({lhs},{rhs})"))?;
        self.emit(MipsInstr::Op { op, dest, lhs, rhs })
    }

    /// `dest = src <op> immediate`
    pub fn op_imm(
        &mut self,
        op: BinOp,
        dest: PhysicalRegister,
        src: PhysicalRegister,
        immediate: i32,
    ) -> Result<()> {
        self.annotate(|| format!("{dest} = {op} ({src} {immediate})"))?;
        self.emit(MipsInstr::OpImm {
            op,
            dest,
            src,
            immediate,
        })
    }

    /// `dest = *(base + offset)`
    pub fn lw(
        &mut self,
        dest: PhysicalRegister,
        base: PhysicalRegister,
        offset: i32,
    ) -> Result<()> {
        self.annotate(|| format!("{dest} = {base}[{offset}]"))?;
        self.emit(MipsInstr::Lw { dest, base, offset })
    }

    /// `*(base + offset) = src`
    pub fn sw(
        &mut self,
        src: PhysicalRegister,
        base: PhysicalRegister,
        offset: i32,
    ) -> Result<()> {
        self.annotate(|| format!("{base}[{offset}] = {src}"))?;
        self.emit(MipsInstr::Sw { src, base, offset })
    }

    pub fn li(&mut self, dest: PhysicalRegister, immediate: i32) -> Result<()> {
        self.annotate(|| format!("{dest} = {immediate}"))?;
        self.emit(MipsInstr::Li { dest, immediate })
    }

    /// Loads the address of a static datum.
    pub fn la(&mut self, dest: PhysicalRegister, label: &str) -> Result<()> {
        self.annotate(|| format!("{dest} = {label}"))?;
        self.emit(MipsInstr::La {
            dest,
            label: label.to_string(),
        })
    }

    /// Reads an integer from standard input into `dest`.
    pub fn read_int(&mut self, dest: PhysicalRegister) -> Result<()> {
        self.annotate(|| format!("{dest} = <stdin>"))?;
        self.syscall(Syscall::ReadInt)?;
        self.emit(MipsInstr::Move {
            dest,
            src: PhysicalRegister::V0,
        })
    }

    pub fn print_int(&mut self, value: i32) -> Result<()> {
        self.annotate(|| "print constant value".to_string())?;
        self.emit(MipsInstr::Li {
            dest: PhysicalRegister::A0,
            immediate: value,
        })?;
        self.syscall(Syscall::PrintInt)
    }

    /// Prints the integer held in `reg`. No newline follows.
    pub fn print_reg(&mut self, reg: PhysicalRegister) -> Result<()> {
        self.annotate(|| "print register content".to_string())?;
        self.emit(MipsInstr::Move {
            dest: PhysicalRegister::A0,
            src: reg,
        })?;
        self.syscall(Syscall::PrintInt)
    }

    /// Prints the string whose address is held in `reg`.
    pub fn print_string(&mut self, reg: PhysicalRegister) -> Result<()> {
        self.annotate(|| "print constant string".to_string())?;
        self.emit(MipsInstr::Move {
            dest: PhysicalRegister::A0,
            src: reg,
        })?;
        self.syscall(Syscall::PrintString)
    }

    pub fn print_newline(&mut self) -> Result<()> {
        self.annotate(|| "print new line".to_string())?;
        self.emit(MipsInstr::La {
            dest: PhysicalRegister::A0,
            label: NEWLINE_LABEL.to_string(),
        })?;
        self.syscall(Syscall::PrintString)
    }

    /// Data section with the newline literal, then the text section up to the entry point.
    pub fn prolog(&mut self) -> Result<()> {
        if self.config.annotate {
            self.emit(MipsLine::Banner("prolog".to_string()))?;
        }
        self.emit(Directive::Data)?;
        self.emit(MipsLine::Asciiz {
            label: NEWLINE_LABEL.to_string(),
            text: "\\n".to_string(),
        })?;
        self.emit(Directive::Text)?;
        self.emit(Directive::Globl(ENTRY_LABEL.to_string()))?;
        self.emit(MipsLine::LabeledInstr {
            label: ENTRY_LABEL.to_string(),
            instr: MipsInstr::Nop,
        })
    }

    /// Terminates the program.
    pub fn epilog(&mut self) -> Result<()> {
        self.annotate(|| "exit()ing the program".to_string())?;
        self.syscall(Syscall::Exit)
    }

    pub fn data_section(&mut self) -> Result<()> {
        self.emit(Directive::Data)
    }

    /// Declares a static string. `text` is emitted verbatim between double quotes.
    pub fn asciiz(&mut self, label: &str, text: &str) -> Result<()> {
        self.emit(MipsLine::Asciiz {
            label: label.to_string(),
            text: text.to_string(),
        })
    }

    pub fn syscall(&mut self, service: Syscall) -> Result<()> {
        self.emit(MipsInstr::Li {
            dest: PhysicalRegister::V0,
            immediate: service.code(),
        })?;
        self.emit(MipsInstr::Syscall)
    }

    pub fn emit(&mut self, line: impl Into<MipsLine>) -> Result<()> {
        self.writer.write_line(&line.into())
    }

    /// Number of lines emitted so far, comments included.
    pub fn lines(&self) -> usize {
        self.writer.lines()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()
    }

    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn annotate(&mut self, comment: impl FnOnce() -> String) -> Result<()> {
        if !self.config.annotate {
            return Ok(());
        }
        self.emit(MipsLine::Comment(comment()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn output(emitter: &Emitter<Vec<u8>>) -> Vec<String> {
        String::from_utf8(emitter.get_ref().clone())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn emitter() -> Emitter<Vec<u8>> {
        Emitter::new(Vec::new(), EmitConfig::default())
    }

    #[test]
    fn register_ops() {
        let mut emitter = emitter();
        emitter
            .op(
                BinOp::Sub,
                PhysicalRegister::T0,
                PhysicalRegister::T1,
                PhysicalRegister::S2,
            )
            .unwrap();
        emitter
            .op_imm(BinOp::Or, PhysicalRegister::T0, PhysicalRegister::T0, 255)
            .unwrap();
        assert_eq!(
            output(&emitter),
            ["\tsub $t0, $t1, $s2", "\tori $t0, $t0, 255"]
        );
        assert_eq!(emitter.lines(), 2);
    }

    #[test]
    fn memory_access() {
        let mut emitter = emitter();
        emitter
            .lw(PhysicalRegister::T4, PhysicalRegister::GP, 12)
            .unwrap();
        emitter
            .sw(PhysicalRegister::T4, PhysicalRegister::FP, -8)
            .unwrap();
        assert_eq!(
            output(&emitter),
            ["\tlw $t4, 12($gp)", "\tsw $t4, -8($fp)"]
        );
    }

    #[test]
    fn loads() {
        let mut emitter = emitter();
        emitter.li(PhysicalRegister::S0, -42).unwrap();
        emitter.la(PhysicalRegister::S1, "__str3").unwrap();
        assert_eq!(output(&emitter), ["\tli $s0, -42", "\tla $s1, __str3"]);
    }

    #[test]
    fn read_int_moves_result_out_of_v0() {
        let mut emitter = emitter();
        emitter.read_int(PhysicalRegister::T7).unwrap();
        assert_eq!(
            output(&emitter),
            ["\tli $v0, 5", "\tsyscall", "\tmove $t7, $v0"]
        );
    }

    #[test]
    fn print_sequences() {
        let mut emitter = emitter();
        emitter.print_int(7).unwrap();
        emitter.print_reg(PhysicalRegister::T2).unwrap();
        emitter.print_string(PhysicalRegister::T3).unwrap();
        emitter.print_newline().unwrap();
        assert_eq!(
            output(&emitter),
            [
                "\tli $a0, 7",
                "\tli $v0, 1",
                "\tsyscall",
                "\tmove $a0, $t2",
                "\tli $v0, 1",
                "\tsyscall",
                "\tmove $a0, $t3",
                "\tli $v0, 4",
                "\tsyscall",
                "\tla $a0, .newline",
                "\tli $v0, 4",
                "\tsyscall",
            ]
        );
    }

    #[test]
    fn load_print_newline_sequence() {
        let mut emitter = emitter();
        let r1 = PhysicalRegister::T0;
        emitter.li(r1, 5).unwrap();
        emitter.print_reg(r1).unwrap();
        emitter.print_newline().unwrap();
        assert_eq!(
            output(&emitter),
            [
                "\tli $t0, 5",
                "\tmove $a0, $t0",
                "\tli $v0, 1",
                "\tsyscall",
                "\tla $a0, .newline",
                "\tli $v0, 4",
                "\tsyscall",
            ]
        );
    }

    #[test]
    fn prolog_and_epilog() {
        let mut emitter = emitter();
        emitter.prolog().unwrap();
        emitter.epilog().unwrap();
        assert_eq!(
            output(&emitter),
            [
                ".data",
                ".newline: .asciiz \"\\n\"",
                ".text",
                ".globl main",
                "main: nop",
                "\tli $v0, 10",
                "\tsyscall",
            ]
        );
    }

    #[test]
    fn annotated_prolog_starts_with_flush_comment() {
        let mut emitter = Emitter::new(Vec::new(), EmitConfig::annotated());
        emitter.prolog().unwrap();
        assert_eq!(
            output(&emitter),
            [
                "# prolog",
                ".data",
                ".newline: .asciiz \"\\n\"",
                ".text",
                ".globl main",
                "main: nop",
            ]
        );
    }

    #[test]
    fn annotations_precede_sequences() {
        let mut emitter = Emitter::new(Vec::new(), EmitConfig::annotated());
        emitter
            .op(
                BinOp::Add,
                PhysicalRegister::T0,
                PhysicalRegister::T1,
                PhysicalRegister::T2,
            )
            .unwrap();
        emitter
            .lw(PhysicalRegister::T0, PhysicalRegister::GP, 4)
            .unwrap();
        emitter.print_newline().unwrap();
        emitter.epilog().unwrap();
        assert_eq!(
            output(&emitter),
            [
                "#\tt0 = add (t1,t2)",
                "\tadd $t0, $t1, $t2",
                "#\tt0 = gp[4]",
                "\tlw $t0, 4($gp)",
                "#\tprint new line",
                "\tla $a0, .newline",
                "\tli $v0, 4",
                "\tsyscall",
                "#\texit()ing the program",
                "\tli $v0, 10",
                "\tsyscall",
            ]
        );
    }

    #[test]
    fn write_errors_surface() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("sink closed"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut emitter = Emitter::new(Broken, EmitConfig::default());
        assert!(matches!(
            emitter.epilog(),
            Err(crate::error::CodegenError::Io(_))
        ));
        assert_eq!(emitter.lines(), 0);
    }
}
