use std::{
    fs::File,
    io::{
        self,
        BufWriter,
        Write,
    },
    path::PathBuf,
};

use anyhow::{
    Context,
    Result,
};
use clap::Parser;
use cminus_back::{
    BinOp,
    Codegen,
    EmitConfig,
    LiteralTable,
    PhysicalRegister,
};
use tracing::{
    debug,
    Level,
};

#[derive(Parser, Debug)]
#[clap(name = "cminus")]
#[command(version, about = "Emits a sample MIPS program through the cminus backend")]
struct Args {
    /// Where to write the assembly (defaults to stdout)
    #[arg(short, long, value_parser = valid_output_file_extension)]
    output: Option<PathBuf>,

    /// Precede every emitted sequence with a comment describing it
    #[arg(long)]
    annotate: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn valid_output_file_extension(file_path: &str) -> Result<PathBuf, String> {
    let file_path = PathBuf::from(file_path);
    let extension = file_path.extension().ok_or("No file extension")?;
    if extension != "s" && extension != "asm" {
        return Err(format!(
            "Invalid file extension: {} (expected .s or .asm)",
            extension.to_string_lossy()
        ));
    }
    Ok(file_path)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
    let config = EmitConfig {
        annotate: args.annotate,
    };
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            emit_sample(BufWriter::new(file), config)?;
            debug!("Wrote {}", path.display());
        }
        None => {
            emit_sample(io::stdout().lock(), config)?;
        }
    }
    Ok(())
}

/// Prints `result: ` followed by `(1 + 2) * 3`.
fn emit_sample<W: Write>(out: W, config: EmitConfig) -> Result<W> {
    let start = std::time::Instant::now();
    let mut cg = Codegen::new(out, config);
    let mut symbols = LiteralTable::new();
    cg.emitter.prolog()?;

    let r1 = cg.pool.allocate()?;
    let r2 = cg.pool.allocate()?;
    let result = cg.pool.allocate()?;
    cg.emitter.li(r1, 1)?;
    cg.emitter.li(r2, 2)?;
    cg.emitter.op(BinOp::Add, result, r1, r2)?;
    cg.pool.free(r1)?;
    cg.pool.free(r2)?;

    let r1 = cg.pool.allocate()?;
    cg.emitter.li(r1, 3)?;
    cg.emitter.op(BinOp::Mul, result, result, r1)?;
    cg.pool.free(r1)?;

    let slot = cg.frame.advance(4);
    cg.emitter.sw(result, PhysicalRegister::GP, slot)?;

    let label = symbols.intern(&mut cg.strings, "result: ");
    let address = cg.pool.allocate()?;
    cg.emitter.la(address, &label.to_string())?;
    cg.emitter.print_string(address)?;
    cg.pool.free(address)?;

    cg.emitter.lw(result, PhysicalRegister::GP, slot)?;
    cg.emitter.print_reg(result)?;
    cg.emitter.print_newline()?;
    cg.pool.free(result)?;

    let out = cg
        .finish(&symbols)
        .context("Failed to finish the sample program")?;
    debug!("Took {:?} to emit the sample program", start.elapsed());
    Ok(out)
}
