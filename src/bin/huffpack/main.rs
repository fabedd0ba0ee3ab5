mod progress;

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{bail, WrapErr};
use console::{style, Term};
use huffpack::huffman::tree_serializer;
use huffpack::{CompressedPayload, Symbol};
use indicatif::HumanBytes;
use progress::ProgressMonitor;
use tracing::info;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;

/// Extension added by `compress` and stripped by `decompress`.
const EXTENSION: &str = "huff";

#[derive(Parser)]
#[command(name = "huffpack", version)]
#[command(about = "Deterministic Huffman compression", long_about = None)]
struct Cli {
    /// Log more, repeat for even more
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

/// What a symbol is. The format does not record this, so compress and
/// decompress must agree on it.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Default)]
enum SymbolMode {
    #[default]
    #[clap(help = "Every byte is a symbol, works for any file.")]
    Bytes,
    #[clap(help = "Every character is a symbol, the input must be UTF-8.")]
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file, writing <INPUT>.huff by default
    Compress {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t)]
        symbols: SymbolMode,
        /// Overwrite the output if it exists
        #[arg(short, long)]
        force: bool,
    },
    /// Decompress a file, stripping the .huff extension by default
    Decompress {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t)]
        symbols: SymbolMode,
        /// Overwrite the output if it exists
        #[arg(short, long)]
        force: bool,
    },
    /// Print the header fields and code table of a compressed file
    Inspect {
        input: PathBuf,
        #[arg(long, value_enum, default_value_t)]
        symbols: SymbolMode,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Compress {
            input,
            output,
            symbols,
            force,
        } => {
            let output = output.unwrap_or_else(|| {
                let mut name = input.clone().into_os_string();
                name.push(".");
                name.push(EXTENSION);
                PathBuf::from(name)
            });
            compress(&input, &output, symbols, force)
        }
        Commands::Decompress {
            input,
            output,
            symbols,
            force,
        } => {
            let output = match output {
                Some(output) => output,
                None if input.extension().map_or(false, |ext| ext == EXTENSION) => {
                    input.with_extension("")
                }
                None => input.with_extension("out"),
            };
            decompress(&input, &output, symbols, force)
        }
        Commands::Inspect { input, symbols } => inspect(&input, symbols),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(indicatif_layer.get_stderr_writer()),
        )
        .with(indicatif_layer)
        .with(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();
}

fn read_input(path: &Path) -> color_eyre::Result<Vec<u8>> {
    let file = File::open(path).wrap_err_with(|| format!("failed to open {}", path.display()))?;
    let size = file.metadata()?.len() as usize;
    let mut reader = ProgressMonitor::new(file, size);
    let mut data = Vec::with_capacity(size);
    reader
        .read_to_end(&mut data)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    Ok(data)
}

fn write_output(path: &Path, data: &[u8], force: bool) -> color_eyre::Result<()> {
    if path.exists() && !force {
        bail!("{} already exists, use --force to overwrite it", path.display());
    }
    let mut file =
        File::create(path).wrap_err_with(|| format!("failed to create {}", path.display()))?;
    file.write_all(data)?;
    Ok(())
}

fn compress(input: &Path, output: &Path, symbols: SymbolMode, force: bool) -> color_eyre::Result<()> {
    let data = read_input(input)?;
    let (compressed, symbol_count, bit_length) = match symbols {
        SymbolMode::Bytes => {
            let payload = huffpack::compress_to_payload(&data[..])?;
            (payload.to_bytes(), data.len(), payload.header().bit_length)
        }
        SymbolMode::Text => {
            let text = std::str::from_utf8(&data)
                .wrap_err("input is not valid UTF-8, use --symbols bytes")?;
            let chars: Vec<char> = text.chars().collect();
            let payload = huffpack::compress_to_payload(&chars)?;
            (payload.to_bytes(), chars.len(), payload.header().bit_length)
        }
    };
    write_output(output, &compressed, force)?;
    info!(
        "{} -> {}: {}",
        input.display(),
        output.display(),
        summary(data.len(), compressed.len(), symbol_count, bit_length)
    );
    Ok(())
}

/// Sizes, ratio and average code length, e.g. `13 B -> 9 B (69.2%), 2.85 bits per symbol`.
fn summary(input_size: usize, output_size: usize, symbols: usize, bit_length: u32) -> String {
    let mut line = format!(
        "{} -> {}",
        HumanBytes(input_size as u64),
        HumanBytes(output_size as u64)
    );
    if input_size > 0 {
        line += &format!(
            " ({:.1}%)",
            output_size as f64 * 100.0 / input_size as f64
        );
    }
    if symbols > 0 {
        line += &format!(
            ", {:.2} bits per symbol",
            f64::from(bit_length) / symbols as f64
        );
    }
    line
}

fn decompress(
    input: &Path,
    output: &Path,
    symbols: SymbolMode,
    force: bool,
) -> color_eyre::Result<()> {
    let data = read_input(input)?;
    let decompressed = match symbols {
        SymbolMode::Bytes => huffpack::decompress::<u8>(&data),
        SymbolMode::Text => huffpack::decompress_str(&data).map(String::into_bytes),
    }
    .wrap_err_with(|| format!("{} is not a valid {:?} payload", input.display(), symbols))?;
    write_output(output, &decompressed, force)?;
    info!(
        "{} -> {}: {} -> {}",
        input.display(),
        output.display(),
        HumanBytes(data.len() as u64),
        HumanBytes(decompressed.len() as u64)
    );
    Ok(())
}

fn inspect(input: &Path, symbols: SymbolMode) -> color_eyre::Result<()> {
    let data = read_input(input)?;
    let term = Term::stdout();
    match symbols {
        SymbolMode::Bytes => {
            let payload = CompressedPayload::<u8>::from_bytes(&data)?;
            print_payload(&term, &payload, |byte| {
                if byte.is_ascii_graphic() {
                    format!("0x{:02X} '{}'", byte, byte as char)
                } else {
                    format!("0x{:02X}", byte)
                }
            })
        }
        SymbolMode::Text => {
            let payload = CompressedPayload::<char>::from_bytes(&data)?;
            print_payload(&term, &payload, |c| format!("U+{:04X} {:?}", u32::from(c), c))
        }
    }
}

fn print_payload<S: Symbol>(
    term: &Term,
    payload: &CompressedPayload<S>,
    fmt_symbol: impl Fn(S) -> String,
) -> color_eyre::Result<()> {
    let header = payload.header();
    let tree = match payload.tree() {
        Some(tree) => tree,
        None => {
            term.write_line(&format!("{} empty input", style("flag:").bold()))?;
            return Ok(());
        }
    };

    term.write_line(&format!("{} content", style("flag:").bold()))?;
    term.write_line(&format!("{} {}", style("bit length:").bold(), header.bit_length))?;
    term.write_line(&format!(
        "{} {} symbols, depth {}, {} bytes",
        style("tree:").bold(),
        tree.symbol_count(),
        tree.depth(),
        tree_serializer::serialize(tree).len()
    ))?;
    term.write_line(&format!(
        "{} {} bytes",
        style("payload:").bold(),
        payload.packed().len()
    ))?;

    let mut codes: Vec<_> = tree.codes().iter().collect();
    codes.sort_by_key(|(symbol, code)| (code.len(), code.bits(), *symbol));
    term.write_line(&style("codes:").bold().to_string())?;
    for (symbol, code) in codes {
        term.write_line(&format!(
            "  {:<20} {}",
            fmt_symbol(symbol),
            style(code).green()
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::summary;

    #[test]
    fn summary_reports_ratio_and_code_length() {
        assert_eq!(
            summary(12, 9, 12, 30),
            "12 B -> 9 B (75.0%), 2.50 bits per symbol"
        );
        assert_eq!(summary(0, 1, 0, 0), "0 B -> 1 B");
    }
}
