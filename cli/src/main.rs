use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use latte_runtime::abi::{self, ENTRY_POINTS};
use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Latte runtime helper - prints what a compiler back end needs to link
/// against liblatte_runtime
#[derive(Parser)]
#[command(name = "latte-rt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log progress to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print LLVM `declare` lines for every runtime entry point
    Decls {
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Print a C header declaring every runtime entry point
    Header {
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// List exported symbols and the operation each implements
    Symbols,

    /// Generate shell completions for bash, zsh, fish, or powershell
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Decls { output } => emit(&abi::llvm_declarations(), output.as_deref()),
        Commands::Header { output } => emit(&abi::c_header(), output.as_deref()),
        Commands::Symbols => emit(&symbol_table(), None),
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn emit(text: &str, output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => {
            fs::write(path, text)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            tracing::info!(path = %path.display(), "wrote runtime declarations");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// One line per export: symbol, operation, and whether the caller frees the result
fn symbol_table() -> String {
    let width = ENTRY_POINTS
        .iter()
        .map(|entry| entry.symbol.len())
        .max()
        .unwrap_or(0);

    ENTRY_POINTS
        .iter()
        .map(|entry| {
            let note = if entry.returns_owned {
                "  (caller frees result)"
            } else if entry.noreturn {
                "  (does not return)"
            } else {
                ""
            };
            format!("{:<width$}  {}{}\n", entry.symbol, entry.operation, note)
        })
        .collect()
}

fn generate_completions(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
