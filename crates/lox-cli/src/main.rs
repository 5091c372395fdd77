use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lox_cli::driver::run_source;
use lox_parse::{parse_str, scan};
use std::io::{self, BufRead, Write};

/// Maximum source file size in bytes (1MB)
const MAX_SOURCE_SIZE: usize = 1_000_000;

/// Exit code for malformed input (sysexits EX_DATAERR)
const EXIT_DATA_ERROR: i32 = 65;

#[derive(Parser, Debug)]
#[command(name = "lox")]
#[command(about = "Lox expressions: scan, parse and evaluate")]
struct Cli {
    /// Starts the interactive prompt when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate the expression in a source file
    Run {
        /// Path to source file
        file: String,
    },

    /// Read and evaluate one expression per line
    Repl,

    /// Print the token stream of a source file
    Tokens {
        /// Path to source file
        file: String,
    },

    /// Parse a source file and dump the expression tree
    Parse {
        /// Path to source file
        file: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
}

#[derive(ValueEnum, Clone, Debug)]
enum Format {
    Pretty,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Repl) => cmd_repl(),
        Some(Commands::Run { file }) => cmd_run(&file),
        Some(Commands::Tokens { file }) => cmd_tokens(&file),
        Some(Commands::Parse { file, format }) => cmd_parse(&file, format),
    }
}

fn read_source(path: &str) -> Result<String> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read source file '{}'", path))?;

    if src.len() > MAX_SOURCE_SIZE {
        bail!(
            "source file exceeds {}MB limit ({} bytes)",
            MAX_SOURCE_SIZE / 1_000_000,
            src.len()
        );
    }

    Ok(src)
}

fn cmd_run(file: &str) -> Result<()> {
    let src = read_source(file)?;

    match run_source(&src) {
        Ok(value) => {
            println!("{}", value);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn cmd_repl() -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print!("> ");
    stdout.flush()?;

    for line in stdin.lock().lines() {
        match run_source(&line?) {
            Ok(value) => println!("{}", value),
            // errors end the line, not the session
            Err(e) => eprintln!("{}", e),
        }
        print!("> ");
        stdout.flush()?;
    }

    Ok(())
}

fn cmd_tokens(file: &str) -> Result<()> {
    let src = read_source(file)?;
    let (tokens, errors) = scan(&src);

    for token in &tokens {
        println!("{}", token);
    }
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{}", e);
        }
        std::process::exit(EXIT_DATA_ERROR);
    }
    Ok(())
}

fn cmd_parse(file: &str, format: Format) -> Result<()> {
    let src = read_source(file)?;

    let expr = match parse_str(&src) {
        Ok(expr) => expr,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(EXIT_DATA_ERROR);
        }
    };

    match format {
        Format::Pretty => println!("{}", expr),
        Format::Json => println!("{}", serde_json::to_string_pretty(&expr)?),
    }
    Ok(())
}
