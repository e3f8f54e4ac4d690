use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use filmi_ast::ast::Program;

/// Maximum source file size in bytes (1MB)
const MAX_SOURCE_SIZE: usize = 1_000_000;

#[derive(Parser, Debug)]
#[command(name = "filmi")]
#[command(about = "Filmi: a tiny scripting language with Bollywood-flavoured keywords")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a Filmi program
    Run {
        /// Path to .filmi source file
        file: String,
    },

    /// Parse a source file and dump the AST
    Parse {
        /// Path to .filmi source file
        file: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },

    /// Tokenize a source file and dump the token stream
    Lex {
        /// Path to .filmi source file
        file: String,
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
        Commands::Run { file } => cmd_run(&file),
        Commands::Parse { file, format } => cmd_parse(&file, format),
        Commands::Lex { file } => cmd_lex(&file),
    }
}

fn load_source(path: &str) -> Result<String> {
    let src = std::fs::read_to_string(path)?;
    if src.len() > MAX_SOURCE_SIZE {
        anyhow::bail!(
            "source file exceeds {}MB limit ({} bytes)",
            MAX_SOURCE_SIZE / 1_000_000,
            src.len()
        );
    }
    Ok(src)
}

fn cmd_run(file: &str) -> Result<()> {
    let src = load_source(file)?;
    match filmi_cli::run(&src) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn parse_and_check(src: &str) -> Result<Program, filmi_cli::Error> {
    let tokens = filmi_parse::tokenize(src)?;
    let program = filmi_parse::parse(&tokens)?;
    filmi_sema::analyze(&program)?;
    Ok(program)
}

fn cmd_parse(file: &str, format: Format) -> Result<()> {
    let src = load_source(file)?;
    let program = match parse_and_check(&src) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    match format {
        Format::Pretty => println!("{program:#?}"),
        Format::Json => println!("{}", serde_json::to_string_pretty(&program)?),
    }
    Ok(())
}

fn cmd_lex(file: &str) -> Result<()> {
    let src = load_source(file)?;
    match filmi_parse::tokenize(&src) {
        Ok(toks) => {
            for t in toks {
                println!("{:>4}:{:<4} {:?} {:?}", t.line, t.column, t.kind, t.lexeme);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", filmi_cli::Error::Lex(e));
            std::process::exit(1);
        }
    }
}
