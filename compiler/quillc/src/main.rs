//! Quill compiler CLI.
//!
//! Drives the staged front-end pipeline: load a batch of files, tokenize
//! them, report diagnostics.

mod commands;
mod tracing_setup;

use quill_diagnostic::ColorMode;
use quill_driver::{suggested_num_threads, Verbosity};

use commands::TokenizeOptions;

fn main() {
    tracing_setup::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "tokenize" => {
            let options = match parse_tokenize_options(&args[2..]) {
                Ok(options) => options,
                Err(message) => {
                    eprintln!("{message}");
                    eprintln!("Usage: quillc tokenize <files...> [options]");
                    std::process::exit(1);
                }
            };
            std::process::exit(commands::run_tokenize(&options));
        }
        "explain" | "--explain" => {
            if args.len() < 3 {
                eprintln!("Usage: quillc explain <CODE>");
                eprintln!("Example: quillc explain MiscLoadFileFailed");
                std::process::exit(1);
            }
            std::process::exit(commands::explain_code(&args[2]));
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("Quill Compiler {}", env!("CARGO_PKG_VERSION"));
        }
        unknown => {
            eprintln!("Unknown command: {unknown}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn parse_tokenize_options(args: &[String]) -> Result<TokenizeOptions, String> {
    let mut options = TokenizeOptions {
        paths: Vec::new(),
        num_threads: 0,
        max_num_errors: 20,
        color: ColorMode::Auto,
        verbosity: Verbosity::Normal,
        dump: false,
    };

    for arg in args {
        if let Some(value) = arg.strip_prefix("--threads=") {
            options.num_threads = if value == "auto" {
                suggested_num_threads()
            } else {
                value
                    .parse()
                    .map_err(|_| format!("Invalid --threads value: {value}"))?
            };
        } else if let Some(value) = arg.strip_prefix("--max-errors=") {
            options.max_num_errors = value
                .parse()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| format!("Invalid --max-errors value: {value}"))?;
        } else if let Some(value) = arg.strip_prefix("--color=") {
            options.color = match value {
                "auto" => ColorMode::Auto,
                "always" => ColorMode::Always,
                "never" => ColorMode::Never,
                _ => return Err(format!("Invalid --color value: {value}")),
            };
        } else if arg == "--verbose" || arg == "-v" {
            options.verbosity = Verbosity::Verbose;
        } else if arg == "--trace" {
            options.verbosity = Verbosity::Trace;
        } else if arg == "--dump" {
            options.dump = true;
        } else if arg.starts_with('-') {
            return Err(format!("Unknown option: {arg}"));
        } else {
            options.paths.push(arg.clone());
        }
    }

    if options.paths.is_empty() {
        return Err("No input files".to_string());
    }
    Ok(options)
}

fn print_usage() {
    println!("Quill Compiler");
    println!();
    println!("Usage: quillc <command> [options]");
    println!();
    println!("Commands:");
    println!("  tokenize <files...>  Load and tokenize source files");
    println!("  explain <CODE>       Explain a diagnostic code");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Tokenize options:");
    println!("  --threads=<n|auto>   Worker pool size (default: single-threaded)");
    println!("  --max-errors=<n>     Error budget before giving up (default: 20)");
    println!("  --color=<mode>       Color output: auto, always, never");
    println!("  --verbose, -v        Deliver driver debug diagnostics");
    println!("  --trace              Deliver per-task trace diagnostics");
    println!("  --dump               Print every token, not just counts");
    println!();
    println!("Examples:");
    println!("  quillc tokenize main.ql lib.ql");
    println!("  quillc tokenize src/*.ql --threads=auto");
    println!("  quillc tokenize main.ql --dump");
    println!("  quillc explain MiscFileDoesNotExist");
}
