//! Command implementations for the `quillc` CLI.

use quill_diagnostic::{ColorMode, DiagnosticCode};
use quill_driver::{default_diagnostic_callback, Driver, DriverConfig, Verbosity};
use quill_ir::TokenPayload;

/// Options for the `tokenize` command.
pub struct TokenizeOptions {
    pub paths: Vec<String>,
    pub num_threads: usize,
    pub max_num_errors: usize,
    pub color: ColorMode,
    pub verbosity: Verbosity,
    /// Print every token instead of per-file summaries.
    pub dump: bool,
}

/// Load and tokenize a batch of files; print a per-file summary.
///
/// Returns the process exit code: zero iff no errors were diagnosed.
pub fn run_tokenize(options: &TokenizeOptions) -> i32 {
    let config = DriverConfig::default()
        .with_num_threads(options.num_threads)
        .with_max_num_errors(options.max_num_errors)
        .with_verbosity(options.verbosity);

    let driver = Driver::new(config, default_diagnostic_callback(options.color));

    if driver.is_multi_threaded() {
        driver.start_workers();
    }

    driver.load_files(options.paths.clone());
    if driver.is_multi_threaded() && !driver.has_hit_fail_condition() {
        driver.wait_for_all_tasks();
    }

    if !driver.has_hit_fail_condition() {
        driver.tokenize_loaded_files();
        if driver.is_multi_threaded() && !driver.has_hit_fail_condition() {
            driver.wait_for_all_tasks();
        }
    }

    driver.with_sources(|sources| {
        for source in sources.sources() {
            match source.token_buffer() {
                None => println!("{}: not tokenized", source.origin()),
                Some(buffer) => {
                    println!("{}: {} tokens", source.origin(), buffer.len());
                    if options.dump {
                        for id in buffer.iter_ids() {
                            let token = buffer.get(id);
                            let loc = token.location;
                            print!(
                                "  {:>4}  {}:{}  {}",
                                id.raw(),
                                loc.line_start,
                                loc.col_start,
                                token.kind
                            );
                            match token.payload {
                                TokenPayload::None => {}
                                TokenPayload::Bool(value) => print!("  {value}"),
                                TokenPayload::Int(value) => print!("  {value}"),
                                TokenPayload::Float(value) => print!("  {value}"),
                                TokenPayload::Str(_) => {
                                    print!("  {:?}", buffer.str_value(token).unwrap_or(""));
                                }
                            }
                            println!();
                        }
                    }
                }
            }
        }
    });

    let num_errors = driver.num_errors();
    if num_errors > 0 {
        eprintln!("quillc: {num_errors} error(s)");
        1
    } else {
        0
    }
}

/// Explain a diagnostic code by name.
pub fn explain_code(name: &str) -> i32 {
    match name.parse::<DiagnosticCode>() {
        Ok(code) => {
            println!("{code}: {}", code.description());
            0
        }
        Err(_) => {
            eprintln!("Unknown diagnostic code: {name}");
            eprintln!();
            eprintln!("Known codes:");
            for code in DiagnosticCode::ALL {
                eprintln!("  {code:<24} {}", code.description());
            }
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explain_knows_every_code() {
        for code in DiagnosticCode::ALL {
            assert_eq!(explain_code(code.as_str()), 0);
        }
    }

    #[test]
    fn explain_rejects_unknown_codes() {
        assert_eq!(explain_code("DefinitelyNotACode"), 1);
    }
}
