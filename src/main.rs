use diylisp::parser::is_incomplete;
use diylisp::{Environment, EvalConfig, Interpreter};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Only installs a subscriber when `RUST_LOG` is set, e.g.
/// `RUST_LOG=diylisp=trace`.
fn init_tracing() {
    if env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".diylisp_history"))
}

fn repl(config: EvalConfig) -> Result<(), ReadlineError> {
    let env = Environment::new();
    let mut interp = Interpreter::new(config);
    let mut rl = DefaultEditor::new()?;
    let history = history_path();
    if let Some(path) = &history {
        // A missing history file is normal on first run
        let _ = rl.load_history(path);
    }

    println!("diylisp REPL");
    println!("Type expressions to evaluate, or (exit) to quit");
    println!();

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() { "> " } else { "... " };
        let line = match rl.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e),
        };

        buffer.push_str(&line);
        buffer.push('\n');
        if is_incomplete(&buffer) {
            continue;
        }

        let input = std::mem::take(&mut buffer);
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        rl.add_history_entry(input)?;

        if input == "(exit)" || input == "exit" {
            break;
        }

        match interp.eval_source(input, &env) {
            Ok(Some(result)) => println!("{result}"),
            Ok(None) => {}
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    if let Some(path) = &history {
        if let Err(e) = rl.save_history(path) {
            tracing::warn!(error = %e, "could not save history");
        }
    }
    Ok(())
}

fn run_file(filename: &str, config: EvalConfig) -> Result<(), String> {
    let contents = fs::read_to_string(filename)
        .map_err(|e| format!("Failed to read file '{filename}': {e}"))?;

    let env = Environment::new();
    let mut interp = Interpreter::new(config);
    match interp.eval_source(&contents, &env) {
        Ok(Some(result)) => {
            println!("{result}");
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => Err(format!("Error: {e}")),
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  diylisp [--max-depth N]              Start interactive REPL");
    eprintln!("  diylisp [--max-depth N] <file.lisp>  Run a Lisp file");
    eprintln!("  diylisp --help                       Show this help message");
    eprintln!();
    eprintln!("DIYLISP_MAX_DEPTH sets the default evaluation depth limit.");
}

fn main() {
    init_tracing();

    let mut config = EvalConfig::from_env();
    let mut file = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return;
            }
            "--max-depth" => match args.next() {
                Some(raw) => config = config.with_depth_str(&raw),
                None => {
                    eprintln!("Error: --max-depth needs a value");
                    print_usage();
                    process::exit(1);
                }
            },
            _ if file.is_none() => file = Some(arg.clone()),
            _ => {
                eprintln!("Error: Too many arguments");
                print_usage();
                process::exit(1);
            }
        }
    }

    match file {
        Some(filename) => {
            if let Err(e) = run_file(&filename, config) {
                eprintln!("{e}");
                process::exit(1);
            }
        }
        None => {
            if let Err(e) = repl(config) {
                eprintln!("REPL error: {e}");
                process::exit(1);
            }
        }
    }
}
