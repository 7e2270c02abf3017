// arcstd-cli: shared utilities for CLI tools.

use std::io::{self, Read};
use std::path::Path;
use std::process;

use arcstd_core::conllu::{parse_conllu, read_conllu};
use arcstd_core::{ParserConfig, Sentence};
use tracing_subscriber::EnvFilter;

/// Environment variable pointing at a default config file.
const CONFIG_ENV: &str = "ARCSTD_CONFIG";

/// Install a stderr log subscriber filtered by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Parse a `--name=VALUE`, `--name VALUE` or `-s VALUE` option from
/// command line args.
///
/// Returns `(value, remaining_args)`; the last occurrence wins.
pub fn take_option(args: &[String], long: &str, short: &str) -> (Option<String>, Vec<String>) {
    let mut value = None;
    let mut remaining = Vec::new();
    let mut skip_next = false;
    let prefix = format!("{long}=");

    for (i, arg) in args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if let Some(val) = arg.strip_prefix(&prefix) {
            value = Some(val.to_string());
        } else if arg == long || arg == short {
            if i + 1 < args.len() {
                value = Some(args[i + 1].clone());
                skip_next = true;
            } else {
                fatal(&format!("{arg} requires a value"));
            }
        } else {
            remaining.push(arg.clone());
        }
    }

    (value, remaining)
}

/// Remove a boolean flag from the args, returning whether it was present.
pub fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|a| a != flag);
    args.len() != before
}

/// Load the parser configuration.
///
/// Search order:
/// 1. `path` argument (if provided)
/// 2. `ARCSTD_CONFIG` environment variable
/// 3. built-in defaults
pub fn load_config(path: Option<&str>) -> Result<ParserConfig, String> {
    let env_path = std::env::var(CONFIG_ENV).ok();
    match path.or(env_path.as_deref()) {
        Some(p) => ParserConfig::load(Path::new(p)).map_err(|e| e.to_string()),
        None => Ok(ParserConfig::default()),
    }
}

/// Read a CoNLL-U corpus from a file, or from stdin when `path` is `None`
/// or `-`.
pub fn read_corpus(path: Option<&str>) -> Result<Vec<Sentence>, String> {
    match path {
        Some(p) if p != "-" => read_conllu(Path::new(p)).map_err(|e| e.to_string()),
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            parse_conllu(&input).map_err(|e| format!("stdin: {e}"))
        }
    }
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn take_option_forms() {
        let (v, rest) = take_option(&args(&["-c", "a.json", "x"]), "--config", "-c");
        assert_eq!(v.as_deref(), Some("a.json"));
        assert_eq!(rest, args(&["x"]));

        let (v, rest) = take_option(&args(&["x", "--config=b.json"]), "--config", "-c");
        assert_eq!(v.as_deref(), Some("b.json"));
        assert_eq!(rest, args(&["x"]));

        let (v, rest) = take_option(&args(&["x", "y"]), "--config", "-c");
        assert_eq!(v, None);
        assert_eq!(rest, args(&["x", "y"]));
    }

    #[test]
    fn take_flag_removes_all_occurrences() {
        let mut a = args(&["--names", "f.conllu", "--names"]);
        assert!(take_flag(&mut a, "--names"));
        assert_eq!(a, args(&["f.conllu"]));
        assert!(!take_flag(&mut a, "--samples"));
    }

    #[test]
    fn help_detection() {
        assert!(wants_help(&args(&["x", "-h"])));
        assert!(!wants_help(&args(&["x"])));
    }
}
