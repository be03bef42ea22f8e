use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use wgutil::base36::encode_base36_big;
use wgutil::{NumericType, encode_base36, generate_uid, parse, parse_all, read_form, write_form};

const LOG_ENV: &str = "WGUTIL_LOG";

/// A line typed at the prompt
#[derive(Debug, PartialEq)]
enum Command<'a> {
    Read(&'a str),
    Write(&'a str, &'a str),
    Base36(&'a str, Option<&'a str>),
    Uid,
    Help,
    Quit,
    Forms(&'a str),
}

fn parse_command(line: &str) -> Result<Command<'_>, String> {
    let Some(meta) = line.strip_prefix(':') else {
        return Ok(Command::Forms(line));
    };
    let (name, rest) = meta.split_once(char::is_whitespace).unwrap_or((meta, ""));
    let rest = rest.trim();

    match name {
        "read" if !rest.is_empty() => Ok(Command::Read(rest)),
        "write" => match rest.split_once(char::is_whitespace) {
            Some((path, form)) => Ok(Command::Write(path, form.trim())),
            None => Err("usage: :write PATH FORM".to_string()),
        },
        "b36" if !rest.is_empty() => {
            let mut args = rest.split_whitespace();
            match (args.next(), args.next(), args.next()) {
                (Some(n), width, None) => Ok(Command::Base36(n, width)),
                _ => Err("usage: :b36 N [WIDTH]".to_string()),
            }
        }
        "uid" => Ok(Command::Uid),
        "help" | "h" => Ok(Command::Help),
        "quit" | "q" => Ok(Command::Quit),
        "read" => Err("usage: :read PATH".to_string()),
        "b36" => Err("usage: :b36 N [WIDTH]".to_string()),
        _ => Err(format!("unknown command :{name}")),
    }
}

fn base36(n: &str, width: Option<&str>) -> Result<String, String> {
    let width = match width {
        Some(w) => w.parse::<usize>().map_err(|e| format!("bad width {w:?}: {e}"))?,
        None => 0,
    };
    let encoded = match NumericType::parse(n) {
        Some(NumericType::Int(i)) => encode_base36(i, width),
        Some(NumericType::BigInt(big)) => encode_base36_big(&big, width),
        _ => return Err(format!("not an integer: {n}")),
    };
    encoded.map_err(|e| e.to_string())
}

/// Run one line. Returns the text to print, or `None` to stop.
fn execute(line: &str) -> Option<Result<String, String>> {
    let command = match parse_command(line) {
        Ok(command) => command,
        Err(e) => return Some(Err(e)),
    };
    debug!(?command, "Executing");

    let result = match command {
        Command::Quit => return None,
        Command::Help => Ok(HELP.trim_end().to_string()),
        Command::Read(path) => read_form(path)
            .map(|form| form.to_string())
            .map_err(|e| e.to_string()),
        Command::Write(path, text) => parse(text)
            .and_then(|form| write_form(&form, path))
            .map(|()| format!("wrote {path}"))
            .map_err(|e| e.to_string()),
        Command::Base36(n, width) => base36(n, width),
        Command::Uid => generate_uid().map_err(|e| e.to_string()),
        Command::Forms(text) => parse_all(text)
            .map(|forms| {
                forms
                    .iter()
                    .map(|f| f.to_string())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .map_err(|e| e.to_string()),
    };
    Some(result)
}

const HELP: &str = "\
Each line is read as s-expressions and printed back in canonical form.

  :read PATH         print the form stored in PATH
  :write PATH FORM   store FORM in PATH
  :b36 N [WIDTH]     base-36 encode N, zero-padded to WIDTH
  :uid               generate a fresh uid
  :help              show this message
  :quit              exit
";

fn history_file() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("wgutil").join("history.txt"))
}

fn save_history(rl: &mut DefaultEditor, path: &Path) {
    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir) {
            warn!(path = %dir.display(), error = %e, "Could not create history directory");
            return;
        }
    }
    if let Err(e) = rl.save_history(path) {
        warn!(path = %path.display(), error = %e, "Could not save history");
    }
}

fn repl() -> Result<(), ReadlineError> {
    let mut rl = DefaultEditor::new()?;
    let history_path = history_file();
    if let Some(ref path) = history_path {
        // Missing on first run
        let _ = rl.load_history(path);
    }

    println!("wgutil s-expression REPL");
    println!("Type :help for commands, :quit to exit");
    println!();

    loop {
        match rl.readline("wg> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match execute(trimmed) {
                    None => break,
                    Some(Ok(output)) => println!("{output}"),
                    Some(Err(e)) => eprintln!("Error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        save_history(&mut rl, path);
    }
    Ok(())
}

/// Parse every form in `filename` and print each canonically
fn run_file(filename: &str) -> Result<(), String> {
    let contents = fs::read_to_string(filename)
        .map_err(|e| format!("Failed to read file '{filename}': {e}"))?;
    let forms = parse_all(&contents).map_err(|e| format!("{filename}: {e}"))?;
    for form in forms {
        println!("{form}");
    }
    Ok(())
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  wgutil              Start interactive REPL");
    eprintln!("  wgutil <file>       Print every form in a session file");
    eprintln!("  wgutil --help       Show this help message");
    eprintln!();
    eprintln!("Set {LOG_ENV} (e.g. {LOG_ENV}=debug) to control logging.");
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => {
            if let Err(e) = repl() {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
        2 => {
            let arg = &args[1];
            if arg == "--help" || arg == "-h" {
                print_usage();
            } else if let Err(e) = run_file(arg) {
                eprintln!("{e}");
                process::exit(1);
            }
        }
        _ => {
            eprintln!("Error: Too many arguments");
            print_usage();
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command(":read a.el"), Ok(Command::Read("a.el")));
        assert_eq!(
            parse_command(":write a.el (x . 1)"),
            Ok(Command::Write("a.el", "(x . 1)"))
        );
        assert_eq!(parse_command(":b36 36"), Ok(Command::Base36("36", None)));
        assert_eq!(parse_command(":b36 5 3"), Ok(Command::Base36("5", Some("3"))));
        assert_eq!(parse_command(":q"), Ok(Command::Quit));
        assert_eq!(parse_command("(a b)"), Ok(Command::Forms("(a b)")));
    }

    #[test]
    fn test_bad_commands() {
        assert!(parse_command(":read").is_err());
        assert!(parse_command(":write only-path").is_err());
        assert!(parse_command(":b36 1 2 3").is_err());
        assert!(parse_command(":frobnicate").is_err());
    }

    #[test]
    fn test_execute_prints_canonically() {
        assert_eq!(execute("( a  .  ( b ) )"), Some(Ok("(a b)".to_string())));
        assert_eq!(execute("1 \"s\""), Some(Ok("1\n\"s\"".to_string())));
        assert!(matches!(execute("(unclosed"), Some(Err(_))));
        assert_eq!(execute(":quit"), None);
    }

    #[test]
    fn test_base36_command() {
        assert_eq!(execute(":b36 5 3"), Some(Ok("005".to_string())));
        assert_eq!(
            execute(":b36 99999999999999999999"),
            Some(Ok("L3R41IFS0Q5TR".to_string()))
        );
        assert!(matches!(execute(":b36 -1"), Some(Err(_))));
        assert!(matches!(execute(":b36 1.5"), Some(Err(_))));
    }

    #[test]
    fn test_write_then_read_commands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.el");
        let path = path.to_str().unwrap();

        assert!(matches!(execute(&format!(":write {path} [1 (a . b)]")), Some(Ok(_))));
        assert_eq!(
            execute(&format!(":read {path}")),
            Some(Ok("[1 (a . b)]".to_string()))
        );
    }
}
