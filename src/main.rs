mod debug_report;

use refence::{Options, transform_verbose_with};
use std::io::{self, IsTerminal, Read};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let opts = Options::default();
    let res = transform_verbose_with(&config.input, &opts);
    debug_report::print_run(&config.input, &res, config.color);
}

struct CliConfig {
    input: String,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("refence {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.by_ref().collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--input=") => {
                let value = arg.trim_start_matches("--input=");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value.to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown flag {arg} (see --help)"));
            }
            _ => {
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(arg);
            }
        }
    }

    let input = match input {
        Some(input) => input,
        None => {
            if io::stdin().is_terminal() {
                return Err("error: no input; pass --input TEXT or pipe text on stdin".to_string());
            }
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).map_err(|e| format!("error: failed to read stdin: {e}"))?;
            buf
        }
    };

    Ok(CliConfig { input, color })
}

fn print_help() {
    println!(
        "refence — recover unfenced code blocks in model responses

Usage:
  refence [--input TEXT | -i TEXT | -- TEXT...]
  some-command | refence

Options:
  -i, --input TEXT   transform TEXT instead of reading stdin
      --color        force ANSI colors on
      --no-color     force ANSI colors off
  -h, --help         show this help
  -V, --version      show version

Environment:
  REFENCE_DEBUG_RULES=1   print rule-level traces to stderr"
    );
}
