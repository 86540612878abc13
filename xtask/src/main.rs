//! Developer tooling for webrelay plugins.
//!
//! Usage:
//!   cargo xtask new <name> [--dir <path>]
//!   cargo xtask check-keys <crate dir>

mod keys;
mod scaffold;
mod util;

use std::path::PathBuf;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let result = match args.first().map(String::as_str) {
        Some("new") => run_new(&args[1..]),
        Some("check-keys") => run_check_keys(&args[1..]),
        Some("help" | "--help" | "-h") => {
            print_usage();
            return;
        }
        _ => {
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        util::print_error(&e);
        std::process::exit(1);
    }
}

fn run_new(args: &[String]) -> Result<(), String> {
    let mut name = None;
    let mut dir = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--dir" => {
                let value = iter.next().ok_or("--dir requires a path")?;
                dir = Some(PathBuf::from(value));
            }
            flag if flag.starts_with("--") => return Err(format!("Unknown option: {flag}")),
            positional if name.is_none() => name = Some(positional.to_string()),
            extra => return Err(format!("Unexpected argument: {extra}")),
        }
    }
    let name = name.ok_or("Missing plugin name. Usage: cargo xtask new <name> [--dir <path>]")?;
    scaffold::new_plugin(&name, dir.as_deref()).map(|_| ())
}

fn run_check_keys(args: &[String]) -> Result<(), String> {
    let [dir] = args else {
        return Err("Usage: cargo xtask check-keys <crate dir>".to_string());
    };
    keys::run(&PathBuf::from(dir))
}

fn print_usage() {
    eprintln!("Usage: cargo xtask <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  new <name> [--dir <path>]   Create a plugin crate from templates/plugin");
    eprintln!("  check-keys <crate dir>      Check relay keys against the web UI's accessors");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  cargo xtask new my-fuzz");
    eprintln!("  cargo xtask new my-fuzz --dir plugins/my-fuzz");
    eprintln!("  cargo xtask check-keys demos/gain");
}
