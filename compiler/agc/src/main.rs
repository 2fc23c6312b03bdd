//! autoglue CLI
//!
//! Loads JSON binding descriptions and runs them through the backend.

use std::io::IsTerminal;
use std::path::Path;

use agc::commands::{
    check_file, explain_error, list_file, parse_options, serialize_file, CommandResult, Options,
};
use agc::init_tracing;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    let result = match command.as_str() {
        "check" | "list" | "serialize" => {
            let (mut options, positional) = match parse_options(&args[2..]) {
                Ok(parsed) => parsed,
                Err(message) => {
                    eprintln!("error: {message}");
                    std::process::exit(1);
                }
            };
            let [path] = positional.as_slice() else {
                eprintln!("Usage: agc {command} <description.json> [options]");
                eprintln!();
                print_options();
                std::process::exit(1);
            };
            options.err_is_tty = std::io::stderr().is_terminal();
            init_tracing(options.verbose);
            run_file_command(command, Path::new(path), &options)
        }
        "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: agc explain <error-code>");
                eprintln!("Example: agc explain E2001");
                std::process::exit(1);
            }
            explain_error(&args[2], &mut std::io::stdout().lock(), &mut std::io::stderr())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        "version" | "--version" | "-V" => {
            println!("agc {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if result.is_err() {
        std::process::exit(1);
    }
}

fn run_file_command(command: &str, path: &Path, options: &Options) -> CommandResult {
    let mut out = std::io::stdout().lock();
    let mut err = std::io::stderr();
    match command {
        "check" => check_file(path, options, &mut out, &mut err),
        "list" => list_file(path, options, &mut out, &mut err),
        _ => serialize_file(path, options, &mut out, &mut err),
    }
}

fn print_usage() {
    println!("agc: binding description tool");
    println!();
    println!("Usage: agc <command> [options]");
    println!();
    println!("Commands:");
    println!("  check <file>       Load and link a description, report problems");
    println!("  list <file>        Print the entity tree");
    println!("  serialize <file>   Write the used entities back out as JSON");
    println!("  explain <code>     Explain a diagnostic code (e.g. E2001)");
    println!("  help               Show this message");
    println!("  version            Show version information");
    println!();
    print_options();
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=ag_generate=debug) for tracing output.");
}

fn print_options() {
    println!("Options:");
    println!("  --export=<name>        Mark a qualified name used (repeatable)");
    println!("  --all                  Mark every entity used");
    println!("  --format=text|json     Diagnostic format (default: text)");
    println!("  --color=auto|always|never");
    println!("  -o <path>              Write serialized output to a file");
    println!("  -v, --verbose          Trace spans as an indented tree");
}
