//! Slate CLI - program runner and stage debugger.

use std::env;
use std::fs;
use std::process;

use slate_ast::LineMap;
use slate_interp::{RunOptions, Runner};

mod output;

fn main() {
    output::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let strict = take_flag(&mut args, "--strict");

    if args.is_empty() {
        print_usage();
        return;
    }

    match args[0].as_str() {
        "run" => {
            if args.len() < 2 {
                eprintln!("Usage: slate run <file.slate>");
                process::exit(1);
            }
            cmd_run(&args[1], true, strict);
        }
        "eval" => {
            if args.len() < 2 {
                eprintln!("Usage: slate eval <code>");
                process::exit(1);
            }
            cmd_run(&args[1], false, strict);
        }
        "lex" => {
            if args.len() < 2 {
                eprintln!("Usage: slate lex <file.slate>");
                process::exit(1);
            }
            cmd_lex(&args[1]);
        }
        "parse" => {
            if args.len() < 2 {
                eprintln!("Usage: slate parse <file.slate>");
                process::exit(1);
            }
            cmd_parse(&args[1]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("slate {}", env!("CARGO_PKG_VERSION"));
        }
        other => {
            // Treat as filename
            if other.ends_with(".slate") {
                cmd_run(other, true, strict);
            } else {
                eprintln!("{}: unknown command: {}", output::error_label(), other);
                print_usage();
                process::exit(1);
            }
        }
    }
}

/// Remove a flag from the argument list, reporting whether it was present.
fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|a| a != flag);
    args.len() != before
}

fn print_usage() {
    println!("{} {}", output::title("Slate"), env!("CARGO_PKG_VERSION"));
    println!("A pseudocode-styled teaching language");
    println!();
    println!("{} slate <command> [args]", output::section_header("Usage:"));
    println!();
    println!("{}", output::section_header("Commands:"));
    println!("  {} {}     Run a program file", output::command("run"), output::arg("<file>"));
    println!("  {} {}    Run code given directly on the command line", output::command("eval"), output::arg("<code>"));
    println!("  {} {}     Tokenize a file and print tokens", output::command("lex"), output::arg("<file>"));
    println!("  {} {}   Parse a file and print the AST", output::command("parse"), output::arg("<file>"));
    println!("  {}             Show this help", output::command("help"));
    println!("  {}          Show version", output::command("version"));
    println!();
    println!("{}", output::section_header("Options:"));
    println!("  {}         Reserved; accepted and currently a no-op", output::arg("--strict"));
}

fn cmd_run(source: &str, file: bool, strict: bool) {
    let runner = Runner::new();
    let options = RunOptions { file, strict, ..Default::default() };
    match runner.run(source, &options) {
        Ok(status) => process::exit(status),
        Err(busy) => {
            eprintln!("{}: {}", output::error_label(), busy);
            process::exit(1);
        }
    }
}

fn read_source(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}: reading {}: {}", output::error_label(), path, err);
            process::exit(1);
        }
    }
}

fn cmd_lex(path: &str) {
    let source = read_source(path);

    match slate_lexer::Lexer::new(&source).tokenize() {
        Ok(tokens) => {
            println!("=== Tokens ({}) ===\n", tokens.len());
            for token in &tokens {
                println!("{:4}:{:<4} {:?}", token.span.start, token.span.end, token.kind);
            }
            println!("\n=== Lex OK ===");
        }
        Err(err) => {
            show_error(&source, err.span.start, &err.to_string());
            eprintln!("\n=== Lex FAILED ===");
            process::exit(1);
        }
    }
}

fn cmd_parse(path: &str) {
    let source = read_source(path);

    let tokens = match slate_lexer::Lexer::new(&source).tokenize() {
        Ok(tokens) => tokens,
        Err(err) => {
            show_error(&source, err.span.start, &err.to_string());
            eprintln!("\n=== Lex FAILED ===");
            process::exit(1);
        }
    };

    match slate_parser::Parser::new(tokens).parse() {
        Ok(stmts) => {
            println!("=== AST ({} statements) ===\n", stmts.len());
            for (i, stmt) in stmts.iter().enumerate() {
                println!("--- Statement {} ---", i + 1);
                println!("{:#?}", stmt);
                println!();
            }
            println!("=== Parse OK ===");
        }
        Err(err) => {
            show_error(&source, err.span().start, &err.to_string());
            eprintln!("\n=== Parse FAILED ===");
            process::exit(1);
        }
    }
}

/// Show an error with source context and a caret.
fn show_error(source: &str, offset: usize, message: &str) {
    let pos = LineMap::new(source).pos(offset.min(source.len()));
    let line = source
        .lines()
        .nth(pos.line as usize - 1)
        .unwrap_or("");

    eprintln!();
    eprintln!("{}: {}", output::error_label(), message);
    eprintln!("  --> line {}:{}", pos.line, pos.column);
    eprintln!("   |");
    eprintln!("{:3}| {}", pos.line, line);
    eprintln!("   | {}^", " ".repeat(pos.column as usize - 1));
}
