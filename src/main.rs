//! # Elton
//!
//! This binary is the interpreter of Elton. It wires lexer, parser, and
//! tree-walking evaluator into a single application.

mod cli;

use cli::*;

use std::{fs, process};

use log::info;

use elton::{interpreter::Interpreter, lexer::Lexer, parser::Parser};

fn main() {
    let args = Cli::init();

    simple_logger::init_with_level(args.verbosity.into()).unwrap();

    let source = match fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(_) => {
            eprintln!(
                "Error: Could not find file {}",
                args.file.to_string_lossy()
            );
            process::exit(1);
        }
    };

    let tokens = match Lexer::new(&source).lex() {
        Ok(tokens) => tokens,
        Err(lex_error) => {
            eprintln!("Syntax Error: {lex_error}");
            process::exit(1);
        }
    };

    if args.dump_tokens {
        info!(
            "Tokens:\n{}",
            serde_json::to_string_pretty(&tokens).unwrap_or_default()
        );
    }

    let ast = match Parser::new(tokens).parse() {
        Ok(ast) => ast,
        Err(parse_error) => {
            eprintln!("Syntax Error: {parse_error}");
            process::exit(1);
        }
    };

    if args.dump_ast {
        info!(
            "Parsed AST:\n{}",
            serde_json::to_string_pretty(&ast).unwrap_or_default()
        );
    }

    let mut interpreter = Interpreter::new();
    if let Err(runtime_error) = interpreter.evaluate(&ast) {
        eprintln!("Runtime Error: {runtime_error}");
        process::exit(1);
    }
}
