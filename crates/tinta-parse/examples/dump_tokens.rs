//! Dump the token stream and the parsed tree for a document read from stdin.
//!
//! ```sh
//! echo 'para: "Hello";' | cargo run --example dump_tokens
//! ```

use std::io::Read;

use tinta_parse::{Tokenizer, parse};

fn main() -> std::io::Result<()> {
    let mut source = String::new();
    std::io::stdin().read_to_string(&mut source)?;

    println!("=== tokens ===");
    for result in Tokenizer::new(&source) {
        match result {
            Ok(token) => println!("{:>9}  {:?} {:?}", token.span.to_string(), token.kind, token.value),
            Err(error) => println!("error: {error}"),
        }
    }

    println!("\n=== tree ===");
    match parse(&source) {
        Ok(program) => println!("{program:#?}"),
        Err(diagnostic) => println!("error: {diagnostic}"),
    }
    Ok(())
}
