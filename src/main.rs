use std::fs;

use clap::Parser;
use twine::Engine;

/// Twine is an embedded expression and scripting language with a symbolic
/// simplifier, for evaluating algebraic strings and small scripts.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells twine to look at a file instead of an inline script.
    #[arg(short, long)]
    file: bool,

    /// Pipe mode prints the final value of the script after it runs.
    #[arg(short, long)]
    pipe_mode: bool,

    /// Caps every loop at this many iterations.
    #[arg(short = 'l', long)]
    max_iterations: Option<usize>,

    contents: String,
}

fn main() {
    let args = Args::parse();

    let source = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            std::process::exit(1);
        })
    } else {
        args.contents
    };

    let mut engine = Engine::new(source);
    if let Some(limit) = args.max_iterations {
        engine = engine.with_max_iterations(limit);
    }

    match engine.execute() {
        Ok(value) => {
            if args.pipe_mode {
                println!("{value}");
            }
        },
        Err(error) => eprintln!("{}", error.report()),
    }
}
