use std::{fs, io};

use clap::Parser;
use quill::run;

/// quill is a small, embeddable scripting language with dynamic typing,
/// first-class functions, and list and string slicing.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Treat the argument as inline source code instead of a file path.
    #[arg(short, long)]
    eval: bool,

    /// A script file to run, or source code with --eval.
    contents: String,
}

fn main() {
    let args = Args::parse();

    let script = if args.eval {
        args.contents
    } else {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            std::process::exit(1);
        })
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    if let Err(e) = run(&script, &mut input, &mut output) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
