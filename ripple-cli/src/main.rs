//! Ripple CLI — run drawing scripts.
//!
//! The driver owns the drawing surface and the command registry: it reads
//! the whole script as UTF-8, parses it, then hands it to one evaluator.
//! Parse failures are reported as `[Parser] <message>` before any
//! evaluation; runtime failures as `[Runtime] <message>`. Either way the
//! process exits with status 1 and already-produced side effects (written
//! files, printed lines) are left in place.

use std::fs;
use std::process;

use clap::Parser;

use ripple_core::{CommandRegistry, Evaluator};
use ripple_graphics::Surface;

#[derive(Parser)]
#[command(version, about = "Ripple \u{2014} a scripting language for procedural drawing")]
struct Cli {
    /// Script file to run
    file: Option<String>,

    /// Evaluate source text instead of reading a file
    #[arg(short = 'e', long = "eval")]
    eval: Option<String>,

    /// Print the parsed tree before evaluation
    #[arg(long)]
    dump_ast: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let source = read_source(&cli);

    let script = match ripple_core::parse(&source) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("[Parser] {e}");
            process::exit(1);
        }
    };

    if cli.dump_ast {
        print!("{}", script.dump());
    }

    let mut registry = CommandRegistry::new();
    if let Err(e) = ripple_commands::register_defaults(&mut registry) {
        eprintln!("[Runtime] {e}");
        process::exit(1);
    }

    let mut surface = Surface::new();
    if let Err(e) = Evaluator::new(registry, &mut surface).run(&script) {
        eprintln!("[Runtime] {e}");
        process::exit(1);
    }
}

fn read_source(cli: &Cli) -> String {
    if let Some(ref source) = cli.eval {
        return source.clone();
    }
    if let Some(ref file) = cli.file {
        match fs::read_to_string(file) {
            Ok(source) => return source,
            Err(e) => {
                eprintln!("Error reading {file}: {e}");
                process::exit(1);
            }
        }
    }
    eprintln!("No input file or expression specified");
    process::exit(1);
}
