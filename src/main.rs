use std::env;
use std::fs;
use std::process;

use claritrans::Instrument;

fn usage() -> ! {
    eprintln!("Usage: claritrans <input.txt> [output.abc]");
    eprintln!("       claritrans --instrument <Bb|A|Eb|C> <input.txt> [output.abc]");
    process::exit(1);
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        usage();
    }

    let mut instrument: Option<Instrument> = None;
    let mut rest = &args[1..];

    if rest[0] == "--instrument" {
        if rest.len() < 3 {
            usage();
        }
        instrument = match Instrument::from_str(&rest[1]) {
            Some(i) => Some(i),
            None => {
                eprintln!("Unknown instrument '{}'. Expected: Bb, A, Eb or C.", rest[1]);
                process::exit(1);
            }
        };
        rest = &rest[2..];
    }

    let input_path = &rest[0];
    let output_path = rest.get(1);

    let source = match fs::read_to_string(input_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", input_path, e);
            process::exit(1);
        }
    };

    let result = match instrument {
        Some(instrument) => claritrans::render_text_for(&source, instrument),
        None => claritrans::render_text(&source),
    };

    let output = match result {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &output.abc) {
                eprintln!("Error writing to '{}': {}", path, e);
                process::exit(1);
            }
            eprintln!("Wrote ABC to {}", path);
        }
        None => {
            println!("{}", output.abc);
        }
    }
}
