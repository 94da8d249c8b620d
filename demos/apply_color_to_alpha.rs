//! Remove a color from a single image.
//!
//! Usage:
//! ```sh
//! cargo run --example apply_color_to_alpha -- input.png output.png [#RRGGBB]
//! ```

use std::env;
use std::process;

use color_to_alpha::{Color, Engine, ProcessOptions, TransformOptions};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <input> <output> [#RRGGBB]", args[0]);
        process::exit(1);
    }

    let input = &args[1];
    let output = &args[2];
    let target = match args.get(3).map(|s| s.parse::<Color>()) {
        Some(Ok(c)) => c,
        Some(Err(e)) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
        None => Color::WHITE,
    };

    let opts = ProcessOptions {
        transform: TransformOptions {
            target,
            ..TransformOptions::default()
        },
        ..ProcessOptions::default()
    };
    let engine = Engine::new(opts).expect("default thresholds are valid");
    let result = engine.process_file(input.as_ref(), output.as_ref());

    if result.success {
        println!("Done: {}", result.message);
    } else {
        eprintln!("Error: {}", result.message);
        process::exit(1);
    }
}
