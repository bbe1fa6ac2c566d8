//! Strip the background of a single image and blur it.
//!
//! Usage:
//! ```sh
//! cargo run --example strip_background -- input.jpg output.png [sigma]
//! ```

use std::env;
use std::process;

use backdrop_blur::{save_png, BackdropEngine, ProcessOptions};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <input> <output> [sigma]", args[0]);
        process::exit(1);
    }

    let input = &args[1];
    let output = &args[2];
    let sigma = match args.get(3).map(|s| s.parse::<f64>()) {
        None => ProcessOptions::default().sigma,
        Some(Ok(s)) => s,
        Some(Err(e)) => {
            eprintln!("Error: bad sigma: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run(input, output, sigma) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    println!("Done: {output}");
}

fn run(input: &str, output: &str, sigma: f64) -> backdrop_blur::Result<()> {
    let opts = ProcessOptions {
        sigma,
        ..ProcessOptions::default()
    };
    let engine = BackdropEngine::new(opts)?;
    let img = image::open(input)?;
    let smoothed = engine.apply(&img)?;
    save_png(&smoothed, output.as_ref())
}
