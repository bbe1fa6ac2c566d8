use std::path::PathBuf;
use std::process;

use clap::Parser;

use backdrop_blur::{BackdropEngine, ProcessOptions};

#[derive(Parser)]
#[command(
    name = "backdrop-blur",
    about = "Make near-white backgrounds transparent and soften the image with a Gaussian blur",
    version,
    after_help = "Simple usage: backdrop-blur input.jpg output.png\n\n\
                  The result is always PNG-encoded and written as saved/output1.png,\n\
                  saved/output2.png, ... so earlier results are never overwritten."
)]
struct Cli {
    /// Input image file
    input: PathBuf,

    /// Output file name; a number is appended before the extension
    output: PathBuf,

    /// Luminance cutoff (0-255); brighter pixels become transparent
    #[arg(short, long, default_value_t = ProcessOptions::default().threshold)]
    threshold: u8,

    /// Gaussian standard deviation; kernel side is floor(6 * sigma + 1)
    #[arg(short, long, default_value_t = ProcessOptions::default().sigma)]
    sigma: f64,

    /// Directory the numbered output is written to
    #[arg(short = 'd', long, default_value = "saved")]
    output_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let opts = ProcessOptions {
        threshold: cli.threshold,
        sigma: cli.sigma,
    };

    let engine = match BackdropEngine::new(opts) {
        Ok(e) => e,
        Err(e) => {
            log::error!("{e}");
            process::exit(1);
        }
    };

    log::debug!(
        "threshold={}, sigma={}, output dir={}",
        opts.threshold,
        opts.sigma,
        cli.output_dir.display()
    );

    match engine.process_file(&cli.input, &cli.output, &cli.output_dir) {
        Ok(result) => {
            if !cli.quiet {
                println!(
                    "Background removed and smoothed, saved to {}",
                    result.output.display()
                );
                println!("Execution time: {:?}", result.elapsed);
            }
        }
        Err(e) => {
            log::error!("{}: {e}", cli.input.display());
            process::exit(1);
        }
    }
}
