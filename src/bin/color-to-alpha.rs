use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use color_to_alpha::{
    default_output_path, palette, Color, Engine, Interpolation, ProcessOptions, ProcessResult,
    Shape, TransformOptions, DEFAULT_OPACITY_THRESHOLD, DEFAULT_TRANSPARENCY_THRESHOLD,
};

#[derive(Parser)]
#[command(
    name = "color-to-alpha",
    about = "Turn a color into transparency while recovering the colors it was mixed with",
    version,
    after_help = "Simple usage: color-to-alpha <image>  (removes white, writes <name>_alpha.png)\n\n\
                  Threshold limits: 0-255 for --shape cube, 0-442 for --shape sphere."
)]
struct Cli {
    /// Input image file or directory
    input: String,

    /// Output file or directory (default: {name}_alpha.png)
    #[arg(short, long)]
    output: Option<String>,

    /// Color to remove, as #RRGGBB or #RGB
    #[arg(short, long, default_value = "#FFFFFF", value_parser = parse_color)]
    color: Color,

    /// Use each image's most frequent color instead of --color
    #[arg(long)]
    top_color: bool,

    /// Distance geometry in RGB space
    #[arg(short, long, value_enum, default_value_t = Shape::Sphere)]
    shape: Shape,

    /// Easing between the two thresholds
    #[arg(short, long, value_enum, default_value_t = Interpolation::Linear)]
    interpolation: Interpolation,

    /// Distance at or below which pixels become fully transparent
    #[arg(short, long, default_value_t = DEFAULT_TRANSPARENCY_THRESHOLD)]
    transparency: f32,

    /// Distance at or above which pixels stay fully opaque
    #[arg(short = 'p', long, default_value_t = DEFAULT_OPACITY_THRESHOLD)]
    opacity: f32,

    /// Composite the result over this color (preview)
    #[arg(short, long, value_parser = parse_color)]
    background: Option<Color>,

    /// Print the N most frequent colors of the input image and exit
    #[arg(long, value_name = "N")]
    list_colors: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn parse_color(s: &str) -> Result<Color, String> {
    s.parse().map_err(|e: color_to_alpha::Error| e.to_string())
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let input_path = Path::new(&cli.input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input);
        process::exit(1);
    }

    if let Some(n) = cli.list_colors {
        list_colors(input_path, n);
        return;
    }

    let opts = ProcessOptions {
        transform: TransformOptions {
            target: cli.color,
            transparency_threshold: cli.transparency,
            opacity_threshold: cli.opacity,
            shape: cli.shape,
            interpolation: cli.interpolation,
        },
        auto_target: cli.top_color,
        background: cli.background,
    };

    let engine = match Engine::new(opts) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    let opts = engine.options();

    if !cli.quiet {
        let target = if opts.auto_target {
            "most frequent color".to_string()
        } else {
            opts.transform.target.to_string()
        };
        eprintln!(
            "Removing {target} ({} / {}, thresholds {} -> {})",
            opts.transform.shape,
            opts.transform.interpolation,
            opts.transform.transparency_threshold,
            opts.transform.opacity_threshold,
        );
        eprintln!();
    }

    let results = if input_path.is_dir() {
        let output_dir = if let Some(o) = &cli.output {
            PathBuf::from(o)
        } else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: color-to-alpha <input_dir> -o <output_dir>");
            process::exit(1);
        };
        engine.process_directory(input_path, &output_dir)
    } else {
        let output_path = match &cli.output {
            Some(o) => PathBuf::from(o),
            None => default_output_path(input_path),
        };
        vec![engine.process_file(input_path, &output_path)]
    };

    let mut success_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, &cli, opts.auto_target);
        if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !cli.quiet {
        eprintln!();
        eprint!("[Summary] Processed: {success_count}");
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn list_colors(input: &Path, n: usize) {
    let img = match image::open(input) {
        Ok(img) => img,
        Err(e) => {
            eprintln!("Error: Failed to load {}: {e}", input.display());
            process::exit(1);
        }
    };
    for (color, count) in palette::top_colors(&img, n) {
        println!("{color}\t{count}");
    }
}

fn print_result(result: &ProcessResult, cli: &Cli, auto_target: bool) {
    if cli.quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.success {
        match result.target {
            Some(target) if auto_target => eprintln!(
                "[OK] {filename} (target {target}, {} transparent pixels)",
                result.transparent_pixels
            ),
            _ => eprintln!(
                "[OK] {filename} ({} transparent pixels)",
                result.transparent_pixels
            ),
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if cli.verbose && !result.message.is_empty() {
        eprintln!("  -> {}", result.message);
    }
}
