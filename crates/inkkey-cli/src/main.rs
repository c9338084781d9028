use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use inkkey_async_runtime::{InkCommand, InkUpdate, RequestId, spawn_worker};
use inkkey_core::constants::{DEFAULT_BLACK_GENERATION, DEFAULT_NUM_KEYS, DEFAULT_PLATE_WIDTH_MM};
use inkkey_core::{
    Channel, ImageSource, InkLevels, InkSummary, PrintWidth, ProcessingOptions, Rotation,
};
use log::LevelFilter;
use std::path::PathBuf;

mod logger;

#[derive(Parser)]
#[command(name = "inkkey", about = "Offset press ink key estimation", version)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate per-zone ink coverage for one image
    Analyze {
        /// Input image
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        press: PressArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Analyze several images with the same press settings
    Batch {
        /// Input images
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        #[command(flatten)]
        press: PressArgs,

        /// Print each result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a single RGB color to CMYK coverage
    Convert {
        red: u8,
        green: u8,
        blue: u8,

        /// Black generation (GCR), 0.0 to 1.0
        #[arg(long, default_value_t = DEFAULT_BLACK_GENERATION)]
        black_generation: f32,
    },

    /// Write the default press options to a JSON file
    InitConfig {
        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Args)]
struct PressArgs {
    /// Number of ink keys across the plate
    #[arg(long, default_value_t = DEFAULT_NUM_KEYS)]
    keys: usize,

    /// Black generation (GCR), 0.0 to 1.0
    #[arg(long, default_value_t = DEFAULT_BLACK_GENERATION)]
    black_generation: f32,

    /// Clockwise rotation in degrees (0, 90, 180 or 270)
    #[arg(long, default_value = "0", value_parser = parse_rotation)]
    rotation: Rotation,

    /// Plate width in mm
    #[arg(long, default_value_t = DEFAULT_PLATE_WIDTH_MM)]
    plate_width_mm: f32,

    /// Printed width of the job
    #[arg(long, default_value = "full-plate", value_enum)]
    print_width: PrintWidthArg,

    /// Printed width in mm (overrides --print-width)
    #[arg(long)]
    image_width_mm: Option<f32>,

    /// Load press options from a JSON file; the flags above are ignored
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PrintWidthArg {
    FullPlate,
    LargeSheet,
    HalfSheet,
    Nineteen,
    A3Landscape,
    A4Landscape,
}

impl From<PrintWidthArg> for PrintWidth {
    fn from(arg: PrintWidthArg) -> Self {
        match arg {
            PrintWidthArg::FullPlate => Self::FullPlate,
            PrintWidthArg::LargeSheet => Self::LargeSheet,
            PrintWidthArg::HalfSheet => Self::HalfSheet,
            PrintWidthArg::Nineteen => Self::Nineteen,
            PrintWidthArg::A3Landscape => Self::A3Landscape,
            PrintWidthArg::A4Landscape => Self::A4Landscape,
        }
    }
}

fn parse_rotation(value: &str) -> std::result::Result<Rotation, String> {
    let degrees: i32 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number of degrees", value))?;
    Rotation::from_degrees(degrees).map_err(|e| e.to_string())
}

impl PressArgs {
    async fn resolve(&self) -> Result<ProcessingOptions> {
        if let Some(path) = &self.config {
            let options = ProcessingOptions::load(path).await?;
            log::info!("Loaded press options from {}", path.display());
            return Ok(options);
        }

        let image_width_mm = self
            .image_width_mm
            .unwrap_or_else(|| PrintWidth::from(self.print_width).width_mm());

        Ok(ProcessingOptions {
            num_keys: self.keys,
            black_generation: self.black_generation,
            rotation: self.rotation,
            plate_width_mm: self.plate_width_mm,
            image_width_mm,
        })
    }
}

fn print_levels(levels: &InkLevels, summary: &InkSummary) {
    println!("Zone      C    M    Y    K");
    for zone in 0..levels.num_keys() {
        if let Some(ink) = levels.zone(zone) {
            println!(
                "{:>4}   {:>3}  {:>3}  {:>3}  {:>3}",
                zone + 1,
                ink.c,
                ink.m,
                ink.y,
                ink.k
            );
        }
    }

    println!();
    println!("Coverage summary:");
    for channel in &summary.channels {
        println!(
            "  {:<8} mean {:>5.1}%  peak {:>3}% at key {}",
            channel.channel.label(),
            channel.mean,
            channel.peak_value,
            channel.peak_zone
        );
    }
    println!("  Total area coverage: {:.1}%", summary.total_coverage);
}

fn levels_json(levels: &InkLevels, summary: &InkSummary) -> Result<String> {
    let value = serde_json::json!({
        "levels": levels,
        "summary": summary,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    logger::StderrLogger::new(level).init()?;

    match cli.command {
        Commands::Analyze { input, press, json } => {
            let options = press.resolve().await?;
            let levels = inkkey_core::process(input.as_path(), &options).await?;
            let summary = inkkey_core::calculate_summary(&levels)?;

            if json {
                println!("{}", levels_json(&levels, &summary)?);
            } else {
                println!(
                    "{}: {} keys, plate {} mm, print {:.1} mm, rotation {}°",
                    input.display(),
                    options.num_keys,
                    options.plate_width_mm,
                    options.image_width_mm,
                    options.rotation.degrees()
                );
                print_levels(&levels, &summary);
            }
        }

        Commands::Batch { input, press, json } => {
            let options = press.resolve().await?;
            options.validate()?;

            let (command_tx, mut update_rx) = spawn_worker();
            for (i, path) in input.iter().enumerate() {
                command_tx.send(InkCommand::Analyze {
                    request_id: RequestId(i as u64),
                    source: ImageSource::Path(path.clone()),
                    options: options.clone(),
                })?;
            }

            let mut remaining = input.len();
            let mut failures = 0;
            while remaining > 0 {
                let Some(update) = update_rx.recv().await else {
                    bail!("Analysis worker stopped with {} images pending", remaining);
                };
                match update {
                    InkUpdate::Started { request_id } => {
                        log::info!("Analyzing {}", input[request_id.0 as usize].display());
                    }
                    InkUpdate::Completed {
                        request_id,
                        levels,
                        summary,
                    } => {
                        remaining -= 1;
                        let path = &input[request_id.0 as usize];
                        if json {
                            println!("{}", levels_json(&levels, &summary)?);
                        } else {
                            println!("== {}", path.display());
                            print_levels(&levels, &summary);
                            println!();
                        }
                    }
                    InkUpdate::Superseded { request_id } => {
                        // The same file was listed twice; the later entry reports it
                        remaining -= 1;
                        log::debug!("Skipping duplicate {}", input[request_id.0 as usize].display());
                    }
                    InkUpdate::Error {
                        request_id,
                        message,
                    } => {
                        remaining -= 1;
                        failures += 1;
                        match request_id {
                            Some(id) => eprintln!("{}: {}", input[id.0 as usize].display(), message),
                            None => eprintln!("{}", message),
                        }
                    }
                    InkUpdate::ConfigLoaded { .. } => {}
                }
            }

            if failures > 0 {
                bail!("{} of {} images failed", failures, input.len());
            }
        }

        Commands::Convert {
            red,
            green,
            blue,
            black_generation,
        } => {
            if !(0.0..=1.0).contains(&black_generation) {
                bail!("Black generation must be between 0 and 1");
            }
            let ink = inkkey_core::rgb_to_cmyk(red, green, blue, black_generation);
            println!("RGB({}, {}, {}) →", red, green, blue);
            for channel in Channel::ALL {
                println!("  {:<8} {:>3}%", channel.label(), ink.get(channel));
            }
        }

        Commands::InitConfig { output } => {
            ProcessingOptions::default().save(&output).await?;
            println!("Default press options → {}", output.display());
        }
    }

    Ok(())
}
