//! Beecell: point annotations for honeycomb cell images.
//!
//! Beecell stores labeled point annotations per image, lists images with
//! their annotation counts, and exports the whole annotation set as a
//! dataset snapshot. Each image's annotations live in two files, a JSON
//! record list and a CSV table, that are always written together.
//!
//! # Modules
//!
//! - [`model`]: Annotation records, cell classes and image ids
//! - [`store`]: Per-image persistence (load, save, delete)
//! - [`catalog`]: Sorted, paginated image listing
//! - [`export`]: Dataset snapshots
//! - [`stats`]: Class distribution
//! - [`service`]: The request/response interface over all of the above
//! - [`config`]: Directory layout and limits
//! - [`error`]: Error types for beecell operations

pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod scan;
pub mod service;
pub mod stats;
pub mod store;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use config::Config;
pub use error::BeecellError;
pub use service::AnnotationService;

use store::AnnotationFormat;

/// The beecell CLI application.
#[derive(Parser)]
#[command(name = "beecell")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true, env = "BEECELL_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the source images.
    #[arg(long, global = true, env = "BEECELL_IMAGES_DIR")]
    images_dir: Option<PathBuf>,

    /// Directory holding annotation files.
    #[arg(long, global = true, env = "BEECELL_ANNOTATIONS_DIR")]
    annotations_dir: Option<PathBuf>,

    /// Directory receiving dataset exports.
    #[arg(long, global = true, env = "BEECELL_EXPORTS_DIR")]
    exports_dir: Option<PathBuf>,

    /// Upper bound on the page size.
    #[arg(long, global = true, env = "BEECELL_MAX_PER_PAGE")]
    max_per_page: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Create the data directories.
    Init,
    /// List images with their annotation counts.
    List(ListArgs),
    /// Print an image's annotations as JSON.
    Show { image_id: String },
    /// Show an image's position and neighbours in the catalog.
    Locate { image_id: String },
    /// Replace an image's annotations with a JSON array read from a file.
    Save(SaveArgs),
    /// Delete an image's annotation files.
    Delete { image_id: String },
    /// Export all annotations as a dataset snapshot.
    Export,
    /// Show catalog totals and the class distribution.
    Stats(OutputArgs),
    /// Print the path of an image's annotation file.
    Path {
        image_id: String,
        /// 'json' or 'csv'.
        format: String,
    },
    /// List the cell classes.
    Classes,
}

/// Arguments for the list subcommand.
#[derive(clap::Args)]
struct ListArgs {
    /// Page number (1-based).
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Images per page (clamped to the configured maximum).
    #[arg(long)]
    per_page: Option<usize>,

    /// Output format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the save subcommand.
#[derive(clap::Args)]
struct SaveArgs {
    image_id: String,

    /// JSON file with the full annotation list, or '-' for stdin.
    input: PathBuf,
}

/// Output selection shared by report subcommands.
#[derive(clap::Args)]
struct OutputArgs {
    /// Output format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the beecell CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), BeecellError> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let service = AnnotationService::new(config);

    match cli.command {
        Some(Commands::Init) => {
            service.init_directories()?;
            println!("Data directories ready");
            Ok(())
        }
        Some(Commands::List(args)) => run_list(&service, args),
        Some(Commands::Show { image_id }) => {
            let annotations = service.get_annotations(&image_id)?;
            print_json(&annotations)
        }
        Some(Commands::Locate { image_id }) => match service.locate_image(&image_id)? {
            Some(nav) => {
                print!("{}", nav);
                Ok(())
            }
            None => Err(BeecellError::ImageNotFound(image_id)),
        },
        Some(Commands::Save(args)) => {
            let annotations = model::io_json::read_annotations_json(&args.input)?;
            let count = service.put_annotations(&args.image_id, annotations)?;
            println!("Saved {} annotation(s) for {}", count, args.image_id);
            Ok(())
        }
        Some(Commands::Delete { image_id }) => {
            let outcome = service.delete_annotations(&image_id)?;
            println!("{}", outcome);
            Ok(())
        }
        Some(Commands::Export) => {
            match service.export_dataset()? {
                Some(summary) => {
                    println!("{}", summary.path.display());
                    eprintln!(
                        "Exported {} annotation(s) from {} image(s){}",
                        summary.total_annotations,
                        summary.total_images,
                        if summary.skipped > 0 {
                            format!(", skipped {} unreadable file(s)", summary.skipped)
                        } else {
                            String::new()
                        }
                    );
                }
                None => println!("No annotations to export"),
            }
            Ok(())
        }
        Some(Commands::Stats(args)) => {
            let stats = service.get_stats();
            match args.output.as_str() {
                "json" => print_json(&stats),
                _ => {
                    print!("{}", stats);
                    Ok(())
                }
            }
        }
        Some(Commands::Path { image_id, format }) => {
            format.parse::<AnnotationFormat>()?;
            match service.annotation_file_path(&image_id, &format) {
                Some(path) => {
                    println!("{}", path.display());
                    Ok(())
                }
                None => Err(BeecellError::AnnotationFileNotFound { image_id, format }),
            }
        }
        Some(Commands::Classes) => {
            for (class, info) in service.cell_classes() {
                println!(
                    "{:<14} {} {}  {}",
                    class.as_str(),
                    info.color,
                    info.border,
                    info.name_key
                );
            }
            Ok(())
        }
        None => {
            // No subcommand: just print help hint and exit successfully
            println!("beecell {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Point annotations for honeycomb cell images.");
            println!();
            println!("Run 'beecell --help' for usage information.");
            Ok(())
        }
    }
}

/// Builds the configuration: defaults, then the config file, then flags.
fn resolve_config(cli: &Cli) -> Result<Config, BeecellError> {
    let mut config = match &cli.config {
        Some(path) => Config::from_yaml_file(path)?,
        None => Config::default(),
    };

    if let Some(dir) = &cli.images_dir {
        config.images_dir = dir.clone();
    }
    if let Some(dir) = &cli.annotations_dir {
        config.annotations_dir = dir.clone();
    }
    if let Some(dir) = &cli.exports_dir {
        config.exports_dir = dir.clone();
    }
    if let Some(max) = cli.max_per_page {
        config.max_per_page = max;
    }

    Ok(config)
}

/// Execute the list subcommand.
fn run_list(service: &AnnotationService, args: ListArgs) -> Result<(), BeecellError> {
    let page = service.get_catalog(args.page, args.per_page);

    match args.output.as_str() {
        "json" => print_json(&page),
        _ => {
            print!("{}", page);
            Ok(())
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), BeecellError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| BeecellError::Io(std::io::Error::other(e)))?;
    println!("{}", json);
    Ok(())
}
