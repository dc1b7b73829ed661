use anchorage::{DocumentNode, PipelineBuilder, PipelineError};
use clap::Parser;
use std::path::PathBuf;

/// Converts a measured HTML document (JSON) into Android layout XML.
#[derive(Parser, Debug)]
#[command(name = "anchorage", version)]
struct Args {
    /// Measured document to convert.
    document: PathBuf,

    /// Directory the layout files are written to.
    #[arg(short, long, default_value = "res/layout")]
    out_dir: PathBuf,

    /// Name of the main layout resource.
    #[arg(short, long, default_value = "activity_main")]
    name: String,

    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit start/end anchors for right-to-left documents.
    #[arg(long)]
    rtl: bool,

    /// Write each layout on a single line.
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<(), PipelineError> {
    env_logger::init();
    let args = Args::parse();

    let mut builder = PipelineBuilder::new();
    if let Some(config) = &args.config {
        println!("Loading configuration from {}", config.display());
        builder = builder.with_config_file(config)?;
    }
    if args.rtl {
        builder = builder.with_rtl(true);
    }
    if args.compact {
        builder = builder.with_pretty_print(false);
    }
    let pipeline = builder.build()?;

    println!("Loading document from {}", args.document.display());
    let document = DocumentNode::from_file(&args.document)?;

    let written = pipeline.generate_to_dir(&document, &args.name, &args.out_dir)?;
    for path in &written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
