use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use vitrine_cli::{format_result, load_request};
use vitrine_core::UploadSettings;
use vitrine_processing::UploadPipeline;
use vitrine_storage::LocalStorage;

#[derive(Parser, Debug)]
#[command(name = "vitrine-optimize")]
#[command(about = "Optimize an image into the public root, as the upload endpoint would")]
struct Args {
    /// Image file to ingest (JPEG, PNG, WebP or GIF)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Destination folder under the public root
    #[arg(long)]
    folder: Option<String>,

    /// Alt text used to derive the file name
    #[arg(long)]
    alt: Option<String>,

    /// Public root directory (defaults to PUBLIC_ROOT or "public")
    #[arg(long, value_name = "DIR")]
    public_root: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    dotenvy::dotenv().ok();
    let mut settings = UploadSettings::from_env();
    if let Some(public_root) = args.public_root {
        settings.public_root = public_root;
    }
    settings.validate()?;

    let storage = LocalStorage::new(&settings.public_root)
        .await
        .with_context(|| format!("Failed to open public root {}", settings.public_root.display()))?;
    let pipeline = UploadPipeline::new(Arc::new(storage), &settings);

    let folder = args
        .folder
        .unwrap_or_else(|| settings.default_folder.clone());
    let request = load_request(&args.file, &folder, args.alt.as_deref()).await?;

    let result = pipeline
        .process(request)
        .await
        .with_context(|| format!("Failed to optimize {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", format_result(&result));
    }

    Ok(())
}
