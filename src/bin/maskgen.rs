use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use maskgen::{
    AssetCatalog, CollectionDriver, CompatTag, GeneratorConfig, LayerCategory, rewrite_image_urls,
};

#[derive(Parser, Debug)]
#[command(name = "maskgen", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the collection into the output and metadata directories.
    Generate(GenerateArgs),
    /// Replace the image placeholder in every item metadata document.
    RewriteUrls(ConfigArgs),
    /// Print asset counts per layer category as JSON.
    Catalog(ConfigArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Generator config JSON; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    common: ConfigArgs,

    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of items (defaults to the configured collection size).
    #[arg(long)]
    count: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::RewriteUrls(args) => cmd_rewrite_urls(args),
        Command::Catalog(args) => cmd_catalog(args),
    }
}

fn load_config(args: &ConfigArgs) -> anyhow::Result<GeneratorConfig> {
    match &args.config {
        Some(path) => GeneratorConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display())),
        None => Ok(GeneratorConfig::default()),
    }
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.common)?;
    if let Some(seed) = args.seed {
        cfg.seed = Some(seed);
    }
    if let Some(count) = args.count {
        cfg.collection_size = count;
    }

    let count = cfg.collection_size;
    let mut driver = CollectionDriver::new(cfg)?;
    let summary = driver.run(count)?;

    eprintln!(
        "generated {} item(s), {} duplicate retries",
        summary.generated.len(),
        summary.duplicate_retries
    );
    if !summary.failed.is_empty() {
        for f in &summary.failed {
            eprintln!("item {} failed: {}", f.id, f.reason);
        }
        anyhow::bail!("{} item(s) could not be generated", summary.failed.len());
    }
    Ok(())
}

fn cmd_rewrite_urls(args: ConfigArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;
    let summary = rewrite_image_urls(
        &cfg.metadata_dir,
        &cfg.image_placeholder,
        &cfg.image_base_uri,
    )?;
    eprintln!(
        "updated image urls in {} of {} metadata file(s)",
        summary.files_changed, summary.files_scanned
    );
    Ok(())
}

fn cmd_catalog(args: ConfigArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;
    let catalog = AssetCatalog::open(&cfg.layers_dir)?;

    let mut out = serde_json::Map::new();
    for category in LayerCategory::ALL {
        let entries = catalog.list(category)?;
        let value = if category.is_nested() {
            let mut folders = serde_json::Map::new();
            for folder in &entries {
                let files = catalog.list_in(category, folder)?;
                folders.insert(folder.clone(), files.len().into());
            }
            serde_json::Value::Object(folders)
        } else if matches!(category, LayerCategory::Background | LayerCategory::Mask) {
            let mut tags = serde_json::Map::new();
            for tag in CompatTag::ALL {
                let n = entries.iter().filter(|e| tag.matches(e)).count();
                tags.insert(tag.token().to_string(), n.into());
            }
            serde_json::Value::Object(tags)
        } else {
            entries.len().into()
        };
        out.insert(category.dir_name().to_string(), value);
    }

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
