use std::error::Error;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use log::info;
use tabloid::export::Exporter;
use tabloid::view::text_snapshot;
use tabloid::{App, ExportConfig, GeneratorConfig, Studio, ViewState, Viewport};

/// Environment variables holding the API key, in lookup order.
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Generates a "强国有我" themed tabloid and exports it as a PNG image.
///
/// The API key is read from `GEMINI_API_KEY` (or `API_KEY`).
#[derive(Parser)]
#[command(author, version, about = "Generate a themed tabloid with Gemini")]
struct Cli {
    /// Directory the exported image is written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Also write the rendered HTML page to this file
    #[arg(long)]
    html: Option<PathBuf>,

    /// Skip the PNG export
    #[arg(long)]
    no_export: bool,

    /// Print the page as plain text
    #[arg(long)]
    text: bool,

    #[arg(long, default_value = tabloid::DEFAULT_MODEL)]
    model: String,

    #[arg(long, default_value = tabloid::DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = 60000)]
    timeout_ms: u64,

    /// Pixel scale of the exported image
    #[arg(long, default_value_t = 2)]
    scale: u32,

    /// Layout width of the exported page
    #[arg(long, default_value_t = 1024)]
    width: u32,
}

fn init_logging() {
    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var("RUST_LOG").is_err() {
        builder.filter_level(log::LevelFilter::Warn);
    }
    let _ = builder.try_init();
}

fn api_key_from_env() -> String {
    API_KEY_VARS
        .iter()
        .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()))
        .unwrap_or_default()
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = GeneratorConfig {
        api_key: api_key_from_env(),
        model: cli.model,
        base_url: cli.base_url,
        timeout_ms: cli.timeout_ms,
        ..Default::default()
    };
    // The blocking client is built here, outside the runtime, and lives on the worker thread.
    let service = tabloid::new_service(config)
        .with_context(|| format!("cannot set up the generation client (set {})", API_KEY_VARS[0]))?;
    let studio = Studio::new(service);

    let export = ExportConfig {
        viewport: Viewport { width: cli.width, ..Viewport::default() },
        scale: cli.scale,
    };
    let mut app = App::new(Exporter::to_directory(export, cli.out_dir.clone()));

    let runtime = tokio::runtime::Runtime::new().context("cannot start the async runtime")?;
    if let Some(id) = app.trigger() {
        let outcome = runtime.block_on(studio.generate());
        app.resolve(id, outcome);
    }
    runtime.block_on(studio.close())?;

    let page = app.render_page();
    if let Some(path) = &cli.html {
        std::fs::write(path, &page).with_context(|| format!("cannot write {}", path.display()))?;
        info!("wrote page to {}", path.display());
    }
    if cli.text {
        let snapshot = text_snapshot(&page);
        println!("{}\n\n{}", snapshot.title, snapshot.text);
    }

    if let ViewState::Error(message) = app.view() {
        bail!("{}", message);
    }
    if !cli.no_export {
        if let Some(path) = app.download()? {
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
