// HTML post-processing CLI
//
// Reads rendered HTML from a file or stdin, runs the font and image stages,
// and writes the processed markup to stdout or a file. Logs go to stderr
// (RUST_LOG, default "warn").

use anyhow::{Context, Result};
use clap::Parser;
use kodegen_tools_postprocess::utils::DEFAULT_FONT_TIMEOUT_SECS;
use kodegen_tools_postprocess::{
    FontManifest, FontResolverConfig, HttpFontResolver, PostProcessor, ProcessingOptions,
    RenderContext,
};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "html-postprocess", version, about = "Inline web fonts and add resource hints to rendered HTML")]
struct Args {
    /// Input HTML file; reads stdin when omitted
    input: Option<PathBuf>,

    /// Write output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with processing options ({"optimizeFonts": true, ...})
    #[arg(long)]
    options: Option<PathBuf>,

    /// Enable font inlining regardless of the options file
    #[arg(long)]
    optimize_fonts: bool,

    /// Enable image preload hints regardless of the options file
    #[arg(long)]
    optimize_images: bool,

    /// Font manifest JSON ([{"url": ..., "content": ...}]) to resolve font CSS from
    #[arg(long, conflicts_with = "fetch")]
    manifest: Option<PathBuf>,

    /// Fetch font CSS from the providers over HTTP
    #[arg(long)]
    fetch: bool,

    /// Timeout for each font stylesheet request, in seconds
    #[arg(long, default_value_t = DEFAULT_FONT_TIMEOUT_SECS)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let mut options = match &args.options {
        Some(path) => ProcessingOptions::from_json_file(path)?,
        None => ProcessingOptions::default(),
    };
    if args.optimize_fonts {
        options = options.optimize_fonts(true);
    }
    if args.optimize_images {
        options = options.optimize_images(true);
    }
    let options = options.with_env_overrides();

    let context = build_context(&args)?;
    let markup = read_input(&args)?;

    let processor = PostProcessor::with_default_stages();
    log::debug!("Running stages {processor:?} with {options:?}");
    let processed = processor
        .run(markup, &context, &options)
        .await
        .context("Post-processing failed")?;

    write_output(&args, &processed)
}

fn build_context(args: &Args) -> Result<RenderContext> {
    let context = RenderContext::new();
    if let Some(path) = &args.manifest {
        let manifest = FontManifest::from_path(path)?;
        log::info!("Loaded {} font manifest entries from {}", manifest.len(), path.display());
        return Ok(context.with_font_resolver(manifest));
    }
    if args.fetch {
        let config = FontResolverConfig {
            timeout: Duration::from_secs(args.timeout_secs),
            ..FontResolverConfig::default()
        };
        return Ok(context.with_font_resolver(HttpFontResolver::new(config)?));
    }
    Ok(context)
}

fn read_input(args: &Args) -> Result<String> {
    match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn write_output(args: &Args, html: &str) -> Result<()> {
    match &args.output {
        Some(path) => std::fs::write(path, html)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}
