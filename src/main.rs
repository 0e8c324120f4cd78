//! pdfpane - Entry Point

use clap::Parser;
use pdfpane::model::{AppError, Size};
use pdfpane::replay::Replay;
use pdfpane::session::ViewerSession;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Replay a viewer script and print the renderer messages it produces
#[derive(Parser, Debug)]
#[command(name = "pdfpane")]
#[command(version)]
#[command(about = "Replay a JSON Lines viewer script and print outgoing renderer messages")]
pub struct Args {
    /// Path to the JSON Lines script (reads from stdin if not provided)
    pub script: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Window size as WIDTHxHEIGHT
    #[arg(long, default_value = "800x600", value_parser = parse_viewport)]
    pub viewport: Size,

    /// Zoom used when the document first loads
    #[arg(long)]
    pub default_zoom: Option<f64>,

    /// Host zoom at startup
    #[arg(long, default_value_t = 1.0)]
    pub browser_zoom: f64,
}

fn parse_viewport(raw: &str) -> Result<Size, String> {
    let (width, height) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{raw}'"))?;
    let parse = |value: &str| -> Result<f64, String> {
        match value.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
            _ => Err(format!("invalid dimension '{value}'")),
        }
    };
    Ok(Size::new(parse(width)?, parse(height)?))
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = pdfpane::config::resolve(args.config.clone(), args.default_zoom)?;

    pdfpane::logging::init(&config.log_file_path)?;

    info!(config = ?config, viewport = ?args.viewport, "Configuration loaded and resolved");

    let mut source = pdfpane::source::detect_script_source(args.script.clone())?;

    let session = ViewerSession::new(
        args.viewport,
        config.session_options(),
        config.zoom_coordinator(args.browser_zoom),
        Vec::new(),
    );
    let replay = Replay::new(session, std::io::stdout().lock(), Instant::now());

    pdfpane::replay::run(&mut source, replay)?;

    Ok(())
}
