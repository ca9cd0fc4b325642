use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use tidemark::export::{self, ExportOptions, ExportedFile, OutputFormat, ProgressObserver};
use tidemark::ingest;
use tidemark::session::{format_file_size, Intent, Session, SettingUpdate};
use tidemark::settings::{Position, WatermarkSettings};

/// Tidemark - batch text watermarking for raster images
#[derive(Parser, Debug)]
#[command(name = "tidemark")]
#[command(version, about, long_about = None)]
struct Args {
    /// Image files or directories to load
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Path to a YAML settings file
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Watermark text (empty disables watermarking)
    #[arg(short, long)]
    text: Option<String>,

    /// Anchor position: top-left, top, top-right, left, center, right,
    /// bottom-left, bottom, bottom-right
    #[arg(short, long)]
    position: Option<String>,

    /// Horizontal margin from the edge, in pixels
    #[arg(long)]
    spacing_x: Option<u32>,

    /// Vertical margin from the edge, in pixels
    #[arg(long)]
    spacing_y: Option<u32>,

    /// Font family name
    #[arg(long)]
    font_family: Option<String>,

    /// Font size in pixels
    #[arg(long)]
    font_size: Option<u32>,

    /// Text color as #RGB or #RRGGBB
    #[arg(short, long)]
    color: Option<String>,

    /// Opacity percentage, 0-100
    #[arg(long)]
    opacity: Option<u8>,

    /// Rotation in degrees, clockwise about the watermark center
    #[arg(long)]
    rotation: Option<f32>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Output raster format: png or jpeg
    #[arg(long, default_value = "png")]
    format: String,

    /// JPEG quality, 1-100
    #[arg(long, default_value_t = tidemark::constants::DEFAULT_JPEG_QUALITY)]
    quality: u8,

    /// Restrict the batch to these image indices (comma separated)
    #[arg(long, value_delimiter = ',')]
    select: Vec<usize>,

    /// Export only this image as a single file instead of an archive
    #[arg(long)]
    single: Option<usize>,

    /// List loaded images and exit
    #[arg(long)]
    list: bool,
}

fn main() {
    // Initialize logging subsystem
    tidemark::logging::init_subscriber().expect("Failed to initialize logging subsystem");

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!(error = %e, "export failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    // Load base settings, then apply CLI overrides through the same
    // intent path interactive frontends use.
    let settings = match &args.settings {
        Some(path) => WatermarkSettings::from_file(path).map_err(anyhow::Error::msg)?,
        None => WatermarkSettings::default(),
    };

    let mut session = Session::new(settings);
    apply_overrides(&mut session, &args)?;
    session
        .settings()
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid watermark settings")?;

    session.extend(ingest::load_images(&args.inputs));

    if session.is_empty() {
        tracing::info!("no images loaded; nothing to do");
        return Ok(());
    }

    if args.list {
        print_listing(&session);
        return Ok(());
    }

    apply_selection(&mut session, &args.select);

    let options = ExportOptions {
        format: args
            .format
            .parse::<OutputFormat>()
            .map_err(anyhow::Error::msg)?,
        quality: args.quality,
    };

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create output directory '{}'", args.output.display()))?;

    if let Some(index) = args.single {
        let file = export::export_image(&session, index, &options)?;
        write_output(&args.output, &file)?;
    } else {
        // The progress bar is released on every exit path, including
        // export failure, by the guard's Drop impl.
        let mut progress = ProgressGuard::new(session.export_indices().len() as u64);
        let result = export::export_batch(&session, &options, &mut progress);
        drop(progress);

        if let Some(file) = result? {
            write_output(&args.output, &file)?;
        }
    }

    Ok(())
}

fn apply_overrides(session: &mut Session, args: &Args) -> anyhow::Result<()> {
    if let Some(text) = &args.text {
        session.apply(Intent::Update(SettingUpdate::Text(text.clone())));
    }
    if let Some(position) = &args.position {
        let position = position.parse::<Position>().map_err(anyhow::Error::msg)?;
        session.apply(Intent::Update(SettingUpdate::Position(position)));
    }
    if let Some(spacing_x) = args.spacing_x {
        session.apply(Intent::Update(SettingUpdate::SpacingX(spacing_x)));
    }
    if let Some(spacing_y) = args.spacing_y {
        session.apply(Intent::Update(SettingUpdate::SpacingY(spacing_y)));
    }
    if let Some(font_family) = &args.font_family {
        session.apply(Intent::Update(SettingUpdate::FontFamily(font_family.clone())));
    }
    if let Some(font_size) = args.font_size {
        session.apply(Intent::Update(SettingUpdate::FontSize(font_size)));
    }
    if let Some(color) = &args.color {
        session.apply(Intent::Update(SettingUpdate::FontColor(color.clone())));
    }
    if let Some(opacity) = args.opacity {
        session.apply(Intent::Update(SettingUpdate::Opacity(opacity)));
    }
    if let Some(rotation) = args.rotation {
        session.apply(Intent::Update(SettingUpdate::Rotation(rotation)));
    }
    Ok(())
}

fn apply_selection(session: &mut Session, select: &[usize]) {
    let mut first_applied = false;
    for &index in select {
        if index >= session.len() {
            tracing::warn!(index, images = session.len(), "selection index out of range");
            continue;
        }
        if first_applied {
            session.apply(Intent::ToggleSelect(index));
        } else {
            session.apply(Intent::Select(index));
            first_applied = true;
        }
    }
}

fn print_listing(session: &Session) {
    for (index, image) in session.images().iter().enumerate() {
        let marker = if session.selection().contains(&index) {
            "*"
        } else {
            " "
        };
        println!(
            "{} [{}] {} ({}x{}, {})",
            marker,
            index,
            image.name,
            image.image.width(),
            image.image.height(),
            format_file_size(image.byte_size)
        );
    }
    println!("{} image(s), {} selected", session.len(), session.selection().len());
}

fn write_output(dir: &Path, file: &ExportedFile) -> anyhow::Result<()> {
    let path = dir.join(&file.name);
    std::fs::write(&path, &file.data)
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    tracing::info!(path = %path.display(), bytes = file.data.len(), "wrote output");
    println!("{}", path.display());
    Ok(())
}

/// Scoped progress bar: cleared from the terminal when dropped, on both
/// the success and the error path.
struct ProgressGuard {
    bar: ProgressBar,
}

impl ProgressGuard {
    fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template("{bar:30} {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }
}

impl ProgressObserver for ProgressGuard {
    fn on_progress(&mut self, completed: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(completed as u64);
    }
}

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
