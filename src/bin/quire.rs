use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "quire", version)]
struct Cli {
    /// Log debug output to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report the page layout of an SVG template.
    Classify(ClassifyArgs),
    /// Flatten one page of an SVG template into a document JSON.
    Ingest(IngestArgs),
    /// Render a document JSON to PNG.
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
struct ClassifyArgs {
    /// Input SVG.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct IngestArgs {
    /// Input SVG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output document JSON.
    #[arg(long)]
    out: PathBuf,

    /// Zero-based page to keep.
    #[arg(long, default_value_t = 0)]
    page: usize,

    /// Editor options JSON; defaults apply when omitted.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Directory of font files; the system fonts are used when omitted.
    #[arg(long)]
    fonts: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Device pixels per workspace pixel.
    #[arg(long, default_value_t = 0.25)]
    scale: f32,

    /// Extra font directories.
    #[arg(long)]
    fonts: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Classify(args) => cmd_classify(args),
        Command::Ingest(args) => cmd_ingest(args),
        Command::Preview(args) => cmd_preview(args),
    }
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    ensure_parent(path)?;
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn cmd_classify(args: ClassifyArgs) -> anyhow::Result<()> {
    let text = read_text(&args.in_path)?;
    let mut doc = quire::SvgDocument::parse(&text)?;
    quire::strip_tool_markup(&mut doc.root);
    let report = quire::classify(&doc);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_ingest(args: IngestArgs) -> anyhow::Result<()> {
    let text = read_text(&args.in_path)?;
    let options = match &args.options {
        Some(path) => quire::EditorOptions::from_path(path)?,
        None => quire::EditorOptions::default(),
    };

    let provider: Arc<dyn quire::FontProvider> = if args.fonts.is_empty() {
        Arc::new(quire::SystemFontProvider::new())
    } else {
        Arc::new(quire::DirectoryFontProvider::new(args.fonts.iter().cloned()))
    };
    let mut ingestor = quire::TemplateIngestor::new(Box::new(quire::UsvgImporter), provider);
    let template = ingestor.ingest(&text, &options.workspace)?;
    let page_count = template.pages.len();
    let page = template.pages.get(args.page).with_context(|| {
        format!(
            "page {} out of range; template has {page_count} page(s)",
            args.page
        )
    })?;

    let mut editor = quire::Editor::with_default_plugins(options)?;
    editor.add_template(page)?;
    let doc = editor.save()?;
    write_output(&args.out, doc.to_json()?.as_bytes())?;

    eprintln!(
        "wrote {} (page {} of {page_count}, {} objects)",
        args.out.display(),
        args.page + 1,
        doc.objects.len()
    );
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.scale.is_finite() && args.scale > 0.0,
        "scale must be a positive number"
    );
    let doc = quire::SceneDocument::from_path(&args.in_path)?;
    let options = quire::EditorOptions {
        workspace: doc.workspace,
        ..quire::EditorOptions::default()
    };
    let mut editor = quire::Editor::with_default_plugins(options)?;
    editor.load(doc)?;

    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    for dir in &args.fonts {
        db.load_fonts_dir(dir);
    }
    let mut surface = quire::SvgSurface::new(args.scale, Arc::new(db));
    quire::RenderSurface::render(&mut surface, editor.scene(), editor.workspace())?;
    let frame = surface
        .take_frame()
        .context("renderer produced no frame")?;

    ensure_parent(&args.out)?;
    frame
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
