use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use snapcard::{ImageInput, PreparedAssetStore, RasterSurface, RenderInputs, Rgba8, Template};

#[derive(Parser, Debug)]
#[command(name = "snapcard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a card and write it as a PNG.
    Render(RenderArgs),
    /// Parse and validate a template without rendering.
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input template JSON. Asset sources resolve relative to its directory.
    #[arg(long)]
    template: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Background color as a hex string (e.g. `#0369A1`).
    #[arg(long)]
    background: Option<String>,

    /// User image file to place inside the image mask.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Caption text override.
    #[arg(long)]
    caption: Option<String>,

    /// Call-to-action text override.
    #[arg(long)]
    cta: Option<String>,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input template JSON.
    #[arg(long)]
    template: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Validate(args) => cmd_validate(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let template = Template::from_path(&args.template)?;
    let assets_root = args
        .template
        .parent()
        .unwrap_or_else(|| std::path::Path::new("."));

    let mut inputs = RenderInputs::from_template(&template);
    if let Some(hex) = &args.background {
        inputs.background_color = Rgba8::from_hex(hex)?;
    }
    if let Some(path) = &args.image {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read user image '{}'", path.display()))?;
        inputs.user_image = Some(ImageInput::Bytes(bytes));
    }
    if let Some(caption) = args.caption {
        inputs.caption_text = caption;
    }
    if let Some(cta) = args.cta {
        inputs.cta_text = cta;
    }

    let store = PreparedAssetStore::prepare(&template, &inputs, assets_root)?;
    for failure in store.failures() {
        eprintln!("warning: skipped {} layer: {}", failure.layer, failure.reason);
    }

    let mut surface = RasterSurface::new(template.canvas, store.font_bytes())?;
    snapcard::render(&mut surface, &template, &inputs, &store)?;
    let frame = surface.into_frame();

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let template = Template::from_path(&args.template)?;
    eprintln!(
        "ok: {}x{} canvas, caption {:.0}px, cta {:.0}px",
        template.canvas.width, template.canvas.height, template.caption.font_size, template.cta.font_size
    );
    Ok(())
}
