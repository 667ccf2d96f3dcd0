use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rfimage::{CodecConfig, ImageFormats};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rfimage", version, about = "Inspect and convert images")]
struct Cli {
    /// JSON file with codec settings (limits, sniffing priority)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print format, size, depth and pixel digest of an image
    Info {
        file: PathBuf,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Decode an image and re-encode it
    Convert {
        input: PathBuf,
        output: PathBuf,
        /// Output format name; defaults to the output file extension
        #[arg(long)]
        format: Option<String>,
    },
    /// List registered formats in sniffing order
    Formats,
}

#[derive(Serialize)]
struct InfoReport {
    format: String,
    width: u32,
    height: u32,
    bits_per_pixel: u8,
    frames: usize,
    sha256: String,
}

fn load_formats(config: Option<&Path>) -> Result<ImageFormats> {
    let cfg = match config {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            CodecConfig::from_json_str(&text)?
        }
        None => CodecConfig::default(),
    };
    Ok(ImageFormats::with_config(cfg)?)
}

fn info(formats: &ImageFormats, file: &Path, json: bool) -> Result<()> {
    let data = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let Some((format, header)) = formats.sniff(&data) else {
        bail!("{}: unrecognized image format", file.display());
    };
    let name = format.name().to_string();
    let frames = formats.read_frames(&data)?;
    let first = frames.first().context("image has no frames")?;
    let report = InfoReport {
        format: name,
        width: header.width,
        height: header.height,
        bits_per_pixel: header.bits_per_pixel,
        frames: frames.len(),
        sha256: first.bitmap.to_bitmap32().digest(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}: {} {}x{} {} bpp", file.display(), report.format, report.width, report.height, report.bits_per_pixel);
        println!("frames: {}", report.frames);
        println!("sha256: {}", report.sha256);
    }
    Ok(())
}

fn convert(formats: &ImageFormats, input: &Path, output: &Path, format: Option<String>) -> Result<()> {
    let data = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let frames = formats.read_frames(&data).with_context(|| format!("decoding {}", input.display()))?;
    let target = match format {
        Some(name) => name,
        None => {
            let ext = output.extension().and_then(|e| e.to_str()).unwrap_or_default();
            match formats.by_extension(ext) {
                Some(f) => f.name().to_string(),
                None => bail!("cannot infer output format from {}; pass --format", output.display()),
            }
        }
    };
    let bytes = formats.encode(&target, &frames)?;
    fs::write(output, &bytes).with_context(|| format!("writing {}", output.display()))?;
    println!("wrote {} ({} bytes, {})", output.display(), bytes.len(), target);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let formats = load_formats(cli.config.as_deref())?;
    match cli.command {
        Cmd::Info { file, json } => info(&formats, &file, json),
        Cmd::Convert { input, output, format } => convert(&formats, &input, &output, format),
        Cmd::Formats => {
            for name in formats.names() {
                println!("{}", name);
            }
            Ok(())
        }
    }
}
