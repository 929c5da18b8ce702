use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bindata_tools::{format_layout_pretty, layout_report, DemoType};
use clap::{Parser, Subcommand, ValueEnum};
use codec::CodecCache;
use glob::Pattern;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bindata-tools",
    version,
    about = "bindata layout inspection and decoding tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the compiled wire layout of a type.
    Layout {
        #[arg(value_enum)]
        ty: DemoType,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Write an encoded sample value.
    Sample {
        #[arg(value_enum)]
        ty: DemoType,
        /// Destination file.
        #[arg(long)]
        out: PathBuf,
        /// Seed for the sample generator.
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
    /// Decode an encoded file, or every file in a directory.
    Decode {
        #[arg(value_enum)]
        ty: DemoType,
        /// File or directory to decode.
        path: PathBuf,
        /// Optional glob filter when decoding a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Layout { ty, format } => {
            let codec = ty
                .codec(CodecCache::global())
                .with_context(|| format!("build codec for {ty:?}"))?;
            let report = layout_report(&codec);
            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&report).context("serialize json")?;
                    println!("{json}");
                }
                OutputFormat::Pretty => print!("{}", format_layout_pretty(&report)),
            }
        }
        Command::Sample { ty, out, seed } => {
            let bytes = ty
                .sample_bytes(seed)
                .with_context(|| format!("encode sample {ty:?}"))?;
            fs::write(&out, &bytes).with_context(|| format!("write {}", out.display()))?;
            println!("wrote {} bytes to {}", bytes.len(), out.display());
        }
        Command::Decode {
            ty,
            path,
            glob,
            format,
        } => {
            if path.is_dir() {
                for entry in collect_entries(&path, glob.as_deref())? {
                    println!("== {} ==", entry.display());
                    decode_file(ty, &entry, format)?;
                }
            } else {
                decode_file(ty, &path, format)?;
            }
        }
    }
    Ok(())
}

fn decode_file(ty: DemoType, path: &Path, format: OutputFormat) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    debug!(path = %path.display(), len = bytes.len(), "decoding");
    let decoded = ty
        .decode(&bytes)
        .with_context(|| format!("decode {}", path.display()))?;
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&decoded.json).context("serialize json")?;
            println!("{json}");
        }
        OutputFormat::Pretty => println!("{}", decoded.debug),
    }
    Ok(())
}

fn collect_entries(dir: &Path, glob: Option<&str>) -> Result<Vec<PathBuf>> {
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        entries.push(path);
    }
    entries.sort();
    Ok(entries)
}
