//! `specgen-extract` — Extracts ontology metadata from an RDF/OWL document
//! and prints it as a flat key-value report.
//!
//! **Outputs:**
//! - stdout — the report (INI-style by default, JSON with `--emit json`)
//! - `<out>` — the same report, when `--out` is given
//!
//! **Usage:**
//! ```
//! specgen-extract <INPUT> [--format <fmt>] [--lang <tag>] [--alt-lang <tag>]
//!                 [--emit ini|json] [--out <path>] [-v...]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use specgen_extractor::{ExtractOptions, Extractor, Language, RdfFormat};
use tracing::Level;

/// Report encoding written to stdout and `--out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// `[section]` headers with `key=value` lines.
    Ini,
    /// JSON array of sections.
    Json,
}

/// Extract ontology metadata into a flat key-value report.
#[derive(Parser)]
#[command(
    name = "specgen-extract",
    about = "Extract ontology metadata from an RDF/OWL document"
)]
struct Args {
    /// Path to the ontology document.
    input: PathBuf,

    /// Input serialization (xml, turtle, nt, nquads, trig, json-ld); detected when omitted.
    #[arg(long)]
    format: Option<String>,

    /// Main report language.
    #[arg(long, default_value = "en")]
    lang: String,

    /// Sibling report language, emitted in `_<tag>` sections.
    #[arg(long, default_value = "nl")]
    alt_lang: String,

    /// Output encoding.
    #[arg(long, value_enum, default_value_t = Emit::Ini)]
    emit: Emit,

    /// Also write the report to this file.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let format = args
        .format
        .as_deref()
        .map(|name| {
            RdfFormat::from_name(name).ok_or_else(|| anyhow!("unsupported --format: {name}"))
        })
        .transpose()?;

    let extractor = Extractor::new(ExtractOptions {
        primary: Language::primary(args.lang),
        secondary: Language::secondary(args.alt_lang),
        format,
    });

    let report = extractor
        .extract(&args.input)
        .with_context(|| format!("Failed to extract {}", args.input.display()))?;

    let text = match args.emit {
        Emit::Ini => report.render(),
        Emit::Json => {
            let mut json = report.to_json().context("Failed to serialize report to JSON")?;
            json.push('\n');
            json
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .context("Failed to write report to stdout")?;

    if let Some(out) = &args.out {
        fs::write(out, &text).with_context(|| format!("Failed to write {}", out.display()))?;
        tracing::info!(path = %out.display(), "report written");
    }

    Ok(())
}
