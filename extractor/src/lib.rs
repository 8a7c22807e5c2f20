//! Ontology metadata extraction.
//!
//! The `specgen-extractor` crate loads an RDF/OWL document into an in-memory
//! [`Graph`](model::Graph), runs a fixed sequence of SPARQL queries against
//! it (ontology header, editors, makers, classes, properties) and serializes
//! the results as a flat, INI-style key-value [`Report`].
//!
//! # Entry Point
//!
//! ```no_run
//! let text = specgen_extractor::convert("vocabulary.rdf").expect("extraction failed");
//! assert!(text.starts_with("[metadata]\n"));
//! ```
//!
//! # Report Layout
//!
//! | Section | Contents |
//! |---------|----------|
//! | `metadata` | Ontology header: `uri`, `prefix`, `prefUri`, `label`, `title`, `abstract`, `issued`, `modified`, `rights`, mediator contact |
//! | `editor:<uri>`, `editors` | One section per editor, then the comma-joined `list` |
//! | `maker:<uri>`, `makers` | One section per maker, then the comma-joined `list` |
//! | `glance` | Comma-joined labels and IRIs of classes and properties, per language |
//! | `class:<uri>`, `class_nl:<uri>` | Class details |
//! | `property:<uri>`, `property_nl:<uri>` | Property details, including `domain` and `range` |

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod loader;
pub mod model;
pub mod queries;
pub mod query;
pub mod report;
pub mod vocab;

use std::io::Write;
use std::path::Path;

pub use error::{ExtractError, ParseError, Result};
pub use loader::RdfFormat;
pub use report::{Language, Report, Section};

/// Options for an extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Main report language (`en` by default).
    pub primary: Language,
    /// Sibling language reported in `_<tag>` sections (`nl` by default).
    pub secondary: Language,
    /// Serialization override; detected from the document when `None`.
    pub format: Option<RdfFormat>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            primary: Language::primary("en"),
            secondary: Language::secondary("nl"),
            format: None,
        }
    }
}

/// Runs extractions with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    /// Creates an extractor.
    #[must_use]
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Loads the document at `path` and builds its report.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Parse`] if the document cannot be read, its
    /// serialization cannot be determined, or it is malformed, and
    /// [`ExtractError::Store`] or [`ExtractError::Query`] if the loaded graph
    /// cannot be stored or queried.
    pub fn extract(&self, path: impl AsRef<Path>) -> Result<Report> {
        let (graph, format) = loader::load(path.as_ref(), self.options.format)?;
        tracing::debug!(%format, "building report");
        self.report(&graph)
    }

    /// Builds the report for an already loaded graph.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Query`] if a catalog query fails.
    pub fn report(&self, graph: &model::Graph) -> Result<Report> {
        report::build(graph, &self.options.primary, &self.options.secondary)
    }

    /// Extracts the document at `path`, writes the rendered report to `out`
    /// and returns it.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Extractor::extract`], and
    /// [`ExtractError::Emit`] if writing to `out` fails.
    pub fn convert_to<W: Write>(&self, path: impl AsRef<Path>, out: &mut W) -> Result<String> {
        let text = self.extract(path)?.render();
        out.write_all(text.as_bytes()).map_err(ExtractError::Emit)?;
        out.flush().map_err(ExtractError::Emit)?;
        Ok(text)
    }
}

/// Extracts the document at `path` with default options, prints the report
/// to standard output and returns it.
///
/// # Errors
///
/// Returns the errors of [`Extractor::extract`], and
/// [`ExtractError::Emit`] if standard output cannot be written.
pub fn convert(path: impl AsRef<Path>) -> Result<String> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    Extractor::default().convert_to(path, &mut lock)
}
