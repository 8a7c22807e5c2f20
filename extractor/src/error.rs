//! Error types for loading documents, querying them and emitting reports.

use std::path::PathBuf;

use oxigraph::sparql::EvaluationError;
use oxigraph::store::StorageError;

use crate::loader::RdfFormat;

/// A failure to turn a document on disk into a [`Graph`](crate::model::Graph).
///
/// Every variant is fatal: no partial graph and no partial report is produced.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The document could not be opened or read.
    #[error("failed to read {}", path.display())]
    Read {
        /// Path of the document.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid in the detected or declared serialization.
    #[error("{} is not valid {format}: {message}", path.display())]
    Syntax {
        /// Path of the document.
        path: PathBuf,
        /// Serialization the parser was run with.
        format: RdfFormat,
        /// Parser diagnostic.
        message: String,
    },

    /// Neither the file extension nor the content identify a serialization.
    #[error("cannot determine the RDF serialization of {}", path.display())]
    UnknownFormat {
        /// Path of the document.
        path: PathBuf,
    },
}

/// Any failure of a complete extraction run.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Loading the document failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The in-memory store could not be created or written.
    #[error("graph store failure")]
    Store(#[from] StorageError),

    /// A catalog query failed to parse or evaluate.
    #[error("query `{query}` failed")]
    Query {
        /// Name of the catalog query.
        query: String,
        /// Evaluation failure.
        #[source]
        source: EvaluationError,
    },

    /// A catalog query produced something other than solution rows.
    #[error("query `{query}` is not a SELECT query")]
    NotSelect {
        /// Name of the catalog query.
        query: String,
    },

    /// Writing the finished report to its output stream failed.
    #[error("failed to emit report")]
    Emit(#[source] std::io::Error),
}

/// Result alias for extraction runs.
pub type Result<T> = std::result::Result<T, ExtractError>;
