//! In-memory graph model.
//!
//! A [`Graph`] wraps an in-memory [`Store`]. It is filled once by the
//! [loader](crate::loader) and then only queried; every statement lives in
//! the default graph.

use oxigraph::model::Quad;
use oxigraph::sparql::{EvaluationError, QueryResults};
use oxigraph::store::{StorageError, Store};

/// A loaded document.
pub struct Graph {
    store: Store,
}

impl Graph {
    /// Creates a graph holding `quads`. Duplicate statements are stored once.
    ///
    /// # Errors
    ///
    /// Returns the store error if the store cannot be created or written.
    pub fn from_quads(quads: impl IntoIterator<Item = Quad>) -> Result<Self, StorageError> {
        let store = Store::new()?;
        for quad in quads {
            store.insert(quad.as_ref())?;
        }
        Ok(Self { store })
    }

    /// Number of distinct statements.
    ///
    /// # Errors
    ///
    /// Returns the store error if the store cannot be read.
    pub fn len(&self) -> Result<usize, StorageError> {
        self.store.len()
    }

    /// Evaluates a SPARQL query against the graph.
    ///
    /// # Errors
    ///
    /// Returns the evaluation error if `sparql` does not parse or cannot be
    /// evaluated.
    pub fn query(&self, sparql: &str) -> Result<QueryResults, EvaluationError> {
        self.store.query(sparql)
    }
}
