//! Named SPARQL `SELECT` queries and their rows.
//!
//! A [`SelectQuery`] pairs the query text with a short name used in logs and
//! errors. Executing it against a [`Graph`] yields [`Solutions`], which pulls
//! rows from the store as it is iterated.
//!
//! ```
//! use oxigraph::model::{GraphName, Literal, NamedNode, Quad};
//! use specgen_extractor::model::Graph;
//! use specgen_extractor::query::SelectQuery;
//!
//! let graph = Graph::from_quads([Quad::new(
//!     NamedNode::new_unchecked("http://ex.org/a"),
//!     NamedNode::new_unchecked("http://www.w3.org/2000/01/rdf-schema#label"),
//!     Literal::new_language_tagged_literal_unchecked("A", "en"),
//!     GraphName::DefaultGraph,
//! )])?;
//!
//! let query = SelectQuery::new(
//!     "labels",
//!     "SELECT ?label WHERE { ?s <http://www.w3.org/2000/01/rdf-schema#label> ?label \
//!      FILTER(LANGMATCHES(LANG(?label), \"en\")) }",
//! );
//! let rows = query.execute(&graph)?.collect::<Result<Vec<_>, _>>()?;
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].text("label").as_deref(), Some("A"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use oxigraph::model::Term;
use oxigraph::sparql::{QueryResults, QuerySolution, QuerySolutionIter};

use crate::error::{ExtractError, Result};
use crate::model::Graph;

/// A named `SELECT` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    name: String,
    text: String,
}

impl SelectQuery {
    /// Creates a query from its name and SPARQL text.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// SPARQL text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Runs the query against `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Query`] if the query cannot be parsed or
    /// evaluated and [`ExtractError::NotSelect`] if it does not produce rows.
    pub fn execute(&self, graph: &Graph) -> Result<Solutions> {
        tracing::debug!(query = %self.name, "running query");
        match graph.query(&self.text) {
            Ok(QueryResults::Solutions(inner)) => Ok(Solutions {
                query: self.name.clone(),
                inner,
            }),
            Ok(_) => Err(ExtractError::NotSelect {
                query: self.name.clone(),
            }),
            Err(source) => Err(ExtractError::Query {
                query: self.name.clone(),
                source,
            }),
        }
    }
}

/// Rows of an executed query, in the order the store produces them.
pub struct Solutions {
    query: String,
    inner: QuerySolutionIter,
}

impl Iterator for Solutions {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.inner.next()?;
        Some(next.map(Row).map_err(|source| ExtractError::Query {
            query: self.query.clone(),
            source,
        }))
    }
}

/// One solution: variable bindings by name.
pub struct Row(QuerySolution);

impl Row {
    /// The term bound to `var`, if any.
    #[must_use]
    pub fn get(&self, var: &str) -> Option<&Term> {
        self.0.get(var)
    }

    /// The textual value bound to `var`: the IRI, the blank node label or
    /// the literal's lexical form.
    #[must_use]
    pub fn text(&self, var: &str) -> Option<String> {
        self.get(var).map(text_value)
    }
}

fn text_value(term: &Term) -> String {
    match term {
        Term::NamedNode(iri) => iri.as_str().to_owned(),
        Term::BlankNode(node) => node.as_str().to_owned(),
        Term::Literal(literal) => literal.value().to_owned(),
        #[allow(unreachable_patterns)]
        other => other.to_string(),
    }
}
