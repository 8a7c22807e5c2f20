//! Namespaces the query catalog refers to by prefix.

use std::fmt::Write;

/// A namespace IRI and its query prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace {
    /// Prefix label, without the colon.
    pub prefix: &'static str,
    /// Namespace IRI.
    pub iri: &'static str,
}

const fn ns(prefix: &'static str, iri: &'static str) -> Namespace {
    Namespace { prefix, iri }
}

/// Every namespace declared in front of a catalog query.
pub const NAMESPACES: [Namespace; 10] = [
    ns("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ns("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ns("owl", "http://www.w3.org/2002/07/owl#"),
    ns("foaf", "http://xmlns.com/foaf/0.1/"),
    ns("dcterms", "http://purl.org/dc/terms/"),
    ns("vann", "http://purl.org/vocab/vann/"),
    ns("cc", "http://creativecommons.org/ns#"),
    ns("schema", "http://schema.org/"),
    ns("rec", "http://www.w3.org/2001/02pd/rec54#"),
    ns("wdsr", "http://www.w3.org/2007/05/powder-s#"),
];

/// `PREFIX` declarations for all of [`NAMESPACES`], one per line.
#[must_use]
pub fn prologue() -> String {
    NAMESPACES.iter().fold(String::new(), |mut out, ns| {
        let _ = writeln!(out, "PREFIX {}: <{}>", ns.prefix, ns.iri);
        out
    })
}
