//! Document loading: serialization detection, parsing and storage.
//!
//! Parsing is delegated to the sophia parsers; the statements are then held
//! in a [`Graph`]. Quad-based serializations are flattened into the default
//! graph; graph names are dropped.

use std::fmt;
use std::path::Path;

use oxigraph::model::{BlankNode, GraphName, Literal, NamedNode, Quad, Subject, Term as OxTerm};
use sophia_api::parser::{QuadParser, TripleParser};
use sophia_api::quad::Quad as _;
use sophia_api::source::{QuadSource, TripleSource};
use sophia_api::term::{Term, TermKind};
use sophia_api::triple::Triple as _;
use sophia_iri::Iri;
use sophia_jsonld::JsonLdParser;
use sophia_turtle::parser::{nq, nt, trig::TriGParser, turtle::TurtleParser};
use sophia_xml::parser::RdfXmlParser;

use crate::error::{ParseError, Result};
use crate::model::Graph;

/// An RDF serialization the loader can parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// RDF/XML.
    RdfXml,
    /// Turtle (also used for N3 documents that stay within Turtle).
    Turtle,
    /// N-Triples.
    NTriples,
    /// N-Quads.
    NQuads,
    /// TriG.
    TriG,
    /// JSON-LD.
    JsonLd,
}

impl RdfFormat {
    /// All supported serializations.
    pub const ALL: [RdfFormat; 6] = [
        RdfFormat::RdfXml,
        RdfFormat::Turtle,
        RdfFormat::NTriples,
        RdfFormat::NQuads,
        RdfFormat::TriG,
        RdfFormat::JsonLd,
    ];

    /// Short name, as accepted on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RdfFormat::RdfXml => "xml",
            RdfFormat::Turtle => "turtle",
            RdfFormat::NTriples => "nt",
            RdfFormat::NQuads => "nquads",
            RdfFormat::TriG => "trig",
            RdfFormat::JsonLd => "json-ld",
        }
    }

    /// Looks up a serialization by its short name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    /// Maps a file extension to a serialization.
    ///
    /// `.xml` always means RDF/XML; the rest follow the usual RDF
    /// conventions. Matching ignores case.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xml" | "rdf" | "owl" | "owx" => Some(RdfFormat::RdfXml),
            "ttl" | "turtle" | "n3" => Some(RdfFormat::Turtle),
            "nt" | "ntriples" => Some(RdfFormat::NTriples),
            "nq" | "nquads" => Some(RdfFormat::NQuads),
            "trig" => Some(RdfFormat::TriG),
            "jsonld" | "json" => Some(RdfFormat::JsonLd),
            _ => None,
        }
    }

    /// Guesses the serialization from the document text.
    #[must_use]
    pub fn sniff(content: &str) -> Option<Self> {
        let head = content.trim_start_matches('\u{feff}').trim_start();
        if head.is_empty() {
            return None;
        }
        if head.starts_with("<?xml") || head.contains("<rdf:RDF") || looks_like_xml_element(head) {
            Some(RdfFormat::RdfXml)
        } else if head.starts_with('{') || head.starts_with('[') {
            Some(RdfFormat::JsonLd)
        } else if head.contains("@prefix")
            || head.contains("PREFIX")
            || head.contains("@base")
            || head.starts_with('<')
            || head.starts_with("_:")
        {
            Some(RdfFormat::Turtle)
        } else {
            None
        }
    }
}

/// An XML start tag without prolog, as in `<rdf:Description rdf:about="...">`.
fn looks_like_xml_element(head: &str) -> bool {
    let Some(rest) = head.strip_prefix('<') else {
        return false;
    };
    let tag = rest.split('>').next().unwrap_or_default();
    // IRIs cannot contain whitespace; a tag with attributes does.
    if tag.contains(char::is_whitespace) {
        return true;
    }
    let name = tag.trim_end_matches('/');
    name.split_once(':')
        .is_some_and(|(prefix, local)| is_xml_name(prefix) && is_xml_name(local))
        && (tag.ends_with('/') || head.contains(&format!("</{name}>")))
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RdfFormat::RdfXml => "RDF/XML",
            RdfFormat::Turtle => "Turtle",
            RdfFormat::NTriples => "N-Triples",
            RdfFormat::NQuads => "N-Quads",
            RdfFormat::TriG => "TriG",
            RdfFormat::JsonLd => "JSON-LD",
        })
    }
}

/// Reads and parses the document at `path`.
///
/// `format` forces a serialization; otherwise it is taken from the file
/// extension and, failing that, sniffed from the content.
///
/// # Errors
///
/// Returns [`ParseError::Read`] if the file cannot be read,
/// [`ParseError::UnknownFormat`] if no serialization can be determined,
/// [`ParseError::Syntax`] if the parser rejects the document and
/// [`ExtractError::Store`](crate::ExtractError::Store) if the statements
/// cannot be stored.
pub fn load(path: &Path, format: Option<RdfFormat>) -> Result<(Graph, RdfFormat)> {
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let format = format
        .or_else(|| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .and_then(RdfFormat::from_extension)
        })
        .or_else(|| RdfFormat::sniff(&text))
        .ok_or_else(|| ParseError::UnknownFormat {
            path: path.to_path_buf(),
        })?;

    let base = base_iri(path);
    let quads = parse_str(&text, format, base).map_err(|message| ParseError::Syntax {
        path: path.to_path_buf(),
        format,
        message,
    })?;
    let graph = Graph::from_quads(quads)?;

    tracing::info!(
        path = %path.display(),
        format = %format,
        triples = graph.len()?,
        "loaded document"
    );
    Ok((graph, format))
}

/// Parses `text` in the given serialization into default-graph quads.
///
/// # Errors
///
/// Returns the parser diagnostic if `text` is not valid `format`.
pub fn parse_str(
    text: &str,
    format: RdfFormat,
    base: Option<Iri<String>>,
) -> std::result::Result<Vec<Quad>, String> {
    let mut quads = Vec::new();
    match format {
        RdfFormat::RdfXml => {
            let mut source = RdfXmlParser { base }.parse_str(text);
            collect_triples(&mut source, &mut quads)?;
        }
        RdfFormat::Turtle => {
            let mut source = TurtleParser { base }.parse_str(text);
            collect_triples(&mut source, &mut quads)?;
        }
        RdfFormat::NTriples => {
            let mut source = nt::parse_str(text);
            collect_triples(&mut source, &mut quads)?;
        }
        RdfFormat::NQuads => {
            let mut source = nq::parse_str(text);
            collect_quads(&mut source, &mut quads)?;
        }
        RdfFormat::TriG => {
            let mut source = TriGParser { base }.parse_str(text);
            collect_quads(&mut source, &mut quads)?;
        }
        RdfFormat::JsonLd => {
            let mut source = JsonLdParser::new().parse_str(text);
            collect_quads(&mut source, &mut quads)?;
        }
    }
    Ok(quads)
}

fn collect_triples<S: TripleSource>(
    source: &mut S,
    quads: &mut Vec<Quad>,
) -> std::result::Result<(), String> {
    source
        .for_each_triple(|t| quads.extend(to_quad(t.s(), t.p(), t.o())))
        .map_err(|e| e.to_string())
}

fn collect_quads<S: QuadSource>(
    source: &mut S,
    quads: &mut Vec<Quad>,
) -> std::result::Result<(), String> {
    source
        .for_each_quad(|q| quads.extend(to_quad(q.s(), q.p(), q.o())))
        .map_err(|e| e.to_string())
}

/// Builds a default-graph quad. Quoted triples and variables cannot occur in
/// the patterns we run and are skipped.
fn to_quad<S: Term, P: Term, O: Term>(s: S, p: P, o: O) -> Option<Quad> {
    let subject = match to_term(s)? {
        OxTerm::NamedNode(iri) => Subject::NamedNode(iri),
        OxTerm::BlankNode(node) => Subject::BlankNode(node),
        _ => return None,
    };
    let OxTerm::NamedNode(predicate) = to_term(p)? else {
        return None;
    };
    Some(Quad::new(subject, predicate, to_term(o)?, GraphName::DefaultGraph))
}

/// Converts a sophia term into a store term.
fn to_term<T: Term>(term: T) -> Option<OxTerm> {
    match term.kind() {
        TermKind::Iri => term
            .iri()
            .map(|iri| NamedNode::new_unchecked(iri.as_str()).into()),
        TermKind::BlankNode => term
            .bnode_id()
            .map(|id| BlankNode::new_unchecked(id.as_str()).into()),
        TermKind::Literal => {
            let lexical = (*term.lexical_form()?).to_owned();
            let literal = match (term.language_tag(), term.datatype()) {
                (Some(tag), _) => Literal::new_language_tagged_literal_unchecked(
                    lexical,
                    tag.as_str().to_ascii_lowercase(),
                ),
                (None, Some(datatype)) => {
                    Literal::new_typed_literal(lexical, NamedNode::new_unchecked(datatype.as_str()))
                }
                (None, None) => Literal::new_simple_literal(lexical),
            };
            Some(literal.into())
        }
        _ => None,
    }
}

/// `file://` IRI of the canonical document path, used to resolve relative
/// references. Paths that do not form a valid IRI parse without a base.
fn base_iri(path: &Path) -> Option<Iri<String>> {
    let canonical = path.canonicalize().ok()?;
    let raw = canonical.to_string_lossy().replace('\\', "/");
    let iri = if raw.starts_with('/') {
        format!("file://{raw}")
    } else {
        format!("file:///{raw}")
    };
    match Iri::new(iri) {
        Ok(iri) => Some(iri),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no base IRI for document");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn xml_extension_is_always_rdf_xml() {
        assert_eq!(RdfFormat::from_extension("xml"), Some(RdfFormat::RdfXml));
        assert_eq!(RdfFormat::from_extension("XML"), Some(RdfFormat::RdfXml));
        assert_eq!(RdfFormat::from_extension("owl"), Some(RdfFormat::RdfXml));
    }

    #[test]
    fn common_extensions_are_recognised() {
        assert_eq!(RdfFormat::from_extension("ttl"), Some(RdfFormat::Turtle));
        assert_eq!(RdfFormat::from_extension("nt"), Some(RdfFormat::NTriples));
        assert_eq!(RdfFormat::from_extension("nq"), Some(RdfFormat::NQuads));
        assert_eq!(RdfFormat::from_extension("trig"), Some(RdfFormat::TriG));
        assert_eq!(RdfFormat::from_extension("jsonld"), Some(RdfFormat::JsonLd));
        assert_eq!(RdfFormat::from_extension("txt"), None);
    }

    #[test]
    fn sniffing_content() {
        assert_eq!(
            RdfFormat::sniff("<?xml version=\"1.0\"?>\n<rdf:RDF/>"),
            Some(RdfFormat::RdfXml)
        );
        assert_eq!(
            RdfFormat::sniff("  {\"@context\": {}}"),
            Some(RdfFormat::JsonLd)
        );
        assert_eq!(
            RdfFormat::sniff("@prefix owl: <http://www.w3.org/2002/07/owl#> ."),
            Some(RdfFormat::Turtle)
        );
        assert_eq!(RdfFormat::sniff("   \n"), None);
        assert_eq!(RdfFormat::sniff("hello world"), None);
    }

    #[test]
    fn names_round_trip_through_from_name() {
        for format in RdfFormat::ALL {
            assert_eq!(RdfFormat::from_name(format.as_str()), Some(format));
        }
        assert_eq!(RdfFormat::from_name("TURTLE"), Some(RdfFormat::Turtle));
    }

    #[test]
    fn sniffing_rdf_xml_without_prolog() {
        let bare = "<rdf:Description xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\" \
                    rdf:about=\"http://ex.org/a\"/>";
        assert_eq!(RdfFormat::sniff(bare), Some(RdfFormat::RdfXml));
        assert_eq!(
            RdfFormat::sniff("<!-- vocabulary -->\n<rdf:RDF/>"),
            Some(RdfFormat::RdfXml)
        );
        assert_eq!(
            RdfFormat::sniff("<owl:Ontology>\n</owl:Ontology>"),
            Some(RdfFormat::RdfXml)
        );
        assert_eq!(
            RdfFormat::sniff("<urn:ex:a> <http://ex.org/p> <urn:ex:b> ."),
            Some(RdfFormat::Turtle)
        );
        assert_eq!(
            RdfFormat::sniff("<urn:a> <http://ex.org/p> \"x\" ."),
            Some(RdfFormat::Turtle)
        );
    }

    #[test]
    fn parses_turtle_terms() {
        let ttl = r#"
            @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
            <http://ex.org/A> rdfs:label "A"@EN , "Een"@nl ;
                rdfs:comment "plain" ;
                rdfs:seeAlso _:b .
        "#;
        let quads = parse_str(ttl, RdfFormat::Turtle, None).unwrap();
        assert_eq!(quads.len(), 4);
        assert!(quads.iter().all(|q| q.graph_name == GraphName::DefaultGraph));
        let langs: Vec<_> = quads
            .iter()
            .filter_map(|q| match &q.object {
                OxTerm::Literal(lit) => lit.language().map(str::to_owned),
                _ => None,
            })
            .collect();
        assert_eq!(langs, vec!["en", "nl"]);
        assert!(quads
            .iter()
            .any(|q| matches!(q.object, OxTerm::BlankNode(_))));
    }

    #[test]
    fn typed_literals_keep_their_datatype() {
        let nt = "<http://ex.org/a> <http://ex.org/p> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> .";
        let quads = parse_str(nt, RdfFormat::NTriples, None).unwrap();
        let OxTerm::Literal(lit) = &quads[0].object else {
            unreachable!("object is a literal");
        };
        assert_eq!(lit.value(), "1");
        assert_eq!(
            lit.datatype().as_str(),
            "http://www.w3.org/2001/XMLSchema#integer"
        );
    }

    #[test]
    fn rejects_malformed_turtle() {
        let broken = "<http://ex.org/a> <http://ex.org/b> .";
        assert!(parse_str(broken, RdfFormat::Turtle, None).is_err());
    }

    #[test]
    fn flattens_quads_into_one_graph() {
        let nq = "<http://ex.org/a> <http://ex.org/p> \"x\" <http://ex.org/g1> .\n\
                  <http://ex.org/a> <http://ex.org/p> \"x\" <http://ex.org/g2> .\n\
                  <http://ex.org/b> <http://ex.org/p> \"y\" .\n";
        let quads = parse_str(nq, RdfFormat::NQuads, None).unwrap();
        assert!(quads.iter().all(|q| q.graph_name == GraphName::DefaultGraph));
        let graph = Graph::from_quads(quads).unwrap();
        assert_eq!(graph.len().unwrap(), 2);
    }

    #[test]
    fn flattens_trig_named_graphs() {
        let trig = r#"
            @prefix ex: <http://ex.org/> .
            ex:g1 { ex:a ex:p "x" . }
            ex:g2 { ex:a ex:p "x" . ex:b ex:p "y" . }
        "#;
        let quads = parse_str(trig, RdfFormat::TriG, None).unwrap();
        let graph = Graph::from_quads(quads).unwrap();
        assert_eq!(graph.len().unwrap(), 2);
    }

    #[test]
    fn parses_json_ld() {
        let json = r#"{
            "@context": {"rdfs": "http://www.w3.org/2000/01/rdf-schema#"},
            "@id": "http://ex.org/a",
            "rdfs:label": {"@value": "A", "@language": "en"}
        }"#;
        let quads = parse_str(json, RdfFormat::JsonLd, None).unwrap();
        assert_eq!(quads.len(), 1);
        assert_eq!(
            quads[0].predicate.as_str(),
            "http://www.w3.org/2000/01/rdf-schema#label"
        );
    }
}
