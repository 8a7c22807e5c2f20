//! The fixed query catalog.
//!
//! Each constructor builds one SPARQL query; the language-dependent ones
//! take the language tag as an argument and are run once per language.
//! List queries are ordered by the listed resource so repeated runs over the
//! same document report in the same order.

use crate::query::SelectQuery;
use crate::vocab;

/// Kind of vocabulary term listed in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// `owl:Class` or `rdfs:Class`.
    Class,
    /// `owl:ObjectProperty`, `owl:DatatypeProperty` or `rdf:Property`.
    Property,
}

impl EntityKind {
    /// Variable the term's IRI is bound to.
    #[must_use]
    pub fn var(self) -> &'static str {
        match self {
            EntityKind::Class => "class",
            EntityKind::Property => "p",
        }
    }

    /// Types that make a resource this kind of term, as prefixed names.
    #[must_use]
    pub fn types(self) -> &'static [&'static str] {
        match self {
            EntityKind::Class => &["owl:Class", "rdfs:Class"],
            EntityKind::Property => &["owl:ObjectProperty", "owl:DatatypeProperty", "rdf:Property"],
        }
    }

    /// `{ ?x a T1 } UNION { ?x a T2 } ...`
    fn typed(self) -> String {
        let var = self.var();
        self.types()
            .iter()
            .map(|ty| format!("{{ ?{var} a {ty} }}"))
            .collect::<Vec<_>>()
            .join(" UNION ")
    }
}

/// How a contributor is linked from the ontology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// `rec:editor`.
    Editor,
    /// `foaf:maker`.
    Maker,
}

impl Role {
    fn predicate(self) -> &'static str {
        match self {
            Role::Editor => "rec:editor",
            Role::Maker => "foaf:maker",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Role::Editor => "editors",
            Role::Maker => "makers",
        }
    }
}

/// Quotes `value` as a SPARQL string literal.
fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `SELECT DISTINCT *` over `body`, followed by solution `modifiers`.
fn select(name: impl Into<String>, body: &str, modifiers: &str) -> SelectQuery {
    let prologue = vocab::prologue();
    SelectQuery::new(
        name,
        format!("{prologue}SELECT DISTINCT * WHERE {{\n{body}}}{modifiers}"),
    )
}

/// Ontology header metadata; at most one row.
///
/// Label and abstract are taken in `lang` or untagged. The mediator's
/// homepage, mailbox and name are only bound when all three are present.
#[must_use]
pub fn ontology_header(lang: &str) -> SelectQuery {
    let lang = string_literal(lang);
    let body = format!(
        "  ?v a owl:Ontology .
  OPTIONAL {{ ?v vann:preferredNamespacePrefix ?prefix }}
  OPTIONAL {{ ?v vann:preferredNamespaceUri ?pUri }}
  OPTIONAL {{ ?v rdfs:label ?label . FILTER(LANG(?label) = \"\" || LANGMATCHES(LANG(?label), {lang})) }}
  OPTIONAL {{ ?v dcterms:abstract ?abstract . FILTER(LANG(?abstract) = \"\" || LANGMATCHES(LANG(?abstract), {lang})) }}
  OPTIONAL {{ ?v cc:attributionName ?attribution }}
  OPTIONAL {{ ?v cc:attributionUrl ?attributionUrl }}
  OPTIONAL {{ ?v dcterms:issued ?issued }}
  OPTIONAL {{ ?v dcterms:modified ?modified }}
  OPTIONAL {{ ?v dcterms:rights ?rights }}
  OPTIONAL {{ ?v dcterms:title ?title }}
  OPTIONAL {{
    ?v dcterms:mediator ?m .
    ?m foaf:homepage ?mhomepage .
    ?m foaf:mbox ?mmbox .
    ?m foaf:name ?mname .
  }}
"
    );
    select("ontology", &body, " LIMIT 1")
}

/// Contributors in `role`, bound to `?agent`, with optional contact fields
/// and affiliation.
#[must_use]
pub fn contributors(role: Role) -> SelectQuery {
    let predicate = role.predicate();
    let body = format!(
        "  ?v a owl:Ontology .
  ?v {predicate} ?agent .
  OPTIONAL {{
    ?agent schema:affiliation ?affiliation .
    ?affiliation foaf:homepage ?ahomepage .
    ?affiliation foaf:name ?aName .
  }}
  OPTIONAL {{ ?agent foaf:homepage ?mhomepage }}
  OPTIONAL {{ ?agent foaf:mbox ?mmbox }}
  OPTIONAL {{ ?agent foaf:name ?mname }}
"
    );
    select(role.name(), &body, " ORDER BY ?agent")
}

/// Terms of `kind` with a label in `lang`, for the summary lists.
#[must_use]
pub fn glance(kind: EntityKind, lang: &str) -> SelectQuery {
    let var = kind.var();
    let body = format!(
        "  {typed} .
  ?{var} rdfs:label ?label .
  FILTER(LANGMATCHES(LANG(?label), {tag}))
",
        typed = kind.typed(),
        tag = string_literal(lang),
    );
    select(format!("glance/{var}/{lang}"), &body, &format!(" ORDER BY ?{var}"))
}

/// Terms of `kind` with both a label and a comment in `lang`, plus their
/// descriptive fields. Terms without a comment in `lang` are not returned.
#[must_use]
pub fn details(kind: EntityKind, lang: &str) -> SelectQuery {
    let var = kind.var();
    let domain_range = match kind {
        EntityKind::Class => String::new(),
        EntityKind::Property => format!(
            "  OPTIONAL {{ ?{var} rdfs:domain ?domain }}\n  OPTIONAL {{ ?{var} rdfs:range ?range }}\n"
        ),
    };
    let body = format!(
        "  {typed} .
  ?{var} rdfs:label ?label .
  FILTER(LANGMATCHES(LANG(?label), {tag})) .
  OPTIONAL {{ ?{var} dcterms:identifier ?identifier }}
  ?{var} rdfs:comment ?comment .
  FILTER(LANGMATCHES(LANG(?comment), {tag})) .
{domain_range}  OPTIONAL {{ ?{var} vann:usageNote ?usageNote }}
  OPTIONAL {{ ?{var} rdfs:isDefinedBy ?definedBy }}
  OPTIONAL {{ ?{var} wdsr:describedBy ?describedBy }}
",
        typed = kind.typed(),
        tag = string_literal(lang),
    );
    select(format!("details/{var}/{lang}"), &body, &format!(" ORDER BY ?{var}"))
}
