//! Report model, assembly and INI-style rendering.
//!
//! A [`Report`] is an ordered list of [`Section`]s. Rendering writes each
//! section as a `[name]` header followed by `key=value` lines, with one blank
//! line between sections:
//!
//! ```text
//! [metadata]
//! uri=http://ex.org/onto
//! title=Test
//!
//! [glance]
//! classes=Person
//! class_uris=http://ex.org/Person
//! ```

use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::model::Graph;
use crate::queries::{self, EntityKind, Role};
use crate::query::Row;

/// A language the report is produced in, and the suffix its section and
/// summary keys carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    tag: String,
    suffix: String,
}

impl Language {
    /// The main report language; its keys carry no suffix.
    pub fn primary(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            suffix: String::new(),
        }
    }

    /// The sibling language; its keys carry `_<tag>`.
    pub fn secondary(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let suffix = format!("_{tag}");
        Self { tag, suffix }
    }

    /// Language tag used in filters.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Suffix appended to section names and summary keys.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

/// One `key=value` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Field key.
    pub key: String,
    /// Field value, always a single line.
    pub value: String,
}

/// A named group of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Section name, without brackets.
    pub name: String,
    /// Fields in emission order.
    pub fields: Vec<Field>,
}

impl Section {
    /// Creates an empty section.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds `key` with `value`; absent values add nothing.
    pub fn field(&mut self, key: impl Into<String>, value: Option<String>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Adds `key` with the comma-joined `values`; an empty list adds nothing.
    pub fn list_field(&mut self, key: impl Into<String>, values: &[String]) -> &mut Self {
        if !values.is_empty() {
            self.push(key, values.join(","));
        }
        self
    }

    /// Adds a field unconditionally, with line breaks collapsed to single
    /// spaces.
    pub fn push(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
        self.fields.push(Field {
            key: key.into(),
            value: single_line(value.as_ref()),
        });
    }

    /// The value of the first field named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }
}

/// Replaces each line break (`\r\n`, `\n` or `\r`) with one space.
fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// The complete extraction result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    sections: Vec<Section>,
}

impl Report {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a section.
    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Sections in emission order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The first section named `name`.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Renders the INI-style text.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Renders the sections as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.sections)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            writeln!(f, "[{}]", section.name)?;
            for field in &section.fields {
                writeln!(f, "{}={}", field.key, field.value)?;
            }
        }
        Ok(())
    }
}

/// Runs the query catalog against `graph` and assembles the report.
///
/// Section order: `metadata`, editors, makers, `glance`, class details and
/// property details, each language pass in turn.
///
/// # Errors
///
/// Returns [`ExtractError::Query`](crate::ExtractError::Query) if a catalog
/// query fails.
pub fn build(graph: &Graph, primary: &Language, secondary: &Language) -> Result<Report> {
    let languages = [primary, secondary];
    let mut report = Report::new();

    report.push(metadata(graph, primary)?);
    contributor_sections(graph, Role::Editor, &mut report)?;
    contributor_sections(graph, Role::Maker, &mut report)?;

    let glance = glance(graph, &languages)?;
    if !glance.fields.is_empty() {
        report.push(glance);
    }

    for kind in [EntityKind::Class, EntityKind::Property] {
        for lang in languages {
            for row in queries::details(kind, lang.tag()).execute(graph)? {
                if let Some(section) = detail_section(kind, lang, &row?) {
                    report.push(section);
                }
            }
        }
    }
    Ok(report)
}

fn metadata(graph: &Graph, lang: &Language) -> Result<Section> {
    let mut section = Section::new("metadata");
    if let Some(row) = queries::ontology_header(lang.tag()).execute(graph)?.next() {
        let row = row?;
        section
            .field("uri", row.text("v"))
            .field("prefix", row.text("prefix"))
            .field("prefUri", row.text("pUri"))
            .field("label", row.text("label"))
            .field("title", row.text("title"))
            .field("abstract", row.text("abstract"))
            .field("issued", row.text("issued"))
            .field("modified", row.text("modified"))
            .field("rights", row.text("rights"));
        if row.get("m").is_some() {
            section
                .field("mname", row.text("mname"))
                .field("mhomepage", row.text("mhomepage"))
                .field("mmbox", row.text("mmbox"));
        }
    }
    Ok(section)
}

fn contributor_sections(graph: &Graph, role: Role, report: &mut Report) -> Result<()> {
    let (prefix, summary, affiliation_key) = match role {
        Role::Editor => ("editor", "editors", "aName"),
        Role::Maker => ("maker", "makers", "aname"),
    };

    let mut agents = Vec::new();
    for row in queries::contributors(role).execute(graph)? {
        let row = row?;
        let Some(agent) = row.text("agent") else {
            continue;
        };

        let mut section = Section::new(format!("{prefix}:{agent}"));
        section
            .field("mname", row.text("mname"))
            .field("mhomepage", row.text("mhomepage"))
            .field("mmbox", row.text("mmbox"));
        if row.get("affiliation").is_some() {
            section
                .field(affiliation_key, row.text("aName"))
                .field("ahomepage", row.text("ahomepage"));
        }
        report.push(section);
        agents.push(agent);
    }

    if !agents.is_empty() {
        let mut section = Section::new(summary);
        section.list_field("list", &agents);
        report.push(section);
    }
    Ok(())
}

fn glance(graph: &Graph, languages: &[&Language; 2]) -> Result<Section> {
    let mut section = Section::new("glance");
    for (kind, labels_key, uris_key) in [
        (EntityKind::Class, "classes", "class_uris"),
        (EntityKind::Property, "properties", "prop_uris"),
    ] {
        for lang in languages {
            let mut labels = Vec::new();
            let mut uris = Vec::new();
            for row in queries::glance(kind, lang.tag()).execute(graph)? {
                let row = row?;
                if let (Some(uri), Some(label)) = (row.text(kind.var()), row.text("label")) {
                    uris.push(uri);
                    labels.push(label);
                }
            }
            section
                .list_field(format!("{labels_key}{}", lang.suffix()), &labels)
                .list_field(format!("{uris_key}{}", lang.suffix()), &uris);
        }
    }
    Ok(section)
}

fn detail_section(kind: EntityKind, lang: &Language, row: &Row) -> Option<Section> {
    let subject = row.text(kind.var())?;
    let prefix = match kind {
        EntityKind::Class => "class",
        EntityKind::Property => "property",
    };
    let mut section = Section::new(format!("{prefix}{}:{subject}", lang.suffix()));
    section
        .field("label", row.text("label"))
        .field("identifier", row.text("identifier"));
    if kind == EntityKind::Property {
        section
            .field("domain", row.text("domain"))
            .field("range", row.text("range"));
    }
    section
        .field("comment", row.text("comment"))
        .field("usageNote", row.text("usageNote"))
        .field("definedBy", row.text("definedBy"))
        .field("describedBy", row.text("describedBy"));
    Some(section)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::loader::{parse_str, RdfFormat};

    const PREFIXES: &str = "
        @prefix owl: <http://www.w3.org/2002/07/owl#> .
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
        @prefix dcterms: <http://purl.org/dc/terms/> .
        @prefix foaf: <http://xmlns.com/foaf/0.1/> .
        @prefix vann: <http://purl.org/vocab/vann/> .
        @prefix schema: <http://schema.org/> .
        @prefix rec: <http://www.w3.org/2001/02pd/rec54#> .
    ";

    fn graph(ttl: &str) -> Graph {
        let text = format!("{PREFIXES}{ttl}");
        Graph::from_quads(parse_str(&text, RdfFormat::Turtle, None).unwrap()).unwrap()
    }

    /// A graph holding the ontology resource plus `ttl`.
    fn ontology(ttl: &str) -> Graph {
        graph(&format!("<http://ex.org/onto> a owl:Ontology .\n{ttl}"))
    }

    fn build_default(graph: &Graph) -> Report {
        build(graph, &Language::primary("en"), &Language::secondary("nl")).unwrap()
    }

    #[test]
    fn renders_blank_line_between_sections() {
        let mut report = Report::new();
        let mut first = Section::new("a");
        first.push("k", "v");
        report.push(first);
        report.push(Section::new("b"));
        assert_eq!(report.render(), "[a]\nk=v\n\n[b]\n");
    }

    #[test]
    fn absent_and_empty_values_are_omitted() {
        let mut section = Section::new("s");
        section
            .field("present", Some("x".to_owned()))
            .field("absent", None)
            .list_field("empty", &[]);
        assert_eq!(section.fields.len(), 1);
        assert_eq!(section.get("present"), Some("x"));
    }

    #[test]
    fn every_line_break_becomes_one_space() {
        let mut section = Section::new("s");
        section
            .field("comment", Some("one\ntwo\r\nthree\rfour".to_owned()))
            .list_field("list", &["a\nb".to_owned(), "c".to_owned()]);
        assert_eq!(section.get("comment"), Some("one two three four"));
        assert_eq!(section.get("list"), Some("a b,c"));
    }

    #[test]
    fn bare_ontology_yields_only_uri() {
        let report = build_default(&ontology(""));
        assert_eq!(report.render(), "[metadata]\nuri=http://ex.org/onto\n");
    }

    #[test]
    fn missing_ontology_still_emits_metadata_header() {
        let report = build_default(&Graph::from_quads([]).unwrap());
        assert_eq!(report.render(), "[metadata]\n");
    }

    #[test]
    fn metadata_field_order() {
        let g = ontology(
            r#"<http://ex.org/onto> dcterms:rights "CC-BY" ;
                   dcterms:title "Test" ;
                   vann:preferredNamespacePrefix "ex" ;
                   dcterms:abstract "Line one\nline two"@en ."#,
        );
        assert_eq!(
            build_default(&g).render(),
            "[metadata]\nuri=http://ex.org/onto\nprefix=ex\ntitle=Test\n\
             abstract=Line one line two\nrights=CC-BY\n"
        );
    }

    #[test]
    fn multi_line_values_never_break_the_format() {
        let g = ontology(
            r#"<http://ex.org/onto> dcterms:title """Test
Vocabulary""" ;
                   dcterms:rights """Line one
line two""" .
               <http://ex.org/Thing> a owl:Class ;
                   rdfs:label """Multi
Label"""@en ;
                   rdfs:comment "Some\r\nthing."@en ."#,
        );
        let text = build_default(&g).render();
        for line in text.lines().filter(|l| !l.is_empty()) {
            assert!(
                line.starts_with('[') || line.contains('='),
                "orphan line {line:?}"
            );
        }
        let report = build_default(&g);
        let metadata = report.section("metadata").unwrap();
        assert_eq!(metadata.get("title"), Some("Test Vocabulary"));
        assert_eq!(metadata.get("rights"), Some("Line one line two"));
        assert_eq!(
            report.section("glance").and_then(|s| s.get("classes")),
            Some("Multi Label")
        );
        let thing = report.section("class:http://ex.org/Thing").unwrap();
        assert_eq!(thing.get("label"), Some("Multi Label"));
        assert_eq!(thing.get("comment"), Some("Some thing."));
    }

    #[test]
    fn editors_and_makers_use_their_own_affiliation_keys() {
        let g = ontology(
            r#"<http://ex.org/onto> rec:editor <http://ex.org/ed> ;
                   foaf:maker <http://ex.org/mk> .
               <http://ex.org/ed> foaf:name "Ed" ; schema:affiliation _:org .
               <http://ex.org/mk> schema:affiliation _:org .
               _:org foaf:name "Org" ; foaf:homepage <http://org.example/> ."#,
        );

        let report = build_default(&g);
        let editor = report.section("editor:http://ex.org/ed").unwrap();
        assert_eq!(editor.get("mname"), Some("Ed"));
        assert_eq!(editor.get("aName"), Some("Org"));
        let maker = report.section("maker:http://ex.org/mk").unwrap();
        assert_eq!(maker.get("aname"), Some("Org"));
        assert_eq!(maker.get("ahomepage"), Some("http://org.example/"));
        assert_eq!(
            report.section("editors").and_then(|s| s.get("list")),
            Some("http://ex.org/ed")
        );

        let names: Vec<_> = report.sections().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "metadata",
                "editor:http://ex.org/ed",
                "editors",
                "maker:http://ex.org/mk",
                "makers",
            ]
        );
    }

    #[test]
    fn glance_lists_labels_even_without_comment() {
        let g = ontology(
            r#"<http://ex.org/Person> a owl:Class ;
                   rdfs:label "Person"@en ;
                   rdfs:comment "A human\nbeing."@en .
               <http://ex.org/Agent> a rdfs:Class ;
                   rdfs:label "Agent"@en , "Actor"@nl ."#,
        );

        let report = build_default(&g);
        let glance = report.section("glance").unwrap();
        assert_eq!(glance.get("classes"), Some("Agent,Person"));
        assert_eq!(
            glance.get("class_uris"),
            Some("http://ex.org/Agent,http://ex.org/Person")
        );
        assert_eq!(glance.get("classes_nl"), Some("Actor"));
        assert_eq!(glance.get("properties"), None);

        let person = report.section("class:http://ex.org/Person").unwrap();
        assert_eq!(person.get("comment"), Some("A human being."));
        assert!(report.section("class:http://ex.org/Agent").is_none());
        assert!(report.section("class_nl:http://ex.org/Agent").is_none());
    }

    #[test]
    fn property_sections_carry_domain_and_range() {
        let g = ontology(
            r#"<http://ex.org/knows> a owl:ObjectProperty ;
                   rdfs:label "kent"@nl ;
                   rdfs:comment "Kent iemand."@nl ;
                   rdfs:domain <http://ex.org/Person> ;
                   rdfs:range <http://ex.org/Person> ."#,
        );

        let report = build_default(&g);
        let section = report.section("property_nl:http://ex.org/knows").unwrap();
        let keys: Vec<_> = section.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["label", "domain", "range", "comment"]);
        assert!(report.section("property:http://ex.org/knows").is_none());
        assert_eq!(
            report.section("glance").and_then(|s| s.get("prop_uris_nl")),
            Some("http://ex.org/knows")
        );
    }

    #[test]
    fn json_keeps_section_order() {
        let report = build_default(&ontology(""));
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["name"], "metadata");
        assert_eq!(value[0]["fields"][0]["key"], "uri");
    }
}
