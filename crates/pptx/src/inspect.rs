//! Package read-back and consistency checks.
//!
//! Opens a finished `.pptx`, parses the content-type manifest and every
//! relationships part, and reports references a reader would reject.

use deck_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

/// A relationship with its target resolved to a part name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelationship {
    /// Relationships part that declares it.
    pub source: String,
    pub id: String,
    pub rel_type: String,
    /// Part name inside the archive (no leading slash).
    pub target: String,
}

/// What the inspector found in a package.
#[derive(Debug, Clone, Default)]
pub struct PackageReport {
    /// Every part in the archive, in archive order.
    pub parts: Vec<String>,
    /// Internal relationships from every `.rels` part.
    pub relationships: Vec<ResolvedRelationship>,
    /// Relationships whose target is not in the archive.
    pub dangling: Vec<ResolvedRelationship>,
    /// Parts with neither an override nor an extension default.
    pub undeclared: Vec<String>,
    /// Overrides naming a part that is not in the archive.
    pub phantom_overrides: Vec<String>,
}

impl PackageReport {
    /// True when every reference resolves and every part is declared.
    pub fn is_consistent(&self) -> bool {
        self.dangling.is_empty() && self.undeclared.is_empty() && self.phantom_overrides.is_empty()
    }
}

impl fmt::Display for PackageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} parts, {} relationships",
            self.parts.len(),
            self.relationships.len()
        )?;
        for rel in &self.dangling {
            writeln!(
                f,
                "  dangling: {} {} -> {}",
                rel.source, rel.id, rel.target
            )?;
        }
        for part in &self.undeclared {
            writeln!(f, "  undeclared: {}", part)?;
        }
        for part in &self.phantom_overrides {
            writeln!(f, "  override without part: {}", part)?;
        }
        Ok(())
    }
}

/// Reader for finished PPTX packages.
pub struct PackageInspector;

impl PackageInspector {
    /// Create a new package inspector.
    pub fn new() -> Self {
        Self
    }

    /// Inspect a package from a reader.
    pub fn inspect<R: Read + Seek>(&self, reader: R) -> Result<PackageReport> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        // `file_names` iterates a hash map; walk the central directory instead.
        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let file = archive
                .by_index(i)
                .map_err(|e| Error::ZipError(format!("Failed to read entry {}: {}", i, e)))?;
            if !file.is_dir() {
                parts.push(file.name().to_string());
            }
        }
        let part_set: BTreeSet<&str> = parts.iter().map(String::as_str).collect();

        let types_xml = self.read_file_from_archive(&mut archive, "[Content_Types].xml")?;
        let types = parse_content_types(&types_xml)?;

        let mut report = PackageReport::default();

        for part in &parts {
            if part == "[Content_Types].xml" {
                continue;
            }
            if !types.declares(part) {
                report.undeclared.push(part.clone());
            }
        }
        for name in types.overrides.keys() {
            if !part_set.contains(name.as_str()) {
                report.phantom_overrides.push(name.clone());
            }
        }

        for rels_path in parts.iter().filter(|p| p.ends_with(".rels")) {
            let base = rels_source_dir(rels_path).ok_or_else(|| {
                Error::CorruptedPackage(format!("relationships part outside _rels: {}", rels_path))
            })?;
            let xml = self.read_file_from_archive(&mut archive, rels_path)?;
            for rel in parse_relationships(&xml)? {
                if rel.external {
                    continue;
                }
                let resolved = ResolvedRelationship {
                    source: rels_path.clone(),
                    id: rel.id,
                    rel_type: rel.rel_type,
                    target: resolve_target(&base, &rel.target),
                };
                if !part_set.contains(resolved.target.as_str()) {
                    report.dangling.push(resolved.clone());
                }
                report.relationships.push(resolved);
            }
        }

        report.parts = parts;
        log::debug!(
            "Inspected package: {} parts, {} relationships, consistent={}",
            report.parts.len(),
            report.relationships.len(),
            report.is_consistent()
        );
        Ok(report)
    }

    /// Read one part as UTF-8 text.
    pub fn read_part<R: Read + Seek>(&self, reader: R, path: &str) -> Result<String> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;
        self.read_file_from_archive(&mut archive, path)
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PackageInspector {
    fn default() -> Self {
        Self::new()
    }
}

/// Inspect package bytes.
pub fn inspect(bytes: &[u8]) -> Result<PackageReport> {
    PackageInspector::new().inspect(Cursor::new(bytes))
}

/// Read one part of package bytes as text.
pub fn read_part(bytes: &[u8], path: &str) -> Result<String> {
    PackageInspector::new().read_part(Cursor::new(bytes), path)
}

#[derive(Debug, Default)]
struct ContentTypeMap {
    /// Lower-case extension to content type.
    defaults: BTreeMap<String, String>,
    /// Part name (no leading slash) to content type.
    overrides: BTreeMap<String, String>,
}

impl ContentTypeMap {
    fn declares(&self, part: &str) -> bool {
        if self.overrides.contains_key(part) {
            return true;
        }
        let file = part.rsplit('/').next().unwrap_or(part);
        file.rsplit_once('.')
            .map(|(_, ext)| self.defaults.contains_key(&ext.to_ascii_lowercase()))
            .unwrap_or(false)
    }
}

#[derive(Debug)]
struct RawRelationship {
    id: String,
    rel_type: String,
    target: String,
    external: bool,
}

fn parse_content_types(xml: &str) -> Result<ContentTypeMap> {
    let mut map = ContentTypeMap::default();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                match local_name(e.name().as_ref()) {
                    b"Default" => {
                        let ext = attribute(e, b"Extension")?.unwrap_or_default();
                        let ct = attribute(e, b"ContentType")?.unwrap_or_default();
                        map.defaults.insert(ext.to_ascii_lowercase(), ct);
                    }
                    b"Override" => {
                        let name = attribute(e, b"PartName")?.unwrap_or_default();
                        let ct = attribute(e, b"ContentType")?.unwrap_or_default();
                        map.overrides
                            .insert(name.trim_start_matches('/').to_string(), ct);
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing content types: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(map)
}

fn parse_relationships(xml: &str) -> Result<Vec<RawRelationship>> {
    let mut rels = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                rels.push(RawRelationship {
                    id: attribute(e, b"Id")?.unwrap_or_default(),
                    rel_type: attribute(e, b"Type")?.unwrap_or_default(),
                    target: attribute(e, b"Target")?.unwrap_or_default(),
                    external: attribute(e, b"TargetMode")?.as_deref() == Some("External"),
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(rels)
}

/// Unescaped value of an attribute, if present.
fn attribute(element: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes().flatten() {
        if attr.key.as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|e| Error::XmlError(format!("Bad attribute value: {}", e)))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Directory of the part a relationships part belongs to.
///
/// `ppt/slides/_rels/slide1.xml.rels` belongs to `ppt/slides`, and the
/// package-level `_rels/.rels` to the root.
fn rels_source_dir(rels_path: &str) -> Option<String> {
    let (dir, _) = rels_path.rsplit_once('/')?;
    let parent = dir.strip_suffix("_rels")?;
    Some(parent.trim_end_matches('/').to_string())
}

/// Resolve a relationship target against the source part's directory.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
