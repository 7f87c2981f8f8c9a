//! Generated package parts: the content-type manifest and relationships.

use crate::skeleton::content_type;
use crate::xml::escape;
use deck_core::Result;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;

/// A part to be written into the archive.
#[derive(Debug, Clone)]
pub struct Part<'a> {
    /// Part name inside the archive (no leading slash).
    pub name: String,
    /// Override content type; `None` when an extension default covers it.
    pub content_type: Option<&'static str>,
    pub data: Cow<'a, [u8]>,
}

impl<'a> Part<'a> {
    pub fn new(
        name: impl Into<String>,
        content_type: Option<&'static str>,
        data: impl Into<Cow<'a, [u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type,
            data: data.into(),
        }
    }

    fn extension(&self) -> Option<&str> {
        let file = self.name.rsplit('/').next()?;
        file.rsplit_once('.').map(|(_, ext)| ext)
    }
}

/// `[Content_Types].xml`, built from the parts actually written.
#[derive(Debug, Default)]
pub struct ContentTypes {
    defaults: BTreeMap<String, &'static str>,
    overrides: BTreeMap<String, &'static str>,
}

impl ContentTypes {
    /// Manifest with the `rels` and `xml` extension defaults.
    pub fn new() -> Self {
        let mut types = Self::default();
        types.add_default("rels", content_type::RELATIONSHIPS);
        types.add_default("xml", content_type::XML);
        types
    }

    pub fn add_default(&mut self, extension: &str, content_type: &'static str) {
        self.defaults
            .insert(extension.to_ascii_lowercase(), content_type);
    }

    pub fn add_override(&mut self, part_name: &str, content_type: &'static str) {
        self.overrides
            .insert(format!("/{}", part_name.trim_start_matches('/')), content_type);
    }

    /// Add an override for every part that carries its own content type.
    ///
    /// Register extension defaults first; a part covered by neither is
    /// logged, since a reader will refuse it.
    pub fn declare(&mut self, parts: &[Part<'_>]) {
        for part in parts {
            if let Some(ct) = part.content_type {
                self.add_override(&part.name, ct);
            } else if !part
                .extension()
                .map(|ext| self.defaults.contains_key(&ext.to_ascii_lowercase()))
                .unwrap_or(false)
            {
                log::warn!("Part {} has no content type declaration", part.name);
            }
        }
    }

    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(1024);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        for (ext, ct) in &self.defaults {
            write!(
                xml,
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape(ext),
                ct
            )?;
        }
        for (name, ct) in &self.overrides {
            write!(
                xml,
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape(name),
                ct
            )?;
        }
        xml.push_str("</Types>");
        Ok(xml)
    }
}

/// One entry of a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: &'static str,
    /// Target relative to the source part's directory.
    pub target: String,
}

/// Serialize a relationships part.
pub fn relationships_xml(relationships: &[Relationship]) -> Result<String> {
    let mut xml = String::with_capacity(256 + relationships.len() * 160);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for rel in relationships {
        write!(
            xml,
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            escape(&rel.id),
            rel.rel_type,
            escape(&rel.target)
        )?;
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::rel_type;

    #[test]
    fn test_content_types_from_parts() {
        let parts = vec![
            Part::new("_rels/.rels", None, Vec::<u8>::new()),
            Part::new("ppt/slides/slide1.xml", Some(content_type::SLIDE), Vec::<u8>::new()),
        ];
        let mut types = ContentTypes::new();
        types.add_default("PNG", "image/png");
        types.declare(&parts);
        let xml = types.to_xml().unwrap();

        assert!(xml.contains(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#));
        assert!(xml.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
        assert!(xml.contains(r#"<Override PartName="/ppt/slides/slide1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#));
        assert_eq!(xml.matches("<Override ").count(), 1);
    }

    #[test]
    fn test_relationships_xml() {
        let xml = relationships_xml(&[
            Relationship {
                id: "rId1".to_string(),
                rel_type: rel_type::SLIDE_LAYOUT,
                target: "../slideLayouts/slideLayout1.xml".to_string(),
            },
            Relationship {
                id: "rId2".to_string(),
                rel_type: rel_type::IMAGE,
                target: "../media/image1.png".to_string(),
            },
        ])
        .unwrap();
        assert!(xml.contains(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#));
        assert!(xml.contains(r#"Id="rId2""#));
        assert!(xml.ends_with("</Relationships>"));
    }
}
