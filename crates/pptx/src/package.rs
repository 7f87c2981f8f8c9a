//! PPTX package assembly.

use crate::parts::{relationships_xml, ContentTypes, Part, Relationship};
use crate::skeleton::{self, content_type, rel_type, SKELETON_PARTS};
use crate::slide::{build_slide, ImageRelationships};
use deck_core::{Error, ImageAssets, ImageFormat, Result, Template};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// How archive entries are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// No compression.
    Stored,
    /// DEFLATE, readable by every Office version.
    #[default]
    Deflated,
}

/// Modification time written on every archive entry.
///
/// Pinned rather than taken from the clock so identical templates produce
/// byte-identical packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Default for Timestamp {
    /// 1980-01-01 00:00:00, the earliest time a ZIP entry can carry.
    fn default() -> Self {
        Self {
            year: 1980,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }
}

impl Timestamp {
    fn to_zip(self) -> Result<DateTime> {
        DateTime::from_date_and_time(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        )
        .map_err(|_| {
            Error::PackagingFailed(format!("timestamp {:?} is outside the ZIP range", self))
        })
    }
}

/// Builds `.pptx` packages from slide templates.
///
/// A writer holds only options; every build is independent, so one writer
/// can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct PptxWriter {
    compression: Compression,
    compression_level: Option<i32>,
    timestamp: Timestamp,
}

impl PptxWriter {
    /// Create a writer with deflate compression and pinned timestamps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how entries are compressed.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set the deflate level (0-9); `None` uses the library default.
    pub fn with_compression_level(mut self, level: Option<i32>) -> Self {
        self.compression_level = level;
        self
    }

    /// Set the modification time written on every entry.
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Build a package for a template without embedded images.
    ///
    /// Any image element fails with [`Error::UnresolvedImage`].
    pub fn build(&self, template: &Template) -> Result<Vec<u8>> {
        self.build_with_images(template, &ImageAssets::new())
    }

    /// Build a package, embedding each image the template references.
    pub fn build_with_images(&self, template: &Template, images: &ImageAssets) -> Result<Vec<u8>> {
        template.validate()?;

        let parts = collect_parts(template, images)?;
        let bytes = self.write_archive(&parts)?;

        log::debug!(
            "Built package with {} parts ({} bytes)",
            parts.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    fn file_options(&self) -> Result<FileOptions> {
        let options = FileOptions::default().last_modified_time(self.timestamp.to_zip()?);
        Ok(match self.compression {
            Compression::Stored => options.compression_method(CompressionMethod::Stored),
            Compression::Deflated => options
                .compression_method(CompressionMethod::Deflated)
                .compression_level(self.compression_level),
        })
    }

    /// Write every part into an in-memory archive.
    ///
    /// Any failure discards the writer, so a partial archive never escapes.
    fn write_archive(&self, parts: &[Part<'_>]) -> Result<Vec<u8>> {
        let options = self.file_options()?;
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for part in parts {
            writer
                .start_file(part.name.as_str(), options)
                .map_err(|e| {
                    Error::PackagingFailed(format!("Failed to start '{}': {}", part.name, e))
                })?;
            writer.write_all(&part.data).map_err(|e| {
                Error::PackagingFailed(format!("Failed to write '{}': {}", part.name, e))
            })?;
            log::debug!("Wrote {} ({} bytes)", part.name, part.data.len());
        }

        let cursor = writer
            .finish()
            .map_err(|e| Error::PackagingFailed(format!("Failed to finish archive: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

/// Build a package with default options.
pub fn build_presentation(template: &Template) -> Result<Vec<u8>> {
    PptxWriter::new().build(template)
}

/// Every part of the package, content-type manifest first.
fn collect_parts<'a>(template: &Template, images: &'a ImageAssets) -> Result<Vec<Part<'a>>> {
    let mut parts: Vec<Part<'a>> = SKELETON_PARTS
        .iter()
        .map(|p| Part::new(p.name, p.content_type, p.xml.as_bytes()))
        .collect();

    let mut slide_rels = vec![Relationship {
        id: "rId1".to_string(),
        rel_type: rel_type::SLIDE_LAYOUT,
        target: "../slideLayouts/slideLayout1.xml".to_string(),
    }];
    let mut image_rels = ImageRelationships::new();
    let mut media_formats: Vec<ImageFormat> = Vec::new();

    for image_id in template.image_ids() {
        // Missing assets are reported by the slide builder with the
        // element index.
        let Some(asset) = images.get(image_id) else {
            continue;
        };
        let number = image_rels.len() + 1;
        let file = format!("image{}.{}", number, asset.format.extension());
        let rel_id = format!("rId{}", number + 1);

        parts.push(Part::new(
            format!("{}/{}", skeleton::MEDIA_DIR, file),
            None,
            asset.data.as_slice(),
        ));
        slide_rels.push(Relationship {
            id: rel_id.clone(),
            rel_type: rel_type::IMAGE,
            target: format!("../media/{}", file),
        });
        image_rels.insert(image_id.to_string(), rel_id);
        if !media_formats.contains(&asset.format) {
            media_formats.push(asset.format);
        }
        log::debug!("Registered image '{}' as {}", image_id, file);
    }

    let unused = images.len() - image_rels.len();
    if unused > 0 {
        log::debug!("{} supplied images are not referenced by the template", unused);
    }

    let slide_xml = build_slide(template, &image_rels)?;
    parts.push(Part::new(
        skeleton::SLIDE_PART,
        Some(content_type::SLIDE),
        slide_xml.into_bytes(),
    ));
    parts.push(Part::new(
        skeleton::SLIDE_RELS_PART,
        None,
        relationships_xml(&slide_rels)?.into_bytes(),
    ));

    let mut types = ContentTypes::new();
    for format in media_formats {
        types.add_default(format.extension(), format.content_type());
    }
    types.declare(&parts);
    parts.insert(
        0,
        Part::new(
            skeleton::CONTENT_TYPES_PART,
            None,
            types.to_xml()?.into_bytes(),
        ),
    );

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Frame, ImageAsset, ImageElement, TextElement};

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn names(parts: &[Part<'_>]) -> Vec<String> {
        parts.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_parts_without_images() {
        let template = Template::new("FFFFFF".parse().unwrap());
        let assets = ImageAssets::new();
        let parts = collect_parts(&template, &assets).unwrap();
        let names = names(&parts);
        assert_eq!(names[0], "[Content_Types].xml");
        assert_eq!(names.len(), SKELETON_PARTS.len() + 3);
        assert!(names.contains(&"ppt/slides/slide1.xml".to_string()));
        assert!(names.contains(&"ppt/slides/_rels/slide1.xml.rels".to_string()));
        assert!(!names.iter().any(|n| n.starts_with("ppt/media/")));
    }

    #[test]
    fn test_images_are_embedded_once() {
        let frame = Frame::new(0.0, 0.0, 1.0, 1.0);
        let mut template = Template::new("FFFFFF".parse().unwrap());
        template.push(ImageElement::new(frame, "logo"));
        template.push(TextElement::new(frame, "between"));
        template.push(ImageElement::new(frame, "logo"));

        let mut images = ImageAssets::new();
        images.insert("logo".to_string(), ImageAsset::from_bytes(PNG.to_vec()).unwrap());
        images.insert("unused".to_string(), ImageAsset::from_bytes(PNG.to_vec()).unwrap());

        let parts = collect_parts(&template, &images).unwrap();
        let media: Vec<String> = names(&parts)
            .into_iter()
            .filter(|n| n.starts_with("ppt/media/"))
            .collect();
        assert_eq!(media, vec!["ppt/media/image1.png".to_string()]);

        let rels = parts
            .iter()
            .find(|p| p.name == skeleton::SLIDE_RELS_PART)
            .unwrap();
        let rels = std::str::from_utf8(&rels.data).unwrap();
        assert!(rels.contains(r#"Id="rId2""#));
        assert!(rels.contains(r#"Target="../media/image1.png""#));

        let types = std::str::from_utf8(&parts[0].data).unwrap();
        assert!(types.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));

        let slide = parts.iter().find(|p| p.name == skeleton::SLIDE_PART).unwrap();
        let slide = std::str::from_utf8(&slide.data).unwrap();
        assert_eq!(slide.matches(r#"r:embed="rId2""#).count(), 2);
    }

    #[test]
    fn test_missing_image_fails_build() {
        let mut template = Template::new("FFFFFF".parse().unwrap());
        template.push(ImageElement::new(Frame::new(0.0, 0.0, 1.0, 1.0), "ghost"));
        let err = PptxWriter::new().build(&template).unwrap_err();
        assert!(matches!(err, Error::UnresolvedImage { index: 0, .. }));
    }

    #[test]
    fn test_out_of_range_timestamp_fails() {
        let writer = PptxWriter::new().with_timestamp(Timestamp {
            year: 1970,
            ..Timestamp::default()
        });
        let template = Template::new("FFFFFF".parse().unwrap());
        assert!(matches!(
            writer.build(&template),
            Err(Error::PackagingFailed(_))
        ));
    }

    #[test]
    fn test_invalid_template_fails_before_packing() {
        let mut template = Template::new("FFFFFF".parse().unwrap());
        template.push(TextElement::new(Frame::new(f64::NAN, 0.0, 1.0, 1.0), "x"));
        assert!(matches!(
            build_presentation(&template),
            Err(Error::MalformedElement { index: 0, .. })
        ));
    }
}
