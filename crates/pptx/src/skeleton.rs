//! Fixed package parts shared by every build.
//!
//! These are compiled into the binary and never change between builds;
//! only the slide, its relationships, media, and the content-type
//! manifest are generated per template.

// The canvas size is declared by `<p:sldSz>` in resources/presentation.xml,
// which is what readers use. These mirror it for callers laying out
// templates, and a test below fails if the two disagree.

/// Slide width in EMUs (10 inches, 16:9).
pub const SLIDE_WIDTH: i64 = 9_144_000;

/// Slide height in EMUs (5.625 inches, 16:9).
pub const SLIDE_HEIGHT: i64 = 5_143_500;

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub const PRESENTATION_PART: &str = "ppt/presentation.xml";
pub const SLIDE_PART: &str = "ppt/slides/slide1.xml";
pub const SLIDE_RELS_PART: &str = "ppt/slides/_rels/slide1.xml.rels";
pub const SLIDE_LAYOUT_PART: &str = "ppt/slideLayouts/slideLayout1.xml";
pub const SLIDE_MASTER_PART: &str = "ppt/slideMasters/slideMaster1.xml";
pub const THEME_PART: &str = "ppt/theme/theme1.xml";
pub const MEDIA_DIR: &str = "ppt/media";

/// Media types for the parts this crate writes.
pub mod content_type {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
}

/// Relationship type URIs.
pub mod rel_type {
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
}

/// MIME type of a finished `.pptx` file.
pub const PPTX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// A fixed part of the package.
#[derive(Debug, Clone, Copy)]
pub struct SkeletonPart {
    /// Part name inside the archive (no leading slash).
    pub name: &'static str,
    /// Override content type; `None` for parts covered by an extension default.
    pub content_type: Option<&'static str>,
    pub xml: &'static str,
}

/// Every fixed part, in the order they are written to the archive.
pub const SKELETON_PARTS: [SkeletonPart; 8] = [
    SkeletonPart {
        name: "_rels/.rels",
        content_type: None,
        xml: include_str!("../resources/root.rels"),
    },
    SkeletonPart {
        name: PRESENTATION_PART,
        content_type: Some(content_type::PRESENTATION),
        xml: include_str!("../resources/presentation.xml"),
    },
    SkeletonPart {
        name: "ppt/_rels/presentation.xml.rels",
        content_type: None,
        xml: include_str!("../resources/presentation.xml.rels"),
    },
    SkeletonPart {
        name: SLIDE_LAYOUT_PART,
        content_type: Some(content_type::SLIDE_LAYOUT),
        xml: include_str!("../resources/slideLayout1.xml"),
    },
    SkeletonPart {
        name: "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        content_type: None,
        xml: include_str!("../resources/slideLayout1.xml.rels"),
    },
    SkeletonPart {
        name: SLIDE_MASTER_PART,
        content_type: Some(content_type::SLIDE_MASTER),
        xml: include_str!("../resources/slideMaster1.xml"),
    },
    SkeletonPart {
        name: "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        content_type: None,
        xml: include_str!("../resources/slideMaster1.xml.rels"),
    },
    SkeletonPart {
        name: THEME_PART,
        content_type: Some(content_type::THEME),
        xml: include_str!("../resources/theme1.xml"),
    },
];
