//! PPTX (Office Open XML) package synthesizer.
//!
//! Turns a single-slide [`Template`](deck_core::Template) into the bytes of a
//! `.pptx` file: element XML, the slide document, the fixed skeleton parts,
//! and the ZIP container around them.

pub mod inspect;
pub mod package;
pub mod parts;
pub mod picture;
pub mod shape;
pub mod skeleton;
pub mod slide;
pub mod text;
pub mod xml;

pub use inspect::{inspect, read_part, PackageInspector, PackageReport};
pub use package::{build_presentation, Compression, PptxWriter, Timestamp};
pub use skeleton::PPTX_MIME_TYPE;
pub use slide::{build_slide, ImageRelationships};
