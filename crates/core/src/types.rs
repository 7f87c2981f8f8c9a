//! Domain types for declarative slide templates.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A single-slide template: a solid background plus elements in
/// back-to-front order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub background: Background,

    /// Elements in z-order; later entries render on top.
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Template {
    /// Create an empty template with the given background color.
    pub fn new(background: HexColor) -> Self {
        Self {
            background: Background { color: background },
            elements: Vec::new(),
        }
    }

    /// Append an element on top of the existing ones.
    pub fn push(&mut self, element: impl Into<Element>) {
        self.elements.push(element.into());
    }

    /// Image ids referenced by image elements, in first-use order.
    pub fn image_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for element in &self.elements {
            if let Element::Image(image) = element {
                if !ids.contains(&image.image_id.as_str()) {
                    ids.push(&image.image_id);
                }
            }
        }
        ids
    }
}

/// Slide background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub color: HexColor,
}

/// A 6-digit RGB color, stored upper case without a leading `#`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Parse `RRGGBB` or `#RRGGBB`.
    pub fn new(value: &str) -> Result<Self, Error> {
        let digits = value.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(format!(
                "expected 6 hex digits, got {:?}",
                value
            )));
        }
        Ok(Self(digits.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for HexColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position, size, and rotation shared by every element. Lengths are inches.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,

    /// Clockwise rotation in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: None,
        }
    }
}

/// A visual element on the slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Text(TextElement),
    Shape(ShapeElement),
    Image(ImageElement),
}

impl Element {
    /// Type tags accepted in template JSON.
    pub const KINDS: [&'static str; 3] = ["text", "shape", "image"];

    pub fn frame(&self) -> &Frame {
        match self {
            Element::Text(e) => &e.frame,
            Element::Shape(e) => &e.frame,
            Element::Image(e) => &e.frame,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Element::Text(_) => "text",
            Element::Shape(_) => "shape",
            Element::Image(_) => "image",
        }
    }
}

impl From<TextElement> for Element {
    fn from(e: TextElement) -> Self {
        Element::Text(e)
    }
}

impl From<ShapeElement> for Element {
    fn from(e: ShapeElement) -> Self {
        Element::Shape(e)
    }
}

impl From<ImageElement> for Element {
    fn from(e: ImageElement) -> Self {
        Element::Image(e)
    }
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical anchoring of the text body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// How `line_spacing` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineSpacingType {
    /// Percentage of single spacing (100 = single).
    #[default]
    Percent,
    /// Exact spacing in points.
    Points,
}

fn default_font_size() -> f64 {
    18.0
}

fn default_text_color() -> HexColor {
    HexColor("000000".to_string())
}

fn default_font_family() -> String {
    "Arial".to_string()
}

/// A text box. Each newline-separated line of `text` becomes a paragraph
/// with one run carrying the element's style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    #[serde(flatten)]
    pub frame: Frame,

    #[serde(default)]
    pub text: String,

    /// Points.
    #[serde(default = "default_font_size")]
    pub font_size: f64,

    #[serde(default = "default_text_color")]
    pub color: HexColor,

    #[serde(default = "default_font_family")]
    pub font_family: String,

    #[serde(default)]
    pub bold: bool,

    #[serde(default)]
    pub italic: bool,

    #[serde(default)]
    pub align: Align,

    #[serde(default)]
    pub valign: VerticalAlign,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_spacing: Option<f64>,

    #[serde(default)]
    pub line_spacing_type: LineSpacingType,

    /// Points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_before: Option<f64>,

    /// Points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_after: Option<f64>,

    /// Points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_spacing: Option<f64>,
}

impl TextElement {
    /// A text box with default styling.
    pub fn new(frame: Frame, text: impl Into<String>) -> Self {
        Self {
            frame,
            text: text.into(),
            font_size: default_font_size(),
            color: default_text_color(),
            font_family: default_font_family(),
            bold: false,
            italic: false,
            align: Align::default(),
            valign: VerticalAlign::default(),
            line_spacing: None,
            line_spacing_type: LineSpacingType::default(),
            space_before: None,
            space_after: None,
            char_spacing: None,
        }
    }

    pub fn with_font_size(mut self, points: f64) -> Self {
        self.font_size = points;
        self
    }
}

/// Outer drop shadow cast straight down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    /// Blur radius in points.
    #[serde(default)]
    pub blur: f64,

    /// Downward offset in points.
    #[serde(default)]
    pub offset_y: f64,

    #[serde(default = "default_text_color")]
    pub color: HexColor,

    /// 0.0 - 1.0.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

/// A filled rectangle, rounded when `border_radius > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeElement {
    #[serde(flatten)]
    pub frame: Frame,

    pub fill: HexColor,

    /// 0.0 - 1.0; 0 emits no fill at all.
    #[serde(default = "default_opacity")]
    pub fill_opacity: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<HexColor>,

    /// Points.
    #[serde(default)]
    pub stroke_width: f64,

    /// Corner radius as a fraction of the shorter side (0.0 - 0.5).
    #[serde(default)]
    pub border_radius: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
}

impl ShapeElement {
    /// An opaque rectangle with no outline.
    pub fn new(frame: Frame, fill: HexColor) -> Self {
        Self {
            frame,
            fill,
            fill_opacity: 1.0,
            stroke: None,
            stroke_width: 0.0,
            border_radius: 0.0,
            shadow: None,
        }
    }
}

/// A picture referencing an embedded image by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    #[serde(flatten)]
    pub frame: Frame,

    pub image_id: String,

    /// 0.0 - 1.0.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl ImageElement {
    pub fn new(frame: Frame, image_id: impl Into<String>) -> Self {
        Self {
            frame,
            image_id: image_id.into(),
            opacity: 1.0,
        }
    }
}

/// Raster formats that can be embedded in the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
}

impl ImageFormat {
    /// Detect format from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }
        None
    }

    /// File extension used for the media part.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
        }
    }
}

/// Binary image data to embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub format: ImageFormat,
    pub data: Vec<u8>,
}

impl ImageAsset {
    /// Wrap image bytes, detecting the format from magic bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, Error> {
        let format = ImageFormat::from_magic(&data).ok_or_else(|| {
            Error::UnsupportedImageFormat(format!(
                "unrecognized header ({} bytes)",
                data.len().min(8)
            ))
        })?;
        Ok(Self { format, data })
    }
}

/// Images available to a build, keyed by the `imageId` used in templates.
pub type ImageAssets = BTreeMap<String, ImageAsset>;
