//! Core domain types, template validation, and unit conversion
//! for building PowerPoint files from slide templates.

pub mod error;
pub mod types;
pub mod units;
mod validate;

pub use error::{Error, Result};
pub use types::{
    Align, Background, Element, Frame, HexColor, ImageAsset, ImageAssets, ImageElement,
    ImageFormat, LineSpacingType, Shadow, ShapeElement, Template, TextElement, VerticalAlign,
};
pub use units::Unit;
