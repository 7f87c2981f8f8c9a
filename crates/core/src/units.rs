//! Conversion from template measurements into OOXML integer units.
//!
//! Geometry is expressed in EMUs (English Metric Units, 914400 per inch).
//! Text sizes use hundredths of a point, percentages use thousandths of a
//! percent, and angles use 60000ths of a degree.

use std::ops::RangeInclusive;

/// EMUs per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// EMUs per typographic point (1/72 inch).
pub const EMU_PER_POINT: f64 = 12_700.0;

/// Pixels per inch assumed for `px` values.
pub const PIXELS_PER_INCH: f64 = 96.0;

/// Largest `ST_Coordinate` / `ST_PositiveCoordinate` value, in EMUs.
pub const MAX_COORDINATE: i64 = 27_273_042_316_900;

/// `ST_TextFontSize`, in hundredths of a point (1 pt to 4000 pt).
pub const FONT_SIZE_RANGE: RangeInclusive<i64> = 100..=400_000;

/// `ST_TextPoint` magnitude limit, in hundredths of a point.
pub const MAX_TEXT_POINT: i64 = 400_000;

/// `ST_TextSpacingPoint` upper limit, in hundredths of a point.
pub const MAX_SPACING_POINTS: i64 = 158_400;

/// `ST_TextSpacingPercent` upper limit, in thousandths of a percent.
pub const MAX_SPACING_PERCENT: i64 = 13_200_000;

/// `ST_LineWidth` upper limit, in EMUs.
pub const MAX_LINE_WIDTH: i64 = 20_116_800;

/// A unit a template value can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Inches, converted to EMUs.
    Inch,
    /// Points, converted to EMUs (line widths, shadow blur and offset).
    Point,
    /// CSS pixels at 96 DPI, converted to EMUs.
    Pixel,
    /// Font size in points, converted to hundredths of a point.
    FontSize,
    /// Line spacing in points, converted to hundredths of a point.
    LineSpacing,
    /// Character spacing in points, converted to hundredths of a point.
    CharSpacing,
    /// Percentage (0-100), converted to thousandths of a percent.
    Percent,
    /// Degrees, converted to 60000ths of a degree.
    Degree,
}

impl Unit {
    /// Number of target units per one source unit.
    pub fn scale(self) -> f64 {
        match self {
            Unit::Inch => EMU_PER_INCH,
            Unit::Point => EMU_PER_POINT,
            Unit::Pixel => EMU_PER_INCH / PIXELS_PER_INCH,
            Unit::FontSize | Unit::LineSpacing | Unit::CharSpacing => 100.0,
            Unit::Percent => 1_000.0,
            Unit::Degree => 60_000.0,
        }
    }

    /// Convert a value to the nearest integer target unit.
    ///
    /// Callers must pass finite input; templates are validated before any
    /// XML is emitted, and [`Unit::checked`] is the validating form.
    pub fn convert(self, value: f64) -> i64 {
        debug_assert!(value.is_finite(), "non-finite {:?} value", self);
        (value * self.scale()).round() as i64
    }

    /// Convert a value, returning `None` for non-finite input or results
    /// that do not fit in an `i64`.
    pub fn checked(self, value: f64) -> Option<i64> {
        if !value.is_finite() {
            return None;
        }
        let scaled = (value * self.scale()).round();
        if scaled.is_finite() && scaled.abs() < i64::MAX as f64 {
            Some(scaled as i64)
        } else {
            None
        }
    }
}

/// Inches to EMUs.
pub fn inches(value: f64) -> i64 {
    Unit::Inch.convert(value)
}

/// Points to EMUs.
pub fn points(value: f64) -> i64 {
    Unit::Point.convert(value)
}

/// Pixels to EMUs.
pub fn pixels(value: f64) -> i64 {
    Unit::Pixel.convert(value)
}

/// Font size in points to hundredths of a point.
pub fn font_size(value: f64) -> i64 {
    Unit::FontSize.convert(value)
}

/// Percentage to thousandths of a percent (100% = 100000).
pub fn percent(value: f64) -> i64 {
    Unit::Percent.convert(value)
}

/// Degrees to 60000ths of a degree.
pub fn degrees(value: f64) -> i64 {
    Unit::Degree.convert(value)
}
