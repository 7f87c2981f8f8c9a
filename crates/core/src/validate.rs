//! Template decoding and validation.
//!
//! Decoding goes through `serde_json::Value` first so that an unknown
//! element tag or a missing geometry field is reported with the element's
//! index instead of as a generic deserialization failure.

use crate::error::{Error, Result};
use crate::types::{Background, Element, Frame, LineSpacingType, Template};
use crate::units::{
    Unit, FONT_SIZE_RANGE, MAX_COORDINATE, MAX_LINE_WIDTH, MAX_SPACING_PERCENT,
    MAX_SPACING_POINTS, MAX_TEXT_POINT,
};
use serde_json::Value;
use std::ops::RangeInclusive;

const GEOMETRY_FIELDS: [&str; 4] = ["x", "y", "width", "height"];

impl Template {
    /// Decode and validate a template from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| Error::InvalidTemplate(format!("not valid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Decode and validate a template from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut root) = value else {
            return Err(Error::InvalidTemplate("template must be an object".to_string()));
        };

        let background = root
            .remove("background")
            .ok_or_else(|| Error::InvalidTemplate("missing `background`".to_string()))?;
        let background: Background = serde_json::from_value(background)
            .map_err(|e| Error::InvalidTemplate(format!("background: {}", e)))?;

        let raw_elements = match root.remove("elements") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(Error::InvalidTemplate(
                    "`elements` must be an array".to_string(),
                ))
            }
        };

        let elements = raw_elements
            .into_iter()
            .enumerate()
            .map(|(index, raw)| decode_element(index, raw))
            .collect::<Result<Vec<_>>>()?;

        let template = Template {
            background,
            elements,
        };
        template.validate()?;
        log::debug!("Decoded template with {} elements", template.elements.len());
        Ok(template)
    }

    /// Check every numeric field before any XML is emitted.
    ///
    /// Non-finite numbers would otherwise end up as `NaN` attributes, and
    /// values outside the DrawingML simple-type ranges produce a package no
    /// reader can open. Ranges are checked on the converted integers.
    pub fn validate(&self) -> Result<()> {
        for (index, element) in self.elements.iter().enumerate() {
            validate_frame(index, element.frame())?;
            match element {
                Element::Text(text) => {
                    positive(index, "fontSize", text.font_size)?;
                    within(index, "fontSize", Unit::FontSize, text.font_size, FONT_SIZE_RANGE)?;
                    if let Some(spacing) = text.line_spacing {
                        positive(index, "lineSpacing", spacing)?;
                        match text.line_spacing_type {
                            LineSpacingType::Percent => within(
                                index,
                                "lineSpacing",
                                Unit::Percent,
                                spacing,
                                0..=MAX_SPACING_PERCENT,
                            )?,
                            LineSpacingType::Points => within(
                                index,
                                "lineSpacing",
                                Unit::LineSpacing,
                                spacing,
                                0..=MAX_SPACING_POINTS,
                            )?,
                        }
                    }
                    if let Some(before) = text.space_before {
                        non_negative(index, "spaceBefore", before)?;
                        within(index, "spaceBefore", Unit::LineSpacing, before, 0..=MAX_SPACING_POINTS)?;
                    }
                    if let Some(after) = text.space_after {
                        non_negative(index, "spaceAfter", after)?;
                        within(index, "spaceAfter", Unit::LineSpacing, after, 0..=MAX_SPACING_POINTS)?;
                    }
                    if let Some(spacing) = text.char_spacing {
                        within(
                            index,
                            "charSpacing",
                            Unit::CharSpacing,
                            spacing,
                            -MAX_TEXT_POINT..=MAX_TEXT_POINT,
                        )?;
                    }
                }
                Element::Shape(shape) => {
                    unit_interval(index, "fillOpacity", shape.fill_opacity)?;
                    non_negative(index, "strokeWidth", shape.stroke_width)?;
                    within(index, "strokeWidth", Unit::Point, shape.stroke_width, 0..=MAX_LINE_WIDTH)?;
                    non_negative(index, "borderRadius", shape.border_radius)?;
                    if let Some(shadow) = &shape.shadow {
                        non_negative(index, "shadow.blur", shadow.blur)?;
                        within(index, "shadow.blur", Unit::Point, shadow.blur, 0..=MAX_COORDINATE)?;
                        non_negative(index, "shadow.offsetY", shadow.offset_y)?;
                        within(index, "shadow.offsetY", Unit::Point, shadow.offset_y, 0..=MAX_COORDINATE)?;
                        unit_interval(index, "shadow.opacity", shadow.opacity)?;
                    }
                }
                Element::Image(image) => {
                    if image.image_id.is_empty() {
                        return Err(Error::malformed(index, "imageId", "is empty"));
                    }
                    unit_interval(index, "opacity", image.opacity)?;
                }
            }
        }
        Ok(())
    }
}

fn decode_element(index: usize, raw: Value) -> Result<Element> {
    let kind = match raw.get("type") {
        Some(Value::String(kind)) => kind.clone(),
        Some(other) => other.to_string(),
        None => "<missing>".to_string(),
    };
    if !Element::KINDS.contains(&kind.as_str()) {
        return Err(Error::UnsupportedElementType { index, kind });
    }

    for field in GEOMETRY_FIELDS {
        if !raw.get(field).map(Value::is_number).unwrap_or(false) {
            return Err(Error::malformed(index, field, "is missing or not a number"));
        }
    }

    serde_json::from_value(raw).map_err(|e| Error::InvalidElement {
        index,
        message: e.to_string(),
    })
}

fn validate_frame(index: usize, frame: &Frame) -> Result<()> {
    for (field, value) in [
        ("x", frame.x),
        ("y", frame.y),
        ("width", frame.width),
        ("height", frame.height),
    ] {
        non_negative(index, field, value)?;
        within(index, field, Unit::Inch, value, 0..=MAX_COORDINATE)?;
    }
    if let Some(rotation) = frame.rotation {
        finite(index, "rotation", Unit::Degree, rotation)?;
    }
    Ok(())
}

fn finite(index: usize, field: &str, unit: Unit, value: f64) -> Result<()> {
    match unit.checked(value) {
        Some(_) => Ok(()),
        None => Err(Error::malformed(
            index,
            field,
            format!("is not a finite number ({})", value),
        )),
    }
}

/// Converted value must land inside `range`.
fn within(
    index: usize,
    field: &str,
    unit: Unit,
    value: f64,
    range: RangeInclusive<i64>,
) -> Result<()> {
    finite(index, field, unit, value)?;
    let converted = unit.convert(value);
    if !range.contains(&converted) {
        return Err(Error::malformed(
            index,
            field,
            format!(
                "{} is out of range ({} not in {}..={})",
                value,
                converted,
                range.start(),
                range.end()
            ),
        ));
    }
    Ok(())
}

fn non_negative(index: usize, field: &str, value: f64) -> Result<()> {
    finite(index, field, Unit::Inch, value)?;
    if value < 0.0 {
        return Err(Error::malformed(
            index,
            field,
            format!("must not be negative ({})", value),
        ));
    }
    Ok(())
}

fn positive(index: usize, field: &str, value: f64) -> Result<()> {
    non_negative(index, field, value)?;
    if value == 0.0 {
        return Err(Error::malformed(index, field, "must be greater than zero"));
    }
    Ok(())
}

fn unit_interval(index: usize, field: &str, value: f64) -> Result<()> {
    non_negative(index, field, value)?;
    if value > 1.0 {
        return Err(Error::malformed(
            index,
            field,
            format!("must be between 0 and 1 ({})", value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Align, ShapeElement, TextElement, VerticalAlign};
    use serde_json::json;

    #[test]
    fn test_decodes_all_variants() {
        let template = Template::from_value(json!({
            "background": { "color": "#112233" },
            "elements": [
                {
                    "type": "text", "x": 1, "y": 1, "width": 2, "height": 1,
                    "text": "Hello", "fontSize": 24, "align": "center",
                    "valign": "middle", "lineSpacing": 12, "lineSpacingType": "points"
                },
                {
                    "type": "shape", "x": 0, "y": 0, "width": 3, "height": 2,
                    "fill": "FF0000", "borderRadius": 0.1, "rotation": 45,
                    "shadow": { "blur": 4, "offsetY": 2, "color": "000000", "opacity": 0.3 }
                },
                { "type": "image", "x": 5, "y": 0.5, "width": 2, "height": 2, "imageId": "logo" }
            ]
        }))
        .unwrap();

        assert_eq!(template.background.color.as_str(), "112233");
        assert_eq!(template.elements.len(), 3);

        let Element::Text(text) = &template.elements[0] else {
            panic!("expected text element");
        };
        assert_eq!(text.text, "Hello");
        assert_eq!(text.font_size, 24.0);
        assert_eq!(text.align, Align::Center);
        assert_eq!(text.valign, VerticalAlign::Middle);
        assert_eq!(text.line_spacing_type, LineSpacingType::Points);
        assert_eq!(text.font_family, "Arial");

        let Element::Shape(shape) = &template.elements[1] else {
            panic!("expected shape element");
        };
        assert_eq!(shape.frame.rotation, Some(45.0));
        assert_eq!(shape.fill_opacity, 1.0);
        assert_eq!(shape.shadow.as_ref().unwrap().offset_y, 2.0);

        assert_eq!(template.image_ids(), vec!["logo"]);
    }

    #[test]
    fn test_missing_elements_is_empty() {
        let template = Template::from_json(r#"{"background":{"color":"00FF00"}}"#).unwrap();
        assert!(template.elements.is_empty());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = Template::from_value(json!({
            "background": { "color": "FFFFFF" },
            "elements": [
                { "type": "text", "x": 0, "y": 0, "width": 1, "height": 1 },
                { "type": "chart", "x": 0, "y": 0, "width": 1, "height": 1 }
            ]
        }))
        .unwrap_err();
        match err {
            Error::UnsupportedElementType { index, kind } => {
                assert_eq!(index, 1);
                assert_eq!(kind, "chart");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_geometry_names_field() {
        let err = Template::from_value(json!({
            "background": { "color": "FFFFFF" },
            "elements": [{ "type": "shape", "x": 0, "y": 0, "width": "wide", "height": 1, "fill": "000000" }]
        }))
        .unwrap_err();
        match err {
            Error::MalformedElement { index, field, .. } => {
                assert_eq!(index, 0);
                assert_eq!(field, "width");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_color_is_invalid_element() {
        let err = Template::from_value(json!({
            "background": { "color": "FFFFFF" },
            "elements": [{ "type": "shape", "x": 0, "y": 0, "width": 1, "height": 1, "fill": "red" }]
        }))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidElement { index: 0, .. }));

        let err = Template::from_json(r#"{"background":{"color":"nope"}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidTemplate(_)));
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let frame = Frame::new(0.0, f64::NAN, 1.0, 1.0);
        let mut template = Template::new("FFFFFF".parse().unwrap());
        template.push(TextElement::new(Frame::new(0.0, 0.0, 1.0, 1.0), "ok"));
        template.push(TextElement::new(frame, "bad"));
        match template.validate().unwrap_err() {
            Error::MalformedElement { index, field, .. } => {
                assert_eq!(index, 1);
                assert_eq!(field, "y");
            }
            other => panic!("unexpected error: {other}"),
        }

        let mut template = Template::new("FFFFFF".parse().unwrap());
        let mut shape =
            ShapeElement::new(Frame::new(0.0, 0.0, 1.0, 1.0), "000000".parse().unwrap());
        shape.fill_opacity = f64::INFINITY;
        template.push(shape);
        assert!(matches!(
            template.validate(),
            Err(Error::MalformedElement { index: 0, .. })
        ));
    }

    #[test]
    fn test_range_checks() {
        let mut template = Template::new("FFFFFF".parse().unwrap());
        template.push(TextElement::new(Frame::new(0.0, 0.0, 1.0, 1.0), "x").with_font_size(0.0));
        assert!(template.validate().is_err());

        let mut template = Template::new("FFFFFF".parse().unwrap());
        template.push(TextElement::new(Frame::new(0.0, 0.0, -1.0, 1.0), "x"));
        assert!(template.validate().is_err());

        let mut template = Template::new("FFFFFF".parse().unwrap());
        let mut shape =
            ShapeElement::new(Frame::new(0.0, 0.0, 1.0, 1.0), "000000".parse().unwrap());
        shape.fill_opacity = 1.5;
        template.push(shape);
        assert!(template.validate().is_err());
    }

    #[test]
    fn test_font_size_below_one_point() {
        for size in [0.004, 0.99] {
            let err = Template::from_value(json!({
                "background": { "color": "FFFFFF" },
                "elements": [{
                    "type": "text", "x": 0, "y": 0, "width": 1, "height": 1,
                    "text": "tiny", "fontSize": size
                }]
            }))
            .unwrap_err();
            match err {
                Error::MalformedElement { index, field, .. } => {
                    assert_eq!(index, 0);
                    assert_eq!(field, "fontSize");
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        let mut template = Template::new("FFFFFF".parse().unwrap());
        template.push(TextElement::new(Frame::new(0.0, 0.0, 1.0, 1.0), "x").with_font_size(1.0));
        template.push(TextElement::new(Frame::new(0.0, 0.0, 1.0, 1.0), "x").with_font_size(4000.0));
        assert!(template.validate().is_ok());

        let mut template = Template::new("FFFFFF".parse().unwrap());
        template.push(TextElement::new(Frame::new(0.0, 0.0, 1.0, 1.0), "x").with_font_size(4000.01));
        assert!(template.validate().is_err());
    }

    #[test]
    fn test_oversized_frame() {
        let mut template = Template::new("FFFFFF".parse().unwrap());
        template.push(ShapeElement::new(
            Frame::new(0.0, 0.0, 1.0, 1.0),
            "000000".parse().unwrap(),
        ));
        template.push(ShapeElement::new(
            Frame::new(1e9, 0.0, 1.0, 1.0),
            "000000".parse().unwrap(),
        ));
        match template.validate().unwrap_err() {
            Error::MalformedElement { index, field, .. } => {
                assert_eq!(index, 1);
                assert_eq!(field, "x");
            }
            other => panic!("unexpected error: {other}"),
        }

        let mut template = Template::new("FFFFFF".parse().unwrap());
        template.push(TextElement::new(Frame::new(0.0, 0.0, 1.0, 3e7), "tall"));
        assert!(matches!(
            template.validate(),
            Err(Error::MalformedElement { index: 0, .. })
        ));
    }

    #[test]
    fn test_spacing_limits() {
        let text = |spacing: serde_json::Value| {
            let mut element = json!({
                "type": "text", "x": 0, "y": 0, "width": 1, "height": 1, "text": "x"
            });
            if let (Some(target), Some(extra)) = (element.as_object_mut(), spacing.as_object()) {
                target.extend(extra.clone());
            }
            Template::from_value(json!({ "background": { "color": "FFFFFF" }, "elements": [element] }))
        };

        assert!(text(json!({ "charSpacing": -4000 })).is_ok());
        assert!(text(json!({ "charSpacing": 4000.5 })).is_err());
        assert!(text(json!({ "spaceBefore": 1584 })).is_ok());
        assert!(text(json!({ "spaceAfter": 1585 })).is_err());
        assert!(text(json!({ "lineSpacing": 2000, "lineSpacingType": "points" })).is_err());
        assert!(text(json!({ "lineSpacing": 150 })).is_ok());
        assert!(text(json!({ "lineSpacing": 13201 })).is_err());
    }

    #[test]
    fn test_stroke_width_limit() {
        let mut template = Template::new("FFFFFF".parse().unwrap());
        let mut shape =
            ShapeElement::new(Frame::new(0.0, 0.0, 1.0, 1.0), "000000".parse().unwrap());
        shape.stroke_width = 1585.0;
        template.push(shape);
        assert!(template.validate().is_err());
    }
}
