//! Rectangle and rounded-rectangle XML.

use crate::xml::{push_solid_fill, push_srgb, push_xfrm};
use deck_core::units;
use deck_core::{Result, ShapeElement};
use std::fmt::Write as FmtWrite;

/// Largest `roundRect` adjustment: corners meet at half the shorter side.
const MAX_CORNER_ADJUST: i64 = 50_000;

/// Shadow direction: straight down, in 60000ths of a degree.
const SHADOW_DIRECTION: i64 = 5_400_000;

/// Emit a `<p:sp>` for a shape element.
pub fn emit(element: &ShapeElement, id: u32) -> Result<String> {
    let mut xml = String::with_capacity(512);

    xml.push_str("<p:sp><p:nvSpPr>");
    write!(xml, r#"<p:cNvPr id="{}" name="Shape {}"/>"#, id, id)?;
    xml.push_str("<p:cNvSpPr/><p:nvPr/></p:nvSpPr>");

    xml.push_str("<p:spPr>");
    push_xfrm(&mut xml, &element.frame)?;

    match corner_adjust(element.border_radius) {
        None => xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#),
        Some(adjust) => write!(
            xml,
            r#"<a:prstGeom prst="roundRect"><a:avLst><a:gd name="adj" fmla="val {}"/></a:avLst></a:prstGeom>"#,
            adjust
        )?,
    }

    // A zero-alpha solid fill still renders as a faint outline in some
    // viewers, so fully transparent shapes get an explicit no-fill.
    if element.fill_opacity <= 0.0 {
        xml.push_str("<a:noFill/>");
    } else {
        push_solid_fill(&mut xml, &element.fill, element.fill_opacity)?;
    }

    match &element.stroke {
        Some(stroke) if element.stroke_width > 0.0 => {
            write!(xml, r#"<a:ln w="{}">"#, units::points(element.stroke_width))?;
            push_solid_fill(&mut xml, stroke, 1.0)?;
            xml.push_str("</a:ln>");
        }
        _ => xml.push_str("<a:ln><a:noFill/></a:ln>"),
    }

    if let Some(shadow) = &element.shadow {
        xml.push_str("<a:effectLst>");
        write!(
            xml,
            r#"<a:outerShdw blurRad="{}" dist="{}" dir="{}" algn="t" rotWithShape="0">"#,
            units::points(shadow.blur),
            units::points(shadow.offset_y),
            SHADOW_DIRECTION,
        )?;
        push_srgb(&mut xml, &shadow.color, shadow.opacity)?;
        xml.push_str("</a:outerShdw></a:effectLst>");
    }

    xml.push_str("</p:spPr></p:sp>");
    Ok(xml)
}

/// `roundRect` adjustment for a corner radius given as a fraction of the
/// shorter side, or `None` for a square-cornered rectangle.
///
/// The guide is expressed in 1/100000 of the shorter side and is only
/// meaningful in `0..=50000`.
fn corner_adjust(border_radius: f64) -> Option<i64> {
    if border_radius <= 0.0 {
        return None;
    }
    let adjust = (border_radius * 100_000.0).round() as i64;
    if adjust > MAX_CORNER_ADJUST {
        log::warn!(
            "borderRadius {} exceeds half the shorter side; clamping",
            border_radius
        );
    }
    Some(adjust.clamp(1, MAX_CORNER_ADJUST))
}
