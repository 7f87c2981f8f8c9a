//! Small XML writing helpers shared by the element builders.

use deck_core::units;
use deck_core::{Frame, HexColor, Result};
use std::borrow::Cow;
use std::fmt::Write as FmtWrite;

/// Escape text for use in element content or attribute values.
///
/// Characters outside the XML 1.0 range (most C0 controls) are dropped,
/// since no escape form exists for them.
pub fn escape(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        quick_xml::escape::escape(text)
    } else {
        let cleaned: String = text.chars().filter(|&c| is_xml_char(c)).collect();
        Cow::Owned(quick_xml::escape::escape(&cleaned).into_owned())
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Write `<a:xfrm>` with offset, extent, and optional rotation.
pub(crate) fn push_xfrm(xml: &mut String, frame: &Frame) -> Result<()> {
    xml.push_str("<a:xfrm");
    if let Some(rotation) = frame.rotation {
        // One full turn is 21600000; normalise into [0, 360) degrees.
        let rot = units::degrees(rotation).rem_euclid(21_600_000);
        if rot != 0 {
            write!(xml, r#" rot="{}""#, rot)?;
        }
    }
    xml.push('>');
    write!(
        xml,
        r#"<a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/>"#,
        units::inches(frame.x),
        units::inches(frame.y),
        units::inches(frame.width),
        units::inches(frame.height),
    )?;
    xml.push_str("</a:xfrm>");
    Ok(())
}

/// Write `<a:srgbClr>`, with an alpha child when `opacity < 1`.
pub(crate) fn push_srgb(xml: &mut String, color: &HexColor, opacity: f64) -> Result<()> {
    if opacity < 1.0 {
        write!(
            xml,
            r#"<a:srgbClr val="{}"><a:alpha val="{}"/></a:srgbClr>"#,
            color,
            units::percent(opacity * 100.0)
        )?;
    } else {
        write!(xml, r#"<a:srgbClr val="{}"/>"#, color)?;
    }
    Ok(())
}

/// Write `<a:solidFill>` around an sRGB color.
pub(crate) fn push_solid_fill(xml: &mut String, color: &HexColor, opacity: f64) -> Result<()> {
    xml.push_str("<a:solidFill>");
    push_srgb(xml, color, opacity)?;
    xml.push_str("</a:solidFill>");
    Ok(())
}
