//! Text box XML.

use crate::xml::{escape, push_solid_fill, push_xfrm};
use deck_core::units::{self, Unit};
use deck_core::{Align, LineSpacingType, Result, TextElement, VerticalAlign};
use std::fmt::Write as FmtWrite;

/// Emit a `<p:sp>` text box for a text element.
///
/// Each line of the text becomes its own paragraph holding exactly one run.
pub fn emit(element: &TextElement, id: u32) -> Result<String> {
    let mut xml = String::with_capacity(512 + element.text.len());

    xml.push_str("<p:sp><p:nvSpPr>");
    write!(xml, r#"<p:cNvPr id="{}" name="TextBox {}"/>"#, id, id)?;
    xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#);

    xml.push_str("<p:spPr>");
    push_xfrm(&mut xml, &element.frame)?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/>"#);
    xml.push_str("</p:spPr>");

    xml.push_str("<p:txBody>");
    write!(
        xml,
        r#"<a:bodyPr wrap="square" rtlCol="0" anchor="{}"><a:noAutofit/></a:bodyPr>"#,
        anchor(element.valign)
    )?;
    xml.push_str("<a:lstStyle/>");

    let run_properties = run_properties(element)?;
    let paragraph_properties = paragraph_properties(element)?;
    for line in element.text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        xml.push_str("<a:p>");
        xml.push_str(&paragraph_properties);
        xml.push_str("<a:r>");
        xml.push_str(&run_properties);
        write!(xml, "<a:t>{}</a:t>", escape(line))?;
        xml.push_str("</a:r></a:p>");
    }

    xml.push_str("</p:txBody></p:sp>");
    Ok(xml)
}

fn anchor(valign: VerticalAlign) -> &'static str {
    match valign {
        VerticalAlign::Top => "t",
        VerticalAlign::Middle => "ctr",
        VerticalAlign::Bottom => "b",
    }
}

fn alignment(align: Align) -> &'static str {
    match align {
        Align::Left => "l",
        Align::Center => "ctr",
        Align::Right => "r",
    }
}

fn paragraph_properties(element: &TextElement) -> Result<String> {
    let mut xml = String::with_capacity(128);
    write!(xml, r#"<a:pPr algn="{}">"#, alignment(element.align))?;

    if let Some(spacing) = element.line_spacing {
        match element.line_spacing_type {
            LineSpacingType::Percent => write!(
                xml,
                r#"<a:lnSpc><a:spcPct val="{}"/></a:lnSpc>"#,
                units::percent(spacing)
            )?,
            LineSpacingType::Points => write!(
                xml,
                r#"<a:lnSpc><a:spcPts val="{}"/></a:lnSpc>"#,
                Unit::LineSpacing.convert(spacing)
            )?,
        }
    }
    if let Some(before) = element.space_before {
        write!(
            xml,
            r#"<a:spcBef><a:spcPts val="{}"/></a:spcBef>"#,
            Unit::LineSpacing.convert(before)
        )?;
    }
    if let Some(after) = element.space_after {
        write!(
            xml,
            r#"<a:spcAft><a:spcPts val="{}"/></a:spcAft>"#,
            Unit::LineSpacing.convert(after)
        )?;
    }

    xml.push_str("</a:pPr>");
    Ok(xml)
}

fn run_properties(element: &TextElement) -> Result<String> {
    let mut xml = String::with_capacity(256);
    write!(
        xml,
        r#"<a:rPr lang="en-US" sz="{}" b="{}" i="{}""#,
        units::font_size(element.font_size),
        u8::from(element.bold),
        u8::from(element.italic),
    )?;
    if let Some(spacing) = element.char_spacing {
        write!(xml, r#" spc="{}""#, Unit::CharSpacing.convert(spacing))?;
    }
    xml.push_str(r#" dirty="0">"#);

    push_solid_fill(&mut xml, &element.color, 1.0)?;

    // Same family for Latin, East Asian, and complex scripts so CJK text
    // does not fall back to the theme font.
    let typeface = escape(&element.font_family);
    for class in ["latin", "ea", "cs"] {
        write!(xml, r#"<a:{} typeface="{}"/>"#, class, typeface)?;
    }

    xml.push_str("</a:rPr>");
    Ok(xml)
}
