//! Slide document assembly.

use crate::xml::push_solid_fill;
use crate::{picture, shape, text};
use deck_core::{Element, Error, Result, Template};
use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;

/// Image id to slide relationship id (e.g. `"logo"` -> `"rId2"`).
pub type ImageRelationships = BTreeMap<String, String>;

/// Id of the shape tree's own group node.
pub const ROOT_GROUP_ID: u32 = 1;

/// Id given to the first element; later elements count up from here.
pub const FIRST_ELEMENT_ID: u32 = 2;

const SLIDE_NAMESPACES: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#,
);

/// Build the complete `slide1.xml` document for a template.
///
/// Elements are written in template order with ids starting at
/// [`FIRST_ELEMENT_ID`]; document order is the rendering order, so the
/// last element is drawn on top. Image elements must have an entry in
/// `image_rels`.
pub fn build_slide(template: &Template, image_rels: &ImageRelationships) -> Result<String> {
    let mut xml = String::with_capacity(2048);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(xml, "<p:sld {}>", SLIDE_NAMESPACES)?;
    xml.push_str("<p:cSld>");

    // Background must come before the shape tree.
    xml.push_str("<p:bg><p:bgPr>");
    push_solid_fill(&mut xml, &template.background.color, 1.0)?;
    xml.push_str("<a:effectLst/></p:bgPr></p:bg>");

    xml.push_str("<p:spTree>");
    push_root_group(&mut xml)?;

    for (id, (index, element)) in (FIRST_ELEMENT_ID..).zip(template.elements.iter().enumerate()) {
        let fragment = match element {
            Element::Text(e) => text::emit(e, id)?,
            Element::Shape(e) => shape::emit(e, id)?,
            Element::Image(e) => {
                let rel_id = image_rels.get(&e.image_id).ok_or_else(|| {
                    Error::UnresolvedImage {
                        index,
                        image_id: e.image_id.clone(),
                    }
                })?;
                picture::emit(e, id, rel_id)?
            }
        };
        xml.push_str(&fragment);
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");

    log::debug!(
        "Built slide with {} elements ({} bytes)",
        template.elements.len(),
        xml.len()
    );
    Ok(xml)
}

fn push_root_group(xml: &mut String) -> Result<()> {
    xml.push_str("<p:nvGrpSpPr>");
    write!(xml, r#"<p:cNvPr id="{}" name=""/>"#, ROOT_GROUP_ID)?;
    xml.push_str("<p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>");
    xml.push_str("<p:grpSpPr><a:xfrm>");
    xml.push_str(r#"<a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#);
    xml.push_str(r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/>"#);
    xml.push_str("</a:xfrm></p:grpSpPr>");
    Ok(())
}
