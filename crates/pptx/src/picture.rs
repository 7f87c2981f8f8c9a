//! Picture XML.

use crate::xml::{escape, push_xfrm};
use deck_core::units;
use deck_core::{ImageElement, Result};
use std::fmt::Write as FmtWrite;

/// Emit a `<p:pic>` referencing an image part through `rel_id`.
pub fn emit(element: &ImageElement, id: u32, rel_id: &str) -> Result<String> {
    let mut xml = String::with_capacity(512);

    xml.push_str("<p:pic><p:nvPicPr>");
    write!(
        xml,
        r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
        id,
        id,
        escape(&element.image_id)
    )?;
    xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/>"#);
    xml.push_str("</p:nvPicPr>");

    xml.push_str("<p:blipFill>");
    if element.opacity < 1.0 {
        write!(
            xml,
            r#"<a:blip r:embed="{}"><a:alphaModFix amt="{}"/></a:blip>"#,
            escape(rel_id),
            units::percent(element.opacity * 100.0)
        )?;
    } else {
        write!(xml, r#"<a:blip r:embed="{}"/>"#, escape(rel_id))?;
    }
    xml.push_str("<a:stretch><a:fillRect/></a:stretch></p:blipFill>");

    xml.push_str("<p:spPr>");
    push_xfrm(&mut xml, &element.frame)?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    xml.push_str("</p:spPr></p:pic>");

    Ok(xml)
}
