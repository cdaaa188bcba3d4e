//! Native .pptx renderer.
//!
//! A pptx file is an OPC zip of XML parts. The writer emits a fixed minimal
//! package — presentation, one master/layout/theme, one slide part per
//! SlideContent, and notes parts only when a slide carries a speaker note.
//! Visual styling is the template's background/title/body color triple; text
//! boxes are absolutely positioned so no layout placeholder machinery is
//! needed.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::deck::{Deck, SlideContent};
use crate::config::TemplateStyle;
use crate::errors::AppError;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CT: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_NOTES_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesMaster";
const REL_NOTES_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";

// 16:9 geometry in EMUs.
const SLIDE_CX: i64 = 12_192_000;
const SLIDE_CY: i64 = 6_858_000;
const TITLE_X: i64 = 838_200;
const TITLE_Y: i64 = 365_125;
const TITLE_CX: i64 = 10_515_600;
const TITLE_CY: i64 = 1_325_563;
const BODY_X: i64 = 838_200;
const BODY_Y: i64 = 1_825_625;
const BODY_CX: i64 = 10_515_600;
const BODY_CY: i64 = 4_351_338;

/// Serialize the deck to `path`. An empty deck still produces a minimally
/// valid single-slide file.
pub fn render_deck(deck: &Deck, path: &Path) -> Result<(), AppError> {
    let fallback;
    let slides: &[SlideContent] = if deck.slides.is_empty() {
        fallback = [SlideContent {
            title: deck.topic.clone(),
            bullets: Vec::new(),
            note: None,
        }];
        &fallback
    } else {
        &deck.slides
    };

    let has_notes = slides.iter().any(|s| s.note.is_some());

    let file = File::create(path)
        .map_err(|e| AppError::Render(format!("Failed to create {}: {e}", path.display())))?;
    let mut zip = ZipWriter::new(file);

    add_part(&mut zip, "[Content_Types].xml", &content_types(slides, has_notes))?;
    add_part(&mut zip, "_rels/.rels", &root_rels())?;
    add_part(&mut zip, "ppt/presentation.xml", &presentation_xml(slides.len(), has_notes))?;
    add_part(
        &mut zip,
        "ppt/_rels/presentation.xml.rels",
        &presentation_rels(slides.len(), has_notes),
    )?;
    add_part(&mut zip, "ppt/slideMasters/slideMaster1.xml", &slide_master_xml())?;
    add_part(
        &mut zip,
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        &slide_master_rels(),
    )?;
    add_part(&mut zip, "ppt/slideLayouts/slideLayout1.xml", &slide_layout_xml())?;
    add_part(
        &mut zip,
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        &slide_layout_rels(),
    )?;
    add_part(&mut zip, "ppt/theme/theme1.xml", &theme_xml())?;

    if has_notes {
        add_part(&mut zip, "ppt/theme/theme2.xml", &theme_xml())?;
        add_part(&mut zip, "ppt/notesMasters/notesMaster1.xml", &notes_master_xml())?;
        add_part(
            &mut zip,
            "ppt/notesMasters/_rels/notesMaster1.xml.rels",
            &notes_master_rels(),
        )?;
    }

    for (idx, slide) in slides.iter().enumerate() {
        let n = idx + 1;
        add_part(
            &mut zip,
            &format!("ppt/slides/slide{n}.xml"),
            &slide_xml(slide, &deck.style),
        )?;
        add_part(
            &mut zip,
            &format!("ppt/slides/_rels/slide{n}.xml.rels"),
            &slide_rels(n, slide.note.is_some()),
        )?;
        if let Some(note) = &slide.note {
            add_part(
                &mut zip,
                &format!("ppt/notesSlides/notesSlide{n}.xml"),
                &notes_slide_xml(note),
            )?;
            add_part(
                &mut zip,
                &format!("ppt/notesSlides/_rels/notesSlide{n}.xml.rels"),
                &notes_slide_rels(n),
            )?;
        }
    }

    zip.finish()
        .map_err(|e| AppError::Render(format!("Failed to finalize {}: {e}", path.display())))?;
    Ok(())
}

fn add_part(zip: &mut ZipWriter<File>, name: &str, xml: &str) -> Result<(), AppError> {
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    zip.start_file(name, options)
        .map_err(|e| AppError::Render(format!("zip entry {name}: {e}")))?;
    zip.write_all(xml.as_bytes())
        .map_err(|e| AppError::Render(format!("zip write {name}: {e}")))?;
    Ok(())
}

/// Escape text for an XML content position. Control characters other than
/// tab are not representable in XML 1.0 and are dropped.
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() && c != '\t' => {}
            c => out.push(c),
        }
    }
    out
}

fn content_types(slides: &[SlideContent], has_notes: bool) -> String {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<Types xmlns="{NS_CT}">"#));
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#);
    if has_notes {
        xml.push_str(r#"<Override PartName="/ppt/theme/theme2.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#);
        xml.push_str(r#"<Override PartName="/ppt/notesMasters/notesMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml"/>"#);
    }
    for (idx, slide) in slides.iter().enumerate() {
        let n = idx + 1;
        xml.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
        ));
        if slide.note.is_some() {
            xml.push_str(&format!(
                r#"<Override PartName="/ppt/notesSlides/notesSlide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml"/>"#
            ));
        }
    }
    xml.push_str("</Types>");
    xml
}

fn relationship(id: &str, rel_type: &str, target: &str) -> String {
    format!(r#"<Relationship Id="{id}" Type="{rel_type}" Target="{target}"/>"#)
}

fn rels_document(body: &str) -> String {
    format!(r#"{XML_DECL}<Relationships xmlns="{NS_REL}">{body}</Relationships>"#)
}

fn root_rels() -> String {
    rels_document(&relationship("rId1", REL_OFFICE_DOCUMENT, "ppt/presentation.xml"))
}

fn presentation_xml(slide_count: usize, has_notes: bool) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(
        r#"<p:presentation xmlns:p="{NS_P}" xmlns:a="{NS_A}" xmlns:r="{NS_R}">"#
    ));
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
    if has_notes {
        xml.push_str(&format!(
            r#"<p:notesMasterIdLst><p:notesMasterId r:id="rId{}"/></p:notesMasterIdLst>"#,
            slide_count + 2
        ));
    }
    xml.push_str("<p:sldIdLst>");
    for i in 1..=slide_count {
        xml.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + i, i + 1));
    }
    xml.push_str("</p:sldIdLst>");
    xml.push_str(&format!(r#"<p:sldSz cx="{SLIDE_CX}" cy="{SLIDE_CY}"/>"#));
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    xml
}

fn presentation_rels(slide_count: usize, has_notes: bool) -> String {
    let mut body = relationship("rId1", REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml");
    for i in 1..=slide_count {
        body.push_str(&relationship(
            &format!("rId{}", i + 1),
            REL_SLIDE,
            &format!("slides/slide{i}.xml"),
        ));
    }
    if has_notes {
        body.push_str(&relationship(
            &format!("rId{}", slide_count + 2),
            REL_NOTES_MASTER,
            "notesMasters/notesMaster1.xml",
        ));
    }
    rels_document(&body)
}

/// The empty shape-tree scaffolding every slide-like part starts with.
fn push_sp_tree_open(xml: &mut String) {
    xml.push_str("<p:spTree><p:nvGrpSpPr>");
    xml.push_str(r#"<p:cNvPr id="1" name=""/>"#);
    xml.push_str("<p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm>");
    xml.push_str(r#"<a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/>"#);
    xml.push_str("</a:xfrm></p:grpSpPr>");
}

const CLR_MAP: &str = r#"bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink""#;

fn slide_master_xml() -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(
        r#"<p:sldMaster xmlns:p="{NS_P}" xmlns:a="{NS_A}" xmlns:r="{NS_R}">"#
    ));
    xml.push_str("<p:cSld>");
    xml.push_str(r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="FFFFFF"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#);
    push_sp_tree_open(&mut xml);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(&format!("<p:clrMap {CLR_MAP}/>"));
    xml.push_str(r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#);
    xml.push_str("</p:sldMaster>");
    xml
}

fn slide_master_rels() -> String {
    let mut body = relationship("rId1", REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
    body.push_str(&relationship("rId2", REL_THEME, "../theme/theme1.xml"));
    rels_document(&body)
}

fn slide_layout_xml() -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(
        r#"<p:sldLayout xmlns:p="{NS_P}" xmlns:a="{NS_A}" xmlns:r="{NS_R}" type="blank" preserve="1">"#
    ));
    xml.push_str(r#"<p:cSld name="Blank">"#);
    push_sp_tree_open(&mut xml);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sldLayout>");
    xml
}

fn slide_layout_rels() -> String {
    rels_document(&relationship("rId1", REL_SLIDE_MASTER, "../slideMasters/slideMaster1.xml"))
}

fn notes_master_xml() -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(
        r#"<p:notesMaster xmlns:p="{NS_P}" xmlns:a="{NS_A}" xmlns:r="{NS_R}">"#
    ));
    xml.push_str("<p:cSld>");
    push_sp_tree_open(&mut xml);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(&format!("<p:clrMap {CLR_MAP}/>"));
    xml.push_str("</p:notesMaster>");
    xml
}

fn notes_master_rels() -> String {
    rels_document(&relationship("rId1", REL_THEME, "../theme/theme2.xml"))
}

fn slide_xml(slide: &SlideContent, style: &TemplateStyle) -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(
        r#"<p:sld xmlns:p="{NS_P}" xmlns:a="{NS_A}" xmlns:r="{NS_R}">"#
    ));
    xml.push_str("<p:cSld>");
    // Background must precede the shape tree.
    xml.push_str(&format!(
        r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#,
        style.background
    ));
    push_sp_tree_open(&mut xml);
    write_title_shape(&mut xml, &slide.title, style);
    if !slide.bullets.is_empty() {
        write_body_shape(&mut xml, &slide.bullets, style);
    }
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    xml
}

fn write_title_shape(xml: &mut String, title: &str, style: &TemplateStyle) {
    xml.push_str("<p:sp><p:nvSpPr>");
    xml.push_str(r#"<p:cNvPr id="2" name="Title"/>"#);
    xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#);
    xml.push_str(&format!(
        r#"<p:spPr><a:xfrm><a:off x="{TITLE_X}" y="{TITLE_Y}"/><a:ext cx="{TITLE_CX}" cy="{TITLE_CY}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#
    ));
    xml.push_str(r#"<p:txBody><a:bodyPr wrap="square"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#);
    xml.push_str(&format!(
        r#"<a:p><a:pPr algn="l"/><a:r><a:rPr lang="en-US" sz="4000" b="1" dirty="0"><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:rPr><a:t>{}</a:t></a:r></a:p>"#,
        style.title_color,
        escape_xml(title)
    ));
    xml.push_str("</p:txBody></p:sp>");
}

fn write_body_shape(xml: &mut String, bullets: &[String], style: &TemplateStyle) {
    xml.push_str("<p:sp><p:nvSpPr>");
    xml.push_str(r#"<p:cNvPr id="3" name="Content"/>"#);
    xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#);
    xml.push_str(&format!(
        r#"<p:spPr><a:xfrm><a:off x="{BODY_X}" y="{BODY_Y}"/><a:ext cx="{BODY_CX}" cy="{BODY_CY}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#
    ));
    xml.push_str(r#"<p:txBody><a:bodyPr wrap="square"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#);
    for bullet in bullets {
        // One paragraph per bullet, all at the same level and indent.
        xml.push_str(&format!(
            r#"<a:p><a:pPr marL="285750" indent="-285750" algn="l"><a:buFont typeface="Arial" pitchFamily="34" charset="0"/><a:buChar char="&#8226;"/></a:pPr><a:r><a:rPr lang="en-US" sz="2000" dirty="0"><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:rPr><a:t>{}</a:t></a:r></a:p>"#,
            style.body_color,
            escape_xml(bullet)
        ));
    }
    xml.push_str("</p:txBody></p:sp>");
}

fn slide_rels(n: usize, has_note: bool) -> String {
    let mut body = relationship("rId1", REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
    if has_note {
        body.push_str(&relationship(
            "rId2",
            REL_NOTES_SLIDE,
            &format!("../notesSlides/notesSlide{n}.xml"),
        ));
    }
    rels_document(&body)
}

fn notes_slide_xml(note: &str) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(
        r#"<p:notes xmlns:p="{NS_P}" xmlns:a="{NS_A}" xmlns:r="{NS_R}">"#
    ));
    xml.push_str("<p:cSld>");
    push_sp_tree_open(&mut xml);
    xml.push_str("<p:sp><p:nvSpPr>");
    xml.push_str(r#"<p:cNvPr id="2" name="Notes Placeholder"/>"#);
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
    xml.push_str(r#"<p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr>"#);
    xml.push_str("<p:spPr/>");
    xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/>");
    for line in note.split('\n') {
        xml.push_str(&format!(
            r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
            escape_xml(line.trim_end_matches('\r'))
        ));
    }
    xml.push_str("</p:txBody></p:sp>");
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>");
    xml
}

fn notes_slide_rels(n: usize) -> String {
    let mut body = relationship("rId1", REL_NOTES_MASTER, "../notesMasters/notesMaster1.xml");
    body.push_str(&relationship("rId2", REL_SLIDE, &format!("../slides/slide{n}.xml")));
    rels_document(&body)
}

/// Minimal Office theme: color scheme, font scheme, and the three-entry
/// format scheme lists the schema requires.
fn theme_xml() -> String {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<a:theme xmlns:a="{NS_A}" name="Office Theme">"#));
    xml.push_str("<a:themeElements>");
    xml.push_str(r#"<a:clrScheme name="Office">"#);
    xml.push_str(r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#);
    xml.push_str(r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#);
    xml.push_str(r#"<a:dk2><a:srgbClr val="44546A"/></a:dk2>"#);
    xml.push_str(r#"<a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>"#);
    xml.push_str(r#"<a:accent1><a:srgbClr val="4472C4"/></a:accent1>"#);
    xml.push_str(r#"<a:accent2><a:srgbClr val="ED7D31"/></a:accent2>"#);
    xml.push_str(r#"<a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>"#);
    xml.push_str(r#"<a:accent4><a:srgbClr val="FFC000"/></a:accent4>"#);
    xml.push_str(r#"<a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>"#);
    xml.push_str(r#"<a:accent6><a:srgbClr val="70AD47"/></a:accent6>"#);
    xml.push_str(r#"<a:hlink><a:srgbClr val="0563C1"/></a:hlink>"#);
    xml.push_str(r#"<a:folHlink><a:srgbClr val="954F72"/></a:folHlink>"#);
    xml.push_str("</a:clrScheme>");
    xml.push_str(r#"<a:fontScheme name="Office">"#);
    xml.push_str(r#"<a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#);
    xml.push_str(r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#);
    xml.push_str("</a:fontScheme>");
    xml.push_str(r#"<a:fmtScheme name="Office">"#);
    xml.push_str("<a:fillStyleLst>");
    for _ in 0..3 {
        xml.push_str(r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#);
    }
    xml.push_str("</a:fillStyleLst>");
    xml.push_str("<a:lnStyleLst>");
    for w in ["6350", "12700", "19050"] {
        xml.push_str(&format!(
            r#"<a:ln w="{w}"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#
        ));
    }
    xml.push_str("</a:lnStyleLst>");
    xml.push_str("<a:effectStyleLst>");
    for _ in 0..3 {
        xml.push_str("<a:effectStyle><a:effectLst/></a:effectStyle>");
    }
    xml.push_str("</a:effectStyleLst>");
    xml.push_str("<a:bgFillStyleLst>");
    for _ in 0..3 {
        xml.push_str(r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#);
    }
    xml.push_str("</a:bgFillStyleLst>");
    xml.push_str("</a:fmtScheme>");
    xml.push_str("</a:themeElements>");
    xml.push_str("</a:theme>");
    xml
}
