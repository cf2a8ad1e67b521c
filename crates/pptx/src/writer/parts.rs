//! XML for the individual package parts.

use super::shapes::{write_background, write_group_header, ShapeTree};
use super::{esc, NS_A, NS_P, NS_R, XML_DECLARATION};
use crate::drawing::{emu, Fill};
use crate::master::Master;
use crate::render::{RenderedDeck, RenderedSlide};
use deck_core::Theme;
use std::fmt::{self, Write};

pub(crate) const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub(crate) const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
pub(crate) const REL_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
pub(crate) const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
pub(crate) const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
pub(crate) const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub(crate) const REL_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
pub(crate) const REL_NOTES_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesMaster";
pub(crate) const REL_NOTES_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";
pub(crate) const REL_CHART: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart";
pub(crate) const REL_PRES_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
pub(crate) const REL_VIEW_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
pub(crate) const REL_TABLE_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";

pub(crate) const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
pub(crate) const CT_SLIDE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
pub(crate) const CT_SLIDE_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
pub(crate) const CT_SLIDE_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
pub(crate) const CT_NOTES_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml";
pub(crate) const CT_NOTES_SLIDE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml";
pub(crate) const CT_PRES_PROPS: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
pub(crate) const CT_VIEW_PROPS: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml";
pub(crate) const CT_TABLE_STYLES: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
pub(crate) const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
pub(crate) const CT_CHART: &str =
    "application/vnd.openxmlformats-officedocument.drawingml.chart+xml";
pub(crate) const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
pub(crate) const CT_APP: &str =
    "application/vnd.openxmlformats-officedocument.extended-properties+xml";

/// First slide id in `p:sldIdLst`.
pub(crate) const FIRST_SLIDE_ID: usize = 256;
const SLIDE_MASTER_ID: u64 = 2_147_483_648;
const SLIDE_LAYOUT_ID: u64 = 2_147_483_649;

/// Notes page size, EMUs (7.5 x 10 in portrait).
const NOTES_SIZE: (i64, i64) = (6_858_000, 9_144_000);

const SECTIONS_EXT_URI: &str = "{521415D9-36F7-43E2-AB2F-B90AF26B5E84}";
const NS_P14: &str = "http://schemas.microsoft.com/office/powerpoint/2010/main";

const CLR_MAP: &str = r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#;

/// One entry of a `.rels` part.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Relationship {
    pub id: String,
    pub kind: &'static str,
    pub target: String,
}

impl Relationship {
    pub(crate) fn new(id: impl Into<String>, kind: &'static str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            target: target.into(),
        }
    }
}

pub(crate) fn rels_xml(rels: &[Relationship]) -> Result<String, fmt::Error> {
    let mut xml = String::with_capacity(256 + rels.len() * 160);
    xml.push_str(XML_DECLARATION);
    xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    for rel in rels {
        write!(
            xml,
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            rel.id,
            rel.kind,
            esc(&rel.target)
        )?;
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

/// `[Content_Types].xml` for parts given as (path, content type).
pub(crate) fn content_types_xml(overrides: &[(String, &'static str)]) -> Result<String, fmt::Error> {
    let mut xml = String::with_capacity(1024 + overrides.len() * 160);
    xml.push_str(XML_DECLARATION);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    for (path, content_type) in overrides {
        write!(
            xml,
            r#"<Override PartName="/{}" ContentType="{}"/>"#,
            esc(path),
            content_type
        )?;
    }
    xml.push_str("</Types>");
    Ok(xml)
}

fn open_root(xml: &mut String, tag: &str, extra: &str) -> fmt::Result {
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<{} xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"{}>"#,
        tag, NS_A, NS_R, NS_P, extra
    )
}

pub(crate) fn slide_xml(
    slide: &RenderedSlide,
    chart_rel_ids: &[String],
) -> Result<String, fmt::Error> {
    let mut xml = String::with_capacity(4096);
    open_root(&mut xml, "p:sld", "")?;
    xml.push_str("<p:cSld>");
    if let Some(color) = &slide.background {
        write_background(&mut xml, &Fill::solid(color.as_str()))?;
    }
    xml.push_str("<p:spTree>");
    write_group_header(&mut xml);
    ShapeTree::new(&mut xml, chart_rel_ids).write_all(&slide.drawables)?;
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    Ok(xml)
}

pub(crate) fn slide_master_xml(master: &Master) -> Result<String, fmt::Error> {
    let mut xml = String::with_capacity(4096);
    open_root(&mut xml, "p:sldMaster", "")?;
    write!(xml, r#"<p:cSld name="{}">"#, esc(&master.name))?;
    write_background(&mut xml, &master.background)?;
    xml.push_str("<p:spTree>");
    write_group_header(&mut xml);
    ShapeTree::new(&mut xml, &[]).write_all(&master.decorations)?;
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(CLR_MAP);
    write!(
        xml,
        r#"<p:sldLayoutIdLst><p:sldLayoutId id="{}" r:id="rId1"/></p:sldLayoutIdLst>"#,
        SLIDE_LAYOUT_ID
    )?;
    let fonts = &master.theme.fonts;
    write!(
        xml,
        r#"<p:txStyles><p:titleStyle><a:lvl1pPr><a:defRPr sz="3800"><a:latin typeface="{}"/></a:defRPr></a:lvl1pPr></p:titleStyle>"#,
        esc(&fonts.title)
    )?;
    write!(
        xml,
        r#"<p:bodyStyle><a:lvl1pPr><a:defRPr sz="2400"><a:latin typeface="{}"/></a:defRPr></a:lvl1pPr></p:bodyStyle>"#,
        esc(&fonts.body)
    )?;
    xml.push_str("<p:otherStyle><a:lvl1pPr><a:defRPr/></a:lvl1pPr></p:otherStyle></p:txStyles>");
    xml.push_str("</p:sldMaster>");
    Ok(xml)
}

pub(crate) fn slide_layout_xml() -> Result<String, fmt::Error> {
    let mut xml = String::with_capacity(1024);
    open_root(&mut xml, "p:sldLayout", r#" type="blank" preserve="1""#)?;
    xml.push_str(r#"<p:cSld name="Blank"><p:spTree>"#);
    write_group_header(&mut xml);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>");
    Ok(xml)
}

pub(crate) fn notes_master_xml() -> Result<String, fmt::Error> {
    let mut xml = String::with_capacity(1024);
    open_root(&mut xml, "p:notesMaster", "")?;
    xml.push_str("<p:cSld><p:spTree>");
    write_group_header(&mut xml);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(CLR_MAP);
    xml.push_str("</p:notesMaster>");
    Ok(xml)
}

pub(crate) fn notes_slide_xml(notes: &str) -> Result<String, fmt::Error> {
    let mut xml = String::with_capacity(1024 + notes.len());
    open_root(&mut xml, "p:notes", "")?;
    xml.push_str("<p:cSld><p:spTree>");
    write_group_header(&mut xml);
    xml.push_str(r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/><p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr><p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>"#);
    xml.push_str(r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/>"#);
    xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/>");
    for line in notes.lines() {
        write!(
            xml,
            r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
            esc(line)
        )?;
    }
    xml.push_str("</p:txBody></p:sp></p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>");
    Ok(xml)
}

/// `presentation.xml`. `slide_rel_ids` holds one relationship id per slide.
pub(crate) fn presentation_xml(
    deck: &RenderedDeck,
    slide_rel_ids: &[String],
    notes_master_rel_id: Option<&str>,
) -> Result<String, fmt::Error> {
    let mut xml = String::with_capacity(2048);
    open_root(&mut xml, "p:presentation", r#" saveSubsetFonts="1""#)?;
    write!(
        xml,
        r#"<p:sldMasterIdLst><p:sldMasterId id="{}" r:id="rId1"/></p:sldMasterIdLst>"#,
        SLIDE_MASTER_ID
    )?;
    if let Some(rel_id) = notes_master_rel_id {
        write!(
            xml,
            r#"<p:notesMasterIdLst><p:notesMasterId r:id="{}"/></p:notesMasterIdLst>"#,
            rel_id
        )?;
    }
    if !slide_rel_ids.is_empty() {
        xml.push_str("<p:sldIdLst>");
        for (index, rel_id) in slide_rel_ids.iter().enumerate() {
            write!(
                xml,
                r#"<p:sldId id="{}" r:id="{}"/>"#,
                FIRST_SLIDE_ID + index,
                rel_id
            )?;
        }
        xml.push_str("</p:sldIdLst>");
    }

    let (width, height) = deck.master.canvas.size();
    write!(xml, r#"<p:sldSz cx="{}" cy="{}"/>"#, emu(width), emu(height))?;
    write!(xml, r#"<p:notesSz cx="{}" cy="{}"/>"#, NOTES_SIZE.0, NOTES_SIZE.1)?;

    if !deck.sections.is_empty() {
        write_sections(&mut xml, deck)?;
    }
    xml.push_str("</p:presentation>");
    Ok(xml)
}

fn write_sections(xml: &mut String, deck: &RenderedDeck) -> fmt::Result {
    write!(
        xml,
        r#"<p:extLst><p:ext uri="{}"><p14:sectionLst xmlns:p14="{}">"#,
        SECTIONS_EXT_URI, NS_P14
    )?;
    for (index, title) in deck.sections.iter().enumerate() {
        write!(
            xml,
            r#"<p14:section name="{}" id="{{{:08X}-5EC7-4D1E-9A3B-{:012X}}}"><p14:sldIdLst>"#,
            esc(title),
            index + 1,
            index + 1
        )?;
        for (slide_index, slide) in deck.slides.iter().enumerate() {
            if slide.section == Some(index) {
                write!(xml, r#"<p14:sldId id="{}"/>"#, FIRST_SLIDE_ID + slide_index)?;
            }
        }
        xml.push_str("</p14:sldIdLst></p14:section>");
    }
    xml.push_str("</p14:sectionLst></p:ext></p:extLst>");
    Ok(())
}

pub(crate) fn pres_props_xml() -> Result<String, fmt::Error> {
    let mut xml = String::new();
    open_root(&mut xml, "p:presentationPr", "")?;
    xml.push_str("</p:presentationPr>");
    Ok(xml)
}

pub(crate) fn view_props_xml() -> Result<String, fmt::Error> {
    let mut xml = String::new();
    open_root(&mut xml, "p:viewPr", "")?;
    xml.push_str(r#"<p:gridSpacing cx="76200" cy="76200"/></p:viewPr>"#);
    Ok(xml)
}

pub(crate) fn table_styles_xml() -> Result<String, fmt::Error> {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<a:tblStyleLst xmlns:a="{}" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#,
        NS_A
    )?;
    Ok(xml)
}

/// Theme part carrying the deck palette and fonts.
///
/// Slot mapping: dk1 text, lt1 background, dk2 primary, accent1..3
/// primary / secondary / accent.
pub(crate) fn theme_xml(theme: &Theme, name: &str) -> Result<String, fmt::Error> {
    let colors = &theme.color_scheme;
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECLARATION);
    write!(xml, r#"<a:theme xmlns:a="{}" name="{}"><a:themeElements>"#, NS_A, esc(name))?;

    write!(xml, r#"<a:clrScheme name="{}">"#, esc(name))?;
    let slots: [(&str, &str); 12] = [
        ("dk1", &colors.text),
        ("lt1", &colors.background),
        ("dk2", &colors.primary),
        ("lt2", "E7E6E6"),
        ("accent1", &colors.primary),
        ("accent2", &colors.secondary),
        ("accent3", &colors.accent),
        ("accent4", "FFC000"),
        ("accent5", "5B9BD5"),
        ("accent6", "70AD47"),
        ("hlink", "0563C1"),
        ("folHlink", "954F72"),
    ];
    for (slot, color) in slots {
        write!(xml, r#"<a:{}><a:srgbClr val="{}"/></a:{}>"#, slot, esc(color), slot)?;
    }
    xml.push_str("</a:clrScheme>");

    write!(
        xml,
        r#"<a:fontScheme name="{}"><a:majorFont><a:latin typeface="{}"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="{}"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme>"#,
        esc(name),
        esc(&theme.fonts.title),
        esc(&theme.fonts.body)
    )?;

    xml.push_str(r#"<a:fmtScheme name="Office"><a:fillStyleLst>"#);
    for _ in 0..3 {
        xml.push_str(r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#);
    }
    xml.push_str("</a:fillStyleLst><a:lnStyleLst>");
    for width in [6350, 12700, 19050] {
        write!(
            xml,
            r#"<a:ln w="{}"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
            width
        )?;
    }
    xml.push_str("</a:lnStyleLst><a:effectStyleLst>");
    for _ in 0..3 {
        xml.push_str("<a:effectStyle><a:effectLst/></a:effectStyle>");
    }
    xml.push_str("</a:effectStyleLst><a:bgFillStyleLst>");
    for _ in 0..3 {
        xml.push_str(r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#);
    }
    xml.push_str("</a:bgFillStyleLst></a:fmtScheme>");

    xml.push_str("</a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>");
    Ok(xml)
}

/// Document properties written to `docProps/core.xml` and `docProps/app.xml`.
pub(crate) struct Properties<'a> {
    pub title: &'a str,
    pub subject: Option<&'a str>,
    pub creator: &'a str,
    pub description: Option<&'a str>,
    pub company: &'a str,
    pub slides: usize,
    pub notes: usize,
}

pub(crate) fn core_props_xml(props: &Properties) -> Result<String, fmt::Error> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECLARATION);
    xml.push_str(r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#);
    write!(xml, "<dc:title>{}</dc:title>", esc(props.title))?;
    if let Some(subject) = props.subject {
        write!(xml, "<dc:subject>{}</dc:subject>", esc(subject))?;
    }
    write!(xml, "<dc:creator>{}</dc:creator>", esc(props.creator))?;
    if let Some(description) = props.description {
        write!(xml, "<dc:description>{}</dc:description>", esc(description))?;
    }
    write!(
        xml,
        "<cp:lastModifiedBy>{}</cp:lastModifiedBy><cp:revision>1</cp:revision>",
        esc(props.creator)
    )?;
    xml.push_str("</cp:coreProperties>");
    Ok(xml)
}

pub(crate) fn app_props_xml(props: &Properties) -> Result<String, fmt::Error> {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECLARATION);
    xml.push_str(r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#);
    write!(
        xml,
        "<Application>{}</Application><PresentationFormat>On-screen Show</PresentationFormat>",
        env!("CARGO_PKG_NAME")
    )?;
    write!(
        xml,
        "<Slides>{}</Slides><Notes>{}</Notes><Company>{}</Company>",
        props.slides,
        props.notes,
        esc(props.company)
    )?;
    xml.push_str("</Properties>");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{Drawable, Frame, ShapeSpec};
    use deck_core::Canvas;

    fn deck(slides: usize) -> RenderedDeck {
        let mut deck = RenderedDeck::new(Master::for_theme(&Theme::default(), Canvas::default()));
        deck.slides = (1..=slides).map(RenderedSlide::new).collect();
        deck
    }

    #[test]
    fn test_presentation_ids_and_size() {
        let deck = deck(3);
        let ids: Vec<String> = (2..5).map(|i| format!("rId{}", i)).collect();
        let xml = presentation_xml(&deck, &ids, None).unwrap();
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId2"/>"#));
        assert!(xml.contains(r#"<p:sldId id="258" r:id="rId4"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="5143500"/>"#));
        assert!(!xml.contains("notesMasterIdLst"));
        assert!(!xml.contains("sectionLst"));
    }

    #[test]
    fn test_sections_list() {
        let mut deck = deck(3);
        deck.sections = vec!["Intro".into(), "Body".into()];
        deck.slides[0].section = Some(0);
        deck.slides[1].section = Some(1);
        deck.slides[2].section = Some(1);
        let ids: Vec<String> = (2..5).map(|i| format!("rId{}", i)).collect();
        let xml = presentation_xml(&deck, &ids, Some("rId5")).unwrap();
        assert!(xml.contains(r#"<p:notesMasterId r:id="rId5"/>"#));
        assert!(xml.contains(r#"<p14:section name="Intro""#));
        let body = xml.find(r#"name="Body""#).unwrap();
        assert!(xml[body..].contains(r#"<p14:sldId id="257"/><p14:sldId id="258"/>"#));
        // The section list is the last child of the presentation.
        assert!(xml.ends_with("</p:extLst></p:presentation>"));
    }

    #[test]
    fn test_slide_background_override() {
        let mut slide = RenderedSlide::new(1);
        slide.background = Some("101010".into());
        slide.drawables.push(Drawable::Shape(ShapeSpec::rect(
            Frame::inches(0.0, 0.0, 1.0, 1.0),
            Fill::solid("FFFFFF"),
        )));
        let xml = slide_xml(&slide, &[]).unwrap();
        let bg = xml.find("<p:bg>").unwrap();
        let tree = xml.find("<p:spTree>").unwrap();
        assert!(bg < tree);
        assert!(xml.contains(r#"<a:srgbClr val="101010"/>"#));
        assert!(!slide_xml(&RenderedSlide::new(1), &[]).unwrap().contains("<p:bg>"));
    }

    #[test]
    fn test_theme_palette() {
        let mut theme = Theme::default();
        theme.color_scheme.primary = "112233".into();
        theme.fonts.title = "Georgia".into();
        let xml = theme_xml(&theme, "Deck").unwrap();
        assert!(xml.contains(r#"<a:accent1><a:srgbClr val="112233"/></a:accent1>"#));
        assert!(xml.contains(r#"<a:majorFont><a:latin typeface="Georgia"/>"#));
    }

    #[test]
    fn test_notes_lines() {
        let xml = notes_slide_xml("first\nsecond & third").unwrap();
        assert_eq!(xml.matches("<a:p>").count(), 2);
        assert!(xml.contains("second &amp; third"));
    }

    #[test]
    fn test_properties() {
        let props = Properties {
            title: "Deck",
            subject: Some("Presentation about oceans"),
            creator: "Ana",
            description: Some("Contact: ana@example.com"),
            company: "Acme",
            slides: 5,
            notes: 4,
        };
        let core = core_props_xml(&props).unwrap();
        assert!(core.contains("<dc:subject>Presentation about oceans</dc:subject>"));
        assert!(core.contains("<dc:creator>Ana</dc:creator>"));
        let app = app_props_xml(&props).unwrap();
        assert!(app.contains("<Slides>5</Slides><Notes>4</Notes><Company>Acme</Company>"));
    }

    #[test]
    fn test_rels_and_content_types() {
        let rels = rels_xml(&[Relationship::new("rId1", REL_SLIDE, "slides/slide1.xml")]).unwrap();
        assert!(rels.contains(r#"Id="rId1""#));
        let types = content_types_xml(&[("ppt/slides/slide1.xml".into(), CT_SLIDE)]).unwrap();
        assert!(types.contains(r#"PartName="/ppt/slides/slide1.xml""#));
    }
}
