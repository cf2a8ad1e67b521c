//! Package assembly and ZIP output.

use super::chart::chart_xml;
use super::parts::*;
use crate::drawing::Drawable;
use crate::render::RenderedDeck;
use deck_core::{Error, Result};
use std::fmt;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

const DEFAULT_CREATOR: &str = "Presentation Generator";
const DEFAULT_COMPANY: &str = "Your Company";

/// Document-level properties of a package.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub title: String,
    pub subject: Option<String>,
    pub author: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
}

impl Metadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author.filter(|a| !a.trim().is_empty());
        self
    }

    pub fn with_company(mut self, company: Option<String>) -> Self {
        self.company = company.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.trim().is_empty());
        self
    }
}

/// One file of the package.
struct Part {
    path: String,
    content_type: Option<&'static str>,
    xml: String,
}

impl Part {
    fn new(path: impl Into<String>, content_type: &'static str, xml: String) -> Self {
        Self {
            path: path.into(),
            content_type: Some(content_type),
            xml,
        }
    }

    fn rels(path: impl Into<String>, rels: &[Relationship]) -> std::result::Result<Self, fmt::Error> {
        Ok(Self {
            path: path.into(),
            content_type: None,
            xml: rels_xml(rels)?,
        })
    }
}

fn rid(n: usize) -> String {
    format!("rId{}", n)
}

/// Lay out every part of the package, in write order.
fn assemble(deck: &RenderedDeck, metadata: &Metadata) -> std::result::Result<Vec<Part>, fmt::Error> {
    let mut parts = Vec::new();
    let notes_count = deck.slides.iter().filter(|s| s.notes.is_some()).count();
    let has_notes = notes_count > 0;

    let mut chart_number = 0;
    let mut slide_rel_ids = Vec::with_capacity(deck.slides.len());
    for (index, slide) in deck.slides.iter().enumerate() {
        let number = index + 1;
        let mut rels = vec![Relationship::new(
            rid(1),
            REL_SLIDE_LAYOUT,
            "../slideLayouts/slideLayout1.xml",
        )];

        let mut chart_rel_ids = Vec::new();
        for chart in slide.drawables.iter().filter_map(|d| match d {
            Drawable::Chart(chart) => Some(chart),
            _ => None,
        }) {
            chart_number += 1;
            let id = rid(rels.len() + 1);
            rels.push(Relationship::new(
                id.clone(),
                REL_CHART,
                format!("../charts/chart{}.xml", chart_number),
            ));
            chart_rel_ids.push(id);
            parts.push(Part::new(
                format!("ppt/charts/chart{}.xml", chart_number),
                CT_CHART,
                chart_xml(chart)?,
            ));
        }

        if let Some(notes) = &slide.notes {
            rels.push(Relationship::new(
                rid(rels.len() + 1),
                REL_NOTES_SLIDE,
                format!("../notesSlides/notesSlide{}.xml", number),
            ));
            parts.push(Part::new(
                format!("ppt/notesSlides/notesSlide{}.xml", number),
                CT_NOTES_SLIDE,
                notes_slide_xml(notes)?,
            ));
            parts.push(Part::rels(
                format!("ppt/notesSlides/_rels/notesSlide{}.xml.rels", number),
                &[
                    Relationship::new(rid(1), REL_NOTES_MASTER, "../notesMasters/notesMaster1.xml"),
                    Relationship::new(rid(2), REL_SLIDE, format!("../slides/slide{}.xml", number)),
                ],
            )?);
        }

        parts.push(Part::new(
            format!("ppt/slides/slide{}.xml", number),
            CT_SLIDE,
            slide_xml(slide, &chart_rel_ids)?,
        ));
        parts.push(Part::rels(
            format!("ppt/slides/_rels/slide{}.xml.rels", number),
            &rels,
        )?);
        slide_rel_ids.push(rid(number + 1));
    }

    // presentation.xml relationships: master, slides, then the supporting parts.
    let mut pres_rels = vec![Relationship::new(
        rid(1),
        REL_SLIDE_MASTER,
        "slideMasters/slideMaster1.xml",
    )];
    for (index, id) in slide_rel_ids.iter().enumerate() {
        pres_rels.push(Relationship::new(
            id.clone(),
            REL_SLIDE,
            format!("slides/slide{}.xml", index + 1),
        ));
    }
    let notes_master_rel_id = if has_notes {
        let id = rid(pres_rels.len() + 1);
        pres_rels.push(Relationship::new(
            id.clone(),
            REL_NOTES_MASTER,
            "notesMasters/notesMaster1.xml",
        ));
        Some(id)
    } else {
        None
    };
    for (kind, target) in [
        (REL_PRES_PROPS, "presProps.xml"),
        (REL_VIEW_PROPS, "viewProps.xml"),
        (REL_THEME, "theme/theme1.xml"),
        (REL_TABLE_STYLES, "tableStyles.xml"),
    ] {
        pres_rels.push(Relationship::new(rid(pres_rels.len() + 1), kind, target));
    }

    let master = &deck.master;
    parts.push(Part::new(
        "ppt/presentation.xml",
        CT_PRESENTATION,
        presentation_xml(deck, &slide_rel_ids, notes_master_rel_id.as_deref())?,
    ));
    parts.push(Part::rels("ppt/_rels/presentation.xml.rels", &pres_rels)?);

    parts.push(Part::new(
        "ppt/slideMasters/slideMaster1.xml",
        CT_SLIDE_MASTER,
        slide_master_xml(master)?,
    ));
    parts.push(Part::rels(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        &[
            Relationship::new(rid(1), REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
            Relationship::new(rid(2), REL_THEME, "../theme/theme1.xml"),
        ],
    )?);
    parts.push(Part::new(
        "ppt/slideLayouts/slideLayout1.xml",
        CT_SLIDE_LAYOUT,
        slide_layout_xml()?,
    ));
    parts.push(Part::rels(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        &[Relationship::new(
            rid(1),
            REL_SLIDE_MASTER,
            "../slideMasters/slideMaster1.xml",
        )],
    )?);
    parts.push(Part::new(
        "ppt/theme/theme1.xml",
        CT_THEME,
        theme_xml(&master.theme, &master.name)?,
    ));

    if has_notes {
        parts.push(Part::new(
            "ppt/notesMasters/notesMaster1.xml",
            CT_NOTES_MASTER,
            notes_master_xml()?,
        ));
        parts.push(Part::rels(
            "ppt/notesMasters/_rels/notesMaster1.xml.rels",
            &[Relationship::new(rid(1), REL_THEME, "../theme/theme2.xml")],
        )?);
        parts.push(Part::new(
            "ppt/theme/theme2.xml",
            CT_THEME,
            theme_xml(&master.theme, "Notes")?,
        ));
    }

    parts.push(Part::new("ppt/presProps.xml", CT_PRES_PROPS, pres_props_xml()?));
    parts.push(Part::new("ppt/viewProps.xml", CT_VIEW_PROPS, view_props_xml()?));
    parts.push(Part::new(
        "ppt/tableStyles.xml",
        CT_TABLE_STYLES,
        table_styles_xml()?,
    ));

    let properties = Properties {
        title: &metadata.title,
        subject: metadata.subject.as_deref(),
        creator: metadata.author.as_deref().unwrap_or(DEFAULT_CREATOR),
        description: metadata.description.as_deref(),
        company: metadata.company.as_deref().unwrap_or(DEFAULT_COMPANY),
        slides: deck.slides.len(),
        notes: notes_count,
    };
    parts.push(Part::new("docProps/core.xml", CT_CORE, core_props_xml(&properties)?));
    parts.push(Part::new("docProps/app.xml", CT_APP, app_props_xml(&properties)?));
    parts.push(Part::rels(
        "_rels/.rels",
        &[
            Relationship::new(rid(1), REL_OFFICE_DOCUMENT, "ppt/presentation.xml"),
            Relationship::new(rid(2), REL_CORE_PROPERTIES, "docProps/core.xml"),
            Relationship::new(rid(3), REL_EXTENDED_PROPERTIES, "docProps/app.xml"),
        ],
    )?);

    Ok(parts)
}

/// Serialize a rendered deck to `.pptx` bytes.
///
/// Output is deterministic: the same deck and metadata always produce the
/// same bytes.
pub fn write_package(deck: &RenderedDeck, metadata: &Metadata) -> Result<Vec<u8>> {
    let parts = assemble(deck, metadata).map_err(|e| Error::Xml(e.to_string()))?;

    let overrides: Vec<(String, &'static str)> = parts
        .iter()
        .filter_map(|p| p.content_type.map(|ct| (p.path.clone(), ct)))
        .collect();
    let content_types = content_types_xml(&overrides).map_err(|e| Error::Xml(e.to_string()))?;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let zip_err = |e: zip::result::ZipError| Error::Zip(e.to_string());
    writer.start_file("[Content_Types].xml", options).map_err(zip_err)?;
    writer.write_all(content_types.as_bytes())?;
    for part in &parts {
        writer.start_file(part.path.as_str(), options).map_err(zip_err)?;
        writer.write_all(part.xml.as_bytes())?;
    }

    let bytes = writer.finish().map_err(zip_err)?.into_inner();
    log::debug!(
        "Wrote package: {} slides, {} parts, {} bytes",
        deck.slides.len(),
        parts.len() + 1,
        bytes.len()
    );
    Ok(bytes)
}
