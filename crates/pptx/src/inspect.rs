//! Read a generated `.pptx` back into a structural summary.
//!
//! Slide order comes from the `p:sldIdLst` of `presentation.xml`, resolved
//! through the presentation relationships. Only what the writer emits is
//! understood: paragraph text, chart frames, tables, notes and sections.

use deck_core::{ColorScheme, Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSummary {
    pub master_name: Option<String>,
    pub theme: Option<ColorScheme>,
    pub sections: Vec<SectionSummary>,
    pub slides: Vec<SlideSummary>,
}

impl PackageSummary {
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    pub name: String,
    pub slide_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideSummary {
    /// 1-based display position.
    pub number: usize,
    pub path: String,
    /// Non-empty text paragraphs outside tables, in document order.
    pub paragraphs: Vec<String>,
    /// Chart families, e.g. `bar` or `pie`, one per chart frame.
    pub charts: Vec<String>,
    pub tables: Vec<TableSummary>,
    pub has_slide_number: bool,
    pub background: Option<String>,
    pub notes: Option<String>,
}

impl SlideSummary {
    pub fn text(&self) -> String {
        self.paragraphs.join("\n")
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.paragraphs.iter().any(|p| p.contains(needle))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub cells: Vec<Vec<String>>,
    /// Fill of the first cell of each row.
    pub row_fills: Vec<String>,
    /// Whether the first cell of each row is bold.
    pub row_bold: Vec<bool>,
}

impl TableSummary {
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn columns(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// A relationship with its target resolved to an archive path.
#[derive(Debug, Clone)]
struct Rel {
    id: String,
    kind: String,
    path: String,
}

/// Summarize the package in `bytes`.
pub fn inspect_package(bytes: &[u8]) -> Result<PackageSummary> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::Zip(format!("Failed to open ZIP: {}", e)))?;

    let presentation = read_file_from_archive(&mut archive, "ppt/presentation.xml")?;
    let rels = read_rels(&mut archive, "ppt/_rels/presentation.xml.rels", "ppt")?;
    let rel_paths: HashMap<&str, &str> = rels
        .iter()
        .map(|r| (r.id.as_str(), r.path.as_str()))
        .collect();

    let listing = parse_presentation(&presentation)?;
    let mut slides = Vec::with_capacity(listing.slides.len());
    for (index, (_, rel_id)) in listing.slides.iter().enumerate() {
        let Some(path) = rel_paths.get(rel_id.as_str()) else {
            return Err(Error::Xml(format!("Slide relationship '{}' not found", rel_id)));
        };
        slides.push(parse_slide(&mut archive, path, index + 1)?);
    }

    let sections = listing
        .sections
        .into_iter()
        .map(|(name, ids)| SectionSummary {
            name,
            slide_count: ids.len(),
        })
        .collect();

    let theme = match rels.iter().find(|r| r.kind.ends_with("/theme")) {
        Some(rel) => Some(parse_theme_colors(&read_file_from_archive(
            &mut archive,
            &rel.path,
        )?)?),
        None => None,
    };
    let master_name = match rels.iter().find(|r| r.kind.ends_with("/slideMaster")) {
        Some(rel) => parse_master_name(&read_file_from_archive(&mut archive, &rel.path)?)?,
        None => None,
    };

    Ok(PackageSummary {
        master_name,
        theme,
        sections,
        slides,
    })
}

#[derive(Debug, Default)]
struct PresentationListing {
    /// (slide id, relationship id) in display order.
    slides: Vec<(usize, String)>,
    /// (section name, slide ids).
    sections: Vec<(String, Vec<usize>)>,
}

fn parse_presentation(xml: &str) -> Result<PresentationListing> {
    let mut listing = PresentationListing::default();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match (prefix(name.as_ref()), local_name(name.as_ref())) {
                    (b"p", b"sldId") => {
                        let id = attr(e, b"id").and_then(|v| v.parse().ok()).unwrap_or(0);
                        if let Some(rel_id) = attr_local(e, b"r", b"id") {
                            listing.slides.push((id, rel_id));
                        }
                    }
                    (b"p14", b"section") => {
                        listing
                            .sections
                            .push((attr(e, b"name").unwrap_or_default(), Vec::new()));
                    }
                    (b"p14", b"sldId") => {
                        if let (Some(section), Some(id)) = (
                            listing.sections.last_mut(),
                            attr(e, b"id").and_then(|v| v.parse().ok()),
                        ) {
                            section.1.push(id);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(format!("Error parsing presentation: {}", e))),
            _ => {}
        }
    }
    Ok(listing)
}

fn parse_slide<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
    number: usize,
) -> Result<SlideSummary> {
    let content = read_file_from_archive(archive, path)?;
    let rels = read_rels(archive, &rels_path_for(path), parent_dir(path))?;
    let mut slide = SlideSummary {
        number,
        path: path.to_string(),
        ..Default::default()
    };

    let chart_rel_ids = scan_slide(&content, &mut slide)?;
    for rel_id in chart_rel_ids {
        let kind = match rels.iter().find(|r| r.id == rel_id) {
            Some(rel) => chart_kind(&read_file_from_archive(archive, &rel.path)?)?,
            None => "unknown".to_string(),
        };
        slide.charts.push(kind);
    }

    if let Some(rel) = rels.iter().find(|r| r.kind.ends_with("/notesSlide")) {
        let notes = read_file_from_archive(archive, &rel.path)?;
        slide.notes = parse_notes(&notes)?;
    }
    Ok(slide)
}

/// Walk the slide XML, filling text, tables and background; returns the
/// relationship ids of chart frames.
fn scan_slide(xml: &str, slide: &mut SlideSummary) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut charts = Vec::new();
    let mut paragraph: Option<String> = None;
    let mut in_text = false;
    let mut in_field = false;
    let mut in_background = false;
    let mut table: Option<TableSummary> = None;
    let mut cell: Option<String> = None;
    let mut in_cell_props = false;
    let mut in_line = 0usize;
    let mut first_run_in_row = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"bg" => in_background = true,
                    b"tbl" => table = Some(TableSummary::default()),
                    b"tr" => {
                        if let Some(table) = table.as_mut() {
                            table.cells.push(Vec::new());
                            first_run_in_row = true;
                        }
                    }
                    b"tc" => cell = Some(String::new()),
                    b"tcPr" => in_cell_props = true,
                    b"lnL" | b"lnR" | b"lnT" | b"lnB" | b"ln" => in_line += 1,
                    b"p" => paragraph = Some(String::new()),
                    b"t" => in_text = true,
                    b"fld" => {
                        in_field = true;
                        if attr(e, b"type").as_deref() == Some("slidenum") {
                            slide.has_slide_number = true;
                        }
                    }
                    b"rPr" => note_run(e, &mut table, &mut first_run_in_row),
                    b"srgbClr" => note_color(
                        e,
                        in_background,
                        in_cell_props && in_line == 0,
                        slide,
                        &mut table,
                    ),
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"chart" => {
                        if let Some(rel_id) = attr_local(e, b"r", b"id") {
                            charts.push(rel_id);
                        }
                    }
                    b"rPr" => note_run(e, &mut table, &mut first_run_in_row),
                    b"srgbClr" => note_color(
                        e,
                        in_background,
                        in_cell_props && in_line == 0,
                        slide,
                        &mut table,
                    ),
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_text && !in_field {
                    let text = e.unescape().unwrap_or_default();
                    match (cell.as_mut(), paragraph.as_mut()) {
                        (Some(cell), _) => cell.push_str(&text),
                        (None, Some(paragraph)) => paragraph.push_str(&text),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"bg" => in_background = false,
                    b"t" => in_text = false,
                    b"fld" => in_field = false,
                    b"tcPr" => in_cell_props = false,
                    b"lnL" | b"lnR" | b"lnT" | b"lnB" | b"ln" => in_line = in_line.saturating_sub(1),
                    b"p" => {
                        if let Some(text) = paragraph.take() {
                            if cell.is_none() && !text.trim().is_empty() {
                                slide.paragraphs.push(text);
                            }
                        }
                    }
                    b"tc" => {
                        if let (Some(text), Some(table)) = (cell.take(), table.as_mut()) {
                            if let Some(row) = table.cells.last_mut() {
                                row.push(text);
                            }
                        }
                    }
                    b"tbl" => {
                        if let Some(table) = table.take() {
                            slide.tables.push(table);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(format!("Error parsing slide: {}", e))),
            _ => {}
        }
    }
    Ok(charts)
}

/// Record the bold flag of a row's first run.
fn note_run(e: &BytesStart, table: &mut Option<TableSummary>, first_run_in_row: &mut bool) {
    if let Some(table) = table.as_mut() {
        if *first_run_in_row {
            table.row_bold.push(attr(e, b"b").as_deref() == Some("1"));
            *first_run_in_row = false;
        }
    }
}

fn note_color(
    e: &BytesStart,
    in_background: bool,
    in_cell_fill: bool,
    slide: &mut SlideSummary,
    table: &mut Option<TableSummary>,
) {
    let Some(color) = attr(e, b"val") else {
        return;
    };
    if in_background && slide.background.is_none() {
        slide.background = Some(color);
    } else if in_cell_fill {
        if let Some(table) = table.as_mut() {
            // The first filled cell of each row sets the row fill.
            if table.row_fills.len() < table.cells.len() {
                table.row_fills.push(color);
            }
        }
    }
}

fn chart_kind(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());
                if local.ends_with(b"Chart") && local != b"Chart" {
                    let kind = &local[..local.len() - b"Chart".len()];
                    return Ok(String::from_utf8_lossy(kind).into_owned());
                }
            }
            Ok(Event::Eof) => return Ok("unknown".to_string()),
            Err(e) => return Err(Error::Xml(format!("Error parsing chart: {}", e))),
            _ => {}
        }
    }
}

/// Text of the notes body placeholder, one line per paragraph.
fn parse_notes(xml: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut lines = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"p" => current = Some(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if let (true, Some(line)) = (in_text, current.as_mut()) {
                    line.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"p" => lines.extend(current.take()),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(format!("Error parsing notes: {}", e))),
            _ => {}
        }
    }
    let text = lines.join("\n");
    Ok(if text.trim().is_empty() { None } else { Some(text) })
}

fn parse_theme_colors(xml: &str) -> Result<ColorScheme> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut colors = ColorScheme::default();
    let mut slot: Option<Vec<u8>> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                slot = Some(local_name(e.name().as_ref()).to_vec());
            }
            Ok(Event::Empty(ref e)) if local_name(e.name().as_ref()) == b"srgbClr" => {
                let Some(value) = attr(e, b"val") else {
                    continue;
                };
                let target = match slot.as_deref() {
                    Some(b"dk1") => &mut colors.text,
                    Some(b"lt1") => &mut colors.background,
                    Some(b"accent1") => &mut colors.primary,
                    Some(b"accent2") => &mut colors.secondary,
                    Some(b"accent3") => &mut colors.accent,
                    _ => continue,
                };
                *target = value;
            }
            Ok(Event::End(ref e)) if local_name(e.name().as_ref()) == b"clrScheme" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(format!("Error parsing theme: {}", e))),
            _ => {}
        }
    }
    Ok(colors)
}

fn parse_master_name(xml: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"cSld" => {
                return Ok(attr(e, b"name"));
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(Error::Xml(format!("Error parsing slide master: {}", e))),
            _ => {}
        }
    }
}

/// Relationships of a part; a missing `.rels` file means none.
fn read_rels<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    rels_path: &str,
    base_dir: &str,
) -> Result<Vec<Rel>> {
    if !archive.file_names().any(|name| name == rels_path) {
        return Ok(Vec::new());
    }
    let content = read_file_from_archive(archive, rels_path)?;
    let mut reader = Reader::from_str(&content);
    reader.trim_text(true);
    let mut rels = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let (Some(id), Some(kind), Some(target)) =
                    (attr(e, b"Id"), attr(e, b"Type"), attr(e, b"Target"))
                else {
                    continue;
                };
                rels.push(Rel {
                    id,
                    kind,
                    path: resolve_target(base_dir, &target),
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(format!("Error parsing relationships: {}", e))),
            _ => {}
        }
    }
    Ok(rels)
}

/// Read a file from the ZIP archive.
fn read_file_from_archive<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::Zip(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::Zip(format!("Failed to read '{}': {}", path, e)))?;
    Ok(content)
}

fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Attribute `prefix:key`.
fn attr_local(e: &BytesStart, prefix_name: &[u8], key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| prefix(a.key.as_ref()) == prefix_name && local_name(a.key.as_ref()) == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

fn prefix(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[..pos],
        None => b"",
    }
}

fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`.
fn rels_path_for(path: &str) -> String {
    match path.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", path),
    }
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }
    segments.join("/")
}
