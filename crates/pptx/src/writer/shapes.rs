//! Shape-tree serialization shared by slides and masters.

use super::{esc, NS_C, URI_TABLE};
use crate::drawing::{
    Anchor, ChartSpec, Drawable, Fill, Frame, ShapeSpec, Stroke, TableSpec, TextBox, TextContent,
    TextStyle,
};
use deck_core::Align;
use std::fmt::{self, Write};

/// EMUs per point, for line widths.
const EMU_PER_POINT: f64 = 12_700.0;

/// Bounds of `sz`, in hundredths of a point.
const MIN_FONT_SIZE: i64 = 100;
const MAX_FONT_SIZE: i64 = 400_000;

/// Widest outline, EMUs.
const MAX_LINE_WIDTH: i64 = 20_116_800;

/// Largest `spcPct` value.
const MAX_SPACING: i64 = 13_200_000;

/// Bullet indent, EMUs.
const BULLET_INDENT: i64 = 342_900;

const SLIDE_NUMBER_FIELD_ID: &str = "{B6F15528-21DE-4FAA-801E-634DDDAF4B2B}";

fn align_attr(align: Align) -> &'static str {
    match align {
        Align::Left => "l",
        Align::Center => "ctr",
        Align::Right => "r",
        Align::Justify => "just",
    }
}

fn line_width(points: f64) -> i64 {
    ((points * EMU_PER_POINT).round() as i64).clamp(0, MAX_LINE_WIDTH)
}

/// Font size in hundredths of a point.
fn font_size_attr(points: f64) -> i64 {
    ((points * 100.0).round() as i64).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// Line spacing as a thousandth of a percent.
fn spacing_attr(ratio: f64) -> i64 {
    ((ratio * 100_000.0).round() as i64).clamp(0, MAX_SPACING)
}

pub(crate) fn write_group_header(xml: &mut String) {
    xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);
}

/// Background block for a slide or master.
pub(crate) fn write_background(xml: &mut String, fill: &Fill) -> fmt::Result {
    xml.push_str("<p:bg><p:bgPr>");
    write_solid_fill(xml, fill)?;
    xml.push_str("<a:effectLst/></p:bgPr></p:bg>");
    Ok(())
}

pub(crate) fn write_solid_fill(xml: &mut String, fill: &Fill) -> fmt::Result {
    if fill.transparency > 0.0 {
        let alpha = ((100.0 - fill.transparency) * 1000.0).round() as i64;
        write!(
            xml,
            r#"<a:solidFill><a:srgbClr val="{}"><a:alpha val="{}"/></a:srgbClr></a:solidFill>"#,
            esc(&fill.color),
            alpha
        )
    } else {
        write!(xml, r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#, esc(&fill.color))
    }
}

fn write_line(xml: &mut String, tag: &str, stroke: &Stroke) -> fmt::Result {
    write!(
        xml,
        r#"<a:{} w="{}"><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:{}>"#,
        tag,
        line_width(stroke.width),
        esc(&stroke.color),
        tag
    )
}

fn write_xfrm(xml: &mut String, frame: &Frame, rotation: f64) -> fmt::Result {
    let rot = (rotation * 60_000.0).round() as i64;
    if rot != 0 {
        write!(xml, r#"<a:xfrm rot="{}">"#, rot)?;
    } else {
        xml.push_str("<a:xfrm>");
    }
    write!(
        xml,
        r#"<a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        frame.x, frame.y, frame.cx, frame.cy
    )
}

/// Serializes drawables with sequential shape ids.
pub(crate) struct ShapeTree<'a> {
    xml: &'a mut String,
    next_id: u32,
    chart_rel_ids: &'a [String],
    next_chart: usize,
}

impl<'a> ShapeTree<'a> {
    /// `chart_rel_ids` are consumed in order by the chart drawables.
    pub(crate) fn new(xml: &'a mut String, chart_rel_ids: &'a [String]) -> Self {
        Self {
            xml,
            next_id: 2,
            chart_rel_ids,
            next_chart: 0,
        }
    }

    fn id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn write_all(&mut self, drawables: &[Drawable]) -> fmt::Result {
        for drawable in drawables {
            match drawable {
                Drawable::Shape(shape) => self.write_shape(shape)?,
                Drawable::Text(text) => self.write_text(text)?,
                Drawable::Chart(chart) => self.write_chart(chart)?,
                Drawable::Table(table) => self.write_table(table)?,
            }
        }
        Ok(())
    }

    fn write_shape(&mut self, shape: &ShapeSpec) -> fmt::Result {
        let id = self.id();
        let xml = &mut *self.xml;
        xml.push_str("<p:sp><p:nvSpPr>");
        write!(xml, r#"<p:cNvPr id="{}" name="Shape {}"/>"#, id, id - 1)?;
        xml.push_str("<p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>");
        write_xfrm(xml, &shape.frame, shape.rotation)?;
        write!(
            xml,
            r#"<a:prstGeom prst="{}"><a:avLst/></a:prstGeom>"#,
            shape.geometry.preset()
        )?;
        match &shape.fill {
            Some(fill) => write_solid_fill(xml, fill)?,
            None => xml.push_str("<a:noFill/>"),
        }
        match &shape.stroke {
            Some(stroke) => write_line(xml, "ln", stroke)?,
            None => xml.push_str("<a:ln><a:noFill/></a:ln>"),
        }
        xml.push_str("</p:spPr></p:sp>");
        Ok(())
    }

    fn write_text(&mut self, text: &TextBox) -> fmt::Result {
        let id = self.id();
        let xml = &mut *self.xml;
        let style = &text.style;
        xml.push_str("<p:sp><p:nvSpPr>");
        match &text.content {
            TextContent::SlideNumber(_) => {
                write!(xml, r#"<p:cNvPr id="{}" name="Slide Number {}"/>"#, id, id - 1)?
            }
            TextContent::Paragraphs(_) => {
                write!(xml, r#"<p:cNvPr id="{}" name="TextBox {}"/>"#, id, id - 1)?
            }
        }
        xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>"#);
        write_xfrm(xml, &text.frame, 0.0)?;
        xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);

        let anchor = match style.anchor {
            Anchor::Top => "t",
            Anchor::Middle => "ctr",
        };
        write!(
            xml,
            r#"<p:txBody><a:bodyPr wrap="square" rtlCol="0" anchor="{}"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#,
            anchor
        )?;
        match &text.content {
            TextContent::Paragraphs(paragraphs) => {
                for paragraph in paragraphs {
                    write_paragraph(xml, paragraph, style)?;
                }
            }
            TextContent::SlideNumber(cached) => {
                write!(xml, r#"<a:p><a:pPr algn="{}"/>"#, align_attr(style.align))?;
                write!(xml, r#"<a:fld id="{}" type="slidenum">"#, SLIDE_NUMBER_FIELD_ID)?;
                write_run_props(xml, style)?;
                write!(xml, "<a:t>{}</a:t></a:fld></a:p>", esc(cached))?;
            }
        }
        xml.push_str("</p:txBody></p:sp>");
        Ok(())
    }

    fn write_chart(&mut self, chart: &ChartSpec) -> fmt::Result {
        let rel_ids = self.chart_rel_ids;
        let Some(rel_id) = rel_ids.get(self.next_chart) else {
            log::warn!("No relationship for chart '{}', skipping", chart.title);
            return Ok(());
        };
        self.next_chart += 1;
        let id = self.id();
        let xml = &mut *self.xml;
        xml.push_str("<p:graphicFrame><p:nvGraphicFramePr>");
        write!(xml, r#"<p:cNvPr id="{}" name="Chart {}"/>"#, id, id - 1)?;
        xml.push_str("<p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr>");
        write_frame_xfrm(xml, &chart.frame)?;
        write!(
            xml,
            r#"<a:graphic><a:graphicData uri="{}"><c:chart xmlns:c="{}" r:id="{}"/></a:graphicData></a:graphic>"#,
            NS_C, NS_C, rel_id
        )?;
        xml.push_str("</p:graphicFrame>");
        Ok(())
    }

    fn write_table(&mut self, table: &TableSpec) -> fmt::Result {
        let id = self.id();
        let xml = &mut *self.xml;
        xml.push_str("<p:graphicFrame><p:nvGraphicFramePr>");
        write!(xml, r#"<p:cNvPr id="{}" name="Table {}"/>"#, id, id - 1)?;
        xml.push_str(r#"<p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr><p:nvPr/></p:nvGraphicFramePr>"#);
        write_frame_xfrm(xml, &table.frame)?;
        write!(
            xml,
            r#"<a:graphic><a:graphicData uri="{}"><a:tbl><a:tblPr firstRow="1" bandRow="1"/><a:tblGrid>"#,
            URI_TABLE
        )?;
        for width in &table.col_widths {
            write!(xml, r#"<a:gridCol w="{}"/>"#, width)?;
        }
        xml.push_str("</a:tblGrid>");

        for row in &table.rows {
            write!(xml, r#"<a:tr h="{}">"#, table.row_height)?;
            let style = TextStyle {
                font: table.font.clone(),
                ..TextStyle::new(row.size, &row.color).bold(row.bold)
            };
            for cell in &row.cells {
                xml.push_str("<a:tc><a:txBody><a:bodyPr/><a:lstStyle/><a:p>");
                write_run(xml, cell, &style)?;
                xml.push_str("</a:p></a:txBody><a:tcPr>");
                for side in ["lnL", "lnR", "lnT", "lnB"] {
                    write_line(xml, side, &table.border)?;
                }
                write_solid_fill(xml, &Fill::solid(row.fill.as_str()))?;
                xml.push_str("</a:tcPr></a:tc>");
            }
            xml.push_str("</a:tr>");
        }
        xml.push_str("</a:tbl></a:graphicData></a:graphic></p:graphicFrame>");
        Ok(())
    }
}

fn write_frame_xfrm(xml: &mut String, frame: &Frame) -> fmt::Result {
    write!(
        xml,
        r#"<p:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></p:xfrm>"#,
        frame.x, frame.y, frame.cx, frame.cy
    )
}

fn write_paragraph(xml: &mut String, text: &str, style: &TextStyle) -> fmt::Result {
    write!(xml, r#"<a:p><a:pPr algn="{}""#, align_attr(style.align))?;
    if style.bullet {
        write!(xml, r#" marL="{}" indent="-{}""#, BULLET_INDENT, BULLET_INDENT)?;
    }
    xml.push('>');
    if let Some(spacing) = style.line_spacing {
        write!(
            xml,
            r#"<a:lnSpc><a:spcPct val="{}"/></a:lnSpc>"#,
            spacing_attr(spacing)
        )?;
    }
    if style.bullet {
        xml.push_str(r#"<a:buFont typeface="Arial"/><a:buChar char="&#8226;"/>"#);
    } else {
        xml.push_str("<a:buNone/>");
    }
    xml.push_str("</a:pPr>");
    write_run(xml, text, style)?;
    xml.push_str("</a:p>");
    Ok(())
}

fn write_run(xml: &mut String, text: &str, style: &TextStyle) -> fmt::Result {
    xml.push_str("<a:r>");
    write_run_props(xml, style)?;
    write!(xml, "<a:t>{}</a:t></a:r>", esc(text))
}

fn write_run_props(xml: &mut String, style: &TextStyle) -> fmt::Result {
    write!(
        xml,
        r#"<a:rPr lang="en-US" sz="{}""#,
        font_size_attr(style.size)
    )?;
    if style.bold {
        xml.push_str(r#" b="1""#);
    }
    if style.italic {
        xml.push_str(r#" i="1""#);
    }
    xml.push_str(r#" dirty="0">"#);
    write!(xml, r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#, esc(&style.color))?;
    if let Some(font) = &style.font {
        write!(xml, r#"<a:latin typeface="{}"/>"#, esc(font))?;
    }
    xml.push_str("</a:rPr>");
    Ok(())
}
