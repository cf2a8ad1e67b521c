//! Chart part serialization.
//!
//! Series data is written as literal caches (`c:strLit` / `c:numLit`), so a
//! chart part needs no embedded workbook.

use super::{esc, NS_A, NS_C, NS_R};
use crate::drawing::{ChartKind, ChartSpec};
use std::fmt::{self, Write};

const CATEGORY_AXIS_ID: u32 = 1;
const VALUE_AXIS_ID: u32 = 2;

/// Full `chartN.xml` document for one chart.
pub(crate) fn chart_xml(chart: &ChartSpec) -> Result<String, fmt::Error> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(super::XML_DECLARATION);
    write!(
        xml,
        r#"<c:chartSpace xmlns:c="{}" xmlns:a="{}" xmlns:r="{}">"#,
        NS_C, NS_A, NS_R
    )?;
    xml.push_str(r#"<c:date1904 val="0"/><c:lang val="en-US"/><c:roundedCorners val="0"/>"#);
    xml.push_str("<c:chart>");

    if chart.show_title {
        write!(
            xml,
            r#"<c:title><c:tx><c:rich><a:bodyPr/><a:lstStyle/><a:p><a:r><a:t>{}</a:t></a:r></a:p></c:rich></c:tx><c:overlay val="0"/></c:title>"#,
            esc(&chart.title)
        )?;
        xml.push_str(r#"<c:autoTitleDeleted val="0"/>"#);
    } else {
        xml.push_str(r#"<c:autoTitleDeleted val="1"/>"#);
    }

    xml.push_str("<c:plotArea><c:layout/>");
    write_group(&mut xml, chart)?;
    if chart.kind.has_axes() {
        write_axes(&mut xml, chart.kind)?;
    }
    xml.push_str("</c:plotArea>");

    if chart.show_legend {
        xml.push_str(r#"<c:legend><c:legendPos val="r"/><c:overlay val="0"/></c:legend>"#);
    }
    xml.push_str(r#"<c:plotVisOnly val="1"/><c:dispBlanksAs val="gap"/></c:chart>"#);
    xml.push_str("</c:chartSpace>");
    Ok(xml)
}

fn write_group(xml: &mut String, chart: &ChartSpec) -> fmt::Result {
    match chart.kind {
        ChartKind::Bar => {
            xml.push_str(r#"<c:barChart><c:barDir val="col"/><c:grouping val="clustered"/><c:varyColors val="0"/>"#);
            write_series(xml, chart)?;
            xml.push_str(r#"<c:gapWidth val="150"/>"#);
            write_axis_ids(xml)?;
            xml.push_str("</c:barChart>");
        }
        ChartKind::Line => {
            xml.push_str(r#"<c:lineChart><c:grouping val="standard"/><c:varyColors val="0"/>"#);
            write_series(xml, chart)?;
            xml.push_str(r#"<c:marker val="1"/>"#);
            write_axis_ids(xml)?;
            xml.push_str("</c:lineChart>");
        }
        ChartKind::Area => {
            xml.push_str(r#"<c:areaChart><c:grouping val="standard"/><c:varyColors val="0"/>"#);
            write_series(xml, chart)?;
            write_axis_ids(xml)?;
            xml.push_str("</c:areaChart>");
        }
        ChartKind::Scatter => {
            xml.push_str(r#"<c:scatterChart><c:scatterStyle val="lineMarker"/><c:varyColors val="0"/>"#);
            write_series(xml, chart)?;
            write_axis_ids(xml)?;
            xml.push_str("</c:scatterChart>");
        }
        ChartKind::Pie => {
            xml.push_str(r#"<c:pieChart><c:varyColors val="1"/>"#);
            write_series(xml, chart)?;
            xml.push_str(r#"<c:firstSliceAng val="0"/></c:pieChart>"#);
        }
        ChartKind::Doughnut => {
            xml.push_str(r#"<c:doughnutChart><c:varyColors val="1"/>"#);
            write_series(xml, chart)?;
            xml.push_str(r#"<c:firstSliceAng val="0"/><c:holeSize val="50"/></c:doughnutChart>"#);
        }
    }
    Ok(())
}

fn write_series(xml: &mut String, chart: &ChartSpec) -> fmt::Result {
    xml.push_str(r#"<c:ser><c:idx val="0"/><c:order val="0"/>"#);
    write!(xml, "<c:tx><c:v>{}</c:v></c:tx>", esc(&chart.title))?;
    // Pie-like charts color each point from the theme.
    if chart.kind.has_axes() {
        write!(
            xml,
            r#"<c:spPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill></c:spPr>"#,
            esc(&chart.color)
        )?;
    }
    if chart.kind == ChartKind::Bar {
        xml.push_str(r#"<c:invertIfNegative val="0"/>"#);
    }

    let (category_tag, value_tag) = match chart.kind {
        ChartKind::Scatter => ("c:xVal", "c:yVal"),
        _ => ("c:cat", "c:val"),
    };
    write!(xml, "<{}>", category_tag)?;
    write_string_literal(xml, &chart.labels)?;
    write!(xml, "</{}><{}>", category_tag, value_tag)?;
    write_number_literal(xml, &chart.values)?;
    write!(xml, "</{}>", value_tag)?;

    if matches!(chart.kind, ChartKind::Line | ChartKind::Scatter) {
        xml.push_str(r#"<c:smooth val="0"/>"#);
    }
    xml.push_str("</c:ser>");
    Ok(())
}

fn write_string_literal(xml: &mut String, labels: &[String]) -> fmt::Result {
    write!(xml, r#"<c:strLit><c:ptCount val="{}"/>"#, labels.len())?;
    for (idx, label) in labels.iter().enumerate() {
        write!(xml, r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#, idx, esc(label))?;
    }
    xml.push_str("</c:strLit>");
    Ok(())
}

fn write_number_literal(xml: &mut String, values: &[f64]) -> fmt::Result {
    write!(
        xml,
        r#"<c:numLit><c:formatCode>General</c:formatCode><c:ptCount val="{}"/>"#,
        values.len()
    )?;
    for (idx, value) in values.iter().enumerate() {
        write!(xml, r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#, idx, value)?;
    }
    xml.push_str("</c:numLit>");
    Ok(())
}

fn write_axis_ids(xml: &mut String) -> fmt::Result {
    write!(
        xml,
        r#"<c:axId val="{}"/><c:axId val="{}"/>"#,
        CATEGORY_AXIS_ID, VALUE_AXIS_ID
    )
}

fn write_axes(xml: &mut String, kind: ChartKind) -> fmt::Result {
    const SCALING: &str = r#"<c:scaling><c:orientation val="minMax"/></c:scaling><c:delete val="0"/>"#;
    const TICKS: &str = r#"<c:numFmt formatCode="General" sourceLinked="0"/><c:majorTickMark val="out"/><c:minorTickMark val="none"/><c:tickLblPos val="nextTo"/>"#;

    if kind == ChartKind::Scatter {
        write!(xml, r#"<c:valAx><c:axId val="{}"/>{}<c:axPos val="b"/>{}"#, CATEGORY_AXIS_ID, SCALING, TICKS)?;
        write!(
            xml,
            r#"<c:crossAx val="{}"/><c:crosses val="autoZero"/><c:crossBetween val="midCat"/></c:valAx>"#,
            VALUE_AXIS_ID
        )?;
    } else {
        write!(xml, r#"<c:catAx><c:axId val="{}"/>{}<c:axPos val="b"/>{}"#, CATEGORY_AXIS_ID, SCALING, TICKS)?;
        write!(
            xml,
            r#"<c:crossAx val="{}"/><c:crosses val="autoZero"/><c:auto val="1"/><c:lblAlgn val="ctr"/><c:lblOffset val="100"/><c:noMultiLvlLbl val="0"/></c:catAx>"#,
            VALUE_AXIS_ID
        )?;
    }

    write!(
        xml,
        r#"<c:valAx><c:axId val="{}"/>{}<c:axPos val="l"/><c:majorGridlines/>{}"#,
        VALUE_AXIS_ID, SCALING, TICKS
    )?;
    let between = if kind == ChartKind::Scatter { "midCat" } else { "between" };
    write!(
        xml,
        r#"<c:crossAx val="{}"/><c:crosses val="autoZero"/><c:crossBetween val="{}"/></c:valAx>"#,
        CATEGORY_AXIS_ID, between
    )
}
