//! Printable HTML rendering (landscape, one table page per report)

use std::fmt::Write;

use super::format::currency;
use super::layout::{ReportLayout, SummaryLine};
use crate::branding::Masthead;
use crate::error::Result;

const STYLE: &str = r#"
@page { size: A4 landscape; margin: 36pt; }
body { font-family: Helvetica, Arial, sans-serif; font-size: 9pt; color: #000; }
header { text-align: center; margin-bottom: 12pt; }
header h1 { font-size: 16pt; margin: 0; }
header h2 { font-size: 11pt; font-weight: normal; margin: 2pt 0; }
.masthead img { max-height: 48pt; }
.masthead .name { font-size: 14pt; font-weight: bold; }
.masthead .tagline { font-size: 8pt; color: #555; }
.boxes { display: flex; gap: 24pt; margin-bottom: 16pt; page-break-inside: avoid; }
.box { flex: 1; border: 1pt solid #000; }
.box h3 { background: #f97316; color: #fff; font-size: 7pt; text-align: center; margin: 0; padding: 3pt; }
.box table { width: 100%; font-size: 7pt; }
.box td.value { text-align: right; }
.box tr.emphasis td { font-weight: bold; padding-top: 6pt; }
table.cashflow { width: 100%; border-collapse: collapse; font-size: 6pt; page-break-before: auto; }
table.cashflow thead th { background: #1c599f; color: #fff; padding: 3pt; }
table.cashflow td.num { text-align: right; }
table.cashflow tr.bold td { font-weight: bold; }
table.cashflow tr.underline td.num { border-bottom: 0.5pt solid #000; }
table.cashflow tr.spacer td { height: 6pt; }
"#;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn write_box(out: &mut String, heading: &str, lines: &[SummaryLine]) -> std::fmt::Result {
    writeln!(out, "<div class=\"box\"><h3>{}</h3><table>", escape(heading))?;
    for line in lines {
        let class = if line.emphasis { " class=\"emphasis\"" } else { "" };
        writeln!(
            out,
            "<tr{}><td>{}</td><td class=\"value\">{}</td></tr>",
            class,
            escape(&line.label),
            escape(&line.value)
        )?;
    }
    writeln!(out, "</table></div>")
}

fn write_masthead(out: &mut String, masthead: &Masthead) -> std::fmt::Result {
    match masthead {
        Masthead::Logo {
            business_name,
            logo,
        } => writeln!(
            out,
            "<div class=\"masthead\"><img src=\"{}\" alt=\"{}\"></div>",
            logo.data_uri(),
            escape(business_name)
        ),
        Masthead::Text {
            business_name,
            subtitle,
        } => writeln!(
            out,
            "<div class=\"masthead\"><div class=\"name\">{}</div><div class=\"tagline\">{}</div></div>",
            escape(business_name),
            escape(subtitle)
        ),
    }
}

fn write_document(out: &mut String, layout: &ReportLayout, masthead: &Masthead) -> std::fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\"><head><meta charset=\"utf-8\">")?;
    writeln!(out, "<title>{}</title>", escape(&layout.title))?;
    writeln!(out, "<style>{}</style></head><body>", STYLE)?;

    writeln!(out, "<header>")?;
    write_masthead(out, masthead)?;
    writeln!(out, "<h1>{}</h1>", escape(&layout.title))?;
    writeln!(out, "<h2>{}</h2>", escape(&layout.subtitle))?;
    if let Some(property) = &layout.property_line {
        writeln!(out, "<h2>{}</h2>", escape(property))?;
    }
    writeln!(out, "<h2>{}</h2>", escape(&layout.fiscal_year))?;
    if !layout.prepared_by.is_empty() {
        let names: Vec<String> = layout.prepared_by.iter().map(|p| escape(p)).collect();
        writeln!(out, "<p>Prepared by {}</p>", names.join(" &middot; "))?;
    }
    writeln!(out, "</header>")?;

    writeln!(out, "<section class=\"boxes\">")?;
    write_box(out, "INVESTMENT SUMMARY", &layout.investment_summary)?;
    write_box(out, "KEY FINANCIAL METRICS", &layout.key_metrics)?;
    write_box(out, "EXIT ANALYSIS", &layout.exit_summary)?;
    writeln!(out, "</section>")?;

    writeln!(out, "<table class=\"cashflow\"><thead><tr><th>For the Year Ending</th>")?;
    for column in &layout.columns {
        writeln!(
            out,
            "<th>Year {}<br>{}</th>",
            column.year, column.calendar_year
        )?;
    }
    writeln!(out, "</tr></thead><tbody>")?;

    let span = layout.columns.len() + 1;
    for row in &layout.rows {
        let mut classes = Vec::new();
        if row.style.bold {
            classes.push("bold");
        }
        if row.style.underline {
            classes.push("underline");
        }
        write!(
            out,
            "<tr class=\"{}\"><td>{}</td>",
            classes.join(" "),
            escape(&row.label)
        )?;
        for value in &row.values {
            write!(out, "<td class=\"num\">{}</td>", currency(*value))?;
        }
        writeln!(out, "</tr>")?;
        if row.style.blank_after {
            writeln!(out, "<tr class=\"spacer\"><td colspan=\"{}\"></td></tr>", span)?;
        }
    }

    writeln!(out, "</tbody></table></body></html>")
}

/// Render the full report as a standalone HTML document
pub fn render_html(layout: &ReportLayout, masthead: &Masthead) -> Result<String> {
    let mut out = String::with_capacity(32 * 1024);
    write_document(&mut out, layout, masthead)?;
    Ok(out)
}
