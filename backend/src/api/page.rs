//! HTML pages: the index and the chart wrappers.

use crate::chart::ChartKind;
use crate::parser::EXCLUDED_YEAR;
use crate::transform::WasteReport;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

/// Render the index page with links and summary tables.
pub fn index(report: &WasteReport) -> String {
    let tables = report.tables();
    let info = report.info();

    let chart_links: String = ChartKind::ALL
        .iter()
        .map(|kind| {
            format!(
                "    <li><a href=\"/{}\">{}</a></li>\n",
                kind.slug(),
                kind.description()
            )
        })
        .collect();

    let category_rows: String = tables
        .counts
        .entries()
        .iter()
        .map(|(category, count)| {
            format!(
                "    <tr><td class=\"{c}\">{c}</td><td class=\"num\">{n}</td></tr>\n",
                c = category,
                n = count
            )
        })
        .collect();

    let province_rows: String = tables
        .provinces
        .iter()
        .map(|p| {
            format!(
                "    <tr><td>{}</td><td class=\"num\">{:.2}</td><td class=\"num\">{}</td><td class=\"{c}\">{c}</td></tr>\n",
                escape_html(&p.province),
                p.average,
                p.years_covered,
                c = p.category
            )
        })
        .collect();

    let without_data = if tables.without_data.is_empty() {
        String::new()
    } else {
        let names: Vec<String> = tables.without_data.iter().map(|p| escape_html(p)).collect();
        format!(
            "  <p>No retained data (average undefined): {}</p>\n",
            names.join(", ")
        )
    };

    INDEX_TEMPLATE
        .replace("{{source}}", &escape_html(info.source.as_deref().unwrap_or("in-memory dataset")))
        .replace("{{retained}}", &info.retained_rows.to_string())
        .replace("{{excluded}}", &info.excluded_rows.to_string())
        .replace("{{excluded_year}}", &EXCLUDED_YEAR.to_string())
        .replace("{{chart_links}}", chart_links.trim_end())
        .replace("{{category_rows}}", category_rows.trim_end())
        .replace("{{province_rows}}", province_rows.trim_end())
        .replace("{{without_data}}", without_data.trim_end())
}

/// Wrap an SVG document in a minimal HTML page.
pub fn chart_page(kind: ChartKind, svg: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n<p><a href=\"/\">Back</a></p>\n</body>\n</html>\n",
        kind.description(),
        svg
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
