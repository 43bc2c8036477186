//! HTML page assembly for a [`DashboardView`]

use crate::view::{DashboardPage, DashboardView, EmptyState, Metric, PageHeader, RenderedChart};
use bikeshare_common::{escape_html, DashboardError, Result};
use std::fmt::{self, Write};

const STYLESHEET: &str = "\
body{font-family:sans-serif;margin:0 auto;max-width:1100px;padding:1rem 2rem;color:#222}\
header{border-bottom:1px solid #ddd;margin-bottom:1rem}\
.metrics{display:flex;gap:2rem;flex-wrap:wrap}\
.metric{min-width:12rem}\
.metric .label{font-size:.9rem;color:#555}\
.metric .value{font-size:2rem;font-weight:bold}\
.metric .detail{font-size:.9rem;color:#2a7a2a}\
.notice{background:#fff7e0;padding:.5rem 1rem}\
figure{margin:1rem 0}\
.chart-error{color:#a00;border:1px dashed #a00;padding:1rem}\
aside{background:#f5f5f5;padding:.5rem 1rem}\
.empty{padding:3rem 0;text-align:center}";

/// Render the complete page for a view
pub fn render_html(view: &DashboardView) -> Result<String> {
    let mut out = String::with_capacity(64 * 1024);
    write_document(&mut out, view)
        .map_err(|e| DashboardError::with_source("Failed to assemble dashboard page", e))?;
    Ok(out)
}

fn write_document(out: &mut String, view: &DashboardView) -> fmt::Result {
    let header = view.header();
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"{}\">", header.locale.html_lang())?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(out, "<title>{}</title>", escape_html(&header.title))?;
    writeln!(out, "<style>{STYLESHEET}</style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;

    match view {
        DashboardView::Ready(page) => write_page(out, page)?,
        DashboardView::Empty(empty) => write_empty(out, empty)?,
    }

    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

fn write_header(out: &mut String, header: &PageHeader, extra: &[&str]) -> fmt::Result {
    writeln!(out, "<header>")?;
    writeln!(out, "<h1>{}</h1>", escape_html(&header.title))?;
    writeln!(
        out,
        "<p class=\"range\"><strong>{}</strong>: {}</p>",
        escape_html(&header.range_label),
        escape_html(&header.range_text)
    )?;
    for line in extra {
        writeln!(out, "<p class=\"years\">{}</p>", escape_html(line))?;
    }
    writeln!(out, "</header>")
}

fn write_metric(out: &mut String, metric: &Metric) -> fmt::Result {
    writeln!(out, "<div class=\"metric\">")?;
    writeln!(out, "<div class=\"label\">{}</div>", escape_html(&metric.label))?;
    writeln!(out, "<div class=\"value\">{}</div>", escape_html(&metric.value))?;
    if let Some(detail) = &metric.detail {
        writeln!(out, "<div class=\"detail\">{}</div>", escape_html(detail))?;
    }
    writeln!(out, "</div>")
}

fn write_chart(out: &mut String, chart: &RenderedChart) -> fmt::Result {
    writeln!(out, "<figure id=\"{}\">", chart.spec.id)?;
    match (&chart.svg, &chart.error) {
        (Some(svg), _) => writeln!(out, "{svg}")?,
        (None, error) => writeln!(
            out,
            "<p class=\"chart-error\"><strong>{}</strong><br>{}</p>",
            escape_html(&chart.spec.title),
            escape_html(error.as_deref().unwrap_or_default())
        )?,
    }
    writeln!(out, "</figure>")
}

fn write_page(out: &mut String, page: &DashboardPage) -> fmt::Result {
    write_header(out, &page.header, &[page.years_text.as_str()])?;
    writeln!(out, "<main>")?;

    if let Some(notice) = &page.clamped_notice {
        writeln!(out, "<p class=\"notice\">{}</p>", escape_html(notice))?;
    }
    if let Some(growth) = &page.growth {
        writeln!(out, "<div class=\"metrics\">")?;
        write_metric(out, growth)?;
        writeln!(out, "</div>")?;
    }

    for (index, section) in page.sections.iter().enumerate() {
        writeln!(out, "<section id=\"section-{}\">", index + 1)?;
        writeln!(out, "<h2>{}</h2>", escape_html(&section.heading))?;
        if !section.metrics.is_empty() {
            writeln!(out, "<div class=\"metrics\">")?;
            for metric in &section.metrics {
                write_metric(out, metric)?;
            }
            writeln!(out, "</div>")?;
        }
        for chart in &section.charts {
            write_chart(out, chart)?;
        }
        if !section.notes.is_empty() {
            writeln!(out, "<aside>")?;
            writeln!(out, "<h3>{}</h3>", escape_html(&page.notes_title))?;
            for note in &section.notes {
                writeln!(out, "<p>{}</p>", escape_html(note))?;
            }
            writeln!(out, "</aside>")?;
        }
        writeln!(out, "</section>")?;
    }

    writeln!(out, "</main>")
}

fn write_empty(out: &mut String, empty: &EmptyState) -> fmt::Result {
    write_header(out, &empty.header, &[])?;
    writeln!(out, "<main>")?;
    writeln!(out, "<section class=\"empty\">")?;
    writeln!(out, "<h2>{}</h2>", escape_html(&empty.heading))?;
    writeln!(out, "<p>{}</p>", escape_html(&empty.message))?;
    writeln!(out, "</section>")?;
    writeln!(out, "</main>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_common::test_utils::{date, range};
    use bikeshare_i18n::Locale;

    fn empty_view() -> DashboardView {
        DashboardView::Empty(EmptyState {
            header: PageHeader {
                locale: Locale::Indonesian,
                title: "Analisis <Dataset>".to_string(),
                range_label: "Rentang Waktu".to_string(),
                range_text: "2013-01-01 - 2013-01-31".to_string(),
            },
            requested: range(date(2013, 1, 1), date(2013, 1, 31)),
            resolved: None,
            heading: "Tidak ada data".to_string(),
            message: "Pilih rentang lain & coba lagi".to_string(),
        })
    }

    #[test]
    fn test_empty_page_escapes_text() {
        let html = render_html(&empty_view()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<html lang=\"id\">"));
        assert!(html.contains("Analisis &lt;Dataset&gt;"));
        assert!(html.contains("rentang lain &amp; coba"));
        assert!(!html.contains("<figure"));
    }
}
