//! Two-panel SVG chart of per-algorithm duration and memory.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use algorace_orchestration::report::ChartRow;

const PANEL_WIDTH: f64 = 420.0;
const LABEL_WIDTH: f64 = 130.0;
const BAR_HEIGHT: f64 = 22.0;
const BAR_GAP: f64 = 10.0;
const TOP: f64 = 50.0;
const MARGIN: f64 = 20.0;

/// One panel: a title, a unit and a value per row.
struct Panel<'a> {
    title: &'a str,
    color: &'a str,
    values: Vec<f64>,
    unit: &'a str,
}

/// Render the chart as an SVG document.
///
/// Rows are drawn in the given order (fastest first as produced by the
/// report). Durations are shown in milliseconds, memory in KiB.
#[must_use]
pub fn render_svg(rows: &[ChartRow]) -> String {
    let panels = [
        Panel {
            title: "Execution Time",
            color: "#4c78a8",
            values: rows.iter().map(|r| r.duration.as_secs_f64() * 1000.0).collect(),
            unit: "ms",
        },
        Panel {
            title: "Memory Usage",
            color: "#f58518",
            values: rows.iter().map(|r| r.memory_bytes as f64 / 1024.0).collect(),
            unit: "KiB",
        },
    ];

    let rows_height = rows.len() as f64 * (BAR_HEIGHT + BAR_GAP);
    let width = 2.0 * (LABEL_WIDTH + PANEL_WIDTH) + 3.0 * MARGIN;
    let height = TOP + rows_height + MARGIN;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif" font-size="12">"#
    );
    let _ = writeln!(
        svg,
        r#"<rect width="{width}" height="{height}" fill="white"/>"#
    );

    for (p, panel) in panels.iter().enumerate() {
        let x0 = MARGIN + p as f64 * (LABEL_WIDTH + PANEL_WIDTH + MARGIN);
        let max = panel.values.iter().copied().fold(0.0_f64, f64::max);
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" font-size="15" font-weight="bold">{} ({})</text>"#,
            x0,
            TOP - 20.0,
            panel.title,
            panel.unit
        );
        for (i, (row, value)) in rows.iter().zip(&panel.values).enumerate() {
            let y = TOP + i as f64 * (BAR_HEIGHT + BAR_GAP);
            let bar = if max > 0.0 {
                value / max * (PANEL_WIDTH - 70.0)
            } else {
                0.0
            };
            let _ = writeln!(
                svg,
                r#"<text x="{}" y="{}" text-anchor="end">{}</text>"#,
                x0 + LABEL_WIDTH - 8.0,
                y + BAR_HEIGHT * 0.7,
                escape(&row.name)
            );
            let _ = writeln!(
                svg,
                r#"<rect x="{}" y="{y}" width="{bar:.2}" height="{BAR_HEIGHT}" fill="{}"/>"#,
                x0 + LABEL_WIDTH,
                panel.color
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.2}" y="{}">{value:.2}</text>"#,
                x0 + LABEL_WIDTH + bar + 6.0,
                y + BAR_HEIGHT * 0.7
            );
        }
    }
    svg.push_str("</svg>\n");
    svg
}

/// Write the chart to `path`.
///
/// # Errors
///
/// Returns `InvalidInput` when there is nothing to chart, or the I/O error
/// from writing the file.
pub fn write_chart(path: &Path, rows: &[ChartRow]) -> io::Result<()> {
    if rows.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no finished algorithm to chart",
        ));
    }
    fs::write(path, render_svg(rows))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn rows() -> Vec<ChartRow> {
        vec![
            ChartRow {
                name: "Linear Search".into(),
                duration: Duration::from_millis(1),
                memory_bytes: 0,
            },
            ChartRow {
                name: "Quick Sort".into(),
                duration: Duration::from_millis(4),
                memory_bytes: 8192,
            },
        ]
    }

    #[test]
    fn svg_has_both_panels_and_every_name() {
        let svg = render_svg(&rows());
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Execution Time (ms)"));
        assert!(svg.contains("Memory Usage (KiB)"));
        assert_eq!(svg.matches("Quick Sort").count(), 2);
        assert!(svg.contains("8.00"));
    }

    #[test]
    fn names_are_escaped() {
        let svg = render_svg(&[ChartRow {
            name: "A<B> & C".into(),
            duration: Duration::ZERO,
            memory_bytes: 0,
        }]);
        assert!(svg.contains("A&lt;B&gt; &amp; C"));
    }

    #[test]
    fn write_chart_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("race.svg");
        write_chart(&path, &rows()).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("Linear Search"));
    }

    #[test]
    fn empty_chart_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_chart(&dir.path().join("race.svg"), &[]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
