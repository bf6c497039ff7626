use crate::core::model::RunResult;
use anyhow::{Context, Result};
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const CHART_TITLE: &str = "Adapter Removal With Different Settings";
const ROW_INDENT: &str = "          ";

/// Writes the scatter-chart page for runs already sorted by specificity.
pub fn write(path: &Path, results: &[RunResult]) -> Result<()> {
    let html = render(results)?;
    let mut w = BufWriter::new(
        File::create(path).with_context(|| format!("create {} failed", path.display()))?,
    );
    w.write_all(html.as_bytes())?;
    w.flush()?;
    Ok(())
}

/// Google Charts scatter page.
///
/// Column 0 holds sensitivity (x axis); run `i` gets its own series in
/// column `i + 1` so every point is labelled and coloured separately.
pub fn render(results: &[RunResult]) -> Result<String> {
    let mut html = String::with_capacity(4096 + results.len() * (results.len() * 6 + 96));

    writeln!(html)?;
    writeln!(html, "<html>")?;
    writeln!(html, "  <head>")?;
    writeln!(
        html,
        "    <script type=\"text/javascript\" src=\"https://www.google.com/jsapi\"></script>"
    )?;
    writeln!(html, "    <script type=\"text/javascript\">")?;
    writeln!(
        html,
        "      google.load(\"visualization\", \"1\", {{packages:[\"corechart\"]}});"
    )?;
    writeln!(html, "      google.setOnLoadCallback(drawVisualization);")?;
    writeln!(html, "      function drawVisualization() {{")?;
    writeln!(html, "{}// Create and populate the data table.", ROW_INDENT)?;
    writeln!(
        html,
        "{}var data = new google.visualization.DataTable();",
        ROW_INDENT
    )?;
    writeln!(html, "{}data.addColumn('number', 'Sensitivity');", ROW_INDENT)?;
    for r in results {
        writeln!(
            html,
            "{}data.addColumn('number','{}');",
            ROW_INDENT,
            js_escape(&r.label.to_string())
        )?;
    }
    for (rank, r) in results.iter().enumerate() {
        write!(html, "{}data.addRow([{}", ROW_INDENT, js_number(r.sensitivity))?;
        for col in 0..results.len() {
            if col == rank {
                write!(html, ", {}", js_number(r.specificity))?;
            } else {
                html.push_str(", null");
            }
        }
        writeln!(html, "]);")?;
    }
    writeln!(html)?;
    writeln!(html, "{}// Create and draw the visualization.", ROW_INDENT)?;
    writeln!(
        html,
        "{}var chart = new google.visualization.ScatterChart(",
        ROW_INDENT
    )?;
    writeln!(
        html,
        "{}document.getElementById('visualization'));",
        ROW_INDENT
    )?;
    writeln!(
        html,
        "{}chart.draw(data, {{title: '{}',",
        ROW_INDENT, CHART_TITLE
    )?;
    writeln!(html, "              width: 800, height: 800,")?;
    writeln!(html, "              vAxis: {{title: \"Adapter Specificity\",")?;
    writeln!(html, "                  titleTextStyle: {{color: \"green\"}}}},")?;
    writeln!(html, "              hAxis: {{title: \"Adapter Sensitivity\",")?;
    writeln!(html, "                  titleTextStyle: {{color: \"green\"}}}},")?;
    writeln!(html, "              pointSize: 4,")?;
    writeln!(html, "              legend: 'none'}}")?;
    writeln!(html, "           );")?;
    writeln!(html, "      }}")?;
    writeln!(html, "    </script>")?;
    writeln!(html, "  </head>")?;
    writeln!(html)?;
    writeln!(html, "  <body>")?;
    writeln!(html, "    <div id=\"visualization\"></div>")?;
    writeln!(html, "  </body>")?;
    writeln!(html, "</html>")?;
    Ok(html)
}

fn js_number(v: f64) -> String {
    if v.is_finite() {
        format!("{:?}", v)
    } else {
        "null".to_string()
    }
}

fn js_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '<' => out.push_str("\\x3c"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}
