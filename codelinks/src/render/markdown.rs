//! GitHub-flavored markdown renderer.
//!
//! Index of implementation items, one section per item, then references,
//! diagnostics and a summary line.

use crate::model::*;
use crate::render::Renderer;
use crate::toc;
use anyhow::Result;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, report: &Report) -> Result<String> {
        let mut lines: Vec<String> = vec!["# Implementation links\n".to_string()];

        if report.nodes.is_empty() {
            lines.push("_No annotations found._\n".to_string());
        } else {
            lines.push("## Index\n".to_string());
            for node in &report.nodes {
                lines.push(toc::render_toc_item(&node.id));
            }
            lines.push(String::new());
            for node in &report.nodes {
                lines.push(render_node(node));
            }
        }

        if !report.references.is_empty() {
            lines.push("## References\n".to_string());
            for reference in &report.references {
                lines.push(format!(
                    "* `{}:{}:{}` {} {}",
                    reference.file,
                    reference.line,
                    reference.column,
                    reference.marker,
                    reference.ids.join(", ")
                ));
            }
            lines.push(String::new());
        }

        if !report.diagnostics.is_empty() {
            lines.push("## Diagnostics\n".to_string());
            lines.push("| Location | Kind | Message |".to_string());
            lines.push("| --- | --- | --- |".to_string());
            for diag in &report.diagnostics {
                lines.push(format!(
                    "| {}:{}:{} | {} | {} |",
                    escape_cell(&diag.file),
                    diag.line,
                    diag.column,
                    diag.code,
                    escape_cell(&diag.message)
                ));
            }
            lines.push(String::new());
        }

        lines.push(render_summary(&report.summary));

        let mut output = lines.join("\n");
        output.push('\n');
        Ok(output)
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

/// Render a single implementation item.
fn render_node(node: &NodeEntry) -> String {
    let mut lines = vec![format!("### {}\n", node.id), format!("{}\n", node.title)];
    if let Some(ref kind) = node.kind {
        lines.push(format!("* Type: {}", kind));
    }
    if let Some(ref status) = node.status {
        lines.push(format!("* Status: {}", status));
    }
    if !node.links.is_empty() {
        lines.push(format!("* Links: {}", node.links.join(", ")));
    }
    lines.push(format!("* Source: `{}:{}:{}`", node.file, node.line, node.column));
    lines.push(String::new());
    lines.join("\n")
}

fn render_summary(summary: &Summary) -> String {
    format!(
        "_{} file(s), {} annotation(s): {} accepted, {} rejected, {} duplicate(s), {} unresolved._",
        summary.files,
        summary.annotations,
        summary.accepted,
        summary.rejected,
        summary.duplicates,
        summary.unresolved
    )
}

/// Pipes and line breaks would end a table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
