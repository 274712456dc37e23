//! JSON renderer — structured output for tooling integration.
//!
//! Serializes the Report model directly.

use crate::model::Report;
use crate::render::Renderer;
use anyhow::Result;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, report: &Report) -> Result<String> {
        let mut out = serde_json::to_string_pretty(report)?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeEntry;

    #[test]
    fn nodes_use_type_key() {
        let report = Report {
            nodes: vec![NodeEntry {
                id: "IMPL_1".into(),
                title: "Foo".into(),
                kind: Some("impl".into()),
                status: None,
                links: vec!["SPEC_1".into()],
                file: "a.c".into(),
                line: 1,
                column: 4,
            }],
            ..Report::default()
        };
        let out = JsonRenderer.render(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["nodes"][0]["type"], "impl");
        assert_eq!(value["nodes"][0]["status"], serde_json::Value::Null);
        assert_eq!(value["summary"]["files"], 0);
        assert!(out.ends_with("}\n"));
    }
}
