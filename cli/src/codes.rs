use crate::cli::OutputFormat;
use crate::error::Result;
use crate::table::TableBuilder;
use crate::ui;
use s3_harness::{s3_error_codes, MatcherNode};
use serde_json::json;

/// One registered code as listed by `s3check codes`
#[derive(Debug, Clone, PartialEq)]
pub struct CodeRow {
    pub path: String,
    pub kind: String,
    pub status_pattern: String,
    pub code_pattern: String,
}

impl From<&MatcherNode> for CodeRow {
    fn from(node: &MatcherNode) -> Self {
        Self {
            path: node.path().to_string(),
            kind: node.kind().to_string(),
            status_pattern: node.status_pattern().as_str().to_string(),
            code_pattern: node.code_pattern().as_str().to_string(),
        }
    }
}

/// Leaf codes at or below `prefix`, in path order
pub fn collect_rows(root: &MatcherNode, prefix: Option<&str>) -> Result<Vec<CodeRow>> {
    let start = match prefix {
        Some(path) => root.lookup(path)?,
        None => root,
    };

    Ok(start.leaves().into_iter().map(CodeRow::from).collect())
}

pub fn execute(prefix: Option<String>, format: OutputFormat) -> Result<()> {
    let rows = collect_rows(s3_error_codes(), prefix.as_deref())?;

    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = rows
                .iter()
                .map(|row| {
                    json!({
                        "path": row.path,
                        "kind": row.kind,
                        "status_pattern": row.status_pattern,
                        "code_pattern": row.code_pattern,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Table => {
            ui::section_header("S3 Error Codes");
            let mut table = TableBuilder::new();
            table.headers(["Path", "Kind", "Status pattern", "Code pattern"]);
            for row in &rows {
                table.keyed_row(
                    &row.path,
                    [
                        row.kind.clone(),
                        row.status_pattern.clone(),
                        row.code_pattern.clone(),
                    ],
                );
            }
            println!("{}", table.build());
            ui::info_message(&format!("{} codes", rows.len()));
        }
    }

    Ok(())
}
