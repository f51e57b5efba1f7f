use crate::error::{CliError, Result, ResultExt};
use crate::ui;
use s3_harness::{s3_error_codes, MatcherNode, ServerError};
use std::fs;

/// Build the observed error from either a code or an XML error body
pub fn observed_error(status: u16, code: Option<String>, body: Option<&str>) -> Result<ServerError> {
    match (code, body) {
        (Some(code), _) => Ok(ServerError::new(status, code)),
        (None, Some(body)) => Ok(ServerError::from_xml(status, body)),
        (None, None) => Err(CliError::Other(
            "Either --code or --body is required to classify an error".to_string(),
        )),
    }
}

/// Every node of the tree that accepts `error`, most general first
pub fn matching_paths(root: &MatcherNode, error: &ServerError) -> Vec<String> {
    let mut paths = Vec::new();
    collect_matches(root, error, &mut paths);
    paths
}

fn collect_matches(node: &MatcherNode, error: &ServerError, paths: &mut Vec<String>) {
    for child in node.children() {
        if child.matches(error) {
            paths.push(child.path().to_string());
        }
        collect_matches(child, error, paths);
    }
}

pub fn execute(
    status: u16,
    code: Option<String>,
    body: Option<String>,
    expect: Option<String>,
) -> Result<()> {
    let body = match body {
        Some(path) => Some(
            fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path))?,
        ),
        None => None,
    };
    let error = observed_error(status, code, body.as_deref())?;
    let root = s3_error_codes();

    ui::section_header("Observed Error");
    ui::field("Status", &error.status.to_string());
    ui::field("Code", &error.error_code);
    if let Some(message) = &error.message {
        ui::field("Message", message);
    }

    if let Some(expected) = expect {
        let matcher = root.lookup(&expected)?;
        return match matcher.check_server(&error) {
            None => {
                ui::success_message(&format!("Matches {}", matcher.path()));
                Ok(())
            }
            Some(diagnostic) => Err(CliError::Other(diagnostic)),
        };
    }

    let paths = matching_paths(root, &error);
    if paths.is_empty() {
        ui::warning_message("No registered code accepts this error");
    } else {
        ui::section_header("Matching Codes");
        for path in &paths {
            println!("  {}", path);
        }
    }

    Ok(())
}
