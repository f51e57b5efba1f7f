use crate::error::{Result, ResultExt};
use crate::ui;
use s3_harness::schema::{decode_version_response, VersionResponse};
use std::fs;

/// Read and decode the version document in `file`
pub fn load_version(file: &str, status: u16) -> Result<VersionResponse> {
    let body = fs::read_to_string(file).with_context(|| format!("Failed to read {}", file))?;
    decode_version_response(status, &body).with_context(|| format!("Invalid version document {}", file))
}

pub fn execute(file: String, status: u16) -> Result<()> {
    let response = load_version(&file, status)?;
    let version = &response.version;

    ui::success_message(&format!("{} is a valid version document", file));
    ui::section_header("Version");
    ui::field("Id", &version.id);
    ui::field("Status", &version.status);
    ui::field("Updated", &version.updated.to_rfc3339());
    if let (Some(min), Some(max)) = (&version.min_version, &version.version) {
        ui::field("Microversions", &format!("{} - {}", min, max));
    }
    for link in &version.links {
        ui::field(&format!("Link ({})", link.rel), link.href.as_str());
    }
    for media_type in &version.media_types {
        ui::field("Media type", &format!("{} ({})", media_type.media_type, media_type.base));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use s3_harness::HarnessError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BODY: &str = r#"{"version": {
        "id": "v2.1",
        "links": [{"href": "http://openstack.example.com/v2.1/", "rel": "self"}],
        "media-types": [{"base": "application/json", "type": "application/vnd.openstack.compute+json;version=2.1"}],
        "status": "CURRENT",
        "updated": "2013-07-23T11:33:21Z"
    }}"#;

    fn write_body(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_document() {
        let file = write_body(BODY);
        let response = load_version(file.path().to_str().unwrap(), 200).unwrap();
        assert_eq!(response.version.id, "v2.1");
    }

    #[test]
    fn test_wrong_status_is_reported_with_file() {
        let file = write_body(BODY);
        let path = file.path().to_str().unwrap().to_string();
        let err = load_version(&path, 404).unwrap_err();

        match err {
            CliError::WithContext(context, inner) => {
                assert!(context.contains(&path));
                assert!(matches!(
                    *inner,
                    CliError::Harness(HarnessError::UnexpectedStatus { status: 404, .. })
                ));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load_version("/nonexistent/version.json", 200).unwrap_err();
        assert!(err.user_message().starts_with("Failed to read"));
    }
}
