//! Meta command - applies a metadata file to an HTML document in place

use std::{fs, path::Path};

use color_eyre::eyre::{Result, WrapErr};
use seo_export_meta::{HeadState, HtmlDocument, Metadata, apply_metadata};

/// Run the meta command.
pub fn run(html_path: &Path, metadata_path: &Path) -> Result<HeadState> {
    tracing::info!(?html_path, ?metadata_path, "Applying metadata");

    let raw = fs::read_to_string(metadata_path)
        .wrap_err_with(|| format!("Failed to read {}", metadata_path.display()))?;
    let metadata: Metadata = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("Invalid metadata JSON in {}", metadata_path.display()))?;

    let html = fs::read_to_string(html_path)
        .wrap_err_with(|| format!("Failed to read {}", html_path.display()))?;
    let mut document = HtmlDocument::new(html);
    let head = apply_metadata(&mut document, &metadata).wrap_err("Failed to apply metadata")?;

    fs::write(html_path, document.as_str())
        .wrap_err_with(|| format!("Failed to write {}", html_path.display()))?;

    println!("  ✓ Updated {} ({} head elements)", html_path.display(), head.elements.len());

    Ok(head)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_apply_metadata_file() {
        let dir = TempDir::new().unwrap();
        let html = dir.path().join("home.html");
        let json = dir.path().join("home.json");
        fs::write(
            &html,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <title>home</title>\n</head>\n<body><h1>Hi</h1></body>\n</html>",
        )
        .unwrap();
        fs::write(
            &json,
            r#"{"title": "Home", "twitterCard": "summary", "structuredData": {"@type": "WebSite"}}"#,
        )
        .unwrap();

        run(&html, &json).unwrap();
        run(&html, &json).unwrap();

        let written = fs::read_to_string(&html).unwrap();
        assert!(written.contains("<title>Home</title>"));
        assert_eq!(written.matches(r#"name="twitter:card""#).count(), 1);
        assert_eq!(written.matches("application/ld+json").count(), 1);
        assert!(written.contains("<h1>Hi</h1>"));
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let dir = TempDir::new().unwrap();
        let html = dir.path().join("a.html");
        let json = dir.path().join("a.json");
        fs::write(&html, "<html><head></head><body></body></html>").unwrap();
        fs::write(&json, "{not json").unwrap();

        assert!(run(&html, &json).is_err());
    }
}
