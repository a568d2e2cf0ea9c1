//! End-to-end tests for seo-export.
//!
//! Each test builds a throwaway source tree and runs the full export.

use std::{fs, path::Path};

use chrono::NaiveDate;
use seo_export_core::{Config, DuplicatePolicy, ExtractStrategy};
use seo_export_generator::ExportSession;
use tempfile::TempDir;

const APP: &str = r#"import { Export } from "./toHtml";
import { SEO } from "./seo";

export default function App() {
  return (
    <>
      <Export filename="home">
        <SEO metadata={{ title: "Home", description: "Welcome" }} />
        <h1>Hello</h1>
        <p>Signed in as {user.name}</p>
      </Export>
      <Counter />
    </>
  );
}
"#;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.export.source_dir = dir.path().join("src");
    config.export.output_dir = dir.path().join("dist");
    config
}

fn run(config: Config) -> seo_export_generator::EmitReport {
    ExportSession::new(config)
        .unwrap()
        .with_lastmod(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
        .run()
}

fn read(dir: &TempDir, rel: &str) -> String {
    fs::read_to_string(dir.path().join("dist").join(rel)).unwrap()
}

#[test]
fn test_single_marker_default_options() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/App.tsx", APP);

    let report = run(config(&dir));
    assert_eq!(report.pages, 1);
    assert_eq!(report.failures, 0);
    assert!(report.robots);
    assert!(report.sitemap);

    let home = read(&dir, "home.html");
    assert!(home.starts_with("<!DOCTYPE html>"));
    assert!(home.contains("<title>home</title>"));
    assert!(home.contains("<h1>Hello</h1> <p>Signed in as </p>"));
    assert!(!home.contains("SEO"));
    assert!(!home.contains("user.name"));

    assert_eq!(
        read(&dir, "robots.txt"),
        "User-agent: *\nAllow: /\nDisallow: /private/\nDisallow: /admin/\n\nSitemap: https://example.com/sitemap.xml\n"
    );

    let sitemap = read(&dir, "sitemap.xml");
    assert_eq!(sitemap.matches("<url>").count(), 2);
    assert!(sitemap.contains("<loc>https://example.com/</loc>"));
    assert!(sitemap.contains("<loc>https://example.com/home.html</loc>"));
    assert!(sitemap.contains("<lastmod>2026-10-19</lastmod>"));
}

#[test]
fn test_fallback_pages_without_markers() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/Dash.tsx", "export const Dash = () => <div>Dash</div>;");
    write(dir.path(), "src/widgets/Chart.tsx", "export const Chart = () => null;");
    write(dir.path(), "src/styles.css", "body {}");

    let report = run(config(&dir));
    assert_eq!(report.pages, 0);
    assert_eq!(report.fallback_pages, 1);
    assert_eq!(report.generated, vec!["dash.html"]);

    let dash = read(&dir, "dash.html");
    assert!(dash.contains("<!-- Generated from Dash.tsx -->"));
    assert!(dash.contains(
        "This is a fallback export. Add Export components to customize the content."
    ));
    assert!(!dir.path().join("dist/chart.html").exists());

    let sitemap = read(&dir, "sitemap.xml");
    assert!(sitemap.contains("<loc>https://example.com/dash.html</loc>"));
}

#[test]
fn test_link_mode_and_default_filename() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "src/pages/AboutPage.jsx",
        r#"export default () => (
  <Export to="link">
    <nav><Link to="/" className="home">Home</Link> | <Link to="/blog">Blog</Link></nav>
  </Export>
);"#,
    );

    let report = run(config(&dir));
    assert_eq!(report.generated, vec!["aboutpage.html"]);

    let about = read(&dir, "aboutpage.html");
    assert!(about.contains(r#"<a href="/""#));
    assert!(about.contains(r#"<a href="/blog">Blog</a>"#));
    assert!(!about.to_lowercase().contains("<link"));
}

#[test]
fn test_duplicate_policies_with_both_passes() {
    for (policy, expected) in [(DuplicatePolicy::Keep, 2), (DuplicatePolicy::Drop, 1)] {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/App.tsx", APP);

        let mut config = config(&dir);
        config.export.duplicates = policy;
        config.export.transform_pass = true;

        let report = run(config);
        assert_eq!(report.pages, expected, "policy {policy:?}");

        let sitemap = read(&dir, "sitemap.xml");
        assert_eq!(sitemap.matches("home.html").count(), expected);
    }
}

#[test]
fn test_nested_markers_by_strategy() {
    let source = r#"<Export filename="outer"><section><Export filename="inner"><p>In</p></Export><p>Tail</p></section></Export>"#;

    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/Nested.tsx", source);
    let report = run(config(&dir));
    assert_eq!(report.generated, vec!["outer.html", "inner.html"]);
    assert!(read(&dir, "outer.html").contains("<section><p>In</p><p>Tail</p></section>"));

    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/Nested.tsx", source);
    let mut config = config(&dir);
    config.export.strategy = ExtractStrategy::Pattern;
    let report = run(config);
    assert_eq!(report.generated, vec!["outer.html"]);
    assert!(!read(&dir, "outer.html").contains("Tail"));
}

#[test]
fn test_disabled_artifacts() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/App.tsx", APP);

    let mut config = config(&dir);
    config.robots.enable = false;
    config.sitemap.enable = false;

    let report = run(config);
    assert_eq!(report.pages, 1);
    assert!(!report.robots);
    assert!(!report.sitemap);
    assert!(!dir.path().join("dist/robots.txt").exists());
    assert!(!dir.path().join("dist/sitemap.xml").exists());
}

#[test]
fn test_config_file_drives_export() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "site/Landing.tsx", r#"<Page filename="index"><h1>Landing</h1></Page>"#);

    let config_path = dir.path().join("seo-export.toml");
    fs::write(
        &config_path,
        format!(
            r#"
[export]
source_dir = "{src}"
output_dir = "{out}"

[markers]
export = "Page"

[sitemap]
hostname = "https://docs.example.org"

[metadata.index]
title = "Landing"
ogTitle = "Landing page"
"#,
            src = dir.path().join("site").display(),
            out = dir.path().join("dist").display(),
        ),
    )
    .unwrap();

    let report = run(Config::load(&config_path).unwrap());
    assert_eq!(report.generated, vec!["index.html"]);

    let index = read(&dir, "index.html");
    assert!(index.contains("<title>Landing</title>"));
    assert!(index.contains(r#"<meta property="og:title" content="Landing page">"#));

    // the root entry plus index.html, both at the bare hostname
    let sitemap = read(&dir, "sitemap.xml");
    assert_eq!(sitemap.matches("<url>").count(), 2);
    assert_eq!(sitemap.matches("<loc>https://docs.example.org/</loc>").count(), 2);
}
