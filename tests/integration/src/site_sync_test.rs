//! End-to-end test of a documentation site
//!
//! Exercises the complete flow: manifest loading -> discovery -> sync ->
//! check, against a multi-section site with one broken page.

use std::collections::BTreeMap;

use navsync_content::{CheckStatus, FailureReason, RegionError, SyncConfig, Synchronizer, TargetStatus};
use navsync_core::{SyncEngine, SyncOptions};
use navsync_fs::NormalizedPath;
use navsync_test_utils::{TestSite, page_html, sectioned_sidebar_html};
use pretty_assertions::assert_eq;
use regex::Regex;

const SECTIONS: &[(&str, &[&str])] = &[
    ("Getting started", &["index.html", "01-introduction.html", "02-install.html"]),
    ("Core", &["03-models.html", "04-messages.html", "05-tools.html"]),
    ("Advanced", &["06-agents.html", "07-streaming.html"]),
];

fn all_pages() -> Vec<&'static str> {
    SECTIONS.iter().flat_map(|(_, pages)| pages.iter().copied()).collect()
}

/// Reference carries the full menu; every other page has last year's menu.
fn docs_site() -> TestSite {
    let site = TestSite::new();
    site.write(
        "index.html",
        &page_html("index.html", &sectioned_sidebar_html(SECTIONS, Some("index.html"))),
    );

    let outdated: &[(&str, &[&str])] = &[("Docs", &["index.html", "01-introduction.html"])];
    for page in all_pages().into_iter().skip(1) {
        site.write(
            page,
            &page_html(page, &sectioned_sidebar_html(outdated, Some("index.html"))),
        );
    }
    site
}

fn active_destinations(text: &str) -> Vec<String> {
    let re = Regex::new(r#"<li class="nav-item active">\s*<a href="([^"]*)""#).unwrap();
    re.captures_iter(text).map(|c| c[1].to_string()).collect()
}

fn engine(site: &TestSite) -> SyncEngine {
    SyncEngine::open(NormalizedPath::new(site.root()), None).unwrap()
}

#[test]
fn test_full_site_sync() {
    let site = docs_site();
    site.write("99-draft.html", &page_html("draft", "<ul class=\"nav-menu\">\n<li>"));
    site.write("05-tools.html.bak", "backup, never touched");

    let engine = engine(&site);
    let outcome = engine.sync(SyncOptions::default()).unwrap();

    // 8 pages plus the draft; the backup is not discovered
    assert_eq!(outcome.report.results.len(), 9);
    assert_eq!(outcome.report.succeeded(), 8);
    assert_eq!(outcome.report.failed(), 1);
    assert_eq!(outcome.written.len(), 7);

    let draft = outcome.report.get("99-draft.html").unwrap();
    assert!(matches!(
        draft.reason,
        Some(FailureReason::Region(RegionError::Unbalanced { .. }))
    ));

    for page in all_pages() {
        let text = site.read(page);
        assert_eq!(active_destinations(&text), vec![page.to_string()], "{page}");
        assert!(text.contains(&sectioned_sidebar_html(SECTIONS, Some(page))));
    }
    assert_eq!(site.read("05-tools.html.bak"), "backup, never touched");

    let check = engine.check().unwrap();
    assert_eq!(check.status, CheckStatus::Broken);
    assert_eq!(check.count(TargetStatus::InSync), 8);
    assert_eq!(check.targets["99-draft.html"].status, TargetStatus::Missing);
}

#[test]
fn test_sync_is_idempotent_on_disk() {
    let site = docs_site();
    let engine = engine(&site);

    engine.sync(SyncOptions::default()).unwrap();
    let snapshot: BTreeMap<&str, String> = all_pages().into_iter().map(|p| (p, site.read(p))).collect();

    let second = engine.sync(SyncOptions::default()).unwrap();

    assert!(second.written.is_empty());
    assert!(engine.diff().unwrap().is_empty());
    for (page, text) in snapshot {
        assert_eq!(site.read(page), text);
    }
    assert_eq!(engine.check().unwrap().status, CheckStatus::Healthy);
}

#[test]
fn test_page_body_survives_sync() {
    let site = docs_site();
    let before = site.read("04-messages.html");

    engine(&site).sync(SyncOptions::default()).unwrap();
    let after = site.read("04-messages.html");

    let region = SyncConfig::sidebar().region;
    let old = region.locate(&before, 0).unwrap();
    let new = region.locate(&after, 0).unwrap();

    assert_eq!(&before[..old.span.start], &after[..new.span.start]);
    assert_eq!(&before[old.span.end..], &after[new.span.end..]);
    assert!(after.contains("<ul class=\"content-list\">"));
}

#[test]
fn test_engine_matches_in_memory_synchronizer() {
    let site = docs_site();
    let reference = site.read("index.html");
    let targets: BTreeMap<String, String> = all_pages()
        .into_iter()
        .map(|p| (p.to_string(), site.read(p)))
        .collect();

    let expected = Synchronizer::default()
        .synchronize(&reference, &targets)
        .unwrap()
        .new_texts();

    engine(&site).sync(SyncOptions::default()).unwrap();

    for (page, text) in expected {
        assert_eq!(site.read(&page), text);
    }
}

#[test]
fn test_check_json_shape() {
    let site = docs_site();

    let report = engine(&site).check().unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["status"], "drifted");
    assert_eq!(value["targets"]["index.html"]["status"], "in_sync");
    assert_eq!(
        value["targets"]["03-models.html"]["differences"][0]["kind"],
        "entry_count"
    );
}
