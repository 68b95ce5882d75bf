//! Integration tests for consistency checking and diffs.

use std::collections::BTreeMap;

use navsync_content::{
    CheckStatus, Difference, FileDiff, RegionError, Synchronizer, TargetStatus,
};
use navsync_test_utils::{page_html, sidebar_html};
use rstest::rstest;

const MENU: &[&str] = &["a.html", "b.html", "c.html"];

fn reference() -> String {
    page_html("index.html", &sidebar_html(MENU, Some("a.html")))
}

fn synced(id: &str) -> String {
    page_html(id, &sidebar_html(MENU, Some(id)))
}

fn one(id: &str, text: String) -> BTreeMap<String, String> {
    BTreeMap::from([(id.to_string(), text)])
}

#[test]
fn test_synchronized_site_is_healthy() {
    let sync = Synchronizer::default();
    let pages: BTreeMap<String, String> = MENU
        .iter()
        .map(|id| (id.to_string(), page_html(id, &sidebar_html(&["old.html"], None))))
        .collect();

    let report = sync.synchronize(&reference(), &pages).unwrap();
    let check = sync.check(&reference(), &report.new_texts()).unwrap();

    assert_eq!(check.status, CheckStatus::Healthy);
    assert_eq!(check.count(TargetStatus::InSync), 3);
    assert!(check.targets.values().all(|t| t.checksum.is_some()));
}

#[test]
fn test_swapped_destination_is_reported() {
    let target = synced("b.html").replace(r#"href="c.html""#, r#"href="d.html""#);

    let check = Synchronizer::default()
        .check(&reference(), &one("b.html", target))
        .unwrap();
    let result = &check.targets["b.html"];

    assert_eq!(check.status, CheckStatus::Drifted);
    assert_eq!(result.status, TargetStatus::Drifted);
    assert_eq!(
        result.differences,
        vec![Difference::Destination {
            index: 2,
            expected: Some("c.html".to_string()),
            actual: Some("d.html".to_string()),
        }]
    );
    insta::assert_snapshot!(
        result.differences[0].to_string(),
        @"entry 3 points at d.html, expected c.html"
    );
}

#[test]
fn test_wrong_active_entry_is_reported() {
    let target = page_html("b.html", &sidebar_html(MENU, Some("a.html")));

    let check = Synchronizer::default()
        .check(&reference(), &one("b.html", target))
        .unwrap();

    assert_eq!(
        check.targets["b.html"].differences,
        vec![Difference::ActiveEntry {
            expected: vec![Some("b.html".to_string())],
            actual: vec![Some("a.html".to_string())],
        }]
    );
}

#[test]
fn test_missing_entry_is_reported() {
    let target = page_html("a.html", &sidebar_html(&["a.html", "b.html"], Some("a.html")));

    let check = Synchronizer::default()
        .check(&reference(), &one("a.html", target))
        .unwrap();

    assert_eq!(
        check.targets["a.html"].differences,
        vec![Difference::EntryCount {
            expected: 3,
            actual: 2
        }]
    );
}

#[test]
fn test_label_change_names_the_entry() {
    let target = synced("a.html").replace(">c</a>", ">Chapter C</a>");

    let check = Synchronizer::default()
        .check(&reference(), &one("a.html", target))
        .unwrap();

    assert_eq!(
        check.targets["a.html"].differences,
        vec![Difference::Label {
            index: 2,
            destination: Some("c.html".to_string())
        }]
    );
}

#[test]
fn test_change_before_first_entry_is_content_difference() {
    let target = synced("a.html").replace(">Docs<", ">Guides<");

    let check = Synchronizer::default()
        .check(&reference(), &one("a.html", target))
        .unwrap();

    assert_eq!(check.targets["a.html"].differences, vec![Difference::Content]);
}

#[test]
fn test_second_navigation_block_is_reported() {
    let sidebar = format!(
        "{}\n{}",
        sidebar_html(MENU, Some("c.html")),
        sidebar_html(&["other.html"], None)
    );
    let target = page_html("c.html", &sidebar);

    let check = Synchronizer::default()
        .check(&reference(), &one("c.html", target))
        .unwrap();

    assert_eq!(
        check.targets["c.html"].differences,
        vec![Difference::DuplicateRegion { count: 2 }]
    );
    assert_eq!(check.status, CheckStatus::Drifted);
}

#[test]
fn test_unclosed_second_block_is_reported() {
    let clean = synced("a.html");
    let target = format!(
        "{clean}<ul class=\"nav-menu\"><li class=\"nav-item\"><a href=\"x.html\">x</a>"
    );

    let check = Synchronizer::default()
        .check(&reference(), &one("a.html", target))
        .unwrap();

    let result = &check.targets["a.html"];
    assert_eq!(result.status, TargetStatus::Drifted);
    assert_eq!(
        result.differences,
        vec![Difference::UnbalancedRegion {
            start: clean.len(),
            depth: 1
        }]
    );
    assert_eq!(check.status, CheckStatus::Drifted);
}

#[rstest]
#[case::no_block(page_html("b.html", "<p>none</p>"), "not_found")]
#[case::unbalanced(
    page_html("b.html", sidebar_html(MENU, None).strip_suffix("</ul>").unwrap()),
    "unbalanced"
)]
fn test_target_without_block_is_missing(#[case] target: String, #[case] kind: &str) {
    let check = Synchronizer::default()
        .check(&reference(), &one("b.html", target))
        .unwrap();
    let result = &check.targets["b.html"];

    assert_eq!(check.status, CheckStatus::Broken);
    assert_eq!(result.status, TargetStatus::Missing);
    assert_eq!(result.checksum, None);

    let reason = serde_json::to_value(result.reason.as_ref().unwrap()).unwrap();
    assert_eq!(reason["region"]["kind"], kind);
}

#[test]
fn test_broken_outranks_drifted() {
    let mut pages = one("a.html", page_html("a.html", "<p>none</p>"));
    pages.insert(
        "b.html".to_string(),
        page_html("b.html", &sidebar_html(MENU, None)),
    );

    let check = Synchronizer::default().check(&reference(), &pages).unwrap();

    assert_eq!(check.status, CheckStatus::Broken);
    assert_eq!(check.count(TargetStatus::Missing), 1);
    assert_eq!(check.count(TargetStatus::Drifted), 1);
}

#[test]
fn test_check_requires_reference_block() {
    let err = Synchronizer::default()
        .check("<p>nothing</p>", &BTreeMap::new())
        .unwrap_err();

    assert!(matches!(
        err,
        navsync_content::Error::Reference(RegionError::NotFound { .. })
    ));
}

#[test]
fn test_diff_of_marker_move() {
    let old = page_html("b.html", &sidebar_html(MENU, Some("a.html")));
    let new = synced("b.html");

    let diff = FileDiff::compute("b.html", &old, &new);

    assert_eq!(diff.insertions, 2);
    assert_eq!(diff.deletions, 2);
    assert!(diff.unified().contains("--- a/b.html"));
    assert!(diff.unified().contains("+++ b/b.html"));
    assert!(diff.unified().contains("+            <li class=\"nav-item active\">"));
    assert!(diff.ratio > 0.9);
}
