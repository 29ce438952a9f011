//! Integration test for the full engine pipeline.
//!
//! Exercises: DiffSession::compute, navigation, per-hunk decisions,
//! status_summary, materialize, finalize, and the serde plain-structure
//! round trip.

use redraft_core::{
    finalize, materialize, DiffSession, EngineError, HunkKind, NavDirection,
};

const ORIGINAL: &str = "\
fn greet(name: &str) {
    println!(\"hello {name}\");
}

fn farewell() {
    println!(\"bye\");
}
";

const REWRITE: &str = "\
/// Greets someone by name.
fn greet(name: &str) {
    println!(\"hello, {name}!\");
}

fn farewell() {
    println!(\"bye\");
}
";

#[test]
fn full_review_lifecycle() {
    let mut session = DiffSession::compute(
        "src/lib.rs",
        ORIGINAL.to_owned(),
        REWRITE.to_owned(),
        Some("Add a doc comment and punctuation".to_owned()),
        None,
    )
    .unwrap();

    assert!(session.is_active);
    assert_eq!(session.current_hunk_index, None, "no focus at session start");
    assert_eq!(session.file_id, "src/lib.rs");
    assert_eq!(session.hunks.len(), 2, "doc comment hunk + println hunk");
    assert_eq!(session.hunks[0].kind, HunkKind::Added);
    assert_eq!(session.hunks[1].kind, HunkKind::Modified);
    assert!(
        session.hunks.windows(2).all(|p| p[0].start_line < p[1].start_line
            && p[0].end_line <= p[1].start_line),
        "hunks sorted and non-overlapping"
    );

    // Untouched preview keeps the original byte-for-byte.
    assert_eq!(materialize(&session), ORIGINAL);

    // Walk the review: focus the first pending hunk, accept it.
    assert_eq!(session.navigate(NavDirection::Next).unwrap(), 0);
    let first = session.hunks[0].id;
    session.accept(first).unwrap();
    assert_eq!(
        session.current_hunk_index,
        Some(1),
        "deciding the focused hunk advances to the next pending one"
    );

    let summary = session.status_summary();
    assert_eq!((summary.pending, summary.accepted, summary.rejected), (1, 1, 0));

    // Finalize is refused while a hunk is still pending.
    assert_eq!(
        finalize(&mut session),
        Err(EngineError::UnresolvedHunks { pending: 1 }),
        "finalize never treats pending as rejected"
    );
    assert!(session.is_active, "refused finalize leaves the session alive");

    // Change of heart on the second hunk: reject, then flip to accept.
    let second = session.hunks[1].id;
    session.reject(second).unwrap();
    assert_eq!(session.current_hunk_index, None, "nothing pending, focus cleared");
    assert_eq!(
        materialize(&session),
        format!(
            "/// Greets someone by name.\n{ORIGINAL}"
        ),
        "preview shows the accepted hunk only"
    );
    session.accept(second).unwrap();

    // Now every hunk is resolved; finalize commits and destroys.
    let text = finalize(&mut session).unwrap();
    assert_eq!(text, REWRITE, "all-accepted finalize reproduces the rewrite");
    assert!(!session.is_active);
    assert!(session.hunks.is_empty());
}

#[test]
fn all_accepted_and_all_rejected_reproduce_the_snapshots() {
    let mut session = DiffSession::compute(
        "doc",
        ORIGINAL.to_owned(),
        REWRITE.to_owned(),
        None,
        None,
    )
    .unwrap();

    session.accept_all().unwrap();
    assert_eq!(materialize(&session), REWRITE);

    session.reject_all().unwrap();
    assert_eq!(materialize(&session), ORIGINAL);

    // Bulk-rejected sessions finalize cleanly back to the original.
    assert_eq!(finalize(&mut session).unwrap(), ORIGINAL);
}

#[test]
fn session_round_trips_through_json() {
    let mut session = DiffSession::compute(
        "notes.md",
        "a\nb\nc".to_owned(),
        "a\nx\nc".to_owned(),
        Some("swap b for x".to_owned()),
        None,
    )
    .unwrap();
    session.navigate(NavDirection::Next).unwrap();

    let json = serde_json::to_value(&session).unwrap();
    assert_eq!(json["fileId"], "notes.md", "camelCase plain structure");
    assert_eq!(json["currentHunkIndex"], 0);
    assert_eq!(json["isActive"], true);
    assert_eq!(json["hunks"][0]["startLine"], 1);
    assert_eq!(json["hunks"][0]["originalLines"][0], "b");
    assert_eq!(json["hunks"][0]["status"], "Pending");

    let restored: DiffSession = serde_json::from_value(json).unwrap();
    assert_eq!(restored.id, session.id);
    assert_eq!(restored.hunks, session.hunks);
    assert_eq!(restored.current_hunk_index, session.current_hunk_index);
    assert_eq!(materialize(&restored), materialize(&session));
}

#[test]
fn decisions_commute_with_order_of_review() {
    // Accepting hunks in any order materializes the same text.
    let build = || {
        DiffSession::compute(
            "doc",
            "a\nb\nc\nd\ne\nf\ng".to_owned(),
            "a\nX\nc\nY\ne\nZ\ng".to_owned(),
            None,
            None,
        )
        .unwrap()
    };

    let mut forward = build();
    let ids: Vec<u32> = forward.hunks.iter().map(|h| h.id).collect();
    for &id in &ids {
        forward.accept(id).unwrap();
    }

    let mut backward = build();
    for &id in ids.iter().rev() {
        backward.accept(id).unwrap();
    }

    assert_eq!(materialize(&forward), materialize(&backward));
    assert_eq!(materialize(&forward), "a\nX\nc\nY\ne\nZ\ng");
}
