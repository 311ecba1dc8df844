// crates/lodestone-core/src/resolver/tests/conflict_tests.rs
#![cfg(test)]

use crate::resolver::conflict::detect_conflicts;
use crate::resolver::ResolutionView;

fn view(id: &str, code_files: &[&str], scene_names: &[&str]) -> ResolutionView {
    ResolutionView {
        id: id.to_string(),
        enabled: true,
        valid: true,
        dependencies: Vec::new(),
        code_files: code_files.iter().map(|f| f.to_string()).collect(),
        scene_names: scene_names.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn test_shared_code_file_conflicts_symmetrically() {
    let views = vec![
        view("a", &["Foo.dll", "A.dll"], &[]),
        view("b", &["B.dll", "Foo.dll"], &[]),
        view("c", &["C.dll"], &[]),
    ];

    let conflicts = detect_conflicts(&views);
    assert!(conflicts["a"].contains("b"));
    assert!(conflicts["b"].contains("a"));
    assert!(conflicts["c"].is_empty());
    assert!(!conflicts["a"].contains("c"));
}

#[test]
fn test_shared_scene_name_conflicts() {
    let views = vec![
        view("a", &[], &["Hangar", "Bridge"]),
        view("b", &[], &["Bridge"]),
    ];

    let conflicts = detect_conflicts(&views);
    assert!(conflicts["a"].contains("b"));
    assert!(conflicts["b"].contains("a"));
}

#[test]
fn test_code_and_scene_namespaces_are_distinct() {
    // A scene called "Shared" does not collide with a code file "Shared".
    let views = vec![view("a", &["Shared"], &[]), view("b", &[], &["Shared"])];

    let conflicts = detect_conflicts(&views);
    assert!(conflicts["a"].is_empty());
    assert!(conflicts["b"].is_empty());
}

#[test]
fn test_invalid_units_are_skipped() {
    let mut broken = view("broken", &["Foo.dll"], &[]);
    broken.valid = false;
    let views = vec![broken, view("ok", &["Foo.dll"], &[])];

    let conflicts = detect_conflicts(&views);
    assert!(conflicts["broken"].is_empty());
    assert!(conflicts["ok"].is_empty());
}

#[test]
fn test_multiple_shared_identifiers_record_one_edge() {
    // First match wins; the edge set stays a set either way.
    let views = vec![
        view("a", &["Foo.dll", "Bar.dll"], &["Hangar"]),
        view("b", &["Foo.dll", "Bar.dll"], &["Hangar"]),
    ];

    let conflicts = detect_conflicts(&views);
    assert_eq!(conflicts["a"].len(), 1);
    assert_eq!(conflicts["b"].len(), 1);
}

#[test]
fn test_disjoint_units_do_not_conflict() {
    let views = vec![
        view("a", &["A.dll"], &["SceneA"]),
        view("b", &["B.dll"], &["SceneB"]),
    ];

    let conflicts = detect_conflicts(&views);
    assert!(conflicts.values().all(|set| set.is_empty()));
}
