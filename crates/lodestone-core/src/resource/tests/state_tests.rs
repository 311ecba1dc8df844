// crates/lodestone-core/src/resource/tests/state_tests.rs
#![cfg(test)]

use crate::resource::state::LoadState;

#[test]
fn test_default_state_is_unloaded() {
    assert_eq!(LoadState::default(), LoadState::Unloaded);
}

#[test]
fn test_is_busy() {
    assert!(!LoadState::Unloaded.is_busy());
    assert!(!LoadState::Loaded.is_busy());
    assert!(LoadState::Loading.is_busy());
    assert!(LoadState::Unloading.is_busy());
    assert!(LoadState::Cancelling.is_busy());
}

#[test]
fn test_display_names() {
    assert_eq!(LoadState::Unloaded.to_string(), "unloaded");
    assert_eq!(LoadState::Loading.to_string(), "loading");
    assert_eq!(LoadState::Loaded.to_string(), "loaded");
    assert_eq!(LoadState::Unloading.to_string(), "unloading");
    assert_eq!(LoadState::Cancelling.to_string(), "cancelling");
}
