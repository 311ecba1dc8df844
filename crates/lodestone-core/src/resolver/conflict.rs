use std::collections::{HashMap, HashSet};

use crate::resolver::ResolutionView;

/// Detect identifier conflicts across the whole known set.
///
/// A conflict is symmetric: two units clash when they declare an
/// identically named code file or an identically named scene. Every
/// unordered pair is checked once; pairs involving an invalid unit are
/// skipped, and the first shared identifier wins, with no further scanning
/// against that other unit. The result maps each unit id to the ids it
/// conflicts with (a one-directional adjacency list per unit, populated on
/// both sides).
///
/// O(U² × (C_a + C_s)) worst case, acceptable at mod-management scale.
pub fn detect_conflicts(units: &[ResolutionView]) -> HashMap<String, HashSet<String>> {
    let mut adjacency: HashMap<String, HashSet<String>> = units
        .iter()
        .map(|unit| (unit.id.clone(), HashSet::new()))
        .collect();

    for (i, a) in units.iter().enumerate() {
        if !a.valid {
            continue;
        }
        for b in units.iter().skip(i + 1) {
            if !b.valid || a.id == b.id {
                continue;
            }
            if shares_identifier(a, b) {
                log::warn!(
                    "units '{}' and '{}' declare a colliding identifier",
                    a.id,
                    b.id
                );
                if let Some(set) = adjacency.get_mut(&a.id) {
                    set.insert(b.id.clone());
                }
                if let Some(set) = adjacency.get_mut(&b.id) {
                    set.insert(a.id.clone());
                }
            }
        }
    }
    adjacency
}

fn shares_identifier(a: &ResolutionView, b: &ResolutionView) -> bool {
    a.code_files.iter().any(|name| b.code_files.contains(name))
        || a.scene_names.iter().any(|name| b.scene_names.contains(name))
}
