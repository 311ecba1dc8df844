use std::collections::HashMap;

use crate::resolver::ResolutionView;

/// Outcome of resolving one unit's declared dependencies against the known
/// set.
///
/// `found_disabled` entries are also present in `found`: the dependency
/// exists, so by current policy it satisfies the declaration, but the
/// condition is surfaced so hosts can warn (or harden the policy later)
/// without re-resolving.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyReport {
    /// Declared ids that resolved to a known unit.
    pub found: Vec<String>,
    /// The subset of `found` whose unit is currently disabled.
    pub found_disabled: Vec<String>,
    /// Declared ids with no matching unit.
    pub missing: Vec<String>,
}

impl DependencyReport {
    /// True when no declared dependency is missing. Disabled-but-found
    /// dependencies do not count against satisfaction.
    pub fn satisfied(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Resolve one unit's declared dependencies through the id index.
///
/// O(D) index lookups for D declared ids. Must be re-run for every unit
/// whenever the known-unit set changes: adding, removing or toggling one
/// unit can change satisfaction for all of them.
pub fn resolve_dependencies(
    unit: &ResolutionView,
    index: &HashMap<&str, &ResolutionView>,
) -> DependencyReport {
    let mut report = DependencyReport::default();
    for dep_id in &unit.dependencies {
        match index.get(dep_id.as_str()) {
            Some(dep) => {
                report.found.push(dep_id.clone());
                if !dep.enabled {
                    report.found_disabled.push(dep_id.clone());
                }
            }
            None => report.missing.push(dep_id.clone()),
        }
    }
    report
}
