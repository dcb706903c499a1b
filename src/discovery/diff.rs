//! Change reporting between service snapshots.
//!
//! Used for observability only: the result never influences which
//! snapshot gets published.

use std::collections::HashSet;

use crate::discovery::loader::ServiceInfo;
use crate::observability::metrics;

/// Routes that appeared or disappeared between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub added: Vec<ServiceInfo>,
    pub removed: Vec<ServiceInfo>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Emit one log event per change, removals first.
    pub fn report(&self) {
        for info in &self.removed {
            tracing::info!(
                pattern = %info.matcher,
                service = %info.name,
                address = %info.endpoint.address,
                description = %info.endpoint.description,
                "Removed route"
            );
        }
        for info in &self.added {
            tracing::info!(
                pattern = %info.matcher,
                service = %info.name,
                address = %info.endpoint.address,
                description = %info.endpoint.description,
                tls = info.endpoint.tls,
                "Added route"
            );
        }
        metrics::record_route_changes(self.added.len(), self.removed.len());
    }
}

/// Compare two snapshots using structural equality.
///
/// Output order is independent of input order.
pub fn diff(old: &[ServiceInfo], new: &[ServiceInfo]) -> ChangeSet {
    let old_set: HashSet<&ServiceInfo> = old.iter().collect();
    let new_set: HashSet<&ServiceInfo> = new.iter().collect();

    let mut removed: Vec<ServiceInfo> = old
        .iter()
        .filter(|info| !new_set.contains(info))
        .cloned()
        .collect();
    let mut added: Vec<ServiceInfo> = new
        .iter()
        .filter(|info| !old_set.contains(info))
        .cloned()
        .collect();

    removed.sort_by(ServiceInfo::precedence);
    added.sort_by(ServiceInfo::precedence);

    ChangeSet { added, removed }
}
