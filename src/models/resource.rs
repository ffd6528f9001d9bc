// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The resource categories the fetcher pulls from WHOOP.

use std::fmt;

/// A WHOOP resource category. Each maps to one endpoint and one data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Profile,
    Cycles,
    Recovery,
    Sleep,
    Workouts,
}

impl ResourceKind {
    /// Fetch order.
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Profile,
        ResourceKind::Cycles,
        ResourceKind::Recovery,
        ResourceKind::Sleep,
        ResourceKind::Workouts,
    ];

    /// Endpoint path relative to the v2 API base.
    pub fn endpoint(self) -> &'static str {
        match self {
            ResourceKind::Profile => "user/profile/basic",
            ResourceKind::Cycles => "cycle",
            ResourceKind::Recovery => "recovery",
            ResourceKind::Sleep => "activity/sleep",
            ResourceKind::Workouts => "activity/workout",
        }
    }

    /// File name under the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            ResourceKind::Profile => "profile.json",
            ResourceKind::Cycles => "cycles.json",
            ResourceKind::Recovery => "recovery.json",
            ResourceKind::Sleep => "sleep.json",
            ResourceKind::Workouts => "workouts.json",
        }
    }

    /// Collection endpoints take a time window and paginate.
    pub fn is_collection(self) -> bool {
        !matches!(self, ResourceKind::Profile)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Profile => "profile",
            ResourceKind::Cycles => "cycles",
            ResourceKind::Recovery => "recovery",
            ResourceKind::Sleep => "sleep",
            ResourceKind::Workouts => "workouts",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_file_names_are_distinct() {
        let names: HashSet<_> = ResourceKind::ALL.iter().map(|k| k.file_name()).collect();
        assert_eq!(names.len(), ResourceKind::ALL.len());
    }

    #[test]
    fn test_only_profile_is_unwindowed() {
        let singles: Vec<_> = ResourceKind::ALL
            .into_iter()
            .filter(|k| !k.is_collection())
            .collect();
        assert_eq!(singles, vec![ResourceKind::Profile]);
    }
}
