//! Folding the results of independent trees into one status.
//!
//! A host that runs several trees side by side (rather than as children of a
//! composite) needs a rule for what its own status is. [`Aggregation`] makes
//! that rule explicit instead of hardcoding one.

use crate::Status;

/// Policy for combining the statuses of sibling trees.
///
/// Parses from and displays as a kebab-case name (`all-must-succeed`),
/// ignoring ASCII case. `all` and `first-failure` are accepted as short forms.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Aggregation {
    /// Every tree runs and the host reports `Success` no matter what.
    #[default]
    Ignore,

    /// Every tree runs. `Failure` if any failed, otherwise `Running` if any
    /// is still running, otherwise `Success`.
    #[strum(to_string = "all-must-succeed", serialize = "all")]
    AllMustSucceed,

    /// Trees run until the first `Failure`, which is returned. Otherwise
    /// behaves like [`Aggregation::AllMustSucceed`].
    #[strum(to_string = "first-failure-wins", serialize = "first-failure")]
    FirstFailureWins,
}

impl Aggregation {
    /// Returns `true` if the host should stop running trees after one
    /// returned `status`.
    #[inline]
    pub fn short_circuits(self, status: Status) -> bool {
        matches!(
            (self, status),
            (Aggregation::FirstFailureWins, Status::Failure)
        )
    }

    /// Combines the statuses collected during one pass.
    ///
    /// An empty set of results always yields `Success`.
    pub fn combine<I>(self, results: I) -> Status
    where
        I: IntoIterator<Item = Status>,
    {
        if self == Aggregation::Ignore {
            return Status::Success;
        }

        let mut running = false;
        for status in results {
            match status {
                Status::Failure => return Status::Failure,
                Status::Running => running = true,
                Status::Success => {}
            }
        }

        if running {
            Status::Running
        } else {
            Status::Success
        }
    }

    /// Canonical name, as printed by `Display`.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}
