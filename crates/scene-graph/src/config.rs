//! Session configuration and its environment loader.
use std::env;
use std::fmt;
use std::str::FromStr;

use behavior_tree::Aggregation;

/// Default upper bound on passes run by [`Session::run`](crate::Session::run).
pub const DEFAULT_MAX_PASSES: u64 = 600;

/// Knobs for driving a game session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// How the game folds the statuses of its trees.
    pub aggregation: Aggregation,
    /// Stop `run` after this many passes.
    pub max_passes: u64,
    /// Stop `run` as soon as a `Scene Finished` node fires.
    pub stop_on_finish: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            aggregation: Aggregation::default(),
            max_passes: DEFAULT_MAX_PASSES,
            stop_on_finish: true,
        }
    }
}

impl SessionConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SHAPEZ_AGGREGATION` - `ignore`, `all-must-succeed` or `first-failure-wins` (default: ignore)
    /// - `SHAPEZ_MAX_PASSES` - Pass limit for a run (default: 600)
    /// - `SHAPEZ_STOP_ON_FINISH` - Stop once the scene finishes (default: true)
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(policy) = read_env::<Aggregation>("SHAPEZ_AGGREGATION") {
            config.aggregation = policy;
        }

        if let Some(passes) = read_env::<u64>("SHAPEZ_MAX_PASSES") {
            config.max_passes = passes.max(1);
        }

        if let Some(stop) = read_env::<bool>("SHAPEZ_STOP_ON_FINISH") {
            config.stop_on_finish = stop;
        }

        config
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn with_max_passes(mut self, max_passes: u64) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn with_stop_on_finish(mut self, stop_on_finish: bool) -> Self {
        self.stop_on_finish = stop_on_finish;
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    parse_value(key, &env::var(key).ok()?)
}

fn parse_value<T>(key: &str, raw: &str) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("ignoring {}={:?}: {}", key, raw, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.aggregation, Aggregation::Ignore);
        assert_eq!(config.max_passes, DEFAULT_MAX_PASSES);
        assert!(config.stop_on_finish);
    }

    #[test]
    fn builder_methods_override_fields() {
        let config = SessionConfig::default()
            .with_aggregation(Aggregation::FirstFailureWins)
            .with_max_passes(3)
            .with_stop_on_finish(false);

        assert_eq!(config.aggregation, Aggregation::FirstFailureWins);
        assert_eq!(config.max_passes, 3);
        assert!(!config.stop_on_finish);
    }

    #[test]
    fn parse_value_trims_and_rejects_garbage() {
        assert_eq!(parse_value::<u64>("SHAPEZ_MAX_PASSES", " 42 "), Some(42));
        assert_eq!(parse_value::<u64>("SHAPEZ_MAX_PASSES", "abc"), None);
        assert_eq!(parse_value::<bool>("SHAPEZ_STOP_ON_FINISH", "yes"), None);
        assert_eq!(
            parse_value::<Aggregation>("SHAPEZ_AGGREGATION", "First-Failure"),
            Some(Aggregation::FirstFailureWins)
        );
        assert_eq!(parse_value::<Aggregation>("SHAPEZ_AGGREGATION", "often"), None);
    }

    #[test]
    fn unset_variables_read_as_none() {
        assert_eq!(read_env::<u64>("SHAPEZ_CONFIG_TEST_NEVER_SET"), None);
    }
}
