//! Retry policy for schedule fetching.

use std::time::Duration;

/// What to do when the portal answers with an empty board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyPolicy {
    /// Treat it as the portal being between updates and try again.
    #[default]
    Retry,
    /// Take it at face value: there are no departures right now.
    Accept,
}

/// Configuration for the fetch retry loop.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Maximum number of attempts. Each attempt acquires a new token and
    /// queries the board once.
    pub max_retries: u32,

    /// Fixed pause between attempts.
    pub delay: Duration,

    /// Handling of empty boards.
    pub empty_policy: EmptyPolicy,
}

impl FetchConfig {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            delay,
            empty_policy: EmptyPolicy::default(),
        }
    }

    /// Set the handling of empty boards.
    pub fn with_empty_policy(mut self, policy: EmptyPolicy) -> Self {
        self.empty_policy = policy;
        self
    }

    /// Worst-case time spent pausing between attempts.
    pub fn max_total_delay(&self) -> Duration {
        self.delay * self.max_retries.saturating_sub(1)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            delay: Duration::from_secs(3),
            empty_policy: EmptyPolicy::Retry,
        }
    }
}
