//! Timeout configuration for fetch operations.

use std::time::Duration;

/// Timeout configuration applied to every request a client sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Time allowed to establish a connection.
    pub connect: Duration,
    /// Total time allowed for one attempt, body included.
    pub total: Duration,
}

impl TimeoutConfig {
    /// Create a new timeout configuration.
    pub fn new(connect: Duration, total: Duration) -> Self {
        Self {
            connect: connect.min(total),
            total,
        }
    }

    /// Create from a single total timeout; a quarter of it goes to connecting.
    pub fn from_total(total: Duration) -> Self {
        Self {
            connect: total / 4,
            total,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self::from_total(Duration::from_secs(10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_total_splits_connect() {
        let t = TimeoutConfig::from_total(Duration::from_secs(8));
        assert_eq!(t.connect, Duration::from_secs(2));
        assert_eq!(t.total, Duration::from_secs(8));
    }

    #[test]
    fn test_connect_never_exceeds_total() {
        let t = TimeoutConfig::new(Duration::from_secs(5), Duration::from_secs(1));
        assert_eq!(t.connect, Duration::from_secs(1));
    }
}
