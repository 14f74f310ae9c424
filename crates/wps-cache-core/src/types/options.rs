//! Write modes and expiry

use std::time::Duration;

/// Condition attached to a write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteMode {
    /// Store only if the key is absent (`set` without force)
    IfAbsent,
    /// Store unconditionally (`set` with force)
    Overwrite,
    /// Store only if the key already exists (`replace`)
    IfPresent,
}

impl WriteMode {
    /// Mode used by `set(force)`
    pub fn from_force(force: bool) -> Self {
        if force {
            WriteMode::Overwrite
        } else {
            WriteMode::IfAbsent
        }
    }
}

/// Entry lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Expiry {
    /// No expiration requested. Redis keeps an existing TTL on overwrite.
    #[default]
    Never,
    /// Expire after the given duration
    After(Duration),
}

impl Expiry {
    pub fn secs(seconds: u64) -> Self {
        Self::from(seconds)
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Expiry::Never => None,
            Expiry::After(ttl) => Some(*ttl),
        }
    }

    /// Whole seconds, `0` for no expiry
    ///
    /// Sub-second durations round up so a short TTL is never read as "forever".
    pub fn as_secs(&self) -> u64 {
        match self {
            Expiry::Never => 0,
            Expiry::After(ttl) => {
                let secs = ttl.as_secs();
                if ttl.subsec_nanos() > 0 { secs + 1 } else { secs.max(1) }
            }
        }
    }
}

impl From<u64> for Expiry {
    fn from(seconds: u64) -> Self {
        if seconds == 0 {
            Expiry::Never
        } else {
            Expiry::After(Duration::from_secs(seconds))
        }
    }
}

impl From<u32> for Expiry {
    fn from(seconds: u32) -> Self {
        Expiry::from(u64::from(seconds))
    }
}

impl From<i32> for Expiry {
    fn from(seconds: i32) -> Self {
        Expiry::from(u64::try_from(seconds).unwrap_or(0))
    }
}

impl From<Duration> for Expiry {
    fn from(ttl: Duration) -> Self {
        if ttl.is_zero() {
            Expiry::Never
        } else {
            Expiry::After(ttl)
        }
    }
}

impl From<Option<Duration>> for Expiry {
    fn from(ttl: Option<Duration>) -> Self {
        ttl.map(Expiry::from).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_means_never() {
        assert_eq!(Expiry::from(0u64), Expiry::Never);
        assert_eq!(Expiry::from(0), Expiry::Never);
        assert_eq!(Expiry::from(Duration::ZERO), Expiry::Never);
        assert_eq!(Expiry::Never.as_secs(), 0);
    }

    #[test]
    fn test_seconds() {
        let expiry = Expiry::secs(60);
        assert_eq!(expiry.as_duration(), Some(Duration::from_secs(60)));
        assert_eq!(expiry.as_secs(), 60);
    }

    #[test]
    fn test_sub_second_rounds_up() {
        assert_eq!(Expiry::from(Duration::from_millis(200)).as_secs(), 1);
        assert_eq!(Expiry::from(Duration::from_millis(1500)).as_secs(), 2);
    }

    #[test]
    fn test_negative_is_never() {
        assert_eq!(Expiry::from(-5), Expiry::Never);
    }

    #[test]
    fn test_write_mode_from_force() {
        assert_eq!(WriteMode::from_force(false), WriteMode::IfAbsent);
        assert_eq!(WriteMode::from_force(true), WriteMode::Overwrite);
    }
}
