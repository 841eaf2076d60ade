use super::RingError;
use std::env;

/// Initial storage size when the caller does not pick one.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Capacity below which growth doubles instead of stepping by a quarter.
pub const DEFAULT_GROW_THRESHOLD: usize = 4 * 1024;

/// Sizing policy for a [`RingBuffer`](super::RingBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingConfig {
    /// Storage allocated at construction.
    pub initial_capacity: usize,
    /// Tail room under which `rewind` compacts or grows.
    pub min_growth: usize,
    /// Capacity past which growth switches from doubling to 1.25x steps.
    pub grow_threshold: usize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_BUFFER_SIZE,
            min_growth: DEFAULT_BUFFER_SIZE,
            grow_threshold: DEFAULT_GROW_THRESHOLD,
        }
    }
}

impl RingConfig {
    pub const ENV_INITIAL_CAPACITY: &'static str = "SOCKRING_INITIAL_CAPACITY";
    pub const ENV_MIN_GROWTH: &'static str = "SOCKRING_MIN_GROWTH";
    pub const ENV_GROW_THRESHOLD: &'static str = "SOCKRING_GROW_THRESHOLD";

    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..Self::default()
        }
    }

    /// Defaults overridden by any `SOCKRING_*` variables that are set.
    ///
    /// # Errors
    ///
    /// Returns `RingError::InvalidConfig` when a variable is not a number or
    /// the resulting config fails [`validate`](Self::validate).
    pub fn from_env() -> Result<Self, RingError> {
        let mut config = Self::default();
        if let Some(v) = read_var(Self::ENV_INITIAL_CAPACITY)? {
            config.initial_capacity = v;
        }
        if let Some(v) = read_var(Self::ENV_MIN_GROWTH)? {
            config.min_growth = v;
        }
        if let Some(v) = read_var(Self::ENV_GROW_THRESHOLD)? {
            config.grow_threshold = v;
        }
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if the initial capacity or the grow threshold is zero.
    pub fn validate(&self) -> Result<(), RingError> {
        if self.initial_capacity == 0 {
            return Err(RingError::InvalidCapacity {
                capacity: 0,
                reason: "must be greater than zero",
            });
        }
        if self.grow_threshold == 0 {
            return Err(RingError::InvalidConfig {
                field: "grow_threshold",
                value: "0".to_string(),
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }
}

fn read_var(name: &'static str) -> Result<Option<usize>, RingError> {
    let Ok(raw) = env::var(name) else {
        return Ok(None);
    };
    match raw.trim().parse() {
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(RingError::InvalidConfig {
            field: name,
            value: raw,
            reason: "not an unsigned integer",
        }),
    }
}
