//! Run configuration for the supervisor and the visualizer binary.

use std::time::Duration;

use crate::error::{BufferError, Result};

/// Smallest capacity the supervisor accepts.
pub const MIN_CAPACITY: usize = 1;
/// Largest capacity the supervisor accepts.
pub const MAX_CAPACITY: usize = 30;
pub const DEFAULT_CAPACITY: usize = 20;
pub const DEFAULT_PRODUCERS: usize = 3;
pub const DEFAULT_CONSUMERS: usize = 3;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Check a requested capacity against the supervisor's knob range.
pub fn validate_capacity(capacity: i64) -> Result<usize> {
    match usize::try_from(capacity) {
        Ok(capacity) if (MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity) => Ok(capacity),
        _ => Err(BufferError::capacity(capacity)),
    }
}

/// Idle time between two iterations of a worker loop, drawn uniformly from `[min, max]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pacing {
    min: Duration,
    max: Duration,
}

impl Pacing {
    pub fn new(min: Duration, max: Duration) -> Result<Self> {
        if min > max {
            return Err(BufferError::config(format!(
                "minimum delay {min:?} exceeds maximum delay {max:?}"
            )));
        }
        Ok(Self { min, max })
    }

    /// One to three seconds, the classic demo cadence.
    pub fn reference() -> Self {
        Self {
            min: Duration::from_secs(1),
            max: Duration::from_secs(3),
        }
    }

    pub fn fixed(delay: Duration) -> Self {
        Self { min: delay, max: delay }
    }

    /// No idle time at all. Useful for tests and throughput runs.
    pub fn immediate() -> Self {
        Self::fixed(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn next_delay(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let span = (self.max - self.min).as_millis();
        let span = u64::try_from(span).unwrap_or(u64::MAX);
        self.min + Duration::from_millis(fastrand::u64(0..=span))
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::reference()
    }
}

/// A capacity change the visualizer applies `at` seconds into the run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Resize {
    pub at: Duration,
    pub capacity: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemoConfig {
    pub capacity: usize,
    pub producers: usize,
    pub consumers: usize,
    pub pacing: Pacing,
    pub poll_interval: Duration,
    /// Stop after this long. `None` runs until interrupted.
    pub duration: Option<Duration>,
    pub resizes: Vec<Resize>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            producers: DEFAULT_PRODUCERS,
            consumers: DEFAULT_CONSUMERS,
            pacing: Pacing::reference(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            duration: None,
            resizes: Vec::new(),
        }
    }
}

impl DemoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_producers(mut self, producers: usize) -> Self {
        self.producers = producers;
        self
    }

    pub fn with_consumers(mut self, consumers: usize) -> Self {
        self.consumers = consumers;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_resize(mut self, at: Duration, capacity: usize) -> Self {
        self.resizes.push(Resize { at, capacity });
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_capacity(self.capacity as i64)?;
        for resize in &self.resizes {
            validate_capacity(resize.capacity as i64)?;
        }
        if self.producers + self.consumers == 0 {
            return Err(BufferError::config("at least one producer or consumer is required"));
        }
        if self.poll_interval.is_zero() {
            return Err(BufferError::config("poll interval must be greater than zero"));
        }
        Ok(())
    }

    /// Parse command-line flags on top of the defaults.
    ///
    /// Accepted flags: `--capacity N`, `--producers N`, `--consumers N`,
    /// `--min-delay-ms N`, `--max-delay-ms N`, `--poll-ms N`,
    /// `--duration-secs N` and the repeatable `--resize CAP@SECS`.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        let mut min_delay = config.pacing.min();
        let mut max_delay = config.pacing.max();
        let mut args = args.into_iter();

        while let Some(flag) = args.next() {
            let flag = flag.as_ref().to_owned();
            let value = args
                .next()
                .ok_or_else(|| BufferError::config(format!("missing value for {flag}")))?;
            let value = value.as_ref();

            match flag.as_str() {
                "--capacity" => {
                    config.capacity = validate_capacity(parse_number(&flag, value)?)?;
                }
                "--producers" => config.producers = parse_count(&flag, value)?,
                "--consumers" => config.consumers = parse_count(&flag, value)?,
                "--min-delay-ms" => {
                    min_delay = Duration::from_millis(parse_count(&flag, value)? as u64)
                }
                "--max-delay-ms" => {
                    max_delay = Duration::from_millis(parse_count(&flag, value)? as u64)
                }
                "--poll-ms" => {
                    config.poll_interval = Duration::from_millis(parse_count(&flag, value)? as u64)
                }
                "--duration-secs" => {
                    config.duration = Some(Duration::from_secs(parse_count(&flag, value)? as u64))
                }
                "--resize" => config.resizes.push(parse_resize(value)?),
                other => return Err(BufferError::config(format!("unknown flag {other}"))),
            }
        }

        config.pacing = Pacing::new(min_delay, max_delay)?;
        config.resizes.sort_by_key(|resize| resize.at);
        config.validate()?;
        Ok(config)
    }
}

fn parse_number(flag: &str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|e| BufferError::config(format!("{flag}: '{value}' is not a number ({e})")))
}

fn parse_count(flag: &str, value: &str) -> Result<usize> {
    let number = parse_number(flag, value)?;
    usize::try_from(number)
        .map_err(|_| BufferError::config(format!("{flag}: '{value}' must not be negative")))
}

fn parse_resize(value: &str) -> Result<Resize> {
    let (capacity, at) = value
        .split_once('@')
        .ok_or_else(|| BufferError::config(format!("--resize: expected CAP@SECS, got '{value}'")))?;
    let capacity = validate_capacity(parse_number("--resize", capacity)?)?;
    let at = Duration::from_secs(parse_count("--resize", at)? as u64);
    Ok(Resize { at, capacity })
}
