//! Remote attempts with a local fallback.

use rand::Rng;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Artificial delay added to every remote attempt, so the offline experience
/// feels like the online one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyRange {
    min: Duration,
    max: Duration,
}

impl LatencyRange {
    /// Bounds are reordered if given backwards.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max { Self { min, max } } else { Self { min: max, max: min } }
    }

    /// No artificial delay at all.
    pub const fn none() -> Self {
        Self { min: Duration::ZERO, max: Duration::ZERO }
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// A uniformly random duration within the range (inclusive).
    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }

    async fn wait(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for LatencyRange {
    fn default() -> Self {
        Self::new(Duration::from_millis(140), Duration::from_millis(320))
    }
}

/// Where the result of a write or fetch came from.
///
/// A write starts as a draft applied to the local cache, then either the
/// remote confirms it ([`Remote`](Outcome::Remote)) or the draft stands
/// ([`Fallback`](Outcome::Fallback)). [`Local`](Outcome::Local) means the
/// remote was intentionally not consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Remote(T),
    Local(T),
    Fallback(T),
}

impl<T> Outcome<T> {
    pub fn fallback_used(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Remote(value) | Self::Local(value) | Self::Fallback(value) => value,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Remote(value) => Outcome::Remote(f(value)),
            Self::Local(value) => Outcome::Local(f(value)),
            Self::Fallback(value) => Outcome::Fallback(f(value)),
        }
    }
}

/// An [`Outcome`] and how long it took to settle, artificial delay included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempted<T> {
    pub outcome: Outcome<T>,
    pub elapsed: Duration,
}

/// Run `remote`; on failure, log it and settle on `local` instead.
///
/// `local` is a future so that it is only evaluated when needed.
pub(crate) async fn attempt<T, E, R, L>(latency: LatencyRange, operation: &'static str, remote: R, local: L) -> Attempted<T>
where
    E: Debug,
    R: Future<Output = Result<T, E>>,
    L: Future<Output = T>,
{
    let started = Instant::now();
    let outcome = match remote.await {
        Ok(value) => {
            latency.wait().await;
            Outcome::Remote(value)
        },
        Err(err) => {
            tracing::debug!(operation, error = ?err, "Remote catalog failed, falling back to cached library data");
            latency.wait().await;
            Outcome::Fallback(local.await)
        },
    };
    Attempted { outcome, elapsed: started.elapsed() }
}

/// Settle on `local` without consulting the remote, still paying the delay.
pub(crate) async fn skip<T, L>(latency: LatencyRange, operation: &'static str, local: L) -> Attempted<T>
where
    L: Future<Output = T>,
{
    let started = Instant::now();
    tracing::trace!(operation, "Remote catalog skipped");
    latency.wait().await;
    let outcome = Outcome::Local(local.await);
    Attempted { outcome, elapsed: started.elapsed() }
}
