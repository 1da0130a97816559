use domain::ProviderError;
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Upper bound on the latency multiplier
pub const MAX_LATENCY_SCALE: f64 = 100.0;

/// Longest delay a single simulated request may take
pub const MAX_DELAY: Duration = Duration::from_secs(60);

/// Stand-in for the network between the client and the mock backend.
///
/// Every simulated request sleeps for its nominal latency multiplied by
/// `latency_scale` (with +/-25% jitter) and fails with probability
/// `failure_rate`. Clones share the request counter.
#[derive(Debug, Clone)]
pub struct NetworkSimulator {
    latency_scale: f64,
    failure_rate: f64,
    requests: Arc<AtomicU64>,
}

impl NetworkSimulator {
    pub fn new(latency_scale: f64, failure_rate: f64) -> Self {
        let latency_scale = if latency_scale.is_nan() {
            0.0
        } else {
            latency_scale.clamp(0.0, MAX_LATENCY_SCALE)
        };
        let failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        Self {
            latency_scale,
            failure_rate,
            requests: Arc::new(AtomicU64::new(0)),
        }
    }

    /// No latency and no failures. Used by tests.
    pub fn instant() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Number of simulated requests issued so far
    pub fn requests_issued(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    /// `nominal` times the latency scale and `jitter`, capped at [`MAX_DELAY`]
    fn scaled(&self, nominal: Duration, jitter: f64) -> Duration {
        Duration::try_from_secs_f64(nominal.as_secs_f64() * self.latency_scale * jitter)
            .map_or(MAX_DELAY, |delay| delay.min(MAX_DELAY))
    }

    /// Simulates one request/response exchange for `operation`.
    pub async fn round_trip(
        &self,
        operation: &'static str,
        nominal: Duration,
    ) -> Result<(), ProviderError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        // ThreadRng is not Send, keep it out of the await below
        let (delay, fail) = {
            let mut rng = rand::thread_rng();
            let jitter = rng.gen_range(0.75..1.25);
            let delay = self.scaled(nominal, jitter);
            let fail = self.failure_rate > 0.0 && rng.gen_bool(self.failure_rate);
            (delay, fail)
        };

        tracing::debug!(operation, delay_ms = delay.as_millis() as u64, "Simulated request");
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if fail {
            tracing::debug!(operation, "Simulated request failed");
            return Err(ProviderError::NetworkSimulationFailure(operation));
        }
        Ok(())
    }
}

impl Default for NetworkSimulator {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}
