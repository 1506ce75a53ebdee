use std::time::Duration;

use rand::Rng;

use pulse_core::{AnalysisMode, Complexity};

/// Timing and policy knobs for the worker scheduler.
///
/// Simulated durations scale linearly with `time_scale`; tests run with a
/// small scale to keep wall-clock time down without changing behavior.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Default selection policy; switchable at runtime via
    /// [`AnalysisEngine::set_mode`](crate::AnalysisEngine::set_mode).
    pub mode: AnalysisMode,
    /// Discrete progress steps per phase.
    pub progress_steps: u8,
    /// Sleep between selection attempts when no node is eligible.
    pub idle_backoff: Duration,
    /// Bounded uniform jitter on phase durations, as a fraction (0.15 = ±15%).
    pub jitter: f64,
    /// Multiplier applied to every simulated duration.
    pub time_scale: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: AnalysisMode::Progressive,
            progress_steps: 10,
            idle_backoff: Duration::from_millis(100),
            jitter: 0.15,
            time_scale: 1.0,
        }
    }
}

impl EngineConfig {
    /// Wall-clock cost of one phase for a node of the given complexity.
    /// `phase_index` is 1-based; later phases take longer.
    pub fn phase_duration<R: Rng>(
        &self,
        complexity: Complexity,
        phase_index: u8,
        rng: &mut R,
    ) -> Duration {
        let base = complexity.base_millis() as f64;
        let jitter = if self.jitter > 0.0 {
            rng.gen_range(-self.jitter..=self.jitter)
        } else {
            0.0
        };
        let millis = base * phase_multiplier(phase_index) * (1.0 + jitter) * self.time_scale;
        Duration::from_secs_f64((millis / 1000.0).max(0.0))
    }

    /// Idle backoff scaled like the phase durations.
    pub fn scaled_backoff(&self) -> Duration {
        Duration::from_secs_f64(self.idle_backoff.as_secs_f64() * self.time_scale)
    }
}

/// Later phases cost more: ×1 for phase 1, ×1.5 for phase 2, ×2 beyond.
pub(crate) fn phase_multiplier(phase_index: u8) -> f64 {
    match phase_index {
        0 | 1 => 1.0,
        2 => 1.5,
        _ => 2.0,
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn multipliers_grow_with_phase_index() {
        assert_eq!(phase_multiplier(1), 1.0);
        assert_eq!(phase_multiplier(2), 1.5);
        assert_eq!(phase_multiplier(3), 2.0);
        assert_eq!(phase_multiplier(7), 2.0);
    }

    #[test]
    fn duration_without_jitter_is_deterministic() {
        let config = EngineConfig {
            jitter: 0.0,
            ..EngineConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            config.phase_duration(Complexity::High, 1, &mut rng),
            Duration::from_millis(1000)
        );
        assert_eq!(
            config.phase_duration(Complexity::High, 2, &mut rng),
            Duration::from_millis(1500)
        );
        assert_eq!(
            config.phase_duration(Complexity::Low, 1, &mut rng),
            Duration::from_millis(400)
        );
    }

    #[test]
    fn jitter_stays_bounded() {
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let d = config.phase_duration(Complexity::Medium, 1, &mut rng);
            let millis = d.as_secs_f64() * 1000.0;
            assert!((700.0 * 0.85..=700.0 * 1.15).contains(&millis), "{millis}");
        }
    }

    #[test]
    fn time_scale_compresses_durations() {
        let config = EngineConfig {
            jitter: 0.0,
            time_scale: 0.01,
            ..EngineConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(
            config.phase_duration(Complexity::High, 1, &mut rng),
            Duration::from_millis(10)
        );
        assert_eq!(config.scaled_backoff(), Duration::from_millis(1));
    }
}
