//! Progress generation for simulated uploads.
//!
//! A strategy produces the whole plan for one file up front: a list of
//! percentage increments, each followed by a pause. `Stepper` applies a
//! plan and keeps the progress invariants (monotonic, clamped, ends at 100).

use std::{collections::VecDeque, ops::RangeInclusive, time::Duration};

use rand::Rng;

use crate::{
    constants::{PROGRESS_DELTA_MAX, PROGRESS_DELTA_MIN, STEP_PAUSE_MAX, STEP_PAUSE_MIN},
    models::queue::PendingFile,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressStep {
    /// Percentage points added by this step.
    pub delta: f64,
    /// Pause after this step.
    pub pause: Duration,
}

pub trait ProgressStrategy: Send + Sync {
    fn plan(&self, file: &PendingFile) -> Vec<ProgressStep>;
}

/// Smallest increment a random plan may use.
const MIN_DELTA: f64 = 0.5;

/// Random increments and pauses within configured ranges.
#[derive(Clone, Debug)]
pub struct RandomProgress {
    delta_min: f64,
    delta_max: f64,
    pause_min: Duration,
    pause_max: Duration,
}

impl Default for RandomProgress {
    fn default() -> Self {
        Self::new(
            PROGRESS_DELTA_MIN..=PROGRESS_DELTA_MAX,
            STEP_PAUSE_MIN..=STEP_PAUSE_MAX,
        )
    }
}

impl RandomProgress {
    /// Build from increment and pause ranges.
    ///
    /// Increments are clamped to `MIN_DELTA..=100`; non-finite bounds fall
    /// back to the defaults. Reversed ranges collapse to their lower bound.
    pub fn new(deltas: RangeInclusive<f64>, pauses: RangeInclusive<Duration>) -> Self {
        let bound = |value: f64, fallback: f64| {
            let value = if value.is_finite() { value } else { fallback };
            value.clamp(MIN_DELTA, 100.0)
        };
        let delta_min = bound(*deltas.start(), PROGRESS_DELTA_MIN);
        let delta_max = bound(*deltas.end(), PROGRESS_DELTA_MAX).max(delta_min);
        let pause_min = *pauses.start();
        let pause_max = (*pauses.end()).max(pause_min);
        Self {
            delta_min,
            delta_max,
            pause_min,
            pause_max,
        }
    }

    /// Random increments without pauses.
    pub fn instant() -> Self {
        Self::new(
            PROGRESS_DELTA_MIN..=PROGRESS_DELTA_MAX,
            Duration::ZERO..=Duration::ZERO,
        )
    }
}

impl ProgressStrategy for RandomProgress {
    fn plan(&self, _file: &PendingFile) -> Vec<ProgressStep> {
        let mut rng = rand::rng();
        let mut steps = Vec::new();
        let mut total = 0.0;
        let pause_min = self.pause_min.as_millis() as u64;
        let pause_max = self.pause_max.as_millis() as u64;
        while total < 100.0 {
            let delta = rng.random_range(self.delta_min..=self.delta_max);
            let pause = Duration::from_millis(rng.random_range(pause_min..=pause_max));
            total += delta;
            steps.push(ProgressStep { delta, pause });
        }
        steps
    }
}

/// Fixed increments supplied by the caller, with no pauses.
#[derive(Clone, Debug, Default)]
pub struct ScriptedProgress {
    deltas: Vec<f64>,
}

impl ScriptedProgress {
    pub fn new(deltas: impl Into<Vec<f64>>) -> Self {
        Self {
            deltas: deltas.into(),
        }
    }
}

impl ProgressStrategy for ScriptedProgress {
    fn plan(&self, _file: &PendingFile) -> Vec<ProgressStep> {
        self.deltas
            .iter()
            .map(|&delta| ProgressStep {
                delta,
                pause: Duration::ZERO,
            })
            .collect()
    }
}

/// Applies a plan to a progress value.
///
/// Negative or non-finite increments count as zero, progress never exceeds
/// 100, and once the plan runs out the next step jumps straight to 100.
pub struct Stepper {
    progress: f64,
    steps: VecDeque<ProgressStep>,
}

impl Stepper {
    pub fn new(plan: Vec<ProgressStep>) -> Self {
        Self {
            progress: 0.0,
            steps: plan.into(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.progress >= 100.0
    }

    /// Advance one step; returns the new progress and the pause to take.
    /// Returns `None` once progress has reached 100.
    pub fn advance(&mut self) -> Option<(f64, Duration)> {
        if self.is_done() {
            return None;
        }
        let (delta, pause) = match self.steps.pop_front() {
            Some(step) => (step.delta, step.pause),
            None => (100.0, Duration::ZERO),
        };
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.progress = (self.progress + delta).min(100.0);
        Some((self.progress, pause))
    }
}

/// Bytes per second after `elapsed` with `progress` percent of `size` sent.
pub fn speed(size: u64, progress: f64, elapsed: Duration) -> Option<f64> {
    let secs = elapsed.as_secs_f64();
    if progress <= 0.0 || secs <= 0.0 {
        return None;
    }
    Some(size as f64 * (progress / 100.0) / secs)
}

/// Seconds left, extrapolated from the time spent so far.
///
/// Unknown at 0 % and once complete.
pub fn time_remaining(progress: f64, elapsed: Duration) -> Option<f64> {
    if progress <= 0.0 || progress >= 100.0 {
        return None;
    }
    Some(elapsed.as_secs_f64() * ((100.0 - progress) / progress))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(plan: Vec<ProgressStep>) -> Vec<f64> {
        let mut stepper = Stepper::new(plan);
        let mut seen = Vec::new();
        while let Some((p, _)) = stepper.advance() {
            seen.push(p);
        }
        seen
    }

    #[test]
    fn clamps_to_exactly_one_hundred() {
        let file = PendingFile::sized("a", 10, None);
        let seen = run(ScriptedProgress::new(vec![30.0, 30.0, 30.0, 30.0]).plan(&file));
        assert_eq!(seen, vec![30.0, 60.0, 90.0, 100.0]);
    }

    #[test]
    fn exhausted_plan_jumps_to_completion() {
        let file = PendingFile::sized("a", 10, None);
        let seen = run(ScriptedProgress::new(vec![10.0]).plan(&file));
        assert_eq!(seen, vec![10.0, 100.0]);
        assert_eq!(run(Vec::new()), vec![100.0]);
    }

    #[test]
    fn negative_steps_never_regress() {
        let file = PendingFile::sized("a", 10, None);
        let seen = run(ScriptedProgress::new(vec![40.0, -25.0, f64::NAN, 70.0]).plan(&file));
        assert_eq!(seen, vec![40.0, 40.0, 40.0, 100.0]);
    }

    #[test]
    fn random_plan_is_monotonic_and_in_range() {
        let file = PendingFile::sized("a", 10, None);
        for _ in 0..50 {
            let plan = RandomProgress::default().plan(&file);
            for step in &plan {
                assert!((PROGRESS_DELTA_MIN..=PROGRESS_DELTA_MAX).contains(&step.delta));
                assert!(step.pause >= STEP_PAUSE_MIN && step.pause <= STEP_PAUSE_MAX);
            }
            let seen = run(plan);
            assert!(seen.windows(2).all(|w| w[0] <= w[1]));
            assert_eq!(seen.last().copied(), Some(100.0));
        }
    }

    #[test]
    fn out_of_range_bounds_are_clamped() {
        let file = PendingFile::sized("a", 10, None);

        let wide = RandomProgress::new(1.0..=f64::INFINITY, STEP_PAUSE_MIN..=STEP_PAUSE_MAX);
        let plan = wide.plan(&file);
        assert!(plan.iter().all(|s| s.delta.is_finite() && s.delta <= 100.0));

        let tiny = RandomProgress::new(0.0..=1e-12, Duration::ZERO..=Duration::ZERO);
        let plan = tiny.plan(&file);
        assert!(plan.len() <= (100.0 / MIN_DELTA) as usize + 1, "{}", plan.len());

        let reversed = RandomProgress::new(f64::NAN..=-5.0, STEP_PAUSE_MAX..=STEP_PAUSE_MIN);
        let plan = reversed.plan(&file);
        assert!(plan.iter().all(|s| s.delta >= PROGRESS_DELTA_MIN));
        assert!(plan.iter().all(|s| s.pause == STEP_PAUSE_MAX));
        assert_eq!(run(plan).last().copied(), Some(100.0));
    }

    #[test]
    fn instant_plan_has_no_pauses() {
        let file = PendingFile::sized("a", 10, None);
        let plan = RandomProgress::instant().plan(&file);
        assert!(plan.iter().all(|s| s.pause.is_zero()));
    }

    #[test]
    fn derived_figures_guard_degenerate_cases() {
        assert_eq!(speed(1000, 0.0, Duration::from_secs(1)), None);
        assert_eq!(speed(1000, 50.0, Duration::ZERO), None);
        assert_eq!(speed(1000, 50.0, Duration::from_secs(1)), Some(500.0));

        assert_eq!(time_remaining(0.0, Duration::from_secs(1)), None);
        assert_eq!(time_remaining(100.0, Duration::from_secs(1)), None);
        assert_eq!(time_remaining(25.0, Duration::from_secs(2)), Some(6.0));
    }
}
