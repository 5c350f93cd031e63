use crate::config::Config;
use crate::services::orchestrator::DatasetId;
use crate::utils::format::{Unit, format_value, reconstruct};

/// Snapshot of a count-up animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    /// Eased progress in `[0, 1]`
    pub progress: f64,
    pub has_started: bool,
    pub target_value: f64,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            progress: 0.0,
            has_started: false,
            target_value: 0.0,
        }
    }
}

/// Cubic ease-out over `t` in `[0, 1]`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Resolves the target and unit of an animated KPI.
///
/// The numeric value wins; otherwise the number is reconstructed from a
/// previously formatted string. The unit is the hint, else the one inferred
/// from the string, else [`Unit::Count`].
pub fn resolve_target(
    value: Option<f64>,
    formatted: Option<&str>,
    unit_hint: Option<Unit>,
) -> Option<(f64, Unit)> {
    let reconstructed = formatted.and_then(reconstruct);
    let unit = unit_hint
        .or(reconstructed.map(|(_, unit)| unit))
        .unwrap_or(Unit::Count);
    let target = value
        .filter(|v| v.is_finite())
        .or(reconstructed.map(|(v, _)| v))?;
    Some((target, unit))
}

/// Drives a KPI from 0 to its target once it becomes visible.
///
/// Arming with the same dataset is a no-op, so repaints never restart the
/// animation; a new dataset resets progress to exactly 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Animator {
    state: AnimationState,
    unit: Unit,
    dataset: Option<DatasetId>,
    elapsed_ms: u32,
    duration_ms: u32,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(Config::ANIMATION_DURATION_MS)
    }
}

impl Animator {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            state: AnimationState::default(),
            unit: Unit::Count,
            dataset: None,
            elapsed_ms: 0,
            duration_ms: duration_ms.max(1),
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn dataset(&self) -> Option<DatasetId> {
        self.dataset
    }

    /// Prepares a cycle for `dataset`. Returns `true` if it re-armed.
    pub fn arm(&mut self, dataset: DatasetId, target: f64, unit: Unit) -> bool {
        if self.dataset == Some(dataset) {
            return false;
        }

        self.dataset = Some(dataset);
        self.unit = unit;
        self.elapsed_ms = 0;
        self.state = AnimationState {
            progress: 0.0,
            has_started: false,
            target_value: target,
        };
        true
    }

    /// Visibility signal. Only the first call per cycle has an effect.
    pub fn start(&mut self) {
        if self.dataset.is_some() {
            self.state.has_started = true;
        }
    }

    /// Advances by one frame and returns the new progress.
    pub fn advance(&mut self, delta_ms: u32) -> f64 {
        if !self.state.has_started || self.is_finished() {
            return self.state.progress;
        }

        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms).min(self.duration_ms);
        let eased = ease_out_cubic(f64::from(self.elapsed_ms) / f64::from(self.duration_ms));
        self.state.progress = self.state.progress.max(eased);
        self.state.progress
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    pub fn current_value(&self) -> f64 {
        self.state.target_value * self.state.progress
    }

    /// The value to paint this frame.
    pub fn rendered(&self) -> String {
        format_value(self.current_value(), self.unit)
    }
}
