use crate::{
    decay::{Decay, Exponential},
    ds::ValueChanges,
};

/// Exploration rate driven by learning progress rather than elapsed episodes
///
/// With `x` the fraction of interior cells whose value still changed on their last visit,
/// the rate is `1 - e^(-k x)` for decay factor `k`, capped at [`MAX_RATE`] since the curve
/// saturates to `1` in floating point for large `k`. Once no cell changes any more the rate is
/// exactly `0`.
/// Largest exploration rate handed out, so some exploitation always remains
pub const MAX_RATE: f64 = 1.0 - f64::EPSILON;

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSchedule {
    curve: Exponential,
}

impl ProgressSchedule {
    /// **Errors** if `decay_factor` is not a positive finite number
    pub fn new(decay_factor: f64) -> Result<Self, String> {
        Ok(Self {
            curve: Exponential::new(decay_factor, 0.0, 1.0)?,
        })
    }

    /// Exploration rate in `[0,1)` for the given tracker state
    pub fn rate(&self, changes: &ValueChanges) -> f64 {
        let unoptimal = changes.unoptimal_count();
        if unoptimal == 0 {
            return 0.0;
        }

        let x = unoptimal as f64 / changes.learnable_total() as f64;
        self.curve.evaluate(x).min(MAX_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gym::{Maze, MazeConfig};

    fn tracker() -> ValueChanges {
        ValueChanges::for_maze(&Maze::new(MazeConfig::default()).unwrap())
    }

    /// Learnable cells of the default maze in row-major order
    fn learnable() -> Vec<(usize, usize)> {
        let maze = Maze::new(MazeConfig::default()).unwrap();
        maze.cells()
            .indexed_iter()
            .map(|(pos, _)| pos)
            .filter(|&pos| maze.is_learnable(pos))
            .collect()
    }

    #[test]
    fn initial_rate() {
        let schedule = ProgressSchedule::new(5.0).unwrap();
        let rate = schedule.rate(&tracker());
        assert_eq!(rate, 1.0 - f64::exp(-5.0 * 14.0 / 16.0));
    }

    #[test]
    fn settled_tracker_gives_exact_zero() {
        let mut changes = tracker();
        for pos in learnable() {
            changes.record(pos, 0.0);
        }
        for k in [0.1, 1.0, 5.0, 1e6] {
            let schedule = ProgressSchedule::new(k).unwrap();
            assert_eq!(schedule.rate(&changes), 0.0, "Decay factor {k}");
        }
    }

    #[test]
    fn rate_is_monotonic_in_unsettled_count() {
        for k in [5.0, 40.0, 50.0, 1e6] {
            let schedule = ProgressSchedule::new(k).unwrap();
            let mut changes = tracker();
            let mut previous = schedule.rate(&changes);
            assert!((0.0..1.0).contains(&previous), "Decay factor {k}");

            for pos in learnable() {
                changes.record(pos, 0.0);
                let rate = schedule.rate(&changes);
                assert!(rate <= previous, "Rate rose from {previous} to {rate}");
                assert!((0.0..1.0).contains(&rate), "Decay factor {k}");
                previous = rate;
            }
            assert_eq!(previous, 0.0);
        }
    }

    #[test]
    fn saturated_curve_is_capped() {
        let schedule = ProgressSchedule::new(50.0).unwrap();
        assert_eq!(schedule.rate(&tracker()), MAX_RATE);
    }

    #[test]
    fn rejects_invalid_decay_factor() {
        assert!(ProgressSchedule::new(0.0).is_err());
        assert!(ProgressSchedule::new(-2.0).is_err());
    }
}
