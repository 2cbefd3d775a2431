//! Combo multiplier and score milestones

use serde::{Deserialize, Serialize};

use crate::consts::{COLLECT_BASE_POINTS, COMBO_TIMEOUT_MS, MAX_COMBO_MULTIPLIER, MILESTONES};

/// Points granted for one collect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Award {
    /// Combo count after this collect
    pub combo: u32,
    pub points: u64,
}

/// Rolling combo state plus the last milestone crossed in this run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComboTracker {
    pub count: u32,
    /// Simulation time (ms) of the previous collect
    pub last_collect_ms: Option<f64>,
    pub last_milestone: u64,
}

impl ComboTracker {
    /// Current multiplier (capped)
    pub fn multiplier(&self) -> u32 {
        self.count.min(MAX_COMBO_MULTIPLIER)
    }

    /// Register a collect at `now_ms` and return what it is worth
    pub fn collect(&mut self, now_ms: f64) -> Award {
        let within_window = self
            .last_collect_ms
            .is_some_and(|last| now_ms - last < COMBO_TIMEOUT_MS);

        self.count = if within_window { self.count + 1 } else { 1 };
        self.last_collect_ms = Some(now_ms);

        Award {
            combo: self.count,
            points: COLLECT_BASE_POINTS * self.multiplier() as u64,
        }
    }

    /// First milestone at or below `score` that has not fired yet
    pub fn check_milestone(&mut self, score: u64) -> Option<u64> {
        let next = MILESTONES
            .iter()
            .copied()
            .find(|&m| score >= m && self.last_milestone < m)?;
        self.last_milestone = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_three_quick_collects() {
        let mut combo = ComboTracker::default();
        let total: u64 = [0.0, 400.0, 800.0]
            .iter()
            .map(|&t| combo.collect(t).points)
            .sum();
        assert_eq!(total, 60);
        assert_eq!(combo.count, 3);
    }

    #[test]
    fn test_gap_resets_combo() {
        let mut combo = ComboTracker::default();
        combo.collect(0.0);
        combo.collect(1000.0);
        assert_eq!(combo.count, 2);
        let award = combo.collect(1000.0 + COMBO_TIMEOUT_MS);
        assert_eq!(award.combo, 1);
        assert_eq!(award.points, 10);
    }

    #[test]
    fn test_multiplier_caps_at_ten() {
        let mut combo = ComboTracker::default();
        let last = (0..15)
            .map(|i| combo.collect(i as f64 * 100.0))
            .last()
            .unwrap();
        assert_eq!(last.combo, 15);
        assert_eq!(last.points, 100);
        assert_eq!(combo.multiplier(), 10);
    }

    #[test]
    fn test_milestones_fire_once_in_order() {
        let mut combo = ComboTracker::default();
        assert_eq!(combo.check_milestone(99), None);
        assert_eq!(combo.check_milestone(100), Some(100));
        assert_eq!(combo.check_milestone(120), None);
        // Jumping past several thresholds fires only the lowest pending one
        assert_eq!(combo.check_milestone(800), Some(250));
        assert_eq!(combo.check_milestone(800), Some(500));
        assert_eq!(combo.check_milestone(800), Some(750));
        assert_eq!(combo.check_milestone(800), None);
    }

    proptest! {
        #[test]
        fn prop_combo_rules(gaps in prop::collection::vec(0.0f64..6000.0, 1..40)) {
            let mut combo = ComboTracker::default();
            let mut now = 0.0;
            combo.collect(now);
            for gap in gaps {
                now += gap;
                let before = combo.count;
                let award = combo.collect(now);
                if gap < COMBO_TIMEOUT_MS {
                    prop_assert_eq!(award.combo, before + 1);
                } else {
                    prop_assert_eq!(award.combo, 1);
                }
                prop_assert_eq!(award.points, 10 * award.combo.min(10) as u64);
            }
        }

        #[test]
        fn prop_milestones_strictly_ascending(scores in prop::collection::vec(0u64..6000, 1..60)) {
            let mut combo = ComboTracker::default();
            let mut fired = Vec::new();
            let mut score = 0;
            for s in scores {
                score += s;
                if let Some(m) = combo.check_milestone(score) {
                    prop_assert!(m <= score);
                    fired.push(m);
                }
            }
            prop_assert!(fired.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
