//! Difficulty presets
//!
//! A preset is picked between runs and stays fixed for the whole run.

use serde::{Deserialize, Serialize};

/// Selectable difficulty levels, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Step through the presets like the menu arrows do (wraps around)
    pub fn cycle(self, direction: i8) -> Self {
        let len = Self::ALL.len() as i64;
        let index = Self::ALL.iter().position(|d| *d == self).unwrap_or(1) as i64;
        let next = (index + direction as i64).rem_euclid(len);
        Self::ALL[next as usize]
    }

    /// Tuning values for this preset
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                name: "Relaxed Garden Stroll",
                base_speed: 0.10,
                acceleration: 0.001,
                max_speed: 0.20,
                obstacle_interval: (2500.0, 3500.0),
                collectible_interval: (1500.0, 2500.0),
            },
            Difficulty::Medium => DifficultyProfile {
                name: "Happy Run",
                base_speed: 0.15,
                acceleration: 0.002,
                max_speed: 0.35,
                obstacle_interval: (1000.0, 2000.0),
                collectible_interval: (2000.0, 4000.0),
            },
            Difficulty::Hard => DifficultyProfile {
                name: "Speed Bunny Challenge",
                base_speed: 0.22,
                acceleration: 0.003,
                max_speed: 0.50,
                obstacle_interval: (800.0, 1500.0),
                collectible_interval: (3000.0, 5000.0),
            },
        }
    }
}

/// Speed and spawn tuning for one difficulty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Display name shown in the menu
    pub name: &'static str,
    /// Scroll speed at score 0 (units/tick)
    pub base_speed: f32,
    /// Speed gained per point of score, scaled by 0.1
    pub acceleration: f32,
    /// Speed ceiling
    pub max_speed: f32,
    /// Base obstacle spawn interval range (ms)
    pub obstacle_interval: (f64, f64),
    /// Base collectible spawn interval range (ms)
    pub collectible_interval: (f64, f64),
}

impl DifficultyProfile {
    /// Target scroll speed for a score, clamped to `[base_speed, max_speed]`
    pub fn speed_for_score(&self, score: u64) -> f32 {
        let raw = self.base_speed + score as f32 * self.acceleration * 0.1;
        raw.min(self.max_speed).max(self.base_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_roundtrip() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(Difficulty::Easy.cycle(-1), Difficulty::Hard);
        assert_eq!(Difficulty::Hard.cycle(1), Difficulty::Easy);
        assert_eq!(Difficulty::Medium.cycle(1), Difficulty::Hard);
    }

    #[test]
    fn test_speed_for_score() {
        let p = Difficulty::Medium.profile();
        assert!((p.speed_for_score(0) - 0.15).abs() < 1e-6);
        // 0.15 + 100 * 0.002 * 0.1 = 0.17
        assert!((p.speed_for_score(100) - 0.17).abs() < 1e-6);
        // Clamped at the ceiling
        assert!((p.speed_for_score(100_000) - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_speed_clamped_for_every_preset() {
        for d in Difficulty::ALL {
            let p = d.profile();
            for score in [0u64, 10, 500, 5_000, 1_000_000] {
                let s = p.speed_for_score(score);
                assert!(s >= p.base_speed && s <= p.max_speed, "{:?} {}", d, score);
            }
        }
    }
}
