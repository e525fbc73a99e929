//! Core types for the grid-world configuration.
//!
//! - [`Position`] - A grid cell `(x, y)`, serialized as `[x, y]`
//! - [`QLearningParams`] - Hyperparameters for a training run
//! - [`ConfigField`] - Bitflags naming the store's cells

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Defaults
// =============================================================================

pub const DEFAULT_WORLD_WIDTH: i32 = 5;
pub const DEFAULT_WORLD_HEIGHT: i32 = 5;
pub const DEFAULT_START: Position = Position::new(0, 0);
pub const DEFAULT_GOAL: Position = Position::new(4, 4);
pub const DEFAULT_HOLES: [Position; 6] = [
    Position::new(1, 2),
    Position::new(2, 3),
    Position::new(3, 1),
    Position::new(4, 0),
    Position::new(0, 2),
    Position::new(4, 3),
];

// =============================================================================
// Position
// =============================================================================

/// A grid cell. `x` is the column, `y` the row.
///
/// Coordinates are signed so that any written value is representable;
/// bounds are checked by [`crate::validation`], never here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Check if this position lies inside a `width` x `height` grid.
    pub fn in_bounds(&self, width: i32, height: i32) -> bool {
        (0..width).contains(&self.x) && (0..height).contains(&self.y)
    }
}

impl From<[i32; 2]> for Position {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Position> for [i32; 2] {
    fn from(p: Position) -> Self {
        [p.x, p.y]
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

// =============================================================================
// QLearningParams
// =============================================================================

/// Hyperparameters consumed by the learning routine.
///
/// Equality compares floats by bit pattern: a NaN field equals itself, and
/// `0.0` differs from `-0.0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QLearningParams {
    /// Learning rate.
    pub alpha: f64,
    /// Discount factor.
    pub gamma: f64,
    /// Exploration probability.
    pub epsilon: f64,
    /// Amount epsilon shrinks per episode.
    pub epsilon_decay: f64,
    pub num_episodes: u32,
    /// Step limit per episode.
    pub max_steps: u32,
    /// Reward for every non-terminal step (usually negative).
    pub step_punishment: f64,
    /// Reward for falling into a hole (usually negative).
    pub hole_punishment: f64,
    /// Reward for reaching the goal.
    pub goal_reward: f64,
}

impl Default for QLearningParams {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 0.1,
            epsilon_decay: 0.003,
            num_episodes: 3000,
            max_steps: 20,
            step_punishment: -1.0,
            hole_punishment: -100.0,
            goal_reward: 100.0,
        }
    }
}

impl PartialEq for QLearningParams {
    fn eq(&self, other: &Self) -> bool {
        let floats = |p: &Self| {
            [
                p.alpha,
                p.gamma,
                p.epsilon,
                p.epsilon_decay,
                p.step_punishment,
                p.hole_punishment,
                p.goal_reward,
            ]
            .map(f64::to_bits)
        };
        floats(self) == floats(other)
            && self.num_episodes == other.num_episodes
            && self.max_steps == other.max_steps
    }
}

// =============================================================================
// ConfigField - Which cell(s) changed
// =============================================================================

bitflags::bitflags! {
    /// The store's cells as a bitfield.
    ///
    /// Combine with bitwise OR: `ConfigField::START_POSITION | ConfigField::GOAL_POSITION`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ConfigField: u8 {
        const WORLD_WIDTH = 1 << 0;
        const WORLD_HEIGHT = 1 << 1;
        const START_POSITION = 1 << 2;
        const GOAL_POSITION = 1 << 3;
        const HOLE_POSITIONS = 1 << 4;
        const Q_LEARNING_PARAMS = 1 << 5;

        /// Both grid dimensions.
        const GRID = Self::WORLD_WIDTH.bits() | Self::WORLD_HEIGHT.bits();
        /// Everything that places a cell on the grid.
        const LAYOUT = Self::START_POSITION.bits()
            | Self::GOAL_POSITION.bits()
            | Self::HOLE_POSITIONS.bits();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_holes() {
        let expected = [[1, 2], [2, 3], [3, 1], [4, 0], [0, 2], [4, 3]];
        assert_eq!(DEFAULT_HOLES.len(), 6);
        for (hole, [x, y]) in DEFAULT_HOLES.iter().zip(expected) {
            assert_eq!(*hole, Position::new(x, y));
        }
    }

    #[test]
    fn test_default_params() {
        let p = QLearningParams::default();
        assert_eq!(p.alpha, 0.1);
        assert_eq!(p.gamma, 0.9);
        assert_eq!(p.epsilon, 0.1);
        assert_eq!(p.epsilon_decay, 0.003);
        assert_eq!(p.num_episodes, 3000);
        assert_eq!(p.max_steps, 20);
        assert_eq!(p.step_punishment, -1.0);
        assert_eq!(p.hole_punishment, -100.0);
        assert_eq!(p.goal_reward, 100.0);
    }

    #[test]
    fn test_params_equality_is_bitwise() {
        let nan = QLearningParams {
            epsilon: f64::NAN,
            ..QLearningParams::default()
        };
        assert_eq!(nan, nan);
        assert_ne!(nan, QLearningParams::default());

        let changed = QLearningParams {
            max_steps: 21,
            ..QLearningParams::default()
        };
        assert_ne!(changed, QLearningParams::default());
    }

    #[test]
    fn test_position_in_bounds() {
        assert!(Position::new(0, 0).in_bounds(5, 5));
        assert!(Position::new(4, 4).in_bounds(5, 5));
        assert!(!Position::new(5, 0).in_bounds(5, 5));
        assert!(!Position::new(0, -1).in_bounds(5, 5));
        assert!(!Position::new(0, 0).in_bounds(0, 5));
    }

    #[test]
    fn test_position_serializes_as_pair() {
        let json = serde_json::to_string(&Position::new(4, 0)).unwrap();
        assert_eq!(json, "[4,0]");

        let parsed: Position = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(parsed, Position::new(1, 2));
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(3, 1).to_string(), "[3, 1]");
    }

    #[test]
    fn test_config_field_groups() {
        assert!(ConfigField::GRID.contains(ConfigField::WORLD_WIDTH));
        assert!(ConfigField::GRID.contains(ConfigField::WORLD_HEIGHT));
        assert!(!ConfigField::LAYOUT.intersects(ConfigField::GRID));
        assert_eq!(ConfigField::all().bits().count_ones(), 6);
    }
}
