//! Validation - Domain invariants of a grid-world configuration
//!
//! Cells accept any value. Consumers that need a playable world call
//! [`check`] (or `ConfigStore::validate`) before using one.
//!
//! Checked, in this order:
//! 1. Grid dimensions are positive
//! 2. Start, goal and every hole lie inside the grid
//! 3. Start, goal and holes are pairwise distinct
//! 4. `alpha`, `gamma`, `epsilon` are in `[0, 1]`; `num_episodes`, `max_steps` are positive

use std::fmt;
use thiserror::Error;

use crate::store::GridWorldConfig;
use crate::types::{Position, QLearningParams};

// =============================================================================
// Errors
// =============================================================================

/// Which placed cell a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionRole {
    Start,
    Goal,
    /// Index into `hole_positions`.
    Hole(usize),
}

impl fmt::Display for PositionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Goal => write!(f, "goal"),
            Self::Hole(i) => write!(f, "hole #{}", i),
        }
    }
}

/// A single broken invariant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: i32, height: i32 },

    #[error("{role} position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        role: PositionRole,
        position: Position,
        width: i32,
        height: i32,
    },

    #[error("{first} and {second} share position {position}")]
    Overlap {
        first: PositionRole,
        second: PositionRole,
        position: Position,
    },

    #[error("{param} must be within [0, 1], got {value}")]
    OutOfUnitRange { param: &'static str, value: f64 },

    #[error("{param} must be positive")]
    NotPositive { param: &'static str },
}

/// Errors surfaced by the store's fallible operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {}", summarize(.0))]
    Invalid(Vec<Violation>),

    #[error("failed to parse configuration: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ConfigError {
    /// Violations carried by an `Invalid` error, empty otherwise.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Invalid(v) => v,
            _ => &[],
        }
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Checks
// =============================================================================

/// List every violated invariant. Empty means the configuration is usable.
pub fn check(config: &GridWorldConfig) -> Vec<Violation> {
    let mut out = Vec::new();
    check_grid(config, &mut out);
    check_overlaps(config, &mut out);
    check_params(&config.q_learning_params, &mut out);
    out
}

fn placed(config: &GridWorldConfig) -> impl Iterator<Item = (PositionRole, Position)> + '_ {
    [
        (PositionRole::Start, config.start_position),
        (PositionRole::Goal, config.goal_position),
    ]
    .into_iter()
    .chain(
        config
            .hole_positions
            .iter()
            .enumerate()
            .map(|(i, p)| (PositionRole::Hole(i), *p)),
    )
}

fn check_grid(config: &GridWorldConfig, out: &mut Vec<Violation>) {
    let (width, height) = (config.world_width, config.world_height);
    if width <= 0 || height <= 0 {
        // Every position would be out of bounds; one error says it all.
        out.push(Violation::EmptyGrid { width, height });
        return;
    }

    for (role, position) in placed(config) {
        if !position.in_bounds(width, height) {
            out.push(Violation::OutOfBounds {
                role,
                position,
                width,
                height,
            });
        }
    }
}

fn check_overlaps(config: &GridWorldConfig, out: &mut Vec<Violation>) {
    let all: Vec<(PositionRole, Position)> = placed(config).collect();
    for (i, (first, a)) in all.iter().enumerate() {
        for (second, b) in &all[i + 1..] {
            if a == b {
                out.push(Violation::Overlap {
                    first: *first,
                    second: *second,
                    position: *a,
                });
            }
        }
    }
}

fn check_params(params: &QLearningParams, out: &mut Vec<Violation>) {
    for (param, value) in [
        ("alpha", params.alpha),
        ("gamma", params.gamma),
        ("epsilon", params.epsilon),
    ] {
        // NaN fails `contains`
        if !(0.0..=1.0).contains(&value) {
            out.push(Violation::OutOfUnitRange { param, value });
        }
    }

    if params.num_episodes == 0 {
        out.push(Violation::NotPositive { param: "num_episodes" });
    }
    if params.max_steps == 0 {
        out.push(Violation::NotPositive { param: "max_steps" });
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(check(&GridWorldConfig::default()).is_empty());
    }

    #[test]
    fn test_goal_outside_grid() {
        let config = GridWorldConfig {
            goal_position: Position::new(5, 4),
            ..Default::default()
        };
        assert_eq!(
            check(&config),
            vec![Violation::OutOfBounds {
                role: PositionRole::Goal,
                position: Position::new(5, 4),
                width: 5,
                height: 5,
            }]
        );
    }

    #[test]
    fn test_shrinking_grid_strands_holes() {
        let config = GridWorldConfig {
            world_width: 4,
            world_height: 4,
            ..Default::default()
        };
        let violations = check(&config);

        // Goal (4,4) and holes #3 (4,0) and #5 (4,3) fall off the edge.
        let roles: Vec<PositionRole> = violations
            .iter()
            .filter_map(|v| match v {
                Violation::OutOfBounds { role, .. } => Some(*role),
                _ => None,
            })
            .collect();
        assert_eq!(
            roles,
            vec![PositionRole::Goal, PositionRole::Hole(3), PositionRole::Hole(5)]
        );
    }

    #[test]
    fn test_empty_grid_reported_once() {
        let config = GridWorldConfig {
            world_width: 0,
            ..Default::default()
        };
        assert_eq!(
            check(&config),
            vec![Violation::EmptyGrid { width: 0, height: 5 }]
        );
    }

    #[test]
    fn test_hole_on_start() {
        let mut config = GridWorldConfig::default();
        config.hole_positions.push(Position::new(0, 0));

        assert_eq!(
            check(&config),
            vec![Violation::Overlap {
                first: PositionRole::Start,
                second: PositionRole::Hole(6),
                position: Position::new(0, 0),
            }]
        );
    }

    #[test]
    fn test_duplicate_holes() {
        let config = GridWorldConfig {
            hole_positions: vec![Position::new(1, 1), Position::new(1, 1)],
            ..Default::default()
        };
        assert_eq!(
            check(&config),
            vec![Violation::Overlap {
                first: PositionRole::Hole(0),
                second: PositionRole::Hole(1),
                position: Position::new(1, 1),
            }]
        );
    }

    #[test]
    fn test_no_holes_is_fine() {
        let config = GridWorldConfig {
            hole_positions: Vec::new(),
            ..Default::default()
        };
        assert!(check(&config).is_empty());
    }

    #[test]
    fn test_param_ranges() {
        let mut config = GridWorldConfig::default();
        config.q_learning_params.alpha = 1.5;
        config.q_learning_params.epsilon = f64::NAN;
        config.q_learning_params.max_steps = 0;

        let violations = check(&config);
        assert_eq!(violations.len(), 3);
        assert_eq!(
            violations[0],
            Violation::OutOfUnitRange { param: "alpha", value: 1.5 }
        );
        assert!(matches!(
            violations[1],
            Violation::OutOfUnitRange { param: "epsilon", .. }
        ));
        assert_eq!(violations[2], Violation::NotPositive { param: "max_steps" });
    }

    #[test]
    fn test_boundary_params_accepted() {
        let mut config = GridWorldConfig::default();
        config.q_learning_params.alpha = 0.0;
        config.q_learning_params.gamma = 1.0;
        config.q_learning_params.epsilon = 1.0;
        assert!(check(&config).is_empty());
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::Invalid(vec![
            Violation::NotPositive { param: "num_episodes" },
            Violation::EmptyGrid { width: 0, height: 0 },
        ]);
        assert_eq!(
            err.to_string(),
            "invalid configuration: num_episodes must be positive; grid must be at least 1x1, got 0x0"
        );
        assert_eq!(err.violations().len(), 2);

        let role = PositionRole::Hole(2).to_string();
        assert_eq!(role, "hole #2");
    }
}
