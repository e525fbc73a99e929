//! Plain-data copy of every configuration value.
//!
//! Used to seed a store, to capture its state and to exchange it as JSON.
//! The JSON layout matches what the web front-end stores: positions as
//! `[x, y]` arrays, parameters as one object.

use serde::{Deserialize, Serialize};

use crate::types::{
    DEFAULT_GOAL, DEFAULT_HOLES, DEFAULT_START, DEFAULT_WORLD_HEIGHT, DEFAULT_WORLD_WIDTH,
    Position, QLearningParams,
};
use crate::validation::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridWorldConfig {
    pub world_width: i32,
    pub world_height: i32,
    pub start_position: Position,
    pub goal_position: Position,
    pub hole_positions: Vec<Position>,
    pub q_learning_params: QLearningParams,
}

impl Default for GridWorldConfig {
    fn default() -> Self {
        Self {
            world_width: DEFAULT_WORLD_WIDTH,
            world_height: DEFAULT_WORLD_HEIGHT,
            start_position: DEFAULT_START,
            goal_position: DEFAULT_GOAL,
            hole_positions: DEFAULT_HOLES.to_vec(),
            q_learning_params: QLearningParams::default(),
        }
    }
}

impl GridWorldConfig {
    /// Parse from a JSON string. Domain invariants are not checked.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Parse)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_layout() {
        let json = GridWorldConfig::default().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["world_width"], 5);
        assert_eq!(value["start_position"], serde_json::json!([0, 0]));
        assert_eq!(value["hole_positions"][3], serde_json::json!([4, 0]));
        assert_eq!(value["q_learning_params"]["num_episodes"], 3000);
        assert_eq!(value["q_learning_params"]["hole_punishment"], -100.0);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "world_width": 3,
            "world_height": 2,
            "start_position": [0, 1],
            "goal_position": [2, 0],
            "hole_positions": [],
            "q_learning_params": {
                "alpha": 0.5, "gamma": 0.99, "epsilon": 0.2, "epsilon_decay": 0.01,
                "num_episodes": 10, "max_steps": 5,
                "step_punishment": -1, "hole_punishment": -10, "goal_reward": 10
            }
        }"#;
        let config = GridWorldConfig::from_json(json).unwrap();

        assert_eq!(config.world_width, 3);
        assert_eq!(config.start_position, Position::new(0, 1));
        assert!(config.hole_positions.is_empty());
        assert_eq!(config.q_learning_params.max_steps, 5);
        assert_eq!(config.q_learning_params.goal_reward, 10.0);
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        let err = GridWorldConfig::from_json(r#"{"world_width": "wide"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = GridWorldConfig::from_json(r#"{"start_position": [1, 2, 3]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
