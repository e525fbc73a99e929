//! # gridworld-store
//!
//! Reactive configuration for a grid-world Q-learning demo.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Architecture
//!
//! Every configuration value lives in its own [`ReactiveCell`]: readable,
//! writable, and observable independently. A [`ConfigStore`] bundles the six
//! cells into one explicit object handed to the UI and to the learning
//! routine:
//!
//! ```text
//! UI components ──set/subscribe──▶ ConfigStore ◀──get/subscribe── learning routine
//!                                      │
//!                        world_width, world_height,
//!                        start_position, goal_position,
//!                        hole_positions, q_learning_params
//! ```
//!
//! Cells never reject a write. [`validation`] checks the domain invariants
//! (bounds, distinct positions, parameter ranges) when a consumer asks.
//!
//! ## Modules
//!
//! - [`reactive`] - `ReactiveCell`, the observable value primitive
//! - [`types`] - `Position`, `QLearningParams`, `ConfigField`, defaults
//! - [`store`] - `ConfigStore` and its `GridWorldConfig` snapshot
//! - [`validation`] - invariant checks and error types
//! - [`logging`] - tracing subscriber setup

pub mod logging;
pub mod reactive;
pub mod store;
pub mod types;
pub mod validation;

pub use types::*;

pub use reactive::{CellMap, ReactiveCell, Unsubscribe};

pub use store::{ConfigStore, GridWorldConfig, ViolationsDerived};

pub use validation::{check, ConfigError, PositionRole, Violation};
