//! Shared Configuration Store
//!
//! One [`ReactiveCell`] per configuration value, bundled in an explicit
//! object that UI components and the learning routine receive by handle.
//! Cloning a [`ConfigStore`] shares the same cells.
//!
//! # Example
//!
//! ```ignore
//! use gridworld_store::{ConfigStore, ConfigField};
//!
//! let store = ConfigStore::new();
//!
//! // Observe one cell
//! let unsubscribe = store.world_width.subscribe(|w| println!("width: {}", w));
//!
//! // Observe the whole store
//! let detach = store.on_change(|field| {
//!     if field.intersects(ConfigField::GRID) {
//!         println!("grid resized");
//!     }
//! });
//!
//! store.world_width.set(10);
//!
//! if let Err(e) = store.validate() {
//!     eprintln!("{}", e);
//! }
//!
//! unsubscribe();
//! detach();
//! ```

mod snapshot;

pub use snapshot::GridWorldConfig;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use spark_signals::{derived, Derived};

use crate::reactive::{ReactiveCell, Unsubscribe};
use crate::types::{ConfigField, Position, QLearningParams};
use crate::validation::{self, ConfigError, Violation};

/// Derived list of violations, see [`ConfigStore::violations`].
pub type ViolationsDerived = Derived<Vec<Violation>>;

// =============================================================================
// ConfigStore
// =============================================================================

/// The grid-world configuration as independently observable cells.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    /// Grid columns.
    pub world_width: ReactiveCell<i32>,
    /// Grid rows.
    pub world_height: ReactiveCell<i32>,
    /// Agent start cell.
    pub start_position: ReactiveCell<Position>,
    /// Terminal success cell.
    pub goal_position: ReactiveCell<Position>,
    /// Terminal failure cells.
    pub hole_positions: ReactiveCell<Vec<Position>>,
    pub q_learning_params: ReactiveCell<QLearningParams>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    /// Create a store holding the default configuration.
    pub fn new() -> Self {
        Self::from_config(&GridWorldConfig::default())
    }

    /// Create a store seeded from `config`.
    pub fn from_config(config: &GridWorldConfig) -> Self {
        Self {
            world_width: ReactiveCell::new("world_width", config.world_width),
            world_height: ReactiveCell::new("world_height", config.world_height),
            start_position: ReactiveCell::new("start_position", config.start_position),
            goal_position: ReactiveCell::new("goal_position", config.goal_position),
            hole_positions: ReactiveCell::new("hole_positions", config.hole_positions.clone()),
            q_learning_params: ReactiveCell::new("q_learning_params", config.q_learning_params),
        }
    }

    /// Read every cell.
    pub fn snapshot(&self) -> GridWorldConfig {
        GridWorldConfig {
            world_width: self.world_width.get(),
            world_height: self.world_height.get(),
            start_position: self.start_position.get(),
            goal_position: self.goal_position.get(),
            hole_positions: self.hole_positions.get(),
            q_learning_params: self.q_learning_params.get(),
        }
    }

    /// Write every cell whose value differs from `config`.
    ///
    /// Returns the fields that were written. Untouched cells notify nobody.
    pub fn apply(&self, config: &GridWorldConfig) -> ConfigField {
        let mut written = ConfigField::empty();

        write_if_changed(
            &self.world_width,
            config.world_width,
            ConfigField::WORLD_WIDTH,
            &mut written,
        );
        write_if_changed(
            &self.world_height,
            config.world_height,
            ConfigField::WORLD_HEIGHT,
            &mut written,
        );
        write_if_changed(
            &self.start_position,
            config.start_position,
            ConfigField::START_POSITION,
            &mut written,
        );
        write_if_changed(
            &self.goal_position,
            config.goal_position,
            ConfigField::GOAL_POSITION,
            &mut written,
        );
        write_if_changed(
            &self.hole_positions,
            config.hole_positions.clone(),
            ConfigField::HOLE_POSITIONS,
            &mut written,
        );
        write_if_changed(
            &self.q_learning_params,
            config.q_learning_params,
            ConfigField::Q_LEARNING_PARAMS,
            &mut written,
        );

        tracing::debug!(fields = ?written, "applied configuration");
        written
    }

    /// Restore the default configuration.
    pub fn reset(&self) -> ConfigField {
        tracing::debug!("resetting configuration to defaults");
        self.apply(&GridWorldConfig::default())
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check the current values against the domain invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let violations = validation::check(&self.snapshot());
        if violations.is_empty() {
            return Ok(());
        }

        tracing::warn!(count = violations.len(), "configuration has violations");
        Err(ConfigError::Invalid(violations))
    }

    /// Violations of the current values, recomputed when any cell changes.
    pub fn violations(&self) -> ViolationsDerived {
        let store = self.clone();
        let compute: Box<dyn Fn() -> Vec<Violation>> =
            Box::new(move || validation::check(&store.snapshot()));
        derived(compute)
    }

    // =========================================================================
    // Change notification
    // =========================================================================

    /// Call `handler` with the field of every cell written from now on.
    ///
    /// Unlike [`ReactiveCell::subscribe`] there is no immediate call.
    /// Returns a handle that detaches from all cells at once.
    pub fn on_change<F>(&self, handler: F) -> Unsubscribe
    where
        F: Fn(ConfigField) + 'static,
    {
        let handler: Rc<dyn Fn(ConfigField)> = Rc::new(handler);

        let subscriptions = vec![
            watch(&self.world_width, ConfigField::WORLD_WIDTH, &handler),
            watch(&self.world_height, ConfigField::WORLD_HEIGHT, &handler),
            watch(&self.start_position, ConfigField::START_POSITION, &handler),
            watch(&self.goal_position, ConfigField::GOAL_POSITION, &handler),
            watch(&self.hole_positions, ConfigField::HOLE_POSITIONS, &handler),
            watch(&self.q_learning_params, ConfigField::Q_LEARNING_PARAMS, &handler),
        ];

        Box::new(move || {
            for unsubscribe in subscriptions {
                unsubscribe();
            }
        })
    }

    // =========================================================================
    // JSON
    // =========================================================================

    /// Serialize the current values.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        self.snapshot().to_json()
    }

    /// Parse `json` and apply it. On a parse error no cell is written.
    pub fn load_json(&self, json: &str) -> Result<ConfigField, ConfigError> {
        let config = GridWorldConfig::from_json(json)?;
        Ok(self.apply(&config))
    }
}

fn write_if_changed<T>(
    cell: &ReactiveCell<T>,
    value: T,
    field: ConfigField,
    written: &mut ConfigField,
)
where
    T: Clone + PartialEq + fmt::Debug + 'static,
{
    if cell.get() != value {
        cell.set(value);
        written.insert(field);
    }
}

fn watch<T>(
    cell: &ReactiveCell<T>,
    field: ConfigField,
    handler: &Rc<dyn Fn(ConfigField)>,
) -> Unsubscribe
where
    T: Clone + PartialEq + fmt::Debug + 'static,
{
    let handler = Rc::clone(handler);
    // Skip the immediate call made by subscribe
    let primed = Cell::new(false);
    cell.subscribe(move |_| {
        if primed.replace(true) {
            handler(field);
        }
    })
}

// =============================================================================
// Tests
// =============================================================================
