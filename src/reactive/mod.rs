//! Reactive Module - Observable value primitive
//!
//! - **ReactiveCell** - value + synchronous subscriber registry, backed by a
//!   spark-signals `Signal` so it can also feed deriveds

mod cell;

pub use cell::*;
