//! Prize wheel engine: weighted prize draws, a pity timer that guarantees
//! the legendary prize, and the angle math that lands the winning segment
//! under the pointer.
//!
//! Rendering, sound and modals belong to the host. The host asks a
//! [`session::SpinSession`] to spin, samples the returned
//! [`motion::SpinAnimation`] each frame, and reports completion.

pub mod command;
pub mod config;
pub mod drawer;
pub mod engine;
pub mod error;
pub mod event;
pub mod motion;
pub mod pity;
pub mod prize_table;
pub mod rng;
pub mod session;
pub mod sink;
pub mod state;
pub mod store;
pub mod types;
