// Library crate: the massing core plus the headless adapter, command
// protocol and harness used by the shell binary and integration tests.

pub mod adapter;
pub mod blueprint;
pub mod command;
pub mod controller;
pub mod error;
pub mod event;
pub mod fixtures;
pub mod generator;
pub mod harness;
pub mod layout;
pub mod manifest;
pub mod state;

pub use controller::InteractionController;
pub use error::{GeneratorError, StudioError};
pub use event::{ControllerOutput, InputEvent, InteractionMode};
