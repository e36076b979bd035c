//! CSV loaders for bracket tables and batch freelancer inputs.

pub mod inputs;
pub mod loader;

pub use inputs::{InputLoadError, load_freelancer_inputs, load_freelancer_inputs_from_path};
pub use loader::{BracketLoader, BracketLoaderError, BracketRecord};
