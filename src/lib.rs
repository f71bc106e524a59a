pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod lookups;
pub mod surface;
pub mod ui;
pub mod widget;

pub use error::LookupError;
pub use widget::{LookupWidget, Phase, TriggerOutcome};
