//! Grid engine: fetch capabilities, timers and the controller that drives grid state.
mod controller;
mod engine;
mod error;
mod fetch;
mod scheduler;
pub mod template;
mod types;

pub use controller::{GridController, GridControllerBuilder};
pub use engine::EngineHandle;
pub use error::GridError;
pub use fetch::{
    AsyncSources, Fetch, FetchCapability, FetchSettings, FnFetcher, ResolvedSources,
    TemplateFetcher,
};
pub use scheduler::ScheduledTask;
pub use types::{EngineEvent, FailureKind, FetchError};
