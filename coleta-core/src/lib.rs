//! Core types, screen state machines, and service wiring for the coleta
//! recycling-point locator.

/// Three-state cells for asynchronous sources.
pub mod cell;
/// Configuration file and environment handling.
pub mod config;
/// Detail screen state.
pub mod detail;
/// Category filter toggle set.
pub mod filter;
/// Home screen state.
pub mod home;
/// Device location acquisition.
pub mod location;
/// Domain models and identifiers shared by all providers.
pub mod model;
/// Hand-off values between screens.
pub mod navigation;
/// Bundles of provider ports.
pub mod plugin;
/// Points screen state and view model.
pub mod points;
/// Traits describing the provider interfaces.
pub mod ports;
/// Requests, outcomes, and the task dispatcher.
pub mod runtime;
/// Region/municipality selection machine.
pub mod selection;
/// High-level service facade used by clients.
pub mod service;
/// Screen stack driving the whole application.
pub mod session;
/// Last-request-wins slots.
pub mod staleness;

pub use cell::*;
pub use config::*;
pub use detail::*;
pub use filter::*;
pub use home::*;
pub use location::*;
pub use model::*;
pub use navigation::*;
pub use plugin::*;
pub use points::*;
pub use ports::*;
pub use runtime::*;
pub use selection::*;
pub use service::*;
pub use session::*;
pub use staleness::*;
