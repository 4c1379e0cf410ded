//! Core library for the weather globe.
//!
//! This crate defines:
//! - The weather condition registry shared by every consumer
//! - Geocoding and current-weather clients
//! - The search session state machine and its orchestrator
//! - Globe annotation derivation and the driver that feeds a renderer
//! - The view projection used by front ends
//!
//! It is used by `weather-globe-cli`, but any front end that can draw a globe
//! can plug in through [`globe::GlobeRenderer`].

pub mod conditions;
pub mod config;
pub mod error;
pub mod globe;
pub mod model;
pub mod provider;
pub mod session;
pub mod view;

pub use config::{Config, GlobeConfig};
pub use error::LookupError;
pub use model::{CurrentWeather, GeoResult, WeatherCode};
pub use provider::WeatherProvider;
pub use session::{Orchestrator, SearchOutcome, SearchPhase, SessionState};
pub use view::ViewModel;
