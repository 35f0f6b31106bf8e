//! Core library for the `weather-lookup` form.
//!
//! This crate defines:
//! - Configuration of the weather service address
//! - The HTTP lookup of a stored weather record by identifier
//! - The form state and its submit handler
//! - Rendering of a loosely shaped weather record
//!
//! It is used by `weather-lookup-cli`, but any other front end can drive
//! [`LookupForm`] and paint a [`ResultView`] its own way.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod render;
pub mod service;

pub use config::Config;
pub use controller::LookupForm;
pub use error::LookupError;
pub use model::{FormInput, FormState, SubmissionResult};
pub use render::{GridLayout, Palette, PlainPalette, ResultView, render};
pub use service::{HttpLookupService, WeatherLookupService};
