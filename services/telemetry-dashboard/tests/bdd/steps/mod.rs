//! BDD step definitions for the telemetry dashboard

pub mod polling_steps;
pub mod settings_steps;
