//! Calculator Engine
//!
//! This crate provides a multilingual catalog of consumer calculators (BMI,
//! ideal weight, Chinese gender chart, ovulation, data transfer time and
//! emergency fund) with a JSON HTTP API. Calculator forms, translations and
//! presets are loaded from YAML; each calculation returns its result together
//! with an audit trace of the formulas applied.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
