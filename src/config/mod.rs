//! Configuration module for the Calculator Engine.
//!
//! This module provides functionality for loading the calculator catalog
//! (site settings, calculator definitions, translations, presets and FAQ)
//! from YAML files, and for resolving it into a single locale.

mod loader;
mod localize;
mod types;

pub use loader::ConfigLoader;
pub use localize::{
    CalculatorSummary, CatalogListing, CategoryListing, LocalizedCalculator, LocalizedInput,
    LocalizedOption, LocalizedPreset,
};
pub use types::{
    CalculatorDefinition, CalculatorText, CatalogConfig, CategoryConfig, FaqEntry,
    InputDefinition, Preset, SiteConfig,
};

pub(crate) use localize::result_labels;
