//! Configuration types for the calculator catalog.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::calculation::CalculatorKind;
use crate::models::{InputKind, Locale};

/// Site-wide settings from `site.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// The site's display name.
    pub name: String,
    /// Locale used when a request does not ask for a supported one.
    pub default_locale: Locale,
    /// Locales the catalog is offered in.
    pub locales: Vec<Locale>,
    /// Calculator categories, in display order.
    pub categories: Vec<CategoryConfig>,
}

/// A category that groups calculators in the catalog listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    /// Category identifier referenced by calculator definitions.
    pub id: String,
    /// Category name per locale.
    pub names: HashMap<Locale, String>,
}

/// One input of a calculator form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDefinition {
    /// Key the value is submitted and read under.
    pub key: String,
    /// The kind of value accepted.
    pub kind: InputKind,
    /// Whether the input must be supplied when it has no default.
    #[serde(default)]
    pub required: bool,
    /// Inclusive lower bound for number and money inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound for number and money inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Suggested UI increment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Value used when the input is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Unit shown next to the field (e.g. "cm", "days").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Allowed values for select inputs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// Translated text for one calculator in one locale.
///
/// Every map is optional; missing entries fall back to the default locale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalculatorText {
    /// Calculator title.
    pub title: String,
    /// One-paragraph description.
    pub description: String,
    /// Input labels by input key.
    #[serde(default)]
    pub inputs: HashMap<String, String>,
    /// Option labels by option value.
    #[serde(default)]
    pub options: HashMap<String, String>,
    /// Result labels by result key.
    #[serde(default)]
    pub results: HashMap<String, String>,
    /// Text for string-valued results (categories, risk bands).
    #[serde(default)]
    pub verdicts: HashMap<String, String>,
}

/// A named set of input values that pre-fills the form.
#[derive(Debug, Clone, Deserialize)]
pub struct Preset {
    /// Preset identifier.
    pub id: String,
    /// Preset name per locale.
    pub names: HashMap<Locale, String>,
    /// Input values applied by the preset.
    pub values: serde_json::Map<String, serde_json::Value>,
}

/// A frequently asked question shown under the calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    /// The question.
    pub question: String,
    /// The answer.
    pub answer: String,
}

/// A calculator definition from `calculators/<id>.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculatorDefinition {
    /// URL-safe identifier.
    pub id: String,
    /// Which calculation function backs this calculator.
    pub kind: CalculatorKind,
    /// Category id from `site.yaml`.
    pub category: String,
    /// Form inputs, in display order.
    pub inputs: Vec<InputDefinition>,
    /// Translated text per locale.
    pub text: HashMap<Locale, CalculatorText>,
    /// Presets offered for quick entry.
    #[serde(default)]
    pub presets: Vec<Preset>,
    /// FAQ entries per locale.
    #[serde(default)]
    pub faq: HashMap<Locale, Vec<FaqEntry>>,
}

impl CalculatorDefinition {
    /// Looks up a preset by id.
    pub fn preset(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// Looks up an input definition by key.
    pub fn input(&self, key: &str) -> Option<&InputDefinition> {
        self.inputs.iter().find(|i| i.key == key)
    }
}

/// The complete calculator catalog.
///
/// Calculators are kept in load order (sorted by id) so listings are stable.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    site: SiteConfig,
    calculators: Vec<CalculatorDefinition>,
}

impl CatalogConfig {
    /// Creates a CatalogConfig from its component parts.
    pub fn new(site: SiteConfig, calculators: Vec<CalculatorDefinition>) -> Self {
        let mut sorted = calculators;
        sorted.sort_by(|a, b| a.id.cmp(&b.id));
        Self {
            site,
            calculators: sorted,
        }
    }

    /// Returns the site settings.
    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Returns all calculator definitions.
    pub fn calculators(&self) -> &[CalculatorDefinition] {
        &self.calculators
    }
}
