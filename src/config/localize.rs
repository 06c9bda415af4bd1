//! Locale-resolved views of the catalog.
//!
//! Text lookups fall back from the requested locale to the site default,
//! and finally to the raw key, so a partially translated calculator still
//! renders completely.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::calculation::CalculatorKind;
use crate::models::Locale;

use super::types::{
    CalculatorDefinition, CalculatorText, CatalogConfig, FaqEntry, InputDefinition,
};

/// A calculator definition with every label resolved for one locale.
#[derive(Debug, Clone, Serialize)]
pub struct LocalizedCalculator {
    /// Calculator identifier.
    pub id: String,
    /// Backing calculation.
    pub kind: CalculatorKind,
    /// Category id.
    pub category: String,
    /// Locale the text was resolved in.
    pub locale: Locale,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Form inputs with labels.
    pub inputs: Vec<LocalizedInput>,
    /// Presets with names.
    pub presets: Vec<LocalizedPreset>,
    /// FAQ entries.
    pub faq: Vec<FaqEntry>,
}

/// An input definition with its label and option labels.
#[derive(Debug, Clone, Serialize)]
pub struct LocalizedInput {
    /// The underlying definition.
    #[serde(flatten)]
    pub definition: InputDefinition,
    /// Field label.
    pub label: String,
    /// Labels for select options, in option order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub option_labels: Vec<LocalizedOption>,
}

/// A select option and its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedOption {
    /// Submitted value.
    pub value: String,
    /// Display label.
    pub label: String,
}

/// A preset with its display name.
#[derive(Debug, Clone, Serialize)]
pub struct LocalizedPreset {
    /// Preset identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Values the preset fills in.
    pub values: serde_json::Map<String, serde_json::Value>,
}

/// Short listing entry for the catalog index.
#[derive(Debug, Clone, Serialize)]
pub struct CalculatorSummary {
    /// Calculator identifier.
    pub id: String,
    /// Backing calculation.
    pub kind: CalculatorKind,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
}

/// A category and the calculators in it.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryListing {
    /// Category id.
    pub id: String,
    /// Category name.
    pub name: String,
    /// Calculators in this category.
    pub calculators: Vec<CalculatorSummary>,
}

/// The whole catalog resolved for one locale.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogListing {
    /// Site name.
    pub site: String,
    /// Locale the text was resolved in.
    pub locale: Locale,
    /// Locales the catalog is available in.
    pub locales: Vec<Locale>,
    /// Categories in display order; empty categories are omitted.
    pub categories: Vec<CategoryListing>,
}

/// Resolves text for a definition with locale fallback.
pub(crate) struct TextResolver<'a> {
    primary: Option<&'a CalculatorText>,
    fallback: Option<&'a CalculatorText>,
}

impl<'a> TextResolver<'a> {
    pub(crate) fn new(def: &'a CalculatorDefinition, locale: Locale, default: Locale) -> Self {
        Self {
            primary: def.text.get(&locale),
            fallback: def.text.get(&default),
        }
    }

    fn pick(&self, select: impl Fn(&'a CalculatorText) -> Option<&'a String>) -> Option<&'a str> {
        self.primary
            .and_then(&select)
            .or_else(|| self.fallback.and_then(&select))
            .map(String::as_str)
    }

    pub(crate) fn title(&self) -> &'a str {
        self.pick(|t| Some(&t.title).filter(|s| !s.is_empty()))
            .unwrap_or_default()
    }

    pub(crate) fn description(&self) -> &'a str {
        self.pick(|t| Some(&t.description).filter(|s| !s.is_empty()))
            .unwrap_or_default()
    }

    pub(crate) fn input(&self, key: &str) -> Option<&'a str> {
        self.pick(|t| t.inputs.get(key))
    }

    pub(crate) fn option(&self, value: &str) -> Option<&'a str> {
        self.pick(|t| t.options.get(value))
    }

    pub(crate) fn result(&self, key: &str) -> Option<&'a str> {
        self.pick(|t| t.results.get(key))
    }

    pub(crate) fn verdict(&self, value: &str) -> Option<&'a str> {
        self.pick(|t| t.verdicts.get(value))
    }
}

/// Resolves a calculator definition for a locale.
pub(crate) fn localize_calculator(
    def: &CalculatorDefinition,
    locale: Locale,
    default: Locale,
) -> LocalizedCalculator {
    let text = TextResolver::new(def, locale, default);

    let inputs = def
        .inputs
        .iter()
        .map(|input| LocalizedInput {
            label: text.input(&input.key).unwrap_or(input.key.as_str()).to_string(),
            option_labels: input
                .options
                .iter()
                .map(|value| LocalizedOption {
                    value: value.clone(),
                    label: text.option(value).unwrap_or(value.as_str()).to_string(),
                })
                .collect(),
            definition: input.clone(),
        })
        .collect();

    let presets = def
        .presets
        .iter()
        .map(|preset| LocalizedPreset {
            id: preset.id.clone(),
            name: preset
                .names
                .get(&locale)
                .or_else(|| preset.names.get(&default))
                .cloned()
                .unwrap_or_else(|| preset.id.clone()),
            values: preset.values.clone(),
        })
        .collect();

    let faq = def
        .faq
        .get(&locale)
        .or_else(|| def.faq.get(&default))
        .cloned()
        .unwrap_or_default();

    LocalizedCalculator {
        id: def.id.clone(),
        kind: def.kind,
        category: def.category.clone(),
        locale,
        title: text.title().to_string(),
        description: text.description().to_string(),
        inputs,
        presets,
        faq,
    }
}

/// Resolves the catalog index for a locale.
pub(crate) fn localize_catalog(catalog: &CatalogConfig, locale: Locale) -> CatalogListing {
    let site = catalog.site();
    let default = site.default_locale;

    let categories = site
        .categories
        .iter()
        .filter_map(|category| {
            let calculators: Vec<CalculatorSummary> = catalog
                .calculators()
                .iter()
                .filter(|def| def.category == category.id)
                .map(|def| {
                    let text = TextResolver::new(def, locale, default);
                    CalculatorSummary {
                        id: def.id.clone(),
                        kind: def.kind,
                        title: text.title().to_string(),
                        description: text.description().to_string(),
                    }
                })
                .collect();

            if calculators.is_empty() {
                return None;
            }

            Some(CategoryListing {
                id: category.id.clone(),
                name: category
                    .names
                    .get(&locale)
                    .or_else(|| category.names.get(&default))
                    .cloned()
                    .unwrap_or_else(|| category.id.clone()),
                calculators,
            })
        })
        .collect();

    CatalogListing {
        site: site.name.clone(),
        locale,
        locales: site.locales.clone(),
        categories,
    }
}

/// Builds localised labels for the top-level keys of a result object.
///
/// Returns `(labels, value_labels)`: labels for result keys, and text for
/// string-valued results that have a verdict translation.
pub(crate) fn result_labels(
    def: &CalculatorDefinition,
    locale: Locale,
    default: Locale,
    values: &serde_json::Value,
) -> (BTreeMap<String, String>, BTreeMap<String, String>) {
    let text = TextResolver::new(def, locale, default);
    let mut labels = BTreeMap::new();
    let mut value_labels = BTreeMap::new();

    if let Some(object) = values.as_object() {
        for (key, value) in object {
            if let Some(label) = text.result(key) {
                labels.insert(key.clone(), label.to_string());
            }
            if let Some(verdict) = value.as_str().and_then(|v| text.verdict(v)) {
                value_labels.insert(key.clone(), verdict.to_string());
            }
        }
    }

    (labels, value_labels)
}
