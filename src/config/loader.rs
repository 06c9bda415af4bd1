//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the calculator
//! catalog from YAML files.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{InputKind, Locale, parse_value};

use super::localize::{CatalogListing, LocalizedCalculator, localize_calculator, localize_catalog};
use super::types::{CalculatorDefinition, CatalogConfig, SiteConfig};

/// Loads and provides access to the calculator catalog.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides methods to look up and localise calculators.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/
/// ├── site.yaml            # Site name, locales and categories
/// └── calculators/
///     ├── bmi.yaml         # One calculator definition per file
///     └── ovulation.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use calculator_engine::config::ConfigLoader;
/// use calculator_engine::models::Locale;
///
/// let loader = ConfigLoader::load("./config").unwrap();
///
/// let bmi = loader.get_calculator("bmi").unwrap();
/// println!("Inputs: {}", bmi.inputs.len());
///
/// let spanish = loader.localize("bmi", Locale::Es).unwrap();
/// println!("Title: {}", spanish.title);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: CatalogConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The catalog is inconsistent (see [`EngineError::InvalidConfig`])
    ///
    /// # Example
    ///
    /// ```no_run
    /// use calculator_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config")?;
    /// # Ok::<(), calculator_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let site_path = path.join("site.yaml");
        let site = Self::load_yaml::<SiteConfig>(&site_path)?;

        let calculators_dir = path.join("calculators");
        let calculators = Self::load_calculators(&calculators_dir)?;

        Self::from_parts(site, calculators)
    }

    /// Builds a loader from already-parsed parts, applying the same
    /// consistency checks as [`ConfigLoader::load`].
    pub fn from_parts(
        site: SiteConfig,
        calculators: Vec<CalculatorDefinition>,
    ) -> EngineResult<Self> {
        validate_catalog(&site, &calculators)?;
        debug!(
            calculators = calculators.len(),
            default_locale = %site.default_locale,
            "Catalog loaded"
        );

        Ok(Self {
            config: CatalogConfig::new(site, calculators),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all calculator definitions from the calculators directory.
    fn load_calculators(dir: &Path) -> EngineResult<Vec<CalculatorDefinition>> {
        let dir_str = dir.display().to_string();

        if !dir.exists() {
            return Err(EngineError::ConfigNotFound { path: dir_str });
        }

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut calculators = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
            {
                debug!(file = %path.display(), "Loading calculator definition");
                calculators.push(Self::load_yaml::<CalculatorDefinition>(&path)?);
            }
        }

        if calculators.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no calculator files found)", dir_str),
            });
        }

        Ok(calculators)
    }

    /// Returns the underlying catalog configuration.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Returns the site settings.
    pub fn site(&self) -> &SiteConfig {
        self.config.site()
    }

    /// Returns the default locale.
    pub fn default_locale(&self) -> Locale {
        self.config.site().default_locale
    }

    /// Returns every calculator definition, sorted by id.
    pub fn calculators(&self) -> &[CalculatorDefinition] {
        self.config.calculators()
    }

    /// Gets a calculator definition by its id.
    ///
    /// # Returns
    ///
    /// Returns the definition if found, or `CalculatorNotFound` error.
    pub fn get_calculator(&self, id: &str) -> EngineResult<&CalculatorDefinition> {
        self.config
            .calculators()
            .iter()
            .find(|def| def.id == id)
            .ok_or_else(|| EngineError::CalculatorNotFound { id: id.to_string() })
    }

    /// Resolves one calculator's labels, presets and FAQ for a locale.
    pub fn localize(&self, id: &str, locale: Locale) -> EngineResult<LocalizedCalculator> {
        let def = self.get_calculator(id)?;
        Ok(localize_calculator(def, locale, self.default_locale()))
    }

    /// Resolves the catalog index for a locale.
    pub fn catalog(&self, locale: Locale) -> CatalogListing {
        localize_catalog(&self.config, locale)
    }
}

/// Checks cross-file consistency of the catalog.
fn validate_catalog(site: &SiteConfig, calculators: &[CalculatorDefinition]) -> EngineResult<()> {
    let invalid = |message: String| EngineError::InvalidConfig { message };

    if !site.locales.contains(&site.default_locale) {
        return Err(invalid(format!(
            "default locale '{}' is not in the site locale list",
            site.default_locale
        )));
    }

    let categories: HashSet<&str> = site.categories.iter().map(|c| c.id.as_str()).collect();
    let mut seen = HashSet::new();

    for def in calculators {
        if !seen.insert(def.id.as_str()) {
            return Err(invalid(format!("duplicate calculator id '{}'", def.id)));
        }

        if !categories.contains(def.category.as_str()) {
            return Err(invalid(format!(
                "calculator '{}' uses unknown category '{}'",
                def.id, def.category
            )));
        }

        if !def.text.contains_key(&site.default_locale) {
            return Err(invalid(format!(
                "calculator '{}' has no '{}' text",
                def.id, site.default_locale
            )));
        }

        for input in &def.inputs {
            if input.kind == InputKind::Select && input.options.is_empty() {
                return Err(invalid(format!(
                    "calculator '{}' input '{}' is a select without options",
                    def.id, input.key
                )));
            }

            if let Some(default) = &input.default {
                parse_value(input, default).map_err(|message| {
                    invalid(format!(
                        "calculator '{}' input '{}' default {}",
                        def.id, input.key, message
                    ))
                })?;
            }
        }

        for preset in &def.presets {
            for (key, value) in &preset.values {
                let input = def.input(key).ok_or_else(|| {
                    invalid(format!(
                        "calculator '{}' preset '{}' sets unknown input '{}'",
                        def.id, preset.id, key
                    ))
                })?;
                parse_value(input, value).map_err(|message| {
                    invalid(format!(
                        "calculator '{}' preset '{}' input '{}' {}",
                        def.id, preset.id, key, message
                    ))
                })?;
            }
        }
    }

    Ok(())
}
