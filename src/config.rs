use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::{EngineConfig, QualityThresholds, RankingMethod};
use crate::error::RecommendError;
use crate::models::{Attribute, AttributeWeights};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub recommendation: RecommendationSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_path")]
    pub path: String,
    #[serde(default = "default_max_records")]
    pub max_records: usize,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            max_records: default_max_records(),
        }
    }
}

fn default_catalog_path() -> String { "data/services.csv".to_string() }
fn default_max_records() -> usize { 10_000 }

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSettings {
    #[serde(default = "default_count")]
    pub default_count: usize,
    #[serde(default = "default_max_count")]
    pub max_count: usize,
    #[serde(default = "default_method")]
    pub default_method: String,
    #[serde(default)]
    pub prefilter_business_type: bool,
    pub explanation_seed: Option<u64>,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            default_count: default_count(),
            max_count: default_max_count(),
            default_method: default_method(),
            prefilter_business_type: false,
            explanation_seed: None,
        }
    }
}

fn default_count() -> usize { 3 }
fn default_max_count() -> usize { 10 }
fn default_method() -> String { "weighted".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_attributes")]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            attributes: default_attributes(),
            weights: WeightsConfig::default(),
            thresholds: ThresholdsConfig::default(),
        }
    }
}

fn default_attributes() -> Vec<Attribute> { Attribute::ALL.to_vec() }

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_business_type_weight")]
    pub business_type: f64,
    #[serde(default = "default_price_tier_weight")]
    pub price_tier: f64,
    #[serde(default = "default_language_weight")]
    pub language: f64,
    #[serde(default = "default_location_weight")]
    pub location: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            business_type: default_business_type_weight(),
            price_tier: default_price_tier_weight(),
            language: default_language_weight(),
            location: default_location_weight(),
        }
    }
}

fn default_business_type_weight() -> f64 { 0.35 }
fn default_price_tier_weight() -> f64 { 0.25 }
fn default_language_weight() -> f64 { 0.20 }
fn default_location_weight() -> f64 { 0.20 }

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_high_threshold")]
    pub high: f64,
    #[serde(default = "default_medium_threshold")]
    pub medium: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            high: default_high_threshold(),
            medium: default_medium_threshold(),
        }
    }
}

fn default_high_threshold() -> f64 { 0.75 }
fn default_medium_threshold() -> f64 { 0.50 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RECO_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., RECO__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("RECO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("RECO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Project the settings onto the pipeline's configuration
    pub fn engine_config(&self) -> Result<EngineConfig, RecommendError> {
        let weights = &self.scoring.weights;
        let config = EngineConfig {
            attributes: self.scoring.attributes.clone(),
            weights: AttributeWeights {
                business_type: weights.business_type,
                price_tier: weights.price_tier,
                language: weights.language,
                location: weights.location,
            },
            thresholds: QualityThresholds {
                high: self.scoring.thresholds.high,
                medium: self.scoring.thresholds.medium,
            },
            default_method: self
                .recommendation
                .default_method
                .parse::<RankingMethod>()
                .map_err(|e| RecommendError::Configuration(e.to_string()))?,
            default_count: self.recommendation.default_count,
            max_count: self.recommendation.max_count,
            prefilter_business_type: self.recommendation.prefilter_business_type,
            max_catalog_size: self.catalog.max_records,
            explanation_seed: self.recommendation.explanation_seed,
        };

        config.validate()?;
        Ok(config)
    }
}

/// Apply well-known environment variables that live outside the RECO prefix
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let catalog_path = env::var("SERVICES_CATALOG").ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(path) = catalog_path {
        builder = builder.set_override("catalog.path", path)?;
    }

    builder.build()
}
