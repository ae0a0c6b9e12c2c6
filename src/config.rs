use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", other),
        }
    }
}

/// Settings handed to the batch populator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopulationConfig {
    pub business_count: usize,
    /// Businesses whose related documents are written together.
    pub batch_width: usize,
    /// Upper bound on concurrent related-document writes.
    pub max_in_flight: usize,
    /// Concurrent profile creates. 1 keeps the profile phase strictly fail-fast.
    pub profile_fanout: usize,
    pub call_timeout: Duration,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            business_count: 10,
            batch_width: 5,
            max_in_flight: 64,
            profile_fanout: 1,
            call_timeout: Duration::from_millis(10_000),
        }
    }
}

impl PopulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_width == 0 {
            anyhow::bail!("POPULATE_BATCH_WIDTH must be at least 1");
        }
        if self.max_in_flight == 0 {
            anyhow::bail!("POPULATE_MAX_IN_FLIGHT must be at least 1");
        }
        if self.profile_fanout == 0 {
            anyhow::bail!("POPULATE_PROFILE_FANOUT must be at least 1");
        }
        if self.call_timeout.is_zero() {
            anyhow::bail!("STORE_CALL_TIMEOUT_MS must be positive");
        }
        Ok(())
    }

    pub fn with_business_count(mut self, business_count: usize) -> Self {
        self.business_count = business_count;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub population: PopulationConfig,
    pub generator_seed: Option<u64>,
    pub showcase_business_id: String,
    pub export_path: PathBuf,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PopulationConfig::default();
        let population = PopulationConfig {
            business_count: parse_or(&lookup, "BUSINESS_COUNT", defaults.business_count)?,
            batch_width: parse_or(&lookup, "POPULATE_BATCH_WIDTH", defaults.batch_width)?,
            max_in_flight: parse_or(&lookup, "POPULATE_MAX_IN_FLIGHT", defaults.max_in_flight)?,
            profile_fanout: parse_or(&lookup, "POPULATE_PROFILE_FANOUT", defaults.profile_fanout)?,
            call_timeout: Duration::from_millis(parse_or(
                &lookup,
                "STORE_CALL_TIMEOUT_MS",
                defaults.call_timeout.as_millis() as u64,
            )?),
        };
        population.validate()?;

        let generator_seed = match lookup("GENERATOR_SEED") {
            Some(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("GENERATOR_SEED is not a u64: '{}'", raw))?,
            ),
            _ => None,
        };

        Ok(Config {
            population,
            generator_seed,
            showcase_business_id: lookup("SHOWCASE_BUSINESS_ID")
                .unwrap_or_else(|| "BIZ00009".to_string()),
            export_path: lookup("EXPORT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("business_ai_training_data.json")),
            log_format: lookup("LOG_FORMAT")
                .map(|raw| raw.parse::<LogFormat>())
                .transpose()?
                .unwrap_or(LogFormat::Pretty),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: '{}'", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.population, PopulationConfig::default());
        assert_eq!(config.population.business_count, 10);
        assert_eq!(config.population.batch_width, 5);
        assert_eq!(config.generator_seed, None);
        assert_eq!(config.showcase_business_id, "BIZ00009");
        assert_eq!(config.export_path, PathBuf::from("business_ai_training_data.json"));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("BUSINESS_COUNT", "25"),
            ("POPULATE_BATCH_WIDTH", "3"),
            ("POPULATE_MAX_IN_FLIGHT", "8"),
            ("POPULATE_PROFILE_FANOUT", "4"),
            ("STORE_CALL_TIMEOUT_MS", "250"),
            ("GENERATOR_SEED", "1234"),
            ("SHOWCASE_BUSINESS_ID", "BIZ00001"),
            ("EXPORT_PATH", "/tmp/out.json"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.population.business_count, 25);
        assert_eq!(config.population.batch_width, 3);
        assert_eq!(config.population.max_in_flight, 8);
        assert_eq!(config.population.profile_fanout, 4);
        assert_eq!(config.population.call_timeout, Duration::from_millis(250));
        assert_eq!(config.generator_seed, Some(1234));
        assert_eq!(config.showcase_business_id, "BIZ00001");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_lookup(lookup(&[("BUSINESS_COUNT", "ten")])).is_err());
        assert!(Config::from_lookup(lookup(&[("POPULATE_BATCH_WIDTH", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("STORE_CALL_TIMEOUT_MS", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("GENERATOR_SEED", "-1")])).is_err());
        assert!(Config::from_lookup(lookup(&[("LOG_FORMAT", "xml")])).is_err());
    }

    #[test]
    fn test_blank_seed_is_unseeded() {
        let config = Config::from_lookup(lookup(&[("GENERATOR_SEED", "  ")])).unwrap();
        assert_eq!(config.generator_seed, None);
    }
}
