use reactive_examples::rx::SchedulerConfig;
use reactive_examples::{Named, Person};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Configuration for the scenario runner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub cast: Vec<Person>,
    pub delay_ms: u64,
    pub logging: LoggingConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            cast: vec![
                Person::new("Michael", "Weston"),
                Person::new("Fiona", "Glenanne"),
                Person::new("Sam", "Axe"),
                Person::new("Jesse", "Porter"),
            ],
            delay_ms: 1000,
            logging: LoggingConfig::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl DemoConfig {
    /// Load configuration from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: DemoConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Delay used by the delayed Flux scenarios
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// First cast member with the given first name
    pub fn find(&self, first_name: &str) -> Option<&Person> {
        self.cast.iter().find(|p| p.first_name() == first_name)
    }
}
