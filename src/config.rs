use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// How the quiz endpoint picks among the remaining candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizOrder {
    /// Lowest id first. Repeated calls with the same input return the same question.
    #[default]
    First,
    Random,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub quiz_order: QuizOrder,
}

impl Settings {
    /// Defaults, then an optional `trivia.toml`, then `TRIVIA_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::builder()?
            .add_source(File::with_name("trivia").required(false))
            .add_source(Environment::with_prefix("TRIVIA"))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("database_url", "sqlite:trivia.db")?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("quiz_order", "first")
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
