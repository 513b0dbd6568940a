use config::{Config, ConfigError, Environment};
use secrecy::SecretString;
use serde::Deserialize;

/// Process configuration, read from `.env` and the environment.
///
/// | variable | default |
/// |---|---|
/// | `DATABASE_URL` | `sqlite:trivia.db?mode=rwc` |
/// | `LISTEN_ADDR` | `0.0.0.0:8080` |
/// | `MAX_CONNECTIONS` | `5` |
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub database_url: SecretString,
    pub listen_addr: String,
    pub max_connections: u32,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_environment(Environment::default())
    }

    fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("database_url", "sqlite:trivia.db?mode=rwc")?
            .set_default("listen_addr", "0.0.0.0:8080")?
            .set_default("max_connections", 5)?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::default().source(Some(source))
    }

    #[test]
    fn defaults_apply_without_environment() {
        let settings = Settings::from_environment(environment(&[])).unwrap();
        assert_eq!(settings.database_url.expose_secret(), "sqlite:trivia.db?mode=rwc");
        assert_eq!(settings.listen_addr, "0.0.0.0:8080");
        assert_eq!(settings.max_connections, 5);
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = Settings::from_environment(environment(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("LISTEN_ADDR", "127.0.0.1:5000"),
            ("MAX_CONNECTIONS", "2"),
        ]))
        .unwrap();
        assert_eq!(settings.database_url.expose_secret(), "sqlite::memory:");
        assert_eq!(settings.listen_addr, "127.0.0.1:5000");
        assert_eq!(settings.max_connections, 2);
    }

    #[test]
    fn secret_is_not_printed() {
        let settings = Settings::from_environment(environment(&[(
            "DATABASE_URL",
            "sqlite:secret-path.db",
        )]))
        .unwrap();
        assert!(!format!("{settings:?}").contains("secret-path"));
    }
}
