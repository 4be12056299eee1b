use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;

use crate::system::Result;

#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    /// Upstream resolver as `host:port`. Answers are synthesized locally
    /// when absent.
    pub resolver: Option<String>,
    pub relay_timeout_ms: u64,
    pub parallel_forwarding: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: "0.0.0.0".to_string(),
            port: 2053,
            resolver: None,
            relay_timeout_ms: 5000,
            parallel_forwarding: false,
            log_level: "info".to_string(),
        }
    }
}

/// Values given on the command line; each one replaces the file's value.
#[derive(Debug, Default)]
pub struct Overrides {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub resolver: Option<String>,
    pub log_level: Option<String>,
    pub parallel_forwarding: bool,
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(bind) = overrides.bind {
            self.bind = bind;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if overrides.resolver.is_some() {
            self.resolver = overrides.resolver;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        if overrides.parallel_forwarding {
            self.parallel_forwarding = true;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(resolver) = &self.resolver {
            check_host_port(resolver)?;
        }
        if self.relay_timeout_ms == 0 {
            return Err("relay_timeout_ms must be greater than zero".into());
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        if self.bind.contains(':') {
            format!("[{}]:{}", self.bind, self.port)
        } else {
            format!("{}:{}", self.bind, self.port)
        }
    }

    pub fn relay_timeout(&self) -> Duration {
        Duration::from_millis(self.relay_timeout_ms)
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| format!("unknown log level: {}", self.log_level).into())
    }
}

fn check_host_port(address: &str) -> Result<()> {
    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| format!("resolver must be host:port, got {}", address))?;
    if host.is_empty() {
        return Err(format!("resolver host is empty in {}", address).into());
    }
    port.parse::<u16>()
        .map_err(|_| format!("resolver port is not a number in {}", address))?;
    Ok(())
}

/// Reads the TOML file when one is given, otherwise starts from defaults.
pub async fn init_from_toml(path: Option<&Path>, overrides: Overrides) -> Result<Config> {
    let mut config = match path {
        Some(path) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| format!("cannot read config {}: {}", path.display(), e))?;
            Config::from_toml(&content)?
        }
        None => Config::default(),
    };
    config.apply(overrides);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_use_defaults_when_call_from_toml_given_empty_content() {
        let config = Config::from_toml("").unwrap();

        assert_eq!(Config::default(), config);
        assert_eq!("0.0.0.0:2053", config.listen_addr());
        assert_eq!(Duration::from_secs(5), config.relay_timeout());
    }

    #[test]
    fn should_read_fields_when_call_from_toml_given_full_content() {
        let content = r#"
            bind = "127.0.0.1"
            port = 5353
            resolver = "8.8.4.4:53"
            relay_timeout_ms = 250
            parallel_forwarding = true
            log_level = "debug"
        "#;

        let config = Config::from_toml(content).unwrap();

        assert_eq!("127.0.0.1:5353", config.listen_addr());
        assert_eq!(Some("8.8.4.4:53".to_string()), config.resolver);
        assert_eq!(Duration::from_millis(250), config.relay_timeout());
        assert!(config.parallel_forwarding);
        assert_eq!(LevelFilter::Debug, config.level_filter().unwrap());
    }

    #[test]
    fn should_replace_file_values_when_call_apply_given_overrides() {
        let mut config = Config::from_toml("port = 5353\nresolver = \"1.1.1.1:53\"").unwrap();

        config.apply(Overrides {
            port: Some(2054),
            resolver: Some("9.9.9.9:53".to_string()),
            ..Overrides::default()
        });

        assert_eq!(2054, config.port);
        assert_eq!(Some("9.9.9.9:53".to_string()), config.resolver);
        assert_eq!("0.0.0.0", config.bind);
    }

    #[test]
    fn should_return_error_when_call_validate_given_resolver_without_port() {
        let config = Config {
            resolver: Some("8.8.8.8".to_string()),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn should_return_error_when_call_validate_given_unknown_log_level() {
        let config = Config {
            log_level: "loud".to_string(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn should_bracket_ipv6_when_call_listen_addr() {
        let config = Config {
            bind: "::".to_string(),
            ..Config::default()
        };

        assert_eq!("[::]:2053", config.listen_addr());
    }

    #[test]
    fn should_return_error_when_call_from_toml_given_wrong_type() {
        assert!(Config::from_toml("port = \"fifty\"").is_err());
    }

    #[tokio::test]
    async fn should_use_defaults_when_call_init_from_toml_given_no_file() {
        let config = init_from_toml(None, Overrides::default()).await.unwrap();

        assert_eq!(Config::default(), config);
    }
}
