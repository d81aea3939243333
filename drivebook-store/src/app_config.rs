use drivebook_catalog::PricingConfig;
use drivebook_order::manager::DEFAULT_CONFIRMATION_WINDOW_SECS;
use drivebook_order::Page;
use drivebook_shared::Money;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub business_rules: BusinessRules,
    pub flow: FlowConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    /// Simulated round trip of the logout call
    pub logout_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { logout_delay_ms: 300 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BusinessRules {
    pub discount_threshold: u32,
    pub discount_percent: u32,
    pub joining_fee: Money,
    pub currency_symbol: String,
}

impl Default for BusinessRules {
    fn default() -> Self {
        let pricing = PricingConfig::default();
        Self {
            discount_threshold: pricing.discount_threshold,
            discount_percent: pricing.discount_percent,
            joining_fee: Money::from_whole(50),
            currency_symbol: pricing.currency_symbol,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FlowConfig {
    /// Page slugs (`checkout`, `contact`, ...) that need a session
    pub protected_pages: Vec<String>,
    /// Seconds a paid booking waits for its confirmation page
    pub confirmation_window_secs: i64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            protected_pages: Vec::new(),
            confirmation_window_secs: DEFAULT_CONFIRMATION_WINDOW_SECS,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = config::Config::builder()
            // Defaults live in code, so even the base file is optional
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, never checked in
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(Self::environment());

        Self::from_builder(builder)
    }

    /// Eg. `DRIVEBOOK__SERVER__PORT=8080` or
    /// `DRIVEBOOK__FLOW__PROTECTED_PAGES=checkout,contact`
    fn environment() -> config::Environment {
        config::Environment::with_prefix("DRIVEBOOK")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("flow.protected_pages")
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;

        if config.flow.confirmation_window_secs <= 0 {
            return Err(config::ConfigError::Message(format!(
                "flow.confirmation_window_secs must be positive, got {}",
                config.flow.confirmation_window_secs
            )));
        }

        if config.business_rules.discount_percent > 100 {
            return Err(config::ConfigError::Message(format!(
                "business_rules.discount_percent must be at most 100, got {}",
                config.business_rules.discount_percent
            )));
        }

        Ok(config)
    }

    pub fn pricing(&self) -> PricingConfig {
        PricingConfig {
            discount_threshold: self.business_rules.discount_threshold,
            discount_percent: self.business_rules.discount_percent,
            currency_symbol: self.business_rules.currency_symbol.clone(),
        }
    }

    pub fn logout_delay(&self) -> Duration {
        Duration::from_millis(self.session.logout_delay_ms)
    }

    pub fn confirmation_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.flow.confirmation_window_secs)
    }

    /// Unknown slugs are skipped with a warning
    pub fn protected_pages(&self) -> Vec<Page> {
        self.flow
            .protected_pages
            .iter()
            .filter_map(|slug| {
                let page = Page::from_slug(slug);
                if page.is_none() {
                    tracing::warn!(slug = %slug, "Ignoring unknown protected page");
                }
                page
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn from_toml(toml: &str) -> Result<Config, config::ConfigError> {
        Config::from_builder(config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn test_empty_source_uses_defaults() {
        let config = from_toml("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logout_delay(), Duration::from_millis(300));
        assert_eq!(config.pricing(), PricingConfig::default());
        assert_eq!(config.business_rules.joining_fee, Money::from_whole(50));
        assert!(config.protected_pages().is_empty());
        assert_eq!(config.confirmation_window(), chrono::Duration::minutes(30));
    }

    #[test]
    fn test_partial_override() {
        let config = from_toml(
            r#"
            [business_rules]
            discount_threshold = 10
            joining_fee = 75

            [flow]
            protected_pages = ["checkout", "contact", "nowhere"]
            "#,
        )
        .unwrap();

        assert_eq!(config.pricing().discount_threshold, 10);
        assert_eq!(config.pricing().discount_percent, 20);
        assert_eq!(config.business_rules.joining_fee, Money::from_whole(75));
        assert_eq!(config.protected_pages(), vec![Page::Checkout, Page::Contact]);
    }

    fn from_env(vars: &[(&str, &str)]) -> Result<Config, config::ConfigError> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_builder(config::Config::builder().add_source(Config::environment().source(Some(vars))))
    }

    #[test]
    fn test_environment_overrides() {
        let config = from_env(&[
            ("DRIVEBOOK__SERVER__PORT", "8080"),
            ("DRIVEBOOK__FLOW__PROTECTED_PAGES", "checkout,contact"),
            ("DRIVEBOOK__FLOW__CONFIRMATION_WINDOW_SECS", "120"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.protected_pages(), vec![Page::Checkout, Page::Contact]);
        assert_eq!(config.confirmation_window(), chrono::Duration::seconds(120));
    }

    #[test]
    fn test_single_protected_page_from_environment() {
        let config = from_env(&[("DRIVEBOOK__FLOW__PROTECTED_PAGES", "checkout")]).unwrap();
        assert_eq!(config.protected_pages(), vec![Page::Checkout]);
    }

    #[test]
    fn test_non_positive_confirmation_window_rejected() {
        let err = from_toml("[flow]\nconfirmation_window_secs = 0").unwrap_err();
        assert!(err.to_string().contains("confirmation_window_secs"));
    }

    #[test]
    fn test_discount_over_hundred_percent_rejected() {
        let err = from_toml("[business_rules]\ndiscount_percent = 120").unwrap_err();
        assert!(err.to_string().contains("discount_percent"));
    }
}
