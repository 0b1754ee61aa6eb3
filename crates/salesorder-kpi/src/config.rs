//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The
//! configuration file path defaults to `salesorder.yaml` but can be specified via the `-f`
//! flag or the `SALESORDER_CONFIG` environment variable. A missing file is not an error:
//! every key has a default.
//!
//! ## Loading Priority
//!
//! 1. **YAML config file** - Base configuration
//! 2. **Environment variables** - Variables prefixed with `SALESORDER_` override YAML values
//!
//! For nested values use double underscores, e.g.
//! `SALESORDER_SALES_ORDER_SERVICE__URL=https://host/sap/opu/odata/sap/API_SALES_ORDER_SRV`.
//!
//! ## Example
//!
//! ```yaml
//! sales_order_service:
//!   url: https://host/sap/opu/odata/sap/API_SALES_ORDER_SRV
//! business_partner_service:
//!   url: https://host/sap/opu/odata/sap/API_BUSINESS_PARTNER
//! credentials:
//!   username: reporting
//!   password: secret
//! page_size: 50
//! empty_page_policy: keep_server_total
//! ```
//!
//! Without service URLs the binary runs against built-in demo data.

use crate::kpi::EmptyPagePolicy;
use crate::lifecycle::SessionSettings;
use clap::Parser;
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ORDER_ENTITY_SET: &str = "A_SalesOrder";
pub const DEFAULT_CUSTOMER_ENTITY_SET: &str = "A_Customer";

/// CLI args: the config file, plus an optional search to run after the first load.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "SALESORDER_CONFIG", default_value = "salesorder.yaml")]
    pub config: String,

    /// Free-text search over order id, customer and creator
    #[arg(short, long)]
    pub search: Option<String>,

    /// Validate configuration and exit.
    #[arg(long)]
    pub validate: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sales_order_service: ServiceConfig,
    pub business_partner_service: ServiceConfig,
    /// Basic-auth credentials sent to both services.
    pub credentials: Option<Credentials>,
    pub request_timeout_secs: u64,
    /// Rows per list page.
    pub page_size: u32,
    pub value_help_limit: u32,
    /// Capacity of the customer cache's request channel.
    pub cache_buffer: usize,
    pub empty_page_policy: EmptyPagePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sales_order_service: ServiceConfig::default(),
            business_partner_service: ServiceConfig::default(),
            credentials: None,
            request_timeout_secs: 30,
            page_size: 20,
            value_help_limit: crate::value_help::VALUE_HELP_ROW_LIMIT,
            cache_buffer: 32,
            empty_page_policy: EmptyPagePolicy::default(),
        }
    }
}

/// One OData service root and the entity set read from it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub url: Option<String>,
    pub entity_set: Option<String>,
}

#[derive(Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Config {
    /// Extracts the configuration. Setting only one of the two service URLs is an error.
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        let orders = config.sales_order_service.url.is_some();
        let customers = config.business_partner_service.url.is_some();
        if orders != customers {
            return Err(figment::Error::from(
                "sales_order_service.url and business_partner_service.url must be set together"
                    .to_string(),
            ));
        }
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            .merge(Yaml::file(&args.config))
            .merge(Env::prefixed("SALESORDER_").ignore(&["config"]).split("__"))
    }

    pub fn order_entity_set(&self) -> &str {
        self.sales_order_service
            .entity_set
            .as_deref()
            .unwrap_or(DEFAULT_ORDER_ENTITY_SET)
    }

    pub fn customer_entity_set(&self) -> &str {
        self.business_partner_service
            .entity_set
            .as_deref()
            .unwrap_or(DEFAULT_CUSTOMER_ENTITY_SET)
    }

    /// True when both service URLs are set; the binary then talks to the real services.
    pub fn uses_remote_services(&self) -> bool {
        self.sales_order_service.url.is_some() && self.business_partner_service.url.is_some()
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            page_size: self.page_size,
            value_help_limit: self.value_help_limit,
            cache_buffer: self.cache_buffer,
            empty_page_policy: self.empty_page_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn args(config: &str) -> Args {
        Args {
            config: config.to_string(),
            search: None,
            validate: false,
        }
    }

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = Config::load(&args("missing.yaml"))?;

            assert_eq!(config, Config::default());
            assert!(!config.uses_remote_services());
            assert_eq!(config.order_entity_set(), "A_SalesOrder");
            assert_eq!(config.customer_entity_set(), "A_Customer");
            assert_eq!(config.value_help_limit, 1000);
            assert_eq!(config.empty_page_policy, EmptyPagePolicy::ResetAll);
            Ok(())
        });
    }

    #[test]
    fn test_yaml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "salesorder.yaml",
                r#"
sales_order_service:
  url: https://host/sap/opu/odata/sap/API_SALES_ORDER_SRV
business_partner_service:
  url: https://host/sap/opu/odata/sap/API_BUSINESS_PARTNER
  entity_set: A_BusinessPartner
credentials:
  username: reporting
  password: secret
page_size: 50
empty_page_policy: keep_server_total
"#,
            )?;

            let config = Config::load(&args("salesorder.yaml"))?;

            assert!(config.uses_remote_services());
            assert_eq!(config.order_entity_set(), "A_SalesOrder");
            assert_eq!(config.customer_entity_set(), "A_BusinessPartner");
            assert_eq!(config.page_size, 50);
            assert_eq!(config.empty_page_policy, EmptyPagePolicy::KeepServerTotal);

            let credentials = config.credentials.clone().unwrap();
            assert_eq!(credentials.username, "reporting");
            assert!(!format!("{credentials:?}").contains("secret"));

            let settings = config.session_settings();
            assert_eq!(settings.page_size, 50);
            assert_eq!(settings.empty_page_policy, EmptyPagePolicy::KeepServerTotal);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_yaml() {
        Jail::expect_with(|jail| {
            jail.create_file("salesorder.yaml", "page_size: 50\n")?;
            jail.set_env("SALESORDER_PAGE_SIZE", "10");
            jail.set_env("SALESORDER_SALES_ORDER_SERVICE__URL", "http://localhost:4004/odata");
            jail.set_env("SALESORDER_BUSINESS_PARTNER_SERVICE__URL", "http://localhost:4004/bp");
            jail.set_env("SALESORDER_CONFIG", "salesorder.yaml");

            let config = Config::load(&args("salesorder.yaml"))?;

            assert_eq!(config.page_size, 10);
            assert_eq!(
                config.sales_order_service.url.as_deref(),
                Some("http://localhost:4004/odata")
            );
            assert!(config.uses_remote_services());
            Ok(())
        });
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("salesorder.yaml", "page_sise: 50\n")?;
            assert!(Config::load(&args("salesorder.yaml")).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_partial_service_config_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "salesorder.yaml",
                "sales_order_service:\n  url: https://host/API_SALES_ORDER_SRV\n",
            )?;
            let err = Config::load(&args("salesorder.yaml")).unwrap_err();
            assert!(err.to_string().contains("must be set together"));
            Ok(())
        });
    }
}
