use anyhow::{Context, Result};
use std::env;

/// Store configuration
///
/// Built with chained setters, like a database connection config.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Load demo users, students, a class and default settings on open
    pub seed_demo_data: bool,

    /// Email of the seeded administrator
    pub admin_email: String,

    /// Password of the seeded administrator
    pub admin_password: String,
}

impl StoreConfig {
    const DEFAULT_ADMIN_EMAIL: &'static str = "admin@tutordesk.local";
    const DEFAULT_ADMIN_PASSWORD: &'static str = "adminpass";

    /// An empty store with no seed data
    pub fn new() -> Self {
        Self {
            seed_demo_data: false,
            admin_email: Self::DEFAULT_ADMIN_EMAIL.to_string(),
            admin_password: Self::DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }

    /// Enable or disable demo data
    pub fn seed_demo_data(mut self, seed: bool) -> Self {
        self.seed_demo_data = seed;
        self
    }

    /// Set the seeded administrator's credentials
    pub fn admin(mut self, email: &str, password: &str) -> Self {
        self.admin_email = email.to_string();
        self.admin_password = password.to_string();
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings of the `tutordesk` binary, read from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub seed_demo_data: bool,
    pub log_filter: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl AppConfig {
    pub const DEFAULT_LOG_FILTER: &'static str = "tutordesk=info";

    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let seed_demo_data = match env::var("TUTORDESK_SEED") {
            Ok(raw) => parse_flag(&raw).context("TUTORDESK_SEED must be a boolean")?,
            Err(_) => true,
        };

        let log_filter = env::var("TUTORDESK_LOG")
            .or_else(|_| env::var("RUST_LOG"))
            .unwrap_or_else(|_| Self::DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            seed_demo_data,
            log_filter,
            admin_email: env::var("TUTORDESK_ADMIN_EMAIL").ok(),
            admin_password: env::var("TUTORDESK_ADMIN_PASSWORD").ok(),
        })
    }

    pub fn store_config(&self) -> StoreConfig {
        let mut config = StoreConfig::new().seed_demo_data(self.seed_demo_data);
        if let Some(email) = &self.admin_email {
            config.admin_email = email.clone();
        }
        if let Some(password) = &self.admin_password {
            config.admin_password = password.clone();
        }
        config
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("'{other}' is not one of true/false/1/0/yes/no/on/off")),
    }
}
