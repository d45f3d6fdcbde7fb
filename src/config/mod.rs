pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::*;
use clap::{ArgAction, Args, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_SECRET_HEADER: &str = "x-read-secret";
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;
pub const DEFAULT_SMTP_PORT: u16 = 465;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SinkMode {
    /// Persist submissions in the record store
    #[default]
    Store,
    /// Forward submissions by email
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// One JSON file per record under `data_dir`
    #[default]
    File,
    /// In-process map, lost on restart
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, Args)]
#[serde(default)]
pub struct SmtpConfig {
    #[arg(long, env = "SMTP_HOST")]
    #[serde(rename = "host")]
    pub smtp_host: Option<String>,

    #[arg(long, env = "SMTP_PORT", default_value_t = DEFAULT_SMTP_PORT)]
    #[serde(rename = "port")]
    pub smtp_port: u16,

    #[arg(long, env = "SMTP_USERNAME")]
    #[serde(rename = "username")]
    pub smtp_username: Option<String>,

    #[arg(long, env = "SMTP_PASSWORD", hide_env_values = true)]
    #[serde(rename = "password")]
    pub smtp_password: Option<String>,

    #[arg(long, env = "SMTP_STARTTLS", default_value_t = false, action = ArgAction::Set, help = "Use STARTTLS instead of implicit TLS")]
    #[serde(rename = "starttls")]
    pub smtp_starttls: bool,

    #[arg(long, env = "MAIL_FROM")]
    #[serde(rename = "from")]
    pub mail_from: Option<String>,

    #[arg(long, env = "MAIL_TO")]
    #[serde(rename = "to")]
    pub mail_to: Option<String>,

    #[arg(long, env = "MAIL_SUBJECT", default_value = crate::core::render::DEFAULT_SUBJECT)]
    #[serde(rename = "subject")]
    pub mail_subject: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: DEFAULT_SMTP_PORT,
            smtp_username: None,
            smtp_password: None,
            smtp_starttls: false,
            mail_from: None,
            mail_to: None,
            mail_subject: crate::core::render::DEFAULT_SUBJECT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "form-sink")]
#[command(about = "Accepts JSON form submissions and stores or forwards them")]
#[serde(default)]
pub struct ServerConfig {
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[arg(long, env = "SINK_MODE", value_enum, default_value_t = SinkMode::Store)]
    pub mode: SinkMode,

    #[arg(long, env = "STORE_BACKEND", value_enum, default_value_t = StoreBackend::File)]
    pub store: StoreBackend,

    #[arg(long, env = "DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: String,

    #[arg(long, env = "READ_ENABLED", default_value_t = true, action = ArgAction::Set, help = "Serve GET /read_form_data")]
    pub read_enabled: bool,

    #[arg(long, env = "READ_SECRET", hide_env_values = true, help = "Require this value in the secret header to read")]
    pub read_secret: Option<String>,

    #[arg(long, env = "READ_SECRET_HEADER", default_value = DEFAULT_SECRET_HEADER)]
    pub secret_header: String,

    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    #[command(flatten)]
    pub smtp: SmtpConfig,

    #[arg(long, env = "FORM_SINK_CONFIG", help = "Load settings from a TOML file instead of flags")]
    #[serde(skip)]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            mode: SinkMode::Store,
            store: StoreBackend::File,
            data_dir: DEFAULT_DATA_DIR.to_string(),
            read_enabled: true,
            read_secret: None,
            secret_header: DEFAULT_SECRET_HEADER.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            smtp: SmtpConfig::default(),
            config: None,
            verbose: false,
            log_format: LogFormat::Compact,
        }
    }
}

impl ServerConfig {
    /// 解析命令列與環境變數；指定 `--config` 時改用 TOML 檔
    pub fn load() -> Result<Self> {
        Self::parse().resolve()
    }

    pub fn resolve(self) -> Result<Self> {
        match &self.config {
            Some(path) => {
                let mut from_file = Self::from_file(path)?;
                from_file.config = Some(path.clone());
                from_file.verbose |= self.verbose;
                Ok(from_file)
            }
            None => Ok(self),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reads are served only when a store backs this deployment.
    pub fn serves_reads(&self) -> bool {
        self.read_enabled && self.mode == SinkMode::Store
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("host", &self.host)?;
        validate_positive_number("port", self.port as usize, 1)?;
        validate_positive_number("max_body_bytes", self.max_body_bytes, 1)?;

        if self.mode == SinkMode::Store && self.store == StoreBackend::File {
            validate_path("data_dir", &self.data_dir)?;
        }

        if let Some(secret) = &self.read_secret {
            validate_non_empty_string("read_secret", secret)?;
            validate_header_name("secret_header", &self.secret_header)?;
        }

        if self.mode == SinkMode::Email {
            self.smtp.validate()?;
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}

impl Validate for SmtpConfig {
    fn validate(&self) -> Result<()> {
        let host = validate_required_field("smtp_host", &self.smtp_host)?;
        validate_non_empty_string("smtp_host", host)?;
        validate_positive_number("smtp_port", self.smtp_port as usize, 1)?;
        validate_mail_address("mail_from", validate_required_field("mail_from", &self.mail_from)?)?;
        validate_mail_address("mail_to", validate_required_field("mail_to", &self.mail_to)?)?;

        match (&self.smtp_username, &self.smtp_password) {
            (Some(_), None) => Err(crate::utils::error::FormError::MissingConfigError {
                field: "smtp_password".to_string(),
            }),
            (None, Some(_)) => Err(crate::utils::error::FormError::MissingConfigError {
                field: "smtp_username".to_string(),
            }),
            _ => Ok(()),
        }
    }
}
