use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum accepted request body in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
    /// Directory scanned for `*.rtf` and `*.txt` templates at startup
    #[serde(default = "default_templates_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_weekly_template")]
    pub weekly: String,
    #[serde(default = "default_invoice_template")]
    pub invoice: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_invoices_path")]
    pub invoices: PathBuf,
    /// Weekly report JSON; the built-in sample report is used when unset
    #[serde(default)]
    pub weekly: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConverterConfig {
    #[serde(default = "default_converter_program")]
    pub program: String,
    #[serde(default = "default_converter_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_body_limit() -> usize {
    1024 * 1024 // 1 MiB
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_weekly_template() -> String {
    "template".to_string()
}

fn default_invoice_template() -> String {
    "template2".to_string()
}

fn default_invoices_path() -> PathBuf {
    PathBuf::from("data/data.json")
}

fn default_converter_program() -> String {
    "soffice".to_string()
}

fn default_converter_timeout() -> u64 {
    60
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("server.body_limit", default_body_limit() as i64)?
            .set_default("converter.program", default_converter_program())?
            .set_default("converter.timeout_seconds", default_converter_timeout() as i64)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // REPORT__SERVER__PORT, REPORT__CONVERTER__PROGRAM, REPORT__DATA__WEEKLY, ...
            .add_source(
                Environment::with_prefix("REPORT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit: default_body_limit(),
        }
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: default_templates_dir(),
            weekly: default_weekly_template(),
            invoice: default_invoice_template(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            invoices: default_invoices_path(),
            weekly: None,
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: default_converter_program(),
            timeout_seconds: default_converter_timeout(),
        }
    }
}
