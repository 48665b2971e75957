//! Configuration module
//!
//! This module provides configuration structures for the API server and the
//! image ingestion pipeline. Values come from the process environment, with an
//! optional `.env` file loaded through `dotenvy`.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

// Common constants
const SERVER_PORT: u16 = 3000;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;
const MAX_UPLOAD_SIZE_MB: usize = 10;
const IMAGE_MAX_WIDTH: u32 = 1920;
const IMAGE_MAX_HEIGHT: u32 = 1080;
const IMAGE_QUALITY: u8 = 85;
const UPLOAD_TIMEOUT_SECS: u64 = 30;
const MIN_ADMIN_TOKEN_LENGTH: usize = 32;

/// Public static root used when `PUBLIC_ROOT` is not set
pub const DEFAULT_PUBLIC_ROOT: &str = "public";

/// Folder used when an upload does not name one
pub const DEFAULT_UPLOAD_FOLDER: &str = "uploads";

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// Bearer token granting access to the admin endpoints
    pub admin_api_token: String,
    /// Maximum in-flight HTTP requests
    pub http_concurrency_limit: usize,
}

/// Image ingestion settings
#[derive(Clone, Debug)]
pub struct UploadSettings {
    pub public_root: PathBuf,
    pub default_folder: String,
    pub max_file_size_bytes: usize,
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
    pub timeout_secs: u64,
    pub max_concurrent_encodes: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            public_root: PathBuf::from(DEFAULT_PUBLIC_ROOT),
            default_folder: DEFAULT_UPLOAD_FOLDER.to_string(),
            max_file_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            max_width: IMAGE_MAX_WIDTH,
            max_height: IMAGE_MAX_HEIGHT,
            quality: IMAGE_QUALITY,
            timeout_secs: UPLOAD_TIMEOUT_SECS,
            max_concurrent_encodes: default_encode_concurrency(),
        }
    }
}

impl UploadSettings {
    /// Read upload settings from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let max_upload_size_mb = env_parse("MAX_UPLOAD_SIZE_MB", MAX_UPLOAD_SIZE_MB);

        Self {
            public_root: env::var("PUBLIC_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.public_root),
            default_folder: env::var("DEFAULT_UPLOAD_FOLDER")
                .map(|s| s.trim().trim_matches('/').to_string())
                .unwrap_or(defaults.default_folder),
            max_file_size_bytes: max_upload_size_mb * 1024 * 1024,
            max_width: env_parse("IMAGE_MAX_WIDTH", defaults.max_width),
            max_height: env_parse("IMAGE_MAX_HEIGHT", defaults.max_height),
            quality: env_parse("IMAGE_QUALITY", defaults.quality),
            timeout_secs: env_parse("UPLOAD_TIMEOUT_SECS", defaults.timeout_secs),
            max_concurrent_encodes: env_parse(
                "MAX_CONCURRENT_ENCODES",
                defaults.max_concurrent_encodes,
            ),
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.quality == 0 || self.quality > 100 {
            return Err(anyhow::anyhow!("IMAGE_QUALITY must be between 1 and 100"));
        }

        if self.max_width == 0 || self.max_height == 0 {
            return Err(anyhow::anyhow!(
                "IMAGE_MAX_WIDTH and IMAGE_MAX_HEIGHT must be greater than zero"
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than zero"));
        }

        if self.timeout_secs == 0 {
            return Err(anyhow::anyhow!("UPLOAD_TIMEOUT_SECS must be greater than zero"));
        }

        if self.max_concurrent_encodes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_CONCURRENT_ENCODES must be greater than zero"
            ));
        }

        if self.default_folder.is_empty() {
            return Err(anyhow::anyhow!("DEFAULT_UPLOAD_FOLDER must not be empty"));
        }

        Ok(())
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub upload: UploadSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let admin_api_token = env::var("ADMIN_API_TOKEN")
            .map_err(|_| anyhow::anyhow!("ADMIN_API_TOKEN environment variable not set"))?;

        Ok(Config {
            base: BaseConfig {
                server_port: env_parse("SERVER_PORT", SERVER_PORT),
                cors_origins,
                environment,
                admin_api_token,
                http_concurrency_limit: env_parse(
                    "HTTP_CONCURRENCY_LIMIT",
                    HTTP_CONCURRENCY_LIMIT,
                ),
            },
            upload: UploadSettings::from_env(),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.admin_api_token.len() < MIN_ADMIN_TOKEN_LENGTH {
            return Err(anyhow::anyhow!(
                "ADMIN_API_TOKEN must be at least {} characters long",
                MIN_ADMIN_TOKEN_LENGTH
            ));
        }

        if self.base.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!(
                "HTTP_CONCURRENCY_LIMIT must be greater than zero"
            ));
        }

        self.upload.validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn admin_api_token(&self) -> &str {
        &self.base.admin_api_token
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.base.http_concurrency_limit
    }

    pub fn upload(&self) -> &UploadSettings {
        &self.upload
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

/// Parse an environment variable, keeping `default` when it is unset or malformed
fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn default_encode_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
}
