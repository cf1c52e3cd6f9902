use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use catalog_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_PERMISSION_CACHE_NAMESPACE: &str = "laravel_database_role";
const DEFAULT_UPLOAD_DIR: &str = "./uploads/products";
const DEFAULT_UPLOAD_URL_PREFIX: &str = "/uploads/products";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_IDENTITY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DATABASE_ACQUIRE_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout: Duration,
    pub redis_url: String,
    pub user_auth_access_url: Url,
    pub identity_timeout: Duration,
    pub permission_cache_namespace: String,
    pub aws_s3_bucket: String,
    pub aws_s3_folder: String,
    pub upload_dir: PathBuf,
    pub upload_url_prefix: String,
    pub max_upload_bytes: usize,
    pub api_host: String,
    pub api_port: u16,
    pub cors_allowed_origin: String,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    /// Builds the configuration from a variable lookup.
    pub fn from_lookup(
        migrate_only: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let value = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &str| {
            value(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
        };

        let database_url = required("DATABASE_URL")?;
        let database_max_connections = parse_or(
            value("DATABASE_MAX_CONNECTIONS"),
            "DATABASE_MAX_CONNECTIONS",
            DEFAULT_DATABASE_MAX_CONNECTIONS,
        )?;
        if database_max_connections == 0 {
            return Err(AppError::Validation(
                "DATABASE_MAX_CONNECTIONS must be at least 1".to_owned(),
            ));
        }
        let database_acquire_timeout = Duration::from_millis(parse_or(
            value("DATABASE_ACQUIRE_TIMEOUT_MS"),
            "DATABASE_ACQUIRE_TIMEOUT_MS",
            DEFAULT_DATABASE_ACQUIRE_TIMEOUT_MS,
        )?);
        let redis_url = match value("REDIS_URL") {
            Some(redis_url) => redis_url,
            None => build_redis_url(
                value("REDIS_HOST").as_deref().unwrap_or("127.0.0.1"),
                value("REDIS_PORT").as_deref().unwrap_or("6379"),
                value("REDIS_PASSWORD").as_deref(),
            )?,
        };

        let user_auth_access_url = Url::parse(required("USER_AUTH_ACCESS_URL")?.as_str())
            .map_err(|error| {
                AppError::Validation(format!("invalid USER_AUTH_ACCESS_URL: {error}"))
            })?;
        let identity_timeout = Duration::from_millis(parse_or(
            value("IDENTITY_TIMEOUT_MS"),
            "IDENTITY_TIMEOUT_MS",
            DEFAULT_IDENTITY_TIMEOUT_MS,
        )?);
        let permission_cache_namespace = value("PERMISSION_CACHE_NAMESPACE")
            .unwrap_or_else(|| DEFAULT_PERMISSION_CACHE_NAMESPACE.to_owned());

        // The migrate command never touches S3.
        let aws_s3_bucket = if migrate_only {
            value("AWS_S3_BUCKET").unwrap_or_default()
        } else {
            required("AWS_S3_BUCKET")?
        };
        let aws_s3_folder = value("AWS_S3_FOLDER").unwrap_or_default();

        let upload_dir =
            PathBuf::from(value("UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_owned()));
        let upload_url_prefix = value("UPLOAD_URL_PREFIX")
            .unwrap_or_else(|| DEFAULT_UPLOAD_URL_PREFIX.to_owned())
            .trim_end_matches('/')
            .to_owned();
        if !upload_url_prefix.starts_with('/') || upload_url_prefix.len() < 2 {
            return Err(AppError::Validation(format!(
                "UPLOAD_URL_PREFIX must be an absolute path, got '{upload_url_prefix}'"
            )));
        }
        let max_upload_bytes = parse_or(
            value("MAX_UPLOAD_BYTES"),
            "MAX_UPLOAD_BYTES",
            DEFAULT_MAX_UPLOAD_BYTES,
        )?;

        let api_host = value("API_HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let api_port = value("API_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);
        let cors_allowed_origin = value("CORS_ALLOWED_ORIGIN").unwrap_or_else(|| "*".to_owned());

        Ok(Self {
            migrate_only,
            database_url,
            database_max_connections,
            database_acquire_timeout,
            redis_url,
            user_auth_access_url,
            identity_timeout,
            permission_cache_namespace,
            aws_s3_bucket,
            aws_s3_folder,
            upload_dir,
            upload_url_prefix,
            max_upload_bytes,
            api_host,
            api_port,
            cors_allowed_origin,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn build_redis_url(host: &str, port: &str, password: Option<&str>) -> Result<String, AppError> {
    let mut url = Url::parse(format!("redis://{host}:{port}/0").as_str())
        .map_err(|error| AppError::Validation(format!("invalid REDIS_HOST/REDIS_PORT: {error}")))?;
    if let Some(password) = password {
        url.set_password(Some(password))
            .map_err(|()| AppError::Validation("invalid REDIS_PASSWORD".to_owned()))?;
    }

    Ok(url.to_string())
}

fn parse_or<T: FromStr>(value: Option<String>, name: &str, default: T) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    match value {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        None => Ok(default),
    }
}
