use anyhow::Context;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_POOL_SIZE: u32 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub api_key: Option<String>,
    pub host: String,
    pub port: u16,
    pub pool_size: u32,
}

impl Config {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let database_url = dotenvy::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let api_key = dotenvy::var("API_KEY").ok().filter(|key| !key.is_empty());
        let host = dotenvy::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match dotenvy::var("PORT") {
            Ok(port) => port.parse().with_context(|| format!("invalid PORT: {port}"))?,
            Err(_) => DEFAULT_PORT,
        };
        let pool_size = match dotenvy::var("DATABASE_POOL_SIZE") {
            Ok(size) => size
                .parse()
                .with_context(|| format!("invalid DATABASE_POOL_SIZE: {size}"))?,
            Err(_) => DEFAULT_POOL_SIZE,
        };
        Ok(Self {
            database_url,
            api_key,
            host,
            port,
            pool_size,
        })
    }

    #[cfg(test)]
    pub fn new(database_url: String, api_key: Option<String>) -> Self {
        Self {
            database_url,
            api_key,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}
