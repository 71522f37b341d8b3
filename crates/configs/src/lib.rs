use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Which claim store the process runs against. Fixed for the process lifetime.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    #[default]
    Memory,
    Dynamodb,
}

impl std::str::FromStr for StorageBackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" => Ok(Self::Memory),
            "dynamodb" | "ddb" => Ok(Self::Dynamodb),
            other => Err(anyhow!("unknown storage backend '{other}'; supported: memory, dynamodb")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackendKind,
    #[serde(default)]
    pub dynamodb: DynamoDbConfig,
}

/// Connection settings for the DynamoDB-backed claim store.
///
/// The table (with its `GSI1` index) is provisioned outside this service.
#[derive(Debug, Clone, Deserialize)]
pub struct DynamoDbConfig {
    #[serde(default = "default_table_name")]
    pub table_name: String,
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// Item cap for listings without a `user_id` filter.
    #[serde(default = "default_scan_limit")]
    pub scan_limit: i32,
}

impl Default for DynamoDbConfig {
    fn default() -> Self {
        Self {
            table_name: default_table_name(),
            endpoint_url: None,
            region: default_region(),
            access_key_id: None,
            secret_access_key: None,
            scan_limit: default_scan_limit(),
        }
    }
}

fn default_table_name() -> String { "ClaimsTable".to_string() }
fn default_region() -> String { "us-west-2".to_string() }
fn default_scan_limit() -> i32 { 100 }

const MAX_SCAN_LIMIT: i32 = 1000;

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the
    /// file is absent, then apply env overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Overlay environment variables. `lookup` is injected so tests do not
    /// have to mutate the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.server.port = port.parse().map_err(|_| anyhow!("SERVER_PORT must be a port number, got '{port}'"))?;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Some(backend) = lookup("STORAGE_BACKEND") {
            self.storage.backend = backend.parse()?;
        }
        self.storage.dynamodb.apply_env(&lookup);
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.backend == StorageBackendKind::Dynamodb {
            self.dynamodb.validate()?;
        }
        Ok(())
    }
}

impl DynamoDbConfig {
    fn apply_env<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(table) = lookup("CLAIMS_TABLE") {
            self.table_name = table;
        }
        if let Some(endpoint) = lookup("DDB_ENDPOINT").filter(|v| !v.trim().is_empty()) {
            self.endpoint_url = Some(endpoint);
        }
        if let Some(region) = lookup("AWS_REGION") {
            self.region = region;
        }
        if let Some(key) = lookup("DDB_ACCESS_KEY_ID") {
            self.access_key_id = Some(key);
        }
        if let Some(secret) = lookup("DDB_SECRET_ACCESS_KEY") {
            self.secret_access_key = Some(secret);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.table_name.trim().is_empty() {
            return Err(anyhow!("storage.dynamodb.table_name is empty; set it in config.toml or CLAIMS_TABLE"));
        }
        if self.region.trim().is_empty() {
            return Err(anyhow!("storage.dynamodb.region is empty"));
        }
        if !(1..=MAX_SCAN_LIMIT).contains(&self.scan_limit) {
            return Err(anyhow!("storage.dynamodb.scan_limit must be within 1..={MAX_SCAN_LIMIT}"));
        }
        if self.access_key_id.is_some() != self.secret_access_key.is_some() {
            return Err(anyhow!("storage.dynamodb access_key_id and secret_access_key must be set together"));
        }
        if let Some(url) = &self.endpoint_url {
            let lower = url.to_lowercase();
            if !(lower.starts_with("http://") || lower.starts_with("https://")) {
                return Err(anyhow!("storage.dynamodb.endpoint_url must start with http:// or https://"));
            }
        }
        Ok(())
    }
}
