use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub data_source: DataSourceSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    Fixtures,
    Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataSourceSettings {
    pub kind: DataSourceKind,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub token: Option<String>,
}

impl DataSourceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Load `config/civease.{toml,yaml,json}` (optional) with `CIVEASE__*`
/// environment overrides, e.g. `CIVEASE__DATA_SOURCE__KIND=http`.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    load_with(config::File::with_name("config/civease").required(false))
}

fn load_with<S>(source: S) -> anyhow::Result<AppConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .set_default("server.bind_addr", "0.0.0.0:8080")?
        .set_default("data_source.kind", "fixtures")?
        .set_default("data_source.timeout_secs", 10)?
        .add_source(source)
        .add_source(config::Environment::with_prefix("CIVEASE").separator("__"))
        .build()?;

    let app_config: AppConfig = settings.try_deserialize()?;
    app_config.validate()?;
    Ok(app_config)
}

impl AppConfig {
    fn validate(&self) -> anyhow::Result<()> {
        if self.data_source.kind == DataSourceKind::Http && self.data_source.base_url.is_none() {
            anyhow::bail!("data_source.base_url is required when data_source.kind = \"http\"");
        }
        if self.data_source.timeout_secs == 0 {
            anyhow::bail!("data_source.timeout_secs must be at least 1");
        }
        Ok(())
    }
}
