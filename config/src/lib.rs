#[macro_use]
extern crate tracing;

mod app_config;
mod args;
mod duration;
mod output_format;

pub use app_config::get_config_dir;
pub use args::Args;
use color_eyre::Result;
use eyre::{
    eyre,
    Context as _,
};
pub use output_format::OutputFormat;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    path::Path,
    time::Duration,
};
use url::Url;

/// Upper bound of ids accepted by a single bulk user lookup.
pub const MAX_BATCH_SIZE: usize = 100;

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

const ENV_PREFIX: &str = "TWITCH_STATS";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// User access token. When absent an app access token is requested with the client credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    /// Ids to collect, in order. Duplicates are kept.
    #[serde(default)]
    pub users: Vec<u64>,
    #[serde(with = "duration")]
    pub interval: Duration,
    pub batch_size: usize,
    pub max_concurrent_batches: usize,
    pub max_concurrent_users: usize,
    /// Ceiling for followed cursors per paginated resource; `None` follows the cursor until it is empty.
    #[serde(default)]
    pub max_pages: Option<usize>,
    pub api_url: Url,
    pub auth_url: Url,
    #[serde(with = "duration")]
    pub request_timeout: Duration,
    #[serde(default)]
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        serde_yml::from_str(DEFAULT_CONFIG).expect("Failed to parse default config")
    }
}

impl config::Source for Config {
    fn clone_into_box(&self) -> Box<dyn config::Source + Send + Sync> {
        Box::new((*self).clone())
    }

    fn collect(&self) -> Result<config::Map<String, config::Value>, config::ConfigError> {
        let mut cache = config::Map::<String, config::Value>::new();
        if let Some(token) = &self.access_token {
            cache.insert("access_token".to_string(), token.clone().into());
        }
        cache.insert("client_id".to_string(), self.client_id.clone().into());
        cache.insert("client_secret".to_string(), self.client_secret.clone().into());
        cache.insert(
            "users".to_string(),
            self.users
                .iter()
                .map(|id| config::Value::from(*id))
                .collect::<Vec<_>>()
                .into(),
        );
        cache.insert(
            "interval".to_string(),
            humantime::format_duration(self.interval).to_string().into(),
        );
        cache.insert("batch_size".to_string(), (self.batch_size as u64).into());
        cache.insert(
            "max_concurrent_batches".to_string(),
            (self.max_concurrent_batches as u64).into(),
        );
        cache.insert(
            "max_concurrent_users".to_string(),
            (self.max_concurrent_users as u64).into(),
        );
        if let Some(max_pages) = self.max_pages {
            cache.insert("max_pages".to_string(), (max_pages as u64).into());
        }
        cache.insert("api_url".to_string(), self.api_url.to_string().into());
        cache.insert("auth_url".to_string(), self.auth_url.to_string().into());
        cache.insert(
            "request_timeout".to_string(),
            humantime::format_duration(self.request_timeout).to_string().into(),
        );
        cache.insert("output".to_string(), self.output.to_string().into());
        Ok(cache)
    }
}

impl Config {
    /// Layers the embedded defaults, the config directory file, an explicit `--config` file, `TWITCH_STATS_*`
    /// environment variables and finally the command-line arguments.
    pub fn new(args: Args) -> Result<Self, config::ConfigError> {
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder().add_source(Config::default());

        let config_files = [("config.yaml", config::FileFormat::Yaml)];

        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
        }

        if let Some(path) = &args.config {
            builder = builder.add_source(config::File::from(path.as_path()).format(config::FileFormat::Yaml));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("users"),
        );

        builder = builder.add_source(args);

        let cfg: Self = builder.build()?.try_deserialize()?;

        Ok(cfg)
    }

    /// Reads a standalone yaml file on top of the embedded defaults, without consulting env or args.
    pub fn from_file(path: &Path) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(Config::default())
            .add_source(config::File::from(path).format(config::FileFormat::Yaml))
            .build()
            .and_then(|c| c.try_deserialize())
            .wrap_err_with(|| format!("Failed to load config from {:?}", path))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(eyre!("config.client_id must be non-empty"));
        }
        if self.access_token.is_none() && self.client_secret.trim().is_empty() {
            return Err(eyre!(
                "config.client_secret is required when no access_token is configured"
            ));
        }
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(eyre!("config.batch_size must be within 1..={MAX_BATCH_SIZE}"));
        }
        if self.max_concurrent_batches == 0 || self.max_concurrent_users == 0 {
            return Err(eyre!("config.max_concurrent_batches and config.max_concurrent_users must be > 0"));
        }
        if self.max_pages == Some(0) {
            return Err(eyre!("config.max_pages must be > 0 when set"));
        }
        if self.users.is_empty() {
            warn!("no users configured, collection runs will emit nothing");
        }
        Ok(())
    }

    /// Copy with secrets masked, safe to log.
    pub fn redacted(&self) -> Self {
        const MASK: &str = "********";
        let mut clone = self.clone();
        if clone.access_token.is_some() {
            clone.access_token = Some(MASK.to_string());
        }
        if !clone.client_secret.is_empty() {
            clone.client_secret = MASK.to_string();
        }
        clone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid() -> Config {
        Config {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            users: vec![12826, 141981764],
            ..Config::default()
        }
    }

    #[test]
    fn default_config_parses() {
        let cfg = Config::default();
        assert_eq!(cfg.batch_size, MAX_BATCH_SIZE);
        assert_eq!(cfg.interval, Duration::from_secs(300));
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
        assert_eq!(cfg.api_url.as_str(), "https://api.twitch.tv/helix/");
        assert_eq!(cfg.output, OutputFormat::Line);
        assert!(cfg.users.is_empty());
    }

    #[test]
    fn validate_requires_credentials() {
        assert!(valid().validate().is_ok());

        let cfg = Config {
            client_id: String::new(),
            ..valid()
        };
        assert!(cfg.validate().is_err());

        let cfg = Config {
            client_secret: String::new(),
            ..valid()
        };
        assert!(cfg.validate().is_err());

        let cfg = Config {
            client_secret: String::new(),
            access_token: Some("token".to_string()),
            ..valid()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_limits() {
        for cfg in [
            Config { batch_size: 0, ..valid() },
            Config { batch_size: 101, ..valid() },
            Config { max_concurrent_batches: 0, ..valid() },
            Config { max_concurrent_users: 0, ..valid() },
            Config { max_pages: Some(0), ..valid() },
        ] {
            assert!(cfg.validate().is_err(), "{cfg:?} should be rejected");
        }
    }

    #[test]
    fn redacted_masks_secrets() {
        let cfg = Config {
            access_token: Some("token".to_string()),
            ..valid()
        }
        .redacted();
        assert_eq!(cfg.access_token.as_deref(), Some("********"));
        assert_eq!(cfg.client_secret, "********");
        assert_eq!(cfg.client_id, "client");
    }

    #[test]
    fn args_override_defaults() {
        let args = Args {
            users: Some(vec![1, 2, 3]),
            interval: Some(Duration::from_secs(30)),
            output: Some(OutputFormat::Json),
            ..Args::default()
        };
        let cfg = config::Config::builder()
            .add_source(Config::default())
            .add_source(args)
            .build()
            .and_then(|c| c.try_deserialize::<Config>())
            .unwrap();
        assert_eq!(cfg.users, vec![1, 2, 3]);
        assert_eq!(cfg.interval, Duration::from_secs(30));
        assert_eq!(cfg.output, OutputFormat::Json);
        assert_eq!(cfg.batch_size, MAX_BATCH_SIZE);
    }

    #[test]
    fn yaml_file_layers_on_defaults() {
        let dir = std::env::temp_dir().join(format!("twitch-stats-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        std::fs::write(
            &path,
            "client_id: abc\nclient_secret: def\nusers: [5, 5, 7]\ninterval: 1m\nmax_pages: 3\n",
        )
        .unwrap();

        let cfg = Config::from_file(&path).unwrap();
        assert_eq!(cfg.client_id, "abc");
        assert_eq!(cfg.users, vec![5, 5, 7]);
        assert_eq!(cfg.interval, Duration::from_secs(60));
        assert_eq!(cfg.max_pages, Some(3));
        assert_eq!(cfg.max_concurrent_users, Config::default().max_concurrent_users);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
