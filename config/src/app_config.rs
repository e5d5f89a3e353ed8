use directories::ProjectDirs;
use std::{
    env,
    path::PathBuf,
};

lazy_static::lazy_static! {
    static ref CONFIG_DIR_OVERRIDE: Option<PathBuf> = env::var_os(format!("{}_CONFIG", crate::ENV_PREFIX))
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from);
}

/// Directory that holds the optional `config.yaml`.
///
/// Resolution order: `TWITCH_STATS_CONFIG`, the platform config dir, `./.config`.
pub fn get_config_dir() -> PathBuf {
    CONFIG_DIR_OVERRIDE
        .clone()
        .or_else(|| {
            ProjectDirs::from("tv", "twitch-stats", env!("CARGO_PKG_NAME")).map(|dirs| dirs.config_local_dir().into())
        })
        .unwrap_or_else(|| PathBuf::from(".config"))
}
