use crate::OutputFormat;
use clap::Parser;
use std::{
    path::PathBuf,
    time::Duration,
};

/// Periodically collect follower, stream and video statistics for Twitch users.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version = version(), about, long_about = None)]
pub struct Args {
    /// Explicit config file (yaml). Overrides the file in the config directory.
    #[clap(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Comma separated list of user ids to collect, replaces the configured list.
    #[clap(long, value_name = "ID,...", value_delimiter = ',')]
    pub users: Option<Vec<u64>>,

    /// Time between two collection runs (e.g. "30s", "5m").
    #[clap(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub interval: Option<Duration>,

    /// Output format of the emitted records.
    #[clap(long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Run a single collection and exit.
    #[clap(long, action)]
    pub once: bool,

    /// Enables debug logging.
    #[clap(short, long, action)]
    pub verbose: bool,
}

mod config_ext {
    use super::*;
    use config::{
        Map,
        Source,
        Value,
    };
    use std::collections::HashMap;

    impl Source for Args {
        fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
            Box::new((*self).clone())
        }

        fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
            let mut cache = HashMap::<String, Value>::new();
            if let Some(users) = &self.users {
                let users = users.iter().map(|id| Value::from(*id)).collect::<Vec<_>>();
                cache.insert("users".to_string(), users.into());
            }
            if let Some(interval) = &self.interval {
                cache.insert(
                    "interval".to_string(),
                    humantime::format_duration(*interval).to_string().into(),
                );
            }
            if let Some(output) = &self.output {
                cache.insert("output".to_string(), output.to_string().into());
            }
            Ok(cache)
        }
    }
}

pub fn version() -> String {
    let author = clap::crate_authors!();
    let config_dir_path = crate::get_config_dir().display().to_string();

    format!(
        "{}\n\
Authors: {author}

Config directory: {config_dir_path}",
        clap::crate_version!()
    )
}
