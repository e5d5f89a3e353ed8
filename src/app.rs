use crate::sinks::{
    JsonSink,
    LineProtocolSink,
    TableSink,
};
use color_eyre::Result;
use eyre::eyre;
use tokio::time::{
    self,
    MissedTickBehavior,
};
use twitch_stats_config::{
    Args,
    Config,
    OutputFormat,
};
use twitch_stats_gatherer::{
    Accumulator,
    Collector,
    Gatherer,
};

pub struct App {
    config: Config,
    once: bool,
}

impl App {
    pub fn new(args: Args) -> Result<Self> {
        let once = args.once;
        let config = Config::new(args)?;
        config.validate()?;
        debug!(config = ?config.redacted(), "configuration loaded");

        Ok(Self { config, once })
    }

    pub async fn run(self) -> Result<()> {
        let sink = sink_for(self.config.output);
        let mut gatherer = Gatherer::from_config(&self.config);

        info!(
            users = gatherer.users().len(),
            interval = %humantime::format_duration(self.config.interval),
            output = %self.config.output,
            "starting twitch stats"
        );

        if self.once {
            return run_once(&mut gatherer, sink.as_ref()).await;
        }

        let mut ticker = time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(err) = run_once(&mut gatherer, sink.as_ref()).await {
                        error!("{err:#}");
                    }
                }
                res = tokio::signal::ctrl_c() => {
                    res?;
                    info!("received ctrl-c, shutting down");
                    return Ok(());
                }
            }
        }
    }
}

/// Only a failed session fails a run. In the interval loop that is logged and the next tick opens a new one.
async fn run_once(gatherer: &mut impl Collector, sink: &dyn Accumulator) -> Result<()> {
    let name = gatherer.name();
    let summary = gatherer
        .gather(sink)
        .await
        .map_err(|err| eyre!("{name} run failed: {err}"))?;
    debug!(?summary, "run finished");
    Ok(())
}

fn sink_for(format: OutputFormat) -> Box<dyn Accumulator> {
    match format {
        OutputFormat::Line => Box::new(LineProtocolSink::stdout()),
        OutputFormat::Json => Box::new(JsonSink::stdout()),
        OutputFormat::Table => Box::new(TableSink::stdout()),
    }
}
