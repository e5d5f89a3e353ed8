use crate::{
    collectors::{
        fetch_streams,
        gather_user_stats,
        resolve_users,
        split_batches,
        Collector,
    },
    error::{
        BatchStage,
        GatherError,
    },
    metrics::{
        Accumulator,
        GatherReport,
        GatherSummary,
        Outcome,
    },
};
use chrono::Utc;
use futures::{
    future::{
        BoxFuture,
        FutureExt as _,
    },
    stream,
    StreamExt as _,
};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
};
use twitch_stats_config::{
    Config,
    MAX_BATCH_SIZE,
};
use twitch_stats_helix::{
    HelixApi,
    HelixClient,
    HelixResult,
    HelixSettings,
};

pub type SharedApi = Arc<dyn HelixApi>;

/// Opens a new session. Called at most once per successful [`Gatherer`].
pub type Connect = Box<dyn Fn() -> BoxFuture<'static, HelixResult<SharedApi>> + Send + Sync>;

/// Sizing of the fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatherSettings {
    pub batch_size: usize,
    pub max_concurrent_batches: usize,
    pub max_concurrent_users: usize,
    pub max_pages: Option<usize>,
}

impl Default for GatherSettings {
    fn default() -> Self {
        Self {
            batch_size: MAX_BATCH_SIZE,
            max_concurrent_batches: 4,
            max_concurrent_users: 16,
            max_pages: Some(1000),
        }
    }
}

impl From<&Config> for GatherSettings {
    fn from(config: &Config) -> Self {
        Self {
            batch_size: config.batch_size.clamp(1, MAX_BATCH_SIZE),
            max_concurrent_batches: config.max_concurrent_batches.max(1),
            max_concurrent_users: config.max_concurrent_users.max(1),
            max_pages: config.max_pages,
        }
    }
}

/// Drives a collection run over every configured user.
///
/// The session is opened on the first run and reused afterwards. Runs take `&mut self`, so they can never overlap
/// and the session is never created twice.
pub struct Gatherer {
    users: Vec<u64>,
    settings: GatherSettings,
    connect: Connect,
    session: Option<SharedApi>,
}

impl Gatherer {
    pub fn new(users: Vec<u64>, settings: GatherSettings, connect: Connect) -> Self {
        Self {
            users,
            settings,
            connect,
            session: None,
        }
    }

    /// Gatherer talking to Helix with the configured credentials.
    pub fn from_config(config: &Config) -> Self {
        let helix = HelixSettings {
            api_url: config.api_url.clone(),
            auth_url: config.auth_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            access_token: config.access_token.clone(),
            timeout: config.request_timeout,
        };
        let connect: Connect = Box::new(move || -> BoxFuture<'static, HelixResult<SharedApi>> {
            let helix = helix.clone();
            async move {
                let client = HelixClient::connect(helix).await?;
                Ok(Arc::new(client) as SharedApi)
            }
            .boxed()
        });
        Self::new(config.users.clone(), GatherSettings::from(config), connect)
    }

    /// Gatherer with an already open session.
    pub fn with_session(users: Vec<u64>, settings: GatherSettings, api: SharedApi) -> Self {
        let shared = api.clone();
        let connect: Connect = Box::new(move || -> BoxFuture<'static, HelixResult<SharedApi>> {
            let api = shared.clone();
            async move { Ok(api) }.boxed()
        });
        Self {
            session: Some(api),
            ..Self::new(users, settings, connect)
        }
    }

    pub fn users(&self) -> &[u64] {
        &self.users
    }

    pub fn settings(&self) -> &GatherSettings {
        &self.settings
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Returns the session, opening it first if needed. A failed attempt is retried on the next call.
    pub async fn ensure_session(&mut self) -> Result<SharedApi, GatherError> {
        if let Some(session) = &self.session {
            return Ok(session.clone());
        }

        info!("opening helix session");
        let session = (self.connect)().await.map_err(GatherError::Auth)?;
        self.session = Some(session.clone());
        Ok(session)
    }

    /// One full run. Fails only when no session can be opened, partial failures end up in the report.
    pub async fn collect(&mut self) -> Result<GatherReport, GatherError> {
        let api = self.ensure_session().await?;
        let started_at = Utc::now();
        let (batches, outcomes) = collect_outcomes(api.as_ref(), &self.users, &self.settings).await;
        Ok(GatherReport::from_outcomes(started_at, batches, outcomes))
    }
}

impl Collector for Gatherer {
    fn gather<'a>(
        &'a mut self,
        acc: &'a dyn Accumulator,
    ) -> Pin<Box<dyn Future<Output = Result<GatherSummary, GatherError>> + Send + 'a>> {
        Box::pin(async move {
            let report = self.collect().await?;
            let summary = report.deliver(acc);
            info!(
                batches = summary.batches,
                records = summary.records,
                batch_errors = summary.batch_errors,
                user_errors = summary.user_errors,
                duration_ms = summary.duration_ms,
                "collection finished"
            );
            Ok(summary)
        })
    }

    fn name(&self) -> &'static str {
        "twitch"
    }
}

/// Splits `ids` into batches and gathers them concurrently, at most `max_concurrent_batches` at a time. Returns the
/// number of batches and one outcome per resolved user or failed batch.
#[instrument(name = "gather", skip_all, fields(users = ids.len()))]
pub async fn collect_outcomes(api: &dyn HelixApi, ids: &[u64], settings: &GatherSettings) -> (usize, Vec<Outcome>) {
    let batches = split_batches(ids, settings.batch_size);
    let count = batches.len();
    debug!(batches = count, "split users into batches");

    let tasks = batches
        .into_iter()
        .enumerate()
        .map(|(index, batch)| gather_batch(api, index, batch, settings))
        .collect::<Vec<_>>();

    let outcomes = stream::iter(tasks)
        .buffer_unordered(settings.max_concurrent_batches.max(1))
        .collect::<Vec<Vec<Outcome>>>()
        .await
        .into_iter()
        .flatten()
        .collect();

    (count, outcomes)
}

/// Resolves the batch, fetches its live streams once and then gathers every user concurrently, at most
/// `max_concurrent_users` at a time. A failed lookup or stream fetch skips the whole batch.
#[instrument(level = "debug", skip_all, fields(batch = index, batch_size = ids.len()))]
async fn gather_batch(api: &dyn HelixApi, index: usize, ids: &[u64], settings: &GatherSettings) -> Vec<Outcome> {
    let users = match resolve_users(api, ids).await {
        Ok(users) => users,
        Err(e) => {
            warn!(error = %e, "user lookup failed, skipping batch");
            return vec![Err(GatherError::batch(ids, BatchStage::Users, e))];
        }
    };

    let streams = match fetch_streams(api, &users, settings.max_pages).await {
        Ok(streams) => streams,
        Err(e) => {
            warn!(error = %e, "stream fetch failed, skipping batch");
            return vec![Err(GatherError::batch(ids, BatchStage::Streams, e))];
        }
    };

    let tasks = users
        .iter()
        .map(|user| gather_user_stats(api, user, &streams, settings.max_pages))
        .collect::<Vec<_>>();

    stream::iter(tasks)
        .buffer_unordered(settings.max_concurrent_users.max(1))
        .collect()
        .await
}
