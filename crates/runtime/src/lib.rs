use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rally_config::AppConfig;
use rally_database::initialize_database;
use rally_engagement::{
    EmailChannel, InAppChannel, NotificationDispatcher, OpenAiSummaryProvider, SummaryProvider,
};
use rally_gateway::GatewayState;
use sqlx::SqlitePool;
use tracing::{info, warn};

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::INFO)
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub summary_provider: Arc<dyn SummaryProvider>,
    pub gateway_state: GatewayState,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let db_pool = initialize_database(&config.database)
            .await
            .context("failed to initialise database")?;

        let dispatcher = Arc::new(NotificationDispatcher::from_config(&config.notifications));
        dispatcher
            .subscribe(Arc::new(InAppChannel::new(db_pool.clone())))
            .await;

        if config.email.enabled {
            let email = EmailChannel::from_config(&config.email)
                .context("failed to build email channel")?;
            dispatcher.subscribe(Arc::new(email)).await;
            info!(api_url = %config.email.api_url, "email notifications enabled");
        }

        let summary_provider: Arc<dyn SummaryProvider> = Arc::new(
            OpenAiSummaryProvider::from_config(&config.summarizer)
                .context("failed to build summary provider")?,
        );
        if config.summarizer.resolved_api_key().is_none() {
            warn!("no summarizer api key configured, summaries will fall back");
        }

        let gateway_state = GatewayState::new(
            db_pool.clone(),
            &config.auth,
            Arc::clone(&dispatcher),
            Arc::clone(&summary_provider),
        );

        info!(
            channels = dispatcher.channel_count().await,
            delivery_timeout = ?Duration::from_secs(config.notifications.delivery_timeout_seconds),
            model = %config.summarizer.model,
            "engagement services ready"
        );

        Ok(Self {
            db_pool,
            dispatcher,
            summary_provider,
            gateway_state,
        })
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
