mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use anyhow::Context;
use autocare_core::{
    CenterDirectory, Matcher, MessageGateway, NearbySearch, PlaceSearch, ReminderProcessor,
    ReminderStore,
};
use autocare_places::PlacesClient;
use autocare_sms::{TwilioClient, TwilioCredentials};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState, SearchDefaults};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = autocare_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::info!(env = %config.env, match_mode = %config.match_mode, "starting autocare-server");

    let pool_config = autocare_db::PoolConfig::from_app_config(&config);
    let pool = autocare_db::connect_pool(&config.database_url, pool_config)
        .await
        .context("failed to connect to database")?;
    let applied = autocare_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let store = Arc::new(autocare_db::PgStore::new(pool.clone()));
    let places: Arc<dyn PlaceSearch> = Arc::new(PlacesClient::new(
        &config.google_places_api_key,
        config.places_timeout_secs,
    )?);
    let gateway: Arc<dyn MessageGateway> = Arc::new(TwilioClient::new(
        TwilioCredentials {
            account_sid: config.twilio_account_sid.clone(),
            auth_token: config.twilio_auth_token.clone(),
            from_number: config.twilio_from_number.clone(),
        },
        config.sms_timeout_secs,
    )?);

    let nearby = Arc::new(NearbySearch::new(
        Arc::clone(&store) as Arc<dyn CenterDirectory>,
        places,
        Matcher::new(config.match_mode),
    ));
    let reminders = Arc::new(ReminderProcessor::new(
        store as Arc<dyn ReminderStore>,
        gateway,
    ));

    let _scheduler = scheduler::build_scheduler(Arc::clone(&reminders), &config).await?;

    let app = build_app(AppState {
        pool,
        nearby,
        reminders,
        search_defaults: SearchDefaults {
            radius_m: config.places_default_radius_m,
            max_results: config.places_max_results,
        },
        utc_offset: config.reminder_utc_offset,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
