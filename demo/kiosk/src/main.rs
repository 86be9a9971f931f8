mod config;
mod feed;

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use config::KioskConfig;
use feed::Feed;
use murmur_core::{
    BannerDraw, CircleDraw, Murmur, Presenter, Service, ServiceEvent, ServiceHealth, Visualisation,
};
use tokio::signal;
use tracing::info;

/// Terminal stand-in for the renderer/audio stack: every draw and sound
/// command becomes a log line.
struct LoggingPresenter;

#[async_trait]
impl Presenter for LoggingPresenter {
    async fn show_circle(&self, circle: CircleDraw) {
        info!(
            target = "kiosk",
            label = %circle.label_text,
            radius = circle.circle_radius,
            event = ?circle.event,
            location = ?circle.location,
            "⭕ circle"
        );
    }

    async fn show_banner(&self, banner: BannerDraw) {
        info!(target = "kiosk", message = %banner.message, event = ?banner.event, "📜 banner");
    }

    async fn play_sound(&self, radius: f64, event: ServiceEvent) {
        info!(target = "kiosk", radius, event = ?event, "🔔 sound");
    }

    async fn play_transition_sound(&self) {
        info!(target = "kiosk", "🎵 transition jingle");
    }

    async fn theme_changed(&self, service: Service, visualisation: Visualisation) {
        info!(target = "kiosk", ?service, ?visualisation, "🎨 theme changed");
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging / tracing
    let filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,murmur_core=info,kiosk=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        target = "kiosk",
        "Starting kiosk demo: synthetic feed → bridge → buffers → log presenter"
    );

    // Load configuration (env defaults + optional TOML overlay)
    let cfg = KioskConfig::load();
    info!(
        target = "kiosk",
        carousel = cfg.settings.carousel_mode,
        mixed = cfg.settings.mixed,
        map = cfg.settings.map,
        interval_ms = cfg.feed_interval_ms,
        "Configuration loaded"
    );

    let mut murmur = Murmur::new(cfg.settings.clone(), Arc::new(LoggingPresenter))?;
    murmur.start()?;

    let bridge = Arc::clone(&murmur.bridge);
    let context = murmur.context.clone();
    let health_tx = murmur.health_sender();
    let feed = Feed::new(cfg.batch_size);
    let interval_ms = cfg.feed_interval_ms;

    // Deliver one synthetic batch per interval for whichever service is on
    // screen, plus connection-health refreshes for all three.
    let feed_task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms.max(100)));
        let mut from = now_ms() - interval_ms as i64;
        loop {
            ticker.tick().await;
            let until = now_ms();

            for service in [Service::Minerva, Service::Keeper, Service::Bloxberg] {
                let event_info = feed.event_info(service, from);
                let _ = health_tx
                    .send(ServiceHealth {
                        service,
                        database_info: event_info.database_info,
                    })
                    .await;
            }

            match context.current_service() {
                Service::Minerva => {
                    let data = feed.minerva(from, until);
                    bridge
                        .ingest_minerva(&data, &feed.event_info(Service::Minerva, from))
                        .await;
                }
                Service::Keeper => {
                    let data = feed.keeper(from, until);
                    bridge
                        .ingest_keeper(&data, &feed.event_info(Service::Keeper, from))
                        .await;
                }
                Service::Bloxberg => {
                    let data = feed.bloxberg(from, until);
                    bridge
                        .ingest_bloxberg(&data, &feed.event_info(Service::Bloxberg, from))
                        .await;
                }
            }

            from = until;
        }
    });

    signal::ctrl_c().await?;
    info!(target = "kiosk", "Shutting down...");

    feed_task.abort();
    murmur.shutdown().await.ok();
    Ok(())
}
