// Event bridge: gates incoming batches on the active service, paces the
// transformed events back into real time, and publishes released events to
// the presenter.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

use crate::carousel::CarouselSignal;
use crate::context::SharedContext;
use crate::model::{BannerEvent, DelayedCircleEvent, Service, Visualisation};
use crate::router::EventRouter;
use crate::settings::Settings;
use crate::sink::{BannerDraw, CircleDraw, Presenter};
use crate::transform::{BloxbergTransformer, KeeperTransformer, MinervaTransformer};
use crate::wire::{BloxbergData, EventInfo, KeeperData, MinervaData};

pub struct EventBridge {
    settings: Arc<Settings>,
    context: SharedContext,
    router: EventRouter,
    presenter: Arc<dyn Presenter>,
    display_active: Arc<AtomicBool>,
    released_rx: Mutex<Option<mpsc::Receiver<Vec<DelayedCircleEvent>>>>,
    minerva: MinervaTransformer,
    keeper: KeeperTransformer,
    bloxberg: BloxbergTransformer,
}

impl EventBridge {
    pub fn new(
        settings: Arc<Settings>,
        context: SharedContext,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        let (released_tx, released_rx) = mpsc::channel(256);
        let router = EventRouter::new(&settings, context.clone(), released_tx);
        Self {
            minerva: MinervaTransformer::new(),
            keeper: KeeperTransformer::new(Arc::clone(&settings)),
            bloxberg: BloxbergTransformer::new(Arc::clone(&settings)),
            settings,
            context,
            router,
            presenter,
            display_active: Arc::new(AtomicBool::new(true)),
            released_rx: Mutex::new(Some(released_rx)),
        }
    }

    /// Spawn the consumer that forwards buffer releases to the presenter.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        let mut released_rx = self
            .released_rx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
            .unwrap_or_else(|| mpsc::channel(1).1);
        tokio::spawn(async move {
            while let Some(events) = released_rx.recv().await {
                self.publish_circle_events(&events).await;
            }
        })
    }

    /// Spawn the listener that reacts to carousel transition signals.
    pub fn subscribe_carousel(
        self: Arc<Self>,
        mut signals: broadcast::Receiver<CarouselSignal>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match signals.recv().await {
                    Ok(CarouselSignal::TransitionStart { .. }) => {
                        self.presenter.play_transition_sound().await;
                    }
                    Ok(CarouselSignal::ThemeChanged {
                        service,
                        visualisation,
                    }) => {
                        self.context.set(service, visualisation);
                        self.presenter.theme_changed(service, visualisation).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "lagged behind carousel signals");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Mirror of the renderer's visibility: while the display is inactive,
    /// released events are dropped instead of queued.
    pub fn set_display_active(&self, active: bool) {
        self.display_active.store(active, Ordering::Relaxed);
    }

    // Ingest entry points. The service gate is checked once, up front; a
    // service switch does not cancel a pacing loop already in flight.

    pub async fn ingest_minerva(&self, data: &MinervaData, info: &EventInfo) {
        if self.context.current_service() != Service::Minerva {
            return;
        }
        let transformed = self.minerva.transform(data, info.from_timepoint);
        debug!(
            events = transformed.message_events.len(),
            "transformed minerva batch"
        );
        self.pace(transformed.message_events).await;
    }

    pub async fn ingest_keeper(&self, data: &KeeperData, info: &EventInfo) {
        if self.context.current_service() != Service::Keeper {
            return;
        }
        let transformed = self.keeper.transform(data, info.from_timepoint);
        debug!(
            files = transformed.file_events.len(),
            libraries = transformed.library_events.len(),
            banner = transformed.activated_user.is_some(),
            "transformed keeper batch"
        );
        if let Some(banner) = &transformed.activated_user {
            self.publish_banner_event(banner).await;
        }
        tokio::join!(
            self.pace(transformed.file_events),
            self.pace(transformed.library_events)
        );
    }

    pub async fn ingest_bloxberg(&self, data: &BloxbergData, info: &EventInfo) {
        if self.context.current_service() != Service::Bloxberg {
            return;
        }
        let transformed = self.bloxberg.transform(data, info.from_timepoint);
        debug!(
            blocks = transformed.block_events.len(),
            transactions = transformed.confirmed_transaction_events.len(),
            banner = transformed.licensed_contributor.is_some(),
            "transformed bloxberg batch"
        );
        if let Some(banner) = &transformed.licensed_contributor {
            self.publish_banner_event(banner).await;
        }
        tokio::join!(
            self.pace(transformed.block_events),
            self.pace(transformed.confirmed_transaction_events)
        );
    }

    /// Feed circles into the router at (approximately) their original cadence.
    ///
    /// A delay above the protection cap means an actual wait; short delays
    /// accumulate into `skipped_delay` instead, and once the accumulator
    /// crosses the cap a single capped wait drains it. The cap bounds both
    /// the number of sleeps and the amount of events folded into one circle.
    async fn pace(&self, circles: Vec<DelayedCircleEvent>) {
        let protection = self.settings.event_delay_protection as i64;
        let mut skipped_delay: i64 = 0;

        for circle in circles {
            if circle.delay > protection || skipped_delay > protection {
                let wait = if skipped_delay > protection {
                    protection
                } else {
                    circle.delay
                };
                sleep(Duration::from_millis(wait.max(0) as u64)).await;
                skipped_delay = 0;
            } else {
                skipped_delay += circle.delay;
            }

            self.router.add_circle(circle).await;
        }
    }

    /// Forward one release to the presenter, with a sound cue per circle in
    /// listening mode.
    pub async fn publish_circle_events(&self, events: &[DelayedCircleEvent]) {
        // circles drawn while the display is inactive would never fade out;
        // the renderer throttles animations on hidden displays
        if !self.display_active.load(Ordering::Relaxed) {
            debug!(count = events.len(), "display inactive, dropping release");
            return;
        }
        for event in events {
            if self.context.visualisation() == Visualisation::ListenTo {
                self.presenter.play_sound(event.radius, event.event).await;
            }
            self.presenter
                .show_circle(CircleDraw {
                    label_text: event.title.clone(),
                    circle_radius: event.radius,
                    event: event.event,
                    location: event.location,
                })
                .await;
        }
    }

    /// Banners bypass the buffers: published immediately, gated only on the
    /// service check already done by the caller and on display visibility.
    pub async fn publish_banner_event(&self, banner: &BannerEvent) {
        if !self.display_active.load(Ordering::Relaxed) {
            return;
        }
        if self.context.visualisation() == Visualisation::ListenTo {
            self.presenter.play_sound(0.0, banner.event).await;
        }
        self.presenter
            .show_banner(BannerDraw {
                message: banner.title.clone(),
                event: banner.event,
            })
            .await;
    }
}
