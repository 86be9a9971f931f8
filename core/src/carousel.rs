// Carousel: rotates the active service on a timer, skipping services whose
// backend is down and fast-failing away from a service that goes down while
// it is on screen.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::time::{sleep, sleep_until, Duration, Instant};
use tracing::{debug, info, warn};

use crate::model::{Service, Visualisation};
use crate::settings::Settings;
use crate::wire::DatabaseInfo;

/// Signals emitted around a service transition. The theme change follows the
/// transition start after the configured hold, once the transition animation
/// covers the canvas.
#[derive(Debug, Clone)]
pub enum CarouselSignal {
    TransitionStart {
        next: Service,
        visualisation: Visualisation,
    },
    ThemeChanged {
        service: Service,
        visualisation: Visualisation,
    },
}

/// Connection-health report for one service, fed by the transport.
#[derive(Debug, Clone)]
pub struct ServiceHealth {
    pub service: Service,
    pub database_info: DatabaseInfo,
}

pub struct Carousel {
    settings: Arc<Settings>,
    order: Vec<Service>,
    errors: HashMap<Service, bool>,
    current_index: usize,
    visualisation: Visualisation,
    signal_tx: broadcast::Sender<CarouselSignal>,
    health_tx: mpsc::Sender<ServiceHealth>,
    health_rx: mpsc::Receiver<ServiceHealth>,
}

impl Carousel {
    pub fn new(settings: Arc<Settings>) -> Self {
        let (signal_tx, _) = broadcast::channel(16);
        let (health_tx, health_rx) = mpsc::channel(32);
        let order = vec![Service::Minerva, Service::Keeper, Service::Bloxberg];
        let current_index = order
            .iter()
            .position(|s| *s == settings.initial_service)
            .unwrap_or(0);
        let errors = order.iter().map(|s| (*s, false)).collect();
        Self {
            visualisation: settings.initial_visualisation(),
            settings,
            order,
            errors,
            current_index,
            signal_tx,
            health_tx,
            health_rx,
        }
    }

    /// Subscribe to transition signals. Call before `run` is spawned.
    pub fn signals(&self) -> broadcast::Receiver<CarouselSignal> {
        self.signal_tx.subscribe()
    }

    /// Handle for the transport to report per-service connection health.
    pub fn health_sender(&self) -> mpsc::Sender<ServiceHealth> {
        self.health_tx.clone()
    }

    pub fn current_service(&self) -> Service {
        self.order[self.current_index]
    }

    /// Drive the countdown/advance loop until every health sender is gone.
    pub async fn run(mut self) {
        let mut deadline = self.next_deadline();
        loop {
            if self.all_errored() {
                // terminal until an error clears; no advancement, no countdown
                match self.health_rx.recv().await {
                    Some(update) => {
                        self.apply_health(&update);
                        // a pinned service stays pinned through the outage
                        if !self.all_errored() && self.settings.carousel_mode {
                            info!("a service recovered, carousel resuming");
                            self.advance().await;
                            deadline = self.next_deadline();
                        }
                    }
                    None => break,
                }
                continue;
            }

            if !self.settings.carousel_mode {
                // pinned service: keep tracking health but never advance
                match self.health_rx.recv().await {
                    Some(update) => {
                        self.apply_health(&update);
                    }
                    None => break,
                }
                continue;
            }

            tokio::select! {
                _ = sleep_until(deadline) => {
                    self.advance().await;
                    deadline = self.next_deadline();
                }
                update = self.health_rx.recv() => {
                    match update {
                        Some(update) => {
                            let service = update.service;
                            let errored = self.apply_health(&update);
                            // fast-fail: leave a failing service immediately
                            // instead of waiting out its countdown
                            if errored && service == self.current_service() && !self.all_errored() {
                                self.advance().await;
                                deadline = self.next_deadline();
                            }
                        }
                        None => break,
                    }
                }
            }
        }
    }

    fn apply_health(&mut self, update: &ServiceHealth) -> bool {
        let errored = update.database_info.is_errored();
        self.errors.insert(update.service, errored);
        debug!(service = ?update.service, errored, "service health updated");
        if self.all_errored() {
            warn!("all services report errors, carousel halted");
        }
        errored
    }

    /// Next service in round-robin order that is not flagged errored. The
    /// wrapping search may land back on the current service when it is the
    /// only healthy one, which makes the transition a visible no-op.
    fn next_eligible(&self) -> Option<usize> {
        let len = self.order.len();
        (1..=len)
            .map(|step| (self.current_index + step) % len)
            .find(|index| !self.errors[&self.order[*index]])
    }

    async fn advance(&mut self) {
        let Some(next_index) = self.next_eligible() else {
            return;
        };
        self.current_index = next_index;
        let next = self.order[next_index];
        let visualisation = self.next_visualisation();

        let _ = self.signal_tx.send(CarouselSignal::TransitionStart {
            next,
            visualisation,
        });
        sleep(Duration::from_millis(self.settings.transition_hold)).await;
        self.visualisation = visualisation;
        let _ = self.signal_tx.send(CarouselSignal::ThemeChanged {
            service: next,
            visualisation,
        });
        info!(service = ?next, ?visualisation, "carousel advanced");
    }

    /// Mixed mode alternates the two visualisations on every transition.
    fn next_visualisation(&self) -> Visualisation {
        if self.settings.mixed {
            match self.visualisation {
                Visualisation::ListenTo => Visualisation::Geo,
                Visualisation::Geo => Visualisation::ListenTo,
            }
        } else {
            self.visualisation
        }
    }

    fn all_errored(&self) -> bool {
        self.order.iter().all(|service| self.errors[service])
    }

    fn next_deadline(&self) -> Instant {
        Instant::now()
            + Duration::from_millis(self.settings.carousel_time_for(self.current_service()))
    }
}
