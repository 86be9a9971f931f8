// Category router: owns one aggregation bucket per normalized event category
// and arms the catch-window timer on every Idle -> Collecting transition.
use std::sync::Arc;

use dashmap::DashMap;
use rand::Rng;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{sleep, Duration};
use tracing::warn;

use crate::buffer::CategoryBuffer;
use crate::context::SharedContext;
use crate::model::{DelayedCircleEvent, ServiceEvent, Visualisation};
use crate::settings::Settings;

/// Keeper timestamps only carry second precision, so its buckets collect for
/// a full second.
const KEEPER_CATCH_WINDOW_MS: u64 = 1_000;
const KEEPER_SPLIT_WINDOW_MS: u64 = 1_000;
/// Confirmed transactions spread their staggered release a little wider.
const TRANSACTION_SPLIT_WINDOW_MS: u64 = 1_200;
const DEFAULT_SPLIT_WINDOW_MS: u64 = 1_000;

/// Routes circle events into per-category buffers and publishes everything a
/// release produces on the outbound channel.
///
/// At most one release decision fires per catch window per bucket no matter
/// how many events arrive inside the window.
#[derive(Clone)]
pub struct EventRouter {
    buckets: Arc<DashMap<ServiceEvent, Arc<Mutex<CategoryBuffer>>>>,
    context: SharedContext,
    released_tx: mpsc::Sender<Vec<DelayedCircleEvent>>,
    geo_marker_radius: f64,
}

impl EventRouter {
    pub fn new(
        settings: &Settings,
        context: SharedContext,
        released_tx: mpsc::Sender<Vec<DelayedCircleEvent>>,
    ) -> Self {
        let default_catch = settings.default_event_buffer_timespan;
        let buckets = DashMap::new();
        let insert = |event: ServiceEvent, catch_ms: u64, split_ms: u64| {
            buckets.insert(event, Arc::new(Mutex::new(CategoryBuffer::new(catch_ms, split_ms))));
        };
        insert(ServiceEvent::BloxbergBlock, default_catch, DEFAULT_SPLIT_WINDOW_MS);
        insert(
            ServiceEvent::BloxbergConfirmedTransaction,
            default_catch,
            TRANSACTION_SPLIT_WINDOW_MS,
        );
        insert(ServiceEvent::KeeperFileCreate, KEEPER_CATCH_WINDOW_MS, KEEPER_SPLIT_WINDOW_MS);
        insert(ServiceEvent::KeeperFileEdit, KEEPER_CATCH_WINDOW_MS, KEEPER_SPLIT_WINDOW_MS);
        insert(ServiceEvent::KeeperNewLibrary, KEEPER_CATCH_WINDOW_MS, KEEPER_SPLIT_WINDOW_MS);
        // group messages resolve to the direct-message bucket
        insert(ServiceEvent::MinervaDirectMessage, default_catch, DEFAULT_SPLIT_WINDOW_MS);
        insert(ServiceEvent::MinervaPrivateMessage, default_catch, DEFAULT_SPLIT_WINDOW_MS);
        insert(ServiceEvent::MinervaPublicMessage, default_catch, DEFAULT_SPLIT_WINDOW_MS);

        Self {
            buckets: Arc::new(buckets),
            context,
            released_tx,
            geo_marker_radius: settings.geo_marker_radius,
        }
    }

    /// Route one circle into its bucket. If the bucket was idle, arm the
    /// one-shot catch-window timer; the event is appended either way.
    pub async fn add_circle(&self, circle: DelayedCircleEvent) {
        let key = circle.event.buffer_key();
        let Some(bucket) = self.buckets.get(&key).map(|b| Arc::clone(b.value())) else {
            // banner-only kinds have no bucket
            return;
        };

        let mut guard = bucket.lock().await;
        if guard.is_empty() {
            let catch_window = Duration::from_millis(guard.catch_window_ms);
            let router = self.clone();
            let timer_bucket = Arc::clone(&bucket);
            tokio::spawn(async move {
                sleep(catch_window).await;
                router.flush(key, timer_bucket).await;
            });
        }
        guard.add(circle);
    }

    /// Catch window elapsed: apply the category- and mode-specific release
    /// policy to whatever the bucket collected meanwhile.
    async fn flush(&self, key: ServiceEvent, bucket: Arc<Mutex<CategoryBuffer>>) {
        let visualisation = self.context.visualisation();
        let mut guard = bucket.lock().await;
        match key {
            // file bursts stagger over a random number of chunks; on the map
            // the markers are per-location anyway, splitting adds nothing
            ServiceEvent::KeeperFileCreate | ServiceEvent::KeeperFileEdit
                if visualisation != Visualisation::Geo =>
            {
                let split = rand::thread_rng().gen_range(1..=4);
                let windows = (guard.catch_window_ms, guard.split_window_ms);
                let chunks = guard.split_chunks(split);
                drop(guard);
                self.stagger(chunks, windows);
            }
            ServiceEvent::BloxbergConfirmedTransaction
                if visualisation != Visualisation::Geo =>
            {
                let windows = (guard.catch_window_ms, guard.split_window_ms);
                let chunks = guard.split_chunks(3);
                drop(guard);
                self.stagger(chunks, windows);
            }
            _ => {
                let released = guard.consolidate(visualisation, self.geo_marker_radius);
                drop(guard);
                self.publish(released).await;
            }
        }
    }

    /// Schedule each chunk as its own short-lived buffer released after its
    /// stagger delay. The visualisation mode is re-read at fire time.
    fn stagger(&self, chunks: Vec<(u64, Vec<DelayedCircleEvent>)>, windows: (u64, u64)) {
        for (delay_ms, events) in chunks {
            let router = self.clone();
            tokio::spawn(async move {
                sleep(Duration::from_millis(delay_ms)).await;
                let visualisation = router.context.visualisation();
                let mut chunk_buffer = CategoryBuffer::new(windows.0, windows.1);
                for event in events {
                    chunk_buffer.add(event);
                }
                let released = chunk_buffer.consolidate(visualisation, router.geo_marker_radius);
                router.publish(released).await;
            });
        }
    }

    async fn publish(&self, released: Vec<DelayedCircleEvent>) {
        if released.is_empty() {
            return;
        }
        if self.released_tx.send(released).await.is_err() {
            warn!("released-event consumer is gone, dropping release");
        }
    }
}
