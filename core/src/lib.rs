// Murmur Core Library
// Event-aggregation and timing pipeline for the ambient service dashboard

pub mod bridge;
pub mod buffer;
pub mod carousel;
pub mod context;
pub mod model;
pub mod router;
pub mod scale;
pub mod settings;
pub mod sink;
pub mod transform;
pub mod wire;

// Export core types
pub use bridge::EventBridge;
pub use buffer::CategoryBuffer;
pub use carousel::{Carousel, CarouselSignal, ServiceHealth};
pub use context::{ActiveContext, SharedContext};
pub use model::{
    BannerEvent, DelayedCircleEvent, GeoPoint, Service, ServiceEvent, Visualisation,
};
pub use router::EventRouter;
pub use settings::Settings;
pub use sink::{BannerDraw, CircleDraw, Presenter};

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MurmurError {
    #[error("bridge error: {0}")]
    BridgeError(String),

    #[error("carousel error: {0}")]
    CarouselError(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
pub type Result<T> = std::result::Result<T, MurmurError>;

/// Core runtime: wires the shared context, the bridge, and the carousel.
pub struct Murmur {
    pub settings: Arc<Settings>,
    pub context: SharedContext,
    pub bridge: Arc<EventBridge>,
    carousel: Option<Carousel>,
    health_tx: mpsc::Sender<ServiceHealth>,
    tasks: Vec<JoinHandle<()>>,
}

impl Murmur {
    pub fn new(settings: Settings, presenter: Arc<dyn Presenter>) -> Result<Self> {
        let settings = Arc::new(settings);
        let context = SharedContext::new(
            settings.initial_service,
            settings.initial_visualisation(),
        );
        let bridge = Arc::new(EventBridge::new(
            Arc::clone(&settings),
            context.clone(),
            presenter,
        ));
        let carousel = Carousel::new(Arc::clone(&settings));
        let health_tx = carousel.health_sender();
        Ok(Self {
            settings,
            context,
            bridge,
            carousel: Some(carousel),
            health_tx,
            tasks: Vec::new(),
        })
    }

    /// Spawn the release consumer, the carousel loop, and the bridge's
    /// carousel-signal subscription.
    pub fn start(&mut self) -> Result<()> {
        tracing::info!("Starting Murmur...");

        let carousel = self
            .carousel
            .take()
            .ok_or_else(|| MurmurError::CarouselError("already started".to_string()))?;
        self.tasks
            .push(Arc::clone(&self.bridge).subscribe_carousel(carousel.signals()));
        self.tasks.push(Arc::clone(&self.bridge).start());
        self.tasks.push(tokio::spawn(carousel.run()));

        tracing::info!("Murmur started successfully");
        Ok(())
    }

    /// Handle for the transport to report per-service connection health.
    pub fn health_sender(&self) -> mpsc::Sender<ServiceHealth> {
        self.health_tx.clone()
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down Murmur...");
        for task in self.tasks.drain(..) {
            task.abort();
        }
        tracing::info!("Murmur shut down successfully");
        Ok(())
    }
}
