// Presentation capabilities the pipeline publishes into.
//
// Rendering, audio playback, and theme chrome live outside this crate; the
// bridge only emits abstract draw/animate/sound commands through this trait.
use async_trait::async_trait;

use crate::model::{GeoPoint, Service, ServiceEvent, Visualisation};

/// "Show circle" command forwarded to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleDraw {
    pub label_text: String,
    pub circle_radius: f64,
    pub event: ServiceEvent,
    pub location: Option<GeoPoint>,
}

/// "Show banner" command forwarded to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct BannerDraw {
    pub message: String,
    pub event: ServiceEvent,
}

#[async_trait]
pub trait Presenter: Send + Sync {
    async fn show_circle(&self, circle: CircleDraw);
    async fn show_banner(&self, banner: BannerDraw);
    /// Play the sound cue for an event; the radius hints at pitch/volume.
    async fn play_sound(&self, radius: f64, event: ServiceEvent);
    /// Play the jingle accompanying a carousel transition.
    async fn play_transition_sound(&self);
    /// The active service/visualisation changed; update header and colors.
    async fn theme_changed(&self, service: Service, visualisation: Visualisation);
}
