#![allow(dead_code)]
// Shared recording presenter for the integration tests.
use std::sync::Mutex;

use async_trait::async_trait;
use murmur_core::{BannerDraw, CircleDraw, Presenter, Service, ServiceEvent, Visualisation};

#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Circle(CircleDraw),
    Banner(BannerDraw),
    Sound { radius: f64, event: ServiceEvent },
    TransitionSound,
    ThemeChanged {
        service: Service,
        visualisation: Visualisation,
    },
}

#[derive(Default)]
pub struct RecordingPresenter {
    recorded: Mutex<Vec<Recorded>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn circles(&self) -> Vec<CircleDraw> {
        self.recorded()
            .into_iter()
            .filter_map(|r| match r {
                Recorded::Circle(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    pub fn banners(&self) -> Vec<BannerDraw> {
        self.recorded()
            .into_iter()
            .filter_map(|r| match r {
                Recorded::Banner(b) => Some(b),
                _ => None,
            })
            .collect()
    }

    pub fn sounds(&self) -> Vec<(f64, ServiceEvent)> {
        self.recorded()
            .into_iter()
            .filter_map(|r| match r {
                Recorded::Sound { radius, event } => Some((radius, event)),
                _ => None,
            })
            .collect()
    }

    pub fn theme_changes(&self) -> Vec<(Service, Visualisation)> {
        self.recorded()
            .into_iter()
            .filter_map(|r| match r {
                Recorded::ThemeChanged {
                    service,
                    visualisation,
                } => Some((service, visualisation)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Presenter for RecordingPresenter {
    async fn show_circle(&self, circle: CircleDraw) {
        self.recorded.lock().unwrap().push(Recorded::Circle(circle));
    }

    async fn show_banner(&self, banner: BannerDraw) {
        self.recorded.lock().unwrap().push(Recorded::Banner(banner));
    }

    async fn play_sound(&self, radius: f64, event: ServiceEvent) {
        self.recorded
            .lock()
            .unwrap()
            .push(Recorded::Sound { radius, event });
    }

    async fn play_transition_sound(&self) {
        self.recorded.lock().unwrap().push(Recorded::TransitionSound);
    }

    async fn theme_changed(&self, service: Service, visualisation: Visualisation) {
        self.recorded.lock().unwrap().push(Recorded::ThemeChanged {
            service,
            visualisation,
        });
    }
}
