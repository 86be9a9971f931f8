// Shared active-service/visualisation context.
//
// One writer (the bridge's carousel-signal task), many readers (gate checks
// in the bridge and release-policy decisions in the router). Injected as a
// handle instead of living in a global.
use std::sync::{Arc, RwLock};

use crate::model::{Service, Visualisation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveContext {
    pub service: Service,
    pub visualisation: Visualisation,
}

/// Cheap-to-clone handle on the active context.
#[derive(Debug, Clone)]
pub struct SharedContext {
    inner: Arc<RwLock<ActiveContext>>,
}

impl SharedContext {
    pub fn new(service: Service, visualisation: Visualisation) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ActiveContext {
                service,
                visualisation,
            })),
        }
    }

    pub fn current_service(&self) -> Service {
        self.read().service
    }

    pub fn visualisation(&self) -> Visualisation {
        self.read().visualisation
    }

    pub fn snapshot(&self) -> ActiveContext {
        self.read()
    }

    /// Replace both fields in one step so no reader observes a half-applied
    /// theme change.
    pub fn set(&self, service: Service, visualisation: Visualisation) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = ActiveContext {
            service,
            visualisation,
        };
    }

    fn read(&self) -> ActiveContext {
        *self
            .inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
