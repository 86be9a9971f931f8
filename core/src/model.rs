// Service event model shared across the pipeline
use serde::{Deserialize, Serialize};

/// Backend services feeding the dashboard. Exactly one is displayed at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Service {
    Minerva,
    Keeper,
    Bloxberg,
}

/// Specific event kinds across all services.
///
/// Several kinds map to the same service; two message kinds additionally share
/// one aggregation bucket (see [`ServiceEvent::buffer_key`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceEvent {
    MinervaPublicMessage,
    MinervaGroupMessage,
    MinervaPrivateMessage,
    MinervaDirectMessage,
    KeeperFileEdit,
    KeeperFileCreate,
    KeeperNewUser,
    KeeperNewLibrary,
    BloxbergBlock,
    BloxbergConfirmedTransaction,
    BloxbergLicensedContributor,
}

impl ServiceEvent {
    /// Service this event kind belongs to.
    pub fn service(&self) -> Service {
        match self {
            ServiceEvent::MinervaPublicMessage
            | ServiceEvent::MinervaGroupMessage
            | ServiceEvent::MinervaPrivateMessage
            | ServiceEvent::MinervaDirectMessage => Service::Minerva,
            ServiceEvent::KeeperFileEdit
            | ServiceEvent::KeeperFileCreate
            | ServiceEvent::KeeperNewUser
            | ServiceEvent::KeeperNewLibrary => Service::Keeper,
            ServiceEvent::BloxbergBlock
            | ServiceEvent::BloxbergConfirmedTransaction
            | ServiceEvent::BloxbergLicensedContributor => Service::Bloxberg,
        }
    }

    /// Normalized aggregation bucket for this event kind.
    ///
    /// Group messages are counted together with direct messages; everything
    /// else maps to itself. Fixed lookup, resolved before any buffer insert.
    pub fn buffer_key(&self) -> ServiceEvent {
        match self {
            ServiceEvent::MinervaGroupMessage => ServiceEvent::MinervaDirectMessage,
            other => *other,
        }
    }

    /// Unit used in the "[K <unit>]" suffix of consolidated circle labels.
    /// Banner-only kinds have none.
    pub fn count_unit(&self) -> Option<&'static str> {
        match self {
            ServiceEvent::MinervaPublicMessage
            | ServiceEvent::MinervaGroupMessage
            | ServiceEvent::MinervaPrivateMessage
            | ServiceEvent::MinervaDirectMessage => Some("messages"),
            ServiceEvent::KeeperFileEdit | ServiceEvent::KeeperFileCreate => Some("files"),
            ServiceEvent::KeeperNewLibrary => Some("libraries"),
            ServiceEvent::BloxbergBlock => Some("blocks"),
            ServiceEvent::BloxbergConfirmedTransaction => Some("transactions"),
            ServiceEvent::KeeperNewUser | ServiceEvent::BloxbergLicensedContributor => None,
        }
    }
}

/// Visualisation flavour currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visualisation {
    ListenTo,
    Geo,
}

/// Geographic position carried by events for the map visualisation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub long: f64,
}

/// A circle trigger produced by a transformer.
///
/// `delay` is the reconstructed gap in milliseconds to the previous record in
/// the batch (or to the query-window start for the first record). It may be
/// negative when the backend delivers out-of-order timestamps; pacing treats a
/// negative delay as zero wait.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayedCircleEvent {
    pub event: ServiceEvent,
    pub title: String,
    pub radius: f64,
    pub delay: i64,
    pub location: Option<GeoPoint>,
}

/// One-off announcement. Not paced, not buffered, not magnitude-scaled.
#[derive(Debug, Clone, PartialEq)]
pub struct BannerEvent {
    pub event: ServiceEvent,
    pub title: String,
}
