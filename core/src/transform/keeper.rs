// Keeper file-storage transformer.
use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::debug;

use crate::model::{BannerEvent, DelayedCircleEvent, ServiceEvent};
use crate::scale::{KEEPER_FILE_CREATE, KEEPER_FILE_EDIT};
use crate::settings::Settings;
use crate::transform::campus_display_name;
use crate::wire::{KeeperActivatedUser, KeeperData, KeeperFileOperation, KeeperLibraryCreation};

/// New-library circles use a fixed mid-size radius.
const LIBRARY_RADIUS: f64 = 70.0;

#[derive(Debug, Default)]
pub struct KeeperTransformed {
    pub file_events: Vec<DelayedCircleEvent>,
    pub library_events: Vec<DelayedCircleEvent>,
    pub activated_user: Option<BannerEvent>,
}

pub struct KeeperTransformer {
    settings: Arc<Settings>,
}

impl KeeperTransformer {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    pub fn transform(&self, data: &KeeperData, query_from: i64) -> KeeperTransformed {
        KeeperTransformed {
            file_events: self
                .transform_file_operations(data.file_creations_and_editings.as_deref(), query_from),
            library_events: transform_library_creations(data.library_creations.as_deref(), query_from),
            activated_user: transform_activated_users(data.activated_users.as_deref()),
        }
    }

    fn transform_file_operations(
        &self,
        operations: Option<&[KeeperFileOperation]>,
        query_from: i64,
    ) -> Vec<DelayedCircleEvent> {
        let mut events = Vec::new();
        let Some(operations) = operations else {
            return events;
        };

        for (index, operation) in operations.iter().enumerate() {
            let (event, band) = match operation.operation_type.as_str() {
                "create" => (ServiceEvent::KeeperFileCreate, KEEPER_FILE_CREATE),
                "edit" => (ServiceEvent::KeeperFileEdit, KEEPER_FILE_EDIT),
                other => {
                    debug!(operation_type = other, "skipping unknown file operation");
                    continue;
                }
            };
            let radius = band.radius(
                operation.operation_size,
                self.settings.circle_radius_min,
                self.settings.circle_radius_max,
            );

            let delay = if index == 0 {
                operation.timestamp - query_from
            } else {
                operation.timestamp - operations[index - 1].timestamp
            };

            events.push(DelayedCircleEvent {
                event,
                title: campus_display_name(&operation.institute_name),
                radius,
                delay,
                location: operation.location.as_ref().map(|l| l.geo_point()),
            });
        }

        events
    }
}

fn transform_library_creations(
    creations: Option<&[KeeperLibraryCreation]>,
    query_from: i64,
) -> Vec<DelayedCircleEvent> {
    let mut events = Vec::new();
    let Some(creations) = creations else {
        return events;
    };

    for (index, creation) in creations.iter().enumerate() {
        let delay = if index == 0 {
            creation.timestamp - query_from
        } else {
            creation.timestamp - creations[index - 1].timestamp
        };

        events.push(DelayedCircleEvent {
            event: ServiceEvent::KeeperNewLibrary,
            title: campus_display_name(&creation.institute_name),
            radius: LIBRARY_RADIUS,
            delay,
            location: creation.location.as_ref().map(|l| l.geo_point()),
        });
    }

    events
}

fn transform_activated_users(users: Option<&[KeeperActivatedUser]>) -> Option<BannerEvent> {
    let users = users?;
    let first = users.first()?;
    let named_user = campus_display_name(&first.institute_name);

    let messages: Vec<String> = if users.len() == 1 {
        vec![
            // wording kept verbatim from the live announcement strings
            format!("Keeper has a new a new user from {named_user}, Keeper's newest user!"),
            format!("Keeper has a new user from {named_user}! Keep on keeping!"),
            format!("Wow, a new user from {named_user} has joined Keeper!"),
        ]
    } else {
        let unique_institutes: HashSet<&str> = users
            .iter()
            .map(|user| user.institute_name.as_str())
            .collect();
        let count = users.len();
        let others = unique_institutes.len() - 1;
        vec![
            format!("{count} new users from {named_user} and {others} others! Keeper's newest users!"),
            format!("Keeper has {count} new users from {named_user} and {others} others! Keep on keeping!"),
            format!("Wow, {count} new users from {named_user} and {others} others have joined Keeper!"),
        ]
    };

    let title = messages
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_default();

    Some(BannerEvent {
        event: ServiceEvent::KeeperNewUser,
        title,
    })
}
