// Minerva messaging transformer.
use tracing::debug;

use crate::model::{DelayedCircleEvent, ServiceEvent};
use crate::wire::{MinervaData, MinervaMessage};

#[derive(Debug, Default)]
pub struct MinervaTransformed {
    pub message_events: Vec<DelayedCircleEvent>,
}

/// Converts minerva message batches. Message length is used as the circle
/// radius directly; message circles stay small enough that no log scaling is
/// needed.
#[derive(Debug, Default)]
pub struct MinervaTransformer;

impl MinervaTransformer {
    pub fn new() -> Self {
        Self
    }

    pub fn transform(&self, data: &MinervaData, query_from: i64) -> MinervaTransformed {
        MinervaTransformed {
            message_events: transform_messages(data.messages.as_deref(), query_from),
        }
    }
}

fn transform_messages(messages: Option<&[MinervaMessage]>, query_from: i64) -> Vec<DelayedCircleEvent> {
    let mut events = Vec::new();
    let Some(messages) = messages else {
        return events;
    };

    for (index, message) in messages.iter().enumerate() {
        let event = match message.channel_type.as_str() {
            "P" => ServiceEvent::MinervaPrivateMessage,
            "O" => ServiceEvent::MinervaPublicMessage,
            "G" => ServiceEvent::MinervaGroupMessage,
            "D" => ServiceEvent::MinervaDirectMessage,
            other => {
                debug!(channel_type = other, "skipping message with unknown channel type");
                continue;
            }
        };

        let delay = if index == 0 {
            message.created_at - query_from
        } else {
            message.created_at - messages[index - 1].created_at
        };

        events.push(DelayedCircleEvent {
            event,
            title: message.institute_name.clone(),
            radius: message.message_length,
            delay,
            location: message.location.as_ref().map(|l| l.geo_point()),
        });
    }

    events
}
