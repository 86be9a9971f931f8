// Bloxberg blockchain transformer.
use std::sync::Arc;

use rand::seq::SliceRandom;

use crate::model::{BannerEvent, DelayedCircleEvent, ServiceEvent};
use crate::scale::{
    BLOCK_RADIUS_BOOST, BLOXBERG_BLOCK, BLOXBERG_TRANSACTION, TRANSACTION_FEE_FACTOR,
};
use crate::settings::Settings;
use crate::wire::{
    BloxbergBlock, BloxbergConfirmedTransaction, BloxbergData, BloxbergLicensedContributor,
};

#[derive(Debug, Default)]
pub struct BloxbergTransformed {
    pub block_events: Vec<DelayedCircleEvent>,
    pub confirmed_transaction_events: Vec<DelayedCircleEvent>,
    pub licensed_contributor: Option<BannerEvent>,
}

pub struct BloxbergTransformer {
    settings: Arc<Settings>,
}

impl BloxbergTransformer {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    pub fn transform(&self, data: &BloxbergData, query_from: i64) -> BloxbergTransformed {
        BloxbergTransformed {
            block_events: self.transform_blocks(data.blocks.as_deref(), query_from),
            confirmed_transaction_events: self
                .transform_confirmed_transactions(data.confirmed_transactions.as_deref(), query_from),
            licensed_contributor: transform_licensed_contributors(
                data.licensed_contributors.as_deref(),
            ),
        }
    }

    fn transform_blocks(
        &self,
        blocks: Option<&[BloxbergBlock]>,
        query_from: i64,
    ) -> Vec<DelayedCircleEvent> {
        let mut events = Vec::new();
        let Some(blocks) = blocks else {
            return events;
        };

        for (index, block) in blocks.iter().enumerate() {
            let radius = BLOXBERG_BLOCK.radius(
                block.byte_size,
                self.settings.circle_radius_min,
                self.settings.circle_radius_max,
            ) * BLOCK_RADIUS_BOOST;

            let delay = if index == 0 {
                block.inserted_at - query_from
            } else {
                block.inserted_at - blocks[index - 1].inserted_at
            };

            let title = if block.miner.is_empty() {
                format!("0x{}", block.miner_hash)
            } else {
                block.miner.clone()
            };

            events.push(DelayedCircleEvent {
                event: ServiceEvent::BloxbergBlock,
                title,
                radius,
                delay,
                location: block.location.as_ref().map(|l| l.geo_point()),
            });
        }

        events
    }

    fn transform_confirmed_transactions(
        &self,
        transactions: Option<&[BloxbergConfirmedTransaction]>,
        query_from: i64,
    ) -> Vec<DelayedCircleEvent> {
        let mut events = Vec::new();
        let Some(transactions) = transactions else {
            return events;
        };

        for (index, transaction) in transactions.iter().enumerate() {
            let scaled_fee = transaction.transaction_fee * TRANSACTION_FEE_FACTOR;
            let radius = BLOXBERG_TRANSACTION.radius(
                scaled_fee,
                self.settings.circle_radius_min,
                self.settings.circle_radius_max,
            );

            let delay = if index == 0 {
                transaction.updated_at - query_from
            } else {
                transaction.updated_at - transactions[index - 1].updated_at
            };

            let title = if transaction.block_miner.is_empty() {
                format!("0x{}", transaction.block_miner_hash)
            } else {
                transaction.block_miner.clone()
            };

            events.push(DelayedCircleEvent {
                event: ServiceEvent::BloxbergConfirmedTransaction,
                title,
                radius,
                delay,
                location: transaction.location.as_ref().map(|l| l.geo_point()),
            });
        }

        events
    }
}

fn transform_licensed_contributors(
    contributors: Option<&[BloxbergLicensedContributor]>,
) -> Option<BannerEvent> {
    let contributors = contributors?;
    let first = contributors.first()?;
    let name = &first.name;

    let messages: Vec<String> = if contributors.len() == 1 {
        vec![
            // wording kept verbatim from the live announcement strings
            format!("bloxberg has a new licensed contributor: {name}, bloxberg's newest library!"),
            format!("Wow, {name} has joined bloxberg as a new licensed contributor!"),
        ]
    } else {
        let others = contributors.len() - 1;
        vec![
            format!("{name} and {others} others have joined bloxberg! bloxberg's newest licensed contributors!"),
            format!("Wow, {name} and {others} other licensed contributors have joined bloxberg!"),
        ]
    };

    let title = messages
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_default();

    Some(BannerEvent {
        event: ServiceEvent::BloxbergLicensedContributor,
        title,
    })
}
