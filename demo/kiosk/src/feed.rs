// Synthetic backend feed: fabricates per-service batches shaped like the
// production push payloads so the pipeline can run without a live backend.
use rand::seq::SliceRandom;
use rand::Rng;

use murmur_core::wire::{
    BloxbergBlock, BloxbergConfirmedTransaction, BloxbergData, BloxbergLicensedContributor,
    DatabaseInfo, EventInfo, KeeperActivatedUser, KeeperData, KeeperFileOperation,
    KeeperLibraryCreation, MinervaData, MinervaMessage, WireCoordinate, WireLocation,
};
use murmur_core::Service;

const INSTITUTES: &[&str] = &[
    "MPI for Astrophysics",
    "MPI for Biogeochemistry",
    "MPI for Intelligent Systems",
    "MPI for the Science of Light",
    "tuebingen.mpg.de",
    "MPI for Chemistry",
];

// campus coordinates for the map visualisation, roughly Germany-shaped
const CAMPUSES: &[(f64, f64)] = &[
    (48.26, 11.67),
    (50.93, 11.57),
    (48.53, 9.06),
    (49.58, 11.03),
    (49.99, 8.23),
    (52.52, 13.40),
];

const CHANNEL_TYPES: &[&str] = &["P", "O", "G", "D"];

pub struct Feed {
    batch_size: usize,
}

impl Feed {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn event_info(&self, service: Service, from_timepoint: i64) -> EventInfo {
        EventInfo {
            service: format!("{service:?}"),
            version: "demo".to_string(),
            expected_frontend_version: 0,
            active_connections: 1,
            from_timepoint,
            database_info: DatabaseInfo {
                is_connection_established: true,
                is_connecting: false,
                next_reconnect: 0,
                number_of_db_reconnects: 0,
            },
        }
    }

    pub fn minerva(&self, from: i64, until: i64) -> MinervaData {
        let mut rng = rand::thread_rng();
        let messages = self
            .timestamps(&mut rng, from, until)
            .into_iter()
            .map(|created_at| MinervaMessage {
                institute_name: pick(&mut rng, INSTITUTES).to_string(),
                created_at,
                message_length: rng.gen_range(5.0..250.0),
                channel_type: pick(&mut rng, CHANNEL_TYPES).to_string(),
                location: location(&mut rng),
            })
            .collect();
        MinervaData {
            messages: Some(messages),
        }
    }

    pub fn keeper(&self, from: i64, until: i64) -> KeeperData {
        let mut rng = rand::thread_rng();
        let files = self
            .timestamps(&mut rng, from, until)
            .into_iter()
            .map(|timestamp| KeeperFileOperation {
                operation_size: rng.gen_range(1_000.0..1_000_000.0),
                operation_type: String::from(if rng.gen_bool(0.3) { "create" } else { "edit" }),
                timestamp,
                institute_name: pick(&mut rng, INSTITUTES).to_string(),
                location: location(&mut rng),
            })
            .collect();

        let libraries = (rng.gen_bool(0.2)).then(|| {
            vec![KeeperLibraryCreation {
                library_name: "Shared Datasets".to_string(),
                timestamp: until,
                institute_name: pick(&mut rng, INSTITUTES).to_string(),
                location: location(&mut rng),
            }]
        });

        let activated = (rng.gen_bool(0.1)).then(|| {
            vec![KeeperActivatedUser {
                timestamp: until,
                institute_name: pick(&mut rng, INSTITUTES).to_string(),
            }]
        });

        KeeperData {
            file_creations_and_editings: Some(files),
            library_creations: libraries,
            activated_users: activated,
        }
    }

    pub fn bloxberg(&self, from: i64, until: i64) -> BloxbergData {
        let mut rng = rand::thread_rng();
        let blocks = self
            .timestamps(&mut rng, from, until)
            .into_iter()
            .map(|inserted_at| BloxbergBlock {
                byte_size: rng.gen_range(500.0..1_500.0),
                inserted_at,
                miner: pick(&mut rng, INSTITUTES).to_string(),
                miner_hash: format!("{:016x}", rng.gen::<u64>()),
                location: location(&mut rng),
            })
            .collect();

        let transactions = self
            .timestamps(&mut rng, from, until)
            .into_iter()
            .map(|updated_at| BloxbergConfirmedTransaction {
                transaction_fee: rng.gen_range(2e-8..7e-7),
                updated_at,
                block_miner: pick(&mut rng, INSTITUTES).to_string(),
                block_miner_hash: format!("{:016x}", rng.gen::<u64>()),
                location: location(&mut rng),
            })
            .collect();

        let contributors = (rng.gen_bool(0.05)).then(|| {
            vec![BloxbergLicensedContributor {
                inserted_at: until,
                name: pick(&mut rng, INSTITUTES).to_string(),
            }]
        });

        BloxbergData {
            blocks: Some(blocks),
            confirmed_transactions: Some(transactions),
            licensed_contributors: contributors,
        }
    }

    /// Ascending timestamps spread over the delivery window, matching how the
    /// backends report event times.
    fn timestamps(&self, rng: &mut impl Rng, from: i64, until: i64) -> Vec<i64> {
        let mut stamps: Vec<i64> = (0..self.batch_size)
            .map(|_| rng.gen_range(from..until.max(from + 1)))
            .collect();
        stamps.sort_unstable();
        stamps
    }
}

fn pick<'a>(rng: &mut impl Rng, pool: &[&'a str]) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}

fn location(rng: &mut impl Rng) -> Option<WireLocation> {
    let (lat, long) = *CAMPUSES.choose(rng)?;
    Some(WireLocation {
        coordinate: WireCoordinate { lat, long },
        country_id: "DE".to_string(),
        state_id: String::new(),
    })
}
