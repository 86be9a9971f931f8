// Per-service transformers: one raw batch in, a uniform list of delayed
// circle events (plus at most one banner event) out.
//
// All transformers assume the incoming record lists are ordered earliest
// first; the per-record delay is the gap to the previous record, or to the
// query-window start for the first one.

pub mod bloxberg;
pub mod keeper;
pub mod minerva;

pub use bloxberg::{BloxbergTransformed, BloxbergTransformer};
pub use keeper::{KeeperTransformed, KeeperTransformer};
pub use minerva::{MinervaTransformed, MinervaTransformer};

/// Canonical display name for known raw institution strings.
///
/// The rena dataset used by the backend carries multiple entries for the
/// domain tuebingen.mpg.de that all belong to one campus.
pub(crate) fn campus_display_name(raw: &str) -> String {
    if raw == "tuebingen.mpg.de" {
        "Max Planck Tübingen".to_string()
    } else {
        raw.to_string()
    }
}
