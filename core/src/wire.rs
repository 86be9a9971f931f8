// Wire-format structs for the per-service batch payloads.
//
// Field names follow the backend JSON verbatim (PascalCase, except the
// location object which is camelCase). Record lists may be null on the wire,
// hence Option everywhere a list appears.
use serde::{Deserialize, Serialize};

use crate::model::GeoPoint;

/// Connection metadata attached to every delivered batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventInfo {
    #[serde(rename = "Service")]
    pub service: String,
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "ExpectedFrontendVersion")]
    pub expected_frontend_version: i64,
    #[serde(rename = "ActiveConnections")]
    pub active_connections: u32,
    #[serde(rename = "FromTimepoint")]
    pub from_timepoint: i64,
    #[serde(rename = "DatabaseInfo")]
    pub database_info: DatabaseInfo,
}

/// Backend database connectivity descriptor.
///
/// A service counts as errored when it is neither connected nor connecting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseInfo {
    #[serde(rename = "IsConnectionEstablished")]
    pub is_connection_established: bool,
    #[serde(rename = "IsConnecting")]
    pub is_connecting: bool,
    #[serde(rename = "NextReconnect")]
    pub next_reconnect: i64,
    #[serde(rename = "NumberOfDbReconnects")]
    pub number_of_db_reconnects: u32,
}

impl DatabaseInfo {
    pub fn is_errored(&self) -> bool {
        !self.is_connection_established && !self.is_connecting
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireLocation {
    #[serde(rename = "coordinate")]
    pub coordinate: WireCoordinate,
    #[serde(rename = "countryId")]
    pub country_id: String,
    #[serde(rename = "stateId")]
    pub state_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireCoordinate {
    pub lat: f64,
    pub long: f64,
}

impl WireLocation {
    pub fn geo_point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.coordinate.lat,
            long: self.coordinate.long,
        }
    }
}

// Minerva

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinervaMessage {
    #[serde(rename = "InstituteName")]
    pub institute_name: String,
    #[serde(rename = "CreatedAt")]
    pub created_at: i64,
    #[serde(rename = "MessageLength")]
    pub message_length: f64,
    #[serde(rename = "ChannelType")]
    pub channel_type: String,
    #[serde(rename = "Location")]
    pub location: Option<WireLocation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinervaData {
    #[serde(rename = "Messages")]
    pub messages: Option<Vec<MinervaMessage>>,
}

// Keeper

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeeperFileOperation {
    #[serde(rename = "OperationSize")]
    pub operation_size: f64,
    #[serde(rename = "OperationType")]
    pub operation_type: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: i64,
    #[serde(rename = "InstituteName")]
    pub institute_name: String,
    #[serde(rename = "Location")]
    pub location: Option<WireLocation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeeperLibraryCreation {
    #[serde(rename = "LibraryName")]
    pub library_name: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: i64,
    #[serde(rename = "InstituteName")]
    pub institute_name: String,
    #[serde(rename = "Location")]
    pub location: Option<WireLocation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeeperActivatedUser {
    #[serde(rename = "Timestamp")]
    pub timestamp: i64,
    #[serde(rename = "InstituteName")]
    pub institute_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeeperData {
    #[serde(rename = "FileCreationsAndEditings")]
    pub file_creations_and_editings: Option<Vec<KeeperFileOperation>>,
    #[serde(rename = "LibraryCreations")]
    pub library_creations: Option<Vec<KeeperLibraryCreation>>,
    #[serde(rename = "ActivatedUsers")]
    pub activated_users: Option<Vec<KeeperActivatedUser>>,
}

// Bloxberg

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloxbergBlock {
    #[serde(rename = "ByteSize")]
    pub byte_size: f64,
    #[serde(rename = "InsertedAt")]
    pub inserted_at: i64,
    #[serde(rename = "Miner")]
    pub miner: String,
    #[serde(rename = "MinerHash")]
    pub miner_hash: String,
    #[serde(rename = "Location")]
    pub location: Option<WireLocation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloxbergConfirmedTransaction {
    #[serde(rename = "TransactionFee")]
    pub transaction_fee: f64,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: i64,
    #[serde(rename = "BlockMiner")]
    pub block_miner: String,
    #[serde(rename = "BlockMinerHash")]
    pub block_miner_hash: String,
    #[serde(rename = "Location")]
    pub location: Option<WireLocation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloxbergLicensedContributor {
    #[serde(rename = "InsertedAt")]
    pub inserted_at: i64,
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BloxbergData {
    #[serde(rename = "Blocks")]
    pub blocks: Option<Vec<BloxbergBlock>>,
    #[serde(rename = "ConfirmedTransactions")]
    pub confirmed_transactions: Option<Vec<BloxbergConfirmedTransaction>>,
    #[serde(rename = "LicensedContributors")]
    pub licensed_contributors: Option<Vec<BloxbergLicensedContributor>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_record_lists_deserialize_to_none() {
        let data: KeeperData = serde_json::from_str(
            r#"{"FileCreationsAndEditings":null,"LibraryCreations":null,"ActivatedUsers":null}"#,
        )
        .unwrap();
        assert!(data.file_creations_and_editings.is_none());
        assert!(data.library_creations.is_none());
        assert!(data.activated_users.is_none());
    }

    #[test]
    fn errored_means_not_connected_and_not_connecting() {
        let info = DatabaseInfo {
            is_connection_established: false,
            is_connecting: true,
            next_reconnect: 0,
            number_of_db_reconnects: 3,
        };
        assert!(!info.is_errored());
        let down = DatabaseInfo {
            is_connecting: false,
            ..info
        };
        assert!(down.is_errored());
    }
}
