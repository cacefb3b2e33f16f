use serde::{Deserialize, Serialize};

use super::scan::ScanStatus;

/// A persisted summary of one scan, as stored in and listed from the
/// history table. Ids are assigned at append time and are strictly
/// increasing in append order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub target: String,
    pub score: u8,
    pub status: ScanStatus,
    pub timestamp: String,
}
