pub mod issue;
pub mod scan;
pub mod history;

pub use issue::Issue;
pub use scan::{CardSource, ScanDetails, ScanMode, ScanResult, ScanStatus, ScanTarget};
pub use history::HistoryEntry;
