use console::style;

use crate::cli::commands::HistoryArgs;
use crate::db::Database;
use crate::errors::VigilError;
use crate::models::ScanStatus;

pub async fn handle_history(args: HistoryArgs) -> Result<(), VigilError> {
    let db = Database::new(&args.db)?;
    let entries = db.list_history(args.limit, 0)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No scans recorded yet");
        return Ok(());
    }

    for entry in entries {
        let status = match entry.status {
            ScanStatus::Safe => style(entry.status.as_str()).green(),
            ScanStatus::Warning => style(entry.status.as_str()).yellow(),
            ScanStatus::Critical => style(entry.status.as_str()).red(),
        };
        println!(
            "{:>5}  {}  {:>3}  {:<8}  {}",
            entry.id,
            entry.timestamp,
            entry.score,
            status,
            entry.target
        );
    }
    Ok(())
}
