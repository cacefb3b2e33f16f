use super::Database;
use crate::errors::VigilError;
use crate::models::{HistoryEntry, ScanMode, ScanStatus};

impl Database {
    /// Append a scan summary and evict entries beyond the retention cap.
    ///
    /// Both statements run under the same connection lock, so id assignment
    /// is atomic: no two entries receive the same id and ids increase in
    /// append order.
    pub fn append_history(
        &self,
        target: &str,
        mode: ScanMode,
        score: u8,
        status: ScanStatus,
        timestamp: &str,
        retention: usize,
    ) -> Result<i64, VigilError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO history (target, mode, score, status, timestamp) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![target, mode.as_str(), score as i64, status.as_str(), timestamp],
        )
        .map_err(|e| VigilError::Database(format!("Failed to append history: {}", e)))?;
        let id = conn.last_insert_rowid();

        // FIFO eviction: keep only the newest `retention` entries
        conn.execute(
            "DELETE FROM history WHERE id NOT IN (SELECT id FROM history ORDER BY id DESC LIMIT ?1)",
            rusqlite::params![retention as i64],
        )
        .map_err(|e| VigilError::Database(format!("Failed to evict history: {}", e)))?;

        Ok(id)
    }

    /// List history entries most-recent-first.
    pub fn list_history(&self, limit: usize, offset: usize) -> Result<Vec<HistoryEntry>, VigilError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT id, target, score, status, timestamp FROM history ORDER BY id DESC LIMIT ?1 OFFSET ?2",
            )
            .map_err(|e| VigilError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt
            .query_map(
                rusqlite::params![limit as i64, offset as i64],
                |row: &rusqlite::Row| {
                    let status: String = row.get(3)?;
                    Ok(HistoryEntry {
                        id: row.get(0)?,
                        target: row.get(1)?,
                        score: row.get::<_, i64>(2)? as u8,
                        status: ScanStatus::from_str_opt(&status).unwrap_or(ScanStatus::Critical),
                        timestamp: row.get(4)?,
                    })
                },
            )
            .map_err(|e| VigilError::Database(format!("Query error: {}", e)))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| VigilError::Database(format!("Row error: {}", e)))?);
        }
        Ok(results)
    }

    pub fn history_count(&self) -> Result<usize, VigilError> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))
            .map_err(|e| VigilError::Database(format!("Count failed: {}", e)))?;
        Ok(count as usize)
    }
}
