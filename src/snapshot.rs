use crate::error::{RankingError, Result};
use crate::types::ranking::RankingPeriod;
use std::fs;
use std::path::{Path, PathBuf};

pub fn snapshot_file_name(period: &str) -> String {
    format!("rankings-{period}.json")
}

/// Writes `period` under `out_dir`, replacing any snapshot for the same period.
pub fn write_snapshot(out_dir: &Path, period: &RankingPeriod) -> Result<PathBuf> {
    fs::create_dir_all(out_dir).map_err(RankingError::Io)?;
    let out_path = out_dir.join(snapshot_file_name(&period.period));
    let json = serde_json::to_string_pretty(period)?;
    fs::write(&out_path, json).map_err(RankingError::Io)?;
    tracing::info!(path = %out_path.display(), "wrote ranking snapshot");
    Ok(out_path)
}

pub fn read_snapshot(path: &Path) -> Result<RankingPeriod> {
    if !path.exists() {
        return Err(RankingError::PathNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample() -> RankingPeriod {
        RankingPeriod {
            period: "2025-11".to_string(),
            algorithm_version: "v7.3.1".to_string(),
            generated_at: "2025-11-01T00:00:00+00:00".to_string(),
            reference_date: NaiveDate::from_ymd_opt(2025, 11, 1).expect("valid date"),
            input_digest: "deadbeef".to_string(),
            rankings: Vec::new(),
            excluded: vec!["sparse".to_string()],
        }
    }

    #[test]
    fn write_snapshot_creates_directory_and_named_file() {
        let dir = TempDir::new().expect("temp dir should be created");
        let out = dir.path().join("nested/snapshots");

        let path = write_snapshot(&out, &sample()).expect("snapshot should write");
        assert_eq!(path, out.join("rankings-2025-11.json"));

        let loaded = read_snapshot(&path).expect("snapshot should read back");
        assert_eq!(loaded, sample());
    }

    #[test]
    fn read_snapshot_reports_missing_file() {
        let dir = TempDir::new().expect("temp dir should be created");
        let err = read_snapshot(&dir.path().join("missing.json")).expect_err("missing should fail");
        assert!(err.to_string().contains("path does not exist"));
    }
}
