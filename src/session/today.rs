use super::error::TodaySessionError;
use super::script::{validate_session_script, SessionScript};
use chrono::{Datelike, Local, NaiveDate};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// The session script prescribed for a given day.
#[derive(Debug, Clone, PartialEq)]
pub struct TodaySession {
    pub path: PathBuf,
    pub script: SessionScript,
    /// The file's JSON as read, unknown fields included.
    pub payload: Value,
}

/// `<sessions_dir>/week<iso-year>_<iso-week>`, week zero-padded to two digits.
pub fn week_dir_for(sessions_dir: &Path, date: NaiveDate) -> PathBuf {
    let week = date.iso_week();
    sessions_dir.join(format!("week{}_{:02}", week.year(), week.week()))
}

pub fn session_file_glob(date: NaiveDate) -> String {
    format!("session_{}_*.json", date.format("%Y%m%d"))
}

pub fn find_today_session(sessions_dir: &Path) -> Result<TodaySession, TodaySessionError> {
    find_session_for_date(sessions_dir, Local::now().date_naive())
}

/// Picks the lexicographically first `session_<YYYYMMDD>_*.json` in the
/// date's week directory, parses it and checks the script contract.
pub fn find_session_for_date(
    sessions_dir: &Path,
    date: NaiveDate,
) -> Result<TodaySession, TodaySessionError> {
    let week_dir = week_dir_for(sessions_dir, date);
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&week_dir.to_string_lossy()),
        session_file_glob(date)
    );
    let mut candidates: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|err| TodaySessionError::InvalidFile(err.to_string()))?
        .filter_map(Result::ok)
        .collect();
    candidates.sort();

    let Some(path) = candidates.into_iter().next() else {
        return Err(TodaySessionError::NoSessionForToday);
    };

    let raw = fs::read_to_string(&path)
        .map_err(|err| TodaySessionError::InvalidFile(err.to_string()))?;
    let payload: Value = serde_json::from_str(&raw)
        .map_err(|err| TodaySessionError::InvalidFile(err.to_string()))?;
    let script = validate_session_script(&payload).map_err(TodaySessionError::InvalidContract)?;

    Ok(TodaySession {
        path,
        script,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_dir_uses_iso_year_at_year_boundary() {
        let date = NaiveDate::from_ymd_opt(2027, 1, 1).expect("date");
        let dir = week_dir_for(Path::new("/sessions"), date);
        assert_eq!(dir, PathBuf::from("/sessions/week2026_53"));
    }

    #[test]
    fn week_number_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 7).expect("date");
        let dir = week_dir_for(Path::new("/sessions"), date);
        assert_eq!(dir, PathBuf::from("/sessions/week2026_02"));
        assert_eq!(session_file_glob(date), "session_20260107_*.json");
    }
}
