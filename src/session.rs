pub mod error;
pub mod inbox;
pub mod run_record;
pub mod script;
pub mod today;

pub use error::{SaveError, TodaySessionError};
pub use inbox::{is_json_content_type, save_session, SaveRequest, SavedRun, SavedSession};
pub use run_record::{
    extract_skipped_steps, normalize_event_log, write_run_result, EventCode, LatestRunPointer,
    NormalizedEvent, RunRecord,
};
pub use script::{validate_session_script, ActionType, Phase, ScriptStep, SessionScript};
pub use today::{find_session_for_date, find_today_session, TodaySession};
