//! Support for library configuration options

use std::path::PathBuf;

use once_cell::sync::Lazy;

/// Base URL of the student-data and assistant service, used when `CAMPUS_API_URL` is not set
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// File that holds the persisted task state, used when `CAMPUS_TASKS_FILE` is not set
pub const DEFAULT_STATE_FILE: &str = "campus_tasks.json";

/// A task due in this many days or fewer (including overdue ones) is high priority
pub const HIGH_PRIORITY_WITHIN_DAYS: i64 = 3;

/// A task due in more than this many days is low priority
pub const LOW_PRIORITY_AFTER_DAYS: i64 = 7;

/// How many deadlines the "upcoming deadlines" view shows
pub const UPCOMING_DEADLINES_COUNT: usize = 5;

/// Base URL of the remote service.
/// Override it with the `CAMPUS_API_URL` environment variable.
pub static API_URL: Lazy<String> = Lazy::new(|| {
    std::env::var("CAMPUS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
});

/// Path to the JSON file the command-line tool stores its task state into.
/// Override it with the `CAMPUS_TASKS_FILE` environment variable.
pub static STATE_FILE: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var_os("CAMPUS_TASKS_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE))
});
