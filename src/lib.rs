//! This crate provides the data side of a student dashboard.
//!
//! Course records (schedules, marks) come from a remote student-data service, that can be reached with the [`client`] module.
//! Records are validated when they are parsed (see [`course`]).
//!
//! What the student does locally (completed tasks, custom tasks) is stored in a [`TaskState`](state::TaskState),
//! persisted through any [`TaskStateStorage`](traits::TaskStateStorage). \
//! A [`TaskTracker`] merges these two sources into a single task list, sorted by due date and priority.
//!
//! The [`progress`] and [`agenda`] modules compute grades, completion statistics and date-bucketed schedule views.

pub mod traits;
pub mod config;

pub mod course;
pub use course::{Course, ScheduleItem, StudentRecord, TaskCategory};
pub mod task;
pub use task::{Priority, Task, TaskId};
pub mod state;
pub mod storage;
pub mod reconcile;
pub mod filter;
pub mod tracker;
pub use tracker::TaskTracker;

pub mod progress;
pub mod agenda;
pub mod syllabus;

pub mod chat;
pub mod client;

pub mod utils;
