//! Timetabling domain models.
//!
//! The immutable inputs to a scheduling run: subjects with weekly period
//! requirements, teachers with subject preferences, and typed rooms.
//! Entity management (create/update/delete) lives with the caller; the
//! scheduler only reads these.

mod room;
mod subject;
mod teacher;

pub use room::{Room, RoomType};
pub use subject::{Subject, SubjectType};
pub use teacher::Teacher;
