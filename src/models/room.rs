//! Room model.
//!
//! Rooms are typed: theory subjects go to theory rooms, labs to lab
//! rooms. The scheduler never mixes types except in forced fallback
//! placements, which the fitness function prices accordingly.

use serde::{Deserialize, Serialize};

/// A room available for scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Room number (unique identifier).
    pub room_no: String,
    /// Room classification.
    pub room_type: RoomType,
}

/// Room type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomType {
    /// Lecture room for theory and elective subjects.
    Theory,
    /// Laboratory for lab subjects.
    Lab,
}

impl Room {
    /// Creates a new room.
    pub fn new(room_no: impl Into<String>, room_type: RoomType) -> Self {
        Self {
            room_no: room_no.into(),
            room_type,
        }
    }

    /// Creates a theory room.
    pub fn theory(room_no: impl Into<String>) -> Self {
        Self::new(room_no, RoomType::Theory)
    }

    /// Creates a lab room.
    pub fn lab(room_no: impl Into<String>) -> Self {
        Self::new(room_no, RoomType::Lab)
    }
}
