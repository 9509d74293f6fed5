//! Domain enums shared across modules.
//!
//! Each maps to a Postgres enum type created in the initial migration.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Program track: National Diploma or Higher National Diploma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "program")]
pub enum Program {
    ND,
    HND,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ND => write!(f, "ND"),
            Self::HND => write!(f, "HND"),
        }
    }
}

/// The semester currently open for registration within an academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "semester")]
pub enum Semester {
    First,
    Second,
}

impl Semester {
    /// Ordinal used where courses store the semester as 1 or 2.
    pub fn number(self) -> i32 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "First"),
            Self::Second => write!(f, "Second"),
        }
    }
}

/// A student's level within their program track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "study_level")]
pub enum StudyLevel {
    ND1,
    ND2,
    HND1,
    HND2,
}

impl StudyLevel {
    /// The program family this level belongs to.
    pub fn program(self) -> Program {
        match self {
            Self::ND1 | Self::ND2 => Program::ND,
            Self::HND1 | Self::HND2 => Program::HND,
        }
    }

    /// Level promotion is a binary flip within the program family, not a
    /// monotonic progression; calling it twice restores the original level.
    pub fn promoted(self) -> Self {
        match self {
            Self::ND1 => Self::ND2,
            Self::ND2 => Self::ND1,
            Self::HND1 => Self::HND2,
            Self::HND2 => Self::HND1,
        }
    }
}

impl fmt::Display for StudyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ND1 => write!(f, "ND1"),
            Self::ND2 => write!(f, "ND2"),
            Self::HND1 => write!(f, "HND1"),
            Self::HND2 => write!(f, "HND2"),
        }
    }
}

/// Course classification; affects the unit-summary breakdown only, the
/// registration cap applies to total units regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "course_status")]
pub enum CourseStatus {
    Core,
    Elective,
}

impl fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core => write!(f, "Core"),
            Self::Elective => write!(f, "Elective"),
        }
    }
}
