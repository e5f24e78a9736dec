use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_EXPERIENCE: u32 = 2;
pub const DEFAULT_MIN_RATING: f64 = 3.5;
pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

/// One practitioner row of the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorRecord {
    pub name: String,
    pub specialist: String,
    pub experience_years: u32,
    pub location: String,
    pub contact: String,
    pub rating: f64,
}

/// Outcome of classifying free text against the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "specialist", rename_all = "snake_case")]
pub enum Classification {
    Specialist(String),
    NotFound,
}

impl Classification {
    pub fn label(&self) -> Option<&str> {
        match self {
            Classification::Specialist(label) => Some(label),
            Classification::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Classification::Specialist(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Fuzzy,
}

/// Classification plus the trigger that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationDetail {
    pub classification: Classification,
    pub trigger: Option<String>,
    pub kind: Option<MatchKind>,
    /// 1.0 for exact matches, the edit-distance similarity for fuzzy ones.
    pub similarity: f64,
}

impl ClassificationDetail {
    pub fn not_found() -> Self {
        Self {
            classification: Classification::NotFound,
            trigger: None,
            kind: None,
            similarity: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchQuery {
    pub raw_text: String,
    pub location: Option<String>,
    pub min_experience: u32,
    pub min_rating: f64,
    pub limit: Option<usize>,
}

impl MatchQuery {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            location: None,
            min_experience: DEFAULT_MIN_EXPERIENCE,
            min_rating: DEFAULT_MIN_RATING,
            limit: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_min_experience(mut self, years: u32) -> Self {
        self.min_experience = years;
        self
    }

    pub fn with_min_rating(mut self, rating: f64) -> Self {
        self.min_rating = rating;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// "Condition unknown" and "no doctor qualifies" stay distinct outcomes.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    SpecialistNotFound,
    NoQualifyingDoctor {
        specialist: String,
    },
    Matched {
        specialist: String,
        doctors: Vec<DoctorRecord>,
    },
}

impl MatchResult {
    pub fn specialist(&self) -> Option<&str> {
        match self {
            MatchResult::SpecialistNotFound => None,
            MatchResult::NoQualifyingDoctor { specialist }
            | MatchResult::Matched { specialist, .. } => Some(specialist),
        }
    }

    pub fn doctors(&self) -> &[DoctorRecord] {
        match self {
            MatchResult::Matched { doctors, .. } => doctors,
            _ => &[],
        }
    }

    /// Display ranks, 1-based, in result order.
    pub fn ranked(&self) -> Vec<RankedDoctor<'_>> {
        self.doctors()
            .iter()
            .enumerate()
            .map(|(idx, doctor)| RankedDoctor {
                rank: idx + 1,
                doctor,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedDoctor<'a> {
    pub rank: usize,
    #[serde(flatten)]
    pub doctor: &'a DoctorRecord,
}

/// A registry row that was skipped during load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    /// 1-based data row number, header excluded.
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_accepted: usize,
    pub rejected: Vec<RejectedRow>,
}
