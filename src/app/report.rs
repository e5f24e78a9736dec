use crate::domain::model::{ClassificationDetail, MatchResult, RankedDoctor};
use crate::utils::error::Result;
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Matched,
    NoQualifyingDoctor,
    SpecialistNotFound,
}

/// Serializable view of one match, ranks included.
#[derive(Debug, Serialize)]
pub struct MatchReport<'a> {
    pub query: &'a str,
    pub status: ReportStatus,
    pub specialist: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<&'a ClassificationDetail>,
    pub doctors: Vec<RankedDoctor<'a>>,
}

impl<'a> MatchReport<'a> {
    pub fn new(query: &'a str, result: &'a MatchResult) -> Self {
        let status = match result {
            MatchResult::Matched { .. } => ReportStatus::Matched,
            MatchResult::NoQualifyingDoctor { .. } => ReportStatus::NoQualifyingDoctor,
            MatchResult::SpecialistNotFound => ReportStatus::SpecialistNotFound,
        };
        Self {
            query,
            status,
            specialist: result.specialist(),
            explanation: None,
            doctors: result.ranked(),
        }
    }

    pub fn with_explanation(mut self, detail: &'a ClassificationDetail) -> Self {
        self.explanation = Some(detail);
        self
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_table(&self) -> String {
        let mut out = String::new();

        let Some(specialist) = self.specialist else {
            out.push_str("Condition not found. Please try a different search term.\n");
            return out;
        };

        let _ = writeln!(out, "Recommended specialist: {}", specialist);
        if let Some(detail) = self.explanation {
            if let (Some(trigger), Some(kind)) = (&detail.trigger, detail.kind) {
                let _ = writeln!(
                    out,
                    "Matched trigger: \"{}\" ({:?}, similarity {:.2})",
                    trigger, kind, detail.similarity
                );
            }
        }

        if self.doctors.is_empty() {
            out.push_str("No suitable doctors found. Try broadening your location.\n");
            return out;
        }

        let _ = writeln!(out, "Top {} doctors found:", self.doctors.len());
        let _ = writeln!(
            out,
            "{:>3}  {:<28} {:>5}  {:<20} {:<16} {:>6}",
            "#", "Name", "Exp", "Location", "Contact", "Rating"
        );
        for ranked in &self.doctors {
            let doctor = ranked.doctor;
            let _ = writeln!(
                out,
                "{:>3}  {:<28} {:>5}  {:<20} {:<16} {:>6.1}",
                ranked.rank,
                doctor.name,
                format!("{}y", doctor.experience_years),
                doctor.location,
                doctor.contact,
                doctor.rating
            );
        }
        out
    }
}
