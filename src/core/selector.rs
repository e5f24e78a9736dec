use crate::core::registry::DoctorRegistry;
use crate::domain::model::{
    DoctorRecord, MatchQuery, DEFAULT_MIN_EXPERIENCE, DEFAULT_MIN_RATING, MAX_RATING, MIN_RATING,
};
use crate::utils::error::Result;
use crate::utils::validation::validate_constraint;

/// Filter constraints for one specialist lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionCriteria {
    pub specialist: String,
    pub location: Option<String>,
    pub min_experience: u32,
    pub min_rating: f64,
    pub limit: Option<usize>,
}

impl SelectionCriteria {
    pub fn new(specialist: impl Into<String>) -> Self {
        Self {
            specialist: specialist.into(),
            location: None,
            min_experience: DEFAULT_MIN_EXPERIENCE,
            min_rating: DEFAULT_MIN_RATING,
            limit: None,
        }
    }

    /// Criteria for the specialist a query classified to.
    pub fn for_query(specialist: impl Into<String>, query: &MatchQuery) -> Self {
        Self {
            specialist: specialist.into(),
            location: query.location.clone(),
            min_experience: query.min_experience,
            min_rating: query.min_rating,
            limit: query.limit,
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

    pub fn validate(&self) -> Result<()> {
        validate_constraint("min_rating", self.min_rating, MIN_RATING, MAX_RATING)
    }

    /// Lowercased location filter, or `None` when absent or blank.
    fn location_needle(&self) -> Option<String> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_lowercase)
    }

    pub fn matches(&self, record: &DoctorRecord) -> bool {
        self.matches_with(record, self.location_needle().as_deref())
    }

    fn matches_with(&self, record: &DoctorRecord, location_needle: Option<&str>) -> bool {
        record.specialist == self.specialist
            && record.experience_years >= self.min_experience
            && record.rating >= self.min_rating
            && location_needle
                .map_or(true, |needle| record.location.to_lowercase().contains(needle))
    }
}

/// Qualifying doctors, best rated first. Equal ratings keep registry order.
pub fn select(registry: &DoctorRegistry, criteria: &SelectionCriteria) -> Result<Vec<DoctorRecord>> {
    criteria.validate()?;

    let needle = criteria.location_needle();
    let mut selected: Vec<DoctorRecord> = registry
        .records()
        .iter()
        .filter(|record| criteria.matches_with(record, needle.as_deref()))
        .cloned()
        .collect();

    // sort_by is stable.
    selected.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    if let Some(limit) = criteria.limit {
        selected.truncate(limit);
    }

    tracing::debug!(
        "Selected {} of {} doctors for {}",
        selected.len(),
        registry.len(),
        criteria.specialist
    );
    Ok(selected)
}

impl DoctorRegistry {
    /// Positional form of [`select`] with no result limit.
    pub fn select(
        &self,
        specialist: &str,
        location: Option<&str>,
        min_experience: u32,
        min_rating: f64,
    ) -> Result<Vec<DoctorRecord>> {
        let criteria = SelectionCriteria {
            specialist: specialist.to_string(),
            location: location.map(str::to_string),
            min_experience,
            min_rating,
            limit: None,
        };
        select(self, &criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::MatchError;

    fn doctor(name: &str, specialist: &str, exp: u32, location: &str, rating: f64) -> DoctorRecord {
        DoctorRecord {
            name: name.to_string(),
            specialist: specialist.to_string(),
            experience_years: exp,
            location: location.to_string(),
            contact: format!("{}-contact", name),
            rating,
        }
    }

    fn chennai_cardiologists() -> DoctorRegistry {
        DoctorRegistry::new(vec![
            doctor("A", "Cardiologist", 5, "Chennai", 4.8),
            doctor("B", "Cardiologist", 3, "Chennai", 4.8),
            doctor("C", "Cardiologist", 10, "Chennai", 3.0),
        ])
    }

    fn names(records: &[DoctorRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn filters_by_rating_and_keeps_tie_order() {
        let registry = chennai_cardiologists();
        let result = registry
            .select("Cardiologist", Some("Chennai"), 2, 3.5)
            .unwrap();
        assert_eq!(names(&result), vec!["A", "B"]);
    }

    #[test]
    fn unknown_specialist_yields_empty_result() {
        let registry = chennai_cardiologists();
        let result = registry.select("Dermatologist", None, 2, 3.5).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn location_is_case_insensitive_substring() {
        let registry = DoctorRegistry::new(vec![
            doctor("A", "Cardiologist", 5, "Chennai", 4.0),
            doctor("B", "Cardiologist", 5, "Mumbai", 4.5),
            doctor("C", "Cardiologist", 5, "T. Nagar, CHENNAI", 4.2),
        ]);
        let result = registry.select("Cardiologist", Some("chen"), 2, 3.5).unwrap();
        assert_eq!(names(&result), vec!["C", "A"]);
    }

    #[test]
    fn blank_location_means_no_filter() {
        let registry = DoctorRegistry::new(vec![
            doctor("A", "Cardiologist", 5, "Chennai", 4.0),
            doctor("B", "Cardiologist", 5, "Mumbai", 4.5),
        ]);
        let result = registry.select("Cardiologist", Some("   "), 2, 3.5).unwrap();
        assert_eq!(names(&result), vec!["B", "A"]);
    }

    #[test]
    fn experience_threshold_is_inclusive() {
        let registry = DoctorRegistry::new(vec![
            doctor("A", "Neurologist", 1, "Delhi", 4.9),
            doctor("B", "Neurologist", 2, "Delhi", 3.5),
        ]);
        let result = registry.select("Neurologist", None, 2, 3.5).unwrap();
        assert_eq!(names(&result), vec!["B"]);
    }

    #[test]
    fn specialist_match_is_exact() {
        let registry = DoctorRegistry::new(vec![
            doctor("A", "cardiologist", 5, "Delhi", 4.9),
            doctor("B", "Cardiologist ", 5, "Delhi", 4.9),
        ]);
        assert!(registry.select("Cardiologist", None, 0, 0.0).unwrap().is_empty());
    }

    #[test]
    fn every_result_satisfies_the_predicate() {
        let registry = DoctorRegistry::new(vec![
            doctor("A", "Dermatologist", 1, "Pune", 4.1),
            doctor("B", "Dermatologist", 7, "Pune", 3.2),
            doctor("C", "Dermatologist", 4, "Pune", 4.6),
            doctor("D", "Cardiologist", 9, "Pune", 5.0),
            doctor("E", "Dermatologist", 12, "Nagpur", 3.9),
            doctor("F", "Dermatologist", 2, "Pune", 3.9),
        ]);
        let criteria = SelectionCriteria::new("Dermatologist")
            .with_location("pune")
            .with_min_experience(2)
            .with_min_rating(3.5);
        let result = select(&registry, &criteria).unwrap();

        assert_eq!(names(&result), vec!["C", "F"]);
        assert!(result.iter().all(|r| criteria.matches(r)));
        assert!(result.windows(2).all(|w| w[0].rating >= w[1].rating));
        assert!(result.iter().all(|r| registry.records().contains(r)));
    }

    #[test]
    fn selection_is_idempotent() {
        let registry = chennai_cardiologists();
        let criteria = SelectionCriteria::new("Cardiologist").with_min_rating(0.0);
        let first = select(&registry, &criteria).unwrap();
        let second = select(&registry, &criteria).unwrap();
        assert_eq!(first, second);
        assert_eq!(names(&first), vec!["A", "B", "C"]);
    }

    #[test]
    fn limit_truncates_after_ranking() {
        let registry = chennai_cardiologists();
        let criteria = SelectionCriteria::new("Cardiologist")
            .with_min_rating(0.0)
            .with_limit(1);
        assert_eq!(names(&select(&registry, &criteria).unwrap()), vec!["A"]);
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let registry = chennai_cardiologists();
        for bad in [-0.5, 5.5, f64::NAN, f64::INFINITY] {
            let err = registry.select("Cardiologist", None, 2, bad).unwrap_err();
            assert!(matches!(err, MatchError::InvalidConstraint { .. }), "rating {bad}");
        }
    }

    #[test]
    fn registry_is_not_mutated() {
        let registry = chennai_cardiologists();
        let before = registry.clone();
        let _ = registry.select("Cardiologist", Some("Chennai"), 2, 3.5).unwrap();
        assert_eq!(registry, before);
    }
}
