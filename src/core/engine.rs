use crate::core::classifier::SpecialistClassifier;
use crate::core::registry::{DoctorRegistry, SharedRegistry};
use crate::core::selector::{select, SelectionCriteria};
use crate::core::taxonomy::SpecialistTaxonomy;
use crate::core::text::redacted;
use crate::core::{ConfigProvider, Storage};
use crate::domain::model::{
    Classification, ClassificationDetail, DoctorRecord, LoadReport, MatchQuery, MatchResult,
};
use crate::utils::error::Result;

/// Classify, then select and rank. Holds the taxonomy and a shared registry.
pub struct MatchEngine {
    classifier: SpecialistClassifier,
    registry: SharedRegistry,
}

impl MatchEngine {
    pub fn new(classifier: SpecialistClassifier, registry: impl Into<SharedRegistry>) -> Self {
        let engine = Self {
            classifier,
            registry: registry.into(),
        };
        engine.warn_unknown_specialists(&engine.registry.snapshot());
        engine
    }

    /// Startup path: taxonomy (file or built-in) and registry through `storage`.
    /// Any load failure is returned; there is no partially loaded engine.
    pub async fn from_config<S, C>(storage: &S, config: &C) -> Result<(Self, LoadReport)>
    where
        S: Storage,
        C: ConfigProvider,
    {
        let taxonomy = match config.taxonomy_path() {
            Some(path) => SpecialistTaxonomy::load(storage, path).await?,
            None => {
                tracing::debug!("Using built-in taxonomy");
                SpecialistTaxonomy::builtin()
            }
        };
        let (registry, report) = DoctorRegistry::load(storage, config.registry_path()).await?;

        Ok((Self::new(SpecialistClassifier::new(taxonomy), registry), report))
    }

    pub fn classifier(&self) -> &SpecialistClassifier {
        &self.classifier
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn classify(&self, text: &str) -> Classification {
        self.classifier.classify(text)
    }

    pub fn classify_detailed(&self, text: &str) -> ClassificationDetail {
        self.classifier.classify_detailed(text)
    }

    pub fn select(&self, criteria: &SelectionCriteria) -> Result<Vec<DoctorRecord>> {
        select(&self.registry.snapshot(), criteria)
    }

    /// Swap in a freshly loaded registry. Lookups already running keep the old one.
    pub fn reload_registry(&self, registry: DoctorRegistry) {
        self.warn_unknown_specialists(&registry);
        let previous = self.registry.replace(registry);
        tracing::info!(
            "Registry reloaded ({} -> {} doctors)",
            previous.len(),
            self.registry.snapshot().len()
        );
    }

    pub fn run(&self, query: &MatchQuery) -> Result<MatchResult> {
        self.run_detailed(query).map(|(result, _)| result)
    }

    /// Like [`run`](Self::run), also returning how the specialist was decided.
    /// The text is classified once.
    pub fn run_detailed(&self, query: &MatchQuery) -> Result<(MatchResult, ClassificationDetail)> {
        // Constraints are checked even when classification would miss.
        SelectionCriteria::for_query("", query).validate()?;

        tracing::debug!("Classifying input {}", redacted(&query.raw_text));
        let detail = self.classifier.classify_detailed(&query.raw_text);
        let specialist = match &detail.classification {
            Classification::Specialist(label) => label.clone(),
            Classification::NotFound => {
                tracing::info!("No specialist found for the given symptoms");
                return Ok((MatchResult::SpecialistNotFound, detail));
            }
        };
        tracing::info!("Recommended specialist: {}", specialist);

        let criteria = SelectionCriteria::for_query(specialist.clone(), query);
        let doctors = self.select(&criteria)?;

        if doctors.is_empty() {
            tracing::info!("No qualifying {} found", specialist);
            return Ok((MatchResult::NoQualifyingDoctor { specialist }, detail));
        }

        tracing::info!("Found {} qualifying {}(s)", doctors.len(), specialist);
        Ok((
            MatchResult::Matched {
                specialist,
                doctors,
            },
            detail,
        ))
    }

    fn warn_unknown_specialists(&self, registry: &DoctorRegistry) {
        let taxonomy = self.classifier.taxonomy();
        let mut unknown: Vec<&str> = registry
            .records()
            .iter()
            .map(|r| r.specialist.as_str())
            .filter(|s| !taxonomy.contains(s))
            .collect();
        unknown.sort_unstable();
        unknown.dedup();

        if !unknown.is_empty() {
            tracing::warn!(
                "Registry lists specialists missing from the taxonomy, they can never be matched: {}",
                unknown.join(", ")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::MatchError;

    fn engine() -> MatchEngine {
        let taxonomy = SpecialistTaxonomy::new([
            ("Cardiologist", vec!["chest pain", "heart"]),
            ("Neurologist", vec!["headache", "migraine"]),
            ("Dermatologist", vec!["rash", "acne"]),
        ])
        .unwrap();
        let csv = "Name,Specialist,Experience,Location,Contact,Rating\n\
                   A,Cardiologist,5,Chennai,1,4.8\n\
                   B,Cardiologist,3,Chennai,2,4.8\n\
                   C,Cardiologist,10,Chennai,3,3.0\n\
                   D,Neurologist,1,Mumbai,4,4.9\n";
        let (registry, _) = DoctorRegistry::from_csv_str(csv, "inline").unwrap();
        MatchEngine::new(SpecialistClassifier::new(taxonomy), registry)
    }

    #[test]
    fn run_matches_and_ranks() {
        let result = engine()
            .run(&MatchQuery::new("chest pain at night").with_location("chennai"))
            .unwrap();
        assert_eq!(result.specialist(), Some("Cardiologist"));
        let names: Vec<&str> = result.doctors().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        let ranks: Vec<usize> = result.ranked().iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2]);
    }

    #[test]
    fn run_keeps_misses_distinct() {
        let engine = engine();
        assert_eq!(
            engine.run(&MatchQuery::new("")).unwrap(),
            MatchResult::SpecialistNotFound
        );
        assert_eq!(
            engine.run(&MatchQuery::new("itchy rash")).unwrap(),
            MatchResult::NoQualifyingDoctor {
                specialist: "Dermatologist".to_string()
            }
        );
        // Only Neurologist has too little experience.
        assert_eq!(
            engine.run(&MatchQuery::new("migraine")).unwrap(),
            MatchResult::NoQualifyingDoctor {
                specialist: "Neurologist".to_string()
            }
        );
    }

    #[test]
    fn run_rejects_invalid_rating_before_classifying() {
        let err = engine()
            .run(&MatchQuery::new("unknown words").with_min_rating(6.0))
            .unwrap_err();
        assert!(matches!(err, MatchError::InvalidConstraint { .. }));
    }

    #[test]
    fn run_detailed_explains_the_same_outcome() {
        let engine = engine();
        let query = MatchQuery::new("chest pain at night").with_location("chennai");
        let (result, detail) = engine.run_detailed(&query).unwrap();
        assert_eq!(result, engine.run(&query).unwrap());
        assert_eq!(
            detail.classification,
            Classification::Specialist("Cardiologist".to_string())
        );
        assert_eq!(detail.trigger.as_deref(), Some("chest pain"));

        let (miss, detail) = engine.run_detailed(&MatchQuery::new("broken toenail")).unwrap();
        assert_eq!(miss, MatchResult::SpecialistNotFound);
        assert_eq!(detail.classification, Classification::NotFound);
        assert_eq!(detail.trigger, None);
    }

    #[test]
    fn reload_is_visible_to_later_lookups() {
        let engine = engine();
        let held = engine.registry().snapshot();
        let csv = "Name,Specialist,Experience,Location,Contact,Rating\nZ,Dermatologist,4,Pune,9,4.4\n";
        let (fresh, _) = DoctorRegistry::from_csv_str(csv, "reload").unwrap();

        engine.reload_registry(fresh);

        assert_eq!(held.len(), 4);
        let result = engine.run(&MatchQuery::new("acne")).unwrap();
        assert_eq!(result.doctors()[0].name, "Z");
    }
}
