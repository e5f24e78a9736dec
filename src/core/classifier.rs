use crate::core::taxonomy::SpecialistTaxonomy;
use crate::core::text::{contains_phrase, normalize, redacted, similarity};
use crate::domain::model::{Classification, ClassificationDetail, MatchKind};

/// Edit-distance similarity a fuzzy candidate must exceed to be accepted.
/// One edit on a five-character word scores exactly this and is rejected.
pub const FUZZY_THRESHOLD: f64 = 0.80;

/// Strings shorter than this never take part in fuzzy matching.
const FUZZY_MIN_CHARS: usize = 4;

/// Maps free text to one taxonomy category.
///
/// Exact phrase matches are tried first. Among several matching categories the
/// longest trigger wins, then the category declared first. Without any exact
/// match every trigger is compared against same-width token windows of the
/// input, and the best one is accepted only when it exceeds [`FUZZY_THRESHOLD`].
#[derive(Debug, Clone)]
pub struct SpecialistClassifier {
    taxonomy: SpecialistTaxonomy,
}

struct Candidate<'a> {
    category: &'a str,
    trigger: &'a str,
    score: f64,
}

impl SpecialistClassifier {
    pub fn new(taxonomy: SpecialistTaxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &SpecialistTaxonomy {
        &self.taxonomy
    }

    pub fn classify(&self, text: &str) -> Classification {
        self.classify_detailed(text).classification
    }

    pub fn classify_detailed(&self, text: &str) -> ClassificationDetail {
        let normalized = normalize(text);
        if normalized.is_empty() {
            tracing::debug!("Empty input, nothing to classify");
            return ClassificationDetail::not_found();
        }

        if let Some(hit) = self.exact_match(&normalized) {
            tracing::debug!(
                "Exact trigger '{}' -> {}",
                hit.trigger,
                hit.category
            );
            return ClassificationDetail {
                classification: Classification::Specialist(hit.category.to_string()),
                trigger: Some(hit.trigger.to_string()),
                kind: Some(MatchKind::Exact),
                similarity: 1.0,
            };
        }

        let tokens: Vec<&str> = normalized.split(' ').collect();
        match self.fuzzy_match(&tokens) {
            Some(hit) if hit.score > FUZZY_THRESHOLD => {
                tracing::debug!(
                    "Fuzzy trigger '{}' -> {} (similarity {:.3})",
                    hit.trigger,
                    hit.category,
                    hit.score
                );
                ClassificationDetail {
                    classification: Classification::Specialist(hit.category.to_string()),
                    trigger: Some(hit.trigger.to_string()),
                    kind: Some(MatchKind::Fuzzy),
                    similarity: hit.score,
                }
            }
            best => {
                tracing::debug!(
                    "No trigger matched input {} (best fuzzy similarity {:.3})",
                    redacted(&normalized),
                    best.map(|c| c.score).unwrap_or(0.0)
                );
                ClassificationDetail::not_found()
            }
        }
    }

    fn exact_match(&self, normalized: &str) -> Option<Candidate<'_>> {
        let mut best: Option<Candidate<'_>> = None;

        for category in self.taxonomy.categories() {
            for trigger in category.triggers() {
                if !contains_phrase(normalized, trigger) {
                    continue;
                }
                let score = trigger.chars().count() as f64;
                // Strictly longer only, so the earlier category keeps a tie.
                if best.as_ref().map_or(true, |b| score > b.score) {
                    best = Some(Candidate {
                        category: category.name(),
                        trigger,
                        score,
                    });
                }
            }
        }

        best
    }

    fn fuzzy_match(&self, tokens: &[&str]) -> Option<Candidate<'_>> {
        let mut best: Option<Candidate<'_>> = None;

        for category in self.taxonomy.categories() {
            for trigger in category.triggers() {
                if trigger.chars().count() < FUZZY_MIN_CHARS {
                    continue;
                }
                let width = trigger.split(' ').count();
                if width > tokens.len() {
                    continue;
                }

                for window in tokens.windows(width) {
                    let candidate = window.join(" ");
                    if candidate.chars().count() < FUZZY_MIN_CHARS {
                        continue;
                    }
                    let score = similarity(&candidate, trigger);
                    if best.as_ref().map_or(true, |b| score > b.score) {
                        best = Some(Candidate {
                            category: category.name(),
                            trigger,
                            score,
                        });
                    }
                }
            }
        }

        best
    }
}

impl Default for SpecialistClassifier {
    fn default() -> Self {
        Self::new(SpecialistTaxonomy::builtin())
    }
}
