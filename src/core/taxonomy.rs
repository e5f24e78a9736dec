use crate::core::text::normalize;
use crate::core::Storage;
use crate::utils::error::{MatchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Built-in categories in precedence order. Earlier entries win ties.
const BUILTIN_TAXONOMY: &[(&str, &[&str])] = &[
    (
        "General Physician",
        &[
            "fever", "cold", "common cold", "flu", "cough", "fatigue", "weakness",
            "body ache", "viral infection", "typhoid", "malaria", "dengue",
        ],
    ),
    (
        "Cardiologist",
        &[
            "chest pain", "heart", "heart attack", "heart failure", "palpitations",
            "high blood pressure", "hypertension", "arrhythmia",
        ],
    ),
    (
        "Neurologist",
        &[
            "headache", "migraine", "dizziness", "seizure", "epilepsy", "stroke",
            "numbness", "paralysis", "memory loss", "tremor", "vertigo",
        ],
    ),
    (
        "Dermatologist",
        &[
            "rash", "acne", "eczema", "psoriasis", "itching", "skin infection",
            "skin allergy", "hair loss",
        ],
    ),
    (
        "Endocrinologist",
        &[
            "diabetes", "thyroid", "hypothyroidism", "hyperthyroidism", "obesity",
            "hormonal imbalance", "high blood sugar",
        ],
    ),
    (
        "Gastroenterologist",
        &[
            "stomach pain", "abdominal pain", "acidity", "gastritis", "ulcer",
            "diarrhea", "constipation", "vomiting", "indigestion", "liver", "jaundice", "ibs",
        ],
    ),
    (
        "Pulmonologist",
        &[
            "asthma", "breathlessness", "shortness of breath", "chronic cough",
            "pneumonia", "bronchitis", "tuberculosis", "copd", "wheezing",
        ],
    ),
    (
        "Orthopedic",
        &[
            "joint pain", "back pain", "knee pain", "neck pain", "fracture", "arthritis",
            "sprain",
        ],
    ),
    (
        "Psychiatrist",
        &[
            "depression", "anxiety", "insomnia", "stress", "panic attack", "bipolar",
            "schizophrenia",
        ],
    ),
    (
        "ENT Specialist",
        &[
            "ear pain", "hearing loss", "sinusitis", "sore throat", "tonsillitis",
            "nose bleed", "tinnitus",
        ],
    ),
    (
        "Ophthalmologist",
        &[
            "eye pain", "blurred vision", "vision loss", "red eye", "cataract", "glaucoma",
        ],
    ),
    (
        "Nephrologist",
        &["kidney failure", "kidney disease", "dialysis", "proteinuria"],
    ),
    (
        "Urologist",
        &[
            "kidney stone", "urinary infection", "uti", "frequent urination", "prostate",
            "blood in urine",
        ],
    ),
    (
        "Gynecologist",
        &[
            "pregnancy", "irregular periods", "menstrual pain", "pcos", "pcod", "menopause",
        ],
    ),
    (
        "Pediatrician",
        &["child fever", "child cough", "infant", "newborn", "vaccination"],
    ),
    (
        "Oncologist",
        &[
            "cancer", "tumor", "tumour", "lump", "chemotherapy", "leukemia", "lymphoma",
        ],
    ),
    (
        "Rheumatologist",
        &["rheumatoid arthritis", "lupus", "gout", "autoimmune", "joint swelling"],
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    triggers: Vec<String>,
}

impl Category {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized, de-duplicated, in declaration order.
    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }
}

/// Ordered category → trigger phrases mapping. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialistTaxonomy {
    categories: Vec<Category>,
}

/// On-disk shape of a taxonomy file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyDocument {
    #[serde(rename = "category", default)]
    pub categories: Vec<CategoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub name: String,
    pub triggers: Vec<String>,
}

impl SpecialistTaxonomy {
    pub fn new<I, N, T, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, T)>,
        N: AsRef<str>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut categories = Vec::new();
        let mut seen_names = HashSet::new();

        for (name, raw_triggers) in entries {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(MatchError::TaxonomyError {
                    message: "category name cannot be empty".to_string(),
                });
            }
            if !seen_names.insert(name.to_lowercase()) {
                return Err(MatchError::TaxonomyError {
                    message: format!("duplicate category '{}'", name),
                });
            }

            let mut seen_triggers = HashSet::new();
            let triggers: Vec<String> = raw_triggers
                .into_iter()
                .map(|t| normalize(t.as_ref()))
                .filter(|t| !t.is_empty())
                .filter(|t| seen_triggers.insert(t.clone()))
                .collect();

            if triggers.is_empty() {
                return Err(MatchError::TaxonomyError {
                    message: format!("category '{}' has no triggers", name),
                });
            }

            categories.push(Category {
                name: name.to_string(),
                triggers,
            });
        }

        if categories.is_empty() {
            return Err(MatchError::TaxonomyError {
                message: "taxonomy defines no categories".to_string(),
            });
        }

        Ok(Self { categories })
    }

    pub fn builtin() -> Self {
        let categories = BUILTIN_TAXONOMY
            .iter()
            .map(|(name, triggers)| Category {
                name: (*name).to_string(),
                triggers: triggers.iter().map(|t| normalize(t)).collect(),
            })
            .collect();
        Self { categories }
    }

    pub fn from_document(document: TaxonomyDocument) -> Result<Self> {
        Self::new(
            document
                .categories
                .into_iter()
                .map(|entry| (entry.name, entry.triggers)),
        )
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let document: TaxonomyDocument = toml::from_str(content)?;
        Self::from_document(document)
    }

    pub async fn load<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        let bytes = storage.read_file(path).await?;
        let content = String::from_utf8(bytes).map_err(|e| MatchError::TaxonomyError {
            message: format!("'{}' is not valid UTF-8: {}", path, e),
        })?;
        let taxonomy = Self::from_toml_str(&content)?;
        tracing::info!(
            "Loaded taxonomy with {} categories from {}",
            taxonomy.len(),
            path
        );
        Ok(taxonomy)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn contains(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for SpecialistTaxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}
