use crate::core::Storage;
use crate::domain::model::{DoctorRecord, LoadReport, RejectedRow, MAX_RATING, MIN_RATING};
use crate::utils::error::{MatchError, Result};
use std::io::Read;
use std::sync::{Arc, RwLock};

pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Name",
    "Specialist",
    "Experience",
    "Location",
    "Contact",
    "Rating",
];

/// In-memory doctor registry. Built once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoctorRegistry {
    records: Vec<DoctorRecord>,
}

/// Positions of the required columns inside a CSV header.
struct ColumnMap {
    name: usize,
    specialist: usize,
    experience: usize,
    location: usize,
    contact: usize,
    rating: usize,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord, source_name: &str) -> Result<Self> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(column))
        };

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| find(*column).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(MatchError::RegistryLoadError {
                source_name: source_name.to_string(),
                message: format!("missing required column(s): {}", missing.join(", ")),
            });
        }

        let index = |column: &str| find(column).unwrap_or_default();
        Ok(Self {
            name: index("Name"),
            specialist: index("Specialist"),
            experience: index("Experience"),
            location: index("Location"),
            contact: index("Contact"),
            rating: index("Rating"),
        })
    }

    fn parse_row(&self, row: &csv::StringRecord) -> std::result::Result<DoctorRecord, String> {
        let field = |idx: usize, column: &str| {
            row.get(idx)
                .map(str::trim)
                .ok_or_else(|| format!("missing value for '{}'", column))
        };

        let name = field(self.name, "Name")?;
        if name.is_empty() {
            return Err("'Name' is empty".to_string());
        }
        let specialist = field(self.specialist, "Specialist")?;
        if specialist.is_empty() {
            return Err("'Specialist' is empty".to_string());
        }

        Ok(DoctorRecord {
            name: name.to_string(),
            specialist: specialist.to_string(),
            experience_years: parse_experience(field(self.experience, "Experience")?)?,
            location: field(self.location, "Location")?.to_string(),
            contact: field(self.contact, "Contact")?.to_string(),
            rating: parse_rating(field(self.rating, "Rating")?)?,
        })
    }
}

/// Whole non-negative numbers only; `"5.0"` is accepted as 5.
fn parse_experience(raw: &str) -> std::result::Result<u32, String> {
    if let Ok(years) = raw.parse::<u32>() {
        return Ok(years);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 => {
            Ok(v as u32)
        }
        _ => Err(format!(
            "'Experience' must be a non-negative whole number, got '{}'",
            raw
        )),
    }
}

fn parse_rating(raw: &str) -> std::result::Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(v) if (MIN_RATING..=MAX_RATING).contains(&v) => Ok(v),
        _ => Err(format!(
            "'Rating' must be a number between {} and {}, got '{}'",
            MIN_RATING, MAX_RATING, raw
        )),
    }
}

impl DoctorRegistry {
    pub fn new(records: Vec<DoctorRecord>) -> Self {
        Self { records }
    }

    /// Parse a CSV registry. A bad header or a source without a single usable
    /// row fails the load; individually malformed rows are skipped and listed
    /// in the returned report.
    pub fn from_csv_reader<R: Read>(reader: R, source_name: &str) -> Result<(Self, LoadReport)> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| MatchError::RegistryLoadError {
                source_name: source_name.to_string(),
                message: format!("unreadable header: {}", e),
            })?
            .clone();
        let columns = ColumnMap::from_headers(&headers, source_name)?;

        let mut records = Vec::new();
        let mut report = LoadReport::default();

        for (idx, row) in csv_reader.records().enumerate() {
            let row_number = idx + 1;
            report.rows_read += 1;

            let parsed = row
                .map_err(|e| e.to_string())
                .and_then(|row| columns.parse_row(&row));

            match parsed {
                Ok(record) => records.push(record),
                Err(reason) => {
                    tracing::warn!(
                        "Skipping registry row {} in {}: {}",
                        row_number,
                        source_name,
                        reason
                    );
                    report.rejected.push(RejectedRow {
                        row: row_number,
                        reason,
                    });
                }
            }
        }

        report.rows_accepted = records.len();

        if records.is_empty() {
            return Err(MatchError::RegistryLoadError {
                source_name: source_name.to_string(),
                message: if report.rows_read == 0 {
                    "registry has no data rows".to_string()
                } else {
                    format!("all {} rows were rejected", report.rows_read)
                },
            });
        }

        Ok((Self { records }, report))
    }

    pub fn from_csv_str(content: &str, source_name: &str) -> Result<(Self, LoadReport)> {
        Self::from_csv_reader(content.as_bytes(), source_name)
    }

    pub async fn load<S: Storage>(storage: &S, path: &str) -> Result<(Self, LoadReport)> {
        let bytes = storage
            .read_file(path)
            .await
            .map_err(|e| MatchError::RegistryLoadError {
                source_name: path.to_string(),
                message: e.to_string(),
            })?;

        let (registry, report) = Self::from_csv_reader(bytes.as_slice(), path)?;
        tracing::info!(
            "Loaded {} doctors from {} ({} rows rejected)",
            report.rows_accepted,
            path,
            report.rejected.len()
        );
        Ok((registry, report))
    }

    pub fn records(&self) -> &[DoctorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Process-wide registry handle. Readers grab an `Arc` snapshot; a reload
/// swaps in a complete new snapshot, so a lookup never sees a half-built one.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    current: Arc<RwLock<Arc<DoctorRegistry>>>,
}

impl SharedRegistry {
    pub fn new(registry: DoctorRegistry) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(registry))),
        }
    }

    pub fn snapshot(&self) -> Arc<DoctorRegistry> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            // Writers only ever assign a whole Arc, so a poisoned value is intact.
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Returns the snapshot that was replaced.
    pub fn replace(&self, registry: DoctorRegistry) -> Arc<DoctorRegistry> {
        let fresh = Arc::new(registry);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *guard, fresh)
    }
}

impl From<DoctorRegistry> for SharedRegistry {
    fn from(registry: DoctorRegistry) -> Self {
        Self::new(registry)
    }
}
