use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::info;

use crate::allocation::{Bank, BankId, Covenant, Facility, FacilityId, Loan, LoanId};
use crate::config::InputPaths;

/// Failure reading one of the input files. Any of these aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to open {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CSV data in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },
    #[error("{file} line {line}: {field} {reason}")]
    InvalidField {
        file: String,
        line: u64,
        field: &'static str,
        reason: String,
    },
    #[error("{file} line {line}: facility {id} is defined more than once")]
    DuplicateFacility {
        file: String,
        line: u64,
        id: FacilityId,
    },
}

#[derive(Debug, Deserialize)]
struct BankRow {
    id: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct FacilityRow {
    #[serde(deserialize_with = "decimal")]
    amount: Decimal,
    #[serde(deserialize_with = "decimal")]
    interest_rate: Decimal,
    id: u32,
    bank_id: u32,
}

#[derive(Debug, Deserialize)]
struct CovenantRow {
    #[serde(default)]
    facility_id: Option<u32>,
    #[serde(default, deserialize_with = "optional_decimal")]
    max_default_likelihood: Option<Decimal>,
    bank_id: u32,
    #[serde(default)]
    banned_state: String,
}

#[derive(Debug, Deserialize)]
struct LoanRow {
    #[serde(deserialize_with = "decimal")]
    interest_rate: Decimal,
    #[serde(deserialize_with = "decimal")]
    amount: Decimal,
    id: u32,
    #[serde(deserialize_with = "decimal")]
    default_likelihood: Decimal,
    state: String,
}

fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Decimal::from_str(raw.trim()).map_err(serde::de::Error::custom)
}

fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| Decimal::from_str(value.trim()).map_err(serde::de::Error::custom))
        .transpose()
}

fn banned_states(raw: &str) -> BTreeSet<String> {
    raw.split(|c: char| c.is_whitespace() || matches!(c, ';' | '|' | ','))
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads every data row of `reader` by column position, skipping the header.
/// Yields the 1-based line number with each row.
fn read_rows<R, T>(reader: R, file: &str) -> Result<Vec<(u64, T)>, LoadError>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|source| LoadError::Csv {
            file: file.to_string(),
            source,
        })?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let row = record
            .deserialize::<T>(None)
            .map_err(|source| LoadError::Csv {
                file: file.to_string(),
                source,
            })?;
        rows.push((line, row));
    }
    Ok(rows)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        file: path.display().to_string(),
        source,
    })
}

pub fn read_banks<R: Read>(reader: R, file: &str) -> Result<Vec<Bank>, LoadError> {
    Ok(read_rows::<_, BankRow>(reader, file)?
        .into_iter()
        .map(|(_, row)| Bank {
            id: BankId(row.id),
            name: row.name,
        })
        .collect())
}

/// Remaining capacity is always seeded from `amount`; duplicate ids are rejected.
pub fn read_facilities<R: Read>(reader: R, file: &str) -> Result<Vec<Facility>, LoadError> {
    let mut seen = HashSet::new();
    let mut facilities = Vec::new();

    for (line, row) in read_rows::<_, FacilityRow>(reader, file)? {
        let id = FacilityId(row.id);
        if !seen.insert(id) {
            return Err(LoadError::DuplicateFacility {
                file: file.to_string(),
                line,
                id,
            });
        }
        facilities.push(Facility::new(
            id,
            BankId(row.bank_id),
            row.amount,
            row.interest_rate,
        ));
    }

    Ok(facilities)
}

/// An empty or zero facility id makes the covenant general for its bank; an
/// empty tolerance means no limit.
pub fn read_covenants<R: Read>(reader: R, file: &str) -> Result<Vec<Covenant>, LoadError> {
    Ok(read_rows::<_, CovenantRow>(reader, file)?
        .into_iter()
        .map(|(_, row)| Covenant {
            bank_id: BankId(row.bank_id),
            facility_id: row.facility_id.filter(|id| *id != 0).map(FacilityId),
            default_tolerance: row.max_default_likelihood,
            banned_states: banned_states(&row.banned_state),
        })
        .collect())
}

/// Loans in file order, which is also the allocation order.
pub fn read_loans<R: Read>(reader: R, file: &str) -> Result<Vec<Loan>, LoadError> {
    let mut loans = Vec::new();

    for (line, row) in read_rows::<_, LoanRow>(reader, file)? {
        if row.default_likelihood < Decimal::ZERO || row.default_likelihood > Decimal::ONE {
            return Err(LoadError::InvalidField {
                file: file.to_string(),
                line,
                field: "default_likelihood",
                reason: format!("{} is outside [0, 1]", row.default_likelihood),
            });
        }
        loans.push(Loan {
            id: LoanId(row.id),
            state: row.state.trim().to_string(),
            amount: row.amount,
            rate: row.interest_rate,
            default_chance: row.default_likelihood,
        });
    }

    Ok(loans)
}

/// Everything one allocation run reads.
#[derive(Debug, Clone, Default)]
pub struct InputSet {
    pub banks: Vec<Bank>,
    pub facilities: Vec<Facility>,
    pub covenants: Vec<Covenant>,
    pub loans: Vec<Loan>,
}

impl InputSet {
    pub fn from_paths(paths: &InputPaths) -> Result<Self, LoadError> {
        let banks = read_banks(open(&paths.banks)?, &paths.banks.display().to_string())?;
        let facilities = read_facilities(
            open(&paths.facilities)?,
            &paths.facilities.display().to_string(),
        )?;
        let covenants = read_covenants(
            open(&paths.covenants)?,
            &paths.covenants.display().to_string(),
        )?;
        let loans = read_loans(open(&paths.loans)?, &paths.loans.display().to_string())?;

        info!(
            banks = banks.len(),
            facilities = facilities.len(),
            covenants = covenants.len(),
            loans = loans.len(),
            "inputs loaded"
        );

        Ok(Self {
            banks,
            facilities,
            covenants,
            loans,
        })
    }
}
