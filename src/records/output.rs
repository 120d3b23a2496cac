use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::allocation::{AssignmentRow, YieldRow};
use crate::config::OutputPaths;

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to create {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },
}

/// Writes `loan_id,facility_id`; unassigned loans get an empty facility id.
pub fn write_assignments<W: Write>(
    writer: W,
    rows: &[AssignmentRow],
    file: &str,
) -> Result<(), WriteError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let wrap = |source| WriteError::Csv {
        file: file.to_string(),
        source,
    };

    csv_writer
        .write_record(["loan_id", "facility_id"])
        .map_err(wrap)?;
    for row in rows {
        let facility = row
            .facility_id
            .map(|id| id.to_string())
            .unwrap_or_default();
        csv_writer
            .write_record([row.loan_id.to_string(), facility])
            .map_err(wrap)?;
    }
    csv_writer.flush().map_err(|source| WriteError::Io {
        file: file.to_string(),
        source,
    })
}

/// Writes `facility_id,expected_yield` as whole currency units.
pub fn write_yields<W: Write>(writer: W, rows: &[YieldRow], file: &str) -> Result<(), WriteError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let wrap = |source| WriteError::Csv {
        file: file.to_string(),
        source,
    };

    csv_writer
        .write_record(["facility_id", "expected_yield"])
        .map_err(wrap)?;
    for row in rows {
        csv_writer
            .write_record([row.facility_id.to_string(), row.expected_yield.to_string()])
            .map_err(wrap)?;
    }
    csv_writer.flush().map_err(|source| WriteError::Io {
        file: file.to_string(),
        source,
    })
}

fn io_error(path: &Path, source: std::io::Error) -> WriteError {
    WriteError::Io {
        file: path.display().to_string(),
        source,
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn stage(path: &Path, contents: &[u8]) -> Result<PathBuf, WriteError> {
    let staged = staging_path(path);
    fs::write(&staged, contents).map_err(|source| io_error(&staged, source))?;
    Ok(staged)
}

fn publish(staged: &Path, path: &Path) -> Result<(), WriteError> {
    fs::rename(staged, path).map_err(|source| {
        let _ = fs::remove_file(staged);
        io_error(path, source)
    })
}

/// Writes both output files. Called only after every loan has been decided.
///
/// Both files are rendered and staged next to their targets before either is
/// renamed into place, so a file that cannot be created leaves no output.
pub fn write_outputs(
    paths: &OutputPaths,
    assignments: &[AssignmentRow],
    yields: &[YieldRow],
) -> Result<(), WriteError> {
    let mut assignment_bytes = Vec::new();
    write_assignments(
        &mut assignment_bytes,
        assignments,
        &paths.assignments.display().to_string(),
    )?;
    let mut yield_bytes = Vec::new();
    write_yields(&mut yield_bytes, yields, &paths.yields.display().to_string())?;

    let staged_assignments = stage(&paths.assignments, &assignment_bytes)?;
    let staged_yields = match stage(&paths.yields, &yield_bytes) {
        Ok(staged) => staged,
        Err(err) => {
            let _ = fs::remove_file(&staged_assignments);
            return Err(err);
        }
    };
    if let Err(err) = publish(&staged_assignments, &paths.assignments) {
        let _ = fs::remove_file(&staged_yields);
        return Err(err);
    }
    publish(&staged_yields, &paths.yields)?;

    info!(
        assignments = %paths.assignments.display(),
        yields = %paths.yields.display(),
        "outputs written"
    );
    Ok(())
}
