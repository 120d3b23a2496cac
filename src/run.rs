use std::time::Instant;

use tracing::info;

use crate::allocation::report::{assignments, yields};
use crate::allocation::{AllocationSummary, Allocator, AssignmentRow, EntityStore, YieldRow};
use crate::config::DataConfig;
use crate::error::AppError;
use crate::records::{write_outputs, InputSet};

/// Everything produced by one allocation pass, ready to be written.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub assignments: Vec<AssignmentRow>,
    pub yields: Vec<YieldRow>,
    pub summary: AllocationSummary,
}

/// Builds the store from `inputs` and allocates every loan in input order.
pub fn allocate(inputs: InputSet) -> RunOutcome {
    let InputSet {
        banks,
        facilities,
        covenants,
        loans,
    } = inputs;

    let store = EntityStore::build(banks, facilities, covenants);
    let mut allocator = Allocator::new(store);
    allocator.allocate_all(loans);
    let (store, decisions) = allocator.finish();

    RunOutcome {
        assignments: assignments(&decisions),
        yields: yields(&store),
        summary: AllocationSummary::build(&store, &decisions),
    }
}

/// Loads the inputs, allocates, then writes both output files.
///
/// Nothing is written unless every input file loads cleanly.
pub fn execute(data: &DataConfig) -> Result<RunOutcome, AppError> {
    let input_paths = data.input_paths()?;
    let output_paths = data.output_paths()?;
    let started = Instant::now();

    let inputs = InputSet::from_paths(&input_paths)?;
    let outcome = allocate(inputs);
    write_outputs(&output_paths, &outcome.assignments, &outcome.yields)?;

    info!(
        loans = outcome.summary.loans_processed,
        assigned = outcome.summary.loans_assigned,
        unassigned = outcome.summary.loans_unassigned,
        total_expected_yield = ?outcome.summary.total_expected_yield,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "allocation run complete"
    );

    Ok(outcome)
}
