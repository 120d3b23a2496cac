//! CSV adapters for the allocation run: four input files in, two output files out.

pub mod input;
pub mod output;

pub use input::{read_banks, read_covenants, read_facilities, read_loans, InputSet, LoadError};
pub use output::{write_assignments, write_outputs, write_yields, WriteError};
