use crate::allocation::{EntityStore, FacilityRanking};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::records::InputSet;
use crate::run::execute;
use crate::telemetry;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "loan-allocator",
    about = "Assign loans to bank facilities and report expected yields",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Allocate loans.csv and write assignments.csv and yields.csv (default command)
    Allocate(AllocateArgs),
    /// Print the facility cost ranking used by the allocator
    Rank(RankArgs),
}

#[derive(Args, Debug, Default)]
struct AllocateArgs {
    /// Override the configured input directory
    #[arg(long)]
    input_dir: Option<PathBuf>,
    /// Override the configured output directory
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Print a JSON run summary to stdout
    #[arg(long)]
    summary: bool,
}

#[derive(Args, Debug)]
struct RankArgs {
    /// Override the configured input directory
    #[arg(long)]
    input_dir: Option<PathBuf>,
}

pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Allocate(AllocateArgs::default()));

    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match command {
        Command::Allocate(args) => {
            if let Some(dir) = args.input_dir {
                config.data.input_dir = dir;
            }
            if let Some(dir) = args.output_dir {
                config.data.output_dir = dir;
            }
            info!(
                ?config.environment,
                input_dir = %config.data.input_dir.display(),
                output_dir = %config.data.output_dir.display(),
                "starting allocation run"
            );

            let outcome = execute(&config.data)?;
            if args.summary {
                println!("{}", serde_json::to_string_pretty(&outcome.summary)?);
            }
            Ok(())
        }
        Command::Rank(args) => {
            if let Some(dir) = args.input_dir {
                config.data.input_dir = dir;
            }
            render_ranking(&InputSet::from_paths(&config.data.input_paths()?)?);
            Ok(())
        }
    }
}

fn render_ranking(inputs: &InputSet) {
    let store = EntityStore::build(
        inputs.banks.iter().cloned(),
        inputs.facilities.iter().cloned(),
        inputs.covenants.iter().cloned(),
    );
    let ranking = FacilityRanking::from_facilities(store.facilities());

    println!("Facility ranking ({} facilities)", ranking.len());
    for (position, id) in ranking.ids().iter().enumerate() {
        let Some(facility) = store.facility(*id) else {
            continue;
        };
        let bank = store
            .bank(facility.bank_id)
            .map(|bank| bank.name.as_str())
            .unwrap_or("unknown bank");
        println!(
            "{:>3}. facility {} | {} | cost {} | capacity {} | {} specific, {} general covenant(s)",
            position + 1,
            facility.id,
            bank,
            facility.cost_rate,
            facility.capacity,
            store.specific_covenants(facility.id).len(),
            store.general_covenants(facility.bank_id).len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_is_the_default_command() {
        let cli = Cli::try_parse_from(["loan-allocator"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn allocate_accepts_directory_overrides() {
        let cli = Cli::try_parse_from([
            "loan-allocator",
            "allocate",
            "--input-dir",
            "data/sample",
            "--output-dir",
            "out",
            "--summary",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Allocate(args)) => {
                assert_eq!(args.input_dir, Some(PathBuf::from("data/sample")));
                assert_eq!(args.output_dir, Some(PathBuf::from("out")));
                assert!(args.summary);
            }
            other => panic!("expected allocate command, got {other:?}"),
        }
    }

    #[test]
    fn rank_takes_only_an_input_directory() {
        assert!(Cli::try_parse_from(["loan-allocator", "rank", "--output-dir", "out"]).is_err());
    }
}
