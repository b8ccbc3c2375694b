//! A CLI tool for checking a ledger snapshot and reporting its results.
//! Snapshots are the JSON form of `LedgerState`, as produced by `Ledger::snapshot`.

use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::BufReader;

use chrono::{DateTime, FixedOffset, Utc};
use clap::{Arg, ArgAction, ArgMatches, Command};

use election_ledger::{
    ledger::VerificationError,
    logging::{self, LOG_CONFIG_FILE},
    model::{common::ElectionId, results::ElectionResults},
    Clock, Config, Ledger, LedgerState, ManualClock, SystemClock,
};

const PROGRAM_NAME: &str = "verify-ledger";

const ABOUT_TEXT: &str = "Verify the consistency of an election ledger snapshot.

EXIT CODES:
     0: Verification succeeded.
   255: Ran successfully, but verification failed.
 Other: Error.";

const SNAPSHOT_PATH: &str = "SNAPSHOT_PATH";
const AT: &str = "at";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .arg(
            Arg::new(SNAPSHOT_PATH)
                .help("The path to a JSON ledger snapshot")
                .action(ArgAction::Set)
                .required(true),
        )
        .arg(
            Arg::new(AT)
                .long(AT)
                .help("Judge which elections have ended as of this RFC 3339 time, instead of now")
                .value_parser(DateTime::<FixedOffset>::parse_from_rfc3339),
        )
}

/// Errors that this program may produce.
#[derive(Debug, Eq, PartialEq)]
enum Error {
    /// IO error described by the inner message.
    IO(String),
    /// Failed to decode the JSON snapshot.
    Format(String),
    /// Verification failed due to the contained reason.
    Verification(VerificationError),
}

/// What the snapshot says about one election.
#[derive(Debug, Eq, PartialEq)]
struct ElectionReport {
    id: ElectionId,
    title: String,
    /// Absent while the election is still running.
    results: Option<ElectionResults>,
}

impl Display for ElectionReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Election {} \"{}\": ", self.id, self.title)?;
        let results = match &self.results {
            Some(results) => results,
            None => return write!(f, "results not available yet"),
        };
        write!(
            f,
            "{} vote{}{}",
            results.total_votes,
            if results.total_votes != 1 { "s" } else { "" },
            if results.finalized { " (finalized)" } else { "" }
        )?;
        for tally in &results.tallies {
            write!(
                f,
                "\n  {}: {} vote{}",
                tally.name,
                tally.vote_count,
                if tally.vote_count != 1 { "s" } else { "" }
            )?;
        }
        Ok(())
    }
}

/// Run verification.
fn verify(path: &str, at: DateTime<Utc>) -> Result<Vec<ElectionReport>, Error> {
    // Load the file.
    let file = BufReader::new(File::open(path).map_err(|e| Error::IO(e.to_string()))?);
    let state: LedgerState =
        serde_json::from_reader(file).map_err(|e| Error::Format(e.to_string()))?;

    // Rebuilding the ledger runs the full consistency check.
    let config = Config::new(state.access.admin().clone());
    let ledger =
        Ledger::restore(state, &config, ManualClock::new(at)).map_err(Error::Verification)?;

    Ok(ledger
        .elections()
        .into_iter()
        .map(|summary| ElectionReport {
            id: summary.id,
            results: ledger.results(summary.id).ok(),
            title: summary.title,
        })
        .collect())
}

/// Run verification, report the result, and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    let path: &String = args.get_one(SNAPSHOT_PATH).unwrap(); // Required argument is guaranteed to be present.
    let at = args
        .get_one::<DateTime<FixedOffset>>(AT)
        .map(|at| at.with_timezone(&Utc))
        .unwrap_or_else(|| SystemClock.now());

    match verify(path, at) {
        Ok(reports) => {
            println!("Verification succeeded.");
            for report in reports {
                println!("{}", report);
            }
            0
        }
        Err(Error::IO(msg)) => {
            println!("IO error: {}", msg);
            1
        }
        Err(Error::Format(msg)) => {
            println!("Invalid JSON: {}", msg);
            1
        }
        Err(Error::Verification(err)) => {
            println!("Verification failed: {}.", err);
            255
        }
    }
}

fn main() {
    if let Err(err) = logging::init_logging(LOG_CONFIG_FILE) {
        eprintln!("Failed to initialise logging: {err}");
    }
    let args = cli().get_matches();
    let exit_code = run(&args);
    std::process::exit(exit_code.into())
}
