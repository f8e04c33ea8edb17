use log::{debug, info, warn};

use ranked_contest::builder::Builder;
use ranked_contest::*;
use snafu::{prelude::*, Snafu};

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;

use crate::args::Args;
use crate::rcv::config_reader::*;
use crate::rcv::io_common::TabularSource;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum RcvError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Excel file {path} has no worksheet {worksheet}"))]
    MissingWorksheet { path: String, worksheet: String },
    #[snafu(display("Unexpected cell at line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Unknown input type {input_type:?} (expected json, csv or xlsx)"))]
    UnknownInputType { input_type: String },
    #[snafu(display("The ballots could not be tabulated"))]
    Tabulation { source: ContestError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type RcvResult<T> = Result<T, RcvError>;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Json,
    Csv,
    Excel,
}

impl InputType {
    pub fn parse(input_type: &str) -> RcvResult<InputType> {
        match input_type {
            "json" => Ok(InputType::Json),
            "csv" => Ok(InputType::Csv),
            "xlsx" | "excel" => Ok(InputType::Excel),
            x => UnknownInputTypeSnafu { input_type: x }.fail(),
        }
    }

    /// Guesses the type of a file from its extension.
    pub fn from_path(path: &str) -> InputType {
        match Path::new(path).extension().and_then(|e| e.to_str()) {
            Some("csv") => InputType::Csv,
            Some("xlsx") => InputType::Excel,
            _ => InputType::Json,
        }
    }
}

/// Everything needed to tabulate a poll, whatever the input format.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Poll {
    pub question: Option<String>,
    /// If not provided, the candidates are inferred from the ballots.
    pub candidates: Option<Vec<String>>,
    pub ballots: Vec<RawBallot>,
    pub rules: TabulationRules,
}

fn read_poll(args: &Args) -> RcvResult<Poll> {
    let input_type = match &args.input_type {
        Some(s) => InputType::parse(s)?,
        None => InputType::from_path(&args.input),
    };
    info!("Attempting to read {:?} poll {:?}", input_type, args.input);

    let source = TabularSource {
        // The columns are numbered from 1 on the command line.
        first_vote_column: args.first_vote_column.unwrap_or(1).saturating_sub(1),
        has_header: !args.no_header,
        worksheet_name: args.excel_worksheet_name.clone(),
    };

    let mut poll = match input_type {
        InputType::Json => {
            let pf = read_poll_file(&args.input)?;
            Poll {
                question: pf.question,
                candidates: Some(pf.options),
                ballots: pf.ballots,
                rules: validate_rules(pf.rules.as_ref())?,
            }
        }
        InputType::Csv => Poll {
            question: None,
            candidates: None,
            ballots: io_csv::read_csv_ranking(&args.input, &source)?,
            rules: TabulationRules::DEFAULT_RULES,
        },
        InputType::Excel => Poll {
            question: None,
            candidates: None,
            ballots: io_excel::read_excel_ranking(&args.input, &source)?,
            rules: TabulationRules::DEFAULT_RULES,
        },
    };

    // The command line has the last word.
    if args.question.is_some() {
        poll.question = args.question.clone();
    }
    if args.candidates.is_some() {
        poll.candidates = args.candidates.clone();
    }
    if let Some(s) = &args.sole_survivor {
        poll.rules.sole_survivor = parse_sole_survivor(s)?;
    }
    Ok(poll)
}

/// Keeps the ballots that can be counted and reports the others.
///
/// A ballot is dropped if it is blank, if its ranks do not run from 1 without
/// gaps, or if it ranks a candidate twice or ranks an unknown candidate.
fn validate_ballots(ballots: &[RawBallot], candidates: Option<&[String]>) -> Vec<RawBallot> {
    let candidate_names: HashSet<String> = match candidates {
        Some(cands) => cands.iter().cloned().collect(),
        None => ballots.iter().flat_map(|b| b.values().cloned()).collect(),
    };
    let mut res: Vec<RawBallot> = Vec::new();
    for (idx, ballot) in ballots.iter().enumerate() {
        if ballot.is_empty() {
            warn!("validate_ballots: skipping blank ballot {}", idx);
            continue;
        }
        match Ballot::new(idx, ballot, &candidate_names) {
            Ok(_) => res.push(ballot.clone()),
            Err(e) => warn!("validate_ballots: skipping invalid ballot: {}", e),
        }
    }
    debug!(
        "validate_ballots: kept {} ballots out of {}",
        res.len(),
        ballots.len()
    );
    res
}

fn tabulate(poll: &Poll) -> RcvResult<ContestResult> {
    let mut builder = Builder::new(&poll.rules);
    if let Some(cands) = &poll.candidates {
        builder = builder.candidates(cands);
    }
    for ballot in validate_ballots(&poll.ballots, poll.candidates.as_deref()) {
        builder.add_ballot(ballot);
    }
    info!(
        "Tabulating {} ballots, candidates: {:?}",
        builder.num_ballots(),
        builder.candidate_names()
    );
    builder.run().context(TabulationSnafu {})
}

fn round_to_json(distribution: &VoteDistribution) -> JSValue {
    let mut tally: JSMap<String, JSValue> = JSMap::new();
    for (name, count) in distribution.iter() {
        tally.insert(name.to_string(), json!(count));
    }
    JSValue::Object(tally)
}

fn build_summary_js(question: Option<&str>, result: &ContestResult) -> JSValue {
    let rounds: Vec<JSValue> = result.rounds.iter().map(round_to_json).collect();
    json!({
        "question": question,
        "winner": result.outcome.winner(),
        "rounds": rounds
    })
}

fn write_summary(out: Option<&str>, pretty_js: &str) -> RcvResult<()> {
    match out {
        None | Some("") | Some("stdout") => {
            println!("{}", pretty_js);
            Ok(())
        }
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, pretty_js).context(WritingFileSnafu { path })
        }
    }
}

fn check_reference(reference_path: &str, pretty_js_stats: &str) -> RcvResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    Ok(())
}

pub fn run_poll(args: &Args) -> RcvResult<()> {
    let poll = read_poll(args)?;
    let result = tabulate(&poll)?;
    info!("Winner: {}", result.outcome);

    let result_js = build_summary_js(poll.question.as_deref(), &result);
    let pretty_js_stats =
        serde_json::to_string_pretty(&result_js).context(SerializingJsonSnafu {})?;
    write_summary(args.out.as_deref(), &pretty_js_stats)?;

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &pretty_js_stats)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> String {
        let p: PathBuf = std::env::temp_dir().join(format!(
            "rcvpoll-test-{}-{}",
            std::process::id(),
            name
        ));
        fs::write(&p, contents).unwrap();
        p.display().to_string()
    }

    fn raw(l: &[(Rank, &str)]) -> RawBallot {
        l.iter().map(|(r, s)| (*r, s.to_string())).collect()
    }

    const MAJORITY_POLL: &str = r#"{
        "question": "Best letter?",
        "options": ["A", "B", "C"],
        "ballots": [
            {"1": "A"}, {"1": "A"}, {"1": "A"}, {"1": "A"}, {"1": "A"},
            {"1": "B"}, {"1": "B"}, {"1": "B"},
            {"1": "C", "2": "B"}, {"1": "C", "2": "B"}
        ]
    }"#;

    #[test]
    fn summary_shape() {
        let pf = parse_poll(MAJORITY_POLL, "inline").unwrap();
        let poll = Poll {
            question: pf.question,
            candidates: Some(pf.options),
            ballots: pf.ballots,
            rules: validate_rules(pf.rules.as_ref()).unwrap(),
        };
        let result = tabulate(&poll).unwrap();
        let js = build_summary_js(poll.question.as_deref(), &result);
        assert_eq!(
            js,
            json!({
                "question": "Best letter?",
                "winner": "A",
                "rounds": [
                    {"A": 5, "B": 3, "C": 2},
                    {"A": 5, "B": 5}
                ]
            })
        );
    }

    #[test]
    fn rounds_keep_candidate_order() {
        let result = ContestResult {
            outcome: Outcome::Winner("Zed".to_string()),
            rounds: vec![VoteDistribution {
                tally: vec![("Zed".to_string(), 2), ("Amy".to_string(), 1)],
            }],
        };
        let js = serde_json::to_string(&build_summary_js(Some("Who?"), &result)).unwrap();
        assert_eq!(
            js,
            r#"{"question":"Who?","winner":"Zed","rounds":[{"Zed":2,"Amy":1}]}"#
        );
    }

    #[test]
    fn empty_out_goes_to_stdout() {
        assert!(write_summary(Some(""), "{}").is_ok());
        assert!(write_summary(Some("stdout"), "{}").is_ok());
        assert!(matches!(
            write_summary(Some("/nonexistent/rcvpoll/out.json"), "{}"),
            Err(RcvError::WritingFile { .. })
        ));
    }

    #[test]
    fn duplicate_candidates_are_an_error() {
        let input = temp_file("duplicates.json", MAJORITY_POLL);
        let args = Args::parse_from([
            "rcvpoll",
            "-i",
            input.as_str(),
            "--candidates",
            "A",
            "--candidates",
            "A",
            "--candidates",
            "B",
        ]);
        assert!(matches!(
            run_poll(&args),
            Err(RcvError::Tabulation {
                source: ContestError::DuplicateOption { .. }
            })
        ));
    }

    #[test]
    fn summary_without_winner() {
        let result = ContestResult {
            outcome: Outcome::NoWinner,
            rounds: vec![VoteDistribution {
                tally: vec![("A".to_string(), 1), ("B".to_string(), 1)],
            }],
        };
        let js = build_summary_js(None, &result);
        assert_eq!(js["winner"], JSValue::Null);
        assert_eq!(js["question"], JSValue::Null);
        assert_eq!(js["rounds"][0]["B"], json!(1));
    }

    #[test]
    fn invalid_ballots_are_dropped() {
        let cands: Vec<String> = vec!["A".to_string(), "B".to_string()];
        let ballots = vec![
            raw(&[(1, "A"), (2, "B")]),
            RawBallot::new(),
            raw(&[(1, "A"), (3, "B")]),
            raw(&[(1, "B"), (2, "B")]),
            raw(&[(1, "Z")]),
            raw(&[(1, "B")]),
        ];
        let kept = validate_ballots(&ballots, Some(cands.as_slice()));
        assert_eq!(kept, vec![ballots[0].clone(), ballots[5].clone()]);
        // Without declared candidates, any name is accepted.
        let kept = validate_ballots(&ballots, None);
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn input_types() {
        assert_eq!(InputType::from_path("poll.csv"), InputType::Csv);
        assert_eq!(InputType::from_path("/tmp/poll.xlsx"), InputType::Excel);
        assert_eq!(InputType::from_path("poll.json"), InputType::Json);
        assert_eq!(InputType::from_path("poll"), InputType::Json);
        assert_eq!(InputType::parse("excel").unwrap(), InputType::Excel);
        assert!(matches!(
            InputType::parse("dominion"),
            Err(RcvError::UnknownInputType { .. })
        ));
    }

    #[test]
    fn run_json_poll_with_reference() {
        let input = temp_file("majority.json", MAJORITY_POLL);
        let out = temp_file("majority-out.json", "");
        let args = Args::parse_from(["rcvpoll", "-i", input.as_str(), "-o", out.as_str()]);
        run_poll(&args).unwrap();

        let written: JSValue = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["winner"], json!("A"));

        // The output is a valid reference for the same poll.
        let args = Args::parse_from([
            "rcvpoll",
            "-i",
            input.as_str(),
            "-o",
            out.as_str(),
            "-r",
            out.as_str(),
        ]);
        run_poll(&args).unwrap();

        let wrong_ref = temp_file(
            "majority-wrong-ref.json",
            r#"{"question": "Best letter?", "winner": "B", "rounds": []}"#,
        );
        let args = Args::parse_from([
            "rcvpoll",
            "-i",
            input.as_str(),
            "-o",
            out.as_str(),
            "-r",
            wrong_ref.as_str(),
        ]);
        assert!(matches!(run_poll(&args), Err(RcvError::Whatever { .. })));
    }

    #[test]
    fn command_line_overrides() {
        let input = temp_file("override.csv", "rank 1,rank 2\nA,B\nB,\nC,A\n");
        let args = Args::parse_from([
            "rcvpoll",
            "-i",
            input.as_str(),
            "--question",
            "Which one?",
            "--candidates",
            "C",
            "--candidates",
            "B",
            "--candidates",
            "A",
            "--sole-survivor",
            "eliminate",
        ]);
        let poll = read_poll(&args).unwrap();
        assert_eq!(poll.question.as_deref(), Some("Which one?"));
        assert_eq!(
            poll.candidates,
            Some(vec!["C".to_string(), "B".to_string(), "A".to_string()])
        );
        assert_eq!(poll.rules.sole_survivor, SoleSurvivorRule::Eliminate);
        assert_eq!(poll.ballots.len(), 3);

        let result = tabulate(&poll).unwrap();
        // All three tie in the first round.
        assert_eq!(result.outcome, Outcome::NoWinner);
        assert_eq!(result.rounds[0].tally[0], ("C".to_string(), 1));
    }

    #[test]
    fn missing_input_file() {
        let args = Args::parse_from(["rcvpoll", "-i", "/nonexistent/rcvpoll/poll.json"]);
        assert!(matches!(
            run_poll(&args),
            Err(RcvError::OpeningFile { .. })
        ));
    }
}
