// ********* Input data structures ***********

use snafu::Snafu;
use std::collections::BTreeMap;
use std::fmt::Display;

/// The position of a choice on a ballot. The first choice has rank 1.
pub type Rank = u32;

/// A ballot as submitted by a voter: the name of the candidate chosen at each rank.
///
/// Ranks are expected to start at 1 and to be contiguous, and a candidate should
/// appear at most once. These properties are checked when the contest is built.
pub type RawBallot = BTreeMap<Rank, String>;

// ******** Output data structures *********

/// The number of votes of each candidate in one round.
///
/// The candidates are listed in the order in which they were declared.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct VoteDistribution {
    pub tally: Vec<(String, u64)>,
}

impl VoteDistribution {
    /// The number of votes of a candidate, if this candidate took part in the round.
    pub fn get(&self, candidate: &str) -> Option<u64> {
        self.tally
            .iter()
            .find(|(name, _)| name == candidate)
            .map(|(_, count)| *count)
    }

    pub fn total(&self) -> u64 {
        self.tally.iter().map(|(_, count)| *count).sum()
    }

    pub fn len(&self) -> usize {
        self.tally.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tally.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.tally.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

/// The final outcome of a contest.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Outcome {
    Winner(String),
    /// The candidates leading the last round could not be separated, even by
    /// looking back all the way to the first round.
    NoWinner,
}

impl Outcome {
    pub fn winner(&self) -> Option<&str> {
        match self {
            Outcome::Winner(name) => Some(name.as_str()),
            Outcome::NoWinner => None,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(name) => write!(f, "{}", name),
            Outcome::NoWinner => write!(f, "It's a tie! No winner!"),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ContestResult {
    pub outcome: Outcome,
    /// One entry per round, in the order the rounds were run.
    pub rounds: Vec<VoteDistribution>,
}

/// Candidates or ballots that break the input contract of the contest.
///
/// The ballot index refers to the position of the ballot in the input.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ContestError {
    #[snafu(display("ballot {ballot}: expected rank {expected} but found rank {found}"))]
    NonContiguousRanks {
        ballot: usize,
        expected: Rank,
        found: Rank,
    },
    #[snafu(display("ballot {ballot}: candidate {name:?} is ranked more than once"))]
    DuplicateCandidate { ballot: usize, name: String },
    #[snafu(display("ballot {ballot}: {name:?} is not a candidate of this contest"))]
    UnknownCandidate { ballot: usize, name: String },
    #[snafu(display("candidate {name:?} is declared more than once"))]
    DuplicateOption { name: String },
}

// ********* Configuration **********

/// What to do when a single candidate is left running.
///
/// With the minimum-threshold elimination rule, a lone candidate always sits at
/// the threshold and would be eliminated on the next pass.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SoleSurvivorRule {
    /// The remaining candidate stays active and the count stops.
    DeclareWinner,
    /// The remaining candidate is eliminated like any other candidate at the
    /// threshold, which leaves no active candidate.
    Eliminate,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TabulationRules {
    pub sole_survivor: SoleSurvivorRule,
}

impl TabulationRules {
    pub const DEFAULT_RULES: TabulationRules = TabulationRules {
        sole_survivor: SoleSurvivorRule::DeclareWinner,
    };
}

impl Default for TabulationRules {
    fn default() -> Self {
        TabulationRules::DEFAULT_RULES
    }
}
