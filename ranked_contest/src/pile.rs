use std::collections::HashSet;
use std::fmt::Display;
use std::iter::Copied;
use std::slice::Iter;

use crate::ballot::BallotId;

/// Who a pile of ballots belongs to.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub enum PileName {
    Candidate(String),
    /// The pile holding every ballot before the first distribution.
    Unassigned,
}

impl Display for PileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PileName::Candidate(name) => write!(f, "{}", name),
            PileName::Unassigned => write!(f, "(unassigned)"),
        }
    }
}

/// The ballots collected by one candidate over the course of a contest.
///
/// A pile only grows: ballots are never removed from it, and adding a ballot
/// that is already present does nothing. Ballots are compared by identity.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Pile {
    name: PileName,
    // Insertion order.
    ballots: Vec<BallotId>,
    members: HashSet<BallotId>,
}

impl Pile {
    pub fn new(name: PileName) -> Pile {
        Pile {
            name,
            ballots: Vec::new(),
            members: HashSet::new(),
        }
    }

    pub fn for_candidate(candidate: &str) -> Pile {
        Pile::new(PileName::Candidate(candidate.to_string()))
    }

    pub fn unassigned() -> Pile {
        Pile::new(PileName::Unassigned)
    }

    pub fn name(&self) -> &PileName {
        &self.name
    }

    /// The candidate owning this pile, or `None` for the unassigned pile.
    pub fn candidate(&self) -> Option<&str> {
        match &self.name {
            PileName::Candidate(name) => Some(name.as_str()),
            PileName::Unassigned => None,
        }
    }

    /// Adds a ballot to the pile. Returns false if the ballot was already there.
    pub fn add_ballot(&mut self, ballot: BallotId) -> bool {
        if self.members.insert(ballot) {
            self.ballots.push(ballot);
            true
        } else {
            false
        }
    }

    /// Adds the ballots in order. Returns how many of them were new to the pile.
    pub fn add_ballots<I: IntoIterator<Item = BallotId>>(&mut self, ballots: I) -> usize {
        ballots
            .into_iter()
            .filter(|ballot| self.add_ballot(*ballot))
            .count()
    }

    /// The number of distinct ballots ever added to this pile.
    pub fn total_ballots(&self) -> u64 {
        self.ballots.len() as u64
    }

    pub fn contains(&self, ballot: BallotId) -> bool {
        self.members.contains(&ballot)
    }

    /// The ballots in the order they were added.
    pub fn iter(&self) -> Copied<Iter<'_, BallotId>> {
        self.ballots.iter().copied()
    }
}

impl<'a> IntoIterator for &'a Pile {
    type Item = BallotId;
    type IntoIter = Copied<Iter<'a, BallotId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
