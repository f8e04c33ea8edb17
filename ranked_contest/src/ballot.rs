use snafu::ensure;
use std::collections::HashSet;

use crate::config::*;

/// The identity of a ballot within a contest.
///
/// Two ballots with the same rankings are still two different ballots.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct BallotId(pub(crate) usize);

impl BallotId {
    /// Position of the ballot in the input of the contest.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The ranked choices of one voter. Immutable once built.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Ballot {
    // Candidate names in rank order: the first element holds rank 1.
    choices: Vec<String>,
}

impl Ballot {
    /// Builds a ballot out of the choices submitted by a voter.
    ///
    /// Fails if the ranks do not run from 1 without gaps, if a candidate is
    /// ranked twice, or if a name is not one of the declared candidates.
    /// `ballot_idx` is only used to report errors.
    pub fn new(
        ballot_idx: usize,
        raw: &RawBallot,
        candidates: &HashSet<String>,
    ) -> Result<Ballot, ContestError> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut choices: Vec<String> = Vec::with_capacity(raw.len());
        // The ranks of a RawBallot come out sorted.
        for (expected, (&found, name)) in (1..).zip(raw.iter()) {
            ensure!(
                found == expected,
                NonContiguousRanksSnafu {
                    ballot: ballot_idx,
                    expected,
                    found
                }
            );
            ensure!(
                candidates.contains(name),
                UnknownCandidateSnafu {
                    ballot: ballot_idx,
                    name: name.clone()
                }
            );
            ensure!(
                seen.insert(name.as_str()),
                DuplicateCandidateSnafu {
                    ballot: ballot_idx,
                    name: name.clone()
                }
            );
            choices.push(name.clone());
        }
        Ok(Ballot { choices })
    }

    /// The candidate this ballot supports: the highest ranked choice that is
    /// still active. `None` means the ballot is exhausted.
    pub fn get_vote(&self, active_candidates: &HashSet<String>) -> Option<&str> {
        self.choices
            .iter()
            .find(|name| active_candidates.contains(*name))
            .map(|name| name.as_str())
    }

    pub fn number_ranked(&self) -> usize {
        self.choices.len()
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(l: &[&str]) -> HashSet<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    fn raw(l: &[(Rank, &str)]) -> RawBallot {
        l.iter().map(|(r, s)| (*r, s.to_string())).collect()
    }

    #[test]
    fn vote_goes_to_highest_active_rank() {
        let candidates = names(&["A", "B", "C"]);
        let ballot = Ballot::new(0, &raw(&[(2, "B"), (1, "C"), (3, "A")]), &candidates).unwrap();
        assert_eq!(ballot.choices(), &["C", "B", "A"]);
        assert_eq!(ballot.get_vote(&candidates), Some("C"));
        assert_eq!(ballot.get_vote(&names(&["A", "B"])), Some("B"));
        assert_eq!(ballot.get_vote(&names(&["A"])), Some("A"));
        assert_eq!(ballot.number_ranked(), 3);
    }

    #[test]
    fn exhausted_ballot_has_no_vote() {
        let candidates = names(&["A", "B", "C"]);
        let ballot = Ballot::new(0, &raw(&[(1, "C")]), &candidates).unwrap();
        assert_eq!(ballot.get_vote(&names(&["A", "B"])), None);
        assert_eq!(ballot.get_vote(&HashSet::new()), None);
    }

    #[test]
    fn empty_ballot_is_accepted() {
        let ballot = Ballot::new(0, &RawBallot::new(), &names(&["A"])).unwrap();
        assert_eq!(ballot.number_ranked(), 0);
        assert_eq!(ballot.get_vote(&names(&["A"])), None);
    }

    #[test]
    fn rejects_gaps_in_ranks() {
        let res = Ballot::new(4, &raw(&[(1, "A"), (3, "B")]), &names(&["A", "B"]));
        assert_eq!(
            res,
            Err(ContestError::NonContiguousRanks {
                ballot: 4,
                expected: 2,
                found: 3
            })
        );
        let res = Ballot::new(0, &raw(&[(2, "A")]), &names(&["A"]));
        assert!(matches!(
            res,
            Err(ContestError::NonContiguousRanks { expected: 1, .. })
        ));
    }

    #[test]
    fn rejects_duplicates_and_unknown_names() {
        let candidates = names(&["A", "B"]);
        let res = Ballot::new(1, &raw(&[(1, "A"), (2, "A")]), &candidates);
        assert_eq!(
            res,
            Err(ContestError::DuplicateCandidate {
                ballot: 1,
                name: "A".to_string()
            })
        );
        let res = Ballot::new(2, &raw(&[(1, "A"), (2, "Z")]), &candidates);
        assert_eq!(
            res,
            Err(ContestError::UnknownCandidate {
                ballot: 2,
                name: "Z".to_string()
            })
        );
    }
}
