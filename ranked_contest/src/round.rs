use log::debug;

use crate::config::VoteDistribution;
use crate::pile::Pile;

/// A frozen snapshot of the vote counts of the running candidates.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Round {
    distribution: VoteDistribution,
}

impl Round {
    /// Counts the ballots of exactly the piles given, in the order given.
    /// Later changes to the piles do not affect the round.
    pub fn new<'a, I: IntoIterator<Item = &'a Pile>>(piles: I) -> Round {
        let tally: Vec<(String, u64)> = piles
            .into_iter()
            .map(|pile| (pile.name().to_string(), pile.total_ballots()))
            .collect();
        Round {
            distribution: VoteDistribution { tally },
        }
    }

    pub fn vote_distribution(&self) -> &VoteDistribution {
        &self.distribution
    }

    /// The votes of a candidate. Candidates that are not part of the round have none.
    pub fn votes(&self, candidate: &str) -> u64 {
        self.distribution.get(candidate).unwrap_or(0)
    }

    pub fn total_votes(&self) -> u64 {
        self.distribution.total()
    }

    /// Number of candidates counted in this round.
    pub fn len(&self) -> usize {
        self.distribution.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distribution.is_empty()
    }

    /// The candidates strictly above the lowest count of the round.
    ///
    /// Every candidate at the lowest count is eliminated at once, so this is
    /// empty when all the candidates are tied.
    pub fn non_eliminated_candidates(&self) -> Vec<String> {
        let threshold = match self.distribution.iter().map(|(_, count)| count).min() {
            Some(threshold) => threshold,
            None => return Vec::new(),
        };
        let survivors: Vec<String> = self
            .distribution
            .iter()
            .filter(|(_, count)| *count > threshold)
            .map(|(name, _)| name.to_string())
            .collect();
        debug!(
            "non_eliminated_candidates: threshold: {:?} survivors: {:?}",
            threshold, survivors
        );
        survivors
    }

    /// Among the given candidates, the ones with the most votes in this round.
    /// Ties are all kept, in the order of `candidates`.
    pub fn find_top_candidates(&self, candidates: &[String]) -> Vec<String> {
        let max_votes = match candidates.iter().map(|c| self.votes(c)).max() {
            Some(max_votes) => max_votes,
            None => return Vec::new(),
        };
        candidates
            .iter()
            .filter(|c| self.votes(c) == max_votes)
            .cloned()
            .collect()
    }
}
