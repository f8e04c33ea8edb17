pub use crate::config::*;
use crate::contest::Contest;

/// A builder for assembling the candidates and the ballots of a contest.
///
/// ```
/// use ranked_contest::builder::Builder;
/// use ranked_contest::{Outcome, TabulationRules};
/// # use ranked_contest::ContestError;
///
/// let mut builder = Builder::new(&TabulationRules::DEFAULT_RULES)
///     .candidates(&["Anna".to_string(), "Bob".to_string()]);
///
/// builder.add_ranking(&["Anna".to_string(), "Bob".to_string()]);
/// builder.add_ranking(&["Bob".to_string()]);
/// builder.add_ranking(&["Anna".to_string()]);
///
/// let result = builder.run()?;
/// assert_eq!(result.outcome, Outcome::Winner("Anna".to_string()));
///
/// # Ok::<(), ContestError>(())
/// ```
pub struct Builder {
    pub(crate) _rules: TabulationRules,
    pub(crate) _candidates: Option<Vec<String>>,
    pub(crate) _ballots: Vec<RawBallot>,
}

impl Builder {
    pub fn new(rules: &TabulationRules) -> Builder {
        Builder {
            _rules: rules.clone(),
            _candidates: None,
            _ballots: Vec::new(),
        }
    }

    /// Declares the candidates, in order. The order is used for reporting.
    pub fn candidates(self, cands: &[String]) -> Builder {
        Builder {
            _rules: self._rules,
            _candidates: Some(cands.to_vec()),
            _ballots: self._ballots,
        }
    }

    /// Adds a ballot given as an ordered list of choices: the first element
    /// gets rank 1, and so on.
    pub fn add_ranking(&mut self, choices: &[String]) {
        let ballot: RawBallot = choices
            .iter()
            .enumerate()
            .map(|(idx, name)| ((idx + 1) as Rank, name.clone()))
            .collect();
        self.add_ballot(ballot);
    }

    /// Adds a ballot given as a mapping from rank to candidate.
    pub fn add_ballot(&mut self, ballot: RawBallot) {
        self._ballots.push(ballot);
    }

    pub fn num_ballots(&self) -> usize {
        self._ballots.len()
    }

    /// The declared candidates, or if none were declared, the candidates
    /// appearing on the ballots in order of first appearance.
    pub fn candidate_names(&self) -> Vec<String> {
        if let Some(cands) = &self._candidates {
            return cands.clone();
        }
        let mut res: Vec<String> = Vec::new();
        for name in self._ballots.iter().flat_map(|b| b.values()) {
            if !res.contains(name) {
                res.push(name.clone());
            }
        }
        res
    }

    pub fn build(&self) -> Result<Contest, ContestError> {
        Contest::new(&self._ballots, &self.candidate_names(), &self._rules)
    }

    /// Builds the contest and runs it to completion.
    pub fn run(&self) -> Result<ContestResult, ContestError> {
        let mut contest = self.build()?;
        contest.run();
        Ok(contest.result())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(l: &[&str]) -> Vec<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn infers_candidates_in_order_of_appearance() {
        let mut builder = Builder::new(&TabulationRules::DEFAULT_RULES);
        builder.add_ranking(&strings(&["B", "A"]));
        builder.add_ranking(&strings(&["C", "B"]));
        assert_eq!(builder.candidate_names(), strings(&["B", "A", "C"]));
        assert_eq!(builder.num_ballots(), 2);
    }

    #[test]
    fn declared_candidates_win_over_inference() {
        let mut builder =
            Builder::new(&TabulationRules::DEFAULT_RULES).candidates(&strings(&["A", "B", "C"]));
        builder.add_ranking(&strings(&["B"]));
        assert_eq!(builder.candidate_names(), strings(&["A", "B", "C"]));
        let result = builder.run().unwrap();
        assert_eq!(result.outcome, Outcome::Winner("B".to_string()));
        assert_eq!(
            result.rounds[0].tally,
            vec![
                ("A".to_string(), 0),
                ("B".to_string(), 1),
                ("C".to_string(), 0)
            ]
        );
    }

    #[test]
    fn unknown_candidate_is_an_error() {
        let mut builder =
            Builder::new(&TabulationRules::DEFAULT_RULES).candidates(&strings(&["A", "B"]));
        builder.add_ranking(&strings(&["A", "Z"]));
        assert!(matches!(
            builder.run(),
            Err(ContestError::UnknownCandidate { ballot: 0, .. })
        ));
    }
}
