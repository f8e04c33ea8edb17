use log::{debug, info};
use snafu::ensure;

use std::collections::{HashMap, HashSet};

use crate::ballot::{Ballot, BallotId};
use crate::config::*;
use crate::pile::{Pile, PileName};
use crate::round::Round;

type RoundId = u32;

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ContestState {
    Initializing,
    Complete,
}

/// An instant-runoff contest.
///
/// Every ballot starts in the unassigned pile. On each pass, the ballots of all
/// the piles whose owner is not running anymore are handed to the highest ranked
/// running candidate of each ballot. Ballots are never taken out of a pile:
/// eliminated piles are simply not counted, and handing a ballot again to a pile
/// that already holds it has no effect.
#[derive(Debug, Clone)]
pub struct Contest {
    rules: TabulationRules,
    candidates: Vec<String>,
    active_candidates: HashSet<String>,
    ballots: Vec<Ballot>,
    // The candidate piles in candidate order, then the unassigned pile.
    piles: Vec<Pile>,
    candidate_piles: HashMap<String, usize>,
    rounds: Vec<Round>,
    state: ContestState,
}

impl Contest {
    /// Prepares a contest. All the candidates start as active.
    ///
    /// Fails if a candidate is declared twice, or on the first ballot that does
    /// not respect the ballot contract (see [`Ballot::new`]).
    pub fn new(
        raw_ballots: &[RawBallot],
        candidates: &[String],
        rules: &TabulationRules,
    ) -> Result<Contest, ContestError> {
        let mut active_candidates: HashSet<String> = HashSet::with_capacity(candidates.len());
        for name in candidates {
            ensure!(
                active_candidates.insert(name.clone()),
                DuplicateOptionSnafu { name: name.clone() }
            );
        }

        let ballots: Vec<Ballot> = raw_ballots
            .iter()
            .enumerate()
            .map(|(idx, raw)| Ballot::new(idx, raw, &active_candidates))
            .collect::<Result<Vec<Ballot>, ContestError>>()?;

        let mut piles: Vec<Pile> = candidates.iter().map(|c| Pile::for_candidate(c)).collect();
        let candidate_piles: HashMap<String, usize> = candidates
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.clone(), idx))
            .collect();

        let mut unassigned = Pile::unassigned();
        unassigned.add_ballots((0..ballots.len()).map(BallotId));
        piles.push(unassigned);

        Ok(Contest {
            rules: rules.clone(),
            candidates: candidates.to_vec(),
            active_candidates,
            ballots,
            piles,
            candidate_piles,
            rounds: Vec::new(),
            state: ContestState::Initializing,
        })
    }

    /// Runs the rounds until no candidate is left to eliminate.
    ///
    /// Running a contest that is already complete does nothing.
    pub fn run(&mut self) {
        if self.state == ContestState::Complete {
            debug!("run: contest already complete");
            return;
        }
        info!(
            "Processing {:?} ballots, candidates: {:?}, rules: {:?}",
            self.ballots.len(),
            self.candidates,
            self.rules
        );

        // Hands out the unassigned pile.
        self.redistribute();

        while !self.active_candidates.is_empty() {
            let round = self.create_round();
            let round_id = (self.rounds.len() + 1) as RoundId;
            info!(
                "Round {:?}: {} votes: {:?}",
                round_id,
                round.total_votes(),
                round.vote_distribution().tally
            );

            let survivors = round.non_eliminated_candidates();
            let sole_survivor =
                round.len() == 1 && self.rules.sole_survivor == SoleSurvivorRule::DeclareWinner;
            self.rounds.push(round);

            if sole_survivor {
                info!(
                    "Round {:?}: only one candidate left running: {:?}",
                    round_id, self.active_candidates
                );
                break;
            }

            // Invariant: the lowest candidates are always eliminated.
            assert!(
                survivors.len() < self.active_candidates.len(),
                "The number of candidates did not decrease: {:?} -> {:?}",
                self.active_candidates,
                survivors
            );
            info!(
                "Round {:?}: eliminated: {:?}",
                round_id,
                self.candidates
                    .iter()
                    .filter(|c| self.active_candidates.contains(*c) && !survivors.contains(*c))
                    .collect::<Vec<&String>>()
            );
            self.active_candidates = survivors.into_iter().collect();
            self.redistribute();
        }

        self.state = ContestState::Complete;
        info!(
            "Contest complete after {:?} rounds: {}",
            self.rounds.len(),
            self.winner()
        );
    }

    /// Sends the ballots of every pile that is not running to the pile of the
    /// candidate they now vote for. Ballots without a vote are left out.
    ///
    /// Returns the number of ballots added to a pile.
    fn redistribute(&mut self) -> usize {
        let mut transfers: Vec<(usize, BallotId)> = Vec::new();
        let mut exhausted: usize = 0;
        for pile in self.piles.iter().filter(|p| !self.is_running(p)) {
            for ballot_id in pile.iter() {
                let vote = self.ballots[ballot_id.index()].get_vote(&self.active_candidates);
                match vote.and_then(|name| self.candidate_piles.get(name)) {
                    Some(pile_idx) => transfers.push((*pile_idx, ballot_id)),
                    None => exhausted += 1,
                }
            }
        }
        // Targets are running piles, so none of the piles read above changes here.
        let added = transfers
            .into_iter()
            .filter(|(pile_idx, ballot_id)| self.piles[*pile_idx].add_ballot(*ballot_id))
            .count();
        debug!(
            "redistribute: {:?} ballots added, {:?} exhausted ballot readings",
            added, exhausted
        );
        added
    }

    fn is_running(&self, pile: &Pile) -> bool {
        match pile.candidate() {
            Some(name) => self.active_candidates.contains(name),
            None => false,
        }
    }

    fn create_round(&self) -> Round {
        Round::new(self.piles.iter().filter(|p| self.is_running(p)))
    }

    /// The winner of the contest.
    ///
    /// The candidates leading the last round win. A tie between them is broken
    /// by looking at who led among them in the previous round, and so on back
    /// to the first round. If the tie is still there, there is no winner.
    pub fn winner(&self) -> Outcome {
        let mut top_candidates: Vec<String> = self.candidates.clone();
        for round in self.rounds.iter().rev() {
            if top_candidates.len() == 1 {
                break;
            }
            top_candidates = round.find_top_candidates(&top_candidates);
            debug!("winner: top candidates: {:?}", top_candidates);
        }
        match top_candidates.as_slice() {
            [winner] => Outcome::Winner(winner.clone()),
            _ => Outcome::NoWinner,
        }
    }

    pub fn vote_distributions(&self) -> Vec<VoteDistribution> {
        self.rounds
            .iter()
            .map(|r| r.vote_distribution().clone())
            .collect()
    }

    pub fn result(&self) -> ContestResult {
        ContestResult {
            outcome: self.winner(),
            rounds: self.vote_distributions(),
        }
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// The active candidates, in candidate order.
    pub fn active_candidates(&self) -> Vec<&str> {
        self.candidates
            .iter()
            .filter(|c| self.active_candidates.contains(*c))
            .map(|c| c.as_str())
            .collect()
    }

    pub fn pile(&self, name: &PileName) -> Option<&Pile> {
        match name {
            PileName::Candidate(c) => self.candidate_piles.get(c).map(|idx| &self.piles[*idx]),
            PileName::Unassigned => self.piles.last(),
        }
    }

    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }

    pub fn state(&self) -> ContestState {
        self.state
    }
}
