/*!
Tabulation of ranked-choice polls with the instant-runoff method.

The votes are counted round by round. In each round, every candidate tied
for the lowest count is eliminated, and the ballots supporting eliminated
candidates go to their next choice still running. The candidates leading the
last round win; ties are broken by looking at the previous rounds.

```
use ranked_contest::{run_contest, Outcome, RawBallot, TabulationRules};

let candidates = vec!["A".to_string(), "B".to_string(), "C".to_string()];
let ranking = |names: &[&str]| -> RawBallot {
    names
        .iter()
        .enumerate()
        .map(|(idx, name)| ((idx + 1) as u32, name.to_string()))
        .collect()
};
let mut ballots = Vec::new();
ballots.extend(std::iter::repeat(ranking(&["A"])).take(5));
ballots.extend(std::iter::repeat(ranking(&["B"])).take(3));
ballots.extend(std::iter::repeat(ranking(&["C", "B"])).take(2));

let result = run_contest(&candidates, &ballots, &TabulationRules::DEFAULT_RULES)?;
// A and B tie in the last round, A was ahead of B in the first round.
assert_eq!(result.outcome, Outcome::Winner("A".to_string()));
assert_eq!(result.rounds.len(), 2);
# Ok::<(), ranked_contest::ContestError>(())
```
*/

mod ballot;
pub mod builder;
mod config;
mod contest;
mod pile;
mod round;

pub use crate::ballot::{Ballot, BallotId};
pub use crate::config::*;
pub use crate::contest::{Contest, ContestState};
pub use crate::pile::{Pile, PileName};
pub use crate::round::Round;

/// Runs a contest from start to end.
///
/// Arguments:
/// * `candidates` the candidates of the contest, in the order they should be reported
/// * `ballots` the ballots, each one mapping ranks to candidate names
/// * `rules` the rules that govern this contest
pub fn run_contest(
    candidates: &[String],
    ballots: &[RawBallot],
    rules: &TabulationRules,
) -> Result<ContestResult, ContestError> {
    let mut contest = Contest::new(ballots, candidates, rules)?;
    contest.run();
    Ok(contest.result())
}
