use ranked_contest::{Rank, RawBallot};

/// Layout of a spreadsheet-like source of ballots.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TabularSource {
    /// Index (from 0) of the column holding the first choice.
    pub first_vote_column: usize,
    pub has_header: bool,
    pub worksheet_name: Option<String>,
}

/// Turns the cells of a row into a ballot: the k-th cell holds the choice of rank k.
///
/// Blank cells are skipped, which leaves a gap in the ranks.
pub fn assemble_ranks<S: AsRef<str>>(cells: &[S]) -> RawBallot {
    cells
        .iter()
        .enumerate()
        .filter_map(|(idx, cell)| {
            let name = cell.as_ref().trim();
            if name.is_empty() {
                None
            } else {
                Some(((idx + 1) as Rank, name.to_string()))
            }
        })
        .collect()
}
