use clap::Parser;

/// This is a tabulation program for ranked-choice polls.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The file containing the poll: a JSON poll description, or a CSV or Excel
    /// file with one ballot per row.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// (json, csv or xlsx) The type of the input. If not provided, it is guessed from the
    /// extension of the input file, and defaults to json.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (repeatable) The candidates of the poll, in order. For CSV and Excel inputs, the
    /// candidates are inferred from the ballots if this flag is not used.
    #[clap(long, value_parser)]
    pub candidates: Option<Vec<String>>,

    /// The question of the poll, reported in the summary.
    #[clap(long, value_parser)]
    pub question: Option<String>,

    /// (default: first sheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default 1) For CSV and Excel inputs, the column holding the first choice.
    #[clap(long, value_parser)]
    pub first_vote_column: Option<usize>,

    /// For CSV and Excel inputs, indicates that the first row is already a ballot.
    #[clap(long, takes_value = false)]
    pub no_header: bool,

    /// (declareWinner or eliminate) What to do when a single candidate is left running.
    /// Overrides the rules of a JSON poll.
    #[clap(long, value_parser)]
    pub sole_survivor: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the summary of the poll in JSON format.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the summary of a poll in JSON format. If provided,
    /// rcvpoll will check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
