use crate::rcv::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RcvRules {
    #[serde(rename = "soleSurvivor")]
    pub sole_survivor: Option<String>,
}

/// A poll described as a JSON file.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PollFile {
    pub question: Option<String>,
    pub options: Vec<String>,
    /// Each ballot maps a rank ("1", "2", ...) to the name of an option.
    pub ballots: Vec<RawBallot>,
    pub rules: Option<RcvRules>,
}

pub fn parse_sole_survivor(s: &str) -> RcvResult<SoleSurvivorRule> {
    match s {
        "declareWinner" | "declare-winner" => Ok(SoleSurvivorRule::DeclareWinner),
        "eliminate" => Ok(SoleSurvivorRule::Eliminate),
        _ => whatever!("unknown sole survivor rule: {}", s),
    }
}

pub fn validate_rules(rules_o: Option<&RcvRules>) -> RcvResult<TabulationRules> {
    let mut rules = TabulationRules::DEFAULT_RULES;
    if let Some(s) = rules_o.and_then(|r| r.sole_survivor.as_ref()) {
        rules.sole_survivor = parse_sole_survivor(s)?;
    }
    Ok(rules)
}

pub fn parse_poll(contents: &str, path: &str) -> RcvResult<PollFile> {
    serde_json::from_str(contents).context(ParsingJsonSnafu { path })
}

pub fn read_poll_file(path: &str) -> RcvResult<PollFile> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let poll = parse_poll(&contents, path)?;
    debug!(
        "read_poll_file: {} options, {} ballots",
        poll.options.len(),
        poll.ballots.len()
    );
    Ok(poll)
}

/// Reads a summary written by a previous run.
pub fn read_summary(path: &str) -> RcvResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_poll() {
        let pf = parse_poll(
            r#"{
                "question": "Lunch?",
                "options": ["Pizza", "Sushi"],
                "ballots": [{"1": "Sushi", "2": "Pizza"}, {"1": "Pizza"}, {}],
                "rules": {"soleSurvivor": "eliminate"}
            }"#,
            "inline",
        )
        .unwrap();
        assert_eq!(pf.question.as_deref(), Some("Lunch?"));
        assert_eq!(pf.options, vec!["Pizza".to_string(), "Sushi".to_string()]);
        assert_eq!(pf.ballots.len(), 3);
        assert_eq!(pf.ballots[0].get(&2).map(|s| s.as_str()), Some("Pizza"));
        assert!(pf.ballots[2].is_empty());
        let rules = validate_rules(pf.rules.as_ref()).unwrap();
        assert_eq!(rules.sole_survivor, SoleSurvivorRule::Eliminate);
    }

    #[test]
    fn rules_are_optional() {
        let pf = parse_poll(r#"{"options": ["A"], "ballots": []}"#, "inline").unwrap();
        assert_eq!(pf.question, None);
        assert_eq!(
            validate_rules(pf.rules.as_ref()).unwrap(),
            TabulationRules::DEFAULT_RULES
        );
    }

    #[test]
    fn bad_rules_and_bad_json() {
        assert!(parse_sole_survivor("coinFlip").is_err());
        assert_eq!(
            parse_sole_survivor("declare-winner").unwrap(),
            SoleSurvivorRule::DeclareWinner
        );
        // Ranks must be numbers.
        assert!(matches!(
            parse_poll(r#"{"options": [], "ballots": [{"first": "A"}]}"#, "inline"),
            Err(RcvError::ParsingJson { .. })
        ));
    }
}
