use crate::normalize::{contains_any, has_digit, DIRECTION_WORDS, PRICE_TERMS};
use crate::table::Table;

/// Base score for a candidate that already arrived as a structured table.
const TABLE_BASE: i32 = 10;
/// Base score for a raw-text candidate, before keyword bonuses.
const TEXT_BASE: i32 = 5;

/// Raw payload of one extraction attempt.
#[derive(Debug, Clone)]
pub enum CandidateData {
    Table(Table),
    Text(String),
}

/// One raw extraction result competing for selection. Held only for the
/// duration of a cycle.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub data: CandidateData,
    pub method: String,
    pub score: i32,
}

impl Candidate {
    pub fn new(data: CandidateData, method: &str) -> Self {
        let score = score_of(&data);
        Candidate {
            data,
            method: method.to_string(),
            score,
        }
    }
}

/// A structured table outranks any raw text. Raw text earns +1 for direction
/// terms, +1 for entry/target/stop terms, +1 for any digit, +1 for a table
/// delimiter or an explicit table marker.
fn score_of(data: &CandidateData) -> i32 {
    match data {
        CandidateData::Table(_) => TABLE_BASE,
        CandidateData::Text(text) => {
            let mut score = TEXT_BASE;
            if contains_any(text, DIRECTION_WORDS) || text.contains("方向") {
                score += 1;
            }
            if contains_any(text, PRICE_TERMS) {
                score += 1;
            }
            if has_digit(text) {
                score += 1;
            }
            if text.contains('|') || text.contains("表格") || text.to_lowercase().contains("table") {
                score += 1;
            }
            score
        }
    }
}

/// Pick the highest-scoring candidate; ties go to the first seen. An empty
/// list yields None, which is an expected non-error state for the cycle.
pub fn select_best(candidates: Vec<Candidate>) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for candidate in candidates {
        let better = best
            .as_ref()
            .map_or(true, |b| candidate.score > b.score);
        if better {
            best = Some(candidate);
        }
    }
    best
}
