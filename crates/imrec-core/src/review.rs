//! Weighted-vote review classification
//!
//! Each provider's publication type casts one vote for "review"; a prior
//! review flag casts `base_weight` votes. The score is normalized by the
//! number of expected responses and compared against a threshold.

use crate::config::ReviewConfig;
use imrec_identifiers::{clean_text, has_pipe_token};
use imrec_io::RawRecord;
use serde::{Deserialize, Serialize};

/// Pipe-delimited PubMed publication types, matched by token
pub const PRIMARY_TYPE_COLUMN: &str = "PubMed.publication_type";
/// Single-valued type columns compared as a whole, case-sensitively
pub const SECONDARY_TYPE_COLUMNS: [&str; 3] = [
    "scholar.PublicationTypes",
    "OpenAlex.publication_type",
    "OpenAlex.crossref_type",
];
/// Prior review flag
pub const BASE_FLAG_COLUMN: &str = "review";
/// The vote keyword
pub const REVIEW_WORD: &str = "review";

/// Outcome of the review vote for one record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewVote {
    pub vote_score: u32,
    pub n_responses: u32,
    pub normalized_score: f64,
    pub review: bool,
}

impl ReviewVote {
    pub fn is_experimental(&self) -> bool {
        !self.review
    }
}

/// Read the prior review flag; missing or unparseable values are false
pub fn base_flag(record: &RawRecord<'_>) -> bool {
    record.get(BASE_FLAG_COLUMN).as_bool().unwrap_or(false)
}

/// Expected responses: the base weight plus non-empty response columns
pub fn count_responses(record: &RawRecord<'_>, config: &ReviewConfig) -> u32 {
    let answered = config
        .response_columns
        .iter()
        .filter(|column| !record.get(column).is_blank())
        .count() as u32;
    config.base_weight.saturating_add(answered)
}

/// Run the review vote on a record
pub fn classify_review(record: &RawRecord<'_>, config: &ReviewConfig) -> ReviewVote {
    let base = base_flag(record);

    let primary_vote = u32::from(has_pipe_token(&record.text(PRIMARY_TYPE_COLUMN), REVIEW_WORD));
    let secondary_votes = SECONDARY_TYPE_COLUMNS
        .iter()
        .filter(|column| clean_text(&record.text(column)) == REVIEW_WORD)
        .count() as u32;
    let base_votes = if base { config.base_weight } else { 0 };
    let vote_score = (primary_vote + secondary_votes).saturating_add(base_votes);

    let n_responses = count_responses(record, config);
    let normalized_score = if n_responses == 0 {
        0.0
    } else {
        f64::from(vote_score) / f64::from(n_responses)
    };

    ReviewVote {
        vote_score,
        n_responses,
        normalized_score,
        review: base || normalized_score > config.threshold,
    }
}
