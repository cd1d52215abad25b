//! Vote bookkeeping and aggregate recomputation.

use crate::models::{StoreData, VoteMap};

/// Mean of every persisted score for the project, rounded to one decimal.
/// Always recomputed from the full vote map so the aggregate can never
/// drift from the per-user records; 0.0 means unrated.
pub fn recompute_average(votes: &VoteMap, project_id: &str) -> f64 {
    let scores: Vec<u8> = votes
        .values()
        .filter_map(|per_user| per_user.get(project_id))
        .copied()
        .filter(|score| *score > 0)
        .collect();

    if scores.is_empty() {
        return 0.0;
    }

    let sum: u32 = scores.iter().map(|s| u32::from(*s)).sum();
    let mean = f64::from(sum) / scores.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Records `score` for `(username, project_id)`, replacing any previous
/// vote, and refreshes the stored aggregate. Returns the new average.
pub fn apply_vote(store: &mut StoreData, username: &str, project_id: &str, score: u8) -> f64 {
    store
        .votes
        .entry(username.to_string())
        .or_default()
        .insert(project_id.to_string(), score);

    let average = recompute_average(&store.votes, project_id);
    store.ratings.insert(project_id.to_string(), average);
    average
}

/// The `vote = 0` sentinel: makes sure the user's vote record exists but
/// never persists a zero score.
pub fn ensure_vote_record(store: &mut StoreData, username: &str) {
    store.votes.entry(username.to_string()).or_default();
}
