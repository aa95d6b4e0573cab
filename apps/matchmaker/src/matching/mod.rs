// Similarity ranking of candidates against a job or free-text query.

pub mod embedding;
pub mod handlers;
pub mod ranker;
