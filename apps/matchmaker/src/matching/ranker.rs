use serde::Serialize;
use tracing::debug;

use crate::matching::embedding::{Embedder, EmbeddingError};
use crate::models::{Candidate, CandidateField};
use crate::records::values::has_information;

#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub candidate: Candidate,
    pub score: f32,
}

/// Cosine similarity in [-1, 1]. Zero-magnitude or mismatched vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Ranks candidates by similarity between `query` and their searchable text.
///
/// Output is sorted by descending score; equal scores keep input order.
pub async fn rank(
    query: &str,
    candidates: Vec<Candidate>,
    embedder: &dyn Embedder,
) -> Result<Vec<RankedCandidate>, EmbeddingError> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let query_vector = embedder.encode(query).await?;
    let texts: Vec<String> = candidates
        .iter()
        .map(|c| c.searchable_text.clone())
        .collect();
    let vectors = embedder.encode_batch(&texts).await?;
    if vectors.len() != candidates.len() {
        return Err(EmbeddingError::CountMismatch {
            expected: candidates.len(),
            actual: vectors.len(),
        });
    }

    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .zip(vectors)
        .map(|(candidate, vector)| RankedCandidate {
            score: cosine_similarity(&query_vector, &vector),
            candidate,
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    debug!(
        model = embedder.model_name(),
        ranked = ranked.len(),
        "Ranked candidates"
    );
    Ok(ranked)
}

/// Keeps candidates whose `required` fields all carry real information.
pub fn filter_complete(candidates: Vec<Candidate>, required: &[CandidateField]) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|c| required.iter().all(|f| has_information(c.field(*f))))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::matching::embedding::HashEmbedder;
    use crate::records::NO_INFORMATION;
    use crate::store::memory::tests::candidate;

    fn with_text(id: &str, text: &str) -> Candidate {
        let mut c = candidate(id, id);
        c.searchable_text = text.to_string();
        c
    }

    /// Counts calls and returns a fixed vector for every text.
    struct ConstantEmbedder {
        calls: AtomicUsize,
        short_by: usize,
    }

    #[async_trait]
    impl Embedder for ConstantEmbedder {
        async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let n = texts.len().saturating_sub(self.short_by).max(1);
            Ok(vec![vec![1.0, 0.0]; n])
        }

        fn dimension(&self) -> usize {
            2
        }

        fn model_name(&self) -> &str {
            "constant"
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_empty_input_skips_embedder() {
        let embedder = ConstantEmbedder {
            calls: AtomicUsize::new(0),
            short_by: 0,
        };
        let ranked = rank("rust", Vec::new(), &embedder).await.unwrap();
        assert!(ranked.is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ties_keep_input_order() {
        let embedder = ConstantEmbedder {
            calls: AtomicUsize::new(0),
            short_by: 0,
        };
        let input = vec![with_text("a", "x"), with_text("b", "y"), with_text("c", "z")];
        let ranked = rank("anything", input, &embedder).await.unwrap();
        let ids: Vec<_> = ranked.iter().map(|r| r.candidate.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(ranked.iter().all(|r| (r.score - 1.0).abs() < 1e-6));
    }

    #[tokio::test]
    async fn test_count_mismatch_is_an_error() {
        let embedder = ConstantEmbedder {
            calls: AtomicUsize::new(0),
            short_by: 1,
        };
        let input = vec![with_text("a", "x"), with_text("b", "y")];
        let err = rank("q", input, &embedder).await.unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::CountMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_closest_candidate_ranks_first() {
        let embedder = HashEmbedder::default();
        let input = vec![
            with_text("1", "contador fiscal impostos"),
            with_text("2", "desenvolvedor java spring microsservicos"),
            with_text("3", ""),
        ];
        let ranked = rank("desenvolvedor java", input, &embedder).await.unwrap();
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].candidate.id, "2");
        assert!(ranked[0].score > ranked[1].score);
        // empty text still scored
        let empty = ranked.iter().find(|r| r.candidate.id == "3").unwrap();
        assert_eq!(empty.score, 0.0);
    }

    #[test]
    fn test_filter_complete_drops_sentinel_fields() {
        let mut full = candidate("1", "Ana");
        full.email = "ana@example.com".to_string();
        let mut missing = candidate("2", "Bruno");
        missing.email = NO_INFORMATION.to_string();

        let kept = filter_complete(
            vec![full, missing],
            &[CandidateField::Name, CandidateField::Email],
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "1");
    }
}
