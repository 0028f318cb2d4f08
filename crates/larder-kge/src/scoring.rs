//! Scoring functions for knowledge graph embeddings.

use serde::{Deserialize, Serialize};

/// One candidate from link prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkPrediction {
    /// Entity in the model vocabulary (a canonical string).
    pub entity: String,
    /// Raw plausibility score (higher = more plausible). Scale is model-specific.
    pub score: f32,
}

impl LinkPrediction {
    pub fn new(entity: impl Into<String>, score: f32) -> Self {
        Self {
            entity: entity.into(),
            score,
        }
    }
}

/// Common scoring functions for KGE models.
///
/// Complex-valued models (RotatE, ComplEx) read vectors as interleaved
/// `(re, im)` pairs, so their embeddings have even length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoringFunction {
    /// -||h + r - t||
    #[default]
    TransE,
    /// <h, r, t>
    DistMult,
    /// -||h ∘ r - t|| in complex space
    RotatE,
    /// Re(<h, r, conj(t)>)
    ComplEx,
}

impl ScoringFunction {
    pub fn score(&self, head: &[f32], relation: &[f32], tail: &[f32]) -> f32 {
        match self {
            Self::TransE => {
                let sum_sq: f32 = head
                    .iter()
                    .zip(relation)
                    .zip(tail)
                    .map(|((h, r), t)| (h + r - t).powi(2))
                    .sum();
                -sum_sq.sqrt()
            }
            Self::DistMult => head
                .iter()
                .zip(relation)
                .zip(tail)
                .map(|((h, r), t)| h * r * t)
                .sum(),
            Self::RotatE => {
                let sum_sq: f32 = complex_parts(head, relation, tail)
                    .map(|((h_re, h_im), (r_re, r_im), (t_re, t_im))| {
                        let re = h_re * r_re - h_im * r_im - t_re;
                        let im = h_re * r_im + h_im * r_re - t_im;
                        re * re + im * im
                    })
                    .sum();
                -sum_sq.sqrt()
            }
            Self::ComplEx => complex_parts(head, relation, tail)
                .map(|((h_re, h_im), (r_re, r_im), (t_re, t_im))| {
                    // (h * r) * conj(t), real part
                    let x = h_re * r_re - h_im * r_im;
                    let y = h_re * r_im + h_im * r_re;
                    x * t_re + y * t_im
                })
                .sum(),
        }
    }

    /// Whether embeddings must have even length.
    pub fn is_complex(&self) -> bool {
        matches!(self, Self::RotatE | Self::ComplEx)
    }
}

type Pair = (f32, f32);

fn complex_parts<'a>(
    head: &'a [f32],
    relation: &'a [f32],
    tail: &'a [f32],
) -> impl Iterator<Item = (Pair, Pair, Pair)> + 'a {
    let pairs = |v: &'a [f32]| v.chunks_exact(2).map(|c| (c[0], c[1]));
    pairs(head)
        .zip(pairs(relation))
        .zip(pairs(tail))
        .map(|((h, r), t)| (h, r, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transe_scoring() {
        // h + r = t is a perfect fit
        let score = ScoringFunction::TransE.score(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0], &[1.0, 1.0, 0.0]);
        assert!(score.abs() < 1e-6);

        let worse = ScoringFunction::TransE.score(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0], &[0.0, 0.0, 0.0]);
        assert!(worse < score);
    }

    #[test]
    fn test_distmult_scoring() {
        let score = ScoringFunction::DistMult.score(&[1.0, 0.5, 0.0], &[1.0, 1.0, 1.0], &[0.5, 1.0, 0.0]);
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_scoring() {
        // 1 rotated by i is i
        let score = ScoringFunction::RotatE.score(&[1.0, 0.0], &[0.0, 1.0], &[0.0, 1.0]);
        assert!(score.abs() < 1e-6);
    }

    #[test]
    fn test_complex_scoring() {
        let score = ScoringFunction::ComplEx.score(&[1.0, 0.0], &[1.0, 0.0], &[1.0, 0.0]);
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_scoring_function_names() {
        let f: ScoringFunction = serde_json::from_str("\"DistMult\"").unwrap();
        assert_eq!(f, ScoringFunction::DistMult);
        assert!(ScoringFunction::ComplEx.is_complex());
        assert!(!ScoringFunction::default().is_complex());
    }
}
