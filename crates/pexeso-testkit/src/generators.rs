//! Proptest generators for property-based testing.

use proptest::prelude::*;

use pexeso_core::{FaceId, NewScore, PlayerName};

/// Generate a set of distinct faces, between 2 and `max` of them.
pub fn face_set(max: usize) -> impl Strategy<Value = Vec<FaceId>> {
    prop::collection::hash_set("[a-z]{1,8}", 2..=max.max(2))
        .prop_map(|set| set.into_iter().map(FaceId::from).collect())
}

/// Generate a non-blank player name.
pub fn player_name() -> impl Strategy<Value = PlayerName> {
    "[A-Za-z][A-Za-z0-9 ]{0,15}".prop_filter_map("blank name", |s| PlayerName::parse(&s).ok())
}

/// Generate a move count.
pub fn score() -> impl Strategy<Value = u32> {
    0u32..=200
}

/// Generate a play time in seconds.
pub fn time() -> impl Strategy<Value = u64> {
    0u64..=3600
}

/// Generate a reasonable timestamp.
pub fn date() -> impl Strategy<Value = i64> {
    0i64..=1_700_000_000_000
}

/// Parameters for generating a score.
#[derive(Debug, Clone)]
pub struct ScoreParams {
    pub name: PlayerName,
    pub score: u32,
    pub time: u64,
    pub date: i64,
}

impl Arbitrary for ScoreParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (player_name(), score(), time(), date())
            .prop_map(|(name, score, time, date)| ScoreParams {
                name,
                score,
                time,
                date,
            })
            .boxed()
    }
}

/// Generate a score from parameters.
pub fn score_from_params(params: &ScoreParams) -> NewScore {
    NewScore::at(&params.name, params.score, params.time, params.date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::solve;
    use pexeso_core::MatchEngine;
    use pexeso_store::{MemoryScoreStore, ScoreStore};

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(f)
    }

    proptest! {
        #[test]
        fn test_solve_takes_one_move_per_pair(faces in face_set(12), seed in any::<u64>()) {
            let mut engine = MatchEngine::seeded(&faces, seed).unwrap();
            solve(&mut engine).unwrap();

            prop_assert!(engine.is_complete());
            prop_assert_eq!(engine.moves() as usize, faces.len());
        }

        #[test]
        fn test_listing_is_ranked(params in prop::collection::vec(any::<ScoreParams>(), 0..20)) {
            let listed = block_on(async {
                let store = MemoryScoreStore::new();
                for p in &params {
                    store.insert_score(&score_from_params(p)).await.unwrap();
                }
                store.all_scores().await.unwrap()
            });

            prop_assert_eq!(listed.len(), params.len());
            for pair in listed.windows(2) {
                prop_assert!(pair[0].rank_key() < pair[1].rank_key());
            }
        }

        #[test]
        fn test_player_filter_is_exact(
            params in prop::collection::vec(any::<ScoreParams>(), 1..20),
        ) {
            let target = params[0].name.as_str().to_string();
            let listed = block_on(async {
                let store = MemoryScoreStore::new();
                for p in &params {
                    store.insert_score(&score_from_params(p)).await.unwrap();
                }
                store.scores_for_player(&target).await.unwrap()
            });

            let expected = params.iter().filter(|p| p.name.as_str() == target).count();
            prop_assert_eq!(listed.len(), expected);
            prop_assert!(listed.iter().all(|r| r.name == target));
        }
    }
}
