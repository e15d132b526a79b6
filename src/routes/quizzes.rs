use std::collections::HashSet;

use axum::{extract::State, Json};
use rand::{seq::IteratorRandom, Rng};

use crate::{
    error::{AppError, AppResult},
    extract::ApiJson,
    state::AppState,
    types::{Question, QuizRequest, QuizResponse},
};

/// Quiz category id meaning "draw from every category".
pub const ALL_CATEGORIES: i64 = 0;

/// Picks one question uniformly at random among those whose id is not in `seen`.
pub fn pick_unseen<R>(candidates: Vec<Question>, seen: &HashSet<i64>, rng: &mut R) -> Option<Question>
where
    R: Rng + ?Sized,
{
    candidates.into_iter().filter(|q| !seen.contains(&q.id)).choose(rng)
}

pub async fn play_quiz(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<QuizRequest>,
) -> AppResult<Json<QuizResponse>> {
    let category: i64 = req.quiz_category.id.into();

    let candidates: Vec<Question> = if category == ALL_CATEGORIES {
        sqlx::query_as("SELECT id, question, answer, category, difficulty FROM questions ORDER BY id")
            .fetch_all(&state.db)
            .await?
    } else {
        sqlx::query_as(
            "SELECT id, question, answer, category, difficulty FROM questions WHERE category = ?1 ORDER BY id",
        )
        .bind(category)
        .fetch_all(&state.db)
        .await?
    };
    if candidates.is_empty() {
        return Err(AppError::NotFound(format!("no questions in category {}", category)));
    }

    let seen: HashSet<i64> = req.previous_questions.iter().map(|id| id.0).collect();
    let pool_size = candidates.len();
    let question = pick_unseen(candidates, &seen, &mut rand::thread_rng());

    match &question {
        Some(q) => {
            state.metrics.inc_quiz_questions_served();
            tracing::debug!(
                category,
                label = req.quiz_category.kind.as_deref().unwrap_or("all"),
                question_id = q.id,
                seen = seen.len(),
                pool_size,
                "quiz question picked"
            );
        }
        None => {
            state.metrics.inc_quizzes_exhausted();
            tracing::debug!(category, pool_size, "quiz exhausted");
        }
    }

    Ok(Json(QuizResponse { success: true, question }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn question(id: i64) -> Question {
        Question {
            id,
            question: format!("Question {id}?"),
            answer: format!("Answer {id}"),
            category: 1,
            difficulty: 1,
        }
    }

    #[test]
    fn never_returns_a_seen_question() {
        let seen: HashSet<i64> = [1, 2, 4].into_iter().collect();
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let candidates = (1..=5).map(question).collect();
            let picked = pick_unseen(candidates, &seen, &mut rng).unwrap();
            assert!(!seen.contains(&picked.id), "seed {seed} picked seen id {}", picked.id);
        }
    }

    #[test]
    fn returns_none_when_everything_was_seen() {
        let seen: HashSet<i64> = (1..=3).collect();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(pick_unseen((1..=3).map(question).collect(), &seen, &mut rng).is_none());
        assert!(pick_unseen(Vec::new(), &HashSet::new(), &mut rng).is_none());
    }

    #[test]
    fn unrelated_seen_ids_are_ignored() {
        let seen: HashSet<i64> = [99, 100].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(1);
        let picked = pick_unseen(vec![question(5)], &seen, &mut rng);
        assert_eq!(picked.map(|q| q.id), Some(5));
    }

    #[test]
    fn every_unseen_question_can_be_drawn() {
        let seen: HashSet<i64> = [3].into_iter().collect();
        let mut drawn = HashSet::new();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let candidates = (1..=4).map(question).collect();
            drawn.insert(pick_unseen(candidates, &seen, &mut rng).unwrap().id);
        }
        assert_eq!(drawn, [1, 2, 4].into_iter().collect());
    }
}
