use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};

use crate::deserializers::FlexibleInt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

/// Categories rendered as `{"<id>": "<label>"}`, ordered by id.
pub type CategoryMap = BTreeMap<i64, String>;

// ---------------------- REQUESTS ----------------------

#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: FlexibleInt,
    pub difficulty: FlexibleInt,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub previous_questions: Vec<FlexibleInt>,
    pub quiz_category: QuizCategory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizCategory {
    /// `0` selects every category.
    pub id: FlexibleInt,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

// ---------------------- RESPONSES ----------------------

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: CategoryMap,
}

#[derive(Debug, Serialize)]
pub struct QuestionPage {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: i64,
    pub categories: CategoryMap,
    pub current_category: Option<i64>,
    pub page: i64,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub created: i64,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub deleted: i64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub success: bool,
    /// The picked question, or `false` once every candidate has been seen.
    #[serde(serialize_with = "question_or_false")]
    pub question: Option<Question>,
}

fn question_or_false<S>(question: &Option<Question>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match question {
        Some(q) => q.serialize(serializer),
        None => serializer.serialize_bool(false),
    }
}
