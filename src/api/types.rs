// src/api/types.rs
//! Wire types for the scoring backend. Shapes are backend-defined; the client
//! performs no validation or derivation on them beyond display formatting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored resume record. Created by the backend on upload; read-only here.
#[derive(Debug, Clone, Deserialize)]
pub struct Resume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub created_at: DateTime<Utc>,
    /// Raw extracted text, when the backend managed to extract any.
    pub raw_text: Option<String>,
}

/// The four weighted sub-scores behind the final score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keyword_score: f64,
    pub semantic_score: f64,
    pub seniority_score: f64,
    pub penalties: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    pub final_score: i32,
    pub breakdown: ScoreBreakdown,
    pub missing_critical_skills: Vec<String>,
    pub missing_bonus_skills: Vec<String>,
    pub detected_yoe: Option<f64>,
    pub required_yoe: Option<f64>,
    pub explanation: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisRequest {
    pub resume_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_text: Option<String>,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct OptimizeRequest {
    pub resume_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_text: Option<String>,
    pub job_description: String,
    pub missing_critical_skills: Vec<String>,
    pub missing_bonus_skills: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct OptimizeResult {
    pub optimized_resume_text: String,
}
