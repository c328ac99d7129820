//! Analysis client — asks the hosted model to score the resume and parses
//! its reply.
//!
//! Transport and auth failures are terminal (`AppError::AnalysisApi`); a
//! malformed reply is not an error and yields partial results.

pub mod handlers;
pub mod parser;
pub mod prompts;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::analysis::parser::{parse_reply, COURSE_BLOCK_VERSION};
use crate::analysis::prompts::{build_analysis_prompt, ANALYSIS_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::resume::AnalysisResult;

/// Scores and comments on resume text. Implement this to swap backends.
#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    async fn analyze(&self, resume_text: &str) -> Result<AnalysisResult, AppError>;
}

/// Default analyzer: one prompt to the hosted model, lenient reply parsing.
pub struct LlmResumeAnalyzer {
    llm: LlmClient,
}

impl LlmResumeAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeAnalyzer for LlmResumeAnalyzer {
    async fn analyze(&self, resume_text: &str) -> Result<AnalysisResult, AppError> {
        let prompt = build_analysis_prompt(resume_text);
        debug!("Requesting analysis with reply contract v{COURSE_BLOCK_VERSION}");
        let reply = self
            .llm
            .generate(&prompt, ANALYSIS_SYSTEM)
            .await
            .map_err(|e| AppError::AnalysisApi(format!("Resume analysis failed: {e}")))?;

        let result = parse_reply(&reply);
        if result.score.is_none() {
            warn!("Analysis reply had no parsable score line");
        }
        info!(
            "Analysis parsed: score={:?}, recommendations={}",
            result.score,
            result.recommendations.len()
        );
        Ok(result)
    }
}
