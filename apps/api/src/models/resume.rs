use serde::{Deserialize, Serialize};

/// Contact fields pulled from resume text. Each field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A single course suggested by the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub link: Option<String>,
}

/// Parsed reply from the analysis service. Partial population is normal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 0 – 100
    pub score: Option<u8>,
    /// Markdown, passed through for client-side rendering.
    pub analysis_text: Option<String>,
    pub recommendations: Vec<Recommendation>,
}

/// Success body of `POST /analyze`.
///
/// Absent values serialize as `null` so the client can show "not found"
/// without guessing which keys exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub score: Option<u8>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub analysis: Option<String>,
    pub recommendations: Vec<Recommendation>,
}

impl AnalyzeResponse {
    /// Merges extractor output and analysis output into one payload.
    pub fn assemble(contact: ContactInfo, analysis: AnalysisResult) -> Self {
        Self {
            score: analysis.score,
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            analysis: analysis.analysis_text,
            recommendations: analysis.recommendations,
        }
    }
}
