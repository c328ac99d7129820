// Prompt templates for resume analysis.
// The layout requested here is the reply contract `parser` reads; the course
// markers are shared with it so the two cannot drift.

use crate::analysis::parser::{COURSE_BLOCK_END, COURSE_BLOCK_START};

pub const ANALYSIS_SYSTEM: &str = "\
You are an experienced technical recruiter and career coach. \
You review resumes honestly and constructively. \
Follow the requested output format exactly. \
Do NOT wrap the answer in code fences.";

/// Replace `{resume_text}`, `{course_start}` and `{course_end}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following resume text and provide:
1. A score out of 100 based on:
   - Content completeness
   - Professional presentation
   - Skills and experience relevance
   - Grammar and formatting
2. A detailed analysis of strengths and weaknesses, in markdown
3. Areas for improvement
4. Three specific online courses that would address those areas

RESUME TEXT:
{resume_text}

Respond in EXACTLY this layout:
Score: <integer 0-100>

<markdown analysis: strengths, weaknesses, areas for improvement>

{course_start}
Title: <course title>
Description: <one sentence>
Link: <course URL>

Title: <course title>
Description: <one sentence>
Link: <course URL>

Title: <course title>
Description: <one sentence>
Link: <course URL>
{course_end}"#;

pub fn build_analysis_prompt(resume_text: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE
        .replace("{course_start}", COURSE_BLOCK_START)
        .replace("{course_end}", COURSE_BLOCK_END)
        // Last, so resume text containing braces is never re-substituted.
        .replace("{resume_text}", resume_text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_carries_markers_and_text() {
        let prompt = build_analysis_prompt("  Jane Doe\nRust engineer  ");
        assert!(prompt.contains("Jane Doe\nRust engineer"));
        assert!(prompt.contains(COURSE_BLOCK_START));
        assert!(prompt.contains(COURSE_BLOCK_END));
        assert!(!prompt.contains("{course_start}"));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_resume_text_placeholders_are_left_alone() {
        let prompt = build_analysis_prompt("Skills: {course_end} templates");
        assert!(prompt.contains("Skills: {course_end} templates"));
    }
}
