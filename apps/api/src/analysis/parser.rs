//! Lenient parser for the analysis reply (contract v1).
//!
//! ```text
//! Score: 78
//! <markdown analysis>
//! <<<COURSES v1>>>
//! Title: ...
//! Description: ...
//! Link: ...
//! <<<END COURSES>>>
//! ```
//!
//! Any deviation degrades to an absent score, the raw text as analysis, or an
//! empty course list. Parsing never fails.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::resume::{AnalysisResult, Recommendation};

pub const COURSE_BLOCK_VERSION: u32 = 1;
pub const COURSE_BLOCK_START: &str = "<<<COURSES v1>>>";
pub const COURSE_BLOCK_END: &str = "<<<END COURSES>>>";
pub const MAX_RECOMMENDATIONS: usize = 3;

// Tolerates markdown decoration: "**Score:** 78/100", "## Score: 78".
static SCORE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[\s#>*_-]*score[\s*_]*:[\s*_]*(\d{1,3})\b").unwrap()
});

// Any version of the start marker is recognised so older layouts still split.
static COURSE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*<<<\s*COURSES(?:\s+v\d+)?\s*>>>[ \t]*$").unwrap());

static COURSE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*<<<\s*END\s+COURSES\s*>>>[ \t]*$").unwrap());

static FIELD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[\s*_-]*(?:\d+[.)]\s*)?(title|description|link|url)[\s*_]*:[\s*_]*(.*)$")
        .unwrap()
});

/// Parses a full reply into score, analysis text and recommendations.
pub fn parse_reply(reply: &str) -> AnalysisResult {
    // Line-anchored patterns below expect bare `\n` line endings.
    let reply = reply.replace("\r\n", "\n");
    let (body, course_block) = split_course_block(&reply);
    let (score, analysis) = take_score(body);

    let analysis = analysis.trim();
    AnalysisResult {
        score,
        analysis_text: (!analysis.is_empty()).then(|| analysis.to_string()),
        recommendations: course_block.map(parse_recommendations).unwrap_or_default(),
    }
}

/// Splits off the course block. Text after the end marker stays in the body.
fn split_course_block(reply: &str) -> (String, Option<&str>) {
    let Some(start) = COURSE_START.find(reply) else {
        return (reply.to_string(), None);
    };

    let after_start = &reply[start.end()..];
    match COURSE_END.find(after_start) {
        Some(end) => {
            let mut body = reply[..start.start()].to_string();
            body.push_str(&after_start[end.end()..]);
            (body, Some(&after_start[..end.start()]))
        }
        None => (reply[..start.start()].to_string(), Some(after_start)),
    }
}

/// Finds the first in-range score line and removes it from the text.
fn take_score(body: String) -> (Option<u8>, String) {
    let mut score = None;
    let mut kept = Vec::new();

    for line in body.lines() {
        if score.is_none() {
            if let Some(value) = score_on_line(line) {
                score = Some(value);
                continue;
            }
        }
        kept.push(line);
    }

    if score.is_none() {
        return (None, body);
    }
    (score, kept.join("\n"))
}

fn score_on_line(line: &str) -> Option<u8> {
    let captures = SCORE_LINE.captures(line)?;
    let value: u16 = captures.get(1)?.as_str().parse().ok()?;
    u8::try_from(value).ok().filter(|v| *v <= 100)
}

/// Reads `Title:` / `Description:` / `Link:` triples. A new `Title:` starts a
/// new entry; entries without a title are dropped.
pub fn parse_recommendations(block: &str) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    let mut current: Option<Recommendation> = None;

    for line in block.lines() {
        let Some(captures) = FIELD_LINE.captures(line) else {
            continue;
        };
        let key = captures[1].to_ascii_lowercase();
        let value = clean_value(&captures[2]);

        match key.as_str() {
            "title" => {
                if let Some(done) = current.take() {
                    recommendations.push(done);
                }
                if !value.is_empty() {
                    current = Some(Recommendation {
                        title: value,
                        description: String::new(),
                        link: None,
                    });
                }
            }
            "description" => {
                if let Some(rec) = current.as_mut() {
                    rec.description = value;
                }
            }
            _ => {
                if let Some(rec) = current.as_mut() {
                    rec.link = web_link(&value);
                }
            }
        }
    }

    if let Some(done) = current {
        recommendations.push(done);
    }
    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

fn clean_value(raw: &str) -> String {
    raw.trim().trim_matches(['*', '_']).trim().to_string()
}

/// `[Course](https://x)`, `<https://x>` or `https://x` → `https://x`.
/// Anything that is not an http(s) URL is dropped.
fn web_link(value: &str) -> Option<String> {
    let url = value
        .split_once("](")
        .and_then(|(_, rest)| rest.strip_suffix(')'))
        .unwrap_or(value)
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim();

    let lower = url.to_ascii_lowercase();
    (lower.starts_with("https://") || lower.starts_with("http://")).then(|| url.to_string())
}
