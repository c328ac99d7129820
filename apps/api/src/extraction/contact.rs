use std::sync::LazyLock;

use regex::Regex;

/// How many non-empty lines at the top of the document may hold the name.
const NAME_SEARCH_LINES: usize = 5;
const MIN_PHONE_DIGITS: usize = 10;
const MAX_PHONE_DIGITS: usize = 15;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[a-z0-9._%+-]+@[a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,}").unwrap()
});

// Optional +CC, then 3-4 digit groups joined by at most one space, dot or dash.
// Never crosses a line break.
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+\d{1,3}[ .-]?)?(?:\(\d{2,4}\)|\d{2,4})(?:[ .-]?\d{2,4}){2,3}").unwrap()
});

static NAME_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:full\s+)?name\s*[:\-]\s*").unwrap());

const HEADER_WORDS: &[&str] = &[
    "resume",
    "résumé",
    "curriculum",
    "vitae",
    "cv",
    "profile",
    "contact",
    "summary",
    "objective",
    "experience",
    "education",
    "skills",
    "address",
    "phone",
    "email",
];

/// First email-looking substring, or `None`.
pub fn find_email(text: &str) -> Option<String> {
    EMAIL_PATTERN.find(text).map(|m| m.as_str().to_string())
}

/// First phone-looking substring with a plausible digit count, returned as written.
///
/// A candidate that was cut short (more digit groups follow it) is retried
/// from its next group, so a ZIP code in front of a number is skipped.
pub fn find_phone(text: &str) -> Option<String> {
    let mut from = 0;
    while let Some(m) = PHONE_PATTERN.find_at(text, from) {
        if is_phone(text, m.start(), m.end()) {
            return Some(m.as_str().to_string());
        }
        from = after_first_group(text, m.start());
    }
    None
}

fn is_phone(text: &str, start: usize, end: usize) -> bool {
    let candidate = &text[start..end];
    let digits = candidate.chars().filter(char::is_ascii_digit).count();
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
        && !glued_to_neighbours(text, start, end)
        && !continues_with_group(text, end)
        && !is_year_run(candidate)
}

/// "2018 2019 2020" is a list of years, not a phone number.
fn is_year_run(candidate: &str) -> bool {
    candidate
        .split(|c: char| !c.is_ascii_digit())
        .filter(|group| !group.is_empty())
        .all(|group| group.len() == 4 && (group.starts_with("19") || group.starts_with("20")))
}

fn glued_to_neighbours(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    before.is_some_and(char::is_alphanumeric) || after.is_some_and(|c| c.is_ascii_digit())
}

/// True when another separator-and-digit group follows, i.e. the match was truncated.
fn continues_with_group(text: &str, end: usize) -> bool {
    let mut rest = text[end..].chars();
    matches!(rest.next(), Some(' ' | '.' | '-')) && rest.next().is_some_and(|c| c.is_ascii_digit())
}

/// Byte offset just past the first run of digits at or after `start`.
fn after_first_group(text: &str, start: usize) -> usize {
    let rest = &text[start..];
    let Some(first_digit) = rest.find(|c: char| c.is_ascii_digit()) else {
        return text.len();
    };
    let run = rest[first_digit..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len() - first_digit);
    start + first_digit + run
}

/// Best-effort name guess from the document header.
///
/// Looks at the first few non-empty lines and returns the first one that reads
/// like a personal name. Unconventional layouts can fool it.
pub fn find_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(NAME_SEARCH_LINES)
        .map(|line| NAME_LABEL.replace(line, "").trim().to_string())
        .find(|candidate| looks_like_name(candidate))
}

fn looks_like_name(line: &str) -> bool {
    if line.chars().any(|c| c.is_ascii_digit() || c == '@') {
        return false;
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if !(2..=4).contains(&tokens.len()) {
        return false;
    }

    let lower = line.to_lowercase();
    let has_header_word = lower
        .split(|c: char| !c.is_alphabetic())
        .any(|word| HEADER_WORDS.contains(&word));
    if has_header_word {
        return false;
    }

    tokens.iter().all(|token| is_name_token(token))
}

fn is_name_token(token: &str) -> bool {
    let starts_with_letter = token.chars().next().is_some_and(char::is_alphabetic);
    let letters = token.chars().filter(|c| c.is_alphabetic()).count();
    let allowed = token
        .chars()
        .all(|c| c.is_alphabetic() || matches!(c, '.' | '\'' | '-' | '’'));
    starts_with_letter && allowed && letters * 2 >= token.chars().count()
}
