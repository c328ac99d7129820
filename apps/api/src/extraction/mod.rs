//! Field extraction — pulls contact fields out of recognised resume text.
//!
//! Callers only see `ContactExtractor`, so a model-based extractor can replace
//! the regex rules without touching the pipeline.

pub mod contact;

use crate::models::resume::ContactInfo;

/// Pure, total extraction: never fails, only leaves fields unset.
pub trait ContactExtractor: Send + Sync {
    fn extract(&self, text: &str) -> ContactInfo;
}

/// Default extractor backed by the declarative rules in [`contact`].
pub struct PatternExtractor;

impl ContactExtractor for PatternExtractor {
    fn extract(&self, text: &str) -> ContactInfo {
        ContactInfo {
            name: contact::find_name(text),
            email: contact::find_email(text),
            phone: contact::find_phone(text),
        }
    }
}
