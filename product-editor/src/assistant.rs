//! AI description context
//!
//! Builds the generation request from the draft and validates what comes
//! back. The editor owns the call and the write into `description`.

use serde_json::Value;
use shared::models::{Category, CategoryId, DescriptionRequest};

use crate::category::{NOT_SPECIFIED, name_of};
use crate::error::GenerationError;
use crate::fields::{BRAND, CATEGORY_ID, TAGS, TITLE};
use crate::form::ProductDraft;

/// Text of a scalar field; lists are joined with `", "`
fn text_of(draft: &ProductDraft, field: &str) -> Option<String> {
    match draft.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => None,
    }
}

/// Prompt context for the current draft
///
/// The category is sent by display name; an unset or unknown id becomes
/// `"not specified"`.
pub fn build_request(draft: &ProductDraft, tree: &[Category]) -> DescriptionRequest {
    let category = draft
        .get(CATEGORY_ID)
        .and_then(CategoryId::from_value)
        .map(|id| name_of(tree, &id))
        .unwrap_or(NOT_SPECIFIED);

    DescriptionRequest {
        title: text_of(draft, TITLE),
        category: category.to_string(),
        tags: text_of(draft, TAGS),
        brand: text_of(draft, BRAND),
    }
}

/// Reject blank generations
pub fn accept_description(text: String) -> Result<String, GenerationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}
