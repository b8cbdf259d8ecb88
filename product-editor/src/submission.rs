//! Submission gate
//!
//! Validates the draft, reshapes list fields and decides between create
//! and update. Nothing here performs I/O; the editor dispatches the result.

use serde_json::{Map, Value};
use shared::models::ProductPayload;

use crate::error::ValidationError;
use crate::fields::{LIST_FIELDS, NON_NEGATIVE_FIELDS, REQUIRED_FIELDS, THUMBNAIL};
use crate::form::{ProductDraft, is_truthy};

/// The mutation a valid draft turns into
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Create(ProductPayload),
    Update { id: String, payload: ProductPayload },
}

impl Dispatch {
    pub fn payload(&self) -> &ProductPayload {
        match self {
            Self::Create(payload) | Self::Update { payload, .. } => payload,
        }
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Self::Update { .. })
    }
}

/// Submit button caption for the draft
pub fn submit_label(draft: &ProductDraft) -> &'static str {
    if draft.product_id().is_some() {
        "Update Product"
    } else {
        "Create Product"
    }
}

/// Split a comma-separated value into trimmed, non-empty items
///
/// A value that is already a list gets the same trimming; anything else
/// (missing, `null`, numbers) yields an empty list.
pub fn split_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Numeric value of a field; `None` when absent or empty
fn number_of(field: &str, value: Option<&Value>) -> Result<Option<f64>, ValidationError> {
    let not_a_number = |raw: String| ValidationError::NotANumber {
        field: field.to_string(),
        value: raw,
    };

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Some(n)),
            _ => Err(not_a_number(s.clone())),
        },
        Some(other) => Err(not_a_number(other.to_string())),
    }
}

/// Required-field and range checks, first failing rule wins
pub fn validate(draft: &ProductDraft) -> Result<(), ValidationError> {
    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !draft.has_value(field))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    for field in NON_NEGATIVE_FIELDS {
        if let Some(n) = number_of(field, draft.get(field))?
            && n < 0.0
        {
            return Err(ValidationError::Negative {
                field: field.to_string(),
            });
        }
    }

    Ok(())
}

/// Outgoing payload: the draft with list fields turned into arrays
pub fn reshape(draft: &ProductDraft) -> ProductPayload {
    let mut fields: Map<String, Value> = draft.as_map().clone();
    for field in LIST_FIELDS {
        let items = split_list(draft.get(field));
        fields.insert(field.to_string(), Value::from(items));
    }
    ProductPayload::new(fields)
}

/// Run the full gate
///
/// `has_pending` tells whether a selected file is still waiting for upload.
pub fn prepare(draft: &ProductDraft, has_pending: bool) -> Result<Dispatch, ValidationError> {
    validate(draft)?;
    let payload = reshape(draft);
    check_thumbnail(&payload, has_pending)?;

    Ok(match draft.product_id() {
        Some(id) => Dispatch::Update { id, payload },
        None => Dispatch::Create(payload),
    })
}

/// Refuse a payload without thumbnail while a selected file is still pending
pub fn check_thumbnail(payload: &ProductPayload, has_pending: bool) -> Result<(), ValidationError> {
    let attached = payload.get(THUMBNAIL).is_some_and(is_truthy);
    if !attached && has_pending {
        return Err(ValidationError::ThumbnailNotUploaded);
    }
    Ok(())
}
