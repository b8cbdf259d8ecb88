//! Product draft and form state
//!
//! The draft is a loosely typed, insertion-ordered field map: it may be
//! partially filled and invalid at any point until submission.
//!
//! [`FormState`] versions the draft. `revision` counts writes and
//! `generation` counts wholesale replacements, so an async writer can tell
//! whether the draft it started from is still the one being edited.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared::models::PRODUCT_ID_FIELD;
use std::sync::Arc;

/// In-progress product, keyed by API field name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductDraft(Map<String, Value>);

impl ProductDraft {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a JSON object; anything else is rejected
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// String form of a field, if it holds a string
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Whether `name` holds a truthy value (see [`is_truthy`])
    pub fn has_value(&self, name: &str) -> bool {
        self.0.get(name).is_some_and(is_truthy)
    }

    /// Identifier of an existing product, if the draft carries a truthy `_id`
    ///
    /// Strings are used as is; any other truthy value by its JSON text.
    pub fn product_id(&self) -> Option<String> {
        match self.0.get(PRODUCT_ID_FIELD).filter(|v| is_truthy(v))? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Overlay every field of `partial`, keeping fields it does not mention
    fn overlay(&mut self, partial: ProductDraft) {
        for (name, value) in partial.0 {
            self.0.insert(name, value);
        }
    }
}

impl From<Map<String, Value>> for ProductDraft {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ProductDraft {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Truthiness used for required-field checks
///
/// `null`, `false`, `0`, `NaN`-like numbers and `""` are falsy; every other
/// value, including empty arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Versioned draft container
#[derive(Debug, Default)]
pub struct FormState {
    draft: ProductDraft,
    revision: u64,
    generation: u64,
    /// Last initial data seen by [`sync_initial`](Self::sync_initial)
    initial: Option<Arc<ProductDraft>>,
}

impl FormState {
    /// Seed the draft from initial data
    pub fn new(initial: Arc<ProductDraft>) -> Self {
        Self {
            draft: initial.as_ref().clone(),
            revision: 0,
            generation: 0,
            initial: Some(initial),
        }
    }

    pub fn values(&self) -> &ProductDraft {
        &self.draft
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.draft.get(name)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Set one field, leaving all others untouched
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) -> u64 {
        self.draft.set(name, value);
        self.bump()
    }

    /// Set one field only if the draft is still in `generation`
    ///
    /// Returns the current generation on mismatch.
    pub fn set_field_if_current(
        &mut self,
        generation: u64,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<u64, u64> {
        if generation != self.generation {
            return Err(self.generation);
        }
        Ok(self.set_field(name, value))
    }

    /// Shallow merge: fields in `partial` overwrite, all others are kept
    pub fn merge(&mut self, partial: ProductDraft) -> u64 {
        self.draft.overlay(partial);
        self.bump()
    }

    /// Merge the partial computed from the current draft
    pub fn update<F>(&mut self, updater: F) -> u64
    where
        F: FnOnce(&ProductDraft) -> ProductDraft,
    {
        let partial = updater(&self.draft);
        self.merge(partial)
    }

    /// Replace the whole draft and start a new generation
    pub fn replace(&mut self, draft: ProductDraft) -> u64 {
        self.draft = draft;
        self.generation += 1;
        self.bump()
    }

    /// Re-seed from `initial` when it is a different object than last time
    ///
    /// Identity, not equality, decides: an equal but newly built draft
    /// still replaces. Returns whether a replace happened.
    pub fn sync_initial(&mut self, initial: &Arc<ProductDraft>) -> bool {
        if self
            .initial
            .as_ref()
            .is_some_and(|seen| Arc::ptr_eq(seen, initial))
        {
            return false;
        }
        self.initial = Some(Arc::clone(initial));
        self.replace(initial.as_ref().clone());
        true
    }

    fn bump(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(value: Value) -> ProductDraft {
        ProductDraft::from_value(value).unwrap()
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_product_id() {
        assert_eq!(draft(json!({"_id": "p1"})).product_id(), Some("p1".into()));
        assert_eq!(draft(json!({"_id": 42})).product_id(), Some("42".into()));
        assert_eq!(draft(json!({"_id": ""})).product_id(), None);
        assert_eq!(draft(json!({"_id": null})).product_id(), None);
        assert_eq!(draft(json!({"_id": 0})).product_id(), None);
        assert_eq!(draft(json!({"_id": false})).product_id(), None);
        assert_eq!(draft(json!({"_id": true})).product_id(), Some("true".into()));
        assert_eq!(
            draft(json!({"_id": {"$oid": "p1"}})).product_id(),
            Some(r#"{"$oid":"p1"}"#.into())
        );
        assert_eq!(draft(json!({"_id": []})).product_id(), Some("[]".into()));
        assert_eq!(ProductDraft::empty().product_id(), None);
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(ProductDraft::from_value(json!([1, 2])).is_none());
        assert!(ProductDraft::from_value(json!("x")).is_none());
    }

    #[test]
    fn test_set_field_keeps_others() {
        let mut form = FormState::new(Arc::new(draft(json!({"title": "T", "price": 10}))));
        form.set_field("price", 12);
        assert_eq!(form.values(), &draft(json!({"title": "T", "price": 12})));
        assert_eq!(form.revision(), 1);
    }

    #[test]
    fn test_merge_never_drops_fields() {
        let mut form = FormState::default();
        form.merge(draft(json!({"title": "T", "brand": "B"})));
        form.merge(draft(json!({"brand": "C", "stock": 3})));
        assert_eq!(
            form.values(),
            &draft(json!({"title": "T", "brand": "C", "stock": 3}))
        );
        assert_eq!(form.generation(), 0);
    }

    #[test]
    fn test_update_sees_previous_values() {
        let mut form = FormState::default();
        form.set_field("stock", 2);
        form.update(|prev| {
            let stock = prev.get("stock").and_then(Value::as_i64).unwrap_or(0);
            ProductDraft::empty().with("stock", stock + 1)
        });
        assert_eq!(form.get("stock"), Some(&json!(3)));
    }

    #[test]
    fn test_replace_starts_new_generation() {
        let mut form = FormState::default();
        form.set_field("title", "old");
        form.replace(draft(json!({"price": 1})));
        assert_eq!(form.values(), &draft(json!({"price": 1})));
        assert_eq!(form.generation(), 1);
        assert_eq!(form.revision(), 2);
    }

    #[test]
    fn test_sync_initial_replaces_not_merges() {
        let first = Arc::new(ProductDraft::empty());
        let mut form = FormState::new(first.clone());
        form.set_field("brand", "typed");

        assert!(!form.sync_initial(&first));
        assert_eq!(form.get("brand"), Some(&json!("typed")));

        let second = Arc::new(draft(json!({"title": "T", "price": 10})));
        assert!(form.sync_initial(&second));
        assert_eq!(form.values(), &draft(json!({"title": "T", "price": 10})));
        assert_eq!(form.generation(), 1);
    }

    #[test]
    fn test_sync_initial_uses_identity() {
        let a = Arc::new(draft(json!({"title": "T"})));
        let mut form = FormState::new(a.clone());
        form.set_field("title", "edited");

        // Equal content, different object
        let b = Arc::new(draft(json!({"title": "T"})));
        assert!(form.sync_initial(&b));
        assert_eq!(form.get("title"), Some(&json!("T")));
    }

    #[test]
    fn test_set_field_if_current() {
        let mut form = FormState::default();
        let started = form.generation();
        assert!(form.set_field_if_current(started, "description", "d1").is_ok());

        form.replace(ProductDraft::empty());
        assert_eq!(form.set_field_if_current(started, "description", "d2"), Err(1));
        assert!(form.get("description").is_none());
    }
}
