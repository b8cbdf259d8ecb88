//! Product form field definitions
//!
//! Static description of the controls the product form renders. The
//! editor binds each definition to its current draft value; the category
//! select gets its options from the flattened tree at bind time.

use serde::Serialize;
use shared::models::PRODUCT_STATUSES;

// ========== Field names ==========

pub const TITLE: &str = "title";
pub const CATEGORY_ID: &str = "categoryId";
pub const BRAND: &str = "brand";
pub const PRICE: &str = "price";
pub const DISCOUNT_PRICE: &str = "discountPrice";
pub const STOCK: &str = "stock";
pub const STATUS: &str = "status";
pub const TAGS: &str = "tags";
pub const SIZES: &str = "sizes";
pub const COLORS: &str = "colors";
pub const DESCRIPTION: &str = "description";
pub const THUMBNAIL: &str = "thumbnail";

/// Fields that must be present and truthy to submit, in check order
pub const REQUIRED_FIELDS: &[&str] = &[
    TITLE,
    CATEGORY_ID,
    DESCRIPTION,
    PRICE,
    STOCK,
    STATUS,
    THUMBNAIL,
];

/// Fields that must not be negative
pub const NON_NEGATIVE_FIELDS: &[&str] = &[PRICE, STOCK, DISCOUNT_PRICE];

/// Comma-separated while edited, string lists once submitted
pub const LIST_FIELDS: &[&str] = &[TAGS, SIZES, COLORS];

/// Control type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Select,
    Textarea,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// One form control
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDefinition {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub placeholder: &'static str,
    pub auto_complete: Option<&'static str>,
    /// Static options for select controls
    pub options: Vec<SelectOption>,
}

impl FieldDefinition {
    fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            placeholder: "",
            auto_complete: None,
            options: Vec::new(),
        }
    }

    fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = placeholder;
        self
    }

    fn auto_complete(mut self, value: &'static str) -> Self {
        self.auto_complete = Some(value);
        self
    }

    fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    /// Whether the select options come from the category tree
    pub fn is_category_select(&self) -> bool {
        self.name == CATEGORY_ID
    }

    /// Whether the control offers the AI description action
    pub fn has_ai_action(&self) -> bool {
        self.name == DESCRIPTION
    }

    /// Whether the control should span the full form width
    pub fn is_full_width(&self) -> bool {
        self.kind == FieldKind::Textarea
    }
}

/// Default product form, in render order
pub fn product_form_controls() -> Vec<FieldDefinition> {
    let statuses = PRODUCT_STATUSES
        .iter()
        .map(|s| {
            let mut label = s.to_string();
            if let Some(first) = label.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            SelectOption::new(*s, label)
        })
        .collect();

    vec![
        FieldDefinition::new(TITLE, "Product Title", FieldKind::Text)
            .placeholder("Enter product title")
            .auto_complete("off"),
        FieldDefinition::new(CATEGORY_ID, "Category", FieldKind::Select)
            .placeholder("Select a category"),
        FieldDefinition::new(BRAND, "Brand", FieldKind::Text)
            .placeholder("Enter brand name")
            .auto_complete("organization"),
        FieldDefinition::new(PRICE, "Price", FieldKind::Number).placeholder("0.00"),
        FieldDefinition::new(DISCOUNT_PRICE, "Discount Price", FieldKind::Number)
            .placeholder("0.00"),
        FieldDefinition::new(STOCK, "Stock", FieldKind::Number).placeholder("0"),
        FieldDefinition::new(STATUS, "Status", FieldKind::Select)
            .placeholder("Select status")
            .options(statuses),
        FieldDefinition::new(TAGS, "Tags", FieldKind::Text)
            .placeholder("Comma separated, e.g. summer, cotton"),
        FieldDefinition::new(SIZES, "Sizes", FieldKind::Text)
            .placeholder("Comma separated, e.g. S, M, L"),
        FieldDefinition::new(COLORS, "Colors", FieldKind::Text)
            .placeholder("Comma separated, e.g. red, blue"),
        FieldDefinition::new(DESCRIPTION, "Description", FieldKind::Textarea)
            .placeholder("Describe the product"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controls_cover_required_fields() {
        let controls = product_form_controls();
        let names: Vec<_> = controls.iter().map(|c| c.name).collect();

        // The thumbnail has its own upload control
        for field in REQUIRED_FIELDS.iter().filter(|f| **f != THUMBNAIL) {
            assert!(names.contains(field), "missing control for {}", field);
        }
        assert!(!names.contains(&THUMBNAIL));
    }

    #[test]
    fn test_special_controls() {
        let controls = product_form_controls();
        let category = controls.iter().find(|c| c.is_category_select()).unwrap();
        assert_eq!(category.kind, FieldKind::Select);
        assert!(category.options.is_empty());

        let ai: Vec<_> = controls.iter().filter(|c| c.has_ai_action()).collect();
        assert_eq!(ai.len(), 1);
        assert!(ai[0].is_full_width());
    }

    #[test]
    fn test_status_options() {
        let controls = product_form_controls();
        let status = controls.iter().find(|c| c.name == STATUS).unwrap();
        assert_eq!(
            status.options,
            vec![
                SelectOption::new("active", "Active"),
                SelectOption::new("inactive", "Inactive"),
            ]
        );
    }
}
