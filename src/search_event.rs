//! The search event vocabulary shared with the input widgets.

use serde::{Deserialize, Serialize};

/// The kind of data a widget edits. Decides how the raw value is decoded and serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataKind {
    Text,
    Date,
    Number,
    Lookup,
    #[serde(rename = "option")]
    OptionSet,
    Checkbox,
}

/// The comparison a widget asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Equal,      // eq
    NotEqual,   // ne
    Contains,   // like
    BeginsWith, // begins-with
    EndsWith,   // ends-with
    Null,       // null
    NotNull,    // not-null
    Between,    // between
    In,         // in
    NotIn,      // not-in
}

impl Operator {
    /// The operator token written into a `condition` element.
    pub fn wire_token(self) -> &'static str {
        match self {
            Operator::Equal => "eq",
            Operator::NotEqual => "ne",
            Operator::Contains => "like",
            Operator::BeginsWith => "begins-with",
            Operator::EndsWith => "ends-with",
            Operator::Null => "null",
            Operator::NotNull => "not-null",
            Operator::Between => "between",
            Operator::In => "in",
            Operator::NotIn => "not-in",
        }
    }
}

/// Whether a notification sets or clears the criterion of its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationKind {
    Update,
    Remove,
}

/// A field-level change notification, exactly as a widget reports it.
///
/// `raw_value` is still encoded here; see [`crate::criterion::Criterion`] for the decoded form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEvent {
    pub owner_entity_name: String,
    #[serde(default)]
    pub parent_entity_name: String,
    pub field_name: String,
    pub data_kind: DataKind,
    pub operator: Operator,
    #[serde(default)]
    pub raw_value: String,
    pub mutation_kind: MutationKind,
    /// Absent when the widget has no opinion about the output columns.
    #[serde(default)]
    pub include_in_output: Option<bool>,
}

impl SearchEvent {
    /// An `Update` notification with no output flag.
    pub fn update(
        owner_entity_name: &str,
        field_name: &str,
        data_kind: DataKind,
        operator: Operator,
        raw_value: &str,
    ) -> Self {
        Self {
            owner_entity_name: owner_entity_name.to_string(),
            parent_entity_name: String::new(),
            field_name: field_name.to_string(),
            data_kind,
            operator,
            raw_value: raw_value.to_string(),
            mutation_kind: MutationKind::Update,
            include_in_output: None,
        }
    }

    /// A `Remove` notification with no output flag.
    pub fn remove(owner_entity_name: &str, field_name: &str, data_kind: DataKind) -> Self {
        Self {
            owner_entity_name: owner_entity_name.to_string(),
            parent_entity_name: String::new(),
            field_name: field_name.to_string(),
            data_kind,
            operator: Operator::Equal,
            raw_value: String::new(),
            mutation_kind: MutationKind::Remove,
            include_in_output: None,
        }
    }

    pub fn with_output(mut self, include: bool) -> Self {
        self.include_in_output = Some(include);
        self
    }

    pub fn with_parent(mut self, parent_entity_name: &str) -> Self {
        self.parent_entity_name = parent_entity_name.to_string();
        self
    }
}
