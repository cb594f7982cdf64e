//! Query descriptors in the record store's vocabulary.
//!
//! The serialised form matches what the hosted store accepts:
//!
//! ```text
//! {
//!   "fields":     [{"field": {"Name": "date_c"}}, {"field": {"Name": "patient_id_c"}, "referenceField": {"field": {"Name": "Name"}}}],
//!   "where":      [{"FieldName": "patient_id_c", "Operator": "EqualTo", "Values": [12]}],
//!   "orderBy":    [{"fieldName": "date_c", "sorttype": "DESC"}],
//!   "pagingInfo": {"limit": 10, "offset": 0}
//! }
//! ```
//!
//! Optional parts are omitted entirely when unused.

use crate::value::FieldValue;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct FieldName {
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct ReferenceSelector {
    field: FieldName,
}

/// One entry of the field projection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelector {
    field: FieldName,

    #[serde(
        rename = "referenceField",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    reference_field: Option<ReferenceSelector>,
}

impl FieldSelector {
    /// Selects a field as stored.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            field: FieldName { name: name.into() },
            reference_field: None,
        }
    }

    /// Selects a reference field and asks the store to expand it with the
    /// referenced record's `display_field`.
    pub fn expanded(name: impl Into<String>, display_field: impl Into<String>) -> Self {
        Self {
            field: FieldName { name: name.into() },
            reference_field: Some(ReferenceSelector {
                field: FieldName {
                    name: display_field.into(),
                },
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.field.name
    }

    /// Display field requested for expansion, if any.
    pub fn expansion(&self) -> Option<&str> {
        self.reference_field.as_ref().map(|r| r.field.name.as_str())
    }
}

/// Comparison applied by a [`WhereCondition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    EqualTo,
    /// Case-insensitive substring match.
    Contains,
    /// Date match against a relative keyword such as `Today`.
    RelativeMatch,
}

/// Relative date keywords understood by [`Operator::RelativeMatch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelativeDate {
    Today,
}

impl RelativeDate {
    pub fn as_keyword(self) -> &'static str {
        match self {
            RelativeDate::Today => "Today",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "Today" => Some(RelativeDate::Today),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WhereCondition {
    #[serde(rename = "FieldName")]
    pub field_name: String,

    #[serde(rename = "Operator")]
    pub operator: Operator,

    #[serde(rename = "Values")]
    pub values: Vec<FieldValue>,
}

impl WhereCondition {
    pub fn new(field_name: impl Into<String>, operator: Operator, value: FieldValue) -> Self {
        Self {
            field_name: field_name.into(),
            operator,
            values: vec![value],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "ASC")]
    Ascending,
    #[serde(rename = "DESC")]
    Descending,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    #[serde(rename = "fieldName")]
    pub field_name: String,

    #[serde(rename = "sorttype")]
    pub direction: SortDirection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingInfo {
    pub limit: u32,
    pub offset: u32,
}

/// Complete query descriptor for `fetch_records` / `get_record_by_id`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub fields: Vec<FieldSelector>,

    #[serde(rename = "where", default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<WhereCondition>,

    #[serde(rename = "orderBy", default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,

    #[serde(rename = "pagingInfo", default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<PagingInfo>,
}
