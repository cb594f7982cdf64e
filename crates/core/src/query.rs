//! Builds record-store query descriptors from domain-level parameters.

use crate::constants::PATIENT_REFERENCE_FIELD;
use crate::mapper::{Coercion, EntityKind};
use dental_types::RecordId;
use record_store::value::{ID_FIELD, NAME_FIELD};
use record_store::{
    FieldSelector, FieldValue, Operator, OrderBy, PagingInfo, QueryParams, RelativeDate,
    SortDirection, WhereCondition,
};

/// Domain-level query parameters.
///
/// Only what is set ends up in the built [`QueryParams`]; an empty query
/// selects every record with the entity's full projection.
#[derive(Clone, Debug, Default)]
pub struct RecordQuery {
    expand_references: bool,
    conditions: Vec<WhereCondition>,
    order_by: Vec<OrderBy>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl RecordQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the store to expand reference fields with the referenced record's `Name`.
    pub fn expand_references(mut self) -> Self {
        self.expand_references = true;
        self
    }

    /// Restricts to records belonging to `patient_id`.
    pub fn patient(self, patient_id: RecordId) -> Self {
        self.field_equals(PATIENT_REFERENCE_FIELD, patient_id)
    }

    pub fn field_equals(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.conditions
            .push(WhereCondition::new(field, Operator::EqualTo, value.into()));
        self
    }

    pub fn on_relative_date(mut self, field: &str, date: RelativeDate) -> Self {
        self.conditions.push(WhereCondition::new(
            field,
            Operator::RelativeMatch,
            FieldValue::from(date.as_keyword()),
        ));
        self
    }

    /// Case-insensitive substring search on `Name`. A blank term adds nothing.
    pub fn name_contains(mut self, term: &str) -> Self {
        let term = term.trim();
        if !term.is_empty() {
            self.conditions
                .push(WhereCondition::new(NAME_FIELD, Operator::Contains, term.into()));
        }
        self
    }

    pub fn sort_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.order_by.push(OrderBy {
            field_name: field.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Produces the store descriptor for `kind`.
    pub fn build(self, kind: EntityKind) -> QueryParams {
        let fields = kind
            .fields()
            .iter()
            .filter(|spec| spec.storage_key != ID_FIELD)
            .map(|spec| {
                if self.expand_references && spec.coercion == Coercion::Reference {
                    FieldSelector::expanded(spec.storage_key, NAME_FIELD)
                } else {
                    FieldSelector::plain(spec.storage_key)
                }
            })
            .collect();

        let paging = match (self.limit, self.offset) {
            (None, None) => None,
            (limit, offset) => Some(PagingInfo {
                limit: limit.unwrap_or(u32::MAX),
                offset: offset.unwrap_or(0),
            }),
        };

        QueryParams {
            fields,
            conditions: self.conditions,
            order_by: self.order_by,
            paging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_query_only_projects() {
        let params = RecordQuery::new().build(EntityKind::ProcedureDefinition);
        let value = serde_json::to_value(&params).unwrap();

        assert_eq!(
            value,
            json!({
                "fields": [
                    {"field": {"Name": "Name"}},
                    {"field": {"Name": "category_c"}},
                    {"field": {"Name": "description_c"}},
                    {"field": {"Name": "cost_c"}},
                    {"field": {"Name": "insurance_rate_c"}},
                    {"field": {"Name": "duration_c"}}
                ]
            })
        );
    }

    #[test]
    fn expansion_applies_to_reference_fields_only() {
        let params = RecordQuery::new()
            .expand_references()
            .build(EntityKind::Appointment);

        let expanded: Vec<_> = params
            .fields
            .iter()
            .filter(|f| f.expansion().is_some())
            .map(|f| f.name())
            .collect();
        assert_eq!(expanded, vec!["patient_id_c"]);
    }

    #[test]
    fn patient_filter_compares_integer_ids() {
        let id = RecordId::new(12).unwrap();
        let params = RecordQuery::new().patient(id).build(EntityKind::Treatment);

        assert_eq!(
            params.conditions,
            vec![WhereCondition::new(
                "patient_id_c",
                Operator::EqualTo,
                FieldValue::Integer(12)
            )]
        );
        assert!(params.fields.iter().all(|f| f.expansion().is_none()));
    }

    #[test]
    fn blank_search_is_a_no_op() {
        let params = RecordQuery::new()
            .name_contains("   ")
            .build(EntityKind::Patient);
        assert!(params.conditions.is_empty());
    }

    #[test]
    fn recent_treatments_shape() {
        let params = RecordQuery::new()
            .sort_by("date_c", SortDirection::Descending)
            .limit(10)
            .build(EntityKind::Treatment);
        let value = serde_json::to_value(&params).unwrap();

        assert_eq!(value["orderBy"], json!([{"fieldName": "date_c", "sorttype": "DESC"}]));
        assert_eq!(value["pagingInfo"], json!({"limit": 10, "offset": 0}));
        assert!(value.get("where").is_none());
    }

    #[test]
    fn relative_date_uses_keyword() {
        let params = RecordQuery::new()
            .on_relative_date("date_time_c", RelativeDate::Today)
            .build(EntityKind::Appointment);
        let value = serde_json::to_value(&params).unwrap();

        assert_eq!(
            value["where"],
            json!([{"FieldName": "date_time_c", "Operator": "RelativeMatch", "Values": ["Today"]}])
        );
    }
}
