//! In-memory record store.
//!
//! A complete [`RecordStore`] backend holding every table in process memory.
//! It evaluates the same query vocabulary as the hosted store:
//!
//! - field projection, including expansion of registered reference fields
//! - `EqualTo`, `Contains` (case-insensitive) and `RelativeMatch` (`Today`)
//! - multi-key ordering and offset/limit paging
//! - per-record batch outcomes, with field errors for missing required fields
//!
//! Tables are created on first write; reading an unknown table yields no rows.

use crate::clock::{Clock, SystemClock};
use crate::query::{Operator, QueryParams, RelativeDate, SortDirection, WhereCondition};
use crate::reply::{BatchReply, DeleteReply, FieldError, RecordOutcome, Reply};
use crate::seed::Seed;
use crate::store::RecordStore;
use crate::value::{FieldValue, Reference, StorageRecord};
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use dental_types::RecordId;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, StorageRecord>,
}

impl Table {
    /// Next unused id, or `None` once the id space is exhausted.
    fn allocate_id(&mut self) -> Option<i64> {
        let highest = self.rows.keys().next_back().copied().unwrap_or(0);
        self.next_id = self.next_id.max(highest).checked_add(1)?;
        Some(self.next_id)
    }
}

#[derive(Clone, Debug)]
struct RequiredField {
    field: String,
    label: String,
}

/// Record store backed by process memory.
pub struct InMemoryRecordStore {
    tables: RwLock<HashMap<String, Table>>,
    // reference field name -> referenced table
    references: HashMap<String, String>,
    required: HashMap<String, Vec<RequiredField>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecordStore {
    /// Creates an empty store using the system clock.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            references: HashMap::new(),
            required: HashMap::new(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for relative-date matching.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Registers `field` as a reference into `target_table`.
    ///
    /// Registered references are expanded to `{Id, Name}` when a query's
    /// projection asks for it.
    pub fn with_reference(mut self, field: impl Into<String>, target_table: impl Into<String>) -> Self {
        self.references.insert(field.into(), target_table.into());
        self
    }

    /// Declares `field` as required on `table`.
    ///
    /// Creating a record without it, or patching it to an empty value, fails
    /// that record with a field error labelled `label`.
    pub fn with_required_field(
        mut self,
        table: impl Into<String>,
        field: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        self.required
            .entry(table.into())
            .or_default()
            .push(RequiredField {
                field: field.into(),
                label: label.into(),
            });
        self
    }

    /// Loads seed records.
    ///
    /// Records carrying an `Id` keep it; others are assigned the next free id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidSeed`] if two records of one table share an
    /// id or a record carries an id that is not positive.
    pub fn with_seed(mut self, seed: Seed) -> StoreResult<Self> {
        let tables = self.tables.get_mut();
        for (name, records) in seed.into_tables() {
            let table = tables.entry(name.clone()).or_default();
            for mut record in records {
                let id = match record.id() {
                    Some(id) if table.rows.contains_key(&id) => {
                        return Err(StoreError::InvalidSeed(format!(
                            "duplicate Id {id} in table {name}"
                        )));
                    }
                    Some(id) => RecordId::new(id)
                        .map_err(|e| StoreError::InvalidSeed(format!("{e} in table {name}")))?
                        .get(),
                    None => table.allocate_id().ok_or_else(|| {
                        StoreError::InvalidSeed(format!("record id space exhausted in table {name}"))
                    })?,
                };
                record.set_id(id);
                table.rows.insert(id, record);
            }
        }
        Ok(self)
    }

    /// Number of rows currently held in `table`.
    pub async fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map_or(0, |t| t.rows.len())
    }

    fn missing_required(&self, table: &str, record: &StorageRecord, patch: bool) -> Vec<FieldError> {
        let Some(required) = self.required.get(table) else {
            return Vec::new();
        };

        required
            .iter()
            .filter(|req| {
                let present = record.contains_key(&req.field);
                if patch && !present {
                    return false;
                }
                is_blank(record.get(&req.field))
            })
            .map(|req| FieldError {
                field_label: req.label.clone(),
                message: "is required".to_string(),
            })
            .collect()
    }

    fn matches(&self, record: &StorageRecord, condition: &WhereCondition) -> Result<bool, String> {
        let value = record.get(&condition.field_name);

        match condition.operator {
            Operator::EqualTo => Ok(condition
                .values
                .iter()
                .any(|expected| loosely_equal(value, expected))),
            Operator::Contains => {
                let Some(haystack) = value.and_then(FieldValue::to_plain_string) else {
                    return Ok(false);
                };
                let haystack = haystack.to_lowercase();
                Ok(condition.values.iter().any(|needle| {
                    needle
                        .to_plain_string()
                        .is_some_and(|n| haystack.contains(&n.to_lowercase()))
                }))
            }
            Operator::RelativeMatch => {
                let mut matched = false;
                for keyword in &condition.values {
                    let keyword = keyword.as_text().and_then(RelativeDate::from_keyword).ok_or_else(|| {
                        format!(
                            "Unsupported relative date value for {}: {:?}",
                            condition.field_name, keyword
                        )
                    })?;
                    let target = match keyword {
                        RelativeDate::Today => self.clock.today(),
                    };
                    matched |= value.and_then(date_of).is_some_and(|d| d == target);
                }
                Ok(matched)
            }
        }
    }

    fn project(
        &self,
        tables: &HashMap<String, Table>,
        record: &StorageRecord,
        params: &QueryParams,
    ) -> StorageRecord {
        if params.fields.is_empty() {
            return record.clone();
        }

        let mut projected = StorageRecord::new();
        if let Some(id) = record.id() {
            projected.set_id(id);
        }

        for selector in &params.fields {
            let Some(value) = record.get_raw(selector.name()) else {
                continue;
            };

            let expanded = selector.expansion().and_then(|display| {
                let target = self.references.get(selector.name())?;
                let id = value.reference_id()?;
                let referenced = tables.get(target)?.rows.get(&id)?;
                let name = referenced
                    .get(display)
                    .and_then(FieldValue::to_plain_string);
                Some(FieldValue::Reference(Reference { id, name }))
            });

            projected.insert(selector.name(), expanded.unwrap_or_else(|| value.clone()));
        }

        projected
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    fn backend_name(&self) -> &'static str {
        "in-memory"
    }

    async fn fetch_records(
        &self,
        table: &str,
        params: &QueryParams,
    ) -> StoreResult<Reply<Vec<StorageRecord>>> {
        let tables = self.tables.read().await;
        let Some(rows) = tables.get(table).map(|t| &t.rows) else {
            return Ok(Reply::Ok(Vec::new()));
        };

        let mut selected = Vec::new();
        for record in rows.values() {
            let mut keep = true;
            for condition in &params.conditions {
                match self.matches(record, condition) {
                    Ok(true) => {}
                    Ok(false) => {
                        keep = false;
                        break;
                    }
                    Err(message) => return Ok(Reply::rejected(message)),
                }
            }
            if keep {
                selected.push(record);
            }
        }

        if !params.order_by.is_empty() {
            selected.sort_by(|a, b| {
                for order in &params.order_by {
                    let ordering =
                        compare_values(a.get(&order.field_name), b.get(&order.field_name));
                    let ordering = match order.direction {
                        SortDirection::Ascending => ordering,
                        SortDirection::Descending => ordering.reverse(),
                    };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                Ordering::Equal
            });
        }

        let (offset, limit) = params
            .paging
            .map_or((0, usize::MAX), |p| (p.offset as usize, p.limit as usize));

        let records = selected
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|record| self.project(&tables, record, params))
            .collect();

        Ok(Reply::Ok(records))
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        params: &QueryParams,
    ) -> StoreResult<Reply<Option<StorageRecord>>> {
        let tables = self.tables.read().await;
        let record = tables
            .get(table)
            .and_then(|t| t.rows.get(&id.get()))
            .map(|record| self.project(&tables, record, params));
        Ok(Reply::Ok(record))
    }

    async fn create_records(
        &self,
        table: &str,
        records: Vec<StorageRecord>,
    ) -> StoreResult<BatchReply> {
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_owned()).or_default();

        let outcomes = records
            .into_iter()
            .map(|mut record| {
                let errors = self.missing_required(table, &record, false);
                if !errors.is_empty() {
                    return RecordOutcome::failed_with_errors(errors);
                }

                let Some(id) = rows.allocate_id() else {
                    tracing::warn!("in-memory store has no free id left in {table}");
                    return RecordOutcome::failed_with_message("record id space exhausted");
                };
                record.set_id(id);
                rows.rows.insert(id, record.clone());
                tracing::debug!("in-memory store created {table} record {id}");
                RecordOutcome::Succeeded(record)
            })
            .collect();

        Ok(Reply::Ok(outcomes))
    }

    async fn update_records(
        &self,
        table: &str,
        records: Vec<StorageRecord>,
    ) -> StoreResult<BatchReply> {
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_owned()).or_default();

        let outcomes = records
            .into_iter()
            .map(|patch| {
                let Some(id) = patch.id() else {
                    return RecordOutcome::failed_with_message("Record Id is required for update");
                };

                let errors = self.missing_required(table, &patch, true);
                if !errors.is_empty() {
                    return RecordOutcome::failed_with_errors(errors);
                }

                match rows.rows.get_mut(&id) {
                    Some(existing) => {
                        existing.merge(&patch);
                        RecordOutcome::Succeeded(existing.clone())
                    }
                    None => RecordOutcome::failed_with_message(format!(
                        "Record with Id {id} does not exist"
                    )),
                }
            })
            .collect();

        Ok(Reply::Ok(outcomes))
    }

    async fn delete_records(&self, table: &str, ids: &[RecordId]) -> StoreResult<DeleteReply> {
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_owned()).or_default();

        let outcomes = ids
            .iter()
            .map(|id| match rows.rows.remove(&id.get()) {
                Some(_) => RecordOutcome::Succeeded(*id),
                None => {
                    RecordOutcome::failed_with_message(format!("Record with Id {id} does not exist"))
                }
            })
            .collect();

        Ok(Reply::Ok(outcomes))
    }
}

fn is_blank(value: Option<&FieldValue>) -> bool {
    match value {
        None => true,
        Some(FieldValue::Text(s)) => s.trim().is_empty(),
        Some(v) => v.is_null(),
    }
}

fn loosely_equal(actual: Option<&FieldValue>, expected: &FieldValue) -> bool {
    let Some(actual) = actual else {
        return expected.is_null();
    };

    match (actual, expected) {
        (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
        (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
        (FieldValue::Reference(_) | FieldValue::Integer(_), _) => {
            actual.reference_id().is_some() && actual.reference_id() == expected.reference_id()
        }
        (FieldValue::Float(a), _) => expected.as_f64() == Some(*a),
        (FieldValue::Text(_), _) => actual.as_f64().is_some() && actual.as_f64() == expected.as_f64(),
        _ => false,
    }
}

/// Calendar date of a date or date-time text value (`YYYY-MM-DD...`).
fn date_of(value: &FieldValue) -> Option<NaiveDate> {
    let text = value.as_text()?;
    let prefix = text.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(FieldValue::Text(x)), Some(FieldValue::Text(y))) => x.cmp(y),
        (Some(x), Some(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => x.to_plain_string().cmp(&y.to_plain_string()),
        },
    }
}
