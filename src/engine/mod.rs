mod validation;

pub use validation::{PlaceholderValidator, ValidationRequest, validate_batch_get_shape, validate_batch_write_shape};

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::batch::{
    BatchExecutor, BatchGetRequest, BatchGetResult, BatchWriteItem, BatchWriteRequest, BatchWriteResult,
};
use crate::condition::attr;
use crate::error::{TableError, TransactionCancelReason};
use crate::index::{GsiBuilder, LsiBuilder};
use crate::interpreter::{DispatchStrategy, InterpreterRegistry, MatchCallback, UpdateCallback};
use crate::query::QueryResult;
use crate::stream::{StreamEvent, StreamLog, ViewType};
use crate::table::{DeleteRequest, GetRequest, PutRequest, QueryRequest, ScanRequest, Table, UpdateRequest};
use crate::transaction::{
    TransactGetRequest, TransactGetResult, TransactWriteItem, TransactWriteRequest,
    TransactionExecutor, TransactionFailureReason,
};
use crate::types::{AttributeValue, Item, KeySchema, PrimaryKey, ReturnValue, WriteResult};

/// Errors decorated with the boundary error code a wire adapter would map to
/// an HTTP status. `TableError` covers engine-internal failures; the
/// remaining variants are facade-level concerns (resource lifecycle, forced
/// failures) that never originate inside `Table`.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("table already exists: {0}")]
    TableAlreadyExists(String),

    #[error("table {0} is not active")]
    TableNotActive(String),

    #[error("injected internal server error")]
    InjectedInternalServer,

    #[error("deprecated operation")]
    Deprecated,
}

impl EngineError {
    /// Boundary error code a wire adapter would surface to callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Table(TableError::Validation(_)) => "ValidationException",
            Self::Table(TableError::InvalidKey(_)) => "ValidationException",
            Self::Table(TableError::ConditionFailed) => "ConditionalCheckFailedException",
            Self::Table(TableError::TableNotFound(_)) => "ResourceNotFoundException",
            Self::Table(TableError::TableAlreadyExists(_)) => "ResourceInUseException",
            Self::Table(TableError::IndexNotFound(_)) => "ResourceNotFoundException",
            Self::Table(TableError::ThroughputExceeded) => "ProvisionedThroughputExceededException",
            Self::Table(TableError::Internal(_)) => "InternalServerError",
            Self::Table(TableError::TransactionCancelled(_)) => "TransactionCanceledException",
            Self::Table(_) => "ValidationException",
            Self::TableNotFound(_) => "ResourceNotFoundException",
            Self::TableAlreadyExists(_) => "ResourceInUseException",
            Self::TableNotActive(_) => "ResourceNotFoundException",
            Self::InjectedInternalServer => "InternalServerError",
            Self::Deprecated => "InternalServerError",
        }
    }

    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Table(e) if e.is_retriable()) || matches!(self, Self::InjectedInternalServer)
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableState {
    Creating,
    #[default]
    Active,
    Updating,
    Deleting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingMode {
    Provisioned { read_capacity_units: u64, write_capacity_units: u64 },
    PayPerRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    #[default]
    None,
    InternalServer,
    Deprecated,
}

#[derive(Debug, Clone, Copy)]
pub struct StreamSettings {
    pub enabled: bool,
    pub view_type: ViewType,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self { enabled: false, view_type: ViewType::NewAndOldImages }
    }
}

pub struct CreateTableSpec {
    pub name: String,
    pub schema: KeySchema,
    pub billing_mode: BillingMode,
    pub gsis: Vec<GsiBuilder>,
    pub lsis: Vec<LsiBuilder>,
    pub stream: Option<StreamSettings>,
}

impl CreateTableSpec {
    pub fn new(name: impl Into<String>, schema: KeySchema) -> Self {
        Self {
            name: name.into(),
            schema,
            billing_mode: BillingMode::PayPerRequest,
            gsis: Vec::new(),
            lsis: Vec::new(),
            stream: None,
        }
    }

    pub fn billing_mode(mut self, mode: BillingMode) -> Self {
        self.billing_mode = mode;
        self
    }

    pub fn with_gsi(mut self, gsi: GsiBuilder) -> Self {
        self.gsis.push(gsi);
        self
    }

    pub fn with_lsi(mut self, lsi: LsiBuilder) -> Self {
        self.lsis.push(lsi);
        self
    }

    pub fn with_stream(mut self, view_type: ViewType) -> Self {
        self.stream = Some(StreamSettings { enabled: true, view_type });
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TableDescription {
    pub state: TableState,
    pub item_count: usize,
    pub billing_mode: BillingMode,
}

struct TableEntry {
    table: Table,
    state: TableState,
    billing_mode: BillingMode,
    stream: StreamSettings,
    stream_log: StreamLog,
}

impl TableEntry {
    fn require_active(&self, name: &str) -> EngineResult<()> {
        if self.state == TableState::Active {
            Ok(())
        } else {
            Err(EngineError::TableNotActive(name.to_string()))
        }
    }

    fn append_stream(&mut self, name: &str, event: StreamEvent, old: Option<Item>, new: Option<Item>) {
        if self.stream.enabled {
            self.stream_log.append(name, event, self.stream.view_type, old, new);
        }
    }
}

/// Single-mutex facade in front of the table engine: table lifecycle,
/// failure injection, and stream append all happen here so `Table` itself
/// stays a pure data structure.
pub struct Engine {
    tables: Mutex<HashMap<String, TableEntry>>,
    failure_mode: Mutex<FailureMode>,
    /// Native escape hatch consulted by `put_item`/`update_item` ahead of the
    /// grammar evaluator, per `dispatch_strategy`. Registrations are keyed on
    /// the exact `(table, expression text)` pair a caller built its request
    /// with via `*_expression`/`from_expression` — a request built from a
    /// typed `Condition`/`UpdateExpression` has no string to key on and so
    /// never reaches the registry.
    interpreter: Mutex<InterpreterRegistry>,
    dispatch_strategy: Mutex<DispatchStrategy>,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            failure_mode: Mutex::new(FailureMode::None),
            interpreter: Mutex::new(InterpreterRegistry::new()),
            dispatch_strategy: Mutex::new(DispatchStrategy::default()),
        }
    }

    pub fn set_failure_mode(&self, mode: FailureMode) {
        info!(?mode, "failure mode updated");
        *self.failure_mode.lock().unwrap() = mode;
    }

    pub fn set_dispatch_strategy(&self, strategy: DispatchStrategy) {
        debug!(?strategy, "dispatch strategy updated");
        *self.dispatch_strategy.lock().unwrap() = strategy;
    }

    /// Registers a native callback to try against `(table, expression)`
    /// before the grammar evaluator runs a `condition_expression`/
    /// `filter_expression`-built condition with the same text.
    pub fn register_match_interpreter(
        &self,
        table: impl Into<String>,
        expression: impl Into<String>,
        callback: MatchCallback,
    ) {
        self.interpreter.lock().unwrap().register_match(table, expression, callback);
    }

    /// Registers a native callback to try against `(table, expression)`
    /// before the grammar evaluator runs an `UpdateExpression` built by
    /// `UpdateRequest::from_expression` with the same text.
    pub fn register_update_interpreter(
        &self,
        table: impl Into<String>,
        expression: impl Into<String>,
        callback: UpdateCallback,
    ) {
        self.interpreter.lock().unwrap().register_update(table, expression, callback);
    }

    /// Consults the registry for `source` when dispatch is `NativeFirst`.
    /// `Some(bool)` means the registry decided the outcome and the typed
    /// condition (if any) should be skipped; `None` means fall through.
    fn dispatch_condition(
        &self,
        table_name: &str,
        source: &Option<(String, HashMap<String, AttributeValue>)>,
        check_item: &Item,
    ) -> Option<bool> {
        let (expr, values) = source.as_ref()?;
        if *self.dispatch_strategy.lock().unwrap() != DispatchStrategy::NativeFirst {
            return None;
        }
        self.interpreter.lock().unwrap().dispatch_match(table_name, expr, check_item, values)
    }

    fn check_failure(&self) -> EngineResult<()> {
        match *self.failure_mode.lock().unwrap() {
            FailureMode::None => Ok(()),
            FailureMode::InternalServer => {
                warn!("short-circuiting on injected internal_server failure");
                Err(EngineError::InjectedInternalServer)
            }
            FailureMode::Deprecated => {
                warn!("short-circuiting on injected deprecated failure");
                Err(EngineError::Deprecated)
            }
        }
    }

    pub fn create_table(&self, spec: CreateTableSpec) -> EngineResult<TableDescription> {
        self.check_failure()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.contains_key(&spec.name) {
            return Err(EngineError::TableAlreadyExists(spec.name));
        }

        let mut table = Table::new(spec.name.clone(), spec.schema);
        for gsi in spec.gsis {
            table.add_gsi(gsi);
        }
        for lsi in spec.lsis {
            table.add_lsi(lsi);
        }

        let entry = TableEntry {
            table,
            state: TableState::Active,
            billing_mode: spec.billing_mode,
            stream: spec.stream.unwrap_or_default(),
            stream_log: StreamLog::new(),
        };
        let description = TableDescription {
            state: entry.state,
            item_count: 0,
            billing_mode: entry.billing_mode,
        };
        info!(table = %spec.name, "table NONEXISTENT -> ACTIVE");
        tables.insert(spec.name, entry);
        Ok(description)
    }

    pub fn delete_table(&self, name: &str) -> EngineResult<TableDescription> {
        self.check_failure()?;
        let mut tables = self.tables.lock().unwrap();
        let entry = tables.remove(name).ok_or_else(|| EngineError::TableNotFound(name.to_string()))?;
        info!(table = %name, "table ACTIVE -> NONEXISTENT");
        Ok(TableDescription {
            state: TableState::Deleting,
            item_count: entry.table.len(),
            billing_mode: entry.billing_mode,
        })
    }

    pub fn describe_table(&self, name: &str) -> EngineResult<TableDescription> {
        let tables = self.tables.lock().unwrap();
        let entry = tables.get(name).ok_or_else(|| EngineError::TableNotFound(name.to_string()))?;
        Ok(TableDescription {
            state: entry.state,
            item_count: entry.table.len(),
            billing_mode: entry.billing_mode,
        })
    }

    /// Adds GSIs to an existing table. Transition is synchronous: ACTIVE ->
    /// UPDATING -> ACTIVE, with no observable intermediate state for callers
    /// since the whole thing happens under the one lock.
    pub fn update_table(&self, name: &str, new_gsis: Vec<GsiBuilder>) -> EngineResult<TableDescription> {
        self.check_failure()?;
        let mut tables = self.tables.lock().unwrap();
        let entry = tables.get_mut(name).ok_or_else(|| EngineError::TableNotFound(name.to_string()))?;
        entry.require_active(name)?;

        entry.state = TableState::Updating;
        debug!(table = %name, "table ACTIVE -> UPDATING");
        for gsi in new_gsis {
            entry.table.add_gsi(gsi);
        }
        entry.state = TableState::Active;
        info!(table = %name, "table UPDATING -> ACTIVE");

        Ok(TableDescription {
            state: entry.state,
            item_count: entry.table.len(),
            billing_mode: entry.billing_mode,
        })
    }

    pub fn put_item(&self, table_name: &str, request: PutRequest) -> EngineResult<WriteResult> {
        self.check_failure()?;
        let mut tables = self.tables.lock().unwrap();
        let entry = tables.get_mut(table_name).ok_or_else(|| EngineError::TableNotFound(table_name.to_string()))?;
        entry.require_active(table_name)?;

        let schema = entry.table.schema().clone();
        let key = request.item.extract_key(&schema);
        let old_image = match &key {
            Some(k) => entry.table.get_item(k)?,
            None => None,
        };
        let new_image = request.item.clone();

        let mut condition = request.condition;
        let mut condition_decided = None;
        if request.if_not_exists {
            let guard = attr(schema.pk_name()).not_exists();
            condition = Some(match condition {
                Some(existing) => existing.and(guard),
                None => guard,
            });
        } else {
            let check_item = old_image.clone().unwrap_or_default();
            condition_decided = self.dispatch_condition(table_name, &request.condition_source, &check_item);
        }

        let result = match condition_decided {
            Some(false) => return Err(EngineError::Table(TableError::ConditionFailed)),
            Some(true) => entry.table.put_item_with_return(request.item, request.return_value)?,
            None => match condition {
                Some(cond) => entry.table.put_item_with_condition_and_return(request.item, cond, request.return_value)?,
                None => entry.table.put_item_with_return(request.item, request.return_value)?,
            },
        };
        entry.append_stream(
            table_name,
            if old_image.is_some() { StreamEvent::Modify } else { StreamEvent::Insert },
            old_image,
            Some(new_image),
        );
        debug!(table = %table_name, op = "put_item", "applied");
        Ok(result)
    }

    pub fn get_item(&self, table_name: &str, request: GetRequest) -> EngineResult<Option<Item>> {
        let tables = self.tables.lock().unwrap();
        let entry = tables.get(table_name).ok_or_else(|| EngineError::TableNotFound(table_name.to_string()))?;
        Ok(entry.table.get_item(&request.key)?)
    }

    pub fn update_item(&self, table_name: &str, request: UpdateRequest) -> EngineResult<WriteResult> {
        self.check_failure()?;
        let mut tables = self.tables.lock().unwrap();
        let entry = tables.get_mut(table_name).ok_or_else(|| EngineError::TableNotFound(table_name.to_string()))?;
        entry.require_active(table_name)?;

        let old_image = entry.table.get_item(&request.key)?;
        let check_item = old_image.clone().unwrap_or_default();
        let condition_decided = self.dispatch_condition(table_name, &request.condition_source, &check_item);
        if condition_decided == Some(false) {
            return Err(EngineError::Table(TableError::ConditionFailed));
        }
        let condition = if condition_decided == Some(true) { None } else { request.condition };

        let native_update = match (&request.update_source, &old_image) {
            (Some((expr, values)), Some(existing))
                if *self.dispatch_strategy.lock().unwrap() == DispatchStrategy::NativeFirst =>
            {
                let mut candidate = existing.clone();
                let handled =
                    self.interpreter.lock().unwrap().dispatch_update(table_name, expr, &mut candidate, values);
                handled.then_some(candidate)
            }
            _ => None,
        };

        let result = if let Some(new_item) = native_update {
            let new_key = new_item.extract_key(entry.table.schema()).ok_or_else(|| {
                EngineError::Table(TableError::UpdateError("update removed key attributes".to_string()))
            })?;
            if new_key != request.key {
                return Err(EngineError::Table(TableError::UpdateError(
                    "cannot modify key attributes".to_string(),
                )));
            }
            let old = entry.table.put_item(new_item.clone())?;
            WriteResult {
                attributes: match request.return_value {
                    ReturnValue::AllNew => Some(new_item),
                    ReturnValue::AllOld => old,
                    ReturnValue::None => None,
                },
                was_update: true,
            }
        } else {
            match condition {
                Some(cond) => entry.table.update_item_with_condition_and_return(
                    &request.key,
                    request.expression,
                    cond,
                    request.return_value,
                )?,
                None => entry.table.update_item_with_return(&request.key, request.expression, request.return_value)?,
            }
        };
        let new_image = entry.table.get_item(&request.key)?;
        entry.append_stream(
            table_name,
            if old_image.is_some() { StreamEvent::Modify } else { StreamEvent::Insert },
            old_image,
            new_image,
        );
        debug!(table = %table_name, op = "update_item", "applied");
        Ok(result)
    }

    pub fn delete_item(&self, table_name: &str, request: DeleteRequest) -> EngineResult<WriteResult> {
        self.check_failure()?;
        let mut tables = self.tables.lock().unwrap();
        let entry = tables.get_mut(table_name).ok_or_else(|| EngineError::TableNotFound(table_name.to_string()))?;
        entry.require_active(table_name)?;

        let result = match request.condition {
            Some(cond) => entry.table.delete_item_with_condition_and_return(&request.key, cond, request.return_value)?,
            None => entry.table.delete_item_with_return(&request.key, request.return_value)?,
        };
        entry.append_stream(table_name, StreamEvent::Remove, result.attributes.clone(), None);
        debug!(table = %table_name, op = "delete_item", "applied");
        Ok(result)
    }

    /// Applies every sub-request in one pass. Per-item failures land in
    /// `unprocessed_items` (retriable, mirroring the hosted service's own
    /// throttling behavior); anything else aborts the whole call.
    pub fn batch_write_item(&self, table_name: &str, request: BatchWriteRequest) -> EngineResult<BatchWriteResult> {
        self.check_failure()?;
        validate_batch_write_shape(request.len())?;

        let mut tables = self.tables.lock().unwrap();
        let entry = tables.get_mut(table_name).ok_or_else(|| EngineError::TableNotFound(table_name.to_string()))?;
        entry.require_active(table_name)?;

        let schema = entry.table.schema().clone();
        let mut puts = Vec::new();
        let mut deletes = Vec::new();
        for item in request.items {
            match item {
                BatchWriteItem::Put { item } => puts.push(item),
                BatchWriteItem::Delete { key } => deletes.push(key),
            }
        }

        let put_old_images: Vec<Option<Item>> = puts
            .iter()
            .map(|item| match item.extract_key(&schema) {
                Some(k) => entry.table.get_item(&k).unwrap_or(None),
                None => None,
            })
            .collect();
        let delete_old_images: Vec<Option<Item>> =
            deletes.iter().map(|k| entry.table.get_item(k).unwrap_or(None)).collect();

        let executor = BatchExecutor::new();
        let mut result = BatchWriteResult::new();

        if !puts.is_empty() {
            let put_result = executor.execute_put(puts.clone(), &schema, |i| entry.table.put_item(i).map(|_| ()))?;
            let failed_keys: Vec<String> = put_result
                .unprocessed_items
                .iter()
                .filter_map(|u| match u {
                    BatchWriteItem::Put { item } => item.extract_key(&schema).map(|k| k.to_storage_key()),
                    _ => None,
                })
                .collect();
            for (item, old_image) in puts.into_iter().zip(put_old_images) {
                let succeeded = item
                    .extract_key(&schema)
                    .map(|k| !failed_keys.contains(&k.to_storage_key()))
                    .unwrap_or(false);
                if succeeded {
                    entry.append_stream(
                        table_name,
                        if old_image.is_some() { StreamEvent::Modify } else { StreamEvent::Insert },
                        old_image,
                        Some(item),
                    );
                }
            }
            result.processed_count += put_result.processed_count;
            result.unprocessed_items.extend(put_result.unprocessed_items);
        }

        if !deletes.is_empty() {
            let delete_result = executor.execute_delete(deletes.clone(), |k| entry.table.delete_item(k).map(|_| ()))?;
            let failed_keys: Vec<String> = delete_result
                .unprocessed_items
                .iter()
                .filter_map(|u| match u {
                    BatchWriteItem::Delete { key } => Some(key.to_storage_key()),
                    _ => None,
                })
                .collect();
            for (key, old_image) in deletes.into_iter().zip(delete_old_images) {
                if !failed_keys.contains(&key.to_storage_key()) {
                    entry.append_stream(table_name, StreamEvent::Remove, old_image, None);
                }
            }
            result.processed_count += delete_result.processed_count;
            result.unprocessed_items.extend(delete_result.unprocessed_items);
        }

        debug!(table = %table_name, op = "batch_write_item", processed = result.processed_count, "applied");
        Ok(result)
    }

    pub fn batch_get_item(&self, table_name: &str, request: BatchGetRequest) -> EngineResult<BatchGetResult> {
        self.check_failure()?;
        validate_batch_get_shape(request.len())?;

        let tables = self.tables.lock().unwrap();
        let entry = tables.get(table_name).ok_or_else(|| EngineError::TableNotFound(table_name.to_string()))?;
        let executor = BatchExecutor::new();
        Ok(executor.execute_get(request.keys, |k| entry.table.get_item(k))?)
    }

    pub fn query(&self, table_name: &str, request: QueryRequest) -> EngineResult<QueryResult> {
        let tables = self.tables.lock().unwrap();
        let entry = tables.get(table_name).ok_or_else(|| EngineError::TableNotFound(table_name.to_string()))?;
        let result = match request.filter {
            Some(filter) => entry.table.query_with_filter_and_options(request.key_condition, filter, request.options)?,
            None => entry.table.query_with_options(request.key_condition, request.options)?,
        };
        Ok(result)
    }

    pub fn scan(&self, table_name: &str, request: ScanRequest) -> EngineResult<QueryResult> {
        let tables = self.tables.lock().unwrap();
        let entry = tables.get(table_name).ok_or_else(|| EngineError::TableNotFound(table_name.to_string()))?;
        Ok(entry.table.scan_with_request(request)?)
    }

    pub fn stream_records(&self, table_name: &str) -> EngineResult<Vec<crate::stream::StreamRecord>> {
        let tables = self.tables.lock().unwrap();
        let entry = tables.get(table_name).ok_or_else(|| EngineError::TableNotFound(table_name.to_string()))?;
        Ok(entry.stream_log.records().to_vec())
    }

    /// Validates every item against current state before applying any of
    /// them, so the transaction either lands in full or leaves storage
    /// untouched. `TransactionExecutor::execute_write` expects its three
    /// callbacks to coexist (one `Fn`, two `FnMut`), which only works against
    /// a `RefCell`-backed table as in its own tests; against the engine's
    /// plain `&mut Table` the read and write callbacks can't be alive at
    /// once, so validation is delegated to the executor and the apply step
    /// is replayed here directly against `entry.table`.
    pub fn transact_write_items(&self, table_name: &str, request: TransactWriteRequest) -> EngineResult<()> {
        self.check_failure()?;
        let mut tables = self.tables.lock().unwrap();
        let entry = tables.get_mut(table_name).ok_or_else(|| EngineError::TableNotFound(table_name.to_string()))?;
        entry.require_active(table_name)?;

        let schema = entry.table.schema().clone();
        let executor = TransactionExecutor::new();
        let items = request.items;

        executor
            .validate_write(&items, &schema, |k| entry.table.get_item(k))
            .map_err(|reason| EngineError::Table(TableError::TransactionCancelled(vec![map_cancel_reason(&reason)])))?;

        for item in items {
            match item {
                TransactWriteItem::Put { item, .. } => {
                    let key = item.extract_key(&schema);
                    let old_image = match &key {
                        Some(k) => entry.table.get_item(k)?,
                        None => None,
                    };
                    let new_image = item.clone();
                    entry.table.put_item(item)?;
                    entry.append_stream(
                        table_name,
                        if old_image.is_some() { StreamEvent::Modify } else { StreamEvent::Insert },
                        old_image,
                        Some(new_image),
                    );
                }
                TransactWriteItem::Update { key, expression, .. } => {
                    let old_image = entry.table.get_item(&key)?;
                    entry.table.update_item(&key, expression)?;
                    let new_image = entry.table.get_item(&key)?;
                    entry.append_stream(table_name, StreamEvent::Modify, old_image, new_image);
                }
                TransactWriteItem::Delete { key, .. } => {
                    let old_image = entry.table.delete_item(&key)?;
                    entry.append_stream(table_name, StreamEvent::Remove, old_image, None);
                }
                TransactWriteItem::ConditionCheck { .. } => {}
            }
        }

        debug!(table = %table_name, op = "transact_write_items", "applied");
        Ok(())
    }

    pub fn transact_get_items(&self, table_name: &str, request: TransactGetRequest) -> EngineResult<TransactGetResult> {
        self.check_failure()?;
        let tables = self.tables.lock().unwrap();
        let entry = tables.get(table_name).ok_or_else(|| EngineError::TableNotFound(table_name.to_string()))?;
        let executor = TransactionExecutor::new();
        Ok(executor.execute_get(&request.items, |k| entry.table.get_item(k))?)
    }
}

fn map_cancel_reason(reason: &TransactionFailureReason) -> TransactionCancelReason {
    match reason {
        TransactionFailureReason::ConditionCheckFailed { .. } => TransactionCancelReason::ConditionalCheckFailed,
        TransactionFailureReason::ItemNotFound { .. } => TransactionCancelReason::ItemNotFound,
        TransactionFailureReason::DuplicateItem { .. } => TransactionCancelReason::DuplicateRequest,
        TransactionFailureReason::KeyModification { .. } => TransactionCancelReason::ValidationError,
        TransactionFailureReason::InvalidKey { .. } => TransactionCancelReason::ValidationError,
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
