use std::collections::BTreeMap;

use crate::condition::{Condition, evaluate};
use crate::error::{StorageError, TableError, TableResult};
use crate::index::{GlobalSecondaryIndex, GsiBuilder, LocalSecondaryIndex, LsiBuilder};
use crate::query::{KeyCondition, QueryExecutor, QueryOptions, QueryResult};
use crate::storage::{MemoryStorage, Storage, StorageExt};
use crate::table::request::{QueryRequest, ScanRequest};
use crate::types::{
    AttributeValue, Item, KeyAttribute, KeySchema, KeyValidationError, PrimaryKey, ReturnValue,
    WriteResult, decode, encode,
};
use crate::update::{UpdateExecutor, UpdateExpression};

#[derive(Debug)]
pub struct Table {
    name: String,
    schema: KeySchema,
    storage: MemoryStorage,
    gsis: BTreeMap<String, GlobalSecondaryIndex>,
    lsis: BTreeMap<String, LocalSecondaryIndex>,
}

impl Table {
    pub fn new(name: impl Into<String>, schema: KeySchema) -> Self {
        Self {
            name: name.into(),
            schema,
            storage: MemoryStorage::new(),
            gsis: BTreeMap::new(),
            lsis: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn schema(&self) -> &KeySchema {
        &self.schema
    }
    pub fn len(&self) -> usize {
        self.storage.len()
    }
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
    pub fn clear(&mut self) {
        self.storage.clear();
        for gsi in self.gsis.values_mut() {
            *gsi = GlobalSecondaryIndex::new(
                gsi.name(),
                gsi.schema().clone(),
                gsi.projection().clone(),
                self.schema.clone(),
            );
        }
        for lsi in self.lsis.values_mut() {
            *lsi = LocalSecondaryIndex::new(
                lsi.name(),
                KeyAttribute::new(lsi.sort_key_name(), lsi.sort_key_type()),
                lsi.projection().clone(),
                self.schema.clone(),
            );
        }
    }

    // index management
    pub fn add_gsi(&mut self, builder: GsiBuilder) {
        let gsi = builder.build(self.schema.clone());
        let name = gsi.name().to_string();

        let mut gsi = gsi;
        for item in self.scan().unwrap_or_default() {
            if let Some(pk) = item.extract_key(&self.schema) {
                gsi.put(pk, &item);
            }
        }

        self.gsis.insert(name, gsi);
    }

    pub fn gsi(&self, name: &str) -> Option<&GlobalSecondaryIndex> {
        self.gsis.get(name)
    }

    pub fn gsi_names(&self) -> impl Iterator<Item = &str> {
        self.gsis.keys().map(|s| s.as_str())
    }

    pub fn add_lsi(&mut self, builder: LsiBuilder) {
        let lsi = builder.build(self.schema.clone());
        let name = lsi.name().to_string();

        let mut lsi = lsi;
        for item in self.scan().unwrap_or_default() {
            if let Some(pk) = item.extract_key(&self.schema) {
                lsi.put(&pk, &item);
            }
        }

        self.lsis.insert(name, lsi);
    }

    pub fn lsi(&self, name: &str) -> Option<&LocalSecondaryIndex> {
        self.lsis.get(name)
    }

    pub fn lsi_names(&self) -> impl Iterator<Item = &str> {
        self.lsis.keys().map(|s| s.as_str())
    }

    // operations
    pub fn put_item(&mut self, item: Item) -> TableResult<Option<Item>> {
        let result = self.put_item_with_return(item, ReturnValue::AllOld)?;
        Ok(result.attributes)
    }

    pub fn put_item_with_return(
        &mut self,
        item: Item,
        return_value: ReturnValue,
    ) -> TableResult<WriteResult> {
        self.put_item_internal(item, None, return_value)
    }

    pub fn put_item_with_condition(
        &mut self,
        item: Item,
        condition: Condition,
    ) -> TableResult<Option<Item>> {
        let result =
            self.put_item_with_condition_and_return(item, condition, ReturnValue::AllOld)?;
        Ok(result.attributes)
    }

    pub fn put_item_with_condition_and_return(
        &mut self,
        item: Item,
        condition: Condition,
        return_value: ReturnValue,
    ) -> TableResult<WriteResult> {
        self.put_item_internal(item, Some(condition), return_value)
    }

    fn put_item_internal(
        &mut self,
        item: Item,
        condition: Option<Condition>,
        return_value: ReturnValue,
    ) -> TableResult<WriteResult> {
        let _ = item.validate_key(&self.schema)?;

        let pk = item.extract_key(&self.schema).ok_or_else(|| {
            TableError::InvalidKey(KeyValidationError::MissingAttribute {
                name: self.schema.pk_name().to_string(),
            })
        })?;

        let storage_key = pk.to_storage_key();
        let old_item = self.get_item_by_storage_key(&storage_key)?;

        if let Some(cond) = condition {
            let check_item = old_item.clone().unwrap_or_default();
            if !evaluate(&cond, &check_item)? {
                return Err(TableError::ConditionFailed);
            }
        }

        let was_update = old_item.is_some();
        let encoded = self.encode_item(&item)?;
        self.storage.put(&storage_key, encoded)?;
        self.update_indexes_on_put(&pk, &item);

        let attributes = match return_value {
            ReturnValue::None => None,
            ReturnValue::AllOld => old_item,
            ReturnValue::AllNew => Some(item),
        };

        Ok(WriteResult {
            attributes,
            was_update,
        })
    }

    pub fn put_item_if_not_exists(&mut self, item: Item) -> TableResult<()> {
        let _ = item.validate_key(&self.schema())?;

        let pk = item.extract_key(&self.schema).ok_or_else(|| {
            TableError::InvalidKey(crate::types::KeyValidationError::MissingAttribute {
                name: self.schema.pk_name().to_string(),
            })
        })?;

        let storage_key = pk.to_storage_key();
        let encoded = self.encode_item(&item)?;

        match self.storage.put_if_not_exists(&storage_key, encoded) {
            Ok(()) => {}
            Err(StorageError::KeyAlreadyExists { .. }) => return Err(TableError::ItemAlreadyExists),
            Err(err) => return Err(err.into()),
        }
        self.update_indexes_on_put(&pk, &item);

        Ok(())
    }

    pub fn get_item(&self, key: &PrimaryKey) -> TableResult<Option<Item>> {
        let storage_key = key.to_storage_key();
        self.get_item_by_storage_key(&storage_key)
    }

    pub fn delete_item(&mut self, key: &PrimaryKey) -> TableResult<Option<Item>> {
        let result = self.delete_item_with_return(key, ReturnValue::AllOld)?;
        Ok(result.attributes)
    }

    pub fn delete_item_with_return(
        &mut self,
        key: &PrimaryKey,
        return_value: ReturnValue,
    ) -> TableResult<WriteResult> {
        self.delete_item_internal(key, None, return_value)
    }

    pub fn delete_item_with_condition(
        &mut self,
        key: &PrimaryKey,
        condition: Condition,
    ) -> TableResult<Option<Item>> {
        let result =
            self.delete_item_with_condition_and_return(key, condition, ReturnValue::AllOld)?;
        Ok(result.attributes)
    }

    pub fn delete_item_with_condition_and_return(
        &mut self,
        key: &PrimaryKey,
        condition: Condition,
        return_value: ReturnValue,
    ) -> TableResult<WriteResult> {
        self.delete_item_internal(key, Some(condition), return_value)
    }

    fn delete_item_internal(
        &mut self,
        key: &PrimaryKey,
        condition: Option<Condition>,
        return_value: ReturnValue,
    ) -> TableResult<WriteResult> {
        let storage_key = key.to_storage_key();
        let old_item = self.get_item_by_storage_key(&storage_key)?;

        if let Some(cond) = condition {
            let check_item = old_item.clone().unwrap_or_default();
            if !evaluate(&cond, &check_item)? {
                return Err(TableError::ConditionFailed);
            }
        }

        let was_update = old_item.is_some();

        self.storage.delete(&storage_key)?;

        if was_update {
            self.update_indexes_on_delete(key);
        }

        let attributes = match return_value {
            ReturnValue::None => None,
            ReturnValue::AllOld => old_item,
            ReturnValue::AllNew => None, // Delete has no "new" item
        };

        Ok(WriteResult {
            attributes,
            was_update,
        })
    }

    pub fn query(&self, request: impl Into<QueryRequest>) -> TableResult<QueryResult> {
        let request = request.into();
        let options = match request.filter {
            Some(filter) => request.options.with_filter(filter),
            None => request.options,
        };
        self.query_with_options(request.key_condition, options)
    }

    pub fn query_with_options(
        &self,
        condition: KeyCondition,
        options: QueryOptions,
    ) -> TableResult<QueryResult> {
        let executor = QueryExecutor::new(&self.schema);
        executor.validate_condition(&condition)?;

        let items = self.iter_with_keys()?;
        executor.execute(items.into_iter(), &condition, &options)
    }

    pub fn query_with_filter(
        &self,
        key_condition: KeyCondition,
        filter: Condition,
    ) -> TableResult<QueryResult> {
        self.query_with_filter_and_options(key_condition, filter, QueryOptions::new())
    }

    pub fn query_with_filter_and_options(
        &self,
        key_condition: KeyCondition,
        filter: Condition,
        options: QueryOptions,
    ) -> TableResult<QueryResult> {
        // the filter must be evaluated before the limit is applied, so it's
        // threaded through QueryOptions rather than applied to an
        // already-truncated result.
        self.query_with_options(key_condition, options.with_filter(filter))
    }

    pub fn query_gsi(&self, index_name: &str, condition: KeyCondition) -> TableResult<QueryResult> {
        self.query_gsi_with_options(index_name, condition, QueryOptions::new())
    }

    pub fn query_gsi_with_options(
        &self,
        index_name: &str,
        condition: KeyCondition,
        options: QueryOptions,
    ) -> TableResult<QueryResult> {
        let gsi = self
            .gsis
            .get(index_name)
            .ok_or_else(|| TableError::index_not_found(index_name))?;

        gsi.query_with_options(condition, options)
    }

    pub fn query_gsi_with_filter(
        &self,
        index_name: &str,
        key_condition: KeyCondition,
        filter: Condition,
    ) -> TableResult<QueryResult> {
        self.query_gsi_with_options(index_name, key_condition, QueryOptions::new().with_filter(filter))
    }

    pub fn query_lsi(&self, index_name: &str, condition: KeyCondition) -> TableResult<QueryResult> {
        self.query_lsi_with_options(index_name, condition, QueryOptions::new())
    }

    pub fn query_lsi_with_options(
        &self,
        index_name: &str,
        condition: KeyCondition,
        options: QueryOptions,
    ) -> TableResult<QueryResult> {
        let lsi = self
            .lsis
            .get(index_name)
            .ok_or_else(|| TableError::index_not_found(index_name))?;

        lsi.query_with_options(condition, options)
    }

    pub fn query_lsi_with_filter(
        &self,
        index_name: &str,
        condition: KeyCondition,
        filter: Condition,
    ) -> TableResult<QueryResult> {
        self.query_lsi_with_options(index_name, condition, QueryOptions::new().with_filter(filter))
    }

    pub fn update_item(
        &mut self,
        key: &PrimaryKey,
        expression: UpdateExpression,
    ) -> TableResult<Option<Item>> {
        let result = self.update_item_with_return(key, expression, ReturnValue::AllNew)?;
        Ok(result.attributes)
    }

    pub fn update_item_with_return(
        &mut self,
        key: &PrimaryKey,
        expression: UpdateExpression,
        return_value: ReturnValue,
    ) -> TableResult<WriteResult> {
        self.update_item_internal(key, expression, None, return_value)
    }

    pub fn update_item_with_condition(
        &mut self,
        key: &PrimaryKey,
        expression: UpdateExpression,
        condition: Condition,
    ) -> TableResult<Option<Item>> {
        let result = self.update_item_with_condition_and_return(
            key,
            expression,
            condition,
            ReturnValue::AllNew,
        )?;
        Ok(result.attributes)
    }

    pub fn update_item_with_condition_and_return(
        &mut self,
        key: &PrimaryKey,
        expression: UpdateExpression,
        condition: Condition,
        return_value: ReturnValue,
    ) -> TableResult<WriteResult> {
        self.update_item_internal(key, expression, Some(condition), return_value)
    }

    /// Updates the item at `key`, creating it first (seeded with just the
    /// key attributes) if it doesn't already exist — an UpdateExpression
    /// always upserts.
    fn update_item_internal(
        &mut self,
        key: &PrimaryKey,
        expression: UpdateExpression,
        condition: Option<Condition>,
        return_value: ReturnValue,
    ) -> TableResult<WriteResult> {
        let storage_key = key.to_storage_key();
        let existing = self.get_item_by_storage_key(&storage_key)?;
        let was_update = existing.is_some();
        let base_item = existing.clone().unwrap_or_else(|| self.seed_key_item(key));

        if let Some(cond) = condition {
            let check_item = existing.clone().unwrap_or_else(Item::new);
            if !evaluate(&cond, &check_item)? {
                return Err(TableError::ConditionFailed);
            }
        }

        let executor = UpdateExecutor::new();
        let new_item = executor.execute(base_item, &expression)?;

        // failure checks
        let new_key = new_item.extract_key(&self.schema).ok_or_else(|| {
            TableError::UpdateError("update removed key attributes".to_string())
        })?;

        if &new_key != key {
            return Err(TableError::UpdateError("cannot modify key attributes".to_string()));
        }

        // save updated item
        let encoded = self.encode_item(&new_item)?;
        self.storage.put(&storage_key, encoded)?;
        self.update_indexes_on_put(key, &new_item);

        let attributes = match return_value {
            ReturnValue::AllNew => Some(new_item),
            ReturnValue::AllOld => existing,
            ReturnValue::None => None,
        };

        Ok(WriteResult {
            attributes,
            was_update,
        })
    }

    fn seed_key_item(&self, key: &PrimaryKey) -> Item {
        let mut item = Item::new().with(self.schema.pk_name(), key.pk.to_attribute_value());
        if let (Some(sk_name), Some(sk)) = (self.schema.sk_name(), &key.sk) {
            item = item.with(sk_name, sk.to_attribute_value());
        }
        item
    }

    pub fn scan(&self) -> TableResult<Vec<Item>> {
        let mut items = Vec::new();

        for (_, value) in self.storage.iter() {
            let item = self.decode_item(value)?;
            items.push(item);
        }

        Ok(items)
    }

    pub fn scan_with_filter(&self, filter: Condition) -> TableResult<Vec<Item>> {
        let items = self.scan()?;

        Ok(items
            .into_iter()
            .filter(|item| evaluate(&filter, item).unwrap_or(false))
            .collect())
    }

    pub fn scan_limit(&self, limit: usize) -> TableResult<Vec<Item>> {
        let mut items = Vec::with_capacity(limit.min(self.storage.len()));

        for (_, value) in self.storage.iter().take(limit) {
            let item = self.decode_item(value)?;
            items.push(item);
        }

        Ok(items)
    }

    /// Full scan with filter, limit and pagination applied together — the
    /// limit caps the number of filter-passing items, matching `query`'s
    /// semantics, and `last_evaluated_key` resumes a truncated scan.
    pub fn scan_with_request(&self, request: ScanRequest) -> TableResult<QueryResult> {
        let all = self.iter_with_keys()?;

        let start_index = match &request.exclusive_start_key {
            Some(start) => {
                let start_key = start.to_storage_key();
                all.iter()
                    .position(|(pk, _)| pk.to_storage_key() == start_key)
                    .map(|idx| idx + 1)
                    .unwrap_or(0)
            }
            None => 0,
        };

        let limit = request.limit.unwrap_or(usize::MAX);
        let mut items = Vec::new();
        let mut last_evaluated_key = None;
        let scanned = all.len();

        for (pk, item) in &all[start_index..] {
            let passes = match &request.filter {
                Some(filter) => evaluate(filter, item)?,
                None => true,
            };
            if passes {
                items.push(item.clone());
            }
            if items.len() >= limit {
                last_evaluated_key = Some(pk.clone());
                break;
            }
        }

        let count = items.len();
        Ok(QueryResult {
            items,
            scanned_count: scanned,
            count,
            last_evaluated_key,
        })
    }

    // internal helpers
    fn encode_item(&self, item: &Item) -> TableResult<Vec<u8>> {
        let map: BTreeMap<String, AttributeValue> = item
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        let av = AttributeValue::M(map);
        Ok(encode(&av))
    }

    fn decode_item(&self, data: &[u8]) -> TableResult<Item> {
        let av = decode(data)?;
        match av {
            AttributeValue::M(map) => Ok(Item::from(map)),
            _ => Err(TableError::Encoding("expected map type".into())),
        }
    }

    fn get_item_by_storage_key(&self, storage_key: &str) -> TableResult<Option<Item>> {
        match self.storage.get(storage_key)? {
            Some(data) => Ok(Some(self.decode_item(&data)?)),
            None => Ok(None),
        }
    }

    /// TODO: performance: this allocates a Vec for all items. For large tables,
    /// consider returning an iterator that decodes lazily to reduce memory pressure
    fn iter_with_keys(&self) -> TableResult<Vec<(PrimaryKey, Item)>> {
        let mut result = Vec::new();
        for (_, value) in self.storage.iter() {
            let item = self.decode_item(value)?;
            if let Some(pk) = item.extract_key(&self.schema) {
                result.push((pk, item));
            }
        }

        Ok(result)
    }

    fn update_indexes_on_put(&mut self, pk: &PrimaryKey, item: &Item) {
        for gsi in self.gsis.values_mut() {
            gsi.put(pk.clone(), item);
        }
        for lsi in self.lsis.values_mut() {
            lsi.put(pk, item);
        }
    }

    fn update_indexes_on_delete(&mut self, pk: &PrimaryKey) {
        for gsi in self.gsis.values_mut() {
            gsi.delete(pk);
        }
        for lsi in self.lsis.values_mut() {
            lsi.delete(pk);
        }
    }
}

pub struct TableBuilder {
    name: String,
    schema: KeySchema,
    initial_capacity: Option<usize>,
    gsi_builders: Vec<GsiBuilder>,
    lsi_builders: Vec<LsiBuilder>,
}

impl TableBuilder {
    pub fn new(name: impl Into<String>, schema: KeySchema) -> Self {
        Self {
            name: name.into(),
            schema,
            initial_capacity: None,
            gsi_builders: Vec::new(),
            lsi_builders: Vec::new(),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    pub fn with_gsi(mut self, builder: GsiBuilder) -> Self {
        self.gsi_builders.push(builder);
        self
    }

    pub fn with_lsi(mut self, builder: LsiBuilder) -> Self {
        self.lsi_builders.push(builder);
        self
    }

    pub fn build(self) -> Table {
        let mut table = Table::new(self.name, self.schema);
        if let Some(cap) = self.initial_capacity {
            table.storage = MemoryStorage::with_capacity(cap);
        }
        for gsi_builder in self.gsi_builders {
            table.add_gsi(gsi_builder);
        }
        for lsi_builder in self.lsi_builders {
            table.add_lsi(lsi_builder);
        }
        table
    }
}
