//! Request-object convenience methods layered on top of `Table`'s primitive
//! put/get/update/delete/scan API, plus direct-on-`Table` batch and
//! transaction helpers for callers that don't need `Engine`'s locking,
//! lifecycle, or stream bookkeeping.

use super::core::Table;
use super::request::{DeleteRequest, PutRequest, UpdateRequest};
use crate::batch::{BatchExecutor, BatchGetRequest, BatchGetResult, BatchWriteRequest, BatchWriteResult};
use crate::error::{TableError, TableResult};
use crate::transaction::{TransactGetRequest, TransactGetResult, TransactionExecutor};
use crate::transaction::{TransactWriteItem, TransactWriteRequest};
use crate::types::{Item, KeyValidationError, PrimaryKey, WriteResult};

impl Table {
    pub fn put(&mut self, request: PutRequest) -> TableResult<WriteResult> {
        if request.if_not_exists {
            let pk = request.item.extract_key(self.schema()).ok_or_else(|| {
                TableError::InvalidKey(KeyValidationError::MissingAttribute {
                    name: self.schema().pk_name().to_string(),
                })
            })?;
            if self.get_item(&pk)?.is_some() {
                return Err(TableError::ItemAlreadyExists);
            }
        }
        match request.condition {
            Some(cond) => self.put_item_with_condition_and_return(request.item, cond, request.return_value),
            None => self.put_item_with_return(request.item, request.return_value),
        }
    }

    pub fn update(&mut self, request: UpdateRequest) -> TableResult<WriteResult> {
        match request.condition {
            Some(cond) => self.update_item_with_condition_and_return(
                &request.key,
                request.expression,
                cond,
                request.return_value,
            ),
            None => self.update_item_with_return(&request.key, request.expression, request.return_value),
        }
    }

    pub fn delete(&mut self, request: DeleteRequest) -> TableResult<WriteResult> {
        match request.condition {
            Some(cond) => self.delete_item_with_condition_and_return(&request.key, cond, request.return_value),
            None => self.delete_item_with_return(&request.key, request.return_value),
        }
    }

    pub fn put_items(&mut self, items: Vec<Item>) -> TableResult<BatchWriteResult> {
        let schema = self.schema().clone();
        BatchExecutor::new().execute_put(items, &schema, |item| self.put_item(item).map(|_| ()))
    }

    pub fn get_items(&self, keys: Vec<PrimaryKey>) -> TableResult<BatchGetResult> {
        BatchExecutor::new().execute_get(keys, |key| self.get_item(key))
    }

    pub fn delete_items(&mut self, keys: Vec<PrimaryKey>) -> TableResult<BatchWriteResult> {
        BatchExecutor::new().execute_delete(keys, |key| self.delete_item(key).map(|_| ()))
    }

    pub fn batch_write(&mut self, request: impl Into<BatchWriteRequest>) -> TableResult<BatchWriteResult> {
        let request = request.into();
        let mut puts = Vec::new();
        let mut deletes = Vec::new();
        for item in request.items {
            match item {
                crate::batch::BatchWriteItem::Put { item } => puts.push(item),
                crate::batch::BatchWriteItem::Delete { key } => deletes.push(key),
            }
        }

        let mut result = BatchWriteResult::new();
        if !puts.is_empty() {
            let put_result = self.put_items(puts)?;
            result.processed_count += put_result.processed_count;
            result.unprocessed_items.extend(put_result.unprocessed_items);
        }
        if !deletes.is_empty() {
            let delete_result = self.delete_items(deletes)?;
            result.processed_count += delete_result.processed_count;
            result.unprocessed_items.extend(delete_result.unprocessed_items);
        }
        Ok(result)
    }

    pub fn batch_get(&self, request: impl Into<BatchGetRequest>) -> TableResult<BatchGetResult> {
        let request = request.into();
        self.get_items(request.keys)
    }

    /// Validates every item against current state before applying any of
    /// them: either the whole batch lands, or storage is left untouched.
    pub fn transact_write(&mut self, request: impl Into<TransactWriteRequest>) -> TableResult<()> {
        let request = request.into();
        let schema = self.schema().clone();
        let executor = TransactionExecutor::new();

        executor
            .validate_write(&request.items, &schema, |key| self.get_item(key))
            .map_err(|reason| crate::error::TableError::TransactionCancelled(vec![map_cancel_reason(&reason)]))?;

        for item in request.items {
            match item {
                TransactWriteItem::Put { item, .. } => {
                    self.put_item(item)?;
                }
                TransactWriteItem::Update { key, expression, .. } => {
                    self.update_item(&key, expression)?;
                }
                TransactWriteItem::Delete { key, .. } => {
                    self.delete_item(&key)?;
                }
                TransactWriteItem::ConditionCheck { .. } => {}
            }
        }
        Ok(())
    }

    pub fn transact_get(&self, request: impl Into<TransactGetRequest>) -> TableResult<TransactGetResult> {
        let request = request.into();
        TransactionExecutor::new().execute_get(&request.items, |key| self.get_item(key))
    }

    pub fn scan_all(&self) -> TableResult<Vec<Item>> {
        self.scan()
    }
}

fn map_cancel_reason(
    reason: &crate::transaction::TransactionFailureReason,
) -> crate::error::TransactionCancelReason {
    use crate::error::TransactionCancelReason;
    use crate::transaction::TransactionFailureReason;

    match reason {
        TransactionFailureReason::ConditionCheckFailed { .. } => TransactionCancelReason::ConditionalCheckFailed,
        TransactionFailureReason::ItemNotFound { .. } => TransactionCancelReason::ItemNotFound,
        TransactionFailureReason::DuplicateItem { .. } => TransactionCancelReason::DuplicateRequest,
        TransactionFailureReason::KeyModification { .. } => TransactionCancelReason::ValidationError,
        TransactionFailureReason::InvalidKey { .. } => TransactionCancelReason::ValidationError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::attr;
    use crate::types::{KeySchema, KeyType};
    use crate::update::UpdateExpression;

    fn users_table() -> Table {
        Table::new("users", KeySchema::simple("user_id", KeyType::S))
    }

    #[test]
    fn put_update_delete_request_objects() {
        let mut table = users_table();
        table.put(PutRequest::new(Item::new().with_s("user_id", "u1"))).unwrap();
        table
            .update(UpdateRequest::new(PrimaryKey::simple("u1"), UpdateExpression::new().set("name", "Alice")))
            .unwrap();
        let item = table.get_item(&PrimaryKey::simple("u1")).unwrap().unwrap();
        assert_eq!(item.get("name"), Some(&crate::types::AttributeValue::S("Alice".into())));

        table.delete(DeleteRequest::new(PrimaryKey::simple("u1"))).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn put_if_not_exists_rejects_existing_key() {
        let mut table = users_table();
        table.put(PutRequest::new(Item::new().with_s("user_id", "u1"))).unwrap();
        let err = table
            .put(PutRequest::new(Item::new().with_s("user_id", "u1")).if_not_exists())
            .unwrap_err();
        assert!(err.item_already_exists());
    }

    #[test]
    fn batch_put_get_delete() {
        let mut table = users_table();
        let items = vec![
            Item::new().with_s("user_id", "u1"),
            Item::new().with_s("user_id", "u2"),
        ];
        let result = table.put_items(items).unwrap();
        assert_eq!(result.processed_count, 2);

        let fetched = table
            .get_items(vec![PrimaryKey::simple("u1"), PrimaryKey::simple("missing")])
            .unwrap();
        assert_eq!(fetched.found_count(), 1);
        assert_eq!(fetched.not_found_keys.len(), 1);

        let deleted = table.delete_items(vec![PrimaryKey::simple("u1"), PrimaryKey::simple("u2")]).unwrap();
        assert_eq!(deleted.processed_count, 2);
        assert!(table.is_empty());
    }

    #[test]
    fn transact_write_applies_all_or_none() {
        let mut table = users_table();
        let request = TransactWriteRequest::new()
            .put(Item::new().with_s("user_id", "u1"))
            .put(Item::new().with_s("user_id", "u2"));
        table.transact_write(request).unwrap();
        assert_eq!(table.len(), 2);

        let failing = TransactWriteRequest::new()
            .put(Item::new().with_s("user_id", "u3"))
            .update(PrimaryKey::simple("missing"), UpdateExpression::new().set("x", 1));
        let err = table.transact_write(failing).unwrap_err();
        assert!(err.is_transaction_canceled());
        assert!(table.get_item(&PrimaryKey::simple("u3")).unwrap().is_none());
    }

    #[test]
    fn transact_write_rejects_duplicate_keys() {
        let mut table = users_table();
        let request = TransactWriteRequest::new()
            .put(Item::new().with_s("user_id", "u1"))
            .put(Item::new().with_s("user_id", "u1"));
        let err = table.transact_write(request).unwrap_err();
        assert!(err.is_transaction_canceled());
        assert!(table.is_empty());
    }

    #[test]
    fn transact_get_reads_multiple_keys() {
        let mut table = users_table();
        table.put_item(Item::new().with_s("user_id", "u1")).unwrap();
        let result = table
            .transact_get(TransactGetRequest::new().get(PrimaryKey::simple("u1")).get(PrimaryKey::simple("missing")))
            .unwrap();
        assert_eq!(result.found_count(), 1);
    }

    #[test]
    fn scan_all_matches_scan() {
        let mut table = users_table();
        table.put_item(Item::new().with_s("user_id", "u1")).unwrap();
        assert_eq!(table.scan_all().unwrap().len(), table.scan().unwrap().len());
    }

    #[test]
    fn transact_write_accepts_bare_items_via_into() {
        let mut table = Table::new("account", KeySchema::simple("id", KeyType::S));
        let items = vec![
            TransactWriteItem::put(Item::new().with_s("id", "a").with_n("balance", 100)),
            TransactWriteItem::put(Item::new().with_s("id", "b").with_n("balance", 200)),
        ];
        table.transact_write(items).unwrap();
        assert_eq!(table.len(), 2);

        table
            .transact_write(
                TransactWriteRequest::new()
                    .update_with_condition(
                        PrimaryKey::simple("a"),
                        UpdateExpression::new().add("balance", -50i32),
                        attr("balance").ge(50i32),
                    )
                    .update(PrimaryKey::simple("b"), UpdateExpression::new().add("balance", 50i32)),
            )
            .unwrap();
        let a = table.get_item(&PrimaryKey::simple("a")).unwrap().unwrap();
        assert_eq!(a.get("balance"), Some(&crate::types::AttributeValue::N("50".into())));
    }
}
