use crate::condition::{Condition, evaluate};
use crate::error::{TableError, TableResult};
use crate::types::{Item, KeySchema, KeyValidationError, KeyValue, PrimaryKey};
use crate::utils::compare_key_values;

use super::condition::KeyCondition;

use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct QueryResult {
    pub items: Vec<Item>,
    pub scanned_count: usize, // before filtering
    pub count: usize,
    /// Set when more items remain past `options.limit`; pass it back as
    /// `exclusive_start_key` on the next call to resume the query.
    pub last_evaluated_key: Option<PrimaryKey>,
}

impl QueryResult {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            scanned_count: 0,
            count: 0,
            last_evaluated_key: None,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct QueryOptions {
    pub limit: Option<usize>,
    pub scan_forward: bool,
    pub filter: Option<Condition>,
    pub exclusive_start_key: Option<PrimaryKey>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self {
            limit: None,
            scan_forward: true,
            filter: None,
            exclusive_start_key: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn forward(mut self) -> Self {
        self.scan_forward = true;
        self
    }

    pub fn reverse(mut self) -> Self {
        self.scan_forward = false;
        self
    }

    pub fn with_filter(mut self, filter: Condition) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_exclusive_start_key(mut self, key: PrimaryKey) -> Self {
        self.exclusive_start_key = Some(key);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SortableItem {
    sk: Option<KeyValue>,
    storage_key: String,
    sequence: usize,
    pk: PrimaryKey,
    item: Item,
}

impl SortableItem {
    #[inline]
    fn new(pk: &PrimaryKey, item: Item, sequence: usize) -> Self {
        Self {
            sk: pk.sk.clone(),
            storage_key: pk.to_storage_key(),
            sequence,
            pk: pk.clone(),
            item,
        }
    }
}

impl PartialOrd for SortableItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortableItem {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.sk, &other.sk) {
            (Some(a), Some(b)) => {
                let key_cmp = compare_key_values(a, b);
                if key_cmp == Ordering::Equal {
                    self.storage_key
                        .cmp(&other.storage_key)
                        .then(self.sequence.cmp(&other.sequence))
                } else {
                    key_cmp
                }
            }
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => self
                .storage_key
                .cmp(&other.storage_key)
                .then(self.sequence.cmp(&other.sequence)),
        }
    }
}

pub struct QueryExecutor<'a> {
    schema: &'a KeySchema,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(schema: &'a KeySchema) -> Self {
        Self { schema }
    }

    /// TODO(performance): use a bounded heap for ascneding queries with limit
    pub fn execute(
        &self,
        items: impl Iterator<Item = (PrimaryKey, Item)>,
        condition: &KeyCondition,
        options: &QueryOptions,
    ) -> TableResult<QueryResult> {
        let mut scanned = 0usize;
        let mut sequence = 0usize;

        let mut matching: BTreeMap<SortableItem, ()> = BTreeMap::new();

        for (pk, item) in items {
            scanned += 1;

            if pk.pk != condition.partition_key {
                continue;
            }

            if let Some(sk_op) = &condition.sort_key {
                match &pk.sk {
                    Some(sk) if sk_op.matches(sk) => {}
                    _ => continue,
                }
            }

            let sortable = SortableItem::new(&pk, item, sequence);
            sequence += 1;
            matching.insert(sortable, ());
        }

        let ordered: Vec<SortableItem> = if options.scan_forward {
            matching.into_keys().collect()
        } else {
            matching.into_keys().rev().collect()
        };

        // resume past the continuation key from a prior page, if given
        let start_index = match &options.exclusive_start_key {
            Some(start) => ordered
                .iter()
                .position(|s| s.storage_key == start.to_storage_key())
                .map(|idx| idx + 1)
                .unwrap_or(0),
            None => 0,
        };

        let limit = options.limit.unwrap_or(usize::MAX);
        let mut result_items = Vec::new();
        let mut last_evaluated_key = None;

        for sortable in &ordered[start_index..] {
            let passes = match &options.filter {
                Some(filter) => evaluate(filter, &sortable.item)?,
                None => true,
            };

            if passes {
                result_items.push(sortable.item.clone());
            }

            if result_items.len() >= limit {
                last_evaluated_key = Some(sortable.pk.clone());
                break;
            }
        }

        let count = result_items.len();

        Ok(QueryResult {
            items: result_items,
            scanned_count: scanned,
            count,
            last_evaluated_key,
        })
    }

    pub fn validate_condition(&self, condition: &KeyCondition) -> TableResult<()> {
        if !self
            .schema
            .partition_key
            .key_type
            .matches(&condition.partition_key)
        {
            return Err(TableError::InvalidKey(KeyValidationError::TypeMismatch {
                name: self.schema.partition_key.name.clone(),
                expected: self.schema.partition_key.key_type.as_str(),
                actual: condition.partition_key.type_name(),
            }));
        }

        if let Some(sk_op) = &condition.sort_key {
            match &self.schema.sort_key {
                Some(sk_def) => {
                    let sk_value = sk_op.value();
                    if !sk_def.key_type.matches(sk_value) {
                        return Err(TableError::InvalidKey(KeyValidationError::TypeMismatch {
                            name: sk_def.name.clone(),
                            expected: sk_def.key_type.as_str(),
                            actual: sk_value.type_name(),
                        }));
                    }
                }
                None => {
                    return Err(TableError::InvalidKey(
                        KeyValidationError::MissingAttribute {
                            name: "sort_key".to_string(),
                        },
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KeyType;

    fn make_item(pk: &str, sk: &str, data: &str) -> (PrimaryKey, Item) {
        let key = PrimaryKey::composite(pk, sk);
        let item = Item::new()
            .with_s("pk", pk)
            .with_s("sk", sk)
            .with_s("data", data);
        (key, item)
    }

    fn test_items() -> Vec<(PrimaryKey, Item)> {
        vec![
            make_item("user1", "order#001", "first"),
            make_item("user1", "order#002", "second"),
            make_item("user1", "order#003", "third"),
            make_item("user1", "profile", "user1 profile"),
            make_item("user2", "order#001", "user2 first"),
            make_item("user2", "order#002", "user2 second"),
        ]
    }

    fn schema() -> KeySchema {
        KeySchema::composite("pk", KeyType::S, "sk", KeyType::S)
    }

    #[test]
    fn query_empty_result() {
        let schema = schema();
        let executor = QueryExecutor::new(&schema);
        let result = executor
            .execute(
                test_items().into_iter(),
                &KeyCondition::pk("nonexistent"),
                &QueryOptions::new(),
            )
            .unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.count, 0);
        assert_eq!(result.scanned_count, 6);
    }

    #[test]
    fn query_with_sort_key_prefix() {
        let schema = schema();
        let executor = QueryExecutor::new(&schema);
        let result = executor
            .execute(
                test_items().into_iter(),
                &KeyCondition::pk("user1").sk_begins_with("order"),
                &QueryOptions::new(),
            )
            .unwrap();
        assert_eq!(result.count, 3);
    }

    #[test]
    fn query_with_sk_between() {
        let schema = schema();
        let executor = QueryExecutor::new(&schema);
        let result = executor
            .execute(
                test_items().into_iter(),
                &KeyCondition::pk("user1").sk_between("order#002", "order#003"),
                &QueryOptions::new(),
            )
            .unwrap();
        assert_eq!(result.count, 2);
    }

    #[test]
    fn query_with_limit_forward() {
        let schema = schema();
        let executor = QueryExecutor::new(&schema);
        let result = executor
            .execute(
                test_items().into_iter(),
                &KeyCondition::pk("user1").sk_begins_with("order"),
                &QueryOptions::new().with_limit(2),
            )
            .unwrap();
        assert_eq!(result.count, 2);
        assert_eq!(result.items[0].get("sk").unwrap().as_s(), Some("order#001"));
        assert_eq!(result.items[1].get("sk").unwrap().as_s(), Some("order#002"));
    }

    #[test]
    fn query_with_limit_reverse() {
        let schema = schema();
        let executor = QueryExecutor::new(&schema);
        let result = executor
            .execute(
                test_items().into_iter(),
                &KeyCondition::pk("user1").sk_begins_with("order"),
                &QueryOptions::new().with_limit(2).reverse(),
            )
            .unwrap();
        assert_eq!(result.count, 2);
        assert_eq!(result.items[0].get("sk").unwrap().as_s(), Some("order#003"));
        assert_eq!(result.items[1].get("sk").unwrap().as_s(), Some("order#002"));
    }

    #[test]
    fn numeric_sort_keys() {
        let schema = KeySchema::composite("pk", KeyType::S, "sk", KeyType::N);
        let items: Vec<(PrimaryKey, Item)> = vec![100, -4, -100, 50, 0]
            .into_iter()
            .map(|n| {
                let key = PrimaryKey::composite("user1", KeyValue::N(n.to_string()));
                let item = Item::new()
                    .with_s("pk", "user1")
                    .with_n("sk", n)
                    .with_n("value", n);
                (key, item)
            })
            .collect();

        let executor = QueryExecutor::new(&schema);
        let result = executor
            .execute(
                items.into_iter(),
                &KeyCondition::pk("user1"),
                &QueryOptions::new(),
            )
            .unwrap();

        let sks: Vec<&str> = result
            .items
            .iter()
            .map(|i| i.get("sk").unwrap().as_n().unwrap())
            .collect();
        assert_eq!(sks, vec!["-100", "-4", "0", "50", "100"]);
    }

    mod pagination {
        use super::*;

        #[test]
        fn sets_last_evaluated_key_when_more_remain() {
            let schema = schema();
            let executor = QueryExecutor::new(&schema);
            let result = executor
                .execute(
                    test_items().into_iter(),
                    &KeyCondition::pk("user1").sk_begins_with("order"),
                    &QueryOptions::new().with_limit(2),
                )
                .unwrap();

            assert_eq!(result.count, 2);
            let last_key = result.last_evaluated_key.expect("more items remain");
            assert_eq!(last_key.sk, Some(KeyValue::S("order#002".into())));
        }

        #[test]
        fn resumes_from_exclusive_start_key() {
            let schema = schema();
            let executor = QueryExecutor::new(&schema);
            let first = executor
                .execute(
                    test_items().into_iter(),
                    &KeyCondition::pk("user1").sk_begins_with("order"),
                    &QueryOptions::new().with_limit(2),
                )
                .unwrap();
            let start = first.last_evaluated_key.unwrap();

            let second = executor
                .execute(
                    test_items().into_iter(),
                    &KeyCondition::pk("user1").sk_begins_with("order"),
                    &QueryOptions::new().with_exclusive_start_key(start),
                )
                .unwrap();

            assert_eq!(second.count, 1);
            assert_eq!(
                second.items[0].get("sk").unwrap().as_s(),
                Some("order#003")
            );
            assert!(second.last_evaluated_key.is_none());
        }

        #[test]
        fn limit_counts_filter_passing_items_not_scanned_items() {
            let schema = schema();
            let executor = QueryExecutor::new(&schema);
            let filter = crate::condition::attr("data").eq("second");

            let result = executor
                .execute(
                    test_items().into_iter(),
                    &KeyCondition::pk("user1").sk_begins_with("order"),
                    &QueryOptions::new().with_limit(1).with_filter(filter),
                )
                .unwrap();

            assert_eq!(result.count, 1);
            assert_eq!(result.items[0].get("data").unwrap().as_s(), Some("second"));
        }
    }
}
