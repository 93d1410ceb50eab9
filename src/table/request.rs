use std::collections::HashMap;

use crate::condition::{self, Condition, ExpressionParseError};
use crate::engine::{PlaceholderValidator, ValidationRequest};
use crate::query::{KeyCondition, QueryOptions};
use crate::types::{AttributeValue, Item, PrimaryKey, ReturnValue};
use crate::update::{self, UpdateExpression};

/// Checks `expr` against `names`/`values` for undefined or unused
/// placeholders before anything attempts to parse or evaluate it, per the
/// placeholder-validation contract every expression-bearing request is
/// expected to uphold.
fn validate_placeholders(
    expr: &str,
    names: &HashMap<String, String>,
    values: &HashMap<String, AttributeValue>,
) -> Result<(), ExpressionParseError> {
    PlaceholderValidator::new().validate(
        &ValidationRequest::new().expression(expr).names(names.clone()).values(values.clone()),
    )?;
    Ok(())
}

/// Parses a match-expression string (key condition, filter, or conditional
/// write) against caller-supplied `#name`/`:value` placeholder maps. Request
/// builders expose this as `*_expression` constructors alongside the typed
/// `Condition` builder so a wire adapter that only has expression text on
/// hand never has to build the AST by hand.
fn parse_condition_expr(
    expr: &str,
    names: &HashMap<String, String>,
    values: &HashMap<String, AttributeValue>,
) -> Result<Condition, ExpressionParseError> {
    validate_placeholders(expr, names, values)?;
    condition::parse_condition(expr, names, values)
}

#[derive(Debug, Clone)]
pub struct PutRequest {
    pub(crate) item: Item,
    pub(crate) condition: Option<Condition>,
    pub(crate) return_value: ReturnValue,
    pub(crate) if_not_exists: bool,
    /// Set alongside `condition` by [`Self::condition_expression`]: the raw
    /// `(table-scoped) expression text` plus the value map it was parsed
    /// against, so `Engine` can offer the exact same pair to the native
    /// interpreter registry before falling back to evaluating `condition`.
    pub(crate) condition_source: Option<(String, HashMap<String, AttributeValue>)>,
}

impl PutRequest {
    pub fn new(item: Item) -> Self {
        Self {
            item,
            condition: None,
            return_value: ReturnValue::None,
            if_not_exists: false,
            condition_source: None,
        }
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn condition_if(mut self, condition: Option<Condition>) -> Self {
        self.condition = condition;
        self
    }

    /// Parses `expr` against `names`/`values` and applies it the same way
    /// [`Self::condition`] would, additionally recording `expr`/`values` so
    /// `Engine`'s native-first dispatch can try them against a registered
    /// callback before the parsed condition is evaluated.
    pub fn condition_expression(
        self,
        expr: &str,
        names: &HashMap<String, String>,
        values: &HashMap<String, AttributeValue>,
    ) -> Result<Self, ExpressionParseError> {
        let condition = parse_condition_expr(expr, names, values)?;
        let mut req = self.condition(condition);
        req.condition_source = Some((expr.to_string(), values.clone()));
        Ok(req)
    }

    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    pub fn return_old(mut self) -> Self {
        self.return_value = ReturnValue::AllOld;
        self
    }

    pub fn return_new(mut self) -> Self {
        self.return_value = ReturnValue::AllNew;
        self
    }

    pub fn return_value(mut self, rv: ReturnValue) -> Self {
        self.return_value = rv;
        self
    }
}

impl From<Item> for PutRequest {
    fn from(item: Item) -> Self {
        Self::new(item)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub(crate) key: PrimaryKey,
    pub(crate) expression: UpdateExpression,
    pub(crate) condition: Option<Condition>,
    pub(crate) return_value: ReturnValue,
    /// Set alongside `condition` by [`Self::condition_expression`] — see
    /// `PutRequest::condition_source` for why `Engine` needs this pair kept
    /// around rather than just the parsed `Condition`.
    pub(crate) condition_source: Option<(String, HashMap<String, AttributeValue>)>,
    /// Set alongside `expression` by [`Self::from_expression`]: lets
    /// `Engine`'s native-first dispatch offer the exact `(table, expr)` pair
    /// to a registered update callback before `expression` is executed.
    pub(crate) update_source: Option<(String, HashMap<String, AttributeValue>)>,
}

impl UpdateRequest {
    pub fn new(key: impl Into<PrimaryKey>, expression: UpdateExpression) -> Self {
        Self {
            key: key.into(),
            expression,
            condition: None,
            return_value: ReturnValue::AllNew,
            condition_source: None,
            update_source: None,
        }
    }

    /// Parses an `UpdateExpression` grammar string (`SET`/`REMOVE`/`ADD`/
    /// `DELETE`) against `names`/`values` in place of building the typed
    /// `UpdateExpression` by hand.
    pub fn from_expression(
        key: impl Into<PrimaryKey>,
        expr: &str,
        names: &HashMap<String, String>,
        values: &HashMap<String, AttributeValue>,
    ) -> Result<Self, ExpressionParseError> {
        validate_placeholders(expr, names, values)?;
        let expression = update::parse_update(expr, names, values)?;
        let mut req = Self::new(key, expression);
        req.update_source = Some((expr.to_string(), values.clone()));
        Ok(req)
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn condition_if(mut self, condition: Option<Condition>) -> Self {
        self.condition = condition;
        self
    }

    /// Parses `expr` against `names`/`values` and applies it the same way
    /// [`Self::condition`] would, additionally recording `expr`/`values` so
    /// `Engine`'s native-first dispatch can try them against a registered
    /// callback before the parsed condition is evaluated.
    pub fn condition_expression(
        self,
        expr: &str,
        names: &HashMap<String, String>,
        values: &HashMap<String, AttributeValue>,
    ) -> Result<Self, ExpressionParseError> {
        let condition = parse_condition_expr(expr, names, values)?;
        let mut req = self.condition(condition);
        req.condition_source = Some((expr.to_string(), values.clone()));
        Ok(req)
    }

    pub fn return_none(mut self) -> Self {
        self.return_value = ReturnValue::None;
        self
    }

    pub fn return_old(mut self) -> Self {
        self.return_value = ReturnValue::AllOld;
        self
    }

    pub fn return_new(mut self) -> Self {
        self.return_value = ReturnValue::AllNew;
        self
    }

    pub fn return_value(mut self, rv: ReturnValue) -> Self {
        self.return_value = rv;
        self
    }
}

#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub(crate) key: PrimaryKey,
    pub(crate) condition: Option<Condition>,
    pub(crate) return_value: ReturnValue,
}

impl DeleteRequest {
    pub fn new(key: impl Into<PrimaryKey>) -> Self {
        Self {
            key: key.into(),
            condition: None,
            return_value: ReturnValue::None,
        }
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn condition_if(mut self, condition: Option<Condition>) -> Self {
        self.condition = condition;
        self
    }

    /// Parses `expr` against `names`/`values` and applies it the same way
    /// [`Self::condition`] would.
    pub fn condition_expression(
        self,
        expr: &str,
        names: &HashMap<String, String>,
        values: &HashMap<String, AttributeValue>,
    ) -> Result<Self, ExpressionParseError> {
        let condition = parse_condition_expr(expr, names, values)?;
        Ok(self.condition(condition))
    }

    pub fn return_old(mut self) -> Self {
        self.return_value = ReturnValue::AllOld;
        self
    }

    pub fn return_new(mut self) -> Self {
        self.return_value = ReturnValue::AllNew;
        self
    }

    pub fn return_value(mut self, rv: ReturnValue) -> Self {
        self.return_value = rv;
        self
    }
}

impl From<PrimaryKey> for DeleteRequest {
    fn from(key: PrimaryKey) -> Self {
        Self::new(key)
    }
}

#[derive(Debug, Clone)]
pub struct GetRequest {
    pub(crate) key: PrimaryKey,
    pub(crate) projection: Option<Vec<String>>,
}

impl GetRequest {
    pub fn new(key: impl Into<PrimaryKey>) -> Self {
        Self {
            key: key.into(),
            projection: None,
        }
    }

    pub fn project<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(attrs.into_iter().map(Into::into).collect());
        self
    }
}

impl From<PrimaryKey> for GetRequest {
    fn from(key: PrimaryKey) -> Self {
        Self::new(key)
    }
}

#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub(crate) key_condition: KeyCondition,
    pub(crate) filter: Option<Condition>,
    pub(crate) options: QueryOptions,
}

impl QueryRequest {
    pub fn new(key_condition: KeyCondition) -> Self {
        Self {
            key_condition,
            filter: None,
            options: QueryOptions::new(),
        }
    }

    pub fn filter(mut self, filter: Condition) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn filter_if(mut self, filter: Option<Condition>) -> Self {
        self.filter = filter;
        self
    }

    /// Parses `expr` against `names`/`values` and applies it the same way
    /// [`Self::filter`] would.
    pub fn filter_expression(
        self,
        expr: &str,
        names: &HashMap<String, String>,
        values: &HashMap<String, AttributeValue>,
    ) -> Result<Self, ExpressionParseError> {
        let filter = parse_condition_expr(expr, names, values)?;
        Ok(self.filter(filter))
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.options = self.options.with_limit(limit);
        self
    }

    pub fn reverse(mut self) -> Self {
        self.options = self.options.reverse();
        self
    }

    pub fn forward(mut self) -> Self {
        self.options = self.options.forward();
        self
    }

    pub fn start_after(mut self, key: PrimaryKey) -> Self {
        self.options = self.options.with_exclusive_start_key(key);
        self
    }

    pub fn options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }
}

impl From<KeyCondition> for QueryRequest {
    fn from(key_condition: KeyCondition) -> Self {
        Self::new(key_condition)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    pub(crate) filter: Option<Condition>,
    pub(crate) limit: Option<usize>,
    pub(crate) exclusive_start_key: Option<PrimaryKey>,
}

impl ScanRequest {
    pub fn new() -> Self {
        Self {
            filter: None,
            limit: None,
            exclusive_start_key: None,
        }
    }

    pub fn filter(mut self, filter: Condition) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn filter_if(mut self, filter: Option<Condition>) -> Self {
        self.filter = filter;
        self
    }

    /// Parses `expr` against `names`/`values` and applies it the same way
    /// [`Self::filter`] would.
    pub fn filter_expression(
        self,
        expr: &str,
        names: &HashMap<String, String>,
        values: &HashMap<String, AttributeValue>,
    ) -> Result<Self, ExpressionParseError> {
        let filter = parse_condition_expr(expr, names, values)?;
        Ok(self.filter(filter))
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn start_after(mut self, key: PrimaryKey) -> Self {
        self.exclusive_start_key = Some(key);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::attr;

    #[test]
    fn put() {
        let item = Item::new().with_s("pk", "test");

        let req = PutRequest::new(item.clone());
        assert!(req.condition.is_none());
        assert!(!req.if_not_exists);
        assert_eq!(req.return_value, ReturnValue::None);

        let req = PutRequest::new(item.clone())
            .condition(attr("version").eq(1i32))
            .return_old()
            .if_not_exists();
        assert!(req.condition.is_some());
        assert!(req.if_not_exists);
        assert_eq!(req.return_value, ReturnValue::AllOld);
    }

    #[test]
    fn update() {
        let key = PrimaryKey::simple("test");
        let expr = UpdateExpression::new().set("name", "Alice");

        let req = UpdateRequest::new(key.clone(), expr.clone());
        assert!(req.condition.is_none());
        assert_eq!(req.return_value, ReturnValue::AllNew);

        let req = UpdateRequest::new(key.clone(), expr.clone())
            .condition(attr("status").eq("active"))
            .return_old();
        assert!(req.condition.is_some());
        assert_eq!(req.return_value, ReturnValue::AllOld);
    }

    #[test]
    fn put_condition_expression_parses_into_the_same_ast() {
        let item = Item::new().with_s("pk", "test");
        let values = [(":v".to_string(), AttributeValue::N("1".into()))].into_iter().collect();

        let req = PutRequest::new(item)
            .condition_expression("version = :v", &HashMap::new(), &values)
            .unwrap();
        assert!(req.condition.is_some());
    }

    #[test]
    fn put_condition_expression_surfaces_parse_errors() {
        let item = Item::new().with_s("pk", "test");
        assert!(PutRequest::new(item).condition_expression("version =", &HashMap::new(), &HashMap::new()).is_err());
    }

    #[test]
    fn put_condition_expression_rejects_unused_supplied_value() {
        let item = Item::new().with_s("pk", "test");
        let values = [
            (":v".to_string(), AttributeValue::N("1".into())),
            (":unused".to_string(), AttributeValue::N("2".into())),
        ]
        .into_iter()
        .collect();
        assert!(PutRequest::new(item).condition_expression("version = :v", &HashMap::new(), &values).is_err());
    }

    #[test]
    fn update_from_expression_parses_set_clause() {
        let key = PrimaryKey::simple("test");
        let values = [(":v".to_string(), AttributeValue::S("Alice".into()))].into_iter().collect();

        let req = UpdateRequest::from_expression(key, "SET name = :v", &HashMap::new(), &values).unwrap();
        assert_eq!(req.expression.len(), 1);
    }

    #[test]
    fn delete() {
        let key = PrimaryKey::simple("test");

        let req = DeleteRequest::new(key.clone());
        assert!(req.condition.is_none());
        assert_eq!(req.return_value, ReturnValue::None);

        let req = DeleteRequest::new(key.clone())
            .condition(attr("locked").eq(false))
            .return_old();
        assert!(req.condition.is_some());
        assert_eq!(req.return_value, ReturnValue::AllOld);
    }

    #[test]
    fn query() {
        let cond = KeyCondition::pk("user1");

        let req = QueryRequest::new(cond.clone());
        assert!(req.filter.is_none());
        assert!(req.options.limit.is_none());
        assert!(req.options.scan_forward);

        let req = QueryRequest::new(cond.clone())
            .filter(attr("status").eq("active"))
            .limit(10)
            .reverse();
        assert!(req.filter.is_some());
        assert!(req.options.limit.is_some());
        assert_eq!(req.options.limit, Some(10));
        assert!(!req.options.scan_forward);
    }

    #[test]
    fn scan() {
        let req = ScanRequest::new();
        assert!(req.limit.is_none());
        assert!(req.filter.is_none());

        let req = ScanRequest::new()
            .filter(attr("status").eq("active"))
            .limit(5);
        assert!(req.limit.is_some());
        assert_eq!(req.limit, Some(5));
        assert!(req.filter.is_some());

        let req = ScanRequest::new().start_after(PrimaryKey::simple("user5"));
        assert!(req.exclusive_start_key.is_some());
    }

    #[test]
    fn delete_condition_expression_parses_function_call() {
        let key = PrimaryKey::simple("test");
        let req = DeleteRequest::new(key)
            .condition_expression("attribute_exists(locked)", &HashMap::new(), &HashMap::new())
            .unwrap();
        assert!(req.condition.is_some());
    }

    #[test]
    fn query_filter_expression_resolves_name_alias() {
        let cond = KeyCondition::pk("user1");
        let names = [("#s".to_string(), "status".to_string())].into_iter().collect();
        let values = [(":v".to_string(), AttributeValue::S("active".into()))].into_iter().collect();

        let req = QueryRequest::new(cond).filter_expression("#s = :v", &names, &values).unwrap();
        assert!(req.filter.is_some());
    }

    #[test]
    fn scan_filter_expression_rejects_unknown_value_placeholder() {
        assert!(ScanRequest::new().filter_expression("status = :v", &HashMap::new(), &HashMap::new()).is_err());
    }
}
