use std::collections::HashMap;

use crate::batch::{MAX_BATCH_GET_ITEMS, MAX_BATCH_WRITE_ITEMS};
use crate::error::{TableError, TableResult};
use crate::types::AttributeValue;

/// The expression texts relevant to one request, collected so unused or
/// malformed placeholders can be reported before the engine does any work.
#[derive(Debug, Clone, Default)]
pub struct ValidationRequest<'a> {
    pub expressions: Vec<&'a str>,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

impl<'a> ValidationRequest<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expression(mut self, expr: &'a str) -> Self {
        self.expressions.push(expr);
        self
    }

    pub fn names(mut self, names: HashMap<String, String>) -> Self {
        self.names = names;
        self
    }

    pub fn values(mut self, values: HashMap<String, AttributeValue>) -> Self {
        self.values = values;
        self
    }
}

/// Scans expression text for `#name`/`:value` placeholders without a full
/// grammar parser — the placeholder syntax itself is fixed and simple enough
/// that a character scan suffices, and this runs ahead of (and independently
/// from) whatever actually evaluates the expression.
pub struct PlaceholderValidator;

impl PlaceholderValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, request: &ValidationRequest) -> TableResult<()> {
        let mut referenced_names = Vec::new();
        let mut referenced_values = Vec::new();

        for expr in &request.expressions {
            let (names, values) = Self::scan(expr)?;
            referenced_names.extend(names);
            referenced_values.extend(values);
        }

        for name in &referenced_names {
            if !request.names.contains_key(name) {
                return Err(TableError::validation(format!("undefined placeholder: {name}")));
            }
        }
        for value in &referenced_values {
            if !request.values.contains_key(value) {
                return Err(TableError::validation(format!("undefined placeholder: {value}")));
            }
        }

        for name in request.names.keys() {
            if !referenced_names.contains(name) {
                return Err(TableError::validation(format!("unused expression attribute name: {name}")));
            }
        }
        for value in request.values.keys() {
            if !referenced_values.contains(value) {
                return Err(TableError::validation(format!("unused expression attribute value: {value}")));
            }
        }

        Ok(())
    }

    fn scan(expr: &str) -> TableResult<(Vec<String>, Vec<String>)> {
        let mut names = Vec::new();
        let mut values = Vec::new();
        let chars: Vec<char> = expr.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if c == '#' || c == ':' {
                let start = i;
                i += 1;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let token: String = chars[start..i].iter().collect();
                if token.len() <= 1 {
                    return Err(TableError::validation(format!("malformed placeholder at position {start}")));
                }
                if c == '#' {
                    names.push(token);
                } else {
                    values.push(token);
                }
            } else {
                i += 1;
            }
        }

        Ok((names, values))
    }
}

impl Default for PlaceholderValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// BatchWriteItem-shape constraint: at most `MAX_BATCH_WRITE_ITEMS`
/// sub-requests. The exactly-one-of-put-or-delete half of the constraint is
/// enforced by `BatchWriteItem`'s own shape (it's an enum, not a struct with
/// two optional fields), so there's nothing left to check for that here.
pub fn validate_batch_write_shape(sub_request_count: usize) -> TableResult<()> {
    if sub_request_count > MAX_BATCH_WRITE_ITEMS {
        return Err(TableError::validation(format!(
            "batch write request exceeds {MAX_BATCH_WRITE_ITEMS} items"
        )));
    }
    Ok(())
}

/// BatchGetItem-shape constraint: at most `MAX_BATCH_GET_ITEMS` keys.
pub fn validate_batch_get_shape(key_count: usize) -> TableResult<()> {
    if key_count > MAX_BATCH_GET_ITEMS {
        return Err(TableError::validation(format!(
            "batch get request exceeds {MAX_BATCH_GET_ITEMS} items"
        )));
    }
    Ok(())
}
