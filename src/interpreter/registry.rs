use std::collections::HashMap;
use std::sync::Arc;

use crate::types::{AttributeValue, Item};

/// Whether the registry was consulted at all, and if so, what the callback
/// decided. A registered callback can still decline to handle a particular
/// invocation (`NotHandled`) and fall through to the language interpreter —
/// this lets a test stub one variant of an expression string while leaving
/// the rest to the grammar evaluator.
pub enum MatchOutcome {
    Handled(bool),
    NotHandled,
}

pub type MatchCallback = Arc<dyn Fn(&Item, &HashMap<String, AttributeValue>) -> MatchOutcome + Send + Sync>;
pub type UpdateCallback = Arc<dyn Fn(&mut Item, &HashMap<String, AttributeValue>) -> bool + Send + Sync>;

/// Dispatch order between the native registry and the language interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchStrategy {
    #[default]
    NativeFirst,
    LanguageOnly,
}

/// Registry of `(table_name, expression_string)` → callback, the escape hatch
/// callers reach for when stubbing an expression is cheaper than implementing
/// it in the grammar. Keyed by the exact expression text the caller will pass
/// at evaluation time, so two textually-different-but-equivalent expressions
/// are two separate registrations.
#[derive(Default)]
pub struct InterpreterRegistry {
    matches: HashMap<(String, String), MatchCallback>,
    updates: HashMap<(String, String), UpdateCallback>,
}

impl InterpreterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_match(
        &mut self,
        table: impl Into<String>,
        expression: impl Into<String>,
        callback: MatchCallback,
    ) {
        self.matches.insert((table.into(), expression.into()), callback);
    }

    pub fn register_update(
        &mut self,
        table: impl Into<String>,
        expression: impl Into<String>,
        callback: UpdateCallback,
    ) {
        self.updates.insert((table.into(), expression.into()), callback);
    }

    pub fn dispatch_match(
        &self,
        table: &str,
        expression: &str,
        item: &Item,
        values: &HashMap<String, AttributeValue>,
    ) -> Option<bool> {
        let key = (table.to_string(), expression.to_string());
        match self.matches.get(&key)?(item, values) {
            MatchOutcome::Handled(result) => Some(result),
            MatchOutcome::NotHandled => None,
        }
    }

    /// Returns `true` if a registered callback ran and applied the update;
    /// `false` if nothing is registered for this `(table, expression)` pair,
    /// meaning the caller should fall back to the language interpreter.
    pub fn dispatch_update(
        &self,
        table: &str,
        expression: &str,
        item: &mut Item,
        values: &HashMap<String, AttributeValue>,
    ) -> bool {
        let key = (table.to_string(), expression.to_string());
        match self.updates.get(&key) {
            Some(callback) => callback(item, values),
            None => false,
        }
    }

    pub fn has_match(&self, table: &str, expression: &str) -> bool {
        self.matches.contains_key(&(table.to_string(), expression.to_string()))
    }

    pub fn has_update(&self, table: &str, expression: &str) -> bool {
        self.updates.contains_key(&(table.to_string(), expression.to_string()))
    }
}
