//! Parses the update-expression grammar (`SET`/`REMOVE`/`ADD`/`DELETE`) into
//! the typed `UpdateExpression` AST. Shares token/path/placeholder handling
//! with the condition grammar's `Cursor` — only the clause structure here is
//! specific to updates.

use std::collections::HashMap;

use crate::condition::parser::{Cursor, Operand, ParseError, Token};
use crate::condition::AttributePath;
use crate::types::AttributeValue;

use super::expression::{UpdateAction, UpdateExpression};

impl<'a> Cursor<'a> {
    pub(crate) fn parse_update(&mut self) -> Result<UpdateExpression, ParseError> {
        let mut expr = UpdateExpression::new();
        let mut saw_clause = false;

        loop {
            if self.eat_keyword("SET") {
                saw_clause = true;
                loop {
                    expr = expr.with_action(self.parse_set_action()?);
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
            } else if self.eat_keyword("REMOVE") {
                saw_clause = true;
                loop {
                    let path = self.parse_path()?;
                    expr = expr.remove(path);
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
            } else if self.eat_keyword("ADD") {
                saw_clause = true;
                loop {
                    let path = self.parse_path()?;
                    let value = self.parse_operand()?.into_value()?;
                    expr = expr.add(path, value);
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
            } else if self.eat_keyword("DELETE") {
                saw_clause = true;
                loop {
                    let path = self.parse_path()?;
                    let value = self.parse_operand()?.into_value()?;
                    expr = expr.delete(path, value);
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
            } else {
                break;
            }
        }

        self.expect_end()?;
        if !saw_clause {
            return Err(ParseError::UnexpectedEnd);
        }
        Ok(expr)
    }

    fn parse_set_action(&mut self) -> Result<UpdateAction, ParseError> {
        let path = self.parse_path()?;
        self.expect(Token::Eq)?;

        if let Some(Token::Ident(name)) = self.peek().cloned() {
            if self.peek_is_lparen_ahead() {
                return self.parse_set_function(&name.to_ascii_lowercase(), path);
            }
        }

        let first = self.parse_operand()?;

        if self.eat(&Token::Plus) {
            let delta = self.parse_operand()?.into_value()?;
            return arithmetic_action(path, first, delta, true);
        }
        if self.eat(&Token::Minus) {
            let delta = self.parse_operand()?.into_value()?;
            return arithmetic_action(path, first, delta, false);
        }

        match first {
            Operand::Value(value) => Ok(UpdateAction::Set { path, value }),
            Operand::Path(_) => Err(ParseError::ExpectedValue),
        }
    }

    fn parse_set_function(&mut self, name: &str, target: AttributePath) -> Result<UpdateAction, ParseError> {
        self.advance();
        self.expect(Token::LParen)?;

        let action = match name {
            "if_not_exists" => {
                // the existence-check path is conventionally the same path
                // being set; only the fallback value is threaded through.
                self.parse_path()?;
                self.expect(Token::Comma)?;
                let value = self.parse_operand()?.into_value()?;
                UpdateAction::SetIfNotExists { path: target, value }
            }
            "list_append" => {
                let first = self.parse_operand()?;
                self.expect(Token::Comma)?;
                let second = self.parse_operand()?;
                list_append_action(target, first, second)?
            }
            other => return Err(ParseError::UnknownFunction(other.to_string())),
        };
        self.expect(Token::RParen)?;
        Ok(action)
    }
}

/// `SET x = x + :d` / `SET x = x - :d` map onto the same numeric-increment
/// semantics as an `ADD` clause — the grammar only supports this when the
/// path being assigned is the same path being read, matching how the hosted
/// service's counter-update idiom is actually written in practice.
fn arithmetic_action(
    target: AttributePath,
    first: Operand,
    delta: AttributeValue,
    is_add: bool,
) -> Result<UpdateAction, ParseError> {
    let first_path = first.into_path()?;
    if first_path != target {
        return Err(ParseError::NotSupported("arithmetic between two different paths"));
    }
    let delta_n = match delta {
        AttributeValue::N(n) => n,
        _ => return Err(ParseError::ExpectedNumber),
    };
    let value = if is_add { AttributeValue::N(delta_n) } else { AttributeValue::N(negate_numeric_string(&delta_n)) };
    Ok(UpdateAction::Add { path: target, value })
}

fn negate_numeric_string(n: &str) -> String {
    match n.strip_prefix('-') {
        Some(rest) => rest.to_string(),
        None => format!("-{n}"),
    }
}

fn list_append_action(target: AttributePath, first: Operand, second: Operand) -> Result<UpdateAction, ParseError> {
    match (first, second) {
        (Operand::Path(p), Operand::Value(v)) if p == target => {
            Ok(UpdateAction::AppendList { path: target, values: as_list(v)?, prepend: false })
        }
        (Operand::Value(v), Operand::Path(p)) if p == target => {
            Ok(UpdateAction::AppendList { path: target, values: as_list(v)?, prepend: true })
        }
        _ => Err(ParseError::NotSupported("list_append with neither argument matching the assigned path")),
    }
}

fn as_list(value: AttributeValue) -> Result<Vec<AttributeValue>, ParseError> {
    match value {
        AttributeValue::L(items) => Ok(items),
        _ => Err(ParseError::ExpectedValue),
    }
}

pub fn parse(
    expr: &str,
    names: &HashMap<String, String>,
    values: &HashMap<String, AttributeValue>,
) -> Result<UpdateExpression, ParseError> {
    Cursor::new(expr, names, values)?.parse_update()
}
