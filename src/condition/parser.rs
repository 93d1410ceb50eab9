//! Parses the match-expression grammar (key conditions, filters, conditional
//! writes) into the typed `Condition` AST, resolving `#name`/`:value`
//! placeholders against caller-supplied alias/value maps. The typed builder
//! API in `expression.rs` is the grammar's target — this module only turns
//! expression text into the same tree a caller could have built by hand.

use std::collections::HashMap;

use super::expression::{AttrType, CompareOp, Condition};
use super::path::AttributePath;
use crate::types::AttributeValue;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Ident(String),
    Name(String),
    Value(String),
    Number(i64),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
    Comma,
    Plus,
    Minus,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnexpectedEnd,
    UnexpectedChar(char),
    UnexpectedToken(String),
    UnknownAlias(String),
    UnknownValue(String),
    UnknownFunction(String),
    ExpectedPath,
    ExpectedValue,
    ExpectedNumber,
    NotSupported(&'static str),
    Validation(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedEnd => write!(f, "unexpected end of expression"),
            Self::UnexpectedChar(c) => write!(f, "unexpected character: {c}"),
            Self::UnexpectedToken(t) => write!(f, "unexpected token: {t}"),
            Self::UnknownAlias(n) => write!(f, "no value supplied for name placeholder #{n}"),
            Self::UnknownValue(n) => write!(f, "no value supplied for value placeholder :{n}"),
            Self::UnknownFunction(n) => write!(f, "unknown function: {n}"),
            Self::ExpectedPath => write!(f, "expected an attribute path"),
            Self::ExpectedValue => write!(f, "expected a value"),
            Self::ExpectedNumber => write!(f, "expected a numeric value"),
            Self::NotSupported(what) => write!(f, "{what} is not supported"),
            Self::Validation(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for crate::error::TableError {
    fn from(err: ParseError) -> Self {
        crate::error::TableError::Validation(err.to_string())
    }
}

/// Lets the `*_expression` request constructors run `PlaceholderValidator`
/// ahead of parsing and report its failure through the same error type the
/// parser itself returns.
impl From<crate::error::TableError> for ParseError {
    fn from(err: crate::error::TableError) -> Self {
        ParseError::Validation(err.to_string())
    }
}

pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' | '\r' => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '[' => {
                tokens.push(Token::LBracket);
                i += 1;
            }
            ']' => {
                tokens.push(Token::RBracket);
                i += 1;
            }
            '.' => {
                tokens.push(Token::Dot);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '=' => {
                tokens.push(Token::Eq);
                i += 1;
            }
            '<' => {
                if chars.get(i + 1) == Some(&'>') {
                    tokens.push(Token::Ne);
                    i += 2;
                } else if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token::Le);
                    i += 2;
                } else {
                    tokens.push(Token::Lt);
                    i += 1;
                }
            }
            '>' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token::Ge);
                    i += 2;
                } else {
                    tokens.push(Token::Gt);
                    i += 1;
                }
            }
            '#' => {
                let (name, next) = scan_ident(&chars, i + 1)?;
                tokens.push(Token::Name(name));
                i = next;
            }
            ':' => {
                let (name, next) = scan_ident(&chars, i + 1)?;
                tokens.push(Token::Value(name));
                i = next;
            }
            c if c.is_ascii_digit() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let n = text.parse::<i64>().map_err(|_| ParseError::ExpectedNumber)?;
                tokens.push(Token::Number(n));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let (name, next) = scan_ident(&chars, i)?;
                tokens.push(Token::Ident(name));
                i = next;
            }
            other => return Err(ParseError::UnexpectedChar(other)),
        }
    }
    Ok(tokens)
}

fn scan_ident(chars: &[char], start: usize) -> Result<(String, usize), ParseError> {
    let mut i = start;
    if i >= chars.len() || !(chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
        return Err(ParseError::UnexpectedEnd);
    }
    while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
        i += 1;
    }
    Ok((chars[start..i].iter().collect(), i))
}

/// Either side of a comparison/function argument before it's known whether
/// the caller meant an attribute path or a literal value.
pub(crate) enum Operand {
    Path(AttributePath),
    Value(AttributeValue),
}

impl Operand {
    pub(crate) fn into_path(self) -> Result<AttributePath, ParseError> {
        match self {
            Operand::Path(p) => Ok(p),
            Operand::Value(_) => Err(ParseError::ExpectedPath),
        }
    }

    pub(crate) fn into_value(self) -> Result<AttributeValue, ParseError> {
        match self {
            Operand::Value(v) => Ok(v),
            Operand::Path(_) => Err(ParseError::ExpectedValue),
        }
    }
}

/// Shared token-level parsing state for both the condition and update
/// grammars — path/operand/placeholder resolution is identical between the
/// two, only the surrounding clause structure differs.
pub(crate) struct Cursor<'a> {
    tokens: Vec<Token>,
    pos: usize,
    names: &'a HashMap<String, String>,
    values: &'a HashMap<String, AttributeValue>,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(
        expr: &str,
        names: &'a HashMap<String, String>,
        values: &'a HashMap<String, AttributeValue>,
    ) -> Result<Self, ParseError> {
        Ok(Self {
            tokens: tokenize(expr)?,
            pos: 0,
            names,
            values,
        })
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn advance(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn expect_end(&self) -> Result<(), ParseError> {
        if self.at_end() {
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken(format!("{:?}", self.tokens[self.pos])))
        }
    }

    pub(crate) fn eat(&mut self, tok: &Token) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, tok: Token) -> Result<(), ParseError> {
        if self.eat(&tok) {
            Ok(())
        } else {
            Err(self.current_err())
        }
    }

    fn current_err(&self) -> ParseError {
        self.peek()
            .map(|t| ParseError::UnexpectedToken(format!("{t:?}")))
            .unwrap_or(ParseError::UnexpectedEnd)
    }

    fn peek_keyword(&self) -> Option<String> {
        match self.peek() {
            Some(Token::Ident(s)) => Some(s.to_ascii_uppercase()),
            _ => None,
        }
    }

    pub(crate) fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.peek_keyword().as_deref() == Some(kw) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_keyword(&mut self, kw: &str) -> Result<(), ParseError> {
        if self.eat_keyword(kw) { Ok(()) } else { Err(self.current_err()) }
    }

    pub(crate) fn peek_is_lparen_ahead(&self) -> bool {
        matches!(self.tokens.get(self.pos + 1), Some(Token::LParen))
    }

    pub(crate) fn parse_path(&mut self) -> Result<AttributePath, ParseError> {
        let root = self.parse_path_segment_name()?;
        let mut path = AttributePath::new(root);
        loop {
            match self.peek() {
                Some(Token::Dot) => {
                    self.advance();
                    let key = self.parse_path_segment_name()?;
                    path = path.key(key);
                }
                Some(Token::LBracket) => {
                    self.advance();
                    let idx = match self.advance() {
                        Some(Token::Number(n)) if n >= 0 => n as usize,
                        _ => return Err(ParseError::ExpectedNumber),
                    };
                    self.expect(Token::RBracket)?;
                    path = path.index(idx);
                }
                _ => break,
            }
        }
        Ok(path)
    }

    fn parse_path_segment_name(&mut self) -> Result<String, ParseError> {
        match self.advance() {
            Some(Token::Ident(name)) => Ok(name),
            Some(Token::Name(alias)) => {
                self.names.get(&alias).cloned().ok_or(ParseError::UnknownAlias(alias))
            }
            Some(other) => Err(ParseError::UnexpectedToken(format!("{other:?}"))),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    pub(crate) fn parse_value(&mut self) -> Result<AttributeValue, ParseError> {
        match self.advance() {
            Some(Token::Value(name)) => {
                self.values.get(&name).cloned().ok_or(ParseError::UnknownValue(name))
            }
            Some(other) => Err(ParseError::UnexpectedToken(format!("{other:?}"))),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    pub(crate) fn parse_operand(&mut self) -> Result<Operand, ParseError> {
        match self.peek() {
            Some(Token::Value(_)) => Ok(Operand::Value(self.parse_value()?)),
            Some(Token::Ident(_)) | Some(Token::Name(_)) => Ok(Operand::Path(self.parse_path()?)),
            Some(_) => Err(self.current_err()),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    pub(crate) fn parse_compare_op(&mut self) -> Result<CompareOp, ParseError> {
        match self.advance() {
            Some(Token::Eq) => Ok(CompareOp::Eq),
            Some(Token::Ne) => Ok(CompareOp::Ne),
            Some(Token::Lt) => Ok(CompareOp::Lt),
            Some(Token::Le) => Ok(CompareOp::Le),
            Some(Token::Gt) => Ok(CompareOp::Gt),
            Some(Token::Ge) => Ok(CompareOp::Ge),
            Some(other) => Err(ParseError::UnexpectedToken(format!("{other:?}"))),
            None => Err(ParseError::UnexpectedEnd),
        }
    }
}

impl<'a> Cursor<'a> {
    pub(crate) fn parse_condition(&mut self) -> Result<Condition, ParseError> {
        let cond = self.parse_condition_or()?;
        self.expect_end()?;
        Ok(cond)
    }

    fn parse_condition_or(&mut self) -> Result<Condition, ParseError> {
        let mut left = self.parse_condition_and()?;
        while self.eat_keyword("OR") {
            let right = self.parse_condition_and()?;
            left = Condition::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_condition_and(&mut self) -> Result<Condition, ParseError> {
        let mut left = self.parse_condition_unary()?;
        while self.eat_keyword("AND") {
            let right = self.parse_condition_unary()?;
            left = Condition::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_condition_unary(&mut self) -> Result<Condition, ParseError> {
        if self.eat_keyword("NOT") {
            return Ok(Condition::Not(Box::new(self.parse_condition_unary()?)));
        }
        self.parse_condition_primary()
    }

    fn parse_condition_primary(&mut self) -> Result<Condition, ParseError> {
        if self.eat(&Token::LParen) {
            let cond = self.parse_condition_or()?;
            self.expect(Token::RParen)?;
            return Ok(cond);
        }

        if let Some(Token::Ident(name)) = self.peek().cloned() {
            if self.peek_is_lparen_ahead() {
                return self.parse_function(&name.to_ascii_lowercase());
            }
        }

        let path = self.parse_path()?;

        if self.eat_keyword("BETWEEN") {
            let low = self.parse_operand()?.into_value()?;
            self.expect_keyword("AND")?;
            let high = self.parse_operand()?.into_value()?;
            return Ok(Condition::Between { path, low, high });
        }
        if self.eat_keyword("IN") {
            return Err(ParseError::NotSupported("IN (...)"));
        }

        let op = self.parse_compare_op()?;
        let value = self.parse_operand()?.into_value()?;
        Ok(Condition::Compare { path, op, value })
    }

    fn parse_function(&mut self, name: &str) -> Result<Condition, ParseError> {
        self.advance();
        self.expect(Token::LParen)?;

        let cond = match name {
            "attribute_exists" => {
                let path = self.parse_path()?;
                Condition::AttributeExists(path)
            }
            "attribute_not_exists" => {
                let path = self.parse_path()?;
                Condition::AttributeNotExists(path)
            }
            "begins_with" => {
                let path = self.parse_path()?;
                self.expect(Token::Comma)?;
                let prefix = self.parse_operand()?.into_value()?;
                Condition::BeginsWith { path, prefix }
            }
            "contains" => {
                let path = self.parse_path()?;
                self.expect(Token::Comma)?;
                let operand = self.parse_operand()?.into_value()?;
                Condition::Contains { path, operand }
            }
            "attribute_type" => {
                let path = self.parse_path()?;
                self.expect(Token::Comma)?;
                let type_value = self.parse_operand()?.into_value()?;
                self.expect(Token::RParen)?;
                let attribute_type = attr_type_from_value(&type_value)?;
                return Ok(Condition::AttributeType { path, attribute_type });
            }
            "size" => {
                let path = self.parse_path()?;
                self.expect(Token::RParen)?;
                let op = self.parse_compare_op()?;
                let rhs = self.parse_operand()?.into_value()?;
                let value = size_literal(&rhs)?;
                return Ok(Condition::Size { path, op, value });
            }
            other => return Err(ParseError::UnknownFunction(other.to_string())),
        };
        self.expect(Token::RParen)?;
        Ok(cond)
    }
}

fn attr_type_from_value(value: &AttributeValue) -> Result<AttrType, ParseError> {
    let code = match value {
        AttributeValue::S(s) => s.as_str(),
        _ => return Err(ParseError::ExpectedValue),
    };
    match code {
        "S" => Ok(AttrType::String),
        "N" => Ok(AttrType::Number),
        "B" => Ok(AttrType::Binary),
        "BOOL" => Ok(AttrType::Boolean),
        "NULL" => Ok(AttrType::Null),
        "M" => Ok(AttrType::Map),
        "L" => Ok(AttrType::List),
        "SS" => Ok(AttrType::StringSet),
        "NS" => Ok(AttrType::NumberSet),
        "BS" => Ok(AttrType::BinarySet),
        other => Err(ParseError::UnexpectedToken(other.to_string())),
    }
}

fn size_literal(value: &AttributeValue) -> Result<usize, ParseError> {
    match value {
        AttributeValue::N(n) => n.parse::<usize>().map_err(|_| ParseError::ExpectedNumber),
        _ => Err(ParseError::ExpectedNumber),
    }
}

pub fn parse(
    expr: &str,
    names: &HashMap<String, String>,
    values: &HashMap<String, AttributeValue>,
) -> Result<Condition, ParseError> {
    Cursor::new(expr, names, values)?.parse_condition()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn values(pairs: &[(&str, AttributeValue)]) -> HashMap<String, AttributeValue> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn simple_comparison() {
        let vals = values(&[(":x", AttributeValue::N("42".into()))]);
        let cond = parse("id = :x", &HashMap::new(), &vals).unwrap();
        assert!(matches!(cond, Condition::Compare { op: CompareOp::Eq, .. }));
    }

    #[test]
    fn alias_resolution() {
        let names = names(&[("#n", "name")]);
        let vals = values(&[(":v", AttributeValue::S("Alice".into()))]);
        let cond = parse("#n = :v", &names, &vals).unwrap();
        let Condition::Compare { path, .. } = cond else { panic!("expected compare") };
        assert_eq!(path.root(), Some("name"));
    }

    #[test]
    fn missing_alias_is_an_error() {
        let vals = values(&[(":v", AttributeValue::S("x".into()))]);
        let err = parse("#missing = :v", &HashMap::new(), &vals).unwrap_err();
        assert!(matches!(err, ParseError::UnknownAlias(_)));
    }

    #[test]
    fn between() {
        let vals = values(&[
            (":lo", AttributeValue::N("1".into())),
            (":hi", AttributeValue::N("10".into())),
        ]);
        let cond = parse("score BETWEEN :lo AND :hi", &HashMap::new(), &vals).unwrap();
        assert!(matches!(cond, Condition::Between { .. }));
    }

    #[test]
    fn boolean_composition_and_precedence() {
        let vals = values(&[
            (":a", AttributeValue::S("active".into())),
            (":b", AttributeValue::N("1".into())),
        ]);
        let cond = parse("status = :a AND flag = :b OR attribute_not_exists(archived)", &HashMap::new(), &vals).unwrap();
        assert!(matches!(cond, Condition::Or(_, _)));
    }

    #[test]
    fn parenthesized_grouping() {
        let vals = values(&[
            (":a", AttributeValue::S("x".into())),
            (":b", AttributeValue::S("y".into())),
        ]);
        let cond = parse("(status = :a OR status = :b)", &HashMap::new(), &vals).unwrap();
        assert!(matches!(cond, Condition::Or(_, _)));
    }

    #[test]
    fn not_prefix() {
        let cond = parse("NOT attribute_exists(deleted)", &HashMap::new(), &HashMap::new()).unwrap();
        assert!(matches!(cond, Condition::Not(_)));
    }

    #[test]
    fn nested_path_with_index() {
        let vals = values(&[(":v", AttributeValue::S("first".into()))]);
        let cond = parse("items[0].label = :v", &HashMap::new(), &vals).unwrap();
        let Condition::Compare { path, .. } = cond else { panic!("expected compare") };
        assert_eq!(path.depth(), 3);
    }

    #[test]
    fn functions() {
        let vals = values(&[
            (":p", AttributeValue::S("Al".into())),
            (":c", AttributeValue::S("li".into())),
            (":t", AttributeValue::S("S".into())),
        ]);
        assert!(matches!(
            parse("begins_with(name, :p)", &HashMap::new(), &vals).unwrap(),
            Condition::BeginsWith { .. }
        ));
        assert!(matches!(
            parse("contains(name, :c)", &HashMap::new(), &vals).unwrap(),
            Condition::Contains { .. }
        ));
        assert!(matches!(
            parse("attribute_type(name, :t)", &HashMap::new(), &vals).unwrap(),
            Condition::AttributeType { attribute_type: AttrType::String, .. }
        ));
    }

    #[test]
    fn size_function() {
        let vals = values(&[(":n", AttributeValue::N("3".into()))]);
        let cond = parse("size(tags) > :n", &HashMap::new(), &vals).unwrap();
        assert!(matches!(cond, Condition::Size { op: CompareOp::Gt, value: 3, .. }));
    }

    #[test]
    fn in_clause_is_rejected() {
        let vals = values(&[(":a", AttributeValue::S("x".into()))]);
        let err = parse("status IN (:a)", &HashMap::new(), &vals).unwrap_err();
        assert!(matches!(err, ParseError::NotSupported(_)));
    }

    #[test]
    fn trailing_garbage_is_a_syntax_error() {
        let vals = values(&[(":a", AttributeValue::S("x".into()))]);
        let err = parse("status = :a )", &HashMap::new(), &vals).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken(_)));
    }
}
