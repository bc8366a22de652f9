//! Parser for serializable type strings and catalog identifiers.
//!
//! Accepts the canonical form produced by [`LogicalType`]'s `Display` plus
//! the usual SQL aliases (`INTEGER`, `STRING`, `DOUBLE PRECISION`, ...).
//! User-defined types are resolved while parsing through a
//! [`UserTypeResolver`], so a successful parse always yields a complete type.

use std::sync::Arc;

use thiserror::Error;

use super::logical::{
    ExtensionType, LogicalType, RowField, TypeRoot, MAX_DECIMAL_PRECISION, MAX_TIMESTAMP_PRECISION,
};
use crate::catalog::{ObjectIdentifier, UnresolvedIdentifier};
use crate::error::ReferenceKind;

/// Default limit on type nesting (`ARRAY<ARRAY<...>>`).
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Error while parsing a type string or identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeParseError {
    /// The input is not well-formed.
    #[error("{message} at position {position} in '{input}'")]
    Syntax {
        /// The complete input.
        input: String,
        /// Byte offset of the offending token.
        position: usize,
        /// What went wrong.
        message: String,
    },

    /// A user-defined type could not be resolved.
    #[error("unresolved {kind} '{name}'")]
    Unresolved {
        /// Kind of the missing reference.
        kind: ReferenceKind,
        /// The reference as written.
        name: String,
    },
}

/// Resolves user-defined types referenced by name inside type strings.
pub trait UserTypeResolver {
    /// Resolve a distinct type to its qualified identifier and source type.
    fn resolve_distinct(
        &self,
        identifier: &UnresolvedIdentifier,
    ) -> Option<(ObjectIdentifier, LogicalType)>;

    /// Resolve an extension type by implementation class name.
    fn resolve_extension(&self, class_name: &str) -> Option<Arc<ExtensionType>>;
}

/// Resolver that knows no user-defined types.
pub struct NoUserTypes;

impl UserTypeResolver for NoUserTypes {
    fn resolve_distinct(
        &self,
        _identifier: &UnresolvedIdentifier,
    ) -> Option<(ObjectIdentifier, LogicalType)> {
        None
    }

    fn resolve_extension(&self, _class_name: &str) -> Option<Arc<ExtensionType>> {
        None
    }
}

/// Parser handle for type strings and identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeParser {
    max_depth: usize,
}

impl Default for TypeParser {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl TypeParser {
    /// Create a parser with the default nesting limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with a custom nesting limit.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Deepest type nesting this parser accepts.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse a complete type string.
    pub fn parse_type(
        &self,
        input: &str,
        resolver: &dyn UserTypeResolver,
    ) -> Result<LogicalType, TypeParseError> {
        let mut parser = Parser::new(input, self.max_depth, resolver)?;
        let ty = parser.parse_type()?;
        parser.expect_end()?;
        Ok(ty)
    }

    /// Parse a complete identifier such as `` `cat`.`db`.`t` `` or `db.t`.
    pub fn parse_identifier(&self, input: &str) -> Result<UnresolvedIdentifier, TypeParseError> {
        let mut parser = Parser::new(input, self.max_depth, &NoUserTypes)?;
        let identifier = match parser.next() {
            Some((_, Token::Word(w))) => parser.parse_identifier(w)?,
            Some((_, Token::Quoted(q))) => parser.parse_identifier(q)?,
            _ => return Err(parser.error_at_previous("expected identifier")),
        };
        parser.expect_end()?;
        Ok(identifier)
    }
}

// =============================================================================
// Lexer
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Quoted(String),
    Literal(String),
    Number(u64),
    Symbol(char),
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, TypeParseError> {
    let syntax = |position: usize, message: &str| TypeParseError::Syntax {
        input: input.to_string(),
        position,
        message: message.to_string(),
    };

    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();
    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '`' | '\'' => {
                chars.next();
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some((_, ch)) if ch == c => {
                            // A doubled quote is an escaped quote.
                            if chars.peek().map(|&(_, n)| n) == Some(c) {
                                chars.next();
                                text.push(c);
                            } else {
                                break;
                            }
                        }
                        Some((_, ch)) => text.push(ch),
                        None => return Err(syntax(start, "unterminated quote")),
                    }
                }
                let token = if c == '`' { Token::Quoted(text) } else { Token::Literal(text) };
                tokens.push((start, token));
            }
            c if c.is_ascii_digit() => {
                let mut value: u64 = 0;
                while let Some(&(_, d)) = chars.peek() {
                    let Some(digit) = d.to_digit(10) else { break };
                    value = value
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(u64::from(digit)))
                        .ok_or_else(|| syntax(start, "number out of range"))?;
                    chars.next();
                }
                tokens.push((start, Token::Number(value)));
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                let mut word = String::new();
                while let Some(&(_, w)) = chars.peek() {
                    if w.is_alphanumeric() || w == '_' || w == '$' {
                        word.push(w);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((start, Token::Word(word)));
            }
            '<' | '>' | '(' | ')' | ',' | '.' => {
                chars.next();
                tokens.push((start, Token::Symbol(c)));
            }
            _ => return Err(syntax(start, &format!("unexpected character '{c}'"))),
        }
    }
    Ok(tokens)
}

// =============================================================================
// Parser
// =============================================================================

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<(usize, Token)>,
    pos: usize,
    depth: usize,
    max_depth: usize,
    resolver: &'a dyn UserTypeResolver,
}

impl<'a> Parser<'a> {
    fn new(
        input: &'a str,
        max_depth: usize,
        resolver: &'a dyn UserTypeResolver,
    ) -> Result<Self, TypeParseError> {
        Ok(Self {
            input,
            tokens: tokenize(input)?,
            pos: 0,
            depth: 0,
            max_depth,
            resolver,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn next(&mut self) -> Option<(usize, Token)> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn current_position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(p, _)| *p)
            .unwrap_or(self.input.len())
    }

    fn error_at(&self, position: usize, message: impl Into<String>) -> TypeParseError {
        TypeParseError::Syntax {
            input: self.input.to_string(),
            position,
            message: message.into(),
        }
    }

    fn error_here(&self, message: impl Into<String>) -> TypeParseError {
        self.error_at(self.current_position(), message)
    }

    fn error_at_previous(&self, message: impl Into<String>) -> TypeParseError {
        let position = self
            .pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|(p, _)| *p)
            .unwrap_or(self.input.len());
        self.error_at(position, message)
    }

    fn expect_end(&self) -> Result<(), TypeParseError> {
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(self.error_here("unexpected trailing input")),
        }
    }

    fn expect_symbol(&mut self, symbol: char) -> Result<(), TypeParseError> {
        match self.peek() {
            Some(Token::Symbol(c)) if *c == symbol => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(self.error_here(format!("expected '{symbol}'"))),
        }
    }

    fn eat_symbol(&mut self, symbol: char) -> bool {
        if matches!(self.peek(), Some(Token::Symbol(c)) if *c == symbol) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if matches!(self.peek(), Some(Token::Word(w)) if w.eq_ignore_ascii_case(keyword)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_number(&mut self) -> Result<u64, TypeParseError> {
        match self.peek() {
            Some(Token::Number(n)) => {
                let n = *n;
                self.pos += 1;
                Ok(n)
            }
            _ => Err(self.error_here("expected number")),
        }
    }

    /// Parse `( n )` if present.
    fn optional_length(&mut self) -> Result<Option<u64>, TypeParseError> {
        if !self.eat_symbol('(') {
            return Ok(None);
        }
        let n = self.expect_number()?;
        self.expect_symbol(')')?;
        Ok(Some(n))
    }

    fn parse_type(&mut self) -> Result<LogicalType, TypeParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.error_here(format!("type nesting exceeds {}", self.max_depth)));
        }
        let ty = self.parse_root()?;
        self.depth -= 1;

        if self.eat_keyword("NOT") {
            if !self.eat_keyword("NULL") {
                return Err(self.error_here("expected NULL after NOT"));
            }
            return Ok(ty.not_null());
        }
        self.eat_keyword("NULL");
        Ok(ty)
    }

    fn parse_root(&mut self) -> Result<LogicalType, TypeParseError> {
        let start = self.current_position();
        let word = match self.next() {
            Some((_, Token::Word(w))) => w,
            Some((_, Token::Quoted(q))) => {
                let identifier = self.parse_identifier(q)?;
                return self.resolve_distinct(identifier);
            }
            _ => return Err(self.error_at(start, "expected type")),
        };

        let ty = match word.to_ascii_uppercase().as_str() {
            "BOOLEAN" | "BOOL" => LogicalType::boolean(),
            "TINYINT" => LogicalType::tinyint(),
            "SMALLINT" => LogicalType::smallint(),
            "INT" | "INTEGER" => LogicalType::int(),
            "BIGINT" => LogicalType::bigint(),
            "FLOAT" => LogicalType::float(),
            "DOUBLE" => {
                self.eat_keyword("PRECISION");
                LogicalType::double()
            }
            "DECIMAL" | "DEC" | "NUMERIC" => self.parse_decimal(start)?,
            "CHAR" | "CHARACTER" => LogicalType::char(self.parse_length(start)?),
            "VARCHAR" => LogicalType::varchar(self.parse_length(start)?),
            "STRING" => LogicalType::string(),
            "DATE" => LogicalType::date(),
            "TIMESTAMP" => {
                let precision = self.optional_length()?.unwrap_or(6);
                if precision > u64::from(MAX_TIMESTAMP_PRECISION) {
                    return Err(self.error_at(
                        start,
                        format!(
                            "TIMESTAMP precision must be between 0 and {MAX_TIMESTAMP_PRECISION}"
                        ),
                    ));
                }
                LogicalType::timestamp(precision as u8)
            }
            "ARRAY" => {
                self.expect_symbol('<')?;
                let element = self.parse_type()?;
                self.expect_symbol('>')?;
                LogicalType::array(element)
            }
            "MAP" => {
                self.expect_symbol('<')?;
                let key = self.parse_type()?;
                self.expect_symbol(',')?;
                let value = self.parse_type()?;
                self.expect_symbol('>')?;
                LogicalType::map(key, value)
            }
            "ROW" => self.parse_row()?,
            "EXTENSION" => {
                self.expect_symbol('(')?;
                let class_name = match self.next() {
                    Some((_, Token::Literal(s))) => s,
                    _ => return Err(self.error_at_previous("expected quoted class name")),
                };
                self.expect_symbol(')')?;
                let extension = self.resolver.resolve_extension(&class_name).ok_or_else(|| {
                    TypeParseError::Unresolved {
                        kind: ReferenceKind::ExtensionClass,
                        name: class_name.clone(),
                    }
                })?;
                LogicalType::new(TypeRoot::Extension(extension))
            }
            _ => {
                let identifier = self.parse_identifier(word)?;
                return self.resolve_distinct(identifier);
            }
        };
        Ok(ty)
    }

    fn parse_length(&mut self, start: usize) -> Result<u32, TypeParseError> {
        let length = self.optional_length()?.unwrap_or(1);
        if length == 0 || length > u64::from(super::logical::MAX_VARCHAR_LENGTH) {
            return Err(self.error_at(start, "length must be between 1 and 2147483647"));
        }
        Ok(length as u32)
    }

    fn parse_decimal(&mut self, start: usize) -> Result<LogicalType, TypeParseError> {
        let (precision, scale) = if self.eat_symbol('(') {
            let precision = self.expect_number()?;
            let scale = if self.eat_symbol(',') { self.expect_number()? } else { 0 };
            self.expect_symbol(')')?;
            (precision, scale)
        } else {
            (10, 0)
        };
        if precision == 0 || precision > u64::from(MAX_DECIMAL_PRECISION) {
            return Err(self.error_at(
                start,
                format!("DECIMAL precision must be between 1 and {MAX_DECIMAL_PRECISION}"),
            ));
        }
        if scale > precision {
            return Err(self.error_at(start, "DECIMAL scale must not exceed precision"));
        }
        Ok(LogicalType::decimal(precision as u8, scale as u8))
    }

    fn parse_row(&mut self) -> Result<LogicalType, TypeParseError> {
        self.expect_symbol('<')?;
        let mut fields = Vec::new();
        if !self.eat_symbol('>') {
            loop {
                let name = match self.next() {
                    Some((_, Token::Word(w))) => w,
                    Some((_, Token::Quoted(q))) => q,
                    _ => return Err(self.error_at_previous("expected field name")),
                };
                let data_type = self.parse_type()?;
                fields.push(RowField::new(name, data_type));
                if self.eat_symbol('>') {
                    break;
                }
                self.expect_symbol(',')?;
            }
        }
        Ok(LogicalType::row(fields))
    }

    /// Parse the remaining `.part` segments of an identifier whose first part was consumed.
    fn parse_identifier(&mut self, first: String) -> Result<UnresolvedIdentifier, TypeParseError> {
        let start = self.current_position();
        let mut parts = vec![first];
        while self.eat_symbol('.') {
            match self.next() {
                Some((_, Token::Word(w))) => parts.push(w),
                Some((_, Token::Quoted(q))) => parts.push(q),
                _ => return Err(self.error_at_previous("expected identifier part")),
            }
        }
        UnresolvedIdentifier::from_parts(parts)
            .ok_or_else(|| self.error_at(start, "identifier must have at most three parts"))
    }

    fn resolve_distinct(
        &self,
        identifier: UnresolvedIdentifier,
    ) -> Result<LogicalType, TypeParseError> {
        let (qualified, source) = self.resolver.resolve_distinct(&identifier).ok_or_else(|| {
            TypeParseError::Unresolved {
                kind: ReferenceKind::Type,
                name: identifier.to_string(),
            }
        })?;
        Ok(LogicalType::distinct(qualified, source))
    }
}
