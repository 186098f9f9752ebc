//! Propositional logic: truth tables and equivalence checking
//!
//! Expressions are parsed by a small recursive-descent parser over a fixed
//! grammar instead of a general expression evaluator:
//!
//! ```text
//! iff     := implies (("iff" | "<->" | "<=>") implies)*
//! implies := or (("implies" | "->" | "=>") implies)?      right-associative
//! or      := xor (("or" | "||" | "|") xor)*
//! xor     := and (("xor" | "^") and)*
//! and     := unary (("and" | "&&" | "&") unary)*
//! unary   := ("not" | "!" | "~") unary | primary
//! primary := identifier | "true" | "false" | "(" iff ")"
//! ```
//!
//! Keywords are case-insensitive. Identifiers start with a letter.

use crate::error::{CalcError, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

/// Words that are operators or literals, never variables
pub const RESERVED_WORDS: [&str; 8] = [
    "and", "or", "not", "xor", "implies", "iff", "true", "false",
];

/// Largest variable count a table is built for (2^16 rows)
pub const MAX_VARIABLES: usize = 16;

fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(word))
}

// ============================================================================
// Syntax tree
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    Xor,
    Implies,
    Iff,
}

impl BinaryOp {
    fn apply(self, left: bool, right: bool) -> bool {
        match self {
            Self::And => left && right,
            Self::Or => left || right,
            Self::Xor => left != right,
            Self::Implies => !left || right,
            Self::Iff => left == right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Const(bool),
    Var(String),
    Not(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Evaluate under a variable assignment
    pub fn evaluate(&self, scope: &BTreeMap<String, bool>) -> Result<bool> {
        match self {
            Self::Const(value) => Ok(*value),
            Self::Var(name) => scope
                .get(name)
                .copied()
                .ok_or_else(|| CalcError::evaluation(format!("Unbound variable: {}", name))),
            Self::Not(inner) => Ok(!inner.evaluate(scope)?),
            Self::Binary(op, left, right) => {
                Ok(op.apply(left.evaluate(scope)?, right.evaluate(scope)?))
            },
        }
    }
}

// ============================================================================
// Lexer
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Const(bool),
    Op(BinaryOp),
    Not,
    LParen,
    RParen,
}

/// Symbolic operators, longest first so `<->` wins over `->`
const SYMBOLS: [(&str, Token); 12] = [
    ("<->", Token::Op(BinaryOp::Iff)),
    ("<=>", Token::Op(BinaryOp::Iff)),
    ("->", Token::Op(BinaryOp::Implies)),
    ("=>", Token::Op(BinaryOp::Implies)),
    ("&&", Token::Op(BinaryOp::And)),
    ("||", Token::Op(BinaryOp::Or)),
    ("&", Token::Op(BinaryOp::And)),
    ("|", Token::Op(BinaryOp::Or)),
    ("^", Token::Op(BinaryOp::Xor)),
    ("!", Token::Not),
    ("~", Token::Not),
    ("(", Token::LParen),
];

fn keyword(word: &str) -> Option<Token> {
    match word.to_ascii_lowercase().as_str() {
        "and" => Some(Token::Op(BinaryOp::And)),
        "or" => Some(Token::Op(BinaryOp::Or)),
        "xor" => Some(Token::Op(BinaryOp::Xor)),
        "implies" => Some(Token::Op(BinaryOp::Implies)),
        "iff" => Some(Token::Op(BinaryOp::Iff)),
        "not" => Some(Token::Not),
        "true" => Some(Token::Const(true)),
        "false" => Some(Token::Const(false)),
        _ => None,
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut rest = input;

    'outer: while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            rest = &rest[c.len_utf8()..];
            continue;
        }
        if c == ')' {
            tokens.push(Token::RParen);
            rest = &rest[1..];
            continue;
        }
        for (symbol, token) in SYMBOLS.iter() {
            if let Some(stripped) = rest.strip_prefix(symbol) {
                tokens.push(token.clone());
                rest = stripped;
                continue 'outer;
            }
        }
        if c.is_ascii_alphabetic() {
            let end = rest
                .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
                .unwrap_or(rest.len());
            let word = &rest[..end];
            tokens.push(keyword(word).unwrap_or_else(|| Token::Ident(word.to_string())));
            rest = &rest[end..];
            continue;
        }
        return Err(CalcError::evaluation(format!(
            "Unexpected character '{}' in expression",
            c
        )));
    }

    trace!(count = tokens.len(), "logic tokens");
    Ok(tokens)
}

// ============================================================================
// Parser
// ============================================================================

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat_op(&mut self, op: BinaryOp) -> bool {
        if self.peek() == Some(&Token::Op(op)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn iff(&mut self) -> Result<Expr> {
        let mut left = self.implies()?;
        while self.eat_op(BinaryOp::Iff) {
            let right = self.implies()?;
            left = Expr::Binary(BinaryOp::Iff, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn implies(&mut self) -> Result<Expr> {
        let left = self.or()?;
        if self.eat_op(BinaryOp::Implies) {
            let right = self.implies()?;
            return Ok(Expr::Binary(
                BinaryOp::Implies,
                Box::new(left),
                Box::new(right),
            ));
        }
        Ok(left)
    }

    fn or(&mut self) -> Result<Expr> {
        let mut left = self.xor()?;
        while self.eat_op(BinaryOp::Or) {
            let right = self.xor()?;
            left = Expr::Binary(BinaryOp::Or, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn xor(&mut self) -> Result<Expr> {
        let mut left = self.and()?;
        while self.eat_op(BinaryOp::Xor) {
            let right = self.and()?;
            left = Expr::Binary(BinaryOp::Xor, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<Expr> {
        let mut left = self.unary()?;
        while self.eat_op(BinaryOp::And) {
            let right = self.unary()?;
            left = Expr::Binary(BinaryOp::And, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.peek() == Some(&Token::Not) {
            self.pos += 1;
            return Ok(Expr::Not(Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        match self.next() {
            Some(Token::Ident(name)) => Ok(Expr::Var(name)),
            Some(Token::Const(value)) => Ok(Expr::Const(value)),
            Some(Token::LParen) => {
                let inner = self.iff()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(CalcError::evaluation("Missing closing parenthesis")),
                }
            },
            Some(other) => Err(CalcError::evaluation(format!(
                "Unexpected token {:?}",
                other
            ))),
            None => Err(CalcError::evaluation("Unexpected end of expression")),
        }
    }
}

/// Parse an expression into a syntax tree
pub fn parse_expression(input: &str) -> Result<Expr> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(CalcError::evaluation("Expression is empty"));
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.iff()?;
    if let Some(extra) = parser.peek() {
        return Err(CalcError::evaluation(format!(
            "Unexpected trailing token {:?}",
            extra
        )));
    }
    Ok(expr)
}

// ============================================================================
// Truth tables
// ============================================================================

/// Sorted, deduplicated free variables of an expression
///
/// Works on raw text, so it also lists variables of an expression that does
/// not parse.
pub fn extract_variables(expr: &str) -> Result<Vec<String>> {
    let re = Regex::new(r"[A-Za-z][A-Za-z0-9_]*")
        .map_err(|e| CalcError::evaluation(format!("Regex error: {}", e)))?;

    let variables: BTreeSet<String> = re
        .find_iter(expr)
        .map(|m| m.as_str())
        .filter(|word| !is_reserved(word))
        .map(str::to_string)
        .collect();
    Ok(variables.into_iter().collect())
}

/// Outcome of one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum RowResult {
    Value(bool),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TruthRow {
    /// Values in the order of [`TruthTable::variables`]
    pub assignment: Vec<bool>,
    pub result: RowResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Tautology,
    Contradiction,
    Contingent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TruthTable {
    pub variables: Vec<String>,
    pub rows: Vec<TruthRow>,
    /// Absent when any row failed to evaluate
    pub classification: Option<Classification>,
}

fn check_variable_count(count: usize) -> Result<()> {
    if count > MAX_VARIABLES {
        return Err(CalcError::invalid_input(format!(
            "{} variables exceed the limit of {}",
            count, MAX_VARIABLES
        )));
    }
    Ok(())
}

/// Row `index` of the binary enumeration; the first variable varies slowest
fn assignment(variables: &[String], index: usize) -> BTreeMap<String, bool> {
    let k = variables.len();
    variables
        .iter()
        .enumerate()
        .map(|(j, name)| (name.clone(), (index >> (k - 1 - j)) & 1 == 1))
        .collect()
}

/// Enumerate all 2^k assignments and evaluate the expression on each
pub fn build_truth_table(expr: &str) -> Result<TruthTable> {
    let variables = extract_variables(expr)?;
    check_variable_count(variables.len())?;
    let parsed = parse_expression(expr);

    let rows: Vec<TruthRow> = (0..1usize << variables.len())
        .map(|index| {
            let scope = assignment(&variables, index);
            let result = match parsed.as_ref() {
                Ok(tree) => match tree.evaluate(&scope) {
                    Ok(value) => RowResult::Value(value),
                    Err(e) => RowResult::Error(e.message().to_string()),
                },
                Err(e) => RowResult::Error(e.message().to_string()),
            };
            TruthRow {
                assignment: variables.iter().map(|v| scope[v]).collect(),
                result,
            }
        })
        .collect();

    let values: Option<Vec<bool>> = rows
        .iter()
        .map(|row| match row.result {
            RowResult::Value(v) => Some(v),
            RowResult::Error(_) => None,
        })
        .collect();
    let classification = values.map(|values| {
        if values.iter().all(|v| *v) {
            Classification::Tautology
        } else if values.iter().all(|v| !*v) {
            Classification::Contradiction
        } else {
            Classification::Contingent
        }
    });

    debug!(
        variables = variables.len(),
        rows = rows.len(),
        ?classification,
        "truth table"
    );

    Ok(TruthTable {
        variables,
        rows,
        classification,
    })
}

// ============================================================================
// Equivalence
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Equivalence {
    Equivalent {
        variables: Vec<String>,
        rows_checked: usize,
    },
    NotEquivalent {
        /// First assignment, in binary order, where the expressions differ
        counterexample: BTreeMap<String, bool>,
        left: bool,
        right: bool,
    },
}

/// Compare two expressions over every assignment of their combined variables
pub fn check_equivalence(left: &str, right: &str) -> Result<Equivalence> {
    let left_tree = parse_expression(left)?;
    let right_tree = parse_expression(right)?;

    let variables: Vec<String> = extract_variables(left)?
        .into_iter()
        .chain(extract_variables(right)?)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    check_variable_count(variables.len())?;

    let rows = 1usize << variables.len();
    for index in 0..rows {
        let scope = assignment(&variables, index);
        let l = left_tree.evaluate(&scope)?;
        let r = right_tree.evaluate(&scope)?;
        if l != r {
            debug!(index, "expressions differ");
            return Ok(Equivalence::NotEquivalent {
                counterexample: scope,
                left: l,
                right: r,
            });
        }
    }

    Ok(Equivalence::Equivalent {
        variables,
        rows_checked: rows,
    })
}
