//! Model formulas
//!
//! A [`FormulaSpec`] names one numeric response column and an ordered set of
//! predictor terms. It is parsed from the familiar `response ~ terms`
//! notation and checked against a dataset before any case is fitted.
//!
//! Supported right-hand side syntax:
//!
//! | syntax | meaning |
//! |---|---|
//! | `x` | the column `x` |
//! | `a:b` | the product of `a` and `b` |
//! | `I(x^k)` | `x` raised to the integer power `k ≥ 1` |
//! | `1`, `+ 1` | keep the intercept (the default) |
//! | `0`, `+ 0`, `- 1` | drop the intercept |
//! | `- term` | remove a term added earlier |

use crate::design::DesignMatrix;
use casewise_core::{Dataset, Error, Result};
use std::fmt;
use std::str::FromStr;

/// Name of the intercept term
pub const INTERCEPT: &str = "(Intercept)";

/// One variable inside a term, possibly raised to a power
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factor {
    variable: String,
    power: u32,
    /// Written as `I(...)`
    wrapped: bool,
}

impl Factor {
    fn parse(text: &str) -> Result<Self> {
        let text = text.trim();

        if let Some(inner) = text.strip_prefix("I(").and_then(|t| t.strip_suffix(')')) {
            let inner = inner.trim();
            let (variable, power) = match inner.split_once('^') {
                Some((variable, power)) => {
                    let power = power.trim().parse::<u32>().ok().filter(|&p| p >= 1).ok_or_else(
                        || {
                            Error::InvalidInput(format!(
                                "power in '{text}' must be a positive integer"
                            ))
                        },
                    )?;
                    (variable.trim(), power)
                }
                None => (inner, 1),
            };
            return Ok(Self {
                variable: identifier(variable, text)?,
                power,
                wrapped: true,
            });
        }

        Ok(Self {
            variable: identifier(text, text)?,
            power: 1,
            wrapped: false,
        })
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn power(&self) -> u32 {
        self.power
    }

    fn name(&self) -> String {
        match (self.wrapped, self.power) {
            (false, _) => self.variable.clone(),
            (true, 1) => format!("I({})", self.variable),
            (true, p) => format!("I({}^{})", self.variable, p),
        }
    }

    fn evaluate(&self, value: f64) -> f64 {
        value.powi(self.power as i32)
    }
}

/// A predictor term: the product of one or more factors
#[derive(Debug, Clone)]
pub struct Term {
    factors: Vec<Factor>,
    name: String,
}

impl Term {
    fn parse(text: &str) -> Result<Self> {
        let factors = text
            .split(':')
            .map(Factor::parse)
            .collect::<Result<Vec<_>>>()?;
        let name = factors
            .iter()
            .map(Factor::name)
            .collect::<Vec<_>>()
            .join(":");
        Ok(Self { factors, name })
    }

    /// Coefficient name, e.g. `vals`, `I(vals^2)`, `a:b`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Number of factors; main effects sort before interactions
    pub fn order(&self) -> usize {
        self.factors.len()
    }

    /// `a:b` and `b:a` are the same term
    fn same_as(&self, other: &Term) -> bool {
        let mut mine: Vec<String> = self.factors.iter().map(Factor::name).collect();
        let mut theirs: Vec<String> = other.factors.iter().map(Factor::name).collect();
        mine.sort();
        theirs.sort();
        mine == theirs
    }

    /// Value of the term from the values of its factors' variables
    pub(crate) fn evaluate(&self, mut value_of: impl FnMut(&str) -> f64) -> f64 {
        self.factors
            .iter()
            .map(|f| f.evaluate(value_of(&f.variable)))
            .product()
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Plus,
    Minus,
}

/// Parsed model formula shared by every case fit
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaSpec {
    response: String,
    intercept: bool,
    terms: Vec<Term>,
}

impl FormulaSpec {
    /// Parse `response ~ terms`
    ///
    /// Fails with `InvalidInput` on syntax errors or a model without any
    /// coefficient.
    pub fn parse(formula: &str) -> Result<Self> {
        let (lhs, rhs) = formula
            .split_once('~')
            .ok_or_else(|| Error::InvalidInput(format!("formula '{formula}' has no '~'")))?;
        if rhs.contains('~') {
            return Err(Error::InvalidInput(format!(
                "formula '{formula}' has more than one '~'"
            )));
        }

        let response = identifier(lhs.trim(), formula)?;
        let mut intercept = true;
        let mut terms: Vec<Term> = Vec::new();

        for (sign, token) in split_signed(rhs, formula)? {
            match token.as_str() {
                "1" => intercept = sign == Sign::Plus,
                "0" => intercept = sign == Sign::Minus,
                _ => {
                    let term = Term::parse(&token)?;
                    match sign {
                        Sign::Plus if !terms.contains(&term) => terms.push(term),
                        Sign::Plus => {}
                        Sign::Minus => terms.retain(|t| t != &term),
                    }
                }
            }
        }

        terms.sort_by_key(Term::order);

        if !intercept && terms.is_empty() {
            return Err(Error::InvalidInput(format!(
                "formula '{formula}' has no coefficients to estimate"
            )));
        }

        Ok(Self {
            response,
            intercept,
            terms,
        })
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn has_intercept(&self) -> bool {
        self.intercept
    }

    /// Predictor terms without the intercept
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Coefficient names in model order, intercept first
    pub fn term_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.n_params());
        if self.intercept {
            names.push(INTERCEPT.to_string());
        }
        names.extend(self.terms.iter().map(|t| t.name.clone()));
        names
    }

    /// Number of coefficients per case
    pub fn n_params(&self) -> usize {
        self.terms.len() + usize::from(self.intercept)
    }

    /// Every column the model reads, response first, without repeats
    pub fn variables(&self) -> Vec<&str> {
        let mut vars: Vec<&str> = vec![self.response.as_str()];
        for factor in self.terms.iter().flat_map(|t| t.factors.iter()) {
            if !vars.contains(&factor.variable.as_str()) {
                vars.push(&factor.variable);
            }
        }
        vars
    }

    /// Check that every variable is a numeric column of `data`
    pub fn validate(&self, data: &Dataset) -> Result<()> {
        for variable in self.variables() {
            data.numeric(variable)?;
        }
        Ok(())
    }

    /// Design matrix and response for the given rows of `data`
    ///
    /// Rows with a missing value in any model variable are dropped; the
    /// number dropped is recorded on the result.
    pub fn design(&self, data: &Dataset, rows: &[usize]) -> Result<DesignMatrix> {
        let variables = self.variables();
        let columns = variables
            .iter()
            .map(|&v| data.numeric(v))
            .collect::<Result<Vec<_>>>()?;

        let complete: Vec<usize> = rows
            .iter()
            .copied()
            .filter(|&row| columns.iter().all(|c| c[row].is_finite()))
            .collect();

        let value_of = |row: usize, name: &str| -> f64 {
            variables
                .iter()
                .position(|&v| v == name)
                .map_or(f64::NAN, |i| columns[i][row])
        };

        let n_params = self.n_params();
        let mut x = Vec::with_capacity(complete.len() * n_params);
        for &row in &complete {
            if self.intercept {
                x.push(1.0);
            }
            for term in &self.terms {
                x.push(term.evaluate(|name| value_of(row, name)));
            }
        }
        let y = complete.iter().map(|&row| columns[0][row]).collect();

        DesignMatrix::from_row_major(
            self.term_names(),
            self.intercept,
            complete.len(),
            x,
            y,
            rows.len() - complete.len(),
        )
    }
}

impl fmt::Display for FormulaSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ ", self.response)?;
        let names: Vec<&str> = self.terms.iter().map(Term::name).collect();
        match (self.intercept, names.is_empty()) {
            (true, true) => write!(f, "1"),
            (true, false) => write!(f, "{}", names.join(" + ")),
            (false, _) => write!(f, "{} - 1", names.join(" + ")),
        }
    }
}

impl FromStr for FormulaSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn identifier(text: &str, context: &str) -> Result<String> {
    let valid = text
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '.')
        && text
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '.');
    if valid {
        Ok(text.to_string())
    } else {
        Err(Error::InvalidInput(format!(
            "'{text}' in '{context}' is not a column name"
        )))
    }
}

/// Split the right-hand side at top-level `+` and `-`
fn split_signed(rhs: &str, formula: &str) -> Result<Vec<(Sign, String)>> {
    let syntax = |what: &str| Error::InvalidInput(format!("formula '{formula}': {what}"));

    let mut parts = Vec::new();
    let mut sign = Sign::Plus;
    let mut pending_operator = false;
    let mut current = String::new();
    let mut depth = 0usize;

    for c in rhs.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| syntax("unbalanced ')'"))?;
                current.push(c);
            }
            '+' | '-' if depth == 0 => {
                let token = current.trim();
                if token.is_empty() {
                    if pending_operator || !parts.is_empty() {
                        return Err(syntax("operator without a term"));
                    }
                } else {
                    parts.push((sign, token.to_string()));
                }
                sign = if c == '+' { Sign::Plus } else { Sign::Minus };
                pending_operator = true;
                current.clear();
            }
            _ => current.push(c),
        }
    }

    if depth != 0 {
        return Err(syntax("unbalanced '('"));
    }
    let token = current.trim();
    if token.is_empty() {
        return Err(syntax("missing term"));
    }
    parts.push((sign, token.to_string()));

    Ok(parts)
}
