use std::{
    ops::{Add, Mul, Neg, Sub},
    sync::atomic::{AtomicU64, Ordering},
};

/// Source of process-unique variable identifiers.
static NEXT_VARIABLE: AtomicU64 = AtomicU64::new(1);

/// A solver variable. Variables are plain identifiers; their values live in
/// the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(u64);

impl Variable {
    /// Allocate a fresh variable.
    pub fn new() -> Self {
        Self(NEXT_VARIABLE.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for Variable {
    fn default() -> Self {
        Self::new()
    }
}

/// A variable scaled by a coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    /// The variable.
    pub variable: Variable,
    /// Its coefficient.
    pub coefficient: f64,
}

/// A linear expression: a sum of terms plus a constant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expression {
    /// The variable terms.
    pub terms: Vec<Term>,
    /// The constant part.
    pub constant: f64,
}

impl Expression {
    /// A constant expression.
    pub fn constant(v: f64) -> Self {
        Self {
            terms: Vec::new(),
            constant: v,
        }
    }

    /// The variables mentioned by this expression, without duplicates.
    pub fn variables(&self) -> Vec<Variable> {
        let mut vars: Vec<Variable> = self.terms.iter().map(|t| t.variable).collect();
        vars.sort_unstable();
        vars.dedup();
        vars
    }

    /// `self == rhs`
    pub fn equal_to(self, rhs: impl Into<Self>) -> Constraint {
        Constraint::new(self - rhs.into(), Relation::Equal)
    }

    /// `self >= rhs`
    pub fn at_least(self, rhs: impl Into<Self>) -> Constraint {
        Constraint::new(self - rhs.into(), Relation::GreaterOrEqual)
    }

    /// `self <= rhs`
    pub fn at_most(self, rhs: impl Into<Self>) -> Constraint {
        Constraint::new(self - rhs.into(), Relation::LessOrEqual)
    }
}

impl From<Variable> for Expression {
    fn from(v: Variable) -> Self {
        Self {
            terms: vec![Term {
                variable: v,
                coefficient: 1.0,
            }],
            constant: 0.0,
        }
    }
}

impl From<f64> for Expression {
    fn from(v: f64) -> Self {
        Self::constant(v)
    }
}

impl Add for Expression {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
        self
    }
}

impl Add<Variable> for Expression {
    type Output = Self;

    fn add(self, rhs: Variable) -> Self {
        self + Self::from(rhs)
    }
}

impl Add<f64> for Expression {
    type Output = Self;

    fn add(mut self, rhs: f64) -> Self {
        self.constant += rhs;
        self
    }
}

impl Neg for Expression {
    type Output = Self;

    fn neg(mut self) -> Self {
        for t in &mut self.terms {
            t.coefficient = -t.coefficient;
        }
        self.constant = -self.constant;
        self
    }
}

impl Sub for Expression {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + -rhs
    }
}

impl Sub<Variable> for Expression {
    type Output = Self;

    fn sub(self, rhs: Variable) -> Self {
        self - Self::from(rhs)
    }
}

impl Sub<f64> for Expression {
    type Output = Self;

    fn sub(self, rhs: f64) -> Self {
        self + -rhs
    }
}

impl Add<Variable> for Variable {
    type Output = Expression;

    fn add(self, rhs: Variable) -> Expression {
        Expression::from(self) + rhs
    }
}

impl Add<f64> for Variable {
    type Output = Expression;

    fn add(self, rhs: f64) -> Expression {
        Expression::from(self) + rhs
    }
}

impl Sub<Variable> for Variable {
    type Output = Expression;

    fn sub(self, rhs: Variable) -> Expression {
        Expression::from(self) - rhs
    }
}

impl Sub<f64> for Variable {
    type Output = Expression;

    fn sub(self, rhs: f64) -> Expression {
        Expression::from(self) - rhs
    }
}

impl Mul<f64> for Variable {
    type Output = Expression;

    fn mul(self, rhs: f64) -> Expression {
        Expression {
            terms: vec![Term {
                variable: self,
                coefficient: rhs,
            }],
            constant: 0.0,
        }
    }
}

/// How a constraint's expression relates to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// `expression == 0`
    Equal,
    /// `expression >= 0`
    GreaterOrEqual,
    /// `expression <= 0`
    LessOrEqual,
}

/// A linear constraint, `expression <relation> 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Left-hand side minus right-hand side.
    pub expression: Expression,
    /// Relation to zero.
    pub relation: Relation,
}

impl Constraint {
    /// Construct a constraint from a normalized expression.
    pub fn new(expression: Expression, relation: Relation) -> Self {
        Self {
            expression,
            relation,
        }
    }
}

/// Constraint priority. Only `REQUIRED` constraints can make a constraint set
/// unsatisfiable; weaker ones are violated as little as possible.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Strength(f64);

impl Strength {
    /// Must hold.
    pub const REQUIRED: Self = Self(1_001_001_000.0);
    /// Strong preference.
    pub const STRONG: Self = Self(1_000_000.0);
    /// Medium preference.
    pub const MEDIUM: Self = Self(1_000.0);
    /// Weak preference.
    pub const WEAK: Self = Self(1.0);

    /// The numeric weight.
    pub fn weight(&self) -> f64 {
        self.0
    }

    /// True for `REQUIRED` strength.
    pub fn is_required(&self) -> bool {
        *self >= Self::REQUIRED
    }
}
