//! The constraint solver interface.
//!
//! The engine never solves constraints itself. Widgets describe their sizing
//! and placement as linear constraints over [`Variable`]s and register them
//! with a [`Solver`], then read the solved values back during layout.

/// Adapter over the `cassowary` crate.
mod cassowary;
/// Variables, expressions and constraints.
mod expr;

use thiserror::Error;

pub use self::cassowary::CassowarySolver;
pub use expr::{Constraint, Expression, Relation, Strength, Term, Variable};

/// Result type for solver operations.
pub type SolverResult<T> = std::result::Result<T, SolverError>;

/// Failures reported by a solver.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum SolverError {
    /// A required constraint conflicts with the accepted constraint set.
    #[error("unsatisfiable constraint")]
    Unsatisfiable,
    /// The constraint is already registered.
    #[error("duplicate constraint")]
    Duplicate,
    /// The handle does not refer to a live constraint.
    #[error("unknown constraint handle {0}")]
    UnknownHandle(u64),
    /// The solver failed internally.
    #[error("internal solver error: {0}")]
    Internal(String),
}

/// Opaque token for a registered constraint. Handles are deliberately not
/// `Clone`: whoever holds one is responsible for releasing it.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ConstraintHandle(u64);

impl ConstraintHandle {
    /// Wrap a solver-specific identifier.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The solver-specific identifier.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A linear-arithmetic constraint solver.
///
/// `value` must reflect the most recent accepted constraint set. Whether the
/// solver re-solves incrementally on every call or lazily is up to the
/// implementation.
pub trait Solver {
    /// Register a constraint.
    fn add_constraint(
        &mut self,
        constraint: Constraint,
        strength: Strength,
    ) -> SolverResult<ConstraintHandle>;

    /// Release a constraint.
    fn remove_constraint(&mut self, handle: &ConstraintHandle) -> SolverResult<()>;

    /// Replace a constraint. The swap is atomic for callers: on failure the
    /// old constraint is still in force and the old handle stays valid.
    ///
    /// The default adds the new constraint before removing the old one.
    /// Solvers that reject two different required equalities on the same
    /// variable should override it.
    fn replace_constraint(
        &mut self,
        handle: &ConstraintHandle,
        constraint: Constraint,
        strength: Strength,
    ) -> SolverResult<ConstraintHandle> {
        let new = self.add_constraint(constraint, strength)?;
        if let Err(e) = self.remove_constraint(handle) {
            self.remove_constraint(&new)?;
            return Err(e);
        }
        Ok(new)
    }

    /// The solved value of a variable, or `None` if no accepted constraint
    /// mentions it.
    fn value(&self, variable: Variable) -> Option<f64>;
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    fn add_constraint(
        &mut self,
        constraint: Constraint,
        strength: Strength,
    ) -> SolverResult<ConstraintHandle> {
        (**self).add_constraint(constraint, strength)
    }

    fn remove_constraint(&mut self, handle: &ConstraintHandle) -> SolverResult<()> {
        (**self).remove_constraint(handle)
    }

    fn replace_constraint(
        &mut self,
        handle: &ConstraintHandle,
        constraint: Constraint,
        strength: Strength,
    ) -> SolverResult<ConstraintHandle> {
        (**self).replace_constraint(handle, constraint, strength)
    }

    fn value(&self, variable: Variable) -> Option<f64> {
        (**self).value(variable)
    }
}
