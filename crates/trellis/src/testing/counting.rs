use std::collections::HashSet;

use crate::solver::{Constraint, ConstraintHandle, Solver, SolverResult, Strength, Variable};

/// Wraps a solver and keeps books on the handles passing through it. Tests
/// use it to check that widgets replace rather than re-add constraints and
/// that every handle is eventually released.
#[derive(Debug, Default)]
pub struct CountingSolver<S> {
    /// The wrapped solver.
    inner: S,
    /// Raw ids of handles that are currently registered.
    live: HashSet<u64>,
    /// Successful adds, not counting those made by a replace.
    added: usize,
    /// Successful replaces.
    replaced: usize,
    /// Successful removes, not counting those made by a replace.
    removed: usize,
}

impl<S: Solver> CountingSolver<S> {
    /// Wrap a solver.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            live: HashSet::new(),
            added: 0,
            replaced: 0,
            removed: 0,
        }
    }

    /// Number of live handles.
    pub fn live(&self) -> usize {
        self.live.len()
    }

    /// Is the handle with this raw id still registered?
    pub fn is_live(&self, raw: u64) -> bool {
        self.live.contains(&raw)
    }

    /// Successful adds.
    pub fn added(&self) -> usize {
        self.added
    }

    /// Successful replaces.
    pub fn replaced(&self) -> usize {
        self.replaced
    }

    /// Successful removes.
    pub fn removed(&self) -> usize {
        self.removed
    }

    /// The wrapped solver.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: Solver> Solver for CountingSolver<S> {
    fn add_constraint(
        &mut self,
        constraint: Constraint,
        strength: Strength,
    ) -> SolverResult<ConstraintHandle> {
        let h = self.inner.add_constraint(constraint, strength)?;
        self.live.insert(h.raw());
        self.added += 1;
        Ok(h)
    }

    fn remove_constraint(&mut self, handle: &ConstraintHandle) -> SolverResult<()> {
        self.inner.remove_constraint(handle)?;
        self.live.remove(&handle.raw());
        self.removed += 1;
        Ok(())
    }

    fn replace_constraint(
        &mut self,
        handle: &ConstraintHandle,
        constraint: Constraint,
        strength: Strength,
    ) -> SolverResult<ConstraintHandle> {
        let h = self.inner.replace_constraint(handle, constraint, strength)?;
        self.live.remove(&handle.raw());
        self.live.insert(h.raw());
        self.replaced += 1;
        Ok(h)
    }

    fn value(&self, variable: Variable) -> Option<f64> {
        self.inner.value(variable)
    }
}
