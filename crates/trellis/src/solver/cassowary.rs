use std::collections::{BTreeMap, HashMap};

use ::cassowary as cw;
use tracing::debug;

use super::{
    Constraint, ConstraintHandle, Relation, Solver, SolverError, SolverResult, Strength, Variable,
};

/// A cassowary variable and the number of live constraints mentioning it.
#[derive(Debug, Clone, Copy)]
struct Binding {
    /// The variable as cassowary knows it.
    var: cw::Variable,
    /// Live constraints mentioning it. Zero only while a constraint is being
    /// added.
    refs: usize,
}

/// A [`Solver`] backed by the `cassowary` crate's incremental simplex solver.
///
/// Values are recomputed on every accepted change, so `value` is always
/// current. `cassowary` can leave its tableau inconsistent after rejecting an
/// unsatisfiable constraint, so on rejection the adapter rebuilds the solver
/// from the constraints it still holds.
pub struct CassowarySolver {
    /// The underlying solver.
    solver: cw::Solver,
    /// Live constraints by handle id, in registration order, with the
    /// variables they mention.
    constraints: BTreeMap<u64, (cw::Constraint, Vec<Variable>)>,
    /// Cassowary variables for every variable a live constraint mentions.
    variables: HashMap<Variable, Binding>,
    /// Next handle id.
    next_handle: u64,
}

// SAFETY: `cassowary` uses `Rc` internally, which makes its solver and
// constraints `!Send`. Every `Rc` clone it creates is owned either by
// `solver` or by the `constraints` map; none is ever handed out. Moving the
// whole adapter to another thread therefore moves every clone together.
unsafe impl Send for CassowarySolver {}

impl Default for CassowarySolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CassowarySolver {
    /// Construct an empty solver.
    pub fn new() -> Self {
        Self {
            solver: cw::Solver::new(),
            constraints: BTreeMap::new(),
            variables: HashMap::new(),
            next_handle: 1,
        }
    }

    /// Number of live constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// True if no constraints are registered.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Replace the underlying solver with a fresh one holding exactly the live
    /// constraints.
    fn rebuild(&mut self) -> SolverResult<()> {
        debug!(constraints = self.constraints.len(), "rebuilding cassowary solver");
        let mut solver = cw::Solver::new();
        for (converted, _) in self.constraints.values() {
            solver.add_constraint(converted.clone()).map_err(|e| {
                SolverError::Internal(format!("re-adding accepted constraint: {e:?}"))
            })?;
        }
        self.solver = solver;
        Ok(())
    }

    /// Undo a rejected add: rebuild the tableau and drop variables that only
    /// the rejected constraint mentioned.
    fn reject(&mut self, e: cw::AddConstraintError) -> SolverError {
        self.variables.retain(|_, b| b.refs > 0);
        match self.rebuild() {
            Ok(()) => Self::add_error(e),
            Err(rebuild) => rebuild,
        }
    }

    /// Record an accepted constraint and issue its handle. `converted` must be
    /// the instance handed to cassowary: its constraints compare by identity.
    fn remember(&mut self, converted: cw::Constraint, constraint: &Constraint) -> ConstraintHandle {
        let vars = constraint.expression.variables();
        for v in &vars {
            if let Some(b) = self.variables.get_mut(v) {
                b.refs += 1;
            }
        }
        let id = self.next_handle;
        self.next_handle += 1;
        self.constraints.insert(id, (converted, vars));
        ConstraintHandle::from_raw(id)
    }

    /// Drop the bookkeeping for a constraint the solver no longer holds.
    fn forget(&mut self, id: u64) {
        let Some((_, vars)) = self.constraints.remove(&id) else {
            return;
        };
        for v in vars {
            if let Some(b) = self.variables.get_mut(&v) {
                b.refs = b.refs.saturating_sub(1);
                if b.refs == 0 {
                    self.variables.remove(&v);
                }
            }
        }
    }

    /// Map a rejected add.
    fn add_error(e: cw::AddConstraintError) -> SolverError {
        match e {
            cw::AddConstraintError::DuplicateConstraint => SolverError::Duplicate,
            cw::AddConstraintError::UnsatisfiableConstraint => SolverError::Unsatisfiable,
            cw::AddConstraintError::InternalSolverError(msg) => SolverError::Internal(msg.to_string()),
        }
    }

    /// Map a rejected remove.
    fn remove_error(e: cw::RemoveConstraintError, handle: &ConstraintHandle) -> SolverError {
        match e {
            cw::RemoveConstraintError::UnknownConstraint => SolverError::UnknownHandle(handle.raw()),
            cw::RemoveConstraintError::InternalSolverError(msg) => {
                SolverError::Internal(msg.to_string())
            }
        }
    }

    /// The cassowary variable for `v`, allocated on first use.
    fn variable(&mut self, v: Variable) -> cw::Variable {
        self.variables
            .entry(v)
            .or_insert_with(|| Binding {
                var: cw::Variable::new(),
                refs: 0,
            })
            .var
    }

    /// Translate a constraint into cassowary's representation.
    fn convert(&mut self, constraint: &Constraint, strength: Strength) -> cw::Constraint {
        let terms = constraint
            .expression
            .terms
            .iter()
            .map(|t| cw::Term {
                variable: self.variable(t.variable),
                coefficient: t.coefficient,
            })
            .collect();
        let expr = cw::Expression {
            terms,
            constant: constraint.expression.constant,
        };
        let op = match constraint.relation {
            Relation::Equal => cw::RelationalOperator::Equal,
            Relation::GreaterOrEqual => cw::RelationalOperator::GreaterOrEqual,
            Relation::LessOrEqual => cw::RelationalOperator::LessOrEqual,
        };
        cw::Constraint::new(expr, op, cw::strength::clip(strength.weight()))
    }
}

impl Solver for CassowarySolver {
    fn add_constraint(
        &mut self,
        constraint: Constraint,
        strength: Strength,
    ) -> SolverResult<ConstraintHandle> {
        let converted = self.convert(&constraint, strength);
        if let Err(e) = self.solver.add_constraint(converted.clone()) {
            return Err(self.reject(e));
        }
        Ok(self.remember(converted, &constraint))
    }

    fn remove_constraint(&mut self, handle: &ConstraintHandle) -> SolverResult<()> {
        let (converted, _) = self
            .constraints
            .get(&handle.raw())
            .ok_or(SolverError::UnknownHandle(handle.raw()))?;
        self.solver
            .remove_constraint(converted)
            .map_err(|e| Self::remove_error(e, handle))?;
        self.forget(handle.raw());
        Ok(())
    }

    /// Swap the constraint in place. The old constraint is taken out before
    /// the new one goes in, so an equality can be moved to a new value. If the
    /// new constraint is rejected the solver is rebuilt with the old one still
    /// registered under its handle.
    fn replace_constraint(
        &mut self,
        handle: &ConstraintHandle,
        constraint: Constraint,
        strength: Strength,
    ) -> SolverResult<ConstraintHandle> {
        let old = self
            .constraints
            .get(&handle.raw())
            .map(|(c, _)| c.clone())
            .ok_or(SolverError::UnknownHandle(handle.raw()))?;
        self.solver
            .remove_constraint(&old)
            .map_err(|e| Self::remove_error(e, handle))?;
        let converted = self.convert(&constraint, strength);
        if let Err(e) = self.solver.add_constraint(converted.clone()) {
            return Err(self.reject(e));
        }
        let new = self.remember(converted, &constraint);
        self.forget(handle.raw());
        Ok(new)
    }

    fn value(&self, variable: Variable) -> Option<f64> {
        self.variables
            .get(&variable)
            .filter(|b| b.refs > 0)
            .map(|b| self.solver.get_value(b.var))
    }
}
