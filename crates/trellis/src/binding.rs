//! Binding of widget geometry to solver variables and constraints.

use tracing::warn;

use crate::{
    extent::Extents,
    geom::{Axis, Extent},
    solver::{
        Constraint, ConstraintHandle, Expression, Solver, SolverError, SolverResult, Strength,
        Variable,
    },
};

/// The solver variables describing a widget's window-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vars {
    /// Left edge.
    pub left: Variable,
    /// Bottom edge.
    pub bottom: Variable,
    /// Width.
    pub width: Variable,
    /// Height.
    pub height: Variable,
}

impl Default for Vars {
    fn default() -> Self {
        Self::new()
    }
}

impl Vars {
    /// Allocate a fresh set of variables.
    pub fn new() -> Self {
        Self {
            left: Variable::new(),
            bottom: Variable::new(),
            width: Variable::new(),
            height: Variable::new(),
        }
    }

    /// The size variable along an axis.
    pub fn size(&self, axis: Axis) -> Variable {
        match axis {
            Axis::Width => self.width,
            Axis::Height => self.height,
        }
    }

    /// `left + width`
    pub fn right(&self) -> Expression {
        self.left + self.width
    }

    /// `bottom + height`
    pub fn top(&self) -> Expression {
        self.bottom + self.height
    }
}

/// How one widget is positioned relative to another.
///
/// The first four relate a widget to a sibling, the rest to its parent. The
/// margin is the gap left between the two edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// `top + margin == other.bottom`
    Below,
    /// `bottom == other.top + margin`
    Above,
    /// `right + margin == other.left`
    LeftOf,
    /// `left == other.right + margin`
    RightOf,
    /// `top + margin == parent.top`
    AtTop,
    /// `bottom - margin == parent.bottom`
    AtBottom,
    /// `left - margin == parent.left`
    Left,
    /// `right + margin == parent.right`
    Right,
}

impl Placement {
    /// True if the placement is relative to the parent rather than a sibling.
    pub fn is_parent_relative(&self) -> bool {
        matches!(self, Self::AtTop | Self::AtBottom | Self::Left | Self::Right)
    }

    /// Build the constraint placing `this` relative to `other`.
    pub fn constraint(&self, this: &Vars, other: &Vars, margin: f32) -> Constraint {
        let m = f64::from(margin);
        match self {
            Self::Below => (this.top() + m).equal_to(other.bottom),
            Self::Above => Expression::from(this.bottom).equal_to(other.top() + m),
            Self::LeftOf => (this.right() + m).equal_to(other.left),
            Self::RightOf => Expression::from(this.left).equal_to(other.right() + m),
            Self::AtTop => (this.top() + m).equal_to(other.top()),
            Self::AtBottom => (this.bottom - m).equal_to(other.bottom),
            Self::Left => (this.left - m).equal_to(other.left),
            Self::Right => (this.right() + m).equal_to(other.right()),
        }
    }
}

/// `size >= v`, used for both minimum and preferred extents.
fn at_least(vars: &Vars, axis: Axis, v: f32) -> Constraint {
    Expression::from(vars.size(axis)).at_least(f64::from(v))
}

/// `size == v`
fn exactly(vars: &Vars, axis: Axis, v: f32) -> Constraint {
    Expression::from(vars.size(axis)).equal_to(f64::from(v))
}

/// One handle per axis.
#[derive(Debug)]
struct PerAxis<T> {
    /// Width handle.
    width: T,
    /// Height handle.
    height: T,
}

impl<T> PerAxis<T> {
    /// Mutable access by axis.
    fn get_mut(&mut self, axis: Axis) -> &mut T {
        match axis {
            Axis::Width => &mut self.width,
            Axis::Height => &mut self.height,
        }
    }
}

/// The constraint handles owned by one widget: minimum and preferred on both
/// axes, and fixed on each axis where the fixed extent is non-zero.
///
/// Handles must be given back with [`ExtentBinding::release`] before the
/// widget goes away.
#[derive(Debug)]
pub(crate) struct ExtentBinding {
    /// `size >= minimum`, required.
    minimum: PerAxis<ConstraintHandle>,
    /// `size >= preferred`, strong.
    preferred: PerAxis<ConstraintHandle>,
    /// `size == fixed`, required, only while fixed is non-zero.
    fixed: PerAxis<Option<ConstraintHandle>>,
}

impl ExtentBinding {
    /// Strength of minimum and fixed constraints.
    const MINIMUM: Strength = Strength::REQUIRED;
    /// Strength of preferred constraints.
    const PREFERRED: Strength = Strength::STRONG;

    /// Register the base constraints for `extents`. On failure every handle
    /// acquired so far is released again.
    pub(crate) fn register<S: Solver + ?Sized>(
        solver: &mut S,
        vars: &Vars,
        extents: &Extents,
    ) -> SolverResult<Self> {
        let mut acquired = scopeguard::guard(
            (&mut *solver, Vec::with_capacity(4)),
            |(solver, handles)| {
                for h in handles {
                    if let Err(e) = solver.remove_constraint(&h) {
                        warn!("releasing constraint after failed registration: {e}");
                    }
                }
            },
        );
        for axis in Axis::ALL {
            let (solver, handles) = &mut *acquired;
            let h = solver.add_constraint(
                at_least(vars, axis, extents.minimum.get(axis)),
                Self::MINIMUM,
            )?;
            handles.push(h);
        }
        for axis in Axis::ALL {
            let (solver, handles) = &mut *acquired;
            let h = solver.add_constraint(
                at_least(vars, axis, extents.preferred.get(axis)),
                Self::PREFERRED,
            )?;
            handles.push(h);
        }
        let mut fixed = PerAxis {
            width: None,
            height: None,
        };
        for axis in Axis::ALL {
            let v = extents.fixed.get(axis);
            if v != 0.0 {
                let (solver, handles) = &mut *acquired;
                let h = solver.add_constraint(exactly(vars, axis, v), Self::MINIMUM)?;
                handles.push(h);
                *fixed.get_mut(axis) = Some(handles.len() - 1);
            }
        }

        let (_, handles) = scopeguard::ScopeGuard::into_inner(acquired);
        let mut handles = handles.into_iter().map(Some).collect::<Vec<_>>();
        let mut take = |i: usize| {
            handles[i]
                .take()
                .ok_or_else(|| SolverError::Internal("constraint handle taken twice".into()))
        };
        Ok(Self {
            minimum: PerAxis {
                width: take(0)?,
                height: take(1)?,
            },
            preferred: PerAxis {
                width: take(2)?,
                height: take(3)?,
            },
            fixed: PerAxis {
                width: fixed.width.map(&mut take).transpose()?,
                height: fixed.height.map(&mut take).transpose()?,
            },
        })
    }

    /// Move the minimum constraints from `old` to `new`.
    pub(crate) fn update_minimum<S: Solver + ?Sized>(
        &mut self,
        solver: &mut S,
        vars: &Vars,
        old: Extent,
        new: Extent,
    ) -> SolverResult<()> {
        replace_axes(solver, &mut self.minimum, vars, Self::MINIMUM, old, new)
    }

    /// Move the preferred constraints from `old` to `new`.
    pub(crate) fn update_preferred<S: Solver + ?Sized>(
        &mut self,
        solver: &mut S,
        vars: &Vars,
        old: Extent,
        new: Extent,
    ) -> SolverResult<()> {
        replace_axes(solver, &mut self.preferred, vars, Self::PREFERRED, old, new)
    }

    /// Move the fixed constraints from `old` to `new`, adding or removing them
    /// as axes become fixed or unconstrained.
    pub(crate) fn update_fixed<S: Solver + ?Sized>(
        &mut self,
        solver: &mut S,
        vars: &Vars,
        old: Extent,
        new: Extent,
    ) -> SolverResult<()> {
        let mut done = None;
        for axis in Axis::ALL {
            if old.get(axis) == new.get(axis) {
                continue;
            }
            let slot = self.fixed.get_mut(axis);
            if let Err(e) = set_fixed(solver, slot, vars, axis, new.get(axis)) {
                if let Some(axis) = done {
                    // Drop the new constraint before restoring the old one:
                    // two different required equalities on one axis conflict.
                    let slot = self.fixed.get_mut(axis);
                    set_fixed(solver, slot, vars, axis, 0.0)?;
                    set_fixed(solver, slot, vars, axis, old.get(axis))?;
                }
                return Err(e);
            }
            done = Some(axis);
        }
        Ok(())
    }

    /// Release every handle.
    pub(crate) fn release<S: Solver + ?Sized>(self, solver: &mut S) -> SolverResult<()> {
        let handles = [
            Some(self.minimum.width),
            Some(self.minimum.height),
            Some(self.preferred.width),
            Some(self.preferred.height),
            self.fixed.width,
            self.fixed.height,
        ];
        let mut result = Ok(());
        for h in handles.into_iter().flatten() {
            if let Err(e) = solver.remove_constraint(&h) {
                warn!("releasing constraint {}: {e}", h.raw());
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }
}

/// Replace the `size >= v` constraints on every axis whose value changed. If
/// the second axis fails, the first is put back.
fn replace_axes<S: Solver + ?Sized>(
    solver: &mut S,
    handles: &mut PerAxis<ConstraintHandle>,
    vars: &Vars,
    strength: Strength,
    old: Extent,
    new: Extent,
) -> SolverResult<()> {
    let mut done = None;
    for axis in Axis::ALL {
        if old.get(axis) == new.get(axis) {
            continue;
        }
        let slot = handles.get_mut(axis);
        match solver.replace_constraint(slot, at_least(vars, axis, new.get(axis)), strength) {
            Ok(h) => {
                *slot = h;
                done = Some(axis);
            }
            Err(e) => {
                if let Some(axis) = done {
                    let slot = handles.get_mut(axis);
                    solver.remove_constraint(slot)?;
                    *slot = solver.add_constraint(at_least(vars, axis, old.get(axis)), strength)?;
                }
                return Err(e);
            }
        }
    }
    Ok(())
}

/// Bring a fixed-size slot in line with `value`: add, replace or remove the
/// equality. The slot is only touched when the solver accepts the change.
fn set_fixed<S: Solver + ?Sized>(
    solver: &mut S,
    slot: &mut Option<ConstraintHandle>,
    vars: &Vars,
    axis: Axis,
    value: f32,
) -> SolverResult<()> {
    let strength = ExtentBinding::MINIMUM;
    let next = match (slot.as_ref(), value != 0.0) {
        (None, false) => None,
        (None, true) => Some(solver.add_constraint(exactly(vars, axis, value), strength)?),
        (Some(h), true) => Some(solver.replace_constraint(h, exactly(vars, axis, value), strength)?),
        (Some(h), false) => {
            solver.remove_constraint(h)?;
            None
        }
    };
    *slot = next;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{solver::CassowarySolver, testing::CountingSolver};

    fn solver() -> CountingSolver<CassowarySolver> {
        CountingSolver::new(CassowarySolver::new())
    }

    #[test]
    fn register_and_release() -> SolverResult<()> {
        let mut s = solver();
        let vars = Vars::new();
        let extents = Extents::new(Extent::new(10.0, 20.0));
        let b = ExtentBinding::register(&mut s, &vars, &extents)?;
        assert_eq!(s.live(), 4);
        assert_eq!(s.value(vars.width), Some(10.0));
        assert_eq!(s.value(vars.height), Some(20.0));
        b.release(&mut s)?;
        assert_eq!(s.live(), 0);
        Ok(())
    }

    #[test]
    fn minimum_replaces_changed_axes_only() -> SolverResult<()> {
        let mut s = solver();
        let vars = Vars::new();
        let extents = Extents::new(Extent::new(10.0, 20.0));
        let mut b = ExtentBinding::register(&mut s, &vars, &extents)?;
        b.update_minimum(&mut s, &vars, extents.minimum, Extent::new(30.0, 20.0))?;
        assert_eq!(s.replaced(), 1);
        assert_eq!(s.live(), 4);
        assert_eq!(s.value(vars.width), Some(30.0));
        b.release(&mut s)?;
        assert_eq!(s.live(), 0);
        Ok(())
    }

    #[test]
    fn fixed_lifecycle() -> SolverResult<()> {
        let mut s = solver();
        let vars = Vars::new();
        let extents = Extents::new(Extent::new(10.0, 10.0));
        let mut b = ExtentBinding::register(&mut s, &vars, &extents)?;

        b.update_fixed(&mut s, &vars, Extent::zero(), Extent::new(50.0, 0.0))?;
        assert_eq!(s.live(), 5);
        assert_eq!(s.value(vars.width), Some(50.0));

        b.update_fixed(&mut s, &vars, Extent::new(50.0, 0.0), Extent::new(60.0, 0.0))?;
        assert_eq!(s.live(), 5);
        assert_eq!(s.value(vars.width), Some(60.0));

        b.update_fixed(&mut s, &vars, Extent::new(60.0, 0.0), Extent::zero())?;
        assert_eq!(s.live(), 4);
        b.release(&mut s)?;
        assert_eq!(s.live(), 0);
        Ok(())
    }

    #[test]
    fn failed_fixed_rolls_back() -> SolverResult<()> {
        let mut s = solver();
        let vars = Vars::new();
        let extents = Extents::new(Extent::new(10.0, 10.0));
        let mut b = ExtentBinding::register(&mut s, &vars, &extents)?;
        let cap = s.add_constraint(Expression::from(vars.height).at_most(40.0), Strength::REQUIRED)?;

        let err = b.update_fixed(&mut s, &vars, Extent::zero(), Extent::new(50.0, 50.0));
        assert_eq!(err, Err(SolverError::Unsatisfiable));
        // The width constraint added before the failure is gone again.
        assert_eq!(s.live(), 5);

        s.remove_constraint(&cap)?;
        b.release(&mut s)?;
        assert_eq!(s.live(), 0);
        Ok(())
    }

    #[test]
    fn placement_constraints() -> SolverResult<()> {
        let mut s = CassowarySolver::new();
        let a = Vars::new();
        let b = Vars::new();
        for (v, x) in [(a.left, 0.0), (a.bottom, 0.0), (a.width, 10.0), (a.height, 10.0)] {
            s.add_constraint(Expression::from(v).equal_to(x), Strength::REQUIRED)?;
        }
        s.add_constraint(Expression::from(b.width).equal_to(5.0), Strength::REQUIRED)?;
        s.add_constraint(Expression::from(b.height).equal_to(5.0), Strength::REQUIRED)?;
        s.add_constraint(Placement::RightOf.constraint(&b, &a, 2.0), Strength::REQUIRED)?;
        s.add_constraint(Placement::Above.constraint(&b, &a, 3.0), Strength::REQUIRED)?;
        assert_eq!(s.value(b.left), Some(12.0));
        assert_eq!(s.value(b.bottom), Some(13.0));
        assert!(Placement::Left.is_parent_relative());
        assert!(!Placement::Below.is_parent_relative());
        Ok(())
    }
}
