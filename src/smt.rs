//! SMT facade over the `z3` crate (QF_LIA — quantifier-free linear integer
//! arithmetic), wrapping push/pop/assert/check/model behind the handful of
//! operations the symbolic executor actually needs.
//!
//! Modeled on the `Path`/solver-handle idiom used for SMT-backed symbolic
//! execution elsewhere in the ecosystem: one [`Context`] lives for the whole
//! run, every symbolic state holds an `Rc<Solver<'ctx>>` so forking a path is
//! a cheap `Rc::clone` rather than a fresh solver, and satisfiability checks
//! are scoped with `push`/`pop` instead of spinning up throwaway solvers.

use std::collections::BTreeMap;
use std::rc::Rc;

use z3::ast::{Ast, Bool, Int};
use z3::{Config, Context, SatResult, Solver};

/// Owns the `z3::Context` for a single `wexec` invocation. One per run.
pub struct SmtContext {
    ctx: Context,
}

impl SmtContext {
    pub fn new() -> Self {
        let cfg = Config::new();
        Self {
            ctx: Context::new(&cfg),
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// A fresh solver over this context, ready to be shared across forked
    /// symbolic states via `Rc`.
    pub fn solver(&self) -> Rc<Solver<'_>> {
        Rc::new(Solver::new(&self.ctx))
    }
}

impl Default for SmtContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A satisfying assignment for the integer variables named in a query,
/// extracted from a `z3::Model`.
pub type Assignment = BTreeMap<String, i64>;

/// Check whether `solver`'s accumulated assertions, conjoined with
/// `extra`, are satisfiable — without permanently adding `extra`. Used by
/// the bounded-unroll loop rule to test "can the guard still hold?" without
/// committing to that branch.
pub fn check_with<'ctx>(solver: &Solver<'ctx>, extra: &Bool<'ctx>) -> SatResult {
    solver.push();
    solver.assert(extra);
    let result = solver.check();
    solver.pop(1);
    result
}

/// Check satisfiability of everything currently asserted on `solver`.
pub fn check(solver: &Solver<'_>) -> SatResult {
    solver.check()
}

/// Pull a satisfying assignment for `vars` out of `solver`'s last model.
/// Only meaningful immediately after a `check` that returned `Sat`.
pub fn model_assignment<'ctx>(
    ctx: &'ctx Context,
    solver: &Solver<'ctx>,
    vars: &[String],
) -> Option<Assignment> {
    let model = solver.get_model()?;
    let mut out = BTreeMap::new();
    for name in vars {
        let var = Int::new_const(ctx, name.as_str());
        if let Some(val) = model.eval(&var, true).and_then(|v| v.as_i64()) {
            out.insert(name.clone(), val);
        }
    }
    Some(out)
}

/// Render a formula in SMT-LIB2 text, for `--smt2`-style diagnostics.
pub fn to_smt2(solver: &Solver<'_>) -> String {
    solver.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsatisfiable_conjunction_is_detected() {
        let smt = SmtContext::new();
        let ctx = smt.context();
        let solver = smt.solver();
        let x = Int::new_const(ctx, "x");
        solver.assert(&x.gt(&Int::from_i64(ctx, 10)));
        solver.assert(&x.lt(&Int::from_i64(ctx, 5)));
        assert_eq!(check(&solver), SatResult::Unsat);
    }

    #[test]
    fn model_extraction_returns_a_witness() {
        let smt = SmtContext::new();
        let ctx = smt.context();
        let solver = smt.solver();
        let x = Int::new_const(ctx, "x");
        solver.assert(&x._eq(&Int::from_i64(ctx, 42)));
        assert_eq!(check(&solver), SatResult::Sat);
        let assignment = model_assignment(ctx, &solver, &["x".to_string()]).unwrap();
        assert_eq!(assignment.get("x"), Some(&42));
    }

    #[test]
    fn check_with_does_not_permanently_assert() {
        let smt = SmtContext::new();
        let ctx = smt.context();
        let solver = smt.solver();
        let x = Int::new_const(ctx, "x");
        solver.assert(&x._eq(&Int::from_i64(ctx, 1)));

        let contradiction = x._eq(&Int::from_i64(ctx, 2));
        assert_eq!(check_with(&solver, &contradiction), SatResult::Unsat);
        // the solver itself is unaffected — x = 1 is still satisfiable alone.
        assert_eq!(check(&solver), SatResult::Sat);
    }
}
