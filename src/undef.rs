//! Used-before-defined analysis (spec.md §4.3).
//!
//! Built directly on [`crate::ast::visit`]: every hook below overrides the
//! one piece of default dispatch that needs non-trivial bookkeeping
//! (`If`/`While`'s save/restore of the defined-set); everything else — the
//! sequencing in `StmtList`, threading through `Assert`/`Assume` — is the
//! trait's plain default traversal.

use std::collections::BTreeSet;

use crate::ast::visit::{ExprVisitor, StmtVisitor};
use crate::ast::{IntVar, Stmt};

#[derive(Debug, Default)]
pub struct UndefAnalyzer {
    defined: BTreeSet<String>,
    undef: BTreeSet<String>,
}

impl UndefAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the analysis over `stmt` and return `(undef, defined)`.
    pub fn analyze(stmt: &Stmt) -> (BTreeSet<String>, BTreeSet<String>) {
        let mut a = Self::new();
        a.visit_stmt(stmt);
        (a.undef, a.defined)
    }

    pub fn get_undefs(&self) -> &BTreeSet<String> {
        &self.undef
    }

    pub fn get_defs(&self) -> &BTreeSet<String> {
        &self.defined
    }
}

impl ExprVisitor for UndefAnalyzer {
    fn visit_int_var(&mut self, v: &IntVar) {
        if !self.defined.contains(&v.name) {
            self.undef.insert(v.name.clone());
        }
    }
}

impl StmtVisitor for UndefAnalyzer {
    fn visit_assign(&mut self, lhs: &IntVar, rhs: &crate::ast::IntExp) {
        self.visit_int_exp(rhs);
        self.defined.insert(lhs.name.clone());
    }

    fn visit_havoc(&mut self, vars: &[IntVar]) {
        for v in vars {
            self.defined.insert(v.name.clone());
        }
    }

    fn visit_if(&mut self, cond: &crate::ast::BoolExp, then: &Stmt, else_: Option<&Stmt>) {
        self.visit_bool_exp(cond);
        let d0 = self.defined.clone();

        self.visit_stmt(then);
        let d_then = std::mem::replace(&mut self.defined, d0.clone());

        match else_ {
            Some(else_) => {
                self.visit_stmt(else_);
                let d_else = std::mem::take(&mut self.defined);
                self.defined = d_then.intersection(&d_else).cloned().collect();
            }
            // No else branch: only definitions shared with the (implicit,
            // no-op) fallthrough survive — i.e. the pre-if set, D0.
            None => self.defined = d0,
        }
    }

    fn visit_while(&mut self, cond: &crate::ast::BoolExp, inv: Option<&crate::ast::BoolExp>, body: &Stmt) {
        self.visit_bool_exp(cond);
        if let Some(inv) = inv {
            self.visit_bool_exp(inv);
        }
        let d0 = self.defined.clone();
        self.visit_stmt(body);
        // Body may run zero times — only pre-loop definitions are guaranteed.
        self.defined = d0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ArithOp, BoolExp, IntExp, RelOp};

    #[test]
    fn plain_assignment_chain_has_no_undef() {
        let s = Stmt::StmtList(vec![
            Stmt::Assign(IntVar::new("x"), IntExp::IntConst(10)),
            Stmt::Assign(
                IntVar::new("y"),
                IntExp::arith(ArithOp::Add, vec![IntExp::var("x"), IntExp::var("z")]),
            ),
        ]);
        let (undef, _) = UndefAnalyzer::analyze(&s);
        assert_eq!(undef, BTreeSet::from(["z".to_string()]));
    }

    #[test]
    fn if_without_else_only_tests_the_condition() {
        let s = Stmt::if_stmt(
            BoolExp::rel(RelOp::Lt, IntExp::var("x"), IntExp::IntConst(2)),
            Stmt::Skip,
            None,
        );
        let (undef, _) = UndefAnalyzer::analyze(&s);
        assert_eq!(undef, BTreeSet::from(["x".to_string()]));
    }

    #[test]
    fn if_without_else_drops_then_branch_definitions() {
        let s = Stmt::StmtList(vec![
            Stmt::if_stmt(
                BoolExp::BoolConst(true),
                Stmt::Assign(IntVar::new("y"), IntExp::IntConst(1)),
                None,
            ),
            Stmt::Assign(IntVar::new("z"), IntExp::var("y")),
        ]);
        let (undef, _) = UndefAnalyzer::analyze(&s);
        assert_eq!(undef, BTreeSet::from(["y".to_string()]));
    }

    #[test]
    fn if_with_both_branches_defining_survives_as_defined() {
        let s = Stmt::StmtList(vec![
            Stmt::if_stmt(
                BoolExp::BoolConst(true),
                Stmt::Assign(IntVar::new("y"), IntExp::IntConst(1)),
                Some(Stmt::Assign(IntVar::new("y"), IntExp::IntConst(2))),
            ),
            Stmt::Assign(IntVar::new("z"), IntExp::var("y")),
        ]);
        let (undef, _) = UndefAnalyzer::analyze(&s);
        assert!(undef.is_empty());
    }

    #[test]
    fn while_loop_body_definitions_do_not_survive() {
        let s = Stmt::StmtList(vec![
            Stmt::while_stmt(
                BoolExp::BoolConst(true),
                None,
                Stmt::Assign(IntVar::new("y"), IntExp::IntConst(1)),
            ),
            Stmt::Assign(IntVar::new("z"), IntExp::var("y")),
        ]);
        let (undef, _) = UndefAnalyzer::analyze(&s);
        assert_eq!(undef, BTreeSet::from(["y".to_string()]));
    }

    #[test]
    fn x_assign_then_y_assign_from_x_and_z_matches_spec_scenario_8() {
        let s = Stmt::StmtList(vec![
            Stmt::Assign(IntVar::new("x"), IntExp::IntConst(10)),
            Stmt::Assign(
                IntVar::new("y"),
                IntExp::arith(ArithOp::Add, vec![IntExp::var("x"), IntExp::var("z")]),
            ),
        ]);
        let (undef, _) = UndefAnalyzer::analyze(&s);
        assert_eq!(undef.len(), 1);
        assert!(undef.contains("z"));
    }

    #[test]
    fn havoc_counts_as_definition() {
        let s = Stmt::StmtList(vec![
            Stmt::Havoc(vec![IntVar::new("x")]),
            Stmt::Assign(IntVar::new("y"), IntExp::var("x")),
        ]);
        let (undef, _) = UndefAnalyzer::analyze(&s);
        assert!(undef.is_empty());
    }
}
