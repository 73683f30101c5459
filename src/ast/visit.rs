//! Visitor dispatch over the W AST (spec.md §4.1).
//!
//! One trait per traversal — [`ExprVisitor`] for expressions, [`StmtVisitor`]
//! for statements — rather than a single oversized visitor base, per the
//! "visitor dispatch vs. tagged variants" design note: a systems language
//! prefers pattern-matching tagged unions, so these traits exist only to let
//! external consumers hook specific variants while falling back to a default
//! that walks children in declaration order. Consumers that need to *compute*
//! a typed value per node (the concrete and symbolic interpreters) implement
//! their own direct recursion instead — value-producing evaluation doesn't
//! fit a side-effecting default-dispatch trait, so only side-effecting
//! traversals (like the undef-use analyzer in [`crate::undef`]) build on
//! these.

use super::{BoolExp, BoolOp, IntExp, Stmt};

/// Side-effecting traversal over expressions. Default methods recurse into
/// children in declaration order and do nothing else; override a method to
/// hook that variant.
pub trait ExprVisitor {
    fn visit_int_exp(&mut self, e: &IntExp) {
        match e {
            IntExp::IntConst(_) => {}
            IntExp::IntVar(v) => self.visit_int_var(v),
            IntExp::ArithExp(_, args) => {
                for a in args {
                    self.visit_int_exp(a);
                }
            }
        }
    }

    /// Hook for `IntVar` references specifically — the most commonly
    /// overridden leaf (e.g. the undef-use analyzer's use-check).
    fn visit_int_var(&mut self, _v: &super::IntVar) {}

    fn visit_bool_exp(&mut self, e: &BoolExp) {
        match e {
            BoolExp::BoolConst(_) => {}
            BoolExp::RelExp(_, lhs, rhs) => {
                self.visit_int_exp(lhs);
                self.visit_int_exp(rhs);
            }
            BoolExp::BExp(_, args) => {
                for a in args {
                    self.visit_bool_exp(a);
                }
            }
        }
    }
}

/// Side-effecting traversal over statements, built on [`ExprVisitor`].
pub trait StmtVisitor: ExprVisitor {
    fn visit_stmt(&mut self, s: &Stmt) {
        match s {
            Stmt::Skip => self.visit_skip(),
            Stmt::PrintState => self.visit_print_state(),
            Stmt::Assign(lhs, rhs) => self.visit_assign(lhs, rhs),
            Stmt::If(cond, then, else_) => self.visit_if(cond, then, else_.as_deref()),
            Stmt::While(cond, inv, body) => self.visit_while(cond, inv.as_ref(), body),
            Stmt::Assert(cond) => self.visit_assert(cond),
            Stmt::Assume(cond) => self.visit_assume(cond),
            Stmt::Havoc(vars) => self.visit_havoc(vars),
            Stmt::StmtList(stmts) => self.visit_stmt_list(stmts),
        }
    }

    fn visit_skip(&mut self) {}
    fn visit_print_state(&mut self) {}

    fn visit_assign(&mut self, _lhs: &super::IntVar, rhs: &IntExp) {
        self.visit_int_exp(rhs);
    }

    fn visit_if(&mut self, cond: &BoolExp, then: &Stmt, else_: Option<&Stmt>) {
        self.visit_bool_exp(cond);
        self.visit_stmt(then);
        if let Some(e) = else_ {
            self.visit_stmt(e);
        }
    }

    fn visit_while(&mut self, cond: &BoolExp, inv: Option<&BoolExp>, body: &Stmt) {
        self.visit_bool_exp(cond);
        if let Some(inv) = inv {
            self.visit_bool_exp(inv);
        }
        self.visit_stmt(body);
    }

    fn visit_assert(&mut self, cond: &BoolExp) {
        self.visit_bool_exp(cond);
    }

    fn visit_assume(&mut self, cond: &BoolExp) {
        self.visit_bool_exp(cond);
    }

    fn visit_havoc(&mut self, _vars: &[super::IntVar]) {}

    fn visit_stmt_list(&mut self, stmts: &[Stmt]) {
        for s in stmts {
            self.visit_stmt(s);
        }
    }
}

/// Count every `IntExp`/`BoolExp` node below a statement — a minimal
/// worked example of the trait, and a smoke test that default dispatch
/// actually reaches every variant.
#[derive(Default)]
pub struct NodeCounter {
    pub count: usize,
}

impl ExprVisitor for NodeCounter {
    fn visit_int_exp(&mut self, e: &IntExp) {
        self.count += 1;
        match e {
            IntExp::ArithExp(_, args) => {
                for a in args {
                    self.visit_int_exp(a);
                }
            }
            _ => {}
        }
    }

    fn visit_bool_exp(&mut self, e: &BoolExp) {
        self.count += 1;
        match e {
            BoolExp::RelExp(_, lhs, rhs) => {
                self.visit_int_exp(lhs);
                self.visit_int_exp(rhs);
            }
            BoolExp::BExp(_, args) => {
                for a in args {
                    self.visit_bool_exp(a);
                }
            }
            BoolExp::BoolConst(_) => {}
        }
    }
}

impl StmtVisitor for NodeCounter {}

#[allow(unused)]
fn _assert_bool_op_exhaustive(op: BoolOp) {
    match op {
        BoolOp::And | BoolOp::Or | BoolOp::Not => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BoolExp, IntExp, IntVar, RelOp, Stmt};

    #[test]
    fn default_dispatch_reaches_every_node() {
        let prog = Stmt::StmtList(vec![
            Stmt::Assign(IntVar::new("x"), IntExp::IntConst(10)),
            Stmt::If(
                BoolExp::rel(RelOp::Lt, IntExp::var("x"), IntExp::IntConst(2)),
                Box::new(Stmt::Skip),
                None,
            ),
        ]);
        let mut counter = NodeCounter::default();
        counter.visit_stmt(&prog);
        // x := 10:           IntConst(10)                -> 1
        // if (x<2) then skip: RelExp + IntVar(x) + IntConst(2) -> 3
        assert_eq!(counter.count, 4);
    }
}
