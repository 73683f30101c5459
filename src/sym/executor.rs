//! Tree-walking symbolic executor (spec.md §4.5): produces the set of
//! symbolic states reachable at a program's exit along feasible paths.

use z3::Context;

use crate::ast::{BoolExp, Stmt};
use crate::config::Config;
use crate::undef::UndefAnalyzer;

use super::expr::{eval_bool, eval_int};
use super::{SymError, SymState};

/// The exact diagnostic strings below are part of the external contract
/// (spec.md §9) — user-facing tool output, not meant to be machine-parsed.
const DIAG_ASSERTION_MIGHT_BE_VIOLATED: &str = "Assertion might be violated";
const DIAG_INV_FAILS_INITIATION: &str = "inv fails initiation";
const DIAG_INV_NOT_PRESERVED: &str = "inv not preserved";

pub struct SymExecutor<'ctx> {
    ctx: &'ctx Context,
    unroll_limit: u32,
    diagnostics: Vec<String>,
}

impl<'ctx> SymExecutor<'ctx> {
    pub fn new(ctx: &'ctx Context, config: &Config) -> Self {
        Self {
            ctx,
            unroll_limit: config.unroll_limit,
            diagnostics: Vec::new(),
        }
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Run `stmt` from `initial`, returning every symbolic state reachable
    /// at the program's exit along a feasible path.
    pub fn run(
        &mut self,
        stmt: &Stmt,
        initial: SymState<'ctx>,
    ) -> Result<Vec<SymState<'ctx>>, SymError> {
        self.exec(stmt, initial)
    }

    /// Execute `stmt` against a single input state, returning the (possibly
    /// empty, possibly multi-element) set of output states.
    fn exec(&mut self, stmt: &Stmt, state: SymState<'ctx>) -> Result<Vec<SymState<'ctx>>, SymError> {
        match stmt {
            Stmt::Skip => Ok(vec![state]),
            Stmt::PrintState => {
                println!("{}", state);
                Ok(vec![state])
            }
            Stmt::Assign(v, e) => {
                let mut state = state;
                let term = eval_int(self.ctx, &state.env, e)?;
                state.env.insert(v.name.clone(), term);
                Ok(vec![state])
            }
            Stmt::Havoc(vars) => {
                let mut state = state;
                for v in vars {
                    state.havoc_var(&v.name);
                }
                Ok(vec![state])
            }
            Stmt::Assume(cond) => {
                let mut state = state;
                let term = eval_bool(self.ctx, &state.env, cond)?;
                state.add_pc(term);
                Ok(if state.is_empty() { vec![] } else { vec![state] })
            }
            Stmt::Assert(cond) => self.exec_assert(cond, state),
            Stmt::If(cond, then, else_) => self.exec_if(cond, then, else_.as_deref(), state),
            Stmt::While(cond, inv, body) => match inv {
                Some(inv) => self.exec_while_invariant(cond, inv, body, state),
                None => self.exec_while_unroll(cond, body, state),
            },
            Stmt::StmtList(stmts) => self.exec_seq(stmts, vec![state]),
        }
    }

    fn exec_seq(
        &mut self,
        stmts: &[Stmt],
        mut states: Vec<SymState<'ctx>>,
    ) -> Result<Vec<SymState<'ctx>>, SymError> {
        for stmt in stmts {
            let mut next = Vec::new();
            for state in states {
                next.extend(self.exec(stmt, state)?);
            }
            states = next;
        }
        Ok(states)
    }

    fn exec_assert(
        &mut self,
        cond: &BoolExp,
        state: SymState<'ctx>,
    ) -> Result<Vec<SymState<'ctx>>, SymError> {
        let term = eval_bool(self.ctx, &state.env, cond)?;
        let (mut s_true, mut s_false) = state.fork();

        s_false.add_pc(term.not());
        if !s_false.is_empty() {
            s_false.mk_error();
            self.diagnostics.push(DIAG_ASSERTION_MIGHT_BE_VIOLATED.to_string());
        }

        s_true.add_pc(term);
        Ok(if s_true.is_empty() { vec![] } else { vec![s_true] })
    }

    fn exec_if(
        &mut self,
        cond: &BoolExp,
        then: &Stmt,
        else_: Option<&Stmt>,
        state: SymState<'ctx>,
    ) -> Result<Vec<SymState<'ctx>>, SymError> {
        let term = eval_bool(self.ctx, &state.env, cond)?;
        let (mut s_then, mut s_else) = state.fork();
        s_then.add_pc(term.clone());
        s_else.add_pc(term.not());

        let mut out = Vec::new();
        if !s_then.is_empty() {
            out.extend(self.exec(then, s_then)?);
        }
        if !s_else.is_empty() {
            match else_ {
                Some(else_) => out.extend(self.exec(else_, s_else)?),
                None => out.push(s_else),
            }
        }
        Ok(out)
    }

    /// Hoare-style loop verification (spec.md §4.5's invariant-guided rule).
    fn exec_while_invariant(
        &mut self,
        cond: &BoolExp,
        inv: &BoolExp,
        body: &Stmt,
        state: SymState<'ctx>,
    ) -> Result<Vec<SymState<'ctx>>, SymError> {
        // 1. Initiation.
        let (s_holds, mut s_fails) = state.fork();
        let inv_fails_term = eval_bool(self.ctx, &s_fails.env, inv)?.not();
        s_fails.add_pc(inv_fails_term);
        if !s_fails.is_empty() {
            s_fails.mk_error();
            self.diagnostics.push(DIAG_INV_FAILS_INITIATION.to_string());
        }

        // 2. Preservation + use, on the branch where inv holds at entry.
        let mut s_holds = s_holds;
        let inv_term = eval_bool(self.ctx, &s_holds.env, inv)?;
        s_holds.add_pc(inv_term);
        if s_holds.is_empty() {
            return Ok(vec![]);
        }

        // Havoc every variable the body might define, abstracting the loop.
        let (_undef, defs) = UndefAnalyzer::analyze(body);
        for name in &defs {
            s_holds.havoc_var(name);
        }
        let inv_after_havoc = eval_bool(self.ctx, &s_holds.env, inv)?;
        s_holds.add_pc(inv_after_havoc);
        if s_holds.is_empty() {
            return Ok(vec![]);
        }

        let (mut s_cond, mut s_ncond) = s_holds.fork();
        let cond_true = eval_bool(self.ctx, &s_cond.env, cond)?;
        s_cond.add_pc(cond_true);
        let cond_false = eval_bool(self.ctx, &s_ncond.env, cond)?.not();
        s_ncond.add_pc(cond_false);

        if !s_cond.is_empty() {
            for after_body in self.exec(body, s_cond)? {
                let inv_check = eval_bool(self.ctx, &after_body.env, inv)?.not();
                let (mut s_bad, _) = after_body.fork();
                s_bad.add_pc(inv_check);
                if !s_bad.is_empty() {
                    self.diagnostics.push(DIAG_INV_NOT_PRESERVED.to_string());
                }
                // Discharged: the verification branch never contributes to
                // the continuation, regardless of whether it passed.
            }
        }

        Ok(if s_ncond.is_empty() { vec![] } else { vec![s_ncond] })
    }

    /// Bounded symbolic unrolling (spec.md §4.5's unrolled loop rule). Tests
    /// the guard `unroll_limit + 1` times — once before each of the
    /// `unroll_limit` permitted iterations, plus a final test after the
    /// last — and silently drops whatever is still guard-feasible after
    /// that (spec.md §8 property 6, scenarios #3 and #5).
    fn exec_while_unroll(
        &mut self,
        cond: &BoolExp,
        body: &Stmt,
        state: SymState<'ctx>,
    ) -> Result<Vec<SymState<'ctx>>, SymError> {
        let mut frontier = vec![state];
        let mut continuation = Vec::new();

        for k in 0..=self.unroll_limit {
            if frontier.is_empty() {
                break;
            }
            let mut next_frontier = Vec::new();
            for s in frontier {
                let (s_continue, mut s_exit) = s.fork();
                let exit_term = eval_bool(self.ctx, &s_exit.env, cond)?.not();
                s_exit.add_pc(exit_term);
                if !s_exit.is_empty() {
                    continuation.push(s_exit);
                }

                if k < self.unroll_limit {
                    let mut s_continue = s_continue;
                    let cond_term = eval_bool(self.ctx, &s_continue.env, cond)?;
                    s_continue.add_pc(cond_term);
                    if !s_continue.is_empty() {
                        next_frontier.extend(self.exec(body, s_continue)?);
                    }
                }
                // k == unroll_limit: the still-feasible cond-true branch is
                // dropped here, unconditionally — the under-approximation
                // spec.md §9 calls out as intentional.
            }
            frontier = next_frontier;
        }

        Ok(continuation)
    }
}
