//! Symbolic execution (spec.md §4.4, §4.5): multi-state exploration over a
//! path condition discharged by an SMT solver.

pub mod executor;
pub mod expr;

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use z3::ast::{Ast, Bool, Int};
use z3::{Context, SatResult, Solver};

use crate::interp::State;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SymError {
    /// Mirrors the concrete interpreter's `UndefinedVariable` — the
    /// executor relies on prior definedness (spec.md §4.5) so this signals
    /// a bug in the caller (e.g. skipping undef analysis) rather than a
    /// property of the W program itself.
    UndefinedVariable(String),
}

impl fmt::Display for SymError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymError::UndefinedVariable(name) => write!(f, "undefined variable '{}'", name),
        }
    }
}

impl std::error::Error for SymError {}

/// A symbolic program state: environment of symbolic terms, path condition,
/// and a dedicated solver seeded with that path (spec.md §4.4).
///
/// One solver per state rather than one shared solver with nested
/// push/pop — the "per-state solver" option spec.md §9 calls out as
/// acceptable for clarity; see DESIGN.md for the tradeoff against the
/// shared-solver alternative.
pub struct SymState<'ctx> {
    ctx: &'ctx Context,
    pub env: BTreeMap<String, Int<'ctx>>,
    pub path: Vec<Bool<'ctx>>,
    solver: Rc<Solver<'ctx>>,
    is_error: bool,
    save_stack: Vec<(BTreeMap<String, Int<'ctx>>, Vec<Bool<'ctx>>)>,
    /// Monotonic counter backing [`Self::havoc_var`]'s fresh-constant names —
    /// `env.len()` doesn't change when re-havocing an already-bound variable,
    /// so it can't be used to guarantee a new name on every call.
    havoc_counter: u64,
}

impl<'ctx> SymState<'ctx> {
    pub fn new(ctx: &'ctx Context) -> Self {
        Self {
            ctx,
            env: BTreeMap::new(),
            path: Vec::new(),
            solver: Rc::new(Solver::new(ctx)),
            is_error: false,
            save_stack: Vec::new(),
            havoc_counter: 0,
        }
    }

    pub fn context(&self) -> &'ctx Context {
        self.ctx
    }

    /// Bind `name` to a fresh, unconstrained symbolic constant, abstracting
    /// any prior value — the implementation of `Havoc` (spec.md §4.5).
    pub fn havoc_var(&mut self, name: &str) {
        // A fresh constant per call keeps distinct havocs independent even
        // when the same variable is havoced twice along one path.
        let fresh_name = format!("{}!havoc{}", name, self.havoc_counter);
        self.havoc_counter += 1;
        let fresh = Int::new_const(self.ctx, fresh_name.as_str());
        self.env.insert(name.to_string(), fresh);
    }

    /// Append `cond` to the path condition and assert it into the solver.
    pub fn add_pc(&mut self, cond: Bool<'ctx>) {
        self.solver.assert(&cond);
        self.path.push(cond);
    }

    /// `true` iff the conjunction of `path` is unsatisfiable. An `unknown`
    /// solver result is treated as "not empty" — a sound over-approximation
    /// (spec.md §4.5, §5).
    pub fn is_empty(&self) -> bool {
        self.solver.check() == SatResult::Unsat
    }

    /// If the path condition is satisfiable, materialize a concrete
    /// [`State`] by evaluating each env term under the solver's model.
    pub fn pick_concrete(&self) -> Option<State> {
        if self.solver.check() != SatResult::Sat {
            return None;
        }
        let model = self.solver.get_model()?;
        let mut state = State::new();
        for (name, term) in &self.env {
            if let Some(value) = model.eval(term, true).and_then(|v| v.as_i64()) {
                state.set(name.clone(), value);
            }
        }
        Some(state)
    }

    /// Produce two independent descendants with identical env/path
    /// snapshots, each backed by its own solver re-seeded with `path`
    /// (spec.md §4.4 invariant 3; §5's "new solver instance" option).
    pub fn fork(&self) -> (SymState<'ctx>, SymState<'ctx>) {
        (self.clone_state(), self.clone_state())
    }

    fn clone_state(&self) -> SymState<'ctx> {
        let solver = Solver::new(self.ctx);
        for cond in &self.path {
            solver.assert(cond);
        }
        SymState {
            ctx: self.ctx,
            env: self.env.clone(),
            path: self.path.clone(),
            solver: Rc::new(solver),
            is_error: self.is_error,
            save_stack: Vec::new(),
            havoc_counter: self.havoc_counter,
        }
    }

    /// Save `(env, path)` and push a solver scope. Paired with [`Self::pop`].
    pub fn push(&mut self) {
        self.save_stack.push((self.env.clone(), self.path.clone()));
        self.solver.push();
    }

    /// Restore the most recently [`Self::push`]ed snapshot and pop the
    /// solver scope. LIFO; panics if called without a matching `push`.
    pub fn pop(&mut self) {
        self.solver.pop(1);
        let (env, path) = self
            .save_stack
            .pop()
            .expect("pop() called without a matching push()");
        self.env = env;
        self.path = path;
    }

    pub fn mk_error(&mut self) {
        self.is_error = true;
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Serialize the current path condition as an SMT-LIB2 benchmark.
    pub fn to_smt2(&self) -> String {
        self.solver.to_string()
    }
}

impl fmt::Debug for SymState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymState")
            .field("env", &self.env.keys().collect::<Vec<_>>())
            .field("path_len", &self.path.len())
            .field("is_error", &self.is_error)
            .finish()
    }
}

impl fmt::Display for SymState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, name) in self.env.keys().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", name)?;
        }
        write!(f, "}} | pc: {} terms", self.path.len())
    }
}
