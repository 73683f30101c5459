//! Concrete interpreter: single-state evaluation over integer environments
//! (spec.md §4.2).

use std::collections::BTreeMap;
use std::fmt;

use crate::ast::{ArithOp, BoolExp, BoolOp, IntExp, RelOp, Stmt};

/// A concrete program state: variable name → integer value.
///
/// `BTreeMap` over `HashMap` so two states print and compare deterministically
/// (spec.md §8 property 1).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
    pub env: BTreeMap<String, i64>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.env.get(name).copied()
    }

    pub fn set(&mut self, name: impl Into<String>, value: i64) {
        self.env.insert(name.into(), value);
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.env.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        write!(f, "}}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InterpError {
    /// A variable was read before ever being assigned or havoced.
    UndefinedVariable(String),
    /// Integer division (or modulo) by zero.
    ArithmeticError(String),
    /// An `assert` condition evaluated to `false`.
    AssertionViolation,
}

impl fmt::Display for InterpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpError::UndefinedVariable(name) => write!(f, "undefined variable '{}'", name),
            InterpError::ArithmeticError(msg) => write!(f, "arithmetic error: {}", msg),
            InterpError::AssertionViolation => write!(f, "assertion violated"),
        }
    }
}

impl std::error::Error for InterpError {}

/// `Assume` that fails has no runtime effect other than halting evaluation
/// early with the state as it stood — it is not an error, just "no more
/// output for this path" (mirrored from the symbolic executor's `Assume`
/// rule, spec.md §4.5, applied to the single-state concrete case).
pub enum Outcome {
    Completed(State),
    Halted,
}

pub fn eval_int(e: &IntExp, state: &State) -> Result<i64, InterpError> {
    match e {
        IntExp::IntConst(n) => Ok(*n),
        IntExp::IntVar(v) => state
            .get(&v.name)
            .ok_or_else(|| InterpError::UndefinedVariable(v.name.clone())),
        IntExp::ArithExp(op, args) => {
            let mut iter = args.iter();
            let mut acc = eval_int(iter.next().expect("ArithExp has >= 2 args"), state)?;
            for a in iter {
                let v = eval_int(a, state)?;
                acc = apply_arith(*op, acc, v)?;
            }
            Ok(acc)
        }
    }
}

fn apply_arith(op: ArithOp, lhs: i64, rhs: i64) -> Result<i64, InterpError> {
    match op {
        ArithOp::Add => Ok(lhs.wrapping_add(rhs)),
        ArithOp::Sub => Ok(lhs.wrapping_sub(rhs)),
        ArithOp::Mul => Ok(lhs.wrapping_mul(rhs)),
        ArithOp::Div => {
            if rhs == 0 {
                Err(InterpError::ArithmeticError("division by zero".to_string()))
            } else {
                Ok(lhs.wrapping_div(rhs))
            }
        }
    }
}

pub fn eval_bool(e: &BoolExp, state: &State) -> Result<bool, InterpError> {
    match e {
        BoolExp::BoolConst(b) => Ok(*b),
        BoolExp::RelExp(op, lhs, rhs) => {
            let l = eval_int(lhs, state)?;
            let r = eval_int(rhs, state)?;
            Ok(apply_rel(*op, l, r))
        }
        BoolExp::BExp(BoolOp::Not, args) => Ok(!eval_bool(&args[0], state)?),
        BoolExp::BExp(op, args) => {
            // and/or evaluate every operand (no short-circuit, per spec.md §4.2).
            let mut values = Vec::with_capacity(args.len());
            for a in args {
                values.push(eval_bool(a, state)?);
            }
            Ok(match op {
                BoolOp::And => values.into_iter().all(|b| b),
                BoolOp::Or => values.into_iter().any(|b| b),
                BoolOp::Not => unreachable!("Not is unary and handled above"),
            })
        }
    }
}

fn apply_rel(op: RelOp, lhs: i64, rhs: i64) -> bool {
    match op {
        RelOp::Lt => lhs < rhs,
        RelOp::Le => lhs <= rhs,
        RelOp::Eq => lhs == rhs,
        RelOp::Ge => lhs >= rhs,
        RelOp::Gt => lhs > rhs,
    }
}

/// Execute `stmt` against `state`, returning the final state, `Halted` on a
/// failed `assume`, or an [`InterpError`] on the first failure.
pub fn exec_stmt(stmt: &Stmt, mut state: State) -> Result<Outcome, InterpError> {
    match stmt {
        Stmt::Skip => Ok(Outcome::Completed(state)),
        Stmt::PrintState => {
            println!("{}", state);
            Ok(Outcome::Completed(state))
        }
        Stmt::Assign(v, rhs) => {
            let value = eval_int(rhs, &state)?;
            state.set(v.name.clone(), value);
            Ok(Outcome::Completed(state))
        }
        Stmt::Havoc(vars) => {
            for v in vars {
                // Implementation-defined witness value; spec.md §9 permits 0.
                state.env.entry(v.name.clone()).or_insert(0);
            }
            Ok(Outcome::Completed(state))
        }
        Stmt::Assume(cond) => {
            if eval_bool(cond, &state)? {
                Ok(Outcome::Completed(state))
            } else {
                Ok(Outcome::Halted)
            }
        }
        Stmt::Assert(cond) => {
            if eval_bool(cond, &state)? {
                Ok(Outcome::Completed(state))
            } else {
                Err(InterpError::AssertionViolation)
            }
        }
        Stmt::If(cond, then, else_) => {
            if eval_bool(cond, &state)? {
                exec_stmt(then, state)
            } else if let Some(else_) = else_ {
                exec_stmt(else_, state)
            } else {
                Ok(Outcome::Completed(state))
            }
        }
        Stmt::While(cond, _inv, body) => {
            loop {
                if !eval_bool(cond, &state)? {
                    return Ok(Outcome::Completed(state));
                }
                match exec_stmt(body, state)? {
                    Outcome::Completed(next) => state = next,
                    Outcome::Halted => return Ok(Outcome::Halted),
                }
            }
        }
        Stmt::StmtList(stmts) => {
            for s in stmts {
                match exec_stmt(s, state)? {
                    Outcome::Completed(next) => state = next,
                    Outcome::Halted => return Ok(Outcome::Halted),
                }
            }
            Ok(Outcome::Completed(state))
        }
    }
}

/// Convenience entry point: run from an empty state.
pub fn run(stmt: &Stmt) -> Result<Outcome, InterpError> {
    exec_stmt(stmt, State::new())
}
