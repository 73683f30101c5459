//! Canonical printing for W expressions and statements.
//!
//! Printing is purely diagnostic (spec.md §4.1) — it is not part of any
//! semantic contract and exists so `print_state`, CLI output, and test
//! failures read back something recognizable as W source.

use std::fmt;

use super::{ArithOp, BoolExp, BoolOp, IntExp, RelOp, Stmt};

impl fmt::Display for IntExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntExp::IntConst(n) => write!(f, "{}", n),
            IntExp::IntVar(v) => write!(f, "{}", v.name),
            IntExp::ArithExp(op, args) => {
                write!(f, "(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", op.symbol())?;
                    }
                    write!(f, "{}", a)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for BoolExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolExp::BoolConst(b) => write!(f, "{}", b),
            BoolExp::RelExp(op, lhs, rhs) => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
            BoolExp::BExp(BoolOp::Not, args) => write!(f, "(not {})", args[0]),
            BoolExp::BExp(op, args) => {
                write!(f, "(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", op.symbol())?;
                    }
                    write!(f, "{}", a)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Skip => write!(f, "skip"),
            Stmt::PrintState => write!(f, "print_state"),
            Stmt::Assign(v, e) => write!(f, "{} := {}", v.name, e),
            Stmt::If(cond, then, else_) => {
                write!(f, "if {} then {}", cond, then)?;
                if let Some(e) = else_ {
                    write!(f, " else {}", e)?;
                }
                Ok(())
            }
            Stmt::While(cond, inv, body) => {
                write!(f, "while {} ", cond)?;
                if let Some(inv) = inv {
                    write!(f, "inv {} ", inv)?;
                }
                write!(f, "do {}", body)
            }
            Stmt::Assert(cond) => write!(f, "assert {}", cond),
            Stmt::Assume(cond) => write!(f, "assume {}", cond),
            Stmt::Havoc(vars) => {
                write!(f, "havoc ")?;
                for (i, v) in vars.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v.name)?;
                }
                Ok(())
            }
            Stmt::StmtList(stmts) => {
                write!(f, "{{")?;
                for (i, s) in stmts.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", s)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[allow(unused)]
fn assert_arith_op_covered(op: ArithOp) {
    match op {
        ArithOp::Add | ArithOp::Sub | ArithOp::Mul | ArithOp::Div => {}
    }
}

#[allow(unused)]
fn assert_rel_op_covered(op: RelOp) {
    match op {
        RelOp::Lt | RelOp::Le | RelOp::Eq | RelOp::Ge | RelOp::Gt => {}
    }
}

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn displays_assignment() {
        let s = Stmt::Assign(IntVar::new("x"), IntExp::IntConst(10));
        assert_eq!(s.to_string(), "x := 10");
    }

    #[test]
    fn displays_nested_if() {
        let s = Stmt::if_stmt(
            BoolExp::rel(RelOp::Lt, IntExp::var("x"), IntExp::IntConst(2)),
            Stmt::Skip,
            None,
        );
        assert_eq!(s.to_string(), "if (x < 2) then skip");
    }

    #[test]
    fn displays_havoc() {
        let s = Stmt::Havoc(vec![IntVar::new("a"), IntVar::new("b")]);
        assert_eq!(s.to_string(), "havoc a, b");
    }
}
