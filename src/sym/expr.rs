//! Symbolic expression evaluation: builds solver terms instead of values,
//! mirroring the concrete evaluation rules in [`crate::interp`] (spec.md
//! §4.5).

use std::collections::BTreeMap;

use z3::ast::{Ast, Bool, Int};
use z3::Context;

use crate::ast::{ArithOp, BoolExp, BoolOp, IntExp, RelOp};

use super::SymError;

pub fn eval_int<'ctx>(
    ctx: &'ctx Context,
    env: &BTreeMap<String, Int<'ctx>>,
    e: &IntExp,
) -> Result<Int<'ctx>, SymError> {
    match e {
        IntExp::IntConst(n) => Ok(Int::from_i64(ctx, *n)),
        IntExp::IntVar(v) => env
            .get(&v.name)
            .cloned()
            .ok_or_else(|| SymError::UndefinedVariable(v.name.clone())),
        IntExp::ArithExp(op, args) => {
            let mut iter = args.iter();
            let mut acc = eval_int(ctx, env, iter.next().expect("ArithExp has >= 2 args"))?;
            for a in iter {
                let rhs = eval_int(ctx, env, a)?;
                acc = apply_arith(*op, &acc, &rhs);
            }
            Ok(acc)
        }
    }
}

fn apply_arith<'ctx>(op: ArithOp, lhs: &Int<'ctx>, rhs: &Int<'ctx>) -> Int<'ctx> {
    match op {
        ArithOp::Add => Int::add(&[lhs, rhs]),
        ArithOp::Sub => Int::sub(&[lhs, rhs]),
        ArithOp::Mul => Int::mul(&[lhs, rhs]),
        ArithOp::Div => lhs.div(rhs),
    }
}

pub fn eval_bool<'ctx>(
    ctx: &'ctx Context,
    env: &BTreeMap<String, Int<'ctx>>,
    e: &BoolExp,
) -> Result<Bool<'ctx>, SymError> {
    match e {
        BoolExp::BoolConst(b) => Ok(Bool::from_bool(ctx, *b)),
        BoolExp::RelExp(op, lhs, rhs) => {
            let l = eval_int(ctx, env, lhs)?;
            let r = eval_int(ctx, env, rhs)?;
            Ok(apply_rel(op, &l, &r))
        }
        BoolExp::BExp(BoolOp::Not, args) => Ok(eval_bool(ctx, env, &args[0])?.not()),
        BoolExp::BExp(op, args) => {
            let mut terms = Vec::with_capacity(args.len());
            for a in args {
                terms.push(eval_bool(ctx, env, a)?);
            }
            let refs: Vec<&Bool<'ctx>> = terms.iter().collect();
            Ok(match op {
                BoolOp::And => Bool::and(ctx, &refs),
                BoolOp::Or => Bool::or(ctx, &refs),
                BoolOp::Not => unreachable!("Not is unary and handled above"),
            })
        }
    }
}

fn apply_rel<'ctx>(op: &RelOp, lhs: &Int<'ctx>, rhs: &Int<'ctx>) -> Bool<'ctx> {
    match op {
        RelOp::Lt => lhs.lt(rhs),
        RelOp::Le => lhs.le(rhs),
        RelOp::Eq => lhs._eq(rhs),
        RelOp::Ge => lhs.ge(rhs),
        RelOp::Gt => lhs.gt(rhs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::IntExp;
    use z3::{Config, SatResult, Solver};

    #[test]
    fn arith_exp_builds_a_consistent_term() {
        let cfg = Config::new();
        let ctx = Context::new(&cfg);
        let env = BTreeMap::new();
        let e = IntExp::arith(ArithOp::Add, vec![IntExp::IntConst(2), IntExp::IntConst(3)]);
        let term = eval_int(&ctx, &env, &e).unwrap();

        let solver = Solver::new(&ctx);
        solver.assert(&term._eq(&Int::from_i64(&ctx, 5)));
        assert_eq!(solver.check(), SatResult::Sat);
    }

    #[test]
    fn undefined_var_is_an_error() {
        let cfg = Config::new();
        let ctx = Context::new(&cfg);
        let env = BTreeMap::new();
        let err = eval_int(&ctx, &env, &IntExp::var("x")).unwrap_err();
        assert_eq!(err, SymError::UndefinedVariable("x".to_string()));
    }
}
