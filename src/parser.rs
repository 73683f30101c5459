//! Recursive-descent parser for the W while-language (spec.md §6's grammar).
//!
//! Arithmetic expressions are parsed with precedence climbing (`*`/`/`
//! binding tighter than `+`/`-`, both left-associative); everything else is
//! plain recursive descent, one method per production.

use crate::ast::{ArithOp, BoolExp, BoolOp, IntExp, IntVar, Program, RelOp, Stmt};
use crate::diagnostic::Diagnostic;
use crate::lexeme::Lexeme;
use crate::span::{Span, Spanned};

const MAX_NESTING_DEPTH: u32 = 256;

pub struct Parser {
    tokens: Vec<Spanned<Lexeme>>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    depth: u32,
}

impl Parser {
    pub fn new(tokens: Vec<Spanned<Lexeme>>) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
            depth: 0,
        }
    }

    fn enter_nesting(&mut self) -> bool {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            self.error_with_help(
                "nesting depth exceeded (maximum 256 levels)",
                "simplify the program; deeply nested if/while defeats the bounded unroller",
            );
            return false;
        }
        true
    }

    fn exit_nesting(&mut self) {
        self.depth -= 1;
    }

    /// Parse a full program: a sequence of statements terminated by EOF.
    pub fn parse_program(mut self) -> Result<Program, Vec<Diagnostic>> {
        let start = self.current_span();
        let stmt = self.parse_stmt_seq();
        self.expect(&Lexeme::Eof);

        if !self.diagnostics.is_empty() {
            return Err(self.diagnostics);
        }
        let end = self.prev_span();
        Ok(Spanned::new(stmt, start.merge(end)))
    }

    /// `stmt (';' stmt)*`, collapsed into a single `StmtList` when more than
    /// one statement is present (spec.md §6: `S ::= ... | S ; S`).
    fn parse_stmt_seq(&mut self) -> Stmt {
        let mut stmts = vec![self.parse_stmt()];
        while self.eat(&Lexeme::Semicolon) {
            if self.at(&Lexeme::Eof) || self.at(&Lexeme::RBrace) {
                break;
            }
            stmts.push(self.parse_stmt());
        }
        if stmts.len() == 1 {
            stmts.pop().unwrap()
        } else {
            Stmt::StmtList(stmts)
        }
    }

    fn parse_stmt(&mut self) -> Stmt {
        if !self.enter_nesting() {
            return Stmt::Skip;
        }
        let stmt = self.parse_stmt_inner();
        self.exit_nesting();
        stmt
    }

    fn parse_stmt_inner(&mut self) -> Stmt {
        match self.peek() {
            Lexeme::Skip => {
                self.advance();
                Stmt::Skip
            }
            Lexeme::PrintState => {
                self.advance();
                Stmt::PrintState
            }
            Lexeme::Havoc => self.parse_havoc(),
            Lexeme::Assume => {
                self.advance();
                Stmt::Assume(self.parse_bool_exp())
            }
            Lexeme::Assert => {
                self.advance();
                Stmt::Assert(self.parse_bool_exp())
            }
            Lexeme::If => self.parse_if(),
            Lexeme::While => self.parse_while(),
            Lexeme::LBrace => self.parse_block(),
            Lexeme::Ident(_) => self.parse_assign(),
            _ => {
                self.error_at_current(&format!(
                    "expected a statement, found {}",
                    self.peek().description()
                ));
                self.advance();
                Stmt::Skip
            }
        }
    }

    fn parse_block(&mut self) -> Stmt {
        self.expect(&Lexeme::LBrace);
        let stmt = self.parse_stmt_seq();
        self.expect(&Lexeme::RBrace);
        stmt
    }

    fn parse_assign(&mut self) -> Stmt {
        let name = self.expect_ident();
        self.expect(&Lexeme::Assign);
        let rhs = self.parse_int_exp();
        Stmt::Assign(IntVar::new(name.node), rhs)
    }

    fn parse_havoc(&mut self) -> Stmt {
        self.expect(&Lexeme::Havoc);
        let mut vars = vec![IntVar::new(self.expect_ident().node)];
        while self.eat(&Lexeme::Comma) {
            vars.push(IntVar::new(self.expect_ident().node));
        }
        Stmt::Havoc(vars)
    }

    fn parse_if(&mut self) -> Stmt {
        self.expect(&Lexeme::If);
        let cond = self.parse_bool_exp();
        self.expect(&Lexeme::Then);
        let then = self.parse_stmt();
        let else_ = if self.eat(&Lexeme::Else) {
            Some(self.parse_stmt())
        } else {
            None
        };
        Stmt::if_stmt(cond, then, else_)
    }

    fn parse_while(&mut self) -> Stmt {
        self.expect(&Lexeme::While);
        let cond = self.parse_bool_exp();
        let inv = if self.eat(&Lexeme::Inv) {
            Some(self.parse_bool_exp())
        } else {
            None
        };
        self.expect(&Lexeme::Do);
        let body = self.parse_stmt();
        Stmt::while_stmt(cond, inv, body)
    }

    // ─── Boolean expressions ────────────────────────────────────────
    //
    // `B ::= true | false | not B | B and B | B or B | A relop A`, parsed by
    // precedence climbing: `not` binds tighter than `and`, which binds
    // tighter than `or`. Relational comparisons sit below `not` but are
    // leaves with respect to boolean connectives (W has no `(a < b) < c`).

    fn parse_bool_exp(&mut self) -> BoolExp {
        self.parse_bool_or()
    }

    fn parse_bool_or(&mut self) -> BoolExp {
        let mut lhs = self.parse_bool_and();
        while self.eat(&Lexeme::Or) {
            let rhs = self.parse_bool_and();
            lhs = BoolExp::or(vec![lhs, rhs]);
        }
        lhs
    }

    fn parse_bool_and(&mut self) -> BoolExp {
        let mut lhs = self.parse_bool_unary();
        while self.eat(&Lexeme::And) {
            let rhs = self.parse_bool_unary();
            lhs = BoolExp::and(vec![lhs, rhs]);
        }
        lhs
    }

    fn parse_bool_unary(&mut self) -> BoolExp {
        if self.eat(&Lexeme::Not) {
            return BoolExp::not(self.parse_bool_unary());
        }
        self.parse_bool_atom()
    }

    fn parse_bool_atom(&mut self) -> BoolExp {
        match self.peek() {
            Lexeme::True => {
                self.advance();
                BoolExp::BoolConst(true)
            }
            Lexeme::False => {
                self.advance();
                BoolExp::BoolConst(false)
            }
            Lexeme::LParen => {
                // Disambiguate `( B )` from `( A )` by trying a relational
                // comparison first — an int expression followed by a relop.
                let checkpoint = self.pos;
                let diag_checkpoint = self.diagnostics.len();
                self.advance();
                if let Some(parsed) = self.try_parse_parenthesized_bool() {
                    return parsed;
                }
                self.pos = checkpoint;
                self.diagnostics.truncate(diag_checkpoint);
                self.advance();
                let b = self.parse_bool_exp();
                self.expect(&Lexeme::RParen);
                b
            }
            _ => self.parse_rel_exp(),
        }
    }

    /// After consuming `(`, attempt `A relop A ')'`; restores nothing itself
    /// — callers reset `self.pos` to the pre-`(` checkpoint on failure.
    fn try_parse_parenthesized_bool(&mut self) -> Option<BoolExp> {
        let lhs = self.parse_int_exp();
        let op = self.rel_op()?;
        self.advance();
        let rhs = self.parse_int_exp();
        if !self.at(&Lexeme::RParen) {
            return None;
        }
        self.advance();
        Some(BoolExp::rel(op, lhs, rhs))
    }

    fn parse_rel_exp(&mut self) -> BoolExp {
        let lhs = self.parse_int_exp();
        match self.rel_op() {
            Some(op) => {
                self.advance();
                let rhs = self.parse_int_exp();
                BoolExp::rel(op, lhs, rhs)
            }
            None => {
                self.error_at_current(&format!(
                    "expected a relational operator, found {}",
                    self.peek().description()
                ));
                BoolExp::BoolConst(true)
            }
        }
    }

    fn rel_op(&self) -> Option<RelOp> {
        Some(match self.peek() {
            Lexeme::Lt => RelOp::Lt,
            Lexeme::Le => RelOp::Le,
            Lexeme::Eq => RelOp::Eq,
            Lexeme::Ge => RelOp::Ge,
            Lexeme::Gt => RelOp::Gt,
            _ => return None,
        })
    }

    // ─── Arithmetic expressions ─────────────────────────────────────
    //
    // Precedence climbing: `+`/`-` bind at level 1, `*`/`/` at level 2, both
    // left-associative. Unary minus is sugar for `0 - e`.

    fn parse_int_exp(&mut self) -> IntExp {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> IntExp {
        let mut lhs = self.parse_multiplicative();
        loop {
            let op = match self.peek() {
                Lexeme::Plus => ArithOp::Add,
                Lexeme::Minus => ArithOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative();
            lhs = IntExp::arith(op, vec![lhs, rhs]);
        }
        lhs
    }

    fn parse_multiplicative(&mut self) -> IntExp {
        let mut lhs = self.parse_unary();
        loop {
            let op = match self.peek() {
                Lexeme::Star => ArithOp::Mul,
                Lexeme::Slash => ArithOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary();
            lhs = IntExp::arith(op, vec![lhs, rhs]);
        }
        lhs
    }

    fn parse_unary(&mut self) -> IntExp {
        if self.eat(&Lexeme::Minus) {
            let operand = self.parse_unary();
            return IntExp::arith(ArithOp::Sub, vec![IntExp::IntConst(0), operand]);
        }
        self.parse_int_atom()
    }

    fn parse_int_atom(&mut self) -> IntExp {
        match self.peek().clone() {
            Lexeme::Integer(n) => {
                self.advance();
                IntExp::IntConst(n)
            }
            Lexeme::Ident(name) => {
                self.advance();
                IntExp::var(name)
            }
            Lexeme::LParen => {
                self.advance();
                let e = self.parse_int_exp();
                self.expect(&Lexeme::RParen);
                e
            }
            _ => {
                self.error_at_current(&format!(
                    "expected an integer expression, found {}",
                    self.peek().description()
                ));
                self.advance();
                IntExp::IntConst(0)
            }
        }
    }

    // --- Utility methods ---

    fn peek(&self) -> &Lexeme {
        &self.tokens[self.pos].node
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            self.current_span()
        }
    }

    fn advance(&mut self) -> &Spanned<Lexeme> {
        let tok = &self.tokens[self.pos];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, token: &Lexeme) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn eat(&mut self, token: &Lexeme) -> bool {
        if self.at(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Lexeme) -> Span {
        if self.at(token) {
            let span = self.current_span();
            self.advance();
            span
        } else {
            self.error_at_current(&format!(
                "expected {}, found {}",
                token.description(),
                self.peek().description()
            ));
            self.current_span()
        }
    }

    fn expect_ident(&mut self) -> Spanned<String> {
        if let Lexeme::Ident(name) = self.peek().clone() {
            let span = self.current_span();
            self.advance();
            Spanned::new(name, span)
        } else {
            self.error_at_current(&format!(
                "expected identifier, found {}",
                self.peek().description()
            ));
            Spanned::new("_error_".to_string(), self.current_span())
        }
    }

    fn error_at_current(&mut self, msg: &str) {
        self.diagnostics
            .push(Diagnostic::error(msg.to_string(), self.current_span()));
    }

    fn error_with_help(&mut self, msg: &str, help: &str) {
        self.diagnostics.push(
            Diagnostic::error(msg.to_string(), self.current_span()).with_help(help.to_string()),
        );
    }
}

/// Lex and parse a complete W source string.
pub fn parse_source(source: &str, file_id: u16) -> Result<Program, Vec<Diagnostic>> {
    let (tokens, lex_diags) = crate::lexer::Lexer::new(source, file_id).tokenize();
    if !lex_diags.is_empty() {
        return Err(lex_diags);
    }
    Parser::new(tokens).parse_program()
}
