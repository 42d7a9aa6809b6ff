// ── Token ─────────────────────────────────────────────────────────────────

/// OBJ token.
///
/// Whitespace separates words but is otherwise dropped. Newlines and `/` are
/// kept as standalone tokens: the first ends a directive, the second splits
/// `v/vt/vn` face groups.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Token<'s> {
    Word(&'s str),
    Slash,
    Newline,
    Eof,
}

/// A token plus the 1-based line it starts on.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TokenWithPos<'s> {
    pub token: Token<'s>,
    pub line: usize,
}

// ── Lexer ─────────────────────────────────────────────────────────────────

pub struct Lexer<'s> {
    src: &'s str,
    pos: usize,
    line: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(src: &'s str) -> Self {
        Self { src, pos: 0, line: 1 }
    }

    /// Tokenizes the whole source. The final token is always `Eof`.
    pub fn tokenize(mut self) -> Vec<TokenWithPos<'s>> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let eof = tok.token == Token::Eof;
            tokens.push(tok);
            if eof {
                break;
            }
        }
        tokens
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.src[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_blanks_and_comments(&mut self) {
        loop {
            while matches!(self.peek(), Some(c) if c != '\n' && c.is_whitespace()) {
                self.advance();
            }
            // `#` comments run to end of line; the newline itself is still emitted.
            if self.peek() == Some('#') {
                while !matches!(self.peek(), None | Some('\n')) {
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> TokenWithPos<'s> {
        self.skip_blanks_and_comments();

        let line = self.line;
        let token = match self.peek() {
            None => Token::Eof,
            Some('\n') => {
                self.advance();
                self.line += 1;
                Token::Newline
            }
            Some('/') => {
                self.advance();
                Token::Slash
            }
            Some(_) => self.lex_word(),
        };

        TokenWithPos { token, line }
    }

    fn lex_word(&mut self) -> Token<'s> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if !c.is_whitespace() && c != '/' && c != '#') {
            self.advance();
        }
        Token::Word(&self.src[start..self.pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token<'_>> {
        Lexer::new(src).tokenize().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn slash_and_newline_are_standalone() {
        assert_eq!(
            kinds("f 1/2/3 4//6\n"),
            vec![
                Token::Word("f"),
                Token::Word("1"),
                Token::Slash,
                Token::Word("2"),
                Token::Slash,
                Token::Word("3"),
                Token::Word("4"),
                Token::Slash,
                Token::Slash,
                Token::Word("6"),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn comments_keep_their_newline() {
        assert_eq!(
            kinds("# header\nv 1 2 3 # trailing\n"),
            vec![
                Token::Newline,
                Token::Word("v"),
                Token::Word("1"),
                Token::Word("2"),
                Token::Word("3"),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn carriage_return_is_whitespace() {
        assert_eq!(
            kinds("vn 0 1 0\r\n"),
            vec![
                Token::Word("vn"),
                Token::Word("0"),
                Token::Word("1"),
                Token::Word("0"),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn line_numbers_advance_after_newline() {
        let toks = Lexer::new("v 0 0 0\nvt 1 1").tokenize();
        let vt = toks.iter().find(|t| t.token == Token::Word("vt")).unwrap();
        assert_eq!(vt.line, 2);
    }
}
