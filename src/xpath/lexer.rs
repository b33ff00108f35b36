//! Path Pattern Lexer
//!
//! Tokenizes the restricted XPath dialect used by field bindings.

use memchr::memchr;

/// Pattern token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Operators
    Slash,       // /
    DoubleSlash, // //
    At,          // @
    Pipe,        // |
    Eq,          // =
    And,         // and

    // Brackets
    LeftBracket,  // [
    RightBracket, // ]

    // Literals
    String(String),
    Number(String),

    // Names (NCName or prefix:NCName)
    Name(String),

    /// Character outside the dialect
    Invalid(char),

    /// Quoted literal missing its closing quote
    Unterminated,

    // End of input
    Eof,
}

/// Pattern lexer
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer
    pub fn new(input: &'a str) -> Self {
        Lexer { input, pos: 0 }
    }

    /// Byte offset of the next unread character
    pub fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance(c.len_utf8());
            } else {
                break;
            }
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let c = match self.peek() {
            Some(c) => c,
            None => return Token::Eof,
        };

        match c {
            '/' => {
                self.advance(1);
                if self.peek() == Some('/') {
                    self.advance(1);
                    Token::DoubleSlash
                } else {
                    Token::Slash
                }
            }
            '@' => {
                self.advance(1);
                Token::At
            }
            '|' => {
                self.advance(1);
                Token::Pipe
            }
            '=' => {
                self.advance(1);
                Token::Eq
            }
            '[' => {
                self.advance(1);
                Token::LeftBracket
            }
            ']' => {
                self.advance(1);
                Token::RightBracket
            }
            '"' | '\'' => self.read_string(c),
            '0'..='9' | '-' => self.read_number(),
            _ if is_name_start_char(c) => self.read_name_or_keyword(),
            _ => {
                self.advance(c.len_utf8());
                Token::Invalid(c)
            }
        }
    }

    /// Read a bare numeric value such as `1` or `-2.5`
    fn read_number(&mut self) -> Token {
        let start = self.pos;
        self.advance(1);
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                self.advance(1);
            } else {
                break;
            }
        }
        Token::Number(self.input[start..self.pos].to_string())
    }

    /// Read a quoted literal; the quote is known to be ASCII
    fn read_string(&mut self, quote: char) -> Token {
        self.advance(1);
        let rest = self.remaining();
        match memchr(quote as u8, rest.as_bytes()) {
            Some(len) => {
                let value = rest[..len].to_string();
                self.advance(len + 1);
                Token::String(value)
            }
            None => {
                self.pos = self.input.len();
                Token::Unterminated
            }
        }
    }

    /// Read a name, a prefixed name, or the `and` keyword
    fn read_name_or_keyword(&mut self) -> Token {
        let start = self.pos;
        self.read_ncname();

        if self.peek() == Some(':') {
            let after = self.remaining()[1..].chars().next();
            if after.map(is_name_start_char).unwrap_or(false) {
                self.advance(1);
                self.read_ncname();
            }
        }

        let name = &self.input[start..self.pos];
        match name {
            "and" => Token::And,
            _ => Token::Name(name.to_string()),
        }
    }

    fn read_ncname(&mut self) {
        while let Some(c) = self.peek() {
            if is_name_char(c) {
                self.advance(c.len_utf8());
            } else {
                break;
            }
        }
    }

    /// Tokenize entire input
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            if matches!(token, Token::Eof) {
                break;
            }
            tokens.push(token);
        }
        tokens
    }
}

fn is_name_start_char(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_path() {
        let mut lexer = Lexer::new("/Order/Item");
        assert_eq!(lexer.next_token(), Token::Slash);
        assert_eq!(lexer.next_token(), Token::Name("Order".to_string()));
        assert_eq!(lexer.next_token(), Token::Slash);
        assert_eq!(lexer.next_token(), Token::Name("Item".to_string()));
        assert_eq!(lexer.next_token(), Token::Eof);
    }

    #[test]
    fn test_floating() {
        let mut lexer = Lexer::new("//Address");
        assert_eq!(lexer.next_token(), Token::DoubleSlash);
        assert_eq!(lexer.next_token(), Token::Name("Address".to_string()));
    }

    #[test]
    fn test_predicate() {
        let tokens = Lexer::new("Item[@id='7' and @kind]").tokenize();
        assert_eq!(
            tokens,
            vec![
                Token::Name("Item".to_string()),
                Token::LeftBracket,
                Token::At,
                Token::Name("id".to_string()),
                Token::Eq,
                Token::String("7".to_string()),
                Token::And,
                Token::At,
                Token::Name("kind".to_string()),
                Token::RightBracket,
            ]
        );
    }

    #[test]
    fn test_prefixed_name() {
        let mut lexer = Lexer::new("soap:Body/@xsi:nil");
        assert_eq!(lexer.next_token(), Token::Name("soap:Body".to_string()));
        assert_eq!(lexer.next_token(), Token::Slash);
        assert_eq!(lexer.next_token(), Token::At);
        assert_eq!(lexer.next_token(), Token::Name("xsi:nil".to_string()));
    }

    #[test]
    fn test_bare_number_and_union() {
        let tokens = Lexer::new("a[@n=-12] | b").tokenize();
        assert!(tokens.contains(&Token::Number("-12".to_string())));
        assert!(tokens.contains(&Token::Pipe));
    }

    #[test]
    fn test_unterminated_and_invalid() {
        assert!(Lexer::new("a[@k='x").tokenize().contains(&Token::Unterminated));
        assert_eq!(Lexer::new("*").next_token(), Token::Invalid('*'));
    }
}
