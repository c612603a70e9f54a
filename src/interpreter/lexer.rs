use std::fmt;

use logos::Logos;
use tracing::debug;

use crate::error::LexicalError;

/// Represents the kind of a lexical token.
///
/// Keywords are declared with `#[token]`, so on a tie in match length they win
/// over the identifier pattern; longer matches always win, which makes
/// `variable` an identifier and `++` a single increment token.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    /// `var`
    #[token("var")]
    DeclVar,
    /// `func`
    #[token("func")]
    DeclFunc,
    /// `int`
    #[token("int")]
    TypeInt,
    /// `bool`
    #[token("bool")]
    TypeBool,
    /// `char`
    #[token("char")]
    TypeChar,
    /// `string`
    #[token("string")]
    TypeString,
    /// `url`
    #[token("url")]
    TypeUrl,
    /// `fun`
    #[token("fun")]
    TypeFun,
    /// `{`
    #[token("{")]
    CurlyOpen,
    /// `}`
    #[token("}")]
    CurlyClose,
    /// `(`
    #[token("(")]
    RoundOpen,
    /// `)`
    #[token(")")]
    RoundClose,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `,`
    #[token(",")]
    Comma,
    /// `++`
    #[token("++")]
    Increment,
    /// `--`
    #[token("--")]
    Decrement,
    /// `=`
    #[token("=")]
    Assign,
    /// `+=`
    #[token("+=")]
    AssignPlus,
    /// `-=`
    #[token("-=")]
    AssignMinus,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `for`
    #[token("for")]
    For,
    /// `async`
    #[token("async")]
    Async,
    /// `dasync`
    #[token("dasync")]
    DAsync,
    /// `return`
    #[token("return")]
    Return,
    /// `println`
    #[token("println")]
    Println,
    /// `readln`
    #[token("readln")]
    Readln,
    /// `||`
    #[token("||")]
    Or,
    /// `&&`
    #[token("&&")]
    And,
    /// `!`
    #[token("!")]
    Not,
    /// `==`
    #[token("==")]
    Equal,
    /// `!=`
    #[token("!=")]
    NotEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+")]
    Number,
    /// Character literal tokens, such as `'a'`.
    #[regex(r"'[^\n\r]'")]
    Char,
    /// Remote object addresses, such as `tcp://localhost:9090/adder`.
    #[regex(r"tcp://[A-Za-z0-9.\-]+:[0-9]+/[A-Za-z0-9_]+")]
    Url,
    /// String literal tokens, such as `"hello"`. Strings may span lines.
    #[regex(r#""[^"]*""#, allow_greedy = true)]
    String,
    /// `true`
    #[token("true")]
    True,
    /// `false`
    #[token("false")]
    False,
    /// `Main`, the reserved entry point name.
    #[token("Main")]
    Main,
    /// Identifier tokens; variable or function names such as `x` or `square`.
    #[regex(r"[_a-zA-Z][_a-zA-Z0-9]*")]
    Identifier,
    /// `// Comments.` and `/* block comments */`.
    #[regex(r"//[^\n\r]*", allow_greedy = true)]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,
    /// A string or block comment that reaches the end of the input. Never
    /// emitted; the scanner turns it into a lexical error.
    #[regex(r#""[^"]*"#, allow_greedy = true)]
    #[regex(r"/\*([^*]|\*+[^*/])*\**", allow_greedy = true)]
    Unterminated,
    /// End of input.
    Eof,
    /// Placeholder kind for tokens that could not be classified.
    Unknown,
}

impl TokenKind {
    /// The upper-case name used when tokens are listed or printed.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DeclVar => "DECLVAR",
            Self::DeclFunc => "DECLFUNC",
            Self::TypeInt => "TYPEINT",
            Self::TypeBool => "TYPEBOOL",
            Self::TypeChar => "TYPECHAR",
            Self::TypeString => "TYPESTRING",
            Self::TypeUrl => "TYPEURL",
            Self::TypeFun => "TYPEFUN",
            Self::CurlyOpen => "CURLYBR_OPEN",
            Self::CurlyClose => "CURLYBR_CLOSE",
            Self::RoundOpen => "ROUNDBR_OPEN",
            Self::RoundClose => "ROUNDBR_CLOSE",
            Self::Semicolon => "SEMICOLONS",
            Self::Comma => "COMMA",
            Self::Increment => "INCR",
            Self::Decrement => "DECR",
            Self::Assign => "ASSIGN",
            Self::AssignPlus => "ASSIGN_PLUS",
            Self::AssignMinus => "ASSIGN_MINUS",
            Self::If => "IF",
            Self::Else => "ELSE",
            Self::While => "WHILE",
            Self::For => "FOR",
            Self::Async => "ASYNC",
            Self::DAsync => "DASYNC",
            Self::Return => "RETURN",
            Self::Println => "PRINTLN",
            Self::Readln => "READLN",
            Self::Or => "OR",
            Self::And => "AND",
            Self::Not => "NOT",
            Self::Equal => "EQUAL",
            Self::NotEqual => "INEQUAL",
            Self::Greater => "GREATER",
            Self::GreaterEqual => "GREATEREQ",
            Self::Less => "LESS",
            Self::LessEqual => "LESSEQ",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Star => "MUL",
            Self::Slash => "DIV",
            Self::Number => "NUMBER",
            Self::Char => "CHAR",
            Self::Url => "URL",
            Self::String => "STRING",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Main => "MAIN",
            Self::Identifier => "IDE",
            Self::Comment => "COMMENT",
            Self::Unterminated | Self::Unknown => "UNKNOWN",
            Self::Eof => "EOF",
        }
    }

    /// Returns `true` for the keywords that start a type: `int`, `bool`,
    /// `char`, `string`, `url` and `fun`.
    #[must_use]
    pub const fn is_type_keyword(self) -> bool {
        matches!(self,
                 Self::TypeInt
                 | Self::TypeBool
                 | Self::TypeChar
                 | Self::TypeString
                 | Self::TypeUrl
                 | Self::TypeFun)
    }

    /// Returns `true` for the tokens that may begin a statement inside a block.
    #[must_use]
    pub const fn starts_statement(self) -> bool {
        matches!(self,
                 Self::Identifier
                 | Self::If
                 | Self::While
                 | Self::For
                 | Self::Return
                 | Self::Println
                 | Self::CurlyOpen)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A location in the source text.
///
/// `offset` is a byte offset; `line` and `column` start at 1 and count
/// characters. `length` is the byte length of the token the position was taken
/// from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub offset: usize,
    pub line:   usize,
    pub column: usize,
    pub length: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A scanned token.
///
/// `text` holds the lexeme, except for string and character literals where
/// the surrounding quotes are stripped; `length` always covers the whole
/// lexeme, quotes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind:   TokenKind,
    pub text:   String,
    pub offset: usize,
    pub line:   usize,
    pub column: usize,
    pub length: usize,
}

impl Token {
    /// Returns the position of this token for diagnostics.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position { offset: self.offset,
                   line:   self.line,
                   column: self.column,
                   length: self.length, }
    }

    /// Creates a token that did not come from the scanner but stands in for
    /// `origin` (used when desugaring `x++` into `x = x + 1`).
    #[must_use]
    pub fn synthetic(kind: TokenKind, text: &str, origin: &Self) -> Self {
        Self { kind,
               text: text.to_string(),
               offset: origin.offset,
               line: origin.line,
               column: origin.column,
               length: origin.length }
    }

    /// Returns `true` if the token has the given kind.
    #[must_use]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,
               "[{}, {}, {}, ({}, {}), {}]",
               self.kind, self.text, self.offset, self.line, self.column, self.length)
    }
}

/// Lazily converts source text into tokens.
///
/// The scanner yields comment tokens and always finishes with a single `EOF`
/// token. After an error or the end of input it yields nothing more.
pub struct Scanner<'src> {
    lexer:    logos::Lexer<'src, TokenKind>,
    source:   &'src str,
    cursor:   usize,
    line:     usize,
    column:   usize,
    finished: bool,
}

impl<'src> Scanner<'src> {
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { lexer: TokenKind::lexer(source),
               source,
               cursor: 0,
               line: 1,
               column: 1,
               finished: false }
    }

    /// Moves the line/column bookkeeping forward to the byte `offset`.
    fn advance_to(&mut self, offset: usize) {
        if offset <= self.cursor {
            return;
        }
        for ch in self.source[self.cursor..offset].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.cursor = offset;
    }

    const fn position_at(&self, offset: usize, length: usize) -> Position {
        Position { offset,
                   line: self.line,
                   column: self.column,
                   length }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token, LexicalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let Some(result) = self.lexer.next() else {
            self.finished = true;
            self.advance_to(self.source.len());
            return Some(Ok(Token { kind:   TokenKind::Eof,
                                   text:   "EOF".to_string(),
                                   offset: self.source.len(),
                                   line:   self.line,
                                   column: self.column,
                                   length: 0, }));
        };

        let span = self.lexer.span();
        let slice = self.lexer.slice();
        self.advance_to(span.start);
        let at = self.position_at(span.start, span.len());

        let kind = match result {
            Ok(TokenKind::Unterminated) => {
                self.finished = true;
                return Some(Err(LexicalError::UnexpectedEndOfInput { text: slice.to_string(),
                                                                     at }));
            },
            Ok(kind) => kind,
            Err(()) => {
                self.finished = true;
                return Some(Err(LexicalError::UndefinedToken { text: slice.to_string(),
                                                               at }));
            },
        };

        let text = match kind {
            TokenKind::String | TokenKind::Char => slice[1..slice.len() - 1].to_string(),
            _ => slice.to_string(),
        };
        let token = Token { kind,
                            text,
                            offset: at.offset,
                            line: at.line,
                            column: at.column,
                            length: at.length };

        self.advance_to(span.end);
        Some(Ok(token))
    }
}

/// Scans the whole source, comments included.
///
/// # Errors
/// Returns the first [`LexicalError`] met.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexicalError> {
    let tokens = Scanner::new(source).collect::<Result<Vec<_>, _>>()?;
    debug!(count = tokens.len(), "scanned source");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn declaration_tokens_have_offsets() {
        let tokens = tokenize("var x int = 5;").unwrap();
        let summary: Vec<_> = tokens.iter()
                                    .map(|t| (t.kind, t.text.as_str(), t.offset))
                                    .collect();
        assert_eq!(summary,
                   vec![(TokenKind::DeclVar, "var", 0),
                        (TokenKind::Identifier, "x", 4),
                        (TokenKind::TypeInt, "int", 6),
                        (TokenKind::Assign, "=", 10),
                        (TokenKind::Number, "5", 12),
                        (TokenKind::Semicolon, ";", 13),
                        (TokenKind::Eof, "EOF", 14)]);
    }

    #[test]
    fn compound_operators_win_over_single_ones() {
        assert_eq!(kinds("x++ y-- a+=1 b-=2 c+d"),
                   vec![TokenKind::Identifier,
                        TokenKind::Increment,
                        TokenKind::Identifier,
                        TokenKind::Decrement,
                        TokenKind::Identifier,
                        TokenKind::AssignPlus,
                        TokenKind::Number,
                        TokenKind::Identifier,
                        TokenKind::AssignMinus,
                        TokenKind::Number,
                        TokenKind::Identifier,
                        TokenKind::Plus,
                        TokenKind::Identifier,
                        TokenKind::Eof]);
    }

    #[test]
    fn keywords_are_not_identifier_prefixes() {
        assert_eq!(kinds("variable var Mainly Main funny fun"),
                   vec![TokenKind::Identifier,
                        TokenKind::DeclVar,
                        TokenKind::Identifier,
                        TokenKind::Main,
                        TokenKind::Identifier,
                        TokenKind::TypeFun,
                        TokenKind::Eof]);
    }

    #[test]
    fn lines_and_columns_are_tracked() {
        let tokens = tokenize("func\n  Main /* a\nb */ x").unwrap();
        let at: Vec<_> = tokens.iter().map(|t| (t.line, t.column)).collect();
        assert_eq!(at, vec![(1, 1), (2, 3), (2, 8), (3, 6), (3, 7)]);
        assert_eq!(tokens[2].kind, TokenKind::Comment);
    }

    #[test]
    fn literals_strip_quotes() {
        let tokens = tokenize(r#"'a' "hi there" tcp://localhost:9090/adder"#).unwrap();
        assert_eq!(tokens[0].text, "a");
        assert_eq!(tokens[0].length, 3);
        assert_eq!(tokens[1].text, "hi there");
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[2].kind, TokenKind::Url);
    }

    #[test]
    fn token_display_lists_all_fields() {
        let tokens = tokenize("  x").unwrap();
        assert_eq!(tokens[0].to_string(), "[IDE, x, 2, (1, 3), 1]");
    }

    #[test]
    fn unknown_character_is_lexical_error() {
        let err = tokenize("var x int = 5 # 3;").unwrap_err();
        assert!(matches!(err, LexicalError::UndefinedToken { ref text, at } if text == "#" && at.offset == 14));
    }

    #[test]
    fn unterminated_string_is_lexical_error() {
        let err = tokenize("println(\"abc);").unwrap_err();
        assert!(matches!(err, LexicalError::UnexpectedEndOfInput { .. }));
        let err = tokenize("/* never closed").unwrap_err();
        assert!(matches!(err, LexicalError::UnexpectedEndOfInput { .. }));
    }
}
