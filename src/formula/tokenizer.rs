/// Category of a raw lexeme, as recognized by the scanner.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LexemeKind {
    LeftParen,
    RightParen,
    Operator,
    Identifier,
    Number,
    /// Any run of characters that cannot start another lexeme. Rejected later
    /// by the builder, never by the scanner.
    Unrecognized,
}

/// A non-empty, whitespace-free slice of the scanned text.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Lexeme<'a> {
    pub kind: LexemeKind,
    pub text: &'a str,
}

/// Longest-match scanner over formula text.
///
/// Matching priority at each position is: parenthesis, operator, identifier,
/// number, whitespace (skipped), and finally an unrecognized run. The
/// iterator is finite; scanning the same text again means building a new
/// `Tokenizer`.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    rest: &'a str,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Tokenizer { rest: input }
    }

    fn take(&mut self, len: usize, kind: LexemeKind) -> Lexeme<'a> {
        let (text, rest) = self.rest.split_at(len);
        self.rest = rest;
        Lexeme { kind, text }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Lexeme<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rest = self.rest.trim_start();
        let c = self.rest.chars().next()?;

        let lexeme = match c {
            '(' => self.take(1, LexemeKind::LeftParen),
            ')' => self.take(1, LexemeKind::RightParen),
            '+' | '-' | '*' | '/' => self.take(1, LexemeKind::Operator),
            c if is_identifier_start(c) => {
                let len = self
                    .rest
                    .find(|c: char| !is_identifier_continue(c))
                    .unwrap_or(self.rest.len());
                self.take(len, LexemeKind::Identifier)
            }
            _ => match number_len(self.rest) {
                Some(len) => self.take(len, LexemeKind::Number),
                None => {
                    let len = unrecognized_len(self.rest);
                    self.take(len, LexemeKind::Unrecognized)
                }
            },
        };

        Some(lexeme)
    }
}

/// Splits `text` into raw lexeme strings without validating the grammar.
///
/// Useful on its own to collect variable references, e.g. when a host builds
/// a dependency graph between cells.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    Tokenizer::new(text).map(|lexeme| lexeme.text)
}

/// Shape grammar of a variable: a letter or underscore, then any number of
/// letters, digits or underscores.
pub fn is_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_continue),
        _ => false,
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn digits_len(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

/// Length of the numeric literal at the start of `s`: `\d+\.\d*`, `\d*\.\d+`
/// or `\d+`, with an optional `[eE][+-]?\d+` suffix.
fn number_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let int = digits_len(s);
    let mut len = int;

    if bytes.get(len) == Some(&b'.') {
        let frac = digits_len(&s[len + 1..]);
        if int == 0 && frac == 0 {
            return None;
        }
        len += 1 + frac;
    } else if int == 0 {
        return None;
    }

    if matches!(bytes.get(len), Some(b'e' | b'E')) {
        let mut exp = len + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits_len(&s[exp..]);
        if exp_digits > 0 {
            len = exp + exp_digits;
        }
    }

    Some(len)
}

fn starts_lexeme(s: &str) -> bool {
    match s.chars().next() {
        Some('(' | ')' | '+' | '-' | '*' | '/') => true,
        Some(c) if is_identifier_start(c) || c.is_whitespace() => true,
        Some(_) => number_len(s).is_some(),
        None => true,
    }
}

fn unrecognized_len(s: &str) -> usize {
    s.char_indices()
        .skip(1)
        .find(|&(i, _)| starts_lexeme(&s[i..]))
        .map_or(s.len(), |(i, _)| i)
}
