//! Source preparation: comment/string masking and bracket matching.
//!
//! Every structural scan in the engine runs over a *masked* copy of the
//! source in which comment bodies and string/template literal contents are
//! replaced by spaces. Byte offsets and newlines are preserved, so a range
//! found in the masked text slices the original text at the same place.

/// A source text together with its masked view and line index.
#[derive(Debug)]
pub struct PreparedSource<'src> {
    text: &'src str,
    masked: String,
    line_starts: Vec<usize>,
}

impl<'src> PreparedSource<'src> {
    pub fn new(text: &'src str) -> Self {
        let masked = mask(text);
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            text,
            masked,
            line_starts,
        }
    }

    /// The original text.
    pub fn text(&self) -> &'src str {
        self.text
    }

    /// The masked view (same length as the original).
    pub fn masked(&self) -> &str {
        &self.masked
    }

    /// 1-indexed line containing `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Lex {
    Code,
    LineComment,
    BlockComment,
    /// `start` is the byte offset of the opening quote.
    Quoted { quote: char, start: usize },
    Template,
}

/// Syntactic context the masker is in. Lexing of comments and literals only
/// applies inside `Script` frames.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Frame {
    /// JavaScript; `braces` counts `{` opened inside this frame.
    Script { braces: usize },
    /// Inside `<Name ...>` or `</Name>`.
    Tag { closing: bool },
    /// Between tags; `open` counts elements not yet closed.
    Text { open: usize },
}

const MARKUP_LEAD: &str = "([{,?:=&|>";

fn push_blank(out: &mut String, c: char) {
    if c == '\n' {
        out.push('\n');
    } else {
        for _ in 0..c.len_utf8() {
            out.push(' ');
        }
    }
}

struct Masker<'a> {
    text: &'a str,
    out: String,
    pos: usize,
    lex: Lex,
    frames: Vec<Frame>,
    jsx: bool,
}

impl<'a> Masker<'a> {
    fn new(text: &'a str, jsx: bool) -> Self {
        Self {
            text,
            out: String::with_capacity(text.len()),
            pos: 0,
            lex: Lex::Code,
            frames: vec![Frame::Script { braces: 0 }],
            jsx,
        }
    }

    fn char_at(&self, at: usize) -> Option<char> {
        self.text.get(at..).and_then(|rest| rest.chars().next())
    }

    fn keep(&mut self, c: char) {
        self.out.push(c);
        self.pos += c.len_utf8();
    }

    fn blank(&mut self, c: char) {
        push_blank(&mut self.out, c);
        self.pos += c.len_utf8();
    }

    /// Returns `None` when markup tracking ends with an element still open.
    fn run(mut self) -> Option<String> {
        loop {
            let c = match self.char_at(self.pos) {
                Some(c) => c,
                None => match self.lex {
                    Lex::Quoted { start, .. } => {
                        self.rewind(start);
                        continue;
                    }
                    _ => break,
                },
            };
            match self.frames.last().copied() {
                Some(Frame::Tag { closing }) => self.tag(c, closing),
                Some(Frame::Text { .. }) => self.markup_text(c),
                _ => self.script(c),
            }
        }

        if self.jsx && self.frames.len() > 1 {
            return None;
        }
        Some(self.out)
    }

    /// An unterminated quote is a stray apostrophe: keep it and lex the rest
    /// of its line as code again.
    fn rewind(&mut self, quote_at: usize) {
        self.out.truncate(quote_at + 1);
        self.pos = quote_at + 1;
        self.lex = Lex::Code;
    }

    fn script(&mut self, c: char) {
        match self.lex {
            Lex::Code => match c {
                '/' if self.char_at(self.pos + 1) == Some('/') => {
                    self.out.push_str("  ");
                    self.pos += 2;
                    self.lex = Lex::LineComment;
                }
                '/' if self.char_at(self.pos + 1) == Some('*') => {
                    self.out.push_str("  ");
                    self.pos += 2;
                    self.lex = Lex::BlockComment;
                }
                '"' | '\'' => {
                    self.lex = Lex::Quoted {
                        quote: c,
                        start: self.pos,
                    };
                    self.keep(c);
                }
                '`' => {
                    self.lex = Lex::Template;
                    self.keep(c);
                }
                '{' => {
                    if let Some(Frame::Script { braces }) = self.frames.last_mut() {
                        *braces += 1;
                    }
                    self.keep(c);
                }
                '}' => {
                    let nested = self.frames.len() > 1;
                    if let Some(Frame::Script { braces }) = self.frames.last_mut() {
                        if *braces == 0 && nested {
                            self.frames.pop();
                        } else {
                            *braces = braces.saturating_sub(1);
                        }
                    }
                    self.keep(c);
                }
                '<' if self.jsx && self.starts_markup() => {
                    self.keep(c);
                    if self.char_at(self.pos) == Some('>') {
                        self.keep('>');
                        self.frames.push(Frame::Text { open: 1 });
                    } else {
                        self.frames.push(Frame::Tag { closing: false });
                    }
                }
                _ => self.keep(c),
            },
            Lex::LineComment => {
                self.blank(c);
                if c == '\n' {
                    self.lex = Lex::Code;
                }
            }
            Lex::BlockComment => {
                if c == '*' && self.char_at(self.pos + 1) == Some('/') {
                    self.out.push_str("  ");
                    self.pos += 2;
                    self.lex = Lex::Code;
                } else {
                    self.blank(c);
                }
            }
            Lex::Quoted { quote, start } => {
                if c == '\\' {
                    self.blank(c);
                    if let Some(next) = self.char_at(self.pos).filter(|&n| n != '\n') {
                        self.blank(next);
                    }
                } else if c == quote {
                    self.keep(c);
                    self.lex = Lex::Code;
                } else if c == '\n' {
                    self.rewind(start);
                } else {
                    self.blank(c);
                }
            }
            Lex::Template => {
                if c == '\\' {
                    self.blank(c);
                    if let Some(next) = self.char_at(self.pos) {
                        self.blank(next);
                    }
                } else if c == '`' {
                    self.keep(c);
                    self.lex = Lex::Code;
                } else {
                    self.blank(c);
                }
            }
        }
    }

    /// Whether the `<` at `pos` opens an element: `<>` or `<Name` followed by
    /// whitespace, `>`, `/` or `{`, in expression position.
    fn starts_markup(&self) -> bool {
        let after = self.pos + 1;
        let shaped = match self.char_at(after) {
            Some('>') => true,
            Some(c) if c.is_ascii_alphabetic() => {
                let rest = &self.text[after..];
                let name_len = rest
                    .find(|c: char| !(c.is_alphanumeric() || "_$.:-".contains(c)))
                    .unwrap_or(rest.len());
                matches!(
                    rest[name_len..].chars().next(),
                    Some(c) if c.is_whitespace() || c == '>' || c == '/' || c == '{'
                )
            }
            _ => false,
        };
        shaped && in_expression_position(&self.out)
    }

    fn tag(&mut self, c: char, closing: bool) {
        match c {
            '"' | '\'' => match self.text[self.pos + 1..].find(c) {
                Some(len) => {
                    self.keep(c);
                    let end = self.pos + len;
                    while self.pos < end {
                        match self.char_at(self.pos) {
                            Some(inner) => self.blank(inner),
                            None => break,
                        }
                    }
                    self.keep(c);
                }
                None => self.keep(c),
            },
            '{' => {
                self.keep(c);
                self.frames.push(Frame::Script { braces: 0 });
            }
            '/' if self.char_at(self.pos + 1) == Some('>') => {
                self.keep('/');
                self.keep('>');
                self.frames.pop();
            }
            '>' => {
                self.keep(c);
                self.frames.pop();
                if closing {
                    if let Some(Frame::Text { open }) = self.frames.last_mut() {
                        *open = open.saturating_sub(1);
                        if *open == 0 {
                            self.frames.pop();
                        }
                    }
                } else if let Some(Frame::Text { open }) = self.frames.last_mut() {
                    *open += 1;
                } else {
                    self.frames.push(Frame::Text { open: 1 });
                }
            }
            _ => self.keep(c),
        }
    }

    fn markup_text(&mut self, c: char) {
        match c {
            '{' => {
                self.keep(c);
                self.frames.push(Frame::Script { braces: 0 });
            }
            '<' => {
                self.keep(c);
                match self.char_at(self.pos) {
                    Some('/') => {
                        self.keep('/');
                        self.frames.push(Frame::Tag { closing: true });
                    }
                    Some('>') => {
                        self.keep('>');
                        if let Some(Frame::Text { open }) = self.frames.last_mut() {
                            *open += 1;
                        }
                    }
                    _ => self.frames.push(Frame::Tag { closing: false }),
                }
            }
            _ => self.blank(c),
        }
    }
}

/// `masked_prefix` ends where a JSX element could begin.
fn in_expression_position(masked_prefix: &str) -> bool {
    let before = masked_prefix.trim_end();
    match before.chars().last() {
        None => true,
        Some(c) if MARKUP_LEAD.contains(c) => true,
        Some(_) => before
            .strip_suffix("return")
            .map_or(false, |head| ident_len_rev(head) == 0),
    }
}

fn ident_len_rev(text: &str) -> usize {
    text.chars()
        .rev()
        .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
        .count()
}

/// Replace comment bodies, string contents and JSX text with spaces.
///
/// Delimiting quotes and all markup tags are kept so literals and elements
/// stay visible as tokens. Text between JSX tags is blanked, so apostrophes
/// and `//` inside it are not read as literals or comments. A quoted string
/// that reaches end of line unclosed is treated as a lone quote character.
/// If markup tracking does not balance (a TypeScript generic mistaken for a
/// tag, say) the file is masked again without it.
pub fn mask(text: &str) -> String {
    match Masker::new(text, true).run() {
        Some(masked) => masked,
        None => Masker::new(text, false).run().unwrap_or_default(),
    }
}

/// Find the bracket closing the `(`, `{` or `[` at byte `open`.
///
/// Only brackets of the same kind are counted, so stray punctuation of
/// another kind (a smiley in JSX text, say) cannot derail the match.
/// Returns `None` when the text ends before the bracket closes.
pub fn find_matching(masked: &str, open: usize) -> Option<usize> {
    let bytes = masked.as_bytes();
    let opener = *bytes.get(open)?;
    let closer = match opener {
        b'(' => b')',
        b'{' => b'}',
        b'[' => b']',
        _ => return None,
    };

    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if b == opener {
            depth += 1;
        } else if b == closer {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Split `text` at commas that sit outside every `{}`, `()` and `[]` pair.
///
/// Returns `None` if a closing bracket appears with nothing open or if the
/// text ends with brackets still open.
pub fn split_top_level(text: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, b) in text.bytes().enumerate() {
        match b {
            b'{' | b'(' | b'[' => depth += 1,
            b'}' | b')' | b']' => depth = depth.checked_sub(1)?,
            b',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return None;
    }
    parts.push(&text[start..]);
    Some(parts)
}

/// Tracks `{}` nesting depth while walking forward through masked text.
pub struct DepthCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> DepthCursor<'a> {
    pub fn new(masked: &'a str) -> Self {
        Self {
            bytes: masked.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    /// Brace depth just before byte `target`. Targets must not go backwards.
    pub fn depth_at(&mut self, target: usize) -> usize {
        let end = target.min(self.bytes.len());
        while self.pos < end {
            match self.bytes[self.pos] {
                b'{' => self.depth += 1,
                b'}' => self.depth = self.depth.saturating_sub(1),
                _ => {}
            }
            self.pos += 1;
        }
        self.depth
    }
}

/// Offset of the first non-whitespace byte at or after `from`.
pub fn skip_ws(text: &str, from: usize) -> usize {
    text[from.min(text.len())..]
        .find(|c: char| !c.is_whitespace())
        .map(|i| from + i)
        .unwrap_or(text.len())
}

/// Length of the identifier at the start of `text` (JS identifier chars).
pub fn ident_len(text: &str) -> usize {
    text.find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .unwrap_or(text.len())
}
