//! Graph description text: rendering, parsing, file import and export.
//!
//! Output is a `digraph { ... }` / `graph { ... }` block with one statement per
//! vertex and one per edge:
//!
//! ```text
//! graph {
//!   1 [shape=circle];
//!   2 [color=red,style=filled,shape=circle];
//!   1 -- 2 [weight=0.5];
//! }
//! ```
//!
//! Undirected edges are written once per unordered pair. The reader accepts
//! this output plus the common extras found in hand-written files: graph-level
//! `key=value;` statements, `graph`/`node`/`edge` default attribute lists,
//! quoted ids, `a -- b -- c` chains and `//`, `#`, `/* */` comments.

use crate::error::{DotError, GraphError};
use crate::graph::{Graph, GraphType, Vertex};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt::{self, Display};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

const PLAIN_ATTRS: &str = "shape=circle";
const HIGHLIGHT_ATTRS: &str = "color=red,style=filled,shape=circle";
const KEYWORDS: [&str; 6] = ["graph", "digraph", "node", "edge", "strict", "subgraph"];

// ============================================================================
// Rendering
// ============================================================================

/// Borrowed view that renders a graph through [`Display`].
pub struct DotRender<'a, T> {
    graph: &'a Graph<T>,
    highlight: HashSet<&'a T>,
}

impl<T: Vertex + Display> Display for DotRender<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = self.graph;
        let (keyword, connector) = match g.graph_type() {
            GraphType::Directed => ("digraph", "->"),
            GraphType::Undirected => ("graph", "--"),
        };
        writeln!(f, "{keyword} {{")?;

        for i in 0..g.size() {
            let Some(v) = g.vertex_at(i) else { continue };
            let attrs = if self.highlight.contains(v) {
                HIGHLIGHT_ATTRS
            } else {
                PLAIN_ATTRS
            };
            writeln!(f, "  {} [{attrs}];", quote(&v.to_string()))?;
        }

        let undirected = !g.is_directed();
        for (fi, list) in g.adjacency_lists().iter().enumerate() {
            let Some(from) = g.vertex_at(fi) else { continue };
            let from = quote(&from.to_string()).into_owned();
            for to in list {
                let Some(ti) = g.index_of(to) else { continue };
                if undirected && ti < fi {
                    continue;
                }
                write!(f, "  {from} {connector} {}", quote(&to.to_string()))?;
                match g.weight_matrix().map(|w| w.get(fi, ti)) {
                    Some(w) if w.is_finite() => writeln!(f, " [weight={w}];")?,
                    _ => writeln!(f, ";")?,
                }
            }
        }
        writeln!(f, "}}")
    }
}

fn quote(id: &str) -> Cow<'_, str> {
    let bare = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        && !KEYWORDS.iter().any(|k| id.eq_ignore_ascii_case(k));
    if bare {
        return Cow::Borrowed(id);
    }
    let mut out = String::with_capacity(id.len() + 2);
    out.push('"');
    for c in id.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    Cow::Owned(out)
}

impl<T: Vertex + Display> Graph<T> {
    /// Returns a [`Display`] view of the graph, filling the `highlight` vertices.
    pub fn render<'a>(&'a self, highlight: Option<&'a [T]>) -> DotRender<'a, T> {
        DotRender {
            graph: self,
            highlight: highlight.unwrap_or_default().iter().collect(),
        }
    }

    /// Renders the graph as text, filling the `highlight` vertices.
    pub fn dot(&self, highlight: Option<&[T]>) -> String {
        self.render(highlight).to_string()
    }

    /// Renders the graph without highlighting.
    pub fn to_dot(&self) -> String {
        self.dot(None)
    }

    /// Writes [`Graph::dot`] to `path`.
    ///
    /// Fails with [`GraphError::AlreadyExists`] if `path` exists and
    /// `overwrite` is `false`.
    pub fn export_to_file<P: AsRef<Path>>(
        &self,
        path: P,
        overwrite: bool,
        highlight: Option<&[T]>,
    ) -> crate::error::Result<()> {
        let path = path.as_ref();
        let mut options = OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        let mut file = options.open(path).map_err(|source| {
            if source.kind() == ErrorKind::AlreadyExists {
                GraphError::AlreadyExists {
                    path: path.to_path_buf(),
                }
            } else {
                GraphError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        file.write_all(self.dot(highlight).as_bytes())
            .map_err(|source| GraphError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), vertices = self.size(), "graph exported");
        Ok(())
    }
}

// ============================================================================
// Lexer
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
enum Tok {
    Id(String),
    Quoted(String),
    Open,
    Close,
    LBracket,
    RBracket,
    Equals,
    Comma,
    Semi,
    Arrow,
    Line,
}

impl Tok {
    fn id(&self) -> Option<&str> {
        match self {
            Tok::Id(s) | Tok::Quoted(s) => Some(s),
            _ => None,
        }
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Tok::Id(s) if s.eq_ignore_ascii_case(keyword))
    }
}

impl Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tok::Id(s) => f.write_str(s),
            Tok::Quoted(s) => write!(f, "\"{s}\""),
            Tok::Open => f.write_str("{"),
            Tok::Close => f.write_str("}"),
            Tok::LBracket => f.write_str("["),
            Tok::RBracket => f.write_str("]"),
            Tok::Equals => f.write_str("="),
            Tok::Comma => f.write_str(","),
            Tok::Semi => f.write_str(";"),
            Tok::Arrow => f.write_str("->"),
            Tok::Line => f.write_str("--"),
        }
    }
}

#[derive(Debug)]
struct Token {
    tok: Tok,
    line: usize,
}

#[inline]
fn is_id_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

fn tokenize(text: &str) -> Result<Vec<Token>, DotError> {
    let mut out = Vec::new();
    let mut line = 1usize;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let start = line;
        let tok = match c {
            '\n' => {
                line += 1;
                continue;
            }
            c if c.is_whitespace() => continue,
            '#' => {
                while chars.next_if(|&d| d != '\n').is_some() {}
                continue;
            }
            '/' if chars.peek() == Some(&'/') => {
                while chars.next_if(|&d| d != '\n').is_some() {}
                continue;
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                loop {
                    match chars.next() {
                        None => return Err(DotError::UnterminatedBody),
                        Some('/') if prev == '*' => break,
                        Some(d) => {
                            if d == '\n' {
                                line += 1;
                            }
                            prev = d;
                        }
                    }
                }
                continue;
            }
            '{' => Tok::Open,
            '}' => Tok::Close,
            '[' => Tok::LBracket,
            ']' => Tok::RBracket,
            '=' => Tok::Equals,
            ',' => Tok::Comma,
            ';' => Tok::Semi,
            '-' if chars.next_if_eq(&'>').is_some() => Tok::Arrow,
            '-' if chars.next_if_eq(&'-').is_some() => Tok::Line,
            '"' => {
                let mut s = String::new();
                loop {
                    match chars.next() {
                        None => return Err(DotError::UnterminatedBody),
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(d @ ('"' | '\\')) => s.push(d),
                            Some(d) => {
                                s.push('\\');
                                s.push(d);
                            }
                            None => return Err(DotError::UnterminatedBody),
                        },
                        Some(d) => {
                            if d == '\n' {
                                line += 1;
                            }
                            s.push(d);
                        }
                    }
                }
                Tok::Quoted(s)
            }
            c if is_id_char(c) || c == '-' => {
                let mut s = String::from(c);
                while let Some(d) = chars.next_if(|&d| is_id_char(d)) {
                    s.push(d);
                }
                Tok::Id(s)
            }
            other => {
                return Err(DotError::InvalidVertex {
                    line,
                    token: other.to_string(),
                })
            }
        };
        out.push(Token { tok, line: start });
    }
    Ok(out)
}

// ============================================================================
// Parser
// ============================================================================

struct Parser<'t> {
    toks: &'t [Token],
    pos: usize,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> Option<&'t Tok> {
        self.toks.get(self.pos).map(|t| &t.tok)
    }

    fn next(&mut self) -> Option<&'t Token> {
        let t = self.toks.get(self.pos)?;
        self.pos += 1;
        Some(t)
    }

    fn eat(&mut self, want: &Tok) -> bool {
        if self.peek() == Some(want) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn header(&mut self) -> Result<GraphType, DotError> {
        if self.peek().is_some_and(|t| t.is_keyword("strict")) {
            self.pos += 1;
        }
        let graph_type = match self.next().map(|t| &t.tok) {
            Some(t) if t.is_keyword("digraph") => GraphType::Directed,
            Some(t) if t.is_keyword("graph") => GraphType::Undirected,
            _ => return Err(DotError::MissingHeader),
        };
        if self.peek().and_then(Tok::id).is_some() {
            self.pos += 1;
        }
        if !self.eat(&Tok::Open) {
            return Err(DotError::MissingHeader);
        }
        Ok(graph_type)
    }

    /// Parses `[key=value, ...]`; the cursor must sit on `[`.
    fn attributes(&mut self) -> Result<Vec<(&'t str, &'t str)>, DotError> {
        self.pos += 1;
        let mut out = Vec::new();
        loop {
            let Some(t) = self.next() else {
                return Err(DotError::UnterminatedBody);
            };
            match &t.tok {
                Tok::RBracket => return Ok(out),
                Tok::Comma | Tok::Semi => {}
                key_tok => {
                    let Some(key) = key_tok.id() else {
                        return Err(DotError::InvalidAttribute {
                            line: t.line,
                            text: key_tok.to_string(),
                        });
                    };
                    if !self.eat(&Tok::Equals) {
                        return Err(DotError::InvalidAttribute {
                            line: t.line,
                            text: key.to_string(),
                        });
                    }
                    match self.next() {
                        Some(v) => match v.tok.id() {
                            Some(value) => out.push((key, value)),
                            None => {
                                return Err(DotError::InvalidAttribute {
                                    line: v.line,
                                    text: format!("{key}={}", v.tok),
                                })
                            }
                        },
                        None => return Err(DotError::UnterminatedBody),
                    }
                }
            }
        }
    }
}

fn parse_vertex<T: FromStr>(token: &str, line: usize) -> Result<T, DotError> {
    token.parse().map_err(|_| DotError::InvalidVertex {
        line,
        token: token.to_string(),
    })
}

impl<T: Vertex + FromStr> Graph<T> {
    /// Builds a graph from description text.
    ///
    /// Vertex and edge attributes other than `weight` are ignored, as are
    /// graph-level attribute statements. Repeated edges are merged.
    pub fn from_dot(text: &str) -> Result<Self, DotError> {
        let toks = tokenize(text)?;
        let mut p = Parser { toks: &toks, pos: 0 };
        let graph_type = p.header()?;
        let connector = match graph_type {
            GraphType::Directed => Tok::Arrow,
            GraphType::Undirected => Tok::Line,
        };
        let mut g = Graph::new(graph_type);

        loop {
            let Some(t) = p.next() else {
                return Err(DotError::UnterminatedBody);
            };
            let line = t.line;
            let first = match &t.tok {
                Tok::Close => break,
                Tok::Semi => continue,
                other => other.id().ok_or_else(|| DotError::InvalidVertex {
                    line,
                    token: other.to_string(),
                })?,
            };

            if p.eat(&Tok::Equals) {
                match p.next() {
                    Some(v) if v.tok.id().is_some() => continue,
                    Some(v) => {
                        return Err(DotError::InvalidAttribute {
                            line: v.line,
                            text: format!("{first}={}", v.tok),
                        })
                    }
                    None => return Err(DotError::UnterminatedBody),
                }
            }
            if ["graph", "node", "edge"].iter().any(|k| t.tok.is_keyword(k)) {
                if p.peek() == Some(&Tok::LBracket) {
                    p.attributes()?;
                }
                continue;
            }

            let mut chain: Vec<T> = vec![parse_vertex(first, line)?];
            while let Some(tok) = p.peek().filter(|t| matches!(t, Tok::Arrow | Tok::Line)) {
                if *tok != connector {
                    return Err(DotError::DanglingConnector { line });
                }
                p.pos += 1;
                match p.next() {
                    Some(v) => match v.tok.id() {
                        Some(id) => chain.push(parse_vertex(id, v.line)?),
                        None => return Err(DotError::DanglingConnector { line: v.line }),
                    },
                    None => return Err(DotError::DanglingConnector { line }),
                }
            }

            let attrs = if p.peek() == Some(&Tok::LBracket) {
                p.attributes()?
            } else {
                Vec::new()
            };

            if chain.len() == 1 {
                g.add_vertex(chain.swap_remove(0));
                continue;
            }

            let weight = match attrs.iter().find(|(k, _)| k.eq_ignore_ascii_case("weight")) {
                Some((_, value)) => Some(value.parse::<f64>().map_err(|_| {
                    DotError::InvalidWeight {
                        line,
                        value: (*value).to_string(),
                    }
                })?),
                None => None,
            };
            for pair in chain.windows(2) {
                let (from, to) = (pair[0].clone(), pair[1].clone());
                match weight {
                    Some(w) => g.add_weighted_edge(from, to, w),
                    None => g.add_edge(from, to),
                };
            }
        }

        debug!(vertices = g.size(), directed = g.is_directed(), "graph parsed");
        Ok(g)
    }
}

/// Reads and parses the graph description stored at `path`.
pub fn load_from_dot<T, P>(path: P) -> crate::error::Result<Graph<T>>
where
    T: Vertex + FromStr,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Graph::from_dot(&text)?)
}

// ============================================================================
// Tests
// ============================================================================
