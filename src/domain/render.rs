//! Tree-style text rendering.
//!
//! ```text
//! Languages
//! ├── Compiled
//! │    └── Java
//! └── Interpreted
//! ```
//!
//! Every level below the rendered root takes a five column cell: a bar
//! followed by four spaces while the ancestor on that level still has siblings
//! to come, five spaces once it has none. The open/closed state of each level
//! lives in a call-local stack next to the walk, so rendering never touches
//! the tree and depth is bounded by the heap, not the call stack.

use std::borrow::Cow;
use std::fmt;
use std::io;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::arena::MultiTree;
use crate::domain::node::NodeRef;

const PADDING: &str = "    ";

/// Characters used to draw the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlyphSet {
    /// `│ ├ └ ─`
    #[default]
    Unicode,
    /// `| + \` -`
    Ascii,
}

struct Glyphs {
    bar: char,
    tee: char,
    corner: char,
    dash: char,
}

impl GlyphSet {
    fn glyphs(self) -> Glyphs {
        match self {
            GlyphSet::Unicode => Glyphs {
                bar: '\u{2502}',
                tee: '\u{251C}',
                corner: '\u{2514}',
                dash: '\u{2500}',
            },
            GlyphSet::Ascii => Glyphs {
                bar: '|',
                tee: '+',
                corner: '`',
                dash: '-',
            },
        }
    }
}

impl FromStr for GlyphSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unicode" => Ok(GlyphSet::Unicode),
            "ascii" => Ok(GlyphSet::Ascii),
            other => Err(format!("unknown glyph set '{}', expected unicode or ascii", other)),
        }
    }
}

impl fmt::Display for GlyphSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlyphSet::Unicode => f.write_str("unicode"),
            GlyphSet::Ascii => f.write_str("ascii"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Show tab, newline and carriage return as `\t`, `\n`, `\r`
    pub escape: bool,
    pub glyphs: GlyphSet,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            escape: true,
            glyphs: GlyphSet::Unicode,
        }
    }
}

impl RenderOptions {
    pub fn with_escape(mut self, escape: bool) -> Self {
        self.escape = escape;
        self
    }

    pub fn with_glyphs(mut self, glyphs: GlyphSet) -> Self {
        self.glyphs = glyphs;
        self
    }
}

/// Replaces literal tabs, newlines and carriage returns by their two
/// character escapes so a payload always stays on one line.
pub fn escape_control(text: &str) -> Cow<'_, str> {
    if !text.contains(|c| matches!(c, '\t' | '\n' | '\r')) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        match c {
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

impl<T: fmt::Display> NodeRef<'_, T> {
    /// Renders this subtree, one line per node, without a trailing newline.
    pub fn render(&self, options: &RenderOptions) -> String {
        let glyphs = options.glyphs.glyphs();
        let mut out = String::new();
        push_label(&mut out, self.value(), options.escape);
        render_children(*self, &glyphs, options.escape, &mut out);
        out
    }

    /// Writes the rendering plus a final newline.
    pub fn write_to<W: io::Write>(&self, writer: &mut W, options: &RenderOptions) -> io::Result<()> {
        writeln!(writer, "{}", self.render(options))
    }
}

impl<T: fmt::Display> MultiTree<T> {
    pub fn render(&self, options: &RenderOptions) -> String {
        self.root_node().render(options)
    }

    pub fn write_to<W: io::Write>(&self, writer: &mut W, options: &RenderOptions) -> io::Result<()> {
        self.root_node().write_to(writer, options)
    }
}

impl<T: fmt::Display> fmt::Display for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&RenderOptions::default()))
    }
}

/// Appends one line per descendant of `node`, in pre-order.
///
/// Iterative: each stack frame is the children iterator of one level, and
/// `open_levels[d]` says whether the ancestor on level `d` has siblings still
/// to come.
fn render_children<T: fmt::Display>(
    node: NodeRef<'_, T>,
    glyphs: &Glyphs,
    escape: bool,
    out: &mut String,
) {
    let mut open_levels: Vec<bool> = Vec::new();
    let mut stack = vec![node.children()];

    while let Some(siblings) = stack.last_mut() {
        let Some(child) = siblings.next() else {
            stack.pop();
            open_levels.pop();
            continue;
        };
        let is_last = siblings.len() == 0;

        out.push('\n');
        for &open in open_levels.iter() {
            out.push(if open { glyphs.bar } else { ' ' });
            out.push_str(PADDING);
        }
        out.push(if is_last { glyphs.corner } else { glyphs.tee });
        out.push(glyphs.dash);
        out.push(glyphs.dash);
        out.push(' ');
        push_label(out, child.value(), escape);

        open_levels.push(!is_last);
        stack.push(child.children());
    }
}

fn push_label<T: fmt::Display>(out: &mut String, value: &T, escape: bool) {
    let text = value.to_string();
    if escape {
        out.push_str(&escape_control(&text));
    } else {
        out.push_str(&text);
    }
}
