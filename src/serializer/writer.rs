/// An intermediate block tree; scalars are already rendered.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Block {
    Scalar(String),
    Map(Vec<(String, Block)>),
    Seq(Vec<Block>),
}

impl Block {
    pub(super) fn text(value: &str) -> Self {
        Block::Scalar(quote(value))
    }
}

const INDENT: usize = 2;

/// Renders a top-level mapping.
pub(super) fn render(entries: &[(String, Block)]) -> String {
    let mut out = String::new();
    write_map(&mut out, entries, 0);
    out
}

/// Longest key a reader accepts in `key: value` form; longer keys use `? key`.
const IMPLICIT_KEY_LIMIT: usize = 1024;

fn write_map(out: &mut String, entries: &[(String, Block)], indent: usize) {
    for (key, value) in entries {
        push_indent(out, indent);
        let key = quote(key);
        if key.chars().count() >= IMPLICIT_KEY_LIMIT {
            out.push_str("? ");
            out.push_str(&key);
            out.push('\n');
            push_indent(out, indent);
        } else {
            out.push_str(&key);
        }
        out.push(':');
        match value {
            Block::Scalar(scalar) => {
                out.push(' ');
                out.push_str(scalar);
                out.push('\n');
            }
            Block::Map(children) if children.is_empty() => out.push_str(" {}\n"),
            Block::Seq(items) if items.is_empty() => out.push_str(" []\n"),
            Block::Map(children) => {
                out.push('\n');
                write_map(out, children, indent + INDENT);
            }
            Block::Seq(items) => {
                out.push('\n');
                write_seq(out, items, indent + INDENT);
            }
        }
    }
}

fn write_seq(out: &mut String, items: &[Block], indent: usize) {
    for item in items {
        match item {
            Block::Scalar(scalar) => {
                push_indent(out, indent);
                out.push_str("- ");
                out.push_str(scalar);
                out.push('\n');
            }
            Block::Map(children) if children.is_empty() => {
                push_indent(out, indent);
                out.push_str("- {}\n");
            }
            Block::Seq(items) if items.is_empty() => {
                push_indent(out, indent);
                out.push_str("- []\n");
            }
            // Compact form: render the nested block one level deeper, then turn the
            // indentation of its first line into the item marker.
            Block::Map(_) | Block::Seq(_) => {
                let mut nested = String::new();
                match item {
                    Block::Map(children) => write_map(&mut nested, children, indent + INDENT),
                    Block::Seq(items) => write_seq(&mut nested, items, indent + INDENT),
                    Block::Scalar(_) => {}
                }
                push_indent(out, indent);
                out.push_str("- ");
                out.push_str(&nested[indent + INDENT..]);
            }
        }
    }
}

fn push_indent(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat_n(' ', indent));
}

/// Formats a float so that reading it back yields the same value.
pub(super) fn float(value: f64) -> String {
    if value.is_nan() {
        ".nan".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { ".inf" } else { "-.inf" }.to_string()
    } else if value == 0.0 && value.is_sign_negative() {
        // `-0` would read back as the integer zero.
        "-0.0".to_string()
    } else if value.fract() == 0.0 && value.abs() >= 1e15 {
        format!("{value:e}")
    } else {
        format!("{value}")
    }
}

const LINE_BREAKS: &[char] = &['\n', '\r', '\u{85}', '\u{2028}', '\u{2029}'];

/// Renders `value` as a single-line scalar that reads back as the same string.
///
/// The scalar style is whatever `serde_yaml` picks for the string on its own. Text
/// with line breaks, which it would spread over several lines, is written
/// double-quoted with escapes instead.
pub(super) fn quote(value: &str) -> String {
    if value.contains(LINE_BREAKS) {
        return double_quoted(value);
    }
    match serde_yaml::to_string(value) {
        Ok(rendered) => match rendered.strip_suffix('\n') {
            Some(line) if !line.is_empty() && !line.contains('\n') => line.to_string(),
            _ => double_quoted(value),
        },
        Err(_) => double_quoted(value),
    }
}

fn double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '\u{85}' => out.push_str("\\N"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            c if c.is_control() || matches!(c, '\u{feff}' | '\u{fffe}' | '\u{ffff}') => {
                out.push_str(&format!("\\u{:04X}", c as u32))
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
