//! Purpose: Render query results as JSON text with optional ANSI colorization.
//! Exports: `Layout`, `render_json`.
//! Role: Small, pure formatter used by the CLI emission path.
//! Invariants: Without color, `Pretty` equals `serde_json::to_string_pretty` and
//!             `Compact` equals `serde_json::to_string`.
//! Invariants: ANSI escapes appear only when explicitly enabled.
use serde_json::{Map, Value};

const INDENT: &str = "  ";

// 8/16-color codes only; bright variants wash out on light themes.
const COLOR_KEY: &str = "36";
const COLOR_STRING: &str = "32";
const COLOR_NUMBER: &str = "33";
const COLOR_BOOL: &str = "35";
const COLOR_NULL: &str = "39";
const COLOR_PUNCT: &str = "39";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Layout {
    Pretty,
    Compact,
}

pub fn render_json(value: &Value, layout: Layout, use_color: bool) -> String {
    let mut renderer = Renderer {
        layout,
        use_color,
        out: String::new(),
    };
    renderer.value(value, 0);
    renderer.out
}

struct Renderer {
    layout: Layout,
    use_color: bool,
    out: String,
}

impl Renderer {
    fn value(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Null => self.token("null", COLOR_NULL),
            Value::Bool(flag) => self.token(if *flag { "true" } else { "false" }, COLOR_BOOL),
            Value::Number(num) => self.token(&num.to_string(), COLOR_NUMBER),
            Value::String(text) => self.token(&encode_str(text), COLOR_STRING),
            Value::Array(items) => self.array(items, depth),
            Value::Object(map) => self.object(map, depth),
        }
    }

    fn array(&mut self, items: &[Value], depth: usize) {
        if items.is_empty() {
            self.token("[]", COLOR_PUNCT);
            return;
        }
        self.token("[", COLOR_PUNCT);
        for (idx, item) in items.iter().enumerate() {
            self.separator(idx, depth + 1);
            self.value(item, depth + 1);
        }
        self.close("]", depth);
    }

    fn object(&mut self, map: &Map<String, Value>, depth: usize) {
        if map.is_empty() {
            self.token("{}", COLOR_PUNCT);
            return;
        }
        self.token("{", COLOR_PUNCT);
        for (idx, (key, item)) in map.iter().enumerate() {
            self.separator(idx, depth + 1);
            self.token(&encode_str(key), COLOR_KEY);
            self.token(":", COLOR_PUNCT);
            if self.layout == Layout::Pretty {
                self.out.push(' ');
            }
            self.value(item, depth + 1);
        }
        self.close("}", depth);
    }

    fn separator(&mut self, idx: usize, depth: usize) {
        if idx > 0 {
            self.token(",", COLOR_PUNCT);
        }
        self.newline(depth);
    }

    fn close(&mut self, text: &str, depth: usize) {
        self.newline(depth);
        self.token(text, COLOR_PUNCT);
    }

    fn newline(&mut self, depth: usize) {
        if self.layout == Layout::Compact {
            return;
        }
        self.out.push('\n');
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
    }

    fn token(&mut self, text: &str, color: &str) {
        if !self.use_color {
            self.out.push_str(text);
            return;
        }
        self.out.push_str("\u{1b}[");
        self.out.push_str(color);
        self.out.push('m');
        self.out.push_str(text);
        self.out.push_str("\u{1b}[0m");
    }
}

fn encode_str(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}
