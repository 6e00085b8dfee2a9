//! Minimal markdown for assistant replies
//!
//! Supports exactly what the assistant prompt asks for: paragraphs, `*`/`-`
//! bullet lists and `**bold**`. Anything else passes through as text.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static BLOCK_SEPARATOR: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\n\s*\n").expect("block separator pattern"));

static LIST_ITEM: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\s*[*\-]\s").expect("list item pattern"));

static STRONG: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("strong pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Inline {
  Text(String),
  Strong(String),
}

/// One rendered line: a run of inline spans
pub type Line = Vec<Inline>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "lines", rename_all = "snake_case")]
pub enum Block {
  /// Lines joined by hard breaks
  Paragraph(Vec<Line>),
  List(Vec<Line>),
}

fn parse_inline(text: &str) -> Line {
  let mut spans = Vec::new();
  let mut cursor = 0;

  for caps in STRONG.captures_iter(text) {
    let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
      continue;
    };
    if whole.start() > cursor {
      spans.push(Inline::Text(text[cursor..whole.start()].to_string()));
    }
    spans.push(Inline::Strong(inner.as_str().to_string()));
    cursor = whole.end();
  }

  if cursor < text.len() {
    spans.push(Inline::Text(text[cursor..].to_string()));
  }
  spans
}

pub fn parse_markdown(content: &str) -> Vec<Block> {
  BLOCK_SEPARATOR
    .split(content)
    .filter_map(|block| {
      let lines: Vec<&str> = block.split('\n').filter(|l| !l.trim().is_empty()).collect();
      if lines.is_empty() {
        return None;
      }

      if lines.iter().all(|l| LIST_ITEM.is_match(l)) {
        let items = lines
          .iter()
          .map(|l| parse_inline(&LIST_ITEM.replace(l, "")))
          .collect();
        Some(Block::List(items))
      } else {
        Some(Block::Paragraph(lines.iter().map(|l| parse_inline(l)).collect()))
      }
    })
    .collect()
}

pub fn escape_html(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(c),
    }
  }
  out
}

fn line_to_html(line: &Line) -> String {
  line
    .iter()
    .map(|span| match span {
      Inline::Text(t) => escape_html(t),
      Inline::Strong(t) => format!("<strong>{}</strong>", escape_html(t)),
    })
    .collect()
}

pub fn to_html(blocks: &[Block]) -> String {
  blocks
    .iter()
    .map(|block| match block {
      Block::Paragraph(lines) => format!(
        "<p>{}</p>",
        lines.iter().map(line_to_html).collect::<Vec<_>>().join("<br/>")
      ),
      Block::List(items) => format!(
        "<ul>{}</ul>",
        items
          .iter()
          .map(|item| format!("<li>{}</li>", line_to_html(item)))
          .collect::<String>()
      ),
    })
    .collect()
}
