//! Plain-text rendering for terminals.

use crate::node::{Badge, Node};
use unicode_width::UnicodeWidthStr;

const LABEL_WIDTH: usize = 14;

enum Line {
    Text(String),
    Rule,
}

/// Render a card tree as a box-drawn block.
pub fn render_text(node: &Node) -> String {
    let mut lines = Vec::new();
    collect(node, &mut lines);

    let width = lines
        .iter()
        .map(|l| match l {
            Line::Text(t) => t.width(),
            Line::Rule => 0,
        })
        .max()
        .unwrap_or(0);
    let bar = "─".repeat(width + 2);

    let mut out = format!("┌{bar}┐\n");
    for line in &lines {
        match line {
            Line::Text(t) => {
                let pad = width - t.width();
                out.push_str(&format!("│ {t}{} │\n", " ".repeat(pad)));
            }
            Line::Rule => out.push_str(&format!("├{bar}┤\n")),
        }
    }
    out.push_str(&format!("└{bar}┘"));
    out
}

fn collect(node: &Node, lines: &mut Vec<Line>) {
    match node {
        Node::Card { children, .. } | Node::Grid { children, .. } => {
            for child in children {
                collect(child, lines);
            }
        }
        Node::Header {
            title,
            subtitle,
            badge,
            ..
        } => {
            lines.push(Line::Text(title.clone()));
            lines.push(Line::Text(format!("{subtitle}  {}", badge_text(badge))));
            lines.push(Line::Rule);
        }
        Node::Banner { label, value } => {
            lines.push(Line::Text(format!("{label:<LABEL_WIDTH$} {value}")));
        }
        Node::Line { text, .. } => lines.push(Line::Text(text.clone())),
        Node::Tile {
            label,
            value,
            detail,
            ..
        } => {
            lines.push(Line::Text(format!("{label:<LABEL_WIDTH$} {value}")));
            if let Some(detail) = detail {
                lines.push(Line::Text(format!("{:<LABEL_WIDTH$} {detail}", "")));
            }
        }
        Node::Highlight { label, value, unit } => {
            lines.push(Line::Text(format!("{label}: {value} {unit}")));
        }
        Node::List {
            label, rows, empty, ..
        } => {
            lines.push(Line::Text(format!("{label}:")));
            if rows.is_empty() {
                lines.push(Line::Text(format!("  {empty}")));
            }
            for row in rows {
                lines.push(Line::Text(format!("  {}  {}", row.text, row.aside)));
            }
        }
        Node::Note { label, value } => lines.push(Line::Text(format!("{label} {value}"))),
        Node::Footer { text } => {
            lines.push(Line::Rule);
            lines.push(Line::Text(text.clone()));
        }
    }
}

fn badge_text(badge: &Badge) -> String {
    let mark = if badge.checked {
        "✓"
    } else if badge.live {
        "●"
    } else {
        "○"
    };
    format!("[{mark} {}]", badge.label)
}
