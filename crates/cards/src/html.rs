//! HTML rendering with Tailwind utility classes.
//!
//! Icons are emitted as `<i data-lucide="...">` placeholders for the
//! lucide script to replace.

use crate::node::{Badge, Emphasis, Icon, Node};

const PANEL: &str = "bg-white/10 rounded-xl backdrop-blur-sm";

/// Render a card tree to an HTML fragment. All text is escaped.
pub fn render_html(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Card { kind, theme, children } => {
            out.push_str(&format!(
                r#"<div class="relative flex w-full flex-col gap-4 rounded-2xl p-6 shadow-lg overflow-hidden bg-gradient-to-br {}" data-card="{kind}">"#,
                theme.gradient()
            ));
            out.push_str(r#"<div class="absolute inset-0 bg-white/10 backdrop-blur-sm"></div>"#);
            out.push_str(r#"<div class="relative z-10">"#);
            for child in children {
                write_node(out, child);
            }
            out.push_str("</div></div>");
        }
        Node::Header {
            icon,
            title,
            subtitle,
            badge,
        } => {
            out.push_str(r#"<div class="flex items-center justify-between mb-4">"#);
            out.push_str(r#"<div class="flex items-center gap-3">"#);
            out.push_str(r#"<div class="w-12 h-12 rounded-full bg-white/20 flex items-center justify-center">"#);
            write_icon(out, *icon, "w-6 h-6 text-white");
            out.push_str("</div><div>");
            out.push_str(&format!(
                r#"<h3 class="text-white text-xl font-semibold">{}</h3><p class="text-white/70 text-sm">{}</p>"#,
                escape(title),
                escape(subtitle)
            ));
            out.push_str("</div></div>");
            write_badge(out, badge);
            out.push_str("</div>");
        }
        Node::Banner { label, value } => {
            out.push_str(&format!(
                r#"<div class="{PANEL} p-4 mb-4"><div class="flex items-center justify-between"><span class="text-white/70 text-sm">{}</span><span class="text-white text-lg font-semibold capitalize">{}</span></div></div>"#,
                escape(label),
                escape(value)
            ));
        }
        Node::Line { icon, text } => {
            out.push_str(&format!(r#"<div class="{PANEL} p-4 mb-4"><div class="flex items-center gap-2">"#));
            write_icon(out, *icon, "w-4 h-4 text-white/70");
            out.push_str(&format!(r#"<span class="text-white text-sm">{}</span></div></div>"#, escape(text)));
        }
        Node::Grid { responsive, children } => {
            let columns = if *responsive {
                "grid-cols-1 md:grid-cols-2"
            } else {
                "grid-cols-2"
            };
            out.push_str(&format!(r#"<div class="grid {columns} gap-4 mb-4">"#));
            for child in children {
                write_node(out, child);
            }
            out.push_str("</div>");
        }
        Node::Tile {
            icon,
            label,
            value,
            detail,
            emphasis,
        } => {
            out.push_str(&format!(r#"<div class="{PANEL} p-4">"#));
            write_label(out, *icon, label);
            write_value(out, value, *emphasis);
            if let Some(detail) = detail {
                out.push_str(&format!(r#"<p class="text-white/70 text-xs">{}</p>"#, escape(detail)));
            }
            out.push_str("</div>");
        }
        Node::Highlight { label, value, unit } => {
            out.push_str(&format!(
                r#"<div class="{PANEL} p-5 mb-4"><div class="text-center"><span class="text-white/70 text-sm font-medium uppercase block mb-2">{}</span><p class="text-white text-4xl font-bold">{}</p><span class="text-white/70 text-sm">{}</span></div></div>"#,
                escape(label),
                escape(value),
                escape(unit)
            ));
        }
        Node::List {
            icon,
            label,
            rows,
            empty,
        } => {
            out.push_str(&format!(r#"<div class="{PANEL} p-4 mb-4"><div class="flex items-center gap-2 mb-3">"#));
            write_icon(out, *icon, "w-4 h-4 text-white/70");
            out.push_str(&format!(
                r#"<span class="text-white/70 text-xs font-medium uppercase">{}</span></div>"#,
                escape(label)
            ));
            if rows.is_empty() {
                out.push_str(&format!(r#"<p class="text-white/70 text-sm">{}</p>"#, escape(empty)));
            }
            for row in rows {
                out.push_str(&format!(
                    r#"<div class="flex justify-between items-center text-white text-sm mb-2"><span>{}</span><span class="text-white/70">{}</span></div>"#,
                    escape(&row.text),
                    escape(&row.aside)
                ));
            }
            out.push_str("</div>");
        }
        Node::Note { label, value } => {
            out.push_str(&format!(
                r#"<div class="mt-4 {PANEL} p-3"><p class="text-white/70 text-xs"><span class="font-medium">{}</span> {}</p></div>"#,
                escape(label),
                escape(value)
            ));
        }
        Node::Footer { text } => {
            out.push_str(&format!(
                r#"<div class="mt-4 text-white/60 text-xs text-center">{}</div>"#,
                escape(text)
            ));
        }
    }
}

fn write_icon(out: &mut String, icon: Icon, classes: &str) {
    out.push_str(&format!(
        r#"<i data-lucide="{}" class="{classes}" aria-hidden="true"></i>"#,
        icon.lucide_name()
    ));
}

fn write_badge(out: &mut String, badge: &Badge) {
    let background = if badge.live || badge.checked { "bg-white/20" } else { "bg-white/10" };
    out.push_str(&format!(
        r#"<div class="flex items-center gap-2 px-3 py-1 rounded-full {background}">"#
    ));
    if badge.checked {
        write_icon(out, Icon::CheckCircle, "w-4 h-4 text-white");
    } else {
        let dot = if badge.live { "bg-white animate-pulse" } else { "bg-white/50" };
        out.push_str(&format!(r#"<div class="w-2 h-2 rounded-full {dot}"></div>"#));
    }
    out.push_str(&format!(
        r#"<span class="text-white text-sm font-medium capitalize">{}</span></div>"#,
        escape(&badge.label)
    ));
}

fn write_label(out: &mut String, icon: Option<Icon>, label: &str) {
    match icon {
        Some(icon) => {
            out.push_str(r#"<div class="flex items-center gap-2 mb-2">"#);
            write_icon(out, icon, "w-4 h-4 text-white/70");
            out.push_str(&format!(
                r#"<span class="text-white/70 text-xs font-medium uppercase">{}</span></div>"#,
                escape(label)
            ));
        }
        None => out.push_str(&format!(
            r#"<span class="text-white/70 text-xs font-medium uppercase block mb-1">{}</span>"#,
            escape(label)
        )),
    }
}

fn write_value(out: &mut String, value: &str, emphasis: Emphasis) {
    out.push_str(&format!(r#"<p class="{}">{}</p>"#, emphasis.classes(), escape(value)));
}

/// Escape text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
