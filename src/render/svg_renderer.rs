use std::fmt::Write as _;

use crate::core::path::format_coord;
use crate::error::ChartResult;
use crate::render::{ArcShape, BarShape, Color, PathShape, RenderFrame, Renderer, TextShape};

/// Serializes frames to standalone SVG markup.
///
/// Output is byte-identical for identical frames: shapes are written in frame
/// order and every number goes through the same two-decimal formatting as
/// path data.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    markup: String,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup of the last successfully rendered frame.
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    #[must_use]
    pub fn into_markup(self) -> String {
        self.markup
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.markup = to_svg(frame);
        Ok(())
    }
}

/// Serializes a frame without validating it.
#[must_use]
pub fn to_svg(frame: &RenderFrame) -> String {
    let width = frame.viewport.width;
    let height = frame.viewport.height;
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    for path in &frame.paths {
        write_path(&mut out, path);
    }
    for bar in &frame.bars {
        write_bar(&mut out, bar);
    }
    for arc in &frame.arcs {
        write_arc(&mut out, arc);
    }
    for text in &frame.texts {
        write_text(&mut out, text);
    }
    out.push_str("</svg>\n");
    out
}

fn paint(attribute: &str, color: Option<Color>) -> String {
    match color {
        Some(color) => format!(
            r#" {attribute}="{}" {attribute}-opacity="{}""#,
            color.to_hex(),
            format_coord(color.alpha)
        ),
        None => format!(r#" {attribute}="none""#),
    }
}

fn write_path(out: &mut String, path: &PathShape) {
    let _ = write!(out, r#"  <path d="{}""#, path.data);
    out.push_str(&paint("fill", path.fill));
    out.push_str(&paint("stroke", path.stroke));
    if path.stroke.is_some() {
        let _ = write!(out, r#" stroke-width="{}""#, format_coord(path.stroke_width));
        if path.dashed {
            out.push_str(r#" stroke-dasharray="4 3""#);
        }
    }
    out.push_str("/>\n");
}

fn write_bar(out: &mut String, bar: &BarShape) {
    let _ = write!(
        out,
        r#"  <rect x="{}" y="{}" width="{}" height="{}""#,
        format_coord(bar.x),
        format_coord(bar.y),
        format_coord(bar.width),
        format_coord(bar.height)
    );
    out.push_str(&paint("fill", Some(bar.fill)));
    out.push_str("/>\n");
    if bar.end_marker {
        let _ = write!(
            out,
            r#"  <circle cx="{}" cy="{}" r="{}""#,
            format_coord(bar.x + bar.width),
            format_coord(bar.y + bar.height / 2.0),
            format_coord(bar.height / 3.0)
        );
        out.push_str(&paint("fill", Some(bar.fill.with_alpha(1.0))));
        out.push_str("/>\n");
    }
}

fn write_arc(out: &mut String, arc: &ArcShape) {
    let _ = write!(out, r#"  <path d="{}" fill-rule="evenodd""#, arc.data);
    out.push_str(&paint("fill", Some(arc.fill)));
    out.push_str("/>\n");
}

fn write_text(out: &mut String, text: &TextShape) {
    let _ = write!(
        out,
        r#"  <text x="{}" y="{}" font-size="{}" text-anchor="{}""#,
        format_coord(text.x),
        format_coord(text.y),
        format_coord(text.font_size_px),
        text.h_align.anchor()
    );
    out.push_str(&paint("fill", Some(text.color)));
    let _ = writeln!(out, ">{}</text>", escape_text(&text.text));
}

fn escape_text(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape_text("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }
}
