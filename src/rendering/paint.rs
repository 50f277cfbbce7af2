//! Display list built from a layout tree

use super::layout::{Align, ElementType, LayoutNode, LayoutTree, Rect};
use super::path::{parse_path_lenient, PathSegment};
use log::warn;

pub type Rgba = (u8, u8, u8, u8);

pub const PAGE_BG: Rgba = (255, 251, 235, 255);
pub const PAGE_BORDER: Rgba = (254, 202, 202, 255);
pub const RULE: Rgba = (248, 113, 113, 255);
pub const TITLE: Rgba = (185, 28, 28, 255);
pub const SUBTITLE: Rgba = (161, 98, 7, 255);
pub const SECTION_BG: Rgba = (255, 255, 255, 255);
pub const SECTION_BORDER: Rgba = (234, 179, 8, 255);
pub const PRIMARY_BORDER: Rgba = (248, 113, 113, 255);
pub const HEADING: Rgba = (190, 18, 60, 255);
pub const BODY: Rgba = (30, 41, 59, 255);
pub const MUTED: Rgba = (71, 85, 105, 255);
pub const ACCENT: Rgba = (220, 38, 38, 255);
pub const FRAME_BG: Rgba = (255, 251, 235, 128);
pub const FRAME_BORDER: Rgba = (253, 224, 71, 255);
pub const CONTROL_BG: Rgba = (255, 255, 255, 204);

/// Stroke width of illustration paths, in viewport units
pub const PATH_STROKE: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        rgba: Rgba,
    },
    /// Rectangle outline drawn as dashes of `dash` pixels
    DashedRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        thickness: u32,
        dash: u32,
        rgba: Rgba,
    },
    /// One line of text; `font_px` is the em size
    Text {
        x: i32,
        y: i32,
        text: String,
        font_px: u32,
        rgba: Rgba,
    },
    /// Path in a 100x100 viewport mapped onto the `size` square at (x, y)
    Path {
        x: i32,
        y: i32,
        size: u32,
        segments: Vec<PathSegment>,
        stroke: f32,
        rgba: Rgba,
    },
}

fn solid(r: &Rect, rgba: Rgba) -> PaintCommand {
    PaintCommand::SolidRect { x: r.x, y: r.y, width: r.width, height: r.height, rgba }
}

fn dashed(r: &Rect, thickness: u32, dash: u32, rgba: Rgba) -> PaintCommand {
    PaintCommand::DashedRect { x: r.x, y: r.y, width: r.width, height: r.height, thickness, dash, rgba }
}

fn text_lines(out: &mut Vec<PaintCommand>, node: &LayoutNode, rgba: Rgba) {
    let lh = super::layout::line_height(node.font_px) as i32;
    // glyph box sits in the middle of the line box
    let baseline_pad = (lh - node.font_px as i32) / 2;
    for (i, line) in node.lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let indent = if i == 0 { node.indent } else { 0 };
        let w = super::layout::text_width(line, node.font_px) + indent;
        let free = node.rect.width.saturating_sub(w) as i32;
        let x = node.rect.x
            + indent as i32
            + match node.align {
                Align::Left => 0,
                Align::Center => free / 2,
                Align::Right => free,
            };
        out.push(PaintCommand::Text {
            x,
            y: node.rect.y + i as i32 * lh + baseline_pad,
            text: line.clone(),
            font_px: node.font_px,
            rgba,
        });
    }
}

/// Turn a layout tree into paint commands, back to front.
pub fn paint(tree: &LayoutTree) -> Vec<PaintCommand> {
    let mut out = Vec::new();
    for node in &tree.nodes {
        let r = &node.rect;
        match &node.elem_type {
            ElementType::Page => {
                out.push(solid(r, PAGE_BG));
                out.push(dashed(r, 4, 12, PAGE_BORDER));
            }
            ElementType::Rule => {
                // double rule: two thin bars
                out.push(solid(&Rect::new(r.x, r.y, r.width, 1), RULE));
                out.push(solid(&Rect::new(r.x, r.y + r.height as i32 - 1, r.width, 1), RULE));
            }
            ElementType::Section { primary } => {
                out.push(solid(r, SECTION_BG));
                let border = if *primary { PRIMARY_BORDER } else { SECTION_BORDER };
                out.push(dashed(r, 2, 2, border));
            }
            ElementType::Title => text_lines(&mut out, node, TITLE),
            ElementType::Subtitle => text_lines(&mut out, node, SUBTITLE),
            ElementType::Heading => text_lines(&mut out, node, HEADING),
            ElementType::Paragraph | ElementType::Verse | ElementType::Caption => text_lines(&mut out, node, BODY),
            ElementType::Author => text_lines(&mut out, node, MUTED),
            ElementType::Slogan => text_lines(&mut out, node, ACCENT),
            ElementType::Illustration { path } => {
                out.push(solid(r, FRAME_BG));
                out.push(dashed(r, 2, r.width.max(1), FRAME_BORDER));
                let (segments, err) = parse_path_lenient(path);
                if let Some(err) = err {
                    warn!("illustration path drawn up to the error: {}", err);
                }
                let inset = 16u32.min(r.width / 4);
                out.push(PaintCommand::Path {
                    x: r.x + inset as i32,
                    y: r.y + inset as i32,
                    size: r.width.saturating_sub(2 * inset),
                    segments,
                    stroke: PATH_STROKE,
                    rgba: ACCENT,
                });
            }
            ElementType::Control => {
                out.push(solid(r, CONTROL_BG));
                let mut label = node.clone();
                label.rect.y += 6;
                text_lines(&mut out, &label, ACCENT);
            }
        }
    }
    out
}
