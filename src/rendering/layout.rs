//! Box layout of a result view for rasterization.
//!
//! Mirrors the HTML result: a masthead, then a three-column grid whose
//! rows are packed by section span. Text is broken into lines by glyph
//! cells; wide (CJK) glyphs take a full em, narrow ones half an em.

use crate::view::result::download_label;
use crate::view::{ResultView, Section, SECTIONS};
use crate::{GeneratedDocument, Viewport};

pub const PAGE_PADDING: u32 = 24;
pub const GRID_COLUMNS: u32 = 3;
pub const GRID_GAP: u32 = 24;
pub const SECTION_PADDING: u32 = 16;
pub const SECTION_BORDER: u32 = 2;
pub const TITLE_PX: u32 = 56;
pub const SUBTITLE_PX: u32 = 20;
pub const HEADING_PX: u32 = 24;
pub const BODY_PX: u32 = 14;
pub const MAX_ILLUSTRATION: u32 = 384;
/// Narrowest grid column: section chrome on both sides plus four body glyphs
pub const MIN_COLUMN: u32 = 2 * (SECTION_PADDING + SECTION_BORDER) + 4 * BODY_PX;
/// Narrowest page the grid fits on; smaller viewports are widened to it
pub const MIN_WIDTH: u32 = 2 * PAGE_PADDING + GRID_COLUMNS * MIN_COLUMN + (GRID_COLUMNS - 1) * GRID_GAP;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    fn offset(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// What a layout box represents; paint picks colors and strokes from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementType {
    /// Background of the captured subtree
    Page,
    /// Double rule under the subtitle
    Rule,
    Title,
    Subtitle,
    Section { primary: bool },
    Heading,
    Paragraph,
    Verse,
    Author,
    Slogan,
    /// Square frame drawing `path` in a 100x100 viewport
    Illustration { path: String },
    Caption,
    Control,
}

/// A positioned box with its text already broken into lines.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub rect: Rect,
    pub elem_type: ElementType,
    pub lines: Vec<String>,
    pub font_px: u32,
    pub align: Align,
    /// Extra offset of the first line (paragraph indent)
    pub indent: u32,
}

impl LayoutNode {
    fn block(rect: Rect, elem_type: ElementType) -> Self {
        Self {
            rect,
            elem_type,
            lines: Vec::new(),
            font_px: BODY_PX,
            align: Align::Left,
            indent: 0,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Layout of a whole result, nodes in paint order.
#[derive(Debug, Clone)]
pub struct LayoutTree {
    pub width: u32,
    pub height: u32,
    pub nodes: Vec<LayoutNode>,
}

impl LayoutTree {
    pub fn find(&self, pred: impl Fn(&ElementType) -> bool) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter().filter(move |n| pred(&n.elem_type))
    }
}

/// Wide glyphs (CJK, full-width forms, emoji) take a full em.
pub fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x1F300..=0x1FAFF
        | 0x20000..=0x3FFFD)
}

pub fn glyph_width(c: char, font_px: u32) -> u32 {
    if is_wide(c) {
        font_px
    } else {
        font_px.div_ceil(2)
    }
}

pub fn text_width(text: &str, font_px: u32) -> u32 {
    text.chars().map(|c| glyph_width(c, font_px)).sum()
}

pub fn line_height(font_px: u32) -> u32 {
    font_px * 7 / 4
}

/// Greedy line breaking. Narrow runs break at the last space when possible;
/// wide glyphs may break anywhere. `indent` shortens the first line.
pub fn wrap_text(text: &str, font_px: u32, max_width: u32, indent: u32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut width = 0u32;
        let mut limit = if lines.is_empty() { max_width.saturating_sub(indent) } else { max_width };

        for c in paragraph.chars() {
            let w = glyph_width(c, font_px);
            if width + w > limit && !line.is_empty() {
                let carry = if is_wide(c) || c == ' ' {
                    String::new()
                } else {
                    split_at_last_space(&mut line)
                };
                lines.push(line.trim_end().to_string());
                line = carry;
                width = text_width(&line, font_px);
                limit = max_width;
                if c == ' ' && line.is_empty() {
                    continue;
                }
            }
            line.push(c);
            width += w;
        }
        lines.push(line.trim_end().to_string());
    }
    lines
}

/// Move the trailing word of `line` out (if the line has a space before it).
fn split_at_last_space(line: &mut String) -> String {
    match line.rfind(' ') {
        Some(i) if i > 0 && !line[..i].trim().is_empty() => {
            let tail = line[i + 1..].to_string();
            line.truncate(i);
            tail
        }
        _ => String::new(),
    }
}

fn text_node(elem_type: ElementType, text: &str, font_px: u32, width: u32, align: Align, indent: u32) -> LayoutNode {
    let lines = wrap_text(text, font_px, width, indent);
    let height = lines.len() as u32 * line_height(font_px);
    LayoutNode {
        rect: Rect::new(0, 0, width, height),
        elem_type,
        lines,
        font_px,
        align,
        indent,
    }
}

/// Stacks nodes vertically inside a section body; coordinates are relative.
struct Column {
    width: u32,
    y: u32,
    nodes: Vec<LayoutNode>,
}

impl Column {
    fn new(width: u32) -> Self {
        Self { width, y: 0, nodes: Vec::new() }
    }

    fn push(&mut self, mut node: LayoutNode, gap_before: u32) {
        if !self.nodes.is_empty() {
            self.y += gap_before;
        }
        node.rect.offset(0, self.y as i32);
        self.y += node.rect.height;
        self.nodes.push(node);
    }

    fn paragraph(&mut self, elem_type: ElementType, text: &str, align: Align, indent: u32, gap: u32) {
        let node = text_node(elem_type, text, BODY_PX, self.width, align, indent);
        self.push(node, gap);
    }
}

fn section_body(section: Section, doc: &GeneratedDocument, width: u32) -> Column {
    let mut col = Column::new(width);
    let indent = 2 * BODY_PX;
    match section {
        Section::MainArticle => col.paragraph(ElementType::Paragraph, &doc.main_article.content, Align::Left, indent, 0),
        Section::Introduction => col.paragraph(ElementType::Paragraph, &doc.introduction.content, Align::Left, indent, 0),
        Section::KnowledgeCorner => col.paragraph(ElementType::Paragraph, &doc.knowledge_corner.content, Align::Left, 0, 0),
        Section::Poem => {
            for verse in &doc.poem.content {
                col.paragraph(ElementType::Verse, verse, Align::Center, 0, 8);
            }
            let author = format!("—— {}", doc.poem.author);
            col.paragraph(ElementType::Author, &author, Align::Right, 0, 16);
        }
        Section::IllustrationIdeas => {
            let items = &doc.illustration_ideas.items;
            let n = items.len() as u32;
            if n > 0 {
                let gap = GRID_GAP;
                let item_w = (width.saturating_sub(gap * (n - 1)) / n).clamp(1, MAX_ILLUSTRATION);
                let row_w = item_w * n + gap * (n - 1);
                let left = width.saturating_sub(row_w) / 2;
                let mut bottom = 0u32;
                for (i, idea) in items.iter().enumerate() {
                    let x = (left + i as u32 * (item_w + gap)) as i32;
                    col.nodes.push(LayoutNode::block(
                        Rect::new(x, 0, item_w, item_w),
                        ElementType::Illustration { path: idea.svg_path.clone() },
                    ));
                    let mut caption = text_node(ElementType::Caption, &idea.description, BODY_PX, item_w, Align::Center, 0);
                    caption.rect.offset(x, (item_w + 16) as i32);
                    bottom = bottom.max(caption.rect.bottom() as u32);
                    col.nodes.push(caption);
                }
                col.y = bottom;
            }
        }
        Section::Slogans => {
            let col_w = width.saturating_sub(GRID_GAP) / 2;
            let mut y = 0u32;
            for pair in doc.slogans.items.chunks(2) {
                let mut row_h = 0u32;
                for (i, slogan) in pair.iter().enumerate() {
                    let quoted = format!("\"{}\"", slogan);
                    let mut node = text_node(ElementType::Slogan, &quoted, BODY_PX, col_w, Align::Center, 0);
                    node.rect.offset((i as u32 * (col_w + GRID_GAP)) as i32, y as i32);
                    row_h = row_h.max(node.rect.height);
                    col.nodes.push(node);
                }
                y += row_h + 8;
            }
            col.y = y.saturating_sub(8);
        }
    }
    col
}

/// Lay out `view` for a page `viewport.width` wide. The tree's height
/// grows with the content and is at least `viewport.height`.
pub fn layout_result(view: &ResultView, viewport: Viewport) -> LayoutTree {
    let doc = view.document();
    let width = viewport.width.max(MIN_WIDTH);
    let inner = width - 2 * PAGE_PADDING;
    let pad = PAGE_PADDING as i32;
    let mut nodes = vec![LayoutNode::block(Rect::new(0, 0, width, 0), ElementType::Page)];
    let mut y = PAGE_PADDING;

    // Masthead
    let mut title = text_node(ElementType::Title, &doc.main_title, TITLE_PX, inner, Align::Center, 0);
    title.rect.offset(pad, y as i32);
    y += title.rect.height + 8;
    nodes.push(title);

    let mut subtitle = text_node(ElementType::Subtitle, &doc.subtitle, SUBTITLE_PX, inner, Align::Center, 0);
    subtitle.rect.offset(pad, y as i32);
    y += subtitle.rect.height + 16;
    nodes.push(subtitle);

    nodes.push(LayoutNode::block(Rect::new(pad, y as i32, inner, 4), ElementType::Rule));
    y += 4 + 32;

    // Grid
    let col_w = (inner - (GRID_COLUMNS - 1) * GRID_GAP) / GRID_COLUMNS;
    let chrome = SECTION_PADDING + SECTION_BORDER;
    let mut row: Vec<(Section, u32, Column)> = Vec::new();
    let mut used = 0u32;

    let flush = |row: &mut Vec<(Section, u32, Column)>, y: &mut u32, nodes: &mut Vec<LayoutNode>| {
        if row.is_empty() {
            return;
        }
        let heading_h = line_height(HEADING_PX);
        let row_h = row
            .iter()
            .map(|(_, _, body)| 2 * chrome + heading_h + 12 + body.y)
            .max()
            .unwrap_or(0);
        let mut x = pad;
        for (section, span, body) in row.drain(..) {
            let section_w = span * col_w + (span - 1) * GRID_GAP;
            nodes.push(LayoutNode::block(
                Rect::new(x, *y as i32, section_w, row_h),
                ElementType::Section { primary: section.is_primary() },
            ));
            let content_x = x + chrome as i32;
            let content_w = section_w.saturating_sub(2 * chrome);
            let heading_text = format!("{} {}", section.icon(), section.title(doc));
            let mut heading = text_node(ElementType::Heading, &heading_text, HEADING_PX, content_w, Align::Left, 0);
            heading.rect.offset(content_x, (*y + chrome) as i32);
            let body_top = heading.rect.bottom() + 12;
            nodes.push(heading);
            for mut node in body.nodes {
                node.rect.offset(content_x, body_top);
                nodes.push(node);
            }
            x += section_w as i32 + GRID_GAP as i32;
        }
        *y += row_h + GRID_GAP;
    };

    for section in SECTIONS {
        let span = section.span();
        if used + span > GRID_COLUMNS {
            flush(&mut row, &mut y, &mut nodes);
            used = 0;
        }
        let content_w = (span * col_w + (span - 1) * GRID_GAP).saturating_sub(2 * chrome);
        row.push((section, span, section_body(section, doc, content_w)));
        used += span;
    }
    flush(&mut row, &mut y, &mut nodes);

    let height = (y - GRID_GAP + PAGE_PADDING).max(viewport.height);
    nodes[0].rect.height = height;

    // Download control overlays the top-right corner unless hidden
    if !view.download.hidden {
        let label = download_label(&view.download);
        let w = text_width(label, BODY_PX) + 32;
        let h = line_height(BODY_PX) + 12;
        let mut control = LayoutNode::block(Rect::new(width.saturating_sub(16 + w) as i32, 16, w, h), ElementType::Control);
        control.lines = vec![label.to_string()];
        control.align = Align::Center;
        nodes.push(control);
    }

    LayoutTree { width, height, nodes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{IllustrationIdea, IllustrationIdeas, Poem, Slogans, TextSection};

    fn sample() -> GeneratedDocument {
        let section = |t: &str| TextSection { title: t.into(), content: "这是一段很长的正文内容，用于测试自动换行是否正常工作。".repeat(4) };
        GeneratedDocument {
            main_title: "强国有我".into(),
            subtitle: "青春无悔".into(),
            introduction: section("卷首语"),
            main_article: section("铁血军魂"),
            poem: Poem { title: "致祖国".into(), author: "少年".into(), content: vec!["一".into(), "二".into()] },
            slogans: Slogans { title: "青春誓言".into(), items: vec!["甲".into(), "乙".into(), "丙".into()] },
            knowledge_corner: section("国防小百科"),
            illustration_ideas: IllustrationIdeas {
                title: "创意插画角".into(),
                items: vec![IllustrationIdea { description: "和平鸽".into(), svg_path: "M10 10 L90 90".into() }],
            },
        }
    }

    #[test]
    fn wrap_breaks_cjk_anywhere_and_latin_at_spaces() {
        assert_eq!(wrap_text("一二三四五", 10, 30, 0), vec!["一二三", "四五"]);
        assert_eq!(wrap_text("hello world", 10, 40, 0), vec!["hello", "world"]);
        assert_eq!(wrap_text("一二三四", 10, 30, 20), vec!["一", "二三四"]);
        assert_eq!(wrap_text("", 10, 30, 0), vec![""]);
    }

    #[test]
    fn sections_pack_into_rows_by_span() {
        let tree = layout_result(&ResultView::new(sample()), Viewport::default());
        let sections: Vec<&LayoutNode> = tree.find(|t| matches!(t, ElementType::Section { .. })).collect();
        assert_eq!(sections.len(), 6);
        // main article + introduction share a row, as do poem + knowledge corner
        assert_eq!(sections[0].rect.y, sections[1].rect.y);
        assert_eq!(sections[2].rect.y, sections[3].rect.y);
        assert!(sections[4].rect.y > sections[2].rect.y);
        assert!(sections[5].rect.y > sections[4].rect.y);
        assert_eq!(sections[4].rect.width, sections[0].rect.width + sections[1].rect.width + GRID_GAP);
        assert!(tree.height as i32 >= sections[5].rect.bottom());
    }

    #[test]
    fn title_and_verses_are_verbatim() {
        let tree = layout_result(&ResultView::new(sample()), Viewport::default());
        let title = tree.find(|t| *t == ElementType::Title).next().unwrap();
        assert_eq!(title.text(), "强国有我");
        let verses: Vec<String> = tree.find(|t| *t == ElementType::Verse).map(|n| n.text()).collect();
        assert_eq!(verses, ["一", "二"]);
        let author = tree.find(|t| *t == ElementType::Author).next().unwrap();
        assert_eq!(author.text(), "—— 少年");
    }

    #[test]
    fn illustration_frames_are_square() {
        let tree = layout_result(&ResultView::new(sample()), Viewport::default());
        let frame = tree.find(|t| matches!(t, ElementType::Illustration { .. })).next().unwrap();
        assert_eq!(frame.rect.width, frame.rect.height);
        assert!(frame.rect.width <= MAX_ILLUSTRATION);
    }

    #[test]
    fn narrow_viewports_widen_to_the_grid_minimum() {
        let view = ResultView::new(sample());
        for width in [0, 150, 204, MIN_WIDTH - 1] {
            let tree = layout_result(&view, Viewport { width, height: 720 });
            assert_eq!(tree.width, MIN_WIDTH);
            for section in tree.find(|t| matches!(t, ElementType::Section { .. })) {
                assert!(section.rect.width >= MIN_COLUMN);
                assert!(section.rect.x as u32 + section.rect.width <= MIN_WIDTH - PAGE_PADDING);
            }
            let heading = tree.find(|t| *t == ElementType::Heading).next().unwrap();
            assert!(heading.rect.width > 0);
        }
    }

    #[test]
    fn hidden_control_is_not_laid_out() {
        let mut view = ResultView::new(sample());
        assert_eq!(layout_result(&view, Viewport::default()).find(|t| *t == ElementType::Control).count(), 1);
        view.download.hidden = true;
        assert_eq!(layout_result(&view, Viewport::default()).find(|t| *t == ElementType::Control).count(), 0);
    }
}
