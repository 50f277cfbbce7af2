//! Result layout: one generated document as a titled grid of sections.
//!
//! Content is rendered verbatim, in the order given. The download control
//! sits outside the captured `#tabloid` subtree and can be hidden while an
//! export is running.

use super::escape;
use crate::GeneratedDocument;
use std::fmt::Write;

/// State of the download trigger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Control {
    pub hidden: bool,
    pub disabled: bool,
}

/// A rendered result: the document plus its download control
#[derive(Debug, Clone)]
pub struct ResultView {
    document: GeneratedDocument,
    pub download: Control,
}

impl ResultView {
    pub fn new(document: GeneratedDocument) -> Self {
        Self {
            document,
            download: Control::default(),
        }
    }

    pub fn document(&self) -> &GeneratedDocument {
        &self.document
    }
}

/// Grid slots of the result, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    MainArticle,
    Introduction,
    Poem,
    KnowledgeCorner,
    IllustrationIdeas,
    Slogans,
}

pub const SECTIONS: [Section; 6] = [
    Section::MainArticle,
    Section::Introduction,
    Section::Poem,
    Section::KnowledgeCorner,
    Section::IllustrationIdeas,
    Section::Slogans,
];

impl Section {
    /// Columns spanned in the three-column grid
    pub fn span(self) -> u32 {
        match self {
            Section::MainArticle | Section::Poem => 2,
            Section::Introduction | Section::KnowledgeCorner => 1,
            Section::IllustrationIdeas | Section::Slogans => 3,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Section::MainArticle => "📖",
            Section::Introduction => "👋",
            Section::Poem => "📜",
            Section::KnowledgeCorner => "💡",
            Section::IllustrationIdeas => "🎨",
            Section::Slogans => "📣",
        }
    }

    /// The main article gets the primary border color.
    pub fn is_primary(self) -> bool {
        self == Section::MainArticle
    }

    pub fn key(self) -> &'static str {
        match self {
            Section::MainArticle => "main-article",
            Section::Introduction => "introduction",
            Section::Poem => "poem",
            Section::KnowledgeCorner => "knowledge-corner",
            Section::IllustrationIdeas => "illustration-ideas",
            Section::Slogans => "slogans",
        }
    }

    pub fn title(self, doc: &GeneratedDocument) -> &str {
        match self {
            Section::MainArticle => &doc.main_article.title,
            Section::Introduction => &doc.introduction.title,
            Section::Poem => &doc.poem.title,
            Section::KnowledgeCorner => &doc.knowledge_corner.title,
            Section::IllustrationIdeas => &doc.illustration_ideas.title,
            Section::Slogans => &doc.slogans.title,
        }
    }
}

/// Label of the download control for its current state.
pub fn download_label(control: &Control) -> &'static str {
    if control.disabled {
        "下载中..."
    } else {
        "一键下载"
    }
}

/// Render the result view (download control plus `#tabloid` subtree).
pub fn render_result(view: &ResultView) -> String {
    let doc = view.document();
    let mut html = String::new();

    html.push_str("<div class=\"tabloid-wrap\" data-view=\"result\">");
    let _ = write!(
        html,
        "<button id=\"download\" class=\"download\" aria-label=\"下载手抄报\"{}{}>{}</button>",
        if view.download.disabled { " disabled" } else { "" },
        if view.download.hidden { " hidden" } else { "" },
        download_label(&view.download),
    );

    html.push_str("<div id=\"tabloid\" class=\"tabloid\">");
    let _ = write!(
        html,
        "<div class=\"masthead\"><h1>{}</h1><p class=\"subtitle\">{}</p></div>",
        escape(&doc.main_title),
        escape(&doc.subtitle)
    );

    html.push_str("<div class=\"grid\">");
    for section in SECTIONS {
        let _ = write!(
            html,
            "<section class=\"section span-{}{}\" data-section=\"{}\"><h3><span class=\"icon\">{}</span>{}</h3><div class=\"body\">",
            section.span(),
            if section.is_primary() { " primary" } else { "" },
            section.key(),
            section.icon(),
            escape(section.title(doc)),
        );
        render_section_body(&mut html, section, doc);
        html.push_str("</div></section>");
    }
    html.push_str("</div></div></div>");
    html
}

fn render_section_body(html: &mut String, section: Section, doc: &GeneratedDocument) {
    match section {
        Section::MainArticle => {
            let _ = write!(html, "<p class=\"indent\">{}</p>", escape(&doc.main_article.content));
        }
        Section::Introduction => {
            let _ = write!(html, "<p class=\"indent\">{}</p>", escape(&doc.introduction.content));
        }
        Section::KnowledgeCorner => {
            let _ = write!(html, "<p>{}</p>", escape(&doc.knowledge_corner.content));
        }
        Section::Poem => {
            html.push_str("<div class=\"poem\">");
            for line in &doc.poem.content {
                let _ = write!(html, "<p class=\"verse\">{}</p>", escape(line));
            }
            let _ = write!(html, "<p class=\"author\">—— {}</p>", escape(&doc.poem.author));
            html.push_str("</div>");
        }
        Section::IllustrationIdeas => {
            html.push_str("<div class=\"ideas\">");
            for idea in &doc.illustration_ideas.items {
                let _ = write!(
                    html,
                    "<figure class=\"idea\"><svg viewBox=\"0 0 100 100\" xmlns=\"http://www.w3.org/2000/svg\">\
                     <path d=\"{}\" stroke=\"currentColor\" stroke-width=\"3\" fill=\"none\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>\
                     </svg><figcaption>{}</figcaption></figure>",
                    escape(&idea.svg_path),
                    escape(&idea.description)
                );
            }
            html.push_str("</div>");
        }
        Section::Slogans => {
            html.push_str("<ul class=\"slogans\">");
            for slogan in &doc.slogans.items {
                let _ = write!(html, "<li>\"{}\"</li>", escape(slogan));
            }
            html.push_str("</ul>");
        }
    }
}
