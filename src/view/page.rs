//! Full page: header, generate control, the active view and footer.

use super::{escape, render_result, render_skeleton};
use crate::ViewState;
use std::fmt::Write;

pub const PAGE_TITLE: &str = "强国有我主题阅兵手抄报生成器";
pub const GENERATE_LABEL: &str = "✨ 一键生成我的手抄报";
pub const GENERATING_LABEL: &str = "正在生成中...";
pub const EMPTY_HEADING: &str = "准备好创作你的“强国有我”手抄报了吗？";

const STYLESHEET: &str = r#"
body{margin:0;background:#f3f4f6;color:#1f2937;font-family:"Noto Sans SC",sans-serif}
header{background:#fff;box-shadow:0 1px 3px rgba(0,0,0,.1);display:flex;justify-content:space-between;align-items:center;padding:16px 24px}
header .badge{width:48px;height:48px;border-radius:50%;background:#dc2626;color:#fff;display:inline-flex;align-items:center;justify-content:center;font-size:28px}
header h1{display:inline;margin-left:12px;font-size:24px}
header .tag{color:#dc2626;font-weight:600}
main{max-width:1100px;margin:0 auto;padding:32px 16px}
.hero{text-align:center;background:#fff;padding:24px;border-radius:12px;margin-bottom:32px}
.hero h2{color:#b91c1c}
#generate{margin-top:24px;padding:12px 32px;font-weight:700;color:#fff;border:0;border-radius:999px;background:linear-gradient(90deg,#dc2626,#eab308)}
#generate[disabled]{opacity:.5;cursor:not-allowed}
.spinner{display:inline-block;width:16px;height:16px;border:3px solid rgba(255,255,255,.4);border-top-color:#fff;border-radius:50%;margin-right:8px}
.error-banner{background:#fef2f2;border:1px solid #fca5a5;color:#b91c1c;padding:16px;border-radius:8px}
.empty{text-align:center;color:#6b7280;padding:48px 16px;border:2px dashed #d1d5db;border-radius:8px;background:rgba(255,255,255,.6)}
.tabloid-wrap{position:relative}
.download{position:absolute;top:16px;right:16px;z-index:10;color:#dc2626;background:rgba(255,255,255,.8);border:0;border-radius:999px;padding:8px 16px;font-weight:600}
.tabloid{background:#fffbeb;padding:24px;border:4px dashed #fecaca;border-radius:8px}
.masthead{text-align:center;margin-bottom:32px;padding-bottom:16px;border-bottom:4px double #f87171}
.masthead h1{font-size:56px;color:#b91c1c;letter-spacing:.1em;margin:0}
.subtitle{font-size:20px;color:#a16207;font-weight:600}
.grid{display:grid;grid-template-columns:repeat(3,1fr);gap:24px}
.span-1{grid-column:span 1}.span-2{grid-column:span 2}.span-3{grid-column:span 3}
.section{background:#fff;padding:16px;border:2px dotted #eab308;border-radius:8px}
.section.primary{border-color:#f87171}
.section h3{color:#be123c;font-size:24px;margin:0 0 12px}
.section .icon{margin-right:8px}
.indent{text-indent:2em;text-align:justify}
.poem{text-align:center;font-style:italic}
.poem .author{text-align:right;font-style:normal;color:#475569}
.ideas{display:flex;justify-content:center;gap:24px}
.idea{max-width:384px;width:100%;margin:0;text-align:center}
.idea svg{width:100%;aspect-ratio:1;color:#dc2626;background:rgba(255,251,235,.5);border:2px solid #fde047;border-radius:8px}
.slogans{list-style:none;display:grid;grid-template-columns:1fr 1fr;gap:8px 24px;padding:0}
.slogans li{font-weight:700;color:#dc2626;text-align:center}
.skeleton{background:rgba(255,251,235,.5);padding:24px;border:4px dashed #e5e7eb;border-radius:8px}
.skeleton .section{border-color:#e5e7eb}
.skeleton .block{background:#e5e7eb;border-radius:4px;margin:8px auto}
footer{text-align:center;padding:16px;color:#6b7280;font-size:14px}
"#;

/// Render the whole page for `state`.
pub fn render_page(state: &ViewState) -> String {
    let loading = matches!(state, ViewState::Loading);
    let mut html = String::new();

    let _ = write!(
        html,
        "<!DOCTYPE html><html lang=\"zh-CN\"><head><meta charset=\"utf-8\"><title>{}</title><style>{}</style></head><body>",
        PAGE_TITLE, STYLESHEET
    );
    let _ = write!(
        html,
        "<header><div><span class=\"badge\">我</span><h1>{}</h1></div><span class=\"tag\">AI 赋能创作</span></header>",
        PAGE_TITLE
    );

    html.push_str("<main><div class=\"hero\"><h2>“强国有我”主题阅兵手抄报</h2>");
    html.push_str("<p>只需点击一下，AI即可为你生成一份完整的手抄报内容和设计灵感！</p>");
    if loading {
        let _ = write!(
            html,
            "<button id=\"generate\" disabled><span class=\"spinner\"></span>{}</button>",
            GENERATING_LABEL
        );
    } else {
        let _ = write!(html, "<button id=\"generate\">{}</button>", GENERATE_LABEL);
    }
    html.push_str("</div><div aria-live=\"polite\">");
    html.push_str(&render_view(state));
    html.push_str("</div></main>");

    html.push_str("<footer><p>由 Gemini AI 强力驱动 | 专为青少年爱国主义教育设计</p></footer></body></html>");
    html
}

/// Markup of the single active view.
pub fn render_view(state: &ViewState) -> String {
    match state {
        ViewState::Loading => render_skeleton(),
        ViewState::Error(message) => render_error(message),
        ViewState::Success(result) => render_result(result),
        ViewState::Idle => render_empty(),
    }
}

fn render_error(message: &str) -> String {
    format!(
        "<div class=\"error-banner\" role=\"alert\" data-view=\"error\"><strong>出错了！</strong><p class=\"message\">{}</p></div>",
        escape(message)
    )
}

fn render_empty() -> String {
    format!(
        "<div class=\"empty\" data-view=\"empty\"><h3>{}</h3><p>点击上方的 “一键生成” 按钮，AI 将会为你提供丰富的内容和排版灵感！</p></div>",
        EMPTY_HEADING
    )
}
