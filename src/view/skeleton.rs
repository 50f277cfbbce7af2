//! Loading placeholder shaped like the result grid.

use std::fmt::Write;

/// Column span of each grid slot and the widths (in percent) of its
/// placeholder lines.
const SLOTS: [(u32, &[u32]); 6] = [
    (2, &[33, 100, 100, 83, 100]),
    (1, &[50, 100, 92]),
    (2, &[33, 75, 75, 50]),
    (1, &[50, 100, 83]),
    (3, &[25, 100]),
    (3, &[25, 75, 75]),
];

pub fn render_skeleton() -> String {
    let mut html = String::from(
        "<div class=\"skeleton\" data-view=\"loading\" aria-busy=\"true\">\
         <div class=\"masthead\"><div class=\"block\" style=\"height:48px;width:75%\"></div>\
         <div class=\"block\" style=\"height:24px;width:50%\"></div></div><div class=\"grid\">",
    );
    for (span, lines) in SLOTS {
        let _ = write!(html, "<div class=\"section span-{}\">", span);
        for (i, width) in lines.iter().enumerate() {
            // first line stands in for the section heading
            let height = if i == 0 { 32 } else { 16 };
            let _ = write!(html, "<div class=\"block\" style=\"height:{}px;width:{}%\"></div>", height, width);
        }
        html.push_str("</div>");
    }
    html.push_str("</div></div>");
    html
}
