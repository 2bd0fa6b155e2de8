use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static LI_OPEN_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<li>\s+").unwrap());
static LI_CLOSE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+</li>").unwrap());

/// Put HTML into the shape used for expected/actual comparison: LF line
/// endings, no surrounding whitespace, no whitespace just inside `<li>` and
/// `</li>`, NFKD.
pub fn normalize_html(html: &str) -> String {
    let html = html.replace("\r\n", "\n").replace('\r', "\n");
    let html = LI_OPEN_WS.replace_all(html.trim(), "<li>");
    let html = LI_CLOSE_WS.replace_all(&html, "</li>");
    html.nfkd().collect()
}
