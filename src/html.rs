use scraper::{ElementRef, Selector};
use std::sync::OnceLock;

/// Parse a compile-time selector once and keep it for the process
pub fn static_selector(cell: &'static OnceLock<Selector>, css: &str) -> &'static Selector {
    cell.get_or_init(|| Selector::parse(css).expect("valid static selector"))
}

/// Element text with whitespace runs collapsed and the ends trimmed
pub fn normalized_text(element: ElementRef) -> String {
    let mut cleaned = String::new();
    let mut prev_was_space = false;
    for c in element.text().flat_map(|s| s.chars()) {
        if c.is_whitespace() {
            if !prev_was_space && !cleaned.is_empty() {
                cleaned.push(' ');
                prev_was_space = true;
            }
        } else {
            cleaned.push(c);
            prev_was_space = false;
        }
    }
    if cleaned.ends_with(' ') {
        cleaned.pop();
    }
    cleaned
}
