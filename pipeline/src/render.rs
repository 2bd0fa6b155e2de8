use pulldown_cmark::{CowStr, Event, html};
use sectional::{BlockId, BlockKind, Document};

const SECTION_OPEN: &str = "<section>\n";
const SECTION_CLOSE: &str = "</section>\n";

/// Render a document tree to HTML.
///
/// Headings and leaf blocks emit their native markup through pulldown-cmark's
/// HTML writer. Each section wraps its children in `<section>` tags, so its
/// opening tag lands right after the owning heading and its closing tag after
/// the last descendant. The whole tree goes through a single writer, which
/// keeps footnote numbering consistent across sections.
pub fn render_html(document: &Document) -> String {
    let mut events: Vec<Event<'static>> = Vec::new();
    let mut open_levels: Vec<u8> = Vec::new();
    for &id in &document.root {
        collect_events(document, id, &mut events, &mut open_levels);
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());
    html_output
}

fn collect_events(
    document: &Document,
    id: BlockId,
    out: &mut Vec<Event<'static>>,
    open_levels: &mut Vec<u8>,
) {
    let block = &document[id];
    match block.kind {
        BlockKind::Section { level } => {
            // Innermost to outermost, open levels are strictly decreasing.
            debug_assert!(open_levels.last().is_none_or(|&outer| outer < level));
            open_levels.push(level);

            out.push(Event::Html(CowStr::Borrowed(SECTION_OPEN)));
            for &child in &block.children {
                collect_events(document, child, out, open_levels);
            }
            out.push(Event::Html(CowStr::Borrowed(SECTION_CLOSE)));

            open_levels.pop();
        }
        BlockKind::Heading { .. } | BlockKind::Leaf => {
            out.extend(block.events.iter().cloned());
        }
    }
}
