use sectional::parser::Parser;
use sectional::{BlockKind, Document, Options};

fn parse(source: &str) -> Document {
    Parser::new(source, Options::empty()).parse()
}

fn headings(doc: &Document) -> Vec<(u8, String)> {
    doc.root
        .iter()
        .filter_map(|&id| match &doc[id].kind {
            BlockKind::Heading { level, title, .. } => Some((*level, title.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn empty_source_has_no_blocks() {
    let doc = parse("");
    assert!(doc.is_empty());
    assert!(doc.root.is_empty());
}

#[test]
fn one_root_block_per_top_level_construct() {
    let doc = parse("# Title\n\nFirst paragraph.\n\n- a\n- b\n\n---\n\n```rust\nfn main() {}\n```\n");
    assert_eq!(doc.root.len(), 5);
    assert_eq!(doc.len(), 5);
    let labels: Vec<String> = doc.root.iter().map(|&id| doc[id].label()).collect();
    assert_eq!(
        labels,
        vec!["# Title", "paragraph", "list", "rule", "code block"]
    );
}

#[test]
fn parsed_blocks_are_flat() {
    let doc = parse("# a\n## b\ntext\n### c\n");
    assert!(doc.root.iter().all(|&id| doc[id].children.is_empty()));
    assert_eq!(doc.section_count(), 0);
}

#[test]
fn atx_and_setext_headings_carry_levels() {
    let doc = parse("# One\n\nTwo\n===\n\nThree\n---\n\n###### Six\n");
    assert_eq!(
        headings(&doc),
        vec![
            (1, "One".to_string()),
            (1, "Two".to_string()),
            (2, "Three".to_string()),
            (6, "Six".to_string()),
        ]
    );
}

#[test]
fn heading_title_is_whitespace_normalized_plain_text() {
    let doc = parse("##   Hello   *big*   `world`  \n");
    assert_eq!(headings(&doc), vec![(2, "Hello big world".to_string())]);
}

#[test]
fn explicit_heading_id_requires_attribute_option() {
    let plain = parse("## Intro {#start}\n");
    let BlockKind::Heading { id, .. } = &plain[plain.root[0]].kind else {
        panic!("expected heading");
    };
    assert_eq!(*id, None);

    let doc = Parser::new("## Intro {#start}\n", Options::ENABLE_HEADING_ATTRIBUTES).parse();
    let BlockKind::Heading { id, title, .. } = &doc[doc.root[0]].kind else {
        panic!("expected heading");
    };
    assert_eq!(id.as_deref(), Some("start"));
    assert_eq!(title, "Intro");
}

#[test]
fn headings_inside_containers_stay_inside_their_leaf() {
    let doc = parse("> # quoted\n> text\n\n# real\n");
    assert_eq!(doc.root.len(), 2);
    assert!(matches!(doc[doc.root[0]].kind, BlockKind::Leaf));
    assert_eq!(headings(&doc), vec![(1, "real".to_string())]);
}

#[test]
fn spans_cover_block_source() {
    let source = "# a\n\nsome text\n";
    let doc = parse(source);
    let para = &doc[doc.root[1]];
    assert_eq!(source[para.span.clone()].trim_end(), "some text");
}

#[test]
fn set_heading_id_updates_start_event() {
    let mut doc = parse("## Intro\n");
    let id = doc.root[0];
    doc[id].set_heading_id("intro".to_string());
    let BlockKind::Heading { id: heading_id, .. } = &doc[id].kind else {
        panic!("expected heading");
    };
    assert_eq!(heading_id.as_deref(), Some("intro"));

    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, doc[id].events.iter().cloned());
    assert_eq!(html, "<h2 id=\"intro\">Intro</h2>\n");
}

#[test]
fn outline_lists_blocks_with_indentation() {
    let doc = parse("# Title\n\nbody\n");
    assert_eq!(doc.to_string(), "# Title\nparagraph\n");
}
