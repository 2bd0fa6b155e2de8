use std::collections::HashSet;

use sectional::{BlockId, BlockKind, Document};

/// Give every heading without an explicit id one derived from its text.
///
/// Explicit ids are kept and reserved first, so generated ids never collide
/// with them. Repeats get `-1`, `-2`, ... in document order.
pub fn assign_heading_ids(document: &mut Document) {
    let mut used: HashSet<String> = HashSet::new();
    let mut pending: Vec<(BlockId, String)> = Vec::new();

    for (id, block) in document.blocks() {
        if let BlockKind::Heading { title, id: heading_id, .. } = &block.kind {
            match heading_id {
                Some(explicit) => {
                    used.insert(explicit.clone());
                }
                None => pending.push((id, slugify(title))),
            }
        }
    }

    for (id, base) in pending {
        let unique = unique_id(&base, &mut used);
        document[id].set_heading_id(unique);
    }
}

/// Lower-case, alphanumerics kept, runs of whitespace/`-`/`_` become one `-`,
/// everything else dropped.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("section");
    }
    slug
}

fn unique_id(base: &str, used: &mut HashSet<String>) -> String {
    let mut candidate = base.to_string();
    let mut n = 0;
    while used.contains(&candidate) {
        n += 1;
        candidate = format!("{}-{}", base, n);
    }
    used.insert(candidate.clone());
    candidate
}
