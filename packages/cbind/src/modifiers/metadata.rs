//! Tags declarations the JSON emitter should omit, independent of whether they stay
//! in the C header — a `#define` can be real, working C and still not be worth
//! surfacing to a metadata consumer (internal implementation constants, for example).

use crate::dom::{Dom, NodeKind};
use indexmap::IndexSet;

pub fn exclude_defines_from_metadata(dom: &mut Dom, names: &IndexSet<String>) {
    for id in dom.collect_preorder(dom.root()) {
        if let NodeKind::Define { name, excluded_from_metadata, .. } = &mut dom.get_mut(id).kind {
            if names.contains(name.as_str()) {
                *excluded_from_metadata = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header_file;

    #[test]
    fn excludes_the_named_defines() {
        let (mut dom, root) = parse_header_file("#define A 1\n#define B 2\n", "t.h").unwrap();
        let mut names = IndexSet::new();
        names.insert("A".to_string());
        exclude_defines_from_metadata(&mut dom, &names);
        let children = dom.get(root).children().to_vec();
        match &dom.get(children[0]).kind {
            NodeKind::Define { excluded_from_metadata, .. } => assert!(excluded_from_metadata),
            other => panic!("unexpected {other:?}"),
        }
        match &dom.get(children[1]).kind {
            NodeKind::Define { excluded_from_metadata, .. } => assert!(!excluded_from_metadata),
            other => panic!("unexpected {other:?}"),
        }
    }
}
