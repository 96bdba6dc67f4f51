mod node_id;
mod node_kind;
mod types;

pub use node_id::NodeId;
pub use node_kind::{Accessibility, ClassKind, EnumValue, MemberFunctionKind, NodeKind};
pub use types::{FunctionPointerSignature, PointerKind, Qualifier, Type};

use crate::position::Position;
use thiserror::Error;

/// Attributes every node kind carries regardless of its shape: the active
/// preprocessor conditional stack, attached comments, and (for the handful of kinds
/// that need it) a destination filename or an immutable pre-modifier snapshot.
#[derive(Debug, Clone, Default)]
pub struct NodeCommon {
    pub leading_comments: Vec<String>,
    pub trailing_comments: Vec<String>,
    /// Innermost last, mirroring the order `PreprocessorConditional` ancestors are
    /// encountered walking from the root.
    pub conditional_context: Vec<ConditionalFrame>,
    /// Set only on `HeaderFileSet`/`HeaderFile` nodes.
    pub dest_filename: Option<String>,
    /// Captured once, immediately after parsing, so the JSON emitter can report a
    /// declaration's pre-transformation identifier even after renaming modifiers have
    /// run. `None` for nodes created by a modifier rather than the parser (generated
    /// wrappers report their own name as both original and current).
    pub unmodified_name: Option<String>,
    /// Where this declaration started in its source file, stamped once by
    /// [`parser::parse_scope`](crate::parser) right after parsing and left alone by
    /// every modifier afterward (a generated wrapper inherits the position of the
    /// declaration it was cloned from). `None` for nodes a modifier injects outright
    /// (manual functions, `extern "C"` guards) with no source position of their own.
    pub source_position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalFrame {
    pub expression: String,
    pub negated: bool,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub common: NodeCommon,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self { kind, common: NodeCommon::default(), parent: None, children: Vec::new() }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

fn node_display_name(kind: &NodeKind) -> Option<String> {
    match kind {
        NodeKind::Namespace { name } => Some(name.clone()),
        NodeKind::ClassStructUnion { name, is_anonymous: false, .. } if !name.is_empty() => Some(name.clone()),
        NodeKind::EnumElement { name, .. } if !name.is_empty() => Some(name.clone()),
        NodeKind::EnumEntry { name, .. } => Some(name.clone()),
        NodeKind::FunctionDeclaration { name, .. } => Some(name.clone()),
        NodeKind::FunctionParameter { name, .. } if !name.is_empty() => Some(name.clone()),
        NodeKind::Typedef { name, .. } => Some(name.clone()),
        _ => None,
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("node {0:?} lists child {1:?} but that child's parent pointer disagrees")]
    ParentMismatch(NodeId, NodeId),
    #[error("node {0:?} appears more than once in its parent's children list")]
    DuplicateChild(NodeId),
    #[error("node {0:?} has no parent but is not the root")]
    MissingParent(NodeId),
}

/// An arena of DOM nodes. Nodes reference each other only by [`NodeId`]; there is no
/// owning `Rc`/`RefCell` cycle to manage. All structural mutation goes through the
/// methods here so the parent back-pointer and sibling order can never drift apart.
#[derive(Debug, Clone, Default)]
pub struct Dom {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the single root node for this arena. Panics if a root already exists;
    /// callers build exactly one DOM per conversion.
    pub fn set_root(&mut self, kind: NodeKind) -> NodeId {
        assert!(self.root.is_none(), "Dom::set_root called twice");
        let id = self.alloc(kind);
        self.root = Some(id);
        id
    }

    pub fn root(&self) -> NodeId {
        self.root.expect("Dom::root called before set_root")
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind));
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Creates a new node of `kind` and appends it as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.alloc(kind);
        self.nodes[id.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Creates a new node of `kind` and inserts it as a child of `parent` at `index`,
    /// shifting later siblings right.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, kind: NodeKind) -> NodeId {
        let id = self.alloc(kind);
        self.nodes[id.index()].parent = Some(parent);
        self.nodes[parent.index()].children.insert(index, id);
        id
    }

    /// Removes `child` from its parent's children list. The node itself stays in the
    /// arena (unreachable from the root) rather than being physically deleted, since
    /// other code may still hold its `NodeId` momentarily during a rewrite.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.index()].children.retain(|&c| c != child);
        self.nodes[child.index()].parent = None;
    }

    /// Replaces `old` with `new` in `parent`'s children list at the same position.
    /// `new` must already be a (possibly newly allocated) node not currently a child
    /// of `parent`.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        if let Some(slot) = self.nodes[parent.index()].children.iter_mut().find(|c| **c == old) {
            *slot = new;
        }
        self.nodes[old.index()].parent = None;
        self.nodes[new.index()].parent = Some(parent);
    }

    /// Moves `child` (already part of the tree, with any parent) to become a child of
    /// `new_parent` at `index`. Used by modifiers that promote a node's children into
    /// an ancestor scope at a specific position (conditional flattening) rather than
    /// appended at the end, which [`adopt_children`](Dom::adopt_children) assumes.
    pub fn reparent_at(&mut self, new_parent: NodeId, index: usize, child: NodeId) {
        if let Some(old_parent) = self.nodes[child.index()].parent {
            self.nodes[old_parent.index()].children.retain(|&c| c != child);
        }
        self.nodes[child.index()].parent = Some(new_parent);
        let index = index.min(self.nodes[new_parent.index()].children.len());
        self.nodes[new_parent.index()].children.insert(index, child);
    }

    /// Moves all of `from`'s children to become children of `to`, appended after any
    /// existing children, reparenting each one. Used by namespace/conditional/nested
    /// class flattening to promote a scope's contents into its enclosing scope.
    pub fn adopt_children(&mut self, to: NodeId, from: NodeId) {
        let moved = std::mem::take(&mut self.nodes[from.index()].children);
        for &child in &moved {
            self.nodes[child.index()].parent = Some(to);
        }
        self.nodes[to.index()].children.extend(moved);
    }

    /// Pre-order traversal starting at `start`, calling `visit` with each node id
    /// (including `start` itself) before descending into its children.
    pub fn visit(&self, start: NodeId, mut visit: impl FnMut(&Dom, NodeId)) {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            visit(self, id);
            let children = self.get(id).children();
            stack.extend(children.iter().rev());
        }
    }

    /// Pre-order traversal collecting every node id reachable from `start`, for
    /// callers that need to mutate the dom while iterating (where a closure holding
    /// `&mut self` concurrently with `&self` would not borrow-check).
    pub fn collect_preorder(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            out.push(id);
            let children = self.get(id).children();
            stack.extend(children.iter().rev());
        }
        out
    }

    /// Copies `other_root` (and every descendant, in order, from a different `Dom`)
    /// into `self` as a new child of `parent`, returning the copy's id in `self`'s
    /// arena. Used by the driver to graft a standalone `HeaderFile` tree (as produced
    /// by [`parser::parse_header_file`](crate::parser::parse_header_file), which
    /// builds its own single-root arena) onto the shared `HeaderFileSet` every
    /// conversion accumulates its headers under.
    pub fn graft(&mut self, parent: NodeId, other: &Dom, other_root: NodeId) -> NodeId {
        let kind = other.get(other_root).kind.clone();
        let common = other.get(other_root).common.clone();
        let new_id = self.append_child(parent, kind);
        self.get_mut(new_id).common = common;
        for &child in other.get(other_root).children() {
            self.graft(new_id, other, child);
        }
        new_id
    }

    /// Captures each named node's current identifier into `common.unmodified_name`,
    /// once, right after parsing and before any renaming modifier runs. The JSON
    /// emitter reads this back so metadata can report a declaration's
    /// pre-transformation name alongside whatever flattening/disambiguation renamed
    /// it to.
    pub fn save_unmodified_clones(&mut self) {
        let root = self.root();
        for id in self.collect_preorder(root) {
            if let Some(name) = node_display_name(&self.get(id).kind) {
                self.get_mut(id).common.unmodified_name = Some(name);
            }
        }
    }

    /// Checks the invariant from the data model: every non-root node has a parent,
    /// and appears exactly once in that parent's children list.
    pub fn validate_hierarchy(&self) -> Result<(), DomError> {
        let root = self.root();
        for id in self.collect_preorder(root) {
            let node = self.get(id);
            if id != root && node.parent().is_none() {
                return Err(DomError::MissingParent(id));
            }
            let mut seen_once = std::collections::HashSet::new();
            for &child in node.children() {
                if self.get(child).parent() != Some(id) {
                    return Err(DomError::ParentMismatch(id, child));
                }
                if !seen_once.insert(child) {
                    return Err(DomError::DuplicateChild(child));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dom() -> (Dom, NodeId, NodeId) {
        let mut dom = Dom::new();
        let root = dom.set_root(NodeKind::HeaderFileSet);
        let file = dom.append_child(root, NodeKind::HeaderFile { original_file_name: "imgui.h".into() });
        (dom, root, file)
    }

    #[test]
    fn append_child_sets_parent_back_pointer() {
        let (dom, root, file) = sample_dom();
        assert_eq!(dom.get(file).parent(), Some(root));
        assert_eq!(dom.get(root).children(), &[file]);
    }

    #[test]
    fn validate_hierarchy_accepts_a_well_formed_tree() {
        let (dom, _, _) = sample_dom();
        assert!(dom.validate_hierarchy().is_ok());
    }

    #[test]
    fn remove_child_clears_the_parent_pointer() {
        let (mut dom, root, file) = sample_dom();
        dom.remove_child(root, file);
        assert_eq!(dom.get(root).children(), &[] as &[NodeId]);
        assert_eq!(dom.get(file).parent(), None);
    }

    #[test]
    fn adopt_children_reparents_every_moved_node() {
        let mut dom = Dom::new();
        let root = dom.set_root(NodeKind::HeaderFileSet);
        let ns = dom.append_child(root, NodeKind::Namespace { name: "Foo".into() });
        let func = dom.append_child(
            ns,
            NodeKind::FunctionDeclaration {
                return_type: Type::named("void"),
                name: "Bar".into(),
                is_member: false,
                member_kind: None,
                is_operator: false,
                is_constexpr: false,
                is_variadic: false,
                owning_class: None,
                original_name: "Bar".into(),
                accessibility: Accessibility::Public,
                is_internal: false,
                is_manual: false,
                is_default_helper: false,
            },
        );
        dom.adopt_children(root, ns);
        assert_eq!(dom.get(func).parent(), Some(root));
        assert!(dom.validate_hierarchy().is_ok());
    }

    #[test]
    fn graft_copies_a_standalone_tree_into_another_arena() {
        let mut source = Dom::new();
        let source_root = source.set_root(NodeKind::HeaderFile { original_file_name: "t.h".into() });
        source.append_child(source_root, NodeKind::Pragma { text: "once".into() });

        let mut target = Dom::new();
        let set_root = target.set_root(NodeKind::HeaderFileSet);
        let grafted = target.graft(set_root, &source, source_root);

        assert_eq!(target.get(grafted).parent(), Some(set_root));
        assert_eq!(target.get(grafted).children().len(), 1);
        assert!(target.validate_hierarchy().is_ok());
    }

    #[test]
    fn validate_hierarchy_catches_a_dangling_parent_pointer() {
        let (mut dom, root, file) = sample_dom();
        // Manually corrupt the tree by appending the same id twice, bypassing the
        // normal mutation primitives, to confirm validation notices.
        dom.get_mut(root).children.push(file);
        assert_eq!(dom.validate_hierarchy(), Err(DomError::DuplicateChild(file)));
    }
}
