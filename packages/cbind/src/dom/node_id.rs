/// A stable index into a [`Dom`](super::Dom)'s node arena. Cheap to copy and pass
/// around instead of a borrowed reference, which sidesteps the aliasing problems a
/// genuinely cyclic parent/child tree would otherwise cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(super) usize);

impl NodeId {
    /// The arena index this id refers to. Only meaningful paired with the `Dom` that
    /// produced it.
    pub fn index(self) -> usize {
        self.0
    }
}
