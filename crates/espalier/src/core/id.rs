use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for an element stored in the tree arena.
    pub struct NodeId;
}

new_key_type! {
    /// Opaque identifier for a binding owned by the tree.
    pub struct BindingId;
}

impl NodeId {
    /// Stable 64-bit form of the key, usable as a delegate subscription key.
    pub(crate) fn as_u64(self) -> u64 {
        slotmap::Key::data(&self).as_ffi()
    }
}

impl BindingId {
    /// Stable 64-bit form of the key, usable as a delegate subscription key.
    pub(crate) fn as_u64(self) -> u64 {
        slotmap::Key::data(&self).as_ffi()
    }
}
