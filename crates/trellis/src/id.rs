use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for a widget stored in a window's arena.
    pub struct NodeId;
}
