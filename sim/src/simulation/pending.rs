use crate::body::{BodyId, DynamicBody};

/// Structural changes collected while iterating and applied in one pass at
/// the end of a substep. Nothing is removed or appended mid-iteration.
#[derive(Debug, Default)]
pub(super) struct PendingChanges {
    pub spawn_bodies: Vec<DynamicBody>,
    pub despawn_bodies: Vec<BodyId>,
}

impl PendingChanges {
    pub fn is_empty(&self) -> bool {
        self.spawn_bodies.is_empty() && self.despawn_bodies.is_empty()
    }
}
