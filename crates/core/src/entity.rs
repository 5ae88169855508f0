//! Entities: records whose identity outlives changes to their attributes.

/// A record compared by identifier, not by value.
///
/// A product whose carbon impact is re-measured is still the same product;
/// an order that moves from PENDING to DELIVERED is still the same order.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Whether `other` is the same record, regardless of its current attributes.
    fn same_identity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
