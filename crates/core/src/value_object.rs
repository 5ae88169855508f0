//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two instances with the same attribute
/// values are interchangeable. `CarbonImpact`, `Category` and `EcoRating` are
/// value objects; `Product` and `Order` are entities.
///
/// Value objects are immutable. To "modify" one, build a new one.
///
/// ```ignore
/// let a = CarbonImpact::new(1.5);
/// let b = CarbonImpact::new(1.5);
/// assert_eq!(a, b); // equal by value
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
