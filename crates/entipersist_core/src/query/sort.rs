//! Result ordering.

use crate::entity::Entity;
use crate::value::Value;
use std::cmp::Ordering;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

/// One property in a sort specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortOrder {
    /// Property to compare.
    pub property_name: String,
    /// Direction of the comparison.
    pub direction: SortDirection,
}

/// Ordered list of `(property, direction)` pairs.
///
/// Properties are compared in order; later ones only break ties of
/// earlier ones. Missing properties compare as null, which sorts first
/// ascending. Apply the comparator with a stable sort so entities that
/// compare equal keep their storage order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sort {
    orders: Vec<SortOrder>,
}

impl Sort {
    /// Sorts ascending by a property.
    pub fn by(property_name: impl Into<String>) -> Self {
        Self::by_direction(property_name, SortDirection::Asc)
    }

    /// Sorts by a property in the given direction.
    pub fn by_direction(property_name: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            orders: vec![SortOrder {
                property_name: property_name.into(),
                direction,
            }],
        }
    }

    /// Adds a tie-breaking property.
    #[must_use]
    pub fn then_by(mut self, property_name: impl Into<String>, direction: SortDirection) -> Self {
        self.orders.push(SortOrder {
            property_name: property_name.into(),
            direction,
        });
        self
    }

    /// Returns the sort orders.
    pub fn orders(&self) -> &[SortOrder] {
        &self.orders
    }

    /// Returns a comparator over entities.
    pub fn sort_function(&self) -> impl Fn(&Entity, &Entity) -> Ordering + '_ {
        move |a, b| {
            for order in &self.orders {
                let av = a.get(&order.property_name).unwrap_or(&Value::Null);
                let bv = b.get(&order.property_name).unwrap_or(&Value::Null);
                let ord = match order.direction {
                    SortDirection::Asc => av.cmp_total(bv),
                    SortDirection::Desc => bv.cmp_total(av),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        }
    }

    /// Sorts entities in place, keeping the relative order of ties.
    pub fn sort_entities(&self, entities: &mut [Entity]) {
        entities.sort_by(self.sort_function());
    }
}
