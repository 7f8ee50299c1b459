//! Table storage for the memory persister.

use entipersist_core::{Entity, Matcher, Value};

/// One stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MemoryItem {
    pub(crate) id: Value,
    pub(crate) value: Entity,
}

impl MemoryItem {
    pub(crate) fn new(id: Value, value: Entity) -> Self {
        Self { id, value }
    }
}

/// Records of one table in insertion order.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryTable {
    pub(crate) items: Vec<MemoryItem>,
}

impl MemoryTable {
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn find_by_id(&self, id: &Value) -> Option<&MemoryItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub(crate) fn find_by_id_mut(&mut self, id: &Value) -> Option<&mut MemoryItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    /// Returns matching records, or every record without a matcher.
    pub(crate) fn matching<'a>(
        &'a self,
        matcher: Option<&'a Matcher>,
    ) -> impl Iterator<Item = &'a MemoryItem> + 'a {
        self.items
            .iter()
            .filter(move |item| matcher.map_or(true, |m| m(&item.value)))
    }

    /// Removes matching records and returns their ids in storage order.
    pub(crate) fn remove_matching(&mut self, matcher: &Matcher) -> Vec<Value> {
        let mut removed = Vec::new();
        self.items.retain(|item| {
            let matched = matcher(&item.value);
            if matched {
                removed.push(item.id.clone());
            }
            !matched
        });
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entipersist_core::{build_matcher_from_where, Where};

    fn table() -> MemoryTable {
        let mut table = MemoryTable::default();
        for (id, city) in [(1, "Oulu"), (2, "Turku"), (3, "Oulu")] {
            table.items.push(MemoryItem::new(
                Value::Integer(id),
                Entity::new("users").with("id", id).with("city", city),
            ));
        }
        table
    }

    #[test]
    fn lookup_by_id() {
        let table = table();
        assert!(table.find_by_id(&Value::Integer(2)).is_some());
        assert!(table.find_by_id(&Value::from("2")).is_none());
    }

    #[test]
    fn matching_keeps_order() {
        let table = table();
        let matcher = build_matcher_from_where(&Where::property_equals("city", "Oulu"));
        let ids: Vec<_> = table.matching(Some(&matcher)).map(|i| i.id.clone()).collect();
        assert_eq!(ids, [Value::Integer(1), Value::Integer(3)]);
        assert_eq!(table.matching(None).count(), 3);
    }

    #[test]
    fn remove_matching_returns_removed_ids() {
        let mut table = table();
        let matcher = build_matcher_from_where(&Where::property_equals("city", "Oulu"));
        assert_eq!(
            table.remove_matching(&matcher),
            [Value::Integer(1), Value::Integer(3)]
        );
        assert_eq!(table.len(), 1);
    }
}
