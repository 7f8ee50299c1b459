//! Condition tree (`Where`) for queries.

use crate::value::Value;
use std::fmt;

/// Predicate applied to a single property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    /// Property equals the operand.
    Equals(Value),
    /// Property is strictly less than the operand.
    Before(Value),
    /// Property is strictly greater than the operand.
    After(Value),
    /// Property is within `start..=end`.
    Between(Value, Value),
    /// Property equals one of the operands.
    In(Vec<Value>),
    /// Property is absent or null.
    IsNull,
    /// Property is present and not null.
    IsNotNull,
}

impl Predicate {
    /// Returns the predicate kind name.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Predicate::Equals(_) => "equals",
            Predicate::Before(_) => "before",
            Predicate::After(_) => "after",
            Predicate::Between(..) => "between",
            Predicate::In(_) => "in",
            Predicate::IsNull => "is-null",
            Predicate::IsNotNull => "is-not-null",
        }
    }
}

/// A predicate bound to a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    /// Property name on the entity.
    pub property_name: String,
    /// Predicate applied to the property value.
    pub predicate: Predicate,
}

/// Boolean condition tree over entity properties.
///
/// Leaves are [`Condition`]s; `And`/`Or` nodes hold their children in
/// declaration order. Order never changes which entities match but does
/// decide the order of generated query fragments.
///
/// # Example
///
/// ```rust
/// use entipersist_core::Where;
///
/// let adults_in_two_cities = Where::and([
///     Where::property_after("age", 17),
///     Where::or([
///         Where::property_equals("city", "Helsinki"),
///         Where::property_equals("city", "Oulu"),
///     ]),
/// ]);
///
/// assert_eq!(adults_in_two_cities.condition_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Where {
    /// Single property predicate.
    Condition(Condition),
    /// All children must match.
    And(Vec<Where>),
    /// Any child must match.
    Or(Vec<Where>),
}

impl Where {
    fn condition(property_name: impl Into<String>, predicate: Predicate) -> Self {
        Where::Condition(Condition {
            property_name: property_name.into(),
            predicate,
        })
    }

    /// Property equals `value`.
    pub fn property_equals(property_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::condition(property_name, Predicate::Equals(value.into()))
    }

    /// Property is before (less than) `value`.
    pub fn property_before(property_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::condition(property_name, Predicate::Before(value.into()))
    }

    /// Property is after (greater than) `value`.
    pub fn property_after(property_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::condition(property_name, Predicate::After(value.into()))
    }

    /// Property is between `start` and `end`, both inclusive.
    pub fn property_between(
        property_name: impl Into<String>,
        start: impl Into<Value>,
        end: impl Into<Value>,
    ) -> Self {
        Self::condition(property_name, Predicate::Between(start.into(), end.into()))
    }

    /// Property equals one of `values`.
    pub fn property_in<I, V>(property_name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::condition(
            property_name,
            Predicate::In(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Property is absent or null.
    pub fn property_is_null(property_name: impl Into<String>) -> Self {
        Self::condition(property_name, Predicate::IsNull)
    }

    /// Property is present and not null.
    pub fn property_is_not_null(property_name: impl Into<String>) -> Self {
        Self::condition(property_name, Predicate::IsNotNull)
    }

    /// All of `conditions` must match.
    pub fn and(conditions: impl IntoIterator<Item = Where>) -> Self {
        Where::And(conditions.into_iter().collect())
    }

    /// Any of `conditions` must match.
    pub fn or(conditions: impl IntoIterator<Item = Where>) -> Self {
        Where::Or(conditions.into_iter().collect())
    }

    /// Counts leaf conditions in the tree.
    pub fn condition_count(&self) -> usize {
        match self {
            Where::Condition(_) => 1,
            Where::And(children) | Where::Or(children) => {
                children.iter().map(Where::condition_count).sum()
            }
        }
    }

    /// Visits every leaf condition in declaration order.
    pub fn for_each_condition<'a>(&'a self, f: &mut impl FnMut(&'a Condition)) {
        match self {
            Where::Condition(condition) => f(condition),
            Where::And(children) | Where::Or(children) => {
                for child in children {
                    child.for_each_condition(f);
                }
            }
        }
    }
}

impl fmt::Display for Where {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Where::Condition(Condition {
                property_name,
                predicate,
            }) => match predicate {
                Predicate::Equals(v) => write!(f, "{property_name} = {v}"),
                Predicate::Before(v) => write!(f, "{property_name} < {v}"),
                Predicate::After(v) => write!(f, "{property_name} > {v}"),
                Predicate::Between(a, b) => write!(f, "{property_name} between {a} and {b}"),
                Predicate::In(values) => {
                    write!(f, "{property_name} in {}", Value::Array(values.clone()))
                }
                Predicate::IsNull => write!(f, "{property_name} is null"),
                Predicate::IsNotNull => write!(f, "{property_name} is not null"),
            },
            Where::And(children) => write_group(f, children, " and "),
            Where::Or(children) => write_group(f, children, " or "),
        }
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, children: &[Where], separator: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{child}")?;
    }
    f.write_str(")")
}
