//! Type descriptors for destination records.
//!
//! There is no runtime reflection, so each destination type describes its
//! fields once through [`Record`]. The `record!` macro generates that impl from
//! a field list with per-field tags, close to what a reflective mapper reads
//! from struct tags.

use crate::mapping::ScanTarget;

/// One declared field: its Rust name and its raw annotation (`key:value;key:value`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub tag: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// Struct-like type with positional fields.
    Composite {
        name: &'static str,
        fields: &'static [FieldDescriptor],
    },
    /// Anything that cannot be bound column-by-column.
    Scalar { name: &'static str },
}

impl TypeDescriptor {
    pub fn scalar<T: ?Sized>() -> Self {
        TypeDescriptor::Scalar {
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TypeDescriptor::Composite { name, .. } | TypeDescriptor::Scalar { name } => *name,
        }
    }
}

/// A destination the row scanner can populate.
pub trait Record: Default + Send {
    fn descriptor() -> TypeDescriptor;

    /// Mutable targets for every field, in descriptor order.
    fn scan_targets(&mut self) -> Vec<&mut dyn ScanTarget>;
}

/// Implements [`Record`] for an existing struct.
///
/// ```ignore
/// record! {
///     impl Client {
///         id: "column:id;primary_key",
///         name: "column:name",
///         cached: "",
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (
        impl $ty:ty {
            $( $field:ident : $tag:literal ),* $(,)?
        }
    ) => {
        impl $crate::mapping::Record for $ty {
            fn descriptor() -> $crate::mapping::TypeDescriptor {
                const FIELDS: &[$crate::mapping::FieldDescriptor] = &[
                    $(
                        $crate::mapping::FieldDescriptor {
                            name: stringify!($field),
                            tag: $tag,
                        },
                    )*
                ];
                $crate::mapping::TypeDescriptor::Composite {
                    name: stringify!($ty),
                    fields: FIELDS,
                }
            }

            fn scan_targets(&mut self) -> Vec<&mut dyn $crate::mapping::ScanTarget> {
                vec![$( &mut self.$field as &mut dyn $crate::mapping::ScanTarget ),*]
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::SqlValue;

    #[derive(Default)]
    struct Pair {
        left: String,
        right: i64,
    }

    crate::record! {
        impl Pair {
            left: "column:l",
            right: "",
        }
    }

    #[test]
    fn macro_describes_fields_in_order() {
        let TypeDescriptor::Composite { name, fields } = Pair::descriptor() else {
            panic!("expected composite");
        };
        assert_eq!(name, "Pair");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0], FieldDescriptor { name: "left", tag: "column:l" });
        assert_eq!(fields[1].tag, "");
    }

    #[test]
    fn targets_write_through_to_fields() {
        let mut p = Pair::default();
        {
            let mut targets = p.scan_targets();
            targets[0].assign(SqlValue::Text("a".into())).unwrap();
            targets[1].assign(SqlValue::Int(9)).unwrap();
        }
        assert_eq!(p.left, "a");
        assert_eq!(p.right, 9);
    }

    #[test]
    fn scalar_descriptor_carries_type_name() {
        assert_eq!(TypeDescriptor::scalar::<i64>().name(), "i64");
    }
}
