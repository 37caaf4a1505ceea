//! Field tag parsing and column binding maps.

use crate::error::MapError;
use crate::mapping::{Record, TypeDescriptor};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

const COLUMN_KEY: &str = "column";

/// Value of `key` in a `key:value;key:value` annotation.
///
/// The value ends at the next `:`, so `column:a:b` yields `a`. Keys without a
/// value (`primary_key`, `column:`) yield `None`.
pub fn find_tag<'a>(tag: &'a str, key: &str) -> Option<&'a str> {
    tag.split(';')
        .filter_map(|part| {
            let mut tokens = part.split(':');
            let k = tokens.next()?;
            let v = tokens.next()?;
            Some((k, v))
        })
        .find(|(k, _)| k.trim() == key)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

/// Lower-cased column name -> field position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindingMap {
    by_column: HashMap<String, usize>,
}

impl BindingMap {
    /// Field position for a result column; the lookup is case-insensitive.
    pub fn get(&self, column: &str) -> Option<usize> {
        self.by_column.get(&column.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.by_column.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_column.is_empty()
    }
}

impl FromIterator<(String, usize)> for BindingMap {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        BindingMap {
            by_column: iter.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect(),
        }
    }
}

/// Build the binding map from each field's `column` tag. Untagged fields are left out.
pub fn bind_columns(descriptor: &TypeDescriptor) -> Result<BindingMap, MapError> {
    let fields = match descriptor {
        TypeDescriptor::Composite { fields, .. } => *fields,
        TypeDescriptor::Scalar { name } => {
            return Err(MapError::NotComposite {
                type_name: (*name).to_string(),
            })
        }
    };
    let mut by_column = HashMap::with_capacity(fields.len());
    for (idx, field) in fields.iter().enumerate() {
        if let Some(column) = find_tag(field.tag, COLUMN_KEY) {
            by_column.insert(column.to_lowercase(), idx);
        }
    }
    Ok(BindingMap { by_column })
}

/// Binding maps built once per destination type and shared read-only afterwards.
#[derive(Debug, Default)]
pub struct BindingCache {
    maps: RwLock<HashMap<TypeId, Arc<BindingMap>>>,
}

impl BindingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_bind<T: Record + 'static>(&self) -> Result<Arc<BindingMap>, MapError> {
        let key = TypeId::of::<T>();
        if let Ok(maps) = self.maps.read() {
            if let Some(found) = maps.get(&key) {
                return Ok(Arc::clone(found));
            }
        }
        let built = Arc::new(bind_columns(&T::descriptor())?);
        match self.maps.write() {
            Ok(mut maps) => Ok(Arc::clone(maps.entry(key).or_insert(built))),
            // A poisoned cache still has a correct answer for this call.
            Err(_) => Ok(built),
        }
    }
}

/// Binding map for `T` from the process-wide cache.
pub fn shared_bindings<T: Record + 'static>() -> Result<Arc<BindingMap>, MapError> {
    static CACHE: OnceLock<BindingCache> = OnceLock::new();
    CACHE.get_or_init(BindingCache::new).get_or_bind::<T>()
}
