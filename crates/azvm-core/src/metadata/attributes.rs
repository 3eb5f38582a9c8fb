use std::collections::BTreeMap;

use serde::Serialize;

/// Constant attribute always present in an extracted set.
pub const SERVICE_NAME: &str = "azure.vm.service_name";
pub const LOCATION: &str = "azure.vm.location";
pub const SIZE: &str = "azure.vm.size";
pub const OS: &str = "azure.vm.os";
pub const PRIORITY: &str = "azure.vm.priority";

/// Value of [`SERVICE_NAME`], independent of the payload.
pub const SERVICE_NAME_VALUE: &str = "Virtual Machines";

/// Flat VM attribute set, serialized as a JSON object of string values.
///
/// Immutable once built; a refresh produces a new set rather than editing
/// the cached one. Absent attributes have no key at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributeSet {
    attrs: BTreeMap<&'static str, String>,
}

impl AttributeSet {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Iterate in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.attrs.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl FromIterator<(&'static str, String)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (&'static str, String)>>(iter: I) -> Self {
        Self {
            attrs: iter.into_iter().collect(),
        }
    }
}
