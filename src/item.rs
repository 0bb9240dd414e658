use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Opaque identifier of a recommendable item.
///
/// The numeric order is only used to break ties deterministically. When ids
/// come from an [`ItemCatalog`] it matches the lexical order of item names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Interns item names (e.g. book titles) into compact `ItemId`s and back.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    names: Vec<String>,
    ids: AHashMap<String, ItemId>,
}

impl ItemCatalog {
    /// Builds a catalog from any collection of names.
    ///
    /// Names are deduplicated and interned in sorted order, so the same set of
    /// names always yields the same ids no matter how the input was ordered.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sorted: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        let names: Vec<String> = sorted.into_iter().collect();
        let ids = names
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), ItemId(index as u32)))
            .collect();
        Self { names, ids }
    }

    pub fn id(&self, name: &str) -> Option<ItemId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: ItemId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    /// Resolves ids to names, falling back to the id's `#n` form when unknown.
    pub fn resolve<'a, I>(&self, ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a ItemId>,
    {
        ids.into_iter()
            .map(|id| match self.name(*id) {
                Some(name) => name.to_string(),
                None => id.to_string(),
            })
            .collect()
    }

    /// All interned names, in id order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
