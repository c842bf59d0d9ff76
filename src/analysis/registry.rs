use crate::models::{capitalize_first, FieldDescriptor, TypeDescriptor};
use std::collections::HashMap;
use std::fmt;

/// Qualified identity of a source type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    pub import_path: String,
    pub name: String,
}

impl TypeKey {
    pub fn new(import_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            import_path: import_path.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.import_path, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Name assigned, fields not resolved yet
    Reserved,
    /// Fields are being resolved; references back into this entry are cycles
    Resolving,
    Resolved,
}

#[derive(Debug)]
struct Entry {
    descriptor: TypeDescriptor,
    state: EntryState,
    /// Name the entry asked for before conflict detection
    requested_name: String,
    /// Referenced while still resolving
    cyclic: bool,
}

/// Registry of emitted types, memoized by qualified key and indexed by name.
///
/// Entries live in an arena in insertion order; both indexes point into it.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: Vec<Option<Entry>>,
    by_key: HashMap<TypeKey, usize>,
    by_name: HashMap<String, usize>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, key: &TypeKey) -> Option<EntryState> {
        self.entry(key).map(|e| e.state)
    }

    /// Registry name of `key`. Looking up an entry that is still resolving marks it cyclic.
    pub fn lookup(&mut self, key: &TypeKey) -> Option<String> {
        let index = *self.by_key.get(key)?;
        let entry = self.entries.get_mut(index)?.as_mut()?;
        if entry.state == EntryState::Resolving {
            entry.cyclic = true;
        }
        Some(entry.descriptor.name.clone())
    }

    /// Assign a unique name to `key` and insert an empty placeholder.
    ///
    /// A taken name falls back to `<CapitalizedPackage><preferred>`, then to a
    /// numeric suffix. Reserving an existing key returns its current name.
    pub fn reserve(&mut self, key: TypeKey, package: &str, preferred: &str) -> String {
        if let Some(existing) = self.entry(&key) {
            return existing.descriptor.name.clone();
        }

        let name = self.unique_name(package, preferred);
        let index = self.entries.len();
        self.entries.push(Some(Entry {
            descriptor: TypeDescriptor {
                name: name.clone(),
                qualified_name: key.to_string(),
                package: package.to_string(),
                fields: Vec::new(),
            },
            state: EntryState::Reserved,
            requested_name: preferred.to_string(),
            cyclic: false,
        }));
        self.by_key.insert(key, index);
        self.by_name.insert(name.clone(), index);
        name
    }

    pub fn begin(&mut self, key: &TypeKey) {
        if let Some(entry) = self.entry_mut(key) {
            entry.state = EntryState::Resolving;
        }
    }

    /// Store the resolved fields of `key` and return its final name.
    ///
    /// An entry that was renamed because its requested name was taken, whose
    /// fields equal the holder of that name, collapses onto the holder unless
    /// something already referenced it through a cycle.
    pub fn complete(&mut self, key: &TypeKey, fields: Vec<FieldDescriptor>) -> Option<String> {
        let index = *self.by_key.get(key)?;

        let duplicate_of = {
            let entry = self.entries.get(index)?.as_ref()?;
            let renamed = entry.descriptor.name != entry.requested_name;
            if renamed && !entry.cyclic {
                self.by_name
                    .get(&entry.requested_name)
                    .copied()
                    .filter(|&holder| self.has_same_content(holder, &fields))
            } else {
                None
            }
        };

        if let Some(holder) = duplicate_of {
            if let Some(removed) = self.entries.get_mut(index).and_then(Option::take) {
                self.by_name.remove(&removed.descriptor.name);
            }
            self.by_key.insert(key.clone(), holder);
            return self.name_at(holder);
        }

        let entry = self.entries.get_mut(index)?.as_mut()?;
        entry.descriptor.fields = fields;
        entry.state = EntryState::Resolved;
        Some(entry.descriptor.name.clone())
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        let index = *self.by_name.get(name)?;
        self.entries
            .get(index)?
            .as_ref()
            .map(|entry| &entry.descriptor)
    }

    pub fn get_by_key(&self, key: &TypeKey) -> Option<&TypeDescriptor> {
        self.entry(key).map(|entry| &entry.descriptor)
    }

    /// Registered types in insertion order
    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.entries
            .iter()
            .flatten()
            .map(|entry| &entry.descriptor)
    }

    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, key: &TypeKey) -> Option<&Entry> {
        let index = *self.by_key.get(key)?;
        self.entries.get(index)?.as_ref()
    }

    fn entry_mut(&mut self, key: &TypeKey) -> Option<&mut Entry> {
        let index = *self.by_key.get(key)?;
        self.entries.get_mut(index)?.as_mut()
    }

    fn name_at(&self, index: usize) -> Option<String> {
        self.entries
            .get(index)?
            .as_ref()
            .map(|entry| entry.descriptor.name.clone())
    }

    fn has_same_content(&self, index: usize, fields: &[FieldDescriptor]) -> bool {
        let Some(Some(entry)) = self.entries.get(index) else {
            return false;
        };
        entry.state == EntryState::Resolved
            && entry.descriptor.fields.len() == fields.len()
            && entry
                .descriptor
                .fields
                .iter()
                .zip(fields)
                .all(|(a, b)| {
                    a.serialized_name == b.serialized_name
                        && a.resolved_type == b.resolved_type
                        && a.is_optional == b.is_optional
                        && a.is_array == b.is_array
                })
    }

    fn unique_name(&self, package: &str, preferred: &str) -> String {
        if !self.by_name.contains_key(preferred) {
            return preferred.to_string();
        }

        let prefix = capitalize_first(package);
        let prefixed = if preferred.starts_with(&prefix) {
            preferred.to_string()
        } else {
            format!("{}{}", prefix, preferred)
        };
        if !self.by_name.contains_key(&prefixed) {
            return prefixed;
        }

        let mut suffix = 2;
        loop {
            let candidate = format!("{}{}", prefixed, suffix);
            if !self.by_name.contains_key(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }
}
