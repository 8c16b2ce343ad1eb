use flightmap_common::Address;

/// One name to address mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub name: String,
    pub address: Address,
}

impl RegistryEntry {
    pub fn new(name: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }
}

/// Result of an add request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Inserted,
    /// The name was already mapped; the first mapping is kept
    AlreadyPresent,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("No mapping for {0:?}")]
    NotFound(String),
}

/// Name to address table, kept in insertion order
///
/// Entries are only ever added. Listings are produced sorted by name from a
/// copy, so the stored order is never disturbed.
#[derive(Debug, Default)]
pub struct RegistryTable {
    entries: Vec<RegistryEntry>,
}

impl RegistryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping unless the name is already taken
    pub fn add(&mut self, name: &str, address: Address) -> AddOutcome {
        if self.entries.iter().any(|entry| entry.name == name) {
            return AddOutcome::AlreadyPresent;
        }

        self.entries.push(RegistryEntry::new(name, address));
        AddOutcome::Inserted
    }

    pub fn lookup(&self, name: &str) -> Result<&Address, LookupError> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.address)
            .ok_or_else(|| LookupError::NotFound(name.to_string()))
    }

    /// Every entry, ascending by name
    pub fn sorted_entries(&self) -> Vec<RegistryEntry> {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Every entry in the order it was added
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
