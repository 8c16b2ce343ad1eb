/// A single visit by a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRecord {
    pub client_id: String,
}

/// Every visit a node has seen, in arrival order
///
/// Repeat visits by the same client are separate records.
#[derive(Debug, Default)]
pub struct VisitLog {
    records: Vec<VisitRecord>,
}

impl VisitLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, client_id: impl Into<String>) {
        self.records.push(VisitRecord {
            client_id: client_id.into(),
        });
    }

    /// Visitor identities ascending, duplicates included
    pub fn sorted_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .records
            .iter()
            .map(|record| record.client_id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
