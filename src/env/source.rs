use toml::{Table, Value};

use super::SourceError;

/// A single raw setting collected from a source, keyed by its flat name.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEntry {
    pub key: String,
    pub value: Value,
}

impl SourceEntry {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Expands every top-level pair of a parsed table into an entry.
    pub fn from_table(table: Table) -> Vec<Self> {
        table
            .into_iter()
            .map(|(key, value)| Self { key, value })
            .collect()
    }
}

/// Something that can contribute raw settings to an [`EnvLoader`](super::EnvLoader).
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    fn entries(&self) -> Result<Vec<SourceEntry>, SourceError>;
}

/// Applies entries over `table`, later entries replacing earlier ones.
///
/// The raw environment is flat, so a key is always replaced as a whole,
/// lists included.
pub fn merge_entries(table: &mut Table, entries: Vec<SourceEntry>) {
    for SourceEntry { key, value } in entries {
        table.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_entry_replaces_earlier() {
        let mut table = Table::new();
        merge_entries(
            &mut table,
            vec![
                SourceEntry::new("port", Value::Integer(2583)),
                SourceEntry::new("hostname", Value::String("pds.example".into())),
            ],
        );
        merge_entries(
            &mut table,
            vec![SourceEntry::new("port", Value::String("3000".into()))],
        );

        assert_eq!(table["port"], Value::String("3000".into()));
        assert_eq!(table["hostname"].as_str().unwrap(), "pds.example");
    }

    #[test]
    fn test_lists_are_replaced_not_appended() {
        let mut table = Table::new();
        merge_entries(
            &mut table,
            vec![SourceEntry::new(
                "crawlers",
                Value::Array(vec![Value::String("https://a.example".into())]),
            )],
        );
        merge_entries(
            &mut table,
            vec![SourceEntry::new(
                "crawlers",
                Value::Array(vec![Value::String("https://b.example".into())]),
            )],
        );

        let crawlers = table["crawlers"].as_array().unwrap();
        assert_eq!(crawlers.len(), 1);
        assert_eq!(crawlers[0].as_str().unwrap(), "https://b.example");
    }
}
