use crate::codec::{CodecError, Entries, Format};
use crate::value::Value;

/// One locale's catalog: its entries and the format it is stored in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LanguageResource {
    pub format: Format,
    pub entries: Entries,
}

impl LanguageResource {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            entries: Entries::new(),
        }
    }

    pub fn with_entries(format: Format, entries: Entries) -> Self {
        Self { format, entries }
    }

    pub fn decode(format: Format, bytes: &[u8]) -> Result<Self, CodecError> {
        Ok(Self {
            format,
            entries: format.decode(bytes)?,
        })
    }

    pub fn encode(&self) -> Result<String, CodecError> {
        self.format.encode(&self.entries)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
