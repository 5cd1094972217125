use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use super::{CodecError, Entries};
use crate::value::Value;

const INDENT: &[u8] = b"    ";

pub(super) fn decode(bytes: &[u8]) -> Result<Entries, CodecError> {
    let raw: IndexMap<String, serde_json::Value> = match serde_json::from_slice(bytes) {
        Ok(raw) => raw,
        // Well-formed JSON that isn't an object (array, string, ...).
        Err(e) if e.is_data() => return Err(CodecError::NotAnObject),
        Err(e) => return Err(e.into()),
    };
    let mut out = Entries::with_capacity(raw.len());
    for (key, value) in raw {
        let value = Value::from_json(&key, value)?;
        out.insert(key, value);
    }
    Ok(out)
}

pub(super) fn encode(entries: &Entries) -> Result<String, CodecError> {
    let mut buf = Vec::with_capacity(entries.len() * 32);
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    entries.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
