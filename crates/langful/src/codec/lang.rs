use std::fmt::Write as _;

use super::{CodecError, Entries};
use crate::value::Value;

/// A line is blank when nothing but whitespace precedes its first `#`.
fn is_blank(line: &str) -> bool {
    let content = line.split('#').next().unwrap_or_default();
    content.chars().all(char::is_whitespace)
}

/// Parse the `.lang` format:
/// - One entry per line: `key = value`
/// - Lines that are empty or only hold a `# comment` are skipped
/// - The value is everything after the first `=`, untouched. A `#` on a data
///   line does not start a comment.
pub(super) fn decode(src: &str) -> Result<Entries, CodecError> {
    let mut out = Entries::new();
    for (idx, line) in src.split('\n').enumerate() {
        if is_blank(line) {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(CodecError::Syntax {
                line: idx + 1,
                msg: "malformed line, expected `key = value`".to_string(),
            });
        };
        out.insert(key.trim().to_string(), Value::Str(value.to_string()));
    }
    Ok(out)
}

pub(super) fn encode(entries: &Entries) -> String {
    let mut out = String::new();
    for (key, value) in entries {
        // Writing into a String can't fail.
        let _ = writeln!(out, "{key} = {value}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn trailing_comment_stays_in_value() {
        let entries = decode("name = value # trailing\n# full comment line\n\n").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries["name"], Value::Str(" value # trailing".into()));
    }

    #[test]
    fn skips_blank_and_comment_only_lines() {
        let src = "   \n\t# header\n  # indented comment\ngreet=Hi\n";
        let entries = decode(src).unwrap();
        assert_eq!(
            entries.into_iter().collect::<Vec<_>>(),
            vec![("greet".to_string(), Value::Str("Hi".into()))]
        );
    }

    #[test]
    fn splits_on_first_equals_only() {
        let entries = decode("expr = a = b\n").unwrap();
        assert_eq!(entries["expr"], Value::Str(" a = b".into()));
    }

    #[test]
    fn missing_equals_is_a_syntax_error() {
        let err = decode("ok = 1\n\njust words\n").unwrap_err();
        match err {
            CodecError::Syntax { line, .. } => assert_eq!(line, 3),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn later_duplicate_overwrites_in_place() {
        let entries = decode("a=1\nb=2\na=3\n").unwrap();
        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(entries["a"], Value::Str("3".into()));
    }

    #[test]
    fn encode_writes_one_line_per_entry() {
        let mut entries = Entries::new();
        entries.insert("title".into(), Value::from("Demo"));
        entries.insert("max".into(), Value::from(10));
        assert_eq!(encode(&entries), "title = Demo\nmax = 10\n");
        assert_eq!(encode(&Entries::new()), "");
    }
}
