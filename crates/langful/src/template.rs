//! Placeholder substitution.
//!
//! Text is split on a delimiter (`%` by default): even segments are literal
//! text, odd segments are placeholders. `%%` writes a single `%` and an
//! unterminated trailing `%...` is kept as literal text.
//!
//! Substitution is a single pass; inserted values are never rescanned.

use crate::error::LangfulError;

pub const DEFAULT_DELIMITER: char = '%';

enum Piece<'a> {
    Literal(&'a str),
    Escaped,
    Placeholder(&'a str),
}

fn pieces(text: &str, delimiter: char) -> Vec<Piece<'_>> {
    let segments: Vec<&str> = text.split(delimiter).collect();
    // An even segment count means the last delimiter has no partner.
    let unbalanced = segments.len() % 2 == 0;
    let last = segments.len() - 1;

    let mut out = Vec::with_capacity(segments.len());
    for (i, seg) in segments.into_iter().enumerate() {
        if i % 2 == 0 {
            out.push(Piece::Literal(seg));
        } else if unbalanced && i == last {
            out.push(Piece::Escaped);
            out.push(Piece::Literal(seg));
        } else if seg.is_empty() {
            out.push(Piece::Escaped);
        } else {
            out.push(Piece::Placeholder(seg));
        }
    }
    out
}

/// Replace the i-th placeholder with `args[i]`, reusing the last argument
/// once `args` runs out. Placeholder names are ignored; only order matters.
pub fn substitute_positional<S: AsRef<str>>(
    template: &str,
    args: &[S],
    delimiter: char,
) -> Result<String, LangfulError> {
    let Some(last_arg) = args.last() else {
        return Err(LangfulError::MissingArgument);
    };

    let mut out = String::with_capacity(template.len());
    let mut index = 0;
    for piece in pieces(template, delimiter) {
        match piece {
            Piece::Literal(s) => out.push_str(s),
            Piece::Escaped => out.push(delimiter),
            Piece::Placeholder(_) => {
                let arg = args.get(index).unwrap_or(last_arg);
                out.push_str(arg.as_ref());
                index += 1;
            }
        }
    }
    Ok(out)
}

/// Replace each placeholder with `lookup(name)`.
pub fn expand_keys<F>(text: &str, delimiter: char, mut lookup: F) -> Result<String, LangfulError>
where
    F: FnMut(&str) -> Result<String, LangfulError>,
{
    let mut out = String::with_capacity(text.len());
    for piece in pieces(text, delimiter) {
        match piece {
            Piece::Literal(s) => out.push_str(s),
            Piece::Escaped => out.push(delimiter),
            Piece::Placeholder(key) => out.push_str(&lookup(key)?),
        }
    }
    Ok(out)
}
