use crate::Error;

/// A pin name as written in a file, with its optional `/` inversion prefix
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinToken {
    /// Name without the prefix
    pub name: String,
    /// True if written with a leading `/`
    pub inverted: bool,
}

impl PinToken {
    /// Create a token
    pub fn new(name: &str, inverted: bool) -> PinToken {
        PinToken {
            name: name.to_owned(),
            inverted,
        }
    }
}

/// Parse a token of the form `/?[A-Za-z0-9]+`
pub fn parse_pin_token(s: &str, line: usize) -> Result<PinToken, Error> {
    let (inverted, name) = match s.strip_prefix('/') {
        Some(n) => (true, n),
        None => (false, s),
    };
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::parse(line, format!("invalid pin name '{s}'")));
    }
    Ok(PinToken::new(name, inverted))
}

/// Remove a trailing comment starting with `marker`, returning the text and the comment
pub fn split_comment(line: &str, marker: char) -> (&str, &str) {
    match line.split_once(marker) {
        Some((text, comment)) => (text, comment.trim()),
        None => (line, ""),
    }
}
