//! IO for test vector scripts

use std::io::{BufRead, BufReader, Read};

use crate::sim::Level;
use crate::Error;

use super::utils::{parse_pin_token, split_comment, PinToken};

/// Expected value of a pin in an assertion
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expectation {
    /// Pin to check, inverted when written `/NAME`
    pub pin: PinToken,
    /// Expected level, or None for don't care
    pub expected: Option<Level>,
}

/// One meaningful line of a test vector script
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    /// `@ name`: start of a test section
    Section(String),
    /// `< A B /C`: pins driven by the following stimulus lines
    Inputs(Vec<PinToken>),
    /// `> Y /Z`: pins reported after each tick
    Outputs(Vec<PinToken>),
    /// `? Y=1 Z=0`: check the current pin values
    Assert(Vec<Expectation>),
    /// `10x1 # comment`: drive the inputs then tick
    Stimulus {
        /// One character per input pin; `1` and `0` drive it, anything else leaves it
        bits: String,
        /// Text after `#`
        comment: String,
    },
}

/// A directive with its 1-based line in the script
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    /// Line number
    pub number: usize,
    /// Content
    pub directive: Directive,
}

fn parse_pin_list(text: &str, line: usize) -> Result<Vec<PinToken>, Error> {
    text.split_whitespace()
        .map(|p| parse_pin_token(p, line))
        .collect()
}

fn parse_expectation(term: &str, line: usize) -> Result<Expectation, Error> {
    let (name, value) = term
        .split_once('=')
        .ok_or_else(|| Error::parse(line, format!("expected name=value, got '{term}'")))?;
    let expected = match value {
        "1" => Some(Level::High),
        "0" => Some(Level::Low),
        "Z" | "z" => Some(Level::Floating),
        _ => None,
    };
    Ok(Expectation {
        pin: parse_pin_token(name, line)?,
        expected,
    })
}

/// Parse a single line; None for blank and comment lines
pub fn parse_vector_line(text: &str, line: usize) -> Result<Option<Directive>, Error> {
    let t = text.trim();
    if t.is_empty() || t.starts_with('#') {
        return Ok(None);
    }
    let directive = if let Some(rest) = t.strip_prefix('@') {
        Directive::Section(rest.trim().to_owned())
    } else if let Some(rest) = t.strip_prefix('<') {
        Directive::Inputs(parse_pin_list(rest, line)?)
    } else if let Some(rest) = t.strip_prefix('>') {
        Directive::Outputs(parse_pin_list(rest, line)?)
    } else if let Some(rest) = t.strip_prefix('?') {
        let (terms, _) = split_comment(rest, '#');
        Directive::Assert(
            terms
                .split_whitespace()
                .map(|term| parse_expectation(term, line))
                .collect::<Result<Vec<_>, _>>()?,
        )
    } else {
        let (bits, comment) = split_comment(t, '#');
        Directive::Stimulus {
            bits: bits.chars().filter(|c| !c.is_whitespace()).collect(),
            comment: comment.to_owned(),
        }
    };
    Ok(Some(directive))
}

/// Read a test vector script
///
/// ```text
///     # Comment
///     @ Decoder outputs
///     < A B /C
///     > Y0 Y1
///     110     # stimulus: A=1 B=1 C=1, then tick
///     ? Y0=1 Y1=0
///     1x1     # B keeps its value
///     ? Y1=Z  # floating
/// ```
pub fn read_vectors<R: Read>(r: R) -> Result<Vec<Line>, Error> {
    let mut ret = Vec::new();
    for (i, l) in BufReader::new(r).lines().enumerate() {
        let l = l?;
        if let Some(directive) = parse_vector_line(&l, i + 1)? {
            ret.push(Line {
                number: i + 1,
                directive,
            });
        }
    }
    Ok(ret)
}
