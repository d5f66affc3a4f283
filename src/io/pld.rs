//! IO for GAL equation files, in the format used by GALasm-style assemblers

use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::str::FromStr;

use crate::design::PinMode;
use crate::Error;

use super::utils::{parse_pin_token, split_comment, PinToken};

/// Supported devices
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Device {
    /// 20-pin GAL16V8
    Gal16v8,
    /// 24-pin GAL20V8
    Gal20v8,
    /// 24-pin GAL22V10
    Gal22v10,
}

impl Device {
    /// Number of pins of the package
    pub fn nb_pins(&self) -> usize {
        match self {
            Device::Gal16v8 => 20,
            Device::Gal20v8 | Device::Gal22v10 => 24,
        }
    }
}

impl FromStr for Device {
    type Err = String;
    fn from_str(s: &str) -> Result<Device, String> {
        match s {
            "GAL16V8" => Ok(Device::Gal16v8),
            "GAL20V8" => Ok(Device::Gal20v8),
            "GAL22V10" => Ok(Device::Gal22v10),
            _ => Err(format!("unknown device {s}")),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Device::Gal16v8 => "GAL16V8",
            Device::Gal20v8 => "GAL20V8",
            Device::Gal22v10 => "GAL22V10",
        };
        write!(f, "{s}")
    }
}

/// First two lines of the file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    /// Target device
    pub device: Device,
    /// Design name
    pub name: String,
}

/// Text following the DESCRIPTION keyword
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Footer {
    /// Free text, one line per source line
    pub description: String,
}

/// One `dest = expr` statement
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquationDecl {
    /// Destination pin
    pub output: PinToken,
    /// Role given by the destination extension
    pub mode: PinMode,
    /// Product terms
    pub terms: Vec<Vec<PinToken>>,
    /// 1-based line where the equation starts
    pub line: usize,
}

/// Parsed equation file, before pin names are resolved
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree {
    /// Device and design name
    pub header: Header,
    /// Pin declarations, in order and with repetitions
    pub pins: Vec<PinToken>,
    /// Equations, in order
    pub equations: Vec<EquationDecl>,
    /// Description
    pub footer: Footer,
}

fn parse_equation(text: &str, line: usize) -> Result<EquationDecl, Error> {
    let (dest, expr) = text
        .split_once('=')
        .ok_or_else(|| Error::parse(line, "expected '='"))?;
    let dest = dest.trim();
    let (name, mode) = match dest.split_once('.') {
        Some((name, ext)) => {
            let mode = PinMode::from_extension(ext.trim())
                .ok_or_else(|| Error::parse(line, format!("unknown pin extension '{ext}'")))?;
            (name.trim(), mode)
        }
        None => (dest, PinMode::Combinational),
    };
    let output = parse_pin_token(name, line)?;

    let mut terms = Vec::new();
    for addend in expr.split('+') {
        if addend.trim().is_empty() {
            return Err(Error::parse(line, "empty product term"));
        }
        let factors = addend
            .split('*')
            .map(|f| parse_pin_token(f.trim(), line))
            .collect::<Result<Vec<_>, _>>()?;
        terms.push(factors);
    }
    Ok(EquationDecl {
        output,
        mode,
        terms,
        line,
    })
}

enum Section {
    Model,
    Name,
    Pins,
    Equations,
    Footer,
}

/// Read an equation file
///
/// These files describe the design with a header, the pin list, the equations and a description:
/// ```text
///     GAL16V8
///     DECODER
///
///     CLK A B C NC NC NC NC NC GND
///     /OE Y0 Y1 Q NC NC NC NC NC VCC
///
///     ; Comments start with a semicolon
///     Y0 = A * B + /C
///     Y1.T = A
///        + B * C
///     Y1.E = /C
///     Q.R = Y0
///
///     DESCRIPTION
///     Free text
/// ```
pub fn read_pld<R: Read>(r: R) -> Result<Tree, Error> {
    let mut section = Section::Model;
    let mut device = None;
    let mut name = String::new();
    let mut pins = Vec::new();
    // Text and start line of each equation, with continuations merged
    let mut statements: Vec<(String, usize)> = Vec::new();
    let mut continued = false;
    let mut description = String::new();
    let mut last_line = 0;

    for (i, l) in BufReader::new(r).lines().enumerate() {
        let l = l?;
        let line = i + 1;
        last_line = line;
        let (text, _) = split_comment(&l, ';');
        let t = text.trim();
        if t.is_empty() && !matches!(section, Section::Footer) {
            continue;
        }
        match section {
            Section::Footer => {
                description.push_str(text.trim_end());
                description.push('\n');
            }
            Section::Model => {
                device = Some(t.parse::<Device>().map_err(|e| Error::parse(line, e))?);
                section = Section::Name;
            }
            Section::Name => {
                if !t
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
                {
                    return Err(Error::parse(line, format!("invalid design name '{t}'")));
                }
                name = t.to_owned();
                section = Section::Pins;
            }
            Section::Pins | Section::Equations if t == "DESCRIPTION" => {
                if statements.is_empty() {
                    return Err(Error::parse(line, "expected at least one equation"));
                }
                if continued {
                    return Err(Error::parse(line, "expression ends with '+'"));
                }
                section = Section::Footer;
            }
            Section::Pins if !t.contains('=') => {
                for p in t.split_whitespace() {
                    pins.push(parse_pin_token(p, line)?);
                }
            }
            Section::Pins | Section::Equations => {
                if pins.is_empty() {
                    return Err(Error::parse(line, "expected pin declarations"));
                }
                section = Section::Equations;
                match statements.last_mut() {
                    Some((s, _)) if continued || t.starts_with('+') => {
                        s.push(' ');
                        s.push_str(t);
                    }
                    _ => {
                        if !t.contains('=') {
                            return Err(Error::parse(line, "expected equation"));
                        }
                        statements.push((t.to_owned(), line));
                    }
                }
                continued = t.ends_with('+');
            }
        }
    }

    let Some(device) = device else {
        return Err(Error::parse(last_line.max(1), "missing device"));
    };
    if !matches!(section, Section::Footer) {
        return Err(Error::parse(last_line.max(1), "missing DESCRIPTION"));
    }
    let equations = statements
        .iter()
        .map(|(s, line)| parse_equation(s, *line))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Tree {
        header: Header { device, name },
        pins,
        equations,
        footer: Footer { description },
    })
}
