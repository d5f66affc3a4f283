//! Read designs and test vectors from files

mod pld;
mod utils;
mod vectors;

use std::fs::File;
use std::path::Path;

pub use pld::{read_pld, Device, EquationDecl, Footer, Header, Tree};
pub use utils::PinToken;
pub use vectors::{parse_vector_line, read_vectors, Directive, Expectation, Line};

use crate::{Design, Error};

/// Read a design from an equation file (usually .pld)
pub fn read_design_file(path: &Path) -> Result<Design, Error> {
    let f = File::open(path)?;
    Design::from_tree(read_pld(f)?)
}

/// Read a test vector script
pub fn read_vector_file(path: &Path) -> Result<Vec<Line>, Error> {
    let f = File::open(path)?;
    read_vectors(f)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{read_design_file, read_vector_file};
    use crate::Error;

    #[test]
    fn test_files() {
        let mut design = tempfile::NamedTempFile::new().unwrap();
        write!(design, "GAL16V8\nX\nA OUT\nOUT = /A\nDESCRIPTION\n").unwrap();
        let d = read_design_file(design.path()).unwrap();
        assert_eq!(d.equations().len(), 1);

        let mut vectors = tempfile::NamedTempFile::new().unwrap();
        write!(vectors, "< A\n1\n? OUT=0\n").unwrap();
        assert_eq!(read_vector_file(vectors.path()).unwrap().len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_design_file(&dir.path().join("missing.pld")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
