use super::traits::StructureFile;
use crate::core::zmatrix::{InternalCoordinate, ThirdCoordinateKind, ZMatrix, ZMatrixAtom};
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Line that terminates one Z-matrix block.
pub const BLOCK_SEPARATOR: &str = "$$$$";

#[derive(Debug, Error)]
pub enum ZMatrixFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: ZMatrixParseErrorKind,
    },
    #[error("Unterminated Z-matrix block '{title}' (missing '$$$$' line)")]
    Unterminated { title: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ZMatrixParseErrorKind {
    #[error("Unexpected number of fields ({0}); expected 1, 3, 5, 7 or 8")]
    FieldCount(usize),
    #[error("Invalid atom index '{0}' (indices are 1-based)")]
    InvalidIndex(String),
    #[error("Invalid numeric value '{0}'")]
    InvalidValue(String),
    #[error("Invalid third-coordinate kind '{0}'")]
    InvalidKind(String),
}

/// Reader and writer for the native Z-matrix text format.
///
/// Each block is a title line, one line per atom and a terminating `$$$$`
/// line. An atom line holds the element symbol followed by up to three
/// `index value` pairs (1-based indices) and an optional kind token (`0`,
/// `1`, `-1`) after the third value:
///
/// ```text
/// methanol
/// C
/// O 1 1.43000000
/// H 2 0.96000000 1 108.00000000
/// H 1 1.09000000 2 110.00000000 3 180.00000000 0
/// $$$$
/// ```
///
/// Internal-coordinate names are not stored; reading assigns `dst#`, `ang#`
/// and `tor#` names in file order. Bond reconciliation pointers are not
/// persisted.
pub struct ZMatrixFile;

impl StructureFile for ZMatrixFile {
    type Structure = ZMatrix;
    type Error = ZMatrixFileError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<ZMatrix>, Self::Error> {
        let mut blocks = Vec::new();
        let mut current: Option<BlockParser> = None;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                continue;
            }
            // The first non-blank line after a separator is the next title.
            let Some(block) = current.as_mut() else {
                current = Some(BlockParser::new(trimmed));
                continue;
            };
            if trimmed.starts_with(BLOCK_SEPARATOR) {
                if let Some(done) = current.take() {
                    blocks.push(done.finish());
                }
            } else {
                block.push_line(trimmed, line_num)?;
            }
        }

        if let Some(block) = current {
            return Err(ZMatrixFileError::Unterminated {
                title: block.zmatrix.title,
            });
        }
        Ok(blocks)
    }

    fn write_to(zmatrix: &ZMatrix, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "{}", zmatrix.title)?;
        for atom in zmatrix.atoms() {
            let mut line = atom.symbol.clone();
            for (reference, ic) in atom.references().iter().zip(atom.coordinates()) {
                let Some(reference) = reference else { break };
                line.push_str(&format!(" {} {:.8}", reference + 1, ic.value));
                if let Some(kind) = ic.kind {
                    line.push_str(&format!(" {}", kind.token()));
                }
            }
            writeln!(writer, "{}", line)?;
        }
        writeln!(writer, "{}", BLOCK_SEPARATOR)?;
        Ok(())
    }
}

/// Accumulates the atom lines of one block.
struct BlockParser {
    zmatrix: ZMatrix,
    distances: usize,
    angles: usize,
    torsions: usize,
}

impl BlockParser {
    fn new(title: &str) -> Self {
        Self {
            zmatrix: ZMatrix::with_title(title),
            distances: 0,
            angles: 0,
            torsions: 0,
        }
    }

    fn finish(self) -> ZMatrix {
        self.zmatrix
    }

    fn push_line(&mut self, line: &str, line_num: usize) -> Result<(), ZMatrixFileError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let err = |kind| ZMatrixFileError::Parse {
            line: line_num,
            kind,
        };
        if !matches!(fields.len(), 1 | 3 | 5 | 7 | 8) {
            return Err(err(ZMatrixParseErrorKind::FieldCount(fields.len())));
        }

        let current = self.zmatrix.len();
        let symbol = fields[0];
        let mut references = [None; 3];
        let mut values = [0.0; 3];
        for slot in 0..(fields.len() - 1) / 2 {
            references[slot] = Some(parse_index(fields[1 + 2 * slot]).map_err(err)?);
            values[slot] = parse_value(fields[2 + 2 * slot]).map_err(err)?;
        }
        let kind = match fields.get(7) {
            Some(token) => Some(
                token
                    .parse::<ThirdCoordinateKind>()
                    .map_err(|_| err(ZMatrixParseErrorKind::InvalidKind(token.to_string())))?,
            ),
            None => None,
        };

        let mut coordinates = Vec::with_capacity(3);
        if let Some(i) = references[0] {
            self.distances += 1;
            coordinates.push(InternalCoordinate::distance(
                format!("dst{}", self.distances),
                values[0],
                current,
                i,
            ));
            if let Some(j) = references[1] {
                self.angles += 1;
                coordinates.push(InternalCoordinate::angle(
                    format!("ang{}", self.angles),
                    values[1],
                    current,
                    i,
                    j,
                ));
                if let Some(k) = references[2] {
                    let name = if kind.is_some_and(ThirdCoordinateKind::is_second_angle) {
                        self.angles += 1;
                        format!("ang{}", self.angles)
                    } else {
                        self.torsions += 1;
                        format!("tor{}", self.torsions)
                    };
                    coordinates.push(InternalCoordinate::third(
                        name,
                        values[2],
                        [current, i, j, k],
                        kind,
                    ));
                }
            }
        }

        self.zmatrix
            .add_atom(ZMatrixAtom::from_parts(symbol, references, coordinates));
        Ok(())
    }
}

fn parse_index(token: &str) -> Result<usize, ZMatrixParseErrorKind> {
    match token.parse::<usize>() {
        Ok(index) if index >= 1 => Ok(index - 1),
        _ => Err(ZMatrixParseErrorKind::InvalidIndex(token.to_string())),
    }
}

fn parse_value(token: &str) -> Result<f64, ZMatrixParseErrorKind> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ZMatrixParseErrorKind::InvalidValue(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    const TWO_BLOCKS: &str = "\
water
O
H 1 0.96000000
H 1 0.96000000 2 104.50000000
$$$$
chiral
C
H 1 1.09000000
F 1 1.35000000 2 109.00000000
Cl 1 1.77000000 2 109.00000000 3 109.00000000 -1
Br 1 1.94000000 2 109.00000000 3 120.00000000
$$$$
";

    fn read_str(text: &str) -> Result<Vec<ZMatrix>, ZMatrixFileError> {
        ZMatrixFile::read_from(&mut Cursor::new(text))
    }

    #[test]
    fn reads_multiple_blocks_with_titles() {
        let blocks = read_str(TWO_BLOCKS).unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].title, "water");
        assert_eq!(blocks[0].len(), 3);
        assert_eq!(blocks[1].title, "chiral");
        assert_eq!(blocks[1].len(), 5);
    }

    #[test]
    fn converts_indices_to_zero_based_and_builds_coordinates() {
        let blocks = read_str(TWO_BLOCKS).unwrap();
        let chiral = &blocks[1];

        let cl = chiral.atom(3).unwrap();
        assert_eq!(cl.symbol, "Cl");
        assert_eq!(cl.references(), [Some(0), Some(1), Some(2)]);
        assert_eq!(cl.third().unwrap().atoms(), &[3, 0, 1, 2]);
        assert_eq!(cl.third_kind(), Some(ThirdCoordinateKind::AngleNegative));
        assert!((cl.third().unwrap().value - 109.0).abs() < 1e-12);

        let br = chiral.atom(4).unwrap();
        assert_eq!(br.third().unwrap().kind, None);
        assert!(br.uses_torsion());
    }

    #[test]
    fn assigns_names_in_file_order() {
        let blocks = read_str(TWO_BLOCKS).unwrap();
        let names: Vec<&str> = blocks[1].coordinates().map(|ic| ic.name.as_str()).collect();

        assert_eq!(
            names,
            [
                "dst1", "dst2", "ang1", "dst3", "ang2", "ang3", "dst4", "ang4", "tor1"
            ]
        );
    }

    #[test]
    fn written_text_reads_back_to_the_same_entries() {
        let blocks = read_str(TWO_BLOCKS).unwrap();
        let mut out = Vec::new();
        ZMatrixFile::write_all_to(&blocks, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, TWO_BLOCKS);

        let reread = read_str(&text).unwrap();
        assert_eq!(reread, blocks);
    }

    #[test]
    fn rejects_bad_field_counts_with_line_number() {
        let text = "bad\nC\nH 1\n$$$$\n";
        match read_str(text) {
            Err(ZMatrixFileError::Parse { line, kind }) => {
                assert_eq!(line, 3);
                assert_eq!(kind, ZMatrixParseErrorKind::FieldCount(2));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_zero_index_and_bad_values() {
        let zero = "t\nC\nH 0 1.0\n$$$$\n";
        assert!(matches!(
            read_str(zero),
            Err(ZMatrixFileError::Parse {
                kind: ZMatrixParseErrorKind::InvalidIndex(_),
                ..
            })
        ));

        let nan = "t\nC\nH 1 abc\n$$$$\n";
        assert!(matches!(
            read_str(nan),
            Err(ZMatrixFileError::Parse {
                kind: ZMatrixParseErrorKind::InvalidValue(_),
                ..
            })
        ));

        let kind = "t\nC\nH 1 1.0\nH 1 1.0 2 90.0\nH 1 1.0 2 90.0 3 90.0 5\n$$$$\n";
        assert!(matches!(
            read_str(kind),
            Err(ZMatrixFileError::Parse {
                line: 5,
                kind: ZMatrixParseErrorKind::InvalidKind(_),
            })
        ));
    }

    #[test]
    fn unterminated_block_is_an_error() {
        let text = "open\nC\nH 1 1.0\n";
        match read_str(text) {
            Err(ZMatrixFileError::Unterminated { title }) => assert_eq!(title, "open"),
            other => panic!("expected unterminated error, got {:?}", other),
        }
    }

    #[test]
    fn trailing_blank_lines_are_ignored() {
        let text = format!("{}\n\n", TWO_BLOCKS);
        assert_eq!(read_str(&text).unwrap().len(), 2);
    }

    #[test]
    fn blank_lines_before_a_title_are_skipped() {
        let text = "water\nO\nH 1 0.96\n$$$$\n\nammonia\nN\nH 1 1.01\n$$$$\n";
        let blocks = read_str(text).unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].title, "water");
        assert_eq!(blocks[1].title, "ammonia");
        let symbols: Vec<&str> = blocks[1].atoms().iter().map(|a| a.symbol.as_str()).collect();
        assert_eq!(symbols, ["N", "H"]);
    }

    #[test]
    fn path_helpers_round_trip_through_a_file() {
        let blocks = read_str(TWO_BLOCKS).unwrap();
        let file = NamedTempFile::new().unwrap();

        ZMatrixFile::write_all_to_path(&blocks, file.path()).unwrap();
        let reread = ZMatrixFile::read_from_path(file.path()).unwrap();

        assert_eq!(reread, blocks);
    }
}
