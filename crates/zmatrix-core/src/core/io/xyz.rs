use super::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::molecule::Molecule;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Frame '{title}' declares {expected} atoms but ends after {found}")]
    Truncated {
        title: String,
        expected: usize,
        found: usize,
    },
}

/// Plain XYZ Cartesian format: an atom count line, a title line and one
/// `symbol x y z` line per atom. Frames are concatenated.
///
/// XYZ carries no connectivity, so molecules read from it have no bonds.
pub struct XyzFile;

impl StructureFile for XyzFile {
    type Structure = Molecule;
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Molecule>, Self::Error> {
        let mut frames = Vec::new();
        let mut lines = reader.lines().enumerate();

        while let Some((line_num, count_line)) = lines.next() {
            let count_line = count_line?;
            if count_line.trim().is_empty() {
                continue;
            }
            let expected: usize = count_line.trim().parse().map_err(|_| XyzError::Parse {
                line: line_num + 1,
                message: format!("invalid atom count '{}'", count_line.trim()),
            })?;

            let title = match lines.next() {
                Some((_, line)) => line?.trim().to_string(),
                None => String::new(),
            };
            let mut molecule = Molecule::with_title(&title);

            for _ in 0..expected {
                let Some((line_num, line)) = lines.next() else {
                    return Err(XyzError::Truncated {
                        title,
                        expected,
                        found: molecule.atom_count(),
                    });
                };
                molecule.add_atom(parse_atom_line(&line?, line_num + 1)?);
            }
            frames.push(molecule);
        }
        Ok(frames)
    }

    fn write_to(molecule: &Molecule, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "{}", molecule.atom_count())?;
        writeln!(writer, "{}", molecule.title)?;
        for atom in molecule.atoms() {
            writeln!(
                writer,
                "{} {:.10} {:.10} {:.10}",
                atom.symbol, atom.position.x, atom.position.y, atom.position.z
            )?;
        }
        Ok(())
    }
}

fn parse_atom_line(line: &str, line_num: usize) -> Result<Atom, XyzError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(XyzError::Parse {
            line: line_num,
            message: format!("expected 'symbol x y z', found '{}'", line.trim()),
        });
    }
    let mut coords = [0.0; 3];
    for (slot, token) in coords.iter_mut().zip(&fields[1..4]) {
        *slot = token.parse().map_err(|_| XyzError::Parse {
            line: line_num,
            message: format!("invalid coordinate '{}'", token),
        })?;
    }
    Ok(Atom::new(
        fields[0],
        Point3::new(coords[0], coords[1], coords[2]),
    ))
}
