use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing structure file formats.
///
/// A file holds a sequence of structures (one block per structure). Each
/// implementor chooses the in-memory type it reads and writes, so the same
/// trait serves Cartesian and internal-coordinate formats.
pub trait StructureFile {
    /// The structure type stored in one block of the file.
    type Structure;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads every structure block from a buffered reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    ///
    /// # Return
    ///
    /// Returns the parsed structures in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Self::Structure>, Self::Error>;

    /// Writes one structure block to a writer.
    ///
    /// # Arguments
    ///
    /// * `structure` - The structure to write.
    /// * `writer` - The writer to output to.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(structure: &Self::Structure, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Writes several structure blocks one after another.
    fn write_all_to(
        structures: &[Self::Structure],
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for structure in structures {
            Self::write_to(structure, writer)?;
        }
        Ok(())
    }

    /// Reads every structure block from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Self::Structure>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes structure blocks to a file path, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_all_to_path<P: AsRef<Path>>(
        structures: &[Self::Structure],
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_all_to(structures, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
