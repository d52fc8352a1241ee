use super::{read_zmatrices, write_molecules};
use crate::cli::ConvertArgs;
use crate::error::Result;
use tracing::{info, warn};
use zmatrix::engine::config::EngineConfig;
use zmatrix::workflows;

pub fn run(args: ConvertArgs, config: &EngineConfig) -> Result<()> {
    let zmatrices = read_zmatrices(&args.input)?;

    let mut molecules = Vec::with_capacity(zmatrices.len());
    for zmatrix in &zmatrices {
        let reconstruction = workflows::convert::zmatrix_to_molecule(zmatrix, None, config)?;
        for clamp in &reconstruction.warnings {
            if clamp.is_inconsistent() {
                warn!(
                    "'{}': the second angles of atom {} are mutually inconsistent (c = {:.3e}).",
                    zmatrix.title,
                    clamp.atom + 1,
                    clamp.c
                );
                continue;
            }
            warn!(
                "'{}': atom {} was placed with reduced accuracy (c = {:.3e}).",
                zmatrix.title,
                clamp.atom + 1,
                clamp.c
            );
        }
        molecules.push(reconstruction.molecule);
    }

    write_molecules(&molecules, &args.output)?;
    info!("Converted {} Z-matrix block(s).", molecules.len());
    println!(
        "Wrote {} structure(s) to {}",
        molecules.len(),
        args.output.display()
    );
    Ok(())
}
