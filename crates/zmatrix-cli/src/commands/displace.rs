use super::{is_xyz, read_first_zmatrix, write_molecules, write_zmatrices};
use crate::cli::DisplaceArgs;
use crate::error::Result;
use tracing::{info, warn};
use zmatrix::engine::config::EngineConfig;
use zmatrix::workflows;

pub fn run(args: DisplaceArgs, config: &EngineConfig) -> Result<()> {
    let base = read_first_zmatrix(&args.base)?;
    let delta = read_first_zmatrix(&args.delta)?;

    info!(
        "Displacing '{}' at {} scale factor(s).",
        base.title,
        args.scales.len()
    );
    if is_xyz(&args.output) {
        let displacements =
            workflows::displace::displace_zmatrix(&base, &delta, &args.scales, None, config)?;
        for displacement in &displacements {
            if !displacement.reconstruction.warnings.is_empty() {
                warn!(
                    "Scale {}: {} atom(s) placed with reduced accuracy.",
                    displacement.scale,
                    displacement.reconstruction.warnings.len()
                );
            }
        }
        let molecules: Vec<_> = displacements
            .into_iter()
            .map(|d| d.reconstruction.molecule)
            .collect();
        write_molecules(&molecules, &args.output)?;
    } else {
        let zmatrices =
            workflows::displace::displaced_zmatrices(&base, &delta, &args.scales, config)?;
        write_zmatrices(&zmatrices, &args.output)?;
    }

    println!(
        "Wrote {} displaced structure(s) to {}",
        args.scales.len(),
        args.output.display()
    );
    Ok(())
}
