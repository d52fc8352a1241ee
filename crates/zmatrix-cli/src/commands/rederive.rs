use super::{read_zmatrices, write_zmatrices};
use crate::cli::RederiveArgs;
use crate::error::Result;
use tracing::info;
use zmatrix::engine::config::EngineConfig;
use zmatrix::engine::selector::SelectionStrategy;
use zmatrix::workflows;

pub fn run(args: RederiveArgs, config: &EngineConfig) -> Result<()> {
    let zmatrices = read_zmatrices(&args.input)?;
    let strategy = if args.torsion_only {
        SelectionStrategy::TorsionOnly
    } else {
        SelectionStrategy::Heuristic
    };
    info!("Re-deriving {} Z-matrix block(s) with {:?} selection.", zmatrices.len(), strategy);

    let rederived = zmatrices
        .iter()
        .map(|zmatrix| workflows::convert::rederive(zmatrix, &strategy, config))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    write_zmatrices(&rederived, &args.output)?;
    println!(
        "Wrote {} Z-matrix block(s) to {}",
        rederived.len(),
        args.output.display()
    );
    Ok(())
}
