use super::{read_zmatrices, write_zmatrices};
use crate::cli::SubtractArgs;
use crate::error::{CliError, Result};
use tracing::info;
use zmatrix::core::zmatrix::ZMatrix;
use zmatrix::engine::config::EngineConfig;
use zmatrix::engine::delta::DeltaApplier;

pub fn run(args: SubtractArgs, config: &EngineConfig) -> Result<()> {
    let minuends = read_zmatrices(&args.a)?;
    let subtrahends = read_zmatrices(&args.b)?;
    if minuends.len() != subtrahends.len() {
        return Err(CliError::Argument(format!(
            "'{}' holds {} Z-matrices but '{}' holds {}",
            args.a.display(),
            minuends.len(),
            args.b.display(),
            subtrahends.len()
        )));
    }

    let applier = DeltaApplier::new(config);
    let differences = minuends
        .iter()
        .zip(&subtrahends)
        .map(|(a, b)| -> Result<ZMatrix> {
            let mut difference = applier.subtract(a, b)?;
            difference.title = format!("{} - {}", a.title, b.title);
            Ok(difference)
        })
        .collect::<Result<Vec<_>>>()?;

    write_zmatrices(&differences, &args.output)?;
    info!("Subtracted {} Z-matrix pair(s).", differences.len());
    println!(
        "Wrote {} difference(s) to {}",
        differences.len(),
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use zmatrix::core::io::traits::StructureFile;
    use zmatrix::core::io::zmat::ZMatrixFile;
    use zmatrix::engine::error::ZMatrixError;

    #[test]
    fn writes_the_difference_of_matching_blocks() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.zmat");
        let b = dir.path().join("b.zmat");
        let output = dir.path().join("diff.zmat");
        fs::write(&a, "a\nO\nH 1 1.00\nH 1 0.96 2 -170.0\n$$$$\n").unwrap();
        fs::write(&b, "b\nO\nH 1 0.96\nH 1 0.96 2 170.0\n$$$$\n").unwrap();

        run(
            SubtractArgs {
                a,
                b,
                output: output.clone(),
            },
            &EngineConfig::default(),
        )
        .unwrap();

        let diff = ZMatrixFile::read_from_path(&output).unwrap();
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].title, "a - b");
        let values: Vec<f64> = diff[0].coordinates().map(|ic| ic.value).collect();
        assert!((values[0] - 0.04).abs() < 1e-8);
        assert!(values[1].abs() < 1e-8);
        assert!((values[2] - 20.0).abs() < 1e-8);
    }

    #[test]
    fn mismatched_topology_is_reported() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.zmat");
        let b = dir.path().join("b.zmat");
        fs::write(&a, "a\nO\nH 1 1.0\nH 1 0.96 2 104.5\n$$$$\n").unwrap();
        fs::write(&b, "b\nO\nH 1 1.0\nH 2 0.96 1 104.5\n$$$$\n").unwrap();

        let result = run(
            SubtractArgs {
                a,
                b,
                output: dir.path().join("diff.zmat"),
            },
            &EngineConfig::default(),
        );
        assert!(matches!(
            result,
            Err(CliError::ZMatrix(ZMatrixError::TopologyMismatch { index: 2 }))
        ));
    }
}
