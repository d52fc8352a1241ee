use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ZMatrixError {
    #[error("Template Z-matrix has {template} atoms but the molecule has {molecule}")]
    TemplateSizeMismatch { template: usize, molecule: usize },

    #[error("Template entry for atom {atom} is unusable: {reason}")]
    InvalidTemplate { atom: usize, reason: String },

    #[error("No {role} reference atom available for atom {atom}; atoms must be ordered so each one is bonded to an earlier atom")]
    NoReferenceAtom { atom: usize, role: &'static str },

    #[error("No non-linear third reference for atom {atom} around {i}-{j}; consider adding a dummy atom")]
    LinearReferences { atom: usize, i: usize, j: usize },

    #[error("Torsion references of atom {atom} are collinear at reference {reference}; add a dummy atom bonded to it or choose another reference pair")]
    LinearGeometry { atom: usize, reference: usize },

    #[error("Malformed Z-matrix entry {atom}: {reason}")]
    MalformedEntry { atom: usize, reason: String },

    #[error("Z-matrices differ in size: {base} vs {delta} atoms")]
    AtomCountMismatch { base: usize, delta: usize },

    #[error("Z-matrix entry {index} is defined over different atoms in the two Z-matrices")]
    TopologyMismatch { index: usize },
}
