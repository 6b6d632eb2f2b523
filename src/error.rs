use thiserror::Error;
use varisat::solver::SolverError;
use varisat::Var;

/// Reasons solving or decoding may fail.
///
/// An unsatisfiable instance is *not* an error; it surfaces as `false` or [`None`] from the solving functions.
#[derive(Error, Debug)]
pub enum Error {
    /// The SAT engine itself gave up, e.g. it was interrupted or failed writing a proof.
    #[error("SAT engine failure: {0:?}")]
    Backend(SolverError),
    /// The engine reported a model but could not tell the value of this variable.
    /// This should probably never happen.
    #[error("model has no value for variable {var:?}")]
    IncompleteModel {
        /// The variable without a value.
        var: Var,
    },
    /// A row of the variable grid (a node or a pigeon) did not have the expected number of true variables.
    #[error("row {row} has {true_count} true variables in the model")]
    Undecodable {
        /// The node or pigeon.
        row: usize,
        /// How many of its variables were true.
        true_count: usize,
    },
    /// Writing an exported instance failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<SolverError> for Error {
    fn from(err: SolverError) -> Self {
        Error::Backend(err)
    }
}

/// Result of solving and decoding.
pub type Result<T> = std::result::Result<T, Error>;
