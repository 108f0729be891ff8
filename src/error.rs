use thiserror::Error;

/// Recoverable failures at the core's boundary.
///
/// Per spec §7 infeasibility is never an error (it's the in-band unreachable
/// profile) and out-of-domain/malformed-list conditions are programmer bugs
/// that stay `assert!`/`debug_assert!` panics. This type only covers the
/// classes spec §7 calls out as legitimately recoverable.
#[derive(Error, Debug)]
pub enum CoreError {
	#[error("battery capacity M must be positive, got {0}")]
	InvalidCapacity(f64),

	#[error("vertex {0} is not present in the graph")]
	UnknownVertex(String),

	#[error("graph has no vertices")]
	EmptyGraph,

	#[error("malformed input data: {0}")]
	Ingestion(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
