use miette::Diagnostic;
use thiserror::Error;

/// Errors produced while rewriting a template region. Every variant is fatal
/// for the document being processed: once the transformer has failed or the
/// batch response lost its shape, per-snippet errors can no longer be
/// attributed reliably, so no partial recovery is attempted. Probe recovery
/// misses are logged instead of surfaced here.
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum TstripError {
	#[error("external transform rejected the request: {reason}")]
	#[diagnostic(
		code(tstrip::transform),
		help("the transformer failed on generated probe code; the document cannot be recovered")
	)]
	Transform { reason: String },

	#[error("batch response contained {actual} segment(s), expected {expected}")]
	#[diagnostic(
		code(tstrip::batch_size_mismatch),
		help("the transformer altered the line structure of the batched request, making positional reassembly unsafe")
	)]
	BatchSizeMismatch { expected: usize, actual: usize },

	#[error("expression span {start}..{end} lies outside the region text (len {len})")]
	#[diagnostic(code(tstrip::span_out_of_bounds))]
	SpanOutOfBounds {
		start: usize,
		end: usize,
		len: usize,
	},

	#[error("overlapping splice at offset {offset}")]
	#[diagnostic(code(tstrip::overlapping_splice))]
	OverlappingSplice { offset: usize },
}

pub type TstripResult<T> = Result<T, TstripError>;

/// Error type surfaced by [`Transform`](crate::Transform) implementations.
pub type TransformFailure = Box<dyn std::error::Error + Send + Sync>;
