use std::future::Future;

use futures::future::try_join;
use futures::future::try_join_all;

use crate::ast::TemplateNode;
use crate::batch::DedupGroup;
use crate::batch::MarkerSource;
use crate::batch::RandomMarker;
use crate::batch::build_batch_request;
use crate::batch::dedup_records;
use crate::batch::recover_group;
use crate::batch::split_batch_output;
use crate::error::TransformFailure;
use crate::error::TstripError;
use crate::error::TstripResult;
use crate::splice::SpliceBuffer;
use crate::splice::enclosing_delimiter;
use crate::splice::swap_delimiters;
use crate::walker::ExpressionRecord;
use crate::walker::collect_expressions;

/// The external expression transformer.
///
/// Receives one complete, parseable fragment and returns its transformed
/// text. The engine treats it as an opaque collaborator: it may be slow,
/// asynchronous, or remote, and it is responsible for its own timeouts. A
/// failure aborts the whole document; the engine never retries.
pub trait Transform {
	fn transform(&self, code: String) -> impl Future<Output = Result<String, TransformFailure>> + Send;
}

impl<F, Fut> Transform for F
where
	F: Fn(String) -> Fut,
	Fut: Future<Output = Result<String, TransformFailure>> + Send,
{
	fn transform(&self, code: String) -> impl Future<Output = Result<String, TransformFailure>> + Send {
		self(code)
	}
}

/// Rewrite every embedded expression in `content` through `transform`,
/// preserving every byte outside the replaced spans.
///
/// `offset` translates tree positions (relative to a possibly larger
/// enclosing document) into `content`-relative positions. The engine holds no
/// state across calls: it is a pure function of its arguments, and the
/// transformer is its only suspension point.
pub async fn transpile_template(
	content: &str,
	root: &TemplateNode,
	offset: usize,
	transform: &impl Transform,
) -> TstripResult<String> {
	transpile_template_with_marker(content, root, offset, transform, &RandomMarker).await
}

/// Like [`transpile_template`], but with an explicit [`MarkerSource`] so
/// callers can make batch separators deterministic.
pub async fn transpile_template_with_marker(
	content: &str,
	root: &TemplateNode,
	offset: usize,
	transform: &impl Transform,
	marker: &impl MarkerSource,
) -> TstripResult<String> {
	let records = collect_expressions(root);
	if records.is_empty() {
		return Ok(content.to_string());
	}

	let groups = dedup_records(&records);
	let (batch, standalone): (Vec<&DedupGroup>, Vec<&DedupGroup>) = groups
		.iter()
		.partition(|group| !group.category.standalone());

	tracing::debug!(
		records = records.len(),
		groups = groups.len(),
		batched = batch.len(),
		standalone = standalone.len(),
		"transforming embedded expressions"
	);

	let batch_request = (!batch.is_empty()).then(|| build_batch_request(&batch, marker));

	// Fan-out: the batch request and every standalone request are issued
	// together; no ordering dependency exists between them.
	let batch_future = async {
		match &batch_request {
			Some(request) => {
				let output = transform
					.transform(request.input.clone())
					.await
					.map_err(|error| TstripError::Transform {
						reason: error.to_string(),
					})?;
				Ok::<Option<String>, TstripError>(Some(output))
			}
			None => Ok(None),
		}
	};
	let standalone_futures = standalone.iter().map(|group| {
		let prepared = group.category.prepare(&group.src, group.id);
		async move {
			transform
				.transform(prepared)
				.await
				.map_err(|error| TstripError::Transform {
					reason: error.to_string(),
				})
		}
	});

	// Fan-in: join everything before unwrapping.
	let (batch_output, standalone_outputs) =
		try_join(batch_future, try_join_all(standalone_futures)).await?;

	let mut replacements: Vec<Option<String>> = vec![None; records.len()];

	if let (Some(output), Some(request)) = (&batch_output, &batch_request) {
		let segments = split_batch_output(output, &request.separator, batch.len())?;
		for (group, segment) in batch.iter().zip(&segments) {
			apply_recovery(group, segment, &mut replacements);
		}
	}
	for (group, output) in standalone.iter().zip(&standalone_outputs) {
		apply_recovery(group, output.trim(), &mut replacements);
	}

	splice_replacements(content, offset, &records, &replacements)
}

/// Share a group's recovered text with every member record.
fn apply_recovery(group: &DedupGroup, segment: &str, replacements: &mut [Option<String>]) {
	if let Some(recovered) = recover_group(group, segment) {
		for &member in &group.members {
			replacements[member] = Some(recovered.clone());
		}
	}
}

fn splice_replacements(
	content: &str,
	offset: usize,
	records: &[ExpressionRecord<'_>],
	replacements: &[Option<String>],
) -> TstripResult<String> {
	let mut buffer = SpliceBuffer::new(content);

	for (record, replacement) in records.iter().zip(replacements) {
		// Reported offsets are translated into content coordinates so they
		// line up with `len`.
		let out_of_bounds = || TstripError::SpanOutOfBounds {
			start: record.span.start.saturating_sub(offset),
			end: record.span.end.saturating_sub(offset),
			len: content.len(),
		};
		let start = record.span.start.checked_sub(offset).ok_or_else(out_of_bounds)?;
		let end = record.span.end.checked_sub(offset).ok_or_else(out_of_bounds)?;
		if start > end || end > content.len() {
			return Err(out_of_bounds());
		}

		let mut replacement = replacement.clone().unwrap_or_else(|| record.src.clone());
		if let Some(delimiter) = enclosing_delimiter(content, start, end) {
			replacement = swap_delimiters(&replacement, delimiter);
		}

		// Byte-identity outside edits: an unchanged span is never rewritten.
		if replacement == record.src {
			continue;
		}
		buffer.overwrite(start, end, replacement)?;
	}

	buffer.finish()
}
