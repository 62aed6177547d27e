use std::collections::HashMap;

use crate::error::TstripError;
use crate::error::TstripResult;
use crate::snippets::SnippetCategory;
use crate::snippets::classify;
use crate::walker::ExpressionRecord;

/// Source of the marker statement that separates batched probes.
///
/// The marker must survive the transformer unchanged (a plain call statement
/// does) and be unlikely to collide with snippet content. Injecting it as a
/// dependency lets tests supply a deterministic marker.
pub trait MarkerSource {
	/// Produce one marker statement, without surrounding newlines.
	fn marker(&self) -> String;
}

/// Default marker source: a call statement carrying a random 64-bit payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomMarker;

impl MarkerSource for RandomMarker {
	fn marker(&self) -> String {
		format!("splitter({});", rand::random::<u64>())
	}
}

/// Records sharing an identical (category, raw text) pair. The group is
/// transformed exactly once and every member receives the same result.
#[derive(Debug)]
pub struct DedupGroup {
	pub id: usize,
	pub category: SnippetCategory,
	/// Representative raw text, identical across all members.
	pub src: String,
	/// Indices into the record list produced by the walker.
	pub members: Vec<usize>,
}

/// Classify records and fold them into dedup groups, preserving first-seen
/// order.
pub fn dedup_records(records: &[ExpressionRecord<'_>]) -> Vec<DedupGroup> {
	let mut groups: Vec<DedupGroup> = Vec::new();
	let mut index: HashMap<String, usize> = HashMap::new();

	for (record_idx, record) in records.iter().enumerate() {
		let category = classify(record);
		let key = category.key(&record.src);

		if let Some(&group_idx) = index.get(&key) {
			groups[group_idx].members.push(record_idx);
			continue;
		}

		let id = groups.len();
		index.insert(key, id);
		groups.push(DedupGroup {
			id,
			category,
			src: record.src.clone(),
			members: vec![record_idx],
		});
	}

	groups
}

/// A batched transformer request: the concatenated probes plus the exact
/// separator needed to rebuild per-group segments from the response.
#[derive(Debug)]
pub struct BatchRequest {
	pub input: String,
	pub separator: String,
}

/// Concatenate the batchable groups' probes into one request, separated by a
/// fresh marker line.
pub fn build_batch_request(groups: &[&DedupGroup], marker: &dyn MarkerSource) -> BatchRequest {
	let separator = format!("\n{}\n", marker.marker());
	let input = groups
		.iter()
		.map(|group| group.category.prepare(&group.src, group.id))
		.collect::<Vec<_>>()
		.join(&separator);

	BatchRequest { input, separator }
}

/// Split a batch response back into per-group segments on the exact separator
/// used to build the request.
///
/// A count mismatch means the transformer altered the line structure, so
/// positional reassembly would attribute results to the wrong groups; that is
/// fatal for the document.
pub fn split_batch_output(
	output: &str,
	separator: &str,
	expected: usize,
) -> TstripResult<Vec<String>> {
	let segments: Vec<String> = output
		.split(separator)
		.map(str::trim)
		.filter(|segment| !segment.is_empty())
		.map(ToOwned::to_owned)
		.collect();

	if segments.len() != expected {
		return Err(TstripError::BatchSizeMismatch {
			expected,
			actual: segments.len(),
		});
	}

	Ok(segments)
}

/// Recover a group's inner text from its output segment. A miss is not fatal:
/// the group's members keep their original text, and the miss is logged so
/// hosts can surface it as a diagnostic.
pub fn recover_group(group: &DedupGroup, segment: &str) -> Option<String> {
	let recovered = group.category.parse(segment);
	if recovered.is_none() {
		tracing::warn!(
			group = group.id,
			category = %group.category,
			"probe shape not found in transformer output; keeping original text"
		);
	}
	recovered
}
