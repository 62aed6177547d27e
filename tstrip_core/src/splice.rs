use crate::error::TstripError;
use crate::error::TstripResult;

#[derive(Debug, Clone)]
struct Edit {
	start: usize,
	end: usize,
	text: String,
}

/// Overwrite buffer over an original text.
///
/// Edits are indexed by the original byte offsets, so multiple disjoint
/// overwrites compose without re-deriving offsets after each edit. Untouched
/// ranges are copied through byte-identically.
#[derive(Debug)]
pub struct SpliceBuffer<'a> {
	source: &'a str,
	edits: Vec<Edit>,
}

impl<'a> SpliceBuffer<'a> {
	pub fn new(source: &'a str) -> Self {
		Self {
			source,
			edits: Vec::new(),
		}
	}

	/// Queue an overwrite of `start..end` (original offsets) with `text`.
	pub fn overwrite(&mut self, start: usize, end: usize, text: impl Into<String>) -> TstripResult<()> {
		if start > end || end > self.source.len() {
			return Err(TstripError::SpanOutOfBounds {
				start,
				end,
				len: self.source.len(),
			});
		}
		self.edits.push(Edit {
			start,
			end,
			text: text.into(),
		});
		Ok(())
	}

	/// Apply all queued edits. Overlapping edits are rejected: the walker
	/// guarantees disjoint spans, so an overlap signals a caller bug.
	pub fn finish(mut self) -> TstripResult<String> {
		self.edits.sort_by_key(|edit| edit.start);

		let mut result = String::with_capacity(self.source.len());
		let mut cursor = 0usize;
		for edit in &self.edits {
			if edit.start < cursor {
				return Err(TstripError::OverlappingSplice { offset: edit.start });
			}
			result.push_str(&self.source[cursor..edit.start]);
			result.push_str(&edit.text);
			cursor = edit.end;
		}
		result.push_str(&self.source[cursor..]);

		Ok(result)
	}
}

/// Find the symmetric quote delimiter enclosing `start..end`, if any.
///
/// The single non-whitespace character immediately before and the single
/// non-whitespace character immediately after the span must be the same quote
/// character. Spans not enclosed that way get no delimiter handling.
pub fn enclosing_delimiter(content: &str, start: usize, end: usize) -> Option<char> {
	let before = content[..start].chars().rev().find(|c| !c.is_whitespace())?;
	let after = content[end..].chars().find(|c| !c.is_whitespace())?;

	if before == after && (before == '"' || before == '\'') {
		Some(before)
	} else {
		None
	}
}

/// Rewrite `replacement` so it stays syntactically valid inside
/// `delimiter`-quoted text.
///
/// The transformer may emit string literals quoted with the enclosing
/// delimiter (and strips escape characters while doing so), which would
/// terminate the quoted value early. Escape literal occurrences of the
/// opposite quote first, then substitute the enclosing quote with the
/// opposite.
pub fn swap_delimiters(replacement: &str, delimiter: char) -> String {
	if !replacement.contains(delimiter) {
		return replacement.to_string();
	}

	let opposite = if delimiter == '"' { '\'' } else { '"' };
	replacement
		.replace(opposite, &format!("\\{opposite}"))
		.replace(delimiter, &opposite.to_string())
}
