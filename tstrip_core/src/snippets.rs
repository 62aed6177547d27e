use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

use crate::ast::TemplateNode;
use crate::walker::ExpressionRecord;

static DEFAULT_PROBE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?s)^wrapper_\d+\((.*)\);$").expect("valid probe regex"));
static DESTRUCTURE_PROBE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?s)^const(.*?)=\s*wrapper_\d+\(\);$").expect("valid probe regex"));
static STATEMENTS_PROBE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?s)^function wrapper_\d+\(\)\s*\{(.*)\}$").expect("valid probe regex")
});

/// Syntactic categories for embedded snippets, in classification order.
///
/// Each category knows how to wrap a snippet in a probe so a generic
/// transformer can treat it as one complete, parseable fragment, and how to
/// recover the inner text from the transformed probe afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnippetCategory {
	/// A bare destructuring pattern (slot payload, or iteration
	/// item/key/index). Only parses as a complete statement, so it must never
	/// be merged into a multi-snippet batch.
	Destructure,
	/// A multi-statement handler body on an event-style binding. Wrapped in a
	/// synthetic zero-argument function so the statements parse as one unit.
	InlineStatements,
	/// Everything else, wrapped as a single call argument.
	Default,
}

impl SnippetCategory {
	/// Classification order. First match wins; [`Default`](Self::Default)
	/// always matches, so classification is total.
	pub const ORDERED: [Self; 3] = [Self::Destructure, Self::InlineStatements, Self::Default];

	/// Whether snippets of this category must be transformed in their own
	/// isolated request instead of the shared batch.
	pub fn standalone(self) -> bool {
		matches!(self, Self::Destructure)
	}

	pub fn matches(self, record: &ExpressionRecord<'_>) -> bool {
		match self {
			Self::Destructure => matches_destructure(record),
			Self::InlineStatements => matches_inline_statements(record),
			Self::Default => true,
		}
	}

	/// Dedup key: records with an identical key share one transformed result.
	pub fn key(self, src: &str) -> String {
		format!("{self}$:{src}")
	}

	/// Wrap a snippet in this category's probe. `id` ties the probe to its
	/// dedup group.
	pub fn prepare(self, src: &str, id: usize) -> String {
		match self {
			Self::Destructure => format!("const {src} = wrapper_{id}();"),
			Self::InlineStatements => format!("function wrapper_{id}() {{ {src} }}"),
			Self::Default => format!("wrapper_{id}({src});"),
		}
	}

	/// Recover the inner text from a transformed probe. `None` means the
	/// probe shape was not found in the output; the caller keeps the original
	/// text in that case.
	///
	/// The destructure and statements frames put their own whitespace around
	/// the capture, so those are trimmed. The default frame hugs the snippet
	/// exactly; its capture is kept verbatim, including any space padding a
	/// width-preserving transformer emitted at the edges.
	pub fn parse(self, output: &str) -> Option<String> {
		let (probe, trim_frame) = match self {
			Self::Destructure => (&DESTRUCTURE_PROBE, true),
			Self::InlineStatements => (&STATEMENTS_PROBE, true),
			Self::Default => (&DEFAULT_PROBE, false),
		};
		let captures = probe.captures(output)?;
		let inner = captures.get(1)?.as_str();
		Some(if trim_frame { inner.trim() } else { inner }.to_string())
	}
}

impl std::fmt::Display for SnippetCategory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Destructure => write!(f, "destructure"),
			Self::InlineStatements => write!(f, "statements"),
			Self::Default => write!(f, "default"),
		}
	}
}

/// Assign a record to the first category whose rule matches.
pub fn classify(record: &ExpressionRecord<'_>) -> SnippetCategory {
	SnippetCategory::ORDERED
		.into_iter()
		.find(|category| category.matches(record))
		.unwrap_or(SnippetCategory::Default)
}

/// A record is a destructuring pattern when it sits in a slot-binding payload
/// position, or in an iteration binding's item/key/index position. The
/// iteration source collection itself is an ordinary expression.
fn matches_destructure(record: &ExpressionRecord<'_>) -> bool {
	let [.., parent, node] = record.track.as_slice() else {
		return false;
	};
	let TemplateNode::Binding(binding) = parent else {
		return false;
	};

	if binding.name == "slot" {
		return true;
	}

	if binding.name == "for" {
		if let Some(iteration) = &binding.iteration {
			return !std::ptr::eq(*node, iteration.source.as_ref());
		}
	}

	false
}

/// A record is a multi-statement handler body when it is the value of an
/// event-style binding, is a plain inline expression (not an arrow function,
/// not a bare member access), and contains a statement separator.
fn matches_inline_statements(record: &ExpressionRecord<'_>) -> bool {
	let [.., parent, node] = record.track.as_slice() else {
		return false;
	};
	let TemplateNode::Binding(binding) = parent else {
		return false;
	};
	if binding.name != "on" {
		return false;
	}
	let Some(expression) = &binding.expression else {
		return false;
	};
	if !std::ptr::eq(*node, expression.as_ref()) {
		return false;
	}

	record.src.contains(';') && !record.src.contains("=>") && !is_member_path(&record.src)
}

/// A bare member access like `foo.bar` or `foo['bar']` — already a complete
/// expression, never a statement list. Quoted bracket indices are opaque, so
/// `handlers['a;b']` stays a member path.
fn is_member_path(src: &str) -> bool {
	let trimmed = src.trim();
	if trimmed.is_empty() {
		return false;
	}

	let mut quote: Option<char> = None;
	for c in trimmed.chars() {
		match quote {
			Some(open) => {
				if c == open {
					quote = None;
				}
			}
			None => match c {
				'\'' | '"' => quote = Some(c),
				c if c.is_alphanumeric() || matches!(c, '.' | '_' | '$' | '[' | ']') => {}
				_ => return false,
			},
		}
	}
	quote.is_none()
}
