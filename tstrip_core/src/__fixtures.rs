use std::future::Future;
use std::sync::Arc;
use std::sync::Mutex;

use crate::AttributeNode;
use crate::BindingNode;
use crate::CommentNode;
use crate::CompoundExpressionNode;
use crate::ElementNode;
use crate::InterpolationNode;
use crate::IterationParse;
use crate::MarkerSource;
use crate::RootNode;
use crate::SimpleExpressionNode;
use crate::Span;
use crate::TemplateNode;
use crate::TextNode;
use crate::Transform;
use crate::TransformFailure;

pub fn span(start: usize, end: usize, source: &str) -> Span {
	Span::new(start, end, source)
}

/// A non-literal expression node whose span starts at `start`.
pub fn expr(content: &str, start: usize) -> TemplateNode {
	TemplateNode::SimpleExpression(SimpleExpressionNode {
		content: content.to_string(),
		literal: false,
		span: span(start, start + content.len(), content),
	})
}

pub fn literal_expr(content: &str, start: usize) -> TemplateNode {
	TemplateNode::SimpleExpression(SimpleExpressionNode {
		content: content.to_string(),
		literal: true,
		span: span(start, start + content.len(), content),
	})
}

pub fn text(content: &str, start: usize) -> TemplateNode {
	TemplateNode::Text(TextNode {
		content: content.to_string(),
		span: span(start, start + content.len(), content),
	})
}

pub fn comment(content: &str, start: usize) -> TemplateNode {
	TemplateNode::Comment(CommentNode {
		content: content.to_string(),
		span: span(start, start + content.len(), content),
	})
}

pub fn interpolation(content: TemplateNode) -> TemplateNode {
	let node_span = content.span().clone();
	TemplateNode::Interpolation(InterpolationNode {
		content: Box::new(content),
		span: node_span,
	})
}

pub fn attribute(name: &str, value: Option<TemplateNode>) -> TemplateNode {
	let node_span = value
		.as_ref()
		.map_or_else(|| span(0, 0, ""), |v| v.span().clone());
	TemplateNode::Attribute(AttributeNode {
		name: name.to_string(),
		value: value.map(Box::new),
		span: node_span,
	})
}

pub fn binding(name: &str, expression: TemplateNode) -> TemplateNode {
	let node_span = expression.span().clone();
	TemplateNode::Binding(BindingNode {
		name: name.to_string(),
		expression: Some(Box::new(expression)),
		iteration: None,
		modifiers: vec![],
		span: node_span,
	})
}

pub fn iteration_binding(
	source: TemplateNode,
	item: Option<TemplateNode>,
	key: Option<TemplateNode>,
	index: Option<TemplateNode>,
) -> TemplateNode {
	let node_span = source.span().clone();
	TemplateNode::Binding(BindingNode {
		name: "for".to_string(),
		expression: None,
		iteration: Some(IterationParse {
			source: Box::new(source),
			item: item.map(Box::new),
			key: key.map(Box::new),
			index: index.map(Box::new),
		}),
		modifiers: vec![],
		span: node_span,
	})
}

pub fn compound(resolved: bool, fragments: Vec<TemplateNode>, node_span: Span) -> TemplateNode {
	TemplateNode::CompoundExpression(CompoundExpressionNode {
		resolved,
		fragments,
		span: node_span,
	})
}

pub fn element(children: Vec<TemplateNode>, props: Vec<TemplateNode>) -> TemplateNode {
	TemplateNode::Element(ElementNode {
		tag: "div".to_string(),
		children,
		props,
		span: span(0, 0, ""),
	})
}

pub fn root(children: Vec<TemplateNode>) -> TemplateNode {
	TemplateNode::Root(RootNode {
		children,
		span: span(0, 0, ""),
	})
}

/// Root -> element -> one binding whose expression is `src`, located at its
/// first occurrence inside `content`.
pub fn single_binding_doc(content: &str, name: &str, src: &str) -> TemplateNode {
	let start = content.find(src).expect("snippet present in content");
	root(vec![element(vec![], vec![binding(name, expr(src, start))])])
}

/// Root -> element -> two bindings sharing the same expression text, located
/// at its first and last occurrences inside `content`.
pub fn two_binding_doc(content: &str, first: &str, second: &str, src: &str) -> TemplateNode {
	let start = content.find(src).expect("snippet present in content");
	let rstart = content.rfind(src).expect("snippet present twice in content");
	assert_ne!(start, rstart, "content must contain the snippet twice");
	root(vec![element(vec![], vec![
		binding(first, expr(src, start)),
		binding(second, expr(src, rstart)),
	])])
}

/// Deterministic marker for batch-request assertions.
pub struct FixedMarker(pub &'static str);

impl MarkerSource for FixedMarker {
	fn marker(&self) -> String {
		self.0.to_string()
	}
}

/// Transformer that returns its input unchanged.
pub struct Identity;

impl Transform for Identity {
	fn transform(&self, code: String) -> impl Future<Output = Result<String, TransformFailure>> + Send {
		async move { Ok(code) }
	}
}

/// Strips `as any` casts, padding the removed width with spaces so every
/// other byte keeps its offset.
pub struct StripAsAny;

impl Transform for StripAsAny {
	fn transform(&self, code: String) -> impl Future<Output = Result<String, TransformFailure>> + Send {
		async move { Ok(code.replace(" as any", "       ")) }
	}
}

/// Strips `as any` casts and normalizes single-quoted strings to double
/// quotes, the way a real emitter would.
pub struct StripAndDoubleQuote;

impl Transform for StripAndDoubleQuote {
	fn transform(&self, code: String) -> impl Future<Output = Result<String, TransformFailure>> + Send {
		async move { Ok(code.replace(" as any", "       ").replace('\'', "\"")) }
	}
}

/// Records every request it receives, then behaves as identity.
#[derive(Clone, Default)]
pub struct Recorder {
	pub requests: Arc<Mutex<Vec<String>>>,
}

impl Transform for Recorder {
	fn transform(&self, code: String) -> impl Future<Output = Result<String, TransformFailure>> + Send {
		let requests = Arc::clone(&self.requests);
		async move {
			requests.lock().unwrap().push(code.clone());
			Ok(code)
		}
	}
}

/// Fails every request.
pub struct Failing;

impl Transform for Failing {
	fn transform(&self, _code: String) -> impl Future<Output = Result<String, TransformFailure>> + Send {
		async move { Err::<String, TransformFailure>("transformer exploded".into()) }
	}
}

/// Replaces the whole request with unrelated output, destroying the batch
/// line structure.
pub struct Garbling;

impl Transform for Garbling {
	fn transform(&self, _code: String) -> impl Future<Output = Result<String, TransformFailure>> + Send {
		async move { Ok("var unrelated = 1;".to_string()) }
	}
}
