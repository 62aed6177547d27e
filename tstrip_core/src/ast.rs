use serde::Deserialize;
use serde::Serialize;

/// Byte range of a node within the enclosing document, together with the raw
/// slice it covers. Offsets are relative to the full document, not the
/// region; [`transpile_template`](crate::transpile_template) translates them
/// with its `offset` argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
	/// Start byte offset (inclusive).
	pub start: usize,
	/// End byte offset (exclusive).
	pub end: usize,
	/// The raw source text covered by this span.
	pub source: String,
}

impl Span {
	pub fn new(start: usize, end: usize, source: impl Into<String>) -> Self {
		Self {
			start,
			end,
			source: source.into(),
		}
	}
}

/// A node of the parsed template tree handed to the engine by the host's
/// document parser.
///
/// The set of kinds is closed on purpose: the walker matches exhaustively, so
/// adding a kind forces every match site to be revisited at compile time
/// instead of failing at runtime on an unknown tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplateNode {
	Root(RootNode),
	Element(ElementNode),
	Text(TextNode),
	Comment(CommentNode),
	SimpleExpression(SimpleExpressionNode),
	Interpolation(InterpolationNode),
	Attribute(AttributeNode),
	Binding(BindingNode),
	CompoundExpression(CompoundExpressionNode),
}

impl TemplateNode {
	/// The location of this node in the enclosing document.
	pub fn span(&self) -> &Span {
		match self {
			Self::Root(node) => &node.span,
			Self::Element(node) => &node.span,
			Self::Text(node) => &node.span,
			Self::Comment(node) => &node.span,
			Self::SimpleExpression(node) => &node.span,
			Self::Interpolation(node) => &node.span,
			Self::Attribute(node) => &node.span,
			Self::Binding(node) => &node.span,
			Self::CompoundExpression(node) => &node.span,
		}
	}

	pub fn kind(&self) -> NodeKind {
		match self {
			Self::Root(_) => NodeKind::Root,
			Self::Element(_) => NodeKind::Element,
			Self::Text(_) => NodeKind::Text,
			Self::Comment(_) => NodeKind::Comment,
			Self::SimpleExpression(_) => NodeKind::SimpleExpression,
			Self::Interpolation(_) => NodeKind::Interpolation,
			Self::Attribute(_) => NodeKind::Attribute,
			Self::Binding(_) => NodeKind::Binding,
			Self::CompoundExpression(_) => NodeKind::CompoundExpression,
		}
	}
}

/// Discriminant-only view of a [`TemplateNode`], useful for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
	Root,
	Element,
	Text,
	Comment,
	SimpleExpression,
	Interpolation,
	Attribute,
	Binding,
	CompoundExpression,
}

impl std::fmt::Display for NodeKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Root => write!(f, "root"),
			Self::Element => write!(f, "element"),
			Self::Text => write!(f, "text"),
			Self::Comment => write!(f, "comment"),
			Self::SimpleExpression => write!(f, "simple-expression"),
			Self::Interpolation => write!(f, "interpolation"),
			Self::Attribute => write!(f, "attribute"),
			Self::Binding => write!(f, "binding"),
			Self::CompoundExpression => write!(f, "compound-expression"),
		}
	}
}

/// The root of a parsed region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootNode {
	pub children: Vec<TemplateNode>,
	pub span: Span,
}

/// A markup element together with its attached attributes and bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
	pub tag: String,
	pub children: Vec<TemplateNode>,
	/// Attributes and bindings in declared order.
	pub props: Vec<TemplateNode>,
	pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
	pub content: String,
	pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentNode {
	pub content: String,
	pub span: Span,
}

/// A single embedded expression span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleExpressionNode {
	pub content: String,
	/// Marks a pure literal (no expression to transform). The walker skips
	/// literal spans entirely.
	pub literal: bool,
	pub span: Span,
}

/// A `{{ … }}`-style interpolation holding exactly one expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolationNode {
	pub content: Box<TemplateNode>,
	pub span: Span,
}

/// A plain attribute. Its value, when present, is the single held node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeNode {
	pub name: String,
	pub value: Option<Box<TemplateNode>>,
	pub span: Span,
}

/// A dynamic binding (`v-…`/directive-style). Iteration bindings decompose
/// into [`IterationParse`] instead of filling the single expression slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingNode {
	/// Binding name without its prefix, e.g. `if`, `for`, `slot`, `on`.
	pub name: String,
	pub expression: Option<Box<TemplateNode>>,
	pub iteration: Option<IterationParse>,
	pub modifiers: Vec<TemplateNode>,
	pub span: Span,
}

/// The decomposed form of an iteration binding:
/// `(item, key, index) of source`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationParse {
	pub source: Box<TemplateNode>,
	pub item: Option<Box<TemplateNode>>,
	pub key: Option<Box<TemplateNode>>,
	pub index: Option<Box<TemplateNode>>,
}

/// An expression assembled from several sub-fragments. When the parser has
/// resolved a combined form, the whole span is rewritten as one unit and the
/// fragments are never visited individually, which keeps recovered spans
/// disjoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundExpressionNode {
	/// Whether the parser produced a combined form for the whole span.
	pub resolved: bool,
	pub fragments: Vec<TemplateNode>,
	pub span: Span,
}
