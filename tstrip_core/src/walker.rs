use crate::ast::Span;
use crate::ast::TemplateNode;

/// An embedded expression discovered during the walk, in document order.
#[derive(Debug, Clone)]
pub struct ExpressionRecord<'a> {
	/// Enclosing nodes from the root down to (and including) the node that
	/// produced this record.
	pub track: Vec<&'a TemplateNode>,
	/// Location of the expression in the enclosing document.
	pub span: Span,
	/// Raw expression text.
	pub src: String,
}

/// Walk the tree and collect every expression span that needs transforming,
/// in document order.
///
/// Literal simple expressions are skipped. A resolved compound expression
/// emits a single record covering its whole span and its fragments are not
/// recursed into, so no child record can overlap it.
pub fn collect_expressions(root: &TemplateNode) -> Vec<ExpressionRecord<'_>> {
	let mut records = Vec::new();
	visit(root, &[], &mut records);
	records
}

fn visit<'a>(
	node: &'a TemplateNode,
	track: &[&'a TemplateNode],
	records: &mut Vec<ExpressionRecord<'a>>,
) {
	// The ancestry track is rebuilt per call rather than shared: sibling
	// recursive calls must never observe each other's entries.
	let mut current = track.to_vec();
	current.push(node);

	match node {
		TemplateNode::Root(root) => {
			for child in &root.children {
				visit(child, &current, records);
			}
		}
		TemplateNode::Element(element) => {
			for child in element.children.iter().chain(element.props.iter()) {
				visit(child, &current, records);
			}
		}
		TemplateNode::Text(_) | TemplateNode::Comment(_) => {}
		TemplateNode::SimpleExpression(expression) => {
			if expression.literal {
				return;
			}
			records.push(ExpressionRecord {
				track: current,
				span: expression.span.clone(),
				src: expression.content.clone(),
			});
		}
		TemplateNode::Interpolation(interpolation) => {
			visit(&interpolation.content, &current, records);
		}
		TemplateNode::Attribute(attribute) => {
			if let Some(value) = &attribute.value {
				visit(value, &current, records);
			}
		}
		TemplateNode::Binding(binding) => {
			if let Some(iteration) = &binding.iteration {
				let parts = [
					Some(iteration.source.as_ref()),
					iteration.item.as_deref(),
					iteration.key.as_deref(),
					iteration.index.as_deref(),
				];
				for part in parts.into_iter().flatten() {
					visit(part, &current, records);
				}
			} else if let Some(expression) = &binding.expression {
				visit(expression, &current, records);
			}
			for modifier in &binding.modifiers {
				visit(modifier, &current, records);
			}
		}
		TemplateNode::CompoundExpression(compound) => {
			if !compound.resolved {
				return;
			}
			records.push(ExpressionRecord {
				track: current,
				span: compound.span.clone(),
				src: compound.span.source.clone(),
			});
		}
	}
}
