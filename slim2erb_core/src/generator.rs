use serde::Deserialize;
use serde::Serialize;

use crate::node::AttrMap;
use crate::node::InlineChild;
use crate::node::Node;
use crate::node::NodeKind;

/// HTML elements that take no closing tag. Emitted as `<name attrs>` and
/// never pushed onto the open-tag stack.
const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
	"track", "wbr",
];

/// Ruby keywords that continue an already-open statement block rather than
/// starting a new one. A `- else` at the depth of an open block keeps that
/// block open instead of closing it with `<% end %>`.
const CONTINUATION_KEYWORDS: &[&str] = &["else", "elsif", "when", "in", "rescue", "ensure"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorOptions {
	/// Spaces emitted per column of source indentation. Depth is the raw
	/// count of leading whitespace characters, so `1` preserves the source
	/// indentation and larger values scale it up.
	pub indent_size: usize,
	/// Whether `/` comments are emitted as `<%# ... %>`. HTML comments from
	/// `/!` lines are content and are always emitted.
	pub emit_comments: bool,
}

impl Default for GeneratorOptions {
	fn default() -> Self {
		Self {
			indent_size: 1,
			emit_comments: true,
		}
	}
}

/// What an open stack entry will close with: a `</name>` tag or `<% end %>`.
#[derive(Debug)]
enum OpenKind {
	Tag(String),
	Code,
}

#[derive(Debug)]
struct OpenEntry {
	kind: OpenKind,
	depth: usize,
}

/// Walks a parsed node sequence and emits ERB, reconstructing explicit
/// open/close nesting from the depth carried by each node.
///
/// The generator holds only its options; every [`generate`](Self::generate)
/// call builds and discards its own output buffer and tag stack, so separate
/// calls are independent. It never panics for any node sequence the parser
/// can produce.
#[derive(Debug, Default)]
pub struct ErbGenerator {
	options: GeneratorOptions,
}

impl ErbGenerator {
	pub fn new(options: GeneratorOptions) -> Self {
		Self { options }
	}

	pub fn generate(&self, nodes: &[Node]) -> String {
		let mut output: Vec<String> = Vec::new();
		let mut stack: Vec<OpenEntry> = Vec::new();

		for (index, node) in nodes.iter().enumerate() {
			let next = nodes.get(index + 1);
			self.emit_node(node, next, &mut output, &mut stack);

			// A tag stays open only while the following node is strictly
			// deeper; everything at or below the next node's depth closes
			// here, before that node is emitted.
			if let Some(next) = next {
				self.close_to(next, &mut output, &mut stack);
			}
		}

		while let Some(entry) = stack.pop() {
			output.push(self.closing_line(&entry));
		}

		output.join("\n")
	}

	fn emit_node(
		&self,
		node: &Node,
		next: Option<&Node>,
		output: &mut Vec<String>,
		stack: &mut Vec<OpenEntry>,
	) {
		let indent = self.indent(node.depth);
		let opens_block = next.is_some_and(|n| n.depth > node.depth);

		match &node.kind {
			NodeKind::Tag {
				name,
				attributes,
				inline,
			} => {
				let attrs = format_attributes(attributes);
				match inline {
					Some(InlineChild::Text(text)) => {
						output.push(format!("{indent}<{name}{attrs}>{text}</{name}>"));
					}
					Some(InlineChild::CodeExpression(expression)) => {
						output.push(format!("{indent}<{name}{attrs}><%= {expression} %></{name}>"));
					}
					None if VOID_ELEMENTS.contains(&name.as_str()) => {
						output.push(format!("{indent}<{name}{attrs}>"));
					}
					None if opens_block => {
						output.push(format!("{indent}<{name}{attrs}>"));
						stack.push(OpenEntry {
							kind: OpenKind::Tag(name.clone()),
							depth: node.depth,
						});
					}
					None => {
						output.push(format!("{indent}<{name}{attrs}></{name}>"));
					}
				}
			}
			NodeKind::Text(content) => {
				output.push(format!("{indent}{content}"));
			}
			NodeKind::CodeStatement(content) => {
				output.push(format!("{indent}<% {content} %>"));
				// A continuation keyword at the depth of an open code block
				// keeps that block's entry; pushing again would emit a
				// second `<% end %>`.
				let continued = is_continuation(content)
					&& stack
						.last()
						.is_some_and(|top| top.depth == node.depth && matches!(top.kind, OpenKind::Code));
				if opens_block && !continued {
					stack.push(OpenEntry {
						kind: OpenKind::Code,
						depth: node.depth,
					});
				}
			}
			NodeKind::CodeExpression(content) => {
				output.push(format!("{indent}<%= {content} %>"));
			}
			NodeKind::Comment(content) => {
				if self.options.emit_comments {
					output.push(format!("{indent}<%# {content} %>"));
				}
			}
			NodeKind::HtmlComment(content) => {
				output.push(format!("{indent}<!-- {content} -->"));
			}
			NodeKind::Doctype(content) => {
				if content == "doctype html" || content == "!!! 5" {
					output.push("<!DOCTYPE html>".to_string());
				} else {
					output.push(format!("<!DOCTYPE {content}>"));
				}
			}
		}
	}

	/// Close every open entry whose depth is not less than the next node's
	/// depth. When the next node continues an open statement block (`- else`
	/// and friends), the block entry at that depth survives.
	fn close_to(&self, next: &Node, output: &mut Vec<String>, stack: &mut Vec<OpenEntry>) {
		let continues = matches!(&next.kind, NodeKind::CodeStatement(content) if is_continuation(content));

		while let Some(top) = stack.last() {
			if top.depth < next.depth {
				break;
			}
			if continues && top.depth == next.depth && matches!(top.kind, OpenKind::Code) {
				break;
			}
			if let Some(entry) = stack.pop() {
				output.push(self.closing_line(&entry));
			}
		}
	}

	fn closing_line(&self, entry: &OpenEntry) -> String {
		let indent = self.indent(entry.depth);
		match &entry.kind {
			OpenKind::Tag(name) => format!("{indent}</{name}>"),
			OpenKind::Code => format!("{indent}<% end %>"),
		}
	}

	fn indent(&self, depth: usize) -> String {
		" ".repeat(depth * self.options.indent_size)
	}
}

fn is_continuation(content: &str) -> bool {
	content
		.split_whitespace()
		.next()
		.is_some_and(|keyword| CONTINUATION_KEYWORDS.contains(&keyword))
}

/// Render attributes in insertion order. Values equal to the empty string or
/// to their own key render as bare boolean attributes; embedded double quotes
/// are escaped as `&quot;`.
fn format_attributes(attributes: &AttrMap) -> String {
	if attributes.is_empty() {
		return String::new();
	}

	let rendered: Vec<String> = attributes
		.iter()
		.map(|(key, value)| {
			if value.is_empty() || value == key {
				key.to_string()
			} else {
				format!("{key}=\"{}\"", value.replace('"', "&quot;"))
			}
		})
		.collect();

	format!(" {}", rendered.join(" "))
}
