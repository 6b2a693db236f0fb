use serde::Deserialize;
use serde::Serialize;

/// One parsed unit of input. `depth` is the number of leading whitespace
/// characters on the line that produced the node; the generator reconstructs
/// block nesting entirely from depth comparisons between consecutive nodes,
/// so no parent or child links are stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
	pub kind: NodeKind,
	pub depth: usize,
}

impl Node {
	pub fn new(kind: NodeKind, depth: usize) -> Self {
		Self { kind, depth }
	}
}

/// The closed set of node kinds a line can produce. Matched exhaustively by
/// the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum NodeKind {
	/// An element line, e.g. `div.container#main href="/x" Hello`.
	Tag {
		name: String,
		attributes: AttrMap,
		/// Content placed on the same source line as the tag. Block-nested
		/// children are *not* stored here; they follow as sibling nodes at a
		/// greater depth.
		inline: Option<InlineChild>,
	},
	/// Plain text, from a `| ` line or a raw `<...>` HTML passthrough line.
	Text(String),
	/// A Ruby statement from a `- ` line, emitted as `<% ... %>`.
	CodeStatement(String),
	/// A Ruby expression from a `= ` line, emitted as `<%= ... %>`.
	CodeExpression(String),
	/// A `/ ` comment, emitted as `<%# ... %>` when comments are enabled.
	Comment(String),
	/// A `/! ` comment, always emitted as `<!-- ... -->`.
	HtmlComment(String),
	/// A `doctype` or `!!!` line; carries the full trimmed source line.
	Doctype(String),
}

/// Inline content sharing the tag's source line. At most one per tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum InlineChild {
	Text(String),
	CodeExpression(String),
}

/// An attribute map that preserves first-insertion order. Updating an
/// existing key keeps its original position, so merged shorthand and explicit
/// attributes render deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrMap {
	entries: Vec<(String, String)>,
}

impl AttrMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert or update a value. Existing keys are updated in place.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let key = key.into();
		let value = value.into();
		if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
			entry.1 = value;
		} else {
			self.entries.push((key, value));
		}
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.entries
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttrMap {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut map = Self::new();
		for (key, value) in iter {
			map.insert(key, value);
		}
		map
	}
}

/// The node sequence produced by [`parse`](crate::parse) together with any
/// advisory diagnostics. Parsing never stops at the first problem; the
/// diagnostics never prevent generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
	pub nodes: Vec<Node>,
	pub diagnostics: Vec<String>,
}
