use crate::node::AttrMap;
use crate::node::InlineChild;
use crate::node::Node;
use crate::node::NodeKind;
use crate::node::ParseResult;

/// Parse Slim source into an ordered node sequence.
///
/// Each line produces zero or one node; blank lines produce none. The parser
/// is deliberately permissive: any line that matches no special prefix is
/// accepted as *some* tag, so parsing never fails for any input. Problems
/// worth surfacing (currently only unterminated quoted attribute values) are
/// collected as advisory diagnostics on the result.
pub fn parse(source: impl AsRef<str>) -> ParseResult {
	let source = source.as_ref();
	let mut nodes = Vec::new();
	let mut diagnostics = Vec::new();

	for (index, line) in source.split('\n').enumerate() {
		if let Some(node) = parse_line(line, index + 1, &mut diagnostics) {
			nodes.push(node);
		}
	}

	ParseResult { nodes, diagnostics }
}

/// Classify a single line. The prefix checks are ordered; several prefixes
/// overlap (`/!` vs `/`, `= ` vs a tag head containing `=`), so the order
/// *is* the disambiguation policy.
fn parse_line(line: &str, line_number: usize, diagnostics: &mut Vec<String>) -> Option<Node> {
	let trimmed = line.trim();
	if trimmed.is_empty() {
		return None;
	}

	let depth = line.chars().take_while(|c| c.is_whitespace()).count();

	if let Some(rest) = trimmed.strip_prefix("/!") {
		return Some(Node::new(NodeKind::HtmlComment(rest.trim().to_string()), depth));
	}
	if let Some(rest) = trimmed.strip_prefix('/') {
		return Some(Node::new(NodeKind::Comment(rest.trim().to_string()), depth));
	}
	if trimmed.starts_with("doctype") || trimmed.starts_with("!!!") {
		return Some(Node::new(NodeKind::Doctype(trimmed.to_string()), depth));
	}
	if let Some(rest) = trimmed.strip_prefix("= ") {
		return Some(Node::new(NodeKind::CodeExpression(rest.to_string()), depth));
	}
	if let Some(rest) = trimmed.strip_prefix("- ") {
		return Some(Node::new(NodeKind::CodeStatement(rest.to_string()), depth));
	}
	if let Some(rest) = trimmed.strip_prefix("| ") {
		return Some(Node::new(NodeKind::Text(rest.to_string()), depth));
	}
	// Raw HTML lines pass through untouched.
	if trimmed.starts_with('<') {
		return Some(Node::new(NodeKind::Text(trimmed.to_string()), depth));
	}

	Some(parse_tag(trimmed, depth, line_number, diagnostics))
}

/// Decompose a tag line into name, attributes, and an optional inline child.
fn parse_tag(
	trimmed: &str,
	depth: usize,
	line_number: usize,
	diagnostics: &mut Vec<String>,
) -> Node {
	// Inline expression form: the `=` must sit inside the head segment,
	// before any whitespace, e.g. `p= @user.name` or `h1.title= @page_title`.
	// An `=` later in the line belongs to an explicit attribute instead.
	let head_end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
	if let Some(eq) = trimmed.find('=') {
		if eq < head_end {
			let expression = trimmed[eq + 1..].trim();
			if !expression.is_empty() {
				let (name, attributes) = parse_head(&trimmed[..eq]);
				return Node::new(
					NodeKind::Tag {
						name,
						attributes,
						inline: Some(InlineChild::CodeExpression(expression.to_string())),
					},
					depth,
				);
			}
		}
	}

	let mut tokens = trimmed.split_whitespace();
	let head = tokens.next().unwrap_or_default();
	let rest = tokens.collect::<Vec<_>>().join(" ");

	let (name, mut attributes) = parse_head(head);
	let (explicit, leftover) = extract_attributes(&rest, line_number, diagnostics);

	for (key, value) in explicit {
		if key == "class" {
			// Shorthand classes come first, explicit classes are appended.
			let merged = attributes
				.get("class")
				.map(|shorthand| format!("{shorthand} {value}"));
			if let Some(merged) = merged {
				attributes.insert("class", merged);
				continue;
			}
		}
		attributes.insert(key, value);
	}

	let inline = if let Some(expression) = leftover.strip_prefix("= ") {
		Some(InlineChild::CodeExpression(expression.to_string()))
	} else if leftover.is_empty() {
		None
	} else {
		Some(InlineChild::Text(leftover))
	};

	Node::new(
		NodeKind::Tag {
			name,
			attributes,
			inline,
		},
		depth,
	)
}

/// Split a head segment (`div.container#main`) into a tag name and the
/// attributes contributed by its shorthand modifiers.
fn parse_head(head: &str) -> (String, AttrMap) {
	let name_len = tag_name_len(head);
	let name = if name_len == 0 {
		"div".to_string()
	} else {
		head[..name_len].to_string()
	};
	(name, parse_shortcuts(&head[name_len..]))
}

/// Length of the leading tag name: ASCII letters/digits starting with a
/// letter. Zero when the head starts with a shortcut (`.box`), which defaults
/// the tag name to `div`.
fn tag_name_len(head: &str) -> usize {
	let bytes = head.as_bytes();
	if bytes.first().is_none_or(|b| !b.is_ascii_alphabetic()) {
		return 0;
	}
	bytes
		.iter()
		.position(|b| !b.is_ascii_alphanumeric())
		.unwrap_or(bytes.len())
}

fn is_shortcut_byte(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}

/// Scan shorthand modifiers: every `.name` contributes to a space-joined
/// `class`, the first `#name` becomes `id`. Anything unrecognized is skipped.
fn parse_shortcuts(shortcuts: &str) -> AttrMap {
	let mut classes: Vec<&str> = Vec::new();
	let mut id: Option<&str> = None;

	let bytes = shortcuts.as_bytes();
	let mut i = 0;
	while i < bytes.len() {
		if bytes[i] == b'.' || bytes[i] == b'#' {
			let start = i + 1;
			let mut end = start;
			while end < bytes.len() && is_shortcut_byte(bytes[end]) {
				end += 1;
			}
			if end > start {
				let token = &shortcuts[start..end];
				if bytes[i] == b'.' {
					classes.push(token);
				} else if id.is_none() {
					id = Some(token);
				}
				i = end;
				continue;
			}
		}
		i += 1;
	}

	let mut attributes = AttrMap::new();
	if !classes.is_empty() {
		attributes.insert("class", classes.join(" "));
	}
	if let Some(id) = id {
		attributes.insert("id", id);
	}
	attributes
}

struct AttrMatch {
	key: String,
	value: String,
	len: usize,
	unterminated: bool,
}

/// Extract explicit `key="value"` / `key='value'` / `key=value` attributes
/// from the rest string by repeated left-to-right matching. Text that is not
/// part of any attribute is returned as the trimmed leftover.
fn extract_attributes(
	rest: &str,
	line_number: usize,
	diagnostics: &mut Vec<String>,
) -> (Vec<(String, String)>, String) {
	let mut attributes = Vec::new();
	let mut leftover = String::new();

	let mut i = 0;
	while i < rest.len() {
		if let Some(found) = match_attribute(&rest[i..]) {
			if found.unterminated {
				diagnostics.push(format!(
					"line {line_number}: unterminated quoted value for attribute `{}`",
					found.key
				));
			}
			attributes.push((found.key, found.value));
			i += found.len;
			continue;
		}
		match rest[i..].chars().next() {
			Some(ch) => {
				leftover.push(ch);
				i += ch.len_utf8();
			}
			None => break,
		}
	}

	(attributes, leftover.trim().to_string())
}

fn is_key_byte(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}

/// Try to match one attribute at the start of `s`. Whitespace is allowed
/// around the `=`. An opening quote with no closing quote is consumed as a
/// bare run instead, flagged as unterminated.
fn match_attribute(s: &str) -> Option<AttrMatch> {
	let bytes = s.as_bytes();

	let mut i = 0;
	while i < bytes.len() && is_key_byte(bytes[i]) {
		i += 1;
	}
	if i == 0 {
		return None;
	}
	let key_end = i;

	while i < bytes.len() && bytes[i].is_ascii_whitespace() {
		i += 1;
	}
	if i >= bytes.len() || bytes[i] != b'=' {
		return None;
	}
	i += 1;
	while i < bytes.len() && bytes[i].is_ascii_whitespace() {
		i += 1;
	}
	if i >= bytes.len() {
		return None;
	}

	let key = s[..key_end].to_string();
	let quote = bytes[i];
	if quote == b'"' || quote == b'\'' {
		let value_start = i + 1;
		if let Some(close) = s[value_start..].find(quote as char) {
			return Some(AttrMatch {
				key,
				value: s[value_start..value_start + close].to_string(),
				len: value_start + close + 1,
				unterminated: false,
			});
		}
		let end = bare_end(s, i);
		return Some(AttrMatch {
			key,
			value: s[i..end].to_string(),
			len: end,
			unterminated: true,
		});
	}

	let end = bare_end(s, i);
	Some(AttrMatch {
		key,
		value: s[i..end].to_string(),
		len: end,
		unterminated: false,
	})
}

/// End of a run of non-whitespace characters starting at `from`.
fn bare_end(s: &str, from: usize) -> usize {
	s[from..]
		.find(char::is_whitespace)
		.map_or(s.len(), |offset| from + offset)
}
