//! Graph data structures for input to the node canvas.
//!
//! A [`GraphDocument`] is the wire shape handed over by the data
//! provider: one of three graph kinds, each node carrying its stored
//! position and the domain link fields its resolver reads.

use serde::Deserialize;

use super::geometry::Vec2;
use super::resolver::{DialogueResolver, EdgeResolver, ShipLogResolver, TextBlockResolver};

/// A positioned, labeled vertex as the canvas sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeRecord {
	/// Unique identifier within the graph.
	pub id: String,
	/// Stored position in world space.
	pub position: Vec2,
	/// Display label shown inside the node box.
	pub label: String,
}

impl NodeRecord {
	pub fn new(id: impl Into<String>, position: Vec2, label: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			position,
			label: label.into(),
		}
	}
}

/// A dialogue block: linear "next" link plus branching option targets.
#[derive(Clone, Debug, Deserialize)]
pub struct DialogueNode {
	pub id: String,
	/// Optional display label; the id is shown when absent.
	pub label: Option<String>,
	#[serde(default)]
	pub x: f64,
	#[serde(default)]
	pub y: f64,
	/// Block played after this one, if the dialogue continues linearly.
	pub next: Option<String>,
	/// Target block of each dialogue option. Empty strings mean the
	/// option ends the conversation and produce no edge.
	#[serde(default)]
	pub option_targets: Vec<String>,
}

/// A localized text block: at most one link, to its declared parent.
#[derive(Clone, Debug, Deserialize)]
pub struct TextBlockNode {
	pub id: String,
	pub label: Option<String>,
	#[serde(default)]
	pub x: f64,
	#[serde(default)]
	pub y: f64,
	/// Parent block id; `None` or empty for root blocks.
	pub parent: Option<String>,
}

/// A ship-log entry: one link per rumor-fact source reference.
#[derive(Clone, Debug, Deserialize)]
pub struct ShipLogNode {
	pub id: String,
	pub label: Option<String>,
	#[serde(default)]
	pub x: f64,
	#[serde(default)]
	pub y: f64,
	/// Entries this entry's rumor facts point back at.
	#[serde(default)]
	pub rumor_sources: Vec<String>,
}

/// Complete graph input, tagged by graph kind.
///
/// Expected JSON: `{ "kind": "dialogue", "nodes": [...] }` and
/// likewise for `"text_block"` and `"ship_log"`.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphDocument {
	Dialogue { nodes: Vec<DialogueNode> },
	TextBlock { nodes: Vec<TextBlockNode> },
	ShipLog { nodes: Vec<ShipLogNode> },
}

fn record(id: &str, label: &Option<String>, x: f64, y: f64) -> NodeRecord {
	NodeRecord {
		id: id.to_string(),
		position: Vec2::new(x, y),
		label: label.clone().unwrap_or_else(|| id.to_string()),
	}
}

impl GraphDocument {
	/// Flatten the document into canvas node records, insertion order
	/// preserved.
	pub fn node_records(&self) -> Vec<NodeRecord> {
		match self {
			GraphDocument::Dialogue { nodes } => nodes
				.iter()
				.map(|n| record(&n.id, &n.label, n.x, n.y))
				.collect(),
			GraphDocument::TextBlock { nodes } => nodes
				.iter()
				.map(|n| record(&n.id, &n.label, n.x, n.y))
				.collect(),
			GraphDocument::ShipLog { nodes } => nodes
				.iter()
				.map(|n| record(&n.id, &n.label, n.x, n.y))
				.collect(),
		}
	}

	/// Build the edge resolver matching this document's graph kind.
	pub fn resolver(&self) -> Box<dyn EdgeResolver> {
		match self {
			GraphDocument::Dialogue { nodes } => Box::new(DialogueResolver::new(
				nodes
					.iter()
					.map(|n| (n.id.clone(), n.next.clone(), n.option_targets.clone())),
			)),
			GraphDocument::TextBlock { nodes } => Box::new(TextBlockResolver::new(
				nodes.iter().map(|n| (n.id.clone(), n.parent.clone())),
			)),
			GraphDocument::ShipLog { nodes } => Box::new(ShipLogResolver::new(
				nodes.iter().map(|n| (n.id.clone(), n.rumor_sources.clone())),
			)),
		}
	}

	/// Node count across all kinds, for load diagnostics.
	pub fn len(&self) -> usize {
		match self {
			GraphDocument::Dialogue { nodes } => nodes.len(),
			GraphDocument::TextBlock { nodes } => nodes.len(),
			GraphDocument::ShipLog { nodes } => nodes.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Default for GraphDocument {
	fn default() -> Self {
		GraphDocument::Dialogue { nodes: Vec::new() }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn dialogue_document_parses_and_flattens() {
		let json = r#"{
			"kind": "dialogue",
			"nodes": [
				{ "id": "intro", "label": "Intro", "x": 10.0, "y": 20.0,
				  "next": "middle", "option_targets": ["end", ""] },
				{ "id": "middle", "next": null },
				{ "id": "end", "next": null }
			]
		}"#;
		let doc: GraphDocument = serde_json::from_str(json).unwrap();
		let records = doc.node_records();
		assert_eq!(records.len(), 3);
		assert_eq!(records[0].label, "Intro");
		assert_eq!(records[1].label, "middle", "label falls back to id");
		assert_eq!(records[0].position, Vec2::new(10.0, 20.0));

		let resolver = doc.resolver();
		let mut targets = resolver.resolve_targets("intro");
		targets.sort();
		assert_eq!(targets, vec!["end".to_string(), "middle".to_string()]);
	}

	#[test]
	fn ship_log_document_parses() {
		let json = r#"{
			"kind": "ship_log",
			"nodes": [
				{ "id": "village", "rumor_sources": ["statue"] },
				{ "id": "statue" }
			]
		}"#;
		let doc: GraphDocument = serde_json::from_str(json).unwrap();
		assert_eq!(doc.len(), 2);
		assert_eq!(
			doc.resolver().resolve_targets("village"),
			vec!["statue".to_string()]
		);
	}
}
