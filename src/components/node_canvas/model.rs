//! Insertion-ordered node storage keyed by id.

use std::collections::HashMap;
use std::fmt;

use super::geometry::Vec2;
use super::types::NodeRecord;

/// Lookup and mutation failures on the node model.
///
/// `NotFound` means a caller asked for an id that should exist (a
/// programming error at the call site); `DuplicateId` rejects an add
/// without merging. A resolver target missing from the model is
/// neither: the canvas drops that edge silently (see
/// `CanvasState::rebuild`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphError {
	NotFound(String),
	DuplicateId(String),
}

impl fmt::Display for GraphError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			GraphError::NotFound(id) => write!(f, "no node with id {id:?}"),
			GraphError::DuplicateId(id) => write!(f, "node id {id:?} already present"),
		}
	}
}

impl std::error::Error for GraphError {}

/// The set of nodes currently on the canvas.
///
/// Iteration order is insertion order; lookups go through an id index.
/// Rebuilt wholesale whenever the underlying data changes shape, so
/// there is no incremental diffing here.
#[derive(Debug, Default)]
pub struct NodeModel {
	nodes: Vec<NodeRecord>,
	index: HashMap<String, usize>,
}

impl NodeModel {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	pub fn get(&self, id: &str) -> Result<&NodeRecord, GraphError> {
		self.index
			.get(id)
			.map(|&i| &self.nodes[i])
			.ok_or_else(|| GraphError::NotFound(id.to_string()))
	}

	pub fn set_position(&mut self, id: &str, position: Vec2) -> Result<(), GraphError> {
		let &i = self
			.index
			.get(id)
			.ok_or_else(|| GraphError::NotFound(id.to_string()))?;
		self.nodes[i].position = position;
		Ok(())
	}

	pub fn add(&mut self, record: NodeRecord) -> Result<(), GraphError> {
		if self.index.contains_key(&record.id) {
			return Err(GraphError::DuplicateId(record.id));
		}
		self.index.insert(record.id.clone(), self.nodes.len());
		self.nodes.push(record);
		Ok(())
	}

	pub fn remove(&mut self, id: &str) -> Result<NodeRecord, GraphError> {
		let i = self
			.index
			.remove(id)
			.ok_or_else(|| GraphError::NotFound(id.to_string()))?;
		let record = self.nodes.remove(i);
		// Positions after the removed slot shift down by one.
		for idx in self.index.values_mut() {
			if *idx > i {
				*idx -= 1;
			}
		}
		Ok(record)
	}

	/// Iterate nodes in insertion order. The concrete slice iterator
	/// keeps double-ended iteration available for topmost-first hit
	/// testing.
	pub fn iter(&self) -> std::slice::Iter<'_, NodeRecord> {
		self.nodes.iter()
	}

	pub fn clear(&mut self) {
		self.nodes.clear();
		self.index.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn node(id: &str, x: f64) -> NodeRecord {
		NodeRecord::new(id, Vec2::new(x, 0.0), id.to_uppercase())
	}

	#[test]
	fn add_then_get() {
		let mut model = NodeModel::new();
		model.add(node("a", 1.0)).unwrap();
		assert_eq!(model.get("a").unwrap().label, "A");
		assert_eq!(
			model.get("b"),
			Err(GraphError::NotFound("b".to_string()))
		);
	}

	#[test]
	fn duplicate_add_is_rejected_not_merged() {
		let mut model = NodeModel::new();
		model.add(node("a", 1.0)).unwrap();
		let err = model.add(node("a", 99.0)).unwrap_err();
		assert_eq!(err, GraphError::DuplicateId("a".to_string()));
		assert_eq!(model.get("a").unwrap().position.x, 1.0);
	}

	#[test]
	fn iteration_keeps_insertion_order_after_remove() {
		let mut model = NodeModel::new();
		for id in ["a", "b", "c", "d"] {
			model.add(node(id, 0.0)).unwrap();
		}
		model.remove("b").unwrap();
		let order: Vec<&str> = model.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(order, vec!["a", "c", "d"]);
		// Index still resolves the shifted entries.
		assert_eq!(model.get("d").unwrap().id, "d");
	}

	#[test]
	fn iteration_is_double_ended() {
		let mut model = NodeModel::new();
		for id in ["a", "b", "c"] {
			model.add(node(id, 0.0)).unwrap();
		}
		let reversed: Vec<&str> = model.iter().rev().map(|n| n.id.as_str()).collect();
		assert_eq!(reversed, vec!["c", "b", "a"]);
	}

	#[test]
	fn set_position_mutates_only_position() {
		let mut model = NodeModel::new();
		model.add(node("a", 1.0)).unwrap();
		model.set_position("a", Vec2::new(5.0, 6.0)).unwrap();
		let n = model.get("a").unwrap();
		assert_eq!(n.position, Vec2::new(5.0, 6.0));
		assert_eq!(n.label, "A");
	}
}
