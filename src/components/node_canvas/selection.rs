//! Single-node selection tracking.
//!
//! At most one node is selected per canvas. Every change produces a
//! [`SelectionEvent`] that the canvas forwards to the inspector
//! observer, so the inspector never polls.

use super::model::{GraphError, NodeModel};
use super::types::NodeRecord;

/// Notification payload sent to the inspector observer.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionEvent {
	/// A node was selected; carries its full record.
	Selected(NodeRecord),
	/// Selection was cleared (background click, pan, or teardown).
	Cleared,
}

/// Tracks the selected node id, if any.
#[derive(Debug, Default)]
pub struct SelectionState {
	selected: Option<String>,
}

impl SelectionState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	pub fn is_selected(&self, id: &str) -> bool {
		self.selected.as_deref() == Some(id)
	}

	/// Select a node, replacing any prior selection.
	///
	/// The id must exist in the model: selection is only triggered from
	/// clicks on rendered nodes, so a miss is a caller bug surfaced as
	/// `NotFound` rather than tolerated.
	pub fn select(&mut self, id: &str, model: &NodeModel) -> Result<SelectionEvent, GraphError> {
		let record = model.get(id)?.clone();
		self.selected = Some(record.id.clone());
		Ok(SelectionEvent::Selected(record))
	}

	/// Clear the selection. Returns `None` when nothing was selected,
	/// so observers never see redundant events.
	pub fn clear(&mut self) -> Option<SelectionEvent> {
		self.selected.take().map(|_| SelectionEvent::Cleared)
	}

	/// Drop the selection if it references a node no longer present.
	/// Used after rebuilds, where the whole model is replaced.
	pub fn retain_valid(&mut self, model: &NodeModel) -> Option<SelectionEvent> {
		match &self.selected {
			Some(id) if !model.contains(id) => self.clear(),
			_ => None,
		}
	}
}
