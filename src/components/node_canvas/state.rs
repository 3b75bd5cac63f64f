//! Canvas state: node model, connectors, viewport, and the pointer
//! interaction state machine.
//!
//! Everything here is host-agnostic and synchronous so the interaction
//! logic can be tested natively. The Leptos component layer owns the
//! actual DOM events and forwards them into these methods.

use std::rc::Rc;

use log::{debug, info, warn};

use super::connector::Connector;
use super::geometry::{self, Transform, Vec2};
use super::model::{GraphError, NodeModel};
use super::resolver::EdgeResolver;
use super::scale::ScaledValues;
use super::selection::{SelectionEvent, SelectionState};
use super::types::NodeRecord;

/// Pan offset and zoom applied to the whole canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub offset: Vec2,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0 by the wheel
	/// handler).
	pub zoom: f64,
}

impl Viewport {
	pub const IDENTITY: Viewport = Viewport {
		offset: Vec2::ZERO,
		zoom: 1.0,
	};

	pub fn transform(&self) -> Transform {
		Transform::new(self.offset, self.zoom)
	}
}

impl Default for Viewport {
	fn default() -> Self {
		Self::IDENTITY
	}
}

/// Tracks an in-progress node drag. While `node_id` is set the node
/// holds the pointer capture and nothing else may enter a captured
/// state for that pointer.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node_id: Option<String>,
	pub pointer_start: Vec2,
	pub node_start: Vec2,
	pub moved: bool,
}

/// Tracks an in-progress background pan.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub pointer_start: Vec2,
	pub offset_start: Vec2,
}

/// Explicit input-focus gate, independent of the host's native focus
/// event. The component opens it through a short deferred callback
/// after focus-gained and closes it immediately on focus-lost, so a
/// pointer-down that arrives during the focus transition is ignored
/// instead of starting an accidental drag.
#[derive(Clone, Copy, Debug, Default)]
pub struct FocusGate {
	open: bool,
}

impl FocusGate {
	pub fn open(&mut self) {
		self.open = true;
	}

	pub fn close(&mut self) {
		self.open = false;
	}

	pub fn is_open(&self) -> bool {
		self.open
	}
}

/// What a pointer-down resolved to. The component uses this to decide
/// whether to acquire pointer capture.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerPress {
	/// Canvas lacked input focus; the event was dropped entirely.
	Ignored,
	/// A node went from idle to captured (and became the selection).
	NodeCaptured(String),
	/// The background went from idle to captured for panning.
	PanCaptured,
}

type SelectionObserver = Rc<dyn Fn(&SelectionEvent)>;
type NodeMovedObserver = Rc<dyn Fn(&str, Vec2)>;

/// One open canvas: exclusive owner of its graph, viewport, selection,
/// and interaction state.
pub struct CanvasState {
	model: NodeModel,
	connectors: Vec<Connector>,
	pub viewport: Viewport,
	pub drag: DragState,
	pub pan: PanState,
	pub focus: FocusGate,
	selection: SelectionState,
	pub width: f64,
	pub height: f64,
	on_selection: Option<SelectionObserver>,
	on_node_moved: Option<NodeMovedObserver>,
}

impl CanvasState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			model: NodeModel::new(),
			connectors: Vec::new(),
			viewport: Viewport::IDENTITY,
			drag: DragState::default(),
			pan: PanState::default(),
			focus: FocusGate::default(),
			selection: SelectionState::new(),
			width,
			height,
			on_selection: None,
			on_node_moved: None,
		}
	}

	/// Register the inspector observer, notified on every selection
	/// change with the selected node's full record.
	pub fn set_selection_observer(&mut self, observer: SelectionObserver) {
		self.on_selection = Some(observer);
	}

	/// Register the data-provider callback that persists node moves
	/// once a drag completes.
	pub fn set_node_moved_observer(&mut self, observer: NodeMovedObserver) {
		self.on_node_moved = Some(observer);
	}

	pub fn model(&self) -> &NodeModel {
		&self.model
	}

	pub fn connectors(&self) -> &[Connector] {
		&self.connectors
	}

	pub fn node_count(&self) -> usize {
		self.model.len()
	}

	pub fn connector_count(&self) -> usize {
		self.connectors.len()
	}

	pub fn selected(&self) -> Option<&str> {
		self.selection.selected()
	}

	/// Replace the whole graph: clear-then-populate, so a failed or
	/// partial input can never leave stale visuals behind.
	///
	/// Duplicate ids keep the first record and log the rejects. Edge
	/// targets that name unknown nodes are dropped with a debug log;
	/// source data is allowed to be transiently inconsistent while the
	/// user edits, so this is recovery, not an error. The viewport
	/// resets to identity unless `preserve_viewport` is set.
	pub fn rebuild<I>(&mut self, records: I, resolver: &dyn EdgeResolver, preserve_viewport: bool)
	where
		I: IntoIterator<Item = NodeRecord>,
	{
		self.model.clear();
		self.connectors.clear();

		for record in records {
			if let Err(GraphError::DuplicateId(id)) = self.model.add(record) {
				warn!("rebuild: duplicate node id {id:?}, keeping first");
			}
		}

		let mut missing = 0usize;
		for node in self.model.iter() {
			for target_id in resolver.resolve_targets(&node.id) {
				match self.model.get(&target_id) {
					Ok(target) => {
						self.connectors.push(Connector::new(
							node.id.clone(),
							target_id,
							node.position,
							target.position,
						));
					}
					Err(_) => {
						missing += 1;
						debug!(
							"rebuild: edge {:?} -> {target_id:?} dropped, target not on canvas",
							node.id
						);
					}
				}
			}
		}

		if !preserve_viewport {
			self.viewport = Viewport::IDENTITY;
		}
		self.drag = DragState::default();
		self.pan = PanState::default();

		if let Some(event) = self.selection.retain_valid(&self.model) {
			self.notify_selection(&event);
		}

		info!(
			"rebuild: {} nodes, {} connectors ({missing} missing targets dropped)",
			self.model.len(),
			self.connectors.len()
		);
	}

	/// Frame the graph: put the bounding-box center of all nodes at the
	/// canvas center, keeping the current zoom.
	pub fn center_camera(&mut self) {
		let mut nodes = self.model.iter();
		let Some(first) = nodes.next() else {
			self.viewport.offset = Vec2::new(self.width / 2.0, self.height / 2.0);
			return;
		};
		let (mut min, mut max) = (first.position, first.position);
		for node in nodes {
			min.x = min.x.min(node.position.x);
			min.y = min.y.min(node.position.y);
			max.x = max.x.max(node.position.x);
			max.y = max.y.max(node.position.y);
		}
		let center = geometry::lerp(min, max, 0.5);
		self.viewport.offset = Vec2::new(
			self.width / 2.0 - center.x * self.viewport.zoom,
			self.height / 2.0 - center.y * self.viewport.zoom,
		);
	}

	pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
		self.viewport.transform().unapply(p)
	}

	/// Topmost node whose hit box contains the screen point. Later
	/// nodes draw over earlier ones, so scan from the end.
	pub fn node_at_position(&self, screen: Vec2, scale: &ScaledValues) -> Option<&NodeRecord> {
		let world = self.screen_to_world(screen);
		let mut hits = self.model.iter().rev().filter(|node| {
			(world.x - node.position.x).abs() <= scale.hit_half.x
				&& (world.y - node.position.y).abs() <= scale.hit_half.y
		});
		hits.next()
	}

	/// Select a node and notify the inspector. `NotFound` here is a
	/// caller bug: selection is only triggered from rendered nodes.
	pub fn select(&mut self, id: &str) -> Result<(), GraphError> {
		let event = self.selection.select(id, &self.model)?;
		self.notify_selection(&event);
		Ok(())
	}

	/// Clear the selection, notifying the inspector if anything was
	/// selected.
	pub fn clear_selection(&mut self) {
		if let Some(event) = self.selection.clear() {
			self.notify_selection(&event);
		}
	}

	/// Pointer-down entry to the interaction state machine.
	///
	/// Ignored entirely while the focus gate is closed. A hit node
	/// becomes both the capture target and the selection; the
	/// background clears the selection and starts a pan.
	pub fn pointer_down(&mut self, screen: Vec2, scale: &ScaledValues) -> PointerPress {
		if !self.focus.is_open() {
			debug!("pointer-down ignored, canvas not focused");
			return PointerPress::Ignored;
		}

		let hit = self
			.node_at_position(screen, scale)
			.map(|node| (node.id.clone(), node.position));
		if let Some((id, position)) = hit {
			self.drag = DragState {
				node_id: Some(id.clone()),
				pointer_start: screen,
				node_start: position,
				moved: false,
			};
			if let Err(err) = self.select(&id) {
				// Unreachable: the id came from the live model.
				warn!("selection failed for hit node: {err}");
			}
			PointerPress::NodeCaptured(id)
		} else {
			self.clear_selection();
			self.pan = PanState {
				active: true,
				pointer_start: screen,
				offset_start: self.viewport.offset,
			};
			PointerPress::PanCaptured
		}
	}

	/// Pointer-move while captured. Node drags re-orient only the
	/// connectors touching the dragged node; pans shift the viewport
	/// offset, which moves connectors for free since their geometry is
	/// world-space.
	pub fn pointer_move(&mut self, screen: Vec2) {
		if let Some(id) = self.drag.node_id.clone() {
			let delta = (screen - self.drag.pointer_start) / self.viewport.zoom;
			let position = self.drag.node_start + delta;
			if self.model.set_position(&id, position).is_ok() {
				self.drag.moved = true;
				for connector in self.connectors.iter_mut().filter(|c| c.touches(&id)) {
					connector.refresh(&self.model);
				}
			}
		} else if self.pan.active {
			self.viewport.offset = self.pan.offset_start + (screen - self.pan.pointer_start);
		}
	}

	/// Pointer-up or capture-lost: back to idle. A node drag that
	/// actually moved reports its final position to the data provider.
	pub fn pointer_up(&mut self) {
		if let Some(id) = self.drag.node_id.take() {
			if self.drag.moved {
				if let (Some(observer), Ok(node)) = (&self.on_node_moved, self.model.get(&id)) {
					observer(&id, node.position);
				}
			}
		}
		self.drag = DragState::default();
		self.pan = PanState::default();
	}

	/// Zoom about a screen point, keeping that point stationary.
	pub fn zoom_about(&mut self, screen: Vec2, factor: f64) {
		let new_zoom = (self.viewport.zoom * factor).clamp(0.1, 10.0);
		let ratio = new_zoom / self.viewport.zoom;
		self.viewport.offset = Vec2::new(
			screen.x - (screen.x - self.viewport.offset.x) * ratio,
			screen.y - (screen.y - self.viewport.offset.y) * ratio,
		);
		self.viewport.zoom = new_zoom;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Canvas teardown: drop the selection so the inspector releases
	/// any cached record.
	pub fn teardown(&mut self) {
		self.clear_selection();
	}

	fn notify_selection(&self, event: &SelectionEvent) {
		if let Some(observer) = &self.on_selection {
			observer(event);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::node_canvas::resolver::ShipLogResolver;
	use crate::components::node_canvas::scale::ScaleConfig;
	use pretty_assertions::assert_eq;
	use std::cell::RefCell;

	fn records(spec: &[(&str, f64, f64)]) -> Vec<NodeRecord> {
		spec.iter()
			.map(|(id, x, y)| NodeRecord::new(*id, Vec2::new(*x, *y), id.to_string()))
			.collect()
	}

	fn ship_log(edges: &[(&str, &[&str])]) -> ShipLogResolver {
		ShipLogResolver::new(edges.iter().map(|(id, sources)| {
			(
				id.to_string(),
				sources.iter().map(|s| s.to_string()).collect(),
			)
		}))
	}

	fn focused_canvas(w: f64, h: f64) -> CanvasState {
		let mut state = CanvasState::new(w, h);
		state.focus.open();
		state
	}

	#[test]
	fn rebuild_counts_nodes_and_connectors() {
		let mut state = focused_canvas(800.0, 600.0);
		let resolver = ship_log(&[("a", &["b"]), ("b", &[])]);
		state.rebuild(
			records(&[("a", 0.0, 0.0), ("b", 200.0, 0.0)]),
			&resolver,
			false,
		);
		assert_eq!(state.node_count(), 2);
		assert_eq!(state.connector_count(), 1);
		let c = &state.connectors()[0];
		assert_eq!((c.source_id.as_str(), c.target_id.as_str()), ("a", "b"));
		assert!((c.length - 200.0).abs() < 1e-9);
		assert!(c.angle.abs() < 1e-9, "due right means angle 0");
	}

	#[test]
	fn rebuild_is_idempotent() {
		let mut state = focused_canvas(800.0, 600.0);
		let resolver = ship_log(&[("a", &["b"]), ("b", &["a"])]);
		let input = records(&[("a", 1.0, 2.0), ("b", 3.0, 4.0)]);
		state.rebuild(input.clone(), &resolver, false);
		let first: Vec<Connector> = state.connectors().to_vec();
		let positions: Vec<Vec2> = state.model().iter().map(|n| n.position).collect();
		state.rebuild(input, &resolver, false);
		assert_eq!(state.connectors(), first.as_slice());
		let again: Vec<Vec2> = state.model().iter().map(|n| n.position).collect();
		assert_eq!(again, positions);
	}

	#[test]
	fn missing_targets_reduce_connector_count_without_failing() {
		let mut state = focused_canvas(800.0, 600.0);
		let resolver = ship_log(&[("a", &["b", "ghost", "phantom"])]);
		state.rebuild(
			records(&[("a", 0.0, 0.0), ("b", 10.0, 0.0)]),
			&resolver,
			false,
		);
		assert_eq!(state.connector_count(), 1, "two missing targets dropped");
	}

	#[test]
	fn duplicate_ids_keep_first_record() {
		let mut state = focused_canvas(800.0, 600.0);
		let resolver = ship_log(&[]);
		state.rebuild(
			records(&[("a", 1.0, 0.0), ("a", 99.0, 0.0)]),
			&resolver,
			false,
		);
		assert_eq!(state.node_count(), 1);
		assert_eq!(state.model().get("a").unwrap().position.x, 1.0);
	}

	#[test]
	fn hit_test_prefers_topmost_of_overlapping_nodes() {
		let mut state = focused_canvas(800.0, 600.0);
		let resolver = ship_log(&[]);
		// "under" and "over" overlap; "over" draws later, so it wins.
		state.rebuild(
			records(&[("under", 100.0, 100.0), ("over", 110.0, 100.0)]),
			&resolver,
			false,
		);
		let scale = ScaledValues::new(&ScaleConfig::default(), 1.0);
		let hit = state
			.node_at_position(Vec2::new(105.0, 100.0), &scale)
			.unwrap();
		assert_eq!(hit.id, "over");
	}

	#[test]
	fn drag_invariant_under_zoom() {
		let mut state = focused_canvas(800.0, 600.0);
		let resolver = ship_log(&[]);
		state.rebuild(records(&[("a", 10.0, 10.0)]), &resolver, false);
		state.viewport.zoom = 2.0;
		let scale = ScaledValues::new(&ScaleConfig::default(), state.viewport.zoom);

		// Node at world (10,10) with zoom 2 and no pan sits at screen
		// (20,20).
		let press = state.pointer_down(Vec2::new(20.0, 20.0), &scale);
		assert_eq!(press, PointerPress::NodeCaptured("a".to_string()));
		state.pointer_move(Vec2::new(40.0, 30.0));
		state.pointer_move(Vec2::new(100.0, 60.0));
		state.pointer_up();

		// final = start + (last - first) / zoom
		let expected = Vec2::new(10.0 + 80.0 / 2.0, 10.0 + 40.0 / 2.0);
		assert_eq!(state.model().get("a").unwrap().position, expected);
	}

	#[test]
	fn node_drag_reorients_touching_connectors() {
		let mut state = focused_canvas(800.0, 600.0);
		let resolver = ship_log(&[("a", &["b"])]);
		state.rebuild(
			records(&[("a", 0.0, 0.0), ("b", 100.0, 0.0)]),
			&resolver,
			false,
		);
		let scale = ScaledValues::new(&ScaleConfig::default(), 1.0);
		state.pointer_down(Vec2::new(0.0, 0.0), &scale);
		state.pointer_move(Vec2::new(0.0, 100.0));
		let c = &state.connectors()[0];
		assert_eq!(c.source, Vec2::new(0.0, 100.0));
		assert!((c.length - (2.0f64).sqrt() * 100.0).abs() < 1e-9);
	}

	#[test]
	fn completed_drag_reports_final_position() {
		let moves: Rc<RefCell<Vec<(String, Vec2)>>> = Rc::new(RefCell::new(Vec::new()));
		let sink = moves.clone();
		let mut state = focused_canvas(800.0, 600.0);
		state.set_node_moved_observer(Rc::new(move |id, pos| {
			sink.borrow_mut().push((id.to_string(), pos));
		}));
		let resolver = ship_log(&[]);
		state.rebuild(records(&[("a", 0.0, 0.0)]), &resolver, false);
		let scale = ScaledValues::new(&ScaleConfig::default(), 1.0);

		state.pointer_down(Vec2::ZERO, &scale);
		state.pointer_up();
		assert!(moves.borrow().is_empty(), "click without move persists nothing");

		state.pointer_down(Vec2::ZERO, &scale);
		state.pointer_move(Vec2::new(30.0, 0.0));
		state.pointer_up();
		assert_eq!(
			moves.borrow().as_slice(),
			&[("a".to_string(), Vec2::new(30.0, 0.0))]
		);
	}

	#[test]
	fn pointer_down_ignored_without_focus() {
		let mut state = CanvasState::new(800.0, 600.0);
		let resolver = ship_log(&[]);
		state.rebuild(records(&[("a", 0.0, 0.0)]), &resolver, false);
		let scale = ScaledValues::new(&ScaleConfig::default(), 1.0);
		assert_eq!(
			state.pointer_down(Vec2::ZERO, &scale),
			PointerPress::Ignored
		);
		assert!(state.drag.node_id.is_none());
		assert!(!state.pan.active);
	}

	#[test]
	fn selection_notifications_are_exact() {
		let events: Rc<RefCell<Vec<SelectionEvent>>> = Rc::new(RefCell::new(Vec::new()));
		let sink = events.clone();
		let mut state = focused_canvas(800.0, 600.0);
		state.set_selection_observer(Rc::new(move |event| {
			sink.borrow_mut().push(event.clone());
		}));
		let resolver = ship_log(&[]);
		state.rebuild(
			records(&[("a", 0.0, 0.0), ("b", 300.0, 0.0)]),
			&resolver,
			false,
		);

		state.select("a").unwrap();
		state.select("b").unwrap();
		let seen = events.borrow();
		assert_eq!(seen.len(), 2);
		match &seen[1] {
			SelectionEvent::Selected(record) => assert_eq!(record.id, "b"),
			other => panic!("expected Selected, got {other:?}"),
		}
		assert_eq!(state.selected(), Some("b"));
	}

	#[test]
	fn background_press_clears_selection_and_pans() {
		let events: Rc<RefCell<Vec<SelectionEvent>>> = Rc::new(RefCell::new(Vec::new()));
		let sink = events.clone();
		let mut state = focused_canvas(800.0, 600.0);
		state.set_selection_observer(Rc::new(move |event| {
			sink.borrow_mut().push(event.clone());
		}));
		let resolver = ship_log(&[]);
		state.rebuild(records(&[("a", 0.0, 0.0)]), &resolver, false);
		let scale = ScaledValues::new(&ScaleConfig::default(), 1.0);

		state.select("a").unwrap();
		let press = state.pointer_down(Vec2::new(400.0, 400.0), &scale);
		assert_eq!(press, PointerPress::PanCaptured);
		assert_eq!(state.selected(), None);
		assert_eq!(events.borrow().last(), Some(&SelectionEvent::Cleared));

		state.pointer_move(Vec2::new(410.0, 420.0));
		assert_eq!(state.viewport.offset, Vec2::new(10.0, 20.0));
		state.pointer_up();
		assert!(!state.pan.active);
	}

	#[test]
	fn zoom_about_keeps_anchor_fixed() {
		let mut state = focused_canvas(800.0, 600.0);
		let anchor = Vec2::new(120.0, 90.0);
		let world_before = state.screen_to_world(anchor);
		state.zoom_about(anchor, 1.1);
		state.zoom_about(anchor, 1.1);
		let world_after = state.screen_to_world(anchor);
		assert!((world_before.x - world_after.x).abs() < 1e-9);
		assert!((world_before.y - world_after.y).abs() < 1e-9);
	}

	#[test]
	fn center_camera_frames_bounding_box() {
		let mut state = focused_canvas(800.0, 600.0);
		let resolver = ship_log(&[]);
		state.rebuild(
			records(&[("a", 0.0, 0.0), ("b", 200.0, 100.0)]),
			&resolver,
			false,
		);
		state.center_camera();
		// Bounding-box center (100, 50) maps to the canvas center.
		let screen = state.viewport.transform().apply(Vec2::new(100.0, 50.0));
		assert_eq!(screen, Vec2::new(400.0, 300.0));
	}

	#[test]
	fn teardown_notifies_inspector_exactly_once() {
		let events: Rc<RefCell<Vec<SelectionEvent>>> = Rc::new(RefCell::new(Vec::new()));
		let sink = events.clone();
		let mut state = focused_canvas(800.0, 600.0);
		state.set_selection_observer(Rc::new(move |event| {
			sink.borrow_mut().push(event.clone());
		}));
		let resolver = ship_log(&[]);
		state.rebuild(records(&[("a", 0.0, 0.0)]), &resolver, false);
		state.select("a").unwrap();

		state.teardown();
		state.teardown();
		let seen = events.borrow();
		assert_eq!(seen.len(), 2, "one Selected, one Cleared");
		assert_eq!(seen[1], SelectionEvent::Cleared);
	}

	#[test]
	fn rebuild_clears_stale_selection_with_notification() {
		let events: Rc<RefCell<Vec<SelectionEvent>>> = Rc::new(RefCell::new(Vec::new()));
		let sink = events.clone();
		let mut state = focused_canvas(800.0, 600.0);
		state.set_selection_observer(Rc::new(move |event| {
			sink.borrow_mut().push(event.clone());
		}));
		let resolver = ship_log(&[]);
		state.rebuild(records(&[("a", 0.0, 0.0)]), &resolver, false);
		state.select("a").unwrap();
		state.rebuild(records(&[("b", 0.0, 0.0)]), &resolver, false);
		assert_eq!(state.selected(), None);
		assert_eq!(events.borrow().last(), Some(&SelectionEvent::Cleared));
	}
}
