//! node-graph-canvas: an interactive node-graph editing widget.
//!
//! This crate provides a WASM-based canvas component that renders
//! dialogue trees, text-block hierarchies, and ship-log graphs as
//! draggable nodes with directed connectors, plus pan/zoom and
//! single-node selection wired to external collaborators.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::node_canvas::{GraphDocument, NodeGraphCanvas, NodeRecord, SelectionEvent};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("node-graph-canvas: logging initialized");
}

/// Load a graph document from a script element with id="graph-data".
/// Expected format: JSON with { kind, nodes: [...] }.
fn load_graph_document() -> Option<GraphDocument> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<GraphDocument>(&json_text) {
		Ok(doc) => {
			info!("node-graph-canvas: loaded {} nodes", doc.len());
			Some(doc)
		}
		Err(e) => {
			warn!("node-graph-canvas: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads the graph document from the DOM and renders the editor canvas.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_document = load_graph_document().unwrap_or_default();
	let document_signal = Signal::derive(move || graph_document.clone());

	let on_selection = Callback::new(|event: SelectionEvent| match event {
		SelectionEvent::Selected(record) => {
			info!("selected {:?} ({})", record.id, record.label);
		}
		SelectionEvent::Cleared => info!("selection cleared"),
	});
	let on_moved = Callback::new(
		|(id, position): (String, components::node_canvas::geometry::Vec2)| {
			info!("node {id:?} moved to ({}, {})", position.x, position.y);
		},
	);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Node Graph Editor" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<NodeGraphCanvas
				document=document_signal
				fullscreen=true
				on_selection_changed=on_selection
				on_node_moved=on_moved
			/>
			<div class="graph-overlay">
				<h1>"Node Graph Editor"</h1>
				<p class="subtitle">"Drag nodes to reposition. Scroll to zoom. Drag background to pan."</p>
			</div>
		</div>
	}
}
