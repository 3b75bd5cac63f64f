//! Interactive node-graph editing canvas.
//!
//! Renders a graph of named nodes at stored positions on an HTML
//! canvas with:
//! - Pan, zoom, and drag-to-reposition with exclusive pointer capture
//! - One directed connector per edge resolved by the graph kind's
//!   [`resolver::EdgeResolver`] policy
//! - Single-node selection with change notifications for an external
//!   inspector
//! - Wholesale rebuild on data changes; edges naming unknown nodes are
//!   dropped rather than failing the rebuild
//!
//! # Example
//!
//! ```ignore
//! use node_graph_canvas::{GraphDocument, NodeGraphCanvas};
//!
//! let doc: GraphDocument = serde_json::from_str(
//!     r#"{ "kind": "ship_log", "nodes": [
//!         { "id": "village", "x": 0.0, "y": 0.0, "rumor_sources": ["statue"] },
//!         { "id": "statue", "x": 200.0, "y": 0.0 }
//!     ] }"#,
//! )?;
//!
//! view! { <NodeGraphCanvas document=doc.into() fullscreen=true /> }
//! ```

mod component;
pub mod connector;
pub mod geometry;
pub mod model;
mod render;
pub mod resolver;
pub mod scale;
pub mod selection;
pub mod state;
pub mod theme;
mod types;

pub use component::NodeGraphCanvas;
pub use selection::SelectionEvent;
pub use types::{DialogueNode, GraphDocument, NodeRecord, ShipLogNode, TextBlockNode};
