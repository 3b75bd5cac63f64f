//! Leptos component wrapping the node-graph canvas.
//!
//! The component creates an HTML canvas element and wires up pointer,
//! wheel, and window focus events. Pointer capture makes a drag
//! exclusive to the element that started it; a short deferred callback
//! gates input after the window regains focus so a click that lands
//! mid-transition cannot start an edit. A `requestAnimationFrame` loop
//! redraws every frame.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, PointerEvent, WheelEvent, Window};

use super::geometry::Vec2;
use super::render;
use super::scale::{ScaleConfig, ScaledValues};
use super::selection::SelectionEvent;
use super::state::{CanvasState, PointerPress};
use super::theme::Theme;
use super::types::GraphDocument;

/// Delay before the focus gate opens after the window gains focus.
/// Long enough to swallow the click that delivered focus, short enough
/// to go unnoticed.
const FOCUS_GATE_DELAY_MS: i32 = 150;

/// Bundles canvas state with its visual configuration.
struct GraphContext {
	state: CanvasState,
	scale: ScaleConfig,
	theme: Theme,
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;

fn event_position(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Vec2 {
	let rect = canvas.get_bounding_client_rect();
	Vec2::new(client_x as f64 - rect.left(), client_y as f64 - rect.top())
}

/// Renders an interactive node-graph editor on a canvas element.
///
/// Pass the graph via the reactive `document` signal; the canvas
/// rebuilds wholesale on every change. The component sizes itself to
/// its parent container by default; set `fullscreen = true` to fill
/// the viewport and resize with the window. Collaborators are injected
/// as callbacks: `on_selection_changed` feeds an external inspector,
/// `on_node_moved` lets the data provider persist drags.
#[component]
pub fn NodeGraphCanvas(
	#[prop(into)] document: Signal<GraphDocument>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional, into)] on_selection_changed: Option<Callback<SelectionEvent>>,
	#[prop(optional, into)] on_node_moved: Option<Callback<(String, Vec2)>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let focus_cbs: Rc<RefCell<Vec<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(Vec::new()));
	let gate_timer: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());
	let (focus_cbs_init, gate_timer_init) = (focus_cbs.clone(), gate_timer.clone());

	Effect::new(move |_| {
		let doc = document.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		// Data refresh on an already-mounted canvas: rebuild in place,
		// keeping the user's camera.
		if let Some(ref mut c) = *context_init.borrow_mut() {
			c.state
				.rebuild(doc.node_records(), doc.resolver().as_ref(), true);
			return;
		}

		let window: Window = web_sys::window().unwrap();
		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let mut state = CanvasState::new(w, h);
		if let Some(cb) = on_selection_changed {
			state.set_selection_observer(Rc::new(move |event: &SelectionEvent| {
				cb.run(event.clone());
			}));
		}
		if let Some(cb) = on_node_moved {
			state.set_node_moved_observer(Rc::new(move |id: &str, position: Vec2| {
				cb.run((id.to_string(), position));
			}));
		}
		state.rebuild(doc.node_records(), doc.resolver().as_ref(), false);
		state.center_camera();

		*context_init.borrow_mut() = Some(GraphContext {
			state,
			scale: ScaleConfig::default(),
			theme: Theme::default(),
		});

		// Window focus drives the input gate: open after a short
		// delay, close immediately on blur. The mount itself counts as
		// a focus gain.
		let schedule_gate_open = {
			let (context_gate, gate_slot) = (context_init.clone(), gate_timer_init.clone());
			move || {
				let context_open = context_gate.clone();
				let opener: Closure<dyn FnMut()> = Closure::new(move || {
					if let Some(ref mut c) = *context_open.borrow_mut() {
						c.state.focus.open();
					}
				});
				let win: Window = web_sys::window().unwrap();
				let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
					opener.as_ref().unchecked_ref(),
					FOCUS_GATE_DELAY_MS,
				);
				*gate_slot.borrow_mut() = Some(opener);
			}
		};
		schedule_gate_open();

		let on_focus: Closure<dyn FnMut()> = Closure::new({
			let schedule = schedule_gate_open.clone();
			move || schedule()
		});
		let on_blur: Closure<dyn FnMut()> = Closure::new({
			let context_blur = context_init.clone();
			move || {
				if let Some(ref mut c) = *context_blur.borrow_mut() {
					c.state.focus.close();
					c.state.pointer_up();
				}
			}
		});
		let _ = window
			.add_event_listener_with_callback("focus", on_focus.as_ref().unchecked_ref());
		let _ = window.add_event_listener_with_callback("blur", on_blur.as_ref().unchecked_ref());
		focus_cbs_init.borrow_mut().push(on_focus);
		focus_cbs_init.borrow_mut().push(on_blur);

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref c) = *context_anim.borrow() {
				render::render(&c.state, &ctx, &c.scale, &c.theme);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// on_cleanup wants Send + Sync; this is a CSR component pinned to
	// the main thread, so SendWrapper is sound here.
	let context_teardown = SendWrapper::new(context.clone());
	on_cleanup(move || {
		if let Some(ref mut c) = *context_teardown.borrow_mut() {
			c.state.teardown();
		}
	});

	let context_pd = context.clone();
	let on_pointerdown = move |ev: PointerEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let position = event_position(&canvas, ev.client_x(), ev.client_y());

		if let Some(ref mut c) = *context_pd.borrow_mut() {
			let scale = ScaledValues::new(&c.scale, c.state.viewport.zoom);
			match c.state.pointer_down(position, &scale) {
				PointerPress::Ignored => {}
				PointerPress::NodeCaptured(_) | PointerPress::PanCaptured => {
					let _ = canvas.set_pointer_capture(ev.pointer_id());
				}
			}
		}
	};

	let context_pm = context.clone();
	let on_pointermove = move |ev: PointerEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let position = event_position(&canvas, ev.client_x(), ev.client_y());

		if let Some(ref mut c) = *context_pm.borrow_mut() {
			c.state.pointer_move(position);
		}
	};

	let context_pu = context.clone();
	let on_pointerup = move |ev: PointerEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let _ = canvas.release_pointer_capture(ev.pointer_id());
		if let Some(ref mut c) = *context_pu.borrow_mut() {
			c.state.pointer_up();
		}
	};

	// The browser revokes capture on its own (alt-tab, element
	// removal); treat it like a pointer-up so no drag sticks.
	let context_pl = context.clone();
	let on_lostcapture = move |_: PointerEvent| {
		if let Some(ref mut c) = *context_pl.borrow_mut() {
			c.state.pointer_up();
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let position = event_position(&canvas, ev.client_x(), ev.client_y());

		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			c.state.zoom_about(position, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="node-graph-canvas"
			on:pointerdown=on_pointerdown
			on:pointermove=on_pointermove
			on:pointerup=on_pointerup
			on:lostpointercapture=on_lostcapture
			on:wheel=on_wheel
			style="display: block; cursor: grab; touch-action: none;"
		/>
	}
}
