//! Canvas host component: owns the frame loop, the resize debounce, and
//! the DOM event wiring around the simulator/controller/renderer core.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::interaction::{InteractionController, InteractionDelta};
use super::render;
use super::sim::{LayoutSimulator, SimParams};
use super::types::NetworkData;

/// Debounce window for live resizes, ms.
const RESIZE_DEBOUNCE_MS: i32 = 100;
/// Size deltas below this many px are ignored by the resize adapter.
const RESIZE_MIN_DELTA: f64 = 4.0;

/// Everything the frame loop reads; rebuilt per snapshot except for the
/// interaction state, which lives as long as the component is mounted.
struct CanvasState {
	sim: LayoutSimulator,
	inter: InteractionController,
	data: NetworkData,
	width: f64,
	height: f64,
}

/// Logical surface size for the canvas: viewport, explicit props, or the
/// parent element's box.
fn surface_size(
	canvas: &HtmlCanvasElement,
	window: &Window,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		(
			window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0),
			window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0),
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
	}
}

/// Size the backing raster in device pixels while keeping the CSS box and
/// all drawing math in logical pixels; crisp on high-density displays.
fn size_backing_store(canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d, w: f64, h: f64) {
	let dpr = web_sys::window()
		.map(|win| win.device_pixel_ratio())
		.filter(|d| d.is_finite() && *d > 0.0)
		.unwrap_or(1.0);
	canvas.set_width((w * dpr) as u32);
	canvas.set_height((h * dpr) as u32);
	// Fully qualified: leptos' prelude brings an `ElementExt::style` into
	// scope that would otherwise shadow the web-sys accessor.
	let style = web_sys::HtmlElement::style(canvas);
	let _ = style.set_property("width", &format!("{w}px"));
	let _ = style.set_property("height", &format!("{h}px"));
	// Resizing the backing store reset the transform; restore the DPR scale.
	let _ = ctx.scale(dpr, dpr);
}

fn set_cursor(canvas: &HtmlCanvasElement, cursor: &str) {
	let _ = web_sys::HtmlElement::style(canvas).set_property("cursor", cursor);
}

/// Interactive force-directed view of a team relationship network.
///
/// Feeds on an immutable [`NetworkData`] snapshot signal; a new snapshot
/// value reseeds the layout. Selection changes (click on a node, click on
/// empty space) are reported through `on_select` with the node id.
#[component]
pub fn NetworkGraphCanvas(
	#[prop(into)] data: Signal<NetworkData>,
	#[prop(optional, into)] on_select: Option<Callback<Option<String>>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<CanvasState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let debounce_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let raf_id: Rc<Cell<i32>> = Rc::new(Cell::new(0));
	let timeout_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

	let (state_init, animate_init, resize_cb_init, debounce_cb_init) = (
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		debounce_cb.clone(),
	);
	let (raf_init, timeout_init) = (raf_id.clone(), timeout_id.clone());

	Effect::new(move |_| {
		let snapshot = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let mut reseeded = false;
		let mut selection_lost = false;
		if let Some(ref mut s) = *state_init.borrow_mut() {
			// New snapshot identity: cancel the pending frame, reseed the
			// simulation (interaction state persists), then restart.
			let _ = window.cancel_animation_frame(raf_init.get());
			s.sim = LayoutSimulator::new(&snapshot, s.width, s.height, SimParams::default());
			if s.sim.dropped_edges() > 0 {
				warn!(
					"skipped {} relationship edge(s) with unknown member ids",
					s.sim.dropped_edges()
				);
			}
			// Abandon any in-flight drag/hover: their slots belong to the
			// old snapshot and must not steer the fresh simulation.
			s.inter.abandon();
			selection_lost = matches!(
				s.inter.retain_selection(&snapshot),
				InteractionDelta::SelectionChanged(None)
			);
			s.data = snapshot.clone();
			reseeded = true;
		}
		if reseeded {
			if selection_lost {
				if let Some(cb) = on_select {
					cb.run(None);
				}
			}
			if let Some(ref cb) = *animate_init.borrow() {
				if let Ok(handle) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
					raf_init.set(handle);
				}
			}
			return;
		}

		let (w, h) = surface_size(&canvas, &window, fullscreen, width, height);
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();
		size_backing_store(&canvas, &ctx, w, h);

		let sim = LayoutSimulator::new(&snapshot, w, h, SimParams::default());
		if sim.dropped_edges() > 0 {
			warn!(
				"skipped {} relationship edge(s) with unknown member ids",
				sim.dropped_edges()
			);
		}
		*state_init.borrow_mut() = Some(CanvasState {
			sim,
			inter: InteractionController::default(),
			data: snapshot,
			width: w,
			height: h,
		});

		// Debounced resize: rescale the live layout, never reseed.
		let (state_dbc, canvas_dbc, ctx_dbc) = (state_init.clone(), canvas.clone(), ctx.clone());
		*debounce_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			if let Some(ref mut s) = *state_dbc.borrow_mut() {
				let (nw, nh) = surface_size(&canvas_dbc, &win, fullscreen, width, height);
				if (nw - s.width).abs() <= RESIZE_MIN_DELTA
					&& (nh - s.height).abs() <= RESIZE_MIN_DELTA
				{
					return;
				}
				size_backing_store(&canvas_dbc, &ctx_dbc, nw, nh);
				s.sim.rescale(nw, nh);
				s.width = nw;
				s.height = nh;
			}
		}));

		let (debounce_resize, timeout_resize) = (debounce_cb_init.clone(), timeout_init.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			if let Some(pending) = timeout_resize.take() {
				win.clear_timeout_with_handle(pending);
			}
			if let Some(ref cb) = *debounce_resize.borrow() {
				if let Ok(handle) = win.set_timeout_with_callback_and_timeout_and_arguments_0(
					cb.as_ref().unchecked_ref(),
					RESIZE_DEBOUNCE_MS,
				) {
					timeout_resize.set(Some(handle));
				}
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		// Frame loop: step fully, then draw from the stepped positions.
		let (state_anim, animate_inner, raf_anim) =
			(state_init.clone(), animate_init.clone(), raf_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.sim.step();
				let selected_slot = s
					.inter
					.selected()
					.and_then(|id| s.data.nodes.iter().position(|n| n.id == id));
				render::draw(
					&ctx,
					&s.sim,
					&s.data,
					s.inter.hovered(),
					selected_slot,
					s.width,
					s.height,
				);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Ok(handle) = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref())
				{
					raf_anim.set(handle);
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			if let Ok(handle) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				raf_init.set(handle);
			}
		}
	});

	// Full teardown on unmount: frame loop, resize listener, debounce
	// timer, and all state go together. `on_cleanup` wants a Send + Sync
	// closure, so the wasm-only handles travel inside a SendWrapper (the
	// app is single-threaded; the wrapper is only ever opened here).
	let drop_handles = SendWrapper::new((
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		debounce_cb.clone(),
		raf_id.clone(),
		timeout_id.clone(),
	));
	on_cleanup(move || {
		let (state, animate, resize_cb, debounce_cb, raf_id, timeout_id) = &*drop_handles;
		if let Some(window) = web_sys::window() {
			let _ = window.cancel_animation_frame(raf_id.get());
			if let Some(pending) = timeout_id.take() {
				window.clear_timeout_with_handle(pending);
			}
			if let Some(ref cb) = *resize_cb.borrow() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		*state.borrow_mut() = None;
		*animate.borrow_mut() = None;
		*resize_cb.borrow_mut() = None;
		*debounce_cb.borrow_mut() = None;
	});

	let pointer_pos = move |ev: &MouseEvent| -> Option<(HtmlCanvasElement, f64, f64)> {
		let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		Some((canvas, x, y))
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((canvas, x, y)) = pointer_pos(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let InteractionDelta::DragStarted(_) = s.inter.pointer_down(&mut s.sim, x, y) {
				set_cursor(&canvas, "grabbing");
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((canvas, x, y)) = pointer_pos(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if let InteractionDelta::HoverChanged(hit) = s.inter.pointer_move(&mut s.sim, x, y) {
				set_cursor(&canvas, if hit.is_some() { "grab" } else { "default" });
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((canvas, x, y)) = pointer_pos(&ev) else {
			return;
		};
		let mut changed = None;
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			let delta = s.inter.pointer_up(&mut s.sim, &s.data, x, y);
			set_cursor(&canvas, if s.inter.hovered().is_some() { "grab" } else { "default" });
			if let InteractionDelta::SelectionChanged(id) = delta {
				changed = Some(id);
			}
		}
		if let Some(id) = changed {
			if let Some(cb) = on_select {
				cb.run(id);
			}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |ev: MouseEvent| {
		let Some((canvas, _, _)) = pointer_pos(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			let _ = s.inter.pointer_leave(&mut s.sim);
			set_cursor(&canvas, "default");
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="network-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			style="display: block;"
		/>
	}
}
