//! Pannable SVG plane with one pin per venue.

use dioxus::prelude::*;
use passport_core::map::{
    PIN_GLOW_RADIUS, PIN_RADIUS, PlacedPin, PlaneBounds, VIEWPORT_HEIGHT,
    VIEWPORT_WIDTH, cloud_path,
};
use passport_core::types::VenueId;
use passport_core::{PanState, PlaneProjection, Point, VenueStore, place_pins};

fn mouse_point(evt: &MouseEvent) -> Point {
    let c = evt.client_coordinates();
    Point::new(c.x, c.y)
}

fn touch_points(evt: &TouchEvent) -> Vec<Point> {
    evt.touches()
        .iter()
        .map(|t| {
            let c = t.client_coordinates();
            Point::new(c.x, c.y)
        })
        .collect()
}

#[component]
pub fn MapView(store: VenueStore, bounds: PlaneBounds, on_select: EventHandler<VenueId>) -> Element {
    let mut pan = use_signal(PanState::default);

    let projection = PlaneProjection::new(bounds);
    let pins = place_pins(&store, &projection);
    let transform = pan.read().transform();
    let surface_class = if pan.read().is_dragging() {
        "map-surface dragging"
    } else {
        "map-surface"
    };

    rsx! {
        div {
            class: surface_class,
            onmousedown: move |evt| pan.write().begin_drag(mouse_point(&evt)),
            onmousemove: move |evt| {
                if pan.peek().is_dragging() {
                    pan.write().drag_to(mouse_point(&evt));
                }
            },
            onmouseup: move |_| pan.write().end_drag(),
            onmouseleave: move |_| pan.write().end_drag(),
            ontouchstart: move |evt| pan.write().begin_touch(&touch_points(&evt)),
            ontouchmove: move |evt| {
                let touches = touch_points(&evt);
                if touches.len() == 1 && pan.peek().is_dragging() {
                    evt.prevent_default();
                    pan.write().touch_move(&touches);
                }
            },
            ontouchend: move |_| pan.write().end_drag(),

            svg {
                class: "map-plane",
                view_box: "{projection.view_box()}",
                preserve_aspect_ratio: "xMidYMid meet",
                g { transform: "{transform}",
                    rect {
                        class: "map-ground",
                        x: "0",
                        y: "0",
                        width: "{VIEWPORT_WIDTH}",
                        height: "{VIEWPORT_HEIGHT}",
                        rx: "24",
                    }
                    for pin in pins.iter() {
                        {pin_marker(pin, on_select)}
                    }
                }
            }
        }
    }
}

fn pin_marker(pin: &PlacedPin<'_>, on_select: EventHandler<VenueId>) -> Element {
    let Point { x, y } = pin.at;
    let id = pin.venue.id.clone();
    let cloud = pin.style.show_lock.then(|| cloud_path(pin.at));
    let lock_y = y - 18.0;
    let label_y = y + PIN_RADIUS + 12.0;

    rsx! {
        g {
            key: "{pin.venue.id}",
            class: if pin.locked { "pin locked" } else { "pin" },
            onmousedown: move |evt| evt.stop_propagation(),
            onclick: move |evt| {
                evt.stop_propagation();
                on_select.call(id.clone());
            },
            circle {
                cx: "{x}",
                cy: "{y}",
                r: "{PIN_GLOW_RADIUS}",
                fill: pin.style.fill,
                opacity: "0.2",
            }
            circle {
                cx: "{x}",
                cy: "{y}",
                r: "{PIN_RADIUS}",
                fill: pin.style.fill,
                opacity: "{pin.style.opacity}",
                stroke: "white",
                stroke_width: "2",
            }
            text {
                x: "{x}",
                y: "{y}",
                text_anchor: "middle",
                dominant_baseline: "central",
                font_size: "12",
                "{pin.glyph}"
            }
            if let Some(d) = cloud {
                path { class: "pin-cloud", d: "{d}" }
                text {
                    x: "{x}",
                    y: "{lock_y}",
                    text_anchor: "middle",
                    font_size: "9",
                    "🔒"
                }
            }
            text {
                class: "pin-label",
                x: "{x}",
                y: "{label_y}",
                text_anchor: "middle",
                font_size: "10",
                "{pin.venue.name}"
            }
        }
    }
}
