use std::time::Instant;

use ::winit::dpi::PhysicalPosition;
use ::winit::event::{ElementState, MouseButton, Touch, TouchPhase, WindowEvent};
use ::winit::window::Window;

use crate::coords::Vec2;
use crate::input::{PointerEvent, PointerKind, PointerState};

/// Translates a winit `WindowEvent` into an engine `PointerEvent`.
///
/// Only the primary mouse button and touch contacts draw. winit reports
/// neither coalesced nor predicted positions, so move events carry the event
/// position alone.
///
/// Returns `None` for events not represented by the input subsystem.
pub fn translate_window_event(
    window: &Window,
    state: &PointerState,
    event: &WindowEvent,
    now: Instant,
) -> Option<PointerEvent> {
    match event {
        WindowEvent::Focused(f) => Some(PointerEvent::Focused(*f)),

        WindowEvent::CursorMoved { position, .. } => Some(PointerEvent::Moved {
            kind: PointerKind::Mouse,
            position: to_logical(window, *position),
            coalesced: Vec::new(),
            predicted: Vec::new(),
            timestamp: now,
        }),

        WindowEvent::MouseInput { state: st, button: MouseButton::Left, .. } => {
            // winit 0.30 does not expose a cursor query; use the tracked position.
            let position = state.last_position?;
            Some(match st {
                ElementState::Pressed => PointerEvent::Down {
                    kind: PointerKind::Mouse,
                    position,
                    timestamp: now,
                },
                ElementState::Released => PointerEvent::Up {
                    kind: PointerKind::Mouse,
                    position,
                    timestamp: now,
                },
            })
        }

        WindowEvent::Touch(touch) => Some(translate_touch(window, touch, now)),

        _ => None,
    }
}

fn translate_touch(window: &Window, touch: &Touch, now: Instant) -> PointerEvent {
    let kind = PointerKind::Touch(touch.id);
    let position = to_logical(window, touch.location);

    match touch.phase {
        TouchPhase::Started => PointerEvent::Down { kind, position, timestamp: now },
        TouchPhase::Moved => PointerEvent::Moved {
            kind,
            position,
            coalesced: Vec::new(),
            predicted: Vec::new(),
            timestamp: now,
        },
        TouchPhase::Ended => PointerEvent::Up { kind, position, timestamp: now },
        TouchPhase::Cancelled => PointerEvent::Cancel { kind },
    }
}

fn to_logical(window: &Window, pos: PhysicalPosition<f64>) -> Vec2 {
    let logical = pos.to_logical::<f64>(window.scale_factor());
    Vec2::new(logical.x as f32, logical.y as f32)
}
