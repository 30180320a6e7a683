// ============================================================================
// POINTER EVENTS: egui input translated into widget-local gesture events
// ============================================================================

use eframe::egui;

use crate::ops::geometry::Point;
use crate::ops::selection::PointerButton;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Pressed(Point, PointerButton),
    Moved(Point),
    Released(Point, PointerButton),
    DoubleClicked(Point),
}

fn map_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

/// Screen position → integer position relative to `rect.min`.
pub fn to_local(pos: egui::Pos2, rect: egui::Rect) -> Point {
    Point::new((pos.x - rect.min.x).floor() as i32, (pos.y - rect.min.y).floor() as i32)
}

/// All pointer events of this frame, in arrival order, relative to `rect`.
///
/// Every intermediate move is kept so fast drags are not reduced to one
/// sample per frame. `hovered` means the widget is the topmost thing under
/// the pointer. Presses and double clicks are only reported when hovered.
/// Moves and releases are reported when hovered or while `capturing` a
/// gesture, so a drag can finish outside the widget while a widget covered
/// by another window sees nothing.
pub fn collect(ui: &egui::Ui, rect: egui::Rect, hovered: bool, capturing: bool) -> Vec<PointerEvent> {
    ui.input(|i| {
        let mut events = translate(&i.events, rect, hovered, capturing);
        if hovered
            && i.pointer.button_double_clicked(egui::PointerButton::Primary)
            && let Some(pos) = i.pointer.interact_pos()
        {
            events.push(PointerEvent::DoubleClicked(to_local(pos, rect)));
        }
        events
    })
}

fn translate(events: &[egui::Event], rect: egui::Rect, hovered: bool, capturing: bool) -> Vec<PointerEvent> {
    let tracking = hovered || capturing;
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::PointerMoved(pos) => tracking.then_some(PointerEvent::Moved(to_local(*pos, rect))),
            egui::Event::PointerButton { pos, button, pressed, .. } => {
                let button = map_button(*button)?;
                let local = to_local(*pos, rect);
                if *pressed {
                    (hovered && rect.contains(*pos)).then_some(PointerEvent::Pressed(local, button))
                } else {
                    tracking.then_some(PointerEvent::Released(local, button))
                }
            }
            _ => None,
        })
        .collect()
}
