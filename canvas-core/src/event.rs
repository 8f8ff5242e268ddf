//! Pointer input events and host coordinate conversion.
//!
//! Hosts forward raw pointer events with client-space coordinates (CSS pixels
//! relative to the page). [`CanvasMetrics`] turns those into canvas-local
//! device pixels, which is the screen space the camera works in.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::{CanvasResult, Vec2};

/// Mouse button identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    /// Usually the left button. Selects and drags.
    Primary,
    /// Usually the middle button or wheel click. Resets the camera on click.
    Auxiliary,
    /// Usually the right button. Pans.
    Secondary,
    /// Any other button, by DOM index.
    Other(u8),
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` index.
    #[must_use]
    pub const fn from_dom(button: u8) -> Self {
        match button {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }
}

/// A raw pointer event as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    /// A button was pressed.
    Down {
        /// Client-space position.
        client: Vec2,
        /// Button pressed.
        button: MouseButton,
    },
    /// A button was released.
    Up {
        /// Client-space position.
        client: Vec2,
        /// Button released.
        button: MouseButton,
    },
    /// The pointer moved.
    Move {
        /// Client-space position.
        client: Vec2,
        /// Movement since the previous event, in CSS pixels.
        #[serde(default)]
        movement: Vec2,
    },
    /// The pointer left the canvas.
    Leave,
    /// The wheel turned.
    Wheel {
        /// Client-space position.
        client: Vec2,
        /// Vertical scroll delta. Negative scrolls up.
        delta_y: f64,
    },
    /// A non-primary button was clicked.
    AuxClick {
        /// Client-space position.
        client: Vec2,
        /// Button clicked.
        button: MouseButton,
    },
}

impl PointerEvent {
    /// Client-space position, if the event carries one.
    #[must_use]
    pub const fn client(&self) -> Option<Vec2> {
        match self {
            Self::Down { client, .. }
            | Self::Up { client, .. }
            | Self::Move { client, .. }
            | Self::Wheel { client, .. }
            | Self::AuxClick { client, .. } => Some(*client),
            Self::Leave => None,
        }
    }
}

/// Where the canvas sits on the page and how dense its pixels are.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasMetrics {
    /// Top-left of the canvas element in client space.
    pub origin: Vec2,
    /// Device pixels per CSS pixel.
    pub device_pixel_ratio: f64,
}

impl Default for CanvasMetrics {
    fn default() -> Self {
        Self {
            origin: Vec2::zero(),
            device_pixel_ratio: 1.0,
        }
    }
}

impl CanvasMetrics {
    /// Create metrics for a canvas at `origin` with the given pixel ratio.
    #[must_use]
    pub const fn new(origin: Vec2, device_pixel_ratio: f64) -> Self {
        Self {
            origin,
            device_pixel_ratio,
        }
    }

    /// Client-space point to canvas-local device pixels.
    #[must_use]
    pub fn to_canvas(&self, client: Vec2) -> Vec2 {
        (client - self.origin).scale(self.device_pixel_ratio)
    }

    /// Canvas-local device pixels back to client space.
    #[must_use]
    pub fn to_client(&self, canvas: Vec2) -> Vec2 {
        canvas.scale(1.0 / self.device_pixel_ratio) + self.origin
    }

    /// CSS-pixel delta to device pixels.
    #[must_use]
    pub fn scale_delta(&self, delta: Vec2) -> Vec2 {
        delta.scale(self.device_pixel_ratio)
    }
}

/// A source of pointer events, for hosts that queue input instead of
/// calling into the editor from their own callbacks.
pub trait InputSource {
    /// Next pending event, or `None` when drained.
    fn next_event(&mut self) -> Option<PointerEvent>;
}

impl InputSource for VecDeque<PointerEvent> {
    fn next_event(&mut self) -> Option<PointerEvent> {
        self.pop_front()
    }
}

/// A prerecorded sequence of pointer events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptedInput {
    events: VecDeque<PointerEvent>,
}

impl ScriptedInput {
    /// Create a script from events in replay order.
    #[must_use]
    pub fn new(events: impl IntoIterator<Item = PointerEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Parse a JSON array of events.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a list of pointer events.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let events: Vec<PointerEvent> = serde_json::from_str(json)?;
        Ok(Self::new(events))
    }

    /// Append an event.
    pub fn push(&mut self, event: PointerEvent) {
        self.events.push_back(event);
    }

    /// Number of events left.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the script is drained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn next_event(&mut self) -> Option<PointerEvent> {
        self.events.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_from_dom() {
        assert_eq!(MouseButton::from_dom(0), MouseButton::Primary);
        assert_eq!(MouseButton::from_dom(1), MouseButton::Auxiliary);
        assert_eq!(MouseButton::from_dom(2), MouseButton::Secondary);
        assert_eq!(MouseButton::from_dom(4), MouseButton::Other(4));
    }

    #[test]
    fn test_client_to_canvas_applies_origin_and_ratio() {
        let metrics = CanvasMetrics::new(Vec2::new(10.0, 20.0), 2.0);
        assert_eq!(metrics.to_canvas(Vec2::new(15.0, 25.0)), Vec2::new(10.0, 10.0));
        assert_eq!(metrics.scale_delta(Vec2::new(1.0, -3.0)), Vec2::new(2.0, -6.0));
        assert_eq!(CanvasMetrics::default().to_canvas(Vec2::new(3.0, 4.0)), Vec2::new(3.0, 4.0));
        assert_eq!(metrics.to_client(Vec2::new(10.0, 10.0)), Vec2::new(15.0, 25.0));
    }

    #[test]
    fn test_event_json_shape() {
        let json = r#"[
            { "type": "down", "client": { "x": 1.0, "y": 2.0 }, "button": "primary" },
            { "type": "move", "client": { "x": 3.0, "y": 2.0 } },
            { "type": "wheel", "client": { "x": 3.0, "y": 2.0 }, "delta_y": -100.0 },
            { "type": "aux_click", "client": { "x": 0.0, "y": 0.0 }, "button": "auxiliary" },
            { "type": "leave" }
        ]"#;
        let mut script = ScriptedInput::from_json(json).expect("valid script");
        assert_eq!(script.len(), 5);
        assert_eq!(
            script.next_event(),
            Some(PointerEvent::Down {
                client: Vec2::new(1.0, 2.0),
                button: MouseButton::Primary
            })
        );
        assert_eq!(
            script.next_event(),
            Some(PointerEvent::Move {
                client: Vec2::new(3.0, 2.0),
                movement: Vec2::zero()
            })
        );
        assert!(matches!(script.next_event(), Some(PointerEvent::Wheel { delta_y, .. }) if delta_y < 0.0));
        assert!(matches!(script.next_event(), Some(PointerEvent::AuxClick { .. })));
        assert_eq!(script.next_event().and_then(|e| e.client()), None);
        assert!(script.is_empty());
    }

    #[test]
    fn test_unknown_event_type_is_error() {
        assert!(ScriptedInput::from_json(r#"[{ "type": "pinch" }]"#).is_err());
    }

    #[test]
    fn test_vecdeque_source() {
        let mut queue: VecDeque<PointerEvent> = VecDeque::from(vec![PointerEvent::Leave]);
        assert_eq!(queue.next_event(), Some(PointerEvent::Leave));
        assert_eq!(queue.next_event(), None);
    }
}
