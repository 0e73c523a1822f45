//! Input abstraction layer.
//!
//! Normalizes map pointer and keyboard events from the host into a single
//! `InputEvent` enum consumed by the placement controller. Coordinates are
//! already in degrees (the map widget converts screen → lat/lng).

use hb_core::LatLng;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Single click on the map.
    Click { lat: f64, lng: f64 },

    /// Double click on the map. Position is irrelevant: it closes the polygon.
    DoubleClick,

    /// A draggable map object (vertex marker, segment handle) started moving.
    DragStart { object_id: String, lat: f64, lng: f64 },
    DragMove { object_id: String, lat: f64, lng: f64 },
    DragEnd { object_id: String, lat: f64, lng: f64 },

    /// Key press. `key` is the `KeyboardEvent.key` value.
    Key {
        key: String,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    },
}

impl InputEvent {
    pub fn click(point: LatLng) -> Self {
        Self::Click {
            lat: point.lat,
            lng: point.lng,
        }
    }

    /// A key press without modifiers.
    pub fn key(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            ctrl: false,
            shift: false,
            alt: false,
            meta: false,
        }
    }

    /// Extract position if this is a positioned pointer event.
    pub fn position(&self) -> Option<LatLng> {
        match self {
            Self::Click { lat, lng }
            | Self::DragStart { lat, lng, .. }
            | Self::DragMove { lat, lng, .. }
            | Self::DragEnd { lat, lng, .. } => Some(LatLng::new(*lat, *lng)),
            _ => None,
        }
    }
}
