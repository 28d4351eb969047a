//! Pointer coordinate resolution
//!
//! Mouse and touch events carry coordinates in different fields. Each axis is
//! taken from the first source with a usable value: mouse client position,
//! then page position, then the primary touch point's page position. Zero,
//! missing and non-finite values fall through; when nothing is left the axis
//! resolves to 0.

use glam::Vec2;

/// Raw coordinates captured from one input event
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    pub client: Option<Vec2>,
    pub page: Option<Vec2>,
    /// Page position of the first touch point
    pub touch_page: Option<Vec2>,
}

impl PointerSample {
    pub fn mouse(client: Vec2, page: Vec2) -> Self {
        Self {
            client: Some(client),
            page: Some(page),
            touch_page: None,
        }
    }

    pub fn touch(touch_page: Option<Vec2>) -> Self {
        Self {
            touch_page,
            ..Default::default()
        }
    }

    pub fn resolve(&self) -> Vec2 {
        let sources = [self.client, self.page, self.touch_page];
        Vec2::new(
            first_usable(sources.iter().map(|s| s.map(|v| v.x))),
            first_usable(sources.iter().map(|s| s.map(|v| v.y))),
        )
    }
}

fn first_usable(values: impl Iterator<Item = Option<f32>>) -> f32 {
    values
        .flatten()
        .find(|v| *v != 0.0 && v.is_finite())
        .unwrap_or(0.0)
}
