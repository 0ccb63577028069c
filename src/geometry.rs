//! Anchor geometry for floating panels.
//!
//! Everything here is pure: the same target, panel, position and viewport
//! always produce the same [`Offset`]. Rectangles are snapshots in viewport
//! coordinates and must be re-read by the caller before every placement.

use std::fmt;
use std::str::FromStr;

use crate::constants::{SPACING, VIEWPORT_MARGIN};
use crate::error::OverlayError;

/// Bounding box snapshot in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// A rectangle of the given size anchored at the origin.
    pub const fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn contains(&self, left: f64, top: f64) -> bool {
        if self.width <= 0.0 || self.height <= 0.0 {
            return false;
        }
        left >= self.left
            && left < self.left + self.width
            && top >= self.top
            && top < self.top + self.height
    }
}

impl From<ratatui::layout::Rect> for Rect {
    fn from(rect: ratatui::layout::Rect) -> Self {
        Self::new(
            rect.y as f64,
            rect.x as f64,
            rect.width as f64,
            rect.height as f64,
        )
    }
}

/// Absolute translation applied to the floating panel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub top: f64,
    pub left: f64,
}

impl Offset {
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }

    /// Snap to terminal cells. Negative coordinates collapse to zero.
    pub fn to_cells(self) -> (u16, u16) {
        let snap = |v: f64| v.round().clamp(0.0, u16::MAX as f64) as u16;
        (snap(self.left), snap(self.top))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl From<ratatui::layout::Rect> for Viewport {
    fn from(area: ratatui::layout::Rect) -> Self {
        Self::new(area.width as f64, area.height as f64)
    }
}

/// Side of the target the panel should sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PreferredPosition {
    TopCenter,
    #[default]
    BottomCenter,
    LeftCenter,
    RightCenter,
    /// Centered in the viewport; the target only matters for elevation.
    WindowCenter,
}

impl PreferredPosition {
    pub const ALL: [PreferredPosition; 5] = [
        PreferredPosition::TopCenter,
        PreferredPosition::BottomCenter,
        PreferredPosition::LeftCenter,
        PreferredPosition::RightCenter,
        PreferredPosition::WindowCenter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PreferredPosition::TopCenter => "top-center",
            PreferredPosition::BottomCenter => "bottom-center",
            PreferredPosition::LeftCenter => "left-center",
            PreferredPosition::RightCenter => "right-center",
            PreferredPosition::WindowCenter => "window-center",
        }
    }
}

impl fmt::Display for PreferredPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferredPosition {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| OverlayError::InvalidPosition(s.to_string()))
    }
}

/// Gap to the target and inset from the viewport edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub gap: f64,
    pub margin: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            gap: SPACING,
            margin: VIEWPORT_MARGIN,
        }
    }
}

/// Place `floating` next to `target` on the `position` side, clamped to the
/// viewport using the default spacing.
pub fn compute_offset(
    target: Rect,
    floating: Rect,
    position: PreferredPosition,
    viewport: Viewport,
) -> Offset {
    compute_offset_with(target, floating, position, viewport, Spacing::default())
}

pub fn compute_offset_with(
    target: Rect,
    floating: Rect,
    position: PreferredPosition,
    viewport: Viewport,
    spacing: Spacing,
) -> Offset {
    let centered_left = target.left + target.width / 2.0 - floating.width / 2.0;
    let centered_top = target.top + target.height / 2.0 - floating.height / 2.0;

    let (top, left) = match position {
        PreferredPosition::TopCenter => (target.top - floating.height - spacing.gap, centered_left),
        PreferredPosition::BottomCenter => {
            (target.top + target.height + spacing.gap, centered_left)
        }
        PreferredPosition::LeftCenter => (centered_top, target.left - floating.width - spacing.gap),
        PreferredPosition::RightCenter => {
            (centered_top, target.left + target.width + spacing.gap)
        }
        PreferredPosition::WindowCenter => (
            viewport.height / 2.0 - floating.height / 2.0,
            viewport.width / 2.0 - floating.width / 2.0,
        ),
    };

    // `min` then `max`: when the panel is larger than the room between the
    // margins, the margin wins.
    let top = spacing
        .margin
        .max(top.min(viewport.height - floating.height - spacing.margin));
    let left = spacing
        .margin
        .max(left.min(viewport.width - floating.width - spacing.margin));

    Offset { top, left }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 1000.0,
        height: 800.0,
    };

    fn target() -> Rect {
        Rect::new(300.0, 400.0, 50.0, 20.0)
    }

    fn panel() -> Rect {
        Rect::sized(200.0, 100.0)
    }

    #[test]
    fn bottom_center_example() {
        let target = Rect::new(100.0, 100.0, 50.0, 20.0);
        let off = compute_offset(target, panel(), PreferredPosition::BottomCenter, VIEWPORT);
        assert_eq!(off, Offset::new(130.0, 25.0));
    }

    #[test]
    fn narrow_viewport_pins_left_to_margin() {
        let target = Rect::new(100.0, 100.0, 50.0, 20.0);
        let viewport = Viewport::new(120.0, 800.0);
        let off = compute_offset(target, panel(), PreferredPosition::BottomCenter, viewport);
        assert_eq!(off.left, 10.0);
        assert_eq!(off.top, 130.0);
    }

    #[test]
    fn unclamped_positions_follow_anchor_table() {
        let t = target();
        let f = panel();
        let cases = [
            (PreferredPosition::TopCenter, Offset::new(190.0, 325.0)),
            (PreferredPosition::BottomCenter, Offset::new(330.0, 325.0)),
            (PreferredPosition::LeftCenter, Offset::new(260.0, 190.0)),
            (PreferredPosition::RightCenter, Offset::new(260.0, 460.0)),
            (PreferredPosition::WindowCenter, Offset::new(350.0, 400.0)),
        ];
        for (position, expected) in cases {
            assert_eq!(
                compute_offset(t, f, position, VIEWPORT),
                expected,
                "{position}"
            );
        }
    }

    #[test]
    fn oversized_panel_is_margin_pinned_on_both_axes() {
        let huge = Rect::sized(2000.0, 1600.0);
        for position in PreferredPosition::ALL {
            let off = compute_offset(target(), huge, position, VIEWPORT);
            assert_eq!(off, Offset::new(VIEWPORT_MARGIN, VIEWPORT_MARGIN));
        }
    }

    #[test]
    fn panel_near_bottom_right_is_pulled_back_inside() {
        let t = Rect::new(780.0, 980.0, 10.0, 10.0);
        let off = compute_offset(t, panel(), PreferredPosition::BottomCenter, VIEWPORT);
        assert_eq!(off.top, 800.0 - 100.0 - VIEWPORT_MARGIN);
        assert_eq!(off.left, 1000.0 - 200.0 - VIEWPORT_MARGIN);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let a = compute_offset(target(), panel(), PreferredPosition::LeftCenter, VIEWPORT);
        let b = compute_offset(target(), panel(), PreferredPosition::LeftCenter, VIEWPORT);
        assert_eq!(a, b);
    }

    #[test]
    fn custom_spacing_applies_gap_and_margin() {
        let spacing = Spacing {
            gap: 1.0,
            margin: 1.0,
        };
        let t = Rect::new(5.0, 10.0, 4.0, 3.0);
        let f = Rect::sized(8.0, 4.0);
        let off = compute_offset_with(
            t,
            f,
            PreferredPosition::RightCenter,
            Viewport::new(80.0, 24.0),
            spacing,
        );
        assert_eq!(off, Offset::new(4.5, 15.0));
    }

    #[test]
    fn position_names_round_trip() {
        for position in PreferredPosition::ALL {
            assert_eq!(position.as_str().parse::<PreferredPosition>().ok(), Some(position));
        }
        assert!("middle".parse::<PreferredPosition>().is_err());
        assert_eq!(PreferredPosition::default(), PreferredPosition::BottomCenter);
    }

    #[test]
    fn offset_snaps_to_cells() {
        assert_eq!(Offset::new(4.5, 15.2).to_cells(), (15, 5));
        assert_eq!(Offset::new(-3.0, 2.0).to_cells(), (2, 0));
    }

    #[test]
    fn ratatui_rect_converts_to_viewport_coordinates() {
        let r = ratatui::layout::Rect::new(3, 4, 10, 2);
        assert_eq!(Rect::from(r), Rect::new(4.0, 3.0, 10.0, 2.0));
    }
}
