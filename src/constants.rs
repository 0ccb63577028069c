//! Shared crate-wide constants.

use std::time::Duration;

/// Gap between the target's edge and the anchored edge of the floating panel.
///
/// Units: viewport cells. Applies to the four side-anchored positions only;
/// `window-center` ignores it.
pub const SPACING: f64 = 10.0;

/// Minimum distance kept between the floating panel and each viewport edge.
///
/// When the panel does not fit between the margins the margin wins and the
/// panel is pinned to the top/left edge plus this inset.
pub const VIEWPORT_MARGIN: f64 = 10.0;

/// Delay between the first placement of a panel and enabling its transition.
///
/// The first jump to position is never animated; only moves that happen after
/// this delay has elapsed are.
pub const POSITIONED_DELAY: Duration = Duration::from_millis(20);

/// Stacking order given to the target while a backdrop is shown, so the target
/// paints above the dimmed layer.
pub const ELEVATED_STACK_ORDER: i32 = 10001;
