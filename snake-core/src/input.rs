//! Maps raw keyboard and touch input onto headings and applies the
//! no-reversal rule. Nothing here moves the actor; accepted headings are only
//! buffered and take effect on the next tick.

use crate::error::InputError;
use crate::grid::Direction;
use crate::session::SessionStatus;

/// Minimum swipe length, in pixels, for a touch gesture to count.
pub const DEFAULT_SWIPE_MIN_DISTANCE: i32 = 30;

/// Decide whether `requested` may become the pending heading.
///
/// Rejected while the session is not running, and when `requested` is the
/// exact reverse of the heading the actor is currently moving in. The check is
/// against the current heading, not the pending one: two quick turns between
/// ticks cannot be chained into a reversal.
pub fn accept_direction(
    status: SessionStatus,
    current: Direction,
    requested: Direction,
) -> Option<Direction> {
    if status != SessionStatus::Running {
        return None;
    }
    if requested == current.opposite() {
        return None;
    }
    Some(requested)
}

impl Direction {
    /// Arrow keys (`ArrowUp`, `Up`) and WASD, case-insensitive.
    pub fn from_key(key: &str) -> Result<Self, InputError> {
        match key.trim().to_ascii_lowercase().as_str() {
            "arrowup" | "up" | "w" => Ok(Self::Up),
            "arrowdown" | "down" | "s" => Ok(Self::Down),
            "arrowleft" | "left" | "a" => Ok(Self::Left),
            "arrowright" | "right" | "d" => Ok(Self::Right),
            _ => Err(InputError::UnknownKey(key.to_string())),
        }
    }

    /// Resolve a touch swipe from its start-to-end delta (screen coordinates).
    /// The dominant axis wins; ties go to the horizontal axis.
    pub fn from_swipe(dx: i32, dy: i32, min_distance: i32) -> Result<Self, InputError> {
        let (adx, ady) = (dx.saturating_abs(), dy.saturating_abs());
        let distance = adx.max(ady);
        if distance < min_distance {
            return Err(InputError::SwipeTooShort {
                distance,
                min: min_distance,
            });
        }
        if adx >= ady {
            Ok(if dx > 0 { Self::Right } else { Self::Left })
        } else {
            Ok(if dy > 0 { Self::Down } else { Self::Up })
        }
    }
}
