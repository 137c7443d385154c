//! Pure movement geometry and collision predicates, separated from game
//! state.
//!
//! Everything here is a total function of its arguments; the [`Game`]
//! state machine applies these each tick, and the autopilot in
//! [`agent`][crate::agent] reuses them to plan ahead.  Grid dimensions
//! passed in must be nonzero.
//!
//! [`Game`]: crate::game::Game
use crate::game::{Direction, Position};

/// Whether turning from `current` to `proposed` is legal.  Reversing
/// straight into the opposite direction is not; "turning" into the current
/// direction is a no-op and is allowed.
pub fn is_valid_turn(current: Direction, proposed: Direction) -> bool {
    proposed != current.opposite()
}

/// The cell one step from `head` in `direction` on a `width` × `height`
/// torus.  Moving off one edge reappears on the opposite edge.
pub fn next_position(head: Position, direction: Direction, width: u16, height: u16) -> Position {
    let (dx, dy) = direction.delta();
    Position {
        x: wrap(head.x, dx, width),
        y: wrap(head.y, dy, height),
    }
}

fn wrap(coord: u16, delta: i32, span: u16) -> u16 {
    let wrapped = (i32::from(coord) + delta).rem_euclid(i32::from(span));
    // rem_euclid against a positive span lands in 0..span
    u16::try_from(wrapped).expect("wrapped coordinate should fit its span")
}

/// Whether `head` occupies any of the cells of `body`.
pub fn collides_with_body<I: IntoIterator<Item = Position>>(head: Position, body: I) -> bool {
    body.into_iter().any(|p| p == head)
}

/// Whether `head` is on the food cell.
pub fn collides_with_food(head: Position, food: Position) -> bool {
    head == food
}

/// Proportionally rescale `pos` from an `old_width` × `old_height` grid onto
/// a `new_width` × `new_height` grid, clamping into the new bounds.  Used
/// when the viewport resizes so the snake and food keep their relative
/// placement.
pub fn scale(
    pos: Position,
    old_width: u16,
    old_height: u16,
    new_width: u16,
    new_height: u16,
) -> Position {
    Position {
        x: scale_coord(pos.x, old_width, new_width),
        y: scale_coord(pos.y, old_height, new_height),
    }
}

fn scale_coord(coord: u16, old: u16, new: u16) -> u16 {
    let scaled = u32::from(coord) * u32::from(new) / u32::from(old);
    // an in-bounds coordinate scales to less than `new`
    u16::try_from(scaled)
        .unwrap_or(u16::MAX)
        .min(new.saturating_sub(1))
}
