use enum_map::Enum;

/// A travel direction on the grid.
///
/// [`Direction::iter()`] yields the variants in declaration order — Up,
/// Down, Left, Right — and the autopilot's search relies on that order
/// being fixed.
#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Iterate over all four directions in declaration order.
    pub fn iter() -> impl Iterator<Item = Direction> {
        (0..Self::LENGTH).map(Self::from_usize)
    }

    /// The direction directly opposite this one.  Applying it twice gets
    /// you back where you started.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit delta as `(dx, dy)`, `y` growing downwards.
    pub(crate) fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Direction::Up, Direction::Down)]
    #[case(Direction::Down, Direction::Up)]
    #[case(Direction::Left, Direction::Right)]
    #[case(Direction::Right, Direction::Left)]
    fn test_opposite(#[case] d: Direction, #[case] r: Direction) {
        assert_eq!(d.opposite(), r);
        assert_eq!(d.opposite().opposite(), d);
    }

    #[test]
    fn iter_order() {
        assert_eq!(
            Direction::iter().collect::<Vec<_>>(),
            [
                Direction::Up,
                Direction::Down,
                Direction::Left,
                Direction::Right
            ]
        );
    }
}
