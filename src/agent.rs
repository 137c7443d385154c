//! Autopilot that plays the game by reading its public state.
//!
//! Each tick the agent proposes a direction through an ordered chain of
//! attempts, short-circuiting on the first that produces one: follow the
//! cached path, breadth-first search avoiding the body, breadth-first
//! search ignoring the body (progress beats paralysis), a bounded greedy
//! walk, and finally a plain collision dodge.
use crate::consts;
use crate::game::{Direction, Game, Position};
use crate::rules;
use log::trace;
use std::collections::{HashMap, HashSet, VecDeque};

/// Plays the game automatically via breadth-first pathfinding with greedy
/// fallbacks.
///
/// The agent is a consumer of [`Game`]'s public state, not part of it: it
/// holds nothing but the path it last planned.  A host asks for
/// [`next_direction()`](PathfindingAgent::next_direction) each tick and
/// feeds the answer to [`Game::turn()`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PathfindingAgent {
    path: VecDeque<Position>,
}

impl PathfindingAgent {
    pub fn new() -> PathfindingAgent {
        PathfindingAgent::default()
    }

    /// The direction to feed [`Game::turn()`] this tick, or `None` when the
    /// game is not running or every surviving option is exhausted (the next
    /// step will then register a fatal collision).
    pub fn next_direction<R>(&mut self, game: &Game<R>) -> Option<Direction> {
        if !game.is_running() {
            return None;
        }
        let head = game.snake().head();
        let food = game.food().position;

        if self.path_still_safe(game) {
            if let Some(direction) = self.follow_path(game, head) {
                return Some(direction);
            }
        }

        trace!("replanning path from {head} to {food}");
        self.path = plan(game, head, food);
        if let Some(direction) = self.follow_path(game, head) {
            return Some(direction);
        }
        dodge(game, head)
    }

    /// Whether the rest of the cached path avoids the snake's current body.
    /// The head is excluded; the path starts there.
    fn path_still_safe<R>(&self, game: &Game<R>) -> bool {
        if self.path.len() < 2 {
            return false;
        }
        let body = game
            .snake()
            .segments()
            .iter()
            .skip(1)
            .copied()
            .collect::<HashSet<_>>();
        self.path.iter().skip(1).all(|pos| !body.contains(pos))
    }

    /// Take the next step of the cached path if it is a legal turn,
    /// consuming the step just walked.
    fn follow_path<R>(&mut self, game: &Game<R>, head: Position) -> Option<Direction> {
        let &next = self.path.get(1)?;
        let direction = direction_towards(head, next, game.width(), game.height())?;
        if rules::is_valid_turn(game.snake().direction(), direction) {
            let _ = self.path.pop_front();
            Some(direction)
        } else {
            None
        }
    }
}

/// Plan a fresh path from `head` to `food`, falling back through ever more
/// permissive strategies.
fn plan<R>(game: &Game<R>, head: Position, food: Position) -> VecDeque<Position> {
    bfs(game, head, food, true)
        .or_else(|| bfs(game, head, food, false))
        .unwrap_or_else(|| greedy_walk(game, head, food))
}

/// Shortest path on the torus by breadth-first search, expanding neighbors
/// in [`Direction`] declaration order.  With `avoid_body` set, cells the
/// snake occupies are impassable.  Returns `None` when the goal is
/// unreachable.
fn bfs<R>(
    game: &Game<R>,
    start: Position,
    goal: Position,
    avoid_body: bool,
) -> Option<VecDeque<Position>> {
    if start == goal {
        return Some(VecDeque::from([start]));
    }
    let blocked = if avoid_body {
        game.snake()
            .segments()
            .iter()
            .copied()
            .collect::<HashSet<_>>()
    } else {
        HashSet::new()
    };
    let mut visited = HashSet::from([start]);
    let mut came_from = HashMap::new();
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        for direction in Direction::iter() {
            let next = rules::next_position(current, direction, game.width(), game.height());
            if visited.contains(&next) || blocked.contains(&next) {
                continue;
            }
            visited.insert(next);
            came_from.insert(next, current);
            if next == goal {
                return Some(rebuild_path(start, goal, &came_from));
            }
            queue.push_back(next);
        }
    }
    None
}

fn rebuild_path(
    start: Position,
    goal: Position,
    came_from: &HashMap<Position, Position>,
) -> VecDeque<Position> {
    let mut path = VecDeque::from([goal]);
    let mut current = goal;
    while current != start {
        let &prev = came_from
            .get(&current)
            .expect("every visited cell after the start has a parent");
        path.push_front(prev);
        current = prev;
    }
    path
}

/// March towards the food one locally-best step at a time, judged by
/// wrapped Manhattan distance, for at most twice the longer grid side.  The
/// result may stop short of the food.
fn greedy_walk<R>(game: &Game<R>, start: Position, goal: Position) -> VecDeque<Position> {
    let blocked = game
        .snake()
        .segments()
        .iter()
        .copied()
        .collect::<HashSet<_>>();
    let mut path = VecDeque::from([start]);
    let mut current = start;
    let mut heading = game.snake().direction();
    let horizon = consts::GREEDY_WALK_FACTOR * usize::from(game.width().max(game.height()));
    for _ in 0..horizon {
        if current == goal {
            break;
        }
        let step = Direction::iter()
            .filter(|&d| rules::is_valid_turn(heading, d))
            .map(|d| {
                (
                    d,
                    rules::next_position(current, d, game.width(), game.height()),
                )
            })
            .filter(|(_, pos)| !blocked.contains(pos))
            .min_by_key(|&(_, pos)| wrapped_manhattan(pos, goal, game.width(), game.height()));
        let Some((direction, next)) = step else {
            break;
        };
        heading = direction;
        current = next;
        path.push_back(next);
    }
    path
}

/// Last resort: the first direction, in fixed preference order, that is a
/// legal turn onto a cell the snake does not occupy.
fn dodge<R>(game: &Game<R>, head: Position) -> Option<Direction> {
    const PREFERENCE: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];
    let snake = game
        .snake()
        .segments()
        .iter()
        .copied()
        .collect::<HashSet<_>>();
    PREFERENCE
        .into_iter()
        .filter(|&d| rules::is_valid_turn(game.snake().direction(), d))
        .find(|&d| !snake.contains(&rules::next_position(head, d, game.width(), game.height())))
}

/// The direction that moves from `from` towards `to`, accounting for
/// wraparound: a displacement longer than half the grid is shorter the
/// other way round.  `None` when the cells coincide.
fn direction_towards(from: Position, to: Position, width: u16, height: u16) -> Option<Direction> {
    let mut dx = i32::from(to.x) - i32::from(from.x);
    let mut dy = i32::from(to.y) - i32::from(from.y);
    if dx.unsigned_abs() > u32::from(width / 2) {
        dx = -dx.signum();
    }
    if dy.unsigned_abs() > u32::from(height / 2) {
        dy = -dy.signum();
    }
    if dx > 0 {
        Some(Direction::Right)
    } else if dx < 0 {
        Some(Direction::Left)
    } else if dy > 0 {
        Some(Direction::Down)
    } else if dy < 0 {
        Some(Direction::Up)
    } else {
        None
    }
}

/// Manhattan distance on the torus.
fn wrapped_manhattan(a: Position, b: Position, width: u16, height: u16) -> u16 {
    let dx = a.x.abs_diff(b.x);
    let dy = a.y.abs_diff(b.y);
    dx.min(width - dx) + dy.min(height - dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use rstest::rstest;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn game_on(width: u16, height: u16) -> Game<ChaCha12Rng> {
        Game::with_size_and_rng(
            GameConfig::default(),
            width,
            height,
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        )
        .unwrap()
    }

    #[rstest]
    #[case(Position::new(5, 5), Position::new(8, 5), Some(Direction::Right))]
    #[case(Position::new(5, 5), Position::new(2, 5), Some(Direction::Left))]
    #[case(Position::new(5, 5), Position::new(5, 2), Some(Direction::Up))]
    #[case(Position::new(5, 5), Position::new(5, 8), Some(Direction::Down))]
    // wrapping: (9, 5) is one step left of (0, 5) on a 10-wide torus
    #[case(Position::new(0, 5), Position::new(9, 5), Some(Direction::Left))]
    #[case(Position::new(9, 5), Position::new(0, 5), Some(Direction::Right))]
    #[case(Position::new(5, 0), Position::new(5, 9), Some(Direction::Up))]
    #[case(Position::new(3, 3), Position::new(3, 3), None)]
    fn test_direction_towards(
        #[case] from: Position,
        #[case] to: Position,
        #[case] r: Option<Direction>,
    ) {
        assert_eq!(direction_towards(from, to, 10, 10), r);
    }

    #[rstest]
    #[case(Position::new(0, 0), Position::new(9, 9), 2)]
    #[case(Position::new(2, 2), Position::new(5, 2), 3)]
    #[case(Position::new(1, 1), Position::new(1, 1), 0)]
    #[case(Position::new(0, 5), Position::new(9, 5), 1)]
    fn test_wrapped_manhattan(#[case] a: Position, #[case] b: Position, #[case] r: u16) {
        assert_eq!(wrapped_manhattan(a, b, 10, 10), r);
    }

    #[test]
    fn heads_straight_for_the_food() {
        // every shortest path from (5, 5) to (8, 5) starts by moving right
        let mut game = game_on(10, 10);
        game.set_food(Position::new(8, 5), Some('★')).unwrap();
        let mut agent = PathfindingAgent::new();
        assert_eq!(agent.next_direction(&game), Some(Direction::Right));
    }

    #[test]
    fn routes_through_the_wrapped_edge() {
        let mut game = game_on(10, 10);
        game.set_snake(vec![Position::new(5, 0)]).unwrap();
        game.set_food(Position::new(5, 8), Some('★')).unwrap();
        let mut agent = PathfindingAgent::new();
        // two steps up across the edge beat eight steps down
        assert_eq!(agent.next_direction(&game), Some(Direction::Up));
    }

    #[test]
    fn bfs_avoids_the_body() {
        let mut game = game_on(10, 10);
        // a wall of body cells directly between head and food
        game.set_snake(vec![
            Position::new(5, 5),
            Position::new(6, 4),
            Position::new(6, 5),
            Position::new(6, 6),
        ])
        .unwrap();
        game.set_food(Position::new(7, 5), Some('★')).unwrap();
        let path = bfs(&game, Position::new(5, 5), Position::new(7, 5), true).unwrap();
        assert_eq!(path.front(), Some(&Position::new(5, 5)));
        assert_eq!(path.back(), Some(&Position::new(7, 5)));
        for pos in path.iter().skip(1) {
            assert!(!game.snake().segments().contains(pos), "{pos}");
        }
    }

    #[test]
    fn bfs_finds_shortest_path_length() {
        let game = game_on(10, 10);
        let path = bfs(&game, Position::new(5, 5), Position::new(8, 7), true).unwrap();
        // Manhattan distance 5 means 6 cells including both endpoints
        assert_eq!(path.len(), 6);
    }

    #[test]
    fn lenient_bfs_ignores_the_body() {
        let mut game = game_on(4, 4);
        // ring around the head: strictly unreachable
        game.set_snake(vec![
            Position::new(1, 1),
            Position::new(0, 1),
            Position::new(2, 1),
            Position::new(1, 0),
            Position::new(1, 2),
        ])
        .unwrap();
        game.set_food(Position::new(3, 3), Some('★')).unwrap();
        assert_eq!(
            bfs(&game, Position::new(1, 1), Position::new(3, 3), true),
            None
        );
        assert!(bfs(&game, Position::new(1, 1), Position::new(3, 3), false).is_some());
    }

    #[test]
    fn eats_around_an_obstacle() {
        let mut game = game_on(10, 10);
        game.set_snake(vec![
            Position::new(5, 5),
            Position::new(6, 4),
            Position::new(6, 5),
            Position::new(6, 6),
        ])
        .unwrap();
        game.set_food(Position::new(7, 5), Some('★')).unwrap();
        let mut agent = PathfindingAgent::new();
        for _ in 0..30 {
            if game.symbols_consumed() > 0 || game.game_over() {
                break;
            }
            if let Some(d) = agent.next_direction(&game) {
                game.turn(d);
            }
            game.step();
        }
        assert!(!game.game_over());
        assert_eq!(game.symbols_consumed(), 1);
    }

    #[test]
    fn no_direction_when_fully_boxed_in() {
        let mut game = game_on(3, 3);
        game.set_food(Position::new(1, 1), Some('★')).unwrap();
        game.set_snake(vec![
            Position::new(1, 1),
            Position::new(0, 1),
            Position::new(2, 1),
            Position::new(1, 0),
            Position::new(1, 2),
        ])
        .unwrap();
        let mut agent = PathfindingAgent::new();
        assert_eq!(agent.next_direction(&game), None);
    }

    #[test]
    fn idle_while_not_running() {
        let mut game = game_on(10, 10);
        let mut agent = PathfindingAgent::new();
        game.pause();
        assert_eq!(agent.next_direction(&game), None);
        game.resume();
        assert!(agent.next_direction(&game).is_some());
    }

    #[test]
    fn survives_and_eats_on_autopilot() {
        let mut game = game_on(12, 12);
        let mut agent = PathfindingAgent::new();
        for _ in 0..250 {
            if game.symbols_consumed() >= 3 {
                break;
            }
            if let Some(d) = agent.next_direction(&game) {
                game.turn(d);
            }
            game.step();
        }
        assert!(!game.game_over());
        assert!(game.symbols_consumed() >= 3);
    }
}
