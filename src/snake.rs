use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::arena::Arena;
use crate::segment::Segment;
use crate::Coords;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn delta(&self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn advance(&self, (x, y): Coords) -> Coords {
        let (dx, dy) = self.delta();
        (x + dx, y + dy)
    }

    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!((self, other), (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right))
    }
}

/// The snake body as a run of straight segments, head segment first.
///
/// Each tick the head segment grows by one cell; the tail only recedes when
/// the caller asks for it with `shrink`. A turn pushes an empty segment in
/// front, which the next `update` starts filling.
#[derive(Clone, Debug)]
pub struct Snake {
    segments: VecDeque<Segment>,
    direction: Direction,
    dir_update_pending: bool,
    initial_length: usize,
    exempt_segments: usize,
}

impl Snake {
    /// Creates a snake at a random spot of the arena.
    pub fn new<R: Rng>(arena: &Arena, initial_length: usize, exempt_segments: usize, rng: &mut R) -> Self {
        assert!(initial_length > 0, "snake needs at least one cell");

        let mut snake = Snake {
            segments: VecDeque::new(),
            direction: Right,
            dir_update_pending: false,
            initial_length,
            exempt_segments,
        };
        snake.regenerate(arena, rng);
        snake
    }

    /// Builds a snake from explicit segments, head segment first.
    #[cfg(test)]
    pub fn from_segments(segments: Vec<Segment>, exempt_segments: usize) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");

        let initial_length = segments.iter().map(Segment::length).sum();
        Snake {
            direction: segments[0].direction(),
            segments: segments.into(),
            dir_update_pending: false,
            initial_length,
            exempt_segments,
        }
    }

    pub fn regenerate<R: Rng>(&mut self, arena: &Arena, rng: &mut R) {
        let length = self.initial_length as i32;
        assert!(
            arena.columns() > length * 2 && arena.rows() > length * 2,
            "a snake of length {} does not fit a {}x{} arena",
            length,
            arena.columns(),
            arena.rows()
        );

        let head = (
            rng.gen_range(length..arena.columns() - length),
            rng.gen_range(length..arena.rows() - length),
        );
        let direction = *Direction::ALL.choose(rng).unwrap_or(&Right);

        self.segments.clear();
        self.segments.push_back(Segment::new(head, self.initial_length, direction));
        self.direction = direction;
        self.dir_update_pending = false;
    }

    /// Queues a turn for the next update. Returns whether it was accepted.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if self.dir_update_pending
            || new_direction == self.direction
            || new_direction.is_opposite(self.direction)
        {
            debug!(?new_direction, current = ?self.direction, "turn rejected");
            return false;
        }

        let head = self.head();
        self.segments.push_front(Segment::new(head, 0, new_direction));
        self.direction = new_direction;
        self.dir_update_pending = true;
        true
    }

    /// Moves the head one cell forward. The tail is left alone.
    pub fn update(&mut self) {
        self.segments.front_mut().expect("snake has no segments").grow();
        self.dir_update_pending = false;
    }

    /// Pulls the tail in by one cell, retiring the last segment once empty.
    pub fn shrink(&mut self) {
        let tail_segment = self.segments.back_mut().expect("snake has no segments");
        tail_segment.shrink();
        if tail_segment.length() == 0 {
            self.segments.pop_back();
        }
    }

    pub fn head(&self) -> Coords {
        self.segments.front().map(Segment::head).expect("snake has no segments")
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Total number of occupied cells.
    pub fn len(&self) -> usize {
        self.segments.iter().map(Segment::length).sum()
    }

    pub fn contains(&self, cell: Coords) -> bool {
        self.segments.iter().any(|seg| seg.contains(cell))
    }

    /// Whether the head runs into the body. The first `exempt_segments`
    /// segments are too close to the head to ever loop back onto it.
    pub fn eats_itself(&self) -> bool {
        let head = self.head();
        self.segments.iter().skip(self.exempt_segments).any(|seg| seg.contains(head))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cells(snake: &Snake) -> Vec<Coords> {
        snake.segments().flat_map(|seg| seg.cells()).collect()
    }

    fn straight(head: Coords, length: usize, direction: Direction) -> Snake {
        Snake::from_segments(vec![Segment::new(head, length, direction)], 3)
    }

    #[test]
    fn test_opposite_directions() {
        assert!(Up.is_opposite(Down));
        assert!(Left.is_opposite(Right));
        assert!(!Up.is_opposite(Left));
        assert!(!Right.is_opposite(Right));
    }

    #[test]
    fn test_regenerate_fits_inside_arena() {
        let arena = Arena::new(10, 8);

        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let snake = Snake::new(&arena, 3, 3, &mut rng);

            assert_eq!(snake.segments().count(), 1);
            assert_eq!(snake.len(), 3);
            assert!(cells(&snake).iter().all(|&cell| arena.contains(cell)));

            let (x, y) = snake.head();
            assert!((3..7).contains(&x));
            assert!((3..5).contains(&y));
        }
    }

    #[test]
    fn test_regenerate_picks_every_direction() {
        let arena = Arena::new(40, 40);
        let mut rng = StdRng::seed_from_u64(7);
        let mut snake = Snake::new(&arena, 3, 3, &mut rng);
        let mut seen = Vec::new();

        for _ in 0..100 {
            snake.regenerate(&arena, &mut rng);
            if !seen.contains(&snake.direction()) {
                seen.push(snake.direction());
            }
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn test_snake_too_long_for_arena() {
        let mut rng = StdRng::seed_from_u64(1);
        Snake::new(&Arena::new(6, 40), 3, 3, &mut rng);
    }

    #[test]
    fn test_move_without_food() {
        let mut snake = straight((10, 10), 3, Right);
        assert_eq!(cells(&snake), vec![(10, 10), (9, 10), (8, 10)]);

        snake.update();
        snake.shrink();
        assert_eq!(cells(&snake), vec![(11, 10), (10, 10), (9, 10)]);
        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn test_update_without_shrink_grows() {
        let mut snake = straight((10, 10), 3, Right);
        snake.update();
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), (11, 10));
    }

    #[test]
    fn test_turn_adds_empty_head_segment() {
        let mut snake = straight((10, 10), 3, Right);

        assert!(snake.set_direction(Up));
        assert_eq!(snake.direction(), Up);
        assert_eq!(snake.segments().count(), 2);

        let head_segment = *snake.segments().next().unwrap();
        assert_eq!(head_segment.length(), 0);
        assert_eq!(head_segment.head(), (10, 10));
        assert_eq!(snake.len(), 3);

        snake.update();
        let head_segment = *snake.segments().next().unwrap();
        assert_eq!(head_segment.length(), 1);
        assert_eq!(snake.head(), (10, 9));

        snake.shrink();
        assert_eq!(snake.len(), 3);
        assert_eq!(cells(&snake), vec![(10, 9), (10, 10), (9, 10)]);
    }

    #[test]
    fn test_turn_rejections() {
        let mut snake = straight((10, 10), 3, Right);
        assert!(!snake.set_direction(Right));
        assert!(!snake.set_direction(Left));
        assert_eq!(snake.segments().count(), 1);

        assert!(snake.set_direction(Down));
        // Only one turn per update
        assert!(!snake.set_direction(Left));
        assert_eq!(snake.direction(), Down);
        assert_eq!(snake.segments().count(), 2);

        snake.update();
        assert!(snake.set_direction(Left));
    }

    #[test]
    fn test_shrink_retires_turn_markers() {
        let mut snake = straight((10, 10), 3, Right);
        snake.set_direction(Down);

        for _ in 0..3 {
            snake.update();
            snake.shrink();
        }
        assert_eq!(snake.segments().count(), 1);
        assert_eq!(cells(&snake), vec![(10, 13), (10, 12), (10, 11)]);
    }

    #[test]
    fn test_contains_across_segments() {
        let mut snake = straight((10, 10), 3, Right);
        snake.set_direction(Down);
        snake.update();
        snake.shrink();

        assert!(snake.contains((10, 11)));
        assert!(snake.contains((9, 10)));
        assert!(!snake.contains((8, 10)));
        assert!(!snake.contains((11, 10)));
    }

    #[test]
    fn test_short_snake_never_eats_itself() {
        let mut snake = straight((10, 10), 3, Right);
        let turns = [Down, Left, Up, Right, Down, Left];

        for &dir in turns.iter() {
            snake.set_direction(dir);
            snake.update();
            snake.shrink();
            assert!(!snake.eats_itself());
        }
    }

    #[test]
    fn test_head_in_fourth_segment_eats_itself() {
        // Head at (5, 5) heading up, curling back over a body run
        let snake = Snake::from_segments(
            vec![
                Segment::new((5, 5), 1, Up),
                Segment::new((5, 6), 1, Left),
                Segment::new((6, 6), 2, Down),
                Segment::new((7, 5), 3, Right),
            ],
            3,
        );
        assert!(snake.eats_itself());

        let lenient = Snake::from_segments(snake.segments().copied().collect(), 4);
        assert!(!lenient.eats_itself());
    }

    #[test]
    fn test_loop_back_collides() {
        let mut snake = straight((10, 10), 5, Right);
        for &dir in [Down, Left, Up].iter() {
            snake.set_direction(dir);
            snake.update();
            snake.shrink();
        }
        // Down to (10,11), left to (9,11), up onto (9,10)
        assert_eq!(snake.head(), (9, 10));
        assert!(snake.eats_itself());
    }

    #[test]
    #[should_panic(expected = "snake has no segments")]
    fn test_shrink_past_empty_panics() {
        let mut snake = straight((10, 10), 3, Right);
        for _ in 0..4 {
            snake.shrink();
        }
    }

    #[test]
    #[should_panic(expected = "snake has no segments")]
    fn test_update_on_empty_snake_panics() {
        let mut snake = straight((10, 10), 1, Right);
        snake.shrink();
        snake.update();
    }
}
