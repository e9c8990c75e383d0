use crate::Coords;
use crate::snake::Direction::{self, *};

/// A straight run of cells. The run starts at `head` and extends `length`
/// cells backwards, against `direction`, until it reaches the tail.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    head: Coords,
    length: usize,
    direction: Direction,
}

impl Segment {
    pub fn new(head: Coords, length: usize, direction: Direction) -> Self {
        Segment { head, length, direction }
    }

    /// Adds one cell in front of the head. The trailing cells stay put.
    pub fn grow(&mut self) {
        self.length += 1;
        self.head = self.direction.advance(self.head);
    }

    /// Drops the tail cell. Removing an emptied segment is up to the owner.
    pub fn shrink(&mut self) {
        assert!(self.length > 0, "shrinking an empty segment");
        self.length -= 1;
    }

    pub fn head(&self) -> Coords {
        self.head
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Cell at the far end of the run, `None` for an empty segment.
    pub fn tail(&self) -> Option<Coords> {
        if self.length == 0 {
            return None;
        }

        let back = self.length as i32 - 1;
        let (x, y) = self.head;
        Some(match self.direction {
            Left => (x + back, y),
            Right => (x - back, y),
            Up => (x, y + back),
            Down => (x, y - back),
        })
    }

    pub fn contains(&self, (x, y): Coords) -> bool {
        let (head_x, head_y) = self.head;
        let (tail_x, tail_y) = match self.tail() {
            Some(tail) => tail,
            None => return false,
        };

        // Head sits on the low end of the range when moving left/up
        match self.direction {
            Left => y == head_y && x >= head_x && x <= tail_x,
            Right => y == head_y && x <= head_x && x >= tail_x,
            Up => x == head_x && y >= head_y && y <= tail_y,
            Down => x == head_x && y <= head_y && y >= tail_y,
        }
    }

    /// Occupied cells, head first.
    pub fn cells(&self) -> impl Iterator<Item = Coords> {
        let (dx, dy) = self.direction.delta();
        let (x, y) = self.head;
        (0..self.length as i32).map(move |k| (x - dx * k, y - dy * k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Direction; 4] = [Up, Down, Left, Right];

    #[test]
    fn test_cells_trail_behind_head() {
        let seg = Segment::new((10, 10), 3, Right);
        let cells: Vec<_> = seg.cells().collect();
        assert_eq!(cells, vec![(10, 10), (9, 10), (8, 10)]);
        assert_eq!(seg.tail(), Some((8, 10)));

        let seg = Segment::new((4, 4), 2, Up);
        assert_eq!(seg.tail(), Some((4, 5)));
    }

    #[test]
    fn test_contains_exactly_its_cells() {
        for &dir in ALL.iter() {
            let seg = Segment::new((7, 7), 4, dir);
            let cells: Vec<_> = seg.cells().collect();

            for x in 0..15 {
                for y in 0..15 {
                    assert_eq!(
                        seg.contains((x, y)),
                        cells.contains(&(x, y)),
                        "{:?} at ({}, {})",
                        dir,
                        x,
                        y
                    );
                }
            }
        }
    }

    #[test]
    fn test_empty_segment_occupies_nothing() {
        for &dir in ALL.iter() {
            let seg = Segment::new((3, 3), 0, dir);
            assert_eq!(seg.tail(), None);
            assert!(!seg.contains((3, 3)));
            assert_eq!(seg.cells().count(), 0);
        }
    }

    #[test]
    fn test_grow_moves_head_and_keeps_tail() {
        let mut seg = Segment::new((5, 5), 2, Down);
        let tail = seg.tail();

        seg.grow();
        assert_eq!(seg.head(), (5, 6));
        assert_eq!(seg.length(), 3);
        assert_eq!(seg.tail(), tail);
    }

    #[test]
    fn test_grow_from_empty() {
        let mut seg = Segment::new((5, 5), 0, Left);
        seg.grow();
        assert_eq!(seg.head(), (4, 5));
        assert_eq!(seg.tail(), Some((4, 5)));
        assert_eq!(seg.cells().collect::<Vec<_>>(), vec![(4, 5)]);
    }

    #[test]
    fn test_shrink_recedes_tail() {
        let mut seg = Segment::new((5, 5), 3, Left);
        seg.shrink();
        assert_eq!(seg.head(), (5, 5));
        assert_eq!(seg.tail(), Some((6, 5)));
        assert!(!seg.contains((7, 5)));
    }

    #[test]
    fn test_length_matches_cell_count_through_mixed_ops() {
        let mut seg = Segment::new((20, 20), 1, Up);
        let ops = [true, true, false, true, false, false, true, false];

        for &grow in ops.iter() {
            if grow {
                seg.grow();
            } else {
                seg.shrink();
            }
            assert_eq!(seg.cells().count(), seg.length());
            match seg.tail() {
                Some(tail) => assert_eq!(seg.cells().last(), Some(tail)),
                None => assert_eq!(seg.length(), 0),
            }
        }
    }

    #[test]
    #[should_panic(expected = "shrinking an empty segment")]
    fn test_shrink_empty_panics() {
        Segment::new((0, 0), 0, Right).shrink();
    }
}
