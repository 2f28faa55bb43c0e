use crate::playfield::distance;
use crate::{random_color, Point, Rgb, SEGMENT_SIZE};
use rand::Rng;
use Heading::*;

/// A head re-entering this close to a body segment counts as a self-collision.
pub const SELF_COLLISION_RADIUS: f32 = 10.0;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Heading {
    Right,
    Up,
    Left,
    Down,
}

impl Heading {
    pub fn opposite(self) -> Self {
        match self {
            Right => Left,
            Left => Right,
            Up => Down,
            Down => Up,
        }
    }

    pub fn vector(self) -> (f32, f32) {
        match self {
            Right => (1.0, 0.0),
            Up => (0.0, 1.0),
            Left => (-1.0, 0.0),
            Down => (0.0, -1.0),
        }
    }
}

/// One square unit of a snake's body. `color` is `None` until a food pellet
/// fills the segment in.
#[derive(Copy, Clone, Debug)]
pub struct Segment {
    pub pos: Point,
    pub heading: Heading,
    pub color: Option<Rgb>,
    pub visible: bool,
}

impl Segment {
    fn new(pos: Point, heading: Heading, color: Option<Rgb>) -> Self {
        Segment { pos, heading, color, visible: true }
    }

    fn advance(&mut self, dist: f32) {
        let (dx, dy) = self.heading.vector();
        self.pos.0 += dx * dist;
        self.pos.1 += dy * dist;
    }
}

pub struct Snake {
    segments: Vec<Segment>,
    score: u32,
    last_collision_index: usize,
    input_locked: bool,
}

impl Snake {
    /// A fresh snake laid out tailward from `origin`. Player one starts with
    /// randomly colored segments (they seed the food pool at session start);
    /// player two starts blank.
    pub fn new<R: Rng>(
        origin: Point,
        length: usize,
        heading: Heading,
        colored: bool,
        rng: &mut R,
    ) -> Self {
        let (dx, dy) = heading.vector();
        let segments = (0..length)
            .map(|i| {
                let pos = (
                    origin.0 - dx * SEGMENT_SIZE * i as f32,
                    origin.1 - dy * SEGMENT_SIZE * i as f32,
                );
                let color = if colored { Some(random_color(rng)) } else { None };
                Segment::new(pos, heading, color)
            })
            .collect();

        Snake { segments, score: 0, last_collision_index: 0, input_locked: true }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn head(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn head_pos(&self) -> Point {
        self.segments[0].pos
    }

    pub fn heading(&self) -> Heading {
        self.segments[0].heading
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn last_collision_index(&self) -> usize {
        self.last_collision_index
    }

    /// Steer the head. At most one turn is accepted per tick, and a reversal
    /// into the opposite heading is rejected outright.
    pub fn turn(&mut self, heading: Heading) {
        if self.input_locked || heading == self.heading().opposite() {
            return;
        }
        self.segments[0].heading = heading;
        self.input_locked = true;
    }

    /// Advance one step: every segment adopts the pre-move heading and
    /// position of the segment ahead of it, then the head moves forward.
    /// The single reverse sweep reads each leader before it has moved.
    pub fn move_step(&mut self) {
        self.input_locked = false;
        for idx in (1..self.segments.len()).rev() {
            let leader = self.segments[idx - 1];
            self.segments[idx].heading = leader.heading;
            self.segments[idx].pos = leader.pos;
        }
        self.segments[0].advance(SEGMENT_SIZE);
    }

    /// True when the head touches any non-head segment. Records the first
    /// matching segment's index for the repair that follows.
    pub fn is_self_collision(&mut self) -> bool {
        let head = self.segments[0].pos;
        for (idx, seg) in self.segments.iter().enumerate().skip(1) {
            if distance(head, seg.pos) < SELF_COLLISION_RADIUS {
                self.last_collision_index = idx;
                return true;
            }
        }
        false
    }

    pub fn extend(&mut self, color: Rgb) {
        let tail = *self.segments.last().expect("snake is never empty");
        self.segments.push(Segment::new(tail.pos, tail.heading, Some(color)));
    }

    /// Consume one pellet: color fills existing blank segments head-first,
    /// and the chain only grows once fully colored.
    pub fn eat_food(&mut self, color: Rgb) {
        self.score += 1;
        if self.segments.last().expect("snake is never empty").color.is_some() {
            self.extend(color);
            return;
        }
        for idx in (1..self.segments.len()).rev() {
            self.segments[idx].color = self.segments[idx - 1].color;
        }
        self.segments[0].color = Some(color);
    }

    /// Score reset; with no explicit value the score is capped at the prefix
    /// that survived the last self-collision.
    pub fn set_score(&mut self, n: Option<u32>) {
        self.score = n.unwrap_or(self.last_collision_index as u32);
    }

    pub fn uncolor_segments(&mut self) {
        for seg in &mut self.segments {
            seg.color = None;
        }
    }

    pub fn hide_segment(&mut self, idx: usize) {
        self.segments[idx].visible = false;
    }

    pub fn move_segment(&mut self, idx: usize, pos: Point) {
        self.segments[idx].pos = pos;
    }

    /// Drop the tail from `start` onward. The head always survives.
    pub fn cut_segments(&mut self, start: usize) {
        self.segments.truncate(start.max(1));
    }

    ///////////////////////////////////////////////////////////////////////////
    // Undo replay. The caller reverses the headings, repeats back steps until
    // the head heading changes (the corner where the crash happened) or a step
    // bound is hit, then reverses the headings again.

    pub fn reverse_headings(&mut self) {
        for seg in &mut self.segments {
            seg.heading = seg.heading.opposite();
        }
    }

    /// One backward replay step: a follow pass from the head end, then the
    /// tail advances along its (reversed) heading.
    pub fn follow_back_step(&mut self) {
        for idx in 0..self.segments.len() - 1 {
            let leader = self.segments[idx + 1];
            self.segments[idx].heading = leader.heading;
            self.segments[idx].pos = leader.pos;
        }
        self.segments.last_mut().expect("snake is never empty").advance(SEGMENT_SIZE);
    }
}

#[cfg(test)]
mod tests {
    use super::{Heading, Snake};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    fn blank_snake(length: usize) -> Snake {
        Snake::new((0.0, 0.0), length, Heading::Right, false, &mut rng())
    }

    #[test]
    fn segments_follow_their_leader_on_move() {
        let mut snake = blank_snake(3);
        let before: Vec<_> = snake.segments().iter().map(|s| (s.pos, s.heading)).collect();

        snake.move_step();

        assert_eq!(snake.head_pos(), (20.0, 0.0));
        for i in 1..3 {
            assert_eq!(snake.segments()[i].pos, before[i - 1].0);
            assert_eq!(snake.segments()[i].heading, before[i - 1].1);
        }
    }

    #[test]
    fn one_turn_per_tick_and_no_reversals() {
        let mut snake = blank_snake(3);

        // Input starts locked until the first move completes.
        snake.turn(Heading::Up);
        assert_eq!(snake.heading(), Heading::Right);

        snake.move_step();
        snake.turn(Heading::Left); // reversal, rejected
        assert_eq!(snake.heading(), Heading::Right);

        snake.turn(Heading::Up);
        assert_eq!(snake.heading(), Heading::Up);

        snake.turn(Heading::Down); // second turn this tick, locked out
        assert_eq!(snake.heading(), Heading::Up);
    }

    #[test]
    fn food_fills_blank_segments_before_growing() {
        let mut snake = blank_snake(3);
        let colors = [(10, 0, 0), (0, 10, 0), (0, 0, 10), (9, 9, 9)];

        for (i, &color) in colors.iter().take(3).enumerate() {
            snake.eat_food(color);
            assert_eq!(snake.len(), 3, "no growth while filling, pellet {}", i + 1);
        }
        assert_eq!(snake.segments()[0].color, Some(colors[2]));
        assert_eq!(snake.segments()[1].color, Some(colors[1]));
        assert_eq!(snake.segments()[2].color, Some(colors[0]));

        snake.eat_food(colors[3]);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.segments()[3].color, Some(colors[3]));
        assert_eq!(snake.score(), 4);
    }

    #[test]
    fn self_collision_records_first_matching_segment() {
        let mut snake = blank_snake(5);

        // Segments sit at x = 0, -20, -40, -60, -80. Park the head within
        // radius of segment 2 but not segment 1.
        snake.move_segment(0, (-42.0, 0.0));

        assert!(snake.is_self_collision());
        assert_eq!(snake.last_collision_index(), 2);
    }

    #[test]
    fn no_self_collision_when_body_is_clear() {
        let mut snake = blank_snake(5);
        assert!(!snake.is_self_collision());
    }

    #[test]
    fn cutting_never_empties_the_chain() {
        let mut snake = blank_snake(5);

        snake.cut_segments(2);
        assert_eq!(snake.len(), 2);

        snake.cut_segments(0);
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn undo_replay_stops_at_a_heading_discontinuity() {
        let mut snake = blank_snake(3);
        snake.move_step();
        snake.turn(Heading::Up);
        snake.move_step();
        // head (20, 20) up, middle (20, 0) up, tail (0, 0) still right

        snake.reverse_headings();
        let target = snake.heading();
        let mut steps = 0;
        for _ in 0..10 {
            if snake.heading() != target {
                break;
            }
            snake.follow_back_step();
            steps += 1;
        }
        snake.reverse_headings();

        assert_eq!(steps, 2);
        assert_eq!(snake.head_pos(), (0.0, 0.0));
    }
}
