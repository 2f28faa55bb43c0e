use crate::Point;
use rand::Rng;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Bounded playfield centered on the origin, described by its half-extents.
/// The windowing layer updates the bounds on resize; all queries are pure.
pub struct Playfield {
    half_w: f32,
    half_h: f32,
}

impl Playfield {
    pub fn new(half_w: f32, half_h: f32) -> Self {
        Playfield { half_w, half_h }
    }

    pub fn resize(&mut self, half_w: f32, half_h: f32) {
        self.half_w = half_w;
        self.half_h = half_h;
    }

    pub fn half_width(&self) -> f32 {
        self.half_w
    }

    pub fn half_height(&self) -> f32 {
        self.half_h
    }

    /// Uniformly random point at least `margin` away from every edge.
    pub fn random_interior<R: Rng>(&self, margin: f32, rng: &mut R) -> Point {
        let mx = (self.half_w - margin).max(0.0);
        let my = (self.half_h - margin).max(0.0);
        (rng.gen_range(-mx..=mx), rng.gen_range(-my..=my))
    }

    /// Uniformly random point anywhere inside the bounds, no margin.
    pub fn random_any<R: Rng>(&self, rng: &mut R) -> Point {
        (
            rng.gen_range(-self.half_w..=self.half_w),
            rng.gen_range(-self.half_h..=self.half_h),
        )
    }

    /// Which edge a point lies beyond, if any. Checks run in the fixed order
    /// Right, Left, Top, Bottom; a corner breach resolves to the first match.
    pub fn classify_edge(&self, point: Point) -> Option<Edge> {
        if point.0 > self.half_w {
            Some(Edge::Right)
        } else if point.0 < -self.half_w {
            Some(Edge::Left)
        } else if point.1 > self.half_h {
            Some(Edge::Top)
        } else if point.1 < -self.half_h {
            Some(Edge::Bottom)
        } else {
            None
        }
    }

    /// Where a head that breached `edge` reappears: the opposite boundary,
    /// with the other coordinate untouched.
    pub fn teleport_target(&self, point: Point, edge: Edge) -> Point {
        match edge {
            Edge::Right => (-self.half_w, point.1),
            Edge::Left => (self.half_w, point.1),
            Edge::Top => (point.0, -self.half_h),
            Edge::Bottom => (point.0, self.half_h),
        }
    }
}

pub fn distance(a: Point, b: Point) -> f32 {
    let (dx, dy) = (a.0 - b.0, a.1 - b.1);
    (dx * dx + dy * dy).sqrt()
}
