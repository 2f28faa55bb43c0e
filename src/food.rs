use crate::playfield::{distance, Playfield};
use crate::snake::Snake;
use crate::{random_color, Point, Rgb};
use rand::Rng;

/// A head this close to a pellet picks it up.
pub const FOOD_TOUCH_RADIUS: f32 = 30.0;
/// Freshly spawned pellets keep this distance from the playfield edges.
pub const SPAWN_MARGIN: f32 = 50.0;

pub struct FoodItem {
    pub pos: Point,
    pub color: Rgb,
    pub active: bool,
}

/// Arena of food items plus a free-list of retired slots. Items are recycled
/// for the life of the session, never dropped; the active count converges to
/// the configured abundance as pellets are eaten.
pub struct FoodPool {
    items: Vec<FoodItem>,
    free: Vec<usize>,
    abundance: usize,
}

impl FoodPool {
    pub fn new(abundance: usize) -> Self {
        FoodPool { items: Vec::new(), free: Vec::new(), abundance }
    }

    pub fn items(&self) -> &[FoodItem] {
        &self.items
    }

    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|item| item.active).count()
    }

    /// Activate a pellet, reusing a retired slot when one exists. Missing
    /// arguments default to a random interior point and a random palette
    /// color.
    pub fn spawn<R: Rng>(
        &mut self,
        pos: Option<Point>,
        color: Option<Rgb>,
        playfield: &Playfield,
        rng: &mut R,
    ) -> usize {
        let pos = pos.unwrap_or_else(|| playfield.random_interior(SPAWN_MARGIN, rng));
        let color = color.unwrap_or_else(|| random_color(rng));

        if let Some(idx) = self.free.pop() {
            let item = &mut self.items[idx];
            item.pos = pos;
            item.color = color;
            item.active = true;
            return idx;
        }

        self.items.push(FoodItem { pos, color, active: true });
        self.items.len() - 1
    }

    /// Every (snake, pellet) pair currently in pickup range. Several snakes
    /// may claim the same pellet in one tick; the caller resolves the order.
    pub fn touching_pairs(&self, snakes: &[Snake]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (si, snake) in snakes.iter().enumerate() {
            for (fi, item) in self.items.iter().enumerate() {
                if item.active && distance(item.pos, snake.head_pos()) < FOOD_TOUCH_RADIUS {
                    pairs.push((si, fi));
                }
            }
        }
        pairs
    }

    /// Feed every toucher, then either refresh the pellet in place (random
    /// relocation and recolor) while the active count is within the
    /// abundance target, or retire it to the free-list with no replacement.
    pub fn resolve_collisions<R: Rng>(
        &mut self,
        snakes: &mut [Snake],
        playfield: &Playfield,
        rng: &mut R,
    ) {
        for (si, fi) in self.touching_pairs(snakes) {
            snakes[si].eat_food(self.items[fi].color);
            if !self.items[fi].active {
                continue; // already retired by an earlier claim this tick
            }
            if self.active_count() <= self.abundance {
                self.items[fi].pos = playfield.random_any(rng);
                self.items[fi].color = random_color(rng);
            } else {
                self.items[fi].active = false;
                self.free.push(fi);
            }
        }
    }
}
