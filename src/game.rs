use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::UserData;
use crate::food::{FoodPool, SPAWN_MARGIN};
use crate::playfield::{distance, Playfield};
use crate::snake::{Heading, Snake};
use crate::surface::{Action, Surface};
use crate::{Point, Rgb, WHITE, YELLOW};

const BASE_INTERVAL_MS: u64 = 90;

/// A snake head this close to any opposing segment loses the exchange.
const PLAYER_COLLISION_RADIUS: f32 = 20.0;
/// Segments surviving a catastrophic (wall or player-vs-player) reaction.
const CATASTROPHIC_KEEP: usize = 4;

const UNDO_MAX_STEPS: usize = 10;
const UNDO_FRAME: Duration = Duration::from_millis(150);
const FLASH_FRAMES: usize = 6;
const FLASH_FRAME: Duration = Duration::from_millis(200);
const HIDE_FRAME: Duration = Duration::from_millis(50);
const GLIDE_STEPS: usize = 5;
const GLIDE_FRAME: Duration = Duration::from_millis(30);

/// Vertical offset of the starting rows; player one spawns above the center
/// heading right, player two below heading left.
const START_ROW: f32 = 40.0;

/// Loop-local copy of the configured options. The session mutates only this
/// copy (speed keys, highscore) and hands the final values back for
/// persistence when it ends.
#[derive(Copy, Clone, Debug)]
pub struct SessionConfig {
    pub two_player: bool,
    pub speed: u8,
    pub initial_length: usize,
    pub food_abundance: usize,
    pub wall_teleport: bool,
    pub highscore: u32,
}

impl SessionConfig {
    pub fn from_userdata(data: &UserData) -> Self {
        SessionConfig {
            two_player: data.mode == 2,
            speed: data.speed,
            initial_length: data.length as usize,
            food_abundance: data.food_abundance as usize,
            wall_teleport: data.wall_teleport,
            highscore: data.highscore,
        }
    }

    pub fn to_userdata(&self) -> UserData {
        UserData {
            mode: if self.two_player { 2 } else { 1 },
            speed: self.speed,
            length: self.initial_length as u8,
            food_abundance: self.food_abundance as u8,
            wall_teleport: self.wall_teleport,
            highscore: self.highscore,
        }
    }
}

/// Final values the persistence layer absorbs on session end.
#[derive(Copy, Clone, Debug)]
pub struct SessionOutcome {
    pub speed: u8,
    pub highscore: u32,
}

pub struct GameSession<'s, S: Surface> {
    config: SessionConfig,
    playfield: Playfield,
    snakes: Vec<Snake>,
    food: FoodPool,
    surface: &'s mut S,
    rng: StdRng,
    active: bool,
    quit: bool,
    saved_highscore: u32,
    persist_path: Option<PathBuf>,
}

impl<'s, S: Surface> GameSession<'s, S> {
    pub fn new(config: SessionConfig, playfield: Playfield, surface: &'s mut S) -> Self {
        Self::with_rng(config, playfield, surface, StdRng::from_entropy())
    }

    pub fn with_rng(
        config: SessionConfig,
        playfield: Playfield,
        surface: &'s mut S,
        mut rng: StdRng,
    ) -> Self {
        let mut snakes = vec![Snake::new(
            (0.0, START_ROW),
            config.initial_length,
            Heading::Right,
            true,
            &mut rng,
        )];
        if config.two_player {
            snakes.push(Snake::new(
                (0.0, -START_ROW),
                config.initial_length,
                Heading::Left,
                false,
                &mut rng,
            ));
        }

        GameSession {
            playfield,
            snakes,
            food: FoodPool::new(config.food_abundance),
            surface,
            rng,
            active: true,
            quit: false,
            saved_highscore: config.highscore,
            persist_path: None,
            config,
        }
    }

    /// Where to checkpoint the settings when a new highscore is recorded.
    /// Without a path the session never touches the filesystem.
    pub fn persist_to(&mut self, path: PathBuf) {
        self.persist_path = Some(path);
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn snakes_mut(&mut self) -> &mut [Snake] {
        &mut self.snakes
    }

    pub fn food(&self) -> &FoodPool {
        &self.food
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn spawn_food(&mut self, pos: Option<Point>, color: Option<Rgb>) {
        self.food.spawn(pos, color, &self.playfield, &mut self.rng);
    }

    pub fn outcome(&self) -> SessionOutcome {
        SessionOutcome { speed: self.config.speed, highscore: self.config.highscore }
    }

    /// Run the session until quit or the surface goes away. Ticks are paced
    /// by an explicit deadline; the input wait between ticks is the pacing
    /// delay.
    pub fn run(&mut self) -> SessionOutcome {
        if self.seed_food().is_err() {
            return self.outcome();
        }

        while !self.quit {
            let deadline = Instant::now() + self.tick_interval();
            let actions = match self.surface.poll_actions(deadline) {
                Ok(actions) => actions,
                Err(_) => break,
            };
            for action in actions {
                if self.apply_action(action).is_err() {
                    return self.outcome();
                }
            }
            if !self.active || self.quit {
                continue;
            }
            if self.tick().is_err() {
                // Surface torn down mid-render; treat as a normal end.
                break;
            }
        }

        self.outcome()
    }

    /// The session-start animation: the fresh snake expands each colored
    /// segment out to a random point, shedding one pellet there, then pulls
    /// back together and starts blank. This is what pre-populates the pool.
    pub fn seed_food(&mut self) -> io::Result<()> {
        if !self.config.two_player {
            self.flash_warning(0, 0)?;
        }
        self.disperse_segments(0, 0, true)?;
        self.snakes[0].uncolor_segments();
        self.render_frame()
    }

    /// Advance the simulation one step. Fully sequential: every stage sees
    /// the side effects of the previous one within the same tick.
    pub fn tick(&mut self) -> io::Result<()> {
        for snake in &mut self.snakes {
            snake.move_step();
        }
        for idx in 0..self.snakes.len() {
            if self.snakes[idx].is_self_collision() {
                self.partial_reaction(idx)?;
            }
        }
        for idx in 0..self.snakes.len() {
            self.handle_wall_collision(idx)?;
        }
        if self.config.two_player {
            self.handle_player_collision()?;
        }
        self.food.resolve_collisions(&mut self.snakes, &self.playfield, &mut self.rng);
        if self.config.two_player {
            // Double player mode always wraps, whatever the wall option says.
            self.teleport_edge_touchers();
        }
        self.track_highscore();
        self.render_frame()
    }

    pub fn apply_action(&mut self, action: Action) -> io::Result<()> {
        match action {
            Action::Turn(player, heading) => {
                if self.active {
                    if let Some(snake) = self.snakes.get_mut(player) {
                        snake.turn(heading);
                    }
                }
            }
            Action::TogglePause => {
                self.active = !self.active;
                if self.active {
                    self.surface.hide_banner()?;
                } else {
                    self.surface.show_banner(&["Paused", "Press Space to resume"])?;
                }
            }
            Action::SpeedUp => self.config.speed = (self.config.speed + 1).min(4),
            Action::SpeedDown => self.config.speed = self.config.speed.saturating_sub(1).max(1),
            Action::Resize(half_w, half_h) => self.playfield.resize(half_w, half_h),
            Action::Quit => self.quit = true,
        }
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn tick_interval(&self) -> Duration {
        Duration::from_millis(BASE_INTERVAL_MS / self.config.speed as u64)
    }

    /// Self-collision repair: flash the tail behind the crash point, shed it
    /// as food, strip the remaining colors, back up to the corner, and cap
    /// the score at the surviving prefix.
    fn partial_reaction(&mut self, idx: usize) -> io::Result<()> {
        let start = self.snakes[idx].last_collision_index();
        self.flash_warning(idx, start)?;
        self.disperse_segments(idx, start, false)?;
        self.snakes[idx].uncolor_segments();
        self.animate_undo(idx)?;
        self.snakes[idx].set_score(None);
        self.checkpoint_highscore();
        Ok(())
    }

    /// Wall or player-vs-player reaction: the whole snake flashes, everything
    /// past the first few segments is shed, and the score is quartered.
    fn catastrophic_reaction(&mut self, idx: usize) -> io::Result<()> {
        self.flash_warning(idx, 0)?;
        self.disperse_segments(idx, CATASTROPHIC_KEEP, false)?;
        self.snakes[idx].uncolor_segments();
        self.animate_undo(idx)?;
        let quartered = self.snakes[idx].score() / 4;
        self.snakes[idx].set_score(Some(quartered));
        self.checkpoint_highscore();
        Ok(())
    }

    fn handle_wall_collision(&mut self, idx: usize) -> io::Result<()> {
        if self.config.wall_teleport {
            self.teleport_edge_touchers();
        } else if self.playfield.classify_edge(self.snakes[idx].head_pos()).is_some() {
            self.catastrophic_reaction(idx)?;
        }
        Ok(())
    }

    fn teleport_edge_touchers(&mut self) {
        for snake in &mut self.snakes {
            if let Some(edge) = self.playfield.classify_edge(snake.head_pos()) {
                let target = self.playfield.teleport_target(snake.head_pos(), edge);
                snake.move_segment(0, target);
            }
        }
    }

    /// Whose head struck the other's body. Player one's victimization check
    /// runs first, so simultaneous mutual contact resolves against player
    /// two.
    fn handle_player_collision(&mut self) -> io::Result<()> {
        let head2 = self.snakes[1].head_pos();
        if self.snakes[0]
            .segments()
            .iter()
            .any(|seg| distance(seg.pos, head2) < PLAYER_COLLISION_RADIUS)
        {
            return self.catastrophic_reaction(1);
        }

        let head1 = self.snakes[0].head_pos();
        if self.snakes[1]
            .segments()
            .iter()
            .any(|seg| distance(seg.pos, head1) < PLAYER_COLLISION_RADIUS)
        {
            return self.catastrophic_reaction(0);
        }
        Ok(())
    }

    fn track_highscore(&mut self) {
        if !self.config.two_player && self.snakes[0].score() > self.config.highscore {
            self.config.highscore = self.snakes[0].score();
        }
    }

    fn checkpoint_highscore(&mut self) {
        if self.config.highscore <= self.saved_highscore {
            return;
        }
        if let Some(path) = &self.persist_path {
            if self.config.to_userdata().save_to(path).is_ok() {
                self.saved_highscore = self.config.highscore;
            }
        }
    }

    fn scoreboard_text(&self) -> String {
        if self.config.two_player {
            format!(
                "1st Player: {} | 2nd Player: {}",
                self.snakes[0].score(),
                self.snakes[1].score()
            )
        } else {
            format!(
                "Score: {} | Highscore: {}",
                self.snakes[0].score(),
                self.config.highscore
            )
        }
    }

    ///////////////////////////////////////////////////////////////////////////
    // Animations. Each one renders whole frames through the surface and
    // blocks within the current tick.

    fn flash_warning(&mut self, idx: usize, start: usize) -> io::Result<()> {
        for i in 0..FLASH_FRAMES {
            let flash = if i % 2 == 0 { Some((idx, start)) } else { None };
            self.render_frame_with_flash(flash)?;
            self.surface.sleep(FLASH_FRAME);
        }
        Ok(())
    }

    /// Shed segments from `start` to the tail, tail end first. Blank segments
    /// simply wink out; colored ones glide to a random point and leave a
    /// pellet of their color there. Afterwards the range is cut away, or
    /// glided back home for the session-start seeding pass.
    fn disperse_segments(&mut self, idx: usize, start: usize, retract: bool) -> io::Result<()> {
        let len = self.snakes[idx].len();
        if start >= len {
            return Ok(());
        }
        let origins: Vec<Point> =
            self.snakes[idx].segments()[start..].iter().map(|seg| seg.pos).collect();

        for i in (start..len).rev() {
            let color = self.snakes[idx].segments()[i].color;
            match color {
                None => {
                    self.snakes[idx].hide_segment(i);
                    self.render_frame()?;
                    self.surface.sleep(HIDE_FRAME);
                }
                Some(color) => {
                    let target = self.playfield.random_interior(SPAWN_MARGIN, &mut self.rng);
                    self.glide_segment(idx, i, target)?;
                    self.spawn_food(Some(target), Some(color));
                }
            }
        }

        if retract {
            for (offset, &origin) in origins.iter().enumerate() {
                self.glide_segment(idx, start + offset, origin)?;
            }
        } else {
            self.snakes[idx].cut_segments(start);
        }
        Ok(())
    }

    fn glide_segment(&mut self, idx: usize, seg_idx: usize, target: Point) -> io::Result<()> {
        let from = self.snakes[idx].segments()[seg_idx].pos;
        for step in 1..=GLIDE_STEPS {
            let t = step as f32 / GLIDE_STEPS as f32;
            let pos = (from.0 + (target.0 - from.0) * t, from.1 + (target.1 - from.1) * t);
            self.snakes[idx].move_segment(seg_idx, pos);
            self.render_frame()?;
            self.surface.sleep(GLIDE_FRAME);
        }
        Ok(())
    }

    /// Replay movement in reverse until the repair meets the corner where
    /// the crash happened, or the step bound runs out.
    fn animate_undo(&mut self, idx: usize) -> io::Result<()> {
        self.snakes[idx].reverse_headings();
        let target = self.snakes[idx].heading();
        for _ in 0..UNDO_MAX_STEPS {
            if self.snakes[idx].heading() != target {
                break;
            }
            self.snakes[idx].follow_back_step();
            self.render_frame()?;
            self.surface.sleep(UNDO_FRAME);
        }
        self.snakes[idx].reverse_headings();
        Ok(())
    }

    fn render_frame(&mut self) -> io::Result<()> {
        self.render_frame_with_flash(None)
    }

    fn render_frame_with_flash(&mut self, flash: Option<(usize, usize)>) -> io::Result<()> {
        self.surface.begin_frame();
        for item in self.food.items() {
            if item.active {
                self.surface.draw_circle(item.pos, item.color);
            }
        }
        for (si, snake) in self.snakes.iter().enumerate() {
            for (i, seg) in snake.segments().iter().enumerate() {
                if !seg.visible {
                    continue;
                }
                let mut color = seg.color.unwrap_or(WHITE);
                if let Some((flash_snake, flash_start)) = flash {
                    if flash_snake == si && i >= flash_start {
                        color = YELLOW;
                    }
                }
                self.surface.draw_square(seg.pos, seg.heading, color, i == 0);
            }
        }
        let status = self.scoreboard_text();
        self.surface.write_status(&status);
        self.surface.present()
    }
}
