//! Breakout rules, independent of rendering and input plumbing.
//!
//! Coordinates are pixels with the origin at the bottom-left, y up. All
//! positions are centers.

use glam::{Vec2, Vec4};
use mamba_physics::{Aabb, Overlaps};

pub const BRICK_COLORS: [Vec4; 5] = [
    Vec4::new(1.0, 0.3, 0.3, 1.0),
    Vec4::new(1.0, 0.6, 0.2, 1.0),
    Vec4::new(1.0, 1.0, 0.3, 1.0),
    Vec4::new(0.3, 1.0, 0.3, 1.0),
    Vec4::new(0.3, 0.6, 1.0, 1.0),
];

const ROWS: usize = 5;
const COLS: usize = 10;
const BRICK_SIZE: Vec2 = Vec2::new(70.0, 25.0);
const BRICK_PADDING: f32 = 5.0;
const PADDLE_Y: f32 = 40.0;
const PADDLE_SIZE: Vec2 = Vec2::new(100.0, 20.0);
const PADDLE_SPEED: f32 = 500.0;
const BALL_RADIUS: f32 = 10.0;
const BALL_SPEED: f32 = 300.0;
const LIVES: u32 = 3;
const BRICK_SCORE: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub position: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Paddle {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.position, self.size)
    }

    fn top(&self) -> f32 {
        self.position.y + self.size.y / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    /// Rides on the paddle until launched.
    pub stuck: bool,
}

impl Ball {
    /// Square hitbox around the ball.
    fn bounds(&self) -> Aabb {
        Aabb::new(self.position, Vec2::splat(self.radius * 2.0))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Brick {
    pub position: Vec2,
    pub size: Vec2,
    pub color: Vec4,
    pub destroyed: bool,
    pub hits: u32,
}

impl Brick {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.position, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    GameOver,
    Win,
}

/// Held movement keys for one update.
#[derive(Debug, Clone, Copy, Default)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone)]
pub struct Breakout {
    screen: Vec2,
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: Vec<Brick>,
    pub state: GameState,
    pub score: u32,
    pub lives: u32,
}

impl Breakout {
    pub fn new(screen: Vec2) -> Self {
        let paddle = Paddle {
            position: Vec2::new(screen.x / 2.0, PADDLE_Y),
            size: PADDLE_SIZE,
            speed: PADDLE_SPEED,
        };
        let mut game = Self {
            screen,
            ball: Ball {
                position: Vec2::ZERO,
                velocity: Vec2::splat(BALL_SPEED),
                radius: BALL_RADIUS,
                stuck: true,
            },
            paddle,
            bricks: brick_grid(screen),
            state: GameState::Playing,
            score: 0,
            lives: LIVES,
        };
        game.reset_ball();
        game
    }

    /// Start over with the current screen size.
    pub fn restart(&mut self) {
        *self = Self::new(self.screen);
    }

    pub fn screen(&self) -> Vec2 {
        self.screen
    }

    /// Bricks keep their layout; only walls and paddle clamping follow the
    /// new size.
    pub fn set_screen(&mut self, screen: Vec2) {
        self.screen = screen;
    }

    /// Space: launch a stuck ball, or restart a finished game.
    pub fn on_space(&mut self) {
        match self.state {
            GameState::Playing if self.ball.stuck => self.ball.stuck = false,
            GameState::Playing => {}
            GameState::GameOver | GameState::Win => self.restart(),
        }
    }

    pub fn bricks_left(&self) -> usize {
        self.bricks.iter().filter(|b| !b.destroyed).count()
    }

    pub fn update(&mut self, dt: f32, controls: Controls) {
        if self.state != GameState::Playing {
            return;
        }
        self.update_paddle(dt, controls);
        self.update_ball(dt);
        self.check_collisions();

        if self.bricks.iter().all(|b| b.destroyed) {
            self.state = GameState::Win;
        }
    }

    fn reset_ball(&mut self) {
        self.ball.stuck = true;
        self.ball.radius = BALL_RADIUS;
        self.ball.velocity = Vec2::splat(BALL_SPEED);
        self.ball.position = Vec2::new(self.paddle.position.x, self.paddle.top() + self.ball.radius);
    }

    fn update_paddle(&mut self, dt: f32, controls: Controls) {
        let mut step = 0.0;
        if controls.left {
            step -= self.paddle.speed * dt;
        }
        if controls.right {
            step += self.paddle.speed * dt;
        }
        let half = self.paddle.size.x / 2.0;
        // max/min rather than clamp: a screen narrower than the paddle must not panic.
        self.paddle.position.x = (self.paddle.position.x + step)
            .min(self.screen.x - half)
            .max(half);
    }

    fn update_ball(&mut self, dt: f32) {
        if self.ball.stuck {
            self.ball.position.x = self.paddle.position.x;
            return;
        }

        let ball = &mut self.ball;
        ball.position += ball.velocity * dt;

        if ball.position.x - ball.radius <= 0.0 {
            ball.velocity.x = ball.velocity.x.abs();
            ball.position.x = ball.radius;
        }
        if ball.position.x + ball.radius >= self.screen.x {
            ball.velocity.x = -ball.velocity.x.abs();
            ball.position.x = self.screen.x - ball.radius;
        }
        if ball.position.y + ball.radius >= self.screen.y {
            ball.velocity.y = -ball.velocity.y.abs();
            ball.position.y = self.screen.y - ball.radius;
        }
        if ball.position.y - ball.radius <= 0.0 {
            self.lives = self.lives.saturating_sub(1);
            if self.lives == 0 {
                self.state = GameState::GameOver;
            } else {
                self.reset_ball();
            }
        }
    }

    fn check_collisions(&mut self) {
        if self.ball.stuck || self.state != GameState::Playing {
            return;
        }

        let hitbox = self.ball.bounds();
        if hitbox.overlaps(&self.paddle.bounds()) && self.ball.velocity.y < 0.0 {
            self.ball.velocity.y = self.ball.velocity.y.abs();
            // -1 at the left edge, 1 at the right.
            let hit = (self.ball.position.x - self.paddle.position.x) / (self.paddle.size.x / 2.0);
            self.ball.velocity.x = hit * BALL_SPEED;
            self.ball.position.y = self.paddle.top() + self.ball.radius;
        }

        let Some(brick) = self
            .bricks
            .iter_mut()
            .find(|b| !b.destroyed && hitbox.overlaps(&b.bounds()))
        else {
            return;
        };

        brick.hits = brick.hits.saturating_sub(1);
        if brick.hits == 0 {
            brick.destroyed = true;
            self.score += BRICK_SCORE;
        }

        let bounds = brick.bounds();
        let half = bounds.half_extents();
        let ball = &mut self.ball;
        let penetration = ball.position - bounds.closest_point(ball.position);
        if penetration.x.abs() > penetration.y.abs() {
            ball.velocity.x = -ball.velocity.x;
            ball.position.x = if penetration.x > 0.0 {
                bounds.center.x + half.x + ball.radius
            } else {
                bounds.center.x - half.x - ball.radius
            };
        } else {
            ball.velocity.y = -ball.velocity.y;
            ball.position.y = if penetration.y > 0.0 {
                bounds.center.y + half.y + ball.radius
            } else {
                bounds.center.y - half.y - ball.radius
            };
        }
    }
}

fn brick_grid(screen: Vec2) -> Vec<Brick> {
    let step = BRICK_SIZE + Vec2::splat(BRICK_PADDING);
    let total_width = COLS as f32 * step.x - BRICK_PADDING;
    let start = Vec2::new(
        (screen.x - total_width) / 2.0 + BRICK_SIZE.x / 2.0,
        screen.y - 100.0,
    );

    let mut bricks = Vec::with_capacity(ROWS * COLS);
    for row in 0..ROWS {
        for col in 0..COLS {
            bricks.push(Brick {
                position: Vec2::new(
                    start.x + col as f32 * step.x,
                    start.y - row as f32 * step.y,
                ),
                size: BRICK_SIZE,
                color: BRICK_COLORS[row % BRICK_COLORS.len()],
                destroyed: false,
                hits: 1,
            });
        }
    }
    bricks
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    fn launched() -> Breakout {
        let mut game = Breakout::new(SCREEN);
        game.on_space();
        game
    }

    #[test]
    fn initial_layout() {
        let game = Breakout::new(SCREEN);
        assert_eq!(game.bricks.len(), 50);
        assert_eq!(game.bricks_left(), 50);
        assert_eq!(game.paddle.position, Vec2::new(400.0, 40.0));
        assert_eq!(game.ball.position, Vec2::new(400.0, 60.0));
        assert!(game.ball.stuck);
        assert_eq!((game.score, game.lives), (0, 3));

        // Row is centered: 10 bricks * 75 - 5 = 745 wide.
        let first = &game.bricks[0];
        assert_eq!(first.position, Vec2::new(27.5 + 35.0, 500.0));
        assert_eq!(first.color, BRICK_COLORS[0]);
        let last = &game.bricks[49];
        assert_eq!(last.position, Vec2::new(62.5 + 9.0 * 75.0, 500.0 - 4.0 * 30.0));
        assert_eq!(last.color, BRICK_COLORS[4]);
    }

    #[test]
    fn stuck_ball_rides_the_paddle() {
        let mut game = Breakout::new(SCREEN);
        game.update(0.1, Controls { left: true, right: false });
        assert_eq!(game.paddle.position.x, 350.0);
        assert_eq!(game.ball.position.x, 350.0);
        assert!(game.ball.stuck);
    }

    #[test]
    fn paddle_is_clamped_to_screen() {
        let mut game = Breakout::new(SCREEN);
        game.update(10.0, Controls { left: false, right: true });
        assert_eq!(game.paddle.position.x, 750.0);
        game.update(10.0, Controls { left: true, right: false });
        assert_eq!(game.paddle.position.x, 50.0);
    }

    #[test]
    fn space_launches_then_does_nothing() {
        let mut game = launched();
        assert!(!game.ball.stuck);
        game.on_space();
        assert!(!game.ball.stuck);
        assert_eq!(game.state, GameState::Playing);
    }

    #[test]
    fn walls_reflect() {
        let mut game = launched();
        game.ball.position = Vec2::new(5.0, 300.0);
        game.ball.velocity = Vec2::new(-300.0, 0.0);
        game.update(0.01, Controls::default());
        assert!(game.ball.velocity.x > 0.0);
        assert_eq!(game.ball.position.x, game.ball.radius);

        game.ball.position = Vec2::new(400.0, 595.0);
        game.ball.velocity = Vec2::new(0.0, 300.0);
        game.bricks.clear();
        game.bricks.push(Brick {
            position: Vec2::new(-500.0, -500.0),
            size: Vec2::ONE,
            color: Vec4::ONE,
            destroyed: false,
            hits: 1,
        });
        game.update(0.01, Controls::default());
        assert!(game.ball.velocity.y < 0.0);
        assert_eq!(game.ball.position.y, 590.0);
    }

    #[test]
    fn falling_out_costs_a_life_then_the_game() {
        let mut game = launched();
        for lives_left in [2, 1] {
            game.ball.position = Vec2::new(400.0, 5.0);
            game.ball.velocity = Vec2::new(0.0, -300.0);
            game.ball.stuck = false;
            // Keep the paddle out of the way.
            game.paddle.position.x = 700.0;
            game.update(0.01, Controls::default());
            assert_eq!(game.lives, lives_left);
            assert!(game.ball.stuck);
            assert_eq!(game.state, GameState::Playing);
        }

        game.ball.position = Vec2::new(400.0, 5.0);
        game.ball.velocity = Vec2::new(0.0, -300.0);
        game.ball.stuck = false;
        game.paddle.position.x = 700.0;
        game.update(0.01, Controls::default());
        assert_eq!(game.lives, 0);
        assert_eq!(game.state, GameState::GameOver);

        // Frozen until restarted.
        let before = game.ball.position;
        game.update(0.1, Controls::default());
        assert_eq!(game.ball.position, before);

        game.on_space();
        assert_eq!(game.state, GameState::Playing);
        assert_eq!((game.lives, game.score, game.bricks_left()), (3, 0, 50));
    }

    #[test]
    fn paddle_hit_angles_the_ball() {
        let mut game = launched();
        // Right half of the paddle, moving down.
        game.ball.position = Vec2::new(425.0, 55.0);
        game.ball.velocity = Vec2::new(0.0, -300.0);
        game.update(0.0, Controls::default());
        assert_eq!(game.ball.velocity, Vec2::new(150.0, 300.0));
        assert_eq!(game.ball.position.y, 60.0);
    }

    #[test]
    fn ball_moving_up_passes_through_paddle() {
        let mut game = launched();
        game.ball.position = Vec2::new(400.0, 45.0);
        game.ball.velocity = Vec2::new(0.0, 300.0);
        game.update(0.0, Controls::default());
        assert_eq!(game.ball.velocity, Vec2::new(0.0, 300.0));
        assert_eq!(game.ball.position.y, 45.0);
    }

    #[test]
    fn brick_hit_from_below_scores_and_bounces() {
        let mut game = launched();
        let target = game.bricks[45].position;
        // Just under the bottom edge of the brick, rising.
        game.ball.position = Vec2::new(target.x, target.y - 12.5 - 5.0);
        game.ball.velocity = Vec2::new(0.0, 300.0);
        game.update(0.0, Controls::default());

        assert!(game.bricks[45].destroyed);
        assert_eq!(game.score, 10);
        assert_eq!(game.bricks_left(), 49);
        assert_eq!(game.ball.velocity.y, -300.0);
        assert_eq!(game.ball.position.y, target.y - 12.5 - 10.0);
    }

    #[test]
    fn side_hit_reverses_horizontal_velocity() {
        let mut game = launched();
        let target = game.bricks[40].position;
        game.ball.position = Vec2::new(target.x - 35.0 - 5.0, target.y);
        game.ball.velocity = Vec2::new(300.0, 0.0);
        game.update(0.0, Controls::default());

        assert!(game.bricks[40].destroyed);
        assert_eq!(game.ball.velocity.x, -300.0);
        assert_eq!(game.ball.position.x, target.x - 35.0 - 10.0);
    }

    #[test]
    fn one_brick_per_frame() {
        let mut game = launched();
        // Between two adjacent bricks, overlapping both.
        let a = game.bricks[40].position;
        game.ball.position = Vec2::new(a.x + 37.5, a.y - 12.5 - 5.0);
        game.ball.velocity = Vec2::new(0.0, 300.0);
        game.update(0.0, Controls::default());
        assert_eq!(game.bricks_left(), 49);
    }

    #[test]
    fn clearing_the_last_brick_wins() {
        let mut game = launched();
        let keep = game.bricks[0].clone();
        game.bricks = vec![keep.clone()];
        game.ball.position = Vec2::new(keep.position.x, keep.position.y - 12.5 - 5.0);
        game.ball.velocity = Vec2::new(0.0, 300.0);
        game.update(0.0, Controls::default());
        assert_eq!(game.state, GameState::Win);

        game.on_space();
        assert_eq!(game.state, GameState::Playing);
        assert_eq!(game.bricks_left(), 50);
    }
}
