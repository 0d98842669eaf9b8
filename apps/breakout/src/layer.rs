use crate::game::{Breakout, Controls, GameState};
use glam::{Mat4, Vec2, Vec3, Vec4};
use mamba_app::{AppContext, AppError, Layer, LayerCtx};
use mamba_input::{Event, EventKind, KeyCode};
use mamba_render::{Font, OrthographicCamera};
use mamba_render_wgpu::Texture;

const PADDLE_COLOR: Vec4 = Vec4::new(0.2, 0.6, 1.0, 1.0);
const BALL_COLOR: Vec4 = Vec4::ONE;
const BACKGROUND_COLOR: Vec4 = Vec4::new(0.1, 0.1, 0.15, 1.0);
const TEXT_COLOR: Vec4 = Vec4::ONE;
const LOSE_COLOR: Vec4 = Vec4::new(1.0, 0.3, 0.3, 1.0);
const WIN_COLOR: Vec4 = Vec4::new(0.3, 1.0, 0.3, 1.0);
const HINT_COLOR: Vec4 = Vec4::new(1.0, 1.0, 1.0, 0.7);

const LEFT_KEYS: [KeyCode; 2] = [KeyCode::ArrowLeft, KeyCode::KeyA];
const RIGHT_KEYS: [KeyCode; 2] = [KeyCode::ArrowRight, KeyCode::KeyD];

pub struct BreakoutLayer {
    font: Font<Texture>,
    camera: Option<OrthographicCamera>,
    /// Built on the first frame, once the framebuffer size is known.
    game: Option<Breakout>,
}

impl BreakoutLayer {
    pub fn new(ctx: &mut AppContext) -> Result<Self, AppError> {
        Ok(Self {
            font: ctx.load_font()?,
            camera: None,
            game: None,
        })
    }

    fn draw_hud(&self, ctx: &mut AppContext, game: &Breakout) {
        let screen = game.screen();
        let center = screen / 2.0;
        let renderer = &mut ctx.renderer;
        let font = &self.font;

        renderer.draw_text(
            &format!("Score: {}", game.score),
            font,
            Vec2::new(10.0, screen.y - 40.0),
            32.0,
            TEXT_COLOR,
        );
        renderer.draw_text(
            &format!("Lives: {}", game.lives),
            font,
            Vec2::new(screen.x - 120.0, screen.y - 40.0),
            32.0,
            TEXT_COLOR,
        );

        let restart = Vec2::new(center.x - 140.0, center.y - 50.0);
        match game.state {
            GameState::GameOver => {
                renderer.draw_text("GAME OVER", font, center - Vec2::new(100.0, 0.0), 48.0, LOSE_COLOR);
                renderer.draw_text("Press SPACE to restart", font, restart, 24.0, TEXT_COLOR);
            }
            GameState::Win => {
                renderer.draw_text("YOU WIN!", font, center - Vec2::new(80.0, 0.0), 48.0, WIN_COLOR);
                renderer.draw_text("Press SPACE to restart", font, restart, 24.0, TEXT_COLOR);
            }
            GameState::Playing if game.ball.stuck => {
                renderer.draw_text(
                    "Press SPACE to launch",
                    font,
                    center - Vec2::new(130.0, 100.0),
                    24.0,
                    HINT_COLOR,
                );
            }
            GameState::Playing => {}
        }
    }
}

impl Layer<AppContext> for BreakoutLayer {
    fn name(&self) -> &'static str {
        "Breakout"
    }

    fn on_update(&mut self, dt: f32, ctx: &mut LayerCtx<'_>) {
        let screen = ctx.app.framebuffer_size();
        let resized = self
            .game
            .as_ref()
            .is_none_or(|game| game.screen() != screen);
        if self.camera.is_none() || resized {
            self.camera = Some(OrthographicCamera::from_size(screen.x, screen.y));
            match &mut self.game {
                Some(game) => game.set_screen(screen),
                None => {
                    tracing::info!("starting breakout at {}x{}", screen.x, screen.y);
                    self.game = Some(Breakout::new(screen));
                }
            }
        }

        let input = ctx.app.input();
        let controls = Controls {
            left: input.any_key_down(&LEFT_KEYS),
            right: input.any_key_down(&RIGHT_KEYS),
        };
        if let Some(game) = &mut self.game {
            let before = game.state;
            game.update(dt, controls);
            if game.state != before {
                tracing::info!("game {:?} with score {}", game.state, game.score);
            }
        }
    }

    fn on_event(&mut self, event: &mut Event, _ctx: &mut LayerCtx<'_>) {
        let EventKind::KeyPressed { key, repeat: false } = event.kind else {
            return;
        };
        let Some(game) = &mut self.game else {
            return;
        };
        match key {
            KeyCode::Space => game.on_space(),
            KeyCode::Escape => game.restart(),
            _ => return,
        }
        event.handled = true;
    }

    fn on_render(&mut self, ctx: &mut LayerCtx<'_>) {
        let app = &mut *ctx.app;
        app.renderer.set_clear_color(BACKGROUND_COLOR);
        app.renderer.clear();

        let (Some(camera), Some(game)) = (&self.camera, &self.game) else {
            return;
        };

        app.renderer.begin(camera);
        for brick in game.bricks.iter().filter(|b| !b.destroyed) {
            app.renderer.draw_rect(brick.position, brick.size, brick.color);
        }
        app.renderer
            .draw_rect(game.paddle.position, game.paddle.size, PADDLE_COLOR);

        let diameter = game.ball.radius * 2.0;
        let ball = Mat4::from_translation(game.ball.position.extend(0.0))
            * Mat4::from_scale(Vec3::new(diameter, diameter, 1.0));
        app.renderer.draw_circle(ball, BALL_COLOR);

        self.draw_hud(app, game);
        app.renderer.end();
    }
}
