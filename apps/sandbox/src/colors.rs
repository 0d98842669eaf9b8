use glam::Vec4;
use mamba_app::{AppContext, Layer, LayerCtx};
use mamba_input::{Event, EventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Blue,
}

impl Color {
    pub fn next(self) -> Self {
        match self {
            Self::Red => Self::Green,
            Self::Green => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    /// Layer name, so other layers can find it in the stack.
    pub fn layer_name(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
        }
    }

    pub fn rgba(self) -> Vec4 {
        match self {
            Self::Red => Vec4::new(1.0, 0.0, 0.0, 1.0),
            Self::Green => Vec4::new(0.0, 1.0, 0.0, 1.0),
            Self::Blue => Vec4::new(0.0, 0.0, 1.0, 1.0),
        }
    }
}

/// Fills the screen with one color.
pub struct ColorLayer {
    color: Color,
    /// Swap itself for the next color on any mouse press.
    cycle_on_click: bool,
}

impl ColorLayer {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            cycle_on_click: false,
        }
    }

    pub fn cycling(color: Color) -> Self {
        Self {
            color,
            cycle_on_click: true,
        }
    }
}

impl Layer<AppContext> for ColorLayer {
    fn name(&self) -> &'static str {
        self.color.layer_name()
    }

    fn on_event(&mut self, event: &mut Event, ctx: &mut LayerCtx<'_>) {
        if !self.cycle_on_click {
            return;
        }
        if let EventKind::MouseButtonPressed { .. } = event.kind {
            let next = self.color.next();
            tracing::info!("{} -> {}", self.color.layer_name(), next.layer_name());
            ctx.transition_to(Self::cycling(next));
            event.handled = true;
        }
    }

    fn on_render(&mut self, ctx: &mut LayerCtx<'_>) {
        ctx.app.renderer.set_clear_color(self.color.rgba());
        ctx.app.renderer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_cycle_back_to_red() {
        let mut c = Color::Red;
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(c.layer_name());
            c = c.next();
        }
        assert_eq!(seen, ["Red", "Green", "Blue"]);
        assert_eq!(c, Color::Red);
    }
}
