//! Integration tests for the drawing context through the public API

use rfimage::colors;
use rfimage::vector::{
    Context2d, Drawable, Font, HorizontalAlign, PathCommand, RecordingRenderer, RenderCall, Renderer, SizedDrawable,
    VerticalAlign,
};
use rfimage::{Error, Paint};

struct Badge {
    size: f64,
}

impl Drawable for Badge {
    fn draw<R: Renderer>(&self, ctx: &mut Context2d<R>) {
        let _ = ctx.keep(|ctx| {
            ctx.set_fill_style(colors::RED);
            ctx.fill_rect(0.0, 0.0, self.size, self.size);
            ctx.set_horizontal_align(HorizontalAlign::Center);
            ctx.fill_text("ok", self.size / 2.0, self.size / 2.0);
        });
    }
}

impl SizedDrawable for Badge {
    fn width(&self) -> u32 {
        self.size as u32
    }

    fn height(&self) -> u32 {
        self.size as u32
    }
}

#[test]
fn drawable_leaves_context_state_untouched() {
    let mut ctx = Context2d::new(RecordingRenderer::new());
    ctx.translate(5.0, 5.0);
    let before = ctx.state().clone();

    let badge = Badge { size: 16.0 };
    assert_eq!(badge.width(), 16);
    ctx.draw(&badge);

    assert_eq!(ctx.state(), &before);
    assert_eq!(ctx.depth(), 0);

    let calls = ctx.into_renderer().take_calls();
    assert_eq!(calls.len(), 2);
    match &calls[0] {
        RenderCall::Path { state, fill } => {
            assert!(*fill);
            assert_eq!(state.fill_style, Paint::Color(colors::RED));
            assert_eq!(state.transform.tx, 5.0);
            assert_eq!(state.path.commands()[0], PathCommand::MoveTo { x: 0.0, y: 0.0 });
        }
        other => panic!("expected path, got {:?}", other),
    }
    match &calls[1] {
        // "ok" is 2 chars at 10px => width 10, centered at x = 8
        RenderCall::Text { text, x, .. } => {
            assert_eq!(text, "ok");
            assert!((x - 3.0).abs() < 1e-9);
        }
        other => panic!("expected text, got {:?}", other),
    }
}

#[test]
fn restore_on_fresh_context_is_empty_stack() {
    let mut ctx = Context2d::new(RecordingRenderer::new());
    assert!(matches!(ctx.restore(), Err(Error::EmptyStack)));
}

#[test]
fn styles_survive_until_restore() {
    let mut ctx = Context2d::new(RecordingRenderer::new());
    ctx.set_line_width(3.0);
    ctx.save();
    ctx.set_line_width(7.0);
    ctx.set_font(Font::new("mono", 20.0));
    ctx.set_vertical_align(VerticalAlign::Top);
    assert_eq!(ctx.line_width(), 7.0);
    ctx.restore().unwrap();
    assert_eq!(ctx.line_width(), 3.0);
    assert_eq!(ctx.font(), &Font::default());
    assert_eq!(ctx.vertical_align(), VerticalAlign::Baseline);
}

#[test]
fn gradient_created_from_context_is_a_paint() {
    let mut ctx = Context2d::new(RecordingRenderer::new());
    let grad = ctx
        .create_linear_gradient(0.0, 0.0, 10.0, 0.0)
        .add_color_stop(0.0, colors::BLACK)
        .add_color_stop(1.0, colors::WHITE);
    ctx.set_stroke_style(grad.clone());
    ctx.stroke_rect(1.0, 1.0, 8.0, 8.0);

    let calls = ctx.renderer().calls();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        RenderCall::Path { state, fill } => {
            assert!(!fill);
            assert_eq!(state.stroke_style, Paint::LinearGradient(grad));
        }
        other => panic!("expected path, got {:?}", other),
    }
}
