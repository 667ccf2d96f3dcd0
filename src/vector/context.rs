//! Canvas-style drawing state machine.
//!
//! `Context2d` keeps one active `State` and a stack of saved copies. Path and
//! style operations mutate only the active state; `fill` and `stroke` lend
//! that state to the injected `Renderer`.

use super::paint::{LinearGradient, Paint, RadialGradient};
use super::path::GraphicsPath;
use super::renderer::{Font, Renderer, TextMetrics};
use crate::color::{colors, Rgba};
use crate::geom::Matrix2d;
use crate::{Error, Result};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    Bevel,
    #[default]
    Miter,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl HorizontalAlign {
    pub fn ratio(self) -> f64 {
        match self {
            HorizontalAlign::Left => 0.0,
            HorizontalAlign::Center => 0.5,
            HorizontalAlign::Right => 1.0,
        }
    }

    pub fn offset_x(self, width: f64) -> f64 {
        width * self.ratio()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    Top,
    Middle,
    #[default]
    Baseline,
    Bottom,
}

impl VerticalAlign {
    pub fn ratio(self) -> f64 {
        match self {
            VerticalAlign::Top => 0.0,
            VerticalAlign::Middle => 0.5,
            VerticalAlign::Baseline | VerticalAlign::Bottom => 1.0,
        }
    }

    /// `Baseline` offsets by the measured baseline distance, the others by
    /// a fraction of the text height.
    pub fn offset_y(self, height: f64, baseline: f64) -> f64 {
        match self {
            VerticalAlign::Baseline => baseline,
            _ => height * self.ratio(),
        }
    }
}

/// Everything that `save` copies and `restore` brings back
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub transform: Matrix2d,
    /// `None` means unclipped
    pub clip: Option<GraphicsPath>,
    /// The clip was taken from the current path and keeps receiving its
    /// segments until `begin_path`, `clip` or `reset_clip`.
    pub clip_follows_path: bool,
    pub path: GraphicsPath,
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    pub stroke_style: Paint,
    pub fill_style: Paint,
    pub font: Font,
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    pub global_alpha: f64,
}

impl Default for State {
    fn default() -> Self {
        State {
            transform: Matrix2d::IDENTITY,
            clip: None,
            clip_follows_path: false,
            path: GraphicsPath::new(),
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            stroke_style: Paint::Color(colors::BLACK),
            fill_style: Paint::Color(colors::BLACK),
            font: Font::default(),
            horizontal_align: HorizontalAlign::Left,
            vertical_align: VerticalAlign::Baseline,
            global_alpha: 1.0,
        }
    }
}

impl State {
    /// Where a renderer should place the text baseline origin for text
    /// requested at `(x, y)`. `baseline` is the distance from the top of
    /// the line box to the baseline.
    pub fn text_origin(&self, x: f64, y: f64, metrics: &TextMetrics, baseline: f64) -> (f64, f64) {
        let ox = self.horizontal_align.offset_x(metrics.bounds.width);
        let oy = self.vertical_align.offset_y(metrics.bounds.height, baseline);
        (x - ox, y + baseline - oy)
    }
}

/// Something that knows how to draw itself onto a context
pub trait Drawable {
    fn draw<R: Renderer>(&self, ctx: &mut Context2d<R>);
}

/// A `Drawable` with an intrinsic pixel size
pub trait SizedDrawable: Drawable {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}

pub struct Context2d<R: Renderer> {
    renderer: R,
    state: State,
    stack: Vec<State>,
}

impl<R: Renderer> Context2d<R> {
    pub fn new(renderer: R) -> Self {
        Context2d { renderer, state: State::default(), stack: Vec::new() }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Number of saved states
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    pub fn restore(&mut self) -> Result<()> {
        self.state = self.stack.pop().ok_or(Error::EmptyStack)?;
        Ok(())
    }

    /// Run `f` between a `save` and its matching `restore`.
    ///
    /// States that `f` saves without restoring are discarded. If `f`
    /// restores past its own save the call fails with `EmptyStack`.
    pub fn keep<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> Result<T> {
        let depth = self.stack.len();
        self.save();
        let out = f(self);
        if self.stack.len() <= depth {
            return Err(Error::EmptyStack);
        }
        if self.stack.len() > depth + 1 {
            log::warn!("discarding {} unbalanced saved states", self.stack.len() - depth - 1);
            self.stack.truncate(depth + 1);
        }
        self.restore()?;
        Ok(out)
    }

    // --- transform ---

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform.prescale(sx, sy);
    }

    /// Rotate by `angle` radians
    pub fn rotate(&mut self, angle: f64) {
        self.state.transform.prerotate(angle);
    }

    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.state.transform.pretranslate(tx, ty);
    }

    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) {
        self.state.transform.premultiply(&Matrix2d::new(a, b, c, d, tx, ty));
    }

    pub fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) {
        self.state.transform = Matrix2d::new(a, b, c, d, tx, ty);
    }

    pub fn shear(&mut self, sx: f64, sy: f64) {
        self.transform(1.0, sy, sx, 1.0, 0.0, 0.0);
    }

    // --- path building ---

    /// Apply `edit` to the current path, and to the clip while it follows
    /// the path.
    fn edit_path(&mut self, edit: impl Fn(&mut GraphicsPath)) {
        edit(&mut self.state.path);
        if self.state.clip_follows_path {
            if let Some(clip) = self.state.clip.as_mut() {
                edit(clip);
            }
        }
    }

    pub fn begin_path(&mut self) {
        self.state.path = GraphicsPath::new();
        self.state.clip_follows_path = false;
    }

    pub fn close_path(&mut self) {
        self.edit_path(|p| p.close());
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.edit_path(|p| p.move_to(x, y));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.edit_path(|p| p.line_to(x, y));
    }

    pub fn quadratic_curve_to(&mut self, cx: f64, cy: f64, ax: f64, ay: f64) {
        self.edit_path(|p| p.quad_to(cx, cy, ax, ay));
    }

    pub fn bezier_curve_to(&mut self, cx1: f64, cy1: f64, cx2: f64, cy2: f64, x: f64, y: f64) {
        self.edit_path(|p| p.cubic_to(cx1, cy1, cx2, cy2, x, y));
    }

    pub fn arc(&mut self, x: f64, y: f64, r: f64, start: f64, end: f64) {
        self.edit_path(|p| p.arc(x, y, r, start, end));
    }

    pub fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, r: f64) {
        self.edit_path(|p| p.arc_to(x1, y1, x2, y2, r));
    }

    pub fn circle(&mut self, x: f64, y: f64, radius: f64) {
        self.arc(x, y, radius, 0.0, PI * 2.0);
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.edit_path(|p| p.rect(x, y, width, height));
    }

    /// Rectangle with rounded corners, started as a new path. Only `rx`
    /// shapes the corners; the radius is clamped to half the smaller side.
    /// With both radii zero this is a plain `rect` on the current path.
    pub fn round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, rx: f64, ry: f64) {
        if rx == 0.0 && ry == 0.0 {
            self.rect(x, y, w, h);
            return;
        }
        let r = rx.min(w / 2.0).min(h / 2.0);
        self.begin_path();
        self.move_to(x + r, y);
        self.arc_to(x + w, y, x + w, y + h, r);
        self.arc_to(x + w, y + h, x, y + h, r);
        self.arc_to(x, y + h, x, y, r);
        self.arc_to(x, y, x + w, y, r);
        self.close_path();
    }

    /// Append the segments of `path` to the current path.
    pub fn path(&mut self, path: &GraphicsPath) {
        self.edit_path(|p| p.append(path));
    }

    pub fn draw<D: Drawable>(&mut self, d: &D) {
        d.draw(self);
    }

    // --- painting ---

    pub fn fill(&mut self) {
        if !self.state.fill_style.is_none() {
            self.renderer.render(&self.state, true);
        }
    }

    pub fn stroke(&mut self) {
        if !self.state.stroke_style.is_none() {
            self.renderer.render(&self.state, false);
        }
    }

    pub fn fill_stroke(&mut self) {
        self.fill();
        self.stroke();
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.begin_path();
        self.rect(x, y, width, height);
        self.fill();
    }

    pub fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.begin_path();
        self.rect(x, y, width, height);
        self.stroke();
    }

    /// Stroke a zero-length segment; visible with round or square caps.
    pub fn stroke_dot(&mut self, x: f64, y: f64) {
        self.begin_path();
        self.move_to(x, y);
        self.line_to(x, y);
        self.stroke();
    }

    /// Clip to the current path. Segments added afterwards extend the clip
    /// too, until the next `begin_path`.
    pub fn clip(&mut self) {
        self.state.clip = Some(self.state.path.clone());
        self.state.clip_follows_path = true;
    }

    pub fn reset_clip(&mut self) {
        self.state.clip = None;
        self.state.clip_follows_path = false;
    }

    // --- text ---

    pub fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.render_text(text, x, y, true);
    }

    pub fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        self.render_text(text, x, y, false);
    }

    fn render_text(&mut self, text: &str, x: f64, y: f64, fill: bool) {
        self.renderer.render_text(&self.state, &self.state.font, text, x, y, fill);
    }

    pub fn text_bounds(&mut self, text: &str) -> TextMetrics {
        let font = &self.state.font;
        self.renderer.measure_text(font, text)
    }

    // --- paint factories ---

    pub fn create_linear_gradient(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> LinearGradient {
        LinearGradient::new(x0, y0, x1, y1)
    }

    pub fn create_radial_gradient(&self, x0: f64, y0: f64, r0: f64, x1: f64, y1: f64, r1: f64) -> RadialGradient {
        RadialGradient::new(x0, y0, r0, x1, y1, r1)
    }

    pub fn create_color(&self, color: Rgba) -> Paint {
        Paint::Color(color)
    }

    // --- style accessors ---

    pub fn line_width(&self) -> f64 {
        self.state.line_width
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
    }

    pub fn line_cap(&self) -> LineCap {
        self.state.line_cap
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    pub fn line_join(&self) -> LineJoin {
        self.state.line_join
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    pub fn miter_limit(&self) -> f64 {
        self.state.miter_limit
    }

    pub fn set_miter_limit(&mut self, limit: f64) {
        self.state.miter_limit = limit;
    }

    pub fn stroke_style(&self) -> &Paint {
        &self.state.stroke_style
    }

    pub fn set_stroke_style(&mut self, paint: impl Into<Paint>) {
        self.state.stroke_style = paint.into();
    }

    pub fn fill_style(&self) -> &Paint {
        &self.state.fill_style
    }

    pub fn set_fill_style(&mut self, paint: impl Into<Paint>) {
        self.state.fill_style = paint.into();
    }

    pub fn font(&self) -> &Font {
        &self.state.font
    }

    pub fn set_font(&mut self, font: Font) {
        self.state.font = font;
    }

    pub fn horizontal_align(&self) -> HorizontalAlign {
        self.state.horizontal_align
    }

    pub fn set_horizontal_align(&mut self, align: HorizontalAlign) {
        self.state.horizontal_align = align;
    }

    pub fn vertical_align(&self) -> VerticalAlign {
        self.state.vertical_align
    }

    pub fn set_vertical_align(&mut self, align: VerticalAlign) {
        self.state.vertical_align = align;
    }

    pub fn global_alpha(&self) -> f64 {
        self.state.global_alpha
    }

    pub fn set_global_alpha(&mut self, alpha: f64) {
        self.state.global_alpha = alpha;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::vector::path::PathCommand;
    use crate::vector::renderer::{RecordingRenderer, RenderCall};

    fn ctx() -> Context2d<RecordingRenderer> {
        Context2d::new(RecordingRenderer::new())
    }

    #[test]
    fn restore_without_save_fails() {
        let mut c = ctx();
        assert!(matches!(c.restore(), Err(Error::EmptyStack)));
        c.save();
        c.restore().unwrap();
        assert!(matches!(c.restore(), Err(Error::EmptyStack)));
    }

    #[test]
    fn balanced_save_restore_returns_to_previous_state() {
        let mut c = ctx();
        c.move_to(1.0, 1.0);
        c.set_line_width(3.0);
        let before = c.state().clone();
        for n in 1..5 {
            for _ in 0..n {
                c.save();
                c.translate(5.0, 5.0);
                c.line_to(9.0, 9.0);
                c.set_fill_style(colors::RED);
                c.set_line_width(n as f64);
            }
            for _ in 0..n {
                c.restore().unwrap();
            }
            assert_eq!(c.state(), &before);
        }
    }

    #[test]
    fn saved_state_is_a_deep_copy() {
        let mut c = ctx();
        c.move_to(0.0, 0.0);
        c.save();
        c.line_to(4.0, 4.0);
        assert_eq!(c.state().path.len(), 2);
        c.restore().unwrap();
        assert_eq!(c.state().path.len(), 1);
    }

    #[test]
    fn keep_restores_and_discards_unbalanced_saves() {
        let mut c = ctx();
        let out = c
            .keep(|c| {
                c.scale(2.0, 2.0);
                c.save();
                c.save();
                7
            })
            .unwrap();
        assert_eq!(out, 7);
        assert_eq!(c.depth(), 0);
        assert!(c.state().transform.is_identity());
    }

    #[test]
    fn keep_detects_restore_past_its_save() {
        let mut c = ctx();
        let res = c.keep(|c| {
            let _ = c.restore();
        });
        assert!(matches!(res, Err(Error::EmptyStack)));
    }

    #[test]
    fn transforms_compose_closest_to_geometry() {
        let mut c = ctx();
        c.translate(100.0, 0.0);
        c.scale(2.0, 2.0);
        c.rotate(PI / 2.0);
        let p = c.state().transform.transform_point(Point::new(1.0, 0.0));
        // rotate -> (0, 1), scale -> (0, 2), translate -> (100, 2)
        assert!((p.x - 100.0).abs() < 1e-9 && (p.y - 2.0).abs() < 1e-9, "{:?}", p);
    }

    #[test]
    fn shear_uses_generic_transform() {
        let mut c = ctx();
        c.shear(1.0, 0.0);
        let p = c.state().transform.transform_point(Point::new(0.0, 2.0));
        assert_eq!(p, Point::new(2.0, 2.0));
    }

    #[test]
    fn round_rect_without_radius_is_rect() {
        let mut a = ctx();
        a.round_rect(1.0, 2.0, 30.0, 40.0, 0.0, 0.0);
        let mut b = ctx();
        b.rect(1.0, 2.0, 30.0, 40.0);
        assert_eq!(a.state().path, b.state().path);
    }

    #[test]
    fn round_rect_clamps_radius() {
        let mut c = ctx();
        c.round_rect(0.0, 0.0, 10.0, 4.0, 50.0, 50.0);
        let b = c.state().path.bounds().unwrap();
        assert!(b.x >= -1e-9 && b.y >= -1e-9);
        assert!(b.right() <= 10.0 + 1e-9 && b.bottom() <= 4.0 + 1e-9, "{:?}", b);
        assert_eq!(c.state().path.last_point(), Some(Point::new(2.0, 0.0)));
    }

    #[test]
    fn fill_and_stroke_skip_none_paint() {
        let mut c = ctx();
        c.rect(0.0, 0.0, 1.0, 1.0);
        c.set_fill_style(Paint::None);
        c.fill();
        c.stroke();
        c.set_stroke_style(Paint::None);
        c.stroke();
        let calls = c.renderer().calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            RenderCall::Path { state, fill } => {
                assert!(!fill);
                assert_eq!(state.path.len(), 5);
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn fill_rect_starts_new_path() {
        let mut c = ctx();
        c.move_to(50.0, 50.0);
        c.fill_rect(0.0, 0.0, 2.0, 2.0);
        match &c.renderer().calls()[0] {
            RenderCall::Path { state, fill } => {
                assert!(fill);
                assert_eq!(state.path.bounds().unwrap().width, 2.0);
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn clip_follows_path_until_begin_path() {
        let mut c = ctx();
        assert!(c.state().clip.is_none());
        c.rect(0.0, 0.0, 5.0, 5.0);
        c.clip();
        c.line_to(9.0, 9.0);
        assert_eq!(c.state().clip.as_ref().unwrap().len(), 6);
        assert_eq!(c.state().clip.as_ref(), Some(&c.state().path));

        c.begin_path();
        c.move_to(1.0, 1.0);
        assert_eq!(c.state().clip.as_ref().unwrap().len(), 6);
        assert_eq!(c.state().path.len(), 1);

        c.reset_clip();
        assert!(c.state().clip.is_none());
        c.line_to(2.0, 2.0);
        assert!(c.state().clip.is_none());
    }

    #[test]
    fn restore_brings_back_following_clip() {
        let mut c = ctx();
        c.rect(0.0, 0.0, 5.0, 5.0);
        c.clip();
        c.save();
        c.begin_path();
        c.restore().unwrap();
        c.line_to(9.0, 9.0);
        assert_eq!(c.state().clip.as_ref().unwrap().len(), 6);
    }

    #[test]
    fn round_rect_starts_a_new_path() {
        let mut c = ctx();
        c.move_to(50.0, 50.0);
        c.line_to(60.0, 60.0);
        c.round_rect(0.0, 0.0, 10.0, 10.0, 2.0, 2.0);
        let first = c.state().path.commands()[0];
        assert_eq!(first, PathCommand::MoveTo { x: 2.0, y: 0.0 });
        assert!(c.state().path.bounds().unwrap().right() <= 10.0 + 1e-9);

        // zero radii keep appending like `rect`
        c.round_rect(20.0, 20.0, 5.0, 5.0, 0.0, 0.0);
        assert_eq!(c.state().path.commands()[0], PathCommand::MoveTo { x: 2.0, y: 0.0 });
    }

    #[test]
    fn text_alignment_offsets() {
        let mut c = ctx();
        c.set_font(Font::new("mono", 10.0));
        c.set_horizontal_align(HorizontalAlign::Center);
        c.set_vertical_align(VerticalAlign::Top);
        c.fill_text("abcd", 100.0, 50.0);
        c.set_horizontal_align(HorizontalAlign::Right);
        c.set_vertical_align(VerticalAlign::Baseline);
        c.stroke_text("ab", 100.0, 50.0);
        let calls = c.renderer().calls();
        // width = 4 * 5 = 20, baseline = 8
        assert_eq!(
            calls[0],
            RenderCall::Text { text: "abcd".into(), font: Font::new("mono", 10.0), x: 90.0, y: 58.0, fill: true }
        );
        // width = 10; baseline alignment leaves y untouched
        assert_eq!(
            calls[1],
            RenderCall::Text { text: "ab".into(), font: Font::new("mono", 10.0), x: 90.0, y: 50.0, fill: false }
        );
    }

    #[test]
    fn vertical_align_uses_height_ratio_except_baseline() {
        assert_eq!(VerticalAlign::Top.offset_y(20.0, 7.0), 0.0);
        assert_eq!(VerticalAlign::Middle.offset_y(20.0, 7.0), 10.0);
        assert_eq!(VerticalAlign::Bottom.offset_y(20.0, 7.0), 20.0);
        assert_eq!(VerticalAlign::Baseline.offset_y(20.0, 7.0), 7.0);
        assert_eq!(HorizontalAlign::Center.offset_x(20.0), 10.0);
    }

    #[test]
    fn text_bounds_come_from_renderer() {
        let mut c = ctx();
        let m = c.text_bounds("hello");
        assert_eq!(m.bounds.width, 25.0);
        assert_eq!(m.bounds.height, 10.0);
    }

    struct Square(f64);

    impl Drawable for Square {
        fn draw<R: Renderer>(&self, ctx: &mut Context2d<R>) {
            ctx.fill_rect(0.0, 0.0, self.0, self.0);
        }
    }

    #[test]
    fn drawables_paint_through_the_context() {
        let mut c = ctx();
        c.draw(&Square(3.0));
        assert_eq!(c.renderer().calls().len(), 1);
    }

    #[test]
    fn gradient_paint_reaches_renderer() {
        let mut c = ctx();
        let g = c.create_linear_gradient(0.0, 0.0, 1.0, 0.0).add_color_stop(0.0, colors::RED);
        c.set_fill_style(g.clone());
        c.rect(0.0, 0.0, 1.0, 1.0);
        c.fill();
        match &c.renderer().calls()[0] {
            RenderCall::Path { state, .. } => assert_eq!(state.fill_style, Paint::LinearGradient(g)),
            other => panic!("unexpected call {:?}", other),
        }
    }
}
