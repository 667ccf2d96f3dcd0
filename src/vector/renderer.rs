//! Renderer capability consumed by `Context2d`
//!
//! A `Context2d` never produces pixels itself. Platform backends implement
//! `Renderer` and are injected when the context is built. `NoopRenderer` and
//! `RecordingRenderer` are deterministic implementations for tests and for
//! callers that only need path construction.

use super::context::State;
use crate::geom::Rectangle;

/// Font descriptor: family name and size in pixels
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub name: String,
    pub size: f64,
}

impl Font {
    pub fn new(name: impl Into<String>, size: f64) -> Self {
        Font { name: name.into(), size }
    }
}

impl Default for Font {
    fn default() -> Self {
        Font::new("sans-serif", 10.0)
    }
}

/// Ink bounds of a measured string
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    pub bounds: Rectangle,
}

pub trait Renderer {
    /// Rasterize `state.path` with the fill or stroke paint of `state`.
    ///
    /// The state is borrowed for the duration of the call only.
    fn render(&mut self, state: &State, fill: bool);

    /// Measure and draw `text` at `(x, y)`, honoring the state's alignment.
    fn render_text(&mut self, state: &State, font: &Font, text: &str, x: f64, y: f64, fill: bool);

    fn measure_text(&mut self, font: &Font, text: &str) -> TextMetrics;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn render(&mut self, state: &State, fill: bool) {
        (**self).render(state, fill)
    }

    fn render_text(&mut self, state: &State, font: &Font, text: &str, x: f64, y: f64, fill: bool) {
        (**self).render_text(state, font, text, x, y, fill)
    }

    fn measure_text(&mut self, font: &Font, text: &str) -> TextMetrics {
        (**self).measure_text(font, text)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, state: &State, fill: bool) {
        (**self).render(state, fill)
    }

    fn render_text(&mut self, state: &State, font: &Font, text: &str, x: f64, y: f64, fill: bool) {
        (**self).render_text(state, font, text, x, y, fill)
    }

    fn measure_text(&mut self, font: &Font, text: &str) -> TextMetrics {
        (**self).measure_text(font, text)
    }
}

/// Discards all output; text measures as an empty rectangle
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRenderer;

impl NoopRenderer {
    pub fn new() -> Self {
        NoopRenderer
    }
}

impl Renderer for NoopRenderer {
    fn render(&mut self, _state: &State, _fill: bool) {}

    fn render_text(&mut self, _state: &State, _font: &Font, _text: &str, _x: f64, _y: f64, _fill: bool) {}

    fn measure_text(&mut self, _font: &Font, _text: &str) -> TextMetrics {
        TextMetrics::default()
    }
}

/// One call observed by a `RecordingRenderer`
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Path { state: State, fill: bool },
    Text { text: String, font: Font, x: f64, y: f64, fill: bool },
}

/// Keeps a copy of everything it is asked to draw.
///
/// Text is measured with a fixed advance of `0.5 * size` per character and
/// a height of `size`; `render_text` records the origin after alignment with
/// a baseline of `0.8 * size`.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<RenderCall> {
        std::mem::take(&mut self.calls)
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, state: &State, fill: bool) {
        self.calls.push(RenderCall::Path { state: state.clone(), fill });
    }

    fn render_text(&mut self, state: &State, font: &Font, text: &str, x: f64, y: f64, fill: bool) {
        let metrics = self.measure_text(font, text);
        let (x, y) = state.text_origin(x, y, &metrics, font.size * 0.8);
        self.calls.push(RenderCall::Text { text: text.to_string(), font: font.clone(), x, y, fill });
    }

    fn measure_text(&mut self, font: &Font, text: &str) -> TextMetrics {
        let width = text.chars().count() as f64 * font.size * 0.5;
        TextMetrics { bounds: Rectangle::new(0.0, -font.size, width, font.size) }
    }
}
