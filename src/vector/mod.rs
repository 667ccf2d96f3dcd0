//! Vector drawing: paths, paints and the `Context2d` state machine

pub mod context;
pub mod paint;
pub mod path;
pub mod renderer;

pub use context::{Context2d, Drawable, HorizontalAlign, LineCap, LineJoin, SizedDrawable, State, VerticalAlign};
pub use paint::{ColorStop, LinearGradient, Paint, RadialGradient};
pub use path::{GraphicsPath, PathCommand, PathVisitor, Winding};
pub use renderer::{Font, NoopRenderer, RecordingRenderer, RenderCall, Renderer, TextMetrics};
