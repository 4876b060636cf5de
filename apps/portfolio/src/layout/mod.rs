// Document layout: font metrics, text wrapping, the drawing surface and the
// paginating engine that places a portfolio record onto it.
// The engine is CPU-bound; callers run it inside tokio::task::spawn_blocking.

pub mod canvas;
pub mod engine;
pub mod font_metrics;
pub mod wrap;

pub use engine::{render_portfolio, RenderOptions};
pub use font_metrics::{default_page_config, PageConfig};
