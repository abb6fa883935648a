pub mod canvas_error;
pub mod font_resolver;
pub mod raster_canvas;
mod text_painter;
