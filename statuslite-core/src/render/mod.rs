mod canvas;
mod dashboard;
mod fonts;
mod theme;

pub use canvas::{encode_png, fill_width, Painter, Weight};
pub use dashboard::{
    canvas_height, disk_card_height, Dashboard, DashboardRenderer, BASE_HEIGHT, CANVAS_WIDTH,
    MAX_DISK_ROWS,
};
pub use fonts::{FontSet, Typeface};
pub use theme::{rgb, usage_color, Palette};
