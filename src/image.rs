mod encode;
mod filters;
mod load;
mod placement;
mod render;

pub use encode::{ExportFormat, encode_image};
pub use filters::{Effect, FilterKind, clamp_strength};
pub use load::{JPEG_MIME, decode_jpeg_bytes, is_jpeg_mime, mime_type_of};
pub use placement::Placement;
pub use render::{apply_effects, compose, render_thumbnail, to_color_image};
