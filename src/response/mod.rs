//! Response encoding - turns raw render output into transportable payloads

pub mod base64;

/// Media subtype the render backend produces
pub const RENDER_IMAGE_FORMAT: &str = "png";

/// Encode a rendered frame as a self-describing `data:image/png;base64,...` URL
pub fn encode_image(bytes: &[u8]) -> String {
    base64::create_data_url(bytes, RENDER_IMAGE_FORMAT)
}
