//! Well-known MIME type string constants.
//!
//! Used by [`ObjectSerializer`](crate::serializer::ObjectSerializer)
//! implementations and by callers setting explicit `Content-Type` headers on a
//! [`Response`](crate::response::Response). This is purely a vocabulary table;
//! nothing here carries behavior.

/// The `Content-Type` header name.
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

pub const APPLICATION_GZIP: &str = "application/gzip";
pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_LD_JSON: &str = "application/ld+json";
pub const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";
pub const APPLICATION_PDF: &str = "application/pdf";
pub const APPLICATION_RTF: &str = "application/rtf";
pub const APPLICATION_XML: &str = "application/xml";
pub const APPLICATION_ZIP: &str = "application/zip";

pub const AUDIO_AAC: &str = "audio/aac";
pub const AUDIO_MIDI: &str = "audio/midi";
pub const AUDIO_MP3: &str = "audio/mpeg";
pub const AUDIO_OGG: &str = "audio/ogg";
pub const AUDIO_WEBA: &str = "audio/webm";

pub const FONT_OTF: &str = "font/otf";
pub const FONT_TTF: &str = "font/ttf";

pub const IMAGE_BMP: &str = "image/bmp";
pub const IMAGE_GIF: &str = "image/gif";
pub const IMAGE_JPEG: &str = "image/jpeg";
pub const IMAGE_SVG: &str = "image/svg+xml";
pub const IMAGE_TIFF: &str = "image/tiff";
pub const IMAGE_WEBP: &str = "image/webp";

pub const TEXT_CSS: &str = "text/css";
pub const TEXT_CSV: &str = "text/csv";
pub const TEXT_HTML: &str = "text/html";
pub const TEXT_JAVASCRIPT: &str = "text/javascript";
pub const TEXT_PLAIN: &str = "text/plain";

pub const VIDEO_MP4: &str = "video/mp4";
pub const VIDEO_MPEG: &str = "video/mpeg";
pub const VIDEO_WEBM: &str = "video/webm";
