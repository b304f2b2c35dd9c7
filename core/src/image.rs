//! Remote image probing.
//!
//! Images are not decoded here. A probe fetches the bytes, checks the
//! signature against the handful of formats the endpoint serves, and reports
//! one of the three outcomes the presentation layer distinguishes.

use std::fmt;

use tracing::debug;

use crate::http::HttpRequest;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl ImageFormat {
    /// Detect the format from the leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";
        if bytes.starts_with(PNG) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(ImageFormat::Gif)
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(ImageFormat::WebP)
        } else {
            None
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
            ImageFormat::WebP => "webp",
        };
        f.write_str(name)
    }
}

/// Load state of a single remote image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageStatus {
    #[default]
    Loading,
    Loaded { format: ImageFormat, bytes: usize },
    Failed,
}

/// Fetch `url` and classify the result. Never fails; problems map to `Failed`.
pub fn probe_image(transport: &dyn Transport, url: &str) -> ImageStatus {
    let response = match transport.execute(HttpRequest::get(url)) {
        Ok(response) => response,
        Err(e) => {
            debug!(%url, error = %e, "image request failed");
            return ImageStatus::Failed;
        }
    };
    if !response.is_success() {
        debug!(%url, status = response.status, "image request rejected");
        return ImageStatus::Failed;
    }
    match ImageFormat::sniff(&response.body) {
        Some(format) => ImageStatus::Loaded {
            format,
            bytes: response.body.len(),
        },
        None => {
            debug!(%url, "image body is not a known format");
            ImageStatus::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::http::HttpResponse;

    struct Fixed(Result<(u16, Vec<u8>), ()>);

    impl Transport for Fixed {
        fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            match &self.0 {
                Ok((status, body)) => Ok(HttpResponse {
                    status: *status,
                    headers: Vec::new(),
                    body: body.clone(),
                }),
                Err(()) => Err(ApiError::Transport("refused".to_string())),
            }
        }
    }

    fn png() -> Vec<u8> {
        let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        bytes.extend_from_slice(&[0; 24]);
        bytes
    }

    #[test]
    fn sniffs_known_formats() {
        assert_eq!(ImageFormat::sniff(&png()), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::sniff(&[0xff, 0xd8, 0xff, 0xe0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::sniff(b"GIF89a...."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::sniff(b"<html>"), None);
        assert_eq!(ImageFormat::sniff(b""), None);
    }

    #[test]
    fn probe_loaded() {
        let body = png();
        let len = body.len();
        let status = probe_image(&Fixed(Ok((200, body))), "http://x/a.png");
        assert_eq!(
            status,
            ImageStatus::Loaded {
                format: ImageFormat::Png,
                bytes: len
            }
        );
    }

    #[test]
    fn probe_not_found_is_failed() {
        assert_eq!(probe_image(&Fixed(Ok((404, png()))), "u"), ImageStatus::Failed);
    }

    #[test]
    fn probe_transport_error_is_failed() {
        assert_eq!(probe_image(&Fixed(Err(())), "u"), ImageStatus::Failed);
    }

    #[test]
    fn probe_non_image_is_failed() {
        let status = probe_image(&Fixed(Ok((200, b"<html></html>".to_vec()))), "u");
        assert_eq!(status, ImageStatus::Failed);
    }
}
