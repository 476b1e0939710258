use std::collections::HashMap;
use std::io::Cursor;

use async_trait::async_trait;
use axum::response::Response;
use faceclaim_api::ingestion::{FetchError, ImageSource};
use http_body_util::BodyExt;
use image::{ImageFormat, Rgba, RgbaImage};

/// URL served by [`StaticImageSource::with_fixture`]
pub const IMAGE_URL: &str = "https://example.org/tiltowait.webp";

/// Encode a small gradient as PNG
pub fn png_fixture() -> Vec<u8> {
    let img = RgbaImage::from_fn(24, 24, |x, y| Rgba([(x * 10) as u8, (y * 10) as u8, 90, 255]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

/// Image source that serves fixed bodies and 404s everything else
pub struct StaticImageSource {
    images: HashMap<String, Vec<u8>>,
}

impl StaticImageSource {
    pub fn new(images: HashMap<String, Vec<u8>>) -> Self {
        Self { images }
    }

    /// Serves [`png_fixture`] at [`IMAGE_URL`]
    pub fn with_fixture() -> Self {
        Self::new(HashMap::from([(IMAGE_URL.to_string(), png_fixture())]))
    }
}

#[async_trait]
impl ImageSource for StaticImageSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Parse a response body that is a single JSON string
pub async fn parse_string_body(response: Response) -> String {
    parse_response_body(response)
        .await
        .as_str()
        .expect("body should be a JSON string")
        .to_string()
}

/// Split `https://{bucket}/{key}` into its bucket and key
pub fn split_object_url(url: &str) -> (&str, &str) {
    url.strip_prefix("https://")
        .and_then(|rest| rest.split_once('/'))
        .expect("URL should look like https://{bucket}/{key}")
}

/// Check that `key` is `{charid}/{32 lowercase hex}.webp`
pub fn assert_faceclaim_key(key: &str, charid: &str) {
    let file = key
        .strip_prefix(&format!("{charid}/"))
        .unwrap_or_else(|| panic!("{key} is not under {charid}/"));
    let id = file
        .strip_suffix(".webp")
        .unwrap_or_else(|| panic!("{key} is not a .webp key"));
    assert_eq!(id.len(), 32, "{id} should be 32 characters");
    assert!(
        id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')),
        "{id} should be lowercase hex"
    );
}

/// Build a `multipart/form-data` body holding one file part
///
/// Returns the content type header value and the body.
pub fn multipart_body(field: &str, file_name: Option<&str>, contents: &[u8]) -> (String, Vec<u8>) {
    let boundary = "----faceclaim-test-boundary";
    let disposition = match file_name {
        Some(name) => format!("form-data; name=\"{field}\"; filename=\"{name}\""),
        None => format!("form-data; name=\"{field}\""),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {disposition}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: text/plain\r\n\r\n");
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={boundary}"), body)
}
