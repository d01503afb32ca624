// Shared fixtures: images on disk, a catalog that points at them, and a
// loader that counts how often it is asked for pixels.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use mockup::catalog::Catalog;
use mockup::imaging::{ImageLoader, ImageSource, ImagingError, LoadedImage};

pub const TEMPLATE_GRAY: u8 = 128;

pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    /// 800x1000 gray template, 50x50 black and white designs.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        save(&dir.path().join("shirt.png"), &solid(800, 1000, TEMPLATE_GRAY));
        save(&dir.path().join("black.png"), &solid(50, 50, 0));
        save(&dir.path().join("white.png"), &solid(50, 50, 255));
        Self { dir }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn catalog_yaml(&self) -> String {
        format!(
            r#"
templates:
  - name: shirt-front
    image: {shirt}
    positions:
      - {{ name: chest, left: 300, top: 200, width: 200 }}
      - {{ name: pocket, left: 100, top: 100, width: 100 }}
  - name: shirt-negative
    image: {shirt}
    negative: true
    positions:
      - {{ name: chest, left: 300, top: 200, width: 200 }}
  - name: missing-file
    image: {missing}
    positions:
      - {{ name: chest, left: 0, top: 0, width: 10 }}
aspect_ratios:
  - {{ name: pocket, width_ratio: 2, height_ratio: 3 }}
designs:
  - {{ name: black-square, image: {black} }}
  - {{ name: white-square, image: {white} }}
"#,
            shirt = self.path("shirt.png").display(),
            missing = self.path("nope.png").display(),
            black = self.path("black.png").display(),
            white = self.path("white.png").display(),
        )
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::from_yaml(&self.catalog_yaml(), "fixture").unwrap()
    }

    /// Write the catalog next to the images and return its path.
    pub fn write_catalog(&self, file_name: &str) -> PathBuf {
        let path = self.path(file_name);
        std::fs::write(&path, self.catalog_yaml()).unwrap();
        path
    }
}

pub fn solid(width: u32, height: u32, value: u8) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([value; 3])))
}

pub fn save(path: &Path, image: &DynamicImage) {
    image.save_with_format(path, ImageFormat::Png).unwrap();
}

pub fn rgb_at(image: &DynamicImage, x: u32, y: u32) -> [u8; 3] {
    image.to_rgb8().get_pixel(x, y).0
}

/// Loader that counts calls and never touches the filesystem.
#[derive(Default)]
pub struct CountingLoader {
    pub calls: AtomicUsize,
}

impl CountingLoader {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageLoader for CountingLoader {
    async fn load(&self, source: &ImageSource) -> Result<LoadedImage, ImagingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ImagingError::Load(source.describe()))
    }
}

/// Canned reply from [`serve_stub`].
pub struct StubResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl StubResponse {
    pub fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }
}

/// Serve HTTP/1.1 on an ephemeral localhost port and return its base URL.
///
/// The handler sees the raw request head (request line plus headers) and
/// every connection is closed after one response.
pub async fn serve_stub<F>(handler: F) -> String
where
    F: Fn(&str) -> StubResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&head).into_owned();
                let response = handler.as_ref()(head.as_str());
                let reason = match response.status {
                    200 => "OK",
                    401 => "Unauthorized",
                    404 => "Not Found",
                    _ => "Status",
                };
                let header = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    response.status,
                    reason,
                    response.content_type,
                    response.body.len()
                );
                let _ = stream.write_all(header.as_bytes()).await;
                let _ = stream.write_all(&response.body).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}

pub fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut buffer = std::io::Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}
