//! V4L2 camera capture via the `v4l` crate.
//!
//! The device is a scoped resource: [`CameraFeed::start`] opens it and spawns
//! a blocking capture task that publishes decoded RGB frames on a broadcast
//! channel; dropping the feed stops the task and releases the device.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use image::RgbImage;
use tokio::sync::broadcast;
use v4l::buffer::Type as BufType;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::FourCC;

use crate::config::CameraSettings;
use crate::error::CaptureError;

const FEED_CHANNEL_CAPACITY: usize = 8;

/// A cached frame older than this means the feed has stalled, and the
/// shutter must not freeze it as a snapshot.
const STALE_FRAME_MS: i64 = 2_000;

/// Negotiated pixel format for the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PixelFormat {
    /// Motion-JPEG (decoded per frame via the `image` crate).
    Mjpg,
    /// YUYV 4:2:2 packed (2 bytes/pixel).
    Yuyv,
    /// Packed 24-bit RGB.
    Rgb3,
}

/// One decoded live frame.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub image: Arc<RgbImage>,
    pub timestamp: i64,
    pub sequence: u32,
}

impl CameraFrame {
    /// Whether this frame is recent enough to stand in for "what the
    /// camera sees right now".
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms - self.timestamp <= STALE_FRAME_MS
    }
}

/// V4L2 camera device handle.
struct Camera {
    device: Device,
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
}

impl Camera {
    /// Open a device by path and negotiate a capture format near the
    /// requested size. The driver has the final word on both size and
    /// pixel format.
    fn open(device_path: &str, want_width: u32, want_height: u32) -> Result<Self, CaptureError> {
        if !Path::new(device_path).exists() {
            return Err(CaptureError::DeviceNotFound(device_path.to_string()));
        }

        let device = Device::with_path(device_path).map_err(|e| {
            if e.to_string().contains("busy") || e.to_string().contains("EBUSY") {
                CaptureError::DeviceBusy
            } else {
                CaptureError::DeviceNotFound(format!("{device_path}: {e}"))
            }
        })?;

        let caps = device.query_caps().map_err(|e| {
            CaptureError::CaptureFailed(format!("failed to query capabilities: {e}"))
        })?;

        tracing::info!(
            device = device_path,
            driver = %caps.driver,
            card = %caps.card,
            "opened camera"
        );

        if !caps
            .capabilities
            .contains(v4l::capability::Flags::VIDEO_CAPTURE)
        {
            return Err(CaptureError::StreamingNotSupported);
        }

        let mut fmt = device.format().map_err(|e| {
            CaptureError::FormatNegotiationFailed(format!("failed to get format: {e}"))
        })?;

        // Prefer MJPG (what most webcams deliver at speed); the driver may
        // answer with YUYV or RGB3 instead.
        fmt.fourcc = FourCC::new(b"MJPG");
        fmt.width = want_width;
        fmt.height = want_height;

        let negotiated = device.set_format(&fmt).map_err(|e| {
            CaptureError::FormatNegotiationFailed(format!("failed to set format: {e}"))
        })?;

        let pixel_format = if negotiated.fourcc == FourCC::new(b"MJPG") {
            PixelFormat::Mjpg
        } else if negotiated.fourcc == FourCC::new(b"YUYV") {
            PixelFormat::Yuyv
        } else if negotiated.fourcc == FourCC::new(b"RGB3") {
            PixelFormat::Rgb3
        } else {
            return Err(CaptureError::FormatNegotiationFailed(format!(
                "unsupported pixel format: {:?} (need MJPG, YUYV, or RGB3)",
                negotiated.fourcc
            )));
        };

        tracing::info!(
            width = negotiated.width,
            height = negotiated.height,
            fourcc = ?negotiated.fourcc,
            "negotiated format"
        );

        Ok(Self {
            device,
            width: negotiated.width,
            height: negotiated.height,
            pixel_format,
        })
    }

    fn decode(&self, buf: &[u8]) -> Result<RgbImage, CaptureError> {
        match self.pixel_format {
            PixelFormat::Mjpg => {
                let decoded =
                    image::load_from_memory_with_format(buf, image::ImageFormat::Jpeg)
                        .map_err(|e| {
                            CaptureError::CaptureFailed(format!("MJPG decode failed: {e}"))
                        })?;
                Ok(decoded.to_rgb8())
            }
            PixelFormat::Yuyv => yuyv_to_rgb(buf, self.width, self.height),
            PixelFormat::Rgb3 => {
                let expected = (self.width * self.height * 3) as usize;
                if buf.len() < expected {
                    return Err(CaptureError::CaptureFailed(format!(
                        "RGB3 buffer too short: expected {expected}, got {}",
                        buf.len()
                    )));
                }
                RgbImage::from_raw(self.width, self.height, buf[..expected].to_vec()).ok_or_else(
                    || CaptureError::CaptureFailed("RGB3 buffer rejected".to_string()),
                )
            }
        }
    }

    /// Blocking capture loop. Runs until `stop` is set or the device dies.
    fn stream_into(
        self,
        frames: broadcast::Sender<CameraFrame>,
        stop: Arc<AtomicBool>,
    ) -> Result<(), CaptureError> {
        let mut stream = MmapStream::with_buffers(&self.device, BufType::VideoCapture, 4)
            .map_err(|e| {
                CaptureError::CaptureFailed(format!("failed to create mmap stream: {e}"))
            })?;

        while !stop.load(Ordering::Relaxed) {
            let (buf, meta) = stream.next().map_err(|e| {
                CaptureError::CaptureFailed(format!("failed to dequeue buffer: {e}"))
            })?;

            let image = match self.decode(buf) {
                Ok(image) => image,
                Err(e) => {
                    tracing::warn!(seq = meta.sequence, "skipping undecodable frame: {e}");
                    continue;
                }
            };

            let frame = CameraFrame {
                image: Arc::new(image),
                timestamp: Utc::now().timestamp_millis(),
                sequence: meta.sequence,
            };

            // No receivers just means nobody is looking at the feed right now.
            let _ = frames.send(frame);
        }

        Ok(())
    }
}

/// Handle to a running camera feed. Dropping it stops the capture task.
pub struct CameraFeed {
    frames: broadcast::Sender<CameraFrame>,
    stop: Arc<AtomicBool>,
    pub width: u32,
    pub height: u32,
}

impl CameraFeed {
    /// Opens the configured device and starts streaming frames.
    ///
    /// Open and format negotiation happen on the caller's thread so failures
    /// surface synchronously; only the capture loop runs in the background.
    pub fn start(settings: &CameraSettings) -> Result<Self, CaptureError> {
        let camera = Camera::open(&settings.device, settings.width, settings.height)?;
        let (width, height) = (camera.width, camera.height);

        let (frames, _) = broadcast::channel(FEED_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));

        let task_frames = frames.clone();
        let task_stop = stop.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = camera.stream_into(task_frames, task_stop) {
                tracing::error!("camera feed terminated: {e}");
            } else {
                tracing::info!("camera feed stopped");
            }
        });

        Ok(Self {
            frames,
            stop,
            width,
            height,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CameraFrame> {
        self.frames.subscribe()
    }
}

impl Drop for CameraFeed {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// YUYV 4:2:2 to packed RGB using BT.601 integer math.
fn yuyv_to_rgb(buf: &[u8], width: u32, height: u32) -> Result<RgbImage, CaptureError> {
    let pixels = (width * height) as usize;
    let expected = pixels * 2;
    if buf.len() < expected {
        return Err(CaptureError::CaptureFailed(format!(
            "YUYV buffer too short: expected {expected}, got {}",
            buf.len()
        )));
    }

    let mut rgb = Vec::with_capacity(pixels * 3);
    for chunk in buf[..expected].chunks_exact(4) {
        let [y0, u, y1, v] = [chunk[0], chunk[1], chunk[2], chunk[3]];
        for y in [y0, y1] {
            let c = i32::from(y) - 16;
            let d = i32::from(u) - 128;
            let e = i32::from(v) - 128;
            rgb.push(clamp_u8((298 * c + 409 * e + 128) >> 8));
            rgb.push(clamp_u8((298 * c - 100 * d - 208 * e + 128) >> 8));
            rgb.push(clamp_u8((298 * c + 516 * d + 128) >> 8));
        }
    }

    RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| CaptureError::CaptureFailed("YUYV buffer rejected".to_string()))
}

fn clamp_u8(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yuyv_white_decodes_to_white_pixels() {
        // Y=235 U=V=128 is reference white in BT.601.
        let buf = [235u8, 128, 235, 128];
        let image = yuyv_to_rgb(&buf, 2, 1).unwrap();
        for pixel in image.pixels() {
            assert!(pixel.0.iter().all(|&c| c > 250));
        }
    }

    #[test]
    fn yuyv_short_buffer_is_rejected() {
        assert!(yuyv_to_rgb(&[0u8; 4], 4, 4).is_err());
    }

    #[test]
    fn frames_go_stale_after_the_feed_stalls() {
        let frame = CameraFrame {
            image: Arc::new(RgbImage::new(1, 1)),
            timestamp: 10_000,
            sequence: 7,
        };
        assert!(frame.is_fresh(10_000 + STALE_FRAME_MS));
        assert!(!frame.is_fresh(10_000 + STALE_FRAME_MS + 1));
    }
}
