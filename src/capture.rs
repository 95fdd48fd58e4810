//! Image sources for scanning.
//!
//! A [`CaptureSession`] holds a device open for as long as it lives and
//! releases it exactly once, whether the scan finishes, fails or is
//! abandoned.

use std::path::{Path, PathBuf};

use crate::error::{ApiError, ApiResult};

/// Something that can produce a photo of one or more cards
pub trait CaptureDevice {
    /// Acquire the underlying resource
    fn start(&mut self) -> ApiResult<()>;
    /// Take one frame as JPEG bytes
    fn capture(&mut self) -> ApiResult<Vec<u8>>;
    /// Release the resource
    fn stop(&mut self);
    fn label(&self) -> String;
}

/// Reads an existing photo from disk (the upload flow)
#[derive(Debug, Clone)]
pub struct FileCapture {
    path: PathBuf,
    open: bool,
}

impl FileCapture {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            open: false,
        }
    }
}

impl CaptureDevice for FileCapture {
    fn start(&mut self) -> ApiResult<()> {
        if !self.path.is_file() {
            return Err(ApiError::Capture(format!(
                "No image file at {}",
                self.path.display()
            )));
        }
        self.open = true;
        Ok(())
    }

    fn capture(&mut self) -> ApiResult<Vec<u8>> {
        if !self.open {
            return Err(ApiError::Capture("Image source is not open".to_string()));
        }
        let bytes = std::fs::read(&self.path)?;
        if bytes.is_empty() {
            return Err(ApiError::Capture(format!(
                "{} is empty",
                self.path.display()
            )));
        }
        Ok(bytes)
    }

    fn stop(&mut self) {
        self.open = false;
    }

    fn label(&self) -> String {
        self.path.display().to_string()
    }
}

/// Scoped hold on a capture device
pub struct CaptureSession<D: CaptureDevice> {
    device: D,
    active: bool,
}

impl<D: CaptureDevice> CaptureSession<D> {
    /// Start the device. Failure here aborts the scan.
    pub fn open(mut device: D) -> ApiResult<Self> {
        device.start().map_err(|e| {
            log::error!("Failed to open {}: {}", device.label(), e);
            e
        })?;
        log::info!("Capture source {} opened", device.label());
        Ok(Self {
            device,
            active: true,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn capture(&mut self) -> ApiResult<Vec<u8>> {
        if !self.active {
            return Err(ApiError::Capture("Capture session already stopped".to_string()));
        }
        let frame = self.device.capture()?;
        log::debug!("Captured {} bytes from {}", frame.len(), self.device.label());
        Ok(frame)
    }

    /// Release the device; later calls do nothing
    pub fn stop(&mut self) {
        if self.active {
            self.active = false;
            self.device.stop();
            log::info!("Capture source {} released", self.device.label());
        }
    }
}

impl<D: CaptureDevice> Drop for CaptureSession<D> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Open `device`, take one frame and release it
pub fn capture_once<D: CaptureDevice>(device: D) -> ApiResult<Vec<u8>> {
    let mut session = CaptureSession::open(device)?;
    let frame = session.capture();
    session.stop();
    frame
}
