//! Frame sources for face capture
//!
//! Registration needs one still frame as the student's face reference. The
//! reference is stored as an opaque data URL; nothing downstream decodes it.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, warn};

use crate::error::{AttendanceError, AttendanceResult};

/// A single captured image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

impl CapturedFrame {
    /// Encode as `data:<mime>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Something that can produce still frames
pub trait FrameSource {
    fn start(&mut self) -> AttendanceResult<()>;
    fn capture_frame(&mut self) -> AttendanceResult<CapturedFrame>;
    fn stop(&mut self);
}

/// Reads the frame from an image file on disk
pub struct FileFrameSource {
    path: PathBuf,
    started: bool,
}

impl FileFrameSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            started: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for FileFrameSource {
    fn start(&mut self) -> AttendanceResult<()> {
        if !self.path.is_file() {
            return Err(AttendanceError::CameraUnavailable(format!(
                "{} is not a readable image file",
                self.path.display()
            )));
        }
        self.started = true;
        debug!(path = %self.path.display(), "frame source started");
        Ok(())
    }

    fn capture_frame(&mut self) -> AttendanceResult<CapturedFrame> {
        if !self.started {
            return Err(AttendanceError::CameraUnavailable(
                "frame source not started".to_string(),
            ));
        }
        let bytes = fs::read(&self.path).map_err(|e| {
            AttendanceError::CameraUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(CapturedFrame {
            bytes,
            mime: mime_for_path(&self.path),
        })
    }

    fn stop(&mut self) {
        if self.started {
            debug!(path = %self.path.display(), "frame source stopped");
        }
        self.started = false;
    }
}

/// Guess an image MIME type from the file extension
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Start the source, grab one frame, and release the source again.
///
/// The source is stopped whether or not capture succeeded.
pub fn capture_face_reference(source: &mut dyn FrameSource) -> AttendanceResult<String> {
    source.start()?;
    let frame = source.capture_frame();
    source.stop();

    match frame {
        Ok(frame) => Ok(frame.to_data_url()),
        Err(e) => {
            warn!("face capture failed: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct FailingSource {
        stopped: bool,
    }

    impl FrameSource for FailingSource {
        fn start(&mut self) -> AttendanceResult<()> {
            Ok(())
        }

        fn capture_frame(&mut self) -> AttendanceResult<CapturedFrame> {
            Err(AttendanceError::CameraUnavailable("device busy".to_string()))
        }

        fn stop(&mut self) {
            self.stopped = true;
        }
    }

    #[test]
    fn test_data_url() {
        let frame = CapturedFrame {
            bytes: b"hi".to_vec(),
            mime: "image/png",
        };
        assert_eq!(frame.to_data_url(), "data:image/png;base64,aGk=");
    }

    #[test]
    fn test_mime_guessing() {
        assert_eq!(mime_for_path(Path::new("a/face.PNG")), "image/png");
        assert_eq!(mime_for_path(Path::new("face.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("face.webp")), "image/webp");
        assert_eq!(mime_for_path(Path::new("face")), "application/octet-stream");
    }

    #[test]
    fn test_capture_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("face.jpg");
        fs::write(&path, [0xffu8, 0xd8, 0xff]).unwrap();

        let mut source = FileFrameSource::new(&path);
        let reference = capture_face_reference(&mut source).unwrap();
        assert_eq!(reference, "data:image/jpeg;base64,/9j/");
        assert!(!source.started);
    }

    #[test]
    fn test_missing_file_is_camera_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let mut source = FileFrameSource::new(temp_dir.path().join("nope.png"));
        let err = capture_face_reference(&mut source).unwrap_err();
        assert!(matches!(err, AttendanceError::CameraUnavailable(_)));
    }

    #[test]
    fn test_source_stopped_after_failed_capture() {
        let mut source = FailingSource { stopped: false };
        assert!(capture_face_reference(&mut source).is_err());
        assert!(source.stopped);
    }
}
