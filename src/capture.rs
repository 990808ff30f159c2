//! Microphone capture.
//!
//! The wizard only sees [`AudioRecorder`]. [`FfmpegRecorder`] drives an
//! `ffmpeg` child process that writes an Ogg/Opus file; stopping sends `q`
//! on its stdin so the container is finalized before the file is read back.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::AudioConfig;
use crate::media::DataUri;

const CLIP_MIME_TYPE: &str = "audio/ogg";

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("recording failed: {0}")]
    Recording(String),

    #[error("recorded clip is empty")]
    EmptyClip,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single exclusive audio capture device.
pub trait AudioRecorder {
    /// Acquires the device and begins recording.
    async fn start(&mut self) -> Result<(), CaptureError>;

    /// Releases the device and returns everything recorded since `start`.
    async fn stop(&mut self) -> Result<DataUri, CaptureError>;
}

struct ActiveRecording {
    child: Child,
    output: NamedTempFile,
}

pub struct FfmpegRecorder {
    ffmpeg_path: PathBuf,
    input_format: String,
    input_device: String,
    active: Option<ActiveRecording>,
}

impl FfmpegRecorder {
    pub fn new(config: &AudioConfig) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path.clone(),
            input_format: config.input_format.clone(),
            input_device: config.input_device.clone(),
            active: None,
        }
    }

    fn command(&self, output: &std::path::Path) -> Command {
        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.args(["-hide_banner", "-loglevel", "error", "-y"])
            .args(["-f", self.input_format.as_str(), "-i", self.input_device.as_str()])
            .args(["-ac", "1", "-c:a", "libopus", "-b:a", "32k"])
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

async fn read_stderr(child: &mut Child) -> String {
    let mut message = String::new();
    if let Some(mut stderr) = child.stderr.take() {
        let _ = stderr.read_to_string(&mut message).await;
    }
    message.trim().to_string()
}

impl AudioRecorder for FfmpegRecorder {
    async fn start(&mut self) -> Result<(), CaptureError> {
        if self.active.is_some() {
            return Err(CaptureError::Recording("already recording".into()));
        }

        let output = tempfile::Builder::new()
            .prefix("cvgenius-voice-")
            .suffix(".ogg")
            .tempfile()?;

        let mut child = self.command(output.path()).spawn().map_err(|e| {
            CaptureError::DeviceUnavailable(format!(
                "cannot run {}: {e}",
                self.ffmpeg_path.display()
            ))
        })?;

        // ffmpeg exits almost immediately when the device is missing or denied.
        sleep(Duration::from_millis(300)).await;
        if let Some(status) = child.try_wait()? {
            let stderr = read_stderr(&mut child).await;
            return Err(CaptureError::DeviceUnavailable(format!(
                "{} exited with {status}: {stderr}",
                self.ffmpeg_path.display()
            )));
        }

        info!(device = %self.input_device, format = %self.input_format, "recording started");
        self.active = Some(ActiveRecording { child, output });
        Ok(())
    }

    async fn stop(&mut self) -> Result<DataUri, CaptureError> {
        let Some(mut recording) = self.active.take() else {
            return Err(CaptureError::Recording("not recording".into()));
        };

        if let Some(mut stdin) = recording.child.stdin.take() {
            stdin.write_all(b"q").await?;
            stdin.shutdown().await?;
        }
        let status = recording.child.wait().await?;
        if !status.success() {
            let stderr = read_stderr(&mut recording.child).await;
            return Err(CaptureError::Recording(format!("ffmpeg exited with {status}: {stderr}")));
        }

        let bytes = tokio::fs::read(recording.output.path()).await?;
        debug!(bytes = bytes.len(), "recording stopped");
        if bytes.is_empty() {
            return Err(CaptureError::EmptyClip);
        }
        Ok(DataUri::from_bytes(CLIP_MIME_TYPE, &bytes))
    }
}
