//! Finished recording value object

use std::fmt;
use std::sync::Arc;

/// Supported audio MIME types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudioMimeType {
    #[default]
    Flac,
    Wav,
    Ogg,
    Webm,
    Mp4,
}

impl AudioMimeType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Flac => "audio/flac",
            Self::Wav => "audio/wav",
            Self::Ogg => "audio/ogg",
            Self::Webm => "audio/webm",
            Self::Mp4 => "audio/mp4",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Flac => "flac",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
            Self::Webm => "webm",
            Self::Mp4 => "mp4",
        }
    }
}

impl fmt::Display for AudioMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable finalized recording.
///
/// Cloning shares the underlying bytes, so a playback handle can hold the
/// blob without copying it.
#[derive(Debug, Clone)]
pub struct AudioBlob {
    data: Arc<[u8]>,
    mime_type: AudioMimeType,
}

impl AudioBlob {
    pub fn new(data: Vec<u8>, mime_type: AudioMimeType) -> Self {
        Self {
            data: data.into(),
            mime_type,
        }
    }

    /// A blob with no audio, produced when nothing was captured
    pub fn empty(mime_type: AudioMimeType) -> Self {
        Self::new(Vec::new(), mime_type)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Shared handle to the bytes
    pub fn shared(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    pub fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        human_readable_size(self.size_bytes() as u64)
    }
}

/// Format a byte count as B / KB / MB
pub fn human_readable_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_strings() {
        assert_eq!(AudioMimeType::Flac.as_str(), "audio/flac");
        assert_eq!(AudioMimeType::Wav.extension(), "wav");
        assert_eq!(AudioMimeType::default(), AudioMimeType::Flac);
    }

    #[test]
    fn blob_size_and_emptiness() {
        let blob = AudioBlob::new(vec![0u8; 1024], AudioMimeType::Flac);
        assert_eq!(blob.size_bytes(), 1024);
        assert!(!blob.is_empty());
        assert!(AudioBlob::empty(AudioMimeType::Wav).is_empty());
    }

    #[test]
    fn clones_share_bytes() {
        let blob = AudioBlob::new(vec![1, 2, 3], AudioMimeType::Flac);
        let clone = blob.clone();
        assert!(Arc::ptr_eq(&blob.shared(), &clone.shared()));
    }

    #[test]
    fn human_readable_sizes() {
        assert_eq!(human_readable_size(500), "500 B");
        assert_eq!(human_readable_size(2048), "2.0 KB");
        assert_eq!(human_readable_size(2 * 1024 * 1024), "2.0 MB");
    }
}
