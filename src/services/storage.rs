//! Public URLs of call recordings.
//!
//! Recordings live in a public storage bucket; calls only store the object
//! path. The public URL has the form
//! `<STORAGE_PUBLIC_URL>/storage/v1/object/public/<bucket>/<path>`.

use url::Url;

/// Resolves recording object paths to public URLs.
#[derive(Debug, Clone, Default)]
pub struct RecordingLinks {
    base: Option<Url>,
    bucket: String,
}

impl RecordingLinks {
    /// Build from the configured storage URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: Option<&str>, bucket: impl Into<String>) -> Result<Self, url::ParseError> {
        let base = match base_url {
            Some(raw) => {
                let url = Url::parse(raw)?;
                if url.cannot_be_a_base() {
                    return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
                }
                Some(url)
            }
            None => None,
        };

        Ok(Self {
            base,
            bucket: bucket.into(),
        })
    }

    /// Links are disabled; every lookup returns `None`.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Public URL of the object at `path`, or `None` when no storage URL is
    /// configured or the path is blank.
    ///
    /// Absolute http(s) paths are returned unchanged.
    pub fn public_url(&self, path: &str) -> Option<String> {
        let path = path.trim();
        if path.is_empty() {
            return None;
        }
        if path.starts_with("https://") || path.starts_with("http://") {
            return Some(path.to_string());
        }

        let mut url = self.base.clone()?;
        {
            let mut segments = url.path_segments_mut().ok()?;
            segments
                .pop_if_empty()
                .extend(["storage", "v1", "object", "public", self.bucket.as_str()])
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        Some(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_public_object_url() {
        let links = RecordingLinks::new(Some("https://demo.supabase.co"), "recordings").unwrap();
        assert_eq!(
            links.public_url("2025/03/48123377.mp3").as_deref(),
            Some("https://demo.supabase.co/storage/v1/object/public/recordings/2025/03/48123377.mp3")
        );
    }

    #[test]
    fn tolerates_trailing_and_leading_slashes() {
        let links = RecordingLinks::new(Some("https://demo.supabase.co/"), "audio").unwrap();
        assert_eq!(
            links.public_url("/a.mp3").as_deref(),
            Some("https://demo.supabase.co/storage/v1/object/public/audio/a.mp3")
        );
    }

    #[test]
    fn escapes_path_segments() {
        let links = RecordingLinks::new(Some("https://demo.supabase.co"), "recordings").unwrap();
        assert_eq!(
            links.public_url("calls/call 1.mp3").as_deref(),
            Some("https://demo.supabase.co/storage/v1/object/public/recordings/calls/call%201.mp3")
        );
    }

    #[test]
    fn absolute_urls_pass_through() {
        let links = RecordingLinks::disabled();
        assert_eq!(
            links.public_url("https://cdn.example.com/a.mp3").as_deref(),
            Some("https://cdn.example.com/a.mp3")
        );
    }

    #[test]
    fn disabled_links_resolve_nothing() {
        assert!(RecordingLinks::disabled().public_url("a.mp3").is_none());
        let links = RecordingLinks::new(Some("https://demo.supabase.co"), "recordings").unwrap();
        assert!(links.public_url("  ").is_none());
    }

    #[test]
    fn rejects_invalid_base() {
        assert!(RecordingLinks::new(Some("not a url"), "recordings").is_err());
        assert!(RecordingLinks::new(Some("mailto:ops@example.com"), "recordings").is_err());
    }
}
