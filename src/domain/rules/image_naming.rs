use chrono::Utc;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::domain::value_objects::ImageRef;

/// Source of wall-clock time for uniqueness tokens
pub trait Clock: Send + Sync + 'static {
    /// Microseconds since the Unix epoch
    fn now_micros(&self) -> u64;
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_micros(&self) -> u64 {
        u64::try_from(Utc::now().timestamp_micros()).unwrap_or(0)
    }
}

/// Issues uniqueness tokens for uploaded file names.
///
/// Tokens are microsecond timestamps, bumped when needed so that two
/// tokens from the same namer are never equal and never go backwards.
pub struct ImageNamer {
    clock: Arc<dyn Clock>,
    last: AtomicU64,
}

impl ImageNamer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: AtomicU64::new(0),
        }
    }

    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    pub fn next_token(&self) -> u64 {
        let now = self.clock.now_micros();
        let mut last = self.last.load(Ordering::Acquire);
        loop {
            let next = now.max(last.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }
}

impl Default for ImageNamer {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for ImageNamer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageNamer")
            .field("last", &self.last.load(Ordering::Relaxed))
            .finish()
    }
}

/// `<token>-<file name>`, with the client's file name reduced to a safe
/// single path segment.
pub fn unique_file_name(original_name: &str, token: u64) -> String {
    format!("{}-{}", token, sanitize_file_name(original_name))
}

/// Image reference for a listing: a unique name under `root` when a file
/// was uploaded, otherwise the default image.
pub fn resolve_image_ref(root: &str, original_name: Option<&str>, token: u64) -> ImageRef {
    let Some(name) = original_name else {
        return ImageRef::default_image();
    };

    let file_name = unique_file_name(name, token);
    let root = root.trim_matches('/');
    if root.is_empty() {
        ImageRef::new(file_name)
    } else {
        ImageRef::new(format!("{}/{}", root, file_name))
    }
}

fn sanitize_file_name(original_name: &str) -> String {
    // Drop any client-side directory part
    let base = original_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
