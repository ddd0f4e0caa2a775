//! File probes and a monotonic timer used around codec sessions.
//!
//! None of this affects the compressed output; the CLI uses it to refuse
//! bad inputs early and to report sizes and throughput.

use crate::error::{Result, ZwlError};
use std::path::Path;
use std::time::{Duration, Instant};

/// Whether `path` names an existing regular file.
pub fn exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_file()
}

/// Size of the file at `path` in bytes.
pub fn size(path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(ZwlError::invalid_argument(format!(
            "\"{}\" is not a regular file",
            path.display()
        )));
    }
    Ok(metadata.len())
}

/// Whether `a` and `b` resolve to the same existing file.
///
/// Paths are compared after canonicalisation, so `./a.txt`, `dir/../a.txt`
/// and symlinks to the same target all match. A path that does not exist
/// yet never matches.
pub fn same_file(a: impl AsRef<Path>, b: impl AsRef<Path>) -> bool {
    match (a.as_ref().canonicalize(), b.as_ref().canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Wall-clock stopwatch over [`Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Timer {
    started: Option<Instant>,
    elapsed: Duration,
}

impl Timer {
    /// Create a stopped timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a timer that is already running.
    pub fn started() -> Self {
        let mut timer = Self::new();
        timer.start();
        timer
    }

    /// Start (or restart) timing.
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
        self.elapsed = Duration::ZERO;
    }

    /// Stop timing and freeze the elapsed time.
    pub fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            self.elapsed = started.elapsed();
        }
    }

    /// Elapsed time; live while running, frozen after [`Timer::stop`].
    pub fn elapsed(&self) -> Duration {
        match self.started {
            Some(started) => started.elapsed(),
            None => self.elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exists_and_size() {
        let path = std::env::temp_dir().join(format!("zwl_probe_{}", std::process::id()));
        std::fs::write(&path, b"twelve bytes").unwrap();

        assert!(exists(&path));
        assert_eq!(size(&path).unwrap(), 12);

        std::fs::remove_file(&path).unwrap();
        assert!(!exists(&path));
        assert!(matches!(size(&path), Err(ZwlError::Io(_))));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = std::env::temp_dir();
        assert!(!exists(&dir));
        assert!(matches!(size(&dir), Err(ZwlError::InvalidArgument { .. })));
    }

    #[test]
    fn test_same_file() {
        let dir = std::env::temp_dir().join(format!("zwl_same_{}", std::process::id()));
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        let file = dir.join("a.txt");
        std::fs::write(&file, b"x").unwrap();

        assert!(same_file(&file, &file));
        assert!(same_file(&file, dir.join("sub").join("..").join("a.txt")));
        assert!(!same_file(&file, dir.join("b.txt")));
        assert!(!same_file(dir.join("b.txt"), dir.join("b.txt")));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_timer_freezes_on_stop() {
        let mut timer = Timer::new();
        assert_eq!(timer.elapsed(), Duration::ZERO);

        timer.start();
        std::thread::sleep(Duration::from_millis(2));
        timer.stop();
        let frozen = timer.elapsed();
        assert!(frozen >= Duration::from_millis(2));
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(timer.elapsed(), frozen);
    }
}
