use std::{
    fs, io,
    path::{Path, PathBuf},
};

//

/// deletes intermediate files in FILO (stack) order
#[derive(Default)]
pub struct ScratchQueue {
    inner: Vec<PathBuf>,
}

impl ScratchQueue {
    pub fn new() -> Self {
        Self { inner: Vec::new() }
    }

    #[track_caller]
    pub fn push(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        tracing::debug!(
            "added scratch file {} {} (len={})",
            path.display(),
            std::panic::Location::caller(),
            self.inner.len()
        );
        self.inner.push(path);
    }

    pub fn flush(&mut self) {
        if self.inner.is_empty() {
            return;
        }

        tracing::debug!("deleting {} scratch files", self.inner.len());
        for path in self.inner.drain(..).rev() {
            if let Err(err) = remove(&path) {
                tracing::error!("failed to delete {}: {err}", path.display());
            }
        }
    }
}

impl Drop for ScratchQueue {
    fn drop(&mut self) {
        if self.inner.is_empty() {
            return;
        }

        tracing::debug!("scratch queue dropped with {} files left", self.inner.len());
        self.flush();
    }
}

/// files are unlinked, directories must already be empty
fn remove(path: &Path) -> io::Result<()> {
    let res = if path.is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    };
    match res {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        res => res,
    }
}

//
