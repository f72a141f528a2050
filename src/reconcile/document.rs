//! Configuration documents on disk

use super::{Patched, Reconciler};
use crate::{
    error::{Error, ErrorKind::*},
    prelude::*,
};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

/// A configuration file, read once and written back atomically
#[derive(Clone, Debug)]
pub struct Document {
    path: PathBuf,
    text: String,
}

impl Document {
    /// Read the document at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| format_err!(IoError, "couldn't read {}: {}", path.display(), e))?;

        Ok(Self {
            path: path.to_owned(),
            text,
        })
    }

    /// Path to the document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current document text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Apply `reconciler` in memory, returning the keys it rewrote
    pub fn reconcile(&mut self, reconciler: &Reconciler) -> Vec<&'static str> {
        let Patched { text, rewritten } = reconciler.apply(&self.text);
        self.text = text;
        rewritten
    }

    /// Write the document back, replacing the file atomically
    pub fn save(&self) -> Result<(), Error> {
        self.persist().map_err(|e| {
            format_err!(
                ConfigWriteFailed,
                "couldn't write {}: {}",
                self.path.display(),
                e
            )
            .into()
        })
    }

    fn persist(&self) -> Result<(), Error> {
        let parent_dir = self.path.parent().ok_or_else(|| {
            format_err!(IoError, "config path has no parent: {}", self.path.display())
        })?;

        let permissions = fs::metadata(&self.path).ok().map(|m| m.permissions());

        let mut file = NamedTempFile::new_in(parent_dir)?;
        file.write_all(self.text.as_bytes())?;

        if let Some(permissions) = permissions {
            file.as_file().set_permissions(permissions)?;
        }

        file.persist(&self.path)
            .map_err(|e| format_err!(IoError, "{}", e))?;

        debug!("wrote {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::Rule;

    #[test]
    fn reconcile_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[statesync]\nenable = false\ntrust-period = \"168h0m0s\"\n").unwrap();

        let mut document = Document::load(&path).unwrap();
        let rewritten = document.reconcile(&Reconciler::new(vec![Rule::key("enable", "true")]));
        assert_eq!(rewritten, ["enable"]);

        document.save().unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[statesync]\nenable = true\ntrust-period = \"168h0m0s\"\n"
        );
    }

    #[test]
    fn missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let err = Document::load(dir.path().join("app.toml")).unwrap_err();
        assert_eq!(*err.kind(), IoError);
    }

    #[test]
    fn unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "enable = false\n").unwrap();
        let document = Document::load(&path).unwrap();

        // remove the directory out from under the document
        drop(dir);

        assert_eq!(*document.save().unwrap_err().kind(), ConfigWriteFailed);
    }
}
