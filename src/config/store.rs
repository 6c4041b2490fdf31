//! Loading and committing the configuration document.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};
use xmltree::{Element, XMLNode};

use super::{write_element, ConfigTree};
use crate::xml_helpers::{get_mut_child_ci, set_child_text};
use crate::StaticMapError;

/// Where the configuration tree comes from and goes back to.
///
/// `commit` must be all-or-nothing from the caller's point of view.
pub trait ConfigStore {
    fn load(&self) -> Result<ConfigTree>;
    fn commit(&mut self, tree: &ConfigTree, message: &str) -> Result<()>;
}

/// `config.xml` on the local filesystem, replaced atomically on commit.
#[derive(Debug, Clone)]
pub struct XmlFileStore {
    path: PathBuf,
    backup_dir: Option<PathBuf>,
}

impl XmlFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        XmlFileStore {
            path: path.into(),
            backup_dir: None,
        }
    }

    /// Copy the previous document to `<dir>/config-<time>.xml` before each commit
    pub fn with_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = Some(dir.into());
        self
    }

    fn backup(&self, dir: &Path, time: u64) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create backup directory: {}", dir.display()))?;
        let target = dir.join(format!("config-{}.xml", time));
        fs::copy(&self.path, &target)
            .with_context(|| format!("Failed to write backup: {}", target.display()))?;
        info!("Backed up {} to {}", self.path.display(), target.display());
        Ok(())
    }

    fn replace(&self, root: &Element) -> Result<()> {
        let tmp_path = self
            .path
            .with_extension(format!("tmp.{}", std::process::id()));
        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .with_context(|| {
                format!(
                    "Failed to create temporary config file: {}",
                    tmp_path.display()
                )
            })?;

        if let Err(e) = write_element(root, &mut tmp_file) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        if let Err(e) = tmp_file.sync_all() {
            let _ = fs::remove_file(&tmp_path);
            return Err(e).with_context(|| {
                format!(
                    "Failed to sync temporary config file: {}",
                    tmp_path.display()
                )
            });
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e).with_context(|| {
                format!("Failed to replace config file: {}", self.path.display())
            });
        }

        Ok(())
    }
}

impl ConfigStore for XmlFileStore {
    fn load(&self) -> Result<ConfigTree> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open config file: {}", self.path.display()))?;
        let tree = ConfigTree::parse(file)
            .with_context(|| format!("Failed to read config file: {}", self.path.display()))?;
        debug!(
            path = %self.path.display(),
            scopes = tree.scopes().len(),
            mappings = tree.mapping_count(),
            "loaded configuration"
        );
        Ok(tree)
    }

    fn commit(&mut self, tree: &ConfigTree, message: &str) -> Result<()> {
        let time = unix_time();
        let mut root = tree.to_element();
        stamp_revision(&mut root, message, time, &current_user());

        let result = match &self.backup_dir {
            Some(dir) => self.backup(dir, time),
            None => Ok(()),
        }
        .and_then(|_| self.replace(&root));

        result.context(StaticMapError::Persist {
            path: self.path.display().to_string(),
        })?;

        info!("Configuration saved: {}", message);
        Ok(())
    }
}

/// Record who changed the config and why in `<revision>`
pub(crate) fn stamp_revision(root: &mut Element, message: &str, time: u64, user: &str) {
    if get_mut_child_ci(root, "revision").is_none() {
        let revision = Element::new("revision");
        root.children.push(XMLNode::Element(revision));
    }

    if let Some(revision) = get_mut_child_ci(root, "revision") {
        set_child_text(revision, "time", &time.to_string());
        set_child_text(
            revision,
            "description",
            &format!("{}@localhost: {}", user, message),
        );
        set_child_text(revision, "username", &format!("{}@localhost", user));
    }
}

fn current_user() -> String {
    std::env::var("USER")
        .ok()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| "root".to_string())
}

fn unix_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
