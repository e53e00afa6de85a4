use std::{
  collections::BTreeMap,
  fs,
  path::{Path, PathBuf},
};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// The build outputs of the host, keyed by forward-slash relative path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assets {
  entries: BTreeMap<String, Vec<u8>>,
}

impl Assets {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(
    &mut self,
    path: impl Into<String>,
    content: impl Into<Vec<u8>>,
  ) -> Option<Vec<u8>> {
    self.entries.insert(path.into(), content.into())
  }

  pub fn get(&self, path: &str) -> Option<&[u8]> {
    self.entries.get(path).map(Vec::as_slice)
  }

  pub fn contains(&self, path: &str) -> bool {
    self.entries.contains_key(path)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn paths(&self) -> impl Iterator<Item = &str> + '_ {
    self.entries.keys().map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> + '_ {
    self
      .entries
      .iter()
      .map(|(path, content)| (path.as_str(), content.as_slice()))
  }

  /// Read every file under `root`. Keys are relative to `root`.
  pub fn load_dir(root: &Path) -> Result<Self> {
    let mut assets = Assets::new();
    for entry in WalkDir::new(root).follow_links(true) {
      let entry = entry.map_err(|e| Error::Io(e.into()))?;
      if !entry.file_type().is_file() {
        continue;
      }

      let relative = entry
        .path()
        .strip_prefix(root)
        .map_err(|e| Error::Message(e.to_string()))?;
      let key = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
      assets.insert(key, fs::read(entry.path())?);
    }

    debug!("loaded {} assets from {}", assets.len(), root.display());
    Ok(assets)
  }

  /// Write the asset at `path` below `dest`, creating directories as
  /// needed. Returns the written file path.
  pub fn write_to(&self, path: &str, dest: &Path) -> Result<PathBuf> {
    let content = self
      .get(path)
      .ok_or_else(|| Error::Message(format!("no asset at {path}")))?;

    let target = path
      .split('/')
      .filter(|segment| !segment.is_empty())
      .fold(dest.to_path_buf(), |target, segment| target.join(segment));
    if let Some(parent) = target.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(&target, content)?;
    Ok(target)
  }
}

impl<K, V> FromIterator<(K, V)> for Assets
where
  K: Into<String>,
  V: Into<Vec<u8>>,
{
  fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
    let mut assets = Assets::new();
    for (path, content) in iter {
      assets.insert(path, content);
    }
    assets
  }
}

/// A step the host runs once per build, when the outputs are about to
/// be written. The returned future resolves exactly once.
#[async_trait::async_trait]
pub trait EmitHook: Send + Sync {
  fn name(&self) -> &str;

  async fn emit(&self, assets: &mut Assets) -> Result<()>;
}

/// Minimal build host: holds the registered hooks and runs them in
/// registration order.
#[derive(Default)]
pub struct Host {
  hooks: Vec<Box<dyn EmitHook>>,
}

impl Host {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register<H>(&mut self, hook: H) -> &mut Self
  where
    H: EmitHook + 'static,
  {
    self.hooks.push(Box::new(hook));
    self
  }

  pub fn num_hooks(&self) -> usize {
    self.hooks.len()
  }

  /// Run every hook. The first failure aborts the build.
  pub async fn emit(&self, assets: &mut Assets) -> Result<()> {
    for hook in &self.hooks {
      info!("running emit hook {}", hook.name());
      hook.emit(assets).await.map_err(|e| Error::Hook {
        name: hook.name().to_owned(),
        source: Box::new(e),
      })?;
    }
    Ok(())
  }
}
