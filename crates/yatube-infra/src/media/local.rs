//! Filesystem-backed media storage.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use yatube_core::forms::ImageUpload;
use yatube_core::ports::{MediaError, MediaStorage};

/// Directory (relative to the media root) uploaded post images go to.
const POSTS_DIR: &str = "posts";
/// Length of the random suffix used to resolve name collisions.
const SUFFIX_LEN: usize = 7;

#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub root: PathBuf,
    /// URL prefix stored names are served under.
    pub url_prefix: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("media"),
            url_prefix: "/media/".to_string(),
        }
    }
}

impl MediaConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            root: std::env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.root),
            url_prefix: defaults.url_prefix,
        }
    }
}

/// Stores uploads under `<root>/posts/`.
pub struct LocalMediaStorage {
    config: MediaConfig,
}

impl LocalMediaStorage {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    /// Resolve a stored name to a path inside the media root.
    fn resolve(&self, name: &str) -> Result<PathBuf, MediaError> {
        let relative = Path::new(name);
        let is_safe = !name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !is_safe {
            return Err(MediaError::InvalidName(name.to_string()));
        }
        Ok(self.config.root.join(relative))
    }
}

/// `posts/<stem>_<random>.<ext>` for a name that is already taken.
fn suffixed_name(file_name: &str) -> String {
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SUFFIX_LEN)
        .collect();

    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{POSTS_DIR}/{stem}_{suffix}.{ext}"),
        _ => format!("{POSTS_DIR}/{file_name}_{suffix}"),
    }
}

/// Keep the final path component and drop characters unsafe in file names.
fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn save(&self, upload: &ImageUpload) -> Result<String, MediaError> {
        let dir = self.config.root.join(POSTS_DIR);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| MediaError::Io(e.to_string()))?;

        let file_name = sanitize_file_name(&upload.filename);
        let mut name = format!("{POSTS_DIR}/{file_name}");

        // `create_new` claims the name atomically; concurrent uploads of the
        // same file name never share a file.
        let mut file = loop {
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.resolve(&name)?)
                .await
            {
                Ok(file) => break file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    name = suffixed_name(&file_name);
                }
                Err(e) => return Err(MediaError::Io(e.to_string())),
            }
        };

        file.write_all(&upload.bytes)
            .await
            .map_err(|e| MediaError::Io(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| MediaError::Io(e.to_string()))?;

        tracing::debug!(name = %name, bytes = upload.bytes.len(), "Stored uploaded image");
        Ok(name)
    }

    async fn open(&self, name: &str) -> Result<Option<Vec<u8>>, MediaError> {
        let path = self.resolve(name)?;

        // Only regular files are served.
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(None),
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                return Ok(None);
            }
            Err(e) => return Err(MediaError::Io(e.to_string())),
        }

        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MediaError::Io(e.to_string())),
        }
    }

    fn url(&self, name: &str) -> String {
        format!("{}{}", self.config.url_prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: &tempfile::TempDir) -> LocalMediaStorage {
        LocalMediaStorage::new(MediaConfig {
            root: dir.path().to_path_buf(),
            url_prefix: "/media/".to_string(),
        })
    }

    fn upload(name: &str) -> ImageUpload {
        ImageUpload {
            filename: name.to_string(),
            bytes: b"GIF89a".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_save_under_posts_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let name = storage.save(&upload("small.gif")).await.unwrap();

        assert_eq!(name, "posts/small.gif");
        assert_eq!(storage.url(&name), "/media/posts/small.gif");
        assert_eq!(storage.open(&name).await.unwrap(), Some(b"GIF89a".to_vec()));
    }

    #[tokio::test]
    async fn test_collision_gets_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let first = storage.save(&upload("small.gif")).await.unwrap();
        let second = storage.save(&upload("small.gif")).await.unwrap();

        assert_ne!(first, second);
        assert!(second.starts_with("posts/small_"));
        assert!(second.ends_with(".gif"));
        assert_eq!(second.len(), "posts/small_.gif".len() + SUFFIX_LEN);
    }

    #[tokio::test]
    async fn test_open_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        assert!(matches!(
            storage.open("../secret").await,
            Err(MediaError::InvalidName(_))
        ));
        assert!(matches!(
            storage.open("/etc/passwd").await,
            Err(MediaError::InvalidName(_))
        ));
        assert_eq!(storage.open("posts/missing.gif").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_concurrent_uploads_get_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let first_upload = ImageUpload {
            filename: "small.gif".to_string(),
            bytes: b"GIF89a-first".to_vec(),
        };
        let second_upload = ImageUpload {
            filename: "small.gif".to_string(),
            bytes: b"GIF89a-second".to_vec(),
        };

        let (first, second) =
            tokio::join!(storage.save(&first_upload), storage.save(&second_upload));
        let (first, second) = (first.unwrap(), second.unwrap());

        assert_ne!(first, second);
        assert_eq!(storage.open(&first).await.unwrap(), Some(first_upload.bytes));
        assert_eq!(storage.open(&second).await.unwrap(), Some(second_upload.bytes));
    }

    #[tokio::test]
    async fn test_open_directory_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let name = storage.save(&upload("small.gif")).await.unwrap();

        assert_eq!(storage.open("posts").await.unwrap(), None);
        assert_eq!(
            storage.open(&format!("{name}/inner.gif")).await.unwrap(),
            None
        );
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("../../evil name.gif"), "evil_name.gif");
        assert_eq!(sanitize_file_name("C:\\photos\\cat.png"), "cat.png");
        assert_eq!(sanitize_file_name("..."), "upload");
    }
}
