//! The byte-fetch capability: the decoder's only I/O dependency. Callers
//! supply how buffer uris turn into bytes (network, filesystem, embedded
//! data); the parse never touches I/O directly.

use std::path::{Component, PathBuf};

use crate::error::FetchError;

/// Retrieval of raw bytes for a buffer uri. Implementations must be `Sync`
/// since independent buffers of one parse are fetched concurrently.
pub trait FetchBytes: Sync {
	fn fetch(&self, uri: &str) -> Result<Vec<u8>, FetchError>;
}

impl<F> FetchBytes for F
where
	F: Fn(&str) -> Result<Vec<u8>, FetchError> + Sync,
{
	fn fetch(&self, uri: &str) -> Result<Vec<u8>, FetchError> {
		self(uri)
	}
}

#[derive(Debug, thiserror::Error)]
pub enum FsFetchError {
	#[error("uri \"{0}\" must not be absolute")]
	AbsoluteUri(PathBuf),
	#[error("uri \"{0}\" must not reference parent directories")]
	ParentDirUri(PathBuf),
	#[error("io error")]
	Io(#[from] std::io::Error),
}

/// Filesystem fetcher resolving uris relative to a root directory,
/// typically the directory containing the .gltf file. Absolute uris and
/// uris escaping the root via `..` are rejected.
pub struct FsFetch {
	root: PathBuf,
}

impl FsFetch {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}
}

impl FetchBytes for FsFetch {
	fn fetch(&self, uri: &str) -> Result<Vec<u8>, FetchError> {
		let path = PathBuf::from(uri);
		if path.is_absolute() {
			return Err(FsFetchError::AbsoluteUri(path).into());
		}
		if path.components().any(|c| c == Component::ParentDir) {
			return Err(FsFetchError::ParentDirUri(path).into());
		}
		let mut full_path = self.root.clone();
		full_path.push(path);
		log::debug!("reading buffer from {}", full_path.display());
		Ok(std::fs::read(full_path).map_err(FsFetchError::Io)?)
	}
}
