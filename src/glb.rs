//! GLB container detection and chunk decoding.
//!
//! A GLB file is a 12 byte header (ascii magic "glTF", u32 LE version,
//! u32 LE total length) followed by a chunk stream. Each chunk is a u32 LE
//! payload length, a u32 LE type tag, then the payload. The first chunk must
//! be json; the first bin chunk becomes the implicit body of buffer 0.

use crate::error::GltfError;

pub const MAGIC: &[u8;4] = b"glTF";
pub const HEADER_LENGTH: usize = 12;
pub const CHUNK_JSON: u32 = 0x4E4F534A;
pub const CHUNK_BIN: u32 = 0x004E4942;

/// sniffs whether the input is a glb container or plain json text
pub fn is_glb(data: &[u8]) -> bool {
	matches!(data.split_first_chunk::<4>(), Some((magic, _)) if magic == MAGIC)
}

#[derive(Debug)]
pub struct Glb {
	pub version: u32,
	/// total length declared by the header, not validated against the input
	pub declared_length: u32,
	pub json: Vec<u8>,
	pub bin: Option<Vec<u8>>,
}

impl Glb {
	pub fn parse(data: &[u8]) -> Result<Self, GltfError> {
		let (header, mut rest) = data.split_first_chunk::<HEADER_LENGTH>()
			.ok_or_else(|| GltfError::Format("glb shorter than 12 byte header".into()))?;
		let (magic, header) = header.split_first_chunk::<4>().unwrap();
		let (version, length) = header.split_first_chunk::<4>().unwrap();
		if magic != MAGIC {
			return Err(GltfError::Format("glb header magic is not \"glTF\"".into()));
		}
		let version = u32::from_le_bytes(*version);
		if version < 2 {
			return Err(GltfError::Version(version.to_string()));
		}
		let declared_length = u32::from_le_bytes(*length.first_chunk::<4>().unwrap());

		let mut json: Option<Vec<u8>> = None;
		let mut bin: Option<Vec<u8>> = None;
		let mut index = 0;
		while !rest.is_empty() {
			let (size, after) = rest.split_first_chunk::<4>()
				.ok_or_else(|| GltfError::Format(format!("chunk {index}: truncated header")))?;
			let (kind, after) = after.split_first_chunk::<4>()
				.ok_or_else(|| GltfError::Format(format!("chunk {index}: truncated header")))?;
			let size = u32::from_le_bytes(*size) as usize;
			let kind = u32::from_le_bytes(*kind);
			let (payload, after) = after.split_at_checked(size).ok_or_else(|| {
				GltfError::Format(format!(
					"chunk {index}: declared {size} bytes, {} remain", after.len()
				))
			})?;
			match kind {
				CHUNK_JSON if index == 0 => {
					json = Some(payload.to_vec());
				},
				_ if index == 0 => {
					return Err(GltfError::Format(format!(
						"first chunk must be json, got type {kind:#010x}"
					)));
				},
				CHUNK_BIN if bin.is_none() => {
					bin = Some(payload.to_vec());
				},
				_ => {
					// extra bin chunks and unknown types are legal to ignore
					log::debug!("skipping chunk {index} of type {kind:#010x} ({size} bytes)");
				},
			}
			rest = after;
			index += 1;
		}

		let json = json.ok_or_else(|| GltfError::Format("glb has no json chunk".into()))?;
		log::debug!(
			"glb v{version}: json chunk {} bytes, bin chunk {:?} bytes",
			json.len(), bin.as_ref().map(|b| b.len()),
		);
		Ok(Self { version, declared_length, json, bin })
	}
}
