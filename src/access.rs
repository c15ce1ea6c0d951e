//! Resolution of the buffer -> bufferView -> accessor indirection chain.
//!
//! Buffers are fetched up front (concurrently for independent uris, joined
//! before anything decodes), bufferViews become checked sub-slices, and
//! accessors decode their view as a flat little-endian numeric sequence.

use std::borrow::Cow;

use crate::error::GltfError;
use crate::fetch::FetchBytes;
use crate::json::{JSONAccessor, JSONBufferView, JSONBuffer};

pub const COMPONENT_I8: u32 = 5120;
pub const COMPONENT_U8: u32 = 5121;
pub const COMPONENT_I16: u32 = 5122;
pub const COMPONENT_U16: u32 = 5123;
pub const COMPONENT_U32: u32 = 5125;
pub const COMPONENT_F32: u32 = 5126;

pub fn component_width(component_type: u32) -> Option<usize> {
	match component_type {
		COMPONENT_I8 | COMPONENT_U8 => Some(1),
		COMPONENT_I16 | COMPONENT_U16 => Some(2),
		COMPONENT_U32 | COMPONENT_F32 => Some(4),
		_ => None,
	}
}

/// components per element for an accessor `type` string
pub fn components_per_element(ty: &str) -> Option<usize> {
	match ty {
		"SCALAR" => Some(1),
		"VEC2" => Some(2),
		"VEC3" => Some(3),
		"VEC4" => Some(4),
		"MAT3" => Some(9),
		"MAT4" => Some(16),
		_ => None,
	}
}

/// Fetches every declared buffer. Uri buffers each fetch on their own scoped
/// thread; the scope exit is the join barrier, so every buffer is resolved
/// before any decoding starts. The first failure in buffer order aborts.
/// A buffer without a uri must be buffer 0 backed by the glb bin chunk.
pub(crate) fn resolve_buffers<'a>(
	defs: &[JSONBuffer],
	bin: Option<&'a [u8]>,
	fetch: &impl FetchBytes,
) -> Result<Vec<Cow<'a, [u8]>>, GltfError> {
	std::thread::scope(|s| {
		let handles: Vec<_> = defs.iter().enumerate().map(|(i, def)| {
			def.uri.as_deref().map(|uri| s.spawn(move || {
				log::debug!("fetching buffer {i} from {uri:?}");
				fetch.fetch(uri).map_err(|source| GltfError::Fetch {
					buffer: i,
					uri: uri.to_string(),
					source,
				})
			}))
		}).collect();

		handles.into_iter().enumerate().map(|(i, handle)| match handle {
			Some(handle) => match handle.join() {
				Ok(result) => result.map(Cow::Owned),
				Err(payload) => std::panic::resume_unwind(payload),
			},
			None => {
				if i != 0 {
					return Err(GltfError::Format(format!(
						"buffer {i} has no uri; only buffer 0 may be glb-backed"
					)));
				}
				let bin = bin.ok_or_else(|| GltfError::Format(
					"buffer 0 has no uri and the container has no bin chunk".into()
				))?;
				let len = defs[i].byte_length;
				if bin.len() < len {
					return Err(GltfError::Format(format!(
						"buffer 0 declares {len} bytes, bin chunk has {}", bin.len()
					)));
				}
				Ok(Cow::Borrowed(&bin[..len]))
			},
		}).collect()
	})
}

/// Carves each bufferView out of its buffer as a borrowed sub-slice.
pub(crate) fn bind_views<'a>(
	defs: &[JSONBufferView],
	buffers: &'a [Cow<'_, [u8]>],
) -> Result<Vec<&'a [u8]>, GltfError> {
	defs.iter().enumerate().map(|(i, def)| {
		let buffer: &'a [u8] = buffers.get(def.buffer).ok_or_else(|| {
			GltfError::Format(format!("bufferView {i} references missing buffer {}", def.buffer))
		})?;
		let offset = def.byte_offset.unwrap_or(0);
		offset.checked_add(def.byte_length)
			.and_then(|end| buffer.get(offset..end))
			.ok_or(GltfError::Bounds {
				view: i,
				buffer: def.buffer,
				offset,
				length: def.byte_length,
				size: buffer.len(),
			})
	}).collect()
}

/// A typed, counted window over a bufferView range.
pub struct Accessor<'a> {
	index: usize,
	component_type: u32,
	count: usize,
	arity: usize,
	bytes: &'a [u8],
}

pub(crate) fn bind_accessors<'a>(
	defs: &[JSONAccessor],
	views: &[&'a [u8]],
) -> Result<Vec<Accessor<'a>>, GltfError> {
	defs.iter().enumerate().map(|(i, def)| {
		let bytes = *views.get(def.buffer_view).ok_or_else(|| {
			GltfError::Format(format!("accessor {i} references missing bufferView {}", def.buffer_view))
		})?;
		let arity = components_per_element(&def.ty).ok_or_else(|| {
			GltfError::Format(format!("accessor {i} has unknown type {:?}", def.ty))
		})?;
		Ok(Accessor {
			index: i,
			component_type: def.component_type,
			count: def.count,
			arity,
			bytes,
		})
	}).collect()
}

impl Accessor<'_> {
	pub fn count(&self) -> usize {
		self.count
	}

	pub fn arity(&self) -> usize {
		self.arity
	}

	/// Decodes `count * arity` consecutive little-endian components as a
	/// flat sequence. f64 represents every value of all six component types
	/// exactly; callers group by their known arity. Vec/mat elements are
	/// not de-interleaved here.
	pub fn decode_all(&self) -> Result<Vec<f64>, GltfError> {
		let width = component_width(self.component_type).ok_or(GltfError::UnsupportedType {
			accessor: self.index,
			component_type: self.component_type,
		})?;
		// count is document-controlled; an overflowed byte total must fail,
		// not wrap around and read as an empty sequence
		let (n, needed) = self.count.checked_mul(self.arity)
			.and_then(|n| Some((n, n.checked_mul(width)?)))
			.ok_or_else(|| GltfError::Format(format!(
				"accessor {}: count {} overflows the byte range",
				self.index, self.count
			)))?;
		if needed > self.bytes.len() {
			return Err(GltfError::Format(format!(
				"accessor {}: {n} components need {needed} bytes, bufferView range has {}",
				self.index, self.bytes.len()
			)));
		}
		let bytes = &self.bytes[..needed];
		let mut out = Vec::with_capacity(n);
		match self.component_type {
			COMPONENT_I8 => out.extend(bytes.iter().map(|b| *b as i8 as f64)),
			COMPONENT_U8 => out.extend(bytes.iter().map(|b| *b as f64)),
			COMPONENT_I16 => out.extend(bytes.chunks_exact(2).map(
				|c| i16::from_le_bytes(c.try_into().unwrap()) as f64
			)),
			COMPONENT_U16 => out.extend(bytes.chunks_exact(2).map(
				|c| u16::from_le_bytes(c.try_into().unwrap()) as f64
			)),
			COMPONENT_U32 => out.extend(bytes.chunks_exact(4).map(
				|c| u32::from_le_bytes(c.try_into().unwrap()) as f64
			)),
			COMPONENT_F32 => out.extend(bytes.chunks_exact(4).map(
				|c| f32::from_le_bytes(c.try_into().unwrap()) as f64
			)),
			_ => unreachable!(),
		}
		Ok(out)
	}
}
