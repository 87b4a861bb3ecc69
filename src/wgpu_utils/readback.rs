// src/wgpu_utils/readback.rs
//! Blocking texture readback through a staging buffer

use crate::error::{LifeError, Result};

/// Row pitch for a texture-to-buffer copy: `unpadded` rounded up to 256 bytes
pub fn padded_bytes_per_row(unpadded: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Copies a whole 2D texture to the host
///
/// Returns the raw bytes and their row pitch. Blocks until the GPU has
/// finished every previously submitted command.
pub fn read_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    bytes_per_texel: u32,
) -> Result<(Vec<u8>, u32)> {
    let size = texture.size();
    let bytes_per_row = padded_bytes_per_row(size.width * bytes_per_texel);
    let buffer_size = bytes_per_row as u64 * size.height as u64;

    let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Readback Staging Buffer"),
        size: buffer_size,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Readback Encoder"),
    });
    encoder.copy_texture_to_buffer(
        texture.as_image_copy(),
        wgpu::TexelCopyBufferInfo {
            buffer: &staging_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(size.height),
            },
        },
        size,
    );
    queue.submit(std::iter::once(encoder.finish()));

    let slice = staging_buffer.slice(..);
    let (tx, rx) = futures::channel::oneshot::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });

    device
        .poll(wgpu::PollType::Wait)
        .map_err(|e| LifeError::Readback(e.to_string()))?;

    match futures::executor::block_on(rx) {
        Ok(Ok(())) => {
            let mapped = slice.get_mapped_range();
            let data = mapped.to_vec();
            drop(mapped);
            staging_buffer.unmap();
            Ok((data, bytes_per_row))
        }
        Ok(Err(e)) => Err(LifeError::Readback(e.to_string())),
        Err(_) => Err(LifeError::Readback(
            "map callback dropped before completion".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_bytes_per_row() {
        assert_eq!(padded_bytes_per_row(4), 256);
        assert_eq!(padded_bytes_per_row(256), 256);
        assert_eq!(padded_bytes_per_row(257), 512);
        assert_eq!(padded_bytes_per_row(128 * 4), 512);
    }
}
