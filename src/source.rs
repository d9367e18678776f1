use std::sync::Arc;

use crate::error::{ReframeError, ReframeResult};

/// Decoded source bitmap. Replaced wholesale on each successful load and
/// never mutated in place; the pixel data is premultiplied at decode time so
/// every downstream composite works in one alpha model.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
    /// File name the bytes came from, if known. Feeds the export filename.
    pub file_name: Option<String>,
}

/// Decode any common raster format from raw bytes. A failure here means the
/// session simply does not transition to the loaded state.
pub fn decode_source(bytes: &[u8], file_name: Option<&str>) -> ReframeResult<SourceImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|err| ReframeError::decode(format!("decode image from memory: {err}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(SourceImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
        file_name: file_name.map(str::to_string),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
