//! PNG text metadata.
//!
//! Generated images are saved as PNG with the generation parameters in a
//! text chunk, where image viewers and the web UI's own "PNG Info" tab find
//! them.

use std::io::Cursor;

use png::text_metadata::{EncodableTextChunk, ITXtChunk, TEXtChunk};
use smarttile_openai::is_latin1;

use crate::error::{Result, TilesError};

/// Keyword of the chunk holding generation parameters.
pub const PARAMETERS_KEY: &str = "parameters";

const PNG_SIGNATURE: [u8; 8] = *b"\x89PNG\r\n\x1a\n";

/// Returns `image` as PNG carrying `text` under `keyword`.
///
/// PNG input keeps its bytes: the text chunk is spliced in before the first
/// `IDAT` and any earlier text chunk with the same keyword is dropped. Other
/// formats (JPEG) are decoded and re-encoded as 8-bit PNG.
///
/// Latin-1 text goes into a `tEXt` chunk, anything else into an `iTXt` chunk.
pub fn embed_text_chunk(image: &[u8], keyword: &str, text: &str) -> Result<Vec<u8>> {
    if image.starts_with(&PNG_SIGNATURE) {
        splice_text_chunk(image, keyword, text)
    } else {
        reencode_with_text(image, keyword, text)
    }
}

/// Reads the text stored under `keyword` from a PNG, from any of the
/// `tEXt`, `zTXt` or `iTXt` chunks placed before the image data.
pub fn read_text_chunk(png_bytes: &[u8], keyword: &str) -> Result<Option<String>> {
    let decoder = png::Decoder::new(Cursor::new(png_bytes));
    let reader = decoder.read_info()?;
    let info = reader.info();

    if let Some(chunk) = info
        .uncompressed_latin1_text
        .iter()
        .find(|c| c.keyword == keyword)
    {
        return Ok(Some(chunk.text.clone()));
    }
    if let Some(chunk) = info
        .compressed_latin1_text
        .iter()
        .find(|c| c.keyword == keyword)
    {
        return Ok(Some(chunk.get_text()?));
    }
    if let Some(chunk) = info.utf8_text.iter().find(|c| c.keyword == keyword) {
        return Ok(Some(chunk.get_text()?));
    }

    Ok(None)
}

/// One raw chunk of a PNG stream.
struct Chunk<'a> {
    kind: [u8; 4],
    data: &'a [u8],
    /// Length, type, data and CRC as they appear in the file.
    raw: &'a [u8],
}

impl Chunk<'_> {
    /// Keyword of a `tEXt`, `zTXt` or `iTXt` chunk.
    fn text_keyword(&self) -> Option<&[u8]> {
        match &self.kind {
            b"tEXt" | b"zTXt" | b"iTXt" => self.data.split(|b| *b == 0).next(),
            _ => None,
        }
    }
}

/// Splits the chunk stream following the signature.
fn chunks(png: &[u8]) -> Result<Vec<Chunk<'_>>> {
    let mut rest = png
        .get(PNG_SIGNATURE.len()..)
        .ok_or(TilesError::MalformedPng("missing signature"))?;
    let mut out = Vec::new();

    while !rest.is_empty() {
        if rest.len() < 12 {
            return Err(TilesError::MalformedPng("truncated chunk header"));
        }
        let len = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
        let total = len
            .checked_add(12)
            .filter(|t| *t <= rest.len())
            .ok_or(TilesError::MalformedPng("truncated chunk"))?;

        out.push(Chunk {
            kind: [rest[4], rest[5], rest[6], rest[7]],
            data: &rest[8..8 + len],
            raw: &rest[..total],
        });
        rest = &rest[total..];
    }

    Ok(out)
}

fn encode_text_chunk(keyword: &str, text: &str) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    if is_latin1(text) {
        TEXtChunk::new(keyword, text).encode(&mut out)?;
    } else {
        ITXtChunk::new(keyword, text).encode(&mut out)?;
    }
    Ok(out)
}

fn splice_text_chunk(png: &[u8], keyword: &str, text: &str) -> Result<Vec<u8>> {
    let text_chunk = encode_text_chunk(keyword, text)?;
    let mut out = Vec::with_capacity(png.len() + text_chunk.len());
    out.extend_from_slice(&PNG_SIGNATURE);

    let mut inserted = false;
    for chunk in chunks(png)? {
        if chunk.text_keyword() == Some(keyword.as_bytes()) {
            continue;
        }
        if !inserted && &chunk.kind == b"IDAT" {
            out.extend_from_slice(&text_chunk);
            inserted = true;
        }
        out.extend_from_slice(chunk.raw);
    }

    if !inserted {
        return Err(TilesError::MalformedPng("no IDAT chunk"));
    }
    Ok(out)
}

fn reencode_with_text(image: &[u8], keyword: &str, text: &str) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(image)?;
    let width = decoded.width();
    let height = decoded.height();

    let (color, pixels) = if decoded.color().has_alpha() {
        (png::ColorType::Rgba, decoded.to_rgba8().into_raw())
    } else {
        (png::ColorType::Rgb, decoded.to_rgb8().into_raw())
    };

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);

        if is_latin1(text) {
            encoder.add_text_chunk(keyword.to_string(), text.to_string())?;
        } else {
            encoder.add_itxt_chunk(keyword.to_string(), text.to_string())?;
        }

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&pixels)?;
        writer.finish()?;
    }

    Ok(out)
}
