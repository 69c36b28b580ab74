//! Embedding keywords into image metadata.
//!
//! Builds one combined `"lang:keyword, lang:keyword"` string over the
//! selected languages and writes it into the image's native metadata
//! container: a free-text COM comment segment for JPEG, a `tEXt` chunk
//! named "Keywords" for PNG. The container is rewritten at the segment /
//! chunk level, so pixel data passes through byte-for-byte untouched.
//!
//! This mutates the source file in place and must be invoked explicitly;
//! it never happens as a side effect of generation or persistence. Any
//! prior value in the target field is overwritten, not merged.

use crate::error::KeywordError;
use crate::types::KeywordSet;
use image::ImageFormat;
use img_parts::jpeg::{markers, Jpeg, JpegSegment};
use img_parts::png::{Png, PngChunk};
use img_parts::Bytes;
use std::path::Path;

/// The PNG text chunk keyword under which the combined string is stored.
const PNG_TEXT_KEYWORD: &[u8] = b"Keywords";

/// Embed keywords for the selected languages into an image's metadata.
///
/// The string lands in the container's own text field: the COM comment
/// segment for JPEG and a `tEXt` chunk named "Keywords" for PNG. For JPEG
/// this is not EXIF; tools that only read EXIF tags (UserComment and the
/// like) will not see it, while anything that shows the plain JPEG comment
/// will.
///
/// Returns `true` on success. Failures (unsupported container, unreadable
/// file, malformed container) are logged and reported as `false`, leaving
/// the file unmodified; keyword files already persisted are unaffected.
pub fn embed_keywords(image_path: &Path, keywords: &KeywordSet, selected: &[String]) -> bool {
    match try_embed(image_path, keywords, selected) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Embedding failed for {}: {e}", image_path.display());
            false
        }
    }
}

/// Build the combined metadata string for the selected languages.
///
/// Only languages present in the set with a non-empty keyword list
/// contribute; selection order is preserved.
pub fn combined_keyword_string(keywords: &KeywordSet, selected: &[String]) -> String {
    let mut pairs = Vec::new();
    for lang in selected {
        if let Some(list) = keywords.get(lang) {
            pairs.extend(list.iter().map(|kw| format!("{lang}:{kw}")));
        }
    }
    pairs.join(", ")
}

fn try_embed(
    image_path: &Path,
    keywords: &KeywordSet,
    selected: &[String],
) -> Result<(), KeywordError> {
    let bytes = std::fs::read(image_path).map_err(|e| KeywordError::Read {
        path: image_path.to_path_buf(),
        message: e.to_string(),
    })?;

    let format = image::guess_format(&bytes).map_err(|e| KeywordError::Embed {
        path: image_path.to_path_buf(),
        message: format!("Unrecognized image data: {e}"),
    })?;

    let value = combined_keyword_string(keywords, selected);

    let rewritten = match format {
        ImageFormat::Jpeg => embed_jpeg(image_path, bytes, &value)?,
        ImageFormat::Png => embed_png(image_path, bytes, &value)?,
        other => {
            return Err(KeywordError::UnsupportedFormat {
                path: image_path.to_path_buf(),
                format: format!("{other:?}"),
            })
        }
    };

    // Temp-write and rename: the original is intact if anything above failed
    let tmp = staging_path(image_path);
    std::fs::write(&tmp, &rewritten)
        .and_then(|()| std::fs::rename(&tmp, image_path))
        .map_err(|e| KeywordError::Embed {
            path: image_path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Sibling staging file for the rewrite of one image.
///
/// Appends to the full file name rather than swapping the extension, so
/// `photo.jpg` and `photo.png` in the same directory stage to distinct
/// paths and concurrent embeds cannot rename one image's bytes over the
/// other's.
fn staging_path(image_path: &Path) -> std::path::PathBuf {
    let file_name = image_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image");
    image_path.with_file_name(format!("{file_name}.snaptag.tmp"))
}

/// Replace the JPEG free-text comment with the combined string.
///
/// All other segments (EXIF, ICC, the entropy-coded scan) are copied
/// through unchanged.
fn embed_jpeg(path: &Path, bytes: Vec<u8>, value: &str) -> Result<Vec<u8>, KeywordError> {
    let mut jpeg = Jpeg::from_bytes(Bytes::from(bytes)).map_err(|e| KeywordError::Embed {
        path: path.to_path_buf(),
        message: format!("Malformed JPEG: {e}"),
    })?;

    let segments = jpeg.segments_mut();
    segments.retain(|segment| segment.marker() != markers::COM);
    segments.insert(
        0,
        JpegSegment::new_with_contents(markers::COM, Bytes::from(value.as_bytes().to_vec())),
    );

    Ok(jpeg.encoder().bytes().to_vec())
}

/// Replace the PNG "Keywords" text chunk with the combined string.
fn embed_png(path: &Path, bytes: Vec<u8>, value: &str) -> Result<Vec<u8>, KeywordError> {
    let mut png = Png::from_bytes(Bytes::from(bytes)).map_err(|e| KeywordError::Embed {
        path: path.to_path_buf(),
        message: format!("Malformed PNG: {e}"),
    })?;

    let mut contents = Vec::with_capacity(PNG_TEXT_KEYWORD.len() + 1 + value.len());
    contents.extend_from_slice(PNG_TEXT_KEYWORD);
    contents.push(0);
    contents.extend_from_slice(value.as_bytes());

    let chunks = png.chunks_mut();
    chunks.retain(|chunk| !is_keywords_chunk(chunk));
    // Behind IHDR, which from_bytes guarantees is first
    chunks.insert(1, PngChunk::new(*b"tEXt", Bytes::from(contents)));

    Ok(png.encoder().bytes().to_vec())
}

fn is_keywords_chunk(chunk: &PngChunk) -> bool {
    chunk.kind() == *b"tEXt" && {
        let contents = chunk.contents();
        contents.len() > PNG_TEXT_KEYWORD.len()
            && &contents[..PNG_TEXT_KEYWORD.len()] == PNG_TEXT_KEYWORD
            && contents[PNG_TEXT_KEYWORD.len()] == 0
    }
}
