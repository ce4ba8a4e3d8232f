//! Top-level ISO-BMFF box scanning.
//!
//! Only box headers are read, so a multi-gigabyte file costs a handful of
//! seeks. A file is fast-start when its `moov` box comes before `mdat`.

use std::io::{Error, ErrorKind, Result, SeekFrom};
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

/// One top-level box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxInfo {
    pub kind: [u8; 4],
    pub offset: u64,
    pub size: u64,
}

impl BoxInfo {
    pub fn is(&self, kind: &[u8; 4]) -> bool {
        &self.kind == kind
    }
}

/// List the top-level boxes of `reader` in file order.
pub async fn top_level_boxes<R>(reader: &mut R) -> Result<Vec<BoxInfo>>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    let end = reader.seek(SeekFrom::End(0)).await?;
    let mut offset = reader.seek(SeekFrom::Start(0)).await?;
    let mut boxes = Vec::new();

    while offset < end {
        if end - offset < 8 {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("truncated box header at offset {}", offset),
            ));
        }

        let mut header = [0u8; 8];
        reader.read_exact(&mut header).await?;
        let size32 = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
        let kind = [header[4], header[5], header[6], header[7]];

        let (size, header_len) = match size32 {
            // 64-bit largesize follows the type
            1 => (reader.read_u64().await?, 16),
            // box extends to end of file
            0 => (end - offset, 8),
            n => (u64::from(n), 8),
        };

        if size < header_len || size > end - offset {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!(
                    "box {} at offset {} has invalid size {}",
                    String::from_utf8_lossy(&kind),
                    offset,
                    size
                ),
            ));
        }

        boxes.push(BoxInfo { kind, offset, size });
        offset += size;
        reader.seek(SeekFrom::Start(offset)).await?;
    }

    Ok(boxes)
}

/// `Some(true)` when `moov` precedes `mdat`, `None` if either is missing.
pub fn is_fast_start(boxes: &[BoxInfo]) -> Option<bool> {
    let moov = boxes.iter().position(|b| b.is(b"moov"))?;
    let mdat = boxes.iter().position(|b| b.is(b"mdat"))?;
    Some(moov < mdat)
}

pub async fn file_is_fast_start(path: &Path) -> Result<Option<bool>> {
    let mut file = tokio::fs::File::open(path).await?;
    let boxes = top_level_boxes(&mut file).await?;
    Ok(is_fast_start(&boxes))
}
