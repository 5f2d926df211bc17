//! Reader for the IDX image/label pairs used by MNIST and its derivatives.
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x03        (number of dimensions = 3)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (big-endian u32)
//! bytes 12-15:  cols        (big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-1:   0x00 0x00
//! byte   2:     0x08
//! byte   3:     0x01
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index in [0, n_classes)
//! ```

use std::path::Path;

use log::info;

use crate::dataset::Dataset;
use crate::error::{FlowError, Result};

const IMAGE_HEADER: usize = 16;
const LABEL_HEADER: usize = 8;

fn be_u32(bytes: &[u8], at: usize) -> usize {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]) as usize
}

fn check_magic(bytes: &[u8], dims: u8, what: &str) -> Result<()> {
    if bytes[0] != 0x00 || bytes[1] != 0x00 {
        return Err(FlowError::Idx(format!(
            "{} file: bytes 0-1 must be 0x00 0x00, got 0x{:02X} 0x{:02X}",
            what, bytes[0], bytes[1]
        )));
    }
    if bytes[2] != 0x08 {
        return Err(FlowError::Idx(format!(
            "{} file: dtype byte must be 0x08 (uint8), got 0x{:02X}",
            what, bytes[2]
        )));
    }
    if bytes[3] != dims {
        return Err(FlowError::Idx(format!(
            "{} file: expected {} dimensions, got {}",
            what, dims, bytes[3]
        )));
    }
    Ok(())
}

/// Parses an image file and a label file into `(inputs, labels)`.
///
/// `inputs[i]` holds `rows * cols` pixels scaled into `[0.0, 1.0]`;
/// `labels[i]` is a one-hot vector of length `n_classes`.
pub fn parse_idx_pair(image_bytes: &[u8], label_bytes: &[u8], n_classes: usize) -> Result<Dataset> {
    if image_bytes.len() < IMAGE_HEADER {
        return Err(FlowError::Idx(format!(
            "image file too short: expected at least {} header bytes, got {}",
            IMAGE_HEADER,
            image_bytes.len()
        )));
    }
    check_magic(image_bytes, 0x03, "image")?;

    let n_items = be_u32(image_bytes, 4);
    let rows = be_u32(image_bytes, 8);
    let cols = be_u32(image_bytes, 12);

    let n_pixels = rows
        .checked_mul(cols)
        .ok_or_else(|| FlowError::Idx(format!("rows * cols overflows (rows={}, cols={})", rows, cols)))?;
    let image_len = n_items
        .checked_mul(n_pixels)
        .and_then(|n| n.checked_add(IMAGE_HEADER))
        .ok_or_else(|| FlowError::Idx("image data length overflows".to_owned()))?;
    if image_bytes.len() < image_len {
        return Err(FlowError::Idx(format!(
            "image file too short: header declares {} items of {}x{} pixels, file is {} bytes",
            n_items, rows, cols, image_bytes.len()
        )));
    }

    if label_bytes.len() < LABEL_HEADER {
        return Err(FlowError::Idx(format!(
            "label file too short: expected at least {} header bytes, got {}",
            LABEL_HEADER,
            label_bytes.len()
        )));
    }
    check_magic(label_bytes, 0x01, "label")?;

    let label_count = be_u32(label_bytes, 4);
    if label_count != n_items {
        return Err(FlowError::Idx(format!(
            "image file declares {} items but label file declares {}",
            n_items, label_count
        )));
    }
    if label_bytes.len() < LABEL_HEADER + n_items {
        return Err(FlowError::Idx(format!(
            "label file too short: header declares {} labels, file is {} bytes",
            n_items,
            label_bytes.len()
        )));
    }
    if n_classes < 2 {
        return Err(FlowError::Idx(format!("n_classes must be at least 2, got {}", n_classes)));
    }

    let inputs: Vec<Vec<f64>> = if n_pixels == 0 {
        vec![Vec::new(); n_items]
    } else {
        image_bytes[IMAGE_HEADER..image_len]
            .chunks_exact(n_pixels)
            .map(|chunk| chunk.iter().map(|&px| px as f64 / 255.0).collect())
            .collect()
    };

    let mut labels = Vec::with_capacity(n_items);
    for (i, &class) in label_bytes[LABEL_HEADER..LABEL_HEADER + n_items].iter().enumerate() {
        let class = class as usize;
        if class >= n_classes {
            return Err(FlowError::Idx(format!(
                "label {}: class {} is out of range for n_classes={}",
                i, class, n_classes
            )));
        }
        let mut one_hot = vec![0.0; n_classes];
        one_hot[class] = 1.0;
        labels.push(one_hot);
    }

    Ok((inputs, labels))
}

/// Reads and parses an image/label file pair from disk.
pub fn load_idx_pair(image_path: impl AsRef<Path>, label_path: impl AsRef<Path>, n_classes: usize) -> Result<Dataset> {
    let image_bytes = std::fs::read(image_path.as_ref())?;
    let label_bytes = std::fs::read(label_path.as_ref())?;
    let dataset = parse_idx_pair(&image_bytes, &label_bytes, n_classes)?;
    info!("loaded {} samples from {}", dataset.0.len(), image_path.as_ref().display());
    Ok(dataset)
}
