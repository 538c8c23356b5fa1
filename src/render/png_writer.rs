//! PNG encoder adapter (spec §4.7, component C8): the only place the
//! `image` crate's encoder is named. Streams the cropped RGBA8 buffer of a
//! [`Canvas`] to a file.

use std::path::Path;

use crate::error::Error;

use super::canvas::Canvas;

/// Crops `canvas` (spec §4.5) and writes it to `path` as 8-bit RGBA PNG.
/// Any I/O or encode failure is fatal (spec §7 "Fatal I/O").
pub fn write_png(canvas: &Canvas, path: &Path) -> Result<(), Error> {
    let (offset, rows) = canvas.cropped_bounds();
    let width = canvas.width as u32;
    // A canvas with no content reports height 0 (spec §4.5); write a single
    // fully transparent row rather than an empty (invalid) PNG.
    let (data, height) = if rows == 0 {
        (vec![0u8; width as usize * 4], 1)
    } else {
        (canvas.rows_rgba8(offset, rows), rows as u32)
    };

    image::save_buffer(path, &data, width, height, image::ColorType::Rgba8).map_err(|source| Error::OutputIo {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::Other, source),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Coordinates;

    #[test]
    fn writes_cropped_empty_canvas_without_panicking() {
        let coords = Coordinates::new(0, 15, 0, 15, 0, 255);
        let canvas = Canvas::new(coords, false);
        let dir = std::env::temp_dir().join(format!("mc-iso-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.png");
        write_png(&canvas, &path).unwrap();
        assert!(path.exists());
        std::fs::remove_dir_all(&dir).ok();
    }
}
