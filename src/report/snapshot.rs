use std::path::{Path, PathBuf};

use crate::foundation::error::{ConformError, ConformResult};
use crate::framebuffer::view::PixelView;
use crate::table::SuiteKind;

/// File name of the snapshot for case `id` of `suite` presented as frame `frame`.
pub fn snapshot_name(suite: SuiteKind, id: u32, frame: u64) -> String {
    format!("{suite}-{id:03}-frame{frame:05}.png")
}

/// Write the whole framebuffer behind `view` as an upright RGBA PNG under `dir`.
pub fn write_png(
    dir: &Path,
    suite: SuiteKind,
    id: u32,
    frame: u64,
    view: &PixelView<'_>,
) -> ConformResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| {
        ConformError::Other(
            anyhow::Error::new(e).context(format!("create snapshot dir '{}'", dir.display())),
        )
    })?;

    let layout = view.layout();
    let rgba = view.to_rgba8_top_down()?;
    let path = dir.join(snapshot_name(suite, id, frame));
    image::save_buffer_with_format(
        &path,
        &rgba,
        layout.width,
        layout.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| {
        ConformError::Other(
            anyhow::Error::new(e).context(format!("write png '{}'", path.display())),
        )
    })?;
    tracing::debug!(path = %path.display(), "wrote mismatch snapshot");
    Ok(path)
}
