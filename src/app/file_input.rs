use crate::blob::Blob;
use crate::image::{is_jpeg_mime, mime_type_of};
use anyhow::Context as _;
use std::path::Path;
use std::sync::Arc;

/// Read a file chosen in the picker. `Ok(None)` when it is not a JPEG.
pub fn blob_from_path(path: &Path) -> anyhow::Result<Option<Blob>> {
    let name = display_name(path);
    if !accepts(&name, "", Some(path)) {
        return Ok(None);
    }
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Some(Blob::new(bytes, crate::image::JPEG_MIME, Some(name))))
}

/// Turn the first dropped file into a blob. `Ok(None)` when it is not a JPEG.
pub fn blob_from_dropped(file: &egui::DroppedFile) -> anyhow::Result<Option<Blob>> {
    let name = if file.name.is_empty() {
        file.path.as_deref().map(display_name).unwrap_or_default()
    } else {
        file.name.clone()
    };
    if !accepts(&name, &file.mime, file.path.as_deref()) {
        return Ok(None);
    }
    if let Some(bytes) = &file.bytes {
        return Ok(Some(Blob::new(
            Arc::clone(bytes),
            crate::image::JPEG_MIME,
            Some(name),
        )));
    }
    let Some(path) = file.path.as_deref() else {
        anyhow::bail!("Dropped {name} has neither bytes nor a path");
    };
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Some(Blob::new(bytes, crate::image::JPEG_MIME, Some(name))))
}

/// Whether a file with this name, reported MIME and path is a JPEG.
pub fn accepts(name: &str, reported_mime: &str, path: Option<&Path>) -> bool {
    let mime = mime_type_of(reported_mime, path, name);
    let accepted = mime.as_deref().is_some_and(is_jpeg_mime);
    if !accepted {
        log::debug!(
            "Ignoring {name}: type {} is not {}",
            mime.as_deref().unwrap_or("unknown"),
            crate::image::JPEG_MIME
        );
    }
    accepted
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map_or_else(|| path.display().to_string(), str::to_string)
}
