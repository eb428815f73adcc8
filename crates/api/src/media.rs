//! Picture uploads for recipes and ingredients.
//!
//! Blobs are written under the configured media root as
//! `{recipes|ingredients}/{uuid}.{ext}`; the relative path is what gets
//! stored on the entity.

use std::path::Path;

use axum::extract::Multipart;
use recipebook_core::picture::{
    is_uploaded, picture_reference, sniff_extension, validate_upload_size, PictureOwner,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Name of the multipart field carrying the picture.
pub const PICTURE_FIELD: &str = "picture";

/// Pull the `picture` field out of a multipart body.
///
/// Unknown fields are ignored.
pub async fn read_picture_field(multipart: &mut Multipart) -> AppResult<Vec<u8>> {
    let mut data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some(PICTURE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            data = Some(bytes.to_vec());
        }
    }

    data.ok_or_else(|| AppError::BadRequest(format!("Missing required '{PICTURE_FIELD}' field")))
}

/// Check an uploaded picture and write it to disk.
///
/// Returns the relative reference to store on the owning entity.
pub async fn store_picture(
    media_root: &Path,
    owner: PictureOwner,
    data: &[u8],
    max_bytes: usize,
) -> AppResult<String> {
    validate_upload_size(data.len(), max_bytes)?;
    let extension = sniff_extension(data)?;

    let reference = picture_reference(owner, &Uuid::new_v4().to_string(), extension);
    let path = media_root.join(&reference);

    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;
    }
    tokio::fs::write(&path, data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    tracing::debug!(reference = %reference, bytes = data.len(), "Picture stored");
    Ok(reference)
}

/// Delete a previously stored picture.
///
/// Best effort: the default picture and foreign references are left alone,
/// and I/O failures are logged rather than returned.
pub async fn remove_picture(media_root: &Path, reference: &str) {
    if !is_uploaded(reference) {
        return;
    }

    match tokio::fs::remove_file(media_root.join(reference)).await {
        Ok(()) => tracing::debug!(reference, "Picture removed"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(reference, error = %e, "Failed to remove picture"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn remove_picture_deletes_only_uploaded_files() {
        let root = tempfile::tempdir().unwrap();
        tokio::fs::create_dir_all(root.path().join("recipes")).await.unwrap();
        tokio::fs::write(root.path().join("recipes/old.png"), b"x").await.unwrap();
        tokio::fs::write(root.path().join("no_picture.jpg"), b"x").await.unwrap();

        remove_picture(root.path(), "recipes/old.png").await;
        remove_picture(root.path(), "no_picture.jpg").await;
        remove_picture(root.path(), "recipes/missing.png").await;

        assert!(!root.path().join("recipes/old.png").exists());
        assert!(root.path().join("no_picture.jpg").exists());
    }
}
