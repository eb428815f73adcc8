//! Picture references for recipes and ingredients.
//!
//! A picture reference is a path relative to the media root. Entities
//! without an uploaded picture point at [`NO_PICTURE`].

use image::ImageFormat;

use crate::error::CoreError;

/// Sentinel reference used when no picture has been uploaded.
pub const NO_PICTURE: &str = "no_picture.jpg";

/// Which kind of entity a picture belongs to. Determines the sub-directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureOwner {
    Recipe,
    Ingredient,
}

impl PictureOwner {
    pub fn directory(&self) -> &'static str {
        match self {
            Self::Recipe => "recipes",
            Self::Ingredient => "ingredients",
        }
    }
}

/// Detect the image format from the leading bytes of an upload.
///
/// Only PNG, JPEG and WebP are accepted. Returns the file extension to
/// store the blob under.
pub fn sniff_extension(data: &[u8]) -> Result<&'static str, CoreError> {
    if data.is_empty() {
        return Err(CoreError::Validation("uploaded picture is empty".to_string()));
    }

    match image::guess_format(data) {
        Ok(ImageFormat::Png) => Ok("png"),
        Ok(ImageFormat::Jpeg) => Ok("jpg"),
        Ok(ImageFormat::WebP) => Ok("webp"),
        Ok(other) => Err(CoreError::Validation(format!(
            "Unsupported picture format {other:?}. Supported: png, jpeg, webp"
        ))),
        Err(_) => Err(CoreError::Validation(
            "uploaded file is not a recognised image".to_string(),
        )),
    }
}

/// Reject uploads larger than `max_bytes`.
pub fn validate_upload_size(len: usize, max_bytes: usize) -> Result<(), CoreError> {
    if len > max_bytes {
        return Err(CoreError::Validation(format!(
            "picture is {len} bytes, maximum is {max_bytes}"
        )));
    }
    Ok(())
}

/// Relative reference for a stored picture, e.g. `recipes/<stem>.png`.
pub fn picture_reference(owner: PictureOwner, stem: &str, extension: &str) -> String {
    format!("{}/{stem}.{extension}", owner.directory())
}

/// Whether `reference` names a file written by an upload, as opposed to
/// [`NO_PICTURE`] or anything outside the owner directories.
pub fn is_uploaded(reference: &str) -> bool {
    let Some((directory, file)) = reference.split_once('/') else {
        return false;
    };
    [PictureOwner::Recipe, PictureOwner::Ingredient]
        .iter()
        .any(|owner| owner.directory() == directory)
        && !file.is_empty()
        && !file.contains(&['/', '\\'][..])
        && !file.starts_with('.')
}
