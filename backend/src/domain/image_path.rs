//! Storage paths for uploaded recipe images.
//!
//! Uploaded files are renamed to a fresh random identifier; only the
//! original extension survives, so nothing else a client sends can reach
//! the file system path.

use std::fmt;

use uuid::Uuid;

use super::Recipe;

/// Directory, relative to the media root, holding recipe images.
pub const RECIPE_UPLOAD_DIR: &str = "uploads/recipe";

/// Longest accepted file extension.
pub const EXTENSION_MAX: usize = 16;

/// Reasons an image path cannot be produced or accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImagePathError {
    /// The original file name has no extension.
    #[error("file name must have an extension")]
    MissingExtension,
    /// The extension is empty, too long or not ASCII alphanumeric.
    #[error("file extension must be 1 to {max} ASCII letters or digits")]
    InvalidExtension { max: usize },
    /// The identifier source produced something unusable as a file stem.
    #[error("generated file identifier is not path safe")]
    InvalidIdentifier,
    /// A stored path does not point inside the recipe upload directory.
    #[error("image path must be a file directly under {RECIPE_UPLOAD_DIR}")]
    OutsideUploadDir,
}

/// Source of fresh file identifiers.
#[cfg_attr(test, mockall::automock)]
pub trait UploadIdSource: Send + Sync {
    /// Produce a new identifier for a file stem.
    fn next_id(&self) -> String;
}

/// Identifier source backed by random UUID v4 values.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomUploadIds;

impl UploadIdSource for RandomUploadIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Relative path of a stored recipe image, e.g. `uploads/recipe/<id>.jpg`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecipeImagePath(String);

impl RecipeImagePath {
    /// Accept a previously stored path, checking it stays in the upload
    /// directory.
    pub fn new(path: impl Into<String>) -> Result<Self, ImagePathError> {
        let path = path.into();
        let file_name = path
            .strip_prefix(RECIPE_UPLOAD_DIR)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or(ImagePathError::OutsideUploadDir)?;
        if file_name.is_empty()
            || file_name.contains(['/', '\\'])
            || file_name.starts_with('.')
        {
            return Err(ImagePathError::OutsideUploadDir);
        }
        Ok(Self(path))
    }

    /// File name component of the path.
    pub fn file_name(&self) -> &str {
        self.0
            .rsplit_once('/')
            .map_or(self.0.as_str(), |(_, name)| name)
    }

    /// Relative path as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for RecipeImagePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RecipeImagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generate a storage path for an image uploaded to `recipe`.
pub fn recipe_image_file_path(
    recipe: &Recipe,
    original_filename: &str,
) -> Result<RecipeImagePath, ImagePathError> {
    recipe_image_file_path_with(&RandomUploadIds, recipe, original_filename)
}

/// Generate a storage path using an injected identifier source.
///
/// Takes the owning recipe like any upload-path callback; the generated
/// path does not depend on it.
pub fn recipe_image_file_path_with(
    ids: &dyn UploadIdSource,
    _recipe: &Recipe,
    original_filename: &str,
) -> Result<RecipeImagePath, ImagePathError> {
    let extension = file_extension(original_filename)?;
    let stem = ids.next_id();
    if stem.is_empty()
        || !stem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ImagePathError::InvalidIdentifier);
    }
    Ok(RecipeImagePath(format!(
        "{RECIPE_UPLOAD_DIR}/{stem}.{extension}"
    )))
}

fn file_extension(filename: &str) -> Result<&str, ImagePathError> {
    let (_, extension) = filename
        .rsplit_once('.')
        .ok_or(ImagePathError::MissingExtension)?;
    let valid = !extension.is_empty()
        && extension.len() <= EXTENSION_MAX
        && extension.chars().all(|c| c.is_ascii_alphanumeric());
    if valid {
        Ok(extension)
    } else {
        Err(ImagePathError::InvalidExtension { max: EXTENSION_MAX })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{CookingTime, EntityId, Price, RecipeDraft, RecipeTitle, UserId};
    use rstest::{fixture, rstest};

    #[fixture]
    fn recipe() -> Recipe {
        Recipe::new(
            UserId::random(),
            RecipeDraft {
                title: RecipeTitle::new("Sample recipe").expect("title"),
                time_minutes: CookingTime::new(10).expect("time"),
                price: Price::parse("5.00").expect("price"),
                link: None,
                tags: Vec::new(),
                ingredients: Vec::new(),
            },
        )
    }

    fn fixed_ids(id: &'static str) -> MockUploadIdSource {
        let mut ids = MockUploadIdSource::new();
        ids.expect_next_id().returning(move || id.to_owned());
        ids
    }

    #[rstest]
    fn recipe_file_name_uses_generated_id(recipe: Recipe) {
        let ids = fixed_ids("test-uuid");
        let path = recipe_image_file_path_with(&ids, &recipe, "myimage.jpg").expect("path");
        assert_eq!(path.as_str(), "uploads/recipe/test-uuid.jpg");
    }

    #[rstest]
    #[case("photo.final.PNG", "uploads/recipe/test-uuid.PNG")]
    #[case("../../etc/passwd.txt", "uploads/recipe/test-uuid.txt")]
    fn only_the_extension_survives(
        #[case] filename: &str,
        #[case] expected: &str,
        recipe: Recipe,
    ) {
        let ids = fixed_ids("test-uuid");
        let path = recipe_image_file_path_with(&ids, &recipe, filename).expect("path");
        assert_eq!(path.as_str(), expected);
    }

    #[rstest]
    #[case("noextension", ImagePathError::MissingExtension)]
    #[case("trailingdot.", ImagePathError::InvalidExtension { max: EXTENSION_MAX })]
    #[case("evil.j/pg", ImagePathError::InvalidExtension { max: EXTENSION_MAX })]
    #[case("long.abcdefghijklmnopq", ImagePathError::InvalidExtension { max: EXTENSION_MAX })]
    fn unsafe_file_names_are_rejected(
        #[case] filename: &str,
        #[case] expected: ImagePathError,
        recipe: Recipe,
    ) {
        let ids = fixed_ids("test-uuid");
        let err = recipe_image_file_path_with(&ids, &recipe, filename).expect_err("must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn unsafe_identifiers_are_rejected(recipe: Recipe) {
        let ids = fixed_ids("../escape");
        let err = recipe_image_file_path_with(&ids, &recipe, "a.jpg").expect_err("must fail");
        assert_eq!(err, ImagePathError::InvalidIdentifier);
    }

    #[rstest]
    fn random_paths_are_unique_uuids(recipe: Recipe) {
        let first = recipe_image_file_path(&recipe, "a.jpg").expect("path");
        let second = recipe_image_file_path(&recipe, "a.jpg").expect("path");
        assert_ne!(first, second);
        let stem = first
            .file_name()
            .strip_suffix(".jpg")
            .expect("extension preserved");
        assert!(Uuid::parse_str(stem).is_ok());
    }

    #[rstest]
    #[case("uploads/recipe/x.jpg", true)]
    #[case("uploads/recipe/", false)]
    #[case("uploads/recipe/../x.jpg", false)]
    #[case("elsewhere/x.jpg", false)]
    fn stored_paths_must_stay_in_upload_dir(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(RecipeImagePath::new(raw).is_ok(), ok);
    }
}
