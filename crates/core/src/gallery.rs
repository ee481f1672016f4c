//! Carousel cursor over a project's images.

use crate::error::CoreError;
use crate::project::Project;

/// Placeholder images shown for a project that has none of its own.
pub const FALLBACK_IMAGES: [&str; 3] = [
    "https://images.unsplash.com/photo-1541976844346-f18aeac57b06?w=800",
    "https://images.unsplash.com/photo-1503387762-592deb58ef4e?w=800",
    "https://images.unsplash.com/photo-1590496793907-3802b8db1d26?w=800",
];

/// Cyclic cursor over an ordered, never-empty image list.
///
/// An empty list is replaced by [`FALLBACK_IMAGES`], so `len() >= 1` holds
/// for the whole life of the cursor and `index()` is always in range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryCursor {
    images: Vec<String>,
    index: usize,
    fallback: bool,
}

impl GalleryCursor {
    pub fn new(images: Vec<String>) -> Self {
        if images.is_empty() {
            Self {
                images: FALLBACK_IMAGES.iter().map(|s| s.to_string()).collect(),
                index: 0,
                fallback: true,
            }
        } else {
            Self {
                images,
                index: 0,
                fallback: false,
            }
        }
    }

    /// A fresh cursor at index 0 for `project`.
    pub fn for_project(project: &Project) -> Self {
        Self::new(project.images.clone())
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether placeholder images were substituted.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Prev/next controls are only meaningful with more than one image.
    pub fn has_navigation(&self) -> bool {
        self.images.len() > 1
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn current(&self) -> &str {
        &self.images[self.index]
    }

    pub fn next(&mut self) -> usize {
        self.index = (self.index + 1) % self.len();
        self.index
    }

    pub fn prev(&mut self) -> usize {
        self.index = (self.index + self.len() - 1) % self.len();
        self.index
    }

    pub fn jump_to(&mut self, index: usize) -> Result<usize, CoreError> {
        if index >= self.len() {
            return Err(CoreError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        self.index = index;
        Ok(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn images(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("img-{i}.jpg")).collect()
    }

    #[test]
    fn empty_list_uses_fallback() {
        let cursor = GalleryCursor::new(Vec::new());
        assert!(cursor.is_fallback());
        assert_eq!(cursor.len(), FALLBACK_IMAGES.len());
        assert_eq!(cursor.current(), FALLBACK_IMAGES[0]);
    }

    #[test]
    fn next_wraps_around() {
        let mut cursor = GalleryCursor::new(images(3));
        assert_eq!(cursor.next(), 1);
        assert_eq!(cursor.next(), 2);
        assert_eq!(cursor.next(), 0);
    }

    #[test]
    fn prev_wraps_around() {
        let mut cursor = GalleryCursor::new(images(3));
        assert_eq!(cursor.prev(), 2);
        assert_eq!(cursor.current(), "img-2.jpg");
    }

    #[test]
    fn next_and_prev_are_inverses() {
        for len in 1..6 {
            for start in 0..len {
                let mut cursor = GalleryCursor::new(images(len));
                cursor.jump_to(start).unwrap();
                cursor.next();
                assert_eq!(cursor.prev(), start);
                cursor.prev();
                assert_eq!(cursor.next(), start);
            }
        }
    }

    #[test]
    fn single_image_stays_put() {
        let mut cursor = GalleryCursor::new(images(1));
        assert!(!cursor.has_navigation());
        assert_eq!(cursor.next(), 0);
        assert_eq!(cursor.prev(), 0);
    }

    #[test]
    fn jump_out_of_range_keeps_index() {
        let mut cursor = GalleryCursor::new(images(2));
        cursor.next();
        assert_matches!(
            cursor.jump_to(2),
            Err(CoreError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(cursor.index(), 1);
    }

    #[test]
    fn each_project_starts_at_zero() {
        let project = Project {
            id: "p".into(),
            title: "t".into(),
            description: String::new(),
            order: 0,
            images: images(4),
        };
        let mut first = GalleryCursor::for_project(&project);
        first.next();
        let second = GalleryCursor::for_project(&project);
        assert_eq!(second.index(), 0);
        assert!(second.has_navigation());
    }
}
