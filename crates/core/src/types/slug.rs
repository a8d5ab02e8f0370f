//! URL slugs for products.

use core::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input is empty.
    #[error("slug cannot be empty")]
    Empty,
    /// The input exceeds the `products.slug` column width.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[A-Za-z0-9_-]`.
    #[error("slug contains invalid character {0:?}")]
    InvalidChar(char),
}

/// A product slug: letters, digits, hyphens and underscores only.
///
/// ```
/// use storefront_core::Slug;
///
/// assert!(Slug::parse("blue-t-shirt").is_ok());
/// assert!(Slug::parse("blue t-shirt").is_err());
/// assert_eq!(Slug::from_title("Blue T-Shirt (XL)").as_str(), "blue-t-shirt-xl");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Column width of `products.slug`.
    pub const MAX_LENGTH: usize = 50;

    /// Parse a `Slug`, rejecting anything the slug column would not accept.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than
    /// [`Self::MAX_LENGTH`], or contains a character other than an ASCII
    /// letter, digit, `-` or `_`.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }
        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(SlugError::InvalidChar(c));
        }
        // ASCII only from here, so bytes and characters agree.
        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Derive a slug from a product title.
    ///
    /// Accented letters are decomposed (NFKD) and lose their marks, so
    /// `"Crème"` becomes `"creme"`. ASCII letters and digits are lowercased,
    /// every other run of characters becomes a single hyphen, and the result
    /// is truncated to the column width. A title with no usable characters
    /// yields `"product"`.
    #[must_use]
    pub fn from_title(title: &str) -> Self {
        let mut slug = String::with_capacity(title.len().min(Self::MAX_LENGTH));
        let mut pending_hyphen = false;

        for c in title.nfkd() {
            if unicode_normalization::char::is_combining_mark(c) {
                continue;
            }
            if c.is_ascii_alphanumeric() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(c.to_ascii_lowercase());
            } else {
                pending_hyphen = true;
            }
            if slug.len() >= Self::MAX_LENGTH {
                break;
            }
        }

        slug.truncate(Self::MAX_LENGTH);
        while slug.ends_with('-') {
            slug.pop();
        }

        if slug.is_empty() {
            return Self("product".to_owned());
        }
        Self(slug)
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pg_text!(Slug, Slug::parse);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_slug_charset() {
        assert!(Slug::parse("abc").is_ok());
        assert!(Slug::parse("Mixed_Case-123").is_ok());
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert_eq!(Slug::parse(""), Err(SlugError::Empty));
        assert_eq!(Slug::parse("a/b"), Err(SlugError::InvalidChar('/')));
        assert_eq!(
            Slug::parse(&"a".repeat(51)),
            Err(SlugError::TooLong { max: 50 })
        );
    }

    #[test]
    fn test_from_title_collapses_separators() {
        assert_eq!(Slug::from_title("  Hello,   World!  ").as_str(), "hello-world");
    }

    #[test]
    fn test_from_title_folds_accents() {
        assert_eq!(Slug::from_title("Café Crème").as_str(), "cafe-creme");
        assert_eq!(Slug::from_title("Jalapeño ﬁesta").as_str(), "jalapeno-fiesta");
        assert_eq!(Slug::from_title("日本茶").as_str(), "product");
    }

    #[test]
    fn test_parse_reports_invalid_char_before_length() {
        assert_eq!(
            Slug::parse(&"é".repeat(30)),
            Err(SlugError::InvalidChar('é'))
        );
        assert!(Slug::parse(&"a".repeat(Slug::MAX_LENGTH)).is_ok());
    }

    #[test]
    fn test_from_title_fallback() {
        assert_eq!(Slug::from_title("!!!").as_str(), "product");
    }

    #[test]
    fn test_from_title_respects_max_length() {
        let slug = Slug::from_title(&"word ".repeat(40));
        assert!(slug.as_str().len() <= Slug::MAX_LENGTH);
        assert!(!slug.as_str().ends_with('-'));
        assert!(Slug::parse(slug.as_str()).is_ok());
    }
}
