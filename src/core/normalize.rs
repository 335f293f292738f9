use std::borrow::Cow;
use std::fmt::Debug;

/// Key comparison strategy consulted by every lookup in an `OrderedMultiMap`.
pub trait KeyNormalizer: Debug + Default + Clone {
    fn normalize<'a>(&self, key: &'a str) -> Cow<'a, str>;
}

/// Keys compare byte for byte.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Identity;

impl KeyNormalizer for Identity {
    fn normalize<'a>(&self, key: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(key)
    }
}

/// Keys compare after lower-casing. Stored casing is kept.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CaseFold;

impl KeyNormalizer for CaseFold {
    fn normalize<'a>(&self, key: &'a str) -> Cow<'a, str> {
        if key.chars().any(|c| c.to_lowercase().ne(std::iter::once(c))) {
            Cow::Owned(key.to_lowercase())
        } else {
            Cow::Borrowed(key)
        }
    }
}
