use serde::{Deserialize, Deserializer};

/// A field of a partial-update payload.
///
/// `Absent` is the `#[serde(default)]` value, so a key missing from the JSON
/// object stays distinguishable from one sent as `null`:
///
/// ```ignore
/// #[derive(Deserialize)]
/// struct Patch {
///     #[serde(default)]
///     name: Sparse<String>,
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Sparse<T> {
    #[default]
    Absent,
    Null,
    Present(T),
}

impl<T> Sparse<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Sparse::Absent)
    }

    /// Collapses the field for a column that cannot hold `NULL`: `Absent`
    /// becomes `None`, `Present(v)` becomes `Some(v)` and `Null` is handed to
    /// `on_null` to produce an error.
    pub fn required<E>(self, on_null: impl FnOnce() -> E) -> Result<Option<T>, E> {
        match self {
            Sparse::Absent => Ok(None),
            Sparse::Null => Err(on_null()),
            Sparse::Present(value) => Ok(Some(value)),
        }
    }
}

impl<'de, T> Deserialize<'de> for Sparse<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // only reached when the key is present
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Sparse::Present(value),
            None => Sparse::Null,
        })
    }
}
