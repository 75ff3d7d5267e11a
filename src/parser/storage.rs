//! Storage for the parser to expand macros call into.

/// This storage is used by the parser to store text that is generated while parsing: the
/// expansion of user-defined macros, and the source of constructs that handlers build before
/// parsing them (column templates, matrices built by macros).
///
/// [`Storage`] needs to exist because Rust does not allow self-referencial types. Everything the
/// parser reads borrows either from the input or from this storage.
#[derive(Default)]
pub struct Storage(pub(super) bumpalo::Bump);

impl Storage {
    /// Create a new storage for the parser.
    pub fn new() -> Self {
        Default::default()
    }

    /// Reset the storage's memory.
    ///
    /// It is recommended to call this method after each parsing operation to free up memory. This
    /// is more efficient than dropping the storage and creating a new one.
    pub fn reset(&mut self) {
        self.0.reset();
    }

    /// Copy the concatenation of `parts` into the storage.
    pub(crate) fn concat(&self, parts: &[&str]) -> &str {
        let capacity = parts.iter().map(|part| part.len()).sum();
        let mut string = bumpalo::collections::String::with_capacity_in(capacity, &self.0);
        for part in parts {
            string.push_str(part);
        }
        string.into_bump_str()
    }
}

#[cfg(test)]
mod tests {
    use super::Storage;

    #[test]
    fn concat() {
        let mut storage = Storage::new();
        assert_eq!(storage.concat(&["\\begin{", "pmatrix", "}"]), "\\begin{pmatrix}");
        assert_eq!(storage.concat(&[]), "");
        storage.reset();
    }
}
