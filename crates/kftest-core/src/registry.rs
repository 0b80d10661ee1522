//! Test registry: the fixed, ordered set of test executables.

use crate::error::{HarnessError, HarnessResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::PathBuf;

/// Builtin knifefish unit tests, in execution order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinTest {
    /// Pseudo-Hadamard transform
    Pht,

    /// S-box initialisation
    Sbox,

    /// P-box initialisation
    Pbox,

    /// Passphrase key expansion
    ExpandPassphrase,

    /// Context inversion for decryption
    InvertCtx,

    /// Single block encryption
    Block,

    /// CBC-mode file encryption
    EncryptFileCbc,
}

impl BuiltinTest {
    /// All builtin tests in registry order.
    pub const ALL: [BuiltinTest; 7] = [
        BuiltinTest::Pht,
        BuiltinTest::Sbox,
        BuiltinTest::Pbox,
        BuiltinTest::ExpandPassphrase,
        BuiltinTest::InvertCtx,
        BuiltinTest::Block,
        BuiltinTest::EncryptFileCbc,
    ];

    /// Get the test name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinTest::Pht => "pht",
            BuiltinTest::Sbox => "sbox",
            BuiltinTest::Pbox => "pbox",
            BuiltinTest::ExpandPassphrase => "expand_passphrase",
            BuiltinTest::InvertCtx => "invert_ctx",
            BuiltinTest::Block => "block",
            BuiltinTest::EncryptFileCbc => "encrypt_file_cbc",
        }
    }

    /// Executable path relative to the test directory.
    pub fn path(&self) -> &'static str {
        match self {
            BuiltinTest::Pht => "pht/test_pht",
            BuiltinTest::Sbox => "sbox/test_sbox",
            BuiltinTest::Pbox => "pbox/test_pbox",
            BuiltinTest::ExpandPassphrase => "expand_passphrase/test_expand_passphrase",
            BuiltinTest::InvertCtx => "invert_ctx/test_invert_ctx",
            BuiltinTest::Block => "block/test_block",
            BuiltinTest::EncryptFileCbc => "encrypt_file_cbc/test_encrypt_file_cbc",
        }
    }
}

/// A named reference to one test executable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestEntry {
    /// Unique human-readable name.
    pub name: String,

    /// Path relative to the test directory.
    pub path: PathBuf,
}

impl TestEntry {
    /// Create a test entry.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl From<BuiltinTest> for TestEntry {
    fn from(test: BuiltinTest) -> Self {
        TestEntry::new(test.name(), test.path())
    }
}

/// Ordered, read-only registry of test entries.
///
/// Iteration order is insertion order; it defines both execution order and
/// report order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    entries: Vec<TestEntry>,
}

impl Registry {
    /// Build a registry from explicit entries, rejecting duplicate names.
    pub fn new(entries: Vec<TestEntry>) -> HarnessResult<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(HarnessError::DuplicateTest(entry.name.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// The builtin knifefish registry.
    pub fn builtin() -> Self {
        Self {
            entries: BuiltinTest::ALL.into_iter().map(TestEntry::from).collect(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Test names in registry order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&TestEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Deterministic SHA-256 digest of the ordered `(name, path)` pairs.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for entry in &self.entries {
            hasher.update(entry.name.as_bytes());
            hasher.update(b"\0");
            hasher.update(entry.path.to_string_lossy().as_bytes());
            hasher.update(b"\0");
        }
        hex::encode(hasher.finalize())
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a TestEntry;
    type IntoIter = std::slice::Iter<'a, TestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_in_order() {
        let registry = Registry::builtin();
        assert_eq!(
            registry.names(),
            vec![
                "pht",
                "sbox",
                "pbox",
                "expand_passphrase",
                "invert_ctx",
                "block",
                "encrypt_file_cbc"
            ]
        );
    }

    #[test]
    fn test_builtin_paths() {
        let registry = Registry::builtin();
        let entry = registry.get("expand_passphrase").expect("missing entry");
        assert_eq!(
            entry.path,
            PathBuf::from("expand_passphrase/test_expand_passphrase")
        );
        assert_eq!(BuiltinTest::Block.path(), "block/test_block");
    }

    #[test]
    fn test_builtin_names_are_unique() {
        let entries: Vec<TestEntry> = BuiltinTest::ALL.into_iter().map(TestEntry::from).collect();
        assert!(Registry::new(entries).is_ok());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = Registry::new(vec![
            TestEntry::new("a", "a/test_a"),
            TestEntry::new("b", "b/test_b"),
            TestEntry::new("a", "other/test_a"),
        ]);
        match result {
            Err(HarnessError::DuplicateTest(name)) => assert_eq!(name, "a"),
            other => panic!("expected duplicate error, got {:?}", other),
        }
    }

    #[test]
    fn test_get_unknown_is_none() {
        assert!(Registry::builtin().get("nope").is_none());
    }

    #[test]
    fn test_digest_deterministic() {
        assert_eq!(Registry::builtin().digest(), Registry::builtin().digest());
    }

    #[test]
    fn test_digest_order_sensitive() {
        let ab = Registry::new(vec![TestEntry::new("a", "a"), TestEntry::new("b", "b")]).unwrap();
        let ba = Registry::new(vec![TestEntry::new("b", "b"), TestEntry::new("a", "a")]).unwrap();
        assert_ne!(ab.digest(), ba.digest());
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::new(Vec::new()).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }
}
