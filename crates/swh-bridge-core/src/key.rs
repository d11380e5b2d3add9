use std::fmt::Display;

use ipld_core::cid::multihash::Multihash;
use multibase::Base;

/// A flat datastore key, such as `/CIQ...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    /// Creates a key, adding the leading `/` if missing.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();

        if key.starts_with('/') {
            Self(key)
        } else {
            Self(format!("/{}", key))
        }
    }

    /// The key a host stores a block's multihash under.
    pub fn from_multihash(multihash: &Multihash<64>) -> Self {
        Self(format!("/{}", Base::Base32Upper.encode(multihash.to_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The key without its leading `/`.
    pub fn name(&self) -> &str {
        &self.0[1..]
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_slash() {
        assert_eq!(Key::new("ABC").as_str(), "/ABC");
        assert_eq!(Key::new("/ABC").as_str(), "/ABC");
        assert_eq!(Key::new("/ABC").name(), "ABC");
        assert_eq!(Key::new("").name(), "");
    }
}
