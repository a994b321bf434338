use sha2::{Digest, Sha256};

/// Derive the cache key for a canonical origin URL: the lowercase hex
/// SHA-256 of the URL bytes. Doubles as the mirror's directory name and
/// the value stored in the directory index.
pub fn derive(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        // Standard SHA-256 test vectors.
        assert_eq!(
            derive(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            derive("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_deterministic() {
        let url = "https://example.com/repo.git";
        assert_eq!(derive(url), derive(url));
    }

    #[test]
    fn test_distinct_urls_distinct_keys() {
        let a = derive("https://example.com/repo.git");
        let b = derive("https://example.com/repo");
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_shape() {
        let key = derive("git@github.com:user/repo.git");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
