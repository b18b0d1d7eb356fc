use blake3::Hasher;

/// Cache key for an embedding request: operation name, model, dimension and text.
#[inline]
pub fn hash_embedding_request(model: &str, dim: usize, text: &str) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(b"embed");
    hasher.update(b"|");
    hasher.update(model.as_bytes());
    hasher.update(b"|");
    hasher.update(&(dim as u64).to_le_bytes());
    hasher.update(b"|");
    hasher.update(text.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Lower-cases and collapses whitespace so cosmetic differences do not defeat dedup.
pub fn normalize_content(content: &str) -> String {
    content
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Dedup key for a passage: BLAKE3 over its normalized text.
#[inline]
pub fn hash_content(content: &str) -> [u8; 32] {
    *blake3::hash(normalize_content(content).as_bytes()).as_bytes()
}

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// Used to derive deterministic seeds (e.g. for stub embeddings); not for dedup.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_key_determinism() {
        let a = hash_embedding_request("text-embedding-3-small", 512, "CAS interview");
        let b = hash_embedding_request("text-embedding-3-small", 512, "CAS interview");
        assert_eq!(a, b);
    }

    #[test]
    fn test_embedding_key_depends_on_parameters() {
        let base = hash_embedding_request("m", 512, "query");
        assert_ne!(base, hash_embedding_request("m", 256, "query"));
        assert_ne!(base, hash_embedding_request("other", 512, "query"));
        assert_ne!(base, hash_embedding_request("m", 512, "query "));
    }

    #[test]
    fn test_normalize_content() {
        assert_eq!(
            normalize_content("  The CAS\n  Interview   Process "),
            "the cas interview process"
        );
        assert_eq!(normalize_content(""), "");
    }

    #[test]
    fn test_content_hash_ignores_case_and_spacing() {
        assert_eq!(
            hash_content("Tuition fees are due in September."),
            hash_content("tuition  fees are due\tin september.")
        );
        assert_ne!(
            hash_content("Tuition fees are due in September."),
            hash_content("Tuition fees are due in October.")
        );
    }

    #[test]
    fn test_hash_to_u64_distribution() {
        let a = hash_to_u64(b"alpha");
        let b = hash_to_u64(b"beta");
        assert_ne!(a, b);
        assert_eq!(a, hash_to_u64(b"alpha"));
    }
}
