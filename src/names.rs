use sha2::{Digest, Sha256};

const UNIQUE_NAME_PREFIX_LEN: usize = 20;
const UNIQUE_NAME_HASH_LEN: usize = 8;

pub fn sanitize_alpha_num(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

pub fn sanitize_alpha_num_lower_case(name: &str) -> String {
    sanitize_alpha_num(name).to_ascii_lowercase()
}

/// Derives a DNS-label friendly name that is stable for a given application
/// name: a truncated lowercase prefix plus a short digest of the raw name.
pub fn create_unique_name(name: &str) -> String {
    let prefix: String = sanitize_alpha_num_lower_case(name)
        .chars()
        .take(UNIQUE_NAME_PREFIX_LEN)
        .collect();
    let digest = hex::encode(Sha256::digest(name.as_bytes()));
    let hash = &digest[..UNIQUE_NAME_HASH_LEN];

    if prefix.is_empty() {
        hash.to_string()
    } else {
        format!("{}-{}", prefix, hash)
    }
}
