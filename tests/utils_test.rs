use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use spotify_mcp::utils::*;

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    // Should not be empty
    assert!(!challenge.is_empty());

    // Should be deterministic - same input produces same output
    let challenge2 = generate_code_challenge(verifier);
    assert_eq!(challenge, challenge2);

    // Different input should produce different output
    let challenge3 = generate_code_challenge("different_verifier");
    assert_ne!(challenge, challenge3);

    // Should be base64-encoded (URL-safe, no padding)
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );

    // SHA-256 digest is 32 bytes
    assert_eq!(URL_SAFE_NO_PAD.decode(&challenge).unwrap().len(), 32);
}

#[test]
fn test_code_challenge_rfc7636_vector() {
    // Appendix B of RFC 7636
    let challenge = generate_code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
    assert_eq!(challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
}

#[test]
fn test_track_uri() {
    assert_eq!(track_uri("4uLU6hMCjMI75M1A2tKUQC"), "spotify:track:4uLU6hMCjMI75M1A2tKUQC");

    // URIs are passed through unchanged
    assert_eq!(track_uri("spotify:track:abc"), "spotify:track:abc");
    assert_eq!(track_uri("spotify:episode:xyz"), "spotify:episode:xyz");
}

#[test]
fn test_search_query_filters() {
    let query = SearchQuery::new("love")
        .artist("Queen")
        .year_range(1975, 1980)
        .build();
    assert_eq!(query, "love artist:Queen year:1975-1980");

    let query = SearchQuery::new("")
        .track("Bohemian Rhapsody")
        .album("A Night at the Opera")
        .year(1975)
        .genre("rock")
        .build();
    assert_eq!(
        query,
        "track:Bohemian Rhapsody album:A Night at the Opera year:1975 genre:rock"
    );
}

#[test]
fn test_search_query_tags() {
    assert_eq!(SearchQuery::new("jazz").hipster().build(), "jazz tag:hipster");
    assert_eq!(SearchQuery::new("  ").new_releases().build(), "tag:new");
}

#[test]
fn test_search_query_base_only() {
    assert_eq!(SearchQuery::new(" daft punk ").build(), "daft punk");
    assert_eq!(SearchQuery::default().build(), "");
}
