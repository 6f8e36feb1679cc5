pub mod extractor;

pub use extractor::BuyerToken;

use uuid::Uuid;

/// Header carrying the anonymous buyer token
pub const BUYER_TOKEN_HEADER: &str = "x-buyer-token";

/// Mint a fresh opaque buyer token
///
/// Tokens are assigned on the first basket write and carry no identity
/// beyond pointing at a basket row.
pub fn issue_token() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_tokens_are_unique() {
        assert_ne!(issue_token(), issue_token());
    }
}
