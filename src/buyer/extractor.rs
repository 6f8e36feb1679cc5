// Buyer token extractor for basket routes

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

use crate::buyer::BUYER_TOKEN_HEADER;

/// Optional buyer token taken from the request headers
///
/// A missing token is not an error: it means the buyer has no basket yet,
/// and one will be created (with a fresh token) on the first write.
#[derive(Debug, Clone)]
pub struct BuyerToken(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for BuyerToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(BUYER_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        Ok(BuyerToken(token))
    }
}
