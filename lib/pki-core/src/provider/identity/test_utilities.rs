use ct_codecs::{Base64UrlSafeNoPadding, Encoder};
use serde_json::{Value, json};

/// Unsigned compact JWT carrying `claims`
pub(crate) fn jwt(claims: Value) -> String {
    let encode = |value: &Value| {
        Base64UrlSafeNoPadding::encode_to_string(value.to_string().as_bytes()).unwrap()
    };

    format!(
        "{}.{}.signature",
        encode(&json!({ "alg": "RS256", "typ": "JWT" })),
        encode(&claims)
    )
}
