use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::collections::BTreeMap;

type HmacSha1 = Hmac<Sha1>;

/// The carrier signs the url followed by every form key and value, sorted by key
fn signed_mac(auth_token: &str, url: &str, params: &BTreeMap<String, String>) -> Option<HmacSha1> {
    let mut string_to_sign = url.to_string();
    for (key, value) in params {
        string_to_sign.push_str(key);
        string_to_sign.push_str(value);
    }

    let mut mac = HmacSha1::new_from_slice(auth_token.as_bytes()).ok()?;
    mac.update(string_to_sign.as_bytes());
    Some(mac)
}

/// Base64 encoded HMAC-SHA1 signature of a callback, as sent in the `X-Twilio-Signature` header
pub fn compute(auth_token: &str, url: &str, params: &BTreeMap<String, String>) -> Option<String> {
    signed_mac(auth_token, url, params).map(|mac| BASE64.encode(mac.finalize().into_bytes()))
}

pub fn verify(
    auth_token: &str,
    url: &str,
    params: &BTreeMap<String, String>,
    signature: &str,
) -> bool {
    let signature = match BASE64.decode(signature.trim()) {
        Ok(signature) => signature,
        Err(_) => return false,
    };
    match signed_mac(auth_token, url, params) {
        Some(mac) => mac.verify_slice(&signature).is_ok(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("MessageStatus".to_string(), "delivered".to_string());
        params.insert("MessageSid".to_string(), "SM123".to_string());
        params
    }

    #[test]
    fn it_verifies_its_own_signatures() {
        let url = "https://example.com/api/v1/webhooks/carrier/status";
        let signature = compute("token", url, &params()).unwrap();
        assert!(verify("token", url, &params(), &signature));
    }

    #[test]
    fn it_rejects_tampered_requests() {
        let url = "https://example.com/api/v1/webhooks/carrier/status";
        let signature = compute("token", url, &params()).unwrap();

        assert!(!verify("other-token", url, &params(), &signature));
        assert!(!verify("token", "https://evil.com", &params(), &signature));

        let mut tampered = params();
        tampered.insert("MessageStatus".to_string(), "failed".to_string());
        assert!(!verify("token", url, &tampered, &signature));

        assert!(!verify("token", url, &params(), "not base64 !"));
    }

    #[test]
    fn it_signs_the_sorted_parameters() {
        // Same parameters inserted in another order give the same signature
        let mut reordered = BTreeMap::new();
        reordered.insert("MessageSid".to_string(), "SM123".to_string());
        reordered.insert("MessageStatus".to_string(), "delivered".to_string());
        assert_eq!(
            compute("token", "https://a.b", &params()),
            compute("token", "https://a.b", &reordered)
        );
    }
}
