use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::sitewise::{BATCH_PUT_PATH, SITEWISE_SERVICE_NAME, SiteWiseEndpoint};

pub type Headers = Vec<(String, String)>;

pub const JSON_CONTENT_TYPE: &str = "application/json";

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SIGNED_HEADERS: &str = "content-type;host;x-amz-date";

type HmacSha256 = Hmac<Sha256>;

/// Produces the authentication headers for a request body.
pub trait Signer {
    fn sign(&self, payload: &[u8], timestamp: DateTime<Utc>) -> Result<Headers>;
}

#[derive(Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// AWS Signature Version 4 for `POST /properties` on the SiteWise data plane.
// Ref: https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    credentials: Credentials,
    endpoint: SiteWiseEndpoint,
}

impl SigV4Signer {
    pub fn new(credentials: Credentials, endpoint: SiteWiseEndpoint) -> Self {
        Self {
            credentials,
            endpoint,
        }
    }

    fn canonical_request(&self, payload: &[u8], amz_date: &str) -> String {
        let canonical_headers = format!(
            "content-type:{JSON_CONTENT_TYPE}\nhost:{}\nx-amz-date:{amz_date}\n",
            self.endpoint.host()
        );

        format!(
            "POST\n{BATCH_PUT_PATH}\n\n{canonical_headers}\n{SIGNED_HEADERS}\n{}",
            hex::encode(Sha256::digest(payload))
        )
    }

    fn signing_key(&self, date_stamp: &str) -> Result<Vec<u8>> {
        let secret = format!("AWS4{}", self.credentials.secret_access_key);
        let k_date = hmac_sha256(secret.as_bytes(), date_stamp.as_bytes())?;
        let k_region = hmac_sha256(&k_date, self.endpoint.region().as_bytes())?;
        let k_service = hmac_sha256(&k_region, SITEWISE_SERVICE_NAME.as_bytes())?;
        hmac_sha256(&k_service, b"aws4_request")
    }
}

impl Signer for SigV4Signer {
    fn sign(&self, payload: &[u8], timestamp: DateTime<Utc>) -> Result<Headers> {
        let amz_date = timestamp.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = timestamp.format("%Y%m%d").to_string();

        let credential_scope = format!(
            "{date_stamp}/{}/{SITEWISE_SERVICE_NAME}/aws4_request",
            self.endpoint.region()
        );
        let canonical_request = self.canonical_request(payload, &amz_date);
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{credential_scope}\n{}",
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signing_key = self.signing_key(&date_stamp)?;
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);

        let authorization = format!(
            "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
            self.credentials.access_key_id
        );

        Ok(vec![
            ("Authorization".to_string(), authorization),
            ("X-Amz-Date".to_string(), amz_date),
        ])
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|_| anyhow!("invalid HMAC key length"))?;
    mac.update(data);

    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn signer() -> SigV4Signer {
        SigV4Signer::new(
            Credentials {
                access_key_id: "AKIDEXAMPLE".to_string(),
                secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
            },
            SiteWiseEndpoint::new("us-east-1"),
        )
    }

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 5).unwrap()
    }

    fn header<'a>(headers: &'a Headers, name: &str) -> &'a str {
        headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn emits_authorization_and_date() {
        let headers = signer().sign(b"{}", timestamp()).unwrap();

        assert_eq!(header(&headers, "X-Amz-Date"), "20261019T083005Z");

        let authorization = header(&headers, "Authorization");
        let prefix = "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20261019/us-east-1/iotsitewise/aws4_request, SignedHeaders=content-type;host;x-amz-date, Signature=";
        assert!(authorization.starts_with(prefix), "{authorization}");

        let signature = &authorization[prefix.len()..];
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_depends_on_payload_and_time() {
        let s = signer();
        let a = s.sign(b"{\"entries\":[]}", timestamp()).unwrap();
        let b = s.sign(b"{\"entries\":[]}", timestamp()).unwrap();
        let c = s.sign(b"{\"entries\":[{}]}", timestamp()).unwrap();
        let d = s
            .sign(b"{\"entries\":[]}", timestamp() + chrono::TimeDelta::seconds(1))
            .unwrap();

        assert_eq!(a, b);
        assert_ne!(header(&a, "Authorization"), header(&c, "Authorization"));
        assert_ne!(header(&a, "Authorization"), header(&d, "Authorization"));
    }

    #[test]
    fn canonical_request_hashes_payload() {
        let request = signer().canonical_request(b"", "20261019T083005Z");

        assert_eq!(
            request,
            "POST\n/properties\n\ncontent-type:application/json\nhost:data.iotsitewise.us-east-1.amazonaws.com\nx-amz-date:20261019T083005Z\n\ncontent-type;host;x-amz-date\ne3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn debug_redacts_secret() {
        let debug = format!("{:?}", signer());
        assert!(!debug.contains("wJalrXUtnFEMI"));
    }
}
