pub const SITEWISE_SERVICE_NAME: &str = "iotsitewise";

pub const BATCH_PUT_PATH: &str = "/properties";

/// The regional SiteWise data-plane endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteWiseEndpoint {
    region: String,
}

impl SiteWiseEndpoint {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn host(&self) -> String {
        format!("data.{SITEWISE_SERVICE_NAME}.{}.amazonaws.com", self.region)
    }

    pub fn batch_put_url(&self) -> String {
        format!("https://{}{BATCH_PUT_PATH}", self.host())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_regional_url() {
        let endpoint = SiteWiseEndpoint::new("ap-northeast-1");

        assert_eq!(endpoint.host(), "data.iotsitewise.ap-northeast-1.amazonaws.com");
        assert_eq!(
            endpoint.batch_put_url(),
            "https://data.iotsitewise.ap-northeast-1.amazonaws.com/properties"
        );
    }
}
