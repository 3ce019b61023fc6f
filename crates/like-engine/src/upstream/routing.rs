//! Region to endpoint routing.

/// Path of the mutating like call.
pub const LIKE_PATH: &str = "/LikeProfile";

/// Path of the read-only snapshot call.
pub const SNAPSHOT_PATH: &str = "/GetPlayerPersonalShow";

/// Region codes served by the US-family endpoint.
const US_FAMILY_REGIONS: [&str; 4] = ["BR", "US", "SAC", "NA"];

/// Which endpoint a region code routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionRoute {
    Ind,
    UsFamily,
    Default,
}

impl RegionRoute {
    pub fn for_region(region: &str) -> Self {
        if region == "IND" {
            RegionRoute::Ind
        } else if US_FAMILY_REGIONS.contains(&region) {
            RegionRoute::UsFamily
        } else {
            RegionRoute::Default
        }
    }
}

/// Base URLs of the three regional endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub ind: String,
    pub us_family: String,
    pub default: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            ind: "https://client.ind.freefiremobile.com".to_string(),
            us_family: "https://client.us.freefiremobile.com".to_string(),
            default: "https://clientbp.ggblueshark.com".to_string(),
        }
    }
}

impl Endpoints {
    /// Point all three routes at one base URL.
    pub fn uniform(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            ind: base.clone(),
            us_family: base.clone(),
            default: base,
        }
    }

    pub fn base_for(&self, region: &str) -> &str {
        match RegionRoute::for_region(region) {
            RegionRoute::Ind => &self.ind,
            RegionRoute::UsFamily => &self.us_family,
            RegionRoute::Default => &self.default,
        }
    }

    pub fn like_url(&self, region: &str) -> String {
        format!("{}{}", self.base_for(region).trim_end_matches('/'), LIKE_PATH)
    }

    pub fn snapshot_url(&self, region: &str) -> String {
        format!(
            "{}{}",
            self.base_for(region).trim_end_matches('/'),
            SNAPSHOT_PATH
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_routes() {
        assert_eq!(RegionRoute::for_region("IND"), RegionRoute::Ind);
        for region in ["BR", "US", "SAC", "NA"] {
            assert_eq!(RegionRoute::for_region(region), RegionRoute::UsFamily);
        }
        for region in ["XX", "SG", "VN", "ind", ""] {
            assert_eq!(RegionRoute::for_region(region), RegionRoute::Default);
        }
    }

    #[test]
    fn test_urls_for_both_call_kinds() {
        let endpoints = Endpoints::default();

        assert_eq!(
            endpoints.snapshot_url("IND"),
            "https://client.ind.freefiremobile.com/GetPlayerPersonalShow"
        );
        assert_eq!(
            endpoints.like_url("IND"),
            "https://client.ind.freefiremobile.com/LikeProfile"
        );

        assert_eq!(
            endpoints.snapshot_url("BR"),
            "https://client.us.freefiremobile.com/GetPlayerPersonalShow"
        );
        assert_eq!(
            endpoints.like_url("BR"),
            "https://client.us.freefiremobile.com/LikeProfile"
        );

        assert_eq!(
            endpoints.snapshot_url("XX"),
            "https://clientbp.ggblueshark.com/GetPlayerPersonalShow"
        );
        assert_eq!(
            endpoints.like_url("XX"),
            "https://clientbp.ggblueshark.com/LikeProfile"
        );
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        let endpoints = Endpoints::uniform("http://127.0.0.1:9000/");
        assert_eq!(endpoints.like_url("SG"), "http://127.0.0.1:9000/LikeProfile");
    }
}
