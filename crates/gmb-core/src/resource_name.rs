//! Parsing of review resource names into account and location ids.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceNameError {
    #[error("review has no resource name")]
    Missing,

    #[error("resource name \"{name}\": {reason}")]
    Malformed { name: String, reason: String },
}

/// Account and location ids extracted from a review's resource name.
///
/// The location-scoped form is `accounts/{account}/locations/{location}`;
/// the review-scoped form the API returns,
/// `accounts/{account}/locations/{location}/reviews/{review}`, is accepted
/// too. Account id is always segment 1 and location id segment 3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceName {
    pub account_id: String,
    pub location_id: String,
}

impl ResourceName {
    /// Parse a resource name.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceNameError::Missing`] for an empty name and
    /// [`ResourceNameError::Malformed`] when the segment count is wrong or
    /// either id segment is empty.
    pub fn parse(name: &str) -> Result<Self, ResourceNameError> {
        if name.trim().is_empty() {
            return Err(ResourceNameError::Missing);
        }

        let malformed = |reason: &str| ResourceNameError::Malformed {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let segments: Vec<&str> = name.split('/').collect();
        match segments.len() {
            4 => {}
            6 if segments[4] == "reviews" => {}
            n => return Err(malformed(&format!("expected 4 segments, found {n}"))),
        }

        let account_id = segments[1];
        let location_id = segments[3];
        if account_id.is_empty() {
            return Err(malformed("account id segment is empty"));
        }
        if location_id.is_empty() {
            return Err(malformed("location id segment is empty"));
        }

        Ok(Self {
            account_id: account_id.to_string(),
            location_id: location_id.to_string(),
        })
    }
}

impl std::str::FromStr for ResourceName {
    type Err = ResourceNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_location_scoped_name() {
        let parsed = ResourceName::parse("accounts/A1/locations/L1").unwrap();
        assert_eq!(parsed.account_id, "A1");
        assert_eq!(parsed.location_id, "L1");
    }

    #[test]
    fn parses_review_scoped_name() {
        let parsed: ResourceName = "accounts/A1/locations/L1/reviews/R9".parse().unwrap();
        assert_eq!(parsed.account_id, "A1");
        assert_eq!(parsed.location_id, "L1");
    }

    #[test]
    fn rejects_fewer_than_four_segments() {
        let err = ResourceName::parse("accounts/A1/locations").unwrap_err();
        assert!(matches!(err, ResourceNameError::Malformed { .. }));
    }

    #[test]
    fn rejects_five_segments() {
        let err = ResourceName::parse("accounts/A1/locations/L1/x").unwrap_err();
        assert!(matches!(err, ResourceNameError::Malformed { .. }));
    }

    #[test]
    fn rejects_six_segments_that_are_not_a_review_path() {
        let err = ResourceName::parse("accounts/A1/locations/L1/media/M1").unwrap_err();
        assert!(matches!(err, ResourceNameError::Malformed { .. }));
    }

    #[test]
    fn rejects_empty_id_segments() {
        assert!(ResourceName::parse("accounts//locations/L1").is_err());
        assert!(ResourceName::parse("accounts/A1/locations/").is_err());
    }

    #[test]
    fn rejects_empty_name() {
        assert_eq!(ResourceName::parse(""), Err(ResourceNameError::Missing));
        assert_eq!(ResourceName::parse("  "), Err(ResourceNameError::Missing));
    }
}
