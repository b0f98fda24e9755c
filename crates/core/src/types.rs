use std::fmt;

macro_rules! newtype_string {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance from a string value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Return the inner string as a str slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return `true` if the underlying string is empty.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

newtype_string!(RequestId, "Client-supplied idempotency key for an execution request.");
newtype_string!(OrgId, "Tenant identifier used to key rate limits and quotas.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_from_str() {
        let id = RequestId::from("r1");
        assert_eq!(id.as_str(), "r1");
        assert_eq!(&*id, "r1");
    }

    #[test]
    fn newtype_serde_roundtrip() {
        let org = OrgId::new("pro");
        let json = serde_json::to_string(&org).unwrap();
        assert_eq!(json, "\"pro\"");
        let back: OrgId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, org);
    }

    #[test]
    fn is_empty() {
        assert!(OrgId::new("").is_empty());
        assert!(!OrgId::new("pro").is_empty());
    }
}
