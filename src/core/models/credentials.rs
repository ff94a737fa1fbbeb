/// An opaque secret. Its value is only handed to the adapter that needs it
/// and is never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return None;
        }
        Some(Self(value.trim().to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret(***)")
    }
}

/// The three independent credentials a run may use. Scoped to one invocation.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub vision: Option<Secret>,
    pub summarization: Option<Secret>,
    pub registry: Option<Secret>,
}

impl Credentials {
    pub fn from_values(
        vision: Option<String>,
        summarization: Option<String>,
        registry: Option<String>,
    ) -> Self {
        Self {
            vision: vision.and_then(Secret::new),
            summarization: summarization.and_then(Secret::new),
            registry: registry.and_then(Secret::new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_are_treated_as_absent() {
        let credentials =
            Credentials::from_values(Some("   ".to_string()), None, Some("key".to_string()));

        assert!(credentials.vision.is_none());
        assert!(credentials.summarization.is_none());
        assert_eq!(credentials.registry.unwrap().expose(), "key");
    }

    #[test]
    fn test_debug_output_never_contains_secret() {
        let credentials = Credentials::from_values(
            Some("vision-secret".to_string()),
            Some("sk-secret".to_string()),
            None,
        );

        let debug = format!("{:?}", credentials);

        assert!(!debug.contains("vision-secret"));
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("***"));
    }
}
