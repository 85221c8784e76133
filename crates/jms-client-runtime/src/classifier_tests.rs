//! Tests for foreign destination classification.

use super::*;

const DESTINATION_NAME: &str = "Test-Destination-Name";

// ============================================================================
// Foreign Destination Fixtures
// ============================================================================

/// Destination exposing no capability at all
struct PlainDestination;

impl ForeignDestination for PlainDestination {
    fn capabilities(&self) -> Result<DestinationCapabilities, ClientError> {
        Ok(DestinationCapabilities::new())
    }
}

struct ForeignQueue {
    name: String,
    temporary: bool,
}

impl ForeignDestination for ForeignQueue {
    fn capabilities(&self) -> Result<DestinationCapabilities, ClientError> {
        let capabilities = DestinationCapabilities::new().with_queue_name(Some(self.name.clone()));
        Ok(if self.temporary {
            capabilities.with_temporary()
        } else {
            capabilities
        })
    }
}

struct ForeignTopic {
    name: String,
    temporary: bool,
}

impl ForeignDestination for ForeignTopic {
    fn capabilities(&self) -> Result<DestinationCapabilities, ClientError> {
        let capabilities = DestinationCapabilities::new().with_topic_name(Some(self.name.clone()));
        Ok(if self.temporary {
            capabilities.with_temporary()
        } else {
            capabilities
        })
    }
}

/// Destination implementing both the queue and the topic accessors
struct ForeignTopicAndQueue {
    name: String,
    return_queue_name: bool,
    return_topic_name: bool,
}

impl ForeignTopicAndQueue {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            return_queue_name: true,
            return_topic_name: true,
        }
    }
}

impl ForeignDestination for ForeignTopicAndQueue {
    fn capabilities(&self) -> Result<DestinationCapabilities, ClientError> {
        Ok(DestinationCapabilities::new()
            .with_queue_name(self.return_queue_name.then(|| self.name.clone()))
            .with_topic_name(self.return_topic_name.then(|| self.name.clone())))
    }
}

/// Destination whose accessors fail
struct BrokenDestination;

impl ForeignDestination for BrokenDestination {
    fn capabilities(&self) -> Result<DestinationCapabilities, ClientError> {
        Err(ClientError::Foreign {
            message: "session closed".to_string(),
        })
    }
}

fn classify_foreign(foreign: &dyn ForeignDestination) -> Result<Destination, ClientError> {
    classify(Some(DestinationRef::Foreign(foreign))).map(|resolved| {
        resolved
            .expect("foreign input should never classify as absent")
            .into_owned()
    })
}

// ============================================================================
// Passthrough Tests
// ============================================================================

mod passthrough {
    use super::*;

    #[test]
    fn test_absent_destination_is_not_an_error() {
        let transformed = classify(None).unwrap();
        assert!(transformed.is_none());
    }

    #[test]
    fn test_native_destination_is_not_transformed() {
        let destination = Destination::topic(DESTINATION_NAME);

        let transformed = classify(Some((&destination).into())).unwrap().unwrap();

        match transformed {
            Cow::Borrowed(same) => assert!(std::ptr::eq(same, &destination)),
            Cow::Owned(_) => panic!("native destination must be passed through"),
        }
    }

    #[test]
    fn test_native_deleted_flag_is_preserved() {
        let mut destination = Destination::temporary_queue(DESTINATION_NAME);
        destination.delete().unwrap();

        let transformed = classify(Some((&destination).into())).unwrap().unwrap();

        assert!(transformed.is_deleted());
    }
}

// ============================================================================
// Single Capability Tests
// ============================================================================

mod single_capability {
    use super::*;

    #[test]
    fn test_transform_destination_from_foreign_topic() {
        let transformed = classify_foreign(&ForeignTopic {
            name: DESTINATION_NAME.to_string(),
            temporary: false,
        })
        .unwrap();

        assert!(transformed.is_topic());
        assert!(!transformed.is_temporary());
        assert_eq!(transformed.name(), DESTINATION_NAME);
    }

    #[test]
    fn test_transform_destination_from_foreign_queue() {
        let transformed = classify_foreign(&ForeignQueue {
            name: DESTINATION_NAME.to_string(),
            temporary: false,
        })
        .unwrap();

        assert!(transformed.is_queue());
        assert!(!transformed.is_temporary());
        assert_eq!(transformed.name(), DESTINATION_NAME);
    }

    #[test]
    fn test_transform_destination_from_foreign_temp_queue() {
        let transformed = classify_foreign(&ForeignQueue {
            name: DESTINATION_NAME.to_string(),
            temporary: true,
        })
        .unwrap();

        assert!(transformed.is_queue());
        assert!(transformed.is_temporary());
        assert!(!transformed.is_deleted());
        assert_eq!(transformed.name(), DESTINATION_NAME);
    }

    #[test]
    fn test_transform_destination_from_foreign_temp_topic() {
        let transformed = classify_foreign(&ForeignTopic {
            name: DESTINATION_NAME.to_string(),
            temporary: true,
        })
        .unwrap();

        assert!(transformed.is_topic());
        assert!(transformed.is_temporary());
        assert_eq!(transformed.name(), DESTINATION_NAME);
    }

    #[test]
    fn test_queue_without_name_is_unresolvable() {
        let capabilities = DestinationCapabilities::new().with_queue_name(None);

        assert!(matches!(
            resolve(&capabilities),
            Err(ClientError::UnresolvableDestination { .. })
        ));
    }

    #[test]
    fn test_topic_without_name_is_unresolvable() {
        let capabilities = DestinationCapabilities::new()
            .with_topic_name(None)
            .with_temporary();

        assert!(matches!(
            resolve(&capabilities),
            Err(ClientError::UnresolvableDestination { .. })
        ));
    }
}

// ============================================================================
// Composite and Unsupported Tests
// ============================================================================

mod composite {
    use super::*;

    #[test]
    fn test_plain_destination_is_unsupported() {
        let result = classify_foreign(&PlainDestination);

        assert!(matches!(result, Err(ClientError::UnsupportedDestination)));
    }

    #[test]
    fn test_temporary_marker_alone_is_unsupported() {
        let capabilities = DestinationCapabilities::new().with_temporary();

        assert!(matches!(
            resolve(&capabilities),
            Err(ClientError::UnsupportedDestination)
        ));
    }

    #[test]
    fn test_composite_with_both_names_is_ambiguous() {
        let result = classify_foreign(&ForeignTopicAndQueue::new(DESTINATION_NAME));

        match result {
            Err(ClientError::AmbiguousDestination {
                queue_name,
                topic_name,
            }) => {
                assert_eq!(queue_name, DESTINATION_NAME);
                assert_eq!(topic_name, DESTINATION_NAME);
            }
            other => panic!("Expected AmbiguousDestination, got: {:?}", other),
        }
    }

    #[test]
    fn test_composite_with_no_names_is_unresolvable() {
        let mut destination = ForeignTopicAndQueue::new(DESTINATION_NAME);
        destination.return_queue_name = false;
        destination.return_topic_name = false;

        let result = classify_foreign(&destination);

        assert!(matches!(
            result,
            Err(ClientError::UnresolvableDestination { .. })
        ));
    }

    #[test]
    fn test_composite_resolves_to_topic() {
        let mut destination = ForeignTopicAndQueue::new(DESTINATION_NAME);
        destination.return_queue_name = false;

        let transformed = classify_foreign(&destination).unwrap();

        assert!(transformed.is_topic());
        assert!(!transformed.is_temporary());
        assert_eq!(transformed.name(), DESTINATION_NAME);
    }

    #[test]
    fn test_composite_resolves_to_queue() {
        let mut destination = ForeignTopicAndQueue::new(DESTINATION_NAME);
        destination.return_topic_name = false;

        let transformed = classify_foreign(&destination).unwrap();

        assert!(transformed.is_queue());
        assert!(!transformed.is_temporary());
        assert_eq!(transformed.name(), DESTINATION_NAME);
    }

    #[test]
    fn test_accessor_errors_propagate_unchanged() {
        let result = classify_foreign(&BrokenDestination);

        match result {
            Err(ClientError::Foreign { message }) => assert_eq!(message, "session closed"),
            other => panic!("Expected Foreign error, got: {:?}", other),
        }
    }
}
