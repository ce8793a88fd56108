use agendo_utils::TimeRange;
use service::{ErrorKind, ServiceError, ValidationFailureItem};
use uuid::Uuid;

type ServiceResult<T> = Result<T, ServiceError>;

fn unwrap_service_err<T>(result: &ServiceResult<T>) -> &ServiceError {
    match result {
        Err(err) => err,
        Ok(_) => panic!("Expected an error, the call succeeded"),
    }
}

pub fn test_not_found<T>(result: &ServiceResult<T>, target_id: &Uuid) {
    match unwrap_service_err(result) {
        ServiceError::EntityNotFound(id) => assert_eq!(id, target_id, "wrong entity reported"),
        err => panic!("Expected {target_id} to be missing, got {err:?}"),
    }
}

pub fn test_zero_id_error<T>(result: &ServiceResult<T>) {
    let err = unwrap_service_err(result);
    assert!(matches!(err, ServiceError::IdSetOnCreate), "{err:?}");
}

pub fn test_zero_version_error<T>(result: &ServiceResult<T>) {
    let err = unwrap_service_err(result);
    assert!(matches!(err, ServiceError::VersionSetOnCreate), "{err:?}");
}

pub fn test_overlapping_time_range_error<T>(result: &ServiceResult<T>) {
    let err = unwrap_service_err(result);
    assert!(matches!(err, ServiceError::OverlappingTimeRange), "{err:?}");
}

pub fn test_time_order_wrong<T>(result: &ServiceResult<T>) {
    let err = unwrap_service_err(result);
    assert!(matches!(err, ServiceError::TimeOrderWrong(_, _)), "{err:?}");
}

pub fn test_conflicts<T>(
    result: &ServiceResult<T>,
    target_id: &Uuid,
    expected_version: &Uuid,
    actual_version: &Uuid,
) {
    match unwrap_service_err(result) {
        ServiceError::EntityConflicts(id, expected, actual) => {
            assert_eq!(
                (id, expected, actual),
                (target_id, expected_version, actual_version)
            );
        }
        err => panic!("Expected a version conflict on {target_id}, got {err:?}"),
    }
}

/// Passes when `expected` is among exactly `fail_count` reported failures.
pub fn test_validation_error<T>(
    result: &ServiceResult<T>,
    expected: &ValidationFailureItem,
    fail_count: usize,
) {
    match unwrap_service_err(result) {
        ServiceError::ValidationError(items) => {
            assert!(items.contains(expected), "{expected:?} missing in {items:?}");
            assert_eq!(items.len(), fail_count, "{items:?}");
        }
        err => panic!("Expected a validation error, got {err:?}"),
    }
}

pub fn test_slot_conflict<T>(result: &ServiceResult<T>, expected: &TimeRange) {
    match unwrap_service_err(result) {
        ServiceError::SlotConflict(range) => assert_eq!(range, expected),
        err => panic!("Expected a slot conflict on {expected}, got {err:?}"),
    }
}

pub fn test_error_kind<T>(result: &ServiceResult<T>, kind: ErrorKind) {
    let err = unwrap_service_err(result);
    assert_eq!(err.kind(), kind, "{err}");
}
