use std::fmt;

use crate::certificate;
use crate::error::AuthError;
use crate::model::{AuthenticationResponse, Person};

/// Session state reported by the provider while polling is still useful.
pub const STATE_RUNNING: &str = "RUNNING";
/// Session state carrying a final result.
pub const STATE_COMPLETE: &str = "COMPLETE";
/// Result of a confirmed authentication.
pub const RESULT_OK: &str = "OK";

/// Closed set of provider rejection codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    NotMidClient,
    UserCancelled,
    SignatureHashMismatch,
    PhoneAbsent,
    DeliveryError,
    SimError,
    Timeout,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::NotMidClient => "NOT_MID_CLIENT",
            RejectionReason::UserCancelled => "USER_CANCELLED",
            RejectionReason::SignatureHashMismatch => "SIGNATURE_HASH_MISMATCH",
            RejectionReason::PhoneAbsent => "PHONE_ABSENT",
            RejectionReason::DeliveryError => "DELIVERY_ERROR",
            RejectionReason::SimError => "SIM_ERROR",
            RejectionReason::Timeout => "TIMEOUT",
        }
    }

    fn parse(code: &str) -> Option<Self> {
        match code {
            "NOT_MID_CLIENT" => Some(RejectionReason::NotMidClient),
            "USER_CANCELLED" => Some(RejectionReason::UserCancelled),
            "SIGNATURE_HASH_MISMATCH" => Some(RejectionReason::SignatureHashMismatch),
            "PHONE_ABSENT" => Some(RejectionReason::PhoneAbsent),
            "DELIVERY_ERROR" => Some(RejectionReason::DeliveryError),
            "SIM_ERROR" => Some(RejectionReason::SimError),
            "TIMEOUT" => Some(RejectionReason::Timeout),
            _ => None,
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed outcome of one session fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The user has not yet confirmed or rejected the request.
    InProgress,
    /// Authentication confirmed; identity extracted from the certificate.
    Success(Person),
    /// Authentication denied with a provider rejection code.
    Rejected(RejectionReason),
}

impl PollOutcome {
    /// Terminal outcomes end the polling loop.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollOutcome::InProgress)
    }
}

/// Maps a provider session response to a typed outcome.
///
/// The mapping is total: every (state, result) pair produces exactly one
/// outcome or one protocol error, unknown values are never ignored.
pub fn interpret(response: &AuthenticationResponse) -> Result<PollOutcome, AuthError> {
    match response.state.as_str() {
        STATE_RUNNING => Ok(PollOutcome::InProgress),
        STATE_COMPLETE => match response.result.as_str() {
            RESULT_OK => certificate::extract(&response.cert).map(PollOutcome::Success),
            result => match RejectionReason::parse(result) {
                Some(reason) => Ok(PollOutcome::Rejected(reason)),
                None => Err(AuthError::UnsupportedResult(result.to_string())),
            },
        },
        state => Err(AuthError::UnsupportedState(state.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(state: &str, result: &str, cert: &str) -> AuthenticationResponse {
        AuthenticationResponse {
            state: state.to_string(),
            result: result.to_string(),
            cert: cert.to_string(),
            ..AuthenticationResponse::default()
        }
    }

    const TEST_CERT: &str = "MIIDqDCCAy6gAwIBAgIQB9W11BzBABj+0d/AZx6UHzAKBggqhkjOPQQDAjBxMQswCQYDVQQGEwJFRTEbMBkGA1UECgwSU0sgSUQgU29sdXRpb25zIEFTMRcwFQYDVQRhDA5OVFJFRS0xMDc0NzAxMzEsMCoGA1UEAwwjVEVTVCBvZiBTSyBJRCBTb2x1dGlvbnMgRUlELVEgMjAyMUUwHhcNMjQwNjEyMDY0NTI4WhcNMjkwNjE2MDY0NTI3WjCBlTELMAkGA1UEBhMCRUUxLzAtBgNVBAMMJk1BUlkgw4ROTixPJ0NPTk5Fxb0txaBVU0xJSyBURVNUTlVNQkVSMSUwIwYDVQQEDBxPJ0NPTk5Fxb0txaBVU0xJSyBURVNUTlVNQkVSMRIwEAYDVQQqDAlNQVJZIMOETk4xGjAYBgNVBAUTEVBOT0VFLTUxMzA3MTQ5NTYwMFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEWlV1aVSXw6WhagWmFmXE/oe+0R1xZzrHyoiVlgKpGiJ8cwIQLogRGQnWY7NwgQvRHCBmsl99bj57h7SWnd03m6OCAYEwggF9MAkGA1UdEwQCMAAwHwYDVR0jBBgwFoAUScfc7QYUosdtnKbP11L9aOXoBBQwcAYIKwYBBQUHAQEEZDBiMDMGCCsGAQUFBzAChidodHRwOi8vYy5zay5lZS9URVNUX0VJRC1RXzIwMjFFLmRlci5jcnQwKwYIKwYBBQUHMAGGH2h0dHA6Ly9haWEuZGVtby5zay5lZS9laWRxMjAyMWUweAYDVR0gBHEwbzAIBgYEAI96AQIwYwYJKwYBBAHOHxIBMFYwVAYIKwYBBQUHAgEWSGh0dHBzOi8vd3d3LnNraWRzb2x1dGlvbnMuZXUvcmVzb3VyY2VzL2NlcnRpZmljYXRpb24tcHJhY3RpY2Utc3RhdGVtZW50LzA0BgNVHR8ELTArMCmgJ6AlhiNodHRwOi8vYy5zay5lZS90ZXN0X2VpZC1xXzIwMjFlLmNybDAdBgNVHQ4EFgQUj8KjnXvGQJCRYOd5LVfPku7QsZwwDgYDVR0PAQH/BAQDAgeAMAoGCCqGSM49BAMCA2gAMGUCMQCocXWDbBnkM3WEyBdv9Vm0A1MNRv08WrR192dRBcX42Kz5oiH0SdHRJv2ffeuEeSwCMEw2tSA3ClJv233Dl7rIYU/T6UG2NQhvDD5FhnP0umZRmVfAUQ6eVcmU8AhFtNJjwg==";

    #[test]
    fn test_running_is_in_progress_for_any_result() {
        for result in ["", "OK", "TIMEOUT", "SOMETHING_ELSE"] {
            let outcome = interpret(&response(STATE_RUNNING, result, "")).unwrap();
            assert_eq!(outcome, PollOutcome::InProgress);
            assert!(!outcome.is_terminal());
        }
    }

    #[test]
    fn test_complete_ok_extracts_person() {
        let outcome = interpret(&response(STATE_COMPLETE, RESULT_OK, TEST_CERT)).unwrap();
        match outcome {
            PollOutcome::Success(person) => {
                assert_eq!(person.identity_number, "PNOEE-51307149560");
                assert_eq!(person.personal_code, "51307149560");
                assert_eq!(person.first_name, "MARY ÄNN");
                assert_eq!(person.last_name, "O'CONNEŽ-ŠUSLIK TESTNUMBER");
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_ok_bad_certificate_propagates() {
        let err = interpret(&response(STATE_COMPLETE, RESULT_OK, "not base64")).unwrap_err();
        assert!(matches!(err, AuthError::FailedToDecodeCertificate));
    }

    #[test]
    fn test_complete_rejections() {
        let cases = [
            ("NOT_MID_CLIENT", RejectionReason::NotMidClient),
            ("USER_CANCELLED", RejectionReason::UserCancelled),
            (
                "SIGNATURE_HASH_MISMATCH",
                RejectionReason::SignatureHashMismatch,
            ),
            ("PHONE_ABSENT", RejectionReason::PhoneAbsent),
            ("DELIVERY_ERROR", RejectionReason::DeliveryError),
            ("SIM_ERROR", RejectionReason::SimError),
            ("TIMEOUT", RejectionReason::Timeout),
        ];
        for (code, reason) in cases {
            let outcome = interpret(&response(STATE_COMPLETE, code, "")).unwrap();
            assert_eq!(outcome, PollOutcome::Rejected(reason));
            assert!(outcome.is_terminal());
        }
    }

    #[test]
    fn test_complete_unknown_result() {
        let err = interpret(&response(STATE_COMPLETE, "UNKNOWN", "")).unwrap_err();
        assert!(matches!(err, AuthError::UnsupportedResult(r) if r == "UNKNOWN"));
    }

    #[test]
    fn test_unknown_state() {
        let err = interpret(&response("UNKNOWN", "OK", "")).unwrap_err();
        assert!(matches!(err, AuthError::UnsupportedState(s) if s == "UNKNOWN"));
    }

    #[test]
    fn test_empty_state() {
        assert!(matches!(
            interpret(&response("", "", "")),
            Err(AuthError::UnsupportedState(_))
        ));
    }

    #[test]
    fn test_rejection_display_matches_wire_code() {
        assert_eq!(RejectionReason::NotMidClient.to_string(), "NOT_MID_CLIENT");
        assert_eq!(
            AuthError::AuthenticationFailed(RejectionReason::UserCancelled).to_string(),
            "authentication failed: USER_CANCELLED"
        );
    }
}
