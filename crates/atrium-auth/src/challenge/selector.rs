use thiserror::Error;

use super::ChallengeKind;

/// Factor marker for an authenticator one-time code.
const TOTP_FACTOR: &str = "totp";
/// Marker the service reports alongside `totp` when recovery codes are
/// accepted; presented to the user as the same authenticator challenge.
const OTP_FACTOR: &str = "otp";
/// Factor marker for a code delivered by email.
const EMAIL_OTP_FACTOR: &str = "emailOtp";

/// The service reported outstanding factors, none of which this client can
/// present. Fatal for the attempt; not user-retriable.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("no supported second factor among [{}]", .0.join(", "))]
pub struct UnsupportedFactorError(pub Vec<String>);

/// Picks the single challenge to present for a login that reported
/// `outstanding` factors.
///
/// Email one-time codes win over authenticator codes when both are
/// outstanding; at most one challenge is presented per login cycle and the
/// user is never asked to choose.
pub fn select_challenge(outstanding: &[String]) -> Result<ChallengeKind, UnsupportedFactorError> {
    if outstanding.iter().any(|factor| factor == EMAIL_OTP_FACTOR) {
        return Ok(ChallengeKind::EmailOtp);
    }

    if outstanding
        .iter()
        .any(|factor| factor == TOTP_FACTOR || factor == OTP_FACTOR)
    {
        return Ok(ChallengeKind::Totp);
    }

    Err(UnsupportedFactorError(outstanding.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors(markers: &[&str]) -> Vec<String> {
        markers.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_email_otp_wins_over_everything_else() {
        let cases = [
            factors(&["emailOtp"]),
            factors(&["totp", "emailOtp"]),
            factors(&["emailOtp", "totp", "otp"]),
            factors(&["unknown", "emailOtp"]),
        ];

        for outstanding in cases {
            assert_eq!(
                select_challenge(&outstanding),
                Ok(ChallengeKind::EmailOtp),
                "expected EmailOtp for {outstanding:?}"
            );
        }
    }

    #[test]
    fn test_totp_selected_without_email_marker() {
        assert_eq!(
            select_challenge(&factors(&["totp", "otp"])),
            Ok(ChallengeKind::Totp)
        );
        assert_eq!(select_challenge(&factors(&["otp"])), Ok(ChallengeKind::Totp));
    }

    #[test]
    fn test_unrecognized_factors_are_unsupported() {
        let outstanding = factors(&["sms", "webauthn"]);

        assert_eq!(
            select_challenge(&outstanding),
            Err(UnsupportedFactorError(outstanding.clone()))
        );
    }

    #[test]
    fn test_empty_list_is_unsupported() {
        assert_eq!(select_challenge(&[]), Err(UnsupportedFactorError(vec![])));
    }
}
