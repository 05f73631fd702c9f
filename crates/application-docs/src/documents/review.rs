const REVIEW_PREFIX: &str = "Your application has been placed in review";

const ADDRESS_CLAUSE: &str = " because we were unable to verify your residential address. \
In terms of FICA we are required to confirm the address of every investor, so please send us \
a certified proof of address not older than three months.";

const BANK_CLAUSE: &str = " because we were unable to verify your bank account details. \
Please send us a bank-stamped confirmation letter or a recent bank statement for the account \
you nominated.";

const SUSPICIOUS_ACTIVITY_CLAUSE: &str = " because we noticed activity on your profile that we \
need to confirm with you. Please contact our support team so that we can complete the review.";

/// Explains why an application is in review, keyed off the free-text review reason.
///
/// Rules are checked in order and the first match wins: address checks, then bank checks,
/// then a generic clause for anything else (including a missing reason).
pub fn in_review_message(reason: Option<&str>) -> String {
    let reason = reason.unwrap_or_default().to_lowercase();

    let clause = if reason.contains("address") {
        ADDRESS_CLAUSE
    } else if reason.contains("bank") {
        BANK_CLAUSE
    } else {
        SUSPICIOUS_ACTIVITY_CLAUSE
    };

    format!("{REVIEW_PREFIX}{clause}")
}
