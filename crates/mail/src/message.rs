//! Plain-text messages sent by the platform.

/// A rendered message ready for any [`crate::Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub const CONFIRMATION_SUBJECT: &str = "YaMDb confirmation code";

/// Message carrying a signup confirmation code.
pub fn confirmation_email(from: &str, to: &str, code: &str) -> OutgoingEmail {
    OutgoingEmail {
        from: from.to_string(),
        to: to.to_string(),
        subject: CONFIRMATION_SUBJECT.to_string(),
        body: format!(
            "Your confirmation code is: {code}\n\n\
             Exchange it for an access token at POST /api/v1/auth/token."
        ),
    }
}
