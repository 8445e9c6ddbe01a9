use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "userrole", rename_all = "lowercase")]
pub(crate) enum UserRole {
    Student,
    Lecturer,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "votedirection", rename_all = "lowercase")]
pub(crate) enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Accepts the wire forms "UP"/"DOWN" in any letter case.
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("up") {
            Some(Self::Up)
        } else if raw.eq_ignore_ascii_case("down") {
            Some(Self::Down)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "resourcestatus", rename_all = "lowercase")]
pub(crate) enum ResourceStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "notificationkind", rename_all = "snake_case")]
pub(crate) enum NotificationKind {
    ResourceApproved,
    ResourceRejected,
    AnswerPosted,
    AnswerAccepted,
    VoteReceived,
}

#[cfg(test)]
mod tests {
    use super::VoteDirection;

    #[test]
    fn vote_direction_parse_is_case_insensitive() {
        assert_eq!(VoteDirection::parse("UP"), Some(VoteDirection::Up));
        assert_eq!(VoteDirection::parse("up"), Some(VoteDirection::Up));
        assert_eq!(VoteDirection::parse("Down"), Some(VoteDirection::Down));
        assert_eq!(VoteDirection::parse("sideways"), None);
        assert_eq!(VoteDirection::parse(""), None);
    }
}
