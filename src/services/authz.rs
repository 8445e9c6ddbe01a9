use crate::db::models::User;
use crate::db::types::UserRole;

/// Everything a handler asks permission for, with the ownership context it
/// needs baked in. Keeping the role logic in one pure function keeps the
/// handlers free of role-string comparisons.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Action<'a> {
    ManageCampuses,
    CreateCourseContent,
    ManageCourse { creator: &'a str },
    ManageQuiz { creator: &'a str },
    ViewQuizResults { creator: &'a str },
    ViewAttempt { owner: &'a str },
    ReviewResource,
    DeleteResource { uploader: &'a str },
    AcceptAnswer { question_author: &'a str },
}

pub(crate) fn can(user: &User, action: Action<'_>) -> bool {
    if user.role == UserRole::Admin {
        return true;
    }

    match action {
        Action::ManageCampuses => false,
        Action::CreateCourseContent => user.role == UserRole::Lecturer,
        Action::ManageCourse { creator } => {
            user.role == UserRole::Lecturer && user.id == creator
        }
        Action::ManageQuiz { creator } => user.role == UserRole::Lecturer && user.id == creator,
        Action::ViewQuizResults { creator } => user.id == creator,
        Action::ViewAttempt { owner } => is_staff(user) || user.id == owner,
        Action::ReviewResource => user.role == UserRole::Lecturer,
        Action::DeleteResource { uploader } => user.id == uploader,
        Action::AcceptAnswer { question_author } => {
            user.role == UserRole::Lecturer || user.id == question_author
        }
    }
}

pub(crate) fn is_staff(user: &User) -> bool {
    matches!(user.role, UserRole::Lecturer | UserRole::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;

    fn user(id: &str, role: UserRole) -> User {
        let now = primitive_now_utc();
        User {
            id: id.to_string(),
            username: format!("user-{id}"),
            hashed_password: String::new(),
            full_name: "Test User".to_string(),
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn admin_can_do_everything() {
        let admin = user("a", UserRole::Admin);

        assert!(can(&admin, Action::ManageCampuses));
        assert!(can(&admin, Action::CreateCourseContent));
        assert!(can(&admin, Action::ManageQuiz { creator: "someone-else" }));
        assert!(can(&admin, Action::ViewQuizResults { creator: "someone-else" }));
        assert!(can(&admin, Action::ViewAttempt { owner: "someone-else" }));
        assert!(can(&admin, Action::ReviewResource));
        assert!(can(&admin, Action::DeleteResource { uploader: "someone-else" }));
        assert!(can(&admin, Action::AcceptAnswer { question_author: "someone-else" }));
    }

    #[test]
    fn only_admin_manages_campuses() {
        assert!(!can(&user("l", UserRole::Lecturer), Action::ManageCampuses));
        assert!(!can(&user("s", UserRole::Student), Action::ManageCampuses));
    }

    #[test]
    fn lecturer_creates_content_but_manages_only_own() {
        let lecturer = user("l", UserRole::Lecturer);

        assert!(can(&lecturer, Action::CreateCourseContent));
        assert!(can(&lecturer, Action::ManageQuiz { creator: "l" }));
        assert!(!can(&lecturer, Action::ManageQuiz { creator: "other" }));
        assert!(can(&lecturer, Action::ManageCourse { creator: "l" }));
        assert!(!can(&lecturer, Action::ManageCourse { creator: "other" }));
    }

    #[test]
    fn quiz_results_are_creator_or_admin_only() {
        let lecturer = user("l", UserRole::Lecturer);
        let student = user("s", UserRole::Student);

        assert!(can(&lecturer, Action::ViewQuizResults { creator: "l" }));
        assert!(!can(&lecturer, Action::ViewQuizResults { creator: "other" }));
        assert!(!can(&student, Action::ViewQuizResults { creator: "other" }));
    }

    #[test]
    fn attempt_is_visible_to_owner_and_staff() {
        let student = user("s", UserRole::Student);
        let lecturer = user("l", UserRole::Lecturer);

        assert!(can(&student, Action::ViewAttempt { owner: "s" }));
        assert!(!can(&student, Action::ViewAttempt { owner: "other" }));
        assert!(can(&lecturer, Action::ViewAttempt { owner: "other" }));
    }

    #[test]
    fn acceptance_is_owner_lecturer_or_admin() {
        let owner = user("q-author", UserRole::Student);
        let other_student = user("s", UserRole::Student);
        let lecturer = user("l", UserRole::Lecturer);

        assert!(can(&owner, Action::AcceptAnswer { question_author: "q-author" }));
        assert!(!can(&other_student, Action::AcceptAnswer { question_author: "q-author" }));
        assert!(can(&lecturer, Action::AcceptAnswer { question_author: "q-author" }));
    }

    #[test]
    fn students_cannot_review_resources() {
        assert!(!can(&user("s", UserRole::Student), Action::ReviewResource));
        assert!(can(&user("l", UserRole::Lecturer), Action::ReviewResource));
    }

    #[test]
    fn resource_deletion_is_uploader_or_admin() {
        let uploader = user("u", UserRole::Student);
        let lecturer = user("l", UserRole::Lecturer);

        assert!(can(&uploader, Action::DeleteResource { uploader: "u" }));
        assert!(!can(&lecturer, Action::DeleteResource { uploader: "u" }));
    }

    #[test]
    fn staff_check_covers_lecturer_and_admin() {
        assert!(is_staff(&user("l", UserRole::Lecturer)));
        assert!(is_staff(&user("a", UserRole::Admin)));
        assert!(!is_staff(&user("s", UserRole::Student)));
    }
}
