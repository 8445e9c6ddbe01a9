pub(crate) mod answers;
pub(crate) mod bookmarks;
pub(crate) mod campuses;
pub(crate) mod course_units;
pub(crate) mod courses;
pub(crate) mod notifications;
pub(crate) mod questions;
pub(crate) mod quiz_attempts;
pub(crate) mod quizzes;
pub(crate) mod resources;
pub(crate) mod users;
pub(crate) mod votes;
