pub(crate) mod comments;
pub(crate) mod courses;
pub(crate) mod enrollments;
pub(crate) mod students;
pub(crate) mod teachers;
pub(crate) mod users;
