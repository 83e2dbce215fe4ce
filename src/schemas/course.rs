use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::repositories::courses::CourseView;
use crate::repositories::enrollments::{RosterRow, StudentEnrollmentRow};
use crate::schemas::comment::CommentResponse;
use crate::services::grading;

#[derive(Debug, Deserialize)]
pub(crate) struct CourseCreate {
    pub(crate) name: String,
    pub(crate) course_code: String,
    /// Only honored for admin callers; a teacher always creates courses
    /// under their own record.
    #[serde(default)]
    pub(crate) teacher_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseResponse {
    pub(crate) id: String,
    pub(crate) course_code: String,
    pub(crate) name: String,
    pub(crate) teacher_id: String,
    pub(crate) teacher_name: String,
    pub(crate) created_at: String,
}

impl CourseResponse {
    pub(crate) fn from_view(view: CourseView) -> Self {
        Self {
            id: view.id,
            course_code: view.course_code,
            name: view.name,
            teacher_id: view.teacher_id,
            teacher_name: view.teacher_name,
            created_at: format_primitive(view.created_at),
        }
    }
}

/// Course seen through a student's enrollment, with the derived average.
#[derive(Debug, Serialize)]
pub(crate) struct EnrolledCourseResponse {
    pub(crate) enrollment_id: String,
    pub(crate) course_id: String,
    pub(crate) course_code: String,
    pub(crate) course_name: String,
    pub(crate) teacher_name: String,
    pub(crate) midterm_score: f64,
    pub(crate) final_score: f64,
    pub(crate) average: f64,
}

impl EnrolledCourseResponse {
    pub(crate) fn from_row(row: StudentEnrollmentRow) -> Self {
        let average = grading::enrollment_average(row.midterm_score, row.final_score);
        Self {
            enrollment_id: row.id,
            course_id: row.course_id,
            course_code: row.course_code,
            course_name: row.course_name,
            teacher_name: row.teacher_name,
            midterm_score: row.midterm_score,
            final_score: row.final_score,
            average,
        }
    }
}

/// Role-scoped course listing. The student variant carries the two disjoint
/// sets (enrolled and available) plus the semester average.
#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub(crate) enum CourseListResponse {
    Admin { courses: Vec<CourseResponse> },
    Teacher { courses: Vec<CourseResponse> },
    Student {
        enrollments: Vec<EnrolledCourseResponse>,
        available: Vec<CourseResponse>,
        semester_average: f64,
    },
}

#[derive(Debug, Serialize)]
pub(crate) struct RosterEntryResponse {
    pub(crate) enrollment_id: String,
    pub(crate) student_id: String,
    pub(crate) student_name: String,
    pub(crate) midterm_score: f64,
    pub(crate) final_score: f64,
    pub(crate) average: f64,
}

impl RosterEntryResponse {
    pub(crate) fn from_row(row: RosterRow) -> Self {
        let average = grading::enrollment_average(row.midterm_score, row.final_score);
        Self {
            enrollment_id: row.id,
            student_id: row.student_id,
            student_name: row.student_name,
            midterm_score: row.midterm_score,
            final_score: row.final_score,
            average,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseDetailResponse {
    pub(crate) course: CourseResponse,
    pub(crate) roster: Vec<RosterEntryResponse>,
    pub(crate) comments: Vec<CommentResponse>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GradeBatchRequest {
    pub(crate) updates: Vec<ScoreUpdateRequest>,
}

/// A per-enrollment score update. An absent field leaves that score
/// unchanged; the update is per field, not per row.
#[derive(Debug, Deserialize)]
pub(crate) struct ScoreUpdateRequest {
    pub(crate) enrollment_id: String,
    #[serde(default)]
    pub(crate) midterm_score: Option<f64>,
    #[serde(default)]
    pub(crate) final_score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GradeBatchResponse {
    pub(crate) updated: usize,
    pub(crate) message: String,
}
