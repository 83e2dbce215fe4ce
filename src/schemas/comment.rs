use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::repositories::comments::CommentRow;

#[derive(Debug, Deserialize)]
pub(crate) struct CommentCreate {
    pub(crate) content: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) author_id: String,
    pub(crate) author_username: String,
    pub(crate) content: String,
    pub(crate) created_at: String,
}

impl CommentResponse {
    pub(crate) fn from_row(row: CommentRow) -> Self {
        Self {
            id: row.id,
            course_id: row.course_id,
            author_id: row.user_id,
            author_username: row.author_username,
            content: row.content,
            created_at: format_primitive(row.created_at),
        }
    }
}
