use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Campus, Course, CourseUnit};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CampusCreate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) city: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CampusUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) city: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CampusResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) city: Option<String>,
    pub(crate) created_by: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl CampusResponse {
    pub(crate) fn from_db(campus: Campus) -> Self {
        Self {
            id: campus.id,
            name: campus.name,
            city: campus.city,
            created_by: campus.created_by,
            created_at: format_primitive(campus.created_at),
            updated_at: format_primitive(campus.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseCreate {
    #[validate(length(min = 1, message = "code must not be empty"))]
    pub(crate) code: String,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseResponse {
    pub(crate) id: String,
    pub(crate) campus_id: String,
    pub(crate) code: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) created_by: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl CourseResponse {
    pub(crate) fn from_db(course: Course) -> Self {
        Self {
            id: course.id,
            campus_id: course.campus_id,
            code: course.code,
            title: course.title,
            description: course.description,
            created_by: course.created_by,
            created_at: format_primitive(course.created_at),
            updated_at: format_primitive(course.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseUnitCreate {
    #[validate(length(min = 1, message = "code must not be empty"))]
    pub(crate) code: String,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default = "default_semester")]
    #[validate(range(min = 1, message = "semester must be positive"))]
    pub(crate) semester: i32,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseUnitResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) code: String,
    pub(crate) title: String,
    pub(crate) semester: i32,
    pub(crate) created_by: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl CourseUnitResponse {
    pub(crate) fn from_db(unit: CourseUnit) -> Self {
        Self {
            id: unit.id,
            course_id: unit.course_id,
            code: unit.code,
            title: unit.title,
            semester: unit.semester,
            created_by: unit.created_by,
            created_at: format_primitive(unit.created_at),
            updated_at: format_primitive(unit.updated_at),
        }
    }
}

fn default_semester() -> i32 {
    1
}
