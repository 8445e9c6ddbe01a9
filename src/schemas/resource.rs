use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Resource;
use crate::db::types::ResourceStatus;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ResourceCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(alias = "fileUrl")]
    #[validate(length(min = 1, message = "file_url must not be empty"))]
    pub(crate) file_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResourceReview {
    pub(crate) decision: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResourceResponse {
    pub(crate) id: String,
    pub(crate) unit_id: String,
    pub(crate) uploader_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) file_url: String,
    pub(crate) status: ResourceStatus,
    pub(crate) reviewed_by: Option<String>,
    pub(crate) reviewed_at: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl ResourceResponse {
    pub(crate) fn from_db(resource: Resource) -> Self {
        Self {
            id: resource.id,
            unit_id: resource.unit_id,
            uploader_id: resource.uploader_id,
            title: resource.title,
            description: resource.description,
            file_url: resource.file_url,
            status: resource.status,
            reviewed_by: resource.reviewed_by,
            reviewed_at: resource.reviewed_at.map(format_primitive),
            created_at: format_primitive(resource.created_at),
            updated_at: format_primitive(resource.updated_at),
        }
    }
}
