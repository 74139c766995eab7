use serde::Serialize;

use crate::directory::Page;

/// JSON envelope shared by every endpoint.
///
/// List responses always carry `data`, `total`, `page` and `limit`; single-record and
/// error responses leave the paging fields out.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, message: None, data: Some(data), total: None, page: None, limit: None }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: Some(message.into()), data: None, total: None, page: None, limit: None }
    }
}

impl ApiResponse<()> {
    /// Success with a message and no payload.
    pub fn done(message: impl Into<String>) -> Self {
        Self { success: true, message: Some(message.into()), data: None, total: None, page: None, limit: None }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn page(page: Page<T>) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(page.items),
            total: Some(page.total),
            page: Some(page.page),
            limit: Some(page.limit),
        }
    }
}
