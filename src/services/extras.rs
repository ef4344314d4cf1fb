//! Extras service

use crate::{error::AppResult, models::Extra, repository::Repository};

#[derive(Clone)]
pub struct ExtrasService {
    repository: Repository,
}

impl ExtrasService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_active(&self) -> AppResult<Vec<Extra>> {
        self.repository.extras.list_active().await
    }
}
