//! Business repository trait definition.

use smartbiz_types::business::{Business, BusinessId};
use smartbiz_types::error::RepositoryError;

pub trait BusinessRepository: Send + Sync {
    fn create_business(
        &self,
        business: &Business,
    ) -> impl std::future::Future<Output = Result<Business, RepositoryError>> + Send;

    fn get_business(
        &self,
        id: &BusinessId,
    ) -> impl std::future::Future<Output = Result<Option<Business>, RepositoryError>> + Send;

    /// Overwrite the mutable profile fields of an existing business.
    fn update_business(
        &self,
        business: &Business,
    ) -> impl std::future::Future<Output = Result<Business, RepositoryError>> + Send;
}
