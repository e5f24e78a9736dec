use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Where the registry and taxonomy come from, and the default search constraints.
pub trait ConfigProvider: Send + Sync {
    fn registry_path(&self) -> &str;
    /// `None` selects the built-in taxonomy.
    fn taxonomy_path(&self) -> Option<&str>;
    fn min_experience(&self) -> u32;
    fn min_rating(&self) -> f64;
    fn limit(&self) -> Option<usize>;
}
