use crate::utils::error::Result;

/// Where `validate` and `eval` read their JSON documents from.
pub trait DocumentSource: Send + Sync {
    fn read_document(&self) -> impl std::future::Future<Output = Result<String>> + Send;
}
