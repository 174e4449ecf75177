/// Runs blocking store work (CSV file I/O) on tokio's blocking pool so the
/// actix workers keep serving other requests.
use crate::utils::error::{AppError, AppResult};

pub async fn spawn_store_blocking<F, R>(f: F) -> AppResult<R>
where
    F: FnOnce() -> AppResult<R> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_pool_works() {
        let result = spawn_store_blocking(|| {
            std::thread::sleep(std::time::Duration::from_millis(10));
            Ok(42)
        })
        .await;

        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_store_pool_propagates_errors() {
        let result: AppResult<()> =
            spawn_store_blocking(|| Err(AppError::not_found("Donation not found."))).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
