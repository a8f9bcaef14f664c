use image_vault::storage::{MockStorageService, S3StorageClient, StorageService};

#[cfg(test)]
mod mock_tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_store_success() {
        let mock = MockStorageService::new();
        let result = mock
            .store_object(vec![1, 2, 3], "holiday.png", "image/png")
            .await;
        assert!(result.is_ok());

        let location_ref = result.unwrap();

        // The mock mirrors the real reference shape: /uploads/<uuid>.<ext>.
        assert!(location_ref.starts_with("/uploads/"));
        assert!(location_ref.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_mock_store_failure() {
        let mock = MockStorageService::new_failing();
        let result = mock
            .store_object(vec![1, 2, 3], "holiday.png", "image/png")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mock_key_sanitization() {
        let mock = MockStorageService::new();
        let result = mock
            .store_object(vec![1], "../../etc/passwd", "text/plain")
            .await;
        assert!(result.is_ok());

        let location_ref = result.unwrap();

        // Traversal components never survive into the derived object key.
        assert!(!location_ref.contains(".."));
        assert!(location_ref.starts_with("/uploads/"));
    }

    #[tokio::test]
    async fn test_mock_extension_fallback() {
        let mock = MockStorageService::new();
        let location_ref = mock
            .store_object(vec![1], "no-extension", "application/octet-stream")
            .await
            .unwrap();

        // A filename without an extension falls back to .bin.
        assert!(location_ref.ends_with(".bin"));
    }
}

#[cfg(test)]
mod s3_tests {
    use super::*;

    #[tokio::test]
    async fn test_s3_client_creation() {
        // Construction wires credentials and the path-style endpoint without
        // any network traffic; it must not panic.
        let _client = S3StorageClient::new(
            "http://localhost:9000",
            "us-east-1",
            "testkey",
            "testsecret",
            "testbucket",
        )
        .await;
    }
}
