//! Error handling integration tests.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::primitives::ByteStream;

    use crate::{cleanup_bucket, create_test_bucket, s3_client, test_bucket_name};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_no_such_bucket_on_put() {
        let client = s3_client();
        let bucket = test_bucket_name("ghost");

        let err = client
            .put_object()
            .bucket(&bucket)
            .key("file.txt")
            .body(ByteStream::from_static(b"data"))
            .send()
            .await
            .expect_err("put to nonexistent bucket should fail");
        assert_eq!(err.into_service_error().meta().code(), Some("NoSuchBucket"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_no_such_key_on_get() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "nokey").await;

        let err = client
            .get_object()
            .bucket(&bucket)
            .key("nonexistent.txt")
            .send()
            .await
            .expect_err("get nonexistent key should fail");
        assert!(err.into_service_error().is_no_such_key());

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_bucket_not_empty_on_delete() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "notempty").await;

        client
            .put_object()
            .bucket(&bucket)
            .key("blocker.txt")
            .body(ByteStream::from_static(b"x"))
            .send()
            .await
            .expect("put_object");

        let err = client
            .delete_bucket()
            .bucket(&bucket)
            .send()
            .await
            .expect_err("delete of non-empty bucket should fail");
        assert_eq!(
            err.into_service_error().meta().code(),
            Some("BucketNotEmpty")
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_not_implemented_for_multipart() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "multipart").await;

        let err = client
            .create_multipart_upload()
            .bucket(&bucket)
            .key("big.bin")
            .send()
            .await
            .expect_err("multipart is not implemented");
        assert_eq!(
            err.into_service_error().meta().code(),
            Some("NotImplemented")
        );

        cleanup_bucket(&client, &bucket).await;
    }
}
