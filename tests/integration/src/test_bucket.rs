//! Bucket lifecycle integration tests.

#[cfg(test)]
mod tests {
    use crate::{cleanup_bucket, create_test_bucket, s3_client, test_bucket_name};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_create_head_and_delete_bucket() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "lifecycle").await;

        client
            .head_bucket()
            .bucket(&bucket)
            .send()
            .await
            .expect("head_bucket");

        client
            .delete_bucket()
            .bucket(&bucket)
            .send()
            .await
            .expect("delete_bucket");

        let result = client.head_bucket().bucket(&bucket).send().await;
        assert!(result.is_err(), "head on deleted bucket should fail");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_created_bucket() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "listed").await;

        let resp = client.list_buckets().send().await.expect("list_buckets");
        let names: Vec<&str> = resp.buckets().iter().filter_map(|b| b.name()).collect();
        assert!(names.contains(&bucket.as_str()), "bucket missing from {names:?}");

        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted, "buckets should be sorted by name");
        assert!(resp.owner().and_then(|o| o.id()).is_some());

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_duplicate_bucket() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "dup").await;

        let err = client
            .create_bucket()
            .bucket(&bucket)
            .send()
            .await
            .expect_err("duplicate create should fail");
        assert_eq!(
            err.into_service_error().meta().code(),
            Some("BucketAlreadyExists")
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_fail_to_delete_missing_bucket() {
        let client = s3_client();
        let bucket = test_bucket_name("missing");

        let err = client
            .delete_bucket()
            .bucket(&bucket)
            .send()
            .await
            .expect_err("delete of missing bucket should fail");
        assert_eq!(err.into_service_error().meta().code(), Some("NoSuchBucket"));
    }
}
