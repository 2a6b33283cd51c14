//! Object CRUD integration tests.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::primitives::ByteStream;

    use crate::{cleanup_bucket, create_test_bucket, s3_client};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_put_and_get_object() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "putget").await;

        let body = b"hello, blobgate!";
        let put = client
            .put_object()
            .bucket(&bucket)
            .key("greeting.txt")
            .body(ByteStream::from_static(body))
            .send()
            .await
            .expect("put_object");
        assert!(put.e_tag().is_some());

        let resp = client
            .get_object()
            .bucket(&bucket)
            .key("greeting.txt")
            .send()
            .await
            .expect("get_object");

        assert_eq!(resp.content_length(), Some(16));
        assert_eq!(resp.e_tag(), put.e_tag());

        let data = resp
            .body
            .collect()
            .await
            .expect("collect body")
            .into_bytes();
        assert_eq!(data.as_ref(), body);

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_head_object() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "head").await;

        client
            .put_object()
            .bucket(&bucket)
            .key("file.bin")
            .body(ByteStream::from_static(&[7u8; 64]))
            .send()
            .await
            .expect("put_object");

        let resp = client
            .head_object()
            .bucket(&bucket)
            .key("file.bin")
            .send()
            .await
            .expect("head_object");
        assert_eq!(resp.content_length(), Some(64));
        assert!(resp.last_modified().is_some());

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_copy_object() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "copy").await;

        client
            .put_object()
            .bucket(&bucket)
            .key("src.txt")
            .body(ByteStream::from_static(b"copy me"))
            .send()
            .await
            .expect("put_object");

        let resp = client
            .copy_object()
            .bucket(&bucket)
            .key("dst.txt")
            .copy_source(format!("{bucket}/src.txt"))
            .send()
            .await
            .expect("copy_object");
        assert!(resp.copy_object_result().and_then(|r| r.e_tag()).is_some());

        let data = client
            .get_object()
            .bucket(&bucket)
            .key("dst.txt")
            .send()
            .await
            .expect("get copy")
            .body
            .collect()
            .await
            .expect("collect body")
            .into_bytes();
        assert_eq!(data.as_ref(), b"copy me");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_delete_object_idempotently() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "delete").await;

        client
            .put_object()
            .bucket(&bucket)
            .key("gone.txt")
            .body(ByteStream::from_static(b"bye"))
            .send()
            .await
            .expect("put_object");

        for _ in 0..2 {
            client
                .delete_object()
                .bucket(&bucket)
                .key("gone.txt")
                .send()
                .await
                .expect("delete_object");
        }

        let result = client
            .head_object()
            .bucket(&bucket)
            .key("gone.txt")
            .send()
            .await;
        assert!(result.is_err(), "deleted object should be gone");

        cleanup_bucket(&client, &bucket).await;
    }
}
