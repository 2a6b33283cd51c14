//! Listing integration tests.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::primitives::ByteStream;

    use crate::{cleanup_bucket, create_test_bucket, s3_client};

    async fn seed(client: &aws_sdk_s3::Client, bucket: &str, keys: &[&str]) {
        for key in keys {
            client
                .put_object()
                .bucket(bucket)
                .key(*key)
                .body(ByteStream::from_static(b"x"))
                .send()
                .await
                .unwrap_or_else(|e| panic!("failed to put {key}: {e}"));
        }
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_with_prefix_and_delimiter() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "delim").await;
        seed(
            &client,
            &bucket,
            &["a.txt", "docs/one.txt", "docs/two.txt", "img/cat.png"],
        )
        .await;

        let resp = client
            .list_objects_v2()
            .bucket(&bucket)
            .delimiter("/")
            .send()
            .await
            .expect("list_objects_v2");

        let keys: Vec<&str> = resp.contents().iter().filter_map(|o| o.key()).collect();
        let prefixes: Vec<&str> = resp
            .common_prefixes()
            .iter()
            .filter_map(|p| p.prefix())
            .collect();
        assert_eq!(keys, vec!["a.txt"]);
        assert_eq!(prefixes, vec!["docs/", "img/"]);
        assert_eq!(resp.key_count(), Some(3));

        let resp = client
            .list_objects_v2()
            .bucket(&bucket)
            .prefix("docs/")
            .send()
            .await
            .expect("list_objects_v2 with prefix");
        let keys: Vec<&str> = resp.contents().iter().filter_map(|o| o.key()).collect();
        assert_eq!(keys, vec!["docs/one.txt", "docs/two.txt"]);

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_paginate_with_marker() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "page").await;
        seed(&client, &bucket, &["k1", "k2", "k3"]).await;

        let first = client
            .list_objects()
            .bucket(&bucket)
            .max_keys(2)
            .send()
            .await
            .expect("first page");
        assert_eq!(first.is_truncated(), Some(true));
        assert_eq!(first.contents().len(), 2);
        assert_eq!(first.next_marker(), Some("k2"));

        let second = client
            .list_objects()
            .bucket(&bucket)
            .marker("k2")
            .send()
            .await
            .expect("second page");
        let keys: Vec<&str> = second.contents().iter().filter_map(|o| o.key()).collect();
        assert_eq!(keys, vec!["k3"]);
        assert_eq!(second.is_truncated(), Some(false));

        cleanup_bucket(&client, &bucket).await;
    }
}
