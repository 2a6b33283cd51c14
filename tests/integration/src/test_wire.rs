//! Wire-level checks with a plain HTTP client.

#[cfg(test)]
mod tests {
    use crate::{cleanup_bucket, create_test_bucket, endpoint_url, http_client, s3_client};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_answer_health_probe() {
        let resp = http_client()
            .get(format!("{}/_health", endpoint_url()))
            .send()
            .await
            .expect("health request");
        assert_eq!(resp.status().as_u16(), 200);
        let body = resp.text().await.expect("health body");
        assert!(body.contains("\"status\":\"running\""));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_encode_not_implemented_subresource() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "acl").await;

        let resp = http_client()
            .get(format!("{}/{bucket}?acl", endpoint_url()))
            .send()
            .await
            .expect("acl request");
        assert_eq!(resp.status().as_u16(), 501);

        let request_id = resp
            .headers()
            .get("x-amz-request-id")
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned)
            .expect("request id header");
        assert_eq!(
            resp.headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some("application/xml")
        );

        let body = resp.text().await.expect("error body");
        assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(body.contains("<Code>NotImplemented</Code>"));
        assert!(body.contains(&format!("<RequestId>{request_id}</RequestId>")));

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_omit_error_body_for_head() {
        let resp = http_client()
            .head(format!("{}/no-such-bucket-for-head/key", endpoint_url()))
            .send()
            .await
            .expect("head request");
        assert_eq!(resp.status().as_u16(), 404);
        let body = resp.bytes().await.expect("head body");
        assert!(body.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_truncated_copy_source() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "badcopy").await;

        let resp = http_client()
            .put(format!("{}/{bucket}/dst.txt", endpoint_url()))
            .header("x-amz-copy-source", "only-a-bucket")
            .send()
            .await
            .expect("copy request");
        assert_eq!(resp.status().as_u16(), 400);
        let body = resp.text().await.expect("error body");
        assert!(body.contains("<Code>InvalidArgument</Code>"));

        cleanup_bucket(&client, &bucket).await;
    }
}
