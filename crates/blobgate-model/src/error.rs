//! The protocol error taxonomy and the tagged error type handlers raise.
//!
//! [`ErrorCode`] is a closed table: every code carries a fixed detail message and
//! an HTTP status. A status of `0` marks an informational code that is never the
//! sole cause of a response. The table lives entirely in `match` arms generated
//! from a single declaration, so it is immutable and needs no initialization.
//!
//! [`S3Error`] pairs a code with an optional client-facing message, the resource
//! the failure concerns, and an optional server-side source error.

use std::error::Error as StdError;
use std::fmt;

macro_rules! error_codes {
    ($($code:ident => ($status:literal, $detail:literal $(,)?)),+ $(,)?) => {
        /// Well-known protocol error codes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ErrorCode {
            $(
                #[doc = $detail]
                $code,
            )+
        }

        impl ErrorCode {
            /// Every code in the taxonomy.
            pub const ALL: &'static [Self] = &[$(Self::$code),+];

            /// Returns the symbolic code written to the `<Code>` element.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$code => stringify!($code),)+
                }
            }

            /// Returns the detail text used when no other message is available.
            #[must_use]
            pub fn detail(&self) -> &'static str {
                match self {
                    $(Self::$code => $detail,)+
                }
            }

            /// Returns the raw HTTP status, `0` for informational codes.
            #[must_use]
            pub fn status(&self) -> u16 {
                match self {
                    $(Self::$code => $status,)+
                }
            }
        }
    };
}

error_codes! {
    AccessDenied => (403, "Access Denied"),
    AccountProblem => (
        403,
        "There is a problem with your AWS account that prevents the operation from completing successfully. Please contact AWS Support for further assistance, see Contact Us.",
    ),
    AllAccessDisabled => (
        403,
        "All access to this Amazon S3 resource has been disabled. Please contact AWS Support for further assistance, see Contact Us.",
    ),
    AmbiguousGrantByEmailAddress => (
        400,
        "The email address you provided is associated with more than one account.",
    ),
    AuthorizationHeaderMalformed => (400, "The authorization header you provided is invalid."),
    BadDigest => (400, "The Content-MD5 you specified did not match what we received."),
    BucketAlreadyExists => (
        409,
        "The requested bucket name is not available. The bucket namespace is shared by all users of the system. Please select a different name and try again.",
    ),
    BucketAlreadyOwnedByYou => (
        0,
        "The bucket you tried to create already exists, and you own it. Amazon S3 returns this error in all AWS Regions except us-east-1 (N. Virginia). For legacy compatibility, if you re-create an existing bucket that you already own in us-east-1, Amazon S3 returns 200 OK and resets the bucket access control lists (ACLs).",
    ),
    BucketNotEmpty => (409, "The bucket you tried to delete is not empty."),
    CredentialsNotSupported => (400, "This request does not support credentials."),
    CrossLocationLoggingProhibited => (
        403,
        "Cross-location logging not allowed. Buckets in one geographic location cannot log information to a bucket in another location.",
    ),
    EntityTooSmall => (
        400,
        "Your proposed upload is smaller than the minimum allowed object size.",
    ),
    EntityTooLarge => (400, "Your proposed upload exceeds the maximum allowed object size."),
    ExpiredToken => (400, "The provided token has expired."),
    IllegalVersioningConfigurationException => (
        400,
        "Indicates that the versioning configuration specified in the request is invalid.",
    ),
    IncompleteBody => (
        400,
        "You did not provide the number of bytes specified by the Content-Length HTTP header",
    ),
    IncorrectNumberOfFilesInPostRequest => (
        400,
        "POST requires exactly one file upload per request.",
    ),
    InlineDataTooLarge => (400, "Inline data exceeds the maximum allowed size."),
    InternalError => (500, "We encountered an internal error. Please try again."),
    InvalidAccessKeyId => (
        403,
        "The AWS access key ID you provided does not exist in our records.",
    ),
    InvalidAddressingHeader => (0, "You must specify the Anonymous role."),
    InvalidArgument => (400, "Invalid Argument"),
    InvalidBucketName => (400, "The specified bucket is not valid."),
    InvalidBucketState => (409, "The request is not valid with the current state of the bucket."),
    InvalidDigest => (400, "The Content-MD5 you specified is not valid."),
    InvalidEncryptionAlgorithmError => (
        400,
        "The encryption request you specified is not valid. The valid value is AES256.",
    ),
    InvalidLocationConstraint => (
        400,
        "The specified location constraint is not valid. For more information about Regions, see How to Select a Region for Your Buckets.",
    ),
    InvalidObjectState => (403, "The operation is not valid for the current state of the object."),
    InvalidPart => (
        400,
        "One or more of the specified parts could not be found. The part might not have been uploaded, or the specified entity tag might not have matched the part's entity tag.",
    ),
    InvalidPartOrder => (
        400,
        "The list of parts was not in ascending order. Parts list must be specified in order by part number.",
    ),
    InvalidPayer => (
        403,
        "All access to this object has been disabled. Please contact AWS Support for further assistance, see Contact Us.",
    ),
    InvalidPolicyDocument => (
        400,
        "The content of the form does not meet the conditions specified in the policy document.",
    ),
    InvalidRange => (416, "The requested range cannot be satisfied."),
    InvalidSecurity => (403, "The provided security credentials are not valid."),
    InvalidSOAPRequest => (400, "The SOAP request body is invalid."),
    InvalidStorageClass => (400, "The storage class you specified is not valid."),
    InvalidTargetBucketForLogging => (
        400,
        "The target bucket for logging does not exist, is not owned by you, or does not have the appropriate grants for the log-delivery group.",
    ),
    InvalidToken => (400, "The provided token is malformed or otherwise invalid."),
    InvalidURI => (400, "Couldn't parse the specified URI."),
    KeyTooLongError => (400, "Your key is too long."),
    MalformedACLError => (
        400,
        "The XML you provided was not well-formed or did not validate against our published schema.",
    ),
    MalformedPOSTRequest => (
        400,
        "The body of your POST request is not well-formed multipart/form-data.",
    ),
    MalformedXML => (
        400,
        "This happens when the user sends malformed XML (XML that doesn't conform to the published XSD) for the configuration. The error message is, \"The XML you provided was not well-formed or did not validate against our published schema.\"",
    ),
    MaxMessageLengthExceeded => (400, "Your request was too big."),
    MaxPostPreDataLengthExceededError => (
        400,
        "Your POST request fields preceding the upload file were too large.",
    ),
    MetadataTooLarge => (400, "Your metadata headers exceed the maximum allowed metadata size."),
    MethodNotAllowed => (405, "The specified method is not allowed against this resource."),
    MissingAttachment => (0, "A SOAP attachment was expected, but none were found."),
    MissingContentLength => (411, "You must provide the Content-Length HTTP header."),
    MissingRequestBodyError => (
        400,
        "This happens when the user sends an empty XML document as a request. The error message is, \"Request body is empty.\"",
    ),
    MissingSecurityElement => (400, "The SOAP 1.1 request is missing a security element."),
    MissingSecurityHeader => (400, "Your request is missing a required header."),
    NoLoggingStatusForKey => (
        400,
        "There is no such thing as a logging status subresource for a key.",
    ),
    NoSuchBucket => (404, "The specified bucket does not exist."),
    NoSuchBucketPolicy => (404, "The specified bucket does not have a bucket policy."),
    NoSuchKey => (404, "The specified key does not exist."),
    NoSuchLifecycleConfiguration => (404, "The lifecycle configuration does not exist."),
    NoSuchUpload => (
        404,
        "The specified multipart upload does not exist. The upload ID might be invalid, or the multipart upload might have been aborted or completed.",
    ),
    NoSuchVersion => (
        404,
        "Indicates that the version ID specified in the request does not match an existing version.",
    ),
    NotImplemented => (501, "A header you provided implies functionality that is not implemented."),
    NotSignedUp => (
        403,
        "Your account is not signed up for the Amazon S3 service. You must sign up before you can use Amazon S3. You can sign up at the following URL: https://aws.amazon.com/s3",
    ),
    OperationAborted => (
        409,
        "A conflicting conditional operation is currently in progress against this resource. Try again.",
    ),
    PermanentRedirect => (
        301,
        "The bucket you are attempting to access must be addressed using the specified endpoint. Send all future requests to this endpoint.",
    ),
    PreconditionFailed => (412, "At least one of the preconditions you specified did not hold."),
    Redirect => (307, "Temporary redirect."),
    RestoreAlreadyInProgress => (409, "Object restore is already in progress."),
    RequestIsNotMultiPartContent => (
        400,
        "Bucket POST must be of the enclosure-type multipart/form-data.",
    ),
    RequestTimeout => (
        400,
        "Your socket connection to the server was not read from or written to within the timeout period.",
    ),
    RequestTimeTooSkewed => (
        403,
        "The difference between the request time and the server's time is too large.",
    ),
    RequestTorrentOfBucketError => (
        400,
        "Requesting the torrent file of a bucket is not permitted.",
    ),
    ServerSideEncryptionConfigurationNotFoundError => (
        400,
        "The server side encryption configuration was not found.",
    ),
    ServiceUnavailable => (503, "Reduce your request rate."),
    SignatureDoesNotMatch => (
        403,
        "The request signature we calculated does not match the signature you provided. Check your AWS secret access key and signing method. For more information, see REST Authentication and SOAP Authentication for details.",
    ),
    SlowDown => (503, "Reduce your request rate."),
    TemporaryRedirect => (307, "You are being redirected to the bucket while DNS updates."),
    TokenRefreshRequired => (400, "The provided token must be refreshed."),
    TooManyBuckets => (400, "You have attempted to create more buckets than allowed."),
    UnexpectedContent => (400, "This request does not support content."),
    UnresolvableGrantByEmailAddress => (
        400,
        "The email address you provided does not match any account on record.",
    ),
    UserKeyMustBeSpecified => (
        400,
        "The bucket POST must contain the specified field name. If it is specified, check the order of the fields.",
    ),
    ObjectAlreadyExists => (
        409,
        "When the `forbidden` header was set, PUT should be denied if the object already exists",
    ),
}

impl ErrorCode {
    /// Returns the HTTP status for this code, or `None` for informational codes.
    #[must_use]
    pub fn http_status(&self) -> Option<http::StatusCode> {
        match self.status() {
            0 => None,
            status => http::StatusCode::from_u16(status).ok(),
        }
    }

    /// Look up a code by its symbolic name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|code| code.as_str() == name)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A protocol error tagged with a taxonomy code.
///
/// The client-facing message is the cause's message when one was attached with
/// [`S3Error::caused_by`] or [`S3Error::with_message`], and the code's detail text
/// otherwise. A `source` attached through [`S3Error::untagged`] or
/// [`S3Error::with_source`] is kept for server-side logging only.
#[derive(Debug)]
pub struct S3Error {
    /// The taxonomy code.
    pub code: ErrorCode,
    /// The resource that caused the error, if known.
    pub resource: Option<String>,
    message: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl fmt::Display for S3Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S3Error({}): {}", self.code, self.message())?;
        if let Some(source) = &self.source {
            write!(f, " ({source})")?;
        }
        Ok(())
    }
}

impl StdError for S3Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl S3Error {
    /// Create an error carrying only a code.
    #[must_use]
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            resource: None,
            message: None,
            source: None,
        }
    }

    /// Create an error with a client-facing message.
    #[must_use]
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(code)
        }
    }

    /// Create an error whose message is taken from an underlying cause.
    #[must_use]
    pub fn caused_by(code: ErrorCode, cause: impl StdError + Send + Sync + 'static) -> Self {
        Self {
            message: Some(cause.to_string()),
            source: Some(Box::new(cause)),
            ..Self::new(code)
        }
    }

    /// Wrap an error that carries no taxonomy code.
    ///
    /// The result is an `InternalError`; the wrapped error is never shown to clients.
    #[must_use]
    pub fn untagged(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            source: Some(err.into()),
            ..Self::new(ErrorCode::InternalError)
        }
    }

    /// Set the resource that caused this error.
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Attach a server-side source error without changing the client message.
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The message written to the `<Message>` element.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_else(|| self.code.detail())
    }

    /// Whether this error reports a missing bucket or key.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self.code, ErrorCode::NoSuchKey | ErrorCode::NoSuchBucket)
    }

    /// Create a NoSuchBucket error.
    #[must_use]
    pub fn no_such_bucket(bucket: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoSuchBucket).with_resource(bucket)
    }

    /// Create a NoSuchKey error.
    #[must_use]
    pub fn no_such_key(key: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoSuchKey).with_resource(key)
    }

    /// Create a BucketAlreadyExists error.
    #[must_use]
    pub fn bucket_already_exists(bucket: impl Into<String>) -> Self {
        Self::new(ErrorCode::BucketAlreadyExists).with_resource(bucket)
    }

    /// Create a BucketNotEmpty error.
    #[must_use]
    pub fn bucket_not_empty(bucket: impl Into<String>) -> Self {
        Self::new(ErrorCode::BucketNotEmpty).with_resource(bucket)
    }

    /// Create an InvalidArgument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidArgument, message)
    }

    /// Create an InternalError with a server-side description.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::untagged(message.into())
    }

    /// Create a NotImplemented error naming the unhandled operation.
    #[must_use]
    pub fn not_implemented(operation: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotImplemented).with_resource(operation)
    }

    /// Create a MethodNotAllowed error.
    #[must_use]
    pub fn method_not_allowed(method: impl Into<String>) -> Self {
        Self::new(ErrorCode::MethodNotAllowed).with_resource(method)
    }
}

impl From<std::io::Error> for S3Error {
    fn from(err: std::io::Error) -> Self {
        Self::untagged(err)
    }
}

/// Create an [`S3Error`] from a code name.
///
/// # Examples
///
/// ```
/// use blobgate_model::s3_error;
/// use blobgate_model::error::ErrorCode;
///
/// let err = s3_error!(NoSuchBucket);
/// assert_eq!(err.code, ErrorCode::NoSuchBucket);
///
/// let err = s3_error!(NoSuchKey, "gone");
/// assert_eq!(err.message(), "gone");
/// ```
#[macro_export]
macro_rules! s3_error {
    ($code:ident) => {
        $crate::error::S3Error::new($crate::error::ErrorCode::$code)
    };
    ($code:ident, $msg:expr) => {
        $crate::error::S3Error::with_message($crate::error::ErrorCode::$code, $msg)
    };
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_should_have_detail_and_valid_status_for_every_code() {
        for code in ErrorCode::ALL {
            assert!(!code.detail().is_empty(), "{code} has no detail");
            let status = code.status();
            assert!(
                status == 0 || (300..600).contains(&status),
                "{code} has status {status}"
            );
            assert_eq!(code.http_status().is_none(), status == 0);
        }
    }

    #[test]
    fn test_should_have_unique_code_names() {
        let names: HashSet<&str> = ErrorCode::ALL.iter().map(ErrorCode::as_str).collect();
        assert_eq!(names.len(), ErrorCode::ALL.len());
        assert_eq!(ErrorCode::ALL.len(), 81);
    }

    #[test]
    fn test_should_map_well_known_statuses() {
        assert_eq!(ErrorCode::NoSuchKey.status(), 404);
        assert_eq!(ErrorCode::InternalError.status(), 500);
        assert_eq!(ErrorCode::NotImplemented.status(), 501);
        assert_eq!(ErrorCode::MethodNotAllowed.status(), 405);
        assert_eq!(ErrorCode::PermanentRedirect.status(), 301);
        assert_eq!(ErrorCode::InvalidRange.status(), 416);
        assert_eq!(ErrorCode::SlowDown.status(), 503);
    }

    #[test]
    fn test_should_mark_informational_codes() {
        assert_eq!(ErrorCode::BucketAlreadyOwnedByYou.http_status(), None);
        assert_eq!(ErrorCode::InvalidAddressingHeader.http_status(), None);
        assert_eq!(ErrorCode::MissingAttachment.http_status(), None);
    }

    #[test]
    fn test_should_lookup_code_by_name() {
        assert_eq!(
            ErrorCode::from_name("NoSuchUpload"),
            Some(ErrorCode::NoSuchUpload)
        );
        assert_eq!(ErrorCode::from_name("NoSuchThing"), None);
    }

    #[test]
    fn test_should_prefer_cause_message_over_detail() {
        let err = S3Error::new(ErrorCode::NoSuchKey);
        assert_eq!(err.message(), "The specified key does not exist.");

        let cause = std::io::Error::other("short read");
        let err = S3Error::caused_by(ErrorCode::IncompleteBody, cause);
        assert_eq!(err.message(), "short read");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_should_hide_untagged_source_from_message() {
        let err = S3Error::untagged(std::io::Error::other("disk on fire"));
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(
            err.message(),
            "We encountered an internal error. Please try again."
        );
        assert!(err.to_string().contains("disk on fire"));
    }

    #[test]
    fn test_should_convert_io_error_to_internal_error() {
        let err: S3Error = std::io::Error::other("boom").into();
        assert_eq!(err.code, ErrorCode::InternalError);
    }

    #[test]
    fn test_should_report_not_found_codes() {
        assert!(S3Error::no_such_key("k").is_not_found());
        assert!(S3Error::no_such_bucket("b").is_not_found());
        assert!(!S3Error::bucket_not_empty("b").is_not_found());
    }

    #[test]
    fn test_should_build_error_with_macro() {
        let err = crate::s3_error!(AccessDenied);
        assert_eq!(err.code, ErrorCode::AccessDenied);
        let err = crate::s3_error!(InvalidArgument, "bad key");
        assert_eq!(err.message(), "bad key");
    }
}
