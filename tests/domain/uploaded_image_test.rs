use bytes::Bytes;

use narrato::domain::UploadedImage;

#[test]
fn given_complete_upload_when_created_then_declared_size_matches_data() {
    let upload = UploadedImage::new(Some("cat.png".into()), Bytes::from_static(b"abc"));

    assert_eq!(upload.declared_size, 3);
    assert!(!upload.is_empty());
}

#[test]
fn given_truncated_upload_when_created_then_keeps_declared_size() {
    let upload = UploadedImage::truncated(None, Bytes::from_static(b"ab"), 1_000);

    assert_eq!(upload.data.len(), 2);
    assert_eq!(upload.declared_size, 1_000);
    assert!(!upload.is_empty());
}

#[test]
fn given_zero_bytes_when_created_then_is_empty() {
    let upload = UploadedImage::new(Some("empty.png".into()), Bytes::new());
    assert!(upload.is_empty());
}
