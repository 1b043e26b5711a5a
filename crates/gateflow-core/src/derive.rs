//! 名前・値の導出

use crate::error::{DescriptorError, Result};

/// テンプレートのバケット名から末尾の "-xxx" を取り除く
///
/// `myfuncs-abc123-xyz` → `myfuncs-abc123`
pub fn bucket_name(raw: &str) -> Result<String> {
    match raw.rfind('-') {
        Some(idx) if idx > 0 => Ok(raw[..idx].to_string()),
        _ => Err(DescriptorError::InvalidBucketName(raw.to_string())),
    }
}

/// `gs://<bucket>/<object>` からオブジェクト名を取り出す
pub fn archive_object_name(url: &str, bucket: &str) -> Result<String> {
    url.strip_prefix("gs://")
        .and_then(|rest| rest.strip_prefix(bucket))
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|object| !object.is_empty())
        .map(str::to_string)
        .ok_or_else(|| DescriptorError::ArchiveOutsideBucket {
            url: url.to_string(),
            bucket: bucket.to_string(),
        })
}

/// "540s" → 540
pub fn parse_timeout(raw: &str) -> Result<u32> {
    raw.strip_suffix('s')
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| DescriptorError::InvalidTimeout(raw.to_string()))
}
