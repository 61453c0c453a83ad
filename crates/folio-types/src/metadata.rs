use std::collections::BTreeMap;

/// Schema-less page metadata.
///
/// Keys are kept in sorted order so serialized versions are stable. A page's
/// metadata is carried forward by value into each new version unless an
/// update supplies a replacement, which then replaces the whole map.
pub type Metadata = BTreeMap<String, serde_json::Value>;
