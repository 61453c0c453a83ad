//! Page diffs and the copy-on-write snapshot transformation.
//!
//! Diffs are applied in two phases. [`prepare`] validates page names and
//! writes every new body to the blob store, turning content into hashes.
//! [`apply`] is then a pure function from the prior page list to the new one,
//! so an update that loses a compare-and-swap race can be re-applied to the
//! newer snapshot without touching the blob store again.

use folio_store::BlobStore;
use folio_types::{ContentHash, Metadata, PageName};
use folio_versions::PageMeta;
use tracing::debug;

use crate::error::{ProjectError, ProjectResult};

/// A page supplied at project creation.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPage {
    pub name: String,
    pub content: Vec<u8>,
    pub metadata: Metadata,
}

impl NewPage {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl From<NewPage> for PageDiff {
    fn from(page: NewPage) -> Self {
        PageDiff {
            name: page.name,
            change: PageChange::Put {
                content: page.content,
                metadata: Some(page.metadata),
            },
        }
    }
}

/// What an update does to one page.
///
/// Deletion is an explicit marker, so an empty body is ordinary content.
#[derive(Clone, Debug, PartialEq)]
pub enum PageChange {
    /// Set the page body, adding the page if it does not exist.
    ///
    /// `metadata: None` keeps an existing page's metadata (an added page gets
    /// an empty map); `Some` replaces it wholesale.
    Put {
        content: Vec<u8>,
        metadata: Option<Metadata>,
    },
    /// Remove the page from the new snapshot if present.
    Delete,
}

/// One requested change, addressed by page name.
#[derive(Clone, Debug, PartialEq)]
pub struct PageDiff {
    pub name: String,
    pub change: PageChange,
}

impl PageDiff {
    pub fn put(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            change: PageChange::Put {
                content: content.into(),
                metadata: None,
            },
        }
    }

    pub fn put_with_metadata(
        name: impl Into<String>,
        content: impl Into<Vec<u8>>,
        metadata: Metadata,
    ) -> Self {
        Self {
            name: name.into(),
            change: PageChange::Put {
                content: content.into(),
                metadata: Some(metadata),
            },
        }
    }

    pub fn delete(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            change: PageChange::Delete,
        }
    }
}

/// A diff whose content has been stored and replaced by its hash.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PreparedChange {
    Put {
        hash: ContentHash,
        metadata: Option<Metadata>,
    },
    Delete,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PreparedDiff {
    pub name: PageName,
    pub change: PreparedChange,
}

/// Validate every page name, then store every body.
///
/// Names are checked before any blob is written, so an invalid diff list
/// fails without side effects.
pub(crate) fn prepare(blobs: &dyn BlobStore, diffs: &[PageDiff]) -> ProjectResult<Vec<PreparedDiff>> {
    let names = diffs
        .iter()
        .map(|d| PageName::new(d.name.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    names
        .into_iter()
        .zip(diffs)
        .map(|(name, diff)| {
            let change = match &diff.change {
                PageChange::Put { content, metadata } => {
                    let hash = blobs.put(content)?;
                    debug!(page = %name, hash = %hash.short_hex(), "stored page body");
                    PreparedChange::Put {
                        hash,
                        metadata: metadata.clone(),
                    }
                }
                PageChange::Delete => PreparedChange::Delete,
            };
            Ok::<_, ProjectError>(PreparedDiff { name, change })
        })
        .collect()
}

/// Apply prepared diffs, in order, to a copy of `pages`.
///
/// - Delete removes the page with that name if present; no marker is kept.
/// - Put on an existing page replaces its hash in place, keeping its `id`
///   and position, and replaces its metadata only if new metadata was given.
/// - Put on a missing page appends a new page with a fresh `id`.
pub(crate) fn apply(pages: &[PageMeta], diffs: &[PreparedDiff]) -> Vec<PageMeta> {
    let mut next = pages.to_vec();

    for diff in diffs {
        let existing = next.iter().position(|p| p.name == diff.name);
        match (&diff.change, existing) {
            (PreparedChange::Delete, Some(index)) => {
                next.remove(index);
            }
            (PreparedChange::Delete, None) => {}
            (PreparedChange::Put { hash, metadata }, Some(index)) => {
                let page = &mut next[index];
                page.hash = *hash;
                if let Some(metadata) = metadata {
                    page.metadata = metadata.clone();
                }
            }
            (PreparedChange::Put { hash, metadata }, None) => {
                next.push(PageMeta::new(
                    diff.name.clone(),
                    *hash,
                    metadata.clone().unwrap_or_default(),
                ));
            }
        }
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_crypto::ContentHasher;
    use folio_store::InMemoryBlobStore;

    fn meta(pairs: &[(&str, &str)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::json!(v)))
            .collect()
    }

    fn base_pages() -> Vec<PageMeta> {
        vec![
            PageMeta::new(
                PageName::new("page").unwrap(),
                ContentHasher::hash(b"original content"),
                meta(&[("spec", "first")]),
            ),
            PageMeta::new(
                PageName::new("other").unwrap(),
                ContentHasher::hash(b"untouched"),
                Metadata::new(),
            ),
        ]
    }

    fn run(pages: &[PageMeta], diffs: &[PageDiff]) -> Vec<PageMeta> {
        let blobs = InMemoryBlobStore::new();
        let prepared = prepare(&blobs, diffs).unwrap();
        apply(pages, &prepared)
    }

    #[test]
    fn put_existing_page_keeps_identity_and_metadata() {
        let base = base_pages();
        let next = run(&base, &[PageDiff::put("page", "updated content")]);

        assert_eq!(next.len(), 2);
        assert_eq!(next[0].id, base[0].id);
        assert_eq!(next[0].hash, ContentHasher::hash(b"updated content"));
        assert_eq!(next[0].metadata, base[0].metadata);
        assert_eq!(next[1], base[1]);
    }

    #[test]
    fn put_with_metadata_replaces_it_wholesale() {
        let base = base_pages();
        let next = run(
            &base,
            &[PageDiff::put_with_metadata("page", "x", meta(&[("title", "new")]))],
        );
        assert_eq!(next[0].metadata, meta(&[("title", "new")]));
    }

    #[test]
    fn put_missing_page_appends_fresh_identity() {
        let base = base_pages();
        let next = run(&base, &[PageDiff::put("third", "3")]);
        assert_eq!(next.len(), 3);
        assert_eq!(next[2].name.as_str(), "third");
        assert!(next[2].metadata.is_empty());
        assert!(base.iter().all(|p| p.id != next[2].id));
    }

    #[test]
    fn delete_removes_without_marker() {
        let base = base_pages();
        let next = run(&base, &[PageDiff::delete("page")]);
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].name.as_str(), "other");
    }

    #[test]
    fn delete_missing_page_is_a_no_op() {
        let base = base_pages();
        assert_eq!(run(&base, &[PageDiff::delete("ghost")]), base);
    }

    #[test]
    fn empty_content_is_not_a_deletion() {
        let base = base_pages();
        let next = run(&base, &[PageDiff::put("page", "")]);
        assert_eq!(next.len(), 2);
        assert_eq!(next[0].hash, ContentHasher::hash(b""));
    }

    #[test]
    fn diffs_apply_in_input_order() {
        let base = base_pages();
        let next = run(
            &base,
            &[PageDiff::delete("page"), PageDiff::put("page", "reborn")],
        );
        assert_eq!(next.len(), 2);
        assert_eq!(next[1].name.as_str(), "page");
        assert_ne!(next[1].id, base[0].id);

        let next = run(
            &base,
            &[PageDiff::put("page", "reborn"), PageDiff::delete("page")],
        );
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn apply_leaves_input_snapshot_untouched() {
        let base = base_pages();
        let copy = base.clone();
        let _ = run(&base, &[PageDiff::put("page", "changed"), PageDiff::delete("other")]);
        assert_eq!(base, copy);
    }

    #[test]
    fn invalid_name_fails_before_any_write() {
        let blobs = InMemoryBlobStore::new();
        let diffs = [PageDiff::put("fine", "a"), PageDiff::put("not/fine", "b")];
        assert!(prepare(&blobs, &diffs).is_err());
        assert!(blobs.is_empty());
    }

    #[test]
    fn prepare_stores_bodies() {
        let blobs = InMemoryBlobStore::new();
        let prepared = prepare(&blobs, &[PageDiff::put("a", "body")]).unwrap();
        let PreparedChange::Put { hash, .. } = &prepared[0].change else {
            panic!("expected a put");
        };
        assert_eq!(&blobs.fetch(hash).unwrap()[..], b"body");
    }
}
