//! Document storage for Sketchbin.
//!
//! A document is an opaque payload addressed by a server-generated
//! [`DocumentId`](sketchbin_types::DocumentId), plus an optional display name
//! and an optional share key. The store never interprets payloads or keys.
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait and behave identically:
//!
//! - [`InMemoryDocumentStore`] -- `HashMap`-based, process-scoped
//! - [`FilesystemDocumentStore`] -- one file per payload plus a JSON sidecar
//!
//! [`open_store`] picks one from a [`StorageConfig`] at startup.
//!
//! # Design Rules
//!
//! 1. A document exists iff its payload exists.
//! 2. Payloads are immutable; only name and key change after creation.
//! 3. Delete removes payload and metadata; sidecar cleanup is best-effort.
//! 4. Listing is newest first; unknown creation times sort last.
//! 5. Unknown ids are reported through `Option` / `bool`, never as errors.

pub mod error;
pub mod factory;
pub mod filesystem;
pub mod memory;
pub mod meta;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use factory::{open_store, StorageConfig, StorageKind};
pub use filesystem::FilesystemDocumentStore;
pub use memory::InMemoryDocumentStore;
pub use meta::DocumentMeta;
pub use traits::DocumentStore;

/// Behaviour every backend must share, run against each implementation.
#[cfg(test)]
mod conformance {
    use super::*;
    use proptest::prelude::*;
    use sketchbin_types::DocumentId;
    use std::time::Duration;

    fn with_each_backend(check: impl Fn(&dyn DocumentStore)) {
        let memory = InMemoryDocumentStore::new();
        check(&memory as &dyn DocumentStore);

        let dir = tempfile::tempdir().unwrap();
        let filesystem = FilesystemDocumentStore::open(dir.path()).unwrap();
        check(&filesystem as &dyn DocumentStore);
    }

    #[test]
    fn find_returns_created_payload() {
        with_each_backend(|store| {
            let id = store.create(b"hello").unwrap();
            assert_eq!(id.to_hex().len(), 32);
            assert_eq!(store.find(&id).unwrap().as_deref(), Some(&b"hello"[..]));
        });
    }

    #[test]
    fn empty_payload_is_a_document() {
        with_each_backend(|store| {
            let id = store.create(b"").unwrap();
            assert_eq!(store.find(&id).unwrap(), Some(Vec::new()));
            assert_eq!(store.list().unwrap()[0].size, 0);
        });
    }

    #[test]
    fn delete_is_true_exactly_once() {
        with_each_backend(|store| {
            let id = store.create(b"bye").unwrap();
            assert!(store.delete(&id).unwrap());
            assert!(!store.delete(&id).unwrap());
            assert!(store.find(&id).unwrap().is_none());
            assert!(!store.delete(&DocumentId::generate()).unwrap());
        });
    }

    #[test]
    fn unknown_id_mutators_report_false() {
        with_each_backend(|store| {
            let ghost = DocumentId::generate();
            assert!(!store.set_name(&ghost, Some("x")).unwrap());
            assert!(!store.set_key(&ghost, "k").unwrap());
            assert!(store.get_name(&ghost).unwrap().is_none());
            assert!(store.get_key(&ghost).unwrap().is_none());
            assert!(!store.exists(&ghost).unwrap());
            assert!(store.list().unwrap().is_empty());
        });
    }

    #[test]
    fn name_set_and_clear() {
        with_each_backend(|store| {
            let id = store.create(b"n").unwrap();
            assert!(store.set_name(&id, Some("foo")).unwrap());
            assert_eq!(store.get_name(&id).unwrap().as_deref(), Some("foo"));

            assert!(store.set_name(&id, None).unwrap());
            assert!(store.get_name(&id).unwrap().is_none());

            store.set_name(&id, Some("bar")).unwrap();
            assert!(store.set_name(&id, Some("")).unwrap());
            assert!(store.get_name(&id).unwrap().is_none());
        });
    }

    #[test]
    fn key_set_and_overwrite() {
        with_each_backend(|store| {
            let id = store.create(b"k").unwrap();
            assert!(store.get_key(&id).unwrap().is_none());
            assert!(store.set_key(&id, "first").unwrap());
            assert!(store.set_key(&id, "second").unwrap());
            assert_eq!(store.get_key(&id).unwrap().as_deref(), Some("second"));
        });
    }

    #[test]
    fn metadata_does_not_outlive_delete() {
        with_each_backend(|store| {
            let id = store.create(b"m").unwrap();
            store.set_name(&id, Some("named")).unwrap();
            store.set_key(&id, "key").unwrap();
            store.delete(&id).unwrap();
            assert!(store.get_name(&id).unwrap().is_none());
            assert!(store.get_key(&id).unwrap().is_none());
        });
    }

    #[test]
    fn list_is_newest_first() {
        with_each_backend(|store| {
            let older = store.create(b"older").unwrap();
            std::thread::sleep(Duration::from_millis(20));
            let newer = store.create(b"newer!").unwrap();

            let listed = store.list().unwrap();
            assert_eq!(listed.len(), 2);
            assert_eq!(listed[0].id, newer);
            assert_eq!(listed[0].size, 6);
            assert_eq!(listed[1].id, older);
            assert!(listed[0].created_at >= listed[1].created_at);
        });
    }

    #[test]
    fn list_reflects_current_state() {
        with_each_backend(|store| {
            let a = store.create(b"a").unwrap();
            let b = store.create(b"b").unwrap();
            assert_eq!(store.list().unwrap().len(), 2);
            store.delete(&a).unwrap();
            let listed = store.list().unwrap();
            assert_eq!(listed.len(), 1);
            assert_eq!(listed[0].id, b);
            store.set_name(&b, Some("renamed")).unwrap();
            assert_eq!(store.list().unwrap()[0].name.as_deref(), Some("renamed"));
        });
    }

    #[test]
    fn concurrent_creates_yield_distinct_ids() {
        with_each_backend(|store| {
            let ids: Vec<DocumentId> = std::thread::scope(|s| {
                let handles: Vec<_> = (0..8)
                    .map(|t| {
                        s.spawn(move || {
                            (0..16)
                                .map(|i| store.create(format!("{t}-{i}").as_bytes()).unwrap())
                                .collect::<Vec<_>>()
                        })
                    })
                    .collect();
                handles
                    .into_iter()
                    .flat_map(|h| h.join().unwrap())
                    .collect()
            });
            let distinct: std::collections::HashSet<_> = ids.iter().collect();
            assert_eq!(distinct.len(), 128);
            assert_eq!(store.list().unwrap().len(), 128);
        });
    }

    #[test]
    fn concurrent_name_and_key_updates_both_survive() {
        with_each_backend(|store| {
            let id = store.create(b"shared").unwrap();
            std::thread::scope(|s| {
                s.spawn(|| {
                    for i in 0..200 {
                        assert!(store.set_name(&id, Some(&format!("name-{i}"))).unwrap());
                    }
                });
                s.spawn(|| {
                    for i in 0..200 {
                        assert!(store.set_key(&id, &format!("key-{i}")).unwrap());
                    }
                });
            });
            assert_eq!(store.get_name(&id).unwrap().as_deref(), Some("name-199"));
            assert_eq!(store.get_key(&id).unwrap().as_deref(), Some("key-199"));
        });
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn payload_round_trip(payload in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let memory = InMemoryDocumentStore::new();
            let id = memory.create(&payload).unwrap();
            prop_assert_eq!(memory.find(&id).unwrap(), Some(payload.clone()));

            let dir = tempfile::tempdir().unwrap();
            let fs_store = FilesystemDocumentStore::open(dir.path()).unwrap();
            let id = fs_store.create(&payload).unwrap();
            prop_assert_eq!(fs_store.find(&id).unwrap(), Some(payload));
        }
    }
}
