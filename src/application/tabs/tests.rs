use super::*;
use crate::domain::{MAX_TABS, Tab};
use crate::infra::storage::MemoryStore;

fn default_tabs() -> Vec<Tab> {
    vec![Tab::new(1, "Tab 1", "")]
}

fn store_with(tabs_json: &str, active: &str) -> TabStore<MemoryStore> {
    TabStore::load(MemoryStore::with_entries([
        (TABS_KEY, tabs_json),
        (ACTIVE_INDEX_KEY, active),
    ]))
}

/// Accepts reads, refuses every write.
#[derive(Default)]
struct ReadOnlyStore {
    inner: MemoryStore,
}

impl Storage for ReadOnlyStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.inner.load(key)
    }

    fn save(&mut self, _key: &str, _value: &str) -> Result<()> {
        anyhow::bail!("quota exceeded")
    }

    fn clear(&mut self, _key: &str) -> Result<()> {
        anyhow::bail!("store unavailable")
    }
}

#[test]
fn test_load_empty_storage_gives_default() {
    let store = TabStore::load(MemoryStore::new());
    assert_eq!(store.tabs().tabs(), default_tabs().as_slice());
    assert_eq!(store.tabs().active_index(), 0);
}

#[test]
fn test_load_does_not_write() {
    let store = TabStore::load(MemoryStore::new());
    assert_eq!(store.storage().get(TABS_KEY), None);
    assert_eq!(store.storage().get(ACTIVE_INDEX_KEY), None);
}

#[test]
fn test_load_corrupt_snapshots_gives_default() {
    for corrupt in [
        "not json",
        "{\"id\":1}",
        "[]",
        "[{\"id\":1,\"title\":\"x\"}]",
        "[{\"id\":\"1\",\"title\":\"x\",\"content\":\"\"}]",
        "[{\"id\":1,\"title\":\"a\",\"content\":\"\"},{\"id\":1,\"title\":\"b\",\"content\":\"\"}]",
        "null",
    ] {
        let store = store_with(corrupt, "0");
        assert_eq!(
            store.tabs().tabs(),
            default_tabs().as_slice(),
            "snapshot {corrupt:?}"
        );
        assert_eq!(store.tabs().active_index(), 0);
    }
}

#[test]
fn test_add_after_largest_id_is_rejected_not_wrapped() {
    let mut store = store_with(r#"[{"id":18446744073709551615,"title":"a","content":""}]"#, "0");
    assert_eq!(store.tabs().get(0).unwrap().id, u64::MAX);

    assert_eq!(store.add_tab().unwrap_err(), TabError::IdsExhausted);
    assert_eq!(store.tabs().len(), 1);
    assert_eq!(store.storage().get(ACTIVE_INDEX_KEY), Some("0"));
}

#[test]
fn test_load_oversized_snapshot_gives_default() {
    let tabs: Vec<Tab> = (1..=MAX_TABS as u64 + 1)
        .map(|id| Tab::new(id, format!("T{id}"), ""))
        .collect();
    let store = store_with(&serde_json::to_string(&tabs).unwrap(), "0");
    assert_eq!(store.tabs().tabs(), default_tabs().as_slice());
}

#[test]
fn test_load_valid_snapshot() {
    let store = store_with(
        r#"[{"id":4,"title":"Intro","content":"Hello"},{"id":9,"title":"","content":"World"}]"#,
        "1",
    );
    assert_eq!(
        store.tabs().tabs(),
        &[Tab::new(4, "Intro", "Hello"), Tab::new(9, "", "World")]
    );
    assert_eq!(store.tabs().active_index(), 1);
}

#[test]
fn test_load_clamps_or_defaults_active_index() {
    let json = r#"[{"id":1,"title":"a","content":""},{"id":2,"title":"b","content":""}]"#;
    assert_eq!(store_with(json, "7").tabs().active_index(), 1);
    assert_eq!(store_with(json, "-1").tabs().active_index(), 0);
    assert_eq!(store_with(json, "one").tabs().active_index(), 0);

    let missing_index = TabStore::load(MemoryStore::with_entries([(TABS_KEY, json)]));
    assert_eq!(missing_index.tabs().active_index(), 0);
}

#[test]
fn test_every_mutation_persists() {
    let mut store = TabStore::load(MemoryStore::new());

    store.add_tab().unwrap();
    assert_eq!(store.storage().get(ACTIVE_INDEX_KEY), Some("1"));

    store.rename_tab(1, "Second").unwrap();
    store.set_content(1, "Body \"quoted\"\n<b>").unwrap();
    store.set_active(0).unwrap();

    let reloaded = TabStore::load(store.storage().clone());
    assert_eq!(reloaded.tabs(), store.tabs());
    assert_eq!(reloaded.tabs().get(1).unwrap().content, "Body \"quoted\"\n<b>");
    assert_eq!(reloaded.tabs().active_index(), 0);
}

#[test]
fn test_rejected_mutation_does_not_persist() {
    let mut store = TabStore::load(MemoryStore::new());
    assert_eq!(store.remove_active().unwrap_err(), TabError::LastTab);
    assert_eq!(store.storage().get(TABS_KEY), None);
}

#[test]
fn test_add_rejected_at_capacity_keeps_snapshot() {
    let mut store = TabStore::load(MemoryStore::new());
    while store.tabs().len() < MAX_TABS {
        store.add_tab().unwrap();
    }
    let snapshot = store.storage().get(TABS_KEY).map(str::to_string);

    assert!(matches!(
        store.add_tab(),
        Err(TabError::TooManyTabs { max: MAX_TABS })
    ));
    assert_eq!(store.tabs().len(), MAX_TABS);
    assert_eq!(store.storage().get(TABS_KEY).map(str::to_string), snapshot);
}

#[test]
fn test_write_failure_keeps_in_memory_edit() {
    let mut store = TabStore::load(ReadOnlyStore::default());
    store.add_tab().unwrap();
    store.rename_tab(1, "Still here").unwrap();

    assert_eq!(store.tabs().len(), 2);
    assert_eq!(store.tabs().active_tab().title, "Still here");
    assert!(store.persist().is_err());
}

#[test]
fn test_reset_behaves_like_cold_start() {
    let mut store = TabStore::load(MemoryStore::new());
    store.add_tab().unwrap();
    store.add_tab().unwrap();
    store.rename_tab(0, "Renamed").unwrap();

    store.reset();

    assert_eq!(store.tabs().tabs(), default_tabs().as_slice());
    assert_eq!(store.tabs().active_index(), 0);
    assert_eq!(store.storage().get(TABS_KEY), None);
    assert_eq!(store.storage().get(ACTIVE_INDEX_KEY), None);
}

#[test]
fn test_reset_with_failing_clear_still_reloads() {
    let mut store = TabStore::load(ReadOnlyStore::default());
    store.add_tab().unwrap();
    store.reset();
    assert_eq!(store.tabs().tabs(), default_tabs().as_slice());
}
