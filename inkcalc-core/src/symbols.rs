/// Variable assignments accumulated across submissions, sent along with every request so the
/// recognizer can resolve names the user defined earlier.
#[derive(Default, Clone, Debug)]
pub struct SymbolTable {
    vars: hashbrown::HashMap<String, String>,
}
impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Insert or overwrite. Returns the previous value, if any.
    pub fn upsert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.vars.insert(name.into(), value.into())
    }
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
    pub fn clear(&mut self) {
        self.vars.clear();
    }
    /// Owned copy with a stable (sorted) order, for putting on the wire.
    #[must_use]
    pub fn snapshot(&self) -> std::collections::BTreeMap<String, String> {
        self.vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::SymbolTable;
    #[test]
    fn upsert_overwrites() {
        let mut table = SymbolTable::new();
        assert_eq!(table.upsert("x", "4"), None);
        assert_eq!(table.upsert("x", "5"), Some("4".to_owned()));
        assert_eq!(table.get("x"), Some("5"));
        assert_eq!(table.len(), 1);
    }
    #[test]
    fn snapshot_is_sorted_and_detached() {
        let mut table = SymbolTable::new();
        table.upsert("y", "2");
        table.upsert("a", "1");
        let snap = table.snapshot();
        table.clear();
        assert!(table.is_empty());
        assert_eq!(
            snap.into_iter().collect::<Vec<_>>(),
            [
                ("a".to_owned(), "1".to_owned()),
                ("y".to_owned(), "2".to_owned())
            ]
        );
    }
}
