use std::collections::BTreeMap;

/// Monotonic tag attached to every fetch so late responses can be discarded.
pub type RequestId = u64;

/// Parameters for one count or page request, rebuilt from state before every call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestParams {
    pub term: Option<String>,
    /// Empty without a predicate, `field` ascending, `-field` descending.
    pub orderby: String,
    pub skip: usize,
    pub take: usize,
    pub page: u32,
    pub limit: usize,
    pub extra: BTreeMap<String, String>,
}

impl RequestParams {
    pub fn orderby(predicate: Option<&str>, reverse: bool) -> String {
        match predicate {
            Some(field) if reverse => format!("-{field}"),
            Some(field) => field.to_string(),
            None => String::new(),
        }
    }

    /// Flattened key/value view: caller params first, standard keys override them.
    pub fn pairs(&self) -> BTreeMap<String, String> {
        let mut pairs = self.extra.clone();
        pairs.insert("term".into(), self.term.clone().unwrap_or_default());
        pairs.insert("orderby".into(), self.orderby.clone());
        pairs.insert("skip".into(), self.skip.to_string());
        pairs.insert("take".into(), self.take.to_string());
        pairs.insert("page".into(), self.page.to_string());
        pairs.insert("limit".into(), self.limit.to_string());
        pairs
    }
}
