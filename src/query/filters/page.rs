//! Page filter - restricts results to one document identity

use serde_json::{json, Value};

/// Filter restricting results to a single page
#[derive(Clone, Debug)]
pub struct PageFilter {
    title: String,
    namespace: Option<i64>,
}

impl PageFilter {
    /// Create a new page filter on the page title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            namespace: None,
        }
    }

    /// Additionally pin the page's namespace
    pub fn in_namespace(mut self, namespace: i64) -> Self {
        self.namespace = Some(namespace);
        self
    }

    /// Compile to a term fragment over the subject identity fields
    pub fn compile(&self) -> Value {
        let title = json!({ "term": { "subject.title.keyword": { "value": self.title } } });
        match self.namespace {
            None => title,
            Some(ns) => json!({
                "bool": {
                    "must": [
                        title,
                        { "term": { "subject.namespace": { "value": ns } } }
                    ]
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_only() {
        let filter = PageFilter::new("Main Page");
        assert_eq!(
            filter.compile(),
            json!({ "term": { "subject.title.keyword": { "value": "Main Page" } } })
        );
    }

    #[test]
    fn test_title_and_namespace() {
        let fragment = PageFilter::new("Template:Infobox").in_namespace(10).compile();
        assert_eq!(fragment["bool"]["must"][1]["term"]["subject.namespace"]["value"], 10);
    }
}
