use serde::{
    Deserialize,
    Serialize,
};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct HelixUser {
    pub id: String,
    pub login: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct HelixStream {
    pub user_id: String,
    #[serde(default)]
    pub viewer_count: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct HelixVideo {
    #[serde(default)]
    pub view_count: u64,
}

/// Body of non-paginated list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct DataResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Pagination {
    #[serde(default)]
    pub cursor: Option<String>,
}

/// One page of a paginated endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, cursor: Option<&str>) -> Self {
        Self {
            data,
            pagination: Pagination {
                cursor: cursor.map(str::to_string),
            },
        }
    }

    /// The cursor for the following page. An empty cursor counts as absent.
    pub fn next_cursor(&self) -> Option<&str> {
        self.pagination.cursor.as_deref().filter(|c| !c.is_empty())
    }

    pub fn into_parts(self) -> (Vec<T>, Option<String>) {
        let cursor = self.pagination.cursor.filter(|c| !c.is_empty());
        (self.data, cursor)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct FollowTotal {
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn page_without_pagination_has_no_cursor() {
        let page: Page<HelixStream> =
            serde_json::from_str(r#"{"data":[{"user_id":"1","viewer_count":3,"title":"x"}],"pagination":{}}"#).unwrap();
        assert_eq!(page.next_cursor(), None);
        assert_eq!(page.data[0].viewer_count, 3);

        let page: Page<HelixVideo> = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert_eq!(page.next_cursor(), None);
    }

    #[test]
    fn empty_cursor_counts_as_absent() {
        let page: Page<HelixVideo> =
            serde_json::from_str(r#"{"data":[{"view_count":7}],"pagination":{"cursor":""}}"#).unwrap();
        assert_eq!(page.next_cursor(), None);
        assert_eq!(page.into_parts(), (vec![HelixVideo { view_count: 7 }], None));
    }

    #[test]
    fn user_ignores_unknown_fields() {
        let user: HelixUser = serde_json::from_str(
            r#"{"id":"141981764","login":"twitchdev","display_name":"TwitchDev","type":"","broadcaster_type":"partner"}"#,
        )
        .unwrap();
        assert_eq!(user.display_name, "TwitchDev");
    }
}
