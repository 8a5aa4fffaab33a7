use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::api::types::{Profile, ResultPage};
use crate::api::{ApiClientError, DirectoryClient};

/// Percent-encoding set for URL query values (encode everything except unreserved chars).
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode_query(s: &str) -> String {
    utf8_percent_encode(s, QUERY_ENCODE_SET).to_string()
}

impl DirectoryClient {
    /// Fetch a page of the unfiltered roster.
    pub async fn fetch_browse_page(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<ResultPage, ApiClientError> {
        let url = self.url(&format!("/users/initial?page={page}&limit={limit}"));
        self.bearer_get(&url).await
    }

    /// Fetch a page of users whose name or handle matches `term`.
    pub async fn fetch_search_page(
        &self,
        term: &str,
        page: u32,
        limit: u32,
    ) -> Result<ResultPage, ApiClientError> {
        let url = self.url(&format!(
            "/users/search?query={}&page={page}&limit={limit}",
            encode_query(term),
        ));
        self.bearer_get(&url).await
    }

    /// Fetch the signed-in user's own profile.
    pub async fn get_profile(&self) -> Result<Profile, ApiClientError> {
        let url = self.url("/users/profile");
        self.bearer_get(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::encode_query;

    #[test]
    fn encodes_reserved_characters() {
        assert_eq!(encode_query("cha"), "cha");
        assert_eq!(encode_query("mary jo"), "mary%20jo");
        assert_eq!(encode_query("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode_query("jo.doe_1~x-y"), "jo.doe_1~x-y");
    }

    #[test]
    fn encodes_non_ascii_as_utf8() {
        assert_eq!(encode_query("zoë"), "zo%C3%AB");
    }
}
