//! Request and deep-link URLs for one profile.

use url::Url;

use super::ScrapeError;
use crate::config::ScholarConfig;

/// Offset of the single listing page that is fetched.
///
/// Only the first page is requested; see [`ScholarConfig::page_size`].
const LISTING_START: u32 = 0;

/// URL builder for a single Scholar profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUrls {
    /// Base URL, always ending in `/`
    base: Url,
    user_id: String,
    language: String,
    page_size: u32,
}

impl ProfileUrls {
    pub fn new(config: &ScholarConfig) -> Result<Self, ScrapeError> {
        let mut base = Url::parse(&config.base_url).map_err(|e| {
            ScrapeError::InvalidUrl(format!("base URL '{}': {}", config.base_url, e))
        })?;

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            base,
            user_id: config.user_id.trim().to_string(),
            language: config.language.clone(),
            page_size: config.page_size,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Profile page carrying the citation statistics
    pub fn profile(&self) -> String {
        let mut url = self.citations_url();
        url.query_pairs_mut()
            .append_pair("user", &self.user_id)
            .append_pair("hl", &self.language);
        url.into()
    }

    /// First page of the publication listing
    pub fn listing(&self) -> String {
        let mut url = self.citations_url();
        url.query_pairs_mut()
            .append_pair("user", &self.user_id)
            .append_pair("hl", &self.language)
            .append_pair("cstart", &LISTING_START.to_string())
            .append_pair("pagesize", &self.page_size.to_string());
        url.into()
    }

    /// Build a deep link to a publication's detail view.
    ///
    /// `href` is the (usually relative) target stored on the title element.
    /// Returns `None` unless it carries a non-empty `citation_for_view`
    /// parameter.
    pub fn citation_link(&self, href: &str) -> Option<String> {
        let target = self.base.join(href.trim()).ok()?;
        let citation_id = target
            .query_pairs()
            .find(|(key, _)| key == "citation_for_view")
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())?;

        // Keep the `user:article` separator readable, as Scholar renders it.
        let encoded_id = citation_id
            .split(':')
            .map(|part| urlencoding::encode(part).into_owned())
            .collect::<Vec<_>>()
            .join(":");

        Some(format!(
            "{}citations?view_op=view_citation&hl={}&user={}&citation_for_view={}",
            self.base,
            urlencoding::encode(&self.language),
            urlencoding::encode(&self.user_id),
            encoded_id
        ))
    }

    fn citations_url(&self) -> Url {
        let mut url = self.base.clone();
        url.set_path(&format!("{}citations", self.base.path()));
        url.set_query(None);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(base_url: &str) -> ProfileUrls {
        let config = ScholarConfig {
            user_id: "tMmhq2MAAAAJ".to_string(),
            base_url: base_url.to_string(),
            ..ScholarConfig::default()
        };
        ProfileUrls::new(&config).unwrap()
    }

    #[test]
    fn test_profile_and_listing_urls() {
        let urls = urls("https://scholar.google.com");

        assert_eq!(
            urls.profile(),
            "https://scholar.google.com/citations?user=tMmhq2MAAAAJ&hl=en"
        );
        assert_eq!(
            urls.listing(),
            "https://scholar.google.com/citations?user=tMmhq2MAAAAJ&hl=en&cstart=0&pagesize=100"
        );
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let urls = urls("http://127.0.0.1:8080/mirror");
        assert_eq!(
            urls.profile(),
            "http://127.0.0.1:8080/mirror/citations?user=tMmhq2MAAAAJ&hl=en"
        );
    }

    #[test]
    fn test_citation_link_from_data_href() {
        let urls = urls("https://scholar.google.com");
        let href = "/citations?view_op=view_citation&hl=en&user=tMmhq2MAAAAJ&citation_for_view=tMmhq2MAAAAJ:u5HHmVD_uO8C";

        assert_eq!(
            urls.citation_link(href).as_deref(),
            Some("https://scholar.google.com/citations?view_op=view_citation&hl=en&user=tMmhq2MAAAAJ&citation_for_view=tMmhq2MAAAAJ:u5HHmVD_uO8C")
        );
    }

    #[test]
    fn test_citation_link_decodes_escaped_separator() {
        let urls = urls("https://scholar.google.com");
        let link = urls
            .citation_link("/citations?view_op=view_citation&citation_for_view=abc%3Axyz")
            .unwrap();

        assert!(link.ends_with("citation_for_view=abc:xyz"));
    }

    #[test]
    fn test_citation_link_without_identifier() {
        let urls = urls("https://scholar.google.com");

        assert_eq!(urls.citation_link("javascript:void(0)"), None);
        assert_eq!(urls.citation_link("/citations?view_op=view_citation"), None);
        assert_eq!(urls.citation_link("/citations?citation_for_view="), None);
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ScholarConfig {
            base_url: "::not a url".to_string(),
            ..ScholarConfig::default()
        };
        match ProfileUrls::new(&config) {
            Err(ScrapeError::InvalidUrl(msg)) => assert!(msg.contains("::not a url")),
            other => panic!("expected invalid URL error, got {:?}", other),
        }
    }
}
