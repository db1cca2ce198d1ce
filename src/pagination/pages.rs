use super::config::PaginationConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: usize,
    pub url: String,
}

/// Links for at most `window` pages around the current one.
pub fn page_links(config: &PaginationConfig, page_count: usize) -> Vec<PageLink> {
    let window = config.window;
    if window == 0 {
        return Vec::new();
    }

    let end = (config.page + window / 2).max(window).min(page_count);
    let start = if config.page + 1 < window {
        1
    } else {
        (end + 1).saturating_sub(window).max(1)
    };

    (start..=end)
        .map(|number| PageLink {
            number,
            url: format!("?page={}&limit={}", number, config.limit),
        })
        .collect()
}

/// Whether pages follow the current one.
pub fn has_more(config: &PaginationConfig, page_count: usize) -> bool {
    config.page < page_count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(page: i64) -> PaginationConfig {
        PaginationConfig::default().with_page(Some(page))
    }

    fn numbers(links: &[PageLink]) -> Vec<usize> {
        links.iter().map(|l| l.number).collect()
    }

    #[test]
    fn test_window_at_start() {
        assert_eq!(numbers(&page_links(&at(1), 10)), vec![1, 2, 3, 4, 5]);
        assert_eq!(numbers(&page_links(&at(3), 10)), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_window_follows_current_page() {
        assert_eq!(numbers(&page_links(&at(6), 10)), vec![4, 5, 6, 7, 8]);
        assert_eq!(numbers(&page_links(&at(10), 10)), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_few_pages() {
        assert_eq!(numbers(&page_links(&at(1), 2)), vec![1, 2]);
        assert!(page_links(&at(1), 0).is_empty());
    }

    #[test]
    fn test_link_urls_and_has_more() {
        let links = page_links(&at(1), 2);
        assert_eq!(links[1].url, "?page=2&limit=10");
        assert!(has_more(&at(1), 2));
        assert!(!has_more(&at(2), 2));
    }
}
