use serde::{Deserialize, Serialize};

/// One page of a server-side paginated list.
///
/// The list endpoints are not consistent about the array's name: most use
/// `data`, the Spring-style ones use `content`. Both decode here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(alias = "content", default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    /// Zero-based page index, when the backend echoes it.
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            number: None,
            size: None,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_data_or_content() {
        let a: Page<u32> =
            serde_json::from_str(r#"{"data": [1, 2], "totalElements": 2, "totalPages": 1}"#).unwrap();
        let b: Page<u32> =
            serde_json::from_str(r#"{"content": [1, 2], "totalElements": 2, "totalPages": 1, "number": 0}"#)
                .unwrap();
        assert_eq!(a.data, b.data);
        assert_eq!(b.number, Some(0));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let page: Page<u32> = serde_json::from_str("{}").unwrap();
        assert_eq!(page, Page::empty());
    }
}
