/// Joins `base` and `path` with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// Document references come back either absolute or as storage-relative
/// paths. Absolute values pass through; relative ones are joined onto the
/// storage base; blanks become `None`.
pub fn normalize_document_url(storage_base: &str, value: Option<&str>) -> Option<String> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    if value.starts_with("http") {
        Some(value.to_string())
    } else {
        Some(join_url(storage_base, value))
    }
}

pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// `application/x-www-form-urlencoded` serialisation of ordered pairs.
pub fn encode_form<K, V>(pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k.as_ref()),
                urlencoding::encode(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Last path segment of a URL, without query or fragment.
pub fn file_name_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_become_absolute() {
        assert_eq!(
            normalize_document_url("https://os.example.com/", Some("/n/ns/b/bk/o/id.png")),
            Some("https://os.example.com/n/ns/b/bk/o/id.png".to_string())
        );
        assert_eq!(
            normalize_document_url("https://os.example.com", Some("docs/cv.pdf")),
            Some("https://os.example.com/docs/cv.pdf".to_string())
        );
    }

    #[test]
    fn absolute_and_blank_values() {
        assert_eq!(
            normalize_document_url("https://os", Some("https://cdn.example.com/a.png")),
            Some("https://cdn.example.com/a.png".to_string())
        );
        assert_eq!(normalize_document_url("https://os", Some("   ")), None);
        assert_eq!(normalize_document_url("https://os", None), None);
    }

    #[test]
    fn emails_are_escaped_in_paths() {
        assert_eq!(encode_segment("ana+test@x.io"), "ana%2Btest%40x.io");
    }

    #[test]
    fn form_encoding_keeps_order() {
        let body = encode_form(&[("candidate_id", "4"), ("start_time", "2025-03-01T10:00:00.000Z")]);
        assert_eq!(body, "candidate_id=4&start_time=2025-03-01T10%3A00%3A00.000Z");
    }

    #[test]
    fn file_names_ignore_query() {
        assert_eq!(file_name_from_url("https://x/y/cv.docx?sig=1"), Some("cv.docx"));
        assert_eq!(file_name_from_url("https://x/y/"), None);
    }
}
