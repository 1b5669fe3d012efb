use crate::utils::error::{ReaderError, Result};
use url::Url;

/// Builds `{base}/{ncm without last digit}?criterio={ncm}` for an external
/// classification lookup.
pub fn ncm_lookup_url(base: &str, ncm: &str) -> Result<Url> {
    let ncm = ncm.trim();
    if ncm.len() < 2 || !ncm.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ReaderError::InvalidNcm {
            value: ncm.to_string(),
        });
    }

    let mut url = Url::parse(base).map_err(|e| ReaderError::InvalidConfigValueError {
        field: "lookup.ncm_base_url".to_string(),
        value: base.to_string(),
        reason: e.to_string(),
    })?;

    url.path_segments_mut()
        .map_err(|_| ReaderError::InvalidConfigValueError {
            field: "lookup.ncm_base_url".to_string(),
            value: base.to_string(),
            reason: "URL cannot have path segments".to_string(),
        })?
        .pop_if_empty()
        .push(&ncm[..ncm.len() - 1]);
    url.query_pairs_mut().append_pair("criterio", ncm);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ABSENT;

    #[test]
    fn test_builds_lookup_url() {
        let url = ncm_lookup_url("https://example.com/ncm", "10063021").unwrap();
        assert_eq!(url.as_str(), "https://example.com/ncm/1006302?criterio=10063021");

        let url = ncm_lookup_url("https://example.com/ncm/", "22021000").unwrap();
        assert_eq!(url.as_str(), "https://example.com/ncm/2202100?criterio=22021000");
    }

    #[test]
    fn test_rejects_absent_or_non_numeric_ncm() {
        assert!(matches!(
            ncm_lookup_url("https://example.com", ABSENT),
            Err(ReaderError::InvalidNcm { .. })
        ));
        assert!(ncm_lookup_url("https://example.com", "1006A021").is_err());
        assert!(ncm_lookup_url("https://example.com", "").is_err());
    }

    #[test]
    fn test_rejects_bad_base() {
        assert!(matches!(
            ncm_lookup_url("not a url", "10063021"),
            Err(ReaderError::InvalidConfigValueError { .. })
        ));
    }
}
