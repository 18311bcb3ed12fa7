use anyhow::{Result, bail};
use url::Url;

/// Ensures an optional base URL option is an absolute http(s) URL.
pub(crate) fn validate_http_base(flag: &str, value: Option<&str>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => Ok(()),
        _ => bail!(
            "Invalid {flag} value '{value}'.\n  \
             Expected an absolute http(s) URL such as https://example.com"
        ),
    }
}

/// Rejects subcommand names passed after download options.
pub(crate) fn reject_misplaced_subcommand(urls: &[String]) -> Result<()> {
    let Some(first) = urls.first().map(String::as_str) else {
        return Ok(());
    };
    if !(first.eq_ignore_ascii_case("library") || first.eq_ignore_ascii_case("config")) {
        return Ok(());
    }
    bail!(
        "'{first}' is a subcommand, not a link.\n  \
         Use: tunegrab {first} ... without download options before it"
    );
}
