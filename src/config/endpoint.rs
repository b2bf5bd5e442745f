use anyhow::{Context, Result, bail};
use url::Url;

/// Parses a collaborator base address, rejecting anything but absolute
/// `http`/`https` URLs.
pub fn parse_endpoint(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("invalid endpoint URL {raw:?}"))?;

    match url.scheme() {
        "http" | "https" => {}
        other => bail!("endpoint {raw:?} must use http or https, not {other}"),
    }

    if url.host_str().is_none_or(str::is_empty) {
        bail!("endpoint {raw:?} has no host");
    }

    Ok(url)
}

/// Appends `path` to the base address as a plain string, so a base of
/// `http://plug.lan/api` and a path of `on` give `http://plug.lan/api/on`.
pub fn join_path(base: &Url, path: &str) -> String {
    let path = path.trim_start_matches('/');
    let base = base.as_str().trim_end_matches('/');

    if path.is_empty() {
        return base.to_string();
    }

    format!("{base}/{path}")
}
