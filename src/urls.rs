use anyhow::{anyhow, Context, Result};
use url::Url;

use crate::config::ListingSource;

/// Build the absolute listing URL for one page index.
pub fn listing_url(source: &ListingSource, page: u32) -> Result<String> {
    let mut url = origin(source)?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("source domain `{}` cannot carry a path", source.domain))?
        .pop_if_empty()
        .extend(source.path.iter().map(String::as_str));
    url.query_pairs_mut()
        .append_pair(&source.page_param, &page.to_string());
    Ok(url.to_string())
}

/// Origin URL of the listing site, used to resolve relative detail links.
pub fn origin(source: &ListingSource) -> Result<Url> {
    Url::parse(&format!("https://{}", source.domain))
        .with_context(|| format!("invalid source domain `{}`", source.domain))
}
