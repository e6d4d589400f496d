//! Captured-link validation

use url::Url;

/// Check that the captured preview link is plausible for the deployment
/// protocol.
///
/// Known providers must resolve to their own hosts; any other protocol only
/// needs a well-formed http(s) URL. An empty preview never validates.
pub fn valid_link_captured(site_preview: &str, protocol: &str) -> bool {
    if site_preview.is_empty() {
        return false;
    }

    let Ok(url) = Url::parse(site_preview) else {
        return false;
    };
    if url.scheme() != "http" && url.scheme() != "https" {
        return false;
    }
    let Some(host) = url.host_str() else {
        return false;
    };

    match protocol {
        "arweave" => host == "arweave.net" || host.ends_with(".arweave.net"),
        "skynet" => host == "siasky.net" || host.ends_with(".siasky.net"),
        p if p.starts_with("ipfs") => host.contains("ipfs") || url.path().starts_with("/ipfs/"),
        _ => true,
    }
}
