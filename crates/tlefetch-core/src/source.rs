//! Request target: CelesTrak GP endpoint and the `CATNR` query parameter.

use anyhow::{Context, Result};
use url::Url;

/// CelesTrak general-perturbations endpoint, TLE format by default.
pub const CELESTRAK_GP_URL: &str = "https://celestrak.org/NORAD/elements/gp.php";

/// Catalog number of the ISS (ZARYA).
pub const DEFAULT_CATNR: u32 = 25544;

/// Query parameter holding the satellite catalog number.
const CATNR_PARAM: &str = "CATNR";

/// Default output filename, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "ISS.tle";

/// URL for the ISS elements on CelesTrak.
pub fn default_url() -> String {
    format!("{}?{}={}", CELESTRAK_GP_URL, CATNR_PARAM, DEFAULT_CATNR)
}

/// Build the URL for `catnr` on top of `base`.
///
/// Any existing `CATNR` parameter on `base` is replaced; other query
/// parameters (e.g. `FORMAT`) are preserved in order.
pub fn catalog_url(base: &str, catnr: u32) -> Result<String> {
    let mut url = Url::parse(base).with_context(|| format!("invalid base URL: {}", base))?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !k.eq_ignore_ascii_case(CATNR_PARAM))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair(CATNR_PARAM, &catnr.to_string());
    }
    Ok(url.into())
}
