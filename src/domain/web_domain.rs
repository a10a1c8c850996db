use url::{Host, Url};

const COMPOUND_SUFFIXES: [&str; 16] = [
    "co.uk", "org.uk", "ac.uk", "gov.uk", "co.au", "com.au", "net.au", "org.au", "co.nz",
    "co.jp", "co.kr", "co.in", "com.br", "com.mx", "com.cn", "co.za",
];

/// Registrable domain of a page URL, e.g. `acme.co.uk` for
/// `https://shop.acme.co.uk/about`. None for IPs and bare hostnames.
pub fn registrable_domain(url: &str) -> Option<String> {
    let parsed_url = Url::parse(url).ok()?;

    let host = match parsed_url.host()? {
        Host::Domain(host) => host.trim_end_matches('.').to_lowercase(),
        Host::Ipv4(_) | Host::Ipv6(_) => return None,
    };

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() < 2 {
        return None;
    }

    let last_two = labels[labels.len() - 2..].join(".");
    match COMPOUND_SUFFIXES.contains(&last_two.as_str()) {
        true if labels.len() >= 3 => Some(labels[labels.len() - 3..].join(".")),
        true => None,
        false => Some(last_two),
    }
}
