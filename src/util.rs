pub fn remove_trailling_slash(string: &str) -> String {
    if let Some(end) = string.strip_suffix('/') {
        end.to_string()
    } else {
        string.to_string()
    }
}

/// Trims whitespace and a trailing slash. The scheme, if any, is kept.
pub fn normalize_gateway(gateway: &str) -> String {
    remove_trailling_slash(gateway.trim())
}

/// The gateway without its scheme, e.g. `https://gw:8080` becomes `gw:8080`.
pub fn gateway_host(gateway: &str) -> &str {
    gateway
        .strip_prefix("http://")
        .or_else(|| gateway.strip_prefix("https://"))
        .unwrap_or(gateway)
}

/// The gateway with a scheme, `http://` when none is configured.
pub fn gateway_base_url(gateway: &str) -> String {
    let gateway = normalize_gateway(gateway);
    if gateway.starts_with("http://") || gateway.starts_with("https://") {
        gateway
    } else {
        format!("http://{}", gateway)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_scheme_and_strips_trailing_slash() {
        assert_eq!(
            normalize_gateway("http://10.0.0.180:31113/"),
            "http://10.0.0.180:31113"
        );
        assert_eq!(normalize_gateway("https://gw.local/"), "https://gw.local");
        assert_eq!(normalize_gateway(" 127.0.0.1:31113 "), "127.0.0.1:31113");
        assert_eq!(normalize_gateway("gateway:8080"), "gateway:8080");
    }

    #[test]
    fn host_drops_either_scheme() {
        assert_eq!(gateway_host("https://gw.local"), "gw.local");
        assert_eq!(gateway_host("http://gw:8080"), "gw:8080");
        assert_eq!(gateway_host("gw:8080"), "gw:8080");
    }

    #[test]
    fn base_url_defaults_to_http_and_keeps_https() {
        assert_eq!(gateway_base_url("gw:8080"), "http://gw:8080");
        assert_eq!(gateway_base_url("https://gw/"), "https://gw");
        assert_eq!(gateway_base_url("http://gw"), "http://gw");
        assert_eq!(remove_trailling_slash("a/b"), "a/b");
    }
}
