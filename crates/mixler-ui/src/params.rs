use mixler_auth::Location;

/// First value of query parameter `name` on the current page.
pub fn get_param(location: &dyn Location, name: &str) -> Option<String> {
    let url = url::Url::parse(&location.href()).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
