use std::fmt::Display;

/// Redfish resources collected on every run, in collection order.
pub const REDFISH_ENDPOINTS: [&str; 4] = [
    "/redfish/v1",
    "/redfish/v1/Systems/1",
    "/redfish/v1/Chassis/1",
    "/redfish/v1/Managers/1",
];

/// A resource path on the management controller, e.g. `/redfish/v1/Systems/1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn new(path: &str) -> Self {
        Endpoint(path.to_string())
    }

    pub fn path(&self) -> &str {
        &self.0
    }

    /// Name of the JSON snapshot for this endpoint: separators at both ends are
    /// dropped, inner ones become `_`, and an empty path becomes `root`.
    pub fn file_name(&self) -> String {
        let slug = self.0.trim_matches('/').replace('/', "_");
        if slug.is_empty() {
            "root.json".to_string()
        } else {
            format!("{slug}.json")
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Endpoint {
    fn from(path: &str) -> Self {
        Endpoint::new(path)
    }
}

/// The fixed, ordered list of endpoints a collection run walks through.
pub fn redfish_endpoints() -> Vec<Endpoint> {
    REDFISH_ENDPOINTS.iter().copied().map(Endpoint::from).collect()
}
