//! Site and server types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::SiteId;
use crate::settings::TypeData;

/// Kind of application hosted by a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteType {
    Laravel,
    Php,
    Wordpress,
    Phpmyadmin,
    Nodejs,
    Python,
    Static,
}

impl SiteType {
    /// Every site type the notification feature is offered for.
    pub const ALL: [SiteType; 7] = [
        SiteType::Laravel,
        SiteType::Php,
        SiteType::Wordpress,
        SiteType::Phpmyadmin,
        SiteType::Nodejs,
        SiteType::Python,
        SiteType::Static,
    ];

    /// Returns the wire name of this site type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteType::Laravel => "laravel",
            SiteType::Php => "php",
            SiteType::Wordpress => "wordpress",
            SiteType::Phpmyadmin => "phpmyadmin",
            SiteType::Nodejs => "nodejs",
            SiteType::Python => "python",
            SiteType::Static => "static",
        }
    }
}

impl fmt::Display for SiteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server a site is deployed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    /// Display name of the server.
    pub name: String,
    /// Public IP address.
    pub ip: String,
}

impl Server {
    /// Creates a new server record.
    pub fn new(name: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ip: ip.into(),
        }
    }
}

/// A deployable site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    /// Unique identifier for the site.
    pub id: SiteId,

    /// Application type.
    pub site_type: SiteType,

    /// Domain name the site is served on.
    pub domain: String,

    /// Branch deployments are taken from.
    pub branch: String,

    /// Server the site lives on, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<Server>,

    /// Feature settings blob.
    #[serde(default)]
    pub type_data: TypeData,

    /// When the site was created.
    pub created_at: DateTime<Utc>,
}

impl Site {
    /// Creates a new site with empty settings and no server attached.
    pub fn new(site_type: SiteType, domain: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            id: SiteId::new(),
            site_type,
            domain: domain.into(),
            branch: branch.into(),
            server: None,
            type_data: TypeData::default(),
            created_at: Utc::now(),
        }
    }

    /// Attaches a server to the site.
    pub fn with_server(mut self, server: Server) -> Self {
        self.server = Some(server);
        self
    }
}
