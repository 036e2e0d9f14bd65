//! Cache key derivation.
//!
//! Every key starts with the module's base key followed by its shape marker,
//! so a module is invalidated by those two prefixes only:
//!
//! - lists: `{base}_page_{page}_limit_{limit}_filters_{json}`
//! - items: `{base}_item_{id}`

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Modules with a dedicated cache namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheModule {
    Users,
    Subscriptions,
    Careers,
    Blogs,
    Contact,
    Franchise,
    UserLogins,
    Payments,
}

impl CacheModule {
    pub const ALL: [CacheModule; 8] = [
        CacheModule::Users,
        CacheModule::Subscriptions,
        CacheModule::Careers,
        CacheModule::Blogs,
        CacheModule::Contact,
        CacheModule::Franchise,
        CacheModule::UserLogins,
        CacheModule::Payments,
    ];

    /// Name used by callers to address the module (`CAREERS_LIST`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            CacheModule::Users => "USERS_LIST",
            CacheModule::Subscriptions => "SUBSCRIPTIONS_LIST",
            CacheModule::Careers => "CAREERS_LIST",
            CacheModule::Blogs => "BLOGS_LIST",
            CacheModule::Contact => "CONTACT_LIST",
            CacheModule::Franchise => "FRANCHISE_LIST",
            CacheModule::UserLogins => "USER_LOGINS_LIST",
            CacheModule::Payments => "PAYMENTS_LIST",
        }
    }

    pub const fn base_key(self) -> &'static str {
        match self {
            CacheModule::Users => "users_list",
            CacheModule::Subscriptions => "subscriptions_list",
            CacheModule::Careers => "careers_list",
            CacheModule::Blogs => "blogs_list",
            CacheModule::Contact => "contact_list",
            CacheModule::Franchise => "franchise_list",
            CacheModule::UserLogins => "user_logins_list",
            CacheModule::Payments => "payments_list",
        }
    }
}

/// Cache namespace addressed either by a known module or by a raw name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModuleKey {
    Known(CacheModule),
    Custom(String),
}

impl ModuleKey {
    /// Resolve a module name; unknown names become their own base key.
    pub fn parse(name: &str) -> Self {
        CacheModule::ALL
            .into_iter()
            .find(|module| module.name() == name)
            .map(ModuleKey::Known)
            .unwrap_or_else(|| ModuleKey::Custom(name.to_string()))
    }

    pub fn base(&self) -> &str {
        match self {
            ModuleKey::Known(module) => module.base_key(),
            ModuleKey::Custom(name) => name,
        }
    }

    /// Prefixes of the list and item keys in this namespace.
    ///
    /// A bare `{base}_` would also match a module whose base key merely
    /// starts with this one (`careers` against `careers_list`).
    pub fn prefixes(&self) -> [String; 2] {
        [
            format!("{}_page_", self.base()),
            format!("{}_item_", self.base()),
        ]
    }
}

impl From<CacheModule> for ModuleKey {
    fn from(module: CacheModule) -> Self {
        ModuleKey::Known(module)
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base())
    }
}

/// Key for one page of a filtered listing.
///
/// `filters` must serialize with a stable key order for equal filter sets to
/// share an entry.
pub fn list_key<F>(
    module: &ModuleKey,
    page: u32,
    limit: u32,
    filters: &F,
) -> Result<String, serde_json::Error>
where
    F: Serialize + ?Sized,
{
    let filters = serde_json::to_string(filters)?;
    Ok(format!(
        "{}_page_{page}_limit_{limit}_filters_{filters}",
        module.base()
    ))
}

pub fn item_key(module: &ModuleKey, id: impl fmt::Display) -> String {
    format!("{}_item_{id}", module.base())
}

/// Time-to-live classes for cached values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTtl {
    Short,
    Medium,
    Long,
}

impl CacheTtl {
    pub const fn as_duration(self) -> Duration {
        match self {
            CacheTtl::Short => Duration::from_secs(300),
            CacheTtl::Medium => Duration::from_secs(1800),
            CacheTtl::Long => Duration::from_secs(3600),
        }
    }
}
