//! Typed client for the bunny.net REST API
//!
//! Every operation issues one request and returns its decoded response.
//! Optional fields are `Option`s and are left out of request bodies when `None`.

mod client;
mod edgerule;
mod error;
mod hostname;
mod pagination;
mod pullzone;
mod storagezone;
mod videolibrary;

pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
pub use edgerule::{
    AddOrUpdateEdgeRuleOptions, EdgeRule, EdgeRuleActionType, EdgeRuleTrigger,
    EdgeRuleTriggerType, MatchingType, UnknownName, MAX_EDGE_RULE_TRIGGERS,
};
pub use error::{classify_response, ApiError, Error, HttpError, Result};
pub use hostname::{
    AddCertificateOptions, AddCustomHostnameOptions, Hostname, RemoveCertificateOptions,
    RemoveCustomHostnameOptions, SetForceSslOptions,
};
pub use pagination::{
    paginate, Page, Pagination, DEFAULT_PAGINATION_PAGE, DEFAULT_PAGINATION_PER_PAGE,
};
pub use pullzone::{PullZone, PullZoneAddOptions, PullZoneSettings, PullZoneUpdateOptions};
pub use storagezone::{StorageZone, StorageZoneAddOptions, StorageZoneUpdateOptions};
pub use videolibrary::{
    VideoLibrary, VideoLibraryAddOptions, VideoLibrarySettings, VideoLibraryUpdateOptions,
};
