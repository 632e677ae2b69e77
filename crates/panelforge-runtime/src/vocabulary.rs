//! Event and panel vocabulary shared by the host and its extensions.
//!
//! Both sets are closed. Payload shapes are a contract between the host and
//! the extensions; the event bus never inspects them.

use crate::error::{RuntimeError, RuntimeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque event payload.
pub type Payload = serde_json::Value;

/// An event the host may emit to extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    /// The dashboard finished loading a page.
    Load,

    /// The active filter set changed.
    FiltersUpdate,

    /// The selected time range changed.
    TimeUpdate,

    /// Information about the current project.
    ProjectInfo,

    /// Information about the viewing client.
    ClientInfo,

    /// Single start-up event used by reduced deployments.
    Init,
}

impl EventType {
    /// Every event type, in declaration order.
    pub const ALL: [EventType; 6] = [
        EventType::Load,
        EventType::FiltersUpdate,
        EventType::TimeUpdate,
        EventType::ProjectInfo,
        EventType::ClientInfo,
        EventType::Init,
    ];

    /// Wire name of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Load => "load",
            EventType::FiltersUpdate => "filters-update",
            EventType::TimeUpdate => "time-update",
            EventType::ProjectInfo => "project-info",
            EventType::ClientInfo => "client-info",
            EventType::Init => "init",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = RuntimeError;

    fn from_str(s: &str) -> RuntimeResult<Self> {
        EventType::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| RuntimeError::UnknownName {
                kind: "event type",
                name: s.to_string(),
            })
    }
}

/// A dashboard panel an extension may add a tab to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelId {
    Countries,
    Pages,
    Referrers,
    Devices,
    Browsers,
    Os,
    Sources,
    Metadata,
    Campaigns,
    /// Custom events.
    Events,
}

impl PanelId {
    /// Every panel, in dashboard order.
    pub const ALL: [PanelId; 10] = [
        PanelId::Countries,
        PanelId::Pages,
        PanelId::Referrers,
        PanelId::Devices,
        PanelId::Browsers,
        PanelId::Os,
        PanelId::Sources,
        PanelId::Metadata,
        PanelId::Campaigns,
        PanelId::Events,
    ];

    /// Short panel code.
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelId::Countries => "countries",
            PanelId::Pages => "pages",
            PanelId::Referrers => "referrers",
            PanelId::Devices => "devices",
            PanelId::Browsers => "browsers",
            PanelId::Os => "os",
            PanelId::Sources => "sources",
            PanelId::Metadata => "metadata",
            PanelId::Campaigns => "campaigns",
            PanelId::Events => "events",
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelId {
    type Err = RuntimeError;

    fn from_str(s: &str) -> RuntimeResult<Self> {
        PanelId::ALL
            .into_iter()
            .find(|panel| panel.as_str() == s)
            .ok_or_else(|| RuntimeError::UnknownName {
                kind: "panel",
                name: s.to_string(),
            })
    }
}
