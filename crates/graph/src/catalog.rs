//! Static catalog of synthetic code elements.
//!
//! Purely cosmetic configuration data: display names per node type and the
//! fixed screen region each type's nodes are laid out in. Behavior never
//! depends on the names.

use pulse_core::NodeType;

/// Rectangular layout region for one node type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Catalog entry: one node type's names and layout region.
#[derive(Debug, Clone, Copy)]
pub struct TypeSpec {
    pub node_type: NodeType,
    pub region: Region,
    pub elements: &'static [&'static str],
}

/// Fixed catalog, in generation order. The per-type element counts define
/// the proportional share each type gets of a requested node total.
pub const CATALOG: &[TypeSpec] = &[
    TypeSpec {
        node_type: NodeType::Function,
        region: Region { x: 100.0, y: 150.0, w: 200.0, h: 300.0 },
        elements: &[
            "getData()",
            "processResult()",
            "validateInput()",
            "calculateSum()",
            "findUserById()",
            "updateConfig()",
            "handleRequest()",
            "parseJSON()",
            "renderUI()",
            "sendNotification()",
            "checkPermissions()",
            "encryptData()",
            "connectDatabase()",
            "logActivity()",
            "fetchResources()",
        ],
    },
    TypeSpec {
        node_type: NodeType::Variable,
        region: Region { x: 350.0, y: 100.0, w: 200.0, h: 200.0 },
        elements: &[
            "userCount",
            "dataCache",
            "resultSet",
            "configOptions",
            "errorMessage",
            "isActive",
            "currentUser",
            "pageIndex",
            "totalItems",
            "selectedOption",
        ],
    },
    TypeSpec {
        node_type: NodeType::Class,
        region: Region { x: 350.0, y: 350.0, w: 200.0, h: 200.0 },
        elements: &[
            "UserManager",
            "DataProcessor",
            "EventHandler",
            "ConfigService",
            "ApiClient",
            "CacheStore",
            "Logger",
        ],
    },
    TypeSpec {
        node_type: NodeType::Typedef,
        region: Region { x: 600.0, y: 100.0, w: 200.0, h: 200.0 },
        elements: &[
            "UserProfile",
            "RequestParams",
            "ResponseData",
            "ErrorCode",
            "ConfigOption",
            "ValidationRule",
            "DatabaseRecord",
        ],
    },
    TypeSpec {
        node_type: NodeType::Macro,
        region: Region { x: 600.0, y: 350.0, w: 200.0, h: 100.0 },
        elements: &[
            "MAX_RETRY_COUNT",
            "DEFAULT_TIMEOUT",
            "LOG_LEVEL",
            "API_VERSION",
            "ENABLE_CACHING",
            "DEBUG_MODE",
        ],
    },
    TypeSpec {
        node_type: NodeType::Api,
        region: Region { x: 600.0, y: 500.0, w: 200.0, h: 100.0 },
        elements: &[
            "GET /users",
            "POST /auth",
            "PUT /profile",
            "DELETE /session",
            "GET /products",
            "POST /orders",
        ],
    },
];

/// Total element count across the catalog (the default graph size).
pub fn catalog_size() -> usize {
    CATALOG.iter().map(|spec| spec.elements.len()).sum()
}
