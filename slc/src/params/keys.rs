//! Canonical parameter keys.

/// Persistent: whether settings are in km/h (`1`) or mph (`0`).
pub const IS_METRIC: &str = "IsMetric";

/// Persistent: offset per band, integer km/h or mph.
pub const OFFSET_KEYS: [&str; 4] = ["Offset1", "Offset2", "Offset3", "Offset4"];

/// Persistent: ordered source priority tokens.
pub const PRIORITY_KEYS: [&str; 3] = ["SLCPriority1", "SLCPriority2", "SLCPriority3"];

/// Persistent: fallback mode (`0` none, `1` experimental mode, `2` previous limit).
pub const SLC_FALLBACK: &str = "SLCFallback";

/// Persistent: last limit selected through the priority walk (m/s).
pub const PREVIOUS_SPEED_LIMIT: &str = "PreviousSpeedLimit";

/// Live: dashboard sign recognition reading (JSON number, m/s).
pub const CAR_SPEED_LIMIT: &str = "CarSpeedLimit";

/// Live: offline map reading (JSON number, m/s).
pub const MAP_SPEED_LIMIT: &str = "MapSpeedLimit";

/// Live: navigation reading (JSON number, m/s).
pub const NAV_SPEED_LIMIT: &str = "NavSpeedLimit";

/// Live: raised when settings changed and must be reloaded.
pub const TOGGLES_UPDATED: &str = "FrogPilotTogglesUpdated";

/// Persistent keys that users may edit.
pub const CONFIG_KEYS: [&str; 10] = [
    IS_METRIC,
    OFFSET_KEYS[0],
    OFFSET_KEYS[1],
    OFFSET_KEYS[2],
    OFFSET_KEYS[3],
    PRIORITY_KEYS[0],
    PRIORITY_KEYS[1],
    PRIORITY_KEYS[2],
    SLC_FALLBACK,
    PREVIOUS_SPEED_LIMIT,
];
