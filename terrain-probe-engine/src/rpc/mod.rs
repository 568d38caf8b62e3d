//! JSON-RPC 2.0 communication layer for the embedding web frontend.
//!
//! The viewer runs inside an iframe; the host page drives tool state via
//! `postMessage` requests and receives probe reports as notifications.
//!
//! Requests: `set_probe_active`, `set_situation_mode`, `get_fps`.
//! Notifications: `probe_sampled`, `probe_out_of_range`,
//! `tool_state_changed`, `grid_load_failed`.

/// JSON-RPC 2.0 bidirectional messaging over iframe postMessage.
pub mod web_rpc;
