//! TNC Monitor Protocol Library
//!
//! This crate decodes the textual monitor stream emitted by a packet-radio
//! terminal-node controller (BPQ-style node). Three layers of structure are
//! recognized:
//!
//! - **Monitor lines**: `HH:MM:SSD SRC>DST Port=N MESSAGE` framing around
//!   every trace the node emits (`D` is the `R`/`T` direction flag)
//! - **AX.25 traces**: the human-readable frame dump inside a monitor line,
//!   decoded into source/destination callsigns, frame category,
//!   control-field semantics and an inferred layer-3 protocol
//! - **Telemetry broadcasts**: the TNC's `<UI C>:` key/value self-report,
//!   decoded into typed firmware counters
//!
//! # Architecture
//!
//! Every parser here is a pure function of its input string: no I/O, no
//! shared state, safe to call concurrently from any number of tasks. Lines
//! that do not fit a grammar yield `None` (an expected outcome the caller
//! displays raw), never an error; only telemetry reports a structured
//! [`ParseError`], matching the firmware's strict field-ID format.
//!
//! # Example
//!
//! ```rust
//! use tnc_protocol::{decode, FrameCategory};
//!
//! let frame = decode("N0CALL-1 > APRS <UI pid=F0 Len=50> :!4903.50N/07201.75W-Hello").unwrap();
//! assert_eq!(frame.frame_type, FrameCategory::UnnumberedInformation);
//! assert_eq!(frame.source.call, "N0CALL");
//! assert_eq!(frame.protocol.as_deref(), Some("Text/APRS"));
//! ```

pub mod callsign;
pub mod control;
pub mod error;
pub mod frame;
pub mod monitor;
pub mod telemetry;
pub mod timestamp;

pub use callsign::Callsign;
pub use control::{classify_control, ControlClassification, FrameCategory, PollFinal};
pub use error::ParseError;
pub use frame::{decode, DecodedFrame};
pub use monitor::{parse_monitor_line, LinkDirection, MonitorLine};
pub use telemetry::{parse_telemetry, TncTelemetry};
pub use timestamp::{normalize_timestamp, normalize_timestamp_at};
