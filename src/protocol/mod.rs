//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Framing
//! Both directions use the same frame:
//! ```text
//! ┌──────────────┬──────────────────────────────────┐
//! │ Len (4, BE)  │   UTF-8 JSON body (Len bytes)    │
//! └──────────────┴──────────────────────────────────┘
//! ```
//! A length of 0, or one above the receiver's cap, is a protocol violation
//! and closes the connection.
//!
//! ## Request Body
//! ```text
//! { "database": str, "operation": str, "collection"?: str,
//!   "data"?: object | [object], "query"?: object, "field"?: str }
//! ```
//!
//! ## Response Body
//! ```text
//! { "status": "success" | "error", "message": str, "data": [doc], "count": int }
//! ```

mod codec;
mod request;
mod response;

pub use codec::{
    decode_frame, encode_frame, read_frame, read_response, write_frame, write_message,
    DEFAULT_MAX_FRAME_SIZE, LENGTH_PREFIX_SIZE,
};
pub use request::{Operation, Request};
pub use response::{Response, Status};
