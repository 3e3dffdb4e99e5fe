//! Request/response plumbing.
//!
//! The protocol is a small HTTP-like dialect: one request per connection,
//! only `Content-Length` among the headers matters, and the connection is
//! closed once the response has been written.
//!
//! # Architecture
//!
//! - **`connection`**: Per-connection state machine
//! - **`parser`**: Parses requests from byte buffers and list ids from paths
//! - **`request`**: Request representation
//! - **`response`**: Response representation with builder pattern
//! - **`writer`**: Serializes and writes responses to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Accumulate bytes until a request parses
//!        └──────┬──────┘
//!               │ Request received (or rejected → Writing)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route to the list handler
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!             Closed
//! ```

pub mod request;
pub mod response;
pub mod parser;
pub mod connection;
pub mod writer;
